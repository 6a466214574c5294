use std::fs ;
use imery::{ DuplicatePolicy, Imery, Settings };

#[test]
fn settings_configured_main() {

	let root = tempfile::tempdir().unwrap();
	fs::create_dir( root.path().join( "layouts" )).unwrap();
	fs::write( root.path().join( "layouts/demo.yaml" ), "import: parts\napp: { title: Configured, widget: header }" ).unwrap();
	fs::write( root.path().join( "layouts/parts.yaml" ), "widgets: { header: { widget: demo.widget.label, text: Hi }}" ).unwrap();
	fs::write( root.path().join( "imery.yaml" ), concat!(
		"search_paths: [ layouts ]\n",
		"main: demo\n",
		"duplicate_policy: override\n",
		"module_timeout_ms: 250\n",
	)).unwrap();

	let settings = Settings::from_file( root.path().join( "imery.yaml" )).expect( "Failed to read settings" );
	assert_eq!( settings.search_paths, [ root.path().join( "layouts" )]);
	assert_eq!( settings.duplicate_policy, DuplicatePolicy::Override );
	assert_eq!( settings.discovery_options().module_timeout, Some( std::time::Duration::from_millis( 250 )));

	let mut app = Imery::with_settings( settings );
	crate::demo_widgets::register( &mut app.registrar() ).unwrap();
	// Override policy: registering twice replaces instead of failing.
	crate::demo_widgets::register( &mut app.registrar() ).unwrap();

	let warnings = app.load_configured_main().expect( "Failed to resolve" );
	assert!( warnings.is_empty(), "{:?}", warnings );
	assert_eq!( app.tree().unwrap().title(), Some( "Configured" ));

}
