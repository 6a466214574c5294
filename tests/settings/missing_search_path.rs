use imery::{ Imery, ResolveError, Settings };

#[test]
fn settings_missing_search_path() {

	let root = tempfile::tempdir().unwrap();
	std::fs::write( root.path().join( "demo.yaml" ), "app: { widget: demo.widget.label, text: hi }" ).unwrap();
	let settings = Settings::new()
		.with_search_path( root.path() )
		.with_search_path( root.path().join( "vanished" ))
		.with_main( "demo" );

	// The main document exists, but a configured path does not: nothing loads.
	let mut app = Imery::with_settings( settings );
	crate::demo_widgets::register( &mut app.registrar() ).unwrap();
	match app.load_configured_main() {
		Err( errors ) => {
			assert_eq!( errors.count(), 1 );
			match errors.first() {
				ResolveError::InvalidSearchPath { path, .. } => assert_eq!( path, &root.path().join( "vanished" )),
				other => panic!( "Expected InvalidSearchPath, found: {:#?}", other ),
			}
		},
		Ok( warnings ) => panic!( "Expected Err( InvalidSearchPath ), found: Ok( {:?} )", warnings ),
	}
	assert!( app.tree().is_none() );

}
