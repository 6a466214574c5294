use imery::{ Imery, ResolveError, Settings, SettingsError };

#[test]
fn settings_invalid_settings() {

	let root = tempfile::tempdir().unwrap();

	match Settings::from_file( root.path().join( "absent.yaml" )) {
		Err( SettingsError::Io { path, .. }) => assert_eq!( path, root.path().join( "absent.yaml" )),
		value => panic!( "Expected Err( Io ), found: {:#?}", value ),
	}

	std::fs::write( root.path().join( "typo.yaml" ), "serach_paths: [ layouts ]" ).unwrap();
	match Settings::from_file( root.path().join( "typo.yaml" )) {
		Err( SettingsError::Yaml( _ )) => {}
		value => panic!( "Expected Err( Yaml ), found: {:#?}", value ),
	}

	// The configured main document does not exist.
	let mut app = Imery::with_settings( Settings::new().with_search_path( root.path() ).with_main( "missing" ));
	match app.load_configured_main() {
		Err( errors ) => assert!( matches!( errors.first(), ResolveError::ModuleNotFound { reference, .. } if reference == "missing" )),
		Ok( warnings ) => panic!( "Expected Err( ModuleNotFound ), found: Ok( {:?} )", warnings ),
	}
	assert!( app.resolution_errors().is_some() );

}
