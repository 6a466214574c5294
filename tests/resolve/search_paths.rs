use imery::{ Imery, ResolveError, Settings };

fixtures! {
	const ROOT = "app/main" ;
}

#[test]
fn resolve_search_paths() {

	let settings = Settings::new().with_search_path( fixtures::dir().join( "lib" ));
	let mut app = Imery::with_settings( settings );
	crate::demo_widgets::register( &mut app.registrar() ).unwrap();

	assert_no_warnings!( app.load_main( "main", fixtures::dir().join( "app" )).expect( "Failed to resolve" ));
	let slot = app.tree().unwrap().data_slot( "accent" ).unwrap();
	assert_eq!( slot.value(), &serde_yaml::Value::from( "#3366ff" ));

	// Without the search path the import cannot be found.
	let mut app = crate::demo_widgets::app();
	match app.load( &fixtures::entry() ) {
		Err( errors ) => match errors.first() {
			ResolveError::ModuleNotFound { reference, importer: Some( importer )} => {
				assert_eq!( reference, "shared.theme" );
				assert_eq!( importer, &fixtures::entry() );
			},
			error => panic!( "Expected ModuleNotFound, found: {:#?}", error ),
		},
		Ok( warnings ) => panic!( "Expected Err( ModuleNotFound ), found: Ok( {:?} )", warnings ),
	}

	match app.load_main( "main", fixtures::dir().join( "missing" )) {
		Err( errors ) => assert!( matches!( errors.first(), ResolveError::InvalidSearchPath { .. }), "{}", errors ),
		Ok( warnings ) => panic!( "Expected Err( InvalidSearchPath ), found: Ok( {:?} )", warnings ),
	}

}
