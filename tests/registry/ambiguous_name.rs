use imery::{ ErrorKind, RegistryError };

#[test]
fn registry_ambiguous_name() {

	let mut app = crate::demo_widgets::app();
	app.registrar().widget( "other", "label", |_| Ok( "other".to_string() )).unwrap();

	match app.registry().find( "label" ) {
		Err( RegistryError::AmbiguousName { name, candidates }) => {
			assert_eq!( name, "label" );
			assert_eq!(
				candidates.iter().map( ToString::to_string ).collect::<Vec<_>>(),
				[ "demo.widget.label", "other.widget.label" ],
			);
		},
		value => panic!( "Expected Err( AmbiguousName ), found: {:#?}", value.map(|( key, _ )| key ) ),
	}

	match app.registry().find( "panel" ) {
		Ok(( key, _ )) => assert_eq!( key.to_string(), "demo.widget.panel" ),
		value => panic!( "Expected Ok( demo.widget.panel ), found: {:#?}", value.map(|( key, _ )| key ) ),
	}

	let failure = app.execute_from_registry( "label", imery::Args::new() ).into_result().unwrap_err();
	assert_eq!( failure.kind(), ErrorKind::AmbiguousReferenceError );

}
