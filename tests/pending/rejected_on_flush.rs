use imery::{ DuplicatePolicy, Imery, PendingQueue, Registrar, RegistryError, Settings };

#[test]
fn pending_rejected_on_flush() {

	let queue = PendingQueue::new();
	let mut registrar = Registrar::pending( &queue );
	registrar.for_module( "first" ).command( "test", "greet", | _ | Ok( "first" )).unwrap();
	registrar.for_module( "second" ).command( "test", "greet", | _ | Ok( "second" )).unwrap();
	registrar.command( "test", "other", | _ | Ok( "other" )).unwrap();

	let mut app = Imery::new();
	let ( applied, rejected ) = app.apply_pending_registrations( &queue );
	assert_eq!( applied, 2 );
	match rejected.as_slice() {
		[ RegistryError::DuplicateRegistration { existing, .. }] => assert_eq!( existing, "first" ),
		value => panic!( "Expected [ DuplicateRegistration ], found: {:#?}", value ),
	}
	assert_eq!( app.execute_from_registry( "greet", imery::Args::new() ).unwrap(), "first" );

	// With the override policy the later registration wins.
	let mut registrar = Registrar::pending( &queue );
	registrar.for_module( "first" ).command( "test", "greet", | _ | Ok( "first" )).unwrap();
	registrar.for_module( "second" ).command( "test", "greet", | _ | Ok( "second" )).unwrap();

	let mut app = Imery::with_settings( Settings::new().with_duplicate_policy( DuplicatePolicy::Override ));
	let ( applied, rejected ) = app.apply_pending_registrations( &queue );
	assert_eq!(( applied, rejected.len() ), ( 2, 0 ));
	assert_eq!( app.execute_from_registry( "greet", imery::Args::new() ).unwrap(), "second" );

}
