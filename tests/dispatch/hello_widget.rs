use imery::{ Args, Imery, Outcome, PendingQueue, Registrar };

#[test]
fn dispatch_hello_widget() {

	let queue = PendingQueue::new();
	Registrar::pending( &queue ).widget( "test", "hello", | _ | Ok( "hello".to_string() )).unwrap();

	let mut app = Imery::new();
	app.apply_pending_registrations( &queue );

	match app.execute_from_registry( "test.widget.hello", Args::new() ) {
		Outcome::Success( value ) => assert_eq!( value, "hello" ),
		Outcome::Failure( failure ) => panic!( "Expected Success( \"hello\" ), found: {}", failure ),
	}
	// A unique bare name dispatches too.
	assert_eq!( app.execute_from_registry( "hello", Args::new() ).unwrap(), "hello" );

}

#[test]
fn dispatch_widget_params() {

	let app = crate::demo_widgets::app();
	let label = app.execute_from_registry( "demo.widget.label", Args::new().with( "text", "hi" ));
	assert_eq!( label.unwrap(), "hi" );

	let button = app.execute_from_registry( "demo.widget.button", Args::new().with( "label", "OK" ));
	assert_eq!( button.unwrap(), "OK" );

}
