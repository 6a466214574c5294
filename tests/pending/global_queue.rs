use imery::{ Imery, PendingQueue, Registrar };

// The only case touching the process-wide queue, so its counts are exact.
#[test]
fn pending_global_queue() {

	Registrar::global().widget( "global", "hello", | _ | Ok( "hello".to_string() )).unwrap();
	assert_eq!( PendingQueue::global().len(), 1 );

	let mut app = Imery::new();
	let ( applied, rejected ) = app.apply_pending_registrations( PendingQueue::global() );
	assert_eq!(( applied, rejected.len() ), ( 1, 0 ));
	assert!( PendingQueue::global().is_empty() );
	assert_eq!( app.execute_from_registry( "global.widget.hello", imery::Args::new() ).unwrap(), "hello" );

}
