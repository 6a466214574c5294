use std::sync::atomic::{ AtomicUsize, Ordering };
use imery::{ ErrorKind, RecordingBackend, RenderDriver, RenderError };
use serde_yaml::Value ;

#[test]
fn render_panicking_provider_keeps_frames_running() {

	let mut app = crate::demo_widgets::app();
	let calls = AtomicUsize::new( 0 );
	app.registrar().data( "test", "boom", move | _ | match calls.fetch_add( 1, Ordering::SeqCst ) {
		0 => Ok( Value::from( "steady" )),
		_ => panic!( "provider boom" ),
	}).unwrap();
	app.load_document( "main", r#"
app: { widget: demo.widget.label, data: d }
data:
  d: { provider: test.data.boom }
"# ).expect( "Failed to resolve" );

	// The first frame gets the value; later frames keep it while the provider panics.
	let mut driver = RenderDriver::new( &mut app ).unwrap();
	let mut ui = RecordingBackend::new();
	for _ in 0..3 { driver.frame( &mut ui ).expect( "A panicking provider must not abort the frame" ); }
	assert_eq!( ui.calls(), [ "text:steady", "text:steady", "text:steady" ]);
	assert_eq!( driver.frames(), 3 );

	// Dispatch by name reports the same panic instead of unwinding.
	let failure = driver.app().execute_from_registry( "test.data.boom", imery::Args::new() ).into_result().unwrap_err();
	assert_eq!( failure.kind(), ErrorKind::CallFailed );
	assert_eq!( failure.path(), Some( "test.data.boom" ));
	assert!( failure.message().contains( "provider boom" ), "{}", failure );

}

#[test]
fn render_panicking_factory_is_a_build_failure() {

	let mut app = crate::demo_widgets::app();
	app.registrar().widget( "test", "brittle", | _ | -> Result<String, imery::CallError> { panic!( "factory boom" ) }).unwrap();
	app.load_document( "main", "app: { widget: test.widget.brittle }" ).expect( "Failed to resolve" );

	match RenderDriver::new( &mut app ) {
		Err( RenderError::Build { path, source }) => {
			assert_eq!( path, "app" );
			assert_eq!( source.kind(), ErrorKind::CallFailed );
			assert_eq!( source.path(), Some( "test.widget.brittle" ));
			assert!( source.message().contains( "factory boom" ), "{}", source );
		},
		Err( err ) => panic!( "Expected Err( Build ), found: Err( {:?} )", err ),
		Ok( _ ) => panic!( "Expected Err( Build ), found: Ok" ),
	}

}
