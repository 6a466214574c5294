use imery::{ RecordingBackend, RenderDriver };
use serde_yaml::Value ;

const MAIN: &str = r#"
app:
  widget: demo.widget.panel
  children:
    - { widget: demo.widget.button, label: Click, data: clicks }
    - { widget: demo.widget.label, data: clicks }
data:
  clicks: 0
"#;

#[test]
fn render_widget_updates_data() {

	let ( mut app, loaded ) = crate::demo_widgets::load( &[( "main", MAIN )], "main" );
	loaded.expect( "Failed to resolve" );
	let mut driver = RenderDriver::new( &mut app ).unwrap();

	let mut idle = RecordingBackend::new();
	driver.frame( &mut idle ).unwrap();
	assert_eq!( idle.calls(), [ "begin:panel", "button:Click", "text:0", "end" ]);

	// The label drawn after the button sees the value written during the same frame.
	let mut clicking = RecordingBackend::new().press( "Click" );
	driver.frame( &mut clicking ).unwrap();
	driver.frame( &mut clicking ).unwrap();
	assert_eq!( clicking.calls(), [
		"begin:panel", "button:Click", "text:1", "end",
		"begin:panel", "button:Click", "text:2", "end",
	]);

	assert_eq!( driver.app().tree().unwrap().data_slot( "clicks" ).unwrap().value(), &Value::from( 2 ));

}
