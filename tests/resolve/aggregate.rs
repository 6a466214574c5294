use imery::{ Document, DocumentId, RecordingBackend, RenderDriver, Resolver };
use serde_yaml::{ Mapping, Value };

const BUTTONS: &str = r#"
widgets:
  ok: { widget: demo.widget.button, label: OK, data: clicks }
data:
  clicks: 0
  clock: { provider: demo.data.counter }
"#;

const MAIN: &str = r#"
import: { module: buttons, as: btn }
app:
  title: Flat
  widget: demo.widget.panel
  children: [ btn.ok, { widget: demo.widget.label, data: clicks } ]
"#;

const FLAT: &str = r#"
app:
  title: Flat
  widget: demo.widget.panel
  children:
    - { widget: btn.ok }
    - { widget: demo.widget.label, data: btn.clicks }
widgets:
  btn.ok: { widget: demo.widget.button, data: btn.clicks, label: OK }
data:
  btn.clicks: 0
  btn.clock: { provider: demo.data.counter }
"#;

#[test]
fn resolve_aggregate() {

	let app = crate::demo_widgets::app();
	let source = imery::DocumentSource::new()
		.with_module( "buttons", BUTTONS )
		.with_module( "main", MAIN );

	let flat = Resolver::new( app.registry(), &source )
		.aggregate( &DocumentId::module( "main" ))
		.expect( "Failed to aggregate" );

	let expected = serde_yaml::from_str::<Mapping>( FLAT ).unwrap();
	assert_eq!( Value::Mapping( flat ), Value::Mapping( expected ));

}

#[test]
fn resolve_aggregate_loads_on_its_own() {

	let mut app = crate::demo_widgets::app();
	app.add_module( "buttons", BUTTONS );
	app.add_module( "main", MAIN );
	let flat = Resolver::new( app.registry(), app.source() )
		.aggregate( &DocumentId::module( "main" ))
		.expect( "Failed to aggregate" );
	let text = serde_yaml::to_string( &flat ).unwrap();

	// Qualified names written by the aggregation parse back as definitions.
	let document = Document::parse( DocumentId::module( "flat" ), &text ).expect( "Aggregated document must parse" );
	assert!( document.widgets().contains_key( "btn.ok" ));
	assert!( document.data().contains_key( "btn.clicks" ));

	app.load( &DocumentId::module( "main" )).expect( "Failed to resolve" );
	let nodes = app.tree().unwrap().node_count();
	let mut composed = RecordingBackend::new();
	RenderDriver::new( &mut app ).unwrap().frame( &mut composed ).unwrap();

	let mut flat_app = crate::demo_widgets::app();
	assert_no_warnings!( flat_app.load_document( "flat", &text ).expect( "Aggregated document must resolve" ));
	assert_eq!( flat_app.tree().unwrap().node_count(), nodes );
	let mut flattened = RecordingBackend::new();
	RenderDriver::new( &mut flat_app ).unwrap().frame( &mut flattened ).unwrap();

	assert_eq!( flattened.calls(), composed.calls() );

}
