use imery::DocumentId ;

const UI: &str = r#"
app:
  title: From ui
  widget: header
widgets:
  header: { widget: demo.widget.label, text: hi }
"#;

#[test]
fn resolve_imported_app() {

	// The entry document only imports; the single 'app' section comes from 'ui'.
	let ( app, loaded ) = crate::demo_widgets::load( &[( "ui", UI ), ( "main", "import: ui" )], "main" );
	assert_no_warnings!( loaded.expect( "An imported 'app' section must be used" ));

	let tree = app.tree().unwrap();
	assert_eq!( tree.title(), Some( "From ui" ));
	assert_eq!( tree.root().path().as_str(), "app" );
	assert_eq!( tree.root().target().binding(), Some( "header" ));
	assert!( tree.binding( "header" ).is_some() );

	let mut app = crate::demo_widgets::app();
	app.add_module( "ui", UI );
	let loaded = app.load( &DocumentId::module( "ui" ));
	assert_no_warnings!( loaded.expect( "The defining document loads on its own" ));

}
