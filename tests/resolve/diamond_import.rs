const SHARED: &str = r#"
widgets:
  header: { widget: demo.widget.label, text: Header }
data:
  theme: dark
"#;

const LEFT: &str = r#"
import: shared
widgets:
  left: { widget: demo.widget.panel, children: [ header ]}
"#;

const RIGHT: &str = r#"
import: shared
widgets:
  right: { widget: demo.widget.label, data: theme }
"#;

const MAIN: &str = r#"
import: [ left, right ]
app:
  widget: demo.widget.panel
  children: [ left, right, header ]
"#;

#[test]
fn resolve_diamond_import() {

	let ( app, loaded ) = crate::demo_widgets::load(
		&[( "shared", SHARED ), ( "left", LEFT ), ( "right", RIGHT ), ( "main", MAIN )],
		"main",
	);
	assert_no_warnings!( loaded.expect( "A definition reached twice must not collide with itself" ));

	let tree = app.tree().unwrap();
	assert_eq!( tree.bindings().keys().collect::<Vec<_>>(), [ "left", "header", "right" ]);
	assert_eq!( tree.data().len(), 1 );
	assert_eq!( tree.binding( "right" ).unwrap().data(), Some( "theme" ));
	assert_eq!( tree.node_count(), 4 + 1 + 2 + 1 + 1 );

}
