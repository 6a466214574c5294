use imery::{ DocumentId, ErrorKind, ResolveError };

#[test]
fn resolve_error_widget_node_without_widget() {

	let ( _, loaded ) = crate::demo_widgets::load( &[( "main", r#"
app: { widget: side }
widgets:
  side: { text: hi }
"# )], "main" );

	match loaded {
		Err( errors ) => {
			assert_eq!( errors.count(), 1, "{}", errors );
			assert_eq!( errors.first(), &ResolveError::MissingRequiredField {
				document: DocumentId::module( "main" ),
				path: "widgets.side".to_string(),
				field: "widget".to_string(),
			});
			assert_eq!( errors.first().kind(), ErrorKind::MissingRequiredField );
		},
		Ok( warnings ) => panic!( "Expected Err( MissingRequiredField ), found: Ok( {:?} )", warnings ),
	}

}

#[test]
fn resolve_error_import_entry_without_module() {

	let ( _, loaded ) = crate::demo_widgets::load( &[( "main", r#"
import: [ { as: btn } ]
app: { widget: demo.widget.label, text: hi }
"# )], "main" );

	match loaded {
		Err( errors ) => {
			assert_eq!( errors.count(), 1, "{}", errors );
			match errors.first() {
				ResolveError::MissingRequiredField { path, field, .. } => {
					assert_eq!(( path.as_str(), field.as_str() ), ( "import.0", "module" ));
				},
				other => panic!( "Expected MissingRequiredField, found: {:#?}", other ),
			}
			assert_eq!( errors.first().path(), Some( "import.0" ));
		},
		Ok( warnings ) => panic!( "Expected Err( MissingRequiredField ), found: Ok( {:?} )", warnings ),
	}

}
