use imery::{ DocumentId, ErrorKind, Failure, ResolveError };

#[test]
fn resolve_error_module_not_found() {

	let ( mut app, loaded ) = crate::demo_widgets::load(
		&[( "main", "import: [ nowhere, also.nowhere ]\napp: { widget: demo.widget.label }" )],
		"main",
	);
	match loaded {
		Err( errors ) => {
			let references = errors.iter().map(| error | match error {
				ResolveError::ModuleNotFound { reference, importer } => {
					assert_eq!( importer.as_ref(), Some( &DocumentId::module( "main" )));
					reference.as_str()
				},
				error => panic!( "Expected ModuleNotFound, found: {:#?}", error ),
			}).collect::<Vec<_>>();
			assert_eq!( references, [ "nowhere", "also.nowhere" ]);
			assert_eq!( Failure::from( errors.clone() ).kind(), ErrorKind::NotFound );
		},
		Ok( warnings ) => panic!( "Expected Err( ModuleNotFound ), found: Ok( {:?} )", warnings ),
	}

	match app.load( &DocumentId::module( "unknown" )) {
		Err( errors ) => assert!( matches!( errors.first(), ResolveError::ModuleNotFound { importer: None, .. })),
		Ok( warnings ) => panic!( "Expected Err( ModuleNotFound ), found: Ok( {:?} )", warnings ),
	}

}
