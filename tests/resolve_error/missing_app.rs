use imery::{ DocumentId, ResolveError };

#[test]
fn resolve_error_missing_app() {

	let ( _, loaded ) = crate::demo_widgets::load( &[( "main", "widgets: { a: demo.widget.label }" )], "main" );
	match loaded {
		Err( errors ) => assert_eq!( errors.first(), &ResolveError::MissingApp { document: DocumentId::module( "main" )}),
		Ok( warnings ) => panic!( "Expected Err( MissingApp ), found: Ok( {:?} )", warnings ),
	}

}
