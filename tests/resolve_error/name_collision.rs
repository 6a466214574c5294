use imery::{ DocumentId, ErrorKind, ResolveError };

#[test]
fn resolve_error_name_collision() {

	let ( _, loaded ) = crate::demo_widgets::load(
		&[
			( "left", "widgets: { header: { widget: demo.widget.label, text: left }}" ),
			( "right", "widgets: { header: { widget: demo.widget.label, text: right }}" ),
			( "main", "import: [ left, right ]\napp: { widget: header }" ),
		],
		"main",
	);

	match loaded {
		Err( errors ) => match errors.first() {
			ResolveError::NameCollision { name, first, second } => {
				assert_eq!( name, "header" );
				assert_eq!(( first, second ), ( &DocumentId::module( "left" ), &DocumentId::module( "right" )));
				assert_eq!( errors.first().kind(), ErrorKind::NameCollisionError );
			},
			error => panic!( "Expected NameCollision, found: {:#?}", error ),
		},
		Ok( warnings ) => panic!( "Expected Err( NameCollision ), found: Ok( {:?} )", warnings ),
	}

	// Qualifying one of the imports removes the collision.
	let ( app, loaded ) = crate::demo_widgets::load(
		&[
			( "left", "widgets: { header: { widget: demo.widget.label, text: left }}" ),
			( "right", "widgets: { header: { widget: demo.widget.label, text: right }}" ),
			( "main", "import: [ left, { module: right, as: r }]\napp: { widget: r.header }" ),
		],
		"main",
	);
	assert!( loaded.is_ok(), "{:?}", loaded );
	assert_eq!( app.tree().unwrap().root().target().binding(), Some( "r.header" ));

}
