use imery::{ Kind, PendingQueue, Registrar, RegistrationKey };

#[test]
fn registry_list_by_namespace() {

	let queue = PendingQueue::new();
	let mut registrar = Registrar::pending( &queue );
	registrar.for_module( "buttons" ).widget( "demo", "button", |_| Ok( "button".to_string() )).unwrap();
	registrar.for_module( "sliders" ).widget( "demo", "slider", |_| Ok( "slider".to_string() )).unwrap();
	registrar.for_module( "other" ).widget( "other", "button", |_| Ok( "other".to_string() )).unwrap();

	let mut app = imery::Imery::new();
	let ( applied, rejected ) = app.apply_pending_registrations( &queue );
	assert_eq!( applied, 3 );
	assert!( rejected.is_empty(), "Unexpected rejections: {:?}", rejected );

	let listed = app.registry().list( Some( "demo" ), None ).map( ToString::to_string ).collect::<Vec<_>>();
	assert_eq!( listed, [ "demo.widget.button", "demo.widget.slider" ]);

	let listed = app.registry().list( Some( "demo" ), Some( Kind::Data )).count();
	assert_eq!( listed, 0 );

	let button = RegistrationKey::widget( "demo", "button" ).unwrap();
	assert_eq!( app.registry().lookup( &button ).unwrap().provenance().module(), "buttons" );

}
