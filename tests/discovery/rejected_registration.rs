use imery::{ Catalog, Imery, ModuleFn, PluginLoadError, Registrar, RegistryError };

#[test]
fn discovery_rejected_registration() {

	let catalog = Catalog::new( "plugins" )
		.with_module( ModuleFn::new( "first", | registrar: &mut Registrar<'_> | {
			registrar.command( "shared", "run", | _ | Ok( "first" ))?;
			Ok(())
		}))
		.with_module( ModuleFn::new( "second", | registrar: &mut Registrar<'_> | {
			registrar.command( "shared", "run", | _ | Ok( "second" ))?;
			Ok(())
		}));

	let mut app = Imery::new();
	let ( registered, errors ) = app.discover( &[ &catalog ]).expect( "Discovery failed" );
	assert_eq!( registered, 1 );
	match errors.as_slice() {
		[ PluginLoadError::Rejected { module, source: RegistryError::DuplicateRegistration { existing, .. }}] => {
			assert_eq!( module, "second" );
			assert_eq!( existing, "first" );
		},
		value => panic!( "Expected [ Rejected ], found: {:#?}", value ),
	}
	assert_eq!( app.execute_from_registry( "shared.command.run", imery::Args::new() ).unwrap(), "first" );

}
