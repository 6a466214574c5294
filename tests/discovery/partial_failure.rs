use imery::{ CallError, Catalog, Imery, ModuleFn, PluginLoadError, Registrar };

#[test]
fn discovery_partial_failure() {

	let catalog = Catalog::new( "plugins" )
		.with_module( ModuleFn::new( "a_good", | registrar: &mut Registrar<'_> | {
			crate::demo_widgets::register( registrar )?;
			Ok(())
		}))
		.with_module( ModuleFn::new( "b_failing", | registrar: &mut Registrar<'_> | {
			registrar.widget( "broken", "half", | _ | Ok( String::new() ))?;
			Err( CallError::message( "missing native library" ))
		}))
		.with_module( ModuleFn::new( "c_panicking", | _: &mut Registrar<'_> | panic!( "plugin bug" )))
		.with_module( ModuleFn::new( "d_good", | registrar: &mut Registrar<'_> | {
			registrar.command( "late", "ping", | _ | Ok( "pong" ))?;
			Ok(())
		}));

	let mut app = Imery::new();
	let ( registered, errors ) = app.discover( &[ &catalog ]).expect( "Discovery failed" );

	assert_eq!( registered, app.registry().len() );
	match errors.as_slice() {
		[ PluginLoadError::Failed { module: failed, .. }, PluginLoadError::Panicked { module: panicked, message }] => {
			assert_eq!( failed, "b_failing" );
			assert_eq!( panicked, "c_panicking" );
			assert!( message.contains( "plugin bug" ), "Unexpected panic message: {}", message );
		},
		value => panic!( "Expected [ Failed, Panicked ], found: {:#?}", value ),
	}

	// A failing module contributes nothing, not even what it registered before failing.
	assert!( app.registry().find( "broken.widget.half" ).is_err() );
	assert!( app.registry().find( "demo.widget.label" ).is_ok() );
	assert_eq!( app.execute_from_registry( "late.command.ping", imery::Args::new() ).unwrap(), "pong" );

}
