use std::time::{ Duration, Instant };
use imery::{ Catalog, Imery, ModuleFn, PluginLoadError, Registrar, Settings };

#[test]
fn discovery_timeout() {

	let catalog = Catalog::new( "plugins" )
		.with_module( ModuleFn::new( "slow", | registrar: &mut Registrar<'_> | {
			std::thread::sleep( Duration::from_millis( 500 ));
			registrar.command( "slow", "run", | _ | Ok( true ))?;
			Ok(())
		}))
		.with_module( ModuleFn::new( "quick", | registrar: &mut Registrar<'_> | {
			registrar.command( "quick", "run", | _ | Ok( true ))?;
			Ok(())
		}));

	let mut app = Imery::with_settings( Settings::new().with_module_timeout( Some( Duration::from_millis( 50 ))));
	let started = Instant::now();
	let ( registered, errors ) = app.discover( &[ &catalog ]).expect( "Discovery failed" );
	assert!( started.elapsed() < Duration::from_millis( 450 ), "Discovery waited for the slow module" );

	assert_eq!( registered, 1 );
	match errors.as_slice() {
		[ PluginLoadError::TimedOut { module, timeout }] => {
			assert_eq!( module, "slow" );
			assert_eq!( *timeout, Duration::from_millis( 50 ));
		},
		value => panic!( "Expected [ TimedOut ], found: {:#?}", value ),
	}
	assert!( app.registry().find( "quick.command.run" ).is_ok() );

	// Nothing from the abandoned import shows up later.
	std::thread::sleep( Duration::from_millis( 600 ));
	assert!( app.registry().find( "slow.command.run" ).is_err() );

}
