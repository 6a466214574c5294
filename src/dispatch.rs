//! The one place registered callables are invoked.
//!
//! Commands run by name, data providers refreshed for a frame and widgets built
//! when rendering starts all go through [`dispatch`]. It applies the declared
//! parameter schema, captures errors and panics as a [`Failure`] pointing at the
//! registration key, and times the call.

use std::panic::{ catch_unwind, AssertUnwindSafe };
use std::time::Instant ;

use crate::discovery::panic_message ;
use crate::key::RegistrationKey ;
use crate::outcome::{ ErrorKind, Failure };
use crate::registration::{ Args, CallError };
use crate::schema::{ ParamSchema, SchemaViolation };



/// Invokes `call` with `args` on behalf of the registration `key`.
///
/// `schema` fills defaults into the named arguments before the call and rejects
/// missing or mistyped ones. Callers holding arguments that were already checked
/// at resolution time pass `None`.
pub(crate) fn dispatch<T>(
	key: &RegistrationKey,
	schema: Option<&ParamSchema>,
	args: Args,
	call: impl FnOnce( &Args ) -> Result<T, CallError>,
) -> Result<T, Failure> {

	let span = tracing::debug_span!( "dispatch", key = %key );
	let _entered = span.enter();
	let started = Instant::now();

	let result = apply_schema( schema, args ).and_then(| args | {
		match catch_unwind( AssertUnwindSafe(|| call( &args ))) {
			Ok( result ) => result.map_err( Failure::from ),
			Err( payload ) => Err( Failure::new( ErrorKind::CallFailed, format!( "panicked: {}", panic_message( payload.as_ref() )))),
		}
	});

	match &result {
		Ok( _ ) => tracing::debug!( elapsed = ?started.elapsed(), "dispatched" ),
		Err( failure ) => tracing::debug!( elapsed = ?started.elapsed(), failure = %failure, "dispatch failed" ),
	}
	result.map_err(| failure | failure.at( key.to_string() ))

}

fn apply_schema( schema: Option<&ParamSchema>, args: Args ) -> Result<Args, Failure> {
	let Some( schema ) = schema else { return Ok( args ) };
	let mut named = args.named().clone();
	schema.apply( &mut named, "args" ).map_err(| violations | {
		let kind = match violations.first() {
			Some( SchemaViolation::InvalidFieldType { .. }) => ErrorKind::InvalidFieldType,
			_ => ErrorKind::MissingRequiredField,
		};
		Failure::new( kind, violations.iter().map( ToString::to_string ).collect::<Vec<_>>().join( "; " ))
	})?;
	Ok( args.positional().iter().cloned().fold( Args::from_named( named ), Args::arg ))
}

#[cfg( test )]
mod tests {
	use super::* ;
	use crate::schema::{ Param, ParamType };

	fn key() -> RegistrationKey { "test.command.run".parse().unwrap() }

	#[test]
	fn panics_become_failures_at_the_key() {
		let failure = dispatch( &key(), None, Args::new(), | _ | -> Result<(), CallError> { panic!( "boom" ) }).unwrap_err();
		assert_eq!( failure.kind(), ErrorKind::CallFailed );
		assert_eq!( failure.message(), "panicked: boom" );
		assert_eq!( failure.path(), Some( "test.command.run" ));
	}

	#[test]
	fn schema_defaults_reach_the_callable() {
		let schema = ParamSchema::new([ Param::optional( "name", ParamType::String, "world" )]);
		let name = dispatch( &key(), Some( &schema ), Args::new(), | args | Ok( args.get( "name" ).cloned() )).unwrap();
		assert_eq!( name, Some( serde_yaml::Value::from( "world" )));
	}
}
