//! Plugin discovery.
//!
//! A plugin is a [`PluginModule`]: a named unit of code that registers widgets,
//! data providers and commands when it is imported. Modules are grouped into
//! [`PluginLocation`]s. [`discover`] walks the locations in the order given and
//! the modules of each location in lexical order, importing each one.
//!
//! Importing a module runs its registration code against a private staging
//! buffer. Only once the import completes are the staged registrations forwarded
//! to the caller's [`Registrar`], so a module that fails, panics or times out
//! contributes nothing. One broken module never prevents the rest from loading:
//! failures are collected and returned alongside the number of registrations
//! that went through, unless [`DiscoveryOptions::fail_fast`] is set.
//!
//! Modules linked into the binary announce themselves through [`inventory`] with
//! the [`plugin!`]( crate::plugin ) macro and are found by the [`Linked`] location.

use std::collections::BTreeMap ;
use std::panic::{ catch_unwind, AssertUnwindSafe };
use std::sync::{ mpsc, Arc };
use std::time::Duration ;
use itertools::Itertools ;
use thiserror::Error ;

use crate::app::Imery ;
use crate::outcome::{ ErrorKind, Failure };
use crate::pending::{ PendingQueue, PendingRegistration };
use crate::registrar::Registrar ;
use crate::registration::{ CallError, Provenance };
use crate::registry::RegistryError ;
use crate::utils::{ Merge, PartialResult, PartialSuccess };



/// A unit of plugin code that registers capabilities when imported.
pub trait PluginModule: Send + Sync {
	/// Module identity, used for ordering, provenance and error reports.
	fn id( &self ) -> &str ;

	/// Performs the module's registrations.
	///
	/// # Errors
	/// A failing module is reported as [`PluginLoadError::Failed`]; whatever it
	/// registered before failing is discarded.
	fn register( &self, registrar: &mut Registrar<'_> ) -> Result<(), CallError> ;
}

/// A [`PluginModule`] built from an id and a closure.
pub struct ModuleFn<F> {
	id: String,
	register: F,
}

impl<F> ModuleFn<F>
where
	F: Fn( &mut Registrar<'_> ) -> Result<(), CallError> + Send + Sync,
{
	pub fn new( id: impl Into<String>, register: F ) -> Self { Self { id: id.into(), register }}
}

impl<F> PluginModule for ModuleFn<F>
where
	F: Fn( &mut Registrar<'_> ) -> Result<(), CallError> + Send + Sync,
{
	fn id( &self ) -> &str { &self.id }
	fn register( &self, registrar: &mut Registrar<'_> ) -> Result<(), CallError> { ( self.register )( registrar )}
}

/// A plugin module linked into the binary, collected through [`inventory`].
///
/// Submit one with the [`plugin!`]( crate::plugin ) macro.
#[derive( Debug, Clone, Copy )]
pub struct LinkedPlugin {
	id: &'static str,
	register: fn( &mut Registrar<'_> ) -> Result<(), CallError>,
}

impl LinkedPlugin {
	pub const fn new( id: &'static str, register: fn( &mut Registrar<'_> ) -> Result<(), CallError> ) -> Self {
		Self { id, register }
	}
}

inventory::collect!( LinkedPlugin );

impl PluginModule for LinkedPlugin {
	fn id( &self ) -> &str { self.id }
	fn register( &self, registrar: &mut Registrar<'_> ) -> Result<(), CallError> { ( self.register )( registrar )}
}

/// Declares a plugin module linked into the binary.
///
/// ```ignore
/// fn register( registrar: &mut imery::Registrar<'_> ) -> Result<(), imery::CallError> {
/// 	registrar.widget( "demo", "hello", |_| Ok( "hello".to_string() ))?;
/// 	Ok(())
/// }
/// imery::plugin!( "demo.hello", register );
/// ```
#[macro_export]
macro_rules! plugin {
	( $id:expr, $register:path $(,)? ) => {
		$crate::inventory::submit! { $crate::LinkedPlugin::new( $id, $register ) }
	};
}

/// Errors captured while importing plugin modules.
#[derive( Debug, Error )]
pub enum PluginLoadError {
	/// The location itself could not be enumerated.
	#[error( "Plugin location '{location}' could not be scanned: {reason}" )]
	Location { location: String, reason: String },
	/// The module's registration code returned an error.
	#[error( "Plugin module '{module}' failed: {source}" )]
	Failed { module: String, source: CallError },
	/// The module's registration code panicked.
	#[error( "Plugin module '{module}' panicked: {message}" )]
	Panicked { module: String, message: String },
	/// The module did not finish importing in time.
	#[error( "Plugin module '{module}' timed out after {timeout:?}" )]
	TimedOut { module: String, timeout: Duration },
	/// A registration made by the module was rejected by the registry.
	#[error( "Plugin module '{module}' registration rejected: {source}" )]
	Rejected { module: String, source: RegistryError },
}

impl PluginLoadError {
	/// Identity of the module (or location) the error belongs to.
	pub fn module( &self ) -> &str {
		match self {
			Self::Location { location, .. } => location,
			Self::Failed { module, .. }
			| Self::Panicked { module, .. }
			| Self::TimedOut { module, .. }
			| Self::Rejected { module, .. } => module,
		}
	}
}

impl From<PluginLoadError> for Failure {
	fn from( err: PluginLoadError ) -> Self {
		Failure::new( ErrorKind::PluginLoadError, err.to_string() ).at( err.module() )
	}
}

/// A source of plugin modules.
pub trait PluginLocation {
	/// Name used in error reports.
	fn name( &self ) -> &str ;

	/// The modules found at this location, in any order.
	///
	/// # Errors
	/// Fails if the location cannot be enumerated.
	fn modules( &self ) -> Result<Vec<Arc<dyn PluginModule>>, PluginLoadError> ;
}

/// An in-memory set of plugin modules, keyed by module id.
#[derive( Default )]
pub struct Catalog {
	name: String,
	modules: BTreeMap<String, Arc<dyn PluginModule>>,
}

impl Catalog {

	pub fn new( name: impl Into<String> ) -> Self {
		Self { name: name.into(), modules: BTreeMap::new() }
	}

	/// Adds a module, replacing any module with the same id.
	pub fn with_module( mut self, module: impl PluginModule + 'static ) -> Self {
		self.add( module );
		self
	}

	/// Adds a module, replacing any module with the same id.
	pub fn add( &mut self, module: impl PluginModule + 'static ) {
		self.modules.insert( module.id().to_string(), Arc::new( module ));
	}
}

impl PluginLocation for Catalog {
	fn name( &self ) -> &str { &self.name }
	fn modules( &self ) -> Result<Vec<Arc<dyn PluginModule>>, PluginLoadError> {
		Ok( self.modules.values().cloned().collect() )
	}
}

/// The modules submitted with [`plugin!`]( crate::plugin ) anywhere in the binary.
#[derive( Debug, Default, Clone, Copy )]
pub struct Linked ;

impl PluginLocation for Linked {
	fn name( &self ) -> &str { "linked" }
	fn modules( &self ) -> Result<Vec<Arc<dyn PluginModule>>, PluginLoadError> {
		Ok( inventory::iter::<LinkedPlugin>.into_iter()
			.map(| plugin | Arc::new( *plugin ) as Arc<dyn PluginModule> )
			.collect() )
	}
}

/// How [`discover`] treats failures and slow modules.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub struct DiscoveryOptions {
	/// Stop at the first failing module instead of collecting failures.
	pub fail_fast: bool,
	/// Best-effort limit on a single module's import. `None` imports inline.
	pub module_timeout: Option<Duration>,
}

impl Default for DiscoveryOptions {
	fn default() -> Self {
		Self { fail_fast: false, module_timeout: Some( Duration::from_secs( 5 ))}
	}
}

/// Imports every module found at `locations`, forwarding registrations to `registrar`.
///
/// Locations are visited in the given order, modules within a location in
/// lexical order of their ids.
///
/// # Partial Success
/// Returns the number of registrations forwarded together with one
/// [`PluginLoadError`] per failed location or module.
///
/// # Errors
/// Only with [`DiscoveryOptions::fail_fast`]: the first failure, with the
/// failures collected before it (none, since it stops at the first).
pub fn discover(
	locations: &[&dyn PluginLocation],
	registrar: &mut Registrar<'_>,
	options: DiscoveryOptions,
) -> PartialResult<usize, PluginLoadError> {

	let modules = locations.iter()
		.map(| location | location.modules().map(| modules | {
			modules.into_iter().sorted_by(| a, b | a.id().cmp( b.id() )).collect::<Vec<_>>()
		}));

	let mut registered = 0 ;
	let mut errors = Vec::new();

	for location_modules in modules {
		let location_modules = match location_modules {
			Ok( location_modules ) => location_modules,
			Err( err ) if options.fail_fast => return Err(( err, errors )),
			Err( err ) => {
				tracing::warn!( error = %err, "skipping plugin location" );
				errors = errors.merge( err );
				continue ;
			},
		};
		for module in location_modules {
			match import_module( module, options.module_timeout )
				.and_then(|( id, staged )| publish( &id, staged, registrar ))
			{
				Ok( count ) => registered += count,
				Err( err ) if options.fail_fast => return Err(( err, errors )),
				Err( err ) => {
					tracing::warn!( module = err.module(), error = %err, "plugin module failed to load" );
					errors = errors.merge( err );
				},
			}
		}
	}

	tracing::info!( registered, failed = errors.len(), "plugin discovery finished" );
	Ok(( registered, errors ))

}

type Staged = ( String, Vec<PendingRegistration> );

fn import_module( module: Arc<dyn PluginModule>, timeout: Option<Duration> ) -> Result<Staged, PluginLoadError> {
	let Some( timeout ) = timeout else { return run_import( module.as_ref() ) };

	let id = module.id().to_string();
	let ( sender, receiver ) = mpsc::channel();
	let spawned = std::thread::Builder::new()
		.name( format!( "imery-plugin-{}", id ))
		.spawn( move || {
			// The receiver is gone once the import timed out.
			let _ = sender.send( run_import( module.as_ref() ));
		});
	if let Err( err ) = spawned {
		return Err( PluginLoadError::Failed { module: id, source: CallError::Other( Box::new( err ))});
	}

	match receiver.recv_timeout( timeout ) {
		Ok( result ) => result,
		Err( mpsc::RecvTimeoutError::Timeout ) => Err( PluginLoadError::TimedOut { module: id, timeout }),
		Err( mpsc::RecvTimeoutError::Disconnected ) => Err( PluginLoadError::Panicked {
			module: id,
			message: "import thread exited without a result".to_string(),
		}),
	}
}

fn run_import( module: &dyn PluginModule ) -> Result<Staged, PluginLoadError> {
	let id = module.id().to_string();
	let mut staged = Vec::new();
	let result = catch_unwind( AssertUnwindSafe(|| {
		let mut registrar = Registrar::staging( &mut staged ).with_provenance( Provenance::new( id.as_str() ));
		module.register( &mut registrar )
	}));
	match result {
		Ok( Ok(())) => Ok(( id, staged )),
		Ok( Err( source )) => Err( PluginLoadError::Failed { module: id, source }),
		Err( payload ) => Err( PluginLoadError::Panicked { module: id, message: panic_message( payload.as_ref() )}),
	}
}

fn publish( module: &str, staged: Vec<PendingRegistration>, registrar: &mut Registrar<'_> ) -> Result<usize, PluginLoadError> {
	let mut registrar = registrar.for_module( module );
	staged.into_iter().try_fold( 0, | count, PendingRegistration { key, registration } | {
		registrar.register( key, registration )
			.map(|()| count + 1 )
			.map_err(| source | PluginLoadError::Rejected { module: module.to_string(), source })
	})
}

pub(crate) fn panic_message( payload: &( dyn std::any::Any + Send )) -> String {
	payload.downcast_ref::<&str>().map(| message | (*message).to_string() )
		.or_else(|| payload.downcast_ref::<String>().cloned() )
		.unwrap_or_else(|| "non-string panic payload".to_string() )
}

/// Drains `queue` into `app`'s registry, in insertion order, and returns how many
/// registrations were applied. A second call on the same queue applies none.
///
/// # Partial Success
/// Registrations the registry rejects are returned alongside the count.
pub fn apply_pending_registrations( app: &mut Imery, queue: &PendingQueue ) -> PartialSuccess<usize, RegistryError> {
	app.apply_pending_registrations( queue )
}
