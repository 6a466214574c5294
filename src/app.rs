//! The application context.
//!
//! An [`Imery`] owns one [`Registry`], the [`DocumentSource`] documents are read
//! from and, once a document was loaded, the [`ResolvedTree`] (or the errors that
//! prevented it). Construction order is part of the contract:
//!
//! 1. construct the context,
//! 2. flush pending registrations with [`Imery::apply_pending_registrations`]
//! 	and/or run [`Imery::discover`],
//! 3. load a document.
//!
//! Loading before the registrations a document needs are in place fails with
//! [`ResolveError::UnresolvedWidget`]( crate::ResolveError::UnresolvedWidget );
//! nothing is skipped silently.

use std::path::Path ;
use itertools::Itertools ;
use serde_yaml::Value ;

use crate::config::Settings ;
use crate::discovery::{ discover, PluginLoadError, PluginLocation };
use crate::dispatch::dispatch ;
use crate::document::Warning ;
use crate::key::RegistrationKey ;
use crate::outcome::{ Failure, Outcome };
use crate::pending::{ PendingQueue, PendingRegistration };
use crate::registrar::Registrar ;
use crate::registration::{ Args, Callable, Registration, WidgetBinding };
use crate::registry::{ Registry, RegistryError };
use crate::resolver::{ ResolveErrors, Resolver };
use crate::source::{ DocumentId, DocumentSource };
use crate::tree::ResolvedTree ;
use crate::utils::{ PartialResult, PartialSuccess };



/// The application context.
#[derive( Debug, Default )]
pub struct Imery {
	settings: Settings,
	registry: Registry,
	source: DocumentSource,
	resolution: Option<Result<ResolvedTree, ResolveErrors>>,
}

impl Imery {

	pub fn new() -> Self { Self::default() }

	pub fn with_settings( settings: Settings ) -> Self {
		let source = settings.document_source();
		Self { settings, registry: Registry::new(), source, resolution: None }
	}

	#[inline] pub fn settings( &self ) -> &Settings { &self.settings }
	#[inline] pub fn registry( &self ) -> &Registry { &self.registry }
	#[inline] pub fn registry_mut( &mut self ) -> &mut Registry { &mut self.registry }
	#[inline] pub fn source( &self ) -> &DocumentSource { &self.source }
	#[inline] pub fn source_mut( &mut self ) -> &mut DocumentSource { &mut self.source }

	/// Registers `text` as an in-memory document module.
	pub fn add_module( &mut self, id: impl Into<String>, text: impl Into<String> ) {
		self.source.add_module( id, text );
	}

	/// A registrar writing straight into this context's registry, using the
	/// configured duplicate policy.
	pub fn registrar( &mut self ) -> Registrar<'_> {
		Registrar::direct( &mut self.registry, self.settings.duplicate_policy )
	}

	/// Drains `queue` into the registry, in insertion order.
	///
	/// Calling it again applies only what was queued since; on an empty queue it
	/// applies nothing.
	///
	/// # Partial Success
	/// Returns the number of registrations applied with the ones the registry
	/// rejected.
	pub fn apply_pending_registrations( &mut self, queue: &PendingQueue ) -> PartialSuccess<usize, RegistryError> {
		let policy = self.settings.duplicate_policy ;
		let ( applied, rejected ): ( Vec<()>, Vec<_> ) = queue.drain().into_iter()
			.map(| PendingRegistration { key, registration }| self.registry.register( key, registration, policy ))
			.partition_result();
		rejected.iter().for_each(| err | tracing::warn!( error = %err, "pending registration rejected" ));
		tracing::info!( applied = applied.len(), rejected = rejected.len(), "applied pending registrations" );
		( applied.len(), rejected )
	}

	/// Imports the plugin modules at `locations` straight into the registry.
	///
	/// # Partial Success
	/// See [`discover`].
	///
	/// # Errors
	/// See [`discover`].
	pub fn discover( &mut self, locations: &[&dyn PluginLocation] ) -> PartialResult<usize, PluginLoadError> {
		let options = self.settings.discovery_options();
		discover( locations, &mut self.registrar(), options )
	}

	/// Resolves `entry` against the current registry and keeps the result.
	///
	/// A failed resolution replaces any previous tree, so the render driver never
	/// runs a tree that no longer matches what was asked for.
	///
	/// # Partial Success
	/// Returns the warnings produced while resolving.
	///
	/// # Errors
	/// Returns every resolution error.
	pub fn load( &mut self, entry: &DocumentId ) -> Result<Vec<Warning>, ResolveErrors> {
		let resolved = Resolver::new( &self.registry, &self.source ).resolve( entry );
		match resolved {
			Ok(( tree, warnings )) => {
				self.resolution = Some( Ok( tree ));
				Ok( warnings )
			},
			Err( errors ) => {
				tracing::warn!( document = %entry, errors = errors.count(), "document failed to resolve" );
				self.resolution = Some( Err( errors.clone() ));
				Err( errors )
			},
		}
	}

	/// Registers `text` as the module `id` and loads it.
	///
	/// # Errors
	/// See [`Imery::load`].
	pub fn load_document( &mut self, id: &str, text: &str ) -> Result<Vec<Warning>, ResolveErrors> {
		self.add_module( id, text );
		self.load( &DocumentId::module( id ))
	}

	/// Loads the main document `name` found under `base_path` (or any configured
	/// search path). This is what a command line front end calls.
	///
	/// # Errors
	/// Fails on an invalid search path, a missing document, or as [`Imery::load`].
	pub fn load_main( &mut self, name: &str, base_path: impl AsRef<Path> ) -> Result<Vec<Warning>, ResolveErrors> {
		self.source.add_search_path( base_path.as_ref() );
		self.load_located( name )
	}

	/// Loads [`Settings::main`] from the configured search paths.
	///
	/// # Errors
	/// See [`Imery::load_main`].
	pub fn load_configured_main( &mut self ) -> Result<Vec<Warning>, ResolveErrors> {
		let main = self.settings.main.clone();
		self.load_located( &main )
	}

	/// Validates the search paths, then locates and loads `name`.
	fn load_located( &mut self, name: &str ) -> Result<Vec<Warning>, ResolveErrors> {
		let entry = ResolveErrors::check( self.source.validate().err().unwrap_or_default() )
			.and_then(|()| self.source.locate( name, None ).map_err( ResolveErrors::from ));
		match entry {
			Ok( entry ) => self.load( &entry ),
			Err( errors ) => {
				tracing::warn!( document = name, errors = errors.count(), "main document could not be located" );
				self.resolution = Some( Err( errors.clone() ));
				Err( errors )
			},
		}
	}

	/// The resolved tree of the last successful load.
	pub fn tree( &self ) -> Option<&ResolvedTree> {
		self.resolution.as_ref().and_then(| resolution | resolution.as_ref().ok() )
	}

	pub(crate) fn tree_mut( &mut self ) -> Option<&mut ResolvedTree> {
		self.resolution.as_mut().and_then(| resolution | resolution.as_mut().ok() )
	}

	/// The errors of the last load, if it failed.
	pub fn resolution_errors( &self ) -> Option<&ResolveErrors> {
		self.resolution.as_ref().and_then(| resolution | resolution.as_ref().err() )
	}

	/// Invokes a registration by full key or unique bare name.
	///
	/// - a command or data provider is called with `args`;
	/// - a widget factory is instantiated with `args`' named arguments as its
	/// 	parameters and no data binding, and the widget's value is returned.
	///
	/// A declared schema is applied to the named arguments first. Errors and panics
	/// raised by the callable are captured as failures.
	pub fn execute_from_registry( &self, key_or_name: &str, args: Args ) -> Outcome<Value> {
		match self.registry.find( key_or_name ) {
			Ok(( key, registration )) => invoke( key, registration, args ).into(),
			Err( err ) => {
				tracing::debug!( reference = key_or_name, error = %err, "nothing to execute" );
				Outcome::failure( err.into() )
			},
		}
	}
}

fn invoke( key: &RegistrationKey, registration: &Registration, args: Args ) -> Result<Value, Failure> {
	dispatch( key, registration.schema(), args, | args | match registration.callable() {
		Callable::Widget( factory ) => factory
			.build( WidgetBinding { params: args.named(), data: None })
			.map(| widget | widget.value() ),
		Callable::Data( provider ) => provider.provide( args ),
		Callable::Command( command ) => command.call( args ),
	})
}
