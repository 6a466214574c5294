//! The registration API handed to plugin code.
//!
//! Plugins never touch a [`Registry`] or [`PendingQueue`] directly. They receive
//! a [`Registrar`], which forwards to whichever target is appropriate for the
//! phase they run in:
//!
//! - before an application context exists, registrations are queued
//! 	([`Registrar::pending`], [`Registrar::global`]);
//! - afterwards they go straight into the context's registry ([`Registrar::direct`]).
//!
//! Every registration is stamped with the [`Provenance`] of the registrar, so the
//! registry can name the plugin module behind each entry.

use serde_yaml::Value ;

use crate::key::RegistrationKey ;
use crate::pending::{ PendingQueue, PendingRegistration };
use crate::registration::{ Args, CallError, Provenance, Registration, Widget, WidgetBinding };
use crate::registry::{ DuplicatePolicy, Registry, RegistryError };



enum Target<'a> {
	Pending( &'a PendingQueue ),
	Direct( &'a mut Registry, DuplicatePolicy ),
	Staging( &'a mut Vec<PendingRegistration> ),
}

/// Forwards plugin registrations to a queue or a registry.
pub struct Registrar<'a> {
	target: Target<'a>,
	provenance: Provenance,
}

impl<'a> Registrar<'a> {

	/// Queues registrations on `queue`.
	pub fn pending( queue: &'a PendingQueue ) -> Self {
		Self { target: Target::Pending( queue ), provenance: Provenance::default() }
	}

	/// Registers directly into `registry`, resolving duplicates with `policy`.
	pub fn direct( registry: &'a mut Registry, policy: DuplicatePolicy ) -> Self {
		Self { target: Target::Direct( registry, policy ), provenance: Provenance::default() }
	}

	/// Collects registrations into a local buffer; used by discovery so a module's
	/// registrations are only published once its import completed.
	pub(crate) fn staging( buffer: &'a mut Vec<PendingRegistration> ) -> Self {
		Self { target: Target::Staging( buffer ), provenance: Provenance::default() }
	}

	/// Stamps subsequent registrations with `provenance`.
	pub fn with_provenance( mut self, provenance: Provenance ) -> Self {
		self.provenance = provenance ;
		self
	}

	/// Re-borrows this registrar for one plugin module.
	pub fn for_module( &mut self, module: &str ) -> Registrar<'_> {
		let target = match &mut self.target {
			Target::Pending( queue ) => Target::Pending( *queue ),
			Target::Direct( registry, policy ) => Target::Direct( &mut **registry, *policy ),
			Target::Staging( buffer ) => Target::Staging( &mut **buffer ),
		};
		Registrar { target, provenance: Provenance::new( module )}
	}

	#[inline] pub fn provenance( &self ) -> &Provenance { &self.provenance }

	/// Registers `registration` under `key`.
	///
	/// # Errors
	/// Queued registrations cannot fail here; their conflicts surface when the
	/// queue is applied. Direct registrations fail as [`Registry::register`] does.
	pub fn register( &mut self, key: RegistrationKey, registration: Registration ) -> Result<(), RegistryError> {
		let registration = registration.with_provenance( self.provenance.clone() );
		match &mut self.target {
			Target::Pending( queue ) => {
				queue.enqueue( key, registration );
				Ok(())
			},
			Target::Direct( registry, policy ) => registry.register( key, registration, *policy ),
			Target::Staging( buffer ) => {
				buffer.push( PendingRegistration { key, registration });
				Ok(())
			},
		}
	}

	/// Registers a widget factory under `namespace.widget.name`.
	///
	/// # Errors
	/// Fails on a malformed key, or as [`Registrar::register`] does.
	pub fn widget<F, W>( &mut self, namespace: &str, name: &str, factory: F ) -> Result<(), RegistryError>
	where
		F: Fn( WidgetBinding<'_> ) -> Result<W, CallError> + Send + Sync + 'static,
		W: Widget + 'static,
	{
		self.register( RegistrationKey::widget( namespace, name )?, Registration::widget( factory ))
	}

	/// Registers a data provider under `namespace.data.name`.
	///
	/// # Errors
	/// Fails on a malformed key, or as [`Registrar::register`] does.
	pub fn data<F, V>( &mut self, namespace: &str, name: &str, provider: F ) -> Result<(), RegistryError>
	where
		F: Fn( &Args ) -> Result<V, CallError> + Send + Sync + 'static,
		V: Into<Value>,
	{
		self.register( RegistrationKey::data( namespace, name )?, Registration::data( provider ))
	}

	/// Registers a command under `namespace.command.name`.
	///
	/// # Errors
	/// Fails on a malformed key, or as [`Registrar::register`] does.
	pub fn command<F, V>( &mut self, namespace: &str, name: &str, command: F ) -> Result<(), RegistryError>
	where
		F: Fn( &Args ) -> Result<V, CallError> + Send + Sync + 'static,
		V: Into<Value>,
	{
		self.register( RegistrationKey::command( namespace, name )?, Registration::command( command ))
	}
}

impl Registrar<'static> {
	/// Queues registrations on the process-wide [`PendingQueue::global`].
	pub fn global() -> Self { Self::pending( PendingQueue::global() )}
}
