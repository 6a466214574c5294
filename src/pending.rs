//! Registrations captured before an application context exists.
//!
//! Plugin modules may be imported before any [`Imery`]( crate::Imery ) instance
//! is constructed. Their registrations are parked in a [`PendingQueue`] and
//! applied later by [`apply_pending_registrations`]( crate::apply_pending_registrations ).
//!
//! Lifecycle of a queue:
//! 1. registrations are appended (possibly from a discovery worker thread),
//! 2. the queue is drained, all at once and under its lock, into one registry,
//! 3. the queue is empty again; draining an empty queue yields nothing.
//!
//! A process-wide queue is available through [`PendingQueue::global`]. Anything
//! that needs isolation (tests in particular) creates its own queue instead.

use std::sync::{ Mutex, MutexGuard, PoisonError };

use crate::key::RegistrationKey ;
use crate::registration::Registration ;



/// A registration waiting for an application context.
#[derive( Debug )]
pub struct PendingRegistration {
	pub key: RegistrationKey,
	pub registration: Registration,
}

/// Queue of [`PendingRegistration`]s, safe to append to from any thread.
#[derive( Debug, Default )]
pub struct PendingQueue {
	entries: Mutex<Vec<PendingRegistration>>,
}

static GLOBAL: PendingQueue = PendingQueue::new();

impl PendingQueue {

	pub const fn new() -> Self { Self { entries: Mutex::new( Vec::new() )}}

	/// The process-wide queue used by plugins that register at import time.
	pub fn global() -> &'static PendingQueue { &GLOBAL }

	/// Appends a registration.
	pub fn enqueue( &self, key: RegistrationKey, registration: Registration ) {
		tracing::trace!( key = %key, "queued pending registration" );
		self.lock().push( PendingRegistration { key, registration });
	}

	/// Appends registrations staged elsewhere, keeping their order.
	pub fn extend( &self, pending: impl IntoIterator<Item = PendingRegistration> ) {
		self.lock().extend( pending );
	}

	/// Takes every queued registration, in insertion order, leaving the queue empty.
	pub fn drain( &self ) -> Vec<PendingRegistration> {
		std::mem::take( &mut *self.lock() )
	}

	pub fn len( &self ) -> usize { self.lock().len() }
	pub fn is_empty( &self ) -> bool { self.lock().is_empty() }

	// Poison is ignored: a push or a take never leaves the vector half-updated.
	fn lock( &self ) -> MutexGuard<'_, Vec<PendingRegistration>> {
		self.entries.lock().unwrap_or_else( PoisonError::into_inner )
	}
}
