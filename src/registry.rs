//! The capability table.
//!
//! A [`Registry`] maps [`RegistrationKey`]s to [`Registration`]s. It is owned by
//! a single [`Imery`]( crate::Imery ) application context and mutated only
//! through [`Registry::register`]. Registering an existing key is governed by an
//! explicit [`DuplicatePolicy`]; there is no load-order tiebreak.

use indexmap::IndexMap ;
use serde::Deserialize ;
use thiserror::Error ;

use crate::key::{ Kind, KeyParseError, RegistrationKey };
use crate::outcome::{ ErrorKind, Failure };
use crate::registration::{ CallError, Registration };



/// What to do when a key is registered a second time.
#[derive( Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize )]
#[serde( rename_all = "snake_case" )]
pub enum DuplicatePolicy {
	/// Keep the first registration and fail the second.
	#[default] Reject,
	/// Replace the existing registration. The key keeps its position in [`Registry::list`].
	Override,
}

/// Errors returned by registry operations.
#[derive( Debug, Error )]
pub enum RegistryError {
	/// The key is already registered and the policy is [`DuplicatePolicy::Reject`].
	#[error( "Duplicate registration of '{key}', already registered by '{existing}'" )]
	DuplicateRegistration { key: RegistrationKey, existing: String },
	/// No registration matches.
	#[error( "Not found: '{0}'" )]
	NotFound( String ),
	/// The registration's callable does not match the kind named by the key.
	#[error( "'{key}' names a {} but a {found} was registered", key.kind() )]
	KindMismatch { key: RegistrationKey, found: Kind },
	/// A bare name matched registrations in more than one namespace or kind.
	#[error( "Ambiguous name '{name}', candidates: {}", itertools::join( candidates, ", " ))]
	AmbiguousName { name: String, candidates: Vec<RegistrationKey> },
	/// A dotted reference could not be parsed.
	#[error( "Malformed key: {0}" )]
	MalformedKey( #[from] KeyParseError ),
}

impl From<RegistryError> for Failure {
	fn from( err: RegistryError ) -> Self {
		let kind = match &err {
			RegistryError::DuplicateRegistration { .. } => ErrorKind::DuplicateRegistration,
			RegistryError::NotFound( _ ) | RegistryError::KindMismatch { .. } => ErrorKind::NotFound,
			RegistryError::AmbiguousName { .. } => ErrorKind::AmbiguousReferenceError,
			RegistryError::MalformedKey( _ ) => ErrorKind::MalformedKey,
		};
		Failure::new( kind, err.to_string() )
	}
}

/// Lets plugin registration code use `?` on [`Registrar`]( crate::Registrar ) calls.
impl From<RegistryError> for CallError {
	fn from( err: RegistryError ) -> Self { CallError::Other( Box::new( err ))}
}

/// Table of registered capabilities.
///
/// Iteration order is registration order.
#[derive( Debug, Default )]
pub struct Registry {
	entries: IndexMap<RegistrationKey, Registration>,
}

impl Registry {

	pub fn new() -> Self { Self::default() }

	/// Adds a registration under `key`.
	///
	/// # Errors
	/// - [`RegistryError::KindMismatch`] if the callable's kind differs from the key's.
	/// - [`RegistryError::DuplicateRegistration`] if the key exists and `policy` is
	/// 	[`DuplicatePolicy::Reject`]. The existing registration stays active.
	pub fn register(
		&mut self,
		key: RegistrationKey,
		registration: Registration,
		policy: DuplicatePolicy,
	) -> Result<(), RegistryError> {

		if registration.kind() != key.kind() {
			return Err( RegistryError::KindMismatch { key, found: registration.kind() });
		}

		let existing = self.entries.get( &key ).map(| existing | existing.provenance().module().to_string() );
		match ( existing, policy ) {
			( Some( existing ), DuplicatePolicy::Reject ) => Err( RegistryError::DuplicateRegistration { key, existing }),
			( Some( existing ), DuplicatePolicy::Override ) => {
				tracing::warn!(
					key = %key,
					replaced = %existing,
					by = registration.provenance().module(),
					"overriding registration",
				);
				self.entries.insert( key, registration );
				Ok(())
			},
			( None, _ ) => {
				tracing::debug!( key = %key, module = registration.provenance().module(), "registered" );
				self.entries.insert( key, registration );
				Ok(())
			},
		}

	}

	/// Returns the registration for `key`.
	///
	/// # Errors
	/// Returns [`RegistryError::NotFound`] if nothing is registered under `key`.
	pub fn lookup( &self, key: &RegistrationKey ) -> Result<&Registration, RegistryError> {
		self.entries.get( key ).ok_or_else(|| RegistryError::NotFound( key.to_string() ))
	}

	#[inline] pub fn contains( &self, key: &RegistrationKey ) -> bool { self.entries.contains_key( key )}
	#[inline] pub fn len( &self ) -> usize { self.entries.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.entries.is_empty() }

	/// Lists registered keys, optionally filtered by namespace and kind.
	///
	/// The iterator borrows the registry, so every call observes the current
	/// state and the registry cannot be mutated while it is alive.
	pub fn list<'a>( &'a self, namespace: Option<&'a str>, kind: Option<Kind> ) -> impl Iterator<Item = &'a RegistrationKey> + 'a {
		self.entries.keys()
			.filter( move | key | namespace.is_none_or(| namespace | key.namespace() == namespace ))
			.filter( move | key | kind.is_none_or(| kind | key.kind() == kind ))
	}

	/// Resolves either a full dotted key or a bare registration name.
	///
	/// A bare name must match exactly one registration across all namespaces
	/// and kinds.
	///
	/// # Errors
	/// - [`RegistryError::MalformedKey`] if the reference has dots but is not a valid key.
	/// - [`RegistryError::NotFound`] if nothing matches.
	/// - [`RegistryError::AmbiguousName`] if a bare name matches several registrations.
	pub fn find( &self, key_or_name: &str ) -> Result<( &RegistrationKey, &Registration ), RegistryError> {

		if key_or_name.contains( '.' ) {
			let key = key_or_name.parse::<RegistrationKey>()?;
			return self.entries.get_key_value( &key )
				.ok_or( RegistryError::NotFound( key_or_name.to_string() ));
		}

		let mut matches = self.entries.iter().filter(|( key, _ )| key.name() == key_or_name );
		match ( matches.next(), matches.next() ) {
			( None, _ ) => Err( RegistryError::NotFound( key_or_name.to_string() )),
			( Some( found ), None ) => Ok( found ),
			( Some(( first, _ )), Some(( second, _ ))) => Err( RegistryError::AmbiguousName {
				name: key_or_name.to_string(),
				candidates: [ first.clone(), second.clone() ].into_iter()
					.chain( matches.map(|( key, _ )| key.clone() ))
					.collect(),
			}),
		}

	}
}
