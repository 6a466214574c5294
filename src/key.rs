//! Registration keys.
//!
//! Every capability in the [`Registry`]( crate::Registry ) lives under a
//! [`RegistrationKey`]: a `(namespace, kind, name)` triple written in documents
//! as the dotted string `namespace.kind.name` (e.g. `demo.widget.button`).
//! Parsing happens once, up front, so a malformed reference is reported where it
//! is written rather than surfacing later as a failed lookup.

use std::str::FromStr ;
use thiserror::Error ;

use crate::outcome::{ ErrorKind, Failure };



/// The kind of capability a key refers to.
#[derive( Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub enum Kind {
	/// A widget factory, producing a renderable handle bound to a data node.
	Widget,
	/// A data provider, producing the value a widget renders.
	Data,
	/// A free-standing command.
	Command,
}

impl Kind {
	/// The segment used for this kind inside a dotted key.
	pub const fn as_str( self ) -> &'static str {
		match self {
			Self::Widget => "widget",
			Self::Data => "data",
			Self::Command => "command",
		}
	}
}

impl std::fmt::Display for Kind {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { f.write_str( self.as_str() )}
}

impl FromStr for Kind {
	type Err = KeyParseError ;
	fn from_str( segment: &str ) -> Result<Self, Self::Err> {
		match segment {
			"widget" => Ok( Self::Widget ),
			"data" => Ok( Self::Data ),
			"command" => Ok( Self::Command ),
			other => Err( KeyParseError::UnknownKind( other.to_string() )),
		}
	}
}

/// Errors produced when parsing a dotted key.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
pub enum KeyParseError {
	/// The key does not have exactly three segments.
	#[error( "Expected 'namespace.kind.name', found '{0}'" )] WrongShape( String ),
	/// One of the segments is empty.
	#[error( "Empty segment in key '{0}'" )] EmptySegment( String ),
	/// The middle segment is not a known kind.
	#[error( "Unknown kind '{0}', expected one of widget, data, command" )] UnknownKind( String ),
}

impl From<KeyParseError> for Failure {
	fn from( err: KeyParseError ) -> Self { Failure::new( ErrorKind::MalformedKey, err.to_string() )}
}

/// Identifies a single registration.
///
/// At most one registration per key is active within a registry.
#[derive( Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub struct RegistrationKey {
	namespace: String,
	kind: Kind,
	name: String,
}

impl RegistrationKey {

	/// Creates a key from its parts.
	///
	/// # Errors
	/// Fails if either string part is empty or contains a `.`, since such a key
	/// could never be written back as a dotted reference.
	pub fn new( namespace: impl Into<String>, kind: Kind, name: impl Into<String> ) -> Result<Self, KeyParseError> {
		let namespace = namespace.into();
		let name = name.into();
		if namespace.is_empty() || name.is_empty() {
			return Err( KeyParseError::EmptySegment( format!( "{}.{}.{}", namespace, kind, name )));
		}
		if namespace.contains( '.' ) || name.contains( '.' ) {
			return Err( KeyParseError::WrongShape( format!( "{}.{}.{}", namespace, kind, name )));
		}
		Ok( Self { namespace, kind, name })
	}

	/// Shorthand for a [`Kind::Widget`] key.
	///
	/// # Errors
	/// See [`RegistrationKey::new`].
	pub fn widget( namespace: impl Into<String>, name: impl Into<String> ) -> Result<Self, KeyParseError> {
		Self::new( namespace, Kind::Widget, name )
	}

	/// Shorthand for a [`Kind::Data`] key.
	///
	/// # Errors
	/// See [`RegistrationKey::new`].
	pub fn data( namespace: impl Into<String>, name: impl Into<String> ) -> Result<Self, KeyParseError> {
		Self::new( namespace, Kind::Data, name )
	}

	/// Shorthand for a [`Kind::Command`] key.
	///
	/// # Errors
	/// See [`RegistrationKey::new`].
	pub fn command( namespace: impl Into<String>, name: impl Into<String> ) -> Result<Self, KeyParseError> {
		Self::new( namespace, Kind::Command, name )
	}

	#[inline] pub fn namespace( &self ) -> &str { &self.namespace }
	#[inline] pub fn kind( &self ) -> Kind { self.kind }
	#[inline] pub fn name( &self ) -> &str { &self.name }

	/// Returns true if the string has the three-segment shape of a key with a
	/// known kind, without allocating.
	pub fn looks_like_key( reference: &str ) -> bool {
		let mut segments = reference.split( '.' );
		matches!(
			( segments.next(), segments.next().map( str::parse::<Kind> ), segments.next(), segments.next() ),
			( Some( namespace ), Some( Ok( _ )), Some( name ), None ) if !namespace.is_empty() && !name.is_empty()
		)
	}
}

impl FromStr for RegistrationKey {
	type Err = KeyParseError ;
	fn from_str( reference: &str ) -> Result<Self, Self::Err> {
		let segments = reference.split( '.' ).collect::<Vec<_>>();
		let [ namespace, kind, name ] = segments.as_slice() else {
			return Err( KeyParseError::WrongShape( reference.to_string() ));
		};
		if segments.iter().any(| segment | segment.is_empty() ) {
			return Err( KeyParseError::EmptySegment( reference.to_string() ));
		}
		Ok( Self { namespace: (*namespace).to_string(), kind: kind.parse()?, name: (*name).to_string() })
	}
}

impl TryFrom<&str> for RegistrationKey {
	type Error = KeyParseError ;
	fn try_from( reference: &str ) -> Result<Self, Self::Error> { reference.parse() }
}

impl std::fmt::Display for RegistrationKey {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		write!( f, "{}.{}.{}", self.namespace, self.kind, self.name )
	}
}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn parses_dotted_key() {
		let key: RegistrationKey = "test.widget.hello".parse().unwrap();
		assert_eq!( key.namespace(), "test" );
		assert_eq!( key.kind(), Kind::Widget );
		assert_eq!( key.name(), "hello" );
		assert_eq!( key.to_string(), "test.widget.hello" );
	}

	#[test]
	fn rejects_malformed_keys() {
		assert!( matches!( "test.widget".parse::<RegistrationKey>(), Err( KeyParseError::WrongShape( _ ))));
		assert!( matches!( "a.b.widget.c".parse::<RegistrationKey>(), Err( KeyParseError::WrongShape( _ ))));
		assert!( matches!( "test..hello".parse::<RegistrationKey>(), Err( KeyParseError::EmptySegment( _ ))));
		assert!( matches!( "test.gadget.hello".parse::<RegistrationKey>(), Err( KeyParseError::UnknownKind( k )) if k == "gadget" ));
	}

	#[test]
	fn recognises_key_shaped_references() {
		assert!( RegistrationKey::looks_like_key( "demo.data.counter" ));
		assert!( !RegistrationKey::looks_like_key( "btn.sidebar" ));
		assert!( !RegistrationKey::looks_like_key( "a.thing.b" ));
		assert!( !RegistrationKey::looks_like_key( "sidebar" ));
	}

	#[test]
	fn constructor_rejects_dotted_parts() {
		assert!( RegistrationKey::widget( "a.b", "c" ).is_err() );
		assert!( RegistrationKey::widget( "", "c" ).is_err() );
		assert!( RegistrationKey::widget( "a", "c" ).is_ok() );
	}
}
