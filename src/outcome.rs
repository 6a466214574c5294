//! Tagged success/failure container returned by dispatch.
//!
//! An [`Outcome`] is what [`Imery::execute_from_registry`]( crate::Imery::execute_from_registry )
//! hands back: either the value produced by the invoked capability or a
//! [`Failure`] describing why it could not be produced. A failure is never
//! treated as success; [`Outcome::unwrap`] panics on one, so callers that need
//! to carry on must inspect the tag first.

/// Error category carried by a [`Failure`].
#[derive( Copy, Clone, Debug, PartialEq, Eq, Hash )]
pub enum ErrorKind {
	DuplicateRegistration,
	NotFound,
	PluginLoadError,
	ImportCycleError,
	NameCollisionError,
	UnresolvedWidgetError,
	AmbiguousReferenceError,
	MissingRequiredField,
	/// A value did not match the type declared by a parameter schema.
	InvalidFieldType,
	/// A dotted key could not be parsed.
	MalformedKey,
	/// A document could not be read or parsed.
	InvalidDocument,
	/// The invoked callable reported an error or panicked.
	CallFailed,
}

impl std::fmt::Display for ErrorKind {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "{:?}", self )}
}

/// Description of a failed operation.
#[derive( Clone, Debug, PartialEq, Eq )]
pub struct Failure {
	kind: ErrorKind,
	message: String,
	path: Option<String>,
}

impl Failure {

	pub fn new( kind: ErrorKind, message: impl Into<String> ) -> Self {
		Self { kind, message: message.into(), path: None }
	}

	/// Attaches the dotted document path (or registry key) the failure relates to.
	pub fn at( mut self, path: impl Into<String> ) -> Self {
		self.path = Some( path.into() );
		self
	}

	#[inline] pub fn kind( &self ) -> ErrorKind { self.kind }
	#[inline] pub fn message( &self ) -> &str { &self.message }
	#[inline] pub fn path( &self ) -> Option<&str> { self.path.as_deref() }
}

impl std::fmt::Display for Failure {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		match &self.path {
			Some( path ) => write!( f, "{} at '{}': {}", self.kind, path, self.message ),
			None => write!( f, "{}: {}", self.kind, self.message ),
		}
	}
}

impl std::error::Error for Failure {}

/// Either the produced value or a [`Failure`].
#[derive( Clone, Debug, PartialEq )]
#[must_use = "an Outcome may be a failure, inspect it or unwrap it"]
pub enum Outcome<T> {
	Success( T ),
	Failure( Failure ),
}

impl<T> Outcome<T> {

	#[inline] pub fn success( value: T ) -> Self { Self::Success( value )}
	#[inline] pub fn failure( failure: Failure ) -> Self { Self::Failure( failure )}

	#[inline] pub fn is_success( &self ) -> bool { matches!( self, Self::Success( _ ))}
	#[inline] pub fn is_failure( &self ) -> bool { matches!( self, Self::Failure( _ ))}

	/// Returns the failure, if this is one.
	pub fn as_failure( &self ) -> Option<&Failure> {
		match self {
			Self::Success( _ ) => None,
			Self::Failure( failure ) => Some( failure ),
		}
	}

	/// Returns the contained value.
	///
	/// # Panics
	/// Panics if this is a failure. This is the loud end of the contract: code
	/// that must keep running should match on the outcome or use
	/// [`Outcome::into_result`] instead.
	#[track_caller]
	pub fn unwrap( self ) -> T {
		match self {
			Self::Success( value ) => value,
			Self::Failure( failure ) => panic!( "called `Outcome::unwrap()` on a failure: {}", failure ),
		}
	}

	/// Converts into a std [`Result`] so the failure can be propagated with `?`.
	///
	/// # Errors
	/// Returns the contained [`Failure`] if this is one.
	pub fn into_result( self ) -> Result<T, Failure> {
		match self {
			Self::Success( value ) => Ok( value ),
			Self::Failure( failure ) => Err( failure ),
		}
	}

	pub fn map<N>( self, map: impl FnOnce( T ) -> N ) -> Outcome<N> {
		match self {
			Self::Success( value ) => Outcome::Success( map( value )),
			Self::Failure( failure ) => Outcome::Failure( failure ),
		}
	}
}

impl<T, E: Into<Failure>> From<Result<T, E>> for Outcome<T> {
	fn from( result: Result<T, E> ) -> Self {
		match result {
			Ok( value ) => Self::Success( value ),
			Err( err ) => Self::Failure( err.into() ),
		}
	}
}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn unwrap_yields_success_value() {
		assert_eq!( Outcome::success( "hello" ).unwrap(), "hello" );
	}

	#[test]
	#[should_panic( expected = "NotFound at 'x.widget.y'" )]
	fn unwrap_panics_on_failure() {
		let outcome: Outcome<()> = Outcome::failure( Failure::new( ErrorKind::NotFound, "missing" ).at( "x.widget.y" ));
		outcome.unwrap();
	}

	#[test]
	fn failure_is_never_success() {
		let outcome: Outcome<u32> = Outcome::failure( Failure::new( ErrorKind::CallFailed, "boom" ));
		assert!( outcome.is_failure() );
		assert!( !outcome.is_success() );
		assert_eq!( outcome.as_failure().map( Failure::kind ), Some( ErrorKind::CallFailed ));
		assert!( outcome.into_result().is_err() );
	}
}
