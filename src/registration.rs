//! Registration payloads and the capability interfaces plugins implement.
//!
//! A [`Registration`] bundles a [`Callable`] with an optional [`ParamSchema`]
//! and the [`Provenance`] of the module that registered it. Callables come in
//! three shapes, one per [`Kind`]:
//!
//! - [`WidgetFactory`]: accepts a [`WidgetBinding`] and returns a renderable
//! 	[`Widget`] handle.
//! - [`DataProvider`]: accepts the declared [`Args`] and returns a value.
//! - [`Command`]: accepts [`Args`] and returns a value; invoked by name only.
//!
//! Plugins usually register plain closures through [`Registration::widget`],
//! [`Registration::data`] and [`Registration::command`] and never name the traits.

use std::sync::Arc ;
use serde_yaml::{ Mapping, Value };
use thiserror::Error ;

use crate::key::Kind ;
use crate::outcome::{ ErrorKind, Failure };
use crate::render::Backend ;
use crate::schema::ParamSchema ;



/// Error raised by a plugin callable.
#[derive( Debug, Error )]
pub enum CallError {
	/// A free-form failure message.
	#[error( "{0}" )] Message( String ),
	/// A required argument was not passed.
	#[error( "Missing argument '{0}'" )] MissingArgument( String ),
	/// An argument had an unexpected shape.
	#[error( "Invalid argument '{0}': {1}" )] InvalidArgument( String, String ),
	/// Any other error from the plugin's own stack.
	#[error( transparent )] Other( #[from] Box<dyn std::error::Error + Send + Sync> ),
}

impl CallError {
	pub fn message( message: impl Into<String> ) -> Self { Self::Message( message.into() )}
}

impl From<CallError> for Failure {
	fn from( err: CallError ) -> Self {
		let kind = match &err {
			CallError::MissingArgument( _ ) => ErrorKind::MissingRequiredField,
			CallError::InvalidArgument( _, _ ) => ErrorKind::InvalidFieldType,
			CallError::Message( _ ) | CallError::Other( _ ) => ErrorKind::CallFailed,
		};
		Failure::new( kind, err.to_string() )
	}
}

/// Arguments passed to a data provider or command.
///
/// Documents only ever produce named arguments; positional arguments exist for
/// hosts invoking commands directly.
#[derive( Clone, Debug, Default, PartialEq )]
pub struct Args {
	positional: Vec<Value>,
	named: Mapping,
}

impl Args {

	pub fn new() -> Self { Self::default() }

	/// Wraps a mapping of named arguments, as found under `args:` in a document.
	pub fn from_named( named: Mapping ) -> Self { Self { positional: Vec::with_capacity( 0 ), named }}

	/// Appends a positional argument.
	pub fn arg( mut self, value: impl Into<Value> ) -> Self {
		self.positional.push( value.into() );
		self
	}

	/// Sets a named argument.
	pub fn with( mut self, name: &str, value: impl Into<Value> ) -> Self {
		self.named.insert( Value::from( name ), value.into() );
		self
	}

	#[inline] pub fn positional( &self ) -> &[Value] { &self.positional }
	#[inline] pub fn named( &self ) -> &Mapping { &self.named }
	#[inline] pub fn get( &self, name: &str ) -> Option<&Value> { self.named.get( name )}

	/// Returns the named argument or a [`CallError::MissingArgument`].
	///
	/// # Errors
	/// Fails if the argument is absent.
	pub fn require( &self, name: &str ) -> Result<&Value, CallError> {
		self.get( name ).ok_or_else(|| CallError::MissingArgument( name.to_string() ))
	}
}

/// What a widget factory is given when it is instantiated.
#[derive( Clone, Copy, Debug )]
pub struct WidgetBinding<'a> {
	/// Parameters written on the widget node, after schema defaults were applied.
	pub params: &'a Mapping,
	/// Name of the data node the widget is bound to, if any.
	pub data: Option<&'a str>,
}

/// A renderable widget handle, produced by a [`WidgetFactory`].
///
/// The render driver calls [`Widget::render`] once per frame before rendering
/// the node's children and [`Widget::render_end`] after them, which maps onto the
/// begin/end pairs of immediate-mode libraries.
pub trait Widget: std::fmt::Debug + Send {

	/// Draws the widget. `data` is the current value of the bound data node; a
	/// widget may write through it to update the node.
	///
	/// # Errors
	/// Implementations report drawing failures; the driver aborts the frame.
	fn render( &mut self, ui: &mut dyn Backend, data: Option<&mut Value> ) -> Result<(), CallError> ;

	/// Closes whatever [`Widget::render`] opened, after children were drawn.
	///
	/// # Errors
	/// Implementations report drawing failures; the driver aborts the frame.
	fn render_end( &mut self, _ui: &mut dyn Backend ) -> Result<(), CallError> { Ok(()) }

	/// A value describing what the widget currently shows.
	fn value( &self ) -> Value { Value::Null }
}

/// Literal text is the simplest widget: it renders itself as a label.
impl Widget for String {
	fn render( &mut self, ui: &mut dyn Backend, _data: Option<&mut Value> ) -> Result<(), CallError> {
		ui.text( self );
		Ok(())
	}
	fn value( &self ) -> Value { Value::String( self.clone() )}
}

/// Produces widget handles.
pub trait WidgetFactory: Send + Sync {
	/// Instantiates a widget for one document node.
	///
	/// # Errors
	/// Implementations may reject the binding (e.g. a missing parameter).
	fn build( &self, binding: WidgetBinding<'_> ) -> Result<Box<dyn Widget>, CallError> ;
}

impl<F, W> WidgetFactory for F
where
	F: Fn( WidgetBinding<'_> ) -> Result<W, CallError> + Send + Sync,
	W: Widget + 'static,
{
	fn build( &self, binding: WidgetBinding<'_> ) -> Result<Box<dyn Widget>, CallError> {
		Ok( Box::new( self( binding )? ))
	}
}

/// Produces the values widgets render.
pub trait DataProvider: Send + Sync {
	/// # Errors
	/// Implementations may fail for any reason; the failure is reported to the caller.
	fn provide( &self, args: &Args ) -> Result<Value, CallError> ;
}

impl<F, V> DataProvider for F
where
	F: Fn( &Args ) -> Result<V, CallError> + Send + Sync,
	V: Into<Value>,
{
	fn provide( &self, args: &Args ) -> Result<Value, CallError> { self( args ).map( Into::into )}
}

/// A named operation invoked through the application context.
pub trait Command: Send + Sync {
	/// # Errors
	/// Implementations may fail for any reason; the failure is reported to the caller.
	fn call( &self, args: &Args ) -> Result<Value, CallError> ;
}

/// Adapter turning a closure into a [`Command`].
///
/// Closures already implement [`DataProvider`] through a blanket impl, which
/// would overlap with an identical blanket impl of [`Command`].
pub struct CommandFn<F>( pub F );

impl<F, V> Command for CommandFn<F>
where
	F: Fn( &Args ) -> Result<V, CallError> + Send + Sync,
	V: Into<Value>,
{
	fn call( &self, args: &Args ) -> Result<Value, CallError> { ( self.0 )( args ).map( Into::into )}
}

/// The registered implementation, tagged by kind.
#[derive( Clone )]
pub enum Callable {
	Widget( Arc<dyn WidgetFactory> ),
	Data( Arc<dyn DataProvider> ),
	Command( Arc<dyn Command> ),
}

impl Callable {
	pub fn kind( &self ) -> Kind {
		match self {
			Self::Widget( _ ) => Kind::Widget,
			Self::Data( _ ) => Kind::Data,
			Self::Command( _ ) => Kind::Command,
		}
	}
}

impl std::fmt::Debug for Callable {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_tuple( "Callable" ).field( &self.kind() ).finish()
	}
}

/// Where a registration came from.
#[derive( Clone, Debug, PartialEq, Eq )]
pub struct Provenance {
	module: String,
}

impl Provenance {
	pub fn new( module: impl Into<String> ) -> Self { Self { module: module.into() }}
	/// Identity of the registering plugin module, or `host` for direct registrations.
	#[inline] pub fn module( &self ) -> &str { &self.module }
}

impl Default for Provenance {
	fn default() -> Self { Self::new( "host" )}
}

/// A callable together with its declared schema and provenance.
///
/// Owned by the registry once registered; dispatch borrows it.
#[derive( Debug )]
pub struct Registration {
	callable: Callable,
	schema: Option<ParamSchema>,
	provenance: Provenance,
}

impl Registration {

	pub fn new( callable: Callable ) -> Self {
		Self { callable, schema: None, provenance: Provenance::default() }
	}

	/// Registers a closure as a widget factory.
	pub fn widget<F, W>( factory: F ) -> Self
	where
		F: Fn( WidgetBinding<'_> ) -> Result<W, CallError> + Send + Sync + 'static,
		W: Widget + 'static,
	{
		Self::new( Callable::Widget( Arc::new( factory )))
	}

	/// Registers a closure as a data provider.
	pub fn data<F, V>( provider: F ) -> Self
	where
		F: Fn( &Args ) -> Result<V, CallError> + Send + Sync + 'static,
		V: Into<Value>,
	{
		Self::new( Callable::Data( Arc::new( provider )))
	}

	/// Registers a closure as a command.
	pub fn command<F, V>( command: F ) -> Self
	where
		F: Fn( &Args ) -> Result<V, CallError> + Send + Sync + 'static,
		V: Into<Value>,
	{
		Self::new( Callable::Command( Arc::new( CommandFn( command ))))
	}

	/// Declares the parameters this registration accepts.
	pub fn with_schema( mut self, schema: ParamSchema ) -> Self {
		self.schema = Some( schema );
		self
	}

	pub fn with_provenance( mut self, provenance: Provenance ) -> Self {
		self.provenance = provenance ;
		self
	}

	#[inline] pub fn callable( &self ) -> &Callable { &self.callable }
	#[inline] pub fn kind( &self ) -> Kind { self.callable.kind() }
	#[inline] pub fn schema( &self ) -> Option<&ParamSchema> { self.schema.as_ref() }
	#[inline] pub fn provenance( &self ) -> &Provenance { &self.provenance }
}
