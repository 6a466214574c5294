//! A plugin registry and document resolver for declarative immediate-mode GUIs.
//!
//! Applications are written as YAML documents naming widgets and data sources.
//! Plugins provide those widgets and data sources by registering them under
//! dotted keys. `imery` connects the two: it collects registrations, resolves
//! documents (with their imports) against them, and drives the resulting tree
//! through an immediate-mode backend every frame.
//!
//! # Core Concepts
//!
//! - [`RegistrationKey`]: `namespace.kind.name`, e.g. `demo.widget.button`. Parsed
//! 	once, so a malformed key is reported where it is written.
//!
//! - [`Registry`]: the table of [`Registration`]s owned by one application
//! 	context. Registering a key twice fails unless the [`DuplicatePolicy`] says
//! 	to override.
//!
//! - [`Registrar`]: what plugin code registers through. Before an application
//! 	context exists, registrations go to a [`PendingQueue`] and are applied later
//! 	with [`apply_pending_registrations`]; afterwards they go straight into the
//! 	registry.
//!
//! - [`PluginModule`] / [`PluginLocation`]: units of plugin code and where they
//! 	are found. [`discover`] imports them all, collecting failures instead of
//! 	stopping at the first.
//!
//! - [`Document`]: the typed form of a YAML document. [`Resolver`] loads a document
//! 	and its imports, binds every reference, and produces a [`ResolvedTree`] or
//! 	every error it found ([`ResolveErrors`]).
//!
//! - [`Imery`]: the application context. Owns the registry and the resolved tree,
//! 	and dispatches registrations by name with [`Imery::execute_from_registry`],
//! 	which returns an [`Outcome`].
//!
//! - [`RenderDriver`]: draws a resolved tree through a [`Backend`], one frame at a
//! 	time. It refuses to start on a document that failed to resolve.
//!
//! # Example
//!
//! ```
//! use imery::{ Args, Imery, PendingQueue, Registrar, RecordingBackend, RenderDriver };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Plugins may register before any application context exists.
//! let queue = PendingQueue::new();
//! Registrar::pending( &queue ).widget( "test", "hello", |_| Ok( "hello".to_string() ))?;
//!
//! let mut app = Imery::new();
//! let ( applied, rejected ) = app.apply_pending_registrations( &queue );
//! assert_eq!(( applied, rejected.len() ), ( 1, 0 ));
//!
//! app.load_document( "main", "app: { widget: test.widget.hello }" )?;
//! assert_eq!( app.execute_from_registry( "test.widget.hello", Args::new() ).unwrap(), "hello" );
//!
//! let mut ui = RecordingBackend::new();
//! RenderDriver::new( &mut app )?.frame( &mut ui )?;
//! assert_eq!( ui.calls(), [ "text:hello" ]);
//! # Ok(())
//! # }
//! ```

mod app ;
mod config ;
mod discovery ;
mod dispatch ;
mod document ;
mod key ;
mod outcome ;
mod pending ;
mod registrar ;
mod registration ;
mod registry ;
mod render ;
mod resolver ;
mod schema ;
mod source ;
mod tree ;
mod utils ;

#[doc( hidden )]
pub use inventory ;

pub use app::Imery ;
pub use config::{ Settings, SettingsError };
pub use discovery::{
	apply_pending_registrations, discover,
	Catalog, DiscoveryOptions, Linked, LinkedPlugin, ModuleFn,
	PluginLoadError, PluginLocation, PluginModule,
};
pub use document::{ AppNode, DataNode, DataSource, Document, DocumentNode, ImportNode, NodePath, Warning, WidgetNode };
pub use key::{ Kind, KeyParseError, RegistrationKey };
pub use outcome::{ ErrorKind, Failure, Outcome };
pub use pending::{ PendingQueue, PendingRegistration };
pub use registrar::Registrar ;
pub use registration::{
	Args, CallError, Callable, Command, CommandFn, DataProvider,
	Provenance, Registration, Widget, WidgetBinding, WidgetFactory,
};
pub use registry::{ DuplicatePolicy, Registry, RegistryError };
pub use render::{ Backend, RecordingBackend, RenderDriver, RenderError };
pub use resolver::{ ResolveError, ResolveErrors, Resolver };
pub use schema::{ Param, ParamSchema, ParamType, SchemaViolation };
pub use source::{ DocumentId, DocumentSource };
pub use tree::{ DataSlot, ResolvedTree, ResolvedWidget, SlotSource, WidgetTarget };
pub use utils::{ PartialResult, PartialSuccess };
