//! Document resolution.
//!
//! Resolving an entry document happens in three passes:
//!
//! 1. **Load.** The entry document and everything it imports are read and parsed,
//! 	depth-first. The chain of documents currently being loaded is kept on a
//! 	stack; meeting a document that is already on the stack is an import cycle.
//! 	A document reached twice by other routes is loaded once.
//! 2. **Scope.** Each document's scope is its own definitions plus the scopes of
//! 	its imports, with qualified imports adding their prefix. Two definitions of
//! 	different origin under the same name collide. The same definition reached
//! 	through a diamond of imports does not.
//! 3. **Bind.** Widget references are looked up in the registry (dotted keys) or
//! 	among the bindings in scope (bare names), data references among the data
//! 	definitions in scope. Parameter schemas are applied. The tree is built
//! 	bottom-up, so children are complete before their parent. Its root is the
//! 	one `app` section of the document set, whichever document holds it.
//!
//! Every pass collects errors instead of stopping at the first one, so a document
//! with three broken references reports all three.

use std::collections::HashMap ;
use std::path::PathBuf ;
use indexmap::IndexMap ;
use itertools::Itertools ;
use nonempty_collections::NEVec ;
use pipe_trait::Pipe ;
use serde_yaml::{ Mapping, Value };
use thiserror::Error ;

use crate::document::{ AppNode, DataNode, DataSource, Document, NodePath, Warning, WidgetNode };
use crate::key::{ Kind, RegistrationKey };
use crate::outcome::{ ErrorKind, Failure };
use crate::registration::{ Args, Callable };
use crate::registry::Registry ;
use crate::schema::{ ParamSchema, ParamType, SchemaViolation };
use crate::source::{ DocumentId, DocumentSource };
use crate::tree::{ binding_cycles, DataSlot, ResolvedTree, ResolvedWidget, WidgetTarget };
use crate::utils::{ Merge, PartialSuccess };



/// Errors found while loading or resolving documents.
#[derive( Clone, Debug, PartialEq, Eq, Error )]
pub enum ResolveError {
	#[error( "Import cycle: {}", cycle.iter().join( " -> " ))]
	ImportCycle { cycle: Vec<DocumentId> },
	#[error( "'{name}' is defined by both '{first}' and '{second}'" )]
	NameCollision { name: String, first: DocumentId, second: DocumentId },
	#[error( "Unresolved widget '{name}' at '{path}' in '{document}'" )]
	UnresolvedWidget { document: DocumentId, path: String, name: String },
	#[error( "Unresolved data '{name}' at '{path}' in '{document}'" )]
	UnresolvedData { document: DocumentId, path: String, name: String },
	#[error( "Ambiguous reference '{name}' at '{path}' in '{document}', candidates: {}", candidates.join( ", " ))]
	AmbiguousReference { document: DocumentId, path: String, name: String, candidates: Vec<String> },
	#[error( "Missing required field '{field}' at '{path}' in '{document}'" )]
	MissingRequiredField { document: DocumentId, path: String, field: String },
	#[error( "Field '{field}' at '{path}' in '{document}' expects {expected}" )]
	InvalidFieldType { document: DocumentId, path: String, field: String, expected: ParamType },
	#[error( "Invalid node at '{path}' in '{document}': {reason}" )]
	InvalidNode { document: DocumentId, path: String, reason: String },
	#[error( "Module '{reference}' not found{}", importer.as_ref().map(| importer | format!( " (imported by '{}')", importer )).unwrap_or_default() )]
	ModuleNotFound { reference: String, importer: Option<DocumentId> },
	#[error( "Invalid search path '{}': {reason}", path.display() )]
	InvalidSearchPath { path: PathBuf, reason: String },
	#[error( "Failed to read '{document}': {message}" )]
	Io { document: DocumentId, message: String },
	#[error( "Invalid YAML in '{document}': {message}" )]
	Yaml { document: DocumentId, message: String },
	#[error( "Widget binding cycle: {}", cycle.join( " -> " ))]
	BindingCycle { cycle: Vec<String> },
	#[error( "'{document}' and its imports have no 'app' section" )]
	MissingApp { document: DocumentId },
	#[error( "Multiple 'app' sections found, in {}", documents.iter().map(| document | format!( "'{}'", document )).join( ", " ))]
	MultipleApps { documents: Vec<DocumentId> },
}

impl ResolveError {

	pub fn kind( &self ) -> ErrorKind {
		match self {
			Self::ImportCycle { .. } => ErrorKind::ImportCycleError,
			Self::NameCollision { .. } => ErrorKind::NameCollisionError,
			Self::UnresolvedWidget { .. } => ErrorKind::UnresolvedWidgetError,
			Self::UnresolvedData { .. } | Self::ModuleNotFound { .. } => ErrorKind::NotFound,
			Self::AmbiguousReference { .. } => ErrorKind::AmbiguousReferenceError,
			Self::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
			Self::InvalidFieldType { .. } => ErrorKind::InvalidFieldType,
			Self::InvalidNode { .. }
			| Self::InvalidSearchPath { .. }
			| Self::Io { .. }
			| Self::Yaml { .. }
			| Self::BindingCycle { .. }
			| Self::MissingApp { .. }
			| Self::MultipleApps { .. } => ErrorKind::InvalidDocument,
		}
	}

	/// The dotted document path the error points at, if it points at a node.
	pub fn path( &self ) -> Option<&str> {
		match self {
			Self::UnresolvedWidget { path, .. }
			| Self::UnresolvedData { path, .. }
			| Self::AmbiguousReference { path, .. }
			| Self::MissingRequiredField { path, .. }
			| Self::InvalidFieldType { path, .. }
			| Self::InvalidNode { path, .. } => Some( path ),
			_ => None,
		}
	}

	fn from_violation( document: &DocumentId, violation: SchemaViolation ) -> Self {
		match violation {
			SchemaViolation::MissingRequiredField { path, field } =>
				Self::MissingRequiredField { document: document.clone(), path, field },
			SchemaViolation::InvalidFieldType { path, field, expected } =>
				Self::InvalidFieldType { document: document.clone(), path, field, expected },
		}
	}
}

impl From<ResolveError> for Failure {
	fn from( err: ResolveError ) -> Self {
		let failure = Failure::new( err.kind(), err.to_string() );
		match err.path() {
			Some( path ) => failure.at( path ),
			None => failure,
		}
	}
}

/// Every error a resolution produced. Never empty.
#[derive( Clone, Debug, PartialEq, Eq )]
pub struct ResolveErrors( NEVec<ResolveError> );

impl ResolveErrors {

	/// `Ok` if `errors` is empty.
	///
	/// # Errors
	/// Wraps a non-empty list.
	pub fn check( errors: Vec<ResolveError> ) -> Result<(), Self> {
		match NEVec::try_from_vec( errors ) {
			Some( errors ) => Err( Self( errors )),
			None => Ok(()),
		}
	}

	#[inline] pub fn first( &self ) -> &ResolveError { self.0.first() }
	#[inline] pub fn count( &self ) -> usize { self.0.len().get() }
	pub fn iter( &self ) -> impl Iterator<Item = &ResolveError> { self.0.iter().into_iter() }
}

impl From<ResolveError> for ResolveErrors {
	fn from( err: ResolveError ) -> Self { Self( NEVec::new( err ))}
}

impl std::fmt::Display for ResolveErrors {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		write!( f, "{} resolution error(s)", self.count() )?;
		self.iter().try_for_each(| err | write!( f, "\n  - {}", err ))
	}
}

impl std::error::Error for ResolveErrors {}

impl From<ResolveErrors> for Failure {
	fn from( errors: ResolveErrors ) -> Self {
		let first = errors.first();
		let failure = Failure::new( first.kind(), errors.to_string() );
		match first.path() {
			Some( path ) => failure.at( path ),
			None => failure,
		}
	}
}

/// A loaded document and the identities of its imports.
struct Loaded {
	document: Document,
	imports: Vec<( Option<String>, DocumentId )>,
}

/// Loaded documents in post-order: every document follows the ones it imports.
type DocumentSet = IndexMap<DocumentId, Loaded> ;

/// A definition visible in a scope, with the document and name it was defined under.
struct Def<'d, T> {
	origin: &'d DocumentId,
	local: &'d str,
	node: &'d T,
}

impl<T> Clone for Def<'_, T> { fn clone( &self ) -> Self { *self }}
impl<T> Copy for Def<'_, T> {}

impl<'d, T> Def<'d, T> {
	fn id( &self ) -> DefId<'d> { ( self.origin, self.local )}
}

type DefId<'d> = ( &'d DocumentId, &'d str );

struct Scope<'d> {
	widgets: IndexMap<String, Def<'d, WidgetNode>>,
	data: IndexMap<String, Def<'d, DataNode>>,
}

impl<'d> Scope<'d> {

	fn local( origin: &'d DocumentId, document: &'d Document ) -> Self {
		Self {
			widgets: document.widgets().iter()
				.map(|( name, node )| ( name.clone(), Def { origin, local: name, node }))
				.collect(),
			data: document.data().iter()
				.map(|( name, node )| ( name.clone(), Def { origin, local: name, node }))
				.collect(),
		}
	}

	fn merge( &mut self, imported: &Scope<'d>, prefix: Option<&str>, errors: &mut Vec<ResolveError> ) {
		let qualify = | name: &String | match prefix {
			Some( prefix ) => format!( "{}.{}", prefix, name ),
			None => name.clone(),
		};
		imported.widgets.iter().for_each(|( name, def )| insert_def( &mut self.widgets, qualify( name ), *def, errors ));
		imported.data.iter().for_each(|( name, def )| insert_def( &mut self.data, qualify( name ), *def, errors ));
	}
}

fn insert_def<'d, T>( defs: &mut IndexMap<String, Def<'d, T>>, name: String, def: Def<'d, T>, errors: &mut Vec<ResolveError> ) {
	match defs.get( &name ) {
		Some( existing ) if existing.id() == def.id() => {},
		Some( existing ) => errors.push( ResolveError::NameCollision {
			name,
			first: existing.origin.clone(),
			second: def.origin.clone(),
		}),
		None => { defs.insert( name, def ); },
	}
}

/// Builds every document's scope. Relies on the post-order of `set`.
fn build_scopes<'d>( set: &'d DocumentSet, errors: &mut Vec<ResolveError> ) -> HashMap<&'d DocumentId, Scope<'d>> {
	let mut scopes = HashMap::<&DocumentId, Scope>::new();
	for ( id, loaded ) in set {
		let mut scope = Scope::local( id, &loaded.document );
		for ( prefix, target ) in &loaded.imports {
			if let Some( imported ) = scopes.get( target ) {
				scope.merge( imported, prefix.as_deref(), errors );
			}
		}
		scopes.insert( id, scope );
	}
	scopes
}

/// The name each definition is known by in the entry scope. A definition
/// visible under several names keeps the first.
struct Names<'d> {
	widgets: HashMap<DefId<'d>, String>,
	data: HashMap<DefId<'d>, String>,
}

impl<'d> Names<'d> {

	fn new( entry: &Scope<'d> ) -> Self {
		let mut names = Self { widgets: HashMap::new(), data: HashMap::new() };
		for ( name, def ) in &entry.widgets {
			names.widgets.entry( def.id() ).or_insert_with(|| name.clone() );
		}
		for ( name, def ) in &entry.data {
			names.data.entry( def.id() ).or_insert_with(|| name.clone() );
		}
		names
	}

	fn widget( &self, def: &Def<'d, WidgetNode> ) -> String {
		self.widgets.get( &def.id() ).cloned().unwrap_or_else(|| def.local.to_string() )
	}

	fn data( &self, def: &Def<'d, DataNode> ) -> String {
		self.data.get( &def.id() ).cloned().unwrap_or_else(|| def.local.to_string() )
	}

	/// Definitions of the entry scope, each once, in scope order.
	fn unique<'s, T>( defs: &'s IndexMap<String, Def<'d, T>> ) -> impl Iterator<Item = &'s Def<'d, T>> {
		defs.values().unique_by(| def | def.id() )
	}
}

/// How a data reference matched the definitions in scope.
enum DataMatch<'s, 'd> {
	Found( &'s Def<'d, DataNode> ),
	Ambiguous( Vec<String> ),
	Missing,
}

/// Exact name first, then a unique `<prefix>.<name>` suffix.
fn match_data<'s, 'd>( scope: &'s Scope<'d>, name: &str ) -> DataMatch<'s, 'd> {
	if let Some( def ) = scope.data.get( name ) { return DataMatch::Found( def ) }
	let suffix = format!( ".{}", name );
	let candidates = scope.data.iter()
		.filter(|( candidate, _ )| candidate.ends_with( &suffix ))
		.unique_by(|( _, def )| def.id() )
		.collect::<Vec<_>>();
	match candidates.as_slice() {
		[] => DataMatch::Missing,
		[( _, def )] => DataMatch::Found( *def ),
		candidates => DataMatch::Ambiguous( candidates.iter().map(|( name, _ )| (*name).clone() ).sorted().collect() ),
	}
}

/// The one `app` section of a document set, with the document defining it.
fn single_app<'d>( set: &'d DocumentSet, entry: &DocumentId ) -> Result<Option<( &'d DocumentId, &'d AppNode )>, ResolveError> {
	let apps = set.iter()
		.filter_map(|( id, loaded )| loaded.document.app().map(| app | ( id, app )))
		.collect::<Vec<_>>();
	match apps.as_slice() {
		[] => Ok( None ),
		[ app ] => Ok( Some( *app )),
		apps => {
			tracing::debug!( document = %entry, apps = apps.len(), "more than one 'app' section" );
			Err( ResolveError::MultipleApps { documents: apps.iter().map(|( id, _ )| (*id).clone() ).collect() })
		},
	}
}

/// Loads, scopes and binds documents against a registry.
pub struct Resolver<'a> {
	registry: &'a Registry,
	source: &'a DocumentSource,
}

impl<'a> Resolver<'a> {

	pub fn new( registry: &'a Registry, source: &'a DocumentSource ) -> Self {
		Self { registry, source }
	}

	/// Resolves `entry` and everything it imports.
	///
	/// # Partial Success
	/// Returns the tree together with non-fatal [`Warning`]s.
	///
	/// # Errors
	/// Returns every error found. Loading errors stop resolution before binding.
	pub fn resolve( &self, entry: &DocumentId ) -> Result<PartialSuccess<ResolvedTree, Warning>, ResolveErrors> {

		let set = self.load( entry )?;
		let mut errors = Vec::new();
		let scopes = build_scopes( &set, &mut errors );
		let Some( entry_scope ) = scopes.get( entry ) else {
			return Err( ResolveError::ModuleNotFound { reference: entry.to_string(), importer: None }.into() );
		};
		let app = single_app( &set, entry ).and_then(| app | app.ok_or_else(|| ResolveError::MissingApp { document: entry.clone() }));

		let warnings = set.values()
			.flat_map(| loaded | loaded.document.warnings().iter().cloned() )
			.collect::<Vec<_>>();

		let mut binder = Binder {
			registry: self.registry,
			scopes: &scopes,
			names: Names::new( entry_scope ),
			implicit: IndexMap::new(),
			errors,
		};

		let mut data = Names::unique( &entry_scope.data )
			.filter_map(| def | binder.data_slot( def ).map(| slot | ( binder.names.data( def ), slot )))
			.collect::<IndexMap<_, _>>();

		let bindings = Names::unique( &entry_scope.widgets )
			.filter_map(| def | binder.widget( def.origin, def.node ).map(| widget | ( binder.names.widget( def ), widget )))
			.collect::<IndexMap<_, _>>();

		let root = match &app {
			Ok(( origin, app )) => binder.widget( *origin, &app.root ),
			Err( err ) => {
				binder.errors.push( err.clone() );
				None
			},
		};

		let errors = binder_errors( binder.errors, &bindings );
		data.extend( binder.implicit );
		let root = match ( root, ResolveErrors::check( errors )) {
			( _, Err( errors )) => return Err( errors ),
			( Some( root ), Ok(())) => root,
			( None, Ok(())) => return Err( ResolveError::MissingApp { document: entry.clone() }.into() ),
		};

		let title = app.ok().and_then(|( _, app )| app.title.clone() );
		let tree = ResolvedTree::new( title, root, bindings, data );
		tracing::debug!( document = %entry, nodes = tree.node_count(), "resolved document" );
		Ok(( tree, warnings ))

	}

	/// Flattens `entry` and its imports into one self-contained document with
	/// `app`, `widgets` and `data` sections. Imported definitions keep the name
	/// they are visible under from `entry`, qualified ones included, and
	/// references are rewritten to match, so the result loads on its own.
	///
	/// Registry references are not checked. A document set without an `app`
	/// flattens to one without.
	///
	/// # Errors
	/// Returns loading errors, name collisions and more than one `app` section.
	pub fn aggregate( &self, entry: &DocumentId ) -> Result<Mapping, ResolveErrors> {

		let set = self.load( entry )?;
		let mut errors = Vec::new();
		let scopes = build_scopes( &set, &mut errors );
		let app = single_app( &set, entry );
		ResolveErrors::check( errors.merge_all( app.as_ref().err().cloned() ))?;
		let Some( entry_scope ) = scopes.get( entry ) else {
			return Err( ResolveError::ModuleNotFound { reference: entry.to_string(), importer: None }.into() );
		};

		let flattener = Flattener { scopes: &scopes, names: Names::new( entry_scope )};
		let mut flat = Mapping::new();

		if let Ok( Some(( origin, app ))) = app {
			let mut node = Mapping::new();
			if let Some( title ) = &app.title { node.insert( "title".into(), title.as_str().into() ); }
			if let Value::Mapping( root ) = flattener.widget( origin, &app.root ) { node.extend( root ); }
			flat.insert( "app".into(), Value::Mapping( node ));
		}

		let widgets = Names::unique( &entry_scope.widgets )
			.map(| def | ( Value::from( flattener.names.widget( def )), flattener.widget( def.origin, def.node )))
			.collect::<Mapping>();
		if !widgets.is_empty() { flat.insert( "widgets".into(), Value::Mapping( widgets )); }

		let data = Names::unique( &entry_scope.data )
			.map(| def | ( Value::from( flattener.names.data( def )), data_value( def.node )))
			.collect::<Mapping>();
		if !data.is_empty() { flat.insert( "data".into(), Value::Mapping( data )); }

		Ok( flat )

	}

	/// Loads `entry` and its imports, depth-first.
	fn load( &self, entry: &DocumentId ) -> Result<DocumentSet, ResolveErrors> {
		let mut state = LoadState { set: IndexMap::new(), stack: Vec::new(), errors: Vec::new() };
		self.load_into( entry, &mut state );
		state.pipe(| LoadState { set, errors, .. }| ResolveErrors::check( errors ).map(|()| set ))
	}

	fn load_into( &self, id: &DocumentId, state: &mut LoadState ) {

		if let Some( start ) = state.stack.iter().position(| open | open == id ) {
			let cycle = state.stack[start..].iter().cloned().chain( std::iter::once( id.clone() )).collect::<Vec<_>>();
			tracing::debug!( cycle = %cycle.iter().join( " -> " ), "import cycle" );
			state.errors.push( ResolveError::ImportCycle { cycle });
			return ;
		}
		if state.set.contains_key( id ) { return }

		let document = match self.source.read( id )
			.map_err(| err | vec![ err ])
			.and_then(| text | Document::parse( id.clone(), &text ))
		{
			Ok( document ) => document,
			Err( errors ) => {
				state.errors.extend( errors );
				return ;
			},
		};

		state.stack.push( id.clone() );
		let imports = document.imports().iter()
			.filter_map(| import | match self.source.locate( &import.target, Some( id )) {
				Ok( target ) => {
					self.load_into( &target, state );
					Some(( import.prefix.clone(), target ))
				},
				Err( err ) => {
					state.errors.push( err );
					None
				},
			})
			.collect();
		state.stack.pop();

		state.set.insert( id.clone(), Loaded { document, imports });

	}
}

/// Documents loaded so far, the chain currently being loaded, and the errors met.
struct LoadState {
	set: DocumentSet,
	stack: Vec<DocumentId>,
	errors: Vec<ResolveError>,
}

fn binder_errors( errors: Vec<ResolveError>, bindings: &IndexMap<String, ResolvedWidget> ) -> Vec<ResolveError> {
	errors.merge_all( binding_cycles( bindings ).into_iter().map(| cycle | ResolveError::BindingCycle { cycle }))
}

/// Binds the definitions of one document set.
struct Binder<'r, 'd> {
	registry: &'r Registry,
	scopes: &'r HashMap<&'d DocumentId, Scope<'d>>,
	names: Names<'d>,
	/// Slots for widgets bound directly to a registered data provider key.
	implicit: IndexMap<String, DataSlot>,
	errors: Vec<ResolveError>,
}

impl<'r, 'd> Binder<'r, 'd> {

	/// Binds a widget node and its children. `None` if anything in the subtree
	/// failed; the failures are recorded.
	fn widget( &mut self, document: &'d DocumentId, node: &'d WidgetNode ) -> Option<ResolvedWidget> {

		let before = self.errors.len();
		let children = node.children.iter()
			.filter_map(| child | self.widget( document, child ))
			.collect::<Vec<_>>();
		let target = self.widget_target( document, node );
		let data = node.data.as_deref().and_then(| name | self.data_reference( document, &node.path, name ));

		let mut params = node.params.clone();
		if let Some(( _, Some( schema ))) = &target {
			self.apply_schema( document, schema, &mut params, &node.path );
		}

		if self.errors.len() > before { return None }
		let ( target, _ ) = target?;
		Some( ResolvedWidget { path: node.path.clone(), target, params, data, children })

	}

	fn widget_target( &mut self, document: &'d DocumentId, node: &'d WidgetNode ) -> Option<( WidgetTarget, Option<&'r ParamSchema> )> {

		let unresolved = || ResolveError::UnresolvedWidget {
			document: document.clone(),
			path: node.path.child( "widget" ).to_string(),
			name: node.widget.clone(),
		};

		let ( registry, scopes ) = ( self.registry, self.scopes );
		if RegistrationKey::looks_like_key( &node.widget ) {
			let registered = node.widget.parse::<RegistrationKey>().ok()
				.filter(| key | key.kind() == Kind::Widget )
				.and_then(| key | registry.lookup( &key ).ok().map(| registration | ( key, registration )));
			return match registered {
				Some(( key, registration )) => match registration.callable() {
					Callable::Widget( factory ) => Some((
						WidgetTarget::Registered { key, factory: factory.clone() },
						registration.schema(),
					)),
					_ => { self.errors.push( unresolved() ); None },
				},
				None => { self.errors.push( unresolved() ); None },
			};
		}

		match scopes.get( document ).and_then(| scope | scope.widgets.get( &node.widget )) {
			Some( def ) => Some(( WidgetTarget::Binding( self.names.widget( def )), None )),
			None => { self.errors.push( unresolved() ); None },
		}

	}

	/// Resolves a widget's `data:` field to a slot name.
	fn data_reference( &mut self, document: &'d DocumentId, path: &NodePath, name: &str ) -> Option<String> {

		let path = path.child( "data" ).to_string();
		let scopes = self.scopes ;
		let found = match scopes.get( document ).map(| scope | match_data( scope, name )) {
			Some( DataMatch::Found( def )) => Ok( self.names.data( def )),
			Some( DataMatch::Ambiguous( candidates )) => Err( ResolveError::AmbiguousReference {
				document: document.clone(),
				path,
				name: name.to_string(),
				candidates,
			}),
			Some( DataMatch::Missing ) | None => self.implicit_provider( document, &path, name ).ok_or_else(|| {
				ResolveError::UnresolvedData { document: document.clone(), path, name: name.to_string() }
			}),
		};
		match found {
			Ok( slot ) => Some( slot ),
			Err( err ) => { self.errors.push( err ); None },
		}

	}

	/// A data reference that is itself a registered data provider key gets an
	/// argument-less slot of its own.
	fn implicit_provider( &mut self, document: &'d DocumentId, path: &str, name: &str ) -> Option<String> {
		if self.implicit.contains_key( name ) { return Some( name.to_string() ) }
		if !RegistrationKey::looks_like_key( name ) { return None }
		let key = name.parse::<RegistrationKey>().ok().filter(| key | key.kind() == Kind::Data )?;
		let registry = self.registry ;
		let registration = registry.lookup( &key ).ok()?;
		let Callable::Data( provider ) = registration.callable() else { return None };

		let mut args = Mapping::new();
		if let Some( schema ) = registration.schema() {
			if let Err( violations ) = schema.apply( &mut args, path ) {
				self.errors.extend( violations.into_iter().map(| violation | ResolveError::from_violation( document, violation )));
			}
		}
		let slot = DataSlot::provider( None, key, provider.clone(), Args::from_named( args ));
		self.implicit.insert( name.to_string(), slot );
		Some( name.to_string() )
	}

	fn data_slot( &mut self, def: &Def<'d, DataNode> ) -> Option<DataSlot> {
		let node = def.node ;
		match &node.source {
			DataSource::Literal( value ) => Some( DataSlot::literal( node.path.clone(), value.clone() )),
			DataSource::Provider { key, args } => {
				let registry = self.registry ;
				let provider = registry.lookup( key ).ok().and_then(| registration | match registration.callable() {
					Callable::Data( provider ) => Some(( provider.clone(), registration.schema() )),
					_ => None,
				});
				let Some(( provider, schema )) = provider else {
					self.errors.push( ResolveError::UnresolvedData {
						document: def.origin.clone(),
						path: node.path.child( "provider" ).to_string(),
						name: key.to_string(),
					});
					return None ;
				};
				let mut args = args.clone();
				let before = self.errors.len();
				if let Some( schema ) = schema {
					self.apply_schema( def.origin, schema, &mut args, &node.path.child( "args" ));
				}
				( self.errors.len() == before ).then(|| {
					DataSlot::provider( Some( node.path.clone() ), key.clone(), provider, Args::from_named( args ))
				})
			},
		}
	}

	fn apply_schema( &mut self, document: &DocumentId, schema: &ParamSchema, values: &mut Mapping, path: &NodePath ) {
		if let Err( violations ) = schema.apply( values, path.as_str() ) {
			self.errors.extend( violations.into_iter().map(| violation | ResolveError::from_violation( document, violation )));
		}
	}
}

/// Rewrites nodes into plain YAML for [`Resolver::aggregate`].
struct Flattener<'r, 'd> {
	scopes: &'r HashMap<&'d DocumentId, Scope<'d>>,
	names: Names<'d>,
}

impl<'d> Flattener<'_, 'd> {

	fn widget( &self, document: &'d DocumentId, node: &'d WidgetNode ) -> Value {
		let scope = self.scopes.get( document );
		let widget = match scope.and_then(| scope | scope.widgets.get( &node.widget )) {
			Some( def ) if !RegistrationKey::looks_like_key( &node.widget ) => self.names.widget( def ),
			_ => node.widget.clone(),
		};
		let data = node.data.as_ref().map(| name | match scope.map(| scope | match_data( scope, name )) {
			Some( DataMatch::Found( def )) => self.names.data( def ),
			_ => name.clone(),
		});

		let mut flat = Mapping::new();
		flat.insert( "widget".into(), widget.into() );
		if let Some( data ) = data { flat.insert( "data".into(), data.into() ); }
		flat.extend( node.params.clone() );
		if !node.children.is_empty() {
			let children = node.children.iter().map(| child | self.widget( document, child )).collect();
			flat.insert( "children".into(), Value::Sequence( children ));
		}
		Value::Mapping( flat )
	}
}

fn data_value( node: &DataNode ) -> Value {
	match &node.source {
		DataSource::Literal( value ) => value.clone(),
		DataSource::Provider { key, args } => {
			let mut flat = Mapping::new();
			flat.insert( "provider".into(), key.to_string().into() );
			if !args.is_empty() { flat.insert( "args".into(), Value::Mapping( args.clone() )); }
			Value::Mapping( flat )
		},
	}
}
