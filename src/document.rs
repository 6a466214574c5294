//! Typed document nodes.
//!
//! A document is a YAML mapping with up to four top-level sections:
//!
//! ```yaml
//! import: [ widgets.common, { module: widgets.buttons, as: btn }]
//! app:
//!   title: Demo
//!   widget: demo.widget.window
//!   children:
//!     - { widget: sidebar }
//!     - { widget: demo.widget.label, data: greeting, text: Hi }
//! widgets:
//!   sidebar: { widget: demo.widget.panel }
//! data:
//!   greeting: hello
//!   clock: { provider: demo.data.clock, args: { format: "%H:%M" }}
//! ```
//!
//! Parsing turns the generic YAML tree into a [`Document`] of typed nodes, each
//! carrying the dotted [`NodePath`] of its position. Nothing is looked up here;
//! references stay strings until the resolver binds them. Unknown top-level keys
//! are tolerated and reported as [`Warning`]s.
//!
//! Definition names are usually bare (`sidebar`). Qualified names (`btn.ok`) are
//! accepted too, which is how a flattened document keeps imported definitions
//! apart; a name shaped like a registration key is not.

use indexmap::IndexMap ;
use serde_yaml::{ Mapping, Value };
use thiserror::Error ;

use crate::key::RegistrationKey ;
use crate::resolver::ResolveError ;
use crate::source::DocumentId ;



/// Dotted position of a node within its document, e.g. `widgets.sidebar`.
#[derive( Clone, Debug, PartialEq, Eq, Hash )]
pub struct NodePath( String );

impl NodePath {
	pub fn root( segment: &str ) -> Self { Self( segment.to_string() )}
	pub fn child( &self, segment: impl std::fmt::Display ) -> Self { Self( format!( "{}.{}", self.0, segment ))}
	#[inline] pub fn as_str( &self ) -> &str { &self.0 }
}

impl std::fmt::Display for NodePath {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { f.write_str( &self.0 )}
}

/// Non-fatal findings made while parsing or resolving.
#[derive( Clone, Debug, PartialEq, Eq, Error )]
pub enum Warning {
	#[error( "Unknown top-level key '{key}' in '{document}' ignored" )]
	UnknownKey { document: DocumentId, key: String },
}

/// The entry point: window title and root widget.
#[derive( Clone, Debug, PartialEq )]
pub struct AppNode {
	pub title: Option<String>,
	/// The root widget; its path is `app`.
	pub root: WidgetNode,
}

/// A widget instance in the document.
#[derive( Clone, Debug, PartialEq )]
pub struct WidgetNode {
	pub path: NodePath,
	/// A registration key (`ns.widget.name`) or the name of a widget binding.
	pub widget: String,
	/// Name of the data node the widget is bound to.
	pub data: Option<String>,
	/// Every other key of the node.
	pub params: Mapping,
	pub children: Vec<WidgetNode>,
}

impl WidgetNode {
	/// Number of widget nodes in this subtree, this one included.
	pub fn subtree_len( &self ) -> usize {
		1 + self.children.iter().map( WidgetNode::subtree_len ).sum::<usize>()
	}

	fn collect<'a>( &'a self, nodes: &mut Vec<DocumentNode<'a>> ) {
		nodes.push( DocumentNode::Widget( self ));
		self.children.iter().for_each(| child | child.collect( nodes ));
	}
}

/// Where a data node's value comes from.
#[derive( Clone, Debug, PartialEq )]
pub enum DataSource {
	/// A value written in the document.
	Literal( Value ),
	/// A registered data provider invoked with `args`.
	Provider { key: RegistrationKey, args: Mapping },
}

/// A named data definition.
#[derive( Clone, Debug, PartialEq )]
pub struct DataNode {
	pub path: NodePath,
	pub source: DataSource,
}

/// An `import:` entry.
#[derive( Clone, Debug, PartialEq, Eq )]
pub struct ImportNode {
	pub path: NodePath,
	/// Module id, dotted module name or relative file path.
	pub target: String,
	/// When set, the imported definitions are only visible as `<prefix>.<name>`.
	pub prefix: Option<String>,
}

/// Any node of a document.
#[derive( Clone, Copy, Debug )]
pub enum DocumentNode<'a> {
	App( &'a AppNode ),
	Widget( &'a WidgetNode ),
	Data( &'a DataNode ),
	Import( &'a ImportNode ),
}

impl DocumentNode<'_> {
	pub fn path( &self ) -> &NodePath {
		match self {
			Self::App( app ) => &app.root.path,
			Self::Widget( widget ) => &widget.path,
			Self::Data( data ) => &data.path,
			Self::Import( import ) => &import.path,
		}
	}
}

/// A parsed document.
#[derive( Clone, Debug, PartialEq )]
pub struct Document {
	id: DocumentId,
	app: Option<AppNode>,
	widgets: IndexMap<String, WidgetNode>,
	data: IndexMap<String, DataNode>,
	imports: Vec<ImportNode>,
	warnings: Vec<Warning>,
}

impl Document {

	/// Parses YAML text.
	///
	/// # Errors
	/// Returns every malformed node found, or the YAML syntax error.
	pub fn parse( id: DocumentId, text: &str ) -> Result<Self, Vec<ResolveError>> {
		let value = serde_yaml::from_str::<Value>( text )
			.map_err(| err | vec![ ResolveError::Yaml { document: id.clone(), message: err.to_string() }])?;
		Self::from_value( id, value )
	}

	/// Converts an already parsed YAML tree. An empty document is valid.
	///
	/// # Errors
	/// Returns every malformed node found.
	pub fn from_value( id: DocumentId, value: Value ) -> Result<Self, Vec<ResolveError>> {

		let top = match value {
			Value::Mapping( top ) => top,
			Value::Null => Mapping::new(),
			_ => return Err( vec![ ResolveError::InvalidNode {
				document: id,
				path: String::new(),
				reason: "a document must be a mapping".to_string(),
			}]),
		};

		let mut parser = Parser { document: &id, errors: Vec::new() };
		let mut app = None ;
		let mut widgets = IndexMap::new();
		let mut data = IndexMap::new();
		let mut imports = Vec::new();
		let mut warnings = Vec::new();

		for ( key, value ) in top {
			match key.as_str() {
				Some( "import" ) => imports = parser.imports( value ),
				Some( "app" ) => app = parser.app( value ),
				Some( "widgets" ) => widgets = parser.named( &NodePath::root( "widgets" ), value, Parser::widget ),
				Some( "data" ) => data = parser.named( &NodePath::root( "data" ), value, Parser::data ),
				Some( other ) => {
					tracing::warn!( document = %id, key = other, "ignoring unknown top-level key" );
					warnings.push( Warning::UnknownKey { document: id.clone(), key: other.to_string() });
				},
				None => parser.invalid( "", format!( "non-string top-level key {:?}", key )),
			}
		}

		let errors = parser.errors ;
		match errors.is_empty() {
			true => Ok( Self { id, app, widgets, data, imports, warnings }),
			false => Err( errors ),
		}

	}

	#[inline] pub fn id( &self ) -> &DocumentId { &self.id }
	#[inline] pub fn app( &self ) -> Option<&AppNode> { self.app.as_ref() }
	#[inline] pub fn widgets( &self ) -> &IndexMap<String, WidgetNode> { &self.widgets }
	#[inline] pub fn data( &self ) -> &IndexMap<String, DataNode> { &self.data }
	#[inline] pub fn imports( &self ) -> &[ImportNode] { &self.imports }
	#[inline] pub fn warnings( &self ) -> &[Warning] { &self.warnings }

	/// Every node in document order: imports, app, widget bindings, data.
	pub fn nodes( &self ) -> Vec<DocumentNode<'_>> {
		let mut nodes = self.imports.iter().map( DocumentNode::Import ).collect::<Vec<_>>();
		if let Some( app ) = &self.app {
			nodes.push( DocumentNode::App( app ));
			app.root.collect( &mut nodes );
		}
		self.widgets.values().for_each(| widget | widget.collect( &mut nodes ));
		nodes.extend( self.data.values().map( DocumentNode::Data ));
		nodes
	}

	/// Number of widget and data nodes.
	pub fn node_count( &self ) -> usize {
		self.nodes().iter()
			.filter(| node | matches!( node, DocumentNode::Widget( _ ) | DocumentNode::Data( _ )))
			.count()
	}
}

struct Parser<'a> {
	document: &'a DocumentId,
	errors: Vec<ResolveError>,
}

impl Parser<'_> {

	fn invalid( &mut self, path: impl ToString, reason: impl Into<String> ) {
		self.errors.push( ResolveError::InvalidNode {
			document: self.document.clone(),
			path: path.to_string(),
			reason: reason.into(),
		});
	}

	fn missing( &mut self, path: &NodePath, field: &str ) {
		self.errors.push( ResolveError::MissingRequiredField {
			document: self.document.clone(),
			path: path.to_string(),
			field: field.to_string(),
		});
	}

	fn string( &mut self, path: &NodePath, value: Value ) -> Option<String> {
		match value {
			Value::String( string ) => Some( string ),
			other => {
				self.invalid( path, format!( "expected a string, found {:?}", other ));
				None
			},
		}
	}

	fn imports( &mut self, value: Value ) -> Vec<ImportNode> {
		let path = NodePath::root( "import" );
		match value {
			Value::Null => Vec::new(),
			Value::Sequence( entries ) => entries.into_iter().enumerate()
				.filter_map(|( index, entry )| self.import( path.child( index ), entry ))
				.collect(),
			entry => self.import( path, entry ).into_iter().collect(),
		}
	}

	fn import( &mut self, path: NodePath, value: Value ) -> Option<ImportNode> {
		match value {
			Value::String( target ) => Some( ImportNode { path, target, prefix: None }),
			Value::Mapping( mut entry ) => {
				let target = match entry.remove( "module" ) {
					Some( target ) => self.string( &path.child( "module" ), target ),
					None => {
						self.missing( &path, "module" );
						None
					},
				};
				let prefix = entry.remove( "as" ).and_then(| prefix | self.string( &path.child( "as" ), prefix ));
				if let Some( prefix ) = prefix.as_ref().filter(| prefix | prefix.is_empty() || prefix.contains( '.' )) {
					self.invalid( path.child( "as" ), format!( "invalid prefix '{}'", prefix ));
				}
				entry.keys().for_each(| key | self.invalid( &path, format!( "unexpected key {:?}", key )));
				Some( ImportNode { path, target: target?, prefix })
			},
			other => {
				self.invalid( &path, format!( "expected a module name or mapping, found {:?}", other ));
				None
			},
		}
	}

	fn app( &mut self, value: Value ) -> Option<AppNode> {
		let path = NodePath::root( "app" );
		let Value::Mapping( mut app ) = value else {
			self.invalid( &path, "'app' must be a mapping" );
			return None ;
		};
		let title = app.remove( "title" ).and_then(| title | self.string( &path.child( "title" ), title ));
		let root = self.widget( path, Value::Mapping( app ))?;
		Some( AppNode { title, root })
	}

	/// Parses a mapping of named definitions, e.g. `widgets:` or `data:`.
	fn named<T>(
		&mut self,
		path: &NodePath,
		value: Value,
		parse: fn( &mut Self, NodePath, Value ) -> Option<T>,
	) -> IndexMap<String, T> {
		let entries = match value {
			Value::Null => return IndexMap::new(),
			Value::Mapping( entries ) => entries,
			other => {
				self.invalid( path, format!( "expected a mapping, found {:?}", other ));
				return IndexMap::new();
			},
		};
		entries.into_iter()
			.filter_map(|( name, value )| {
				let name = match name {
					Value::String( name ) if valid_name( &name ) => name,
					other => {
						self.invalid( path, format!( "invalid name {:?}: expected non-empty dot-separated segments, not a registration key", other ));
						return None ;
					},
				};
				parse( self, path.child( &name ), value ).map(| node | ( name, node ))
			})
			.collect()
	}

	fn widget( &mut self, path: NodePath, value: Value ) -> Option<WidgetNode> {
		let mut node = match value {
			Value::String( widget ) => return Some( WidgetNode {
				path,
				widget,
				data: None,
				params: Mapping::new(),
				children: Vec::new(),
			}),
			Value::Mapping( node ) => node,
			other => {
				self.invalid( &path, format!( "expected a widget node, found {:?}", other ));
				return None ;
			},
		};

		let widget = match node.remove( "widget" ) {
			Some( widget ) => self.string( &path.child( "widget" ), widget ),
			None => {
				self.missing( &path, "widget" );
				None
			},
		};
		let data = node.remove( "data" ).and_then(| data | self.string( &path.child( "data" ), data ));
		let children = match node.remove( "children" ) {
			None | Some( Value::Null ) => Vec::new(),
			Some( Value::Sequence( children )) => children.into_iter().enumerate()
				.filter_map(|( index, child )| self.widget( path.child( "children" ).child( index ), child ))
				.collect(),
			Some( other ) => {
				self.invalid( path.child( "children" ), format!( "expected a list, found {:?}", other ));
				Vec::new()
			},
		};

		Some( WidgetNode { path, widget: widget?, data, params: node, children })
	}

	fn data( &mut self, path: NodePath, value: Value ) -> Option<DataNode> {
		let mut node = match value {
			Value::Mapping( node ) if node.contains_key( "provider" ) => node,
			literal => return Some( DataNode { path, source: DataSource::Literal( literal )}),
		};

		let key = node.remove( "provider" )
			.and_then(| key | self.string( &path.child( "provider" ), key ))
			.and_then(| key | match key.parse::<RegistrationKey>() {
				Ok( key ) => Some( key ),
				Err( err ) => {
					self.invalid( path.child( "provider" ), err.to_string() );
					None
				},
			});
		let args = match node.remove( "args" ) {
			None | Some( Value::Null ) => Mapping::new(),
			Some( Value::Mapping( args )) => args,
			Some( other ) => {
				self.invalid( path.child( "args" ), format!( "expected a mapping, found {:?}", other ));
				Mapping::new()
			},
		};
		node.keys().for_each(| key | self.invalid( &path, format!( "unexpected key {:?}", key )));

		Some( DataNode { path, source: DataSource::Provider { key: key?, args }})
	}
}

/// A bare or qualified definition name.
fn valid_name( name: &str ) -> bool {
	name.split( '.' ).all(| segment | !segment.is_empty() ) && !RegistrationKey::looks_like_key( name )
}

#[cfg( test )]
mod tests {
	use super::* ;

	fn parse( text: &str ) -> Result<Document, Vec<ResolveError>> {
		Document::parse( DocumentId::module( "test" ), text )
	}

	#[test]
	fn parses_sections_with_paths() {
		let document = parse( r#"
import: [ common, { module: widgets.buttons, as: btn }]
app:
  title: Demo
  widget: demo.widget.window
  children:
    - demo.widget.separator
    - { widget: sidebar, data: items, width: 200 }
widgets:
  sidebar: { widget: demo.widget.panel }
data:
  items: [ a, b ]
  clock: { provider: demo.data.clock, args: { format: short }}
"# ).unwrap();

		let app = document.app().unwrap();
		assert_eq!( app.title.as_deref(), Some( "Demo" ));
		assert_eq!( app.root.path.as_str(), "app" );
		assert_eq!( app.root.children[1].path.as_str(), "app.children.1" );
		assert_eq!( app.root.children[1].data.as_deref(), Some( "items" ));
		assert_eq!( app.root.children[1].params.get( "width" ), Some( &Value::from( 200 )));
		assert_eq!( document.widgets()["sidebar"].path.as_str(), "widgets.sidebar" );
		assert_eq!( document.imports()[1].prefix.as_deref(), Some( "btn" ));
		assert!( matches!( &document.data()["clock"].source, DataSource::Provider { key, .. } if key.name() == "clock" ));
		assert_eq!( document.node_count(), 6 );
	}

	#[test]
	fn import_may_be_a_single_string() {
		let document = parse( "import: common" ).unwrap();
		assert_eq!( document.imports().len(), 1 );
		assert_eq!( document.imports()[0].target, "common" );
	}

	#[test]
	fn unknown_keys_are_warnings() {
		let document = parse( "theme: dark\ndata: { x: 1 }" ).unwrap();
		assert_eq!( document.warnings(), &[ Warning::UnknownKey {
			document: DocumentId::module( "test" ),
			key: "theme".to_string(),
		}]);
	}

	#[test]
	fn collects_every_malformed_node() {
		let errors = parse( r#"
widgets:
  a: { data: x }
  b: 42
  demo.widget.c: demo.widget.label
data:
  c: { provider: not-a-key }
"# ).unwrap_err();
		let paths = errors.iter()
			.map(| err | match err {
				ResolveError::InvalidNode { path, .. } => path.as_str(),
				ResolveError::MissingRequiredField { path, field, .. } if field == "widget" => path.as_str(),
				other => panic!( "Expected InvalidNode or MissingRequiredField, found: {:?}", other ),
			})
			.collect::<Vec<_>>();
		assert_eq!( paths, vec![ "widgets.a", "widgets.b", "widgets", "data.c.provider" ]);
	}

	#[test]
	fn qualified_names_are_definitions() {
		let document = parse( "widgets: { btn.ok: demo.widget.button }\ndata: { btn.clicks: 0 }" ).unwrap();
		assert_eq!( document.widgets()["btn.ok"].path.as_str(), "widgets.btn.ok" );
		assert!( document.data().contains_key( "btn.clicks" ));
		assert!( parse( "widgets: { btn..ok: demo.widget.button }" ).is_err() );
	}
}
