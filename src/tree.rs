//! The resolved tree.
//!
//! A [`ResolvedTree`] is what the resolver produces and the render driver
//! consumes. Every reference in it has been bound: widget nodes point at a
//! registered factory or at a named binding, data references name a slot of
//! [`ResolvedTree::data`]. Bindings and data slots are stored once and referred to
//! by name, so a binding used from three places is still one node.
//!
//! The tree's shape never changes after resolution. Only data slot values do,
//! when [`ResolvedTree::refresh_data`] re-invokes their providers.

use std::collections::HashMap ;
use std::sync::Arc ;
use indexmap::IndexMap ;
use serde_yaml::{ Mapping, Value };

use crate::dispatch::dispatch ;
use crate::document::NodePath ;
use crate::key::RegistrationKey ;
use crate::outcome::Failure ;
use crate::registration::{ Args, DataProvider, WidgetFactory };



/// What a resolved widget node instantiates.
#[derive( Clone )]
pub enum WidgetTarget {
	/// A registered widget factory.
	Registered { key: RegistrationKey, factory: Arc<dyn WidgetFactory> },
	/// A widget binding, by its name in [`ResolvedTree::bindings`].
	Binding( String ),
}

impl WidgetTarget {
	pub fn key( &self ) -> Option<&RegistrationKey> {
		match self {
			Self::Registered { key, .. } => Some( key ),
			Self::Binding( _ ) => None,
		}
	}

	pub fn binding( &self ) -> Option<&str> {
		match self {
			Self::Registered { .. } => None,
			Self::Binding( name ) => Some( name ),
		}
	}
}

impl std::fmt::Debug for WidgetTarget {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Registered { key, .. } => f.debug_tuple( "Registered" ).field( &key.to_string() ).finish(),
			Self::Binding( name ) => f.debug_tuple( "Binding" ).field( name ).finish(),
		}
	}
}

/// A widget node with every reference bound.
#[derive( Clone, Debug )]
pub struct ResolvedWidget {
	pub(crate) path: NodePath,
	pub(crate) target: WidgetTarget,
	pub(crate) params: Mapping,
	pub(crate) data: Option<String>,
	pub(crate) children: Vec<ResolvedWidget>,
}

impl ResolvedWidget {
	#[inline] pub fn path( &self ) -> &NodePath { &self.path }
	#[inline] pub fn target( &self ) -> &WidgetTarget { &self.target }
	/// Parameters with schema defaults filled in.
	#[inline] pub fn params( &self ) -> &Mapping { &self.params }
	/// Name of the bound data slot.
	#[inline] pub fn data( &self ) -> Option<&str> { self.data.as_deref() }
	#[inline] pub fn children( &self ) -> &[ResolvedWidget] { &self.children }

	/// Number of widget nodes in this subtree, this one included.
	pub fn subtree_len( &self ) -> usize {
		1 + self.children.iter().map( ResolvedWidget::subtree_len ).sum::<usize>()
	}

	fn binding_references<'a>( &'a self, references: &mut Vec<&'a str> ) {
		references.extend( self.target.binding() );
		self.children.iter().for_each(| child | child.binding_references( references ));
	}
}

/// Where a data slot's value comes from.
#[derive( Clone )]
pub enum SlotSource {
	Literal,
	Provider { key: RegistrationKey, provider: Arc<dyn DataProvider>, args: Args },
}

impl std::fmt::Debug for SlotSource {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Literal => f.write_str( "Literal" ),
			Self::Provider { key, args, .. } => f.debug_struct( "Provider" )
				.field( "key", &key.to_string() )
				.field( "args", args )
				.finish(),
		}
	}
}

/// A data node and its current value.
#[derive( Clone, Debug )]
pub struct DataSlot {
	path: Option<NodePath>,
	source: SlotSource,
	value: Value,
}

impl DataSlot {

	pub(crate) fn literal( path: NodePath, value: Value ) -> Self {
		Self { path: Some( path ), source: SlotSource::Literal, value }
	}

	/// A provider slot. Its value stays `null` until the first refresh.
	pub(crate) fn provider( path: Option<NodePath>, key: RegistrationKey, provider: Arc<dyn DataProvider>, args: Args ) -> Self {
		Self { path, source: SlotSource::Provider { key, provider, args }, value: Value::Null }
	}

	/// Document path, or `None` for a slot created for a widget bound directly to
	/// a registered data provider.
	#[inline] pub fn path( &self ) -> Option<&NodePath> { self.path.as_ref() }
	#[inline] pub fn is_implicit( &self ) -> bool { self.path.is_none() }
	#[inline] pub fn source( &self ) -> &SlotSource { &self.source }
	#[inline] pub fn value( &self ) -> &Value { &self.value }
	#[inline] pub fn value_mut( &mut self ) -> &mut Value { &mut self.value }

	/// Re-invokes the provider, if any. A failed call keeps the previous value.
	///
	/// # Errors
	/// Returns the provider's error, or its panic, as a [`Failure`].
	pub fn refresh( &mut self ) -> Result<(), Failure> {
		if let SlotSource::Provider { key, provider, args } = &self.source {
			self.value = dispatch( key, None, args.clone(), | args | provider.provide( args ))?;
		}
		Ok(())
	}
}

/// The fully bound document set, ready to render.
#[derive( Clone, Debug )]
pub struct ResolvedTree {
	title: Option<String>,
	root: ResolvedWidget,
	bindings: IndexMap<String, ResolvedWidget>,
	data: IndexMap<String, DataSlot>,
}

impl ResolvedTree {

	pub(crate) fn new(
		title: Option<String>,
		root: ResolvedWidget,
		bindings: IndexMap<String, ResolvedWidget>,
		data: IndexMap<String, DataSlot>,
	) -> Self {
		Self { title, root, bindings, data }
	}

	#[inline] pub fn title( &self ) -> Option<&str> { self.title.as_deref() }
	#[inline] pub fn root( &self ) -> &ResolvedWidget { &self.root }
	#[inline] pub fn bindings( &self ) -> &IndexMap<String, ResolvedWidget> { &self.bindings }
	#[inline] pub fn binding( &self, name: &str ) -> Option<&ResolvedWidget> { self.bindings.get( name )}
	#[inline] pub fn data( &self ) -> &IndexMap<String, DataSlot> { &self.data }
	#[inline] pub fn data_slot( &self, name: &str ) -> Option<&DataSlot> { self.data.get( name )}
	#[inline] pub fn data_slot_mut( &mut self, name: &str ) -> Option<&mut DataSlot> { self.data.get_mut( name )}

	/// Number of widget and data nodes that came from documents. Slots created
	/// for widgets bound straight to a provider key are not counted.
	pub fn node_count( &self ) -> usize {
		self.root.subtree_len()
			+ self.bindings.values().map( ResolvedWidget::subtree_len ).sum::<usize>()
			+ self.data.values().filter(| slot | !slot.is_implicit() ).count()
	}

	/// Re-invokes every data provider. Returns the failures, keyed by slot name.
	pub fn refresh_data( &mut self ) -> Vec<( String, Failure )> {
		self.data.iter_mut()
			.filter_map(|( name, slot )| slot.refresh().err().map(| err | ( name.clone(), err )))
			.collect()
	}
}

/// Cycles among widget bindings, each listed as the names along the cycle with
/// the first name repeated at the end.
pub(crate) fn binding_cycles( bindings: &IndexMap<String, ResolvedWidget> ) -> Vec<Vec<String>> {

	enum Mark { Open, Done }

	fn visit<'a>(
		name: &'a str,
		bindings: &'a IndexMap<String, ResolvedWidget>,
		marks: &mut HashMap<&'a str, Mark>,
		stack: &mut Vec<&'a str>,
		cycles: &mut Vec<Vec<String>>,
	) {
		match marks.get( name ) {
			Some( Mark::Done ) => return,
			Some( Mark::Open ) => {
				let start = stack.iter().position(| open | *open == name ).unwrap_or( 0 );
				cycles.push( stack[start..].iter().chain( std::iter::once( &name )).map(| name | name.to_string() ).collect() );
				return ;
			},
			None => {},
		}
		let Some(( name, widget )) = bindings.get_key_value( name ) else { return };
		marks.insert( name, Mark::Open );
		stack.push( name );
		let mut references = Vec::new();
		widget.binding_references( &mut references );
		references.into_iter().for_each(| reference | visit( reference, bindings, marks, stack, cycles ));
		stack.pop();
		marks.insert( name, Mark::Done );
	}

	let mut marks = HashMap::new();
	let mut stack = Vec::new();
	let mut cycles = Vec::new();
	bindings.keys().for_each(| name | visit( name, bindings, &mut marks, &mut stack, &mut cycles ));
	cycles

}
