//! The render driver.
//!
//! Drawing itself belongs to an immediate-mode GUI library, reached through the
//! [`Backend`] trait. The [`RenderDriver`] connects a resolved document to it:
//! it instantiates one widget handle per resolved node when it starts, then on
//! every [`RenderDriver::frame`] refreshes the data providers and walks the handles
//! in tree order.
//!
//! A driver only starts against a successfully resolved document. If the last
//! load failed it refuses, returning the full error list; a partial tree is never
//! drawn.

use std::collections::HashSet ;
use thiserror::Error ;

use crate::app::Imery ;
use crate::dispatch::dispatch ;
use crate::outcome::{ ErrorKind, Failure };
use crate::registration::{ Args, CallError, Widget, WidgetBinding };
use crate::resolver::ResolveErrors ;
use crate::tree::{ DataSlot, ResolvedTree, ResolvedWidget, WidgetTarget };



/// The drawing primitives widgets use.
pub trait Backend {
	fn text( &mut self, text: &str );
	/// Draws a button; returns true if it was clicked this frame.
	fn button( &mut self, label: &str ) -> bool ;
	/// Opens a container; closed by [`Backend::end`].
	fn begin( &mut self, id: &str );
	fn end( &mut self );
}

/// A headless backend recording every call, one string per call.
///
/// Buttons report a click when their label was [`RecordingBackend::press`]ed.
#[derive( Debug, Default, Clone )]
pub struct RecordingBackend {
	calls: Vec<String>,
	pressed: HashSet<String>,
}

impl RecordingBackend {

	pub fn new() -> Self { Self::default() }

	/// Makes the button labelled `label` report a click.
	pub fn press( mut self, label: impl Into<String> ) -> Self {
		self.pressed.insert( label.into() );
		self
	}

	#[inline] pub fn calls( &self ) -> &[String] { &self.calls }

	/// Returns the recorded calls and starts a new recording.
	pub fn take_calls( &mut self ) -> Vec<String> { std::mem::take( &mut self.calls )}
}

impl Backend for RecordingBackend {
	fn text( &mut self, text: &str ) { self.calls.push( format!( "text:{}", text )); }
	fn button( &mut self, label: &str ) -> bool {
		self.calls.push( format!( "button:{}", label ));
		self.pressed.contains( label )
	}
	fn begin( &mut self, id: &str ) { self.calls.push( format!( "begin:{}", id )); }
	fn end( &mut self ) { self.calls.push( "end".to_string() ); }
}

/// Errors raised by the render driver.
#[derive( Debug, Error )]
pub enum RenderError {
	#[error( "Refusing to render: no document was loaded" )]
	NotLoaded,
	#[error( "Refusing to render: {0}" )]
	Unresolved( ResolveErrors ),
	#[error( "Widget at '{path}' could not be built: {source}" )]
	Build { path: String, source: Failure },
	#[error( "Widget at '{path}' failed to draw: {source}" )]
	Draw { path: String, source: CallError },
}

/// A widget handle instantiated for one resolved node. Binding references have
/// no handle of their own; the binding's subtree is mounted as their first child.
#[derive( Debug )]
struct Mounted {
	path: String,
	handle: Option<Box<dyn Widget>>,
	data: Option<String>,
	children: Vec<Mounted>,
}

fn mount( tree: &ResolvedTree, widget: &ResolvedWidget ) -> Result<Mounted, RenderError> {

	let path = widget.path().to_string();
	let children = widget.children().iter().map(| child | mount( tree, child ));

	match widget.target() {
		WidgetTarget::Registered { key, factory } => {
			let handle = dispatch( key, None, Args::from_named( widget.params().clone() ), | args | {
				factory.build( WidgetBinding { params: args.named(), data: widget.data() })
			}).map_err(| source | RenderError::Build { path: path.clone(), source })?;
			Ok( Mounted {
				path,
				handle: Some( handle ),
				data: widget.data().map( str::to_string ),
				children: children.collect::<Result<_, _>>()?,
			})
		},
		WidgetTarget::Binding( name ) => {
			let binding = tree.binding( name ).ok_or_else(|| RenderError::Build {
				path: path.clone(),
				source: Failure::new( ErrorKind::NotFound, format!( "unknown binding '{}'", name )),
			})?;
			Ok( Mounted {
				path,
				handle: None,
				data: None,
				children: std::iter::once( mount( tree, binding )).chain( children ).collect::<Result<_, _>>()?,
			})
		},
	}

}

fn draw( mounted: &mut Mounted, tree: &mut ResolvedTree, ui: &mut dyn Backend ) -> Result<(), RenderError> {

	if let Some( handle ) = &mut mounted.handle {
		let data = mounted.data.as_deref().and_then(| name | tree.data_slot_mut( name )).map( DataSlot::value_mut );
		handle.render( ui, data ).map_err(| source | RenderError::Draw { path: mounted.path.clone(), source })?;
	}

	for child in &mut mounted.children {
		draw( child, tree, ui )?;
	}

	if let Some( handle ) = &mut mounted.handle {
		handle.render_end( ui ).map_err(| source | RenderError::Draw { path: mounted.path.clone(), source })?;
	}

	Ok(())

}

/// Drives a resolved document, one frame at a time.
pub struct RenderDriver<'a> {
	app: &'a mut Imery,
	root: Mounted,
	frames: u64,
}

impl<'a> RenderDriver<'a> {

	/// Instantiates the widget handles of `app`'s resolved tree.
	///
	/// # Errors
	/// - [`RenderError::Unresolved`] with every error if the last load failed.
	/// - [`RenderError::NotLoaded`] if nothing was loaded.
	/// - [`RenderError::Build`] if a widget factory rejects its node.
	pub fn new( app: &'a mut Imery ) -> Result<Self, RenderError> {
		let root = match ( app.tree(), app.resolution_errors() ) {
			( Some( tree ), _ ) => mount( tree, tree.root() )?,
			( None, Some( errors )) => {
				tracing::error!( errors = %errors, "refusing to render a document that failed to resolve" );
				return Err( RenderError::Unresolved( errors.clone() ));
			},
			( None, None ) => {
				tracing::error!( "refusing to render: no document loaded" );
				return Err( RenderError::NotLoaded );
			},
		};
		Ok( Self { app, root, frames: 0 })
	}

	#[inline] pub fn frames( &self ) -> u64 { self.frames }
	#[inline] pub fn app( &self ) -> &Imery { self.app }
	pub fn title( &self ) -> Option<&str> { self.app.tree().and_then( ResolvedTree::title )}

	/// Refreshes data providers and draws one frame.
	///
	/// A failing provider keeps its previous value and is logged; a failing
	/// widget aborts the frame.
	///
	/// # Errors
	/// Returns the first widget failure.
	pub fn frame( &mut self, ui: &mut dyn Backend ) -> Result<(), RenderError> {
		let tree = self.app.tree_mut().ok_or( RenderError::NotLoaded )?;
		for ( slot, err ) in tree.refresh_data() {
			tracing::warn!( slot = %slot, error = %err, "data provider failed, keeping previous value" );
		}
		draw( &mut self.root, tree, ui )?;
		self.frames += 1 ;
		Ok(())
	}
}
