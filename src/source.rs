//! Where documents come from.
//!
//! A [`DocumentSource`] turns an import reference into a [`DocumentId`] and a
//! [`DocumentId`] into YAML text. References are tried in this order:
//!
//! 1. a module registered in memory under exactly that id;
//! 2. an explicit file (`*.yaml` / `*.yml`), relative to the importing document's
//! 	directory, then to each search path;
//! 3. a dotted module name (`widgets.buttons` → `widgets/buttons.yaml`), looked up
//! 	in the importing document's directory, then in each search path in order.

use std::collections::HashMap ;
use std::path::{ Path, PathBuf };

use crate::resolver::ResolveError ;



/// Identity of a loaded document.
#[derive( Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub enum DocumentId {
	/// A document registered in memory.
	Module( String ),
	/// A document read from disk. Paths are canonicalised where possible so the
	/// same file reached through different relative paths has one identity.
	File( PathBuf ),
}

impl DocumentId {
	pub fn module( id: impl Into<String> ) -> Self { Self::Module( id.into() )}
	pub fn file( path: impl AsRef<Path> ) -> Self {
		let path = path.as_ref();
		Self::File( path.canonicalize().unwrap_or_else(|_| path.to_path_buf() ))
	}

	/// Directory relative imports are resolved against.
	fn directory( &self ) -> Option<&Path> {
		match self {
			Self::Module( _ ) => None,
			Self::File( path ) => path.parent(),
		}
	}
}

impl std::fmt::Display for DocumentId {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		match self {
			Self::Module( id ) => f.write_str( id ),
			Self::File( path ) => write!( f, "{}", path.display() ),
		}
	}
}

/// In-memory modules plus an ordered list of search paths.
#[derive( Clone, Debug, Default )]
pub struct DocumentSource {
	modules: HashMap<String, String>,
	search_paths: Vec<PathBuf>,
}

impl DocumentSource {

	pub fn new() -> Self { Self::default() }

	/// Registers `text` as the module `id`. Registered modules shadow files.
	pub fn with_module( mut self, id: impl Into<String>, text: impl Into<String> ) -> Self {
		self.add_module( id, text );
		self
	}

	pub fn add_module( &mut self, id: impl Into<String>, text: impl Into<String> ) {
		self.modules.insert( id.into(), text.into() );
	}

	pub fn with_search_path( mut self, path: impl Into<PathBuf> ) -> Self {
		self.add_search_path( path );
		self
	}

	/// Appends a search path unless it is already configured.
	pub fn add_search_path( &mut self, path: impl Into<PathBuf> ) {
		let path = path.into();
		if !self.search_paths.contains( &path ) { self.search_paths.push( path ); }
	}

	#[inline] pub fn search_paths( &self ) -> &[PathBuf] { &self.search_paths }
	#[inline] pub fn has_module( &self, id: &str ) -> bool { self.modules.contains_key( id )}

	/// Checks that every search path exists and is a directory.
	///
	/// # Errors
	/// Returns one [`ResolveError::InvalidSearchPath`] per offending path.
	pub fn validate( &self ) -> Result<(), Vec<ResolveError>> {
		let errors = self.search_paths.iter()
			.filter_map(| path | match std::fs::metadata( path ) {
				Ok( metadata ) if metadata.is_dir() => None,
				Ok( _ ) => Some( ResolveError::InvalidSearchPath { path: path.clone(), reason: "not a directory".to_string() }),
				Err( err ) => Some( ResolveError::InvalidSearchPath { path: path.clone(), reason: err.to_string() }),
			})
			.collect::<Vec<_>>();
		match errors.is_empty() {
			true => Ok(()),
			false => Err( errors ),
		}
	}

	/// Maps an import reference to a document identity.
	///
	/// # Errors
	/// Returns [`ResolveError::ModuleNotFound`] if no candidate exists.
	pub fn locate( &self, reference: &str, importer: Option<&DocumentId> ) -> Result<DocumentId, ResolveError> {

		if self.modules.contains_key( reference ) {
			return Ok( DocumentId::Module( reference.to_string() ));
		}

		let relative = match is_file_reference( reference ) {
			true => PathBuf::from( reference ),
			false => PathBuf::from( format!( "{}.yaml", reference.replace( '.', "/" ))),
		};

		if relative.is_absolute() {
			return match relative.is_file() {
				true => Ok( DocumentId::file( relative )),
				false => Err( not_found( reference, importer )),
			};
		}

		importer.and_then( DocumentId::directory )
			.into_iter()
			.chain( self.search_paths.iter().map( PathBuf::as_path ))
			.map(| directory | directory.join( &relative ))
			.find(| candidate | candidate.is_file() )
			.map( DocumentId::file )
			.ok_or_else(|| not_found( reference, importer ))

	}

	/// Reads the YAML text of a document.
	///
	/// # Errors
	/// Fails if a module id is unknown or a file cannot be read.
	pub fn read( &self, id: &DocumentId ) -> Result<String, ResolveError> {
		match id {
			DocumentId::Module( module ) => self.modules.get( module ).cloned()
				.ok_or_else(|| ResolveError::ModuleNotFound { reference: module.clone(), importer: None }),
			DocumentId::File( path ) => std::fs::read_to_string( path )
				.map_err(| err | ResolveError::Io { document: id.clone(), message: err.to_string() }),
		}
	}
}

fn is_file_reference( reference: &str ) -> bool {
	Path::new( reference ).extension()
		.is_some_and(| extension | extension == "yaml" || extension == "yml" )
}

fn not_found( reference: &str, importer: Option<&DocumentId> ) -> ResolveError {
	ResolveError::ModuleNotFound { reference: reference.to_string(), importer: importer.cloned() }
}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn registered_module_wins_over_files() {
		let source = DocumentSource::new().with_module( "widgets.buttons", "widgets: {}" );
		assert_eq!(
			source.locate( "widgets.buttons", None ).unwrap(),
			DocumentId::module( "widgets.buttons" ),
		);
	}

	#[test]
	fn unknown_reference_names_importer() {
		let source = DocumentSource::new();
		let importer = DocumentId::module( "main" );
		match source.locate( "missing.module", Some( &importer )) {
			Err( ResolveError::ModuleNotFound { reference, importer: Some( found )}) => {
				assert_eq!( reference, "missing.module" );
				assert_eq!( found, importer );
			},
			other => panic!( "Expected ModuleNotFound, found: {:?}", other ),
		}
	}

	#[test]
	fn dotted_name_maps_to_nested_file() {
		let root = tempfile::tempdir().unwrap();
		std::fs::create_dir( root.path().join( "widgets" )).unwrap();
		std::fs::write( root.path().join( "widgets/buttons.yaml" ), "widgets: {}" ).unwrap();
		let source = DocumentSource::new().with_search_path( root.path() );
		assert_eq!(
			source.locate( "widgets.buttons", None ).unwrap(),
			DocumentId::file( root.path().join( "widgets/buttons.yaml" )),
		);
	}

	#[test]
	fn validate_rejects_missing_directory() {
		let root = tempfile::tempdir().unwrap();
		let source = DocumentSource::new()
			.with_search_path( root.path() )
			.with_search_path( root.path().join( "absent" ));
		let errors = source.validate().unwrap_err();
		assert_eq!( errors.len(), 1 );
		assert!( matches!( &errors[0], ResolveError::InvalidSearchPath { path, .. } if path.ends_with( "absent" )));
	}
}
