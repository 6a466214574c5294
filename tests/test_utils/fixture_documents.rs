/// Declares a `fixtures` module for a test case whose YAML documents live in a
/// directory named after the case file (`tests/<group>/<case>/`).
#[macro_export]
macro_rules! fixtures {

	{ const ROOT = $root:literal ; } => ( mod fixtures {

		pub const ROOT: &'static str = $root ;

		/// The case's fixture directory.
		pub fn dir() -> std::path::PathBuf {
			std::path::PathBuf::from( env!( "CARGO_MANIFEST_DIR" ))
				.join( $crate::fixture_documents::strip_rs( file!() ))
		}

		/// A source searching the fixture directory.
		pub fn source() -> imery::DocumentSource {
			imery::DocumentSource::new().with_search_path( dir() )
		}

		/// The root document.
		pub fn entry() -> imery::DocumentId {
			imery::DocumentId::file( dir().join( format!( "{}.yaml", ROOT )))
		}

	});

}

mod fixture_documents {

	pub const fn strip_rs( path: &'static str ) -> &'static str {
		match path.as_bytes() {
			[rest @ .., b'.', b'r', b's'] => {
				// SAFETY: the last three bytes are ".rs", so the split is at a UTF-8 boundary.
				unsafe { core::str::from_utf8_unchecked( rest ) }
			}
			_ => unreachable!(),
		}
	}

	/// File stem of a file document, or the id of a module document.
	pub fn short_name( id: &imery::DocumentId ) -> String {
		match id {
			imery::DocumentId::Module( id ) => id.clone(),
			imery::DocumentId::File( path ) => path.file_stem()
				.map(| stem | stem.to_string_lossy().into_owned() )
				.unwrap_or_default(),
		}
	}
}
