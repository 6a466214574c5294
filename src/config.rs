//! Host configuration.
//!
//! [`Settings`] collects everything a host decides up front: where documents are
//! searched for, which document is the entry point, how duplicate registrations
//! and failing plugins are treated. It can be built in code or read from YAML:
//!
//! ```yaml
//! search_paths: [ layouts, vendor/layouts ]
//! main: demo
//! duplicate_policy: override
//! fail_fast: false
//! module_timeout_ms: 2000
//! ```

use std::path::{ Path, PathBuf };
use std::time::Duration ;
use serde::Deserialize ;
use thiserror::Error ;

use crate::discovery::DiscoveryOptions ;
use crate::registry::DuplicatePolicy ;
use crate::source::DocumentSource ;



/// Errors raised while reading [`Settings`].
#[derive( Debug, Error )]
pub enum SettingsError {
	#[error( "Failed to read settings file '{}': {source}", path.display() )]
	Io { path: PathBuf, source: std::io::Error },
	#[error( "Invalid settings: {0}" )]
	Yaml( #[from] serde_yaml::Error ),
}

/// Host configuration. Every field has a default.
#[derive( Clone, Debug, PartialEq, Eq, Deserialize )]
#[serde( default, deny_unknown_fields )]
pub struct Settings {
	/// Directories searched for imported modules and the main document, in order.
	pub search_paths: Vec<PathBuf>,
	/// Name of the entry document, as a module name.
	pub main: String,
	/// What happens when a key is registered twice.
	pub duplicate_policy: DuplicatePolicy,
	/// Stop plugin discovery at the first failing module.
	pub fail_fast: bool,
	/// Per-module import limit during discovery; `None` imports inline without a limit.
	pub module_timeout_ms: Option<u64>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			search_paths: Vec::new(),
			main: "app".to_string(),
			duplicate_policy: DuplicatePolicy::Reject,
			fail_fast: false,
			module_timeout_ms: Some( 5000 ),
		}
	}
}

impl Settings {

	pub fn new() -> Self { Self::default() }

	/// # Errors
	/// Fails on invalid YAML or unknown keys.
	pub fn from_yaml_str( text: &str ) -> Result<Self, SettingsError> {
		Ok( serde_yaml::from_str( text )? )
	}

	/// Reads settings from a YAML file. Relative search paths are taken relative
	/// to the file's directory.
	///
	/// # Errors
	/// Fails if the file cannot be read or is invalid.
	pub fn from_file( path: impl AsRef<Path> ) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string( path )
			.map_err(| source | SettingsError::Io { path: path.to_path_buf(), source })?;
		let mut settings = Self::from_yaml_str( &text )?;
		if let Some( directory ) = path.parent() {
			settings.search_paths = settings.search_paths.into_iter()
				.map(| search_path | match search_path.is_relative() {
					true => directory.join( search_path ),
					false => search_path,
				})
				.collect();
		}
		Ok( settings )
	}

	pub fn with_search_path( mut self, path: impl Into<PathBuf> ) -> Self {
		self.search_paths.push( path.into() );
		self
	}

	pub fn with_main( mut self, main: impl Into<String> ) -> Self {
		self.main = main.into();
		self
	}

	pub fn with_duplicate_policy( mut self, policy: DuplicatePolicy ) -> Self {
		self.duplicate_policy = policy ;
		self
	}

	pub fn with_fail_fast( mut self, fail_fast: bool ) -> Self {
		self.fail_fast = fail_fast ;
		self
	}

	pub fn with_module_timeout( mut self, timeout: Option<Duration> ) -> Self {
		self.module_timeout_ms = timeout.map(| timeout | u64::try_from( timeout.as_millis() ).unwrap_or( u64::MAX ));
		self
	}

	pub fn discovery_options( &self ) -> DiscoveryOptions {
		DiscoveryOptions {
			fail_fast: self.fail_fast,
			module_timeout: self.module_timeout_ms.map( Duration::from_millis ),
		}
	}

	/// A document source searching [`Settings::search_paths`].
	pub fn document_source( &self ) -> DocumentSource {
		self.search_paths.iter().cloned().fold( DocumentSource::new(), DocumentSource::with_search_path )
	}
}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn defaults_fill_missing_fields() {
		let settings = Settings::from_yaml_str( "main: demo" ).unwrap();
		assert_eq!( settings.main, "demo" );
		assert_eq!( settings.duplicate_policy, DuplicatePolicy::Reject );
		assert_eq!( settings.discovery_options(), DiscoveryOptions {
			fail_fast: false,
			module_timeout: Some( Duration::from_secs( 5 )),
		});
	}

	#[test]
	fn rejects_unknown_fields() {
		assert!( matches!( Settings::from_yaml_str( "mian: demo" ), Err( SettingsError::Yaml( _ ))));
	}

	#[test]
	fn parses_policy_and_timeout() {
		let settings = Settings::from_yaml_str( "duplicate_policy: override\nmodule_timeout_ms: ~" ).unwrap();
		assert_eq!( settings.duplicate_policy, DuplicatePolicy::Override );
		assert_eq!( settings.discovery_options().module_timeout, None );
	}
}
