//! Error types for alias loader configuration.

use std::path::PathBuf;

use alias_loader::ErrorCode;
use thiserror::Error;

/// Non-fatal issues found while reading a package's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
	/// The whole options section was found under the retired section name.
	DeprecatedSection {
		/// Name of the package declaring the section.
		package: String,
	},
	/// An option was found at the top level of the package's extra data.
	DeprecatedTopLevelKey {
		/// Name of the package declaring the option.
		package: String,
		/// The option key.
		key: &'static str,
	},
}

impl std::fmt::Display for ConfigWarning {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ConfigWarning::DeprecatedSection { package } => write!(
				f,
				"package \"{package}\" uses the \"{}\" section, which is deprecated; use \"{}\" instead",
				crate::DEPRECATED_SECTION,
				crate::SECTION
			),
			ConfigWarning::DeprecatedTopLevelKey { package, key } => write!(
				f,
				"package \"{package}\" sets \"{key}\" on top level, which is deprecated; move it below \"{}\"",
				crate::SECTION
			),
		}
	}
}

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A lookup was made with an empty key.
	#[error("configuration key must not be empty")]
	EmptyKey,

	/// Error reading or writing a map file.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path to the file that failed.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A map file is not valid JSON or has the wrong shape.
	#[error("JSON error in {path}: {error}")]
	Json {
		/// Path to the offending file.
		path: PathBuf,
		/// The underlying parse error.
		error: serde_json::Error,
	},

	/// A package map file does not hold a JSON object.
	#[error("class alias map {path} must hold an object of alias to class name")]
	InvalidPackageMap {
		/// Path to the offending file.
		path: PathBuf,
	},
}

/// Code of [`ConfigError::InvalidPackageMap`].
pub const INVALID_PACKAGE_MAP_CODE: u32 = 1422625075;

impl ConfigError {
	/// Stable numeric code, for errors that carry one.
	pub fn code(&self) -> Option<u32> {
		match self {
			ConfigError::EmptyKey => Some(ErrorCode::EmptyKey.as_u32()),
			ConfigError::InvalidPackageMap { .. } => Some(INVALID_PACKAGE_MAP_CODE),
			_ => None,
		}
	}
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
