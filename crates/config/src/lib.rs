//! Package configuration for the alias loader.
//!
//! Packages declare their alias maps and loader options in the `extra` data of
//! their manifest:
//!
//! ```json
//! {
//!     "typo3/class-alias-loader": {
//!         "class-alias-maps": ["Migrations/ClassAliasMap.json"],
//!         "always-add-alias-loader": false,
//!         "autoload-case-sensitivity": true,
//!         "autoload-mode": "normal"
//!     }
//! }
//! ```
//!
//! [`Config`] reads that section, including the deprecated spellings older
//! packages still use. [`file`] handles per-package map files and the
//! consolidated map, and [`bootstrap`] decides whether to install the adapter
//! and does so.

use serde_json::{Map, Value};

pub mod bootstrap;
mod error;
pub mod file;

#[cfg(test)]
mod tests;

pub use bootstrap::{install, should_install};
pub use error::{ConfigError, ConfigWarning, INVALID_PACKAGE_MAP_CODE, Result};
pub use file::{AliasList, AliasMapFile, consolidate, gather, load_alias_map_file, load_package_map, write_alias_map_file};

/// Key of the options section in a package's extra data.
pub const SECTION: &str = "typo3/class-alias-loader";
/// Retired name of [`SECTION`].
pub const DEPRECATED_SECTION: &str = "helhum/class-alias-loader";

pub const OPTION_CLASS_ALIAS_MAPS: &str = "class-alias-maps";
pub const OPTION_ALWAYS_ADD_ALIAS_LOADER: &str = "always-add-alias-loader";
pub const OPTION_AUTOLOAD_CASE_SENSITIVITY: &str = "autoload-case-sensitivity";
pub const OPTION_AUTOLOAD_MODE: &str = "autoload-mode";

/// How the host is expected to drive the alias loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoloadMode {
	/// Aliases are resolved when requested.
	#[default]
	Normal,
	/// The host loads every alias eagerly.
	ForceAliasLoading,
}

impl AutoloadMode {
	pub fn as_str(self) -> &'static str {
		match self {
			AutoloadMode::Normal => "normal",
			AutoloadMode::ForceAliasLoading => "force-alias-loading",
		}
	}

	fn parse(value: &str) -> Option<Self> {
		match value {
			"normal" => Some(AutoloadMode::Normal),
			"force-alias-loading" => Some(AutoloadMode::ForceAliasLoading),
			_ => None,
		}
	}
}

#[derive(Clone, Copy)]
enum Cast {
	List,
	Bool,
	Text,
}

const OPTIONS: [(&str, Cast); 4] = [
	(OPTION_CLASS_ALIAS_MAPS, Cast::List),
	(OPTION_ALWAYS_ADD_ALIAS_LOADER, Cast::Bool),
	(OPTION_AUTOLOAD_CASE_SENSITIVITY, Cast::Bool),
	(OPTION_AUTOLOAD_MODE, Cast::Text),
];

/// Alias loader options of one package.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
	package: String,
	values: Map<String, Value>,
	warnings: Vec<ConfigWarning>,
}

impl Config {
	/// Options with nothing configured.
	pub fn new(package: impl Into<String>) -> Self {
		let mut values = Map::new();
		values.insert(OPTION_CLASS_ALIAS_MAPS.into(), Value::Null);
		values.insert(OPTION_ALWAYS_ADD_ALIAS_LOADER.into(), Value::Bool(false));
		values.insert(OPTION_AUTOLOAD_CASE_SENSITIVITY.into(), Value::Bool(true));
		values.insert(OPTION_AUTOLOAD_MODE.into(), Value::String(AutoloadMode::Normal.as_str().into()));
		Self {
			package: package.into(),
			values,
			warnings: Vec::new(),
		}
	}

	/// Reads options from the `extra` data of `package`.
	///
	/// Values are cast loosely: scalars given for `class-alias-maps` become a
	/// one-element list, and flags follow scripting truthiness. Keys set to
	/// `null` count as absent.
	pub fn from_extra(package: impl Into<String>, extra: &Value) -> Self {
		let mut config = Self::new(package);
		let section = config.effective_section(extra);

		for (key, cast) in OPTIONS {
			let Some(value) = section.get(key).filter(|v| !v.is_null()) else {
				continue;
			};
			let value = match cast {
				Cast::List => Value::Array(to_list(value)),
				Cast::Bool => Value::Bool(truthy(value)),
				Cast::Text => Value::String(to_text(value)),
			};
			config.values.insert(key.to_owned(), value);
		}

		for warning in &config.warnings {
			tracing::warn!(package = %config.package, "{warning}");
		}
		config
	}

	/// Locates the options section, falling back to deprecated locations and
	/// recording a warning for each one used.
	fn effective_section(&mut self, extra: &Value) -> Map<String, Value> {
		if let Some(section) = present(extra, SECTION) {
			return section.as_object().cloned().unwrap_or_default();
		}
		if let Some(section) = present(extra, DEPRECATED_SECTION) {
			self.warnings.push(ConfigWarning::DeprecatedSection {
				package: self.package.clone(),
			});
			return section.as_object().cloned().unwrap_or_default();
		}

		let mut section = Map::new();
		for key in [OPTION_CLASS_ALIAS_MAPS, OPTION_AUTOLOAD_CASE_SENSITIVITY] {
			if let Some(value) = present(extra, key) {
				section.insert(key.to_owned(), value.clone());
				self.warnings.push(ConfigWarning::DeprecatedTopLevelKey {
					package: self.package.clone(),
					key,
				});
			}
		}
		section
	}

	/// Looks up a value by dotted path, e.g. `class-alias-maps.0`.
	///
	/// Returns `Ok(None)` when any segment is missing.
	pub fn get(&self, key: &str) -> Result<Option<&Value>> {
		if key.is_empty() {
			return Err(ConfigError::EmptyKey);
		}
		let mut segments = key.split('.');
		let Some(first) = segments.next() else {
			return Ok(None);
		};
		let mut value = self.values.get(first);
		for segment in segments {
			value = value.and_then(|v| match v {
				Value::Object(map) => map.get(segment),
				Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
				_ => None,
			});
		}
		Ok(value)
	}

	pub fn package(&self) -> &str {
		&self.package
	}

	/// Configured map file paths, relative to the package root. `None` when
	/// the option is not set.
	pub fn class_alias_maps(&self) -> Option<Vec<&str>> {
		match self.values.get(OPTION_CLASS_ALIAS_MAPS)? {
			Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
			_ => None,
		}
	}

	pub fn always_add_alias_loader(&self) -> bool {
		self.flag(OPTION_ALWAYS_ADD_ALIAS_LOADER)
	}

	pub fn is_case_sensitive(&self) -> bool {
		self.flag(OPTION_AUTOLOAD_CASE_SENSITIVITY)
	}

	/// The configured mode. Unknown values fall back to
	/// [`AutoloadMode::Normal`] with a warning.
	pub fn autoload_mode(&self) -> AutoloadMode {
		let raw = self.values.get(OPTION_AUTOLOAD_MODE).and_then(Value::as_str).unwrap_or_default();
		AutoloadMode::parse(raw).unwrap_or_else(|| {
			tracing::warn!(package = %self.package, mode = raw, "unknown autoload mode; using normal");
			AutoloadMode::Normal
		})
	}

	fn flag(&self, key: &str) -> bool {
		self.values.get(key).is_some_and(truthy)
	}

	/// Deprecation notices collected while reading the package.
	pub fn warnings(&self) -> &[ConfigWarning] {
		&self.warnings
	}
}

fn present<'a>(extra: &'a Value, key: &str) -> Option<&'a Value> {
	extra.get(key).filter(|v| !v.is_null())
}

/// Loose truthiness: `false`, zero, `""`, `"0"`, `null` and empty containers
/// are false.
fn truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !s.is_empty() && s != "0",
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
	}
}

/// Scalar string cast: `true` is `"1"`, `false` is empty.
fn to_text(value: &Value) -> String {
	match value {
		Value::Null | Value::Bool(false) => String::new(),
		Value::Bool(true) => "1".into(),
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

fn to_list(value: &Value) -> Vec<Value> {
	match value {
		Value::Null => Vec::new(),
		Value::Array(items) => items.clone(),
		Value::Object(map) => map.values().cloned().collect(),
		scalar => vec![scalar.clone()],
	}
}
