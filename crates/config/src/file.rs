//! Alias map files.
//!
//! Each package ships map files holding a JSON object of alias → canonical
//! name. [`gather`] reads them for every package and [`consolidate`] folds
//! them into one [`AliasMap`]; the result is persisted as a consolidated file
//! carrying both indexes:
//!
//! ```json
//! {
//!     "aliasToClassNameMapping": { "old_name": "New\\Name" },
//!     "classNameToAliasMapping": { "New\\Name": { "old_name": "old_name" } }
//! }
//! ```
//!
//! Older writers emit the reverse side as plain arrays; both forms load.

use std::fs;
use std::path::{Path, PathBuf};

use alias_loader::AliasMap;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Config;
use crate::error::{ConfigError, Result};

/// On-disk form of a consolidated alias map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasMapFile {
	#[serde(default)]
	pub alias_to_class_name_mapping: IndexMap<String, String>,
	#[serde(default)]
	pub class_name_to_alias_mapping: IndexMap<String, AliasList>,
}

/// Aliases of one canonical name in the reverse index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasList {
	/// Object keyed by alias; only the values are used.
	Keyed(IndexMap<String, String>),
	Listed(Vec<String>),
}

impl AliasList {
	pub fn into_aliases(self) -> Vec<String> {
		match self {
			AliasList::Keyed(map) => map.into_values().collect(),
			AliasList::Listed(list) => list,
		}
	}
}

impl AliasMapFile {
	/// Snapshot of `map` in the keyed form.
	pub fn from_alias_map(map: &AliasMap) -> Self {
		let alias_to_class_name_mapping = map.iter().map(|(a, c)| (a.to_owned(), c.to_owned())).collect();
		let class_name_to_alias_mapping = map
			.canonical_names()
			.map(|canonical| {
				let aliases = map.aliases_of(canonical).map(|a| (a.to_owned(), a.to_owned())).collect();
				(canonical.to_owned(), AliasList::Keyed(aliases))
			})
			.collect();
		Self {
			alias_to_class_name_mapping,
			class_name_to_alias_mapping,
		}
	}

	/// Both indexes taken verbatim.
	pub fn into_alias_map(self) -> AliasMap {
		AliasMap::from_parts(
			self.alias_to_class_name_mapping,
			self.class_name_to_alias_mapping.into_iter().map(|(canonical, aliases)| (canonical, aliases.into_aliases())),
		)
	}
}

fn read(path: &Path) -> Result<String> {
	fs::read_to_string(path).map_err(|error| ConfigError::Io {
		path: path.to_path_buf(),
		error,
	})
}

fn parse<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
	serde_json::from_str(content).map_err(|error| ConfigError::Json {
		path: path.to_path_buf(),
		error,
	})
}

/// Loads a consolidated map file.
pub fn load_alias_map_file(path: &Path) -> Result<AliasMap> {
	let file: AliasMapFile = parse(path, &read(path)?)?;
	tracing::debug!(path = %path.display(), aliases = file.alias_to_class_name_mapping.len(), "alias map file loaded");
	Ok(file.into_alias_map())
}

/// Writes `map` as a consolidated map file.
pub fn write_alias_map_file(path: &Path, map: &AliasMap) -> Result<()> {
	let content = serde_json::to_string_pretty(&AliasMapFile::from_alias_map(map)).map_err(|error| ConfigError::Json {
		path: path.to_path_buf(),
		error,
	})?;
	fs::write(path, content).map_err(|error| ConfigError::Io {
		path: path.to_path_buf(),
		error,
	})
}

/// Loads one package map file. A missing file is `Ok(None)` and logged; a
/// file not holding a JSON object is [`ConfigError::InvalidPackageMap`].
pub fn load_package_map(path: &Path) -> Result<Option<IndexMap<String, String>>> {
	if !path.is_file() {
		tracing::warn!(path = %path.display(), "class alias map file not found");
		return Ok(None);
	}
	let value: Value = parse(path, &read(path)?)?;
	if !value.is_object() {
		return Err(ConfigError::InvalidPackageMap { path: path.to_path_buf() });
	}
	serde_json::from_value(value).map(Some).map_err(|error| ConfigError::Json {
		path: path.to_path_buf(),
		error,
	})
}

/// Reads the map files configured by each package, resolved against its root
/// directory, and consolidates them.
pub fn gather<'a>(packages: impl IntoIterator<Item = (&'a Config, &'a Path)>) -> Result<AliasMap> {
	let mut maps = Vec::new();
	for (config, root) in packages {
		for relative in config.class_alias_maps().unwrap_or_default() {
			let path: PathBuf = root.join(relative);
			if let Some(map) = load_package_map(&path)? {
				tracing::debug!(package = config.package(), path = %path.display(), aliases = map.len(), "package alias map read");
				maps.push(map);
			}
		}
	}
	Ok(consolidate(maps))
}

/// Folds per-package alias → canonical maps into one map. Aliases are
/// case-folded; a later package wins an alias both declare.
pub fn consolidate<I, M>(package_maps: I) -> AliasMap
where
	I: IntoIterator<Item = M>,
	M: IntoIterator<Item = (String, String)>,
{
	AliasMap::from_pairs(package_maps.into_iter().flatten())
}
