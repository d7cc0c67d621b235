//! Class-map backed delegate loader.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::delegate::Loader;
use crate::error::{LoaderError, Result};
use crate::map::fold_case;
use crate::symbols::SymbolTable;

#[derive(Debug, Clone)]
struct ClassMapEntry {
	declared: String,
	path: PathBuf,
}

/// Loader that knows a fixed set of symbols and the files declaring them.
///
/// Lookups match keys exactly. For case-insensitive loading the keys are
/// folded once with [`ClassMapLoader::with_folded_keys`]; the alias adapter
/// then retries misses with the folded name.
#[derive(Debug, Clone, Default)]
pub struct ClassMapLoader {
	entries: FxHashMap<String, ClassMapEntry>,
}

impl ClassMapLoader {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `name` as declared in `path`.
	pub fn with_entry(mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Self {
		self.insert(name, path);
		self
	}

	pub fn insert(&mut self, name: impl Into<String>, path: impl AsRef<Path>) {
		let declared = name.into();
		self.entries.insert(
			declared.clone(),
			ClassMapEntry {
				declared,
				path: path.as_ref().to_path_buf(),
			},
		);
	}

	/// Rewrites every key to its case-folded form, keeping declared names.
	pub fn with_folded_keys(self) -> Self {
		let entries = self
			.entries
			.into_values()
			.map(|entry| (fold_case(&entry.declared).into_owned(), entry))
			.collect();
		Self { entries }
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl Loader for ClassMapLoader {
	fn load(&self, name: &str, symbols: &mut dyn SymbolTable) -> Result<bool> {
		let Some(entry) = self.entries.get(name) else {
			return Ok(false);
		};
		if !symbols.is_materialized(&entry.declared) {
			tracing::trace!(symbol = %entry.declared, path = %entry.path.display(), "defining symbol from class map");
			symbols.define(&entry.declared)?;
		}
		Ok(true)
	}

	fn find_file(&self, name: &str) -> Option<PathBuf> {
		self.entries.get(name).map(|entry| entry.path.clone())
	}

	fn forward(&self, capability: &str, args: &[Value]) -> Result<Value> {
		match capability {
			"getClassMap" => {
				let map: Map<String, Value> = self
					.entries
					.iter()
					.map(|(key, entry)| (key.clone(), Value::String(entry.path.display().to_string())))
					.collect();
				Ok(Value::Object(map))
			}
			"hasClass" => {
				let name = args.first().and_then(Value::as_str).unwrap_or_default();
				Ok(Value::Bool(self.entries.contains_key(name)))
			}
			_ => Err(LoaderError::unsupported(capability)),
		}
	}
}
