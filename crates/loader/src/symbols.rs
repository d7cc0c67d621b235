//! Host symbol table capability and an in-memory implementation.

use std::borrow::Cow;

use rustc_hash::FxHashMap;

use crate::error::BindError;
use crate::map::fold_case;

/// The runtime's global symbol table, as seen by loaders.
pub trait SymbolTable {
	/// Returns the name the symbol reachable as `name` was declared under.
	fn declared_name(&self, name: &str) -> Option<&str>;

	/// Returns true if `name` already resolves to a defined symbol.
	fn is_materialized(&self, name: &str) -> bool {
		self.declared_name(name).is_some()
	}

	/// Defines a new symbol under `name`.
	fn define(&mut self, name: &str) -> Result<(), BindError>;

	/// Makes `alias` resolve to the same symbol as `canonical`.
	fn bind_alias(&mut self, canonical: &str, alias: &str) -> Result<(), BindError>;
}

/// Handle to a symbol in a [`SymbolStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

/// In-memory symbol table.
///
/// Names are case-insensitive by default, like class names in most
/// class-loading runtimes. Aliases and declared names share one namespace.
#[derive(Debug, Default)]
pub struct SymbolStore {
	names: FxHashMap<String, SymbolId>,
	declared: Vec<String>,
	case_sensitive: bool,
}

impl SymbolStore {
	/// Creates an empty store with case-insensitive names.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty store that compares names exactly.
	pub fn case_sensitive() -> Self {
		Self {
			case_sensitive: true,
			..Self::default()
		}
	}

	fn key<'a>(&self, name: &'a str) -> Cow<'a, str> {
		if self.case_sensitive { Cow::Borrowed(name) } else { fold_case(name) }
	}

	/// Defines `name` and returns its handle.
	pub fn define_symbol(&mut self, name: &str) -> Result<SymbolId, BindError> {
		let key = self.key(name).into_owned();
		if self.names.contains_key(&key) {
			return Err(BindError::NameTaken { name: name.to_owned() });
		}
		let id = u32::try_from(self.declared.len()).map(SymbolId).map_err(|_| BindError::TableFull)?;
		self.declared.push(name.to_owned());
		self.names.insert(key, id);
		Ok(id)
	}

	/// Returns the symbol `name` resolves to.
	pub fn lookup(&self, name: &str) -> Option<SymbolId> {
		self.names.get(&*self.key(name)).copied()
	}

	/// Returns the declared name of a symbol, or `None` for a handle this store
	/// did not issue.
	pub fn name_of(&self, id: SymbolId) -> Option<&str> {
		self.declared.get(id.0 as usize).map(String::as_str)
	}

	/// Number of distinct symbols (aliases excluded).
	pub fn len(&self) -> usize {
		self.declared.len()
	}

	pub fn is_empty(&self) -> bool {
		self.declared.is_empty()
	}
}

impl SymbolTable for SymbolStore {
	fn declared_name(&self, name: &str) -> Option<&str> {
		self.lookup(name).and_then(|id| self.name_of(id))
	}

	fn define(&mut self, name: &str) -> Result<(), BindError> {
		self.define_symbol(name).map(|_| ())
	}

	fn bind_alias(&mut self, canonical: &str, alias: &str) -> Result<(), BindError> {
		let target = self.lookup(canonical).ok_or_else(|| BindError::UnknownTarget {
			name: canonical.to_owned(),
		})?;
		let key = self.key(alias).into_owned();
		if self.names.contains_key(&key) {
			return Err(BindError::NameTaken { name: alias.to_owned() });
		}
		self.names.insert(key, target);
		Ok(())
	}
}
