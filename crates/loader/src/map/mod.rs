//! Bidirectional alias index.
//!
//! # Invariants
//!
//! * Alias keys are stored case-folded; lookups fold before probing.
//! * For every `a` in `canonical_to_aliases[c]` that was written by the same
//!   insertion, `alias_to_canonical[a] == c`. A later insertion may remap `a`
//!   to another canonical name; the reverse entry under `c` is kept (entries
//!   are never removed) and becomes stale. Consumers that bind aliases must
//!   check the forward mapping, see [`AliasMap::is_current`].
//! * Iteration order is insertion order on both sides, so alias binding is
//!   deterministic.

use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;


type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Folds a symbol name for case-insensitive comparison.
///
/// Only ASCII letters are folded, matching how class-like symbol names are
/// compared by hosts with case-insensitive symbol tables.
pub fn fold_case(name: &str) -> Cow<'_, str> {
	if name.bytes().any(|b| b.is_ascii_uppercase()) {
		Cow::Owned(name.to_ascii_lowercase())
	} else {
		Cow::Borrowed(name)
	}
}

/// Alias to canonical name lookup, with a reverse index from canonical name
/// to every alias configured for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
	alias_to_canonical: FxIndexMap<String, String>,
	canonical_to_aliases: FxIndexMap<String, FxIndexSet<String>>,
}

impl AliasMap {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a consistent map from alias/canonical pairs.
	pub fn from_pairs<A, C>(pairs: impl IntoIterator<Item = (A, C)>) -> Self
	where
		A: AsRef<str>,
		C: Into<String>,
	{
		let mut map = Self::new();
		for (alias, canonical) in pairs {
			map.insert(alias.as_ref(), canonical);
		}
		map
	}

	/// Builds a map from both indexes verbatim. See [`AliasMap::replace`].
	pub fn from_parts<F, R, S>(alias_to_canonical: F, canonical_to_aliases: R) -> Self
	where
		F: IntoIterator<Item = (String, String)>,
		R: IntoIterator<Item = (String, S)>,
		S: IntoIterator<Item = String>,
	{
		let mut map = Self::new();
		map.replace(alias_to_canonical, canonical_to_aliases);
		map
	}

	/// Returns the canonical name for `name`, or `name` itself when it is not a
	/// known alias.
	pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
		self.canonical_of(name).unwrap_or(name)
	}

	/// Returns the canonical name `alias` maps to, if it is a known alias.
	pub fn canonical_of(&self, alias: &str) -> Option<&str> {
		self.alias_to_canonical.get(&*fold_case(alias)).map(String::as_str)
	}

	/// Returns the configured aliases of `canonical`, in insertion order.
	pub fn aliases_of<'a>(&'a self, canonical: &str) -> impl Iterator<Item = &'a str> + use<'a> {
		self.canonical_to_aliases.get(canonical).into_iter().flatten().map(String::as_str)
	}

	/// Returns true if `alias` still maps to `canonical` in the forward index.
	pub fn is_current(&self, alias: &str, canonical: &str) -> bool {
		self.canonical_of(alias) == Some(canonical)
	}

	/// Replaces both indexes verbatim.
	///
	/// Keys are taken as given: the caller supplies case-folded aliases and
	/// keeps the two sides consistent.
	pub fn replace<F, R, S>(&mut self, alias_to_canonical: F, canonical_to_aliases: R)
	where
		F: IntoIterator<Item = (String, String)>,
		R: IntoIterator<Item = (String, S)>,
		S: IntoIterator<Item = String>,
	{
		self.alias_to_canonical = alias_to_canonical.into_iter().collect();
		self.canonical_to_aliases = canonical_to_aliases
			.into_iter()
			.map(|(canonical, aliases)| (canonical, aliases.into_iter().collect()))
			.collect();
	}

	/// Records `alias` as an alternate name of `canonical`.
	///
	/// A previous mapping of the same alias is overwritten in the forward
	/// index; the reverse index only grows.
	pub fn insert(&mut self, alias: &str, canonical: impl Into<String>) {
		let alias = fold_case(alias).into_owned();
		let canonical = canonical.into();
		self.alias_to_canonical.insert(alias.clone(), canonical.clone());
		self.canonical_to_aliases.entry(canonical).or_default().insert(alias);
	}

	/// Merges `partial` into this map without removing anything.
	///
	/// Either side of `partial` may be missing; the other side is derived from
	/// it. Reverse-index pairs are applied before forward pairs, so on an alias
	/// conflict within `partial` its forward index wins, and across merges the
	/// later merge wins.
	pub fn merge(&mut self, partial: AliasMap) {
		for (canonical, aliases) in partial.canonical_to_aliases {
			for alias in aliases {
				self.insert(&alias, canonical.clone());
			}
		}
		for (alias, canonical) in partial.alias_to_canonical {
			self.insert(&alias, canonical);
		}
	}

	/// Iterates `(alias, canonical)` pairs of the forward index.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
		self.alias_to_canonical.iter().map(|(a, c)| (a.as_str(), c.as_str()))
	}

	/// Iterates canonical names that have at least one recorded alias.
	pub fn canonical_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.canonical_to_aliases.keys().map(String::as_str)
	}

	/// Number of aliases in the forward index.
	pub fn len(&self) -> usize {
		self.alias_to_canonical.len()
	}

	/// Returns true if neither index holds anything.
	pub fn is_empty(&self) -> bool {
		self.alias_to_canonical.is_empty() && self.canonical_to_aliases.is_empty()
	}
}
