//! Alias-aware symbol loader.
//!
//! # Mental model
//!
//! [`AliasLoader`] sits in front of a delegate [`Loader`]. A load request is
//! resolved to its canonical name, the delegate materializes the canonical
//! symbol at most once, and every alias of that symbol is then bound in the
//! host [`SymbolTable`] as an equivalent name.
//!
//! # Invariants
//!
//! * A canonical symbol that is already materialized never reaches the
//!   delegate, whoever defined it.
//! * The delegate sees at most one call per canonical name when loading is
//!   case sensitive and at most two otherwise, until the alias map changes.
//! * Binding is idempotent: an alias already naming the same symbol is
//!   skipped, an alias naming an unrelated symbol is an
//!   [`LoaderError::AliasCollision`].
//! * "Not found" is `Ok(false)`; only configuration defects are errors.
//!
//! # Concurrency
//!
//! The alias map is an immutable snapshot behind [`ArcSwap`]; replace and
//! merge publish a new snapshot. No lock is held while the delegate runs, so
//! re-entrant loads from inside the delegate are fine.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::delegate::Loader;
use crate::error::{LoaderError, Result, validate_key};
use crate::map::{AliasMap, fold_case};
use crate::registration::RegistrationRecord;
use crate::symbols::SymbolTable;


/// Loader adapter that makes aliases behave like the symbols they name.
pub struct AliasLoader {
	delegate: Arc<dyn Loader>,
	map: ArcSwap<AliasMap>,
	case_sensitive: AtomicBool,
	/// Canonical names the delegate already failed to produce.
	misses: Mutex<FxHashSet<String>>,
	pub(crate) registration: Mutex<Option<RegistrationRecord>>,
}

impl AliasLoader {
	/// Wraps `delegate` with an empty alias map and case-sensitive loading.
	pub fn new(delegate: Arc<dyn Loader>) -> Self {
		Self {
			delegate,
			map: ArcSwap::from_pointee(AliasMap::new()),
			case_sensitive: AtomicBool::new(true),
			misses: Mutex::new(FxHashSet::default()),
			registration: Mutex::new(None),
		}
	}

	pub fn with_alias_map(self, map: AliasMap) -> Self {
		self.set_alias_map(map);
		self
	}

	pub fn with_case_sensitive_loading(self, case_sensitive: bool) -> Self {
		self.set_case_sensitive_loading(case_sensitive);
		self
	}

	/// Replaces the alias map.
	///
	/// Both indexes are used as given. A reverse entry without a forward
	/// entry is still bound; one whose alias now maps elsewhere is skipped.
	pub fn set_alias_map(&self, map: AliasMap) {
		tracing::debug!(aliases = map.len(), "alias map replaced");
		self.map.store(Arc::new(map));
		self.misses.lock().clear();
	}

	/// Merges `partial` into the current alias map. See [`AliasMap::merge`].
	pub fn add_alias_map(&self, partial: AliasMap) {
		tracing::debug!(aliases = partial.len(), "alias map extended");
		self.map.rcu(|current| {
			let mut next = AliasMap::clone(current);
			next.merge(partial.clone());
			next
		});
		self.misses.lock().clear();
	}

	/// Returns the current alias map snapshot.
	pub fn alias_map(&self) -> Arc<AliasMap> {
		self.map.load_full()
	}

	/// Switches case-sensitive loading. Known misses are forgotten when the
	/// mode changes, since the folded retry may now find them.
	pub fn set_case_sensitive_loading(&self, case_sensitive: bool) {
		if self.case_sensitive.swap(case_sensitive, Ordering::Relaxed) != case_sensitive {
			self.misses.lock().clear();
		}
	}

	pub fn is_case_sensitive(&self) -> bool {
		self.case_sensitive.load(Ordering::Relaxed)
	}

	/// The wrapped loader.
	pub fn delegate(&self) -> &Arc<dyn Loader> {
		&self.delegate
	}

	/// Returns the canonical name of `name_or_alias` without loading anything.
	pub fn get_canonical_name(&self, name_or_alias: &str) -> String {
		self.map.load().resolve(name_or_alias).to_owned()
	}

	/// Loads the symbol `name` names, directly or through an alias, and binds
	/// all aliases of it.
	///
	/// Returns `Ok(true)` once the canonical symbol is materialized and
	/// `Ok(false)` when it does not exist.
	pub fn load_symbol_with_alias(&self, name: &str, symbols: &mut dyn SymbolTable) -> Result<bool> {
		validate_key(name)?;
		let map = self.map.load_full();
		let canonical = map.resolve(name);

		if symbols.is_materialized(canonical) {
			tracing::trace!(requested = name, canonical, "symbol already materialized");
		} else if !self.load_canonical(canonical, symbols)? {
			return Ok(false);
		}

		self.bind_aliases(&map, canonical, symbols)?;
		Ok(true)
	}

	fn load_canonical(&self, canonical: &str, symbols: &mut dyn SymbolTable) -> Result<bool> {
		if self.misses.lock().contains(canonical) {
			tracing::trace!(canonical, "known miss; delegate not consulted");
			return Ok(false);
		}

		let mut found = self.delegate.load(canonical, symbols)?;
		if !found && !self.is_case_sensitive() {
			let folded = fold_case(canonical);
			tracing::debug!(canonical, retry = %folded, "delegate miss; retrying with folded name");
			found = self.delegate.load(&folded, symbols)?;
		}

		let materialized = symbols.is_materialized(canonical);
		if !materialized {
			if found {
				tracing::debug!(canonical, "delegate reported success without defining the symbol");
			}
			self.misses.lock().insert(canonical.to_owned());
		}
		Ok(materialized)
	}

	fn bind_aliases(&self, map: &AliasMap, canonical: &str, symbols: &mut dyn SymbolTable) -> Result<()> {
		let Some(target) = symbols.declared_name(canonical).map(str::to_owned) else {
			return Ok(());
		};

		// A request in the wrong case still reaches the aliases recorded under
		// the declared name.
		let keys = if target == canonical { vec![canonical] } else { vec![canonical, target.as_str()] };

		for key in keys {
			for alias in map.aliases_of(key) {
				if let Some(now) = map.canonical_of(alias).filter(|now| *now != key) {
					tracing::debug!(alias, canonical = key, now, "skipping remapped alias");
					continue;
				}
				match symbols.declared_name(alias) {
					Some(existing) if existing == target => {}
					Some(existing) => {
						return Err(LoaderError::AliasCollision {
							alias: alias.to_owned(),
							canonical: key.to_owned(),
							existing: existing.to_owned(),
						});
					}
					None => {
						symbols.bind_alias(canonical, alias)?;
						tracing::debug!(alias, canonical = key, "alias bound");
					}
				}
			}
		}
		Ok(())
	}
}

impl Loader for AliasLoader {
	fn load(&self, name: &str, symbols: &mut dyn SymbolTable) -> Result<bool> {
		self.load_symbol_with_alias(name, symbols)
	}

	fn find_file(&self, name: &str) -> Option<PathBuf> {
		self.delegate.find_file(name)
	}

	fn forward(&self, capability: &str, args: &[Value]) -> Result<Value> {
		self.delegate.forward(capability, args)
	}
}

impl std::fmt::Debug for AliasLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AliasLoader")
			.field("aliases", &self.map.load().len())
			.field("case_sensitive", &self.is_case_sensitive())
			.field("registered", &self.registration.lock().is_some())
			.finish_non_exhaustive()
	}
}
