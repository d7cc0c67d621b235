//! Loader capability surface shared by native loaders and the alias adapter.

use std::path::PathBuf;

use serde_json::Value;

use crate::error::{LoaderError, Result};
use crate::symbols::SymbolTable;

/// A symbol loader installed in a [`ResolverStack`](crate::ResolverStack).
///
/// `load` is the only required operation. Everything else a host loader can
/// do is either one of the modeled capabilities below or reachable through
/// [`Loader::forward`].
pub trait Loader: Send + Sync {
	/// Tries to materialize `name` into `symbols`.
	///
	/// Returns `Ok(false)` when the loader does not know the symbol, so that
	/// callers can fall through to the next loader.
	fn load(&self, name: &str, symbols: &mut dyn SymbolTable) -> Result<bool>;

	/// Returns the file that would define `name`, if the loader is file based.
	fn find_file(&self, _name: &str) -> Option<PathBuf> {
		None
	}

	/// Invokes a capability not modeled by this trait.
	///
	/// Arguments and return value are opaque to callers in between.
	fn forward(&self, capability: &str, _args: &[Value]) -> Result<Value> {
		Err(LoaderError::unsupported(capability))
	}
}
