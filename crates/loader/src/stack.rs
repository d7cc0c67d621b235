//! Ordered chain of active resolvers.

use std::sync::Arc;

use crate::delegate::Loader;
use crate::error::Result;
use crate::symbols::SymbolTable;

/// Active resolvers, consulted front to back until one finds the symbol.
///
/// Entries are compared by identity (the address of the shared loader), never
/// by value.
#[derive(Default, Clone)]
pub struct ResolverStack {
	loaders: Vec<Arc<dyn Loader>>,
}

impl ResolverStack {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, loader: Arc<dyn Loader>) {
		self.loaders.push(loader);
	}

	pub fn prepend(&mut self, loader: Arc<dyn Loader>) {
		self.loaders.insert(0, loader);
	}

	/// Inserts at `index`, or at the end if the stack has become shorter.
	pub fn insert(&mut self, index: usize, loader: Arc<dyn Loader>) {
		let index = index.min(self.loaders.len());
		self.loaders.insert(index, loader);
	}

	/// Returns the position of `loader`, compared by identity.
	pub fn position<L: ?Sized>(&self, loader: &Arc<L>) -> Option<usize> {
		self.position_ptr(Arc::as_ptr(loader))
	}

	pub fn contains<L: ?Sized>(&self, loader: &Arc<L>) -> bool {
		self.position(loader).is_some()
	}

	/// Removes `loader`, returning it if it was present.
	pub fn remove<L: ?Sized>(&mut self, loader: &Arc<L>) -> Option<Arc<dyn Loader>> {
		self.remove_ptr(Arc::as_ptr(loader))
	}

	pub(crate) fn position_ptr<L: ?Sized>(&self, loader: *const L) -> Option<usize> {
		self.loaders
			.iter()
			.position(|entry| std::ptr::addr_eq(Arc::as_ptr(entry), loader))
	}

	pub(crate) fn remove_ptr<L: ?Sized>(&mut self, loader: *const L) -> Option<Arc<dyn Loader>> {
		let index = self.position_ptr(loader)?;
		Some(self.loaders.remove(index))
	}

	/// Removes every entry matching `pred`, returning each with its former
	/// position, in stack order.
	pub(crate) fn take_where(&mut self, mut pred: impl FnMut(&Arc<dyn Loader>) -> bool) -> Vec<(usize, Arc<dyn Loader>)> {
		let mut taken = Vec::new();
		let mut kept = Vec::with_capacity(self.loaders.len());
		for (index, loader) in self.loaders.drain(..).enumerate() {
			if pred(&loader) {
				taken.push((index, loader));
			} else {
				kept.push(loader);
			}
		}
		self.loaders = kept;
		taken
	}

	pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Loader>> + '_ {
		self.loaders.iter()
	}

	pub fn len(&self) -> usize {
		self.loaders.len()
	}

	pub fn is_empty(&self) -> bool {
		self.loaders.is_empty()
	}

	/// Asks each resolver in turn to load `name`.
	pub fn load(&self, name: &str, symbols: &mut dyn SymbolTable) -> Result<bool> {
		for loader in &self.loaders {
			if loader.load(name, symbols)? {
				return Ok(true);
			}
		}
		Ok(false)
	}
}

impl std::fmt::Debug for ResolverStack {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResolverStack").field("len", &self.loaders.len()).finish()
	}
}
