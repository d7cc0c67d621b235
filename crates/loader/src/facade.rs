//! Name normalization without an adapter reference.

use std::borrow::Cow;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::loader::AliasLoader;

/// The published alias loader of a [`LoaderContext`](crate::LoaderContext).
///
/// Code that only compares symbol names as strings normalizes them here.
/// With nothing published every name is returned unchanged.
#[derive(Debug, Default)]
pub struct CanonicalNames {
	active: ArcSwapOption<AliasLoader>,
}

impl CanonicalNames {
	/// Returns the canonical name of `name_or_alias`.
	pub fn canonical_name_of<'a>(&self, name_or_alias: &'a str) -> Cow<'a, str> {
		match self.active.load().as_deref() {
			Some(loader) => Cow::Owned(loader.get_canonical_name(name_or_alias)),
			None => Cow::Borrowed(name_or_alias),
		}
	}

	/// Returns the published loader, if any.
	pub fn active(&self) -> Option<Arc<AliasLoader>> {
		self.active.load_full()
	}

	pub fn is_published(&self) -> bool {
		self.active.load().is_some()
	}

	pub(crate) fn is_active(&self, loader: &AliasLoader) -> bool {
		self.active.load().as_deref().is_some_and(|active| std::ptr::eq(active, loader))
	}

	pub(crate) fn publish(&self, loader: Arc<AliasLoader>) {
		self.active.store(Some(loader));
	}

	pub(crate) fn clear(&self) {
		self.active.store(None);
	}
}
