//! Process-wide loader state as an explicit handle.

use std::borrow::Cow;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::delegate::Loader;
use crate::error::Result;
use crate::facade::CanonicalNames;
use crate::loader::AliasLoader;
use crate::stack::ResolverStack;
use crate::symbols::SymbolTable;

/// The resolver stack and the published alias loader of one process (or one
/// test).
///
/// Hosts create one context at startup and hand out references; there is no
/// hidden global. [`LoaderContext::teardown`] returns it to the unregistered
/// state.
#[derive(Debug, Default)]
pub struct LoaderContext {
	pub(crate) stack: Mutex<ResolverStack>,
	names: CanonicalNames,
}

impl LoaderContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a context whose stack already holds the host's native loaders.
	pub fn with_stack(stack: ResolverStack) -> Self {
		Self {
			stack: Mutex::new(stack),
			names: CanonicalNames::default(),
		}
	}

	/// Appends a resolver, as a host installing its native loader would.
	pub fn install(&self, loader: Arc<dyn Loader>) {
		self.stack.lock().push(loader);
	}

	/// The lookup facade of this context.
	pub fn names(&self) -> &CanonicalNames {
		&self.names
	}

	/// Shorthand for [`CanonicalNames::canonical_name_of`].
	pub fn canonical_name_of<'a>(&self, name_or_alias: &'a str) -> Cow<'a, str> {
		self.names.canonical_name_of(name_or_alias)
	}

	/// The alias loader currently published, if any.
	pub fn active_loader(&self) -> Option<Arc<AliasLoader>> {
		self.names.active()
	}

	/// Returns a copy of the current resolver stack.
	pub fn resolvers(&self) -> ResolverStack {
		self.stack.lock().clone()
	}

	/// Runs the resolver chain for `name`.
	///
	/// The stack is copied first, so resolvers may re-enter the context.
	pub fn load(&self, name: &str, symbols: &mut dyn SymbolTable) -> Result<bool> {
		let stack = self.resolvers();
		stack.load(name, symbols)
	}

	/// Unregisters published alias loaders until none is left.
	pub fn teardown(&self) {
		while let Some(active) = self.names.active() {
			if !active.unregister(self) {
				break;
			}
		}
		self.names.clear();
	}
}
