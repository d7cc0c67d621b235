//! Installing an [`AliasLoader`] as the active resolver.
//!
//! `register` moves the raw delegate (and any previously published alias
//! loader) out of the [`ResolverStack`], installs the adapter in their place
//! and publishes it to [`CanonicalNames`](crate::CanonicalNames).
//! `unregister` reverses exactly that. A loader unregistered while a newer one
//! still displaces it hands its record to that newer loader instead, so the
//! chain unwinds in any order. Both run under the context's stack
//! lock, which also serializes writes to the published pointer.

use std::sync::Arc;

use crate::context::LoaderContext;
use crate::delegate::Loader;
use crate::loader::AliasLoader;

/// Where the adapter is installed in the resolver stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
	/// Consulted before every other resolver.
	#[default]
	Prepend,
	/// Consulted after every other resolver.
	Append,
}

/// What `register` displaced, so `unregister` can put it back.
pub(crate) struct RegistrationRecord {
	/// Removed resolvers with the stack position each one had.
	displaced: Vec<(usize, Arc<dyn Loader>)>,
	/// The alias loader published before this one, if any.
	previous_active: Option<Arc<AliasLoader>>,
}

impl AliasLoader {
	/// Installs this loader as the active resolver of `ctx`.
	///
	/// Registering an already registered loader re-installs it at `placement`
	/// and keeps the original record, so a later `unregister` still restores
	/// the state from before the first registration.
	pub fn register(self: &Arc<Self>, ctx: &LoaderContext, placement: Placement) {
		let mut stack = ctx.stack.lock();
		let mut record = self.registration.lock();

		stack.remove_ptr(Arc::as_ptr(self));

		let previous_active = ctx.names().active().filter(|prev| !Arc::ptr_eq(prev, self));
		let delegate = Arc::as_ptr(self.delegate());
		let displaced = stack.take_where(|entry| {
			let entry = Arc::as_ptr(entry);
			std::ptr::addr_eq(entry, delegate)
				|| previous_active
					.as_ref()
					.is_some_and(|prev| std::ptr::addr_eq(entry, Arc::as_ptr(prev)))
		});

		match record.as_mut() {
			Some(existing) => existing.displaced.extend(displaced),
			None => {
				*record = Some(RegistrationRecord {
					displaced,
					previous_active,
				});
			}
		}

		let me: Arc<dyn Loader> = self.clone();
		match placement {
			Placement::Prepend => stack.prepend(me),
			Placement::Append => stack.push(me),
		}
		ctx.names().publish(Arc::clone(self));

		tracing::debug!(
			?placement,
			displaced = record.as_ref().map_or(0, |r| r.displaced.len()),
			resolvers = stack.len(),
			"alias loader registered"
		);
	}

	/// Removes this loader from `ctx` and restores what `register` displaced.
	///
	/// Returns false if the loader was not registered.
	pub fn unregister(&self, ctx: &LoaderContext) -> bool {
		let mut stack = ctx.stack.lock();
		let Some(record) = self.registration.lock().take() else {
			return false;
		};

		let me = self as *const Self;
		if stack.position_ptr(me).is_none() {
			if let Some(successor) = displacing_successor(ctx, self) {
				successor.inherit(me, record);
				tracing::debug!(resolvers = stack.len(), "displaced alias loader unregistered; successor inherits its record");
				return true;
			}
		}

		stack.remove_ptr(me);
		let restored = record.displaced.len();
		for (index, loader) in record.displaced {
			stack.insert(index, loader);
		}

		if ctx.names().is_active(self) {
			match record.previous_active {
				Some(previous) => ctx.names().publish(previous),
				None => ctx.names().clear(),
			}
		}

		tracing::debug!(restored, resolvers = stack.len(), "alias loader unregistered");
		true
	}

	/// Returns true while the loader is registered with some context.
	pub fn is_registered(&self) -> bool {
		self.registration.lock().is_some()
	}

	/// Takes over what `departed` displaced, in place of `departed` itself.
	fn inherit(&self, departed: *const AliasLoader, record: RegistrationRecord) {
		let mut guard = self.registration.lock();
		let Some(own) = guard.as_mut() else {
			return;
		};
		own.displaced.retain(|(_, loader)| !std::ptr::addr_eq(Arc::as_ptr(loader), departed));
		own.displaced.extend(record.displaced);
		if own.previous_active.as_ref().is_some_and(|prev| std::ptr::eq(Arc::as_ptr(prev), departed)) {
			own.previous_active = record.previous_active;
		}
	}
}

/// Finds the registered loader whose record holds `target` as the loader it
/// displaced, walking back from the published one.
fn displacing_successor(ctx: &LoaderContext, target: &AliasLoader) -> Option<Arc<AliasLoader>> {
	let mut current = ctx.names().active();
	while let Some(loader) = current {
		if std::ptr::eq(Arc::as_ptr(&loader), target) {
			return None;
		}
		let previous = loader.registration.lock().as_ref().and_then(|record| record.previous_active.clone());
		match previous {
			Some(prev) if std::ptr::eq(Arc::as_ptr(&prev), target) => return Some(loader),
			other => current = other,
		}
	}
	None
}
