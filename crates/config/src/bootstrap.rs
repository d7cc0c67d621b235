//! Installing the alias loader from configuration.

use std::sync::Arc;

use alias_loader::{AliasLoader, AliasMap, Loader, LoaderContext, Placement};

use crate::Config;

/// Returns false only when there is nothing for the adapter to do: no
/// aliases, loading is case sensitive and the root package does not ask for
/// the adapter regardless.
pub fn should_install(config: &Config, map: &AliasMap) -> bool {
	config.always_add_alias_loader() || !map.is_empty() || !config.is_case_sensitive()
}

/// Builds an adapter around `delegate` from the root package's options and
/// registers it in `ctx`.
///
/// Returns `None` when [`should_install`] says the adapter is not needed. With
/// case-insensitive loading the delegate is expected to answer folded names,
/// e.g. a class map built with `ClassMapLoader::with_folded_keys`.
pub fn install(
	config: &Config,
	map: AliasMap,
	delegate: Arc<dyn Loader>,
	ctx: &LoaderContext,
	placement: Placement,
) -> Option<Arc<AliasLoader>> {
	if !should_install(config, &map) {
		tracing::debug!(package = config.package(), "no aliases and case-sensitive loading; adapter not installed");
		return None;
	}

	tracing::debug!(
		package = config.package(),
		aliases = map.len(),
		case_sensitive = config.is_case_sensitive(),
		"installing alias loader"
	);
	let loader = Arc::new(
		AliasLoader::new(delegate)
			.with_alias_map(map)
			.with_case_sensitive_loading(config.is_case_sensitive()),
	);
	loader.register(ctx, placement);
	Some(loader)
}
