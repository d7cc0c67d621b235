use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use alias_loader::{AliasLoader, AliasMap, ClassMapLoader, Loader, LoaderContext, Placement, ResolverStack, Result, SymbolStore, SymbolTable};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Class-map loader that counts load calls.
struct Counting {
	inner: ClassMapLoader,
	loads: AtomicUsize,
}

impl Counting {
	fn new(names: &[&str]) -> Arc<Self> {
		let mut inner = ClassMapLoader::new();
		for name in names {
			inner.insert(*name, format!("src/{}.php", name.replace('\\', "/")));
		}
		Arc::new(Self {
			inner,
			loads: AtomicUsize::new(0),
		})
	}

	fn loads(&self) -> usize {
		self.loads.load(Ordering::SeqCst)
	}
}

impl Loader for Counting {
	fn load(&self, name: &str, symbols: &mut dyn SymbolTable) -> Result<bool> {
		self.loads.fetch_add(1, Ordering::SeqCst);
		self.inner.load(name, symbols)
	}
}

fn order(ctx: &LoaderContext, expected: &[&Arc<dyn Loader>]) {
	let stack = ctx.resolvers();
	assert_eq!(stack.len(), expected.len());
	for (index, loader) in expected.iter().enumerate() {
		assert_eq!(stack.position(*loader), Some(index));
	}
}

fn legacy_map() -> AliasMap {
	AliasMap::from_pairs([("Legacy_Widget", "App\\Widget"), ("OldWidget", "App\\Widget")])
}

/// Verifies that registering at either end displaces the delegate and that
/// unregistering restores the original stack order.
#[rstest]
#[case::prepend(Placement::Prepend)]
#[case::append(Placement::Append)]
fn register_replaces_delegate_and_unregister_restores_it(#[case] placement: Placement) {
	let before: Arc<dyn Loader> = Counting::new(&[]);
	let native: Arc<dyn Loader> = Counting::new(&["App\\Widget"]);
	let after: Arc<dyn Loader> = Counting::new(&[]);
	let mut stack = ResolverStack::new();
	for loader in [&before, &native, &after] {
		stack.push(loader.clone());
	}
	let ctx = LoaderContext::with_stack(stack);

	let loader = Arc::new(AliasLoader::new(native.clone()).with_alias_map(legacy_map()));
	loader.register(&ctx, placement);

	let installed: Arc<dyn Loader> = loader.clone();
	assert!(!ctx.resolvers().contains(&native));
	match placement {
		Placement::Prepend => order(&ctx, &[&installed, &before, &after]),
		Placement::Append => order(&ctx, &[&before, &after, &installed]),
	}
	assert!(loader.is_registered());
	assert!(Arc::ptr_eq(&ctx.active_loader().unwrap(), &loader));

	assert!(loader.unregister(&ctx));
	order(&ctx, &[&before, &native, &after]);
	assert!(ctx.active_loader().is_none());
	assert!(!loader.is_registered());
	assert!(!loader.unregister(&ctx));
}

/// Verifies that name lookup is the identity before registration and after
/// teardown.
#[test]
fn facade_is_identity_until_registration() {
	let native = Counting::new(&["App\\Widget"]);
	let ctx = LoaderContext::new();
	ctx.install(native.clone());

	assert_eq!(ctx.canonical_name_of("Legacy_Widget"), "Legacy_Widget");

	let loader = Arc::new(AliasLoader::new(native).with_alias_map(legacy_map()));
	loader.register(&ctx, Placement::Prepend);
	let names = ctx.names();
	assert_eq!(names.canonical_name_of("legacy_widget"), "App\\Widget");
	assert_eq!(names.canonical_name_of("OLDWIDGET"), "App\\Widget");
	assert_eq!(names.canonical_name_of("App\\Other"), "App\\Other");

	ctx.teardown();
	assert!(!names.is_published());
	assert_eq!(ctx.canonical_name_of("Legacy_Widget"), "Legacy_Widget");
}

/// Verifies that every alias is bound after a single delegate load.
#[test]
fn loading_through_context_binds_every_alias() {
	let native = Counting::new(&["App\\Widget"]);
	let ctx = LoaderContext::new();
	ctx.install(native.clone());
	let loader = Arc::new(AliasLoader::new(native.clone()).with_alias_map(legacy_map()));
	loader.register(&ctx, Placement::Prepend);
	let mut symbols = SymbolStore::new();

	assert!(ctx.load("OldWidget", &mut symbols).unwrap());
	assert!(ctx.load("Legacy_Widget", &mut symbols).unwrap());
	assert!(ctx.load("App\\Widget", &mut symbols).unwrap());

	assert_eq!(native.loads(), 1);
	let widget = symbols.lookup("App\\Widget").unwrap();
	assert_eq!(symbols.lookup("legacy_widget"), Some(widget));
	assert_eq!(symbols.lookup("oldwidget"), Some(widget));
	assert_eq!(symbols.len(), 1);
}

/// Verifies that a miss in the adapter falls through to later resolvers.
#[test]
fn not_found_falls_through_to_later_resolvers() {
	let native = Counting::new(&["App\\Widget"]);
	let fallback = Counting::new(&["Plugin\\Thing"]);
	let ctx = LoaderContext::new();
	ctx.install(native.clone());
	ctx.install(fallback.clone());
	let loader = Arc::new(AliasLoader::new(native.clone()).with_alias_map(legacy_map()));
	loader.register(&ctx, Placement::Prepend);
	let mut symbols = SymbolStore::new();

	assert!(ctx.load("Plugin\\Thing", &mut symbols).unwrap());
	assert!(!ctx.load("Nowhere", &mut symbols).unwrap());

	assert_eq!(native.loads(), 2);
	assert_eq!(fallback.loads(), 2);
	assert!(symbols.is_materialized("plugin\\thing"));
}

/// Verifies that registering twice replaces the first installation.
#[test]
fn registering_twice_is_a_safe_replace() {
	let native: Arc<dyn Loader> = Counting::new(&["App\\Widget"]);
	let other: Arc<dyn Loader> = Counting::new(&[]);
	let ctx = LoaderContext::new();
	ctx.install(native.clone());
	ctx.install(other.clone());

	let loader = Arc::new(AliasLoader::new(native.clone()));
	loader.register(&ctx, Placement::Prepend);
	loader.register(&ctx, Placement::Append);

	let installed: Arc<dyn Loader> = loader.clone();
	order(&ctx, &[&other, &installed]);

	assert!(loader.unregister(&ctx));
	order(&ctx, &[&native, &other]);
	assert!(ctx.active_loader().is_none());
}

/// Verifies that a newer adapter displaces the older one and republishes it
/// when unregistered.
#[test]
fn newer_adapter_displaces_and_restores_older_one() {
	let native: Arc<dyn Loader> = Counting::new(&["App\\Widget"]);
	let ctx = LoaderContext::new();
	ctx.install(native.clone());

	let first = Arc::new(AliasLoader::new(native.clone()).with_alias_map(legacy_map()));
	first.register(&ctx, Placement::Prepend);
	let second = Arc::new(AliasLoader::new(native.clone()).with_alias_map(AliasMap::from_pairs([("Gadget", "App\\Widget")])));
	second.register(&ctx, Placement::Prepend);

	let first_dyn: Arc<dyn Loader> = first.clone();
	let second_dyn: Arc<dyn Loader> = second.clone();
	order(&ctx, &[&second_dyn]);
	assert_eq!(ctx.canonical_name_of("gadget"), "App\\Widget");
	assert_eq!(ctx.canonical_name_of("oldwidget"), "oldwidget");

	assert!(second.unregister(&ctx));
	order(&ctx, &[&first_dyn]);
	assert!(Arc::ptr_eq(&ctx.active_loader().unwrap(), &first));
	assert_eq!(ctx.canonical_name_of("oldwidget"), "App\\Widget");

	ctx.teardown();
	order(&ctx, &[&native]);
	assert!(ctx.active_loader().is_none());
}

/// Verifies that case-insensitive loading reaches a class map with folded keys.
#[test]
fn case_insensitive_loading_uses_folded_class_map() {
	let native = Arc::new(ClassMapLoader::new().with_entry("App\\Widget", "src/App/Widget.php").with_folded_keys());
	let ctx = LoaderContext::new();
	ctx.install(native.clone());
	let loader = Arc::new(AliasLoader::new(native).with_alias_map(legacy_map()).with_case_sensitive_loading(false));
	loader.register(&ctx, Placement::Prepend);
	let mut symbols = SymbolStore::new();

	assert!(ctx.load("app\\WIDGET", &mut symbols).unwrap());
	assert_eq!(symbols.declared_name("oldwidget"), Some("App\\Widget"));
}

/// Verifies that adapters unregistered out of order leave only the delegate
/// behind, with nothing published.
#[test]
fn out_of_order_unregister_unwinds_cleanly() {
	let native: Arc<dyn Loader> = Counting::new(&["App\\Widget"]);
	let ctx = LoaderContext::new();
	ctx.install(native.clone());

	let first = Arc::new(AliasLoader::new(native.clone()).with_alias_map(legacy_map()));
	first.register(&ctx, Placement::Prepend);
	let second = Arc::new(AliasLoader::new(native.clone()));
	second.register(&ctx, Placement::Prepend);

	assert!(first.unregister(&ctx));
	let second_dyn: Arc<dyn Loader> = second.clone();
	order(&ctx, &[&second_dyn]);
	assert!(Arc::ptr_eq(&ctx.active_loader().unwrap(), &second));
	assert!(!first.is_registered());

	assert!(second.unregister(&ctx));
	order(&ctx, &[&native]);
	assert!(ctx.active_loader().is_none());

	ctx.teardown();
	order(&ctx, &[&native]);
}
