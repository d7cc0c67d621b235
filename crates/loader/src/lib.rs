//! Alias-aware symbol loading.
//!
//! Renamed or relocated symbols keep working under their old names. An
//! [`AliasLoader`] is installed in front of the host's native loader; every
//! load request is resolved to its canonical name through an [`AliasMap`], the
//! native loader materializes the canonical symbol once, and each configured
//! alias is then bound in the host [`SymbolTable`] as an equivalent name.
//!
//! # Pieces
//!
//! - [`AliasMap`]: alias → canonical index plus the reverse index
//! - [`AliasLoader`]: the adapter, itself a [`Loader`]
//! - [`LoaderContext`]: resolver stack and published loader of one process
//! - [`CanonicalNames`]: string-level normalization without an adapter
//!   reference
//! - [`SymbolStore`], [`ClassMapLoader`]: in-memory host pieces
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use alias_loader::{AliasLoader, AliasMap, ClassMapLoader, LoaderContext, Placement, SymbolStore, SymbolTable};
//!
//! let native = Arc::new(ClassMapLoader::new().with_entry("New\\Name", "src/Name.php"));
//! let ctx = LoaderContext::new();
//! ctx.install(native.clone());
//!
//! let loader = Arc::new(AliasLoader::new(native).with_alias_map(AliasMap::from_pairs([("Old_Name", "New\\Name")])));
//! loader.register(&ctx, Placement::Prepend);
//!
//! let mut symbols = SymbolStore::new();
//! assert!(ctx.load("Old_Name", &mut symbols)?);
//! assert_eq!(symbols.declared_name("old_name"), Some("New\\Name"));
//! assert_eq!(ctx.canonical_name_of("OLD_NAME"), "New\\Name");
//!
//! ctx.teardown();
//! assert_eq!(ctx.canonical_name_of("Old_Name"), "Old_Name");
//! # Ok::<(), alias_loader::LoaderError>(())
//! ```

mod classmap;
mod context;
mod delegate;
mod error;
mod facade;
mod loader;
pub mod map;
mod registration;
mod stack;
mod symbols;

pub use classmap::ClassMapLoader;
pub use context::LoaderContext;
pub use delegate::Loader;
pub use error::{BindError, ErrorCode, LoaderError, Result};
pub use facade::CanonicalNames;
pub use loader::AliasLoader;
pub use map::{AliasMap, fold_case};
pub use registration::Placement;
pub use stack::ResolverStack;
pub use symbols::{SymbolId, SymbolStore, SymbolTable};
