//! Error types for alias resolution and loading.

use thiserror::Error;

/// Stable numeric codes callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
	/// An empty lookup or configuration key.
	EmptyKey = 1444039407,
	/// A lookup key containing whitespace or control characters.
	MalformedKey = 1444039408,
	/// An alias already names an unrelated symbol.
	AliasCollision = 1444039409,
	/// A forwarded capability that neither the adapter nor the delegate implements.
	UnsupportedOperation = 1444039410,
	/// The host symbol table refused to bind an alias.
	Bind = 1444039411,
}

impl ErrorCode {
	/// Returns the numeric value of this code.
	#[inline]
	pub const fn as_u32(self) -> u32 {
		self as u32
	}
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_u32())
	}
}

/// Errors reported by the host symbol table when binding names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
	/// The name is already bound to some symbol.
	#[error("symbol name already in use: {name}")]
	NameTaken { name: String },
	/// The bind target has not been materialized.
	#[error("cannot alias unknown symbol: {name}")]
	UnknownTarget { name: String },
	/// The table cannot issue more symbol handles.
	#[error("symbol table is full")]
	TableFull,
}

/// Errors from the alias loader.
///
/// "Not found" is never an error: load operations report it as `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
	/// An empty symbol name was passed to resolution.
	#[error("lookup key must not be empty")]
	EmptyKey,
	/// A symbol name that can never name a symbol.
	#[error("malformed lookup key: {key:?}")]
	MalformedKey { key: String },
	/// Binding `alias` would shadow an unrelated symbol.
	#[error("alias {alias:?} for {canonical} collides with existing symbol {existing}")]
	AliasCollision {
		alias: String,
		canonical: String,
		existing: String,
	},
	/// Capability not implemented by the adapter or its delegate.
	#[error("unsupported operation: {capability}")]
	UnsupportedOperation { capability: String },
	/// The host refused a bind after the collision check passed.
	#[error("alias bind failed: {0}")]
	Bind(#[from] BindError),
}

impl LoaderError {
	/// Returns the stable code for this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::EmptyKey => ErrorCode::EmptyKey,
			Self::MalformedKey { .. } => ErrorCode::MalformedKey,
			Self::AliasCollision { .. } => ErrorCode::AliasCollision,
			Self::UnsupportedOperation { .. } => ErrorCode::UnsupportedOperation,
			Self::Bind(_) => ErrorCode::Bind,
		}
	}

	pub(crate) fn unsupported(capability: &str) -> Self {
		Self::UnsupportedOperation {
			capability: capability.to_owned(),
		}
	}
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Rejects names that can never be symbol names.
pub(crate) fn validate_key(key: &str) -> Result<()> {
	if key.is_empty() {
		return Err(LoaderError::EmptyKey);
	}
	if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
		return Err(LoaderError::MalformedKey { key: key.to_owned() });
	}
	Ok(())
}
