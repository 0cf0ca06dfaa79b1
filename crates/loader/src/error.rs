//! Typed errors for module loading.

use taxa_registry::{RegistryError, SpecError};
use thiserror::Error;

use crate::symbol::SYMBOL_MAX;

/// Failure inside a [`PlatformLoader`] implementation.
///
/// Native loader errors are stringified at the platform boundary; the
/// [`ModuleLoader`] wraps them with the library and symbol names.
///
/// [`PlatformLoader`]: crate::PlatformLoader
/// [`ModuleLoader`]: crate::ModuleLoader
#[derive(Error, Debug, Clone)]
pub enum PlatformError {
	/// The native facility failed to load the library.
	#[error("{0}")]
	Load(String),
	/// The native facility failed to resolve a symbol.
	#[error("{0}")]
	Symbol(String),
}

/// Failure to resolve a class specification to a registered descriptor.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
	/// The class is not registered and the specification names no library
	/// to load it from.
	#[error("class {0:?} not found and no library specified")]
	NotFound(String),
	/// No loadable file for the library exists in any module directory.
	#[error("library {name:?} not found in module path")]
	LibraryNotFound {
		/// Library name as given in the specification.
		name: String,
	},
	/// The platform failed to load a library file.
	#[error("failed to load library {name:?}: {message}")]
	Library {
		/// Library name as given in the specification.
		name: String,
		/// Stringified platform error.
		message: String,
	},
	/// The class symbol could not be resolved in the first library.
	#[error("symbol {symbol:?} not found in library {library:?}: {message}")]
	Symbol {
		/// The synthesized symbol name.
		symbol: String,
		/// Library the symbol was expected in.
		library: String,
		/// Stringified platform error.
		message: String,
	},
	/// The synthesized symbol name would exceed [`SYMBOL_MAX`].
	#[error("symbol name for class {0:?} exceeds {SYMBOL_MAX} bytes")]
	SymbolTooLong(String),
	/// Unload was requested for a hierarchy that is not registered.
	#[error("class {0:?} is not registered")]
	NotRegistered(String),
	/// The specification string failed to parse.
	#[error(transparent)]
	Spec(#[from] SpecError),
	/// The loaded descriptor failed to register.
	#[error(transparent)]
	Registry(#[from] RegistryError),
}
