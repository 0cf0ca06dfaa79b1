//! Native dynamic-linking facade.
//!
//! [`PlatformLoader`] is the only seam through which native shared-library
//! facilities are touched; everything above it is platform-independent and
//! testable against an in-memory implementation. [`SystemLoader`] is the
//! shipped implementation, backed by `libloading`.

use std::path::Path;

use libloading::Library;

use crate::error::PlatformError;

/// Native dynamic-linking operations.
///
/// A loaded library is represented by `Handle`; dropping the handle unloads
/// the library. A resolved class symbol must be the address of a
/// `ClassDescriptor` static inside the library, valid for as long as the
/// handle is held.
pub trait PlatformLoader {
	/// Keep-alive handle for a loaded library.
	type Handle;

	/// Loads the library at `path`.
	fn load(&self, path: &Path) -> Result<Self::Handle, PlatformError>;

	/// Resolves an exported symbol to its address.
	fn resolve(&self, handle: &Self::Handle, symbol: &str) -> Result<*const (), PlatformError>;
}

/// [`PlatformLoader`] backed by the operating system's dynamic linker.
#[derive(Debug, Default)]
pub struct SystemLoader;

impl PlatformLoader for SystemLoader {
	type Handle = Library;

	fn load(&self, path: &Path) -> Result<Library, PlatformError> {
		// Safety: library initializers run here. The module-path contract is
		// that class libraries are safe to load and keep resident.
		unsafe { Library::new(path) }.map_err(|e| PlatformError::Load(e.to_string()))
	}

	fn resolve(&self, handle: &Library, symbol: &str) -> Result<*const (), PlatformError> {
		// Safety: the symbol is only surfaced as an address; interpreting it
		// is the caller's contract. Deref of a Symbol<*const ()> yields the
		// symbol's address itself, not a load through it.
		let sym = unsafe { handle.get::<*const ()>(symbol.as_bytes()) }
			.map_err(|e| PlatformError::Symbol(e.to_string()))?;
		Ok(*sym)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn load_of_missing_file_fails() {
		let loader = SystemLoader;
		let result = loader.load(Path::new("/nonexistent/taxa/libnope.so"));
		assert!(matches!(result, Err(PlatformError::Load(_))));
	}
}
