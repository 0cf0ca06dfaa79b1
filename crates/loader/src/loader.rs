//! Resolution of class specifications against loadable modules.

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use taxa_registry::{ClassDescriptor, ClassSpec, Registry};

use crate::dirs::ModuleDirectoryList;
use crate::error::LoadError;
use crate::platform::PlatformLoader;
use crate::symbol;

struct LoadedLibrary<H> {
	handle: H,
	/// Number of registered classes resolved from this library.
	refs: usize,
}

/// Loads class libraries on demand and registers the descriptors they export.
///
/// `resolve` is idempotent: a specification whose hierarchy is already
/// registered returns the resident descriptor without touching the
/// filesystem. Libraries are shared between classes and reference counted;
/// a library is unloaded when the last class resolved from it is unloaded.
pub struct ModuleLoader<P: PlatformLoader> {
	platform: P,
	dirs: RwLock<ModuleDirectoryList>,
	loaded: Mutex<FxHashMap<String, LoadedLibrary<P::Handle>>>,
}

impl<P: PlatformLoader> ModuleLoader<P> {
	/// Creates a loader over the given platform facility and search roots.
	pub fn new(platform: P, dirs: ModuleDirectoryList) -> Self {
		Self {
			platform,
			dirs: RwLock::new(dirs),
			loaded: Mutex::new(FxHashMap::default()),
		}
	}

	/// Appends a module search root.
	pub fn register_directory(&self, path: impl Into<std::path::PathBuf>) {
		self.dirs.write().register(path);
	}

	/// Removes a module search root, returning whether one was removed.
	pub fn unregister_directory(&self, path: impl Into<std::path::PathBuf>) -> bool {
		self.dirs.write().unregister(path)
	}

	/// Parses a specification with the registry's dialect, then resolves it.
	pub fn resolve_spec(
		&self,
		registry: &Registry,
		input: &str,
	) -> Result<&'static ClassDescriptor, LoadError> {
		let spec = registry.parse(input)?;
		self.resolve(registry, &spec)
	}

	/// Resolves a specification to a registered descriptor, dynamically
	/// loading the specification's libraries if the class is not resident.
	///
	/// The registry lock is held for the whole sequence so that lookup,
	/// library loading and registration are atomic with respect to other
	/// registry users. On failure, libraries already loaded during this
	/// attempt are not rolled back.
	pub fn resolve(
		&self,
		registry: &Registry,
		spec: &ClassSpec,
	) -> Result<&'static ClassDescriptor, LoadError> {
		let _guard = registry.lock();
		if let Some(desc) = registry.lookup(&spec.hierarchy) {
			return Ok(desc);
		}
		let Some(first) = spec.libraries.first() else {
			return Err(LoadError::NotFound(spec.hierarchy.clone()));
		};

		let symbol = symbol::class_symbol(&spec.name)?;
		self.load_library(first)?;
		let addr = self.resolve_in(first, &symbol)?;
		for name in &spec.libraries[1..] {
			self.load_library(name)?;
		}

		// Safety: the platform contract guarantees the symbol addresses a
		// ClassDescriptor static that stays valid while the library handle
		// is held; the handle is retained until the class is unloaded.
		let desc: &'static ClassDescriptor = unsafe { &*addr.cast::<ClassDescriptor>() };
		if desc.hierarchy != spec.hierarchy {
			tracing::warn!(
				requested = spec.hierarchy.as_str(),
				exported = desc.hierarchy,
				"loaded descriptor is keyed differently than the specification"
			);
		}
		registry.register_loaded(desc, spec.libraries.clone())?;
		tracing::debug!(class = desc.hierarchy, library = first.as_str(), "resolved class");
		Ok(desc)
	}

	/// Unregisters a class and releases the libraries it was resolved from,
	/// in their original load order.
	///
	/// A statically registered class has no libraries and is simply
	/// unregistered.
	pub fn unload(&self, registry: &Registry, hierarchy: &str) -> Result<(), LoadError> {
		let _guard = registry.lock();
		let libraries = registry
			.libraries(hierarchy)
			.ok_or_else(|| LoadError::NotRegistered(hierarchy.to_owned()))?;
		if registry.unregister(hierarchy).is_none() {
			// The root descriptor refuses removal.
			return Err(LoadError::NotRegistered(hierarchy.to_owned()));
		}
		let mut loaded = self.loaded.lock();
		for name in &libraries {
			if let Some(library) = loaded.get_mut(name) {
				library.refs -= 1;
				if library.refs == 0 {
					loaded.remove(name);
					tracing::info!(library = name.as_str(), "unloaded class library");
				}
			}
		}
		Ok(())
	}

	/// Loads a library by name, or bumps its reference count if it is
	/// already resident.
	fn load_library(&self, name: &str) -> Result<(), LoadError> {
		let mut loaded = self.loaded.lock();
		if let Some(library) = loaded.get_mut(name) {
			library.refs += 1;
			return Ok(());
		}
		let path = self
			.dirs
			.read()
			.find_library(name)
			.ok_or_else(|| LoadError::LibraryNotFound { name: name.to_owned() })?;
		let handle = self.platform.load(&path).map_err(|e| LoadError::Library {
			name: name.to_owned(),
			message: e.to_string(),
		})?;
		tracing::info!(library = name, path = %path.display(), "loaded class library");
		loaded.insert(name.to_owned(), LoadedLibrary { handle, refs: 1 });
		Ok(())
	}

	/// Resolves a symbol in an already-loaded library.
	fn resolve_in(&self, name: &str, symbol: &str) -> Result<*const (), LoadError> {
		let loaded = self.loaded.lock();
		let library = loaded
			.get(name)
			.ok_or_else(|| LoadError::LibraryNotFound { name: name.to_owned() })?;
		self.platform
			.resolve(&library.handle, symbol)
			.map_err(|e| LoadError::Symbol {
				symbol: symbol.to_owned(),
				library: name.to_owned(),
				message: e.to_string(),
			})
	}
}
