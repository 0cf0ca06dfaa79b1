//! Module search directories.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Ordered list of filesystem roots searched for class libraries.
///
/// Insertion order defines search precedence: the first directory holding a
/// candidate file wins. Trailing path separators are stripped at insertion
/// so registration and removal compare equal forms.
#[derive(Debug, Default)]
pub struct ModuleDirectoryList {
	dirs: Vec<PathBuf>,
}

fn normalize(path: PathBuf) -> PathBuf {
	match path.to_str() {
		Some(s) => {
			let trimmed = s.trim_end_matches(['/', '\\']);
			if trimmed.len() == s.len() { path } else { PathBuf::from(trimmed) }
		}
		// Non-UTF-8 paths are kept verbatim.
		None => path,
	}
}

impl ModuleDirectoryList {
	/// Creates an empty directory list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a list from a `PATH`-style environment variable, preserving
	/// the variable's ordering. An unset variable yields an empty list.
	pub fn from_env(var: &str) -> Self {
		match env::var_os(var) {
			Some(paths) => Self::from_search_path(&paths),
			None => Self::new(),
		}
	}

	/// Creates a list by splitting a `PATH`-style string.
	pub fn from_search_path(paths: &OsStr) -> Self {
		let mut list = Self::new();
		for path in env::split_paths(paths) {
			list.register(path);
		}
		list
	}

	/// Appends a search root.
	pub fn register(&mut self, path: impl Into<PathBuf>) {
		self.dirs.push(normalize(path.into()));
	}

	/// Removes the first search root matching `path`, returning whether one
	/// was removed.
	pub fn unregister(&mut self, path: impl Into<PathBuf>) -> bool {
		let path = normalize(path.into());
		match self.dirs.iter().position(|d| *d == path) {
			Some(i) => {
				self.dirs.remove(i);
				true
			}
			None => false,
		}
	}

	/// Returns the search roots in precedence order.
	pub fn iter(&self) -> impl Iterator<Item = &Path> {
		self.dirs.iter().map(PathBuf::as_path)
	}

	/// Returns the number of search roots.
	pub fn len(&self) -> usize {
		self.dirs.len()
	}

	/// Returns true if no search root is registered.
	pub fn is_empty(&self) -> bool {
		self.dirs.is_empty()
	}

	/// Finds the first existing candidate file for a library name.
	///
	/// Each directory is probed for the platform's shared-library form of
	/// the name (`lib<name>.so`, `<name>.dll`, ...) and for the bare name
	/// with only the platform suffix.
	pub fn find_library(&self, name: &str) -> Option<PathBuf> {
		let candidates = [
			format!("{}{}{}", env::consts::DLL_PREFIX, name, env::consts::DLL_SUFFIX),
			format!("{}{}", name, env::consts::DLL_SUFFIX),
		];
		for dir in &self.dirs {
			for candidate in &candidates {
				let path = dir.join(candidate);
				if path.is_file() {
					return Some(path);
				}
			}
		}
		None
	}
}
