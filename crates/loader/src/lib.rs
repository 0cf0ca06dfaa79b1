//! Dynamic class module loading.
//!
//! Companion to `taxa-registry`: when a class specification names libraries
//! and the class is not resident, the [`ModuleLoader`] searches the
//! [`ModuleDirectoryList`] for each library, loads it through a
//! [`PlatformLoader`], resolves the class's exported descriptor symbol (see
//! [`symbol::class_symbol`]) and registers the result.
//!
//! # Modules
//!
//! - [`dirs`] - Ordered module search roots
//! - [`symbol`] - Exported-symbol synthesis from class leaf names
//! - [`platform`] - The native dynamic-linking seam and its `libloading` impl
//! - [`loader`] - Resolution, registration and refcounted unloading
//! - [`error`] - Typed errors

pub mod dirs;
pub mod error;
pub mod loader;
pub mod platform;
pub mod symbol;

pub use dirs::ModuleDirectoryList;
pub use error::{LoadError, PlatformError};
pub use loader::ModuleLoader;
pub use platform::{PlatformLoader, SystemLoader};
pub use symbol::{SYMBOL_MAX, class_symbol};
