//! Class hierarchy registry for a dynamically extensible object system.
//!
//! This crate is the identification half of an object toolkit: it parses
//! class-specification strings, keeps a registry of [`ClassDescriptor`]s
//! keyed by hierarchy string, links them into a class tree under one fixed
//! root, and reconstructs ancestor chains. The companion `taxa-loader` crate
//! resolves specifications that name not-yet-resident classes by loading
//! their libraries.
//!
//! # Modules
//!
//! - [`descriptor`] - The persistent class description and hierarchy helpers
//! - [`spec`] - Specification-string parsing (flat and namespace dialects)
//! - [`namespace`] - Prefix-expansion table for the namespace dialect
//! - [`registry`] - The registry itself: register/unregister/lookup/walk
//! - [`error`] - Typed errors for all of the above

pub mod descriptor;
pub mod error;
#[cfg(feature = "namespaces")]
pub mod namespace;
pub mod registry;
pub mod spec;

pub use descriptor::{
	ClassDescriptor, ClassOps, ClassVersion, DestroyFn, EditFn, HIERARCHY_MAX, InitFn, LoadFn,
	ResetFn, SaveFn, leaf_of, parent_of,
};
pub use error::{RegistryError, SpecError, WalkError};
#[cfg(feature = "namespaces")]
pub use namespace::{NamespaceEntry, NamespaceTable};
pub use registry::{Registry, RegistryGuard};
pub use spec::ClassSpec;
