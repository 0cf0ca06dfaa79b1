//! Typed errors for specification parsing, registration and ancestry walks.
//!
//! All conditions here are recoverable and reported to the caller; nothing in
//! the registry aborts the process. [`RegistryError`] and [`WalkError`]
//! indicate defects in the embedding application, while [`SpecError`] covers
//! ordinary bad input.

use thiserror::Error;

use crate::descriptor::HIERARCHY_MAX;

/// Failure to parse a class-specification string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
	/// The specification or its expanded hierarchy exceeds [`HIERARCHY_MAX`].
	#[error("class specification exceeds {HIERARCHY_MAX} bytes")]
	TooLong,
	/// Malformed parenthesization or stray tokens.
	#[error("malformed class specification: {0}")]
	Syntax(&'static str),
	/// The parenthesized group names a namespace that is not registered.
	#[cfg(feature = "namespaces")]
	#[error("unknown namespace: {0:?}")]
	UnknownNamespace(String),
}

/// Failure to register a class descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
	/// The hierarchy key is already registered. Silent overwrite would
	/// corrupt tree linkage for already-resolved children, so the second
	/// registration is rejected and the registry is left unchanged.
	#[error("class {0:?} is already registered")]
	Duplicate(String),
	/// The computed parent hierarchy is not itself registered.
	#[error("class {class:?} requires unregistered parent {parent:?}")]
	MissingParent {
		/// Hierarchy of the class being registered.
		class: String,
		/// Hierarchy the registration expects to exist.
		parent: String,
	},
}

/// Failure to reconstruct a class's ancestor chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalkError {
	/// A hierarchy prefix failed to resolve: an ancestor was unregistered
	/// after a descendant was registered.
	#[error("torn hierarchy: ancestor {0:?} is not registered")]
	TornHierarchy(String),
}
