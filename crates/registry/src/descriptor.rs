//! Persistent class descriptions.
//!
//! A [`ClassDescriptor`] is the registry's unit of currency: plain `'static`
//! data describing one class (identity, instance layout size, version, and a
//! nullable operation table). Descriptors live in whoever registered them:
//! the embedding application's statics or a dynamically loaded library's
//! statics. The registry only holds references.

use core::ffi::{c_int, c_void};

/// Maximum byte length of a class specification or expanded hierarchy string.
pub const HIERARCHY_MAX: usize = 256;

/// Object initialization hook.
pub type InitFn = unsafe extern "C" fn(obj: *mut c_void);
/// Reset-to-defaults hook, invoked before destroy and before load.
pub type ResetFn = unsafe extern "C" fn(obj: *mut c_void);
/// Finalization hook.
pub type DestroyFn = unsafe extern "C" fn(obj: *mut c_void);
/// Instance deserialization hook.
pub type LoadFn =
	unsafe extern "C" fn(obj: *mut c_void, ds: *mut c_void, version: *const ClassVersion) -> c_int;
/// Instance serialization hook.
pub type SaveFn = unsafe extern "C" fn(obj: *mut c_void, ds: *mut c_void) -> c_int;
/// Editor/inspector constructor hook, returns a toolkit-specific handle.
pub type EditFn = unsafe extern "C" fn(obj: *mut c_void) -> *mut c_void;

/// Datafile compatibility version of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassVersion {
	/// Incompatible revisions of the instance data layout.
	pub major: u32,
	/// Backwards-compatible revisions.
	pub minor: u32,
}

impl ClassVersion {
	/// Creates a version record.
	pub const fn new(major: u32, minor: u32) -> Self {
		Self { major, minor }
	}
}

impl core::fmt::Display for ClassVersion {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "{}.{}", self.major, self.minor)
	}
}

/// Per-class operation table.
///
/// Every field is nullable. The registry stores and transports these pointers
/// but never invokes them; construction and dispatch of actual object
/// instances belongs to the embedding object system.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassOps {
	/// Initialize a freshly allocated instance.
	pub init: Option<InitFn>,
	/// Return an instance to its post-init state.
	pub reset: Option<ResetFn>,
	/// Finalize an instance.
	pub destroy: Option<DestroyFn>,
	/// Deserialize instance data.
	pub load: Option<LoadFn>,
	/// Serialize instance data.
	pub save: Option<SaveFn>,
	/// Construct an edition/inspector interface for an instance.
	pub edit: Option<EditFn>,
}

impl ClassOps {
	/// The empty operation table.
	pub const NONE: ClassOps = ClassOps {
		init: None,
		reset: None,
		destroy: None,
		load: None,
		save: None,
		edit: None,
	};
}

/// Description of one object class.
///
/// `hierarchy` is the unique registry key: the colon-separated path of class
/// names from the topmost ancestor to this class. The leaf name is always
/// derivable from it (see [`leaf_of`]), so it is not stored separately.
///
/// Descriptors are meant to be `static` items, built with the `const`
/// constructor and `with_*` setters:
///
/// ```rust
/// use taxa_registry::{ClassDescriptor, ClassVersion};
///
/// unsafe extern "C" fn widget_init(_obj: *mut core::ffi::c_void) {}
///
/// static WIDGET: ClassDescriptor =
///     ClassDescriptor::new("TX_Widget", 128, ClassVersion::new(1, 0))
///         .with_init(widget_init);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ClassDescriptor {
	/// Unique registry key; colon-separated ancestry path ending in this class.
	pub hierarchy: &'static str,
	/// Size in bytes of one instance of this class.
	pub instance_size: usize,
	/// Datafile compatibility version.
	pub version: ClassVersion,
	/// Operation table, opaque to the registry.
	pub ops: ClassOps,
}

impl ClassDescriptor {
	/// Creates a descriptor with an empty operation table.
	pub const fn new(hierarchy: &'static str, instance_size: usize, version: ClassVersion) -> Self {
		Self {
			hierarchy,
			instance_size,
			version,
			ops: ClassOps::NONE,
		}
	}

	/// Returns the leaf name (last hierarchy segment) of this class.
	pub fn name(&self) -> &'static str {
		leaf_of(self.hierarchy)
	}

	/// Sets the init operation.
	pub const fn with_init(mut self, f: InitFn) -> Self {
		self.ops.init = Some(f);
		self
	}

	/// Sets the reset operation.
	pub const fn with_reset(mut self, f: ResetFn) -> Self {
		self.ops.reset = Some(f);
		self
	}

	/// Sets the destroy operation.
	pub const fn with_destroy(mut self, f: DestroyFn) -> Self {
		self.ops.destroy = Some(f);
		self
	}

	/// Sets the load operation.
	pub const fn with_load(mut self, f: LoadFn) -> Self {
		self.ops.load = Some(f);
		self
	}

	/// Sets the save operation.
	pub const fn with_save(mut self, f: SaveFn) -> Self {
		self.ops.save = Some(f);
		self
	}

	/// Sets the edit operation.
	pub const fn with_edit(mut self, f: EditFn) -> Self {
		self.ops.edit = Some(f);
		self
	}
}

/// Returns the parent hierarchy of `hierarchy`, or `None` for a single
/// segment (a class registered directly under the root).
pub fn parent_of(hierarchy: &str) -> Option<&str> {
	hierarchy.rfind(':').map(|i| &hierarchy[..i])
}

/// Returns the leaf name of `hierarchy`: the suffix after the last colon, or
/// the whole string if no colon is present.
pub fn leaf_of(hierarchy: &str) -> &str {
	match hierarchy.rfind(':') {
		Some(i) => &hierarchy[i + 1..],
		None => hierarchy,
	}
}
