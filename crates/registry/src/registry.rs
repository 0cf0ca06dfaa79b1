//! The class registry: flat hierarchy map, class tree, and ancestor walks.
//!
//! A [`Registry`] is an explicit value owned by the embedding application's
//! startup code and shared by reference; multiple independent registries can
//! coexist (notably in tests). All mutation and lookup is serialized by one
//! reentrant lock: `register` may run while the lock is already held by a
//! nested dynamic-load resolution, so the module loader can hold the lock
//! across its whole check→load→register sequence via [`Registry::lock`].

use std::cell::RefCell;

#[cfg(feature = "namespaces")]
use parking_lot::RwLock;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use rustc_hash::FxHashMap;

use crate::descriptor::{ClassDescriptor, parent_of};
use crate::error::{RegistryError, SpecError, WalkError};
#[cfg(feature = "namespaces")]
use crate::namespace::{NamespaceEntry, NamespaceTable};
use crate::spec::{self, ClassSpec};

/// Per-class registry state: the descriptor plus tree linkage.
///
/// Tree linkage lives here rather than in the descriptor so descriptors stay
/// immutable `'static` data. Children are recorded by hierarchy key in
/// registration order. `libraries` is non-empty only for dynamically loaded
/// classes and preserves the order needed to unload them later.
struct Node {
	desc: &'static ClassDescriptor,
	children: Vec<&'static str>,
	libraries: Vec<String>,
}

struct State {
	classes: FxHashMap<&'static str, Node>,
}

/// Holds the registry lock.
///
/// The lock is reentrant: registry methods called while a guard is live on
/// the same thread do not deadlock.
pub struct RegistryGuard<'a> {
	_guard: ReentrantMutexGuard<'a, RefCell<State>>,
}

/// Mapping from hierarchy strings to class descriptors, with tree linkage.
///
/// The flat map is the source of truth for existence and parent resolution;
/// the tree is used for subclass enumeration. One fixed root descriptor is
/// installed at construction and can never be removed.
pub struct Registry {
	root: &'static ClassDescriptor,
	state: ReentrantMutex<RefCell<State>>,
	#[cfg(feature = "namespaces")]
	namespaces: RwLock<NamespaceTable>,
}

impl Registry {
	/// Creates a registry with `root` installed as the fixed root class.
	pub fn new(root: &'static ClassDescriptor) -> Self {
		let mut classes = FxHashMap::default();
		classes.insert(
			root.hierarchy,
			Node {
				desc: root,
				children: Vec::new(),
				libraries: Vec::new(),
			},
		);
		Self {
			root,
			state: ReentrantMutex::new(RefCell::new(State { classes })),
			#[cfg(feature = "namespaces")]
			namespaces: RwLock::new(NamespaceTable::new()),
		}
	}

	/// Returns the root descriptor.
	pub fn root(&self) -> &'static ClassDescriptor {
		self.root
	}

	/// Acquires the registry lock.
	///
	/// Registry operations lock internally; callers only need this to make a
	/// multi-step sequence atomic (the module loader holds it across
	/// lookup, library loading, and registration).
	pub fn lock(&self) -> RegistryGuard<'_> {
		RegistryGuard {
			_guard: self.state.lock(),
		}
	}

	/// Parses a class specification using the compiled-in dialect.
	pub fn parse(&self, input: &str) -> Result<ClassSpec, SpecError> {
		#[cfg(feature = "namespaces")]
		return spec::parse_namespaced(input, &self.namespaces.read());
		#[cfg(not(feature = "namespaces"))]
		return spec::parse_flat(input);
	}

	/// Registers a statically owned class descriptor.
	///
	/// The descriptor's parent (its hierarchy minus the last segment, or the
	/// root for a single-segment hierarchy) must already be registered.
	pub fn register(&self, desc: &'static ClassDescriptor) -> Result<(), RegistryError> {
		self.register_loaded(desc, Vec::new())
	}

	/// Registers a descriptor resolved from dynamically loaded libraries,
	/// remembering the library list for a later unload.
	pub fn register_loaded(
		&self,
		desc: &'static ClassDescriptor,
		libraries: Vec<String>,
	) -> Result<(), RegistryError> {
		let guard = self.state.lock();
		let mut state = guard.borrow_mut();
		if state.classes.contains_key(desc.hierarchy) {
			return Err(RegistryError::Duplicate(desc.hierarchy.to_owned()));
		}
		let parent_key = parent_of(desc.hierarchy).unwrap_or(self.root.hierarchy);
		let Some(parent) = state.classes.get_mut(parent_key) else {
			return Err(RegistryError::MissingParent {
				class: desc.hierarchy.to_owned(),
				parent: parent_key.to_owned(),
			});
		};
		parent.children.push(desc.hierarchy);
		state.classes.insert(
			desc.hierarchy,
			Node {
				desc,
				children: Vec::new(),
				libraries,
			},
		);
		tracing::debug!(class = desc.hierarchy, "registered class");
		Ok(())
	}

	/// Removes a class, detaching it from its parent's children list.
	///
	/// Returns the removed descriptor, or `None` if the hierarchy was never
	/// registered. The root refuses removal. Registered subclasses of the
	/// removed class stay in the flat map but become unreachable from the
	/// tree; their ancestor walks report a torn hierarchy.
	pub fn unregister(&self, hierarchy: &str) -> Option<&'static ClassDescriptor> {
		if hierarchy.is_empty() || hierarchy == self.root.hierarchy {
			tracing::warn!(class = self.root.hierarchy, "refusing to unregister root class");
			return None;
		}
		let guard = self.state.lock();
		let mut state = guard.borrow_mut();
		let node = state.classes.remove(hierarchy)?;
		let parent_key = parent_of(hierarchy).unwrap_or(self.root.hierarchy);
		if let Some(parent) = state.classes.get_mut(parent_key) {
			parent.children.retain(|&c| c != hierarchy);
		}
		tracing::debug!(class = hierarchy, "unregistered class");
		Some(node.desc)
	}

	/// Looks up a class by hierarchy string.
	///
	/// The empty string and the root's own name are synonyms that always
	/// resolve to the root without a map probe.
	pub fn lookup(&self, hierarchy: &str) -> Option<&'static ClassDescriptor> {
		if hierarchy.is_empty() || hierarchy == self.root.hierarchy {
			return Some(self.root);
		}
		let guard = self.state.lock();
		let state = guard.borrow();
		state.classes.get(hierarchy).map(|n| n.desc)
	}

	/// Returns the directly registered subclasses of a class, in
	/// registration order, or `None` if the class is not registered.
	pub fn children(&self, hierarchy: &str) -> Option<Vec<&'static ClassDescriptor>> {
		let key = if hierarchy.is_empty() { self.root.hierarchy } else { hierarchy };
		let guard = self.state.lock();
		let state = guard.borrow();
		let node = state.classes.get(key)?;
		Some(
			node.children
				.iter()
				.filter_map(|&c| state.classes.get(c))
				.map(|n| n.desc)
				.collect(),
		)
	}

	/// Returns the library list a dynamically loaded class was resolved
	/// from (empty for static classes), or `None` if not registered.
	pub fn libraries(&self, hierarchy: &str) -> Option<Vec<String>> {
		let key = if hierarchy.is_empty() { self.root.hierarchy } else { hierarchy };
		let guard = self.state.lock();
		let state = guard.borrow();
		state.classes.get(key).map(|n| n.libraries.clone())
	}

	/// Returns the number of registered classes, including the root.
	pub fn len(&self) -> usize {
		self.state.lock().borrow().classes.len()
	}

	/// Returns true if only the root is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 1
	}

	/// Reconstructs the ordered ancestor chain of a registered class, from
	/// the topmost hierarchy segment down to the class itself.
	///
	/// Every colon-delimited prefix of the hierarchy must resolve; a miss
	/// means an ancestor was unregistered after the descendant and the whole
	/// walk fails rather than returning a partial chain. A hierarchy with no
	/// colon yields exactly the class itself.
	pub fn ancestors(
		&self,
		desc: &ClassDescriptor,
	) -> Result<Vec<&'static ClassDescriptor>, WalkError> {
		let _guard = self.lock();
		let hierarchy = desc.hierarchy;
		let mut chain = Vec::new();
		for (i, _) in hierarchy.match_indices(':') {
			let prefix = &hierarchy[..i];
			let ancestor = self
				.lookup(prefix)
				.ok_or_else(|| WalkError::TornHierarchy(prefix.to_owned()))?;
			chain.push(ancestor);
		}
		let this = self
			.lookup(hierarchy)
			.ok_or_else(|| WalkError::TornHierarchy(hierarchy.to_owned()))?;
		chain.push(this);
		Ok(chain)
	}

	/// Registers a namespace for the namespace-qualified dialect.
	#[cfg(feature = "namespaces")]
	pub fn register_namespace(
		&self,
		name: impl Into<String>,
		prefix: impl Into<String>,
		url: Option<String>,
	) {
		self.namespaces.write().register(name, prefix, url);
	}

	/// Unregisters a namespace by exact name.
	///
	/// Hierarchy strings already expanded through it remain valid opaque
	/// keys; only future expansions are affected.
	#[cfg(feature = "namespaces")]
	pub fn unregister_namespace(&self, name: &str) -> Option<NamespaceEntry> {
		self.namespaces.write().unregister(name)
	}

	/// Returns a read guard over the namespace table.
	#[cfg(feature = "namespaces")]
	pub fn namespaces(&self) -> parking_lot::RwLockReadGuard<'_, NamespaceTable> {
		self.namespaces.read()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::descriptor::ClassVersion;

	static ROOT: ClassDescriptor = ClassDescriptor::new("TX_Object", 48, ClassVersion::new(1, 0));
	static WIDGET: ClassDescriptor =
		ClassDescriptor::new("TX_Widget", 96, ClassVersion::new(1, 0));
	static BUTTON: ClassDescriptor =
		ClassDescriptor::new("TX_Widget:TX_Button", 128, ClassVersion::new(1, 1));
	static CHECKBOX: ClassDescriptor =
		ClassDescriptor::new("TX_Widget:TX_Checkbox", 112, ClassVersion::new(1, 0));

	fn widget_registry() -> Registry {
		let registry = Registry::new(&ROOT);
		registry.register(&WIDGET).unwrap();
		registry.register(&BUTTON).unwrap();
		registry.register(&CHECKBOX).unwrap();
		registry
	}

	#[test]
	fn lookup_root_synonyms() {
		let registry = Registry::new(&ROOT);
		assert!(std::ptr::eq(registry.lookup("").unwrap(), &ROOT));
		assert!(std::ptr::eq(registry.lookup("TX_Object").unwrap(), &ROOT));
	}

	#[test]
	fn register_and_lookup() {
		let registry = widget_registry();
		assert!(std::ptr::eq(
			registry.lookup("TX_Widget:TX_Button").unwrap(),
			&BUTTON
		));
		assert!(registry.lookup("TX_Widget:TX_Label").is_none());
		assert_eq!(registry.len(), 4);
	}

	#[test]
	fn duplicate_registration_rejected() {
		let registry = widget_registry();
		assert_eq!(
			registry.register(&BUTTON),
			Err(RegistryError::Duplicate("TX_Widget:TX_Button".into()))
		);
		// The registry is unchanged: the first descriptor still resolves.
		assert!(std::ptr::eq(
			registry.lookup("TX_Widget:TX_Button").unwrap(),
			&BUTTON
		));
		assert_eq!(registry.len(), 4);
	}

	#[test]
	fn missing_parent_rejected() {
		let registry = Registry::new(&ROOT);
		assert_eq!(
			registry.register(&BUTTON),
			Err(RegistryError::MissingParent {
				class: "TX_Widget:TX_Button".into(),
				parent: "TX_Widget".into(),
			})
		);
		registry.register(&WIDGET).unwrap();
		registry.register(&BUTTON).unwrap();
	}

	#[test]
	fn root_refuses_removal() {
		let registry = widget_registry();
		assert!(registry.unregister("TX_Object").is_none());
		assert!(registry.unregister("").is_none());
		assert!(registry.lookup("TX_Object").is_some());
	}

	#[test]
	fn unregister_detaches_from_parent() {
		let registry = widget_registry();
		assert!(std::ptr::eq(
			registry.unregister("TX_Widget:TX_Button").unwrap(),
			&BUTTON
		));
		assert!(registry.unregister("TX_Widget:TX_Button").is_none());
		let children = registry.children("TX_Widget").unwrap();
		assert_eq!(children.len(), 1);
		assert!(std::ptr::eq(children[0], &CHECKBOX));
	}

	#[test]
	fn unregister_with_children_leaves_orphans_standalone() {
		let registry = widget_registry();
		registry.unregister("TX_Widget").unwrap();
		// Enumeration of the removed class is gone, not crashed.
		assert!(registry.children("TX_Widget").is_none());
		// The orphans stay valid standalone descriptors in the flat map.
		assert!(registry.lookup("TX_Widget:TX_Button").is_some());
		assert!(matches!(
			registry.ancestors(&BUTTON),
			Err(WalkError::TornHierarchy(prefix)) if prefix == "TX_Widget"
		));
	}

	#[test]
	fn children_in_registration_order() {
		let registry = widget_registry();
		let children = registry.children("TX_Widget").unwrap();
		assert_eq!(children.len(), 2);
		assert!(std::ptr::eq(children[0], &BUTTON));
		assert!(std::ptr::eq(children[1], &CHECKBOX));

		let top = registry.children("").unwrap();
		assert_eq!(top.len(), 1);
		assert!(std::ptr::eq(top[0], &WIDGET));
	}

	#[test]
	fn ancestors_root_to_leaf() {
		static LABEL: ClassDescriptor =
			ClassDescriptor::new("TX_Widget:TX_Button:TX_IconButton", 144, ClassVersion::new(1, 0));
		let registry = widget_registry();
		registry.register(&LABEL).unwrap();

		let chain = registry.ancestors(&LABEL).unwrap();
		assert_eq!(chain.len(), 3);
		assert!(std::ptr::eq(chain[0], &WIDGET));
		assert!(std::ptr::eq(chain[1], &BUTTON));
		assert!(std::ptr::eq(chain[2], &LABEL));
	}

	#[test]
	fn ancestors_of_root_is_itself() {
		let registry = widget_registry();
		let chain = registry.ancestors(&ROOT).unwrap();
		assert_eq!(chain.len(), 1);
		assert!(std::ptr::eq(chain[0], &ROOT));
	}

	#[test]
	fn libraries_recorded_for_loaded_classes() {
		static MAP: ClassDescriptor = ClassDescriptor::new("TX_Map", 256, ClassVersion::new(2, 0));
		let registry = widget_registry();
		registry
			.register_loaded(&MAP, vec!["map".into(), "mapedit".into()])
			.unwrap();
		assert_eq!(registry.libraries("TX_Map").unwrap(), vec!["map", "mapedit"]);
		assert_eq!(registry.libraries("TX_Widget").unwrap(), Vec::<String>::new());
		assert!(registry.libraries("TX_Nope").is_none());
	}

	#[cfg(feature = "namespaces")]
	#[test]
	fn parse_uses_registered_namespaces() {
		let registry = widget_registry();
		registry.register_namespace("Taxa", "TX_", None);
		let spec = registry.parse("Taxa(Widget:Button)").unwrap();
		assert_eq!(spec.hierarchy, "TX_Widget:TX_Button");
		assert!(std::ptr::eq(registry.lookup(&spec.hierarchy).unwrap(), &BUTTON));

		registry.unregister_namespace("Taxa");
		assert!(registry.parse("Taxa(Widget:Button)").is_err());
		// Previously expanded hierarchies remain valid opaque keys.
		assert!(registry.lookup("TX_Widget:TX_Button").is_some());
	}

	#[test]
	fn concurrent_registration() {
		static THREAD_CLASSES: [ClassDescriptor; 4] = [
			ClassDescriptor::new("TX_Widget:TX_A", 64, ClassVersion::new(1, 0)),
			ClassDescriptor::new("TX_Widget:TX_B", 64, ClassVersion::new(1, 0)),
			ClassDescriptor::new("TX_Widget:TX_C", 64, ClassVersion::new(1, 0)),
			ClassDescriptor::new("TX_Widget:TX_D", 64, ClassVersion::new(1, 0)),
		];
		let registry = Registry::new(&ROOT);
		registry.register(&WIDGET).unwrap();
		std::thread::scope(|scope| {
			for desc in &THREAD_CLASSES {
				let registry = &registry;
				scope.spawn(move || registry.register(desc).unwrap());
			}
		});
		assert_eq!(registry.children("TX_Widget").unwrap().len(), 4);
	}
}
