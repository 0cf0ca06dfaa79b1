//! Namespace table for the namespace-qualified specification dialect.
//!
//! A namespace maps a short name (`Taxa`) to a prefix (`TX_`) that expansion
//! prepends to every segment of a parenthesized group, so `Taxa(Widget:Button)`
//! becomes `TX_Widget:TX_Button`. Unregistering a namespace only affects
//! future expansions: hierarchy strings already expanded with it remain valid
//! opaque registry keys.

/// One namespace registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceEntry {
	/// Name used inside specification strings.
	pub name: String,
	/// Prefix prepended to each expanded segment.
	pub prefix: String,
	/// Project URL, diagnostic metadata only.
	pub url: Option<String>,
}

/// Ordered, growable list of namespace registrations.
///
/// Lookup returns the first entry matching a name; insertion order is
/// preserved.
#[derive(Debug, Default)]
pub struct NamespaceTable {
	entries: Vec<NamespaceEntry>,
}

impl NamespaceTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a namespace registration.
	pub fn register(
		&mut self,
		name: impl Into<String>,
		prefix: impl Into<String>,
		url: Option<String>,
	) {
		self.entries.push(NamespaceEntry {
			name: name.into(),
			prefix: prefix.into(),
			url,
		});
	}

	/// Removes the first registration matching `name` exactly, returning it.
	pub fn unregister(&mut self, name: &str) -> Option<NamespaceEntry> {
		let i = self.entries.iter().position(|e| e.name == name)?;
		Some(self.entries.remove(i))
	}

	/// Returns the first registration matching `name`.
	pub fn lookup(&self, name: &str) -> Option<&NamespaceEntry> {
		self.entries.iter().find(|e| e.name == name)
	}

	/// Returns registrations in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &NamespaceEntry> {
		self.entries.iter()
	}

	/// Returns the number of registrations.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if no namespace is registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
