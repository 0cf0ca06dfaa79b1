//! Class-specification parsing.
//!
//! Two dialects name a class. The flat dialect is a colon path with an
//! optional library suffix: `TX_Widget:TX_Button@mylib`. The namespace
//! dialect is a superset that additionally allows one parenthesized group,
//! expanded through the [`NamespaceTable`]: `Taxa(Widget:Button)` with
//! namespace `Taxa` bound to prefix `TX_` yields `TX_Widget:TX_Button`.
//! Every flat-form specification is also valid namespace-dialect input.
//!
//! Which dialect is active is a compile-time choice for the whole subsystem:
//! the `namespaces` cargo feature. [`Registry::parse`] applies the selected
//! dialect; [`parse_flat`] is always available.
//!
//! [`Registry::parse`]: crate::Registry::parse

use crate::descriptor::{HIERARCHY_MAX, leaf_of};
use crate::error::SpecError;
#[cfg(feature = "namespaces")]
use crate::namespace::NamespaceTable;

/// Normalized class specification.
///
/// Transient: produced by parsing, consumed by registry lookup and by the
/// module loader. `hierarchy` never contains the `@` library separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpec {
	/// Colon-separated ancestry path; the registry key.
	pub hierarchy: String,
	/// Leaf name: last segment of `hierarchy`.
	pub name: String,
	/// Libraries to load if the class is not resident, in load order.
	pub libraries: Vec<String>,
	/// Canonical display form: hierarchy plus optional `@lib,...` suffix.
	pub spec: String,
}

/// Splits the `@lib1,lib2,...` suffix off a specification string.
fn split_libraries(input: &str) -> (&str, Vec<String>) {
	match input.split_once('@') {
		Some((body, libs)) => {
			let libraries = libs
				.split(',')
				.filter(|l| !l.is_empty())
				.map(str::to_owned)
				.collect();
			(body, libraries)
		}
		None => (input, Vec::new()),
	}
}

fn build(hierarchy: String, libraries: Vec<String>) -> Result<ClassSpec, SpecError> {
	if hierarchy.len() > HIERARCHY_MAX {
		return Err(SpecError::TooLong);
	}
	let spec = if libraries.is_empty() {
		hierarchy.clone()
	} else {
		format!("{hierarchy}@{}", libraries.join(","))
	};
	Ok(ClassSpec {
		name: leaf_of(&hierarchy).to_owned(),
		hierarchy,
		libraries,
		spec,
	})
}

/// Parses a flat-dialect specification.
///
/// The library suffix is split off at the first `@`; the remainder is the
/// hierarchy verbatim. The only validation is the [`HIERARCHY_MAX`] bound.
pub fn parse_flat(input: &str) -> Result<ClassSpec, SpecError> {
	let (body, libraries) = split_libraries(input);
	build(body.to_owned(), libraries)
}

/// Parses a namespace-dialect specification.
///
/// At most one parenthesized group may appear; the text outside the group is
/// the (possibly empty) namespace name. Each colon-delimited segment inside
/// the group is expanded by prepending the namespace's prefix. An empty group
/// degenerates to flat parsing of the remaining text, as does input with no
/// group at all.
#[cfg(feature = "namespaces")]
pub fn parse_namespaced(
	input: &str,
	namespaces: &NamespaceTable,
) -> Result<ClassSpec, SpecError> {
	if input.len() > HIERARCHY_MAX {
		return Err(SpecError::TooLong);
	}
	let (body, libraries) = split_libraries(input);

	let mut ns_name = String::new();
	let mut group: Option<String> = None;
	let mut inside = false;
	for ch in body.chars() {
		match ch {
			'(' => {
				if inside || group.is_some() {
					return Err(SpecError::Syntax("more than one parenthesized group"));
				}
				inside = true;
				group = Some(String::new());
			}
			')' => {
				if !inside {
					return Err(SpecError::Syntax("unmatched closing parenthesis"));
				}
				inside = false;
			}
			ch if inside => {
				// The open-paren arm guarantees the group buffer exists here.
				if let Some(g) = group.as_mut() {
					g.push(ch);
				}
			}
			ch => ns_name.push(ch),
		}
	}
	if inside {
		return Err(SpecError::Syntax("unterminated parenthesized group"));
	}

	let group = match group.as_deref() {
		// No group, or the degenerate empty group: flat parsing of whatever
		// text remains.
		None | Some("") => return build(ns_name, libraries),
		Some(g) => g,
	};

	let entry = namespaces
		.lookup(&ns_name)
		.ok_or_else(|| SpecError::UnknownNamespace(ns_name.clone()))?;

	let mut hierarchy = String::new();
	for segment in group.split(':') {
		hierarchy.push_str(&entry.prefix);
		hierarchy.push_str(segment);
		hierarchy.push(':');
	}
	// Expansion always leaves one trailing colon; strip it.
	hierarchy.pop();

	build(hierarchy, libraries)
}
