//! Class symbol synthesis.
//!
//! A dynamically loadable class library must export its descriptor under a
//! deterministic symbol derived from the class's leaf name. By convention a
//! leaf name begins with a short all-caps family prefix terminated by the
//! first underscore; the exported symbol is that prefix lowercased, the
//! remainder unchanged, and a literal `Class` suffix: `TX_Button` exports
//! `txButtonClass`. This is a stable contract any class library must honor
//! to be discoverable.

use crate::error::LoadError;

/// Maximum byte length of a synthesized symbol name.
pub const SYMBOL_MAX: usize = 128;

/// Synthesizes the exported descriptor symbol for a class leaf name.
///
/// A leaf without an underscore has no family prefix and is used unchanged,
/// with only the `Class` suffix appended.
pub fn class_symbol(leaf: &str) -> Result<String, LoadError> {
	let mut symbol = String::with_capacity(leaf.len() + 5);
	match leaf.split_once('_') {
		Some((family, rest)) => {
			symbol.extend(family.chars().map(|c| c.to_ascii_lowercase()));
			symbol.push_str(rest);
		}
		None => symbol.push_str(leaf),
	}
	symbol.push_str("Class");
	if symbol.len() > SYMBOL_MAX {
		return Err(LoadError::SymbolTooLong(leaf.to_owned()));
	}
	Ok(symbol)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn family_prefix_lowercased() {
		assert_eq!(class_symbol("TX_Button").unwrap(), "txButtonClass");
		assert_eq!(class_symbol("TXM_MapView").unwrap(), "txmMapViewClass");
	}

	#[test]
	fn only_first_underscore_splits() {
		assert_eq!(class_symbol("TX_Map_View").unwrap(), "txMap_ViewClass");
	}

	#[test]
	fn no_family_prefix() {
		assert_eq!(class_symbol("Widget").unwrap(), "WidgetClass");
	}

	#[test]
	fn too_long_is_an_error() {
		let leaf = format!("TX_{}", "a".repeat(SYMBOL_MAX));
		assert!(matches!(
			class_symbol(&leaf),
			Err(LoadError::SymbolTooLong(_))
		));
	}
}
