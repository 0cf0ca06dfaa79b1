//! End-to-end registry behavior over a small widget-style class tree.

use taxa_registry::{ClassDescriptor, ClassVersion, Registry};

static ROOT: ClassDescriptor = ClassDescriptor::new("TX_Object", 48, ClassVersion::new(1, 0));
static WIDGET: ClassDescriptor = ClassDescriptor::new("TX_Widget", 96, ClassVersion::new(1, 0));
static BUTTON: ClassDescriptor =
	ClassDescriptor::new("TX_Widget:TX_Button", 128, ClassVersion::new(1, 1));
static TOOLBAR: ClassDescriptor =
	ClassDescriptor::new("TX_Widget:TX_Box:TX_Toolbar", 160, ClassVersion::new(1, 0));
static BOX: ClassDescriptor =
	ClassDescriptor::new("TX_Widget:TX_Box", 112, ClassVersion::new(1, 0));

#[test]
fn parse_register_walk() {
	let registry = Registry::new(&ROOT);
	registry.register(&WIDGET).unwrap();
	registry.register(&BUTTON).unwrap();

	let spec = registry.parse("TX_Widget:TX_Button").unwrap();
	assert_eq!(spec.name, "TX_Button");
	let desc = registry.lookup(&spec.hierarchy).unwrap();
	assert!(std::ptr::eq(desc, &BUTTON));

	let chain = registry.ancestors(desc).unwrap();
	assert_eq!(chain.len(), 2);
	assert!(std::ptr::eq(chain[0], &WIDGET));
	assert!(std::ptr::eq(chain[1], &BUTTON));
}

#[test]
fn three_level_walk() {
	let registry = Registry::new(&ROOT);
	registry.register(&WIDGET).unwrap();
	registry.register(&BOX).unwrap();
	registry.register(&TOOLBAR).unwrap();

	let chain = registry.ancestors(&TOOLBAR).unwrap();
	assert_eq!(chain.len(), 3);
	assert!(std::ptr::eq(chain[0], &WIDGET));
	assert!(std::ptr::eq(chain[1], &BOX));
	assert!(std::ptr::eq(chain[2], &TOOLBAR));
}

#[cfg(feature = "namespaces")]
#[test]
fn namespace_expansion_is_order_independent() {
	let a = Registry::new(&ROOT);
	a.register_namespace("Taxa", "TX_", None);
	a.register_namespace("Ext", "EXT_", None);

	let b = Registry::new(&ROOT);
	b.register_namespace("Ext", "EXT_", None);
	b.register_namespace("Taxa", "TX_", None);

	let sa = a.parse("Taxa(Widget:Button)").unwrap();
	let sb = b.parse("Taxa(Widget:Button)").unwrap();
	assert_eq!(sa.hierarchy, "TX_Widget:TX_Button");
	assert_eq!(sa, sb);
}
