//! Label-priority lookups into the extension registries.
//!
//! Both lookups scan labels from the most specific to the least specific
//! and stop at the first label present in the registry.

use crate::classify::Labels;
use crate::output::Attributes;
use crate::registry::{Bindings, CustomAttrsRegistry, Override, OverrideRegistry};
use mdvtree_core::Element;

/// Resolves custom attributes for a node, or empty bindings when no label matches.
///
/// `combined` is the node's canonical attributes merged with its render
/// props; a function entry is invoked at most once.
pub fn resolve_custom_attrs(
    registry: &CustomAttrsRegistry,
    labels: &Labels,
    node: &Element,
    combined: &Attributes,
) -> Bindings {
    labels
        .most_specific_first()
        .find_map(|label| registry.get(label))
        .map(|entry| entry.resolve(node, combined))
        .unwrap_or_default()
}

/// Finds the override for the most specific registered label.
pub fn resolve_override<'r, 'l>(
    registry: &'r OverrideRegistry,
    labels: &'l Labels,
) -> Option<(&'l str, &'r (dyn Override + Send + Sync))> {
    labels
        .most_specific_first()
        .find_map(|label| registry.get(label).map(|handler| (label, handler)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputNode;
    use crate::registry::OverrideProps;
    use mdvtree_core::PropertyValue;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn labels(all: &[&str]) -> Labels {
        let mut labels = Labels::new(all[0]);
        for label in &all[1..] {
            labels.push(*label);
        }
        labels
    }

    fn bindings(attr: &str) -> Bindings {
        let mut bindings = Bindings::default();
        bindings.attrs.insert(attr.into(), PropertyValue::Bool(true));
        bindings
    }

    #[test]
    fn most_specific_override_wins() {
        let mut overrides = OverrideRegistry::new();
        overrides
            .insert("code", |_: OverrideProps| OutputNode::text("code"))
            .insert("inline-code", |_: OverrideProps| OutputNode::text("inline"));

        let inline = labels(&["code", "inline-code"]);
        let (label, _) = resolve_override(&overrides, &inline).unwrap();
        assert_eq!(label, "inline-code");

        let block = labels(&["code", "block-code"]);
        let (label, _) = resolve_override(&overrides, &block).unwrap();
        assert_eq!(label, "code");

        assert!(resolve_override(&overrides, &labels(&["p"])).is_none());
    }

    #[test]
    fn most_specific_custom_attrs_win() {
        let mut registry = CustomAttrsRegistry::new();
        registry
            .insert_static("h2", bindings("data-tag"))
            .insert_static("heading", bindings("data-heading"));

        let node = Element::new("h2");
        let resolved = resolve_custom_attrs(
            &registry,
            &labels(&["h2", "heading"]),
            &node,
            &Attributes::new(),
        );
        assert!(resolved.attrs.contains_key("data-heading"));
        assert!(!resolved.attrs.contains_key("data-tag"));
    }

    #[test]
    fn no_match_yields_empty_bindings() {
        let registry = CustomAttrsRegistry::new();
        let node = Element::new("p");
        let resolved = resolve_custom_attrs(&registry, &labels(&["p"]), &node, &Attributes::new());
        assert_eq!(resolved, Bindings::default());
    }

    #[test]
    fn computed_entry_runs_once_per_lookup() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut registry = CustomAttrsRegistry::new();
        registry.insert_computed("list", move |_: &Element, _: &Attributes| {
            counter.fetch_add(1, Ordering::SeqCst);
            Bindings::default()
        });
        registry.insert_static("ul", bindings("never"));

        let node = Element::new("ul");
        let resolved =
            resolve_custom_attrs(&registry, &labels(&["ul", "list"]), &node, &Attributes::new());
        assert!(resolved.attrs.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
