//! Caller-supplied extension registries keyed by category label.

use crate::classify::RenderProps;
use crate::output::{Attributes, ComponentNode, ElementNode, Listeners, OutputNode};
use mdvtree_core::{Element, MdvtreeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Extra attributes and event bindings contributed for a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bindings {
    /// Attributes merged over the node's own (these win on conflict).
    pub attrs: Attributes,
    /// Event bindings.
    pub on: Listeners,
}

/// Function form of a custom-attributes entry.
///
/// Receives the node and its canonical attributes merged with its render props.
pub type ComputeBindings = dyn Fn(&Element, &Attributes) -> Bindings + Send + Sync;

/// A custom-attributes entry.
#[derive(Clone)]
pub enum CustomAttrs {
    /// Fixed bindings.
    Static(Bindings),
    /// Bindings computed per node.
    Computed(Arc<ComputeBindings>),
}

impl CustomAttrs {
    /// Resolves the entry for one node.
    pub fn resolve(&self, node: &Element, combined: &Attributes) -> Bindings {
        match self {
            CustomAttrs::Static(bindings) => bindings.clone(),
            CustomAttrs::Computed(compute) => compute(node, combined),
        }
    }
}

impl fmt::Debug for CustomAttrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomAttrs::Static(bindings) => f.debug_tuple("Static").field(bindings).finish(),
            CustomAttrs::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Custom attributes keyed by category label.
#[derive(Debug, Clone, Default)]
pub struct CustomAttrsRegistry {
    entries: HashMap<String, CustomAttrs>,
}

impl CustomAttrsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers fixed bindings for a label.
    pub fn insert_static(&mut self, label: impl Into<String>, bindings: Bindings) -> &mut Self {
        self.entries
            .insert(label.into(), CustomAttrs::Static(bindings));
        self
    }

    /// Registers a bindings function for a label.
    pub fn insert_computed<F>(&mut self, label: impl Into<String>, compute: F) -> &mut Self
    where
        F: Fn(&Element, &Attributes) -> Bindings + Send + Sync + 'static,
    {
        self.entries
            .insert(label.into(), CustomAttrs::Computed(Arc::new(compute)));
        self
    }

    /// Returns the entry for a label.
    pub fn get(&self, label: &str) -> Option<&CustomAttrs> {
        self.entries.get(label)
    }
}

/// Everything an override receives for the node it replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideProps {
    /// Tag name of the replaced element.
    pub tag: String,
    /// Sibling key of the replaced element.
    pub key: String,
    /// Canonical attributes with custom attributes merged on top.
    pub attrs: Attributes,
    /// Render props from classification.
    pub props: RenderProps,
    /// Event bindings from the custom-attributes registry.
    pub on: Listeners,
    /// The element's children, already rendered.
    pub children: Vec<OutputNode>,
}

impl OverrideProps {
    /// Attributes and render props in one map; render props win on conflict.
    pub fn merged(&self) -> Attributes {
        let mut merged = self.attrs.clone();
        merged.extend(self.props.to_map());
        merged
    }

    /// Wraps everything into a component invocation named `name`.
    pub fn into_component(self, name: impl Into<String>) -> OutputNode {
        OutputNode::Component(ComponentNode {
            name: name.into(),
            props: self.merged(),
            on: self.on,
            children: self.children,
        })
    }

    /// Builds the node default rendering would have produced.
    pub fn into_element(self) -> OutputNode {
        OutputNode::Element(ElementNode {
            tag: self.tag,
            key: self.key,
            attrs: self.attrs,
            on: self.on,
            children: self.children,
        })
    }
}

/// A render override.
pub trait Override {
    /// Produces the replacement output for a node.
    fn render(&self, props: OverrideProps) -> OutputNode;
}

impl<F> Override for F
where
    F: Fn(OverrideProps) -> OutputNode,
{
    fn render(&self, props: OverrideProps) -> OutputNode {
        (self)(props)
    }
}

/// Render overrides keyed by category label.
#[derive(Clone, Default)]
pub struct OverrideRegistry {
    entries: HashMap<String, Arc<dyn Override + Send + Sync>>,
}

impl OverrideRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an override for a label.
    pub fn insert<O>(&mut self, label: impl Into<String>, handler: O) -> &mut Self
    where
        O: Override + Send + Sync + 'static,
    {
        self.entries.insert(label.into(), Arc::new(handler));
        self
    }

    /// Returns the override for a label.
    pub fn get(&self, label: &str) -> Option<&(dyn Override + Send + Sync)> {
        self.entries.get(label).map(|handler| handler.as_ref())
    }
}

impl fmt::Debug for OverrideRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut labels: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        labels.sort_unstable();
        f.debug_struct("OverrideRegistry")
            .field("labels", &labels)
            .finish()
    }
}

/// Static registry configuration, typically passed in as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryConfig {
    /// Static custom attributes keyed by category label.
    pub custom_attrs: HashMap<String, Bindings>,
}

impl RegistryConfig {
    /// Parses a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, MdvtreeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds a custom-attributes registry of static entries.
    pub fn custom_attrs_registry(&self) -> CustomAttrsRegistry {
        let mut registry = CustomAttrsRegistry::new();
        for (label, bindings) in &self.custom_attrs {
            registry.insert_static(label.clone(), bindings.clone());
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdvtree_core::PropertyValue;

    #[test]
    fn static_and_computed_entries_resolve() {
        let mut registry = CustomAttrsRegistry::new();
        let mut fixed = Bindings::default();
        fixed.attrs.insert("target".into(), PropertyValue::from("_blank"));
        registry
            .insert_static("a", fixed.clone())
            .insert_computed("heading", |node: &Element, combined: &Attributes| {
                let mut bindings = Bindings::default();
                bindings
                    .attrs
                    .insert("data-tag".into(), PropertyValue::from(node.tag_name.as_str()));
                if let Some(level) = combined.get("level") {
                    bindings.attrs.insert("data-level".into(), level.clone());
                }
                bindings
            });

        let a = Element::new("a");
        assert_eq!(registry.get("a").unwrap().resolve(&a, &Attributes::new()), fixed);

        let h2 = Element::new("h2");
        let mut combined = Attributes::new();
        combined.insert("level".into(), PropertyValue::Int(2));
        let computed = registry.get("heading").unwrap().resolve(&h2, &combined);
        assert_eq!(computed.attrs.get("data-tag"), Some(&PropertyValue::from("h2")));
        assert_eq!(computed.attrs.get("data-level"), Some(&PropertyValue::Int(2)));
        assert!(computed.on.is_empty());
    }

    #[test]
    fn config_parses_static_bindings_with_defaults() {
        let config = RegistryConfig::from_json(
            r#"{ "customAttrs": {
                "a": { "attrs": { "rel": "noopener" } },
                "button": { "on": { "click": "handleClick" } }
            } }"#,
        )
        .unwrap();

        let registry = config.custom_attrs_registry();
        let node = Element::new("a");
        let a = registry.get("a").unwrap().resolve(&node, &Attributes::new());
        assert_eq!(a.attrs.get("rel"), Some(&PropertyValue::from("noopener")));
        assert!(a.on.is_empty());

        let button = registry.get("button").unwrap().resolve(&node, &Attributes::new());
        assert_eq!(button.on.get("click").map(String::as_str), Some("handleClick"));
    }

    #[test]
    fn invalid_config_is_a_config_error() {
        let err = RegistryConfig::from_json(r#"{ "customAttrs": [] }"#).unwrap_err();
        assert!(matches!(err, MdvtreeError::Config(_)));
    }

    #[test]
    fn override_props_helpers() {
        let mut attrs = Attributes::new();
        attrs.insert("id".into(), PropertyValue::from("x"));
        let props = OverrideProps {
            tag: "h1".into(),
            key: "h1-0".into(),
            attrs,
            props: RenderProps {
                level: Some(1),
                ..Default::default()
            },
            on: Listeners::new(),
            children: vec![OutputNode::text("T")],
        };

        let merged = props.merged();
        assert_eq!(merged.get("level"), Some(&PropertyValue::Int(1)));
        assert_eq!(merged.get("id"), Some(&PropertyValue::from("x")));

        let element = props.clone().into_element();
        assert_eq!(element.as_element().map(|e| e.key.as_str()), Some("h1-0"));

        let component = props.into_component("Title");
        let component = component.as_component().unwrap();
        assert_eq!(component.name, "Title");
        assert_eq!(component.children, vec![OutputNode::text("T")]);
    }
}
