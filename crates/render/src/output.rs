//! Output tree handed to the host layer.

use mdvtree_core::PropertyValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical attribute map (attribute name to value).
pub type Attributes = BTreeMap<String, PropertyValue>;

/// Event bindings: event name to a handler reference the host resolves.
pub type Listeners = BTreeMap<String, String>;

/// A rendered node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutputNode {
    /// A text leaf.
    Text {
        /// The literal text.
        value: String,
    },
    /// A default tag node.
    Element(ElementNode),
    /// A subtree produced by an override.
    Component(ComponentNode),
}

impl OutputNode {
    /// Creates a text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        OutputNode::Text {
            value: value.into(),
        }
    }

    /// Returns the element payload, if this is a default tag node.
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            OutputNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the component payload, if an override produced this node.
    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            OutputNode::Component(component) => Some(component),
            _ => None,
        }
    }
}

/// A default tag node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    /// Tag name.
    pub tag: String,
    /// Stable sibling key (`{tag}-{n}`).
    pub key: String,
    /// Canonical attributes merged with custom attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: Attributes,
    /// Event bindings.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub on: Listeners,
    /// Rendered children.
    #[serde(default)]
    pub children: Vec<OutputNode>,
}

/// A named component invocation, the usual shape of an override's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    /// Component name.
    pub name: String,
    /// Component props.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: Attributes,
    /// Event bindings.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub on: Listeners,
    /// Slot content.
    #[serde(default)]
    pub children: Vec<OutputNode>,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Serializes rendered nodes to an HTML string.
///
/// Event bindings have no HTML form and are skipped. Components are written
/// as `<Name prop="...">...</Name>`.
pub fn to_html(nodes: &[OutputNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &OutputNode, out: &mut String) {
    match node {
        OutputNode::Text { value } => out.push_str(&html_escape::encode_text(value)),
        OutputNode::Element(element) => {
            write_open(&element.tag, &element.attrs, out);
            if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                out.push_str(" />");
                return;
            }
            out.push('>');
            for child in &element.children {
                write_node(child, out);
            }
            write_close(&element.tag, out);
        }
        OutputNode::Component(component) => {
            write_open(&component.name, &component.props, out);
            out.push('>');
            for child in &component.children {
                write_node(child, out);
            }
            write_close(&component.name, out);
        }
    }
}

fn write_open(name: &str, attrs: &Attributes, out: &mut String) {
    out.push('<');
    out.push_str(name);
    for (key, value) in attrs {
        let rendered = match value {
            PropertyValue::Bool(false) => continue,
            PropertyValue::Bool(true) => {
                out.push(' ');
                out.push_str(key);
                continue;
            }
            PropertyValue::Int(n) => n.to_string(),
            PropertyValue::Str(s) => s.clone(),
            PropertyValue::List(items) => items.join(" "),
        };
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(&rendered));
        out.push('"');
    }
}

fn write_close(name: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}
