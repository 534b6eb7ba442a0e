//! Semantic (HTML-shaped) document tree handed to the renderer.
//!
//! The shape follows hast: elements carry a tag name, a property map and
//! children; text nodes carry a value; every other node kind is opaque.
//! Trees can be built in Rust, produced by [`crate::parse`], or
//! deserialized from hast-style JSON supplied by an external pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw property map of an element, keyed by the raw (hast) property name.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A raw property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Boolean property (`disabled`, `checked`, ...).
    Bool(bool),
    /// Integer property (`start`, `colSpan`, ...).
    Int(i64),
    /// String property.
    Str(String),
    /// Space- or comma-separated list property (`className`, ...).
    List(Vec<String>),
}

impl PropertyValue {
    /// Returns the string payload for [`PropertyValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the entries of a [`PropertyValue::List`].
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::List(value)
    }
}

impl From<&[&str]> for PropertyValue {
    fn from(value: &[&str]) -> Self {
        PropertyValue::List(value.iter().map(|s| s.to_string()).collect())
    }
}

/// A node of the semantic tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireNode", into = "WireNode")]
pub enum SemanticNode {
    /// Literal text.
    Text(Text),
    /// An HTML-shaped element.
    Element(Element),
    /// Any other node kind (raw HTML, comments, doctypes). Renders as nothing.
    Other(Other),
}

impl SemanticNode {
    /// Creates a text node.
    pub fn text(value: impl Into<String>) -> Self {
        SemanticNode::Text(Text {
            value: value.into(),
        })
    }

    /// Creates an opaque node of the given kind.
    pub fn other(kind: impl Into<String>) -> Self {
        SemanticNode::Other(Other { kind: kind.into() })
    }

    /// Returns the element payload, if this is an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            SemanticNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for SemanticNode {
    fn from(element: Element) -> Self {
        SemanticNode::Element(element)
    }
}

/// A text node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    /// The literal text.
    pub value: String,
}

/// An opaque node that only records its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Other {
    /// The hast `type` of the node (e.g. `raw`, `comment`).
    pub kind: String,
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Lowercase tag name.
    pub tag_name: String,
    /// Raw properties, keyed by raw property name.
    pub properties: Properties,
    /// Child nodes in document order.
    pub children: Vec<SemanticNode>,
}

impl Element {
    /// Creates an element with no properties and no children.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties: Properties::new(),
            children: Vec::new(),
        }
    }

    /// Adds a raw property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Appends a child node.
    pub fn with_child(mut self, child: impl Into<SemanticNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Replaces the children.
    pub fn with_children(mut self, children: Vec<SemanticNode>) -> Self {
        self.children = children;
        self
    }

    /// Returns a raw property by key.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Returns the value of the first child if it is a text node.
    pub fn first_text(&self) -> Option<&str> {
        match self.children.first() {
            Some(SemanticNode::Text(text)) => Some(&text.value),
            _ => None,
        }
    }
}

/// Root of a semantic tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Root {
    /// Top-level nodes.
    #[serde(default)]
    pub children: Vec<SemanticNode>,
}

impl Root {
    /// Creates a root from its children.
    pub fn new(children: Vec<SemanticNode>) -> Self {
        Self { children }
    }
}

/// hast-style JSON shape used for (de)serialization.
///
/// Missing fields degrade to empty values instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNode {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<Properties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<SemanticNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl From<WireNode> for SemanticNode {
    fn from(wire: WireNode) -> Self {
        match wire.kind.as_str() {
            "text" => SemanticNode::Text(Text {
                value: wire.value.unwrap_or_default(),
            }),
            "element" => SemanticNode::Element(Element {
                tag_name: wire.tag_name.unwrap_or_default(),
                properties: wire.properties.unwrap_or_default(),
                children: wire.children.unwrap_or_default(),
            }),
            _ => SemanticNode::Other(Other { kind: wire.kind }),
        }
    }
}

impl From<SemanticNode> for WireNode {
    fn from(node: SemanticNode) -> Self {
        match node {
            SemanticNode::Text(text) => WireNode {
                kind: "text".to_string(),
                tag_name: None,
                properties: None,
                children: None,
                value: Some(text.value),
            },
            SemanticNode::Element(element) => WireNode {
                kind: "element".to_string(),
                tag_name: Some(element.tag_name),
                properties: Some(element.properties),
                children: Some(element.children),
                value: None,
            },
            SemanticNode::Other(other) => WireNode {
                kind: other.kind,
                tag_name: None,
                properties: None,
                children: None,
                value: None,
            },
        }
    }
}
