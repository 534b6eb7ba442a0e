//! Node classification: category labels, render props, and derived contexts.

use crate::context::{RenderContext, TableSection};
use crate::output::Attributes;
use mdvtree_core::{Element, PropertyValue, Space};

/// Class prefix marking a code block's language.
pub const LANGUAGE_PREFIX: &str = "language-";

/// Raw property whose string value becomes an extra label on `slot` elements.
pub const SLOT_NAME_PROPERTY: &str = "slot-name";

/// Category labels of one element, least specific first.
///
/// The first label is always the tag name. Labels are only ever appended,
/// so the last one is the most specific; lookups scan from the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels(Vec<String>);

impl Labels {
    /// Starts a label list with the bare tag name.
    pub fn new(tag_name: &str) -> Self {
        Self(vec![tag_name.to_string()])
    }

    /// Appends a more specific label.
    pub fn push(&mut self, label: impl Into<String>) {
        self.0.push(label.into());
    }

    /// Labels in resolution order: most specific first.
    pub fn most_specific_first(&self) -> impl Iterator<Item = &str> {
        self.0.iter().rev().map(String::as_str)
    }

    /// The most specific label.
    pub fn last(&self) -> &str {
        // Never empty: constructed with the tag name.
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Labels as a slice, least specific first.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Properties derived by classification, kept apart from raw attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderProps {
    /// Heading level (1-6).
    pub level: Option<u8>,
    /// Code language without the class prefix, empty when unknown.
    pub language: Option<String>,
    /// The full language class entry, empty when unknown.
    pub language_original: Option<String>,
    /// Whether a `code` element is inline (not directly inside `pre`).
    pub inline: Option<bool>,
    /// Literal text of a `code` element's first child.
    pub content: Option<String>,
    /// Whether the enclosing (or own, for `ul`/`ol`) list is ordered.
    pub ordered: Option<bool>,
    /// List nesting depth.
    pub depth: Option<i32>,
    /// Position of a list item among its siblings.
    pub index: Option<i32>,
    /// Whether a table row or cell sits inside `thead`.
    pub is_head: Option<bool>,
}

impl RenderProps {
    /// Flattens the props into an attribute-shaped map with camelCase keys.
    pub fn to_map(&self) -> Attributes {
        let mut map = Attributes::new();
        let mut put = |key: &str, value: Option<PropertyValue>| {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        };
        put("level", self.level.map(|v| PropertyValue::Int(v.into())));
        put("language", self.language.clone().map(PropertyValue::Str));
        put(
            "languageOriginal",
            self.language_original.clone().map(PropertyValue::Str),
        );
        put("inline", self.inline.map(PropertyValue::Bool));
        put("content", self.content.clone().map(PropertyValue::Str));
        put("ordered", self.ordered.map(PropertyValue::Bool));
        put("depth", self.depth.map(|v| PropertyValue::Int(v.into())));
        put("index", self.index.map(|v| PropertyValue::Int(v.into())));
        put("isHead", self.is_head.map(PropertyValue::Bool));
        map
    }
}

/// Result of classifying one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification<'a> {
    /// Category labels, least specific first.
    pub labels: Labels,
    /// Derived render props.
    pub props: RenderProps,
    /// Context for the element's children.
    pub child_context: RenderContext,
    /// Context for the element's next sibling.
    pub sibling_context: RenderContext,
    /// Attribute namespace for the element's own properties.
    pub space: Space,
    /// Raw property consumed by classification, excluded from attributes.
    pub consumed: Option<&'a str>,
}

/// Classifies `node` given its parent's tag (`None` at the root) and the current context.
pub fn classify<'a>(
    node: &'a Element,
    parent_tag: Option<&str>,
    context: &RenderContext,
) -> Classification<'a> {
    let tag = node.tag_name.as_str();
    let mut class = Classification {
        labels: Labels::new(tag),
        props: RenderProps::default(),
        child_context: *context,
        sibling_context: *context,
        space: context.space,
        consumed: None,
    };

    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            class.props.level = tag[1..].parse().ok();
            class.labels.push("heading");
        }
        "code" => {
            let language_original = language_class(node).unwrap_or_default();
            let language = language_original
                .strip_prefix(LANGUAGE_PREFIX)
                .unwrap_or_default()
                .to_string();
            let inline = parent_tag != Some("pre");

            class.props.language = Some(language);
            class.props.language_original = Some(language_original);
            class.props.inline = Some(inline);
            class.props.content = node.first_text().map(str::to_string);
            class
                .labels
                .push(if inline { "inline-code" } else { "block-code" });
        }
        "thead" => {
            class.child_context = context.enter_table_section(TableSection::Head);
        }
        "tbody" => {
            class.child_context = context.enter_table_section(TableSection::Body);
        }
        "td" | "th" | "tr" => {
            class.props.is_head = Some(context.table_section == TableSection::Head);
        }
        "ul" | "ol" => {
            let child = context.enter_list(tag == "ol");
            class.props.ordered = Some(child.list_ordered);
            class.props.depth = Some(child.list_depth);
            class.child_context = child;
            class.labels.push("list");
        }
        "li" => {
            if !context.in_list() {
                log::debug!("list item outside of any list, using root list defaults");
            }
            let index = context.list_item_index + 1;
            class.props.ordered = Some(context.list_ordered);
            class.props.depth = Some(context.list_depth);
            class.props.index = Some(index);
            class.child_context = context.with_item_index(index);
            class.sibling_context = context.with_item_index(index);
            class.labels.push("list-item");
        }
        "slot" => {
            if let Some((key, name)) = node
                .properties
                .get_key_value(SLOT_NAME_PROPERTY)
                .and_then(|(key, value)| Some((key, value.as_str()?)))
            {
                class.labels.push(name);
                class.consumed = Some(key.as_str());
            }
        }
        "svg" => {
            class.space = Space::Svg;
            class.child_context = context.enter_space(Space::Svg);
        }
        _ => {}
    }

    class
}

/// Finds the first `language-*` entry of the element's class list.
///
/// Accepts both the attribute name (`class`) and the hast name (`className`).
fn language_class(node: &Element) -> Option<String> {
    let value = node
        .property("class")
        .or_else(|| node.property("className"))?;

    let Some(classes) = value.as_list() else {
        log::debug!(
            "ignoring non-list class on <{}>: {:?}",
            node.tag_name,
            value
        );
        return None;
    };

    classes
        .iter()
        .find(|c| c.starts_with(LANGUAGE_PREFIX))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdvtree_core::SemanticNode;

    fn code(classes: &[&str]) -> Element {
        Element::new("code")
            .with_property("class", classes)
            .with_child(SemanticNode::text("let x = 1;"))
    }

    #[test]
    fn tag_name_is_always_the_first_label() {
        for tag in ["p", "h2", "code", "ul", "li", "td", "slot", "custom-tag"] {
            let node = Element::new(tag);
            let class = classify(&node, None, &RenderContext::root());
            assert_eq!(class.labels.as_slice()[0], tag);
        }
    }

    #[test]
    fn headings_get_level_and_label() {
        let node = Element::new("h4");
        let class = classify(&node, None, &RenderContext::root());
        assert_eq!(class.props.level, Some(4));
        assert_eq!(class.labels.as_slice(), ["h4", "heading"]);
    }

    #[test]
    fn block_code_under_pre() {
        let node = code(&["foo", "language-ts"]);
        let class = classify(&node, Some("pre"), &RenderContext::root());
        assert_eq!(class.props.language.as_deref(), Some("ts"));
        assert_eq!(class.props.language_original.as_deref(), Some("language-ts"));
        assert_eq!(class.props.inline, Some(false));
        assert_eq!(class.props.content.as_deref(), Some("let x = 1;"));
        assert_eq!(class.labels.last(), "block-code");
    }

    #[test]
    fn inline_code_elsewhere() {
        let node = code(&["foo", "language-ts"]);
        let class = classify(&node, Some("span"), &RenderContext::root());
        assert_eq!(class.props.inline, Some(true));
        assert_eq!(class.props.language.as_deref(), Some("ts"));
        assert_eq!(class.labels.as_slice(), ["code", "inline-code"]);

        let at_root = classify(&node, None, &RenderContext::root());
        assert_eq!(at_root.props.inline, Some(true));
    }

    #[test]
    fn malformed_class_yields_empty_language() {
        let node = Element::new("code").with_property("class", "language-ts");
        let class = classify(&node, Some("pre"), &RenderContext::root());
        assert_eq!(class.props.language.as_deref(), Some(""));
        assert_eq!(class.props.content, None);
    }

    #[test]
    fn hast_class_name_is_recognized() {
        let node = Element::new("code").with_property("className", &["language-rust"][..]);
        let class = classify(&node, Some("pre"), &RenderContext::root());
        assert_eq!(class.props.language.as_deref(), Some("rust"));
    }

    #[test]
    fn lists_derive_child_context() {
        let ol = Element::new("ol");
        let class = classify(&ol, None, &RenderContext::root());
        assert_eq!(class.child_context.list_depth, 0);
        assert!(class.child_context.list_ordered);
        assert_eq!(class.child_context.list_item_index, -1);
        assert_eq!(class.props.ordered, Some(true));
        assert_eq!(class.props.depth, Some(0));
        assert_eq!(class.labels.last(), "list");

        let li = Element::new("li");
        let item = classify(&li, Some("ol"), &class.child_context);
        let ul = Element::new("ul");
        let nested = classify(&ul, Some("li"), &item.child_context);
        assert_eq!(nested.child_context.list_depth, 1);
        assert!(!nested.child_context.list_ordered);
    }

    #[test]
    fn list_items_advance_the_sibling_counter() {
        let list = RenderContext::root().enter_list(true);
        let li = Element::new("li");
        let first = classify(&li, Some("ol"), &list);
        let second = classify(&li, Some("ol"), &first.sibling_context);
        assert_eq!(first.props.index, Some(0));
        assert_eq!(second.props.index, Some(1));
        assert_eq!(second.props.ordered, Some(true));
        assert_eq!(second.props.depth, Some(0));
        assert_eq!(second.labels.as_slice(), ["li", "list-item"]);
    }

    #[test]
    fn table_cells_read_the_enclosing_section() {
        let root = RenderContext::root();
        let thead_el = Element::new("thead");
        let tbody_el = Element::new("tbody");
        let thead = classify(&thead_el, Some("table"), &root);
        let tbody = classify(&tbody_el, Some("table"), &root);
        assert_eq!(thead.labels.as_slice(), ["thead"]);

        let th_el = Element::new("th");
        let td_el = Element::new("td");
        let loose_el = Element::new("td");
        let th = classify(&th_el, Some("tr"), &thead.child_context);
        let td = classify(&td_el, Some("tr"), &tbody.child_context);
        let loose = classify(&loose_el, Some("tr"), &root);
        assert_eq!(th.props.is_head, Some(true));
        assert_eq!(td.props.is_head, Some(false));
        assert_eq!(loose.props.is_head, Some(false));
        // A section element does not flag itself.
        assert_eq!(thead.props.is_head, None);
    }

    #[test]
    fn slot_name_becomes_a_label() {
        let node = Element::new("slot").with_property(SLOT_NAME_PROPERTY, "footer");
        let class = classify(&node, None, &RenderContext::root());
        assert_eq!(class.labels.as_slice(), ["slot", "footer"]);
        assert_eq!(class.consumed, Some(SLOT_NAME_PROPERTY));
    }

    #[test]
    fn non_string_slot_name_is_ignored() {
        let node = Element::new("slot").with_property(SLOT_NAME_PROPERTY, true);
        let class = classify(&node, None, &RenderContext::root());
        assert_eq!(class.labels.as_slice(), ["slot"]);
        assert_eq!(class.consumed, None);
    }

    #[test]
    fn svg_switches_itself_and_descendants_to_svg_space() {
        let root = RenderContext::root();
        let svg_el = Element::new("svg");
        let svg = classify(&svg_el, Some("p"), &root);
        assert_eq!(svg.space, Space::Svg);
        assert_eq!(svg.child_context.space, Space::Svg);
        assert_eq!(svg.sibling_context.space, Space::Html);

        let path_el = Element::new("path");
        let path = classify(&path_el, Some("svg"), &svg.child_context);
        assert_eq!(path.space, Space::Svg);
        assert_eq!(path.child_context.space, Space::Svg);
    }

    #[test]
    fn render_props_flatten_with_camel_case_keys() {
        let props = RenderProps {
            is_head: Some(true),
            language_original: Some("language-ts".to_string()),
            ..Default::default()
        };
        let map = props.to_map();
        assert_eq!(map.get("isHead"), Some(&PropertyValue::Bool(true)));
        assert_eq!(
            map.get("languageOriginal"),
            Some(&PropertyValue::from("language-ts"))
        );
        assert_eq!(map.len(), 2);
    }
}
