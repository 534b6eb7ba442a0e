//! Recursive driver turning semantic nodes into output nodes.

use crate::attributes::map_attributes;
use crate::classify::classify;
use crate::context::RenderContext;
use crate::dispatch::{resolve_custom_attrs, resolve_override};
use crate::output::{Attributes, ElementNode, Listeners, OutputNode};
use crate::registry::{CustomAttrsRegistry, OverrideProps, OverrideRegistry};
use mdvtree_core::{Element, HtmlPropertyNames, PropertyNames, Root, SemanticNode};
use std::borrow::Cow;
use std::collections::HashMap;

/// Tag of the element wrapping a whole document.
pub const DOCUMENT_TAG: &str = "div";

/// Renders semantic trees using a property-name lookup and two registries.
pub struct Renderer {
    names: Box<dyn PropertyNames>,
    custom_attrs: CustomAttrsRegistry,
    overrides: OverrideRegistry,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// State carried from one sibling to the next within a single child list.
struct Siblings {
    /// Occurrences seen so far per tag name, for keys.
    counters: HashMap<String, usize>,
    /// Context the next sibling is classified under.
    context: RenderContext,
}

impl Siblings {
    fn new(context: RenderContext) -> Self {
        Self {
            counters: HashMap::new(),
            context,
        }
    }

    fn next_key(&mut self, tag: &str) -> String {
        let n = self.counters.entry(tag.to_string()).or_insert(0);
        let key = format!("{}-{}", tag, n);
        *n += 1;
        key
    }
}

impl Renderer {
    /// Creates a renderer with HTML property names and empty registries.
    pub fn new() -> Self {
        Self {
            names: Box::new(HtmlPropertyNames),
            custom_attrs: CustomAttrsRegistry::new(),
            overrides: OverrideRegistry::new(),
        }
    }

    /// Replaces the property-name lookup.
    pub fn with_property_names(mut self, names: impl PropertyNames + 'static) -> Self {
        self.names = Box::new(names);
        self
    }

    /// Sets the custom-attributes registry.
    pub fn with_custom_attrs(mut self, registry: CustomAttrsRegistry) -> Self {
        self.custom_attrs = registry;
        self
    }

    /// Sets the override registry.
    pub fn with_overrides(mut self, registry: OverrideRegistry) -> Self {
        self.overrides = registry;
        self
    }

    /// Renders the children of `root` under a fresh root context.
    pub fn render_root(&self, root: &Root) -> Vec<OutputNode> {
        self.render(&root.children, &RenderContext::root(), None)
    }

    /// Renders a whole document wrapped in a `div` carrying `wrapper_attrs`.
    pub fn render_document(&self, root: &Root, wrapper_attrs: Attributes) -> OutputNode {
        OutputNode::Element(ElementNode {
            tag: DOCUMENT_TAG.to_string(),
            key: format!("{}-0", DOCUMENT_TAG),
            attrs: wrapper_attrs,
            on: Listeners::new(),
            children: self.render_root(root),
        })
    }

    /// Renders a sibling list.
    ///
    /// `parent_tag` is the tag of the element owning `nodes`, `None` at the root.
    /// Nodes that render as nothing are left out of the result.
    pub fn render(
        &self,
        nodes: &[SemanticNode],
        context: &RenderContext,
        parent_tag: Option<&str>,
    ) -> Vec<OutputNode> {
        let (_, rendered) = nodes.iter().fold(
            (Siblings::new(*context), Vec::with_capacity(nodes.len())),
            |(mut siblings, mut out), node| {
                if let Some(output) = self.render_node(node, parent_tag, &mut siblings) {
                    out.push(output);
                }
                (siblings, out)
            },
        );
        rendered
    }

    fn render_node(
        &self,
        node: &SemanticNode,
        parent_tag: Option<&str>,
        siblings: &mut Siblings,
    ) -> Option<OutputNode> {
        match node {
            SemanticNode::Text(text) => Some(OutputNode::text(text.value.clone())),
            SemanticNode::Element(element) => Some(self.render_element(element, parent_tag, siblings)),
            SemanticNode::Other(other) => {
                log::debug!("skipping `{}` node", other.kind);
                None
            }
        }
    }

    fn render_element(
        &self,
        element: &Element,
        parent_tag: Option<&str>,
        siblings: &mut Siblings,
    ) -> OutputNode {
        let key = siblings.next_key(&element.tag_name);
        let class = classify(element, parent_tag, &siblings.context);
        siblings.context = class.sibling_context;

        let attrs = map_attributes(
            &element.properties,
            class.consumed,
            class.space,
            self.names.as_ref(),
        );

        let mut combined = attrs.clone();
        combined.extend(class.props.to_map());
        let node = match class.consumed {
            Some(consumed) => Cow::Owned(without_property(element, consumed)),
            None => Cow::Borrowed(element),
        };
        let custom = resolve_custom_attrs(&self.custom_attrs, &class.labels, &node, &combined);

        let children = self.render(
            &element.children,
            &class.child_context,
            Some(element.tag_name.as_str()),
        );

        let mut merged = attrs;
        merged.extend(custom.attrs);

        if let Some((label, handler)) = resolve_override(&self.overrides, &class.labels) {
            log::trace!("override `{}` renders <{}> ({})", label, element.tag_name, key);
            return handler.render(OverrideProps {
                tag: element.tag_name.clone(),
                key,
                attrs: merged,
                props: class.props,
                on: custom.on,
                children,
            });
        }

        OutputNode::Element(ElementNode {
            tag: element.tag_name.clone(),
            key,
            attrs: merged,
            on: custom.on,
            children,
        })
    }
}

/// Copy of `element` without the property `key`.
fn without_property(element: &Element, key: &str) -> Element {
    let mut copy = element.clone();
    copy.properties.remove(key);
    copy
}
