//! Lowering of markdown-rs mdast into the semantic tree.
//!
//! Mirrors the mdast-to-hast conventions: property names are hast names
//! (`className`, `href`), fenced code becomes `pre > code.language-*`,
//! and paragraphs inside tight list items are unwrapped. Footnote
//! references become numbered `sup > a` links and the referenced
//! definitions are collected into a trailing `section.footnotes`.

use crate::parse::ParseOptions;
use crate::tree::{Element, PropertyValue, Root, SemanticNode};
use markdown::mdast::{self, AlignKind, Node};
use std::cell::RefCell;
use std::collections::HashMap;

const FOOTNOTE_LABEL_ID: &str = "footnote-label";

/// Lowers an mdast root into a semantic root.
pub(crate) fn lower_root(root: &mdast::Root, options: &ParseOptions) -> Root {
    let mut definitions = HashMap::new();
    let mut footnotes = HashMap::new();
    collect_definitions(&root.children, &mut definitions, &mut footnotes);

    let lowerer = Lowerer {
        options,
        definitions,
        footnotes,
        called: RefCell::default(),
    };
    let mut children = lowerer.lower_all(&root.children);
    if let Some(section) = lowerer.footnote_section() {
        children.push(section.into());
    }
    Root::new(children)
}

struct Definition {
    url: String,
    title: Option<String>,
}

fn collect_definitions<'a>(
    nodes: &'a [Node],
    out: &mut HashMap<String, Definition>,
    footnotes: &mut HashMap<String, &'a mdast::FootnoteDefinition>,
) {
    for node in nodes {
        match node {
            Node::Definition(def) => {
                // First definition wins, as in CommonMark.
                out.entry(def.identifier.clone()).or_insert_with(|| Definition {
                    url: def.url.clone(),
                    title: def.title.clone(),
                });
            }
            Node::FootnoteDefinition(def) => {
                footnotes.entry(def.identifier.clone()).or_insert(def);
                collect_definitions(&def.children, out, footnotes);
            }
            Node::Blockquote(quote) => collect_definitions(&quote.children, out, footnotes),
            Node::List(list) => collect_definitions(&list.children, out, footnotes),
            Node::ListItem(item) => collect_definitions(&item.children, out, footnotes),
            _ => {}
        }
    }
}

/// Footnotes in order of their first reference.
#[derive(Default)]
struct Called {
    /// Identifiers, numbered from 1 by position.
    order: Vec<String>,
    /// References seen so far per identifier.
    counts: HashMap<String, usize>,
}

impl Called {
    /// Records a reference, returning its footnote number and reference count.
    fn call(&mut self, identifier: &str) -> (usize, usize) {
        let count = self.counts.entry(identifier.to_string()).or_insert(0);
        *count += 1;
        let number = match self.order.iter().position(|id| id == identifier) {
            Some(i) => i + 1,
            None => {
                self.order.push(identifier.to_string());
                self.order.len()
            }
        };
        (number, *count)
    }
}

struct Lowerer<'a> {
    options: &'a ParseOptions,
    definitions: HashMap<String, Definition>,
    footnotes: HashMap<String, &'a mdast::FootnoteDefinition>,
    called: RefCell<Called>,
}

impl Lowerer<'_> {
    fn lower_all(&self, nodes: &[Node]) -> Vec<SemanticNode> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.lower_into(node, &mut out);
        }
        out
    }

    fn element(&self, tag: &str, children: &[Node]) -> Element {
        Element::new(tag).with_children(self.lower_all(children))
    }

    fn lower_into(&self, node: &Node, out: &mut Vec<SemanticNode>) {
        match node {
            Node::Text(text) => out.push(SemanticNode::text(&text.value)),
            Node::Paragraph(para) => out.push(self.element("p", &para.children).into()),
            Node::Heading(heading) => {
                let tag = format!("h{}", heading.depth.clamp(1, 6));
                out.push(self.element(&tag, &heading.children).into());
            }
            Node::Emphasis(em) => out.push(self.element("em", &em.children).into()),
            Node::Strong(strong) => out.push(self.element("strong", &strong.children).into()),
            Node::Delete(del) => out.push(self.element("del", &del.children).into()),
            Node::Blockquote(quote) => {
                out.push(self.element("blockquote", &quote.children).into())
            }
            Node::InlineCode(code) => out.push(
                Element::new("code")
                    .with_child(SemanticNode::text(&code.value))
                    .into(),
            ),
            Node::Code(code) => out.push(lower_code(code).into()),
            Node::Break(_) => out.push(Element::new("br").into()),
            Node::ThematicBreak(_) => out.push(Element::new("hr").into()),
            Node::Link(link) => {
                let mut a = self.element("a", &link.children);
                a = a.with_property("href", link.url.as_str());
                if let Some(title) = &link.title {
                    a = a.with_property("title", title.as_str());
                }
                out.push(a.into());
            }
            Node::Image(image) => out.push(lower_image(&image.url, &image.alt, image.title.as_deref()).into()),
            Node::LinkReference(reference) => match self.definitions.get(&reference.identifier) {
                Some(def) => {
                    let mut a = self
                        .element("a", &reference.children)
                        .with_property("href", def.url.as_str());
                    if let Some(title) = &def.title {
                        a = a.with_property("title", title.as_str());
                    }
                    out.push(a.into());
                }
                None => out.extend(self.lower_all(&reference.children)),
            },
            Node::ImageReference(reference) => match self.definitions.get(&reference.identifier) {
                Some(def) => out.push(lower_image(&def.url, &reference.alt, def.title.as_deref()).into()),
                None => out.push(SemanticNode::text(reference.alt.clone())),
            },
            Node::List(list) => out.push(self.lower_list(list).into()),
            // Stray items outside a list keep their content loose.
            Node::ListItem(item) => out.push(self.lower_list_item(item, true).into()),
            Node::Table(table) => out.push(self.lower_table(table).into()),
            Node::Html(_) => {
                if self.options.allow_dangerous_html {
                    out.push(SemanticNode::other("raw"));
                }
            }
            Node::FootnoteReference(reference) => {
                out.push(self.lower_footnote_reference(reference))
            }
            Node::Definition(_)
            | Node::FootnoteDefinition(_)
            | Node::Yaml(_)
            | Node::Toml(_) => {}
            _ => {
                log::warn!("Unhandled markdown node type: {:?}", node);
            }
        }
    }

    fn lower_list(&self, list: &mdast::List) -> Element {
        let tag = if list.ordered { "ol" } else { "ul" };
        let mut element = Element::new(tag);
        if list.ordered
            && let Some(start) = list.start
            && start != 1
        {
            element = element.with_property("start", i64::from(start));
        }

        let loose = list.spread
            || list
                .children
                .iter()
                .any(|child| matches!(child, Node::ListItem(item) if item.spread));

        for child in &list.children {
            match child {
                Node::ListItem(item) => {
                    element = element.with_child(self.lower_list_item(item, loose))
                }
                other => element.children.extend(self.lower_all(std::slice::from_ref(other))),
            }
        }
        element
    }

    fn lower_list_item(&self, item: &mdast::ListItem, loose: bool) -> Element {
        let mut li = Element::new("li");

        if let Some(checked) = item.checked {
            li = li
                .with_property("className", vec!["task-list-item".to_string()])
                .with_child(
                    Element::new("input")
                        .with_property("type", "checkbox")
                        .with_property("checked", checked)
                        .with_property("disabled", true),
                );
        }

        for child in &item.children {
            match child {
                Node::Paragraph(para) if !loose => {
                    li.children.extend(self.lower_all(&para.children))
                }
                other => li.children.extend(self.lower_all(std::slice::from_ref(other))),
            }
        }
        li
    }

    fn lower_footnote_reference(&self, reference: &mdast::FootnoteReference) -> SemanticNode {
        if !self.footnotes.contains_key(&reference.identifier) {
            let label = reference.label.as_deref().unwrap_or(&reference.identifier);
            return SemanticNode::text(format!("[^{}]", label));
        }

        let (number, count) = self.called.borrow_mut().call(&reference.identifier);
        let id = footnote_id(&reference.identifier);
        let mut ref_id = format!("fnref-{}", id);
        if count > 1 {
            ref_id = format!("{}-{}", ref_id, count);
        }

        let link = Element::new("a")
            .with_property("href", format!("#fn-{}", id))
            .with_property("id", ref_id)
            .with_property("dataFootnoteRef", true)
            .with_child(SemanticNode::text(number.to_string()));
        Element::new("sup").with_child(link).into()
    }

    /// Builds the trailing footnote section, or `None` when nothing was referenced.
    fn footnote_section(&self) -> Option<Element> {
        let mut items: Vec<SemanticNode> = Vec::new();
        // Definitions may reference further footnotes, growing the order.
        let mut i = 0;
        loop {
            let next = self.called.borrow().order.get(i).cloned();
            let Some(identifier) = next else { break };
            i += 1;
            let Some(def) = self.footnotes.get(&identifier) else {
                continue;
            };
            items.push(self.lower_footnote_item(def, i).into());
        }

        if items.is_empty() {
            return None;
        }
        Some(
            Element::new("section")
                .with_property("className", vec!["footnotes".to_string()])
                .with_property("dataFootnotes", true)
                .with_child(
                    Element::new("h2")
                        .with_property("id", FOOTNOTE_LABEL_ID)
                        .with_property("className", vec!["sr-only".to_string()])
                        .with_child(SemanticNode::text("Footnotes")),
                )
                .with_child(Element::new("ol").with_children(items)),
        )
    }

    fn lower_footnote_item(&self, def: &mdast::FootnoteDefinition, number: usize) -> Element {
        let id = footnote_id(&def.identifier);
        let backref = Element::new("a")
            .with_property("href", format!("#fnref-{}", id))
            .with_property("dataFootnoteBackref", true)
            .with_property("className", vec!["data-footnote-backref".to_string()])
            .with_property("ariaLabel", format!("Back to reference {}", number))
            .with_child(SemanticNode::text("\u{21a9}"));

        let mut children = self.lower_all(&def.children);
        match children.last_mut() {
            Some(SemanticNode::Element(last)) if last.tag_name == "p" => {
                last.children.push(SemanticNode::text(" "));
                last.children.push(backref.into());
            }
            _ => children.push(backref.into()),
        }

        Element::new("li")
            .with_property("id", format!("fn-{}", id))
            .with_children(children)
    }

    fn lower_table(&self, table: &mdast::Table) -> Element {
        let mut rows = table.children.iter().filter_map(|row| match row {
            Node::TableRow(row) => Some(row),
            _ => None,
        });

        let mut element = Element::new("table");
        if let Some(head) = rows.next() {
            element = element.with_child(
                Element::new("thead").with_child(self.lower_row(head, "th", &table.align)),
            );
        }

        let body: Vec<SemanticNode> = rows
            .map(|row| self.lower_row(row, "td", &table.align).into())
            .collect();
        if !body.is_empty() {
            element = element.with_child(Element::new("tbody").with_children(body));
        }
        element
    }

    fn lower_row(&self, row: &mdast::TableRow, cell_tag: &str, aligns: &[AlignKind]) -> Element {
        let mut tr = Element::new("tr");
        for (i, cell) in row.children.iter().enumerate() {
            let Node::TableCell(cell) = cell else {
                continue;
            };
            let mut td = self.element(cell_tag, &cell.children);
            let align = match aligns.get(i) {
                Some(AlignKind::Left) => Some("left"),
                Some(AlignKind::Right) => Some("right"),
                Some(AlignKind::Center) => Some("center"),
                Some(AlignKind::None) | None => None,
            };
            if let Some(align) = align {
                td = td.with_property("align", align);
            }
            tr = tr.with_child(td);
        }
        tr
    }
}

/// Footnote identifier made safe for use in an `id`.
fn footnote_id(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

fn lower_code(code: &mdast::Code) -> Element {
    let mut inner = Element::new("code");
    if let Some(lang) = code.lang.as_deref().filter(|l| !l.is_empty()) {
        inner = inner.with_property("className", vec![format!("language-{}", lang)]);
    }
    if !code.value.is_empty() {
        inner = inner.with_child(SemanticNode::text(format!("{}\n", code.value)));
    }
    Element::new("pre").with_child(inner)
}

fn lower_image(url: &str, alt: &str, title: Option<&str>) -> Element {
    let mut img = Element::new("img")
        .with_property("src", url)
        .with_property("alt", alt);
    if let Some(title) = title {
        img = img.with_property("title", PropertyValue::from(title));
    }
    img
}
