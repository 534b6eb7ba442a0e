//! Markdown to semantic tree pipeline and its extension hooks.

use crate::lower::lower_root;
use crate::tree::Root;
use crate::MdvtreeError;
use markdown::mdast::Node;
use markdown::message::{Message, Place};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Options for turning markdown into a semantic tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown constructs (tables, strikethrough, task lists).
    pub gfm: bool,
    /// Keep raw HTML as opaque `raw` nodes instead of dropping it.
    pub allow_dangerous_html: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            allow_dangerous_html: false,
        }
    }
}

impl ParseOptions {
    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs::default();

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        markdown::ParseOptions {
            constructs,
            ..markdown::ParseOptions::default()
        }
    }
}

/// Trait for preprocessing raw markdown text before parsing.
pub trait TextTransform {
    /// Transform the input markdown text, returning an owned or borrowed string.
    fn transform<'a>(&self, input: &'a str) -> Cow<'a, str>;
}

impl<F> TextTransform for F
where
    F: for<'a> Fn(&'a str) -> Cow<'a, str>,
{
    fn transform<'a>(&self, input: &'a str) -> Cow<'a, str> {
        (self)(input)
    }
}

/// Trait for rewriting the semantic tree after lowering (sanitizers, heading ids, ...).
pub trait TreeTransform {
    /// Mutate the semantic tree in place.
    fn transform(&self, root: &mut Root);
}

impl<F> TreeTransform for F
where
    F: Fn(&mut Root),
{
    fn transform(&self, root: &mut Root) {
        (self)(root)
    }
}

/// Configurable markdown pipeline with optional transforms.
pub struct Pipeline {
    options: ParseOptions,
    text_transforms: Vec<Box<dyn TextTransform>>,
    tree_transforms: Vec<Box<dyn TreeTransform>>,
}

impl Pipeline {
    /// Create a new pipeline.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            text_transforms: Vec::new(),
            tree_transforms: Vec::new(),
        }
    }

    /// Add a text preprocessor transform.
    pub fn add_text_transform<T: TextTransform + 'static>(&mut self, transform: T) {
        self.text_transforms.push(Box::new(transform));
    }

    /// Add a semantic tree transform.
    pub fn add_tree_transform<T: TreeTransform + 'static>(&mut self, transform: T) {
        self.tree_transforms.push(Box::new(transform));
    }

    /// Parse markdown into a semantic tree using the configured pipeline.
    pub fn parse(&self, input: &str) -> Result<Root, MdvtreeError> {
        let mut current = Cow::Borrowed(input);
        for transform in &self.text_transforms {
            let next = transform.transform(current.as_ref());
            current = Cow::Owned(next.into_owned());
        }

        let mut root = parse_markdown(&current, &self.options)?;
        for transform in &self.tree_transforms {
            transform.transform(&mut root);
        }

        Ok(root)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

/// Parse markdown straight into a semantic tree.
pub fn parse_markdown(input: &str, options: &ParseOptions) -> Result<Root, MdvtreeError> {
    let mdast = markdown::to_mdast(input, &options.to_markdown()).map_err(|err| {
        let (line, column) = message_point(&err);
        MdvtreeError::parse_error(err.to_string(), line, column)
    })?;

    match mdast {
        Node::Root(root) => Ok(lower_root(&root, options)),
        other => Err(MdvtreeError::Internal(format!(
            "markdown parser returned a non-root node: {:?}",
            other
        ))),
    }
}

/// Line and column a markdown-rs message points at, `1:1` when it has no place.
fn message_point(message: &Message) -> (usize, usize) {
    match message.place.as_deref() {
        Some(Place::Point(point)) => (point.line, point.column),
        Some(Place::Position(position)) => (position.start.line, position.start.column),
        None => (1, 1),
    }
}
