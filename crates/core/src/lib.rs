#![deny(missing_docs)]
//! mdvtree core: semantic tree model, property names, and the markdown pipeline.

/// Core error types.
pub mod error;
mod lower;
/// Markdown parsing pipeline and extension hooks.
pub mod parse;
/// Property-name canonicalization.
pub mod properties;
/// Semantic tree data model.
pub mod tree;

pub use error::{MdvtreeError, SourceLocation};
pub use parse::{ParseOptions, Pipeline, TextTransform, TreeTransform, parse_markdown};
pub use properties::{HtmlPropertyNames, PropertyNames, Space};
pub use tree::{Element, Other, Properties, PropertyValue, Root, SemanticNode, Text};
