#![deny(missing_docs)]
//! mdvtree renderer: turns a semantic tree into an output tree.
//!
//! Each element is classified into category labels (tag name first, most
//! specific last) and render props while list, table and namespace context
//! is threaded down the recursion. Callers hook in through two registries
//! keyed by label: custom attributes/event bindings, and render overrides
//! that replace a node's default output.

/// Raw property to attribute mapping.
pub mod attributes;
/// Recursive tree builder.
pub mod builder;
/// Element classification.
pub mod classify;
/// Render context.
pub mod context;
/// Registry lookups.
pub mod dispatch;
/// Output tree and HTML serialization.
pub mod output;
/// Extension registries.
pub mod registry;

pub use builder::Renderer;
pub use classify::{Classification, LANGUAGE_PREFIX, Labels, RenderProps, SLOT_NAME_PROPERTY, classify};
pub use context::{RenderContext, TableSection};
pub use output::{Attributes, ComponentNode, ElementNode, Listeners, OutputNode, to_html};
pub use registry::{
    Bindings, CustomAttrs, CustomAttrsRegistry, Override, OverrideProps, OverrideRegistry,
    RegistryConfig,
};
