use mdvtree_core::{MdvtreeError, ParseOptions, Root, parse_markdown};
use mdvtree_render::{Attributes, OutputNode, RegistryConfig, Renderer, to_html};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Bridge Config
// ============================================================================

/// Configuration accepted by the render functions.
///
/// ```json
/// {
///   "gfm": true,
///   "allowDangerousHtml": false,
///   "customAttrs": { "a": { "attrs": { "target": "_blank" }, "on": { "click": "track" } } },
///   "wrapperAttrs": { "class": "markdown-body" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// Markdown parsing options.
    #[serde(flatten)]
    pub parse: ParseOptions,
    /// Static custom attributes.
    #[serde(flatten)]
    pub registry: RegistryConfig,
    /// Attributes of the wrapping `div`.
    pub wrapper_attrs: Attributes,
}

impl BridgeConfig {
    fn renderer(&self) -> Renderer {
        Renderer::new().with_custom_attrs(self.registry.custom_attrs_registry())
    }
}

fn parse_config(config: JsValue) -> Result<BridgeConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(BridgeConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    // Plain objects instead of ES Maps for attribute maps.
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

// ============================================================================
// Native entry points
// ============================================================================

/// Renders markdown into a wrapped output document.
pub fn render_markdown_document(
    markdown: &str,
    config: &BridgeConfig,
) -> Result<OutputNode, MdvtreeError> {
    let root = parse_markdown(markdown, &config.parse)?;
    Ok(render_tree_document(&root, config))
}

/// Renders an already-built semantic tree into a wrapped output document.
pub fn render_tree_document(root: &Root, config: &BridgeConfig) -> OutputNode {
    config
        .renderer()
        .render_document(root, config.wrapper_attrs.clone())
}

// ============================================================================
// Render API
// ============================================================================

/// Renders markdown into an output tree.
///
/// Returns the wrapping `div` node. Element nodes look like
/// `{type: "element", tag, key, attrs, on, children}`; text leaves like
/// `{type: "text", value}`.
#[wasm_bindgen]
pub fn render(markdown: &str, config: JsValue) -> Result<JsValue, JsError> {
    let config = parse_config(config)?;
    let document =
        render_markdown_document(markdown, &config).map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&document)
}

/// Renders markdown straight to an HTML string.
#[wasm_bindgen(js_name = renderToHtml)]
pub fn render_to_html(markdown: &str, config: JsValue) -> Result<String, JsError> {
    let config = parse_config(config)?;
    let document =
        render_markdown_document(markdown, &config).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(to_html(std::slice::from_ref(&document)))
}

/// Renders a hast-style semantic tree produced by an external pipeline.
///
/// `tree` is a root object (`{children: [...]}`) whose nodes use the hast
/// `type`/`tagName`/`properties`/`children`/`value` fields.
#[wasm_bindgen(js_name = renderTree)]
pub fn render_tree(tree: JsValue, config: JsValue) -> Result<JsValue, JsError> {
    let config = parse_config(config)?;
    let root: Root = serde_wasm_bindgen::from_value(tree)
        .map_err(|e| JsError::new(&format!("Invalid tree: {}", e)))?;
    log::debug!("rendering external tree with {} top-level nodes", root.children.len());
    to_js(&render_tree_document(&root, &config))
}
