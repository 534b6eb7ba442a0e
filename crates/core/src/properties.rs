//! Property-name canonicalization.
//!
//! Raw element properties use hast (DOM-ish) names such as `className` or
//! `ariaHidden`. Output attributes use HTML attribute names. The lookup is
//! pluggable through [`PropertyNames`]; [`HtmlPropertyNames`] covers the
//! names the bundled pipeline produces and passes everything else through.

use std::borrow::Cow;

/// Attribute namespace used when resolving a property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Space {
    /// HTML attributes.
    #[default]
    Html,
    /// SVG attributes.
    Svg,
}

/// Resolves a raw property key to its canonical attribute name.
pub trait PropertyNames {
    /// Returns the attribute name for `key` in `space`.
    ///
    /// Unknown keys must come back unchanged.
    fn attribute_name<'a>(&self, space: Space, key: &'a str) -> Cow<'a, str>;
}

impl<F> PropertyNames for F
where
    F: for<'a> Fn(Space, &'a str) -> Cow<'a, str>,
{
    fn attribute_name<'a>(&self, space: Space, key: &'a str) -> Cow<'a, str> {
        (self)(space, key)
    }
}

/// Default HTML name table.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPropertyNames;

const RENAMES: &[(&str, &str)] = &[
    ("className", "class"),
    ("htmlFor", "for"),
    ("httpEquiv", "http-equiv"),
    ("acceptCharset", "accept-charset"),
];

impl PropertyNames for HtmlPropertyNames {
    fn attribute_name<'a>(&self, _space: Space, key: &'a str) -> Cow<'a, str> {
        if let Some((_, attribute)) = RENAMES.iter().find(|(property, _)| *property == key) {
            return Cow::Borrowed(*attribute);
        }

        for prefix in ["data", "aria"] {
            if let Some(rest) = key.strip_prefix(prefix)
                && rest.starts_with(|c: char| c.is_ascii_uppercase())
            {
                return Cow::Owned(format!("{}{}", prefix, kebab(rest)));
            }
        }

        Cow::Borrowed(key)
    }
}

/// `FooBar` -> `-foo-bar`
fn kebab(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for c in camel.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
