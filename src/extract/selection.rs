use scraper::node::Element;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Which parts of a document have their text kept
///
/// Deserialized from a table tagged by `kind`:
///
/// ```toml
/// [extract.selection]
/// kind = "attributes"
/// attrs = { role = "main" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Selection {
    /// Every element in the document
    #[default]
    Any,

    /// Elements with the given tag name
    Tag { name: String },

    /// Elements whose attributes satisfy every entry
    Attributes { attrs: BTreeMap<String, AttrValue> },

    /// Every text node in the document
    Text,

    /// Elements matching a CSS selector
    Css { selector: String },
}

/// Expected value of one attribute
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// `true`: attribute must be present; `false`: must be absent
    Present(bool),

    /// Attribute must equal this value. For `class`, matching any single
    /// class token also counts.
    Exact(String),
}

impl AttrValue {
    fn matches(&self, name: &str, actual: Option<&str>) -> bool {
        match (self, actual) {
            (Self::Present(expected), actual) => *expected == actual.is_some(),
            (Self::Exact(_), None) => false,
            (Self::Exact(expected), Some(actual)) => {
                actual == expected
                    || (name == "class" && actual.split_ascii_whitespace().any(|c| c == expected))
            }
        }
    }
}

/// Tests an element against a tag name, ignoring ASCII case
pub(crate) fn tag_matches(element: &Element, name: &str) -> bool {
    element.name().eq_ignore_ascii_case(name)
}

/// Tests an element against every attribute expectation
pub(crate) fn attrs_match(element: &Element, attrs: &BTreeMap<String, AttrValue>) -> bool {
    attrs
        .iter()
        .all(|(name, expected)| expected.matches(name, element.attr(name)))
}

/// HTML parsing mode used by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum ParserKind {
    /// Full-document parsing (html5ever); `html.parser` is accepted as an alias
    #[default]
    #[serde(rename = "html5ever", alias = "html.parser")]
    Document,

    /// Fragment parsing, for files that hold a snippet rather than a page
    #[serde(rename = "fragment")]
    Fragment,
}
