//! Content extraction from mirrored HTML
//!
//! An [`Extractor`] is compiled once from an [`ExtractionRule`] and then
//! applied to every page of a run. For each page it:
//! 1. Parses the document
//! 2. Selects elements (or text nodes) in document order
//! 3. Detaches excluded descendants of the selected elements
//! 4. Concatenates the remaining text with no separator
//! 5. Drops empty lines (see [`normalize_text`])

mod normalize;
mod selection;

pub use normalize::normalize_text;
pub use selection::{AttrValue, ParserKind, Selection};

use crate::config::ExtractConfig;
use crate::ExtractError;
use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node, Selector};
use selection::{attrs_match, tag_matches};
use std::collections::BTreeMap;

/// Selection plus exclusion, shared read-only by every page of a run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionRule {
    pub selection: Selection,
    pub exclude_tags: Vec<String>,
}

impl ExtractionRule {
    pub fn new(selection: Selection, exclude_tags: Vec<String>) -> Self {
        Self {
            selection,
            exclude_tags,
        }
    }

    pub fn from_config(config: &ExtractConfig) -> Self {
        Self::new(config.selection.clone(), config.exclude_tags.clone())
    }
}

/// Selection compiled for matching
#[derive(Debug)]
enum Matcher {
    Any,
    Tag(String),
    Attributes(BTreeMap<String, AttrValue>),
    Text,
    Css(Selector),
}

/// Turns HTML into normalized plain text according to a rule
#[derive(Debug)]
pub struct Extractor {
    rule: ExtractionRule,
    parser: ParserKind,
    matcher: Matcher,
}

impl Extractor {
    /// Compiles a rule
    ///
    /// # Example
    ///
    /// ```
    /// use site_tap::extract::{ExtractionRule, Extractor, ParserKind, Selection};
    ///
    /// let rule = ExtractionRule::new(
    ///     Selection::Tag { name: "main".to_string() },
    ///     vec!["nav".to_string()],
    /// );
    /// let extractor = Extractor::new(rule, ParserKind::Document).unwrap();
    /// let text = extractor.extract("<main><nav>Menu</nav><p>Body</p></main>");
    /// assert_eq!(text, "Body");
    /// ```
    pub fn new(rule: ExtractionRule, parser: ParserKind) -> Result<Self, ExtractError> {
        let matcher = match &rule.selection {
            Selection::Any => Matcher::Any,
            Selection::Tag { name } => Matcher::Tag(name.clone()),
            Selection::Attributes { attrs } => Matcher::Attributes(attrs.clone()),
            Selection::Text => Matcher::Text,
            Selection::Css { selector } => {
                let compiled =
                    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
                        selector: selector.clone(),
                        message: e.to_string(),
                    })?;
                Matcher::Css(compiled)
            }
        };

        Ok(Self {
            rule,
            parser,
            matcher,
        })
    }

    pub fn rule(&self) -> &ExtractionRule {
        &self.rule
    }

    /// Parses HTML with the configured parser
    pub fn parse(&self, html: &str) -> Html {
        match self.parser {
            ParserKind::Document => Html::parse_document(html),
            ParserKind::Fragment => Html::parse_fragment(html),
        }
    }

    /// Parses and extracts in one step
    pub fn extract(&self, html: &str) -> String {
        self.extract_document(self.parse(html))
    }

    /// Extracts text from a parsed document
    ///
    /// The document is consumed because excluded subtrees are detached from
    /// it. A selection that matches nothing yields the empty string.
    pub fn extract_document(&self, mut document: Html) -> String {
        let selected = self.select(&document);
        if selected.is_empty() {
            return String::new();
        }

        if !self.rule.exclude_tags.is_empty() && !matches!(self.matcher, Matcher::Text) {
            self.strip_excluded(&mut document, &selected);
        }

        let root = document.tree.root().id();
        let mut text = String::new();
        for id in &selected {
            let Some(node) = document.tree.get(*id) else {
                continue;
            };

            // A selected element that sat inside another selection's
            // excluded subtree was detached with it
            if !is_attached(node, root) {
                continue;
            }

            match node.value() {
                Node::Text(t) => text.push_str(t),
                Node::Element(_) => {
                    if let Some(element) = ElementRef::wrap(node) {
                        text.extend(element.text());
                    }
                }
                _ => {}
            }
        }

        normalize_text(&text)
    }

    fn select(&self, document: &Html) -> Vec<NodeId> {
        match &self.matcher {
            Matcher::Css(selector) => document.select(selector).map(|e| e.id()).collect(),
            Matcher::Text => document
                .tree
                .root()
                .descendants()
                .filter(|node| node.value().is_text())
                .filter(|node| !self.has_excluded_ancestor(*node))
                .map(|node| node.id())
                .collect(),
            _ => document
                .tree
                .root()
                .descendants()
                .filter_map(ElementRef::wrap)
                .filter(|element| self.element_matches(element))
                .map(|element| element.id())
                .collect(),
        }
    }

    fn element_matches(&self, element: &ElementRef) -> bool {
        match &self.matcher {
            Matcher::Any => true,
            Matcher::Tag(name) => tag_matches(element.value(), name),
            Matcher::Attributes(attrs) => attrs_match(element.value(), attrs),
            Matcher::Text | Matcher::Css(_) => false,
        }
    }

    /// html5ever lowercases HTML names but keeps SVG camelCase (`foreignObject`)
    fn is_excluded(&self, name: &str) -> bool {
        self.rule
            .exclude_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(name))
    }

    fn has_excluded_ancestor(&self, node: NodeRef<Node>) -> bool {
        node.ancestors()
            .filter_map(|a| a.value().as_element())
            .any(|e| self.is_excluded(e.name()))
    }

    /// Detaches every excluded descendant of the selected elements
    fn strip_excluded(&self, document: &mut Html, selected: &[NodeId]) {
        let doomed: Vec<NodeId> = selected
            .iter()
            .filter_map(|id| document.tree.get(*id))
            .flat_map(|node| node.descendants().skip(1))
            .filter(|node| {
                node.value()
                    .as_element()
                    .map_or(false, |e| self.is_excluded(e.name()))
            })
            .map(|node| node.id())
            .collect();

        for id in doomed {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}

fn is_attached(node: NodeRef<Node>, root: NodeId) -> bool {
    node.id() == root || node.ancestors().any(|a| a.id() == root)
}
