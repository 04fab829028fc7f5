// ABOUTME: Source-specific body extraction driven by each adapter's ContentSpec.
// ABOUTME: Locates the article container, walks its children in order and classifies them into blocks.

//! Content extraction.
//!
//! Key behaviors:
//! - Container selectors are tried in priority order; the first one that
//!   matches wins and only its first match is used.
//! - Children are visited in document order. The first role rule that
//!   matches a child classifies it; children matching an `unwrap` selector
//!   are walked in place; everything else is skipped.
//! - Indices count emitted blocks only, so skipped or blank elements leave
//!   no gaps.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};

use crate::article::{BlockKind, BlockSequence, ContentBlock};
use crate::error::ExtractFault;
use crate::extractors::compiled::get_or_compile;
use crate::extractors::fields::element_text;

/// Wrapper nesting deeper than this is not walked.
const MAX_UNWRAP_DEPTH: usize = 16;

/// Produces an article's body blocks from a parsed page.
pub trait ContentExtractor {
    /// Returns `ExtractFault::ContentContainerNotFound` when no container matches.
    fn extract_blocks(&self, doc: &Html) -> Result<Vec<ContentBlock>, ExtractFault>;
}

/// Classifies elements matching `selector` as `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    pub selector: String,
    pub kind: BlockKind,
}

impl RoleRule {
    pub fn new(selector: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            selector: selector.into(),
            kind,
        }
    }
}

/// Role table used when an adapter does not list its own.
pub fn default_roles() -> Vec<RoleRule> {
    vec![
        RoleRule::new("h1", BlockKind::Heading),
        RoleRule::new("h2, h3, h4, h5, h6", BlockKind::Subheading),
        RoleRule::new("p", BlockKind::Paragraph),
        RoleRule::new("blockquote", BlockKind::Quote),
        RoleRule::new("li", BlockKind::ListItem),
        RoleRule::new("figcaption", BlockKind::Caption),
    ]
}

/// Where a source keeps its article body and how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContentSpec {
    /// Container selectors in priority order.
    pub containers: Vec<String>,
    /// Role rules in priority order; empty means [`default_roles`].
    #[serde(default)]
    pub roles: Vec<RoleRule>,
    /// Wrapper elements whose children are walked as if they were the container's.
    #[serde(default)]
    pub unwrap: Vec<String>,
}

impl ContentSpec {
    /// Every selector used here, for cache warming.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.containers
            .iter()
            .map(String::as_str)
            .chain(self.roles.iter().map(|r| r.selector.as_str()))
            .chain(self.unwrap.iter().map(String::as_str))
    }
}

impl ContentExtractor for ContentSpec {
    fn extract_blocks(&self, doc: &Html) -> Result<Vec<ContentBlock>, ExtractFault> {
        let container =
            locate_container(doc, &self.containers).ok_or(ExtractFault::ContentContainerNotFound)?;

        let roles: Vec<(Selector, BlockKind)> = if self.roles.is_empty() {
            compile_roles(&default_roles())
        } else {
            compile_roles(&self.roles)
        };
        let unwrap: Vec<Selector> = self
            .unwrap
            .iter()
            .filter_map(|s| get_or_compile(s))
            .collect();

        let mut blocks = BlockSequence::new();
        walk_children(*container, &roles, &unwrap, &mut blocks, 0);
        Ok(blocks.finish())
    }
}

/// The first match of the first container selector that matches anything.
pub fn locate_container<'a, S: AsRef<str>>(doc: &'a Html, containers: &[S]) -> Option<ElementRef<'a>> {
    containers.iter().find_map(|css| {
        let sel = get_or_compile(css.as_ref())?;
        doc.select(&sel).next()
    })
}

fn compile_roles(rules: &[RoleRule]) -> Vec<(Selector, BlockKind)> {
    rules
        .iter()
        .filter_map(|r| get_or_compile(&r.selector).map(|sel| (sel, r.kind)))
        .collect()
}

fn child_elements<'a>(node: NodeRef<'a, Node>) -> impl Iterator<Item = ElementRef<'a>> {
    node.children().filter_map(ElementRef::wrap)
}

fn walk_children(
    node: NodeRef<'_, Node>,
    roles: &[(Selector, BlockKind)],
    unwrap: &[Selector],
    blocks: &mut BlockSequence,
    depth: usize,
) {
    for child in child_elements(node) {
        if let Some(kind) = classify(&child, roles) {
            blocks.push(kind, &element_text(&child));
        } else if depth < MAX_UNWRAP_DEPTH && unwrap.iter().any(|sel| sel.matches(&child)) {
            walk_children(*child, roles, unwrap, blocks, depth + 1);
        }
    }
}

fn classify(el: &ElementRef<'_>, roles: &[(Selector, BlockKind)]) -> Option<BlockKind> {
    roles
        .iter()
        .find(|(sel, _)| sel.matches(el))
        .map(|(_, kind)| *kind)
}
