//! # Element Kinds
//!
//! Closed set of structural child kinds, replacing the stringly-typed
//! tag/attribute comparisons of classic FB2 editors with one classification
//! function.

use fb2_dom::{NodeId, Tree};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator classifying a node for schema purposes.
///
/// `Wildcard` stands for "any kind not otherwise listed": free-flowing
/// paragraph/inline content that a schema may admit through its wildcard
/// slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Body,
    Section,
    Title,
    Subtitle,
    Epigraph,
    Annotation,
    Stanza,
    Poem,
    Cite,
    Image,
    TextAuthor,
    Date,
    Wildcard,
}

impl ElementKind {
    /// Map a discriminator string to a kind. Unrecognized names classify as
    /// `Wildcard`.
    pub fn from_name(name: &str) -> ElementKind {
        match name.to_ascii_lowercase().as_str() {
            "body" => ElementKind::Body,
            "section" => ElementKind::Section,
            "title" => ElementKind::Title,
            "subtitle" => ElementKind::Subtitle,
            "epigraph" => ElementKind::Epigraph,
            "annotation" => ElementKind::Annotation,
            "stanza" => ElementKind::Stanza,
            "poem" => ElementKind::Poem,
            "cite" => ElementKind::Cite,
            "image" => ElementKind::Image,
            "text-author" => ElementKind::TextAuthor,
            "date" => ElementKind::Date,
            _ => ElementKind::Wildcard,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Body => "body",
            ElementKind::Section => "section",
            ElementKind::Title => "title",
            ElementKind::Subtitle => "subtitle",
            ElementKind::Epigraph => "epigraph",
            ElementKind::Annotation => "annotation",
            ElementKind::Stanza => "stanza",
            ElementKind::Poem => "poem",
            ElementKind::Cite => "cite",
            ElementKind::Image => "image",
            ElementKind::TextAuthor => "text-author",
            ElementKind::Date => "date",
            ElementKind::Wildcard => "*",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a live node.
///
/// `img` tags are images by tag name alone; generic `div` containers carry
/// their kind in the `class` attribute, compared case-insensitively. Text
/// nodes and stale ids have no kind.
pub fn classify(tree: &Tree, id: NodeId) -> Option<ElementKind> {
    let tag = tree.tag_name(id)?;
    if tag.eq_ignore_ascii_case("img") {
        return Some(ElementKind::Image);
    }
    if tag.eq_ignore_ascii_case("div") {
        return Some(match tree.attribute(id, "class") {
            Some(class) => ElementKind::from_name(class),
            None => ElementKind::Wildcard,
        });
    }
    Some(ElementKind::Wildcard)
}
