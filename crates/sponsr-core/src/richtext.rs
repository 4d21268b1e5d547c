//! Structured rich-text article bodies and their HTML rendering.
//!
//! Article bodies arrive as Portable Text: a flat array of typed nodes where
//! text blocks carry spans, marks and list membership, and images are
//! embedded by asset reference. Rendering is a fixed table keyed by block
//! style, mark and embed type. Node types outside that table render nothing.

use maud::{html, Markup};
use serde::{Deserialize, Serialize};

use crate::format::estimate_read_minutes;

/// Width requested for images embedded in an article body.
pub const BODY_IMAGE_WIDTH: u32 = 1200;

/// An article body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub nodes: Vec<Node>,
}

/// A top-level body node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "lowercase")]
pub enum Node {
    Block(Block),
    Image(ImageEmbed),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub style: BlockStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<ListKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default)]
    pub children: Vec<Inline>,
    #[serde(default)]
    pub mark_defs: Vec<MarkDef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStyle {
    H1,
    H2,
    H3,
    H4,
    #[default]
    Normal,
    Blockquote,
    /// Any style outside the table; rendered as a paragraph.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Number,
    /// Unrecognised list kinds render as bullets.
    #[serde(other)]
    Other,
}

/// Inline child of a text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "lowercase")]
pub enum Inline {
    Span(Span),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub text: String,
    /// Decorator names (`strong`, `em`) or keys into the block's `mark_defs`.
    #[serde(default)]
    pub marks: Vec<String>,
}

/// Annotation definition referenced from span marks by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageEmbed {
    #[serde(default)]
    pub asset: AssetRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref", default)]
    pub reference: String,
}

impl Block {
    fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Inline::Span(span) => Some(span.text.as_str()),
                Inline::Unknown => None,
            })
            .collect()
    }
}

impl ListKind {
    fn tag(&self) -> &'static str {
        match self {
            ListKind::Number => "ol",
            ListKind::Bullet | ListKind::Other => "ul",
        }
    }
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Plain-text rendition: one paragraph per block, list items prefixed.
    pub fn plain_text(&self) -> String {
        let mut paragraphs = Vec::new();
        let mut number = 0;

        for node in &self.nodes {
            let Node::Block(block) = node else {
                number = 0;
                continue;
            };

            let text = block.text();
            match block.list_item {
                Some(ListKind::Number) => {
                    number += 1;
                    paragraphs.push(format!("{}. {}", number, text));
                }
                Some(_) => {
                    number = 0;
                    paragraphs.push(format!("• {}", text));
                }
                None => {
                    number = 0;
                    paragraphs.push(text);
                }
            }
        }

        paragraphs.join("\n\n")
    }

    pub fn word_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Block(block) => Some(block.text().split_whitespace().count()),
                _ => None,
            })
            .sum()
    }

    pub fn estimated_read_minutes(&self) -> u32 {
        estimate_read_minutes(self.word_count())
    }
}

/// Builds CDN URLs for image asset references.
///
/// Asset references look like `image-<id>-<width>x<height>-<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    /// Returns the CDN URL for `reference` scaled to `width`, or `None` when
    /// the reference is not an image asset.
    ///
    /// # Examples
    ///
    /// ```
    /// use sponsr_core::richtext::ImageUrlBuilder;
    ///
    /// let images = ImageUrlBuilder::new("abc123", "production");
    /// assert_eq!(
    ///     images.url_for("image-Tb9Ew8CX-2000x3000-jpg", 1200).as_deref(),
    ///     Some("https://cdn.sanity.io/images/abc123/production/Tb9Ew8CX-2000x3000.jpg?w=1200")
    /// );
    /// assert!(images.url_for("file-abc-pdf", 1200).is_none());
    /// ```
    pub fn url_for(&self, reference: &str, width: u32) -> Option<String> {
        let rest = reference.strip_prefix("image-")?;
        let (rest, ext) = rest.rsplit_once('-')?;
        let (id, dimensions) = rest.rsplit_once('-')?;
        let (w, h) = dimensions.split_once('x')?;

        let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if id.is_empty() || ext.is_empty() || !numeric(w) || !numeric(h) {
            return None;
        }

        Some(format!(
            "https://cdn.sanity.io/images/{}/{}/{}-{}.{}?w={}",
            self.project_id, self.dataset, id, dimensions, ext, width
        ))
    }
}

/// Renders a document to HTML.
///
/// Images render only when an [`ImageUrlBuilder`] is available, matching a
/// site running without a content backend.
pub fn render_html(document: &Document, images: Option<&ImageUrlBuilder>) -> String {
    let markup = html! {
        @for section in sections(document) {
            @match section {
                Section::List(ListKind::Number, items) => {
                    ol { @for item in items { li { (spans(item)) } } }
                }
                Section::List(_, items) => {
                    ul { @for item in items { li { (spans(item)) } } }
                }
                Section::Text(block) => { (text_block(block)) }
                Section::Image(image) => { (figure(image, images)) }
            }
        }
    };
    markup.into_string()
}

/// Consecutive list items are grouped under one list element.
enum Section<'a> {
    List(ListKind, Vec<&'a Block>),
    Text(&'a Block),
    Image(&'a ImageEmbed),
}

fn sections(document: &Document) -> Vec<Section<'_>> {
    let mut sections = Vec::new();

    for node in &document.nodes {
        match node {
            Node::Block(block) => {
                let Some(kind) = block.list_item else {
                    sections.push(Section::Text(block));
                    continue;
                };
                if let Some(Section::List(open, items)) = sections.last_mut() {
                    if open.tag() == kind.tag() {
                        items.push(block);
                        continue;
                    }
                }
                sections.push(Section::List(kind, vec![block]));
            }
            Node::Image(image) => sections.push(Section::Image(image)),
            Node::Unknown => {}
        }
    }

    sections
}

fn text_block(block: &Block) -> Markup {
    let content = spans(block);
    match block.style {
        BlockStyle::H1 => html! { h1 { (content) } },
        BlockStyle::H2 => html! { h2 { (content) } },
        BlockStyle::H3 => html! { h3 { (content) } },
        BlockStyle::H4 => html! { h4 { (content) } },
        BlockStyle::Blockquote => html! { blockquote { (content) } },
        BlockStyle::Normal | BlockStyle::Other => html! { p { (content) } },
    }
}

fn figure(image: &ImageEmbed, images: Option<&ImageUrlBuilder>) -> Markup {
    let src = images.and_then(|b| b.url_for(&image.asset.reference, BODY_IMAGE_WIDTH));
    let caption = image.caption.as_deref().filter(|c| !c.is_empty());

    html! {
        @if let Some(src) = src {
            figure {
                img src=(src) alt=(image.alt.as_deref().unwrap_or_default());
                @if let Some(caption) = caption {
                    figcaption { (caption) }
                }
            }
        }
    }
}

fn spans(block: &Block) -> Markup {
    html! {
        @for child in &block.children {
            @if let Inline::Span(span) = child {
                (marked(span, &block.mark_defs))
            }
        }
    }
}

/// Wraps span text in its marks, innermost first.
fn marked(span: &Span, defs: &[MarkDef]) -> Markup {
    let text = html! { (span.text) };
    span.marks.iter().fold(text, |inner, mark| match mark.as_str() {
        "strong" => html! { strong { (inner) } },
        "em" => html! { em { (inner) } },
        key => match defs.iter().find(|def| def.key == key) {
            Some(def) if def.kind == "link" => html! {
                a href=(def.href.as_deref().unwrap_or_default())
                    target="_blank"
                    rel="noopener noreferrer" { (inner) }
            },
            _ => inner,
        },
    })
}
