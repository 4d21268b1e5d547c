use serde::{Deserialize, Serialize};

use crate::format::format_date;
use crate::richtext::Document;

/// One insights article, in summary or full form.
///
/// Summary entries (listing pages) leave `author` and `body` empty; the
/// detail query fills them in. An empty `slug` marks an entry with no
/// addressable detail page, which is the case for every built-in fallback
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub title: String,
    pub excerpt: String,
    pub tag: String,
    /// ISO-like publication date, or an already formatted display date.
    pub date: String,
    /// Display string such as "8 min read".
    pub read_time: String,
    pub image: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Document>,
}

impl Entry {
    /// True when the entry can be opened on its own page.
    pub fn has_detail_page(&self) -> bool {
        !self.slug.trim().is_empty()
    }

    /// Publication date formatted for display ("January 15, 2025").
    pub fn display_date(&self) -> String {
        format_date(&self.date)
    }
}
