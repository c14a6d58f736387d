//! Anchor IDs and the table of contents derived from section titles

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use super::Post;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHENS: Regex = Regex::new(r"-+").unwrap();
}

/// Derive a URL-fragment-safe identifier from a title.
///
/// ```
/// assert_eq!(folio::content::anchor_id("Hello, World!  Foo"), "hello-world-foo");
/// ```
pub fn anchor_id(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    let hyphenated = WHITESPACE.replace_all(&stripped, "-");
    let collapsed = HYPHENS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Issues anchors that are unique within one post.
///
/// The first occurrence of a title keeps the bare anchor; later ones get
/// `-2`, `-3`, ... appended.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    issued: HashSet<String>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, title: &str) -> String {
        let mut base = anchor_id(title);
        if base.is_empty() {
            base = "section".to_string();
        }

        let mut candidate = base.clone();
        let mut occurrence = 1;
        while self.issued.contains(&candidate) {
            occurrence += 1;
            candidate = format!("{}-{}", base, occurrence);
        }

        self.issued.insert(candidate.clone());
        candidate
    }
}

/// One jump link in the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub anchor_id: String,
    pub label: String,
}

/// Build the table of contents for a post: one entry per section in display
/// order, then one for the conclusion heading if the post has a conclusion.
pub fn table_of_contents(post: &Post, conclusion_title: &str) -> Vec<TocEntry> {
    let mut registry = AnchorRegistry::new();
    let mut entries: Vec<TocEntry> = post
        .content
        .sections
        .iter()
        .map(|section| TocEntry {
            anchor_id: registry.issue(&section.title),
            label: section.title.clone(),
        })
        .collect();

    if post.content.conclusion_text().is_some() {
        entries.push(TocEntry {
            anchor_id: registry.issue(conclusion_title),
            label: conclusion_title.to_string(),
        });
    }

    entries
}
