//! Post records as supplied by the data document

use serde::{Deserialize, Serialize};

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique numeric identifier
    pub id: u64,

    /// Unique URL-safe key used for lookup and deep links
    pub slug: String,

    pub title: String,

    #[serde(default)]
    pub excerpt: String,

    #[serde(default)]
    pub category: String,

    /// Publication date as written in the document (usually `YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub read_time: String,

    /// Emoji or image reference shown on cards and the detail header
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub views: u64,

    #[serde(default)]
    pub content: PostContent,
}

/// Structured body of a post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostContent {
    /// Plain-text introduction
    pub intro: Option<String>,

    /// Sections in display order (also the table-of-contents order)
    pub sections: Vec<Section>,

    /// Closing text in the formatter's grammar
    pub conclusion: Option<String>,
}

/// A titled section of a post body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl PostContent {
    /// The conclusion, treating an empty one as absent
    pub fn conclusion_text(&self) -> Option<&str> {
        self.conclusion.as_deref().filter(|text| !text.is_empty())
    }
}

impl Post {
    /// Create a post with the required fields and empty metadata
    pub fn new(id: u64, slug: &str, title: &str) -> Self {
        Self {
            id,
            slug: slug.to_string(),
            title: title.to_string(),
            excerpt: String::new(),
            category: String::new(),
            date: String::new(),
            read_time: String::new(),
            image: String::new(),
            views: 0,
            content: PostContent::default(),
        }
    }

    /// Image shown on cards, with the default placeholder
    pub fn card_image(&self) -> &str {
        if self.image.is_empty() {
            "📝"
        } else {
            &self.image
        }
    }

    /// Whether the post belongs to `category`, ignoring case
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}
