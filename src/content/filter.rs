//! Category filter and free-text search over the post sequence

use std::fmt;

use super::Post;

/// Category selector: every post, or one category compared case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse a selector as it appears in links and the CLI
    pub fn parse(selector: &str) -> Self {
        let selector = selector.trim();
        if selector.is_empty() || selector.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(selector.to_string())
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => post.in_category(category),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }

    /// Whether this selector picks out `category`, ignoring case
    pub fn selects(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => false,
            CategoryFilter::Category(selected) => selected.to_lowercase() == category.to_lowercase(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Category(category) => write!(f, "{}", category),
        }
    }
}

/// Combined category and text predicate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub category: CategoryFilter,
    query: String,
}

impl PostFilter {
    pub fn new(category: CategoryFilter, query: &str) -> Self {
        Self {
            category,
            query: query.trim().to_lowercase(),
        }
    }

    /// The normalized (trimmed, lowercased) query
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.category.matches(post) && self.matches_text(post)
    }

    fn matches_text(&self, post: &Post) -> bool {
        self.query.is_empty()
            || post.title.to_lowercase().contains(&self.query)
            || post.excerpt.to_lowercase().contains(&self.query)
    }

    /// Stable filter: matching posts in their original order
    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|post| self.matches(post)).collect()
    }
}

/// Filter `posts` by a category selector and an optional query
pub fn filter_posts<'a>(posts: &'a [Post], selector: &str, query: &str) -> Vec<&'a Post> {
    PostFilter::new(CategoryFilter::parse(selector), query).apply(posts)
}
