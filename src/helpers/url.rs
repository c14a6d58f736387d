//! URL helper functions and the listing/detail navigation contract

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;
use std::collections::HashMap;

use crate::content::{anchor_id, AnchorRegistry, CategoryFilter};

/// Characters escaped inside a query-string component
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Encode one query-string component
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

/// Decode one query-string component (`+` is a space)
pub fn decode_component(value: &str) -> String {
    let value = value.replace('+', " ");
    percent_decode_str(&value).decode_utf8_lossy().into_owned()
}

/// Split a raw query string into decoded key/value pairs
pub fn query_pairs(raw: &str) -> Vec<(String, String)> {
    raw.trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_component(key), decode_component(value)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

/// State of the listing view carried in the address bar:
/// `?filter=CATEGORY&q=QUERY`, each omitted when it has no effect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub filter: CategoryFilter,
    pub query: String,
}

impl ListingQuery {
    pub fn new(filter: CategoryFilter, query: &str) -> Self {
        Self {
            filter,
            query: query.trim().to_string(),
        }
    }

    /// Parse a raw query string; unknown parameters are ignored
    pub fn parse(raw: &str) -> Self {
        let mut listing = ListingQuery::default();
        for (key, value) in query_pairs(raw) {
            match key.as_str() {
                "filter" => listing.filter = CategoryFilter::parse(&value),
                "q" => listing.query = value.trim().to_string(),
                _ => {}
            }
        }
        listing
    }

    /// Query string without the leading `?`; empty for the default view
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let CategoryFilter::Category(category) = &self.filter {
            params.push(format!("filter={}", encode_component(category)));
        }
        if !self.query.is_empty() {
            params.push(format!("q={}", encode_component(&self.query)));
        }
        params.join("&")
    }
}

/// How generated pages link to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// `blog.html?filter=...` and `blog-detail.html?slug=...`, answered by the server
    Query,
    /// One file per category and per post, for static hosting
    Static,
}

/// Static listing page of every category, one distinct file each.
///
/// Categories whose names slugify alike ("C++" and "C") get `-2`, `-3`, ...
/// in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct CategoryPages {
    paths: HashMap<String, String>,
}

impl CategoryPages {
    pub fn new<'c>(categories: impl IntoIterator<Item = &'c str>) -> Self {
        let mut registry = AnchorRegistry::new();
        let mut paths = HashMap::new();
        for category in categories {
            paths
                .entry(category.to_lowercase())
                .or_insert_with(|| format!("blog/{}.html", registry.issue(category)));
        }
        Self { paths }
    }

    /// Output path relative to the public dir, ignoring case
    pub fn path(&self, category: &str) -> String {
        self.paths
            .get(&category.to_lowercase())
            .cloned()
            .unwrap_or_else(|| category_page_path(category))
    }
}

/// Builds listing and detail links for one link style
#[derive(Debug, Clone, Copy)]
pub struct Links<'a> {
    config: &'a SiteConfig,
    style: LinkStyle,
    category_pages: Option<&'a CategoryPages>,
}

impl<'a> Links<'a> {
    pub fn new(config: &'a SiteConfig, style: LinkStyle) -> Self {
        Self {
            config,
            style,
            category_pages: None,
        }
    }

    /// Link static category listings to the pages actually written
    pub fn with_category_pages(mut self, pages: &'a CategoryPages) -> Self {
        self.category_pages = Some(pages);
        self
    }

    pub fn style(&self) -> LinkStyle {
        self.style
    }

    /// Link to the listing view. Static pages cannot carry a text query, so
    /// only the category survives there.
    pub fn listing(&self, listing: &ListingQuery) -> String {
        match self.style {
            LinkStyle::Query => {
                let base = url_for(self.config, &self.config.listing_page);
                let query = listing.to_query_string();
                if query.is_empty() {
                    base
                } else {
                    format!("{}?{}", base, query)
                }
            }
            LinkStyle::Static => match &listing.filter {
                CategoryFilter::All => url_for(self.config, &self.config.listing_page),
                CategoryFilter::Category(category) => {
                    let path = match self.category_pages {
                        Some(pages) => pages.path(category),
                        None => category_page_path(category),
                    };
                    url_for(self.config, &path)
                }
            },
        }
    }

    /// Link to the detail view of a post
    pub fn detail(&self, slug: &str) -> String {
        match self.style {
            LinkStyle::Query => format!(
                "{}?slug={}",
                url_for(self.config, &self.config.detail_page),
                encode_component(slug)
            ),
            LinkStyle::Static => url_for(self.config, &post_page_path(slug)),
        }
    }
}

/// Output path of a static category listing, relative to the public dir
pub fn category_page_path(category: &str) -> String {
    let stem = anchor_id(category);
    if stem.is_empty() {
        format!("blog/{}.html", encode_component(category))
    } else {
        format!("blog/{}.html", stem)
    }
}

/// Output path of a static post page, relative to the public dir
pub fn post_page_path(slug: &str) -> String {
    format!("posts/{}.html", encode_component(slug))
}
