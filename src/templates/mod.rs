//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary; pages only differ by the data
//! structures below.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::TocEntry;
use crate::helpers::{display_date, format_count, DEFAULT_DATE_FORMAT};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Formatted bodies are already HTML; plain post fields are escaped
        // explicitly in the templates
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("error.html", include_str!("site/error.html")),
            // Partials
            ("partials/card.html", include_str!("site/partials/card.html")),
            ("partials/toc.html", include_str!("site/partials/toc.html")),
            (
                "partials/filters.html",
                include_str!("site/partials/filters.html"),
            ),
        ])?;

        tera.register_filter("display_date", display_date_filter);
        tera.register_filter("count", count_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the listing view
    pub fn render_listing(&self, site: &SiteData, listing: &ListingData) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("listing", listing);
        self.render("blog.html", &context)
    }

    /// Render the detail view
    pub fn render_post(&self, site: &SiteData, post: &PostView) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("post", post);
        self.render("post.html", &context)
    }

    /// Render a view that replaces the main content with an error
    pub fn render_error(&self, site: &SiteData, error: &ErrorData) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("error", error);
        self.render("error.html", &context)
    }
}

/// Tera filter: format a post date string
fn display_date_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("display_date", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("display_date", "format", String, val),
        None => DEFAULT_DATE_FORMAT.to_string(),
    };
    Ok(tera::Value::String(display_date(&s, &format)))
}

/// Tera filter: thousands separators
fn count_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let n = tera::try_get_value!("count", "value", u64, value);
    Ok(tera::Value::String(format_count(n)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub date_format: String,
    pub listing_url: String,
    pub stylesheet: String,
    pub year: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardData {
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub date: String,
    pub read_time: String,
    pub image: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterLink {
    pub label: String,
    pub url: String,
    pub active: bool,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingData {
    pub filters: Vec<FilterLink>,
    pub cards: Vec<CardData>,
    pub query: String,
    /// Selected category, `None` for all posts
    pub active_label: Option<String>,
    /// Form target for the search box, `None` where search is unavailable
    pub search_action: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub anchor_id: String,
    pub title: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub date: String,
    pub read_time: String,
    pub views: u64,
    pub image: String,
    pub intro: Option<String>,
    pub toc: Vec<TocEntry>,
    pub sections: Vec<SectionView>,
    pub conclusion: Option<SectionView>,
    pub related: Vec<CardData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorData {
    pub message: String,
    pub detail: String,
    pub back_url: String,
}
