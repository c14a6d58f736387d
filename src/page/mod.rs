//! Page controllers - bind the loaded posts and the current view state to
//! the templates.
//!
//! There is no ambient state: a controller borrows the repository loaded for
//! one page view, holds the state of that view, and every event re-renders
//! through an explicit [`SiteView`].

use anyhow::Result;
use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::{
    format_content, related_posts, table_of_contents, CategoryFilter, Post, PostFilter,
    PostRepository,
};
use crate::error::PageError;
use crate::helpers::{url_for, CategoryPages, LinkStyle, Links, ListingQuery};
use crate::templates::{
    CardData, ErrorData, FilterLink, ListingData, PostView, SectionView, SiteData,
    TemplateRenderer,
};

/// Rendering dependencies shared by every page of one site
pub struct SiteView<'a> {
    config: &'a SiteConfig,
    renderer: &'a TemplateRenderer,
    links: Links<'a>,
}

impl<'a> SiteView<'a> {
    pub fn new(config: &'a SiteConfig, renderer: &'a TemplateRenderer, style: LinkStyle) -> Self {
        Self {
            config,
            renderer,
            links: Links::new(config, style),
        }
    }

    /// Static category links point at these pages
    pub fn with_category_pages(mut self, pages: &'a CategoryPages) -> Self {
        self.links = self.links.with_category_pages(pages);
        self
    }

    pub fn config(&self) -> &SiteConfig {
        self.config
    }

    pub fn links(&self) -> &Links<'a> {
        &self.links
    }

    pub fn site_data(&self) -> SiteData {
        SiteData {
            title: self.config.title.clone(),
            subtitle: self.config.subtitle.clone(),
            description: self.config.description.clone(),
            author: self.config.author.clone(),
            language: self.config.language.clone(),
            date_format: self.config.date_format.clone(),
            listing_url: self.links.listing(&ListingQuery::default()),
            stylesheet: url_for(self.config, "css/style.css"),
            year: chrono::Local::now().format("%Y").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Card shown in listings and under related posts
    pub fn card(&self, post: &Post) -> CardData {
        CardData {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            category: post.category.clone(),
            date: post.date.clone(),
            read_time: post.read_time.clone(),
            image: post.card_image().to_string(),
            url: self.links.detail(&post.slug),
        }
    }

    /// Replace the main content with an explanation and a way back
    pub fn render_error(&self, error: &PageError) -> Result<String> {
        let data = ErrorData {
            message: error.to_string(),
            detail: error.detail().to_string(),
            back_url: self.links.listing(&ListingQuery::default()),
        };
        self.renderer.render_error(&self.site_data(), &data)
    }
}

/// Result of evaluating the listing filter
#[derive(Debug, PartialEq)]
pub enum ListingOutcome<'a> {
    /// Posts were loaded but none matched
    Empty,
    Posts(Vec<&'a Post>),
}

/// Card list returned by the search endpoint
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ListingResponse {
    Empty,
    Posts { posts: Vec<CardData> },
}

/// Listing view: the loaded posts plus the selected category and query
pub struct ListingPage<'a> {
    repository: &'a PostRepository,
    listing: ListingQuery,
}

impl<'a> ListingPage<'a> {
    pub fn new(repository: &'a PostRepository, listing: ListingQuery) -> Self {
        Self {
            repository,
            listing,
        }
    }

    /// Current state, as it belongs in the address bar
    pub fn listing(&self) -> &ListingQuery {
        &self.listing
    }

    /// Switch category; the text query is cleared
    pub fn select_filter(&mut self, filter: CategoryFilter) {
        tracing::debug!("Filter selected: {}", filter);
        self.listing = ListingQuery::new(filter, "");
    }

    /// Search within the current category
    pub fn search(&mut self, query: &str) {
        self.listing.query = query.trim().to_string();
    }

    pub fn outcome(&self) -> ListingOutcome<'a> {
        let filter = PostFilter::new(self.listing.filter.clone(), &self.listing.query);
        let posts = filter.apply(self.repository.posts());
        if posts.is_empty() {
            ListingOutcome::Empty
        } else {
            ListingOutcome::Posts(posts)
        }
    }

    pub fn response(&self, site: &SiteView) -> ListingResponse {
        match self.outcome() {
            ListingOutcome::Empty => ListingResponse::Empty,
            ListingOutcome::Posts(posts) => ListingResponse::Posts {
                posts: posts.into_iter().map(|post| site.card(post)).collect(),
            },
        }
    }

    pub fn data(&self, site: &SiteView) -> ListingData {
        let links = site.links();
        let mut filters = vec![FilterLink {
            label: "All".to_string(),
            url: links.listing(&ListingQuery::default()),
            active: self.listing.filter.is_all(),
            count: self.repository.len(),
        }];
        filters.extend(self.repository.categories().into_iter().map(|category| {
            let filter = CategoryFilter::Category(category.name.clone());
            FilterLink {
                url: links.listing(&ListingQuery::new(filter, "")),
                active: self.listing.filter.selects(&category.name),
                label: category.name,
                count: category.count,
            }
        }));

        let cards = match self.outcome() {
            ListingOutcome::Empty => Vec::new(),
            ListingOutcome::Posts(posts) => posts.into_iter().map(|post| site.card(post)).collect(),
        };

        let search_action = match links.style() {
            LinkStyle::Query => Some(links.listing(&ListingQuery::default())),
            LinkStyle::Static => None,
        };

        ListingData {
            filters,
            cards,
            query: self.listing.query.clone(),
            active_label: match &self.listing.filter {
                CategoryFilter::All => None,
                CategoryFilter::Category(category) => Some(category.clone()),
            },
            search_action,
        }
    }

    pub fn render(&self, site: &SiteView) -> Result<String> {
        site.renderer
            .render_listing(&site.site_data(), &self.data(site))
    }
}

/// Detail view: the loaded posts plus the post being read
pub struct DetailPage<'a> {
    repository: &'a PostRepository,
    post: &'a Post,
}

impl<'a> DetailPage<'a> {
    /// Open the post named by `slug`
    pub fn open(repository: &'a PostRepository, slug: Option<&str>) -> Result<Self, PageError> {
        let slug = slug
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .ok_or(PageError::MissingSlug)?;
        let post = repository.find_by_slug(slug)?;
        Ok(Self { repository, post })
    }

    pub fn post(&self) -> &'a Post {
        self.post
    }

    pub fn related(&self, limit: usize) -> Vec<&'a Post> {
        related_posts(self.post, self.repository.posts(), limit)
    }

    /// Body, table of contents and related cards for the template
    pub fn view(&self, site: &SiteView) -> PostView {
        let config = site.config();
        let post = self.post;
        let toc = table_of_contents(post, &config.conclusion_title);
        let mut anchors = toc.iter().map(|entry| entry.anchor_id.clone());

        let sections = post
            .content
            .sections
            .iter()
            .zip(anchors.by_ref())
            .map(|(section, anchor_id)| SectionView {
                anchor_id,
                title: section.title.clone(),
                html: format_content(&section.content),
            })
            .collect();

        let conclusion = post
            .content
            .conclusion_text()
            .zip(anchors.next())
            .map(|(text, anchor_id)| SectionView {
                anchor_id,
                title: config.conclusion_title.clone(),
                html: format_content(text),
            });

        PostView {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            category: post.category.clone(),
            date: post.date.clone(),
            read_time: post.read_time.clone(),
            views: post.views,
            image: post.image.clone(),
            intro: post.content.intro.clone().filter(|intro| !intro.is_empty()),
            toc,
            sections,
            conclusion,
            related: self
                .related(config.related_posts)
                .into_iter()
                .map(|related| site.card(related))
                .collect(),
        }
    }

    pub fn render(&self, site: &SiteView) -> Result<String> {
        site.renderer.render_post(&site.site_data(), &self.view(site))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{PostContent, Section};

    fn repository() -> PostRepository {
        let mut setup = Post::new(1, "flutter-bloc", "State management with Bloc");
        setup.category = "Mobile".to_string();
        setup.excerpt = "Provider vs Bloc".to_string();
        setup.date = "2025-09-05".to_string();
        setup.views = 2048;
        setup.content = PostContent {
            intro: Some("Why I picked Bloc".to_string()),
            sections: vec![
                Section {
                    title: "Setup".to_string(),
                    content: "Add **bloc** to `pubspec.yaml`".to_string(),
                },
                Section {
                    title: "Setup".to_string(),
                    content: "```dart\nfinal a = '<b>';\n```".to_string(),
                },
            ],
            conclusion: Some("Use Bloc.".to_string()),
        };

        let mut other = Post::new(2, "flutter-const", "Invalid constant value");
        other.category = "Mobile".to_string();
        other.excerpt = "static const and opacity".to_string();

        let mut web = Post::new(3, "figma-react", "Figma to React");
        web.category = "Web".to_string();

        PostRepository::from_posts(vec![setup, other, web]).unwrap()
    }

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.author = "Quy".to_string();
        config
    }

    #[test]
    fn test_listing_outcome_states() {
        let repo = repository();
        let mut page = ListingPage::new(&repo, ListingQuery::default());
        assert!(matches!(page.outcome(), ListingOutcome::Posts(ref posts) if posts.len() == 3));

        page.select_filter(CategoryFilter::parse("mobile"));
        page.search("opacity");
        match page.outcome() {
            ListingOutcome::Posts(posts) => assert_eq!(posts[0].id, 2),
            ListingOutcome::Empty => panic!("expected a match"),
        }

        page.search("nothing like this");
        assert_eq!(page.outcome(), ListingOutcome::Empty);
    }

    #[test]
    fn test_select_filter_clears_query() {
        let repo = repository();
        let mut page = ListingPage::new(&repo, ListingQuery::parse("filter=Web&q=figma"));
        page.select_filter(CategoryFilter::All);
        assert_eq!(page.listing(), &ListingQuery::default());
    }

    #[test]
    fn test_listing_render_marks_active_filter() {
        let repo = repository();
        let config = config();
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteView::new(&config, &renderer, LinkStyle::Query);
        let page = ListingPage::new(&repo, ListingQuery::parse("filter=web"));

        let data = page.data(&site);
        let active: Vec<_> = data.filters.iter().filter(|f| f.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].label, "Web");
        assert_eq!(data.cards.len(), 1);

        let html = page.render(&site).unwrap();
        assert!(html.contains("Figma to React"));
        assert!(!html.contains("Invalid constant value"));
    }

    #[test]
    fn test_listing_response_json() {
        let repo = repository();
        let config = config();
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteView::new(&config, &renderer, LinkStyle::Query);

        let empty = ListingPage::new(&repo, ListingQuery::parse("filter=Backend"));
        let json = serde_json::to_value(empty.response(&site)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "empty"}));

        let web = ListingPage::new(&repo, ListingQuery::parse("filter=Web"));
        let json = serde_json::to_value(web.response(&site)).unwrap();
        assert_eq!(json["state"], "posts");
        assert_eq!(json["posts"][0]["url"], "/blog-detail.html?slug=figma-react");
    }

    #[test]
    fn test_detail_open_errors() {
        let repo = repository();
        assert!(matches!(
            DetailPage::open(&repo, None),
            Err(PageError::MissingSlug)
        ));
        assert!(matches!(
            DetailPage::open(&repo, Some("  ")),
            Err(PageError::MissingSlug)
        ));
        assert!(matches!(
            DetailPage::open(&repo, Some("Flutter-Bloc")),
            Err(PageError::NotFound(_))
        ));
    }

    #[test]
    fn test_detail_view_anchors_agree_with_toc() {
        let repo = repository();
        let config = config();
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteView::new(&config, &renderer, LinkStyle::Query);
        let page = DetailPage::open(&repo, Some("flutter-bloc")).unwrap();

        let view = page.view(&site);
        let toc: Vec<_> = view.toc.iter().map(|e| e.anchor_id.clone()).collect();
        let mut headings: Vec<_> = view.sections.iter().map(|s| s.anchor_id.clone()).collect();
        headings.extend(view.conclusion.iter().map(|c| c.anchor_id.clone()));
        assert_eq!(toc, headings);
        assert_eq!(toc, vec!["setup", "setup-2", "conclusion"]);
        assert_eq!(view.related.len(), 1);
        assert_eq!(view.related[0].title, "Invalid constant value");
    }

    #[test]
    fn test_detail_render() {
        let repo = repository();
        let config = config();
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteView::new(&config, &renderer, LinkStyle::Query);
        let page = DetailPage::open(&repo, Some("flutter-bloc")).unwrap();

        let html = page.render(&site).unwrap();
        assert!(html.contains("<title>State management with Bloc - Quy</title>"));
        assert!(html.contains(r#"<h2 id="setup-2">Setup</h2>"#));
        assert!(html.contains(r##"<a href="#setup-2">Setup</a>"##));
        assert!(html.contains("<strong>bloc</strong>"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(html.contains("Sep 5, 2025"));
        assert!(html.contains("2,048 views"));
    }

    #[test]
    fn test_error_page_links_back() {
        let config = config();
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteView::new(&config, &renderer, LinkStyle::Query);
        let html = site.render_error(&PageError::MissingSlug).unwrap();
        assert!(html.contains("No blog post specified"));
        assert!(html.contains(r#"href="/blog.html""#));
    }

    #[test]
    fn test_markup_in_date_is_escaped() {
        let mut post = Post::new(1, "xss", "Dates");
        post.date = "<script>alert(1)</script>".to_string();
        let repo = PostRepository::from_posts(vec![post]).unwrap();
        let config = config();
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteView::new(&config, &renderer, LinkStyle::Query);

        let listing = ListingPage::new(&repo, ListingQuery::default())
            .render(&site)
            .unwrap();
        let detail = DetailPage::open(&repo, Some("xss"))
            .unwrap()
            .render(&site)
            .unwrap();
        for html in [listing, detail] {
            assert!(!html.contains("<script>"));
            assert!(html.contains("&lt;script&gt;alert(1)&lt;&#x2F;script&gt;"));
        }
    }

    #[test]
    fn test_invalid_date_format_renders_default() {
        let repo = repository();
        let mut config = config();
        config.date_format = "%Q".to_string();
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteView::new(&config, &renderer, LinkStyle::Query);

        let listing = ListingPage::new(&repo, ListingQuery::default())
            .render(&site)
            .unwrap();
        assert!(listing.contains("Sep 5, 2025"));
        let detail = DetailPage::open(&repo, Some("flutter-bloc"))
            .unwrap()
            .render(&site)
            .unwrap();
        assert!(detail.contains("Sep 5, 2025"));
    }

    #[test]
    fn test_empty_conclusion_not_rendered() {
        let mut post = Post::new(1, "short", "Short");
        post.content = PostContent {
            intro: None,
            sections: vec![Section {
                title: "Only".to_string(),
                content: "Body".to_string(),
            }],
            conclusion: Some(String::new()),
        };
        let repo = PostRepository::from_posts(vec![post]).unwrap();
        let config = config();
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteView::new(&config, &renderer, LinkStyle::Query);
        let page = DetailPage::open(&repo, Some("short")).unwrap();

        let view = page.view(&site);
        assert!(view.conclusion.is_none());
        assert_eq!(view.toc.len(), 1);
        assert!(!page.render(&site).unwrap().contains("✨ Conclusion"));
    }
}
