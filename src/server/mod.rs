//! Development server
//!
//! Every request is one page view: the post document is loaded once, the
//! view renders to completion, and nothing is shared between requests
//! except the site configuration and the compiled templates.

use anyhow::Result;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::content::PostRepository;
use crate::error::PageError;
use crate::helpers::{query_pairs, url_for, LinkStyle, ListingQuery};
use crate::page::{DetailPage, ListingPage, SiteView};
use crate::templates::TemplateRenderer;
use crate::Folio;

/// Server state
struct ServerState {
    folio: Folio,
    renderer: TemplateRenderer,
}

impl ServerState {
    fn site(&self) -> SiteView<'_> {
        SiteView::new(&self.folio.config, &self.renderer, LinkStyle::Query)
    }

    async fn load(&self) -> Result<PostRepository, PageError> {
        self.folio.load_posts().await.map_err(|e| {
            tracing::warn!("{}", e);
            PageError::from(e)
        })
    }

    /// Error view replacing the page content
    fn error_page(&self, error: &PageError) -> Response {
        let status =
            StatusCode::from_u16(error.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match self.site().render_error(error) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => render_failed(e),
        }
    }
}

/// Build the router for a site
pub fn router(folio: Folio) -> Result<Router> {
    let listing_route = url_for(&folio.config, &folio.config.listing_page);
    let detail_route = url_for(&folio.config, &folio.config.detail_page);
    let api_route = url_for(&folio.config, "api/posts");
    let index_route = url_for(&folio.config, "");
    let public_dir = folio.public_dir.clone();

    let state = Arc::new(ServerState {
        folio,
        renderer: TemplateRenderer::new()?,
    });

    let index_target = listing_route.clone();
    let mut app = Router::new()
        .route(&listing_route, get(listing_handler))
        .route(&detail_route, get(detail_handler))
        .route(&api_route, get(api_posts_handler));
    if index_route != listing_route {
        app = app.route(
            &index_route,
            get(move || {
                let target = index_target.clone();
                async move { Redirect::temporary(&target) }
            }),
        );
    }

    Ok(app
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the development server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let app = router(folio.clone())?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!(
        "Server running at http://{}:{}{}",
        ip,
        port,
        url_for(&folio.config, &folio.config.listing_page)
    );
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn listing_handler(
    State(state): State<Arc<ServerState>>,
    RawQuery(raw): RawQuery,
) -> Response {
    let repository = match state.load().await {
        Ok(repository) => repository,
        Err(e) => return state.error_page(&e),
    };

    let listing = ListingQuery::parse(raw.as_deref().unwrap_or_default());
    let page = ListingPage::new(&repository, listing);
    match page.render(&state.site()) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_failed(e),
    }
}

async fn detail_handler(
    State(state): State<Arc<ServerState>>,
    RawQuery(raw): RawQuery,
) -> Response {
    let repository = match state.load().await {
        Ok(repository) => repository,
        Err(e) => return state.error_page(&e),
    };

    let slug = query_pairs(raw.as_deref().unwrap_or_default())
        .into_iter()
        .find(|(key, _)| key == "slug")
        .map(|(_, value)| value);

    let page = match DetailPage::open(&repository, slug.as_deref()) {
        Ok(page) => page,
        Err(e) => {
            tracing::debug!("Detail view failed: {}", e);
            return state.error_page(&e);
        }
    };

    match page.render(&state.site()) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_failed(e),
    }
}

/// Cards matching `?filter=&q=` as JSON
async fn api_posts_handler(
    State(state): State<Arc<ServerState>>,
    RawQuery(raw): RawQuery,
) -> Response {
    let repository = match state.load().await {
        Ok(repository) => repository,
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = serde_json::json!({ "error": e.to_string() });
            return (status, Json(body)).into_response();
        }
    };

    let listing = ListingQuery::parse(raw.as_deref().unwrap_or_default());
    let page = ListingPage::new(&repository, listing);
    Json(page.response(&state.site())).into_response()
}

fn render_failed(error: anyhow::Error) -> Response {
    tracing::error!("Render failed: {:#}", error);
    (StatusCode::INTERNAL_SERVER_ERROR, "Render failed").into_response()
}
