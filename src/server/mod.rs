//! Web server rendering pages on every request

use anyhow::Result;
use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::content::MarkdownRenderer;
use crate::error::ContentError;
use crate::pages::Pages;
use crate::templates::TemplateRenderer;
use crate::Site;

/// Server state
///
/// Only the renderer and templates are shared; content is read from disk
/// for each request.
struct ServerState {
    site: Site,
    renderer: Arc<MarkdownRenderer>,
    templates: TemplateRenderer,
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let status = if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, self.to_string()).into_response()
    }
}

/// Build the application router for a site
pub fn router(site: &Site) -> Result<Router> {
    let state = Arc::new(ServerState {
        site: site.clone(),
        renderer: Arc::new(MarkdownRenderer::from_config(&site.config.highlight)),
        templates: TemplateRenderer::new(&site.config)?,
    });

    let not_found = get(not_found_handler).with_state(Arc::clone(&state));
    let static_files = ServeDir::new(&site.static_dir).not_found_service(not_found);

    Ok(Router::new()
        .route("/", get(|| async { Redirect::temporary("/blog") }))
        .route("/blog", get(blog_index_handler))
        .route("/blog/page/:page", get(blog_page_handler))
        .route("/blog/:slug", get(blog_post_handler))
        .route("/videos", get(videos_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let app = router(site)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}/blog", ip, port);
    if !site.config.production {
        println!("Drafts are visible. Pass --production to hide them.");
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn blog_index_handler(
    State(state): State<Arc<ServerState>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    render_page(state, uri.path().to_string(), |pages, templates| {
        templates.blog_index(&pages.blog_index()?)
    })
    .await
}

async fn blog_page_handler(
    State(state): State<Arc<ServerState>>,
    OriginalUri(uri): OriginalUri,
    Path(page): Path<String>,
) -> Response {
    render_page(state, uri.path().to_string(), move |pages, templates| {
        templates.blog_page(&pages.blog_page(&page)?)
    })
    .await
}

async fn blog_post_handler(
    State(state): State<Arc<ServerState>>,
    OriginalUri(uri): OriginalUri,
    Path(slug): Path<String>,
) -> Response {
    render_page(state, uri.path().to_string(), move |pages, templates| {
        templates.blog_post(&pages.blog_post(&slug)?)
    })
    .await
}

async fn videos_handler(
    State(state): State<Arc<ServerState>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    render_page(state, uri.path().to_string(), |pages, templates| {
        templates.videos(&pages.videos()?)
    })
    .await
}

async fn not_found_handler(
    State(state): State<Arc<ServerState>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    match state.templates.not_found(uri.path()) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Load and render a page off the async runtime
///
/// Missing content renders the 404 page; other failures are logged and
/// answered with a 500.
async fn render_page<F>(state: Arc<ServerState>, path: String, render: F) -> Response
where
    F: FnOnce(&Pages<'_>, &TemplateRenderer) -> Result<String, ContentError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || {
        let pages = Pages::with_renderer(&state.site, Arc::clone(&state.renderer));
        match render(&pages, &state.templates) {
            Err(e) if e.is_not_found() => {
                tracing::debug!("{}: {}", path, e);
                state
                    .templates
                    .not_found(&path)
                    .map(|html| (StatusCode::NOT_FOUND, Html(html)))
            }
            other => other.map(|html| (StatusCode::OK, Html(html))),
        }
    })
    .await;

    match result {
        Ok(Ok(page)) => page.into_response(),
        Ok(Err(e)) => {
            tracing::error!("Failed to render page: {}", e);
            e.into_response()
        }
        Err(e) => {
            tracing::error!("Render task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}
