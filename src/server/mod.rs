//! Journal web server
//!
//! Serves the generated site, the submission form, and accepts new posts.

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, get_service},
    Router,
};
use std::net::SocketAddr;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::content::{Submission, Upload, TAG_FIELD_PREFIX};
use crate::Journal;

/// Build the router for a journal
pub fn router(journal: Journal) -> Router {
    let body_limit = journal.config.max_upload_mb * 1024 * 1024;
    let home = ServeFile::new(journal.site_dir.join("index.html"));
    let site = ServeDir::new(&journal.site_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/", get_service(home).post(create_post_handler))
        .route("/new.html", get(new_post_form_handler))
        .route("/all", get(rebuild_all_handler))
        .fallback_service(site)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(journal)
}

/// Start the server
pub async fn start(journal: Journal, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let app = router(journal);

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Any failure while handling a request, reported as a 500
struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Something went wrong: {}", self.0),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

async fn new_post_form_handler(State(journal): State<Journal>) -> Result<Html<String>, AppError> {
    Ok(Html(journal.new_post_form()?))
}

/// Save a submitted post, publish it and send the browser to its page
async fn create_post_handler(
    State(journal): State<Journal>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let submission = read_submission(multipart).await?;

    let url = tokio::task::spawn_blocking(move || {
        let post = journal.create_post(submission)?;
        journal.post_url(&post)
    })
    .await??;

    Ok(Redirect::to(&url))
}

async fn rebuild_all_handler(State(journal): State<Journal>) -> Result<String, AppError> {
    let summary = tokio::task::spawn_blocking(move || journal.rebuild(None)).await??;
    Ok(summary.to_string())
}

/// Collect the form fields of a multipart submission
async fn read_submission(mut multipart: Multipart) -> Result<Submission> {
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(tag) = name.strip_prefix(TAG_FIELD_PREFIX) {
            submission.selected_tags.push(tag.to_string());
            continue;
        }

        match name.as_str() {
            "title" => submission.title = Some(field.text().await?),
            "author" => submission.author = field.text().await?,
            "content" => submission.content = field.text().await?,
            "tags" => submission.tags = field.text().await?,
            "media" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                submission.media.push(Upload {
                    file_name,
                    data: data.to_vec(),
                });
            }
            other => tracing::debug!("Ignoring form field {}", other),
        }
    }

    Ok(submission)
}
