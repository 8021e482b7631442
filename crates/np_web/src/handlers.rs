use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use np_app::Session;
use np_core::CallbackParams;
use serde::Deserialize;
use thiserror::Error;

use crate::view::IndexPage;
use crate::AppState;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Failed to render page: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!("💥 {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub keyword: String,
}

/// Page load. OAuth callback parameters are consumed and then dropped from
/// the address bar by redirecting to the bare root. A repeated parameter uses
/// its first value.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let params = query.as_deref().map(CallbackParams::from_query).unwrap_or_default();
    if !params.is_empty() && session.load_page(&params).await.strips_query() {
        return Ok(Redirect::to("/").into_response());
    }

    let (snapshot, notice) = session.take_view().await;
    let html = IndexPage::new(&snapshot, &state.connect_url, notice).render()?;
    Ok(Html(html).into_response())
}

// The operations below raise their loading flag, hand the request to a
// background task and redirect at once; the page refreshes until it lands.

pub async fn search(Extension(session): Extension<Session>, Form(form): Form<SearchForm>) -> Redirect {
    session.start_fetch_news(&form.keyword).await;
    Redirect::to("/")
}

pub async fn generate(Extension(session): Extension<Session>) -> Redirect {
    session.start_generate_post().await;
    Redirect::to("/")
}

pub async fn publish(Extension(session): Extension<Session>) -> Redirect {
    session.start_post_to_linkedin().await;
    Redirect::to("/")
}

pub async fn dismiss(Extension(session): Extension<Session>) -> Redirect {
    session.dismiss_error().await;
    Redirect::to("/")
}
