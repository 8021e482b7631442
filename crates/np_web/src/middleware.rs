//! Request guards: cookie-backed session lookup and a same-origin check for
//! state-changing requests.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use url::Url;

use crate::state::SESSION_COOKIE;
use crate::AppState;

/// Resolves the browser's [`np_app::Session`] from its cookie, or opens a new
/// one and sets the cookie on the response. Handlers read it as an
/// `Extension<Session>`.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = match session_id(request.headers()) {
        Some(id) => state.session(&id).await,
        None => None,
    };
    let (session, issued) = match existing {
        Some(session) => (session, None),
        None => {
            let (id, session) = state.open_session().await;
            (session, Some(id))
        }
    };
    request.extensions_mut().insert(session);

    let mut response = next.run(request).await;
    if let Some(id) = issued {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!("💥 Invalid session cookie: {}", e),
        }
    }
    response
}

/// Rejects form posts that another site made the browser send.
pub async fn same_origin(request: Request, next: Next) -> Response {
    let safe = matches!(*request.method(), Method::GET | Method::HEAD | Method::OPTIONS);
    if !safe && !is_same_origin(request.headers()) {
        tracing::warn!("🚫 Rejected cross-origin {} {}", request.method(), request.uri().path());
        return (StatusCode::FORBIDDEN, "Cross-origin request rejected").into_response();
    }
    next.run(request).await
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// `Origin`, or `Referer` when there is no `Origin`, must name the host the
/// request was sent to. Requests carrying neither (non-browser clients) pass.
fn is_same_origin(headers: &HeaderMap) -> bool {
    let Some(source) = headers.get(header::ORIGIN).or_else(|| headers.get(header::REFERER)) else {
        return true;
    };
    let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        return false;
    };
    source
        .to_str()
        .ok()
        .and_then(|s| Url::parse(s).ok())
        .and_then(|url| authority(&url))
        .map_or(false, |authority| authority.eq_ignore_ascii_case(host))
}

fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_session_id_from_cookie() {
        let h = headers(&[(header::COOKIE, "theme=dark; np_session=abc-123; other=1")]);
        assert_eq!(session_id(&h).as_deref(), Some("abc-123"));
        assert_eq!(session_id(&headers(&[(header::COOKIE, "theme=dark")])), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn test_same_origin() {
        assert!(is_same_origin(&headers(&[(header::HOST, "localhost:3000")])));
        assert!(is_same_origin(&headers(&[
            (header::HOST, "localhost:3000"),
            (header::ORIGIN, "http://localhost:3000"),
        ])));
        assert!(is_same_origin(&headers(&[
            (header::HOST, "newspost.example.com"),
            (header::REFERER, "https://newspost.example.com/?error=x"),
        ])));
        assert!(!is_same_origin(&headers(&[
            (header::HOST, "localhost:3000"),
            (header::ORIGIN, "https://evil.example"),
        ])));
        assert!(!is_same_origin(&headers(&[
            (header::HOST, "localhost:3000"),
            (header::ORIGIN, "null"),
        ])));
        assert!(!is_same_origin(&headers(&[(header::ORIGIN, "http://localhost:3000")])));
    }
}
