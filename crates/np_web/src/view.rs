use askama::Template;
use np_core::AppState as UiState;

/// Read-only projection of the UI state.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage<'a> {
    pub state: &'a UiState,
    pub connect_url: &'a str,
    pub notice: Option<String>,
}

impl<'a> IndexPage<'a> {
    pub fn new(state: &'a UiState, connect_url: &'a str, notice: Option<String>) -> Self {
        Self { state, connect_url, notice }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_core::{Article, CallbackParams};

    const CONNECT: &str = "http://localhost:5000/auth/linkedin";

    fn render(state: &UiState) -> String {
        IndexPage::new(state, CONNECT, None).render().unwrap()
    }

    #[test]
    fn test_fresh_page() {
        let html = render(&UiState::new());
        assert!(html.contains("AI NewsPost Generator"));
        assert!(html.contains(r#"href="http://localhost:5000/auth/linkedin""#));
        assert!(html.contains("🔍 Fetch News"));
        assert!(!html.contains("role=\"alert\""));
        assert!(!html.contains("Articles:"));
        assert!(!html.contains("AI-Generated LinkedIn Post"));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_articles_and_post() {
        let mut state = UiState::new();
        state.accept_callback(&CallbackParams::with_token("abc123"));
        state.articles = vec![
            Article::new("Chips <rally>", "Fabs & foundries", "Mon, 13 Oct 2025 08:00:00 GMT"),
            Article::new("Second", "More", ""),
        ];
        state.generated_post = "Line one\nLine two".to_string();

        let html = render(&state);
        assert!(html.contains("✅ LinkedIn connected!"));
        assert!(!html.contains("Connect with LinkedIn"));
        assert!(html.contains("📄 Top 2 Articles:"));
        assert!(html.contains("Chips &lt;rally&gt;"));
        assert!(html.contains("Fabs &amp; foundries"));
        assert!(html.contains("2025-10-13 08:00"));
        assert!(html.contains("Line one\nLine two"));
        assert!(html.contains("🚀 Post to LinkedIn"));
        assert!(html.contains("🔄 Regenerate Post"));
        assert!(!html.contains("abc123"));
    }

    #[test]
    fn test_post_button_needs_connection() {
        let mut state = UiState::new();
        state.articles = vec![Article::new("Title", "Description", "")];
        state.generated_post = "Post".to_string();
        let html = render(&state);
        assert!(!html.contains("🚀 Post to LinkedIn"));
        assert!(html.contains("🔄 Regenerate Post"));
    }

    #[test]
    fn test_loading_and_error() {
        let mut state = UiState::new();
        state.set_keyword("ai");
        let _pending = state.begin_search().unwrap();
        let html = render(&state);
        assert!(html.contains("🔄 Loading..."));
        assert!(html.contains("🔄 Searching for news articles..."));
        assert!(html.contains(r#"value="ai""#));
        assert!(html.contains(r#"<meta http-equiv="refresh" content="1">"#));

        let mut state = UiState::new();
        state.error = "Please enter a keyword".to_string();
        let html = IndexPage::new(&state, CONNECT, Some("✅ Post shared on LinkedIn!".to_string()))
            .render()
            .unwrap();
        assert!(html.contains("Please enter a keyword"));
        assert!(html.contains("action=\"/dismiss\""));
        assert!(html.contains("✅ Post shared on LinkedIn!"));
    }
}
