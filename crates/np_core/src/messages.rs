//! User-facing messages placed in the error slot or shown as notices.

pub const EMPTY_KEYWORD: &str = "Please enter a keyword";
pub const NO_ARTICLES_FOUND: &str = "No articles found for this keyword. Try a different search term.";
pub const FETCH_NEWS_FAILED: &str = "Failed to fetch news. Please try again.";

pub const NO_ARTICLES_TO_SUMMARIZE: &str = "No articles available to generate post from";
pub const GENERATE_POST_FAILED: &str = "Failed to generate post. Please try again.";

pub const NOT_CONNECTED: &str = "Please connect to LinkedIn first";
pub const NO_POST_CONTENT: &str = "No post content to share";
pub const PUBLISH_FAILED: &str = "Failed to post on LinkedIn. Please try again.";
pub const POST_SHARED: &str = "✅ Post shared on LinkedIn!";

pub fn auth_error(code: &str) -> String {
    format!("LinkedIn authentication error: {}", code)
}
