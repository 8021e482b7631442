pub mod config;
pub mod error;
pub mod messages;
pub mod models;
pub mod state;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use models::NewsBackend;
pub use state::{AppState, CallbackOutcome, Completion, LoadingFlags, Operation, Pending, Ticket};
pub use types::{Article, ArticleDigest, CallbackParams, PublishRequest};
