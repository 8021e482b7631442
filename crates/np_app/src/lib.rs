pub mod logging;
pub mod session;

pub use logging::{init_logging, Logger};
pub use session::Session;

pub mod prelude {
    pub use crate::Session;
    pub use np_core::{AppState, CallbackOutcome, CallbackParams, Completion, Error, Result};
}
