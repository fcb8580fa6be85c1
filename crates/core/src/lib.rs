#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Shared models and pure logic for the homework review notifier.

pub mod credentials;
pub mod format;
pub mod model;
pub mod validation;

mod util;

pub use credentials::{check_tokens, Credentials, MissingCredential};
pub use format::{failure_message, parse_status};
pub use model::{HomeworkStatus, StatusUpdate, Submission};
pub use util::now_unix;
pub use validation::{check_response, ValidationError};
