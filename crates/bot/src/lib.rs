#![forbid(unsafe_code)]

//! Polling notifier: fetches homework review statuses and relays changes to
//! a Telegram chat.

pub mod config;
pub mod cycle;
pub mod driver;
pub mod fetcher;
pub mod notifier;

pub use cycle::{initial_cursor, run_cycle, CycleError, CycleOutcome, LoopState};
pub use driver::{Driver, Sleeper, TokioSleeper};
pub use fetcher::{FetchError, HttpStatusFetcher, StatusSource};
pub use notifier::{Notifier, NotifyError, TelegramNotifier};
