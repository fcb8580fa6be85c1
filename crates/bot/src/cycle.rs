use std::time::Duration;

use homework_core::{check_response, failure_message, parse_status, ValidationError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::fetcher::{FetchError, StatusSource};
use crate::notifier::{NotifyError, Notifier};

/// Everything one polling cycle can fail with.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// State carried from one cycle to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopState {
    /// Lower bound (unix seconds) of the next query window.
    pub cursor: i64,
    /// Text of the last message that reached the chat.
    pub last_notified: Option<String>,
}

impl LoopState {
    pub fn starting_at(cursor: i64) -> Self {
        Self {
            cursor,
            last_notified: None,
        }
    }
}

/// First query window start: `now` minus the configured look-back.
pub fn initial_cursor(now: i64, lookback: Duration) -> i64 {
    let back = i64::try_from(lookback.as_secs()).unwrap_or(i64::MAX);
    now.saturating_sub(back)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A status change was relayed.
    Notified { message: String },
    /// The response carried no status changes.
    NoUpdates,
    /// The cycle failed; `notified` tells whether the failure reached the chat.
    Failed { message: String, notified: bool },
}

/// Runs one poll: fetch, validate, relay the newest change, advance the cursor.
///
/// Never returns an error: failures are logged, relayed unless identical to
/// the last relayed message, and leave the cursor untouched.
pub async fn run_cycle<S, N>(state: &mut LoopState, source: &S, notifier: &N) -> CycleOutcome
where
    S: StatusSource + ?Sized,
    N: Notifier + ?Sized,
{
    match poll(state.cursor, source, notifier).await {
        Ok((sent, current_date)) => {
            if current_date < state.cursor {
                warn!(
                    cursor = state.cursor,
                    current_date, "server time is behind the cursor"
                );
            }
            debug!(from = state.cursor, to = current_date, "advancing cursor");
            state.cursor = current_date;
            match sent {
                Some(message) => {
                    state.last_notified = Some(message.clone());
                    CycleOutcome::Notified { message }
                }
                None => CycleOutcome::NoUpdates,
            }
        }
        Err(err) => report_failure(state, notifier, &err).await,
    }
}

async fn poll<S, N>(
    cursor: i64,
    source: &S,
    notifier: &N,
) -> Result<(Option<String>, i64), CycleError>
where
    S: StatusSource + ?Sized,
    N: Notifier + ?Sized,
{
    let payload = source.fetch(cursor).await?;
    let update = check_response(&payload)?;
    debug!(records = update.homeworks.len(), "response passed validation");

    let Some(latest) = update.latest() else {
        debug!("no status changes");
        return Ok((None, update.current_date));
    };

    let message = parse_status(latest)?;
    notifier.send(&message).await?;
    info!(%message, "bot sent message");
    Ok((Some(message), update.current_date))
}

async fn report_failure<N>(state: &mut LoopState, notifier: &N, err: &CycleError) -> CycleOutcome
where
    N: Notifier + ?Sized,
{
    let message = failure_message(err);
    error!(error = %err, "polling cycle failed");

    if state.last_notified.as_deref() == Some(message.as_str()) {
        debug!("same failure already reported; not notifying again");
        return CycleOutcome::Failed {
            message,
            notified: false,
        };
    }

    match notifier.send(&message).await {
        Ok(()) => {
            info!(%message, "bot sent message");
            state.last_notified = Some(message.clone());
            CycleOutcome::Failed {
                message,
                notified: true,
            }
        }
        Err(e) => {
            error!(error = %e, "failed to deliver failure notification");
            CycleOutcome::Failed {
                message,
                notified: false,
            }
        }
    }
}
