use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::cycle::{run_cycle, LoopState};
use crate::fetcher::StatusSource;
use crate::notifier::Notifier;

/// Waits between cycles. Swapped out in tests to avoid real delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Owns the loop state and repeats `run_cycle` with a fixed pause in between.
pub struct Driver<S, N, Z> {
    source: S,
    notifier: N,
    sleeper: Z,
    interval: Duration,
    state: LoopState,
}

impl<S, N, Z> Driver<S, N, Z>
where
    S: StatusSource,
    N: Notifier,
    Z: Sleeper,
{
    pub fn new(source: S, notifier: N, sleeper: Z, interval: Duration, state: LoopState) -> Self {
        Self {
            source,
            notifier,
            sleeper,
            interval,
            state,
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Polls until `shutdown` resolves. Shutdown is only observed between
    /// cycles; a cycle in flight always completes.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            run_cycle(&mut self.state, &self.source, &self.notifier).await;
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(cursor = self.state.cursor, "polling stopped");
                    return;
                }
                _ = self.sleeper.sleep(self.interval) => {}
            }
        }
    }
}
