#![forbid(unsafe_code)]

//! Homework review notifier binary.

use clap::Parser;
use homework_bot::config::Cli;
use homework_bot::{
    initial_cursor, Driver, HttpStatusFetcher, LoopState, TelegramNotifier, TokioSleeper,
};
use homework_core::now_unix;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.log))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = match cli.into_config() {
        Ok(c) => c,
        Err(e) => {
            error!(variable = e.variable(), "required environment variable is not set; stopping");
            return Err(e.into());
        }
    };

    let fetcher = HttpStatusFetcher::new(
        &config.endpoint,
        config.credentials.practicum_token.clone(),
        config.request_timeout,
    )?;
    let notifier = TelegramNotifier::new(
        &config.telegram_api_url,
        &config.credentials.telegram_token,
        config.credentials.telegram_chat_id.clone(),
        config.request_timeout,
    )?;

    let cursor = initial_cursor(now_unix(), config.lookback);
    info!(
        endpoint = %fetcher.endpoint(),
        interval_secs = config.retry_interval.as_secs(),
        cursor,
        "notifier starting"
    );

    let mut driver = Driver::new(
        fetcher,
        notifier,
        TokioSleeper,
        config.retry_interval,
        LoopState::starting_at(cursor),
    );
    driver.run_until(shutdown_signal()).await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown requested");
}
