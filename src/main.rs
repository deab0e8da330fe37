use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backoffice_admin::{AppState, config::AppConfig, session::FileTokenStore};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,backoffice_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::Cli::parse();
    let config = AppConfig::from_env()?;
    let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
    tracing::debug!(base_url = %config.api_base_url, "starting");

    let state = AppState::new(config, tokens)?;
    state.guard.check();

    let outcome = args.command.run(&state).await;

    for toast in state.toasts.drain() {
        eprintln!("[{}] {}", toast.summary, toast.detail);
    }
    outcome
}
