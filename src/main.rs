//! `logvisor` binary: restarts a container when its logs contain a trigger string.
//!
//! Configuration comes from the environment (see [`logvisor::Config`]); a `.env`
//! file in the working directory is loaded first when present.

use std::process::ExitCode;
use std::sync::Arc;

use logvisor::{DockerGateway, LogWriter, Subscribe, load_dotenv, run_with, wait_for_shutdown_signal};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logvisor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    load_dotenv();
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let result = run_with(
        |key| std::env::var(key).ok(),
        |cfg| DockerGateway::connect(cfg.log_tail.clone()).map(Arc::new),
        subscribers,
        wait_for_shutdown_signal(),
    )
    .await;

    match result {
        Ok(()) => {
            info!("watchdog stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(label = e.as_label(), error = %e, "watchdog failed");
            ExitCode::FAILURE
        }
    }
}
