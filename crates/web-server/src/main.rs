use configuration::LoggingSettings;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// This main function is the entry point when running `cargo run -p web-server`.
// It serves the dashboard with the settings from `climate.toml`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = configuration::load_config(Path::new("climate.toml"))?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&settings.logging))
        .with_writer(std::io::stderr)
        .init();

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let state = Arc::new(web_server::AppState::new(&settings));
    web_server::run_server(addr, state).await
}

/// `RUST_LOG` when set, otherwise `logging.level`.
fn log_filter(logging: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
}
