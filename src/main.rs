mod config;
mod document;
mod errors;
mod llm;
mod routes;
mod state;
mod translate;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transdoc=debug,tower_http=debug")),
        )
        .init();

    let mut config = None;
    for path in Config::search_paths() {
        match Config::load(&path) {
            Ok(cfg) => {
                info!("Loaded configuration from: {}", path);
                config = Some(cfg);
                break;
            }
            Err(e) => {
                tracing::debug!("Failed to load config from {}: {}", path, e);
            }
        }
    }
    let mut config = config.unwrap_or_else(|| {
        info!("No config file found, using defaults");
        Config::default()
    });
    config.apply_env_overrides();

    std::fs::create_dir_all(config.system_config.downloads_path())?;
    info!("Documents are stored in {}", config.system_config.downloads_dir);

    let addr = (config.system_config.host.clone(), config.system_config.port);

    let app_state = AppState::new(config)?;
    let app = routes::build_app(app_state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting server on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
