#![forbid(unsafe_code)]

use tokio::net::TcpListener;
use tp_http::{AppState, router};
use tp_storage::TaskStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_DATA_DIR: &str = "data";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir =
        std::env::var("TASK_PLANNER_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    // Schema must be sound before the store accepts traffic; a migration
    // failure aborts startup.
    let store = match TaskStore::open(&data_dir) {
        Ok(store) => store,
        Err(err) => {
            error!("failed to open task store in {data_dir}: {err}");
            return Err(err.into());
        }
    };
    info!("task store ready at {}", store.storage_dir().display());

    let app = router(AppState::new(store));
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("task planner listening on http://localhost:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}
