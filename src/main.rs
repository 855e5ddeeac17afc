use std::process::ExitCode;

use study_planner::config::Config;
use study_planner::store::Store;
use study_planner::{app, logging, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load_with_dotenv() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logging(config.log_json) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let store = match Store::open(&config.db_path) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(path = %config.db_path.display(), error = %e, "failed to open store");
            return ExitCode::FAILURE;
        }
    };

    let router = app(AppState::new(store), &config.static_dir);

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %config.addr, error = %e, "bind failed");
            return ExitCode::FAILURE;
        }
    };

    // Print the link to the server
    tracing::info!("Server running at http://{}", config.addr);
    tracing::info!("Static files: http://{}/ ({})", config.addr, config.static_dir.display());
    tracing::info!("API base:     http://{}/api", config.addr);

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
