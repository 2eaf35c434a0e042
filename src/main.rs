use std::process::ExitCode;

use tracing::{error, info};

use sitedeploy::web::WebServer;
use sitedeploy::Config;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = sitedeploy::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        sitedeploy::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    info!("sitedeploy - static site deployer");
    info!(
        repository = %config.github.repository,
        repo_path = %config.github.repo_path,
        branch = %config.github.branch,
        "Deploy target configured"
    );

    let server = match WebServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
