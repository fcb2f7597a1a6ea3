//! Startup configuration loading

use vc_shared::config::AppConfig;

/// Load `.env` (when present) and build the application configuration from
/// the process environment.
pub fn load() -> AppConfig {
    // A missing .env file is normal outside development
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    let config = AppConfig::from_env();

    if !dotenv_loaded && config.environment.is_development() {
        eprintln!("No .env file found; using process environment only");
    }

    config
}
