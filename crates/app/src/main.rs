//! Prize Wheel - lucky-draw console host
//!
//! Runs a live draw from the terminal: loads the event from the local
//! database, animates the wheel at a fixed frame rate and takes operator
//! commands on stdin.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prizewheel_core::WheelConfig;

mod command;
mod console;
mod runtime;
mod state;

fn load_config() -> WheelConfig {
    let Some(path) = WheelConfig::default_path() else {
        tracing::warn!("No config directory on this platform, using defaults");
        return WheelConfig::default();
    };
    match WheelConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Invalid config, using defaults");
            WheelConfig::default()
        }
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Prize Wheel");

    let config = load_config();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize application state
    let app_state = match state::AppState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(runtime::run(app_state)) {
        tracing::error!("Failed to save event: {}", e);
        std::process::exit(1);
    }
}
