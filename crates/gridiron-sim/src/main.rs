//! Game simulator binary for Gridiron.
//!
//! Loads configuration, builds a game clock, and plays one full game
//! through the rules engine, logging every period change and stoppage.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load clock configuration from `GRIDIRON_CONFIG` or `gridiron-config.yaml`
//! 3. Load simulator settings from the same file's `simulation` section
//! 4. Build the clock and wrap it for shared access
//! 5. Play the game
//! 6. Log the result

mod driver;
mod error;

use std::path::{Path, PathBuf};

use gridiron_core::{ClockConfig, GameClock, SharedGameClock};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::driver::SimSettings;
use crate::error::SimError;

/// Environment variable naming an alternate config file.
const CONFIG_ENV: &str = "GRIDIRON_CONFIG";

/// Config file looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "gridiron-config.yaml";

/// Application entry point for the simulator.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the game loop fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("gridiron-sim starting");

    // 2. Load clock configuration.
    let path = config_path();
    let config = load_config(&path)?;
    info!(
        quarter_length = config.quarter_length,
        play_clock = config.play_clock_normal,
        simulation_speed = config.simulation_speed,
        playoff_rules = config.playoff_rules,
        deterministic = config.deterministic_mode,
        seed = config.seed,
        "Configuration loaded"
    );

    // 3. Load simulator settings.
    let settings = load_settings(&path)?;
    info!(
        max_plays = settings.max_plays,
        weather = ?settings.weather,
        overtime = settings.overtime,
        "Simulator settings loaded"
    );

    // 4. Build the clock.
    let clock = SharedGameClock::new(GameClock::with_config(config)?);
    info!(game_id = %clock.snapshot().game_id, "Game clock initialized");

    // 5. Play the game.
    let report = driver::run_game(&clock, &settings)?;

    // 6. Log results.
    let summary = serde_json::to_string(&report.final_state)?;
    info!(
        plays = report.plays,
        quarter = %report.final_state.quarter,
        total_elapsed = report.final_state.total_elapsed,
        final_state = %summary,
        "gridiron-sim shutdown complete"
    );

    Ok(())
}

/// The config file to read: `GRIDIRON_CONFIG` if set, otherwise
/// `gridiron-config.yaml` in the working directory.
fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
}

/// Load the clock configuration, falling back to defaults when the file
/// does not exist.
fn load_config(path: &Path) -> Result<ClockConfig, SimError> {
    if path.exists() {
        let config = ClockConfig::from_file(path)?;
        Ok(config)
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        Ok(ClockConfig::default())
    }
}

/// Load simulator settings from the `simulation` section of the config
/// file. A missing file or section yields defaults.
fn load_settings(path: &Path) -> Result<SimSettings, SimError> {
    if !path.exists() {
        return Ok(SimSettings::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| SimError::Settings {
        message: format!("failed to read config file: {e}"),
    })?;

    // Parse the full YAML and extract just the "simulation" section.
    let raw: serde_yml::Value = serde_yml::from_str(&contents).map_err(|e| SimError::Settings {
        message: format!("failed to parse config YAML: {e}"),
    })?;

    raw.get("simulation").map_or_else(
        || Ok(SimSettings::default()),
        |section| {
            serde_yml::from_value(section.clone()).map_err(|e| SimError::Settings {
                message: format!("failed to parse simulation settings: {e}"),
            })
        },
    )
}
