use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use mjop_engine::EngineConfig;
use serde::Deserialize;

/// Host settings, read from defaults and `MJOP__*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Where plans are stored.
    pub storage: StorageSettings,
    /// Log output.
    pub telemetry: TelemetrySettings,
    /// Analysis options passed to the engine.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Plan storage settings.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Directory holding one `<plan-id>.json` file per plan.
    pub dir: PathBuf,
}

/// Log output settings.
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    /// Filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// `MJOP__STORAGE__DIR=/var/lib/mjop` sets `storage.dir`,
    /// `MJOP__ENGINE__SHOW_DONE_TASKS=true` sets `engine.show_done_tasks`.
    ///
    /// # Errors
    /// Returns `ConfigError` if a value has the wrong type.
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Loads settings from `vars` instead of the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if a value has the wrong type.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Start with default values
            .set_default("storage.dir", "plans")?
            .set_default("telemetry.log_level", "info")?
            .set_default("telemetry.json", false)?
            // Merge in Environment variables
            .add_source(
                Environment::with_prefix("MJOP")
                    .separator("__")
                    .try_parsing(true)
                    .source(vars),
            )
            .build()?;

        s.try_deserialize()
    }
}
