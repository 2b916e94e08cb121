//! Main application configuration
//!
//! Defines the primary configuration structures for the rating engine,
//! including environment variable loading, TOML file loading, and validation.

use crate::config::solver::SolverSettings;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub solver: SolverSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "league-ladder".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(tolerance) = env::var("SOLVER_TOLERANCE") {
            config.solver.tolerance = tolerance
                .parse()
                .map_err(|_| anyhow!("Invalid SOLVER_TOLERANCE value: {}", tolerance))?;
        }
        if let Ok(cap) = env::var("SOLVER_MAX_ITERATIONS") {
            config.solver.max_iterations = cap
                .parse()
                .map_err(|_| anyhow!("Invalid SOLVER_MAX_ITERATIONS value: {}", cap))?;
        }
        if let Ok(prior) = env::var("SOLVER_SMOOTHING_PRIOR") {
            config.solver.smoothing_prior = prior
                .parse()
                .map_err(|_| anyhow!("Invalid SOLVER_SMOOTHING_PRIOR value: {}", prior))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;
        let config: Self = toml::from_str(&contents).context("Failed to parse config file")?;
        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.solver.validate()?;

    Ok(())
}
