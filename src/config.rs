//! Configuration management for the `FindMyMap` meeting planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::FindMyMapError;
use crate::costs::CostRates;
use crate::models::Objective;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `FindMyMap` library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindMyMapConfig {
    /// Venue ranking settings
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    /// Travel estimation backend
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Travel time cache
    #[serde(default)]
    pub cache: CacheConfig,
    /// Meeting cost rates
    #[serde(default)]
    pub costs: CostRates,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to do when a travel estimate for a (participant, venue) pair fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Drop the venue from the ranking and report the failure
    #[default]
    Exclude,
    /// Replace the failed estimate with the haversine heuristic
    Fallback,
}

/// Venue ranking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Default ranking objective (average, fairness, total)
    #[serde(default)]
    pub objective: Objective,
    /// Upper bound on in-flight travel estimates per ranking request
    #[serde(default = "default_max_concurrent_estimates")]
    pub max_concurrent_estimates: usize,
    /// Failure policy for travel estimates
    #[serde(default)]
    pub on_failure: FailureMode,
    /// Only rank venues within this distance of the meeting point
    #[serde(default)]
    pub search_radius_km: Option<f64>,
}

/// Travel estimation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProvider {
    /// Offline great-circle heuristic
    #[default]
    Haversine,
    /// GraphHopper routing API
    GraphHopper,
}

/// Routing configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub provider: RoutingProvider,
    /// Routing API key (falls back to the `GRAPHHOPPER_API_KEY` env var)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for the routing API
    #[serde(default = "default_routing_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_routing_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_routing_max_retries")]
    pub max_retries: u32,
    /// Road distance over straight-line distance for the haversine heuristic
    #[serde(default = "default_road_factor")]
    pub road_factor: f64,
    /// Assumed average speed for the haversine heuristic
    #[serde(default = "default_average_speed")]
    pub average_speed_kmh: f64,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache routing results on disk
    #[serde(default)]
    pub enabled: bool,
    /// Cache TTL in hours
    #[serde(default = "default_cache_ttl")]
    pub ttl_hours: u32,
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, compact or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_max_concurrent_estimates() -> usize {
    8
}

fn default_routing_base_url() -> String {
    "https://graphhopper.com/api/1".to_string()
}

fn default_routing_timeout() -> u32 {
    30
}

fn default_routing_max_retries() -> u32 {
    3
}

fn default_road_factor() -> f64 {
    crate::routing::haversine::DEFAULT_ROAD_FACTOR
}

fn default_average_speed() -> f64 {
    crate::routing::haversine::DEFAULT_AVERAGE_SPEED_KMH
}

fn default_cache_ttl() -> u32 {
    168
}

fn default_cache_location() -> String {
    ".cache/findmymap".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            objective: Objective::default(),
            max_concurrent_estimates: default_max_concurrent_estimates(),
            on_failure: FailureMode::default(),
            search_radius_km: None,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            provider: RoutingProvider::default(),
            api_key: None,
            base_url: default_routing_base_url(),
            timeout_seconds: default_routing_timeout(),
            max_retries: default_routing_max_retries(),
            road_factor: default_road_factor(),
            average_speed_kmh: default_average_speed(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_hours: default_cache_ttl(),
            location: default_cache_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl FindMyMapConfig {
    /// Load configuration from `config.toml` and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. FINDMYMAP_ROUTING__PROVIDER=graphhopper
        builder = builder.add_source(
            Environment::with_prefix("FINDMYMAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: FindMyMapConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", config_file.display()))?;

        Ok(config)
    }

    /// Apply default values to zeroed or empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.optimizer.max_concurrent_estimates == 0 {
            self.optimizer.max_concurrent_estimates = default_max_concurrent_estimates();
        }
        if self.routing.base_url.is_empty() {
            self.routing.base_url = default_routing_base_url();
        }
        if self.routing.timeout_seconds == 0 {
            self.routing.timeout_seconds = default_routing_timeout();
        }
        if self.cache.ttl_hours == 0 {
            self.cache.ttl_hours = default_cache_ttl();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> crate::Result<()> {
        if let Some(api_key) = &self.routing.api_key {
            if api_key.trim().is_empty() {
                return Err(FindMyMapError::config(
                    "Routing API key cannot be empty if provided. Either remove it or provide a valid key.",
                ));
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if self.optimizer.max_concurrent_estimates == 0 {
            return Err(FindMyMapError::config(
                "Maximum concurrent estimates must be at least 1",
            ));
        }

        if self.optimizer.max_concurrent_estimates > 64 {
            return Err(FindMyMapError::config(
                "Maximum concurrent estimates cannot exceed 64",
            ));
        }

        if let Some(radius) = self.optimizer.search_radius_km {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(FindMyMapError::config(
                    "Search radius must be a positive number of kilometers",
                ));
            }
        }

        if self.routing.timeout_seconds > 300 {
            return Err(FindMyMapError::config(
                "Routing API timeout cannot exceed 300 seconds",
            ));
        }

        if self.routing.max_retries > 10 {
            return Err(FindMyMapError::config(
                "Routing API max retries cannot exceed 10",
            ));
        }

        if !(1.0..=3.0).contains(&self.routing.road_factor) {
            return Err(FindMyMapError::config(
                "Road factor must be between 1.0 and 3.0",
            ));
        }

        if !(self.routing.average_speed_kmh > 0.0 && self.routing.average_speed_kmh <= 200.0) {
            return Err(FindMyMapError::config(
                "Average speed must be within (0, 200] km/h",
            ));
        }

        if self.cache.ttl_hours > 24 * 30 {
            return Err(FindMyMapError::config(
                "Cache TTL cannot exceed 720 hours (30 days)",
            ));
        }

        self.costs.validate()?;

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(FindMyMapError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "compact", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(FindMyMapError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        if !self.routing.base_url.starts_with("http://")
            && !self.routing.base_url.starts_with("https://")
        {
            return Err(FindMyMapError::config(
                "Routing API base URL must be a valid HTTP or HTTPS URL",
            ));
        }

        Ok(())
    }
}
