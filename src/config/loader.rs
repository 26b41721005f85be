//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine settings
//! and seed datasets from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

use super::types::{DirectoryData, EngineConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/payroll/
/// ├── engine.yaml      # Engine settings
/// └── directory.yaml   # Seed dataset (optional, used by the server binary)
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll")?;
/// println!("Overtime divisor: {}", loader.config().standard_monthly_hours);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/payroll")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing
    /// - `engine.yaml` contains invalid YAML
    /// - `standard_monthly_hours` is not positive
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let engine_path = path.as_ref().join("engine.yaml");
        let config = load_yaml::<EngineConfig>(&engine_path)?;

        if config.standard_monthly_hours <= Decimal::ZERO {
            return Err(EngineError::ConfigParseError {
                path: engine_path.display().to_string(),
                message: "standard_monthly_hours must be positive".to_string(),
            });
        }

        Ok(Self { config })
    }

    /// Loads a seed dataset file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let data = ConfigLoader::load_directory("./config/payroll/directory.yaml")?;
    /// println!("{} employees", data.employees.len());
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn load_directory<P: AsRef<Path>>(path: P) -> EngineResult<DirectoryData> {
        load_yaml::<DirectoryData>(path.as_ref())
    }

    /// Returns the engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Loads and parses a YAML file.
fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}
