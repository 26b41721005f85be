//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load engine settings and seed
//! datasets from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/payroll").unwrap();
//! println!("Payslips go to: {}", loader.config().payslip_dir);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{ComponentProration, DirectoryData, EngineConfig};
