//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::payroll::PayrollGenerator;

/// Shared application state.
///
/// Holds the payroll generator, which in turn owns the data source, the
/// payroll store and the payslip writer.
#[derive(Clone)]
pub struct AppState {
    generator: Arc<PayrollGenerator>,
}

impl AppState {
    /// Creates a new application state around a generator.
    pub fn new(generator: PayrollGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }

    /// Returns a shared handle to the generator for work moved off the
    /// async runtime.
    pub fn shared_generator(&self) -> Arc<PayrollGenerator> {
        Arc::clone(&self.generator)
    }
}
