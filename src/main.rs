//! Payroll engine HTTP server.
//!
//! Reads `engine.yaml` and the seed dataset `directory.yaml` from the
//! directory named by `PAYROLL_CONFIG_DIR` (default `./config/payroll`).

use std::path::PathBuf;
use std::sync::Arc;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::payroll::{
    FsPayslipWriter, InMemoryDirectory, InMemoryPayrollStore, PayrollGenerator,
};
use tracing::info;

const DEFAULT_CONFIG_DIR: &str = "./config/payroll";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let config_dir = PathBuf::from(
        std::env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string()),
    );
    let loader = ConfigLoader::load(&config_dir)?;
    let directory = ConfigLoader::load_directory(config_dir.join("directory.yaml"))?;
    let config = loader.config().clone();

    info!(
        config_dir = %config_dir.display(),
        employees = directory.employees.len(),
        payslip_dir = %config.payslip_dir,
        "Configuration loaded"
    );

    let generator = PayrollGenerator::new(
        config.clone(),
        Arc::new(InMemoryDirectory::new(directory)),
        Arc::new(InMemoryPayrollStore::new()),
        Arc::new(FsPayslipWriter::new(&config.payslip_dir)),
    );
    let router = create_router(AppState::new(generator));

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Payroll engine listening");
    axum::serve(listener, router).await?;

    Ok(())
}
