//! Taskslip Server - kanban task cards on a thermal printer
//!
//! A small web service: a task typed into the form (or posted as JSON)
//! comes out of an ESC/POS receipt printer as a card for a physical
//! kanban board.
//!
//! # Module structure
//!
//! ```text
//! taskslip-server/src/
//! ├── core/          # config, state, startup errors, server
//! ├── printing/      # connection manager, card renderer, task types
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logger, timestamp parsing
//! ```
//!
//! # Startup
//!
//! The printer is opened before the listener is bound. When it cannot be
//! opened the process exits instead of serving a form that cannot print.

pub mod api;
pub mod core;
pub mod printing;
pub mod utils;

pub use crate::core::{Config, ConfigError, Server, ServerState, StartupError};
pub use printing::{
    PrinterHandle, PrinterManager, PrinterSettings, PrintingError, Priority, TaskCardRenderer,
    TaskRecord,
};

pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Load configuration, set up logging and open the printer
///
/// Reads an optional `.env` file first.
pub fn setup_environment() -> Result<(Config, ServerState), StartupError> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_logger_with_file(
        &config.log_level,
        config.log_json,
        config.log_dir.as_deref(),
    )?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Taskslip server starting"
    );

    let state = ServerState::initialize(&config)?;
    Ok((config, state))
}
