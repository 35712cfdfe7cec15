//! Core module: configuration, state, startup errors
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - state shared with handlers
//! - [`Server`] - HTTP server
//! - [`StartupError`] - fatal startup errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::{Result, StartupError};
pub use server::Server;
pub use state::ServerState;
