//! Task card printing
//!
//! - Connection manager: owns the one printer handle and serializes jobs
//! - Renderer: turns a task into the fixed card layout

pub mod manager;
pub mod renderer;
pub mod types;

pub use manager::{
    ConnectionState, PrinterHandle, PrinterManager, PrinterSettings, PrintingError,
    PrintingResult,
};
pub use renderer::{CUT_FEED_LINES, TaskCardRenderer};
pub use types::{Priority, TaskRecord, ValidationError};
