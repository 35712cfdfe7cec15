//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Connection to the device failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Printer is offline or unreachable
    #[error("Printer offline: {0}")]
    Offline(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Profile name not present in the profile table
    #[error("Unknown printer profile: {0}")]
    UnknownProfile(String),

    /// No USB device with the given ids is attached
    #[error("USB device {vendor_id:#06x}:{product_id:#06x} not found")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    /// The claimed interface has no bulk OUT endpoint
    #[error("No bulk OUT endpoint on interface {0}")]
    NoEndpoint(u8),

    /// libusb error
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
