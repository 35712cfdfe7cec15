use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;

use crate::printing::PrinterSettings;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | PRINTER_VENDOR_ID | required | USB vendor id, hex (e.g. `0x0416`) |
/// | PRINTER_PRODUCT_ID | required | USB product id, hex (e.g. `0x5011`) |
/// | PRINTER_INTERFACE | 0 | USB interface number |
/// | PRINTER_PROFILE | - | printer profile name |
/// | PRINTER_TIMEOUT_MS | 5000 | USB write timeout (ms) |
/// | HTTP_HOST | 0.0.0.0 | bind address |
/// | HTTP_PORT | 8000 | HTTP port |
/// | DISPLAY_TIMEZONE | UTC | zone for dates sent with an offset |
/// | LOG_LEVEL | info | log filter when RUST_LOG is unset |
/// | LOG_JSON | false | JSON console logs |
/// | LOG_DIR | - | directory for rolling log files |
/// | ENVIRONMENT | development | environment label |
///
/// # Example
///
/// ```ignore
/// PRINTER_VENDOR_ID=0x0416 PRINTER_PRODUCT_ID=0x5011 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub printer: PrinterSettings,
    pub http_host: String,
    pub http_port: u16,
    /// Timestamps with an offset are converted into this zone before printing
    pub display_timezone: Tz,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let vendor_id = get("PRINTER_VENDOR_ID").ok_or(ConfigError::Missing("PRINTER_VENDOR_ID"))?;
        let product_id =
            get("PRINTER_PRODUCT_ID").ok_or(ConfigError::Missing("PRINTER_PRODUCT_ID"))?;

        let printer = PrinterSettings {
            vendor_id: parse_usb_id("PRINTER_VENDOR_ID", &vendor_id)?,
            product_id: parse_usb_id("PRINTER_PRODUCT_ID", &product_id)?,
            interface: parse_or("PRINTER_INTERFACE", get("PRINTER_INTERFACE"), 0)?,
            profile: get("PRINTER_PROFILE").map(|p| p.trim().to_string()),
            write_timeout: Duration::from_millis(parse_or(
                "PRINTER_TIMEOUT_MS",
                get("PRINTER_TIMEOUT_MS"),
                5000,
            )?),
        };

        let display_timezone = match get("DISPLAY_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|e| ConfigError::invalid("DISPLAY_TIMEZONE", &name, e.to_string()))?,
            None => Tz::UTC,
        };

        Ok(Self {
            printer,
            http_host: get("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            http_port: parse_or("HTTP_PORT", get("HTTP_PORT"), 8000)?,
            display_timezone,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parse_or("LOG_JSON", get("LOG_JSON"), false)?,
            log_dir: get("LOG_DIR"),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// Parse a USB id written in hex, with or without a `0x` prefix
pub fn parse_usb_id(name: &'static str, value: &str) -> Result<u16, ConfigError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    u16::from_str_radix(digits, 16)
        .map_err(|e| ConfigError::invalid(name, value, format!("expected hex id: {}", e)))
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(name, &v, e.to_string())),
    }
}
