pub mod logger;
pub mod time;

pub use logger::{cleanup_old_logs, init_logger, init_logger_with_file};
pub use time::parse_timestamp;
