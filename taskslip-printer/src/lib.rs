//! # taskslip-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Code page encoding with transliteration fallback
//! - Word wrapping measured in printed columns
//! - Print jobs as ordered directive lists
//! - Printer capability profiles
//! - USB printing (libusb bulk transfers)
//!
//! What goes on a card (the task layout) stays in the server crate.
//!
//! ## Example
//!
//! ```ignore
//! use taskslip_printer::{Directive, PrintJob, Printer, Profile, TextStyle, UsbPrinter};
//!
//! let profile = Profile::resolve(Some("TM-T20II"))?;
//!
//! let mut job = PrintJob::new();
//! job.push(Directive::Init)
//!     .push(Directive::Style(TextStyle::HEADLINE))
//!     .push(Directive::Line("Buy milk".into()))
//!     .push(Directive::Style(TextStyle::NORMAL))
//!     .push(Directive::Feed(3))
//!     .push(Directive::Cut);
//!
//! let printer = UsbPrinter::open(0x0416, 0x5011, 0, Duration::from_secs(5))?;
//! printer.print(&job.to_bytes(profile.code_page)).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod job;
mod memory;
mod printer;
mod profile;

// Re-exports
pub use encoding::{CodePage, transliterate};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use job::{Directive, PrintJob, TextSize, TextStyle};
pub use memory::MemoryPrinter;
pub use printer::{Printer, UsbPrinter};
pub use profile::Profile;
