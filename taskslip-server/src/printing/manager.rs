//! Printer connection manager
//!
//! Owns the one printer connection of the process. The connection is opened
//! once at startup and every print job afterwards goes through the same
//! handle. Jobs are serialized: the transport sits behind a FIFO mutex that
//! is held for the whole job, so two cards can never interleave on paper.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use taskslip_printer::{PrintError, PrintJob, PrintResult, Printer, Profile, UsbPrinter};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};

use super::types::ValidationError;

#[derive(Debug, Error)]
pub enum PrintingError {
    #[error("Printer configuration error: {0}")]
    Configuration(String),

    #[error("Printer unavailable: {0}")]
    HardwareUnavailable(String),

    #[error("Printer not initialized")]
    NotInitialized,

    #[error("Print failed: {0}")]
    Hardware(#[from] PrintError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type PrintingResult<T> = Result<T, PrintingError>;

/// USB identity and options of the printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterSettings {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: u8,
    pub profile: Option<String>,
    pub write_timeout: Duration,
}

impl PrinterSettings {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            interface: 0,
            profile: None,
            write_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// Lifecycle of the printer connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Uninitialized,
    Ready,
    Failed,
}

enum Slot {
    Uninitialized,
    Ready(PrinterHandle),
    Failed,
}

/// Holder of the process-wide printer handle
///
/// Constructed explicitly and shared through `Arc`, never reached through a
/// global.
pub struct PrinterManager {
    slot: RwLock<Slot>,
}

impl PrinterManager {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::Uninitialized),
        }
    }

    /// Open the USB printer described by `settings`
    pub fn initialize(&self, settings: &PrinterSettings) -> PrintingResult<PrinterHandle> {
        self.initialize_with(settings, |s| {
            let printer =
                UsbPrinter::open(s.vendor_id, s.product_id, s.interface, s.write_timeout)?;
            Ok(Box::new(printer) as Box<dyn Printer>)
        })
    }

    /// Initialize with a caller-supplied transport opener
    ///
    /// Calling this on a READY manager returns the existing handle without
    /// opening anything.
    pub fn initialize_with<F>(
        &self,
        settings: &PrinterSettings,
        open: F,
    ) -> PrintingResult<PrinterHandle>
    where
        F: FnOnce(&PrinterSettings) -> PrintResult<Box<dyn Printer>>,
    {
        let mut slot = self.slot.write();
        if let Slot::Ready(handle) = &*slot {
            return Ok(handle.clone());
        }

        let profile = Profile::resolve(settings.profile.as_deref()).map_err(|e| {
            let known: Vec<_> = Profile::names().collect();
            PrintingError::Configuration(format!("{} (known: {})", e, known.join(", ")))
        })?;

        match open(settings) {
            Ok(transport) => {
                let handle = PrinterHandle::new(settings, profile, transport);
                info!(
                    vendor_id = %format!("{:#06x}", settings.vendor_id),
                    product_id = %format!("{:#06x}", settings.product_id),
                    interface = settings.interface,
                    profile = profile.name,
                    columns = profile.columns,
                    "Printer ready"
                );
                *slot = Slot::Ready(handle.clone());
                Ok(handle)
            }
            Err(e) => {
                error!(error = %e, "Printer could not be opened");
                *slot = Slot::Failed;
                Err(PrintingError::HardwareUnavailable(e.to_string()))
            }
        }
    }

    /// The handle opened by [`initialize`](Self::initialize)
    ///
    /// Never opens the device itself.
    pub fn get_handle(&self) -> PrintingResult<PrinterHandle> {
        match &*self.slot.read() {
            Slot::Ready(handle) => Ok(handle.clone()),
            _ => Err(PrintingError::NotInitialized),
        }
    }

    /// Run a job on the managed handle
    pub async fn execute(&self, job: &PrintJob) -> PrintingResult<()> {
        let handle = self.get_handle()?;
        handle.execute(job).await
    }

    pub fn state(&self) -> ConnectionState {
        match &*self.slot.read() {
            Slot::Uninitialized => ConnectionState::Uninitialized,
            Slot::Ready(_) => ConnectionState::Ready,
            Slot::Failed => ConnectionState::Failed,
        }
    }
}

impl Default for PrinterManager {
    fn default() -> Self {
        Self::new()
    }
}

struct HandleInner {
    vendor_id: u16,
    product_id: u16,
    interface: u8,
    profile: &'static Profile,
    transport: Mutex<Box<dyn Printer>>,
    jobs: AtomicU64,
}

impl HandleInner {
    async fn run(&self, segments: Vec<Vec<u8>>) -> PrintingResult<()> {
        let bytes: usize = segments.iter().map(Vec::len).sum();

        let transport = self.transport.lock().await;
        let job_no = self.jobs.fetch_add(1, Ordering::Relaxed) + 1;

        for (index, segment) in segments.iter().enumerate() {
            if let Err(e) = transport.print(segment).await {
                error!(
                    target: "print_job",
                    job = job_no,
                    directive = index,
                    error = %e,
                    "Print job failed"
                );
                return Err(PrintingError::Hardware(e));
            }
        }

        info!(
            target: "print_job",
            job = job_no,
            directives = segments.len(),
            bytes,
            "Print job completed"
        );
        Ok(())
    }
}

/// Live connection to the printer
///
/// Cheap to clone; all clones share one transport and one job queue.
#[derive(Clone)]
pub struct PrinterHandle {
    inner: Arc<HandleInner>,
}

impl fmt::Debug for PrinterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrinterHandle")
            .field("vendor_id", &format_args!("{:#06x}", self.inner.vendor_id))
            .field("product_id", &format_args!("{:#06x}", self.inner.product_id))
            .field("interface", &self.inner.interface)
            .field("profile", &self.inner.profile.name)
            .finish()
    }
}

impl PrinterHandle {
    fn new(settings: &PrinterSettings, profile: &'static Profile, transport: Box<dyn Printer>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                vendor_id: settings.vendor_id,
                product_id: settings.product_id,
                interface: settings.interface,
                profile,
                transport: Mutex::new(transport),
                jobs: AtomicU64::new(0),
            }),
        }
    }

    pub fn vendor_id(&self) -> u16 {
        self.inner.vendor_id
    }

    pub fn product_id(&self) -> u16 {
        self.inner.product_id
    }

    pub fn interface(&self) -> u8 {
        self.inner.interface
    }

    pub fn profile(&self) -> &'static Profile {
        self.inner.profile
    }

    /// Send a job to the printer, finishing with a cut
    ///
    /// Waits for any job already printing. Directives are written in order;
    /// the first transport error aborts the job and is returned. Nothing is
    /// retried, and the next job starts from a clean slate.
    ///
    /// The job runs on its own task, so a started job keeps the printer
    /// until it finishes even if the caller is dropped.
    pub async fn execute(&self, job: &PrintJob) -> PrintingResult<()> {
        let segments = job.encode(self.inner.profile.code_page);
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move { inner.run(segments).await })
            .await
            .map_err(|e| {
                PrintingError::Hardware(PrintError::Connection(format!(
                    "print task aborted: {}",
                    e
                )))
            })?
    }

    /// True while a job holds the printer
    pub fn is_busy(&self) -> bool {
        self.inner.transport.try_lock().is_err()
    }

    /// Whether the device still answers; a printer busy with a job counts
    /// as online
    pub async fn is_online(&self) -> bool {
        match self.inner.transport.try_lock() {
            Ok(transport) => transport.is_online().await,
            Err(_) => true,
        }
    }
}
