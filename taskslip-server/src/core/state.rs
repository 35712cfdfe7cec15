use std::sync::Arc;

use chrono_tz::Tz;

use super::{Config, Result};
use crate::printing::{
    PrinterHandle, PrinterManager, PrintingResult, TaskCardRenderer, TaskRecord,
};

/// Server state shared with every handler
///
/// Cheap to clone; the printer manager sits behind an `Arc`.
#[derive(Clone)]
pub struct ServerState {
    pub manager: Arc<PrinterManager>,
    pub renderer: TaskCardRenderer,
    /// Zone offset timestamps are converted into before printing
    pub display_timezone: Tz,
}

impl ServerState {
    /// Open the printer and build the state
    ///
    /// Fails when the printer is misconfigured or cannot be opened; the
    /// caller must not start serving in that case.
    pub fn initialize(config: &Config) -> Result<Self> {
        let manager = PrinterManager::new();
        manager.initialize(&config.printer)?;
        Ok(Self::with_manager(Arc::new(manager), config.display_timezone))
    }

    /// State around an already constructed manager
    ///
    /// The renderer follows the profile of the manager's printer, or the
    /// default profile while the manager has no printer.
    pub fn with_manager(manager: Arc<PrinterManager>, display_timezone: Tz) -> Self {
        let renderer = manager
            .get_handle()
            .map(|handle| TaskCardRenderer::for_profile(handle.profile()))
            .unwrap_or_default();

        Self {
            manager,
            renderer,
            display_timezone,
        }
    }

    pub fn printer(&self) -> PrintingResult<PrinterHandle> {
        self.manager.get_handle()
    }

    /// Render `task` and print it on the managed printer
    pub async fn print_task(&self, task: &TaskRecord) -> PrintingResult<()> {
        let handle = self.printer()?;
        self.renderer.render_and_print(task, &handle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printing::{PrinterSettings, PrintingError};
    use taskslip_printer::{MemoryPrinter, Printer};

    #[tokio::test]
    async fn test_print_without_printer() {
        let state = ServerState::with_manager(Arc::new(PrinterManager::new()), Tz::UTC);
        assert_eq!(state.renderer, TaskCardRenderer::default());

        let err = state.print_task(&TaskRecord::new("x")).await.unwrap_err();
        assert!(matches!(err, PrintingError::NotInitialized));
    }

    #[tokio::test]
    async fn test_renderer_follows_profile() {
        let printer = MemoryPrinter::new();
        let manager = PrinterManager::new();
        let settings = PrinterSettings::new(1, 2).with_profile("POS-5890");
        manager
            .initialize_with(&settings, move |_| Ok(Box::new(printer) as Box<dyn Printer>))
            .unwrap();

        let state = ServerState::with_manager(Arc::new(manager), Tz::UTC);
        assert_eq!(state.renderer.columns(), 32);
        state.print_task(&TaskRecord::new("Call mum")).await.unwrap();
    }
}
