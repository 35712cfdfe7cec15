//! In-memory printer
//!
//! Records every write instead of sending it anywhere. Clones share the same
//! recording, so a test can hand one clone to the code under test and
//! inspect the other.

use crate::error::{PrintError, PrintResult};
use crate::printer::Printer;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MemoryState {
    chunks: Vec<Vec<u8>>,
    offline: bool,
    fail_next: usize,
    fail_after: Option<usize>,
}

/// Printer that keeps written data in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryPrinter {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every successful write, one entry per `print` call
    pub fn chunks(&self) -> Vec<Vec<u8>> {
        self.state.lock().chunks.clone()
    }

    /// All written bytes concatenated
    pub fn bytes(&self) -> Vec<u8> {
        self.state.lock().chunks.concat()
    }

    pub fn clear(&self) {
        self.state.lock().chunks.clear();
    }

    /// Simulate a disconnected device: writes fail until set back online
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Fail the next `n` writes with an I/O error
    pub fn fail_next(&self, n: usize) {
        self.state.lock().fail_next = n;
    }

    /// Let `n` more writes through, then fail the one after them once
    ///
    /// Leaves a job half written, the way a cable pulled mid-card would.
    pub fn fail_after(&self, n: usize) {
        self.state.lock().fail_after = Some(n);
    }
}

fn simulated_failure() -> PrintError {
    PrintError::Io(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "simulated write failure",
    ))
}

#[async_trait]
impl Printer for MemoryPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        // let other tasks run between writes, like a real transfer would
        tokio::task::yield_now().await;

        let mut state = self.state.lock();
        if state.offline {
            return Err(PrintError::Offline("memory printer offline".into()));
        }
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(simulated_failure());
        }
        match state.fail_after {
            Some(0) => {
                state.fail_after = None;
                return Err(simulated_failure());
            }
            Some(n) => state.fail_after = Some(n - 1),
            None => {}
        }
        state.chunks.push(data.to_vec());
        Ok(())
    }

    async fn is_online(&self) -> bool {
        !self.state.lock().offline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_chunks() {
        let printer = MemoryPrinter::new();
        printer.print(b"ab").await.unwrap();
        printer.print(b"c").await.unwrap();

        assert_eq!(printer.chunks(), vec![b"ab".to_vec(), b"c".to_vec()]);
        assert_eq!(printer.bytes(), b"abc".to_vec());

        printer.clear();
        assert!(printer.chunks().is_empty());
    }

    #[tokio::test]
    async fn test_fail_next() {
        let printer = MemoryPrinter::new();
        printer.fail_next(1);

        assert!(matches!(printer.print(b"x").await, Err(PrintError::Io(_))));
        assert!(printer.print(b"y").await.is_ok());
        assert_eq!(printer.bytes(), b"y".to_vec());
    }

    #[tokio::test]
    async fn test_fail_after() {
        let printer = MemoryPrinter::new();
        printer.fail_after(2);

        assert!(printer.print(b"a").await.is_ok());
        assert!(printer.print(b"b").await.is_ok());
        assert!(matches!(printer.print(b"c").await, Err(PrintError::Io(_))));
        assert!(printer.print(b"d").await.is_ok());
        assert_eq!(printer.chunks(), vec![b"a".to_vec(), b"b".to_vec(), b"d".to_vec()]);
    }

    #[tokio::test]
    async fn test_offline() {
        let printer = MemoryPrinter::new();
        let shared = printer.clone();
        shared.set_offline(true);

        assert!(!printer.is_online().await);
        assert!(matches!(printer.print(b"x").await, Err(PrintError::Offline(_))));
    }
}
