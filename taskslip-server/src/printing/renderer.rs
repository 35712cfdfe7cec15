//! Task card renderer
//!
//! Renders a TaskRecord into a print job for thermal printers.

use chrono::NaiveDateTime;
use taskslip_printer::{CodePage, Directive, PrintJob, Profile, TextStyle};

use super::manager::{PrinterHandle, PrintingResult};
use super::types::TaskRecord;

/// Blank lines fed before the cut so the last line clears the blade
pub const CUT_FEED_LINES: u8 = 3;

/// Timestamp layout on the card
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Task card renderer
///
/// The layout is fixed: headline title, optional created/due lines, the
/// priority, optional notes, then feed and cut. Output depends only on the
/// record and the printer's column count and code page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCardRenderer {
    columns: usize,
    code_page: CodePage,
}

impl TaskCardRenderer {
    /// Create a renderer for a line width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 42 or 48 characters
    pub fn new(columns: usize, code_page: CodePage) -> Self {
        Self { columns, code_page }
    }

    pub fn for_profile(profile: &Profile) -> Self {
        Self::new(profile.columns, profile.code_page)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Render a task into a print job
    ///
    /// A task with a blank title is rejected before any directive exists.
    pub fn render(&self, task: &TaskRecord) -> PrintingResult<PrintJob> {
        task.validate()?;

        let mut job = PrintJob::new();
        job.push(Directive::Init);

        self.render_title(&mut job, task);
        self.render_details(&mut job, task);
        self.render_notes(&mut job, task);

        job.push(Directive::Feed(CUT_FEED_LINES));
        job.push(Directive::Cut);

        Ok(job)
    }

    /// Render a task and print it on `handle`
    pub async fn render_and_print(
        &self,
        task: &TaskRecord,
        handle: &PrinterHandle,
    ) -> PrintingResult<()> {
        let job = self.render(task)?;
        handle.execute(&job).await
    }

    /// Title in headline style; double width halves the usable line
    ///
    /// Empty title lines are dropped so the headline stays one block.
    fn render_title(&self, job: &mut PrintJob, task: &TaskRecord) {
        job.push(Directive::Style(TextStyle::HEADLINE));
        let width = (self.columns / 2).max(1);
        for line in self.code_page.wrap(task.title.trim(), width) {
            if !line.is_empty() {
                job.push(Directive::Line(line));
            }
        }
        job.push(Directive::Style(TextStyle::NORMAL));
    }

    fn render_details(&self, job: &mut PrintJob, task: &TaskRecord) {
        if let Some(created_at) = task.created_at {
            job.push(Directive::Line(format!(
                "Created: {}",
                format_timestamp(created_at)
            )));
        }

        if let Some(due_at) = task.due_at {
            job.push(Directive::Line(format!("Due: {}", format_timestamp(due_at))));
        }

        job.push(Directive::Line(format!(
            "Priority: {}",
            task.resolved_priority()
        )));
    }

    fn render_notes(&self, job: &mut PrintJob, task: &TaskRecord) {
        if task.notes.trim().is_empty() {
            return;
        }

        job.push(Directive::BlankLine);
        for line in self.code_page.wrap(task.notes.trim(), self.columns) {
            if line.is_empty() {
                job.push(Directive::BlankLine);
            } else {
                job.push(Directive::Line(line));
            }
        }
    }
}

impl Default for TaskCardRenderer {
    fn default() -> Self {
        Self::for_profile(&Profile::default())
    }
}

/// Format a wall-clock timestamp as YYYY-MM-DD HH:MM
fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
