//! Local-disk task log handler

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use cascade_core::domain::log::LogReadMetadata;
use cascade_core::domain::task::TaskRun;

/// Per-task-run log sink writing to local disk
///
/// The relative log path is rendered from the filename template and the
/// task-run identity, so a reader can reconstruct the same path from
/// either the local or the remote side.
pub struct LocalTaskLogHandler {
    base_log_folder: PathBuf,
    filename_template: String,
    file: Option<BufWriter<File>>,
    relative_path: Option<String>,
}

impl LocalTaskLogHandler {
    /// Creates a handler rooted at `base_log_folder`
    ///
    /// # Arguments
    /// * `base_log_folder` - Local directory all task logs live under
    /// * `filename_template` - Template with `{workflow_id}`, `{task_id}`,
    ///   `{execution_date}` and `{try_number}` placeholders
    pub fn new(base_log_folder: impl Into<PathBuf>, filename_template: impl Into<String>) -> Self {
        Self {
            base_log_folder: base_log_folder.into(),
            filename_template: filename_template.into(),
            file: None,
            relative_path: None,
        }
    }

    /// Local directory all task logs live under
    pub fn base_log_folder(&self) -> &Path {
        &self.base_log_folder
    }

    /// Relative path this handler is currently bound to, if any
    pub fn relative_path(&self) -> Option<&str> {
        self.relative_path.as_deref()
    }

    /// Renders the relative log path for a task run and attempt
    ///
    /// Deterministic: the same identity always yields the same path.
    pub fn render_filename(&self, task_run: &TaskRun, try_number: u32) -> String {
        self.filename_template
            .replace("{workflow_id}", &task_run.workflow_id)
            .replace("{task_id}", &task_run.task_id)
            .replace("{execution_date}", &task_run.execution_date.to_rfc3339())
            .replace("{try_number}", &try_number.to_string())
    }

    /// Binds this handler to a task run and opens its local log file
    ///
    /// Creates parent directories as needed; appends if the file already
    /// exists (a retried attempt reuses its path).
    pub fn set_context(&mut self, task_run: &TaskRun) -> io::Result<()> {
        let relative_path = self.render_filename(task_run, task_run.try_number);
        let local_loc = self.base_log_folder.join(&relative_path);

        if let Some(parent) = local_loc.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&local_loc)?;
        self.file = Some(BufWriter::new(file));
        self.relative_path = Some(relative_path);
        Ok(())
    }

    /// Appends one log line to the local file
    pub fn append(&mut self, line: &str) -> io::Result<()> {
        let file = self.file.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "handler is not bound to a task run")
        })?;
        writeln!(file, "{}", line)
    }

    /// Flushes buffered output to disk
    pub fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    /// Flushes and closes the local file sink
    ///
    /// Safe to call when unbound; the handler can be re-bound afterwards.
    pub fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }

    /// Reads the log for the given task run and attempt from local disk
    ///
    /// Never fails: a missing or unreadable file is reported in the
    /// returned text so the reader sees what happened.
    pub fn read(&self, task_run: &TaskRun, try_number: u32) -> (String, LogReadMetadata) {
        let relative_path = self.render_filename(task_run, try_number);
        let local_loc = self.base_log_folder.join(&relative_path);

        if !local_loc.exists() {
            return (
                format!("*** Log file does not exist: {}\n", local_loc.display()),
                LogReadMetadata { end_of_log: true },
            );
        }

        match fs::read_to_string(&local_loc) {
            Ok(log) => (log, LogReadMetadata { end_of_log: true }),
            Err(err) => (
                format!(
                    "*** Failed to load local log file: {}\n*** {}\n",
                    local_loc.display(),
                    err
                ),
                LogReadMetadata { end_of_log: true },
            ),
        }
    }
}
