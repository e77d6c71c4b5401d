//! Remote task log handler

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, warn};

use cascade_core::domain::log::LogReadMetadata;
use cascade_core::domain::task::TaskRun;

use crate::handler::LocalTaskLogHandler;
use crate::store::BlobStore;

/// Task log handler that uploads to and reads from a remote backend
///
/// Writes go to local disk first; on close the complete file is uploaded
/// in one write. Reads prefer the remote copy and fall back to local disk
/// with a diagnostic banner on failure.
pub struct RemoteTaskLogHandler {
    local: LocalTaskLogHandler,
    store: Arc<dyn BlobStore>,
    remote_base: String,
    log_labels: HashMap<String, String>,
    upload_on_close: bool,
    delete_local_copy: bool,
    closed: bool,
}

impl RemoteTaskLogHandler {
    /// Creates a handler backed by `store`
    ///
    /// # Arguments
    /// * `base_log_folder` - Local directory all task logs live under
    /// * `remote_base` - Remote folder URI (e.g. `s3://bucket/logs`)
    /// * `filename_template` - Shared relative-path template
    /// * `store` - Blob-store capability for the configured backend
    pub fn new(
        base_log_folder: impl Into<PathBuf>,
        remote_base: impl Into<String>,
        filename_template: impl Into<String>,
        store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            local: LocalTaskLogHandler::new(base_log_folder, filename_template),
            store,
            remote_base: remote_base.into(),
            log_labels: HashMap::new(),
            upload_on_close: true,
            delete_local_copy: false,
            closed: false,
        }
    }

    /// Removes the local copy after a successful upload
    pub fn with_delete_local_copy(mut self, delete_local_copy: bool) -> Self {
        self.delete_local_copy = delete_local_copy;
        self
    }

    /// Whether this handler has completed its close transition
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Binds this handler to a task run
    ///
    /// Computes the relative log path, opens the local sink and records
    /// the identity labels attached to the upload. Raw (internal) runs
    /// are never uploaded.
    pub fn set_context(&mut self, task_run: &TaskRun) -> io::Result<()> {
        self.local.set_context(task_run)?;
        self.log_labels = task_run.log_labels();
        self.upload_on_close = !task_run.raw;
        Ok(())
    }

    /// Appends one log line to the local file
    pub fn append(&mut self, line: &str) -> io::Result<()> {
        self.local.append(line)
    }

    /// Closes the local sink and uploads the log to the remote backend
    ///
    /// Idempotent: a second call returns immediately. The handler always
    /// reports itself closed once the local close has completed; a failed
    /// upload is logged and swallowed, since close commonly runs during
    /// process shutdown.
    pub async fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }

        self.local.close()?;

        if self.upload_on_close {
            self.upload_local_log().await;
        }

        // Mark closed so we don't double write if close is called twice
        self.closed = true;
        Ok(())
    }

    async fn upload_local_log(&self) {
        let Some(relative_path) = self.local.relative_path().map(str::to_string) else {
            return;
        };

        let local_loc = self.local.base_log_folder().join(&relative_path);
        if !local_loc.exists() {
            return;
        }

        let log = match fs::read(&local_loc) {
            Ok(log) => log,
            Err(err) => {
                error!("Failed to read local log file {}: {}", local_loc.display(), err);
                return;
            }
        };

        let remote_loc = join_remote(&self.remote_base, &relative_path);
        match self.store.write_blob(&remote_loc, &log, &self.log_labels).await {
            Ok(()) => {
                if self.delete_local_copy {
                    if let Err(err) = fs::remove_file(&local_loc) {
                        warn!(
                            "Failed to delete local log file {}: {}",
                            local_loc.display(),
                            err
                        );
                    }
                }
            }
            Err(err) => {
                error!("Failed to upload log to {}: {}", remote_loc, err);
            }
        }
    }

    /// Reads the log for the given task run and attempt
    ///
    /// The relative path is recomputed from the given run, which may
    /// differ from the run this instance was bound to; reads can be
    /// served by a different instance than the one that wrote. The remote
    /// copy is tried first; on a backend failure the returned text carries
    /// a banner describing the failure followed by the local log, with
    /// the local read's metadata unchanged.
    pub async fn read(&self, task_run: &TaskRun, try_number: u32) -> (String, LogReadMetadata) {
        let relative_path = self.local.render_filename(task_run, try_number);
        let remote_loc = join_remote(&self.remote_base, &relative_path);

        match self.store.read_blob(&remote_loc).await {
            Ok(remote_log) => (
                format!(
                    "*** Reading remote log from {}.\n{}\n",
                    remote_loc,
                    String::from_utf8_lossy(&remote_log)
                ),
                LogReadMetadata { end_of_log: true },
            ),
            Err(err) => {
                let banner =
                    format!("*** Unable to read remote log from {}\n*** {}\n\n", remote_loc, err);
                error!("{}", banner.trim_end());

                let (local_log, metadata) = self.local.read(task_run, try_number);
                (format!("{}{}", banner, local_log), metadata)
            }
        }
    }
}

fn join_remote(remote_base: &str, relative_path: &str) -> String {
    format!("{}/{}", remote_base.trim_end_matches('/'), relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::InMemoryBlobStore;
    use async_trait::async_trait;
    use chrono::TimeZone;

    const FILENAME_TEMPLATE: &str = "{workflow_id}/{task_id}/{execution_date}/{try_number}.log";
    const REMOTE_BASE: &str = "s3://bucket/logs";

    fn task_run() -> TaskRun {
        let execution_date = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        TaskRun::new("etl", "extract", execution_date, 1)
    }

    fn remote_loc(run: &TaskRun, try_number: u32) -> String {
        format!(
            "{}/{}/{}/{}/{}.log",
            REMOTE_BASE,
            run.workflow_id,
            run.task_id,
            run.execution_date.to_rfc3339(),
            try_number
        )
    }

    struct FailingBlobStore;

    #[async_trait]
    impl BlobStore for FailingBlobStore {
        async fn write_blob(
            &self,
            _remote_path: &str,
            _data: &[u8],
            _tags: &HashMap<String, String>,
        ) -> Result<(), StoreError> {
            Err(StoreError::Backend("connection refused".to_string()))
        }

        async fn read_blob(&self, remote_path: &str) -> Result<Vec<u8>, StoreError> {
            Err(StoreError::NotFound(remote_path.to_string()))
        }
    }

    #[tokio::test]
    async fn test_close_uploads_log_with_labels() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryBlobStore::new();
        let mut handler = RemoteTaskLogHandler::new(
            dir.path(),
            REMOTE_BASE,
            FILENAME_TEMPLATE,
            Arc::new(store.clone()),
        );
        let run = task_run();

        handler.set_context(&run).unwrap();
        handler.append("starting task").unwrap();
        handler.close().await.unwrap();

        let loc = remote_loc(&run, 1);
        assert_eq!(store.blob(&loc), Some(b"starting task\n".to_vec()));

        let tags = store.tags(&loc).unwrap();
        assert_eq!(tags.get("workflow_id"), Some(&"etl".to_string()));
        assert_eq!(tags.get("task_id"), Some(&"extract".to_string()));
        assert_eq!(tags.get("try_number"), Some(&"1".to_string()));
        assert!(handler.is_closed());
    }

    #[tokio::test]
    async fn test_close_twice_uploads_at_most_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryBlobStore::new();
        let mut handler = RemoteTaskLogHandler::new(
            dir.path(),
            REMOTE_BASE,
            FILENAME_TEMPLATE,
            Arc::new(store.clone()),
        );

        handler.set_context(&task_run()).unwrap();
        handler.append("line").unwrap();
        handler.close().await.unwrap();
        handler.close().await.unwrap();

        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_raw_run_is_never_uploaded() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryBlobStore::new();
        let mut handler = RemoteTaskLogHandler::new(
            dir.path(),
            REMOTE_BASE,
            FILENAME_TEMPLATE,
            Arc::new(store.clone()),
        );

        handler.set_context(&task_run().as_raw()).unwrap();
        handler.append("internal output").unwrap();
        handler.close().await.unwrap();

        assert_eq!(store.write_count(), 0);
        assert!(handler.is_closed());
    }

    #[tokio::test]
    async fn test_missing_local_file_skips_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryBlobStore::new();
        let mut handler = RemoteTaskLogHandler::new(
            dir.path(),
            REMOTE_BASE,
            FILENAME_TEMPLATE,
            Arc::new(store.clone()),
        );
        let run = task_run();

        handler.set_context(&run).unwrap();
        handler.local.close().unwrap();
        fs::remove_file(
            dir.path()
                .join(handler.local.render_filename(&run, run.try_number)),
        )
        .unwrap();

        handler.close().await.unwrap();
        assert_eq!(store.write_count(), 0);
        assert!(handler.is_closed());
    }

    #[tokio::test]
    async fn test_failed_upload_still_closes() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = RemoteTaskLogHandler::new(
            dir.path(),
            REMOTE_BASE,
            FILENAME_TEMPLATE,
            Arc::new(FailingBlobStore),
        );

        handler.set_context(&task_run()).unwrap();
        handler.append("line").unwrap();
        handler.close().await.unwrap();

        assert!(handler.is_closed());
    }

    #[tokio::test]
    async fn test_delete_local_copy_after_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryBlobStore::new();
        let mut handler = RemoteTaskLogHandler::new(
            dir.path(),
            REMOTE_BASE,
            FILENAME_TEMPLATE,
            Arc::new(store.clone()),
        )
        .with_delete_local_copy(true);
        let run = task_run();

        handler.set_context(&run).unwrap();
        handler.append("line").unwrap();
        handler.close().await.unwrap();

        assert_eq!(store.write_count(), 1);
        assert!(!dir
            .path()
            .join(handler.local.render_filename(&run, run.try_number))
            .exists());
    }

    #[tokio::test]
    async fn test_read_prefers_remote_copy() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryBlobStore::new();
        let run = task_run();
        let loc = remote_loc(&run, 1);
        store
            .write_blob(&loc, b"remote content", &HashMap::new())
            .await
            .unwrap();

        let handler = RemoteTaskLogHandler::new(
            dir.path(),
            REMOTE_BASE,
            FILENAME_TEMPLATE,
            Arc::new(store),
        );

        let (log, metadata) = handler.read(&run, 1).await;
        assert_eq!(
            log,
            format!("*** Reading remote log from {}.\nremote content\n", loc)
        );
        assert!(metadata.end_of_log);
    }

    #[tokio::test]
    async fn test_read_falls_back_to_local_on_backend_failure() {
        let dir = tempfile::tempdir().unwrap();
        let run = task_run();

        let mut handler = RemoteTaskLogHandler::new(
            dir.path(),
            REMOTE_BASE,
            FILENAME_TEMPLATE,
            Arc::new(FailingBlobStore),
        );
        handler.set_context(&run).unwrap();
        handler.append("local content").unwrap();
        handler.local.close().unwrap();

        let (log, metadata) = handler.read(&run, 1).await;
        let loc = remote_loc(&run, 1);
        assert!(log.starts_with(&format!(
            "*** Unable to read remote log from {}\n*** blob not found: {}\n\n",
            loc, loc
        )));
        assert!(log.ends_with("local content\n"));

        let local_handler = LocalTaskLogHandler::new(dir.path(), FILENAME_TEMPLATE);
        let (_, local_metadata) = local_handler.read(&run, 1);
        assert_eq!(metadata, local_metadata);
    }

    #[tokio::test]
    async fn test_read_can_serve_a_different_run_than_bound() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryBlobStore::new();
        let bound_run = task_run();
        let other_run = TaskRun::new(
            "etl",
            "load",
            chrono::Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap(),
            2,
        );
        let loc = remote_loc(&other_run, 2);
        store
            .write_blob(&loc, b"other attempt", &HashMap::new())
            .await
            .unwrap();

        let mut handler = RemoteTaskLogHandler::new(
            dir.path(),
            REMOTE_BASE,
            FILENAME_TEMPLATE,
            Arc::new(store),
        );
        handler.set_context(&bound_run).unwrap();

        let (log, _) = handler.read(&other_run, 2).await;
        assert!(log.contains("other attempt"));
    }
}
