//! Background disk actor for the image cache.
//!
//! One actor task per cache instance owns every disk operation, processing
//! jobs serially in submission order. That ordering is what makes the cache
//! contract hold without file locking: a read enqueued after a clear can
//! never observe pre-clear files, and writes for distinct URLs land in
//! distinct files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use tokio::sync::{mpsc, oneshot};

enum DiskJob {
    Save {
        path: PathBuf,
        data: Arc<Vec<u8>>,
    },
    Read {
        path: PathBuf,
        reply: oneshot::Sender<Option<Vec<u8>>>,
    },
    Remove {
        path: PathBuf,
    },
    Clear,
}

/// Handle for sending jobs to the disk actor.
#[derive(Clone)]
pub(crate) struct DiskStore {
    dir: PathBuf,
    tx: mpsc::UnboundedSender<DiskJob>,
}

impl DiskStore {
    /// Spawn the actor that owns all disk I/O for one cache instance.
    ///
    /// Must be called within a Tokio runtime. The cache directory is created
    /// on startup; failures are logged and swallowed, like every other disk
    /// failure here.
    pub(crate) fn spawn(dir: PathBuf) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let actor_dir = dir.clone();

        tokio::spawn(async move {
            ensure_dir(&actor_dir).await;

            while let Some(job) = rx.recv().await {
                match job {
                    DiskJob::Save { path, data } => {
                        if let Err(err) = tokio::fs::write(&path, data.as_ref()).await {
                            debug!("image cache write failed for {}: {}", path.display(), err);
                        }
                    }
                    DiskJob::Read { path, reply } => {
                        let _ = reply.send(tokio::fs::read(&path).await.ok());
                    }
                    DiskJob::Remove { path } => {
                        let _ = tokio::fs::remove_file(&path).await;
                    }
                    DiskJob::Clear => {
                        let _ = tokio::fs::remove_dir_all(&actor_dir).await;
                        ensure_dir(&actor_dir).await;
                    }
                }
            }
        });

        Self { dir, tx }
    }

    /// Absolute path of the file backing `url`.
    pub(crate) fn file_path(&self, url: &str) -> PathBuf {
        self.dir.join(cache_file_name(url))
    }

    /// Enqueue a best-effort write.
    pub(crate) fn save(&self, path: PathBuf, data: Arc<Vec<u8>>) {
        let _ = self.tx.send(DiskJob::Save { path, data });
    }

    /// Read a file through the actor, awaiting the reply.
    pub(crate) async fn read(&self, path: PathBuf) -> Option<Vec<u8>> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(DiskJob::Read { path, reply }).ok()?;
        rx.await.ok().flatten()
    }

    /// Enqueue deletion of a single file.
    pub(crate) fn remove(&self, path: PathBuf) {
        let _ = self.tx.send(DiskJob::Remove { path });
    }

    /// Enqueue delete-and-recreate of the whole cache directory.
    pub(crate) fn clear(&self) {
        let _ = self.tx.send(DiskJob::Clear);
    }
}

async fn ensure_dir(dir: &Path) {
    if let Err(err) = tokio::fs::create_dir_all(dir).await {
        debug!(
            "failed to create image cache directory {}: {}",
            dir.display(),
            err
        );
    }
}

/// Sanitized file name for a cached URL: percent-encode everything outside
/// the unreserved set, then replace the escape character so the result is a
/// single flat path component.
pub(crate) fn cache_file_name(url: &str) -> String {
    format!("{}.jpg", urlencoding::encode(url).replace('%', "_"))
}
