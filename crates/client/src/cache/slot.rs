//! Cross-process change slot backed by a JSON file.
//!
//! Every client process on the machine points at the same file. A mutation
//! overwrites it with the latest [`ChangeNotification`]; processes watching
//! the file forward notifications written by *other* processes onto their
//! own in-process bus.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use tokio::sync::{mpsc as tokio_mpsc, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use finanzas_core::cache::{
    deserialize_notification, serialize_notification, CacheError, ChangeNotification,
    ChangePubSub, ChangeSlot, Result, SeenIds,
};

/// How many notification ids each side remembers.
const SEEN_CAPACITY: usize = 256;

/// Debounce window for file system events.
const WATCH_DEBOUNCE: Duration = Duration::from_millis(50);

fn slot_error(context: &str, err: impl std::fmt::Display) -> CacheError {
    CacheError::Slot(format!("{context}: {err}"))
}

/// A change slot stored as a single JSON file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
    /// Ids this process wrote, so the watcher can skip its own echoes.
    written: Arc<Mutex<SeenIds>>,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: Arc::new(Mutex::new(SeenIds::new(SEEN_CAPACITY))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the latest notification, or `None` if nothing was written yet.
    pub async fn read(&self) -> Result<Option<ChangeNotification>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => deserialize_notification(&text)
                .map(Some)
                .map_err(|e| CacheError::Serialization(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(slot_error("read failed", e)),
        }
    }

    /// Returns true if this process wrote the notification with `id`.
    pub async fn wrote(&self, id: &str) -> bool {
        self.written.lock().await.contains(id)
    }

    /// Starts forwarding notifications written by other processes to `pubsub`.
    ///
    /// Watching stops when the returned [`SlotWatcher`] is dropped.
    pub fn watch<P>(&self, pubsub: Arc<P>) -> Result<SlotWatcher>
    where
        P: ChangePubSub + 'static,
    {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir).map_err(|e| slot_error("create slot dir failed", e))?;
        let file_name = self.path.file_name().map(|name| name.to_os_string());

        // Set up file watcher with debouncing using tokio channel
        let (sync_tx, sync_rx) = std::sync::mpsc::channel::<
            std::result::Result<Vec<DebouncedEvent>, notify::Error>,
        >();
        let (async_tx, mut async_rx) = tokio_mpsc::channel::<()>(1);

        // Bridge sync notify events to async tokio channel
        std::thread::spawn(move || {
            while let Ok(result) = sync_rx.recv() {
                let Ok(events) = result else { continue };
                let touches_slot = events
                    .iter()
                    .any(|e| e.path.file_name() == file_name.as_deref());
                if touches_slot {
                    // A full channel already has a pending wake-up.
                    let _ = async_tx.try_send(());
                }
            }
        });

        let mut debouncer = new_debouncer(WATCH_DEBOUNCE, sync_tx)
            .map_err(|e| slot_error("watcher setup failed", e))?;
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| slot_error("watch failed", e))?;

        let slot = self.clone();
        let task = tokio::spawn(async move {
            let mut forwarded = SeenIds::new(SEEN_CAPACITY);
            while async_rx.recv().await.is_some() {
                let notification = match slot.read().await {
                    Ok(Some(notification)) => notification,
                    Ok(None) => continue,
                    Err(err) => {
                        tracing::warn!(
                            path = %slot.path.display(),
                            error = %err,
                            "Unreadable change slot"
                        );
                        continue;
                    }
                };
                if slot.wrote(&notification.id).await || !forwarded.first_sighting(&notification.id)
                {
                    continue;
                }
                tracing::debug!(
                    resource = %notification.resource,
                    id = %notification.id,
                    delayed = notification.is_delayed(),
                    "Change written by another process"
                );
                if let Err(err) = pubsub.publish(&notification).await {
                    tracing::warn!(error = %err, "Failed to forward slot notification");
                }
            }
        });

        tracing::debug!(path = %self.path.display(), "Watching change slot");
        Ok(SlotWatcher {
            _debouncer: debouncer,
            task,
        })
    }
}

#[async_trait]
impl ChangeSlot for FileSlot {
    async fn write(&self, notification: &ChangeNotification) -> Result<()> {
        let text = serialize_notification(notification)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        // Record before the rename so the watcher never sees an unknown own id.
        self.written.lock().await.first_sighting(&notification.id);

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| slot_error("create slot dir failed", e))?;
        }

        // Write to a sibling temp file, then rename over the slot.
        let tmp = self.path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, text)
            .await
            .map_err(|e| slot_error("write failed", e))?;
        if let Err(err) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(slot_error("rename failed", err));
        }
        Ok(())
    }
}

/// Handle keeping a slot watch alive.
pub struct SlotWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    task: JoinHandle<()>,
}

impl Drop for SlotWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryPubSub;
    use chrono::Utc;
    use finanzas_core::cache::{ResourceType, CHANGE_SLOT_FILE};

    const WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_read_empty_slot() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join(CHANGE_SLOT_FILE));
        assert_eq!(slot.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("nested").join(CHANGE_SLOT_FILE));

        let notification = ChangeNotification::delayed(ResourceType::SavingsGoal, Utc::now());
        slot.write(&notification).await.unwrap();

        assert_eq!(slot.read().await.unwrap(), Some(notification.clone()));
        assert!(slot.wrote(&notification.id).await);

        let raw = std::fs::read_to_string(slot.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["type"], "savings_goal");
        assert_eq!(json["delayed"], true);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_latest_and_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join(CHANGE_SLOT_FILE));

        slot.write(&ChangeNotification::new(ResourceType::Expense, Utc::now()))
            .await
            .unwrap();
        let latest = ChangeNotification::new(ResourceType::Income, Utc::now());
        slot.write(&latest).await.unwrap();

        assert_eq!(slot.read().await.unwrap(), Some(latest));
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[tokio::test]
    async fn test_corrupt_slot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CHANGE_SLOT_FILE);
        std::fs::write(&path, "{not json").unwrap();
        let slot = FileSlot::new(path);
        assert!(matches!(
            slot.read().await,
            Err(CacheError::Serialization(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_watch_forwards_only_foreign_notifications() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CHANGE_SLOT_FILE);

        // Two handles on the same file stand in for two processes.
        let ours = FileSlot::new(&path);
        let theirs = FileSlot::new(&path);

        let pubsub = Arc::new(MemoryPubSub::new());
        let mut receiver = pubsub.subscribe().await.unwrap();
        let _watcher = ours.watch(pubsub.clone()).unwrap();

        ours.write(&ChangeNotification::new(ResourceType::Budget, Utc::now()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;

        let foreign = ChangeNotification::new(ResourceType::Category, Utc::now());
        theirs.write(&foreign).await.unwrap();

        let received = tokio::time::timeout(WAIT, receiver.recv())
            .await
            .expect("notification should arrive")
            .unwrap();
        assert_eq!(received, foreign);
    }
}
