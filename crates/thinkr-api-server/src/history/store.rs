use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{error, warn};

use super::entry::HistoryEntry;

/// File-backed rolling conversation log, shared by every client of the
/// process. A single mutex serializes the whole read-modify-write cycle so
/// concurrent appends cannot clobber each other.
///
/// Storage failures never surface to callers: a missing or corrupt file
/// reads as empty history, and a failed write is logged and dropped.
pub struct FileHistoryStore {
    path: PathBuf,
    max_entries: usize,
    lock: Mutex<()>,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries,
            lock: Mutex::new(()),
        }
    }

    /// Append one entry, evicting the oldest entries beyond the cap.
    pub async fn append(&self, entry: HistoryEntry) {
        let _guard = self.lock.lock().await;

        let mut log = self.load().await;
        log.push(entry);

        if log.len() > self.max_entries {
            let excess = log.len() - self.max_entries;
            log.drain(..excess);
        }

        match serde_json::to_vec_pretty(&log) {
            Ok(bytes) => {
                if let Err(e) = tokio::fs::write(&self.path, bytes).await {
                    error!("History write error at {}: {}", self.path.display(), e);
                }
            }
            Err(e) => error!("History serialize error: {}", e),
        }
    }

    /// All stored entries, oldest first. Empty if no store exists yet.
    pub async fn read_all(&self) -> Vec<HistoryEntry> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Drop the whole log. Clearing an empty store is a no-op.
    pub async fn clear(&self) {
        let _guard = self.lock.lock().await;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => error!("History delete error at {}: {}", self.path.display(), e),
        }
    }

    async fn load(&self) -> Vec<HistoryEntry> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(
                    "History read error at {}, treating as empty: {}",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(log) => log,
            Err(e) => {
                warn!("History read error, treating as empty: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{EntryBody, Sender};

    fn temp_store(max_entries: usize) -> FileHistoryStore {
        let path = std::env::temp_dir().join(format!("history-{}.json", uuid::Uuid::new_v4()));
        FileHistoryStore::new(path, max_entries)
    }

    fn text_of(entry: &HistoryEntry) -> &str {
        match &entry.text {
            EntryBody::Text(text) => text,
            EntryBody::Image { .. } => panic!("expected text entry"),
        }
    }

    #[tokio::test]
    async fn test_append_preserves_chronological_order() {
        let store = temp_store(50);

        store.append(HistoryEntry::text(Sender::User, "first")).await;
        store.append(HistoryEntry::text(Sender::Assistant, "second")).await;
        store.append(HistoryEntry::text(Sender::User, "third")).await;

        let log = store.read_all().await;
        assert_eq!(log.len(), 3);
        assert_eq!(text_of(&log[0]), "first");
        assert_eq!(text_of(&log[1]), "second");
        assert_eq!(text_of(&log[2]), "third");

        store.clear().await;
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest_first() {
        let store = temp_store(50);

        for i in 0..60 {
            store
                .append(HistoryEntry::text(Sender::User, format!("message {}", i)))
                .await;
        }

        let log = store.read_all().await;
        assert_eq!(log.len(), 50);
        assert_eq!(text_of(&log[0]), "message 10");
        assert_eq!(text_of(&log[49]), "message 59");

        store.clear().await;
    }

    #[tokio::test]
    async fn test_read_missing_store_is_empty() {
        let store = temp_store(50);
        assert!(store.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = temp_store(50);

        store.append(HistoryEntry::text(Sender::User, "hello")).await;
        store.clear().await;
        assert!(store.read_all().await.is_empty());

        // Clearing the already-empty store must succeed too.
        store.clear().await;
        assert!(store.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_store_degrades_to_empty() {
        let store = temp_store(50);
        tokio::fs::write(&store.path, b"not json {{{")
            .await
            .expect("write corrupt file");

        assert!(store.read_all().await.is_empty());

        // Appending on top of the corrupt file starts a fresh log.
        store.append(HistoryEntry::text(Sender::User, "fresh")).await;
        let log = store.read_all().await;
        assert_eq!(log.len(), 1);
        assert_eq!(text_of(&log[0]), "fresh");

        store.clear().await;
    }

    #[tokio::test]
    async fn test_unreadable_store_degrades_to_empty() {
        // A directory at the store path makes every read fail with a
        // non-NotFound error; the store must still report empty history.
        let dir = std::env::temp_dir().join(format!("history-dir-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir(&dir).await.expect("create dir");

        let store = FileHistoryStore::new(&dir, 50);
        assert!(store.read_all().await.is_empty());

        // Appends hit the same failure; they are swallowed, not propagated.
        store.append(HistoryEntry::text(Sender::User, "hello")).await;
        assert!(store.read_all().await.is_empty());

        tokio::fs::remove_dir(&dir).await.expect("remove dir");
    }

    #[tokio::test]
    async fn test_image_entries_round_trip() {
        let store = temp_store(50);

        store
            .append(HistoryEntry::image("a red fox", "https://img.example/fox"))
            .await;

        let log = store.read_all().await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].sender, Sender::Image);
        assert_eq!(
            log[0].text,
            EntryBody::Image {
                prompt: "a red fox".to_string(),
                image_url: "https://img.example/fox".to_string(),
            }
        );

        store.clear().await;
    }
}
