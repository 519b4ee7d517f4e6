//! Session persistence.
//!
//! One session per conversation id. [`MemoryStore`] is authoritative while the
//! process runs; [`FileStore`] adds an optional JSON file that is loaded once
//! at startup and rewritten after every change.
//!
//! Disk problems never reach callers: a missing or broken file means an empty
//! cache, and a failed write leaves the in-memory state as it is.

use std::collections::HashMap;
use std::fs;
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::game::Session;
use crate::error::StoreError;

/// Keyed storage of the current session per conversation.
pub trait SessionStore: Send + Sync {
    /// Current session, if any.
    fn get(&self, conversation_id: i64) -> Option<Session>;

    /// Replace the session for a conversation.
    fn set(&self, conversation_id: i64, session: Session);

    /// Remove and return the session for a conversation.
    fn delete(&self, conversation_id: i64) -> Option<Session>;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self, conversation_id: i64) -> Option<Session> {
        (**self).get(conversation_id)
    }

    fn set(&self, conversation_id: i64, session: Session) {
        (**self).set(conversation_id, session)
    }

    fn delete(&self, conversation_id: i64) -> Option<Session> {
        (**self).delete(conversation_id)
    }
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    sessions: RwLock<HashMap<i64, Session>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_sessions(name, HashMap::new())
    }

    fn with_sessions(name: impl Into<String>, sessions: HashMap<i64, Session>) -> Self {
        let name = name.into();
        tracing::info!(cache = %name, entries = sessions.len(), "Created cache");
        Self {
            name,
            sessions: RwLock::new(sessions),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Run `f` with exclusive access to the map.
    fn update<R>(&self, f: impl FnOnce(&mut HashMap<i64, Session>) -> R) -> R {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut sessions)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<i64, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, conversation_id: i64) -> Option<Session> {
        let session = self.read().get(&conversation_id).cloned();
        tracing::debug!(
            cache = %self.name,
            conversation_id,
            found = session.is_some(),
            "Got session"
        );
        session
    }

    fn set(&self, conversation_id: i64, session: Session) {
        tracing::debug!(
            cache = %self.name,
            conversation_id,
            guesses = session.guess_count(),
            "Set session"
        );
        self.update(|sessions| sessions.insert(conversation_id, session));
    }

    fn delete(&self, conversation_id: i64) -> Option<Session> {
        let removed = self.update(|sessions| sessions.remove(&conversation_id));
        tracing::debug!(cache = %self.name, conversation_id, "Deleted session");
        removed
    }
}

/// Session store with an optional JSON backing file.
///
/// The file lives at `<dir>/<name>` and holds an object mapping conversation
/// ids (as strings) to sessions. Without a directory this behaves exactly like
/// [`MemoryStore`].
///
/// Writes happen on tokio's blocking pool when called inside a runtime and
/// inline otherwise. The memory map is always updated first.
#[derive(Debug)]
pub struct FileStore {
    memory: MemoryStore,
    writer: Option<Arc<CacheWriter>>,
    generation: AtomicU64,
}

impl FileStore {
    /// Open the cache `name` inside `dir`, loading whatever it holds.
    pub fn open(name: impl Into<String>, dir: Option<&Path>) -> Self {
        let name = name.into();
        let path = dir.map(|d| d.join(&name));

        let sessions = match path.as_deref().map(load_cache) {
            Some(Ok(Some(sessions))) => {
                tracing::debug!(cache = %name, "Cache loaded from disk");
                sessions
            }
            Some(Ok(None)) | None => {
                tracing::debug!(cache = %name, "Disk cache not available");
                HashMap::new()
            }
            Some(Err(e)) => {
                tracing::error!(cache = %name, error = %e, "Failed to load cache");
                HashMap::new()
            }
        };

        Self {
            memory: MemoryStore::with_sessions(name, sessions),
            writer: path.map(|path| Arc::new(CacheWriter::new(path))),
            generation: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        self.memory.name()
    }

    /// Backing file, if persistence is enabled.
    pub fn path(&self) -> Option<&Path> {
        self.writer.as_deref().map(|w| w.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Apply `f` to the map and take a numbered snapshot under the same lock.
    fn update<R>(&self, f: impl FnOnce(&mut HashMap<i64, Session>) -> R) -> R {
        let (result, snapshot) = self.memory.update(|sessions| {
            let result = f(sessions);
            let snapshot = self.writer.as_ref().map(|_| {
                let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                (generation, serde_json::to_string(&*sessions))
            });
            (result, snapshot)
        });

        match snapshot {
            Some((generation, Ok(data))) => self.persist(generation, data),
            Some((_, Err(e))) => {
                tracing::error!(
                    cache = %self.name(),
                    error = %StoreError::Serialize(e),
                    "Failed to write cache"
                );
            }
            None => tracing::debug!(cache = %self.name(), "No cache saving available"),
        }
        result
    }

    fn persist(&self, generation: u64, data: String) {
        let Some(writer) = self.writer.clone() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || writer.write(generation, &data));
            }
            Err(_) => writer.write(generation, &data),
        }
    }
}

impl SessionStore for FileStore {
    fn get(&self, conversation_id: i64) -> Option<Session> {
        self.memory.get(conversation_id)
    }

    fn set(&self, conversation_id: i64, session: Session) {
        tracing::debug!(
            cache = %self.name(),
            conversation_id,
            guesses = session.guess_count(),
            "Set session"
        );
        self.update(|sessions| sessions.insert(conversation_id, session));
    }

    fn delete(&self, conversation_id: i64) -> Option<Session> {
        let removed = self.update(|sessions| sessions.remove(&conversation_id));
        tracing::debug!(cache = %self.name(), conversation_id, "Deleted session");
        removed
    }
}

/// Writes cache snapshots, newest generation wins.
#[derive(Debug)]
struct CacheWriter {
    path: PathBuf,
    last_written: Mutex<u64>,
}

impl CacheWriter {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            last_written: Mutex::new(0),
        }
    }

    fn write(&self, generation: u64, data: &str) {
        let mut last = self
            .last_written
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if generation <= *last {
            tracing::debug!(generation, last = *last, "Skipping stale cache snapshot");
            return;
        }

        match write_atomic(&self.path, data) {
            Ok(()) => {
                *last = generation;
                tracing::debug!(path = %self.path.display(), "Cache saved on disk");
            }
            Err(e) => tracing::error!(error = %e, "Failed to write cache"),
        }
    }
}

/// Write through a temporary file and rename.
fn write_atomic(path: &Path, data: &str) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp_path = path.with_extension("tmp");
    let mut tmp_file = fs::File::create(&tmp_path).map_err(io_err)?;
    tmp_file.write_all(data.as_bytes()).map_err(io_err)?;
    tmp_file.sync_all().map_err(io_err)?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(io_err)
}

/// Load and validate a cache file.
///
/// `Ok(None)` when there is no file. Any entry that fails validation fails
/// the whole load.
fn load_cache(path: &Path) -> Result<Option<HashMap<i64, Session>>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let raw: HashMap<String, Session> =
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    raw.into_iter()
        .map(|(key, session)| -> Result<(i64, Session), StoreError> {
            let conversation_id = key.parse::<i64>().map_err(|e| StoreError::InvalidEntry {
                key: key.clone(),
                reason: e.to_string(),
            })?;
            session
                .validate()
                .map_err(|reason| StoreError::InvalidEntry { key, reason })?;
            Ok((conversation_id, session))
        })
        .collect::<Result<HashMap<_, _>, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::Guess;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const CACHE: &str = "wordle-game-cache";

    fn session(secret: &str, guesses: usize) -> Session {
        (0..guesses).fold(Session::new(secret), |s, i| {
            let at = Utc.timestamp_millis_opt(i as i64 * 1_000).unwrap();
            s.with_guess(Guess::new("crane", i as i64, at))
        })
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_memory_store_basic() {
        let store = MemoryStore::new("test");
        assert!(store.get(1).is_none());

        store.set(1, session("sweet", 1));
        store.set(2, session("apple", 2));

        assert_eq!(store.get(1), Some(session("sweet", 1)));
        assert_eq!(store.len(), 2);

        store.set(1, session("sweet", 2));
        assert_eq!(store.get(1).unwrap().guess_count(), 2);

        assert_eq!(store.delete(1), Some(session("sweet", 2)));
        assert!(store.get(1).is_none());
        assert!(store.delete(1).is_none());
    }

    #[test]
    fn test_file_store_without_dir_is_memory_only() {
        let store = FileStore::open(CACHE, None);

        store.set(1, session("sweet", 1));

        assert!(store.path().is_none());
        assert_eq!(store.get(1), Some(session("sweet", 1)));
    }

    #[test]
    fn test_file_store_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(CACHE, Some(dir.path()));

        assert!(store.is_empty());
        assert!(!dir.path().join(CACHE).exists());
    }

    #[test]
    fn test_file_store_persists_and_reloads() {
        let dir = TempDir::new().unwrap();

        let store = FileStore::open(CACHE, Some(dir.path()));
        store.set(-100123, session("sweet", 3));
        store.set(42, session("apple", 1));
        drop(store);

        let reopened = FileStore::open(CACHE, Some(dir.path()));
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(-100123), Some(session("sweet", 3)));
        assert_eq!(reopened.get(42), Some(session("apple", 1)));
    }

    #[test]
    fn test_file_store_delete_persists() {
        let dir = TempDir::new().unwrap();

        let store = FileStore::open(CACHE, Some(dir.path()));
        store.set(1, session("sweet", 1));
        store.set(2, session("apple", 1));
        assert_eq!(store.delete(1), Some(session("sweet", 1)));

        let json = read_json(&dir.path().join(CACHE));
        assert!(json.get("1").is_none());
        assert_eq!(json["2"]["secretWord"], "apple");
    }

    #[test]
    fn test_file_format() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(CACHE, Some(dir.path()));

        store.set(7, session("sweet", 1));

        assert_eq!(
            read_json(&dir.path().join(CACHE)),
            serde_json::json!({
                "7": {
                    "secretWord": "sweet",
                    "guesses": [{"word": "crane", "userId": 0, "timestamp": 0}]
                }
            })
        );
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("cache").join("games");

        let store = FileStore::open(CACHE, Some(&nested));
        store.set(1, session("sweet", 1));

        assert!(nested.join(CACHE).exists());
    }

    #[test]
    fn test_corrupt_file_behaves_like_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CACHE), "{ not json").unwrap();

        let store = FileStore::open(CACHE, Some(dir.path()));

        assert!(store.is_empty());
        assert!(store.get(1).is_none());
    }

    #[test]
    fn test_invalid_key_discards_whole_load() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CACHE),
            r#"{
                "1": {"secretWord": "sweet", "guesses": []},
                "chat": {"secretWord": "apple", "guesses": []}
            }"#,
        )
        .unwrap();

        let store = FileStore::open(CACHE, Some(dir.path()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_too_many_guesses_discards_whole_load() {
        let dir = TempDir::new().unwrap();
        let mut raw = HashMap::new();
        raw.insert("1".to_string(), session("sweet", 2));
        raw.insert("2".to_string(), session("apple", 7));
        fs::write(dir.path().join(CACHE), serde_json::to_string(&raw).unwrap()).unwrap();

        let store = FileStore::open(CACHE, Some(dir.path()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_wrong_shape_discards_whole_load() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CACHE), r#"{"1": {"secretWord": 5}}"#).unwrap();

        assert!(FileStore::open(CACHE, Some(dir.path())).is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory() {
        let dir = TempDir::new().unwrap();
        // A regular file where the cache directory should be.
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "").unwrap();

        let store = FileStore::open(CACHE, Some(&blocker));
        store.set(1, session("sweet", 1));

        assert_eq!(store.get(1), Some(session("sweet", 1)));
    }

    #[test]
    fn test_stale_snapshot_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CACHE);
        let writer = CacheWriter::new(path.clone());

        writer.write(2, r#"{"new": true}"#);
        writer.write(1, r#"{"old": true}"#);

        assert_eq!(read_json(&path), serde_json::json!({"new": true}));
    }

    #[tokio::test]
    async fn test_set_then_get_inside_runtime() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(CACHE, Some(dir.path()));

        for i in 1..=6 {
            store.set(1, session("sweet", i));
            assert_eq!(store.get(1).unwrap().guess_count(), i);
        }

        // The newest snapshot lands on disk eventually.
        let path = dir.path().join(CACHE);
        let mut saved = 0;
        for _ in 0..200 {
            if path.exists() {
                saved = read_json(&path)["1"]["guesses"]
                    .as_array()
                    .map_or(0, Vec::len);
                if saved == 6 {
                    break;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(saved, 6);
    }
}
