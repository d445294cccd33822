//! Persistent client-side state: the remembered user name and the last
//! round snapshot, kept across runs in a small JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use quizless_common::state::UserQuizState;

const USER_NAME_KEY: &str = "user_name";
const QUIZ_STATE_KEY: &str = "quiz_state";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt stored value: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String key-value store the client state is persisted in. Injected so
/// the managers on top can be exercised without touching the filesystem.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: Option<&str>) -> Result<(), StorageError>;
}

/// File-backed store: one JSON object per file, re-read on every get,
/// rewritten whole on every set. Concurrent processes race with
/// last-writer-wins semantics; no locking is attempted.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `$HOME/.quizless/state.json`, falling back to
    /// the working directory when HOME is unset.
    pub fn default_path() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) => Path::new(&home).join(".quizless").join("state.json"),
            None => PathBuf::from("quizless-state.json"),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(map)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Option<&str>) -> Result<(), StorageError> {
        let mut map = self.load()?;
        match value {
            Some(v) => map.insert(key.to_string(), v.to_string()),
            None => map.remove(key),
        };
        self.save(&map)
    }
}

/// Caches the user name after first read and writes both values through
/// to the underlying store.
#[derive(Debug)]
pub struct LocalState<S: KeyValueStore> {
    store: S,
    user_name: Option<String>,
}

impl<S: KeyValueStore> LocalState<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            user_name: None,
        }
    }

    /// Cached after the first read; an absent key reads as empty.
    pub fn user_name(&mut self) -> Result<&str, StorageError> {
        if self.user_name.is_none() {
            self.user_name = Some(self.store.get(USER_NAME_KEY)?.unwrap_or_default());
        }
        Ok(self.user_name.as_deref().unwrap_or(""))
    }

    /// No-op when the value is unchanged, otherwise write-through.
    pub fn set_user_name(&mut self, value: &str) -> Result<(), StorageError> {
        if self.user_name()? == value {
            return Ok(());
        }
        self.user_name = Some(value.to_string());
        self.store.set(USER_NAME_KEY, Some(value))
    }

    pub fn store_quiz_state(
        &mut self,
        state: Option<&UserQuizState>,
    ) -> Result<(), StorageError> {
        match state {
            Some(s) => {
                let text = serde_json::to_string(s)?;
                self.store.set(QUIZ_STATE_KEY, Some(&text))
            }
            None => self.store.set(QUIZ_STATE_KEY, None),
        }
    }

    /// A corrupt stored snapshot propagates as an error; the caller's
    /// screen initialization fails rather than render garbage.
    pub fn read_quiz_state(&self) -> Result<Option<UserQuizState>, StorageError> {
        match self.store.get(QUIZ_STATE_KEY)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizless_common::state::{QuizStatus, QuizUser, RoundState, UserQuizState, UserRole};

    /// In-memory store that counts writes, for the idempotence checks.
    #[derive(Debug, Default)]
    struct MemoryStore {
        map: BTreeMap<String, String>,
        writes: usize,
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.map.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: Option<&str>) -> Result<(), StorageError> {
            self.writes += 1;
            match value {
                Some(v) => self.map.insert(key.to_string(), v.to_string()),
                None => self.map.remove(key),
            };
            Ok(())
        }
    }

    fn sample_state() -> UserQuizState {
        UserQuizState {
            state: RoundState {
                id: "q1".into(),
                name: "Solar System".into(),
                quiz_code: 48213,
                status: QuizStatus::Pending,
                starts_at: None,
                expires: "2026-08-29T10:10:00Z".parse().unwrap(),
                question_seconds: None,
                cur_question_index: None,
                cur_question: None,
                updates_in_seconds: None,
            },
            user: QuizUser {
                name: "Alph".into(),
                user_token: "tok".into(),
                user_role: UserRole::Commander,
                answers: Vec::new(),
            },
            all_user_names: vec!["Alph".into()],
        }
    }

    #[test]
    fn test_user_name_defaults_empty_and_caches() {
        let mut local = LocalState::new(MemoryStore::default());
        assert_eq!(local.user_name().unwrap(), "");
        // second read hits the cache, not the store
        assert_eq!(local.user_name().unwrap(), "");
    }

    #[test]
    fn test_set_user_name_unchanged_is_a_no_op() {
        let mut local = LocalState::new(MemoryStore::default());
        local.set_user_name("Alph").unwrap();
        assert_eq!(local.store.writes, 1);
        local.set_user_name("Alph").unwrap();
        assert_eq!(local.store.writes, 1);
        local.set_user_name("Bart").unwrap();
        assert_eq!(local.store.writes, 2);
        assert_eq!(local.user_name().unwrap(), "Bart");
        assert_eq!(local.store.map.get(USER_NAME_KEY).unwrap(), "Bart");
    }

    #[test]
    fn test_quiz_state_round_trip() {
        let mut local = LocalState::new(MemoryStore::default());
        let state = sample_state();
        local.store_quiz_state(Some(&state)).unwrap();
        assert_eq!(local.read_quiz_state().unwrap(), Some(state));
    }

    #[test]
    fn test_storing_none_clears_the_snapshot() {
        let mut local = LocalState::new(MemoryStore::default());
        local.store_quiz_state(Some(&sample_state())).unwrap();
        local.store_quiz_state(None).unwrap();
        assert_eq!(local.read_quiz_state().unwrap(), None);
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let mut store = MemoryStore::default();
        store.set(QUIZ_STATE_KEY, Some("{not json")).unwrap();
        let local = LocalState::new(store);
        assert!(matches!(
            local.read_quiz_state(),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "quizless-store-test-{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let mut store = FileStore::new(&path);
        assert_eq!(store.get("user_name").unwrap(), None);
        store.set("user_name", Some("Alph")).unwrap();
        store.set("quiz_state", Some("{}")).unwrap();
        store.set("quiz_state", None).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("user_name").unwrap().as_deref(), Some("Alph"));
        assert_eq!(reopened.get("quiz_state").unwrap(), None);

        let _ = fs::remove_file(&path);
    }
}
