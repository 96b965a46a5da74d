use shared_types::{Identity, Role, Session, StorageConfig};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use crate::api::Credential;

/// Key/value persistence for the session, e.g. browser local storage.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str);
}

/// In-memory store; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore(Arc<Mutex<HashMap<String, String>>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
    }
}

/// One file per key under a directory. Used by native builds.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| format!("create {}: {e}", self.dir.display()))?;
        std::fs::write(self.path(key), value).map_err(|e| format!("write {key}: {e}"))
    }

    fn remove(&self, key: &str) {
        if let Err(e) = std::fs::remove_file(self.path(key)) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(key, error = %e, "failed to remove persisted key");
            }
        }
    }
}

/// Storage key names for the two persisted halves of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub token: String,
    pub user: String,
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for SessionKeys {
    fn from(storage: &StorageConfig) -> Self {
        Self {
            token: storage.token_key.clone(),
            user: storage.user_key.clone(),
        }
    }
}

/// Owns the current [`Session`], its persisted copy and the outbound credential.
///
/// Cloning yields a handle to the same session. No method here touches the
/// network.
#[derive(Debug, Clone)]
pub struct SessionController<S> {
    store: S,
    credential: Credential,
    keys: SessionKeys,
    current: Arc<RwLock<Option<Session>>>,
}

impl<S: SessionStore> SessionController<S> {
    pub fn new(store: S, credential: Credential, keys: SessionKeys) -> Self {
        Self {
            store,
            credential,
            keys,
            current: Arc::new(RwLock::new(None)),
        }
    }

    fn replace(&self, session: Option<Session>) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = session;
    }

    /// Hydrate from storage. Missing, partial or unparseable data leaves the
    /// session empty and the stored keys as they are.
    pub fn restore(&self) -> Option<Session> {
        let token = self.store.get(&self.keys.token);
        let user = self.store.get(&self.keys.user);
        let restored = match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => {
                match serde_json::from_str::<Identity>(&user) {
                    Ok(identity) => Some(Session::new(token, identity)),
                    Err(e) => {
                        tracing::warn!(error = %e, "stored identity is unreadable; starting signed out");
                        None
                    }
                }
            }
            (None, None) => None,
            _ => {
                tracing::warn!("stored session is incomplete; starting signed out");
                None
            }
        };

        match &restored {
            Some(session) => {
                self.credential.set(session.token.clone());
                tracing::info!(user_id = session.user_id(), "session restored");
            }
            None => self.credential.clear(),
        }
        self.replace(restored.clone());
        restored
    }

    /// Replace any prior session, persist it and attach the credential.
    pub fn establish(&self, token: impl Into<String>, identity: Identity) -> Session {
        self.establish_session(Session::new(token, identity))
    }

    pub fn establish_session(&self, session: Session) -> Session {
        self.credential.set(session.token.clone());
        self.persist(&session);
        tracing::info!(user_id = session.user_id(), "session established");
        self.replace(Some(session.clone()));
        session
    }

    fn persist(&self, session: &Session) {
        let user = match serde_json::to_string(&session.identity) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize identity; session not persisted");
                return;
            }
        };
        let result = self
            .store
            .set(&self.keys.token, &session.token)
            .and_then(|_| self.store.set(&self.keys.user, &user));
        if let Err(e) = result {
            tracing::warn!(error = %e, "could not persist session");
        }
    }

    /// Drop the session, both persisted keys and the outbound credential.
    pub fn clear(&self) {
        self.replace(None);
        self.store.remove(&self.keys.token);
        self.store.remove(&self.keys.user);
        self.credential.clear();
        tracing::info!("session cleared");
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|s| s.has_role(role))
    }

    pub fn session(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}
