use shared_types::ClientConfig;

#[cfg(not(feature = "web"))]
pub type AppStore = client::FileStore;

#[cfg(feature = "web")]
pub type AppStore = LocalStorage;

#[cfg(not(feature = "web"))]
pub fn app_store(config: &ClientConfig) -> AppStore {
    client::FileStore::new(&config.storage.dir)
}

#[cfg(feature = "web")]
pub fn app_store(_config: &ClientConfig) -> AppStore {
    LocalStorage
}

/// Browser `localStorage`, the same place a page reload reads from.
#[cfg(feature = "web")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(feature = "web")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(feature = "web")]
impl client::SessionStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let storage = Self::storage().ok_or("local storage is unavailable")?;
        storage
            .set_item(key, value)
            .map_err(|e| format!("setItem({key}) failed: {e:?}"))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.remove_item(key) {
                tracing::warn!(key, error = ?e, "removeItem failed");
            }
        }
    }
}
