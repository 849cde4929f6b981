//! `localStorage` backend

use becas::storage::{KvStorage, StorageError, StorageResult};
use wasm_bindgen::JsValue;

/// The window's `localStorage` as a [`KvStorage`]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

fn js_error(err: JsValue) -> StorageError {
    StorageError::Unavailable(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

impl LocalStorage {
    /// Fails when there is no window or storage is disabled (private mode,
    /// sandboxed iframe)
    pub fn open() -> StorageResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let inner = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))?;
        Ok(Self { inner })
    }
}

impl KvStorage for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        // setItem only throws on QuotaExceededError
        self.inner.set_item(key, value).map_err(|_| StorageError::Quota {
            key: key.to_string(),
        })
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key).map_err(js_error)
    }
}
