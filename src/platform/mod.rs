//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time
//! - Storage (LocalStorage on web, nothing on native)

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Why a stored value could not be used
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no value stored under `{0}`")]
    Missing(String),
    #[error("stored value under `{key}` is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode a stored JSON value
pub fn decode<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Result<T, StorageError> {
    let raw = raw.ok_or_else(|| StorageError::Missing(key.to_string()))?;
    serde_json::from_str(raw).map_err(|source| StorageError::Malformed {
        key: key.to_string(),
        source,
    })
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Raw string stored under `key`
#[cfg(target_arch = "wasm32")]
pub fn read_raw(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

/// Load and decode a JSON value
#[cfg(target_arch = "wasm32")]
pub fn load_json<T: DeserializeOwned>(key: &str) -> Result<T, StorageError> {
    decode(key, read_raw(key).as_deref())
}

/// Encode and store a JSON value. Failures are logged, never fatal.
#[cfg(target_arch = "wasm32")]
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    let Some(storage) = local_storage() else {
        log::warn!("LocalStorage unavailable, `{}` not saved", key);
        return;
    };
    match serde_json::to_string(value) {
        Ok(json) => {
            if storage.set_item(key, &json).is_err() {
                log::warn!("Failed to write `{}` to LocalStorage", key);
            }
        }
        Err(e) => log::error!("Failed to encode `{}`: {}", key, e),
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn read_raw(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_json<T: DeserializeOwned>(key: &str) -> Result<T, StorageError> {
    decode(key, None)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_json<T: Serialize>(_key: &str, _value: &T) {
    // No-op for native
}
