//! LocalStorage 适配
//!
//! 基于 `gloo-storage` 实现核心库的 `KeyValueStore`。值以 JSON 字符串保存。

use gloo_storage::{LocalStorage, Storage};
use manhaj::storage::KeyValueStore;
use manhaj::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::get::<String>(key).ok()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        LocalStorage::set(key, value).map_err(|e| ClientError::storage(e.to_string()))
    }

    fn delete(&self, key: &str) {
        LocalStorage::delete(key);
    }
}
