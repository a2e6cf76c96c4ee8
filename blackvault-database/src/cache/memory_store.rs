use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::MARKER;

/// In-process marker store with wall-clock expiry. Expired entries are
/// dropped lazily on lookup.
#[derive(Clone, Debug, Default)]
pub struct MemoryCacheStore {
    entries: Arc<Mutex<HashMap<String, Instant>>>,
}

impl MemoryCacheStore {
    fn entries(&self) -> anyhow::Result<std::sync::MutexGuard<'_, HashMap<String, Instant>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory cache mutex poisoned"))
    }

    pub async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut entries = self.entries()?;

        match entries.get(key) {
            Some(expires_at) if *expires_at > Instant::now() => Ok(Some(MARKER.to_owned())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub async fn set(&self, key: &str, ttl_seconds: u64) -> anyhow::Result<()> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        self.entries()?.insert(key.to_owned(), expires_at);
        Ok(())
    }
}
