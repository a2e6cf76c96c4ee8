#[derive(Clone, Debug, Default)]
pub struct NoopCacheStore;

impl NoopCacheStore {
    pub async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    pub async fn set(&self, _key: &str, _ttl_seconds: u64) -> anyhow::Result<()> {
        Ok(())
    }
}
