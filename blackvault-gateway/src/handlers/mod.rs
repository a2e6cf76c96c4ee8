pub mod bridge;
pub mod process;

#[cfg(test)]
pub(crate) mod test_support {
    use blackvault_core::Data;
    use blackvault_database::{CacheService, Database};
    use sqlx::postgres::PgPoolOptions;

    /// State with a lazy (never-connected) pool, disabled cooldown cache, and
    /// no completion provider, for handler tests that must not touch any
    /// external service.
    pub fn test_data(bridge_secret: Option<&str>) -> Data {
        test_data_with_cache(CacheService::disabled("blackvault:test"), bridge_secret)
    }

    /// Same, but with a caller-chosen cooldown cache so tests can arm live
    /// markers against the in-memory backend.
    pub fn test_data_with_cache(cache: CacheService, bridge_secret: Option<&str>) -> Data {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/blackvault_test")
            .unwrap();

        Data {
            db: Database::with_cache(pool, cache),
            llm: None,
            bridge_secret: bridge_secret.map(str::to_owned),
        }
    }
}
