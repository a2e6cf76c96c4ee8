use std::time::Duration;

use tracing::debug;

use crate::cache::CacheService;
use crate::database::Database;

/// How long a player stays throttled after a successful non-exempt exchange.
pub const COOLDOWN_TTL: Duration = Duration::from_secs(10);

pub fn cooldown_key(cache: &CacheService, player_id: &str) -> String {
    cache.key(format!("cooldown:{player_id}"))
}

/// Whether the player has a live cooldown marker.
///
/// Callers check this before contacting the completion provider; the marker
/// is armed separately via [`arm_cooldown`] only after the exchange succeeds,
/// so concurrent requests from one player can all pass this gate before the
/// first one arms it.
pub async fn is_on_cooldown(db: &Database, player_id: &str) -> anyhow::Result<bool> {
    let cache = db.cache();
    let key = cooldown_key(cache, player_id);
    let blocked = cache.marker_exists(&key).await?;

    if blocked {
        debug!(player_id, "cooldown gate hit");
    }

    Ok(blocked)
}

/// Arm the cooldown marker for a player with the fixed TTL.
pub async fn arm_cooldown(db: &Database, player_id: &str) -> anyhow::Result<()> {
    let cache = db.cache();
    let key = cooldown_key(cache, player_id);
    cache.set_marker(&key, COOLDOWN_TTL).await
}

#[cfg(test)]
mod tests {
    use super::{COOLDOWN_TTL, arm_cooldown, cooldown_key, is_on_cooldown};
    use crate::cache::CacheService;
    use crate::database::Database;
    use sqlx::postgres::PgPoolOptions;

    fn memory_db() -> Database {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/blackvault_test")
            .unwrap();
        Database::with_cache(pool, CacheService::memory("blackvault:test"))
    }

    #[tokio::test]
    async fn armed_cooldown_blocks_only_that_player() {
        let db = memory_db();

        assert!(!is_on_cooldown(&db, "u1").await.unwrap());

        arm_cooldown(&db, "u1").await.unwrap();

        assert!(is_on_cooldown(&db, "u1").await.unwrap());
        assert!(!is_on_cooldown(&db, "u2").await.unwrap());
    }

    #[test]
    fn cooldown_keys_embed_the_player_id() {
        let cache = CacheService::disabled("blackvault:test");
        assert_eq!(cooldown_key(&cache, "u1"), "blackvault:test:cooldown:u1");
        assert_eq!(
            cooldown_key(&cache, "Player 42"),
            "blackvault:test:cooldown:Player 42"
        );
    }

    #[test]
    fn cooldown_ttl_is_ten_seconds() {
        assert_eq!(COOLDOWN_TTL.as_secs(), 10);
    }
}
