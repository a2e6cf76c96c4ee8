use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;

use crate::database::Database;

/// Append one prompt/reply exchange to the log.
///
/// Rows are written exactly once, after the completion provider has replied;
/// nothing in the service updates or deletes them afterwards.
pub async fn insert_exchange(
    db: &Database,
    player_id: &str,
    prompt: &str,
    reply: &str,
) -> anyhow::Result<()> {
    let created_at_i64 = i64::try_from(now_unix_secs()).context("created_at out of i64 range")?;

    sqlx::query(
        "INSERT INTO exchange_log (player_id, prompt, reply, created_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(player_id)
    .bind(prompt)
    .bind(reply)
    .bind(created_at_i64)
    .execute(db.pool())
    .await
    .context("failed to insert exchange log row")?;

    Ok(())
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}
