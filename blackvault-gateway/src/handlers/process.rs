use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use blackvault_core::Data;
use blackvault_database::impls::cooldown::{arm_cooldown, is_on_cooldown};
use blackvault_database::impls::exchange_log::insert_exchange;

use crate::classify::is_layout_request;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default, rename = "playerId")]
    player_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessReply {
    reply: String,
}

/// `POST /ai-process`: classify, gate on cooldown, call the completion
/// provider, log the exchange, then arm the cooldown for non-exempt prompts.
///
/// Each step is terminal on failure; nothing is persisted and no cooldown is
/// armed unless the provider call succeeded.
pub async fn ai_process(
    State(data): State<Data>,
    Json(body): Json<ProcessRequest>,
) -> Result<Json<ProcessReply>, ApiError> {
    let prompt = body.prompt.filter(|value| !value.is_empty());
    let player_id = body.player_id.filter(|value| !value.is_empty());

    let (Some(prompt), Some(player_id)) = (prompt, player_id) else {
        return Err(ApiError::MissingFields);
    };

    let exempt = is_layout_request(&prompt);

    if !exempt
        && is_on_cooldown(&data.db, &player_id)
            .await
            .map_err(ApiError::upstream)?
    {
        return Err(ApiError::Cooldown);
    }

    let llm = data
        .llm
        .as_ref()
        .ok_or_else(|| ApiError::upstream(anyhow::anyhow!("no completion provider configured")))?;

    let reply = llm
        .generate_reply(&prompt)
        .await
        .map_err(ApiError::upstream)?;

    info!(%player_id, reply_chars = reply.len(), "completion reply generated");

    insert_exchange(&data.db, &player_id, &prompt, &reply)
        .await
        .map_err(ApiError::upstream)?;

    if !exempt {
        arm_cooldown(&data.db, &player_id)
            .await
            .map_err(ApiError::upstream)?;
    }

    Ok(Json(ProcessReply { reply }))
}
