mod classify;
mod error;
mod handlers;

use std::env;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use sqlx::postgres::PgPoolOptions;

use blackvault_core::Data;
use blackvault_database::{CacheService, Database, MIGRATOR};
use blackvault_llm::CompletionService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(filter_fn(|metadata| {
            *metadata.level() <= tracing::Level::INFO
        }));

    tracing_subscriber::registry().with(fmt_layer).init();

    // Load the .env file
    dotenvy::dotenv().ok();

    info!(
        database_url = env_presence("DATABASE_URL"),
        openai_api_key = env_presence("OPENAI_API_KEY"),
        redis_url = env_presence("REDIS_URL"),
        chatgpt_secret = env_presence("CHATGPT_SECRET"),
        "environment summary"
    );

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or(3000);
    let database_url = env::var("DATABASE_URL")?;

    // Lazy pool: boot never blocks on an unreachable database. A request that
    // needs the store while it is down fails with the upstream outcome.
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(&database_url)?;
    info!("PostgreSQL pool created; connections are established on demand.");

    let cache = init_cache();

    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis ping failed; cooldown lookups will error until the store is reachable."
            );
        } else {
            info!("Redis health check passed.");
        }
    }

    let db = Database::with_cache(db_pool, cache);

    let auto_run_migrations = env_bool("AUTO_RUN_MIGRATIONS", true);
    if auto_run_migrations {
        match MIGRATOR.run(db.pool()).await {
            Ok(()) => info!("Database migrations applied."),
            Err(err) => warn!(
                ?err,
                "Failed to apply migrations at startup; continuing, exchange logging will fail until the database is reachable."
            ),
        }
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let llm = CompletionService::from_env_optional()?;
    if llm.is_some() {
        info!("Completion provider configured.");
    } else {
        warn!("OPENAI_API_KEY is missing/empty; /ai-process will return upstream failures.");
    }

    let bridge_secret = env::var("CHATGPT_SECRET")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty());
    if bridge_secret.is_none() {
        warn!("CHATGPT_SECRET is not set; every /chatbridge request will be rejected.");
    }

    let data = Data {
        db,
        llm,
        bridge_secret,
    };

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Black Vault AI gateway listening");

    axum::serve(listener, router(data)).await?;
    Ok(())
}

fn init_cache() -> CacheService {
    let redis_enabled = env_bool("REDIS_ENABLED", false);
    let key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "blackvault:prod".to_string());

    if !redis_enabled {
        info!(
            "Redis cooldown store disabled (set REDIS_ENABLED=true to enable); requests will not be throttled."
        );
        return CacheService::disabled(key_prefix);
    }

    match env::var("REDIS_URL") {
        Ok(redis_url) => match CacheService::redis(&redis_url, key_prefix.clone()) {
            Ok(cache) => {
                info!(%key_prefix, "Redis cooldown store enabled.");
                cache
            }
            Err(err) => {
                warn!(?err, %key_prefix, "Failed to initialize Redis; continuing without cooldown throttling.");
                CacheService::disabled(key_prefix)
            }
        },
        Err(_) => {
            warn!(%key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing without cooldown throttling.");
            CacheService::disabled(key_prefix)
        }
    }
}

fn router(data: Data) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/ai-process", post(handlers::process::ai_process))
        .route("/chatbridge", post(handlers::bridge::chatbridge))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(data)
}

async fn health() -> &'static str {
    "Black Vault AI backend is running"
}

fn env_presence(key: &str) -> &'static str {
    let set = env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .is_some();

    if set { "[loaded]" } else { "[missing]" }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}
