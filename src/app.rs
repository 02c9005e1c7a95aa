/*
 * Responsibility
 * - Config読み込み → 依存生成 (DrinkRepo / TokenVerifier) → Router 組み立て
 * - Middleware の適用 (HTTP / CORS / security headers)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    repos::{DrinkRepo, MemoryDrinkRepo, PgDrinkRepo, drink_repo::sample_drink},
    services::auth::build_token_verifier,
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,drinks_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panic via tracing so they don't get "lost"
        tracing::error!(?info, "panic");

        // In development, fail fast so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting drinks API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let drinks = build_drink_repo(config).await?;
    tracing::info!(backend = drinks.backend_name(), "drink repository ready");

    let verifier = build_token_verifier(config).context("failed to load signing keys")?;

    Ok(AppState::new(drinks, verifier))
}

async fn build_drink_repo(config: &Config) -> Result<Arc<dyn DrinkRepo>> {
    let drinks: Arc<dyn DrinkRepo> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .context("failed to connect to DATABASE_URL")?;

            let repo = PgDrinkRepo::new(pool);
            repo.ensure_schema(config.db_reset_on_start).await?;
            Arc::new(repo)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; drinks are kept in memory only");
            Arc::new(MemoryDrinkRepo::new())
        }
    };

    if config.db_reset_on_start {
        let seeded = drinks.insert(&sample_drink()).await?;
        tracing::info!(drink_id = seeded.id, "seeded sample drink");
    }

    Ok(drinks)
}

/// Full application router: API routes plus transport middleware.
pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(&state).with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
