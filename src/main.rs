use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zeefax::aggregator::FeedAggregator;
use zeefax::config::Config;
use zeefax::nav::Navigator;
use zeefax::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zeefax=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::load("zeefax.toml")?);
    info!(
        "Loaded {} categories from configuration",
        config.categories.len()
    );

    // Page registry is computed once from static configuration
    let navigator = Navigator::new(&config);
    let aggregator = FeedAggregator::new(config.clone());

    let state = Arc::new(AppState {
        config,
        navigator,
        aggregator,
    });

    // Build router
    let app = Router::new()
        .route("/api/feeds", get(routes::feeds))
        .route("/api/page/:page", get(routes::page))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Server starting on http://localhost:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
