use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, map_response_body::MapResponseBodyLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

use voice_client::RemoteClient;
use voice_server::{build_router, config::ServerConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _ = dotenv::dotenv();

    async_main().await
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let methods = [
        axum::http::Method::GET,
        axum::http::Method::POST,
        axum::http::Method::OPTIONS,
    ];
    let origins: Vec<axum::http::HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .flatten()
        .filter_map(|origin| origin.parse::<axum::http::HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (development mode)");
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
            .allow_credentials(false)
    } else {
        info!("CORS configured for {} origin(s)", origins.len());
        CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::list(origins))
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
            .allow_credentials(false)
    }
}

async fn async_main() -> anyhow::Result<()> {
    info!("Starting voice front end...");

    let config = ServerConfig::from_env();
    let client = RemoteClient::new(config.client_config())?;
    info!(
        "Server configuration loaded: port={}, remote={}, retries={}, rate_limit={}/min",
        config.port,
        client.base_url(),
        config.remote_max_retries,
        config.rate_limit_per_minute
    );

    let state = AppState::new(Arc::new(client), config.clone());

    // Global rate limit: all requests share one bucket, which also works
    // behind proxies where the peer address is the proxy's.
    let per_minute = config.rate_limit_per_minute.max(1);
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(config.rate_limit_period_ms())
            .burst_size(per_minute)
            .key_extractor(GlobalKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?,
    );
    info!("Rate limiting: {} requests per minute", per_minute);

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(GovernorLayer::new(governor_conf))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(MapResponseBodyLayer::new(axum::body::Body::new))
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(cors_layer(&config))
        .into_inner();

    let app = build_router(state).layer(middleware_stack);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!("Failed to bind {addr}: {e}. Try a different PORT.")
    })?;

    info!("Server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
