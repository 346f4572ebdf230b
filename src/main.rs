use axum::Router;
use marathon_dash::{config, routes, state};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marathon_dash=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();
    let state = state::AppState::new(config.clone());

    // Drop OAuth states nobody came back for
    let eviction_state = state.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(state::EVICTION_INTERVAL).await;
            eviction_state.evict_expired();
        }
    });

    tracing::info!(plan_dir = %state.plans().dir().display(), "Serving plans");

    // The web UI also handles the /oauth/* redirect pages
    let serve_dir = ServeDir::new("assets/web")
        .not_found_service(ServeFile::new("assets/web/index.html"));

    let app = Router::new()
        .merge(routes::api_router())
        .fallback_service(serve_dir)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");

    tracing::info!("Marathon dashboard listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Web UI: {}", config.app_base_url);

    axum::serve(listener, app).await.expect("server error");
}
