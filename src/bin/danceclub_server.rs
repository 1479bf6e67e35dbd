// Dance-class marketplace HTTP server.

use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use danceclub::{api, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "danceclub=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let address = config.server_address();

    let state = AppState::new(config).await?;
    tracing::info!("database ready");

    let app = api::router(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("listening on {}", address);
    axum::serve(listener, app).await?;

    Ok(())
}
