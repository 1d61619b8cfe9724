//! Lottery draw server

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lottery_rs::config::{ServerConfig, ROLL_TICK_MS};
use lottery_rs::error::LotteryError;
use lottery_rs::{build_state, router};

#[tokio::main]
async fn main() -> Result<(), LotteryError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lottery_rs=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let state = build_state(&config);
    info!("Draw engine ready (roll tick every {}ms)", ROLL_TICK_MS);

    let app = router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| LotteryError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!("Lottery server running on http://{}", addr);
    info!("   WebSocket endpoint: ws://{}/ws/draw", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
