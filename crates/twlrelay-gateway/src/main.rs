//! twlrelay gateway binary.
//!
//! - `POST /rooms` creates a password-protected room
//! - `GET /rooms/:room_id/join` upgrades to a WebSocket session
//! - `POST /produce-notif` injects a message from outside the room
//! - Graceful shutdown on Ctrl+C / SIGTERM

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use twlrelay_gateway::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load_from_env().expect("config load failed");
    let listen = cfg
        .gateway
        .listen_addr()
        .expect("gateway.listen must be a valid SocketAddr");

    let state = AppState::new(cfg).expect("app state init failed");
    let app = router::build_router(state.clone());

    tracing::info!(%listen, "twlrelay-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .expect("server failed");
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    state.set_draining();
    tracing::info!("signal received, starting graceful shutdown");
}
