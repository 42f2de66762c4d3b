#![warn(clippy::pedantic, clippy::all, clippy::nursery)]

use academica::{config::RuntimeConfiguration, routes::router, state::AcademicaState};
use sqlx::postgres::PgPoolOptions;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

async fn shutdown_signal(state: AcademicaState) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
    state.sensible_shutdown().await;
}

#[tokio::main]
async fn main() {
    let dotenv_result = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    if let Err(e) = dotenv_result {
        warn!(?e, "no .env loaded, using the process environment");
    }

    let config = RuntimeConfiguration::new().expect("unable to create config");
    info!(
        has_auth_token = config.db_config().has_auth_token(),
        "Loaded configuration"
    );

    let options = PgPoolOptions::new().max_connections(15);
    let state = AcademicaState::new(options, &config)
        .await
        .expect("unable to create state");

    let app = router(state.clone());

    let listener = TcpListener::bind(config.server_ip())
        .await
        .expect("unable to listen on server ip");

    info!(server_ip = config.server_ip(), "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .expect("unable to serve app");
}
