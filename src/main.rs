#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{api::StudentApi, config::RuntimeConfiguration, state::RegistrarState};
use tokio::{net::TcpListener, signal};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod api;
mod config;
mod data;
mod error;
mod maud_conveniences;
mod routes;
mod state;
#[cfg(test)]
mod test_support;
mod view_state;

async fn shutdown_signal(state: RegistrarState) {
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

    warn!(
        downloads_in_flight = state.downloads().in_flight(),
        "signal received, starting graceful shutdown"
    );
}

///the hosted service sleeps when idle, so poke it before anyone is waiting on it
fn wake_student_service(state: &RegistrarState) {
    let api = state.api().clone();
    tokio::spawn(async move {
        match api.health().await {
            Ok(report) => info!(status = %report.status, base_url = %api.base_url(), "Student service is up"),
            Err(e) => warn!(?e, base_url = %api.base_url(), "Student service health check failed"),
        }
    });
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("no .env file loaded: {e}");
    }

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");

    let config = RuntimeConfiguration::new().expect("unable to create config");
    info!(
        environment = ?config.api_config().environment,
        base_url = %config.api_config().base_url,
        timeout = ?config.api_config().timeout,
        "Loaded configuration"
    );
    let state = RegistrarState::new(config.clone()).expect("unable to create state");

    wake_student_service(&state);

    let app = routes::router(state.clone())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let server_ip = config.server_ip().to_string();
    let listener = TcpListener::bind(&server_ip)
        .await
        .expect("unable to listen on server ip");

    info!(?server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .expect("unable to serve app");
}
