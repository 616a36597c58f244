//! Inbound HTTP API.
//!
//! `/houseCleaning` with REST-ish verbs:
//! - `GET` reports whether the robot is house cleaning
//! - `POST` / `PUT` start cleaning
//! - `DELETE` sends the robot back to base
//!
//! `/robotState` returns the raw state report plus a state-based `busy` flag.
//! Every failure is answered with `400` and `{"result":"error","error":"..."}`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::error::RobotError;
use crate::house_cleaning::HouseCleaning;
use crate::response::{StandardResult, StateResult};
use crate::transport::Transport;

type Shared<T> = Arc<HouseCleaning<T>>;

#[derive(Debug, Serialize)]
struct CleaningReply {
    cleaning: bool,
}

#[derive(Debug, Serialize)]
struct ResultReply {
    result: String,
}

impl From<StandardResult> for ResultReply {
    fn from(r: StandardResult) -> Self {
        Self { result: r.result }
    }
}

#[derive(Debug, Serialize)]
struct StateReply {
    busy: bool,
    #[serde(flatten)]
    state: StateResult,
}

/// Error wrapper turning a `RobotError` into the 400 envelope.
struct ApiError(RobotError);

impl From<RobotError> for ApiError {
    fn from(err: RobotError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Request failed");
        let body = json!({ "result": "error", "error": self.0.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Build the router for a house cleaning orchestrator.
pub fn build_router<T: Transport + 'static>(cleaning: Arc<HouseCleaning<T>>) -> Router {
    Router::new()
        .route(
            "/houseCleaning",
            get(cleaning_state::<T>)
                .post(start_cleaning::<T>)
                .put(start_cleaning::<T>)
                .delete(stop_cleaning::<T>),
        )
        .route("/robotState", get(robot_state::<T>))
        .with_state(cleaning)
}

async fn cleaning_state<T: Transport>(
    State(cleaning): State<Shared<T>>,
) -> Result<Json<CleaningReply>, ApiError> {
    info!("Checking cleaning state");
    let cleaning = cleaning.is_cleaning().await?;
    info!(cleaning, "Cleaning state");
    Ok(Json(CleaningReply { cleaning }))
}

async fn start_cleaning<T: Transport>(
    State(cleaning): State<Shared<T>>,
) -> Result<Json<ResultReply>, ApiError> {
    info!("Start of cleaning cycle");
    let result = cleaning.start().await?;
    Ok(Json(result.into()))
}

async fn stop_cleaning<T: Transport>(
    State(cleaning): State<Shared<T>>,
) -> Result<Json<ResultReply>, ApiError> {
    let result = cleaning.stop().await?;
    Ok(Json(result.into()))
}

async fn robot_state<T: Transport>(
    State(cleaning): State<Shared<T>>,
) -> Result<Json<StateReply>, ApiError> {
    let mut state = cleaning.state().await?;
    let busy = state.is_busy();
    // Our flag replaces any vendor field of the same name
    state.standard.extra.remove("busy");
    Ok(Json(StateReply { busy, state }))
}

/// Serve the API on `addr` until Ctrl-C or SIGTERM.
pub async fn serve<T: Transport + 'static>(
    addr: SocketAddr,
    cleaning: HouseCleaning<T>,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {addr}: {e}"))?;

    info!(%addr, "Starting neato-http server");

    axum::serve(listener, build_router(Arc::new(cleaning)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
