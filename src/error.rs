//! Errors surfaced while talking to the nucleo API.

use thiserror::Error;

use crate::response::OperatingState;

/// Failure of a robot command, from transport up through the orchestrator.
///
/// None of these are retried; they propagate unchanged to the inbound caller.
#[derive(Debug, Error)]
pub enum RobotError {
    /// Connection, TLS or DNS failure, or the body could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The vendor answered with anything other than `200 OK`.
    #[error("nucleo returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// `200 OK` but the body is not the JSON shape we expected.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// The command envelope could not be serialized.
    #[error("failed to encode command: {0}")]
    Encode(#[source] serde_json::Error),

    /// Start was requested while the robot reports a state we have no command for.
    #[error("cannot start cleaning while robot state is {0:?}")]
    UnsupportedState(OperatingState),
}

pub type Result<T> = std::result::Result<T, RobotError>;
