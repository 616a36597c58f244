//! Command transport to the nucleo API.
//!
//! Provides the `Transport` trait and the command wire format.
//! `NucleoTransport` is the HTTPS implementation; tests substitute a
//! recording mock.

pub mod nucleo;
pub mod protocol;

pub use nucleo::NucleoTransport;
pub use protocol::{Command, CommandEnvelope};

use async_trait::async_trait;

use crate::error::Result;

/// Sends one signed command and hands back the raw response payload.
///
/// Implementations must be safe to share between concurrently running
/// inbound requests. Exactly one request per call, no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `command` and return the body of a `200 OK` response, unparsed.
    ///
    /// Non-200 responses become [`RobotError::Remote`](crate::error::RobotError::Remote)
    /// carrying the raw body.
    async fn send(&self, command: &CommandEnvelope) -> Result<Vec<u8>>;
}
