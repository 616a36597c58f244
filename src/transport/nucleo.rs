//! HTTPS transport to `nucleo.neatocloud.com`.
//!
//! Signs each command body with the robot secret and POSTs it to the
//! robot's `messages` endpoint. One pooled `reqwest::Client` is shared by
//! every request; the pool keeps a few idle connections for a short while.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{ACCEPT, AUTHORIZATION, DATE};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use super::{CommandEnvelope, Transport};
use crate::config::{Config, RobotIdentity};
use crate::error::{Result, RobotError};
use crate::signer::{format_rfc1123_date, sign};

/// Media type nucleo expects in the `Accept` header.
pub const NUCLEO_ACCEPT: &str = "application/vnd.neato.nucleo.v1";

const MAX_IDLE_PER_HOST: usize = 10;
const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport that talks to the real nucleo API (or anything speaking its protocol).
#[derive(Debug, Clone)]
pub struct NucleoTransport {
    client: Client,
    identity: RobotIdentity,
    url: String,
}

impl NucleoTransport {
    /// Create a transport for `identity` against `base_url`
    /// (e.g. `https://nucleo.neatocloud.com:4443`).
    pub fn new(identity: RobotIdentity, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .pool_idle_timeout(IDLE_TIMEOUT)
            .build()?;

        let url = format!(
            "{}/vendors/neato/robots/{}/messages",
            base_url.trim_end_matches('/'),
            identity.serial_number
        );

        Ok(Self {
            client,
            identity,
            url,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.robot.clone(), &config.nucleo_url)
    }
}

#[async_trait]
impl Transport for NucleoTransport {
    #[instrument(skip(self, command), fields(cmd = ?command.cmd, req_id = %command.req_id))]
    async fn send(&self, command: &CommandEnvelope) -> Result<Vec<u8>> {
        let body = serde_json::to_string(command).map_err(RobotError::Encode)?;

        // The same date string goes into the signature and the header
        let date = format_rfc1123_date(&Utc::now());
        let signature = sign(
            &self.identity.serial_number,
            &date,
            &body,
            self.identity.secret.expose(),
        );

        debug!(url = %self.url, body_len = body.len(), "Sending command");

        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, NUCLEO_ACCEPT)
            .header(AUTHORIZATION, format!("NEATOAPP {signature}"))
            .header(DATE, &date)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.bytes().await?;

        // Anything other than 200 is an error, even other 2xx codes
        if status != StatusCode::OK {
            let body = String::from_utf8_lossy(&payload).into_owned();
            warn!(status = status.as_u16(), "nucleo rejected command");
            return Err(RobotError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        debug!(len = payload.len(), "Command acknowledged");
        Ok(payload.to_vec())
    }
}
