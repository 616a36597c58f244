//! Configuration loaded from the process environment.
//!
//! The robot identity (serial number and secret) comes from
//! `NEATO_ROBOT_SERIALNUMBER` and `NEATO_ROBOT_SECRET`. Both are required.

use std::fmt;

use anyhow::{Context, Result};

/// Default nucleo endpoint.
pub const DEFAULT_NUCLEO_URL: &str = "https://nucleo.neatocloud.com:4443";

/// Request id sent with every command unless overridden.
pub const DEFAULT_REQUEST_ID: &str = "77";

/// Shared secret used to sign commands. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Identity of the single robot this process controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotIdentity {
    pub serial_number: String,
    pub secret: Secret,
}

/// Top-level configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub robot: RobotIdentity,

    /// Base URL of the nucleo API, without trailing slash.
    pub nucleo_url: String,

    /// `reqId` attached to outbound commands.
    pub request_id: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Optional variables: `NEATO_NUCLEO_URL`, `NEATO_REQUEST_ID`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{key} not set"))
        };

        let serial_number = required("NEATO_ROBOT_SERIALNUMBER")?;
        let secret = required("NEATO_ROBOT_SECRET")?;

        let nucleo_url = lookup("NEATO_NUCLEO_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_NUCLEO_URL.into())
            .trim_end_matches('/')
            .to_string();

        let request_id = lookup("NEATO_REQUEST_ID")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_REQUEST_ID.into());

        Ok(Self {
            robot: RobotIdentity {
                serial_number,
                secret: Secret::new(secret),
            },
            nucleo_url,
            request_id,
        })
    }
}
