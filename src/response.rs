//! Typed views of nucleo responses.
//!
//! The vendor schema is not frozen, so anything we do not model explicitly is
//! kept as opaque JSON instead of being rejected.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Result token the robot answers when a map-based start is attempted off the dock.
///
/// Matched verbatim. nucleo could rename it without a version bump, in which
/// case the no-map fallback silently stops triggering.
pub const RESULT_NOT_ON_CHARGE_BASE: &str = "not_on_charge_base";

/// Result token for success.
pub const RESULT_OK: &str = "ok";

/// Decode a raw response body into `T`.
///
/// Invalid JSON or a missing required field is a `MalformedResponse`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Acknowledgement of a mutating command (start, resume, send to base, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardResult {
    #[serde(default)]
    pub version: i64,
    #[serde(rename = "reqId", default)]
    pub req_id: String,
    /// Opaque status token; new values may appear at any time.
    pub result: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Map<String, Value>,
    /// Fields we do not model, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StandardResult {
    /// A locally produced `ok`, for requests that need no remote command.
    pub fn ok(req_id: impl Into<String>) -> Self {
        Self {
            version: 1,
            req_id: req_id.into(),
            result: RESULT_OK.to_string(),
            data: Map::new(),
            extra: Map::new(),
        }
    }

    pub fn is_not_on_charge_base(&self) -> bool {
        self.result == RESULT_NOT_ON_CHARGE_BASE
    }
}

/// Coarse robot status reported by `getRobotState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum OperatingState {
    Invalid,
    Idle,
    Busy,
    Paused,
    Error,
    /// A code this build does not know about.
    Unknown(i64),
}

impl From<i64> for OperatingState {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Invalid,
            1 => Self::Idle,
            2 => Self::Busy,
            3 => Self::Paused,
            4 => Self::Error,
            _ => Self::Unknown(code),
        }
    }
}

impl From<OperatingState> for i64 {
    fn from(state: OperatingState) -> Self {
        match state {
            OperatingState::Invalid => 0,
            OperatingState::Idle => 1,
            OperatingState::Busy => 2,
            OperatingState::Paused => 3,
            OperatingState::Error => 4,
            OperatingState::Unknown(code) => code,
        }
    }
}

/// What the robot is doing while busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum RobotAction {
    Invalid,
    HouseCleaning,
    SpotCleaning,
    ManualCleaning,
    Docking,
    UserMenuActive,
    SuspendedCleaning,
    Updating,
    CopyingLogs,
    RecoveringLocation,
    IecTest,
    MapCleaning,
    ExploringMap,
    AcquiringPersistentMap,
    CreatingAndUploadingMap,
    SuspendedExploration,
    /// A code this build does not know about.
    Unknown(i64),
}

const ACTIONS: [RobotAction; 16] = [
    RobotAction::Invalid,
    RobotAction::HouseCleaning,
    RobotAction::SpotCleaning,
    RobotAction::ManualCleaning,
    RobotAction::Docking,
    RobotAction::UserMenuActive,
    RobotAction::SuspendedCleaning,
    RobotAction::Updating,
    RobotAction::CopyingLogs,
    RobotAction::RecoveringLocation,
    RobotAction::IecTest,
    RobotAction::MapCleaning,
    RobotAction::ExploringMap,
    RobotAction::AcquiringPersistentMap,
    RobotAction::CreatingAndUploadingMap,
    RobotAction::SuspendedExploration,
];

impl From<i64> for RobotAction {
    fn from(code: i64) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| ACTIONS.get(i).copied())
            .unwrap_or(Self::Unknown(code))
    }
}

impl From<RobotAction> for i64 {
    fn from(action: RobotAction) -> Self {
        if let RobotAction::Unknown(code) = action {
            return code;
        }
        ACTIONS
            .iter()
            .position(|a| *a == action)
            .and_then(|i| Self::try_from(i).ok())
            .unwrap_or_default()
    }
}

/// Response to `getRobotState`.
///
/// Capability and detail sections are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResult {
    #[serde(flatten)]
    pub standard: StandardResult,
    #[serde(rename = "error", default)]
    pub error_text: Option<String>,
    #[serde(rename = "alert", default)]
    pub alert_text: Option<String>,
    pub state: OperatingState,
    pub action: RobotAction,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub cleaning: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub details: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub available_commands: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub available_services: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub meta: Value,
}

impl StateResult {
    /// Coarse state says busy, whatever the robot is doing.
    pub fn is_busy(&self) -> bool {
        self.state == OperatingState::Busy
    }

    /// The current action is house cleaning.
    pub fn is_house_cleaning(&self) -> bool {
        self.action == RobotAction::HouseCleaning
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}
