//! Wire format of commands sent to nucleo.
//!
//! Every command is a minified JSON object:
//! `{"reqId":"<id>","cmd":"<name>","params":{...}}`, with `params` omitted
//! for parameterless commands.

use serde::Serialize;
use serde_json::{Map, Value};

/// Commands understood by the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    GetRobotState,
    StartCleaning,
    ResumeCleaning,
    SendToBase,
    StopCleaning,
}

/// The body of a single outbound command.
///
/// `req_id` is echoed back by the vendor and is not checked for uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandEnvelope {
    #[serde(rename = "reqId")]
    pub req_id: String,
    pub cmd: Command,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl CommandEnvelope {
    pub fn new(req_id: impl Into<String>, cmd: Command) -> Self {
        Self {
            req_id: req_id.into(),
            cmd,
            params: None,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }
}

#[cfg(test)]
impl CommandEnvelope {
    /// Integer parameter lookup for asserting on sent commands.
    pub(crate) fn param_i64(&self, key: &str) -> Option<i64> {
        self.params.as_ref()?.get(key)?.as_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parameterless_command_omits_params() {
        let env = CommandEnvelope::new("77", Command::GetRobotState);
        let body = serde_json::to_string(&env).unwrap();
        assert_eq!(body, r#"{"reqId":"77","cmd":"getRobotState"}"#);
    }

    #[test]
    fn command_names_are_camel_case() {
        let names: Vec<String> = [
            Command::GetRobotState,
            Command::StartCleaning,
            Command::ResumeCleaning,
            Command::SendToBase,
            Command::StopCleaning,
        ]
        .iter()
        .map(|c| serde_json::to_value(c).unwrap().as_str().unwrap().to_string())
        .collect();

        assert_eq!(
            names,
            [
                "getRobotState",
                "startCleaning",
                "resumeCleaning",
                "sendToBase",
                "stopCleaning"
            ]
        );
    }

    #[test]
    fn params_are_serialized_inline() {
        let Value::Object(params) = json!({"category": 4, "mode": 2, "navigationMode": 3}) else {
            unreachable!()
        };
        let env = CommandEnvelope::new("1", Command::StartCleaning).with_params(params);
        let value: Value = serde_json::to_value(&env).unwrap();

        assert_eq!(value["cmd"], "startCleaning");
        assert_eq!(value["params"]["category"], 4);
        assert_eq!(value["params"]["navigationMode"], 3);
        assert_eq!(env.param_i64("mode"), Some(2));
        assert_eq!(env.param_i64("missing"), None);
    }
}
