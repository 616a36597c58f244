//! Vendor commands for a single robot.
//!
//! Each method builds one `CommandEnvelope`, sends it through the
//! `Transport` and decodes the reply. No retries happen here.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;
use crate::response::{decode, StandardResult, StateResult};
use crate::transport::{Command, CommandEnvelope, Transport};

/// House cleaning `mode`: turbo.
pub const CLEANING_MODE_TURBO: i64 = 2;

/// House cleaning `navigationMode`: deep.
pub const NAVIGATION_MODE_DEEP: i64 = 3;

/// Cleaning category passed to `startCleaning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningCategory {
    /// Plain house cleaning, no persistent map. Works off the dock.
    WithoutMap,
    /// Map-based house cleaning. Must start from the charge base.
    WithMap,
}

impl CleaningCategory {
    pub const fn code(self) -> i64 {
        match self {
            Self::WithoutMap => 2,
            Self::WithMap => 4,
        }
    }

    fn params(self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("category".into(), self.code().into());
        params.insert("mode".into(), CLEANING_MODE_TURBO.into());
        params.insert("navigationMode".into(), NAVIGATION_MODE_DEEP.into());
        params
    }
}

/// A robot reachable through some `Transport`.
#[derive(Debug, Clone)]
pub struct Robot<T> {
    transport: T,
    request_id: String,
}

impl<T: Transport> Robot<T> {
    pub fn new(transport: T, request_id: impl Into<String>) -> Self {
        Self {
            transport,
            request_id: request_id.into(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Capabilities and current state of the robot.
    pub async fn get_state(&self) -> Result<StateResult> {
        let bytes = self.send(self.envelope(Command::GetRobotState)).await?;
        let state: StateResult = decode(&bytes)?;
        debug!(state = ?state.state, action = ?state.action, "Robot state");
        Ok(state)
    }

    /// `true` iff the robot reports house cleaning as its current action.
    pub async fn is_cleaning(&self) -> Result<bool> {
        let state = self.get_state().await?;
        Ok(state.is_house_cleaning())
    }

    pub async fn start_cleaning(&self, category: CleaningCategory) -> Result<StandardResult> {
        let envelope = self
            .envelope(Command::StartCleaning)
            .with_params(category.params());
        self.command(envelope).await
    }

    pub async fn resume_cleaning(&self) -> Result<StandardResult> {
        self.command(self.envelope(Command::ResumeCleaning)).await
    }

    /// Stop the current run and drive back to the charge base.
    pub async fn send_to_base(&self) -> Result<StandardResult> {
        self.command(self.envelope(Command::SendToBase)).await
    }

    /// Stop in place.
    pub async fn stop_cleaning(&self) -> Result<StandardResult> {
        self.command(self.envelope(Command::StopCleaning)).await
    }

    fn envelope(&self, cmd: Command) -> CommandEnvelope {
        CommandEnvelope::new(self.request_id.clone(), cmd)
    }

    async fn command(&self, envelope: CommandEnvelope) -> Result<StandardResult> {
        let bytes = self.send(envelope).await?;
        decode(&bytes)
    }

    async fn send(&self, envelope: CommandEnvelope) -> Result<Vec<u8>> {
        self.transport.send(&envelope).await
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted transport shared by the robot and orchestrator tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::{Result, RobotError};
    use crate::transport::{Command, CommandEnvelope, Transport};

    /// Replays queued replies in order and records every command it sees.
    #[derive(Default)]
    pub struct MockTransport {
        replies: Mutex<VecDeque<Result<Vec<u8>>>>,
        sent: Mutex<Vec<CommandEnvelope>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn reply(self, body: &str) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Ok(body.as_bytes().to_vec()));
            self
        }

        #[must_use]
        pub fn fail(self, status: u16, body: &str) -> Self {
            self.replies.lock().unwrap().push_back(Err(RobotError::Remote {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub fn sent(&self) -> Vec<CommandEnvelope> {
            self.sent.lock().unwrap().clone()
        }

        pub fn sent_commands(&self) -> Vec<Command> {
            self.sent().iter().map(|e| e.cmd).collect()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, command: &CommandEnvelope) -> Result<Vec<u8>> {
            self.sent.lock().unwrap().push(command.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted reply for {:?}", command.cmd))
        }
    }

    /// A `getRobotState` reply with the given state and action codes.
    pub fn state_reply(state: i64, action: i64) -> String {
        format!(
            r#"{{"version":1,"reqId":"77","result":"ok","data":{{}},"error":null,"alert":null,"state":{state},"action":{action},"details":{{"isDocked":true}}}}"#
        )
    }

    /// A standard acknowledgement with the given result token.
    pub fn result_reply(result: &str) -> String {
        format!(r#"{{"version":1,"reqId":"77","result":"{result}","data":{{}}}}"#)
    }
}
