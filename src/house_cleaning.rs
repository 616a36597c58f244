//! House cleaning orchestration.
//!
//! Turns "start cleaning" / "stop cleaning" / "is it cleaning?" into the
//! right sequence of robot commands, based on the state the robot reports
//! at the moment of the call. Nothing is cached between calls.

use tracing::{info, warn};

use crate::error::{Result, RobotError};
use crate::response::{OperatingState, StandardResult, StateResult};
use crate::robot::{CleaningCategory, Robot};
use crate::transport::Transport;

/// Decision layer over a single robot.
///
/// Holds no mutable state, so one instance can serve concurrent requests.
#[derive(Debug)]
pub struct HouseCleaning<T> {
    robot: Robot<T>,
}

impl<T: Transport> HouseCleaning<T> {
    pub const fn new(robot: Robot<T>) -> Self {
        Self { robot }
    }

    pub const fn robot(&self) -> &Robot<T> {
        &self.robot
    }

    /// Whether the robot is currently house cleaning (action based).
    pub async fn is_cleaning(&self) -> Result<bool> {
        self.robot.is_cleaning().await
    }

    /// Full state report, passed through. `StateResult::is_busy` is the
    /// state-based counterpart of `is_cleaning`.
    pub async fn state(&self) -> Result<StateResult> {
        self.robot.get_state().await
    }

    /// Make the robot house clean, whatever it is doing now.
    ///
    /// - busy: already doing something, answer `ok` without sending anything
    /// - paused: resume
    /// - idle: start with map, and if the robot is off the dock start again
    ///   without map
    /// - invalid, error or an unknown code: `UnsupportedState`, nothing is sent
    pub async fn start(&self) -> Result<StandardResult> {
        let state = self.robot.get_state().await?;

        match state.state {
            OperatingState::Busy => {
                info!("Robot is cleaning already");
                Ok(StandardResult::ok(self.robot.request_id()))
            }
            OperatingState::Paused => {
                info!("Robot is paused, resuming cleaning");
                self.robot.resume_cleaning().await
            }
            OperatingState::Idle => self.start_from_idle().await,
            other @ (OperatingState::Invalid
            | OperatingState::Error
            | OperatingState::Unknown(_)) => {
                warn!(state = ?other, error = ?state.error_text, "Robot cannot start cleaning");
                Err(RobotError::UnsupportedState(other))
            }
        }
    }

    async fn start_from_idle(&self) -> Result<StandardResult> {
        info!("Robot is idle, cleaning with map");
        let result = self.robot.start_cleaning(CleaningCategory::WithMap).await?;

        // Map-based cleaning has to start on the dock
        if result.is_not_on_charge_base() {
            info!("Robot is not on charge base, cleaning without map");
            return self.robot.start_cleaning(CleaningCategory::WithoutMap).await;
        }

        Ok(result)
    }

    /// Send the robot back to its base.
    pub async fn stop(&self) -> Result<StandardResult> {
        info!("Sending robot back to base");
        self.robot.send_to_base().await
    }
}
