use serde::{Deserialize, Serialize};

pub const WORK_SECONDS: u32 = 25 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroPhase {
    #[default]
    Idle,
    Work,
    Break,
    Paused,
}

/// Timer state shared through `/api/pomodoro/state` and the `pomodoroState`
/// local-storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroState {
    #[serde(default = "default_time_left")]
    pub time_left: u32,
    #[serde(default)]
    pub state: PomodoroPhase,
    #[serde(default)]
    pub work_count: u32,
    /// Milliseconds since the Unix epoch when the phase was last saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
}

fn default_time_left() -> u32 {
    WORK_SECONDS
}

impl Default for PomodoroState {
    fn default() -> Self {
        Self {
            time_left: WORK_SECONDS,
            state: PomodoroPhase::Idle,
            work_count: 0,
            start_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_default_shape() {
        let state: PomodoroState =
            serde_json::from_str(r#"{"timeLeft": 1500, "state": "idle", "workCount": 0}"#)
                .unwrap();
        assert_eq!(state, PomodoroState::default());
    }

    #[test]
    fn test_camel_case_on_the_wire() {
        let state = PomodoroState {
            time_left: 300,
            state: PomodoroPhase::Break,
            work_count: 2,
            start_time: Some(1_700_000_000_000),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["workCount"], 2);
        assert_eq!(json["state"], "break");
        assert_eq!(json["startTime"], 1_700_000_000_000i64);
    }
}
