use std::fmt;

use serde::Serialize;

use crate::error::{AutofillError, Result};

/// Per-frame autofill lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AutofillState {
    #[default]
    Idle,
    Scanning,
    Filling,
    Done,
}

impl fmt::Display for AutofillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AutofillState::Idle => "idle",
            AutofillState::Scanning => "scanning",
            AutofillState::Filling => "filling",
            AutofillState::Done => "done",
        };
        f.write_str(s)
    }
}

impl AutofillState {
    pub fn can_transition(self, to: AutofillState) -> bool {
        matches!(
            (self, to),
            (AutofillState::Idle, AutofillState::Scanning)
                | (AutofillState::Scanning, AutofillState::Filling)
                | (AutofillState::Filling, AutofillState::Done)
        )
    }

    /// Move to `to`, or fail naming the frame and both states.
    pub fn transition(self, frame: &str, to: AutofillState) -> Result<AutofillState> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(AutofillError::InvalidTransition {
                frame: frame.to_string(),
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_only_moves_forward_one_step() {
        let s = AutofillState::Idle;
        let s = s.transition("top", AutofillState::Scanning).unwrap();
        let s = s.transition("top", AutofillState::Filling).unwrap();
        let s = s.transition("top", AutofillState::Done).unwrap();
        assert_eq!(s, AutofillState::Done);

        assert!(AutofillState::Idle.transition("top", AutofillState::Done).is_err());
        assert!(AutofillState::Done.transition("top", AutofillState::Scanning).is_err());
    }
}
