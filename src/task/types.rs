//! Closed task and action type enumerations.
//!
//! These are the wire vocabulary shared with the decomposition prompt:
//! the model is told to answer in exactly these lowercase strings, and
//! everything it actually answers is coerced back into them by the
//! normalizer.

use serde::{Deserialize, Serialize};

/// Kind of automation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Find a page element
    Locate,
    /// Perform an operation (click, input, scroll, navigate, ...)
    Action,
    /// Read data off the page
    Extract,
    /// Verify page state
    Assert,
    /// Wait for a load or state change
    Wait,
}

impl TaskType {
    pub const ALL: [TaskType; 5] = [
        TaskType::Locate,
        TaskType::Action,
        TaskType::Extract,
        TaskType::Assert,
        TaskType::Wait,
    ];

    /// Wire string for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Locate => "locate",
            TaskType::Action => "action",
            TaskType::Extract => "extract",
            TaskType::Assert => "assert",
            TaskType::Wait => "wait",
        }
    }

    /// Parse a wire string. Exact match only; coercion of anything else
    /// is the normalizer's job.
    pub fn parse(raw: &str) -> Option<TaskType> {
        TaskType::ALL.iter().copied().find(|t| t.as_str() == raw)
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of operation, meaningful only on [`TaskType::Action`] tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Click,
    Input,
    Scroll,
    Hover,
    Keyboard,
    Navigate,
}

impl ActionType {
    pub const ALL: [ActionType; 6] = [
        ActionType::Click,
        ActionType::Input,
        ActionType::Scroll,
        ActionType::Hover,
        ActionType::Keyboard,
        ActionType::Navigate,
    ];

    /// Wire string for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Click => "click",
            ActionType::Input => "input",
            ActionType::Scroll => "scroll",
            ActionType::Hover => "hover",
            ActionType::Keyboard => "keyboard",
            ActionType::Navigate => "navigate",
        }
    }

    /// Parse a wire string. Exact match only.
    pub fn parse(raw: &str) -> Option<ActionType> {
        ActionType::ALL.iter().copied().find(|a| a.as_str() == raw)
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_wire_strings() {
        for task_type in TaskType::ALL {
            assert_eq!(TaskType::parse(task_type.as_str()), Some(task_type));
        }
        for action_type in ActionType::ALL {
            assert_eq!(ActionType::parse(action_type.as_str()), Some(action_type));
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(TaskType::parse("Action"), None);
        assert_eq!(TaskType::parse(" action"), None);
        assert_eq!(ActionType::parse("CLICK"), None);
        assert_eq!(ActionType::parse("tap"), None);
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_value(TaskType::Extract).unwrap(),
            serde_json::json!("extract")
        );
        assert_eq!(
            serde_json::from_str::<ActionType>("\"navigate\"").unwrap(),
            ActionType::Navigate
        );
    }
}
