//! Canonicalization of raw model-emitted type strings.
//!
//! Free-text models routinely swap the `type` and `action_type` slots or
//! invent values outside the closed vocabularies. Normalization is a pure
//! total function: every input maps to valid enumeration members, and the
//! coercion that happened is carried back as a diagnostic note so callers
//! can log it.

use super::types::{ActionType, TaskType};

/// Result of canonicalizing a raw `(type, action_type)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedType {
    pub task_type: TaskType,
    pub action_type: Option<ActionType>,
    /// Present when the raw data was coerced rather than parsed cleanly.
    pub note: Option<String>,
}

/// Canonicalize raw type strings into the closed enumerations. Never fails.
///
/// - a `raw_type` that is actually an action-type string is reinterpreted
///   as an action task of that kind
/// - an unrecognized `raw_type` defaults to [`TaskType::Action`]
/// - an unrecognized `raw_action_type` resolves to absent
pub fn normalize(raw_type: &str, raw_action_type: Option<&str>) -> NormalizedType {
    // The model put an action kind in the task-type slot.
    if let Some(action) = ActionType::parse(raw_type) {
        return NormalizedType {
            task_type: TaskType::Action,
            action_type: Some(action),
            note: Some(format!(
                "task type {:?} is an action kind; reinterpreted as action/{}",
                raw_type, action
            )),
        };
    }

    let (task_type, type_note) = match TaskType::parse(raw_type) {
        Some(task_type) => (task_type, None),
        None => (
            TaskType::Action,
            Some(format!(
                "unknown task type {:?}; defaulting to action",
                raw_type
            )),
        ),
    };

    let action_type = raw_action_type.and_then(ActionType::parse);
    let action_note = match raw_action_type {
        Some(raw) if action_type.is_none() => {
            Some(format!("unknown action type {:?} dropped", raw))
        }
        _ => None,
    };

    NormalizedType {
        task_type,
        action_type,
        note: match (type_note, action_note) {
            (Some(a), Some(b)) => Some(format!("{}; {}", a, b)),
            (note, None) | (None, note) => note,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_in_type_slot_is_reinterpreted() {
        for action in ActionType::ALL {
            let normalized = normalize(action.as_str(), None);
            assert_eq!(normalized.task_type, TaskType::Action);
            assert_eq!(normalized.action_type, Some(action));
            assert!(normalized.note.is_some());
        }
    }

    #[test]
    fn test_valid_pair_passes_through_unchanged() {
        let normalized = normalize("assert", None);
        assert_eq!(normalized.task_type, TaskType::Assert);
        assert_eq!(normalized.action_type, None);
        assert_eq!(normalized.note, None);

        let normalized = normalize("action", Some("input"));
        assert_eq!(normalized.task_type, TaskType::Action);
        assert_eq!(normalized.action_type, Some(ActionType::Input));
        assert_eq!(normalized.note, None);
    }

    #[test]
    fn test_unknown_type_defaults_to_action() {
        for raw in ["verify", "do-something", "", "ACTION", "点击"] {
            let normalized = normalize(raw, None);
            assert_eq!(normalized.task_type, TaskType::Action);
            assert!(normalized.note.is_some());
        }
    }

    #[test]
    fn test_unknown_action_type_resolves_to_absent() {
        let normalized = normalize("action", Some("double-click"));
        assert_eq!(normalized.task_type, TaskType::Action);
        assert_eq!(normalized.action_type, None);
        assert!(normalized.note.unwrap().contains("double-click"));
    }

    #[test]
    fn test_action_slot_ignored_when_type_slot_held_the_action() {
        // "click" in the type slot wins; whatever sits in the action slot
        // is not consulted.
        let normalized = normalize("click", Some("garbage"));
        assert_eq!(normalized.task_type, TaskType::Action);
        assert_eq!(normalized.action_type, Some(ActionType::Click));
    }
}
