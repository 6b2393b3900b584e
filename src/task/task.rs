//! Task intermediate representation.
//!
//! # Invariants
//! - Task ids are unique and strictly increasing within one id sequence
//! - A [`TaskSequence`] owns its tasks and context; nothing mutates a
//!   sequence after construction

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{ActionType, TaskType};

/// Environment a sequence was generated under.
///
/// Supplied by the caller, read-only to the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskContext {
    /// Current page URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,

    /// Current page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,

    /// Descriptions of actions already performed, oldest first
    #[serde(default)]
    pub previous_actions: Vec<String>,

    /// Free-form state mapping
    #[serde(default)]
    pub current_state: HashMap<String, Value>,
}

/// One atomic automation task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Session-unique identifier, `task_NNNN`
    pub id: String,

    /// Task kind
    #[serde(rename = "type")]
    pub task_type: TaskType,

    /// Human-readable description, also emitted as a script comment
    pub description: String,

    /// Element reference, or destination URL for navigation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Value carried by the operation (e.g. text to type)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Operation kind, set only on action tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,

    /// Open parameter mapping
    #[serde(default)]
    pub parameters: HashMap<String, Value>,

    /// Stored but not currently acted on
    #[serde(default)]
    pub priority: i64,

    /// Ids of tasks this one depends on; recorded, not enforced
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Monotonic identifier source, `prefix_NNNN` starting at 1.
///
/// Owned by exactly one builder; a fresh generation session gets a fresh
/// sequence, which is what guarantees id uniqueness. Not designed for
/// concurrent sharing.
#[derive(Debug)]
pub struct IdSequence {
    prefix: &'static str,
    next: u32,
}

impl IdSequence {
    /// Id source for tasks (`task_0001`, `task_0002`, ...).
    pub fn tasks() -> Self {
        Self::with_prefix("task")
    }

    /// Id source for sequences (`sequence_0001`, ...).
    pub fn sequences() -> Self {
        Self::with_prefix("sequence")
    }

    fn with_prefix(prefix: &'static str) -> Self {
        Self { prefix, next: 0 }
    }

    /// Produce the next identifier. Never reuses a value for the life of
    /// this instance.
    pub fn next_id(&mut self) -> String {
        self.next += 1;
        format!("{}_{:04}", self.prefix, self.next)
    }
}

/// Where a sequence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Parsed out of natural language by the model
    AiParsing,
    /// Built from a direct structured-call batch
    SingleCalls,
}

/// Metadata recorded on every sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceMetadata {
    /// Model that produced the decomposition, absent for direct calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Number of tasks at construction time
    pub task_count: usize,

    /// Provenance tag
    pub source: Provenance,
}

/// An ordered task list plus the context it was generated under.
///
/// Execution order is list order. Created once per decomposition or
/// direct-call batch and immutable afterwards; consumers only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSequence {
    id: String,
    description: String,
    tasks: Vec<Task>,
    context: TaskContext,
    metadata: SequenceMetadata,
}

impl TaskSequence {
    pub fn new(
        id: String,
        description: String,
        tasks: Vec<Task>,
        context: TaskContext,
        metadata: SequenceMetadata,
    ) -> Self {
        Self {
            id,
            description,
            tasks,
            context,
            metadata,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn context(&self) -> &TaskContext {
        &self.context
    }

    pub fn metadata(&self) -> &SequenceMetadata {
        &self.metadata
    }

    /// Replace the description, consuming the sequence.
    ///
    /// Direct-call batches get a generic description; the case generator
    /// swaps in the configured one before compiling.
    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_sequence_format_and_monotonicity() {
        let mut ids = IdSequence::tasks();
        assert_eq!(ids.next_id(), "task_0001");
        assert_eq!(ids.next_id(), "task_0002");

        let mut seq_ids = IdSequence::sequences();
        assert_eq!(seq_ids.next_id(), "sequence_0001");
    }

    #[test]
    fn test_task_serialization_shape() {
        let task = Task {
            id: "task_0001".to_string(),
            task_type: TaskType::Action,
            description: "click the search button".to_string(),
            target: Some("search button".to_string()),
            value: None,
            action_type: Some(ActionType::Click),
            parameters: HashMap::new(),
            priority: 0,
            dependencies: vec![],
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["type"], "action");
        assert_eq!(json["action_type"], "click");
        assert!(json.get("value").is_none());
    }

    #[test]
    fn test_sequence_round_trips_through_json() {
        let sequence = TaskSequence::new(
            "sequence_0001".to_string(),
            "demo".to_string(),
            vec![],
            TaskContext::default(),
            SequenceMetadata {
                model_name: Some("test-model".to_string()),
                task_count: 0,
                source: Provenance::AiParsing,
            },
        );
        let json = serde_json::to_string(&sequence).unwrap();
        let back: TaskSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), "sequence_0001");
        assert_eq!(back.metadata().source, Provenance::AiParsing);
        assert!(json.contains("\"ai_parsing\""));
    }
}
