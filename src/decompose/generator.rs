//! Raw-record to Task construction and sequence assembly.

use tracing::{debug, info};

use super::parser::{DecomposeError, InstructionParser, RawTask};
use crate::llm::ModelGateway;
use crate::task::{
    normalize, IdSequence, Provenance, SequenceMetadata, Task, TaskContext, TaskSequence,
};

/// Turns raw task records into typed [`Task`]s with session-scoped ids.
///
/// One builder per generation session; the id sequences it owns are what
/// make the produced identifiers unique.
#[derive(Debug)]
pub struct TaskBuilder {
    task_ids: IdSequence,
    sequence_ids: IdSequence,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self {
            task_ids: IdSequence::tasks(),
            sequence_ids: IdSequence::sequences(),
        }
    }

    /// Build one task from a raw record.
    ///
    /// Types are canonicalized through the normalizer; every other field
    /// is copied verbatim with empty-collection defaults.
    pub fn build_task(&mut self, raw: &RawTask) -> Task {
        let raw_type = raw.task_type.as_deref().unwrap_or("action");
        let normalized = normalize(raw_type, raw.action_type.as_deref());
        if let Some(note) = &normalized.note {
            debug!(%note, "coerced raw task types");
        }

        Task {
            id: self.task_ids.next_id(),
            task_type: normalized.task_type,
            description: raw.description.clone().unwrap_or_default(),
            target: raw.target.clone(),
            value: raw.value.clone(),
            action_type: normalized.action_type,
            parameters: raw.parameters.clone(),
            priority: raw.priority.unwrap_or(0),
            dependencies: raw.dependencies.clone(),
        }
    }

    /// Assemble records into a sequence tagged as model-parsed.
    pub fn build_sequence(
        &mut self,
        instruction: &str,
        records: &[RawTask],
        context: &TaskContext,
        model_name: &str,
    ) -> TaskSequence {
        let tasks: Vec<Task> = records.iter().map(|raw| self.build_task(raw)).collect();
        let metadata = SequenceMetadata {
            model_name: Some(model_name.to_string()),
            task_count: tasks.len(),
            source: Provenance::AiParsing,
        };
        TaskSequence::new(
            self.sequence_ids.next_id(),
            instruction.to_string(),
            tasks,
            context.clone(),
            metadata,
        )
    }
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// End-to-end natural-language generation: decompose, normalize, build.
pub struct SequenceGenerator<G> {
    parser: InstructionParser<G>,
    builder: TaskBuilder,
}

impl<G: ModelGateway> SequenceGenerator<G> {
    pub fn new(parser: InstructionParser<G>) -> Self {
        Self {
            parser,
            builder: TaskBuilder::new(),
        }
    }

    /// Decompose `instruction` and assemble the resulting task sequence.
    ///
    /// # Errors
    /// Surfaces gateway and parse failures as [`DecomposeError`].
    pub async fn generate(
        &mut self,
        instruction: &str,
        context: &TaskContext,
    ) -> Result<TaskSequence, DecomposeError> {
        let records = self.parser.decompose(instruction, context).await?;
        let sequence =
            self.builder
                .build_sequence(instruction, &records, context, self.parser.model_name());
        info!(
            sequence_id = sequence.id(),
            task_count = sequence.tasks().len(),
            "generated task sequence from instruction"
        );
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::parser::extract_task_records;
    use crate::task::{ActionType, TaskType};

    const RESPONSE: &str = r#"[
        {"type": "action", "description": "open the page", "target": "https://example.com", "action_type": "navigate"},
        {"type": "input", "description": "type hello", "target": "search box", "value": "hello"},
        {"type": "made-up", "description": "do something odd"},
        {"type": "assert", "description": "check results", "target": "results list", "priority": 2, "dependencies": ["task_0002"]}
    ]"#;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let records = extract_task_records(RESPONSE).unwrap();
        let mut builder = TaskBuilder::new();
        let tasks: Vec<_> = records.iter().map(|r| builder.build_task(r)).collect();

        let ids: Vec<_> = tasks.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, ["task_0001", "task_0002", "task_0003", "task_0004"]);
    }

    #[test]
    fn test_swapped_type_slot_is_recovered() {
        let records = extract_task_records(RESPONSE).unwrap();
        let mut builder = TaskBuilder::new();
        let task = builder.build_task(&records[1]);
        assert_eq!(task.task_type, TaskType::Action);
        assert_eq!(task.action_type, Some(ActionType::Input));
        assert_eq!(task.value.as_deref(), Some("hello"));
    }

    #[test]
    fn test_unknown_type_defaults_to_action() {
        let records = extract_task_records(RESPONSE).unwrap();
        let mut builder = TaskBuilder::new();
        let task = builder.build_task(&records[2]);
        assert_eq!(task.task_type, TaskType::Action);
        assert_eq!(task.action_type, None);
    }

    #[test]
    fn test_verbatim_field_copy() {
        let records = extract_task_records(RESPONSE).unwrap();
        let mut builder = TaskBuilder::new();
        let task = builder.build_task(&records[3]);
        assert_eq!(task.priority, 2);
        assert_eq!(task.dependencies, ["task_0002"]);
        assert_eq!(task.target.as_deref(), Some("results list"));
    }

    #[test]
    fn test_two_fresh_builders_agree() {
        let records = extract_task_records(RESPONSE).unwrap();
        let mut first = TaskBuilder::new();
        let mut second = TaskBuilder::new();
        let a: Vec<_> = records.iter().map(|r| first.build_task(r)).collect();
        let b: Vec<_> = records.iter().map(|r| second.build_task(r)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sequence_metadata() {
        let records = extract_task_records(RESPONSE).unwrap();
        let mut builder = TaskBuilder::new();
        let sequence = builder.build_sequence(
            "open the page and search",
            &records,
            &TaskContext::default(),
            "test-model",
        );
        assert_eq!(sequence.id(), "sequence_0001");
        assert_eq!(sequence.metadata().task_count, 4);
        assert_eq!(sequence.metadata().source, Provenance::AiParsing);
        assert_eq!(sequence.metadata().model_name.as_deref(), Some("test-model"));
        assert_eq!(sequence.description(), "open the page and search");
    }
}
