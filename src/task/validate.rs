//! Whole-sequence validation and the optimization extension point.

use super::task::TaskSequence;
use super::types::TaskType;

/// Check a sequence is executable as generated.
///
/// Fails when any task has an empty description, or any action task has
/// an empty target. The result is a single boolean; no per-task
/// diagnostics are produced.
pub fn is_valid(sequence: &TaskSequence) -> bool {
    for task in sequence.tasks() {
        if task.description.is_empty() {
            return false;
        }
        if task.task_type == TaskType::Action
            && task.target.as_deref().map_or(true, str::is_empty)
        {
            return false;
        }
    }
    true
}

/// Optimization pass over a generated sequence.
///
/// Currently a no-op pass-through. Candidate rewrites (merging adjacent
/// input tasks, inferring dependency edges, tuning wait timeouts) would
/// slot in here without touching the compiler.
pub fn optimize(sequence: TaskSequence) -> TaskSequence {
    sequence
}
