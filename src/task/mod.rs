//! Task intermediate representation between decomposition and code
//! generation.
//!
//! `types` holds the closed task/action vocabularies, `task` the typed
//! Task/TaskSequence values and the id source, `normalize` the recovery
//! coercion for raw model output, and `validate` the whole-sequence
//! check plus the (currently pass-through) optimization hook.

mod normalize;
mod task;
mod types;
pub mod validate;

pub use normalize::{normalize, NormalizedType};
pub use task::{IdSequence, Provenance, SequenceMetadata, Task, TaskContext, TaskSequence};
pub use types::{ActionType, TaskType};
