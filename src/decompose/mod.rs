//! Instruction-decomposition stage: natural language in, task IR out.
//!
//! `parser` talks to the model and extracts raw task records, `generator`
//! turns them into typed sequences, `splitter` handles the simpler
//! paragraph-to-steps call, and `hint` offers a model-free keyword
//! classifier for single instructions.

mod generator;
mod hint;
mod parser;
mod prompt;
mod splitter;

pub use generator::{SequenceGenerator, TaskBuilder};
pub use hint::{hint_action_type, hint_task_type};
pub use parser::{DecomposeError, InstructionParser, RawTask};
pub use prompt::{
    decompose_user_prompt, split_steps_user_prompt, DECOMPOSE_SYSTEM_PROMPT,
    SPLIT_STEPS_SYSTEM_PROMPT,
};
pub use splitter::StepSplitter;
