//! # casewright
//!
//! Compiles natural-language UI test descriptions into Midscene/Playwright
//! test scripts.
//!
//! The pipeline is a two-stage compiler. The decomposition stage asks a
//! language model to break an instruction into atomic automation tasks and
//! coerces its loosely-structured answer into a typed task IR; the
//! code-generation stage lowers that IR deterministically into literal
//! script statements.
//!
//! ```text
//! instruction + context
//!        │
//!        ▼
//! ┌──────────────────┐     ┌─────────────────┐
//! │ InstructionParser│────▶│ RetryingInvoker │──▶ model service
//! │  (decompose)     │     │  (ModelGateway) │
//! └────────┬─────────┘     └─────────────────┘
//!          │ raw task records
//!          ▼
//! ┌──────────────────┐     ┌─────────────────┐
//! │ TaskBuilder      │◀────│ normalize()     │
//! │  (task IR)       │     └─────────────────┘
//! └────────┬─────────┘
//!          │ TaskSequence          DirectCallMapper
//!          ▼                       (model-free path, same IR)
//! ┌──────────────────┐
//! │ ScriptCompiler   │──▶ spec file text ──▶ ScriptStore
//! └──────────────────┘
//! ```
//!
//! ## Modules
//! - `llm`: model gateway, transport errors, validation-driven retry
//! - `decompose`: prompts, decomposition, step splitting, keyword hints
//! - `task`: the task IR, type normalization, sequence validation
//! - `direct`: the AI-free structured-call authoring path
//! - `compile`: statement IR and script scaffolding
//! - `casegen`: batch test-case generation over both paths
//! - `store`: spec-file persistence and filename sanitization

pub mod casegen;
pub mod compile;
pub mod config;
pub mod decompose;
pub mod direct;
pub mod llm;
pub mod store;
pub mod task;

pub use casegen::{BatchOutcome, CaseConfig, CaseGenerator, CaseInput, CaseOutcome, CaseRequest};
pub use compile::ScriptCompiler;
pub use config::Config;
pub use direct::{CallSpec, DirectCallMapper};
pub use llm::{ModelGateway, OpenAiClient, RetryingInvoker};
pub use task::{ActionType, Task, TaskContext, TaskSequence, TaskType};
