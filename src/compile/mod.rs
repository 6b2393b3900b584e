//! Code-generation stage: task IR in, script text out.

mod script;
mod statement;

pub use script::ScriptCompiler;
pub use statement::{ScrollOptions, Statement};
