//! Deterministic lowering of task sequences to test-script text.
//!
//! Dispatch is two-level: task type first, then action type for action
//! tasks. Navigation is handled at the sequence level — a goto plus a
//! network-idle wait — and never reaches the per-action dispatcher. A
//! combination with no template degrades to a visible placeholder
//! comment instead of failing the whole script.

use serde_json::Value;

use super::statement::{binding_name, ScrollOptions, Statement};
use crate::casegen::CaseConfig;
use crate::task::{ActionType, Task, TaskSequence, TaskType};

const DEFAULT_WAIT_TIMEOUT_MS: i64 = 10000;

/// Renders task sequences into executable spec files.
#[derive(Debug, Default)]
pub struct ScriptCompiler;

impl ScriptCompiler {
    pub fn new() -> Self {
        ScriptCompiler
    }

    /// Lower one task to its statement nodes.
    ///
    /// Navigation deliberately has no per-task template — the sequence
    /// scaffold owns it — so a navigate task compiled in isolation yields
    /// the placeholder marker.
    pub fn compile_task(&self, task: &Task) -> Vec<Statement> {
        match task.task_type {
            TaskType::Action => self.compile_action(task),
            TaskType::Extract => {
                let return_type = task
                    .parameters
                    .get("return_type")
                    .and_then(Value::as_str)
                    .unwrap_or("any")
                    .to_string();
                vec![Statement::AiQuery {
                    binding: binding_name(&task.description),
                    return_type,
                    query: task.target.clone().unwrap_or_default(),
                    description: task.description.clone(),
                }]
            }
            TaskType::Assert => {
                let timeout_ms = task
                    .parameters
                    .get("timeoutMs")
                    .map(|value| value.as_i64().unwrap_or(DEFAULT_WAIT_TIMEOUT_MS));
                vec![Statement::AiAssert {
                    assertion: task.target.clone().unwrap_or_default(),
                    timeout_ms,
                }]
            }
            TaskType::Wait => {
                let timeout_ms = task
                    .parameters
                    .get("timeoutMs")
                    .and_then(Value::as_i64)
                    .unwrap_or(DEFAULT_WAIT_TIMEOUT_MS);
                vec![Statement::AiWaitFor {
                    condition: task.target.clone().unwrap_or_default(),
                    timeout_ms,
                }]
            }
            TaskType::Locate => vec![Statement::Unhandled {
                label: TaskType::Locate.to_string(),
                description: task.description.clone(),
            }],
        }
    }

    fn compile_action(&self, task: &Task) -> Vec<Statement> {
        match task.action_type {
            Some(ActionType::Input) => vec![Statement::AiInput {
                value: task.value.clone().unwrap_or_default(),
                target: task.target.clone().unwrap_or_default(),
            }],
            Some(ActionType::Click) => vec![Statement::AiTap {
                target: task.target.clone().unwrap_or_default(),
            }],
            Some(ActionType::Scroll) => {
                // Only direction and scrollType make it into the options
                // literal; the fallback also drops the target.
                match (
                    task.parameters.get("direction"),
                    task.parameters.get("scrollType"),
                ) {
                    (Some(direction), Some(scroll_type)) => vec![Statement::AiScroll {
                        options: ScrollOptions::Explicit {
                            direction: direction.clone(),
                            scroll_type: scroll_type.clone(),
                        },
                        target: task.target.clone(),
                    }],
                    _ => vec![Statement::AiScroll {
                        options: ScrollOptions::Default,
                        target: None,
                    }],
                }
            }
            Some(other) => vec![Statement::Unhandled {
                label: other.to_string(),
                description: task.description.clone(),
            }],
            None => vec![Statement::Unhandled {
                label: TaskType::Action.to_string(),
                description: task.description.clone(),
            }],
        }
    }

    /// Render a whole sequence into a spec file.
    pub fn compile_sequence(&self, sequence: &TaskSequence, config: &CaseConfig) -> String {
        let mut lines = vec![
            "import { expect } from \"@playwright/test\";".to_string(),
            "import { test } from \"./fixture\";".to_string(),
            String::new(),
            "test.beforeEach(async ({ page }) => {".to_string(),
            format!("  await page.goto(\"{}\");", config.base_url),
            "  await page.waitForLoadState(\"networkidle\");".to_string(),
        ];
        for action in &config.setup_actions {
            lines.push(format!("  {}", action));
        }
        lines.push("});".to_string());
        lines.push(String::new());

        if !config.teardown_actions.is_empty() {
            lines.push("test.afterEach(async ({ page }) => {".to_string());
            for action in &config.teardown_actions {
                lines.push(format!("  {}", action));
            }
            lines.push("});".to_string());
            lines.push(String::new());
        }

        lines.push(format!("test(\"{}\", async ({{", config.name));
        lines.extend(
            [
                "  ai,",
                "  aiQuery,",
                "  aiAssert,",
                "  aiInput,",
                "  aiTap,",
                "  aiScroll,",
                "  aiWaitFor,",
                "  aiHover,",
                "  aiKeyboardPress,",
                "  page",
                "}) => {",
            ]
            .map(str::to_string),
        );
        lines.push(format!("  // {}", config.description));

        for (index, task) in sequence.tasks().iter().enumerate() {
            if index > 0 {
                lines.push(String::new());
            }
            lines.push(Statement::Comment(task.description.clone()).render());

            // Navigation bypasses the per-action dispatch entirely.
            if task.action_type == Some(ActionType::Navigate) {
                lines.push(
                    Statement::Goto {
                        url: task.target.clone().unwrap_or_default(),
                    }
                    .render(),
                );
                lines.push(Statement::WaitForNetworkIdle.render());
            } else {
                for statement in self.compile_task(task) {
                    lines.push(statement.render());
                }
            }
        }

        lines.push("});".to_string());
        lines.join("\n")
    }
}
