//! Statement IR for generated test scripts.
//!
//! Each task lowers to one or more statement nodes carrying literal
//! operands; nodes are flattened to script text only at the final step,
//! which keeps the per-task template logic testable without string
//! comparison against whole scripts and leaves room to swap the target
//! dialect.

use serde_json::Value;

/// Scroll options carried by a scroll statement.
///
/// Only `direction` and `scrollType` survive lowering; anything else in
/// the task's parameter mapping is dropped from the visible options
/// object.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollOptions {
    /// Both values were present on the task.
    Explicit { direction: Value, scroll_type: Value },
    /// Fixed fallback: down, once.
    Default,
}

/// One emitted script statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `// ...` line
    Comment(String),
    /// `await page.goto("...")`
    Goto { url: String },
    /// `await page.waitForLoadState("networkidle")`
    WaitForNetworkIdle,
    /// `await aiInput('value','target')`
    AiInput { value: String, target: String },
    /// `await aiTap('target')`
    AiTap { target: String },
    /// `await aiScroll(options[, 'target'])`
    AiScroll {
        options: ScrollOptions,
        target: Option<String>,
    },
    /// `const binding = await aiQuery<type>('query')` plus a diagnostic print
    AiQuery {
        binding: &'static str,
        return_type: String,
        query: String,
        description: String,
    },
    /// `await aiAssert('assertion'[, { timeoutMs: n }])`
    AiAssert {
        assertion: String,
        timeout_ms: Option<i64>,
    },
    /// `await aiWaitFor('condition', { timeoutMs: n })`
    AiWaitFor { condition: String, timeout_ms: i64 },
    /// Visible placeholder for a (type, action) pair with no template
    Unhandled { label: String, description: String },
}

impl Statement {
    /// Render this node as script text, indented for the test body.
    pub fn render(&self) -> String {
        match self {
            Statement::Comment(text) => format!("  // {}", text),
            Statement::Goto { url } => format!("  await page.goto(\"{}\");", url),
            Statement::WaitForNetworkIdle => {
                "  await page.waitForLoadState(\"networkidle\");".to_string()
            }
            Statement::AiInput { value, target } => {
                format!("  await aiInput('{}','{}');", value, target)
            }
            Statement::AiTap { target } => format!("  await aiTap('{}');", target),
            Statement::AiScroll { options, target } => match options {
                ScrollOptions::Explicit {
                    direction,
                    scroll_type,
                } => {
                    let options_literal = format!(
                        "{{\"direction\": {}, \"scrollType\": {}}}",
                        direction, scroll_type
                    );
                    match target {
                        Some(target) => {
                            format!("  await aiScroll({}, '{}');", options_literal, target)
                        }
                        None => format!("  await aiScroll({});", options_literal),
                    }
                }
                ScrollOptions::Default => {
                    "  await aiScroll({ direction: 'down', scrollType: 'once' });".to_string()
                }
            },
            Statement::AiQuery {
                binding,
                return_type,
                query,
                description,
            } => [
                format!("  const {} = await aiQuery<{}>(", binding, return_type),
                format!("    '{}'", query),
                "  );".to_string(),
                format!("  console.log('{}:', {});", description, binding),
            ]
            .join("\n"),
            Statement::AiAssert {
                assertion,
                timeout_ms,
            } => match timeout_ms {
                Some(timeout_ms) => format!(
                    "  await aiAssert('{}', {{ timeoutMs: {} }});",
                    assertion, timeout_ms
                ),
                None => format!("  await aiAssert('{}');", assertion),
            },
            Statement::AiWaitFor {
                condition,
                timeout_ms,
            } => format!(
                "  await aiWaitFor('{}', {{ timeoutMs: {} }});",
                condition, timeout_ms
            ),
            Statement::Unhandled { label, description } => {
                format!("  // TODO: unhandled task type '{}': {}", label, description)
            }
        }
    }
}

/// Pick the binding name for an extract task from its description.
///
/// Fixed-priority, case-insensitive keyword scan; the first matching
/// rule wins, and descriptions matching nothing get the generic name.
pub(crate) fn binding_name(description: &str) -> &'static str {
    const RULES: [(&[&str], &'static str); 3] = [
        (&["商品", "产品", "product", "goods"], "items"),
        (&["用户", "账户", "user", "account"], "userInfo"),
        (&["数据", "data"], "data"),
    ];

    let lower = description.to_lowercase();
    for (keywords, name) in RULES {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return name;
        }
    }
    "extractedData"
}
