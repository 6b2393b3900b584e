//! Prompt templates for the decomposition calls.

use crate::task::TaskContext;

/// System prompt for compound-instruction decomposition.
///
/// Spells out the closed type vocabularies and the output shape; the
/// response is expected to be a JSON array of task records, possibly
/// wrapped in prose that the parser strips off.
pub const DECOMPOSE_SYSTEM_PROMPT: &str = r#"You are an expert at parsing UI automation test instructions. Decompose the user's natural-language instruction into concrete operation steps.

Task types (use only these five):
- locate: find a page element
- extract: read data off the page
- assert: verify page state
- wait: wait for a load or state change
- action: perform an operation (click, input, scroll, navigate, and every other concrete operation)

Action types (only for the action_type field of action tasks):
- click: click, select, press a control
- input: type or fill in text
- scroll: scroll or page through content
- hover: move the mouse over an element
- keyboard: press a key or key combination
- navigate: open, visit or jump to a URL

Important rules:
1. Every concrete operation, including navigation, uses "action" as its type.
2. Navigation is the combination "action" + "navigate".
3. Never use "navigate" as a task type; it is only an action type.

Decompose the instruction into a JSON array of task objects, each with:
- type: task type (one of the five above)
- description: what the step does
- target: target element or URL (when applicable)
- value: input value (when applicable)
- action_type: operation kind (for action tasks)
- parameters: extra parameters

Example input: "open example.com, type hello into the search box, click the search button, check that results are shown"
Example output:
[
  {
    "type": "action",
    "description": "open the example.com home page",
    "target": "https://example.com",
    "action_type": "navigate"
  },
  {
    "type": "action",
    "description": "type hello into the search box",
    "target": "search box",
    "value": "hello",
    "action_type": "input"
  },
  {
    "type": "action",
    "description": "click the search button",
    "target": "search button",
    "action_type": "click"
  },
  {
    "type": "assert",
    "description": "check that search results are shown",
    "target": "search results list"
  }
]"#;

/// System prompt for the step splitter.
///
/// A much simpler ask than full decomposition: break a paragraph into an
/// ordered list of step strings, returned as a JSON array so the response
/// can be validated by shape alone.
pub const SPLIT_STEPS_SYSTEM_PROMPT: &str = r#"Your job is to split a paragraph into its individual steps and output them as a JSON array of strings, one element per step.

Proceed as follows:
1. Read the paragraph carefully and identify each independent step.
2. Add each step to the array as a string, in order.

Example input: open the example.com home page, type "hello" into the search box, click the search button, wait for the results to load, read the result list and print it
Example output:
["open the example.com home page","type hello into the search box","click the search button","wait for the results to load","read the result list","print the result list"]"#;

/// Render the user prompt for compound-instruction decomposition.
///
/// Absent context fields render as "unknown"; an empty action history
/// renders as "none".
pub fn decompose_user_prompt(instruction: &str, context: &TaskContext) -> String {
    let page_url = context.page_url.as_deref().unwrap_or("unknown");
    let page_title = context.page_title.as_deref().unwrap_or("unknown");
    let previous_actions = if context.previous_actions.is_empty() {
        "none".to_string()
    } else {
        context.previous_actions.join(", ")
    };

    format!(
        "Decompose the following instruction: \"{}\"\n\n\
         Context:\n\
         - page URL: {}\n\
         - page title: {}\n\
         - previous actions: {}\n\n\
         Return the task list as a JSON array.",
        instruction, page_url, page_title, previous_actions
    )
}

/// Render the user prompt for the step splitter.
pub fn split_steps_user_prompt(natural_language: &str) -> String {
    format!("Split the following instruction: {}", natural_language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_context_fields_render_as_unknown() {
        let prompt = decompose_user_prompt("open example.com", &TaskContext::default());
        assert!(prompt.contains("page URL: unknown"));
        assert!(prompt.contains("page title: unknown"));
        assert!(prompt.contains("previous actions: none"));
    }

    #[test]
    fn test_previous_actions_join_with_separator() {
        let context = TaskContext {
            page_url: Some("https://example.com".to_string()),
            previous_actions: vec!["opened home page".to_string(), "logged in".to_string()],
            ..TaskContext::default()
        };
        let prompt = decompose_user_prompt("search for hello", &context);
        assert!(prompt.contains("page URL: https://example.com"));
        assert!(prompt.contains("opened home page, logged in"));
    }
}
