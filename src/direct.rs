//! Direct-call mapping: the AI-free authoring path.
//!
//! Builds the same Task IR as decomposition, but from a fixed catalog of
//! structured calls (`aiInput`, `aiTap`, ...) so tests can be authored
//! deterministically. Each catalog entry produces one task with a
//! templated description.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::task::{
    ActionType, IdSequence, Provenance, SequenceMetadata, Task, TaskContext, TaskSequence,
    TaskType,
};

/// The closed method catalog, in dispatch order.
pub const SUPPORTED_METHODS: [&str; 9] = [
    "aiInput",
    "aiTap",
    "aiScroll",
    "aiAssert",
    "aiQuery",
    "aiWaitFor",
    "aiHover",
    "aiKeyboardPress",
    "pageGoto",
];

/// One structured call: method name, positional args, keyword args.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSpec {
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: HashMap<String, Value>,
}

/// Errors from the direct-call path.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("unsupported method {method:?}; supported methods: {supported}")]
    UnsupportedMethod { method: String, supported: String },

    #[error("invalid arguments for {method}: {reason}")]
    InvalidArguments {
        method: &'static str,
        reason: String,
    },
}

impl MapperError {
    fn unsupported(method: &str) -> Self {
        MapperError::UnsupportedMethod {
            method: method.to_string(),
            supported: SUPPORTED_METHODS.join(", "),
        }
    }
}

/// Maps structured calls onto tasks through the fixed catalog.
///
/// Owns its own id sequences; use a fresh mapper per authoring session.
#[derive(Debug)]
pub struct DirectCallMapper {
    task_ids: IdSequence,
    sequence_ids: IdSequence,
}

impl DirectCallMapper {
    pub fn new() -> Self {
        Self {
            task_ids: IdSequence::tasks(),
            sequence_ids: IdSequence::sequences(),
        }
    }

    /// Dispatch one call through the catalog.
    ///
    /// # Errors
    /// [`MapperError::UnsupportedMethod`] (listing the whole catalog) for
    /// a method outside it; [`MapperError::InvalidArguments`] when the
    /// positional args do not fit the entry.
    pub fn map(
        &mut self,
        method: &str,
        args: &[Value],
        kwargs: &HashMap<String, Value>,
    ) -> Result<Task, MapperError> {
        match method {
            "aiInput" => self.ai_input(args, kwargs),
            "aiTap" => self.ai_tap(args, kwargs),
            "aiScroll" => self.ai_scroll(args, kwargs),
            "aiAssert" => self.ai_assert(args, kwargs),
            "aiQuery" => self.ai_query(args, kwargs),
            "aiWaitFor" => self.ai_wait_for(args, kwargs),
            "aiHover" => self.ai_hover(args, kwargs),
            "aiKeyboardPress" => self.ai_keyboard_press(args, kwargs),
            "pageGoto" => self.page_goto(args, kwargs),
            other => Err(MapperError::unsupported(other)),
        }
    }

    /// Map a batch of calls, in order, into one sequence.
    ///
    /// # Errors
    /// Fails on the first unmappable call; nothing is emitted for a
    /// partially-valid batch.
    pub fn map_batch(
        &mut self,
        calls: &[CallSpec],
        context: &TaskContext,
    ) -> Result<TaskSequence, MapperError> {
        let mut tasks = Vec::with_capacity(calls.len());
        for call in calls {
            tasks.push(self.map(&call.method, &call.args, &call.kwargs)?);
        }

        let metadata = SequenceMetadata {
            model_name: None,
            task_count: tasks.len(),
            source: Provenance::SingleCalls,
        };
        let description = format!("sequence of {} tasks", tasks.len());
        Ok(TaskSequence::new(
            self.sequence_ids.next_id(),
            description,
            tasks,
            context.clone(),
            metadata,
        ))
    }

    fn ai_input(
        &mut self,
        args: &[Value],
        kwargs: &HashMap<String, Value>,
    ) -> Result<Task, MapperError> {
        let target = string_arg("aiInput", args, 0, "target")?;
        let value = string_arg("aiInput", args, 1, "value")?;
        Ok(Task {
            id: self.task_ids.next_id(),
            task_type: TaskType::Action,
            description: format!("type {} into {}", value, target),
            target: Some(target),
            value: Some(value),
            action_type: Some(ActionType::Input),
            parameters: kwargs.clone(),
            priority: 0,
            dependencies: vec![],
        })
    }

    fn ai_tap(
        &mut self,
        args: &[Value],
        kwargs: &HashMap<String, Value>,
    ) -> Result<Task, MapperError> {
        let target = string_arg("aiTap", args, 0, "target")?;
        Ok(Task {
            id: self.task_ids.next_id(),
            task_type: TaskType::Action,
            description: format!("click {}", target),
            target: Some(target),
            value: None,
            action_type: Some(ActionType::Click),
            parameters: kwargs.clone(),
            priority: 0,
            dependencies: vec![],
        })
    }

    fn ai_scroll(
        &mut self,
        args: &[Value],
        kwargs: &HashMap<String, Value>,
    ) -> Result<Task, MapperError> {
        let options = object_arg("aiScroll", args, 0, "options")?;
        let target = optional_string_arg("aiScroll", args, 1, "target")?;

        let direction = options
            .get("direction")
            .and_then(Value::as_str)
            .unwrap_or("down");
        let scroll_type = options
            .get("scrollType")
            .and_then(Value::as_str)
            .unwrap_or("once");

        let mut description = format!("scroll {}", direction);
        if let Some(target) = &target {
            description.push_str(&format!(" to {}", target));
        }
        if scroll_type != "once" {
            description.push_str(&format!(" ({})", scroll_type));
        }

        // Scroll options and keyword args share one parameter mapping.
        let mut parameters: HashMap<String, Value> = options.into_iter().collect();
        parameters.extend(kwargs.clone());

        Ok(Task {
            id: self.task_ids.next_id(),
            task_type: TaskType::Action,
            description,
            target,
            value: None,
            action_type: Some(ActionType::Scroll),
            parameters,
            priority: 0,
            dependencies: vec![],
        })
    }

    fn ai_assert(
        &mut self,
        args: &[Value],
        kwargs: &HashMap<String, Value>,
    ) -> Result<Task, MapperError> {
        let assertion = string_arg("aiAssert", args, 0, "assertion")?;
        Ok(Task {
            id: self.task_ids.next_id(),
            task_type: TaskType::Assert,
            description: format!("assert {}", assertion),
            target: Some(assertion),
            value: None,
            action_type: None,
            parameters: kwargs.clone(),
            priority: 0,
            dependencies: vec![],
        })
    }

    fn ai_query(
        &mut self,
        args: &[Value],
        kwargs: &HashMap<String, Value>,
    ) -> Result<Task, MapperError> {
        let query = string_arg("aiQuery", args, 0, "query")?;
        let return_type = optional_string_arg("aiQuery", args, 1, "return_type")?;

        let mut parameters = kwargs.clone();
        if let Some(return_type) = return_type {
            parameters.insert("return_type".to_string(), Value::String(return_type));
        }

        Ok(Task {
            id: self.task_ids.next_id(),
            task_type: TaskType::Extract,
            description: format!("extract data: {}", query),
            target: Some(query),
            value: None,
            action_type: None,
            parameters,
            priority: 0,
            dependencies: vec![],
        })
    }

    fn ai_wait_for(
        &mut self,
        args: &[Value],
        kwargs: &HashMap<String, Value>,
    ) -> Result<Task, MapperError> {
        let condition = string_arg("aiWaitFor", args, 0, "condition")?;

        // Wait options arrive positionally or as an "options" keyword;
        // either way their entries are folded into the parameter mapping.
        let mut parameters = kwargs.clone();
        let options = match args.get(1) {
            Some(Value::Null) => None,
            Some(_) => Some(object_arg("aiWaitFor", args, 1, "options")?),
            None => match parameters.remove("options") {
                Some(Value::Object(map)) => Some(map),
                Some(other) => {
                    return Err(MapperError::InvalidArguments {
                        method: "aiWaitFor",
                        reason: format!("options must be an object, got {}", other),
                    })
                }
                None => None,
            },
        };
        if let Some(options) = options {
            parameters.extend(options);
        }

        Ok(Task {
            id: self.task_ids.next_id(),
            task_type: TaskType::Wait,
            description: format!("wait for {}", condition),
            target: Some(condition),
            value: None,
            action_type: None,
            parameters,
            priority: 0,
            dependencies: vec![],
        })
    }

    fn ai_hover(
        &mut self,
        args: &[Value],
        kwargs: &HashMap<String, Value>,
    ) -> Result<Task, MapperError> {
        let target = string_arg("aiHover", args, 0, "target")?;
        Ok(Task {
            id: self.task_ids.next_id(),
            task_type: TaskType::Action,
            description: format!("hover over {}", target),
            target: Some(target),
            value: None,
            action_type: Some(ActionType::Hover),
            parameters: kwargs.clone(),
            priority: 0,
            dependencies: vec![],
        })
    }

    fn ai_keyboard_press(
        &mut self,
        args: &[Value],
        kwargs: &HashMap<String, Value>,
    ) -> Result<Task, MapperError> {
        let keys = string_arg("aiKeyboardPress", args, 0, "keys")?;
        let target = optional_string_arg("aiKeyboardPress", args, 1, "target")?;

        let mut description = format!("press {}", keys);
        if let Some(target) = &target {
            description.push_str(&format!(" on {}", target));
        }

        Ok(Task {
            id: self.task_ids.next_id(),
            task_type: TaskType::Action,
            description,
            target,
            value: Some(keys),
            action_type: Some(ActionType::Keyboard),
            parameters: kwargs.clone(),
            priority: 0,
            dependencies: vec![],
        })
    }

    fn page_goto(
        &mut self,
        args: &[Value],
        kwargs: &HashMap<String, Value>,
    ) -> Result<Task, MapperError> {
        let url = string_arg("pageGoto", args, 0, "url")?;
        Ok(Task {
            id: self.task_ids.next_id(),
            task_type: TaskType::Action,
            description: format!("navigate to {}", url),
            target: Some(url),
            value: None,
            action_type: Some(ActionType::Navigate),
            parameters: kwargs.clone(),
            priority: 0,
            dependencies: vec![],
        })
    }
}

impl Default for DirectCallMapper {
    fn default() -> Self {
        Self::new()
    }
}

fn string_arg(
    method: &'static str,
    args: &[Value],
    index: usize,
    name: &str,
) -> Result<String, MapperError> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(MapperError::InvalidArguments {
            method,
            reason: format!("{} must be a string, got {}", name, other),
        }),
        None => Err(MapperError::InvalidArguments {
            method,
            reason: format!("missing argument {}", name),
        }),
    }
}

fn optional_string_arg(
    method: &'static str,
    args: &[Value],
    index: usize,
    name: &str,
) -> Result<Option<String>, MapperError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => string_arg(method, args, index, name).map(Some),
    }
}

fn object_arg(
    method: &'static str,
    args: &[Value],
    index: usize,
    name: &str,
) -> Result<serde_json::Map<String, Value>, MapperError> {
    match args.get(index) {
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(MapperError::InvalidArguments {
            method,
            reason: format!("{} must be an object, got {}", name, other),
        }),
        None => Err(MapperError::InvalidArguments {
            method,
            reason: format!("missing argument {}", name),
        }),
    }
}
