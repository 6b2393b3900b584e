//! Keyword-based type hinting for single instructions.
//!
//! A cheap, model-free classifier: regex keyword tables (English and
//! Chinese) map one instruction to an action or task type. Action
//! patterns are consulted first; the first matching table entry wins.
//! Useful for routing a lone instruction without a decomposition
//! round-trip, and as a sanity signal next to model output.

use std::sync::LazyLock;

use regex::Regex;

use crate::task::{ActionType, TaskType};

static ACTION_PATTERNS: LazyLock<Vec<(ActionType, Regex)>> = LazyLock::new(|| {
    [
        (ActionType::Input, "输入|填写|填入|键入|input|type|fill"),
        (ActionType::Click, "点击|单击|按|选择|click|tap|press|select"),
        (ActionType::Scroll, "滚动|翻页|下拉|上拉|scroll|swipe"),
        (ActionType::Hover, "悬停|鼠标悬停|移动到|hover|mouseover"),
        (ActionType::Keyboard, "按键|快捷键|键盘|keyboard|key|shortcut"),
        (
            ActionType::Navigate,
            "导航|跳转|访问|打开|navigate|goto|visit|open",
        ),
    ]
    .into_iter()
    .map(|(action, pattern)| (action, Regex::new(pattern).unwrap()))
    .collect()
});

static TASK_PATTERNS: LazyLock<Vec<(TaskType, Regex)>> = LazyLock::new(|| {
    [
        (
            TaskType::Wait,
            "等待?.*?(加载|完成|出现|消失)|wait.*?(load|complete|appear|disappear)",
        ),
        (
            TaskType::Assert,
            "验证|校验|检查|确认|断言|确保|保证|verify|validate|check|assert|ensure",
        ),
        (
            TaskType::Extract,
            "获取|提取|读取|查看|抓取|extract|get|fetch|retrieve|obtain",
        ),
    ]
    .into_iter()
    .map(|(task, pattern)| (task, Regex::new(pattern).unwrap()))
    .collect()
});

/// Hint the operation kind of a single instruction.
pub fn hint_action_type(instruction: &str) -> Option<ActionType> {
    let lower = instruction.to_lowercase();
    ACTION_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&lower))
        .map(|(action, _)| *action)
}

/// Hint the task kind of a single instruction.
///
/// Any action-pattern match classifies the instruction as an action
/// task; otherwise the wait/assert/extract tables are consulted.
pub fn hint_task_type(instruction: &str) -> Option<TaskType> {
    let lower = instruction.to_lowercase();
    if ACTION_PATTERNS
        .iter()
        .any(|(_, pattern)| pattern.is_match(&lower))
    {
        return Some(TaskType::Action);
    }
    TASK_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&lower))
        .map(|(task, _)| *task)
}
