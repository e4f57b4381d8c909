//! Project task rules.

use crate::error::CoreError;
use crate::status::{TaskPriority, TaskStatus};
use crate::types::Timestamp;

pub const MAX_TASK_TITLE_LEN: usize = 200;
pub const MAX_COMMENT_LEN: usize = 4000;

/// Number of tasks in "recent tasks" lists.
pub const RECENT_TASKS: i64 = 10;
/// Number of recent tasks embedded in task statistics.
pub const STATS_RECENT_TASKS: i64 = 5;

/// A task is overdue when its due date has passed and it is still open.
pub fn is_overdue(due: Option<Timestamp>, status: TaskStatus, now: Timestamp) -> bool {
    !matches!(status, TaskStatus::Completed | TaskStatus::Cancelled)
        && due.is_some_and(|d| d < now)
}

pub fn is_high_priority(priority: TaskPriority) -> bool {
    priority >= TaskPriority::High
}

/// Completion timestamp after a status change.
///
/// Entering `Completed` stamps `now` unless already stamped; leaving it
/// clears the stamp.
pub fn completed_at_after(
    new_status: TaskStatus,
    current: Option<Timestamp>,
    now: Timestamp,
) -> Option<Timestamp> {
    match new_status {
        TaskStatus::Completed => current.or(Some(now)),
        _ => None,
    }
}

/// Completed tasks as a percentage of all tasks; 0 when there are none.
pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

pub fn validate_task_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Task title is required".into()));
    }
    if trimmed.chars().count() > MAX_TASK_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Task title must be at most {MAX_TASK_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_comment(comment: &str) -> Result<(), CoreError> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Comment cannot be empty".into()));
    }
    if trimmed.chars().count() > MAX_COMMENT_LEN {
        return Err(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(())
}
