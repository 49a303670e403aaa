//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure for creating and editing
//! tasks in the TUI: a local draft of the editable fields, field ordering,
//! and synchronous validation.

use crate::models::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
use crate::tui::input::InputField;

/// Global order constants for task form fields.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const STATUS_FIELD: usize = 2;
pub const PRIORITY_FIELD: usize = 3;

/// Task form holding the draft of the editable fields.
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub status: usize,
    pub priority: usize,
    pub current_field: usize,
    pub statuses: Vec<TaskStatus>,
    pub priorities: Vec<TaskPriority>,
}

impl TaskForm {
    /// Create an empty form with the default status and priority.
    pub fn new() -> Self {
        TaskForm {
            title: InputField::new(),
            description: InputField::new(),
            status: 0,   // Pending
            priority: 1, // Medium
            current_field: 0,
            statuses: vec![
                TaskStatus::Pending,
                TaskStatus::InProgress,
                TaskStatus::Completed,
            ],
            priorities: vec![TaskPriority::Low, TaskPriority::Medium, TaskPriority::High],
        }
    }

    /// Create a form seeded with an existing task's current values.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self::new();
        form.title = InputField::with_value(&task.title);
        form.description = InputField::with_value(task.description.as_deref().unwrap_or(""));
        form.status = form
            .statuses
            .iter()
            .position(|&s| s == task.status)
            .unwrap_or(0);
        form.priority = form
            .priorities
            .iter()
            .position(|&p| p == task.priority)
            .unwrap_or(1);
        form
    }

    /// Total number of fields (text fields + selectors).
    pub fn field_count(&self) -> usize {
        4
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.field_count();
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            self.field_count() - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    /// Update which field is currently active for editing.
    pub fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
        self.description.active = self.current_field == DESCRIPTION_FIELD;
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_char(c),
            DESCRIPTION_FIELD => self.description.handle_char(c),
            _ => {}
        }
    }

    /// Handle backspace input for the currently active field.
    pub fn handle_backspace(&mut self) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_backspace(),
            DESCRIPTION_FIELD => self.description.handle_backspace(),
            _ => {}
        }
    }

    /// Handle delete input for the currently active field.
    pub fn handle_delete(&mut self) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_delete(),
            DESCRIPTION_FIELD => self.description.handle_delete(),
            _ => {}
        }
    }

    /// Handle left/right arrow keys for cursor movement or selector changes.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            TITLE_FIELD => {
                if right {
                    self.title.move_cursor_right()
                } else {
                    self.title.move_cursor_left()
                }
            }
            DESCRIPTION_FIELD => {
                if right {
                    self.description.move_cursor_right()
                } else {
                    self.description.move_cursor_left()
                }
            }
            STATUS_FIELD => {
                if right {
                    self.status = (self.status + 1) % self.statuses.len();
                } else {
                    self.status = if self.status == 0 {
                        self.statuses.len() - 1
                    } else {
                        self.status - 1
                    };
                }
            }
            PRIORITY_FIELD => {
                if right {
                    self.priority = (self.priority + 1) % self.priorities.len();
                } else {
                    self.priority = if self.priority == 0 {
                        self.priorities.len() - 1
                    } else {
                        self.priority - 1
                    };
                }
            }
            _ => {}
        }
    }

    /// Run field-level validation, recording a message per offending field.
    /// Returns true when the draft is submittable.
    pub fn validate(&mut self) -> bool {
        if self.title.is_blank() {
            self.title.error = Some("Title is required".to_string());
        }
        !self.has_errors()
    }

    /// Whether any field currently carries a validation error.
    pub fn has_errors(&self) -> bool {
        self.title.error.is_some() || self.description.error.is_some()
    }

    /// The draft as a creation payload.
    pub fn draft(&self) -> NewTask {
        NewTask {
            title: self.title.trimmed().to_string(),
            description: self.description.opt(),
            status: self.statuses[self.status],
            priority: self.priorities[self.priority],
        }
    }

    /// The draft as an update payload. The form edits the full field set,
    /// so every field is sent.
    pub fn patch(&self) -> TaskPatch {
        TaskPatch {
            title: Some(self.title.trimmed().to_string()),
            description: Some(self.description.trimmed().to_string()),
            status: Some(self.statuses[self.status]),
            priority: Some(self.priorities[self.priority]),
        }
    }

    /// Reset the draft to the initial empty values. Used after a create-mode
    /// submission succeeds.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_blocks_submission_with_field_error() {
        let mut form = TaskForm::new();
        form.current_field = DESCRIPTION_FIELD;
        form.update_active_field();
        form.handle_char('x');
        assert!(!form.validate());
        assert_eq!(form.title.error.as_deref(), Some("Title is required"));
    }

    #[test]
    fn whitespace_only_title_is_still_required() {
        let mut form = TaskForm::new();
        form.handle_char(' ');
        assert!(!form.validate());
    }

    #[test]
    fn valid_form_produces_draft_with_defaults() {
        let mut form = TaskForm::new();
        for c in "Fix bug".chars() {
            form.handle_char(c);
        }
        assert!(form.validate());
        let draft = form.draft();
        assert_eq!(draft.title, "Fix bug");
        assert!(draft.description.is_none());
        assert_eq!(draft.status, TaskStatus::Pending);
        assert_eq!(draft.priority, TaskPriority::Medium);
    }

    #[test]
    fn editing_the_errored_field_clears_only_its_error() {
        let mut form = TaskForm::new();
        assert!(!form.validate());
        form.description.error = Some("some other error".to_string());
        form.current_field = TITLE_FIELD;
        form.handle_char('a');
        assert!(form.title.error.is_none());
        assert_eq!(form.description.error.as_deref(), Some("some other error"));
    }

    #[test]
    fn selectors_cycle_in_both_directions() {
        let mut form = TaskForm::new();
        form.current_field = STATUS_FIELD;
        form.handle_left_right(true);
        assert_eq!(form.statuses[form.status], TaskStatus::InProgress);
        form.handle_left_right(false);
        form.handle_left_right(false);
        assert_eq!(form.statuses[form.status], TaskStatus::Completed);
    }

    #[test]
    fn from_task_seeds_current_values() {
        use chrono::NaiveDateTime;
        let ts = NaiveDateTime::parse_from_str("2024-01-01T00:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let task = Task {
            id: 1,
            title: "Existing".into(),
            description: Some("body".into()),
            status: TaskStatus::Completed,
            priority: TaskPriority::High,
            created_at: ts,
            updated_at: ts,
            comments_count: 0,
        };
        let form = TaskForm::from_task(&task);
        assert_eq!(form.title.value, "Existing");
        assert_eq!(form.description.value, "body");
        assert_eq!(form.statuses[form.status], TaskStatus::Completed);
        assert_eq!(form.priorities[form.priority], TaskPriority::High);
    }
}
