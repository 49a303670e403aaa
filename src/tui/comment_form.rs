//! Comment form handling for the terminal user interface.
//!
//! Mirrors the task form: a local draft, field ordering, synchronous
//! validation, plus a busy flag so a submission in flight cannot be
//! re-entered.

use crate::models::{is_valid_email, Comment, CommentPatch, NewComment};
use crate::tui::input::InputField;

/// Global order constants for comment form fields.
pub const AUTHOR_FIELD: usize = 0;
pub const EMAIL_FIELD: usize = 1;
pub const CONTENT_FIELD: usize = 2;

/// Comment form holding the draft of the editable fields.
pub struct CommentForm {
    pub author_name: InputField,
    pub author_email: InputField,
    pub content: InputField,
    pub current_field: usize,
    /// Set while a submission is in flight; blocks re-entry.
    pub submitting: bool,
}

impl CommentForm {
    /// Create an empty form.
    pub fn new() -> Self {
        CommentForm {
            author_name: InputField::new(),
            author_email: InputField::new(),
            content: InputField::new(),
            current_field: 0,
            submitting: false,
        }
    }

    /// Create a form seeded with an existing comment's current values.
    pub fn from_comment(comment: &Comment) -> Self {
        let mut form = Self::new();
        form.author_name = InputField::with_value(&comment.author_name);
        form.author_email =
            InputField::with_value(comment.author_email.as_deref().unwrap_or(""));
        form.content = InputField::with_value(&comment.content);
        form
    }

    pub fn field_count(&self) -> usize {
        3
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
        self.author_name.active = self.current_field == AUTHOR_FIELD;
        self.author_email.active = self.current_field == EMAIL_FIELD;
        self.content.active = self.current_field == CONTENT_FIELD;
    }

    fn field_mut(&mut self) -> &mut InputField {
        match self.current_field {
            AUTHOR_FIELD => &mut self.author_name,
            EMAIL_FIELD => &mut self.author_email,
            _ => &mut self.content,
        }
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        self.field_mut().handle_char(c);
    }

    /// Insert a line break into the content field.
    pub fn handle_newline(&mut self) {
        if self.current_field == CONTENT_FIELD {
            self.content.handle_char('\n');
        }
    }

    /// Handle backspace input for the currently active field.
    pub fn handle_backspace(&mut self) {
        self.field_mut().handle_backspace();
    }

    /// Handle delete input for the currently active field.
    pub fn handle_delete(&mut self) {
        self.field_mut().handle_delete();
    }

    /// Handle left/right arrow keys for cursor movement.
    pub fn handle_left_right(&mut self, right: bool) {
        let field = self.field_mut();
        if right {
            field.move_cursor_right();
        } else {
            field.move_cursor_left();
        }
    }

    /// Run field-level validation, recording a message per offending field.
    /// Returns true when the draft is submittable.
    pub fn validate(&mut self) -> bool {
        if self.content.is_blank() {
            self.content.error = Some("Content is required".to_string());
        }
        if self.author_name.is_blank() {
            self.author_name.error = Some("Author name is required".to_string());
        }
        if !self.author_email.is_blank() && !is_valid_email(self.author_email.trimmed()) {
            self.author_email.error = Some("Invalid email format".to_string());
        }
        !self.has_errors()
    }

    /// Whether any field currently carries a validation error.
    pub fn has_errors(&self) -> bool {
        self.content.error.is_some()
            || self.author_name.error.is_some()
            || self.author_email.error.is_some()
    }

    /// The draft as a creation payload for the given task.
    pub fn draft(&self, task_id: i64) -> NewComment {
        NewComment {
            content: self.content.trimmed().to_string(),
            author_name: self.author_name.trimmed().to_string(),
            author_email: self.author_email.opt(),
            task_id,
        }
    }

    /// The draft as an update payload. The form edits the full field set,
    /// so every field is sent.
    pub fn patch(&self) -> CommentPatch {
        CommentPatch {
            content: Some(self.content.trimmed().to_string()),
            author_name: Some(self.author_name.trimmed().to_string()),
            author_email: Some(self.author_email.trimmed().to_string()),
        }
    }

    /// Reset the draft to the initial empty values. Used after a create-mode
    /// submission succeeds; the form stays mounted for the next comment.
    pub fn reset(&mut self) {
        let current = self.current_field;
        *self = Self::new();
        self.current_field = current;
        self.update_active_field();
    }
}

impl Default for CommentForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> CommentForm {
        let mut form = CommentForm::new();
        form.author_name = InputField::with_value("Ada");
        form.content = InputField::with_value("Looks good");
        form
    }

    #[test]
    fn content_author_and_empty_email_validate() {
        let mut form = filled_form();
        assert!(form.validate());
        let draft = form.draft(7);
        assert_eq!(draft.author_name, "Ada");
        assert_eq!(draft.task_id, 7);
        assert!(draft.author_email.is_none());
    }

    #[test]
    fn malformed_email_blocks_submission() {
        let mut form = filled_form();
        form.author_email = InputField::with_value("foo");
        assert!(!form.validate());
        assert_eq!(
            form.author_email.error.as_deref(),
            Some("Invalid email format")
        );
    }

    #[test]
    fn all_violations_are_collected_in_one_pass() {
        let mut form = CommentForm::new();
        form.author_email = InputField::with_value("not-an-email");
        assert!(!form.validate());
        assert!(form.content.error.is_some());
        assert!(form.author_name.error.is_some());
        assert!(form.author_email.error.is_some());
    }

    #[test]
    fn fixing_one_field_leaves_other_errors_intact() {
        let mut form = CommentForm::new();
        assert!(!form.validate());
        form.current_field = AUTHOR_FIELD;
        form.handle_char('A');
        assert!(form.author_name.error.is_none());
        assert!(form.content.error.is_some());
    }

    #[test]
    fn reset_returns_to_empty_initial_values() {
        let mut form = filled_form();
        form.reset();
        assert!(form.content.value.is_empty());
        assert!(form.author_name.value.is_empty());
        assert!(!form.submitting);
    }

    #[test]
    fn newline_only_lands_in_content() {
        let mut form = CommentForm::new();
        form.current_field = AUTHOR_FIELD;
        form.handle_newline();
        assert!(form.author_name.value.is_empty());
        form.current_field = CONTENT_FIELD;
        form.handle_newline();
        assert_eq!(form.content.value, "\n");
    }
}
