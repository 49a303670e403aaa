//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    TaskList,
    TaskDetail,
    AddTask,
    EditTask,
    AddComment,
    EditComment,
    Help,
    Confirm,
}

/// Pending destructive action awaiting confirmation.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ConfirmAction {
    DeleteTask(i64),
    DeleteComment(i64),
}

impl ConfirmAction {
    /// Human-readable description shown in the confirmation dialog.
    pub fn describe(&self) -> String {
        match self {
            ConfirmAction::DeleteTask(id) => {
                format!("Delete task #{id} and all its comments")
            }
            ConfirmAction::DeleteComment(id) => format!("Delete comment #{id}"),
        }
    }
}
