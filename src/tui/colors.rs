//! Color constants and badge color mappings for the terminal user interface.

use ratatui::style::Color;

use crate::models::{TaskPriority, TaskStatus};

// Badge colors for status and priority labels.

/// Used for medium priority.
pub const ORANGE: Color = Color::Rgb(255, 140, 0);
/// Used for pending status.
pub const GRAY: Color = Color::Rgb(128, 128, 128);

/// Three-way status color: completed is green, in progress blue, else gray.
pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Completed => Color::Green,
        TaskStatus::InProgress => Color::Blue,
        _ => GRAY,
    }
}

/// Three-way priority color: high is red, medium orange, else green.
pub fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::High => Color::Red,
        TaskPriority::Medium => ORANGE,
        _ => Color::Green,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_color_mapping() {
        assert_eq!(status_color(TaskStatus::Completed), Color::Green);
        assert_eq!(status_color(TaskStatus::InProgress), Color::Blue);
        assert_eq!(status_color(TaskStatus::Pending), GRAY);
    }

    #[test]
    fn priority_color_mapping() {
        assert_eq!(priority_color(TaskPriority::High), Color::Red);
        assert_eq!(priority_color(TaskPriority::Medium), ORANGE);
        assert_eq!(priority_color(TaskPriority::Low), Color::Green);
    }
}
