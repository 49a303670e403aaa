//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the authoritative
//! task and comment collections, talks to the backend through the API
//! client, and coordinates between the different screens (task list,
//! detail view, forms, dialogs).

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::api::ApiClient;
use crate::models::{format_priority, format_status, format_timestamp, Comment, Task};
use crate::tui::{
    colors::{priority_color, status_color},
    comment_form::CommentForm,
    enums::{AppState, ConfirmAction},
    input::InputField,
    notify::{Notifier, NotifyKind},
    task_form::{TaskForm, PRIORITY_FIELD, STATUS_FIELD},
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
///
/// Owns the authoritative in-memory collections: all tasks, and the
/// comments of the task currently open in the detail view. Comments are
/// discarded when leaving the detail view and re-fetched on re-entry.
pub struct App {
    state: AppState,
    api: ApiClient,
    notifier: Notifier,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
    task_list_state: TableState,
    comment_index: usize,
    selected_task: Option<i64>,
    editing_comment: Option<i64>,
    task_form: TaskForm,
    new_comment_form: CommentForm,
    edit_comment_form: CommentForm,
    tasks_error: Option<String>,
    comments_error: Option<String>,
    loading: bool,
    pending_create: bool,
    confirm_action: Option<ConfirmAction>,
    status_message: String,
}

impl App {
    /// Create a new App. The notifier is injected by the composition root.
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        App {
            state: AppState::TaskList,
            api,
            notifier,
            tasks: Vec::new(),
            comments: Vec::new(),
            task_list_state: TableState::default(),
            comment_index: 0,
            selected_task: None,
            editing_comment: None,
            task_form: TaskForm::new(),
            new_comment_form: CommentForm::new(),
            edit_comment_form: CommentForm::new(),
            tasks_error: None,
            comments_error: None,
            loading: false,
            pending_create: false,
            confirm_action: None,
            status_message: String::new(),
        }
    }

    /// Get a reference to the currently selected task.
    fn get_selected_task(&self) -> Option<&Task> {
        self.selected_task.and_then(|id| self.tasks.iter().find(|t| t.id == id))
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Fix the table selection after the collection changed.
    fn clamp_task_selection(&mut self) {
        if self.tasks.is_empty() {
            self.task_list_state.select(None);
        } else {
            match self.task_list_state.selected() {
                Some(i) if i >= self.tasks.len() => {
                    self.task_list_state.select(Some(self.tasks.len() - 1));
                }
                None => self.task_list_state.select(Some(0)),
                _ => {}
            }
        }
    }

    fn clamp_comment_selection(&mut self) {
        if self.comments.is_empty() {
            self.comment_index = 0;
        } else if self.comment_index >= self.comments.len() {
            self.comment_index = self.comments.len() - 1;
        }
    }

    // --- collection reconciliation -------------------------------------
    //
    // Task mutations splice the collection locally; comment mutations
    // re-fetch the whole collection instead. The asymmetry is observed
    // behavior of the system this client talks to and is kept as-is.

    /// Splice a freshly created task into the collection, prepended.
    pub fn task_created(&mut self, task: Task) {
        self.tasks.insert(0, task);
        self.clamp_task_selection();
    }

    /// Replace the matching task in place by identifier.
    pub fn task_updated(&mut self, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }

    /// Remove exactly the task with the matching identifier.
    pub fn task_removed(&mut self, id: i64) {
        self.tasks.retain(|t| t.id != id);
        if self.selected_task == Some(id) {
            self.selected_task = None;
        }
        self.clamp_task_selection();
    }

    // --- backend calls --------------------------------------------------

    /// Fetch and replace the whole task collection.
    pub fn load_tasks(&mut self) {
        self.loading = true;
        self.tasks_error = None;
        match self.api.list_tasks() {
            Ok(tasks) => {
                self.tasks = tasks;
                self.clamp_task_selection();
            }
            Err(e) => {
                let msg = e.user_message();
                self.tasks_error = Some(msg.clone());
                self.notifier.error(msg);
            }
        }
        self.loading = false;
    }

    /// Fetch and replace the comment collection for the selected task.
    fn load_comments(&mut self) {
        let Some(task_id) = self.selected_task else {
            return;
        };
        self.comments_error = None;
        match self.api.comments_by_task(task_id) {
            Ok(resp) => {
                self.comments = resp.comments;
                self.clamp_comment_selection();
            }
            Err(e) => {
                let msg = e.user_message();
                self.comments_error = Some(msg.clone());
                self.notifier.error(msg);
            }
        }
    }

    /// Stage the task form for submission. The request itself runs from the
    /// event loop, so a frame with the loading flag set is drawn first.
    fn begin_create_task(&mut self) {
        if !self.task_form.validate() {
            return;
        }
        self.loading = true;
        self.pending_create = true;
        self.state = AppState::TaskList;
    }

    /// Submit the staged task draft. On failure the form comes back with
    /// its draft intact.
    fn submit_pending_create(&mut self) {
        self.pending_create = false;
        match self.api.create_task(&self.task_form.draft()) {
            Ok(task) => {
                self.task_created(task);
                self.task_form.reset();
                self.notifier.success("Task created successfully!");
            }
            Err(e) => {
                let msg = e.user_message();
                self.tasks_error = Some(msg.clone());
                self.notifier.error(msg);
                self.state = AppState::AddTask;
            }
        }
        self.loading = false;
    }

    /// Submit the task form in edit mode.
    fn update_task(&mut self) {
        if !self.task_form.validate() {
            return;
        }
        let Some(task_id) = self.selected_task else {
            return;
        };
        match self.api.update_task(task_id, &self.task_form.patch()) {
            Ok(task) => {
                self.task_updated(task);
                self.selected_task = None;
                self.state = AppState::TaskList;
                self.notifier.success("Task updated successfully!");
            }
            Err(e) => {
                let msg = e.user_message();
                self.tasks_error = Some(msg.clone());
                self.notifier.error(msg);
            }
        }
    }

    fn delete_task(&mut self, id: i64) {
        match self.api.delete_task(id) {
            Ok(()) => {
                self.task_removed(id);
                self.notifier.success("Task deleted successfully!");
            }
            Err(e) => {
                let msg = e.user_message();
                self.tasks_error = Some(msg.clone());
                self.notifier.error(msg);
            }
        }
    }

    /// Re-fetch the selected task so its denormalized comment count stays
    /// fresh after a comment mutation.
    fn refresh_selected_task(&mut self) {
        let Some(task_id) = self.selected_task else {
            return;
        };
        match self.api.get_task(task_id) {
            Ok(task) => self.task_updated(task),
            Err(e) => {
                let msg = e.user_message();
                self.tasks_error = Some(msg.clone());
                self.notifier.error(msg);
            }
        }
    }

    /// Submit the comment form in create mode. Re-fetches the comment
    /// collection and the owning task so its comment count stays fresh.
    fn create_comment(&mut self) {
        if self.new_comment_form.submitting {
            return;
        }
        if !self.new_comment_form.validate() {
            return;
        }
        let Some(task_id) = self.selected_task else {
            return;
        };
        self.new_comment_form.submitting = true;
        match self.api.create_comment(&self.new_comment_form.draft(task_id)) {
            Ok(_) => {
                self.load_comments();
                self.refresh_selected_task();
                self.new_comment_form.reset();
                self.state = AppState::TaskDetail;
                self.notifier.success("Comment added");
            }
            Err(e) => {
                let msg = e.user_message();
                self.comments_error = Some(msg.clone());
                self.notifier.error(msg);
            }
        }
        self.new_comment_form.submitting = false;
    }

    /// Submit the comment form in edit mode, then re-fetch the collection.
    fn update_comment(&mut self) {
        if self.edit_comment_form.submitting {
            return;
        }
        if !self.edit_comment_form.validate() {
            return;
        }
        let Some(comment_id) = self.editing_comment else {
            return;
        };
        self.edit_comment_form.submitting = true;
        match self.api.update_comment(comment_id, &self.edit_comment_form.patch()) {
            Ok(_) => {
                self.load_comments();
                self.editing_comment = None;
                self.state = AppState::TaskDetail;
                self.notifier.success("Comment updated");
            }
            Err(e) => {
                let msg = e.user_message();
                self.comments_error = Some(msg.clone());
                self.notifier.error(msg);
            }
        }
        self.edit_comment_form.submitting = false;
    }

    fn delete_comment(&mut self, id: i64) {
        match self.api.delete_comment(id) {
            Ok(()) => {
                self.load_comments();
                self.refresh_selected_task();
                self.notifier.success("Comment deleted");
            }
            Err(e) => {
                let msg = e.user_message();
                self.comments_error = Some(msg.clone());
                self.notifier.error(msg);
            }
        }
    }

    // --- input handling -------------------------------------------------

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> io::Result<bool> {
        match key {
            KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected > 0 {
                        self.task_list_state.select(Some(selected - 1));
                    }
                } else if !self.tasks.is_empty() {
                    self.task_list_state.select(Some(0));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected + 1 < self.tasks.len() {
                        self.task_list_state.select(Some(selected + 1));
                    }
                } else if !self.tasks.is_empty() {
                    self.task_list_state.select(Some(0));
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if let Some(task) = self.tasks.get(selected) {
                        self.selected_task = Some(task.id);
                        self.comment_index = 0;
                        self.state = AppState::TaskDetail;
                        self.load_comments();
                    }
                }
            }
            KeyCode::Char('a') => {
                self.task_form = TaskForm::new();
                self.task_form.update_active_field();
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if let Some(task) = self.tasks.get(selected) {
                        self.selected_task = Some(task.id);
                        self.task_form = TaskForm::from_task(task);
                        self.task_form.update_active_field();
                        self.state = AppState::EditTask;
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if let Some(task) = self.tasks.get(selected) {
                        self.confirm_action = Some(ConfirmAction::DeleteTask(task.id));
                        self.state = AppState::Confirm;
                    }
                }
            }
            KeyCode::Char('r') => {
                self.load_tasks();
                self.set_status_message("Tasks reloaded".to_string());
            }
            KeyCode::Char('x') => {
                self.tasks_error = None;
                self.notifier.dismiss();
            }
            KeyCode::Char('h') => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input when viewing task details.
    fn handle_detail_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => {
                // Comments are not cached beyond the mounted view.
                self.comments.clear();
                self.comments_error = None;
                self.selected_task = None;
                self.state = AppState::TaskList;
            }
            KeyCode::Up => {
                if self.comment_index > 0 {
                    self.comment_index -= 1;
                }
            }
            KeyCode::Down => {
                if self.comment_index + 1 < self.comments.len() {
                    self.comment_index += 1;
                }
            }
            KeyCode::Char('n') => {
                // Create form keeps its draft between visits; it only
                // resets after a successful submission.
                self.new_comment_form.update_active_field();
                self.state = AppState::AddComment;
            }
            KeyCode::Char('e') => {
                if let Some(comment) = self.comments.get(self.comment_index) {
                    self.editing_comment = Some(comment.id);
                    self.edit_comment_form = CommentForm::from_comment(comment);
                    self.edit_comment_form.update_active_field();
                    self.state = AppState::EditComment;
                }
            }
            KeyCode::Char('d') => {
                if let Some(comment) = self.comments.get(self.comment_index) {
                    self.confirm_action = Some(ConfirmAction::DeleteComment(comment.id));
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('r') => {
                self.load_comments();
                self.set_status_message("Comments reloaded".to_string());
            }
            KeyCode::Char('x') => {
                self.comments_error = None;
                self.notifier.dismiss();
            }
            KeyCode::Char('h') => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input when in the task creation or editing form.
    fn handle_task_form_input(
        &mut self,
        key: KeyCode,
        _modifiers: KeyModifiers,
        is_edit: bool,
    ) -> io::Result<bool> {
        match key {
            KeyCode::Esc => {
                self.selected_task = None;
                self.state = AppState::TaskList;
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => {
                if is_edit {
                    self.update_task();
                } else {
                    self.begin_create_task();
                }
            }
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input when in a comment form.
    fn handle_comment_form_input(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
        is_edit: bool,
    ) -> io::Result<bool> {
        let form = if is_edit {
            &mut self.edit_comment_form
        } else {
            &mut self.new_comment_form
        };
        match key {
            KeyCode::Esc => {
                self.editing_comment = None;
                self.state = AppState::TaskDetail;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => form.handle_left_right(false),
            KeyCode::Right => form.handle_left_right(true),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Enter if modifiers.contains(KeyModifiers::ALT) => form.handle_newline(),
            KeyCode::Enter => {
                if is_edit {
                    self.update_comment();
                } else {
                    self.create_comment();
                }
            }
            KeyCode::Char(c) => form.handle_char(c),
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input in the confirmation dialog.
    fn handle_confirm_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                match self.confirm_action.take() {
                    Some(ConfirmAction::DeleteTask(id)) => {
                        self.delete_task(id);
                        self.state = AppState::TaskList;
                    }
                    Some(ConfirmAction::DeleteComment(id)) => {
                        self.delete_comment(id);
                        self.state = AppState::TaskDetail;
                    }
                    None => self.state = AppState::TaskList,
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = match self.confirm_action.take() {
                    Some(ConfirmAction::DeleteComment(_)) => AppState::TaskDetail,
                    _ => AppState::TaskList,
                };
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input when viewing the help screen.
    fn handle_help_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => {
                self.state = if self.selected_task.is_some() {
                    AppState::TaskDetail
                } else {
                    AppState::TaskList
                };
            }
            _ => {}
        }
        Ok(false)
    }

    /// Poll for and handle keyboard events based on current application state.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        self.notifier.tick();

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.clear_status_message();

                let should_quit = match self.state {
                    AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers)?,
                    AppState::TaskDetail => self.handle_detail_input(key.code, key.modifiers)?,
                    AppState::AddTask => {
                        self.handle_task_form_input(key.code, key.modifiers, false)?
                    }
                    AppState::EditTask => {
                        self.handle_task_form_input(key.code, key.modifiers, true)?
                    }
                    AppState::AddComment => {
                        self.handle_comment_form_input(key.code, key.modifiers, false)?
                    }
                    AppState::EditComment => {
                        self.handle_comment_form_input(key.code, key.modifiers, true)?
                    }
                    AppState::Help => self.handle_help_input(key.code, key.modifiers)?,
                    AppState::Confirm => self.handle_confirm_input(key.code, key.modifiers)?,
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    // --- rendering --------------------------------------------------------

    /// Render a dismissible error banner, returning the remaining area.
    fn render_error_banner(&self, f: &mut Frame, area: Rect, error: &str) -> Rect {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        let banner = Paragraph::new(format!("{error}  (x to dismiss)"))
            .style(Style::default().fg(Color::White).bg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title("Error"));
        f.render_widget(banner, chunks[0]);
        chunks[1]
    }

    /// Render the main task list view.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let header_text = vec![Line::from(vec![
            Span::styled("TASKDECK", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("Tasks ({})", self.tasks.len()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, chunks[0]);

        let mut body = chunks[1];
        if let Some(error) = self.tasks_error.clone() {
            body = self.render_error_banner(f, body, &error);
        }

        if self.loading {
            let loading = Paragraph::new("Loading tasks...")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center);
            f.render_widget(loading, body);
            return;
        }

        if self.tasks.is_empty() {
            let empty = Paragraph::new("No tasks yet. Create your first task! (press 'a')")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center);
            f.render_widget(empty, body);
            return;
        }

        let header_cells = ["ID", "Status", "Priority", "Comments", "Created", "Title"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .tasks
            .iter()
            .map(|task| {
                Row::new(vec![
                    Cell::from(task.id.to_string()),
                    Cell::from(format_status(task.status))
                        .style(Style::default().fg(status_color(task.status))),
                    Cell::from(format_priority(task.priority))
                        .style(Style::default().fg(priority_color(task.priority))),
                    Cell::from(task.comments_count.to_string()),
                    Cell::from(format_timestamp(task.created_at)),
                    Cell::from(task.title.clone()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Length(12),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(17),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        f.render_stateful_widget(table, body, &mut self.task_list_state);
    }

    /// Render the task detail view with its comment thread.
    fn render_task_detail(&mut self, f: &mut Frame, area: Rect) {
        let Some(task) = self.get_selected_task().cloned() else {
            let missing = Paragraph::new("Task no longer exists. Press Esc to go back.")
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(missing, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(area);

        let mut detail_lines = vec![
            Line::from(vec![Span::styled(
                task.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![
                Span::raw("Status: "),
                Span::styled(
                    format_status(task.status),
                    Style::default().fg(status_color(task.status)),
                ),
                Span::raw("   Priority: "),
                Span::styled(
                    format_priority(task.priority),
                    Style::default().fg(priority_color(task.priority)),
                ),
            ]),
            Line::from(format!(
                "Created: {}   Updated: {}",
                format_timestamp(task.created_at),
                format_timestamp(task.updated_at)
            )),
        ];
        if let Some(desc) = &task.description {
            detail_lines.push(Line::from(desc.clone()));
        }
        let detail = Paragraph::new(detail_lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Task #{}", task.id)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(detail, chunks[0]);

        let mut body = chunks[1];
        if let Some(error) = self.comments_error.clone() {
            body = self.render_error_banner(f, body, &error);
        }

        let mut lines: Vec<Line> = Vec::new();
        if self.comments.is_empty() {
            lines.push(Line::from("No comments yet. Be the first to comment! (press 'n')"));
        }
        for (i, comment) in self.comments.iter().enumerate() {
            let marker = if i == self.comment_index { "> " } else { "  " };
            let header_style = if i == self.comment_index {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let email = comment
                .author_email
                .as_deref()
                .map(|e| format!(" ({e})"))
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{}{email}", comment.author_name), header_style),
                Span::raw("  "),
                Span::styled(
                    format_timestamp(comment.created_at),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            // One paragraph per embedded line break.
            for paragraph in comment.paragraphs() {
                lines.push(Line::from(format!("    {paragraph}")));
            }
            if comment.is_edited() {
                lines.push(Line::from(Span::styled(
                    format!("    Updated: {}", format_timestamp(comment.updated_at)),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            }
            lines.push(Line::from(""));
        }

        let comments = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Comments ({})", self.comments.len())),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(comments, body);
    }

    fn input_block<'a>(title: &'a str, field: &InputField) -> Block<'a> {
        let style = if field.active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(style)
    }

    /// Render an input field with its validation error beneath, when any.
    fn render_input(&self, f: &mut Frame, area: Rect, title: &str, field: &InputField) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);
        let input = Paragraph::new(field.value.as_str()).block(Self::input_block(title, field));
        f.render_widget(input, chunks[0]);
        if let Some(error) = &field.error {
            let error_line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
            f.render_widget(error_line, chunks[1]);
        }
        if field.active && !field.value.contains('\n') {
            f.set_cursor_position((chunks[0].x + field.cursor_column() as u16 + 1, chunks[0].y + 1));
        }
    }

    fn render_selector(f: &mut Frame, area: Rect, title: &str, value: &str, active: bool) {
        let style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let selector = Paragraph::new(format!("< {value} >")).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(style),
        );
        f.render_widget(selector, area);
    }

    /// Render the task creation/editing form.
    fn render_task_form(&mut self, f: &mut Frame, area: Rect, is_edit: bool) {
        let title = if is_edit { "Edit Task" } else { "Add Task" };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        self.render_input(f, chunks[0], "Title *", &self.task_form.title);
        self.render_input(f, chunks[1], "Description", &self.task_form.description);
        Self::render_selector(
            f,
            chunks[2],
            "Status",
            format_status(self.task_form.statuses[self.task_form.status]),
            self.task_form.current_field == STATUS_FIELD,
        );
        Self::render_selector(
            f,
            chunks[3],
            "Priority",
            format_priority(self.task_form.priorities[self.task_form.priority]),
            self.task_form.current_field == PRIORITY_FIELD,
        );

        let action = if is_edit { "save" } else { "create" };
        let instructions = Paragraph::new(format!(
            "Tab/Up/Down: navigate   Left/Right: cursor/selectors   Enter: {action}   Esc: cancel"
        ))
        .block(Block::default().borders(Borders::ALL).title("Instructions"));
        f.render_widget(instructions, chunks[4]);
    }

    /// Render the comment creation/editing form.
    fn render_comment_form(&mut self, f: &mut Frame, area: Rect, is_edit: bool) {
        let form = if is_edit {
            &self.edit_comment_form
        } else {
            &self.new_comment_form
        };
        let title = if is_edit { "Edit Comment" } else { "Add Comment" };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(7),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        self.render_input(f, chunks[0], "Name *", &form.author_name);
        self.render_input(f, chunks[1], "Email (optional)", &form.author_email);

        // Content is multiline; render paragraphs and the error manually.
        let content_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Length(1)])
            .split(chunks[2]);
        let content = Paragraph::new(form.content.value.as_str())
            .block(Self::input_block("Comment *", &form.content))
            .wrap(Wrap { trim: false });
        f.render_widget(content, content_chunks[0]);
        if let Some(error) = &form.content.error {
            let error_line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
            f.render_widget(error_line, content_chunks[1]);
        }

        let submit_hint = if form.submitting {
            "Submitting..."
        } else if is_edit {
            "Enter: save   Alt+Enter: new line   Esc: cancel"
        } else {
            "Enter: add comment   Alt+Enter: new line   Esc: back"
        };
        let instructions = Paragraph::new(submit_hint)
            .block(Block::default().borders(Borders::ALL).title("Instructions"));
        f.render_widget(instructions, chunks[3]);
    }

    /// Render the help screen with keyboard shortcuts.
    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(vec![Span::styled(
                "Taskdeck Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Task List:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  Up/Down      Navigate tasks"),
            Line::from("  Enter/Space  View task details and comments"),
            Line::from("  a            Add new task"),
            Line::from("  e            Edit selected task"),
            Line::from("  d            Delete selected task (with its comments)"),
            Line::from("  r            Reload tasks from the backend"),
            Line::from("  x            Dismiss the error banner"),
            Line::from("  q/Esc        Quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Task Detail:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  Up/Down      Navigate comments"),
            Line::from("  n            Add a comment"),
            Line::from("  e            Edit selected comment"),
            Line::from("  d            Delete selected comment"),
            Line::from("  r            Reload comments"),
            Line::from("  Esc/q        Back to task list"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Forms:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  Tab/Up/Down  Navigate between fields"),
            Line::from("  Left/Right   Move cursor / change selectors"),
            Line::from("  Enter        Submit"),
            Line::from("  Alt+Enter    New line (comment text)"),
            Line::from("  Esc          Cancel and return"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press Esc to return"),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render a confirmation dialog for destructive actions.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Red).fg(Color::White));

        let area = centered_rect(50, 25, area);
        f.render_widget(Clear, area);

        let action = self
            .confirm_action
            .map(|a| a.describe())
            .unwrap_or_default();
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(action),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Popup width for a message: visible characters plus borders/padding.
    fn popup_width(text: &str, max: u16) -> u16 {
        (text.chars().count() as u16 + 4).min(max)
    }

    /// Render the transient notification overlay in the top-right corner.
    fn render_notification(&self, f: &mut Frame) {
        let Some(notification) = self.notifier.current() else {
            return;
        };
        let frame_area = f.area();
        let width = Self::popup_width(&notification.text, 44).min(frame_area.width);
        let area = Rect {
            x: frame_area.width.saturating_sub(width + 1),
            y: 1,
            width,
            height: 3,
        };
        let style = match notification.kind {
            NotifyKind::Success => Style::default().bg(Color::Green).fg(Color::Black),
            NotifyKind::Error => Style::default().bg(Color::Red).fg(Color::White),
        };
        f.render_widget(Clear, area);
        let popup = Paragraph::new(notification.text.as_str())
            .style(style)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(popup, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => {
                    format!("Tasks: {} | Press 'h' for help", self.tasks.len())
                }
                AppState::TaskDetail => {
                    format!("Comments: {} | Press 'h' for help", self.comments.len())
                }
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::AddComment => "Add Comment".to_string(),
                AppState::EditComment => "Edit Comment".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0]),
            AppState::TaskDetail => self.render_task_detail(f, chunks[0]),
            AppState::AddTask => self.render_task_form(f, chunks[0], false),
            AppState::EditTask => self.render_task_form(f, chunks[0], true),
            AppState::AddComment => self.render_comment_form(f, chunks[0], false),
            AppState::EditComment => self.render_comment_form(f, chunks[0], true),
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::Confirm => {
                match self.confirm_action {
                    Some(ConfirmAction::DeleteComment(_)) => self.render_task_detail(f, chunks[0]),
                    _ => self.render_task_list(f, chunks[0]),
                }
                self.render_confirm(f, chunks[0]);
            }
        }

        self.render_status_bar(f, chunks[1]);
        self.render_notification(f);
    }

    /// Main event loop for the TUI application.
    ///
    /// Draws a loading frame, performs the initial fetch, then handles
    /// rendering and input until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        self.loading = true;
        terminal.draw(|f| self.render(f))?;
        self.load_tasks();

        loop {
            terminal.draw(|f| self.render(f))?;

            // A staged submission runs only after the loading frame above.
            if self.pending_create {
                self.submit_pending_create();
                continue;
            }

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::models::{TaskPriority, TaskStatus};

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn task(id: i64, title: &str) -> Task {
        Task {
            id,
            title: title.into(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            created_at: ts("2024-01-01T00:00:00"),
            updated_at: ts("2024-01-01T00:00:00"),
            comments_count: 0,
        }
    }

    fn app() -> App {
        // The client never sends anything in these tests.
        App::new(ApiClient::new("http://localhost:0"), Notifier::new())
    }

    #[test]
    fn created_task_is_prepended_without_reload() {
        let mut app = app();
        app.task_created(task(1, "first"));
        app.task_created(task(2, "second"));
        assert_eq!(app.tasks.len(), 2);
        assert_eq!(app.tasks[0].id, 2);
        assert_eq!(app.tasks[1].id, 1);
    }

    #[test]
    fn updated_task_is_replaced_in_place() {
        let mut app = app();
        app.task_created(task(1, "a"));
        app.task_created(task(2, "b"));
        let mut changed = task(1, "a2");
        changed.status = TaskStatus::Completed;
        app.task_updated(changed);
        // Order preserved, only the matching entity replaced.
        assert_eq!(app.tasks[1].title, "a2");
        assert_eq!(app.tasks[1].status, TaskStatus::Completed);
        assert_eq!(app.tasks[0].title, "b");
    }

    #[test]
    fn removing_a_task_removes_exactly_the_matching_id() {
        let mut app = app();
        app.task_created(task(1, "a"));
        app.task_created(task(2, "b"));
        app.task_created(task(3, "c"));
        app.task_removed(2);
        let ids: Vec<i64> = app.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn removing_the_selected_task_clears_selection() {
        let mut app = app();
        app.task_created(task(1, "a"));
        app.selected_task = Some(1);
        app.task_removed(1);
        assert!(app.selected_task.is_none());
        assert!(app.task_list_state.selected().is_none());
    }

    #[test]
    fn updating_an_unknown_id_is_a_no_op() {
        let mut app = app();
        app.task_created(task(1, "a"));
        app.task_updated(task(99, "ghost"));
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].title, "a");
    }

    #[test]
    fn task_creation_is_staged_behind_a_loading_frame() {
        let mut app = app();
        app.state = AppState::AddTask;
        for c in "Ship it".chars() {
            app.task_form.handle_char(c);
        }
        app.handle_task_form_input(KeyCode::Enter, KeyModifiers::empty(), false)
            .unwrap();
        // The request has not run yet; the next draw shows the loading state.
        assert!(app.loading);
        assert!(app.pending_create);
        assert!(app.state == AppState::TaskList);
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn invalid_task_form_is_not_staged() {
        let mut app = app();
        app.state = AppState::AddTask;
        app.handle_task_form_input(KeyCode::Enter, KeyModifiers::empty(), false)
            .unwrap();
        assert!(!app.pending_create);
        assert!(!app.loading);
        assert!(app.state == AppState::AddTask);
        assert!(app.task_form.title.error.is_some());
    }

    #[test]
    fn notification_width_counts_chars_not_bytes() {
        assert_eq!(App::popup_width("été", 44), 7);
        assert_eq!(App::popup_width(&"x".repeat(100), 44), 44);
    }

    #[test]
    fn confirm_cancel_returns_to_the_owning_view() {
        let mut app = app();
        app.confirm_action = Some(ConfirmAction::DeleteComment(5));
        app.state = AppState::Confirm;
        app.handle_confirm_input(KeyCode::Char('n'), KeyModifiers::empty())
            .unwrap();
        assert!(app.state == AppState::TaskDetail);
        assert!(app.confirm_action.is_none());
    }
}
