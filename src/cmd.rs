//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers for the scripted interface:
//! task and comment CRUD against the backend, plus the TUI launcher and
//! shell completion generation.

use std::io::{self, BufRead, Write};

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::api::{ApiClient, Result};
use crate::models::*;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// List tasks with optional filters.
    List {
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<TaskPriority>,
    },

    /// View a single task with its comments.
    View {
        /// Task ID to view.
        id: i64,
    },

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Status: pending | in-progress | completed.
        #[arg(long, value_enum, default_value_t = TaskStatus::Pending)]
        status: TaskStatus,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = TaskPriority::Medium)]
        priority: TaskPriority,
    },

    /// Update fields on an existing task.
    Update {
        /// Task ID to update.
        id: i64,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(long)]
        desc: Option<String>,
        /// New status.
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// New priority.
        #[arg(long, value_enum)]
        priority: Option<TaskPriority>,
    },

    /// Mark a task completed.
    Complete {
        /// Task ID to complete.
        id: i64,
    },

    /// Delete a task. The backend cascade-deletes its comments.
    Delete {
        /// Task ID to delete.
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Comment operations.
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CommentAction {
    /// Add a comment to a task.
    Add {
        /// Task the comment belongs to.
        task_id: i64,
        /// Comment text. May contain embedded line breaks.
        content: String,
        /// Author name.
        #[arg(long)]
        author: String,
        /// Optional author email.
        #[arg(long)]
        email: Option<String>,
    },

    /// List comments for a task.
    List {
        /// Task whose comments to list.
        task_id: i64,
    },

    /// Show a single comment.
    Show {
        /// Comment ID to show.
        id: i64,
    },

    /// Update fields on an existing comment.
    Update {
        /// Comment ID to update.
        id: i64,
        /// New content.
        #[arg(long)]
        content: Option<String>,
        /// New author name.
        #[arg(long)]
        author: Option<String>,
        /// New author email.
        #[arg(long)]
        email: Option<String>,
    },

    /// Delete a comment.
    Delete {
        /// Comment ID to delete.
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Unwrap an API result or print the normalized error and exit.
fn ok_or_exit<T>(res: Result<T>) -> T {
    match res {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

/// Ask a y/N question on stdin. Anything but y/Y declines.
fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y")
}

/// Print tasks in a formatted table.
fn print_task_table(tasks: &[Task]) {
    println!(
        "{:<5} {:<12} {:<9} {:<9} {:<17} {}",
        "ID", "Status", "Priority", "Comments", "Created", "Title"
    );
    for t in tasks {
        println!(
            "{:<5} {:<12} {:<9} {:<9} {:<17} {}",
            t.id,
            format_status(t.status),
            format_priority(t.priority),
            t.comments_count,
            format_timestamp(t.created_at),
            t.title
        );
    }
}

/// Build the comment creation payload from CLI arguments. Content and
/// author are trimmed; a blank email becomes absent.
fn comment_payload(task_id: i64, content: &str, author: &str, email: Option<String>) -> NewComment {
    NewComment {
        content: content.trim().to_string(),
        author_name: author.trim().to_string(),
        author_email: email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
        task_id,
    }
}

fn print_comment(c: &Comment) {
    let email = c
        .author_email
        .as_deref()
        .map(|e| format!(" ({e})"))
        .unwrap_or_default();
    println!("#{} {}{}  {}", c.id, c.author_name, email, format_timestamp(c.created_at));
    for line in c.paragraphs() {
        println!("  {line}");
    }
    if c.is_edited() {
        println!("  Updated: {}", format_timestamp(c.updated_at));
    }
}

pub fn cmd_ui(api: ApiClient) {
    if let Err(e) = run_tui(api) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// List tasks, optionally filtered by status and/or priority.
pub fn cmd_list(api: &ApiClient, status: Option<TaskStatus>, priority: Option<TaskPriority>) {
    let mut tasks = ok_or_exit(api.list_tasks());
    if let Some(s) = status {
        tasks.retain(|t| t.status == s);
    }
    if let Some(p) = priority {
        tasks.retain(|t| t.priority == p);
    }
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    print_task_table(&tasks);
}

/// View a single task with its comment thread.
pub fn cmd_view(api: &ApiClient, id: i64) {
    let detail = ok_or_exit(api.task_comments(id));
    let task = &detail.task;
    println!("ID:        {}", task.id);
    println!("Title:     {}", task.title);
    println!("Status:    {}", format_status(task.status));
    println!("Priority:  {}", format_priority(task.priority));
    println!("Created:   {}", format_timestamp(task.created_at));
    println!("Updated:   {}", format_timestamp(task.updated_at));
    println!(
        "Description:\n{}\n",
        task.description.as_deref().unwrap_or("-")
    );
    println!("Comments ({}):", detail.comments_count);
    if detail.comments.is_empty() {
        println!("  -");
    }
    for c in &detail.comments {
        print_comment(c);
    }
}

/// Create a new task.
pub fn cmd_add(
    api: &ApiClient,
    title: String,
    desc: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
) {
    if title.trim().is_empty() {
        eprintln!("Error: Title is required");
        std::process::exit(1);
    }
    let task = ok_or_exit(api.create_task(&NewTask {
        title: title.trim().to_string(),
        description: desc.filter(|d| !d.trim().is_empty()),
        status,
        priority,
    }));
    println!("Created task #{}: {}", task.id, task.title);
}

/// Update an existing task's fields. Absent flags leave fields unchanged.
pub fn cmd_update(
    api: &ApiClient,
    id: i64,
    title: Option<String>,
    desc: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
) {
    if title.is_none() && desc.is_none() && status.is_none() && priority.is_none() {
        eprintln!("Error: nothing to update");
        std::process::exit(1);
    }
    if let Some(ref t) = title {
        if t.trim().is_empty() {
            eprintln!("Error: Title is required");
            std::process::exit(1);
        }
    }
    let task = ok_or_exit(api.update_task(
        id,
        &TaskPatch {
            title,
            description: desc,
            status,
            priority,
        },
    ));
    println!("Updated task #{}: {}", task.id, task.title);
}

/// Shortcut for setting a task's status to completed.
pub fn cmd_complete(api: &ApiClient, id: i64) {
    let task = ok_or_exit(api.update_task(
        id,
        &TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        },
    ));
    println!("Completed task #{}: {}", task.id, task.title);
}

/// Delete a task after confirmation.
pub fn cmd_delete(api: &ApiClient, id: i64, yes: bool) {
    if !yes
        && !confirm(&format!(
            "Delete task #{id} and all its comments? This cannot be undone."
        ))
    {
        println!("Aborted.");
        return;
    }
    ok_or_exit(api.delete_task(id));
    println!("Deleted task #{id}.");
}

/// Dispatch comment subcommands.
pub fn cmd_comment(api: &ApiClient, action: CommentAction) {
    match action {
        CommentAction::Add {
            task_id,
            content,
            author,
            email,
        } => {
            if content.trim().is_empty() {
                eprintln!("Error: Content is required");
                std::process::exit(1);
            }
            if author.trim().is_empty() {
                eprintln!("Error: Author name is required");
                std::process::exit(1);
            }
            if let Some(ref e) = email {
                if !e.trim().is_empty() && !is_valid_email(e.trim()) {
                    eprintln!("Error: Invalid email format");
                    std::process::exit(1);
                }
            }
            let comment =
                ok_or_exit(api.create_comment(&comment_payload(task_id, &content, &author, email)));
            println!("Added comment #{} to task #{}.", comment.id, comment.task_id);
        }
        CommentAction::List { task_id } => {
            let resp = ok_or_exit(api.comments_by_task(task_id));
            println!("Comments for task #{task_id} ({}):", resp.count);
            if resp.comments.is_empty() {
                println!("  -");
            }
            for c in &resp.comments {
                print_comment(c);
            }
        }
        CommentAction::Show { id } => {
            let comment = ok_or_exit(api.get_comment(id));
            println!("Task: #{}", comment.task_id);
            print_comment(&comment);
        }
        CommentAction::Update {
            id,
            content,
            author,
            email,
        } => {
            if content.is_none() && author.is_none() && email.is_none() {
                eprintln!("Error: nothing to update");
                std::process::exit(1);
            }
            if let Some(ref e) = email {
                if !e.trim().is_empty() && !is_valid_email(e.trim()) {
                    eprintln!("Error: Invalid email format");
                    std::process::exit(1);
                }
            }
            let comment = ok_or_exit(api.update_comment(
                id,
                &CommentPatch {
                    content,
                    author_name: author,
                    author_email: email,
                },
            ));
            println!("Updated comment #{}.", comment.id);
        }
        CommentAction::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete comment #{id}?")) {
                println!("Aborted.");
                return;
            }
            ok_or_exit(api.delete_comment(id));
            println!("Deleted comment #{id}.");
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;

    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_payload_trims_content_and_author() {
        let p = comment_payload(3, "  hi\nthere \n", " Ada ", None);
        assert_eq!(p.content, "hi\nthere");
        assert_eq!(p.author_name, "Ada");
        assert_eq!(p.task_id, 3);
    }

    #[test]
    fn blank_email_becomes_absent() {
        let p = comment_payload(1, "hi", "Ada", Some("   ".into()));
        assert!(p.author_email.is_none());
        let p = comment_payload(1, "hi", "Ada", Some(" ada@example.com ".into()));
        assert_eq!(p.author_email.as_deref(), Some("ada@example.com"));
    }
}
