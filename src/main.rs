//! Taskdeck: a terminal client for a task/comment REST backend.
//!
//! Provides an interactive TUI plus a scripted CLI for task and comment
//! CRUD. All state lives in the backend; this binary only presents it.

use clap::Parser;

mod api;
mod cli;
mod cmd;
mod config;
mod models;
mod tui {
    pub mod app;
    pub mod colors;
    pub mod comment_form;
    pub mod enums;
    pub mod input;
    pub mod notify;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use api::ApiClient;
use cli::Cli;
use cmd::Commands;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base_url = config::api_base_url(cli.api_url);
    let api = ApiClient::new(base_url);

    match cli.command {
        Commands::Ui => cmd::cmd_ui(api),
        Commands::List { status, priority } => cmd::cmd_list(&api, status, priority),
        Commands::View { id } => cmd::cmd_view(&api, id),
        Commands::Add {
            title,
            desc,
            status,
            priority,
        } => cmd::cmd_add(&api, title, desc, status, priority),
        Commands::Update {
            id,
            title,
            desc,
            status,
            priority,
        } => cmd::cmd_update(&api, id, title, desc, status, priority),
        Commands::Complete { id } => cmd::cmd_complete(&api, id),
        Commands::Delete { id, yes } => cmd::cmd_delete(&api, id, yes),
        Commands::Comment { action } => cmd::cmd_comment(&api, action),
        Commands::Completions { shell } => cmd::cmd_completions(shell),
    }
}
