use clap::Parser;

use crate::cmd::Commands;

/// Terminal client for a task/comment REST backend.
/// The backend address defaults to http://localhost:5000/api and can be
/// overridden via --api-url or the TASKDECK_API_URL environment variable.
#[derive(Parser)]
#[command(name = "td", version, about = "Task & comment manager")]
pub struct Cli {
    /// Base URL of the backend API.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}
