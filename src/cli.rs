//! CLI parsing for scanq

use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "scanq")]
#[command(about = "Client for the PDF scanning service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend address, e.g. http://localhost:8000
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a PDF for scanning
    Submit(commands::submit::Args),

    /// List scan tasks
    List(commands::list::Args),

    /// Show one task, with its scan report when available
    Show(commands::show::Args),

    /// Download the raw scan report of a completed task
    Report(commands::report::Args),

    /// Follow the task list live, or a single task until its report is in
    Watch(commands::watch::Args),
}
