use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lvc",
    about = "lvc: linear version control for a single working directory",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Run as if started in this directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub workdir: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty repository in the working directory
    Init(InitArgs),
    /// Stage files for the next commit
    Add(AddArgs),
    /// Stage the deletion of files
    Rm(RmArgs),
    /// Record the staged changes
    Commit(CommitArgs),
    /// Move head to a revision, or restore files after `--`
    Checkout(CheckoutArgs),
    /// Move head to a revision and abandon everything after it
    Reset(ResetArgs),
    /// Show history from head (or a revision) back to the first commit
    Log(LogArgs),
    /// Show staged, unstaged and untracked files
    Status(StatusArgs),
}

#[derive(Args)]
pub struct InitArgs {}

#[derive(Args)]
pub struct AddArgs {
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct RmArgs {
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(required_unless_present = "message", conflicts_with = "message")]
    pub text: Option<String>,
    #[arg(short, long)]
    pub message: Option<String>,
}

impl CommitArgs {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.text)
    }
}

#[derive(Args)]
pub struct CheckoutArgs {
    /// HEAD, HEAD~n, the tip name, or a commit hash (or unique prefix)
    #[arg(required_unless_present = "paths", conflicts_with = "paths")]
    pub revision: Option<String>,
    /// Files to restore from head
    #[arg(last = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct ResetArgs {
    pub revision: String,
}

#[derive(Args)]
pub struct LogArgs {
    pub revision: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {}
