use std::path::Path;

use anyhow::Context;
use colored::{ColoredString, Colorize};
use lvc_sdk::{Commit, FileStatus, Lvc, WorkdirStatus};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let root = cli.workdir.as_path();
    match cli.command {
        Command::Init(_) => cmd_init(root),
        Command::Add(args) => cmd_add(root, args),
        Command::Rm(args) => cmd_rm(root, args),
        Command::Commit(args) => cmd_commit(root, args),
        Command::Checkout(args) => cmd_checkout(root, args),
        Command::Reset(args) => cmd_reset(root, args),
        Command::Log(args) => cmd_log(root, args),
        Command::Status(_) => cmd_status(root),
    }
}

fn cmd_init(root: &Path) -> anyhow::Result<()> {
    Lvc::init(root)?;
    println!("{}", "Project initialized".green());
    Ok(())
}

fn cmd_add(root: &Path, args: AddArgs) -> anyhow::Result<()> {
    Lvc::open(root)?.add(&args.paths)?;
    println!("Add completed successful");
    Ok(())
}

fn cmd_rm(root: &Path, args: RmArgs) -> anyhow::Result<()> {
    Lvc::open(root)?.remove(&args.paths)?;
    println!("Rm completed successful");
    Ok(())
}

fn cmd_commit(root: &Path, args: CommitArgs) -> anyhow::Result<()> {
    let message = args.into_message().context("a commit message is required")?;
    Lvc::open(root)?.commit(&message)?;
    println!("Files committed");
    Ok(())
}

fn cmd_checkout(root: &Path, args: CheckoutArgs) -> anyhow::Result<()> {
    let repo = Lvc::open(root)?;
    match args.revision {
        Some(revision) if args.paths.is_empty() => {
            repo.checkout(&revision)?;
        }
        _ => {
            repo.checkout_paths(&args.paths)?;
        }
    }
    println!("Checkout completed successful");
    Ok(())
}

fn cmd_reset(root: &Path, args: ResetArgs) -> anyhow::Result<()> {
    Lvc::open(root)?.reset(&args.revision)?;
    println!("Reset successful");
    Ok(())
}

fn cmd_log(root: &Path, args: LogArgs) -> anyhow::Result<()> {
    let commits = Lvc::open(root)?.log(args.revision.as_deref())?;
    for (i, commit) in commits.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_commit(commit);
    }
    Ok(())
}

fn print_commit(commit: &Commit) {
    println!("{} {}", "Commit".yellow(), commit.hash().to_hex().yellow());
    println!("Author: {}", commit.author());
    println!("Date: {}", commit.date().format("%a %b %e %H:%M:%S %Y %z"));
    println!();
    println!("{}", commit.message());
}

fn cmd_status(root: &Path) -> anyhow::Result<()> {
    let repo = Lvc::open(root)?;
    let status = repo.status()?;
    println!("Current branch is '{}'", repo.config().history.tip.bold());
    print_status(&status);
    Ok(())
}

fn print_status(status: &WorkdirStatus) {
    if status.has_staged_changes() {
        println!("Ready to commit:");
        println!();
        print_group("New files:", status.staged_with(FileStatus::New), |p| p.green());
        print_group("    Modified files:", status.staged_with(FileStatus::Modified), |p| p.green());
    }

    if !status.unstaged.is_empty() {
        println!("Changes not staged for commit:");
        println!();
        print_group("    Modified files:", status.unstaged_with(FileStatus::Modified), |p| p.yellow());
        print_group("    Deleted files:", status.unstaged_with(FileStatus::Deleted), |p| p.red());
    }

    if !status.untracked.is_empty() {
        println!("Untracked files:");
        println!();
        print_group("", status.untracked.iter().map(String::as_str), |p| p.red());
    }

    if status.is_clean() {
        println!("{}", "Everything up to date".green());
    }
}

/// Print `title` and one indented line per path; nothing if there are no paths.
fn print_group<'a>(
    title: &str,
    paths: impl Iterator<Item = &'a str>,
    paint: impl Fn(&str) -> ColoredString,
) {
    let mut paths = paths.peekable();
    if paths.peek().is_none() {
        return;
    }
    if !title.is_empty() {
        println!("{title}");
    }
    for path in paths {
        println!("    {}", paint(path));
    }
    println!();
}
