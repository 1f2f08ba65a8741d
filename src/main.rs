//! twig CLI - local version control command line interface

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use twig::ops::{self, MergeOutcome};
use twig::{Repo, State};

#[derive(Parser)]
#[command(name = "twig")]
#[command(about = "local version control - content-addressed snapshots, branches and merges")]
#[command(version)]
struct Cli {
    /// working tree
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// initialize a new repository in the working tree
    Init,

    /// stage a file for the next commit
    Add {
        /// file to stage
        file: String,
    },

    /// record staged changes
    Commit {
        /// commit message
        message: String,
    },

    /// unstage a file, staging its removal if tracked
    Rm {
        /// file to remove
        file: String,
    },

    /// show the current branch's history
    Log,

    /// show every commit ever made
    GlobalLog,

    /// print ids of commits with the given message
    Find {
        /// exact commit message
        message: String,
    },

    /// show branches, staged files and working tree changes
    Status,

    /// checkout a branch, or restore a file with `-- <file>` / `<commit> -- <file>`
    Checkout {
        /// branch name, or commit id when restoring a file
        target: Option<String>,

        /// file to restore
        #[arg(last = true)]
        file: Option<String>,
    },

    /// create a branch at the current head
    Branch {
        /// branch name
        name: String,
    },

    /// delete a branch
    RmBranch {
        /// branch name
        name: String,
    },

    /// move the current branch and working tree to a commit
    Reset {
        /// commit id or unique prefix
        commit: String,
    },

    /// merge a branch into the current branch
    Merge {
        /// branch to merge
        branch: String,
    },

    /// register a remote repository
    AddRemote {
        /// remote name
        name: String,

        /// path to the remote's metadata directory
        path: String,
    },

    /// unregister a remote repository
    RmRemote {
        /// remote name
        name: String,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("TWIG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> twig::Result<()> {
    match cli.command {
        Commands::Init => {
            ops::init(&cli.dir)?;
        }

        Commands::AddRemote { name, path } => {
            let mut repo = Repo::open(&cli.dir)?;
            ops::add_remote(&mut repo, &name, &path)?;
        }

        Commands::RmRemote { name } => {
            let mut repo = Repo::open(&cli.dir)?;
            ops::remove_remote(&mut repo, &name)?;
        }

        command => {
            let repo = Repo::open(&cli.dir)?;
            let mut state = repo.load_state()?;
            dispatch(&repo, &mut state, command)?;
            repo.save_state(&state)?;
        }
    }

    Ok(())
}

/// run a state-changing or reporting command against the loaded state
fn dispatch(repo: &Repo, state: &mut State, command: Commands) -> twig::Result<()> {
    match command {
        Commands::Add { file } => ops::add(repo, state, &file)?,

        Commands::Commit { message } => {
            ops::commit(repo, state, &message)?;
        }

        Commands::Rm { file } => ops::remove(repo, state, &file)?,

        Commands::Log => {
            for entry in ops::log(repo, state)? {
                println!("{}\n", entry);
            }
        }

        Commands::GlobalLog => {
            for entry in ops::global_log(repo, state)? {
                println!("{}\n", entry);
            }
        }

        Commands::Find { message } => {
            for hash in ops::find(state, &message)? {
                println!("{}", hash);
            }
        }

        Commands::Status => {
            print!("{}", ops::status(repo, state)?);
        }

        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => ops::checkout_branch(repo, state, &branch)?,
            (None, Some(file)) => ops::checkout_file(repo, state, &file)?,
            (Some(commit), Some(file)) => ops::checkout_file_at(repo, state, &commit, &file)?,
            (None, None) => return Err(twig::Error::IncorrectOperands),
        },

        Commands::Branch { name } => ops::branch(state, &name)?,

        Commands::RmBranch { name } => ops::remove_branch(state, &name)?,

        Commands::Reset { commit } => {
            ops::reset(repo, state, &commit)?;
        }

        Commands::Merge { branch } => match ops::merge(repo, state, &branch)? {
            MergeOutcome::AlreadyMerged => {
                println!("Given branch is an ancestor of the current branch.")
            }
            MergeOutcome::FastForward(_) => println!("Current branch fast-forwarded."),
            MergeOutcome::Merged { conflicts, .. } => {
                if !conflicts.is_empty() {
                    println!("Encountered a merge conflict.");
                }
            }
        },

        Commands::Init | Commands::AddRemote { .. } | Commands::RmRemote { .. } => {
            return Err(twig::Error::IncorrectOperands)
        }
    }

    Ok(())
}
