use clap::{Parser, Subcommand};
use gitlet::areas::repository::Repository;
use gitlet::artifacts::core::PagerWriter;
use gitlet::artifacts::core::settings::Settings;
use gitlet::artifacts::merge::{ConflictPolicy, MergeBaseStrategy};
use gitlet::commands::porcelain::merge::MergeOptions;
use gitlet::error::{RepositoryError, repository_error};
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GITLET_LOG";

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A tiny local version-control system",
    long_about = "Gitlet keeps snapshots of a directory as commits, with branches, \
    a staging area and three-way merges. Everything lives in a .gitlet directory \
    next to the files it tracks.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create a new repository",
        long_about = "This command creates a repository in the current directory or at the \
        specified path, with a single initial commit on the master branch."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Record the staged changes",
        long_about = "This command creates a new commit holding the head commit's files \
        updated with the staged additions and removals."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(name = "rm", about = "Stage a file for removal")]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "branch", about = "Create a branch at the head commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout <branch> switches to a branch, checkout -- <file> restores a file \
        from the head commit, checkout <commit-id> -- <file> restores it from the given commit."
    )]
    Checkout {
        #[arg(help = "The branch, or the commit to restore from")]
        target: Option<String>,
        #[arg(last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "log", about = "Show the history of the head commit")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged changes and working copy state")]
    Status,
    #[command(
        name = "reset",
        about = "Check out a commit and move the branch pointer to it"
    )]
    Reset {
        #[arg(index = 1, help = "A full or abbreviated commit id")]
        commit_id: String,
    },
    #[command(
        name = "merge",
        about = "Merge a branch into the current branch",
        long_about = "This command reconciles the given branch with the current one from their \
        merge base and records a two-parent commit, or fast-forwards when possible."
    )]
    Merge {
        #[arg(index = 1)]
        branch: String,
        #[arg(long, value_enum, default_value_t, help = "How the merge base is chosen")]
        base: MergeBaseStrategy,
        #[arg(long, value_enum, default_value_t, help = "When differing paths conflict")]
        conflicts: ConflictPolicy,
    },
}

impl Commands {
    fn is_paged(&self) -> bool {
        matches!(self, Commands::Log | Commands::GlobalLog)
    }
}

fn main() -> ExitCode {
    init_tracing();
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match repository_error(&error) {
                Some(repository_error) => eprintln!("{repository_error}"),
                None => eprintln!("{error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load_from_env();
    let pwd = std::env::current_dir()?;

    let pager = (cli.command.is_paged()
        && std::io::stdout().is_terminal()
        && settings.paging_enabled())
    .then(Pager::new);
    let writer: Box<dyn Write> = match &pager {
        Some(pager) => Box::new(PagerWriter::new(pager.clone())),
        None => Box::new(std::io::stdout()),
    };

    let repository_path = match &cli.command {
        Commands::Init { path: Some(path) } => path.clone(),
        _ => pwd.to_string_lossy().into_owned(),
    };
    let repository = Repository::new(&repository_path, writer, settings)?;

    match cli.command {
        Commands::Init { .. } => repository.init()?,
        Commands::Add { file } => repository.add(&file)?,
        Commands::Commit { message } => repository.commit(&message)?,
        Commands::Rm { file } => repository.rm(&file)?,
        Commands::Branch { name } => repository.branch(&name)?,
        Commands::RmBranch { name } => repository.rm_branch(&name)?,
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout_branch(&branch)?,
            (None, Some(file)) => repository.checkout_file(&file)?,
            (Some(commit_id), Some(file)) => repository.checkout_file_at(&commit_id, &file)?,
            (None, None) => anyhow::bail!(RepositoryError::IncorrectOperands),
        },
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => repository.find(&message)?,
        Commands::Status => repository.status()?,
        Commands::Reset { commit_id } => repository.reset(&commit_id)?,
        Commands::Merge {
            branch,
            base,
            conflicts,
        } => repository.merge(&branch, &MergeOptions { base, conflicts })?,
    }

    repository.writer().flush()?;
    if let Some(pager) = pager {
        minus::page_all(pager)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["gitlet", "checkout", "feature"], Some("feature"), None)]
    #[case(&["gitlet", "checkout", "--", "a.txt"], None, Some("a.txt"))]
    #[case(&["gitlet", "checkout", "0a1b2c3d", "--", "a.txt"], Some("0a1b2c3d"), Some("a.txt"))]
    #[case(&["gitlet", "checkout"], None, None)]
    fn test_checkout_forms(
        #[case] args: &[&str],
        #[case] expected_target: Option<&str>,
        #[case] expected_file: Option<&str>,
    ) {
        let cli = Cli::try_parse_from(args).unwrap();

        let Commands::Checkout { target, file } = cli.command else {
            panic!("expected a checkout command");
        };
        assert_eq!(target.as_deref(), expected_target);
        assert_eq!(file.as_deref(), expected_file);
    }
}
