use clap::{Parser, Subcommand};
use grit::areas::repository::Repository;
use grit::artifacts::errors::{Error, Result};

#[derive(Parser)]
#[command(
    name = "grit",
    version = "0.1.0",
    about = "A tiny local version-control system",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Initialize a new repository in the current directory")]
    Init,
    #[command(about = "Stage a file for the next commit")]
    Add { path: String },
    #[command(about = "Unstage a file or stage it for removal")]
    Rm { path: String },
    #[command(about = "Record the staged changes as a new commit")]
    Commit { message: Option<String> },
    #[command(about = "Show the current branch's history")]
    Log,
    #[command(about = "Show every commit ever made")]
    GlobalLog,
    #[command(about = "Print the ids of commits with the given message")]
    Find { message: String },
    #[command(about = "Show branches, staged files and working-tree changes")]
    Status,
    #[command(about = "Create a new branch at the current tip")]
    Branch { name: String },
    #[command(about = "Delete a branch pointer")]
    RmBranch { name: String },
    #[command(about = "Move the current branch to the given commit")]
    Reset { commit: String },
    #[command(about = "Merge the given branch into the current one")]
    Merge { branch: String },
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(err) = run(&args) {
        match err {
            Error::Internal(source) => {
                eprintln!("grit: {:#}", source);
                std::process::exit(1);
            }
            scripted => println!("{}", scripted),
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let pwd = std::env::current_dir()?;
    let mut repository = Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

    // `checkout` is dispatched on raw operands: clap strips the bare `--`
    // that separates its branch form from its two file forms.
    if args.first().map(String::as_str) == Some("checkout") {
        if !repository.is_initialized() {
            return Err(Error::NotInitialized);
        }
        return run_checkout(&mut repository, &args[1..]);
    }

    let cli = Cli::try_parse_from(std::iter::once("grit").chain(args.iter().map(String::as_str)))
        .map_err(|_| Error::IncorrectOperands)?;

    if !matches!(cli.command, Commands::Init) && !repository.is_initialized() {
        return Err(Error::NotInitialized);
    }

    match cli.command {
        Commands::Init => repository.init(),
        Commands::Add { path } => repository.add(&path),
        Commands::Rm { path } => repository.rm(&path),
        Commands::Commit { message } => repository.commit(message.as_deref().unwrap_or("")),
        Commands::Log => repository.log(),
        Commands::GlobalLog => repository.global_log(),
        Commands::Find { message } => repository.find(&message),
        Commands::Status => repository.status(),
        Commands::Branch { name } => repository.branch(&name),
        Commands::RmBranch { name } => repository.rm_branch(&name),
        Commands::Reset { commit } => repository.reset(&commit),
        Commands::Merge { branch } => repository.merge(&branch),
    }
}

fn run_checkout(repository: &mut Repository, operands: &[String]) -> Result<()> {
    match operands {
        [separator, path] if separator == "--" => repository.checkout_file(path),
        [commit, separator, path] if separator == "--" => {
            repository.checkout_file_at(commit, path)
        }
        [branch] if branch != "--" => repository.checkout_branch(branch),
        _ => Err(Error::IncorrectOperands),
    }
}
