mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{add, compile, init, move_block, remove, tree, AddArgs, CompileArgs, InitArgs, MoveArgs, RemoveArgs, TreeArgs};
use tracing_subscriber::EnvFilter;

/// Mailblocks CLI - Build table-based HTML emails from block documents
#[derive(Parser, Debug)]
#[command(name = "mailblocks")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Mailblocks project
    Init(InitArgs),

    /// Compile email documents to HTML
    Compile(CompileArgs),

    /// Add a block from the palette to a document
    Add(AddArgs),

    /// Remove a block from a document
    Remove(RemoveArgs),

    /// Move a top-level block
    Move(MoveArgs),

    /// Print the block tree of a document
    Tree(TreeArgs),
}

fn main() {
    // Logs go to stderr so `compile --stdout` output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Compile(args) => compile(args, &cwd),
        Command::Add(args) => add(args, &cwd),
        Command::Remove(args) => remove(args, &cwd),
        Command::Move(args) => move_block(args, &cwd),
        Command::Tree(args) => tree(args, &cwd),
    }
}
