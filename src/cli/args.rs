//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract messages from source files into catalogues
//! - `compile`: Compile catalogues into runtime-ready locale files
//! - `transform`: Print a source file with its messages rewritten to lookups
//! - `init`: Initialize sayable configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    fn common(&self) -> Option<&CommonArgs> {
        match &self.command {
            Some(Command::Extract(cmd)) => Some(&cmd.common),
            Some(Command::Compile(cmd)) => Some(&cmd.common),
            Some(Command::Transform(cmd)) => Some(&cmd.common),
            Some(Command::Init) | None => None,
        }
    }

    pub fn verbose(&self) -> bool {
        self.common().is_some_and(|c| c.verbose)
    }

    pub fn quiet(&self) -> bool {
        self.common().is_some_and(|c| c.quiet)
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory to look for the config file from (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Keep watching source files and re-extract on change
    #[arg(short, long)]
    pub watch: bool,

    /// Remove catalogue entries no longer found in the sources
    #[arg(long)]
    pub prune: bool,
}

#[derive(Debug, Args)]
pub struct CompileCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct TransformCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Source file to transform
    pub file: PathBuf,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract messages from source files into translation catalogues
    Extract(ExtractCommand),
    /// Compile translation catalogues into runtime-ready locale files
    Compile(CompileCommand),
    /// Rewrite the messages of one source file into runtime lookups
    Transform(TransformCommand),
    /// Initialize a new .sayablerc.json configuration file
    Init,
}
