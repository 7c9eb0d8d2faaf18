//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// markview - Render Markdown into styled UI trees
#[derive(Parser)]
#[command(name = "mdview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a Markdown file into a render tree
    Render {
        /// Markdown file to render
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Outline)]
        format: OutputFormat,

        /// Theme family (overrides the config file)
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        /// Use the dark ambient theme
        #[arg(long)]
        dark: bool,
    },

    /// Print the parsed document tree as JSON
    Parse {
        /// Markdown file to parse
        file: PathBuf,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented tree outline
    Outline,
    /// Render tree as JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Primary,
    Alternate,
    Platform,
}
