//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Structural conversions between form records, parent-linked lists and nested trees
#[derive(Parser, Debug)]
#[command(name = "rsshape")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file (overrides the global rsshape.toml)
    #[arg(short, long, global = true, env = "RSSHAPE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Turn an object of parallel arrays into rows
    Assemble {
        /// Extend to the longest array, padding with null
        #[arg(long, overrides_with = "no_fill")]
        fill: bool,
        /// Truncate to the shortest array even if the settings enable fill
        #[arg(long, overrides_with = "fill")]
        no_fill: bool,
        #[command(flatten)]
        input: InputArgs,
    },

    /// Nest parent-linked records into a tree
    Tree {
        #[command(flatten)]
        links: LinkArgs,
        /// Field holding child nodes
        #[arg(long)]
        child_field: Option<String>,
        /// Print as a terminal tree instead of JSON
        #[arg(long)]
        render: bool,
        /// Field used as node label when rendering
        #[arg(long, default_value = "name")]
        label: String,
        #[command(flatten)]
        input: InputArgs,
    },

    /// Flatten a tree into parent-linked records with fresh ids
    Flatten {
        /// Field holding child nodes
        #[arg(long)]
        child_field: Option<String>,
        /// Field receiving the generated id
        #[arg(long)]
        id_field: Option<String>,
        /// Field receiving the parent id
        #[arg(long)]
        parent_id_field: Option<String>,
        /// Parent id assigned to top-level nodes
        #[arg(long, allow_negative_numbers = true)]
        root_id: Option<i64>,
        #[command(flatten)]
        input: InputArgs,
    },

    /// Order parent-linked records depth-first with level and indentation
    Level {
        #[command(flatten)]
        links: LinkArgs,
        /// Indentation token repeated per level
        #[arg(long)]
        indent: Option<String>,
        /// Field receiving the level
        #[arg(long)]
        level_field: Option<String>,
        /// Field receiving the indentation marker
        #[arg(long)]
        indent_field: Option<String>,
        #[command(flatten)]
        input: InputArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Parent-link options shared by `tree` and `level`
#[derive(Args, Debug, Default)]
pub struct LinkArgs {
    /// Parent id to start from (default: root id)
    #[arg(long, allow_negative_numbers = true)]
    pub parent_id: Option<i64>,
    /// Parent reference meaning "no parent"
    #[arg(long, allow_negative_numbers = true)]
    pub root_id: Option<i64>,
    /// Field holding the parent reference
    #[arg(long)]
    pub parent_field: Option<String>,
    /// Field holding the record id
    #[arg(long)]
    pub id_field: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// JSON input file (default: stdin)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Show the global config file location
    Path,
}
