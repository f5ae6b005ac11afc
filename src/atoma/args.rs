use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "atoma")]
#[command(about = "Keyboard-driven outliner for atomic, linkable lists", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a line to the outline
    #[command(alias = "a")]
    Add {
        /// The line content
        content: String,

        /// Insert as a child of this node (index or content match)
        #[arg(short, long)]
        under: Option<String>,

        /// Explicit indent level for the new node
        #[arg(short, long)]
        level: Option<usize>,
    },

    /// List the outline
    #[command(alias = "ls")]
    List,

    /// Open the interactive session
    #[command(alias = "e")]
    Edit,

    /// Indent a node one level deeper
    #[command(alias = "in")]
    Indent {
        /// Node index or content match
        selector: String,
    },

    /// Outdent a node one level
    #[command(alias = "out")]
    Outdent {
        /// Node index or content match
        selector: String,
    },

    /// Toggle a node's task flag
    #[command(alias = "t")]
    Task {
        /// Node index or content match
        selector: String,
    },

    /// Toggle a task's completion
    #[command(alias = "d")]
    Done {
        /// Node index or content match
        selector: String,
    },

    /// Set or show a node's note
    #[command(alias = "n")]
    Note {
        /// Node index or content match
        selector: String,

        /// Note text (omit to show the current note)
        text: Option<String>,
    },

    /// Branch a node's subtree into a new linked list
    Link {
        /// Node index or content match
        selector: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Delete a node (children re-attach to the preceding node)
    #[command(alias = "rm")]
    Delete {
        /// Node index or content match
        selector: String,
    },

    /// Export the outline to a file
    Export {
        /// Output format: md, html or json
        #[arg(short, long, default_value = "md")]
        format: String,
    },

    /// Import a save file, replacing the outline
    Import {
        /// An .html or .json file exported by atoma
        file: PathBuf,
    },

    /// Delete every node and the autosave
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Get or set the color theme
    Theme {
        /// Theme name (omit to show the current one)
        name: Option<String>,
    },
}
