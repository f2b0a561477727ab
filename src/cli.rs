//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Browse a published notes site and download the media its documents embed.
#[derive(Parser, Debug)]
#[command(name = "vaultdl")]
#[command(author, version, about, arg_required_else_help = true)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Landing page that publishes the site descriptor
    #[arg(long, global = true, value_name = "URL")]
    pub landing_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the document tree
    Tree {
        /// Include non-markdown entries (media, attachments)
        #[arg(short, long)]
        all: bool,
    },

    /// Print a document and the media it references
    Show {
        /// Directory path of the document, e.g. `notes/intro.md`
        path: String,

        /// Print markdown documents rendered as HTML
        #[arg(long)]
        html: bool,
    },

    /// List, and optionally download, the media a document references
    Media {
        /// Directory path of the document
        path: String,

        /// Print references as JSON
        #[arg(long)]
        json: bool,

        /// Download every reference into the output directory
        #[arg(short, long)]
        download: bool,

        /// Output directory for downloads
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output_dir: Option<PathBuf>,
    },

    /// Download one directory entry by path
    Get {
        /// Directory path of the entry
        path: String,

        /// Output directory for the file
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output_dir: Option<PathBuf>,
    },
}
