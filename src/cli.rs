use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lightpdf")]
#[command(about = "Split, merge, and rotate PDF files, with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio
    Mcp,

    /// Display PDF metadata and page count
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Write a new PDF containing only the selected pages
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Page range expression (e.g., "1,3-5")
        pages: String,

        /// Directory to export to (default: next to the input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Combine multiple PDFs into one
    Merge {
        /// PDF files to merge, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory to export to (default: next to the first input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Rotate pages and write the result to a new PDF
    Rotate {
        /// PDF file to rotate
        path: PathBuf,

        /// Rotation in degrees, a multiple of 90 (e.g., 90, -90, 180)
        #[arg(allow_hyphen_values = true)]
        degrees: i32,

        /// Pages to rotate (e.g., "1,3-5"; default: all pages)
        #[arg(short, long)]
        pages: Option<String>,

        /// Directory to export to (default: next to the input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Inspect or change persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print all settings as JSON
    Show,

    /// Print a single settings value
    Get {
        /// One of: preview_enabled, default_output_dir, last_used_dir
        key: String,
    },

    /// Change a settings value and persist it
    Set {
        /// One of: preview_enabled, default_output_dir, last_used_dir
        key: String,

        /// New value (empty clears default_output_dir)
        value: String,
    },
}
