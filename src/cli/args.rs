use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cdnjs")]
#[command(version)]
#[command(about = "Resolve, cache and mirror static assets from cdnjs", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the URL of a library file
    Get {
        /// Library name, optionally with a version (e.g. jquery or jquery/3.0.0)
        repository: String,
        /// Part of the file name; the library's default file when omitted
        filename: Option<String>,
        /// Return CDN URLs without mirroring
        #[arg(long)]
        cdn: bool,
    },
    /// List cached libraries
    List,
    /// Initialize configuration
    Init,
    /// Show version information
    Version,
}
