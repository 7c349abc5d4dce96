use clap::{Parser, Subcommand};
use m2tsforge_av::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "m2tsforge")]
#[command(author, version, about = "Convert MKV files to PS3-compatible M2TS/TS with tsMuxeR")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an MKV file, or every MKV file in a directory
    Convert {
        /// The .mkv file or directory of files to convert
        #[arg(required = true)]
        input: PathBuf,

        /// Directory to save output (default is the input file's directory)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Output format: m2ts, ts, blu-ray or avchd
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Split the output into 4 GB files
        #[arg(long)]
        split: bool,

        /// Delete the input file(s) after conversion
        #[arg(long)]
        delete_source: bool,

        /// Write a conversion log next to the input
        #[arg(long)]
        log: bool,

        /// Show the metafile that would be used without converting
        #[arg(long)]
        dry_run: bool,
    },

    /// Analyze a media file and display its tracks
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the tsMuxeR metafile for a file without converting it
    Meta {
        /// File to generate the metafile for
        #[arg(required = true)]
        file: PathBuf,

        /// Output format: m2ts, ts, blu-ray or avchd
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Split the output into 4 GB files
        #[arg(long)]
        split: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
