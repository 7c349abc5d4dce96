//! # m2tsforge-av
//!
//! Turns a Matroska file into a tsMuxeR job for PS3 playback.
//!
//! This crate provides functionality for:
//! - Parsing `mediainfo -f` reports into track records
//! - Selecting the first video and first audio track
//! - Transcoding DTS audio to AC-3 through mkvextract and eac3to
//! - Writing the tsMuxeR metafile and running the remux
//!
//! All external programs are reached through the [`MediaToolchain`] trait.
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use m2tsforge_av::{CliToolchain, ConvertOptions, Pipeline, ToolPaths, Workspace};
//!
//! let toolchain = CliToolchain::new(ToolPaths::default());
//! let pipeline = Pipeline::new(&toolchain, ConvertOptions::new("/out"));
//! let workspace = Workspace::in_current_dir("/movies/movie.mkv")?;
//! let outcome = pipeline.process(&workspace)?;
//! println!("{}", outcome.metafile);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
pub mod actions;
pub mod pipeline;
pub mod probe;
pub mod select;
pub mod toolchain;
pub mod tools;
pub mod workspace;

// Re-exports
pub use actions::{MetafileOptions, OutputFormat, OutputProfile};
pub use error::{Error, FileError, Result, Stage};
pub use pipeline::{ConvertOptions, FileOutcome, Pipeline};
pub use probe::{parse_report, TrackKind, TrackRecord};
pub use select::{select_tracks, DtsDetection, Selection};
pub use toolchain::{CliToolchain, MediaToolchain};
pub use tools::{check_tool, check_tools, require_tool, Tool, ToolInfo, ToolPaths};
pub use workspace::Workspace;

/// Analyze a media file and return its tracks in container order.
///
/// # Example
///
/// ```no_run
/// use m2tsforge_av::{probe, CliToolchain};
///
/// let tracks = probe(&CliToolchain::default(), "/path/to/video.mkv")?;
/// println!("{} tracks", tracks.len());
/// # Ok::<(), m2tsforge_av::Error>(())
/// ```
pub fn probe<T, P>(toolchain: &T, path: P) -> Result<Vec<TrackRecord>>
where
    T: MediaToolchain + ?Sized,
    P: AsRef<std::path::Path>,
{
    probe::probe(toolchain, path.as_ref())
}
