//! Media file probing module.
//!
//! Probing runs the media analysis tool through a [`MediaToolchain`] and
//! parses its text report into [`TrackRecord`]s.

mod report;
mod types;

pub use report::parse_report;
pub use types::*;

use crate::toolchain::MediaToolchain;
use crate::Result;
use std::path::Path;

/// Analyze a media file and return its tracks in container order.
///
/// # Errors
///
/// Returns [`crate::Error::SourceUnavailable`] when the analysis tool is
/// missing and [`crate::Error::MalformedReport`] when its output cannot be
/// parsed.
pub fn probe<T: MediaToolchain + ?Sized>(toolchain: &T, path: &Path) -> Result<Vec<TrackRecord>> {
    let report = toolchain.analyze(path)?;
    parse_report(&report)
}
