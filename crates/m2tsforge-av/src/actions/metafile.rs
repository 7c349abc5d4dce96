//! tsMuxeR metafile generation.
//!
//! A metafile is a `MUXOPT` header followed by one line per stream:
//!
//! ```text
//! MUXOPT --no-pcr-on-video-pid --new-audio-pes --vbr --vbv-len=500 --split-size=4GB --blu-ray
//! V_MPEG4/ISO/AVC, "movie.mkv", fps=23.976, insertSEI, contSPS, ar=As source, track=1
//! A_AC3, "movie.mkv", track=2
//! ```

use super::remux::OutputProfile;
use crate::probe::{TrackKind, TrackRecord};
use crate::{Error, Result, Workspace};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

const MUXOPT: &str = "MUXOPT --no-pcr-on-video-pid --new-audio-pes --vbr --vbv-len=500";

/// Output options written to the metafile header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetafileOptions {
    /// Split the output into 4 GB parts.
    pub split: bool,
    /// Disc profile flag.
    pub profile: OutputProfile,
}

/// Render the metafile for `tracks`, which must already be selected.
///
/// Tracks are written in the given order, one line each, every line ending in
/// a newline. Subtitle tracks are not written.
///
/// # Errors
///
/// Returns [`Error::MalformedReport`] when a track lacks a field its line
/// needs (codec ID, frame rate, track ID or external file).
pub fn render_metafile(
    tracks: &[TrackRecord],
    options: &MetafileOptions,
    source: &Path,
) -> Result<String> {
    let mut meta = String::from(MUXOPT);
    if options.split {
        meta.push_str(" --split-size=4GB");
    }
    match options.profile {
        OutputProfile::None => {}
        OutputProfile::BluRay => meta.push_str(" --blu-ray"),
        OutputProfile::Avchd => meta.push_str(" --avchd"),
    }
    meta.push('\n');

    let source = source.display();
    for track in tracks {
        let codec = track
            .codec_id
            .as_deref()
            .ok_or_else(|| missing(track, "Codec ID"))?;

        match track.kind {
            TrackKind::Video => {
                let fps = track
                    .frame_rate
                    .as_deref()
                    .ok_or_else(|| missing(track, "Frame rate"))?;
                if track.track_id == 0 {
                    return Err(missing(track, "ID"));
                }
                let level = if track.has_level_5_1() {
                    " level=4.1,"
                } else {
                    ""
                };
                let _ = writeln!(
                    meta,
                    "{}, \"{}\", fps={},{} insertSEI, contSPS, ar=As source, track={}",
                    codec, source, fps, level, track.track_id
                );
            }
            TrackKind::Audio if track.track_id == 0 => {
                let file = track
                    .external_file
                    .as_deref()
                    .ok_or_else(|| missing(track, "external file"))?;
                let _ = writeln!(meta, "{}, \"{}\"", codec, file.display());
            }
            TrackKind::Audio => {
                let _ = writeln!(meta, "{}, \"{}\", track={}", codec, source, track.track_id);
            }
            TrackKind::Subtitle => {}
        }
    }

    Ok(meta)
}

fn missing(track: &TrackRecord, field: &str) -> Error {
    Error::malformed(
        0,
        format!("{} track {} has no {}", track.kind, track.track_id, field),
    )
}

/// Write the metafile text to the workspace's `<stem>.meta`.
///
/// The text goes to a temporary file in the work directory that is renamed
/// into place, so a failed write leaves no `.meta` behind.
pub fn write_metafile(workspace: &Workspace, meta: &str) -> Result<PathBuf> {
    let path = workspace.meta_path();

    let mut file = tempfile::NamedTempFile::new_in(workspace.work_dir())?;
    file.write_all(meta.as_bytes())?;
    file.flush()?;
    file.persist(&path).map_err(|e| Error::Io(e.error))?;

    #[cfg(feature = "tracing")]
    tracing::info!("Written .meta file {:?}:\n{}", path, meta.trim_end());

    Ok(path)
}
