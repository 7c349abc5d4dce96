//! DTS to AC-3 transcoding.
//!
//! The PS3 cannot play DTS from a transport stream, so a DTS track is pulled
//! out of the container, converted to AC-3 and muxed from the standalone file.

use crate::probe::{TrackRecord, CODEC_AC3, CODEC_AVC, CODEC_DTS};
use crate::toolchain::MediaToolchain;
use crate::{Error, Workspace};
use std::path::PathBuf;

/// Elementary stream extension for the codecs this pipeline can extract.
pub fn stream_extension(codec_id: &str) -> Option<&'static str> {
    match codec_id {
        CODEC_AVC => Some("h264"),
        CODEC_AC3 => Some("ac3"),
        CODEC_DTS => Some("dts"),
        _ => None,
    }
}

/// `(track ID, output path)` pairs for every track with an extractable codec.
///
/// Tracks with other codecs are left out and stay referenced by container ID.
pub fn extraction_targets(workspace: &Workspace, tracks: &[TrackRecord]) -> Vec<(u32, PathBuf)> {
    tracks
        .iter()
        .filter_map(|track| {
            stream_extension(track.codec())
                .map(|ext| (track.track_id, workspace.stream_path(ext)))
        })
        .collect()
}

/// Replace DTS audio with a transcoded AC-3 file.
///
/// Extraction and transcoding are best effort: if the `.ac3` file does not
/// exist afterwards the tracks are returned unchanged and the DTS track is
/// muxed from the container as before. Order is preserved and only DTS audio
/// records are replaced.
pub fn transcode_dts<T: MediaToolchain + ?Sized>(
    toolchain: &T,
    workspace: &Workspace,
    tracks: Vec<TrackRecord>,
) -> Vec<TrackRecord> {
    let targets = extraction_targets(workspace, &tracks);
    let dts_path = workspace.stream_path("dts");
    let ac3_path = workspace.stream_path("ac3");

    #[cfg(feature = "tracing")]
    tracing::info!(
        "Extracting {} tracks from {:?}",
        targets.len(),
        workspace.source()
    );

    if let Err(e) = toolchain.extract_tracks(workspace.source(), &targets) {
        #[cfg(feature = "tracing")]
        tracing::warn!("Track extraction failed: {}", e);
        let _ = e;
    }

    #[cfg(feature = "tracing")]
    tracing::info!("Transcoding {:?} to {:?}", dts_path, ac3_path);

    if let Err(e) = toolchain.transcode_dts(&dts_path, &ac3_path) {
        #[cfg(feature = "tracing")]
        tracing::warn!("DTS transcode failed: {}", e);
        let _ = e;
    }

    if !ac3_path.exists() {
        let incomplete = Error::transcode_incomplete(&ac3_path);
        #[cfg(feature = "tracing")]
        tracing::warn!("{}; keeping the DTS track", incomplete);
        let _ = incomplete;
        return tracks;
    }

    tracks
        .into_iter()
        .map(|track| {
            if track.is_dts() {
                track.replaced_by_ac3(&ac3_path)
            } else {
                track
            }
        })
        .collect()
}
