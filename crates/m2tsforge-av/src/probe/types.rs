//! Track record types.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Codec ID of AVC video in a Matroska container.
pub const CODEC_AVC: &str = "V_MPEG4/ISO/AVC";
/// Codec ID of AC-3 audio.
pub const CODEC_AC3: &str = "A_AC3";
/// Codec ID of DTS audio.
pub const CODEC_DTS: &str = "A_DTS";

/// Kind of media track.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

impl TrackKind {
    /// Map a report section header word to a track kind.
    pub fn from_section(word: &str) -> Option<Self> {
        match word {
            "Video" => Some(TrackKind::Video),
            "Audio" => Some(TrackKind::Audio),
            "Subtitle" => Some(TrackKind::Subtitle),
            _ => None,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Video => f.write_str("Video"),
            TrackKind::Audio => f.write_str("Audio"),
            TrackKind::Subtitle => f.write_str("Subtitle"),
        }
    }
}

/// Description of one track in a media file.
///
/// `track_id` is the container's track ID. Zero is reserved for a track whose
/// media lives in a standalone file (see [`TrackRecord::external_file`]).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrackRecord {
    /// Container track ID, or 0 for an external file.
    pub track_id: u32,
    /// Track kind.
    pub kind: TrackKind,
    /// Format name (e.g. "AVC", "DTS").
    pub format: Option<String>,
    /// Long format description.
    pub format_info: Option<String>,
    /// Container codec ID (e.g. "V_MPEG4/ISO/AVC", "A_DTS").
    pub codec_id: Option<String>,
    /// Duration as reported.
    pub duration: Option<String>,
    /// Language as reported.
    pub language: Option<String>,
    /// Bit rate in kbps.
    pub bit_rate_kbps: Option<u32>,
    /// Width in pixels (video only).
    pub width: Option<u32>,
    /// Height in pixels (video only).
    pub height: Option<u32>,
    /// Frame rate with the unit stripped, kept as text (video only).
    pub frame_rate: Option<String>,
    /// Display aspect ratio (video only).
    pub aspect_ratio: Option<String>,
    /// Format profile, may carry a level such as "High@L5.1" (video only).
    pub level_profile: Option<String>,
    /// Standalone file holding this track's media.
    pub external_file: Option<PathBuf>,
}

impl TrackRecord {
    /// Create an empty record of the given kind.
    pub fn new(kind: TrackKind, track_id: u32) -> Self {
        Self {
            track_id,
            kind,
            format: None,
            format_info: None,
            codec_id: None,
            duration: None,
            language: None,
            bit_rate_kbps: None,
            width: None,
            height: None,
            frame_rate: None,
            aspect_ratio: None,
            level_profile: None,
            external_file: None,
        }
    }

    /// Set the codec ID.
    pub fn with_codec(mut self, codec_id: impl Into<String>) -> Self {
        self.codec_id = Some(codec_id.into());
        self
    }

    /// Codec ID, or an empty string when the report had none.
    pub fn codec(&self) -> &str {
        self.codec_id.as_deref().unwrap_or("")
    }

    pub fn is_video(&self) -> bool {
        self.kind == TrackKind::Video
    }

    pub fn is_audio(&self) -> bool {
        self.kind == TrackKind::Audio
    }

    /// Whether this is a DTS audio track (exact codec ID match).
    pub fn is_dts(&self) -> bool {
        self.is_audio() && self.codec_id.as_deref() == Some(CODEC_DTS)
    }

    /// Whether the profile string carries a 5.1 level.
    pub fn has_level_5_1(&self) -> bool {
        self.level_profile
            .as_deref()
            .is_some_and(|profile| profile.contains("5.1"))
    }

    /// Return a copy that references a standalone AC-3 file instead of the
    /// container track.
    pub fn replaced_by_ac3(&self, file: &Path) -> Self {
        Self {
            track_id: 0,
            codec_id: Some(CODEC_AC3.to_string()),
            external_file: Some(file.to_path_buf()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_dts_requires_exact_codec() {
        let dts = TrackRecord::new(TrackKind::Audio, 2).with_codec("A_DTS");
        let dts_hd = TrackRecord::new(TrackKind::Audio, 2).with_codec("A_DTS-HD");
        let video = TrackRecord::new(TrackKind::Video, 1).with_codec("A_DTS");

        assert!(dts.is_dts());
        assert!(!dts_hd.is_dts());
        assert!(!video.is_dts());
    }

    #[test]
    fn test_replaced_by_ac3_keeps_descriptive_fields() {
        let mut dts = TrackRecord::new(TrackKind::Audio, 2).with_codec("A_DTS");
        dts.language = Some("English".to_string());

        let ac3 = dts.replaced_by_ac3(Path::new("movie.ac3"));
        assert_eq!(ac3.track_id, 0);
        assert_eq!(ac3.codec(), CODEC_AC3);
        assert_eq!(ac3.external_file.as_deref(), Some(Path::new("movie.ac3")));
        assert_eq!(ac3.language.as_deref(), Some("English"));
        // The original record is untouched.
        assert_eq!(dts.codec(), CODEC_DTS);
    }

    #[test]
    fn test_level_detection() {
        let mut video = TrackRecord::new(TrackKind::Video, 1);
        assert!(!video.has_level_5_1());
        video.level_profile = Some("High@L5.1".to_string());
        assert!(video.has_level_5_1());
        video.level_profile = Some("High@L4.1".to_string());
        assert!(!video.has_level_5_1());
    }
}
