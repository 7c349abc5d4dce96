//! Track selection.
//!
//! The PS3 plays one video and one audio stream, so only the first track of
//! each kind is kept. Further video/audio tracks and all subtitles are dropped.

use crate::probe::TrackRecord;
use crate::{Error, Result};

/// The tracks kept for remuxing: at most one video and one audio track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub video: Option<TrackRecord>,
    pub audio: Option<TrackRecord>,
}

/// Outcome of checking the selection for DTS audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtsDetection {
    /// The selection does not hold both a video and an audio track.
    NotApplicable,
    /// The selected audio track is DTS and needs transcoding.
    Dts,
    /// The selected audio track can be muxed as is.
    NotDts,
}

/// Keep the first video and the first audio track, in that order.
pub fn select_tracks(tracks: &[TrackRecord]) -> Selection {
    Selection {
        video: tracks.iter().find(|t| t.is_video()).cloned(),
        audio: tracks.iter().find(|t| t.is_audio()).cloned(),
    }
}

impl Selection {
    /// Number of selected tracks.
    pub fn len(&self) -> usize {
        self.video.iter().count() + self.audio.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.video.is_none() && self.audio.is_none()
    }

    /// Fail with [`Error::NoUsableTracks`] when nothing was selected.
    pub fn require_tracks(self) -> Result<Self> {
        if self.is_empty() {
            Err(Error::NoUsableTracks)
        } else {
            Ok(self)
        }
    }

    /// Check whether the selected audio is DTS.
    ///
    /// Only meaningful for a video+audio pair; a video-only or audio-only
    /// selection is [`DtsDetection::NotApplicable`].
    pub fn detect_dts(&self) -> DtsDetection {
        match (&self.video, &self.audio) {
            (Some(_), Some(audio)) if audio.is_dts() => DtsDetection::Dts,
            (Some(_), Some(_)) => DtsDetection::NotDts,
            _ => DtsDetection::NotApplicable,
        }
    }

    /// Selected tracks, video first.
    pub fn tracks(&self) -> Vec<TrackRecord> {
        self.video.iter().chain(self.audio.iter()).cloned().collect()
    }

    /// Consume the selection into its tracks, video first.
    pub fn into_tracks(self) -> Vec<TrackRecord> {
        self.video.into_iter().chain(self.audio).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::TrackKind;

    fn video(id: u32) -> TrackRecord {
        TrackRecord::new(TrackKind::Video, id).with_codec("V_MPEG4/ISO/AVC")
    }

    fn audio(id: u32, codec: &str) -> TrackRecord {
        TrackRecord::new(TrackKind::Audio, id).with_codec(codec)
    }

    fn subtitle(id: u32) -> TrackRecord {
        TrackRecord::new(TrackKind::Subtitle, id).with_codec("S_TEXT/UTF8")
    }

    #[test]
    fn test_keeps_first_of_each_kind() {
        let tracks = vec![
            video(1),
            audio(2, "A_AC3"),
            audio(3, "A_DTS"),
            video(4),
            subtitle(5),
        ];
        let selection = select_tracks(&tracks);

        assert_eq!(selection.len(), 2);
        assert_eq!(selection.video.as_ref().unwrap().track_id, 1);
        assert_eq!(selection.audio.as_ref().unwrap().track_id, 2);
    }

    #[test]
    fn test_video_comes_first_regardless_of_source_order() {
        let tracks = vec![subtitle(1), audio(2, "A_AC3"), video(3)];
        let ids: Vec<u32> = select_tracks(&tracks)
            .into_tracks()
            .iter()
            .map(|t| t.track_id)
            .collect();
        assert_eq!(ids, [3, 2]);
    }

    #[test]
    fn test_selection_is_idempotent() {
        let tracks = vec![video(1), audio(2, "A_DTS"), audio(3, "A_AC3"), subtitle(4)];
        let once = select_tracks(&tracks);
        let twice = select_tracks(&once.tracks());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_subtitles_only_is_empty() {
        let selection = select_tracks(&[subtitle(1)]);
        assert!(selection.is_empty());
        assert!(matches!(
            selection.require_tracks().unwrap_err(),
            Error::NoUsableTracks
        ));
    }

    #[test]
    fn test_detect_dts() {
        let dts = select_tracks(&[video(1), audio(2, "A_DTS")]);
        assert_eq!(dts.detect_dts(), DtsDetection::Dts);

        let ac3 = select_tracks(&[video(1), audio(2, "A_AC3")]);
        assert_eq!(ac3.detect_dts(), DtsDetection::NotDts);

        let dts_hd = select_tracks(&[video(1), audio(2, "A_DTS-HD")]);
        assert_eq!(dts_hd.detect_dts(), DtsDetection::NotDts);
    }

    #[test]
    fn test_detect_dts_on_single_track_is_not_applicable() {
        let audio_only = select_tracks(&[audio(2, "A_DTS")]);
        assert_eq!(audio_only.len(), 1);
        assert_eq!(audio_only.detect_dts(), DtsDetection::NotApplicable);

        let video_only = select_tracks(&[video(1)]);
        assert_eq!(video_only.detect_dts(), DtsDetection::NotApplicable);

        assert_eq!(Selection::default().detect_dts(), DtsDetection::NotApplicable);
    }
}
