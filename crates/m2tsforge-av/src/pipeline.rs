//! Per-file conversion pipeline.
//!
//! analyze → parse → select → (DTS only) transcode → metafile → remux →
//! cleanup. Each stage consumes the previous stage's output and nothing runs
//! concurrently.

use crate::actions::{
    remux, render_metafile, transcode_dts, write_metafile, MetafileOptions, OutputFormat,
};
use crate::error::{FileError, Stage};
use crate::probe::{parse_report, TrackRecord};
use crate::select::{select_tracks, DtsDetection};
use crate::toolchain::MediaToolchain;
use crate::{Error, Workspace};
use std::path::PathBuf;

/// Options for converting one file.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Split output into 4 GB parts.
    pub split: bool,
    /// Directory receiving the remuxed output.
    pub destination: PathBuf,
    /// Delete the source after a successful remux.
    pub delete_source: bool,
    /// Render the metafile only; no transcoding, writing or remuxing.
    pub dry_run: bool,
}

impl ConvertOptions {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            format: OutputFormat::default(),
            split: false,
            destination: destination.into(),
            delete_source: false,
            dry_run: false,
        }
    }

    fn metafile_options(&self) -> MetafileOptions {
        MetafileOptions {
            split: self.split,
            profile: self.format.profile(),
        }
    }
}

/// Result of converting one file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Source file.
    pub source: PathBuf,
    /// Tracks written to the metafile, video first.
    pub tracks: Vec<TrackRecord>,
    /// DTS check on the selection.
    pub dts: DtsDetection,
    /// Whether the audio now comes from a transcoded AC-3 file.
    pub transcoded: bool,
    /// Metafile text.
    pub metafile: String,
    /// Remuxer output path; `None` on a dry run.
    pub output: Option<PathBuf>,
}

/// Runs the conversion of single files against a toolchain.
pub struct Pipeline<'a, T: MediaToolchain + ?Sized> {
    toolchain: &'a T,
    options: ConvertOptions,
}

impl<'a, T: MediaToolchain + ?Sized> Pipeline<'a, T> {
    pub fn new(toolchain: &'a T, options: ConvertOptions) -> Self {
        Self { toolchain, options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert the workspace's source file.
    ///
    /// Intermediate files are removed whether or not conversion succeeds. The
    /// source is deleted only after a successful remux, and only when
    /// [`ConvertOptions::delete_source`] is set.
    pub fn process(&self, workspace: &Workspace) -> Result<FileOutcome, FileError> {
        let result = self.run(workspace);
        if self.options.dry_run {
            return result;
        }

        let cleanup = workspace.cleanup();
        let outcome = match (result, cleanup) {
            (Ok(outcome), Ok(_)) => outcome,
            (Ok(_), Err(e)) => return Err(FileError::new(workspace.source(), Stage::Cleanup, e)),
            (Err(err), cleanup) => {
                if let Err(e) = cleanup {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Cleanup after failure also failed: {}", e);
                    let _ = e;
                }
                return Err(err);
            }
        };

        if self.options.delete_source {
            #[cfg(feature = "tracing")]
            tracing::info!("Deleting source {:?}", workspace.source());
            workspace
                .remove_source()
                .map_err(|e| FileError::new(workspace.source(), Stage::Cleanup, e))?;
        }

        Ok(outcome)
    }

    fn run(&self, workspace: &Workspace) -> Result<FileOutcome, FileError> {
        let source = workspace.source();
        let at = |stage: Stage| move |e: Error| FileError::new(source, stage, e);

        #[cfg(feature = "tracing")]
        tracing::info!("Analyzing {:?}", source);

        let report = self.toolchain.analyze(source).map_err(at(Stage::Analyze))?;
        let all_tracks = parse_report(&report).map_err(at(Stage::Parse))?;
        let selection = select_tracks(&all_tracks)
            .require_tracks()
            .map_err(at(Stage::Select))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Selected {} of {} tracks from {:?}",
            selection.len(),
            all_tracks.len(),
            source
        );

        let dts = selection.detect_dts();
        let mut tracks = selection.into_tracks();
        let mut transcoded = false;

        if dts == DtsDetection::Dts {
            if self.options.dry_run {
                #[cfg(feature = "tracing")]
                tracing::info!("[DRY RUN] Would transcode DTS audio to AC-3");
            } else {
                tracks = transcode_dts(self.toolchain, workspace, tracks);
                transcoded = tracks.iter().any(|t| t.external_file.is_some());
            }
        }

        let metafile = render_metafile(&tracks, &self.options.metafile_options(), source)
            .map_err(at(Stage::Metafile))?;

        if self.options.dry_run {
            return Ok(FileOutcome {
                source: source.to_path_buf(),
                tracks,
                dts,
                transcoded,
                metafile,
                output: None,
            });
        }

        write_metafile(workspace, &metafile).map_err(at(Stage::Metafile))?;

        let output = remux(
            self.toolchain,
            workspace,
            &self.options.destination,
            self.options.format,
        )
        .map_err(at(Stage::Remux))?;

        Ok(FileOutcome {
            source: source.to_path_buf(),
            tracks,
            dts,
            transcoded,
            metafile,
            output: Some(output),
        })
    }
}
