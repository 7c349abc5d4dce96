//! Workspace management for pipeline execution.

use crate::actions::OutputFormat;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Extensions of the intermediate files the pipeline may leave in the work
/// directory.
const INTERMEDIATE_EXTENSIONS: [&str; 4] = ["h264", "ac3", "dts", "meta"];

/// Working context for converting one source file.
///
/// Owns the naming conventions: every intermediate file is named after the
/// source's file stem and lives in the work directory.
///
/// # Example
///
/// ```no_run
/// use m2tsforge_av::Workspace;
///
/// let workspace = Workspace::new("/movies/movie.mkv", "/tmp/work")?;
/// assert_eq!(workspace.meta_path(), std::path::Path::new("/tmp/work/movie.meta"));
/// # Ok::<(), m2tsforge_av::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Workspace {
    source: PathBuf,
    work_dir: PathBuf,
    stem: String,
}

impl Workspace {
    /// Create a workspace for `source` with intermediates in `work_dir`.
    pub fn new<P: AsRef<Path>, W: AsRef<Path>>(source: P, work_dir: W) -> Result<Self> {
        let source = source.as_ref();
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::InvalidInput(format!("Invalid input file path: {}", source.display()))
            })?;

        Ok(Self {
            source: source.to_path_buf(),
            work_dir: work_dir.as_ref().to_path_buf(),
            stem,
        })
    }

    /// Create a workspace using the current directory for intermediates.
    pub fn in_current_dir<P: AsRef<Path>>(source: P) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::new(source, cwd)
    }

    /// Get the source file path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Get the work directory path.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Source file name without its extension.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Path of an intermediate file `<stem>.<ext>` in the work directory.
    pub fn stream_path(&self, ext: &str) -> PathBuf {
        self.work_dir.join(format!("{}.{}", self.stem, ext))
    }

    /// Path of the tsMuxeR metafile.
    pub fn meta_path(&self) -> PathBuf {
        self.stream_path("meta")
    }

    /// Where the remuxer should write its output inside `destination`.
    ///
    /// Stream formats produce `<stem>.m2ts` / `<stem>.ts`; disc formats produce
    /// a directory named after the format.
    pub fn output_path(&self, destination: &Path, format: OutputFormat) -> PathBuf {
        if format.is_disc() {
            destination.join(format.as_str())
        } else {
            destination.join(format!("{}.{}", self.stem, format.as_str()))
        }
    }

    /// Remove intermediate files, returning the ones that were deleted.
    pub fn cleanup(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for ext in INTERMEDIATE_EXTENSIONS {
            let path = self.stream_path(ext);
            if path.exists() {
                std::fs::remove_file(&path)?;
                removed.push(path);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Removed {} intermediate files for {}", removed.len(), self.stem);

        Ok(removed)
    }

    /// Delete the source file.
    pub fn remove_source(&self) -> Result<()> {
        if self.source.exists() {
            std::fs::remove_file(&self.source)?;
        }
        Ok(())
    }
}
