//! Batch conversion of a single file or a directory tree.
//!
//! Files are converted one at a time in path order. A failing file is logged
//! and skipped; the remaining files are still attempted.

use m2tsforge_av::{
    ConvertOptions, FileError, FileOutcome, MediaToolchain, OutputFormat, Pipeline, Stage,
    Workspace,
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Problems with the batch input that stop the run before any file is touched.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("invalid input {0:?}")]
    NotFound(PathBuf),

    #[error("no {extensions} files in directory {dir:?}")]
    NoMatchingFiles { dir: PathBuf, extensions: String },

    #[error("can't convert multiple files to {0} format")]
    MultipleDiscOutputs(OutputFormat),

    #[error("unable to create destination path {path:?}: {source}")]
    Destination {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Settings shared by every file in a batch.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub format: OutputFormat,
    pub split: bool,
    /// Output directory; each file's own directory when `None`.
    pub destination: Option<PathBuf>,
    pub delete_source: bool,
    pub dry_run: bool,
    /// Directory for intermediate files.
    pub work_dir: PathBuf,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<FileOutcome>,
    pub failed: Vec<FileError>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Resolve the input into the list of files to convert.
///
/// A file is returned as is. A directory is searched recursively for files
/// whose extension matches one of `extensions` (case-insensitive), sorted by
/// path.
pub fn collect_inputs(input: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, InputError> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(InputError::NotFound(input.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, extensions))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(InputError::NoMatchingFiles {
            dir: input.to_path_buf(),
            extensions: extensions.join("/"),
        });
    }

    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        })
}

/// Disc formats write a fixed-name folder, so they take a single input.
pub fn check_format_for_inputs(files: &[PathBuf], format: OutputFormat) -> Result<(), InputError> {
    if files.len() > 1 && format.is_disc() {
        return Err(InputError::MultipleDiscOutputs(format));
    }
    Ok(())
}

/// Create the destination directory if it does not exist yet.
pub fn ensure_destination(path: &Path) -> Result<(), InputError> {
    if path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|source| InputError::Destination {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert each file in order, continuing past failures.
pub fn run_batch<T: MediaToolchain + ?Sized>(
    toolchain: &T,
    files: &[PathBuf],
    settings: &BatchSettings,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for file in files {
        tracing::info!("Processing file {:?}...", file);

        match convert_file(toolchain, file, settings) {
            Ok(outcome) => {
                tracing::info!("Finished processing file {:?}", file);
                summary.succeeded.push(outcome);
            }
            Err(e) => {
                tracing::error!("{}", e);
                summary.failed.push(e);
            }
        }
    }

    summary
}

fn convert_file<T: MediaToolchain + ?Sized>(
    toolchain: &T,
    file: &Path,
    settings: &BatchSettings,
) -> Result<FileOutcome, FileError> {
    let destination = settings
        .destination
        .clone()
        .unwrap_or_else(|| default_destination(file));

    let workspace = Workspace::new(file, &settings.work_dir)
        .map_err(|e| FileError::new(file, Stage::Analyze, e))?;

    let options = ConvertOptions {
        format: settings.format,
        split: settings.split,
        destination,
        delete_source: settings.delete_source,
        dry_run: settings.dry_run,
    };

    Pipeline::new(toolchain, options).process(&workspace)
}

/// The file's own directory, or `.` for a bare file name.
fn default_destination(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn mkv() -> Vec<String> {
        vec!["mkv".to_string()]
    }

    #[test]
    fn test_collect_single_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("movie.avi");
        std::fs::write(&file, b"x").unwrap();

        // An explicit file is taken whatever its extension.
        assert_eq!(collect_inputs(&file, &mkv()).unwrap(), vec![file]);
    }

    #[test]
    fn test_collect_directory_recursively_sorted() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("season 1")).unwrap();
        for name in ["b.mkv", "a.MKV", "notes.txt", "season 1/c.mkv"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = collect_inputs(dir.path(), &mkv()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            [
                PathBuf::from("a.MKV"),
                PathBuf::from("b.mkv"),
                PathBuf::from("season 1/c.mkv"),
            ]
        );
    }

    #[test]
    fn test_collect_empty_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        assert!(matches!(
            collect_inputs(dir.path(), &mkv()).unwrap_err(),
            InputError::NoMatchingFiles { .. }
        ));
    }

    #[test]
    fn test_collect_missing_input() {
        assert!(matches!(
            collect_inputs(Path::new("/nonexistent/input_12345"), &mkv()).unwrap_err(),
            InputError::NotFound(_)
        ));
    }

    #[test]
    fn test_disc_format_takes_one_file() {
        let two = vec![PathBuf::from("a.mkv"), PathBuf::from("b.mkv")];
        assert!(check_format_for_inputs(&two, OutputFormat::M2ts).is_ok());
        assert!(check_format_for_inputs(&two[..1], OutputFormat::BluRay).is_ok());
        assert!(matches!(
            check_format_for_inputs(&two, OutputFormat::Avchd).unwrap_err(),
            InputError::MultipleDiscOutputs(OutputFormat::Avchd)
        ));
    }

    #[test]
    fn test_ensure_destination_creates_dirs() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out/ps3");
        ensure_destination(&dest).unwrap();
        assert!(dest.is_dir());
    }

    #[test]
    fn test_default_destination() {
        assert_eq!(default_destination(Path::new("/movies/a.mkv")), Path::new("/movies"));
        assert_eq!(default_destination(Path::new("a.mkv")), Path::new("."));
    }
}
