//! Error types for m2tsforge-av.

use std::fmt;
use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a media file into a tsMuxeR job.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The media analysis tool is not installed, so track data is unknown.
    #[error("media report unavailable: {tool} not found")]
    SourceUnavailable { tool: String },

    /// The media report could not be parsed, or lacks a field that is needed.
    /// `line` is 1-based; 0 means the problem is not tied to one line.
    #[error("malformed media report{}: {message}", at_line(.line))]
    MalformedReport { line: usize, message: String },

    /// Selection kept neither a video nor an audio track.
    #[error("no usable video or audio tracks")]
    NoUsableTracks,

    /// A transcode step finished without producing its output file.
    #[error("transcode incomplete: {} was not produced", expected.display())]
    TranscodeIncomplete { expected: PathBuf },

    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// An external tool failed to execute.
    #[error("tool execution failed: {tool}: {message}")]
    ToolFailed { tool: String, message: String },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a source unavailable error.
    pub fn source_unavailable(tool: impl Into<String>) -> Self {
        Self::SourceUnavailable { tool: tool.into() }
    }

    /// Create a malformed report error for a 1-based line number.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedReport {
            line,
            message: message.into(),
        }
    }

    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a transcode incomplete error.
    pub fn transcode_incomplete(expected: impl Into<PathBuf>) -> Self {
        Self::TranscodeIncomplete {
            expected: expected.into(),
        }
    }
}

fn at_line(line: &usize) -> String {
    if *line == 0 {
        String::new()
    } else {
        format!(" at line {}", line)
    }
}

/// Pipeline stage in which a per-file failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Analyze,
    Parse,
    Select,
    Metafile,
    Remux,
    Cleanup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Analyze => "analyze",
            Stage::Parse => "parse report",
            Stage::Select => "select tracks",
            Stage::Metafile => "write metafile",
            Stage::Remux => "remux",
            Stage::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// A failure while processing one input file.
///
/// Carries the file and the stage so batch callers can report it and move on
/// to the next file.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed for {}: {source}", file.display())]
pub struct FileError {
    pub file: PathBuf,
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl FileError {
    pub fn new(file: impl Into<PathBuf>, stage: Stage, source: Error) -> Self {
        Self {
            file: file.into(),
            stage,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_names_file_and_stage() {
        let err = FileError::new("/movies/a.mkv", Stage::Parse, Error::malformed(4, "no colon"));
        let msg = err.to_string();
        assert!(msg.contains("parse report"));
        assert!(msg.contains("/movies/a.mkv"));
        assert!(msg.contains("line 4"));
    }

    #[test]
    fn test_source_unavailable_is_distinct_from_malformed() {
        let err = Error::source_unavailable("mediainfo");
        assert!(matches!(err, Error::SourceUnavailable { .. }));
        assert_eq!(err.to_string(), "media report unavailable: mediainfo not found");
    }

    #[test]
    fn test_malformed_without_line() {
        assert_eq!(
            Error::malformed(0, "report is empty").to_string(),
            "malformed media report: report is empty"
        );
    }
}
