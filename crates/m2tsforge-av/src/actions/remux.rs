//! Transport stream output formats and the final remux step.

use crate::toolchain::MediaToolchain;
use crate::{Result, Workspace};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Supported tsMuxeR output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// M2TS (Blu-ray transport stream) file
    #[default]
    M2ts,
    /// MPEG transport stream file
    Ts,
    /// Blu-ray disc structure
    BluRay,
    /// AVCHD disc structure
    Avchd,
}

/// Disc profile flag written to the metafile header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputProfile {
    #[default]
    None,
    BluRay,
    Avchd,
}

impl OutputFormat {
    /// Name used on the command line, in file extensions and for disc folders.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::M2ts => "m2ts",
            OutputFormat::Ts => "ts",
            OutputFormat::BluRay => "blu-ray",
            OutputFormat::Avchd => "avchd",
        }
    }

    /// Whether the output is a disc folder rather than a single file.
    pub fn is_disc(&self) -> bool {
        matches!(self, OutputFormat::BluRay | OutputFormat::Avchd)
    }

    /// Metafile profile for this format.
    pub fn profile(&self) -> OutputProfile {
        match self {
            OutputFormat::M2ts | OutputFormat::Ts => OutputProfile::None,
            OutputFormat::BluRay => OutputProfile::BluRay,
            OutputFormat::Avchd => OutputProfile::Avchd,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim_matches('"').to_lowercase().as_str() {
            "m2ts" => Ok(OutputFormat::M2ts),
            "ts" | "mpegts" => Ok(OutputFormat::Ts),
            "blu-ray" | "bluray" => Ok(OutputFormat::BluRay),
            "avchd" => Ok(OutputFormat::Avchd),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Remux the streams named in the workspace metafile into `destination`.
///
/// Returns the path tsMuxeR was asked to write.
pub fn remux<T: MediaToolchain + ?Sized>(
    toolchain: &T,
    workspace: &Workspace,
    destination: &Path,
    format: OutputFormat,
) -> Result<PathBuf> {
    let output = workspace.output_path(destination, format);

    #[cfg(feature = "tracing")]
    tracing::info!("Starting tsMuxeR with output {:?}", output);

    toolchain.remux(&workspace.meta_path(), &output)?;

    #[cfg(feature = "tracing")]
    tracing::info!("Remux complete: {:?}", output);

    Ok(output)
}
