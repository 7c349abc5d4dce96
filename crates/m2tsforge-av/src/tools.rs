//! External tool detection and management.

use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// The external programs the conversion pipeline drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Media analysis (`mediainfo`).
    MediaInfo,
    /// Matroska track extraction (`mkvextract`).
    MkvExtract,
    /// DTS to AC-3 transcoding (`eac3to`).
    Eac3to,
    /// Transport stream remultiplexing (`tsMuxeR`).
    TsMuxer,
}

impl Tool {
    /// All tools, in pipeline order.
    pub const ALL: [Tool; 4] = [Tool::MediaInfo, Tool::MkvExtract, Tool::Eac3to, Tool::TsMuxer];

    /// Executable name looked up on `PATH`.
    pub fn binary_name(&self) -> &'static str {
        match self {
            Tool::MediaInfo => "mediainfo",
            Tool::MkvExtract => "mkvextract",
            Tool::Eac3to => "eac3to",
            Tool::TsMuxer => "tsMuxeR",
        }
    }

    /// Argument that makes the tool print its version, if it has one.
    fn version_arg(&self) -> Option<&'static str> {
        match self {
            Tool::MediaInfo | Tool::MkvExtract => Some("--version"),
            // eac3to and tsMuxeR print a banner when run without arguments.
            Tool::Eac3to | Tool::TsMuxer => None,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Optional per-tool path overrides, usually read from the config file.
#[derive(Debug, Clone, Default)]
pub struct ToolPaths {
    pub mediainfo: Option<PathBuf>,
    pub mkvextract: Option<PathBuf>,
    pub eac3to: Option<PathBuf>,
    pub tsmuxer: Option<PathBuf>,
}

impl ToolPaths {
    /// Configured override for a tool.
    pub fn get(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::MediaInfo => self.mediainfo.as_deref(),
            Tool::MkvExtract => self.mkvextract.as_deref(),
            Tool::Eac3to => self.eac3to.as_deref(),
            Tool::TsMuxer => self.tsmuxer.as_deref(),
        }
    }
}

/// Check if a tool is available and get its information.
///
/// # Example
///
/// ```no_run
/// use m2tsforge_av::{check_tool, Tool};
///
/// let info = check_tool(Tool::MediaInfo, None);
/// if info.available {
///     println!("mediainfo version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(tool: Tool, configured: Option<&Path>) -> ToolInfo {
    let Ok(path) = get_tool_path(tool, configured) else {
        return ToolInfo {
            name: tool.to_string(),
            available: false,
            version: None,
            path: None,
        };
    };

    let mut cmd = Command::new(&path);
    if let Some(arg) = tool.version_arg() {
        cmd.arg(arg);
    }

    let version = cmd.output().ok().and_then(|output| {
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(|s| s.to_string())
    });

    ToolInfo {
        name: tool.to_string(),
        available: true,
        version,
        path: Some(path),
    }
}

/// Check all tools used by the pipeline.
pub fn check_tools(paths: &ToolPaths) -> Vec<ToolInfo> {
    Tool::ALL
        .iter()
        .map(|&tool| check_tool(tool, paths.get(tool)))
        .collect()
}

/// Require that a tool is available on `PATH`, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(tool: Tool) -> Result<PathBuf> {
    which::which(tool.binary_name()).map_err(|_| Error::tool_not_found(tool.binary_name()))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(tool: Tool, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }

    require_tool(tool)
}
