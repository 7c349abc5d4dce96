use m2tsforge_av::{OutputFormat, ToolPaths};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub convert: ConvertConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub mediainfo_path: Option<PathBuf>,

    #[serde(default)]
    pub mkvextract_path: Option<PathBuf>,

    #[serde(default)]
    pub eac3to_path: Option<PathBuf>,

    #[serde(default)]
    pub tsmuxer_path: Option<PathBuf>,
}

impl ToolsConfig {
    pub fn tool_paths(&self) -> ToolPaths {
        ToolPaths {
            mediainfo: self.mediainfo_path.clone(),
            mkvextract: self.mkvextract_path.clone(),
            eac3to: self.eac3to_path.clone(),
            tsmuxer: self.tsmuxer_path.clone(),
        }
    }

    /// Configured paths, labelled with their config key.
    pub fn configured(&self) -> Vec<(&'static str, &PathBuf)> {
        [
            ("mediainfo_path", &self.mediainfo_path),
            ("mkvextract_path", &self.mkvextract_path),
            ("eac3to_path", &self.eac3to_path),
            ("tsmuxer_path", &self.tsmuxer_path),
        ]
        .into_iter()
        .filter_map(|(key, path)| path.as_ref().map(|p| (key, p)))
        .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// Output format (m2ts, ts, blu-ray, avchd)
    #[serde(default)]
    pub format: OutputFormat,

    /// Split output into 4 GB parts
    #[serde(default)]
    pub split: bool,

    /// Delete source files after a successful conversion
    #[serde(default)]
    pub delete_source: bool,

    /// Directory for intermediate files (default: current directory)
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// File extensions picked up when the input is a directory
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["mkv".to_string()]
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            split: false,
            delete_source: false,
            work_dir: None,
            extensions: default_extensions(),
        }
    }
}
