//! The external programs behind the pipeline, as one capability trait.
//!
//! [`MediaToolchain`] is the only way the pipeline reaches outside the
//! process. [`CliToolchain`] drives the real tools; tests substitute a
//! scripted implementation.

use crate::tools::{get_tool_path, Tool, ToolPaths};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// External media tools used by the pipeline.
///
/// Every call blocks until the tool has exited and its output has been read
/// to the end.
pub trait MediaToolchain {
    /// Produce the text media report for `source`.
    ///
    /// Returns [`Error::SourceUnavailable`] when no analysis tool is present.
    fn analyze(&self, source: &Path) -> Result<String>;

    /// Extract container tracks into standalone files, one `(track ID, output
    /// path)` pair per track.
    fn extract_tracks(&self, source: &Path, targets: &[(u32, PathBuf)]) -> Result<()>;

    /// Transcode a DTS elementary stream to AC-3.
    fn transcode_dts(&self, input: &Path, output: &Path) -> Result<()>;

    /// Remultiplex the streams listed in a metafile into `output`.
    fn remux(&self, metafile: &Path, output: &Path) -> Result<()>;
}

/// [`MediaToolchain`] backed by mediainfo, mkvextract, eac3to and tsMuxeR.
#[derive(Debug, Clone, Default)]
pub struct CliToolchain {
    paths: ToolPaths,
}

impl CliToolchain {
    /// Create a toolchain using configured tool paths, falling back to `PATH`.
    pub fn new(paths: ToolPaths) -> Self {
        Self { paths }
    }

    fn command(&self, tool: Tool) -> Result<Command> {
        let program = get_tool_path(tool, self.paths.get(tool))?;
        Ok(Command::new(program))
    }

    fn run(&self, tool: Tool, mut cmd: Command) -> Result<Output> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Running {:?}", cmd);

        // `output()` reads stdout and stderr to the end before returning.
        cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_not_found(tool.binary_name())
            } else {
                Error::Io(e)
            }
        })
    }
}

impl MediaToolchain for CliToolchain {
    fn analyze(&self, source: &Path) -> Result<String> {
        let mut cmd = match self.command(Tool::MediaInfo) {
            Ok(cmd) => cmd,
            Err(Error::ToolNotFound { tool }) => return Err(Error::source_unavailable(tool)),
            Err(e) => return Err(e),
        };
        cmd.arg("-f").arg(source);

        let output = match self.run(Tool::MediaInfo, cmd) {
            Err(Error::ToolNotFound { tool }) => return Err(Error::source_unavailable(tool)),
            other => other?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool_failed("mediainfo", stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn extract_tracks(&self, source: &Path, targets: &[(u32, PathBuf)]) -> Result<()> {
        let mut cmd = self.command(Tool::MkvExtract)?;
        cmd.arg("tracks").arg(source);
        for (track_id, path) in targets {
            cmd.arg(format!("{}:{}", track_id, path.display()));
        }

        let output = self.run(Tool::MkvExtract, cmd)?;
        forward_output(Tool::MkvExtract, &output);

        // mkvextract returns 0 for success, 1 for warnings (still OK), 2 for errors
        if !output.status.success() && output.status.code() != Some(1) {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool_failed("mkvextract", stderr.trim()));
        }

        Ok(())
    }

    fn transcode_dts(&self, input: &Path, output: &Path) -> Result<()> {
        let mut cmd = self.command(Tool::Eac3to)?;
        cmd.arg(input).arg(output);

        let result = self.run(Tool::Eac3to, cmd)?;
        forward_output(Tool::Eac3to, &result);

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::tool_failed("eac3to", stderr.trim()));
        }

        Ok(())
    }

    fn remux(&self, metafile: &Path, output: &Path) -> Result<()> {
        let mut cmd = self.command(Tool::TsMuxer)?;
        cmd.arg(metafile).arg(output);

        let result = self.run(Tool::TsMuxer, cmd)?;
        forward_output(Tool::TsMuxer, &result);

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::tool_failed("tsMuxeR", stderr.trim()));
        }

        Ok(())
    }
}

/// Log a finished tool's stdout line by line.
#[cfg(feature = "tracing")]
fn forward_output(tool: Tool, output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        match tool {
            Tool::TsMuxer => tracing::info!("{}: {}", tool, line),
            _ => tracing::debug!("{}: {}", tool, line),
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn forward_output(_tool: Tool, _output: &Output) {}
