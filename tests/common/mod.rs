//! Shared helpers for integration tests.

#![allow(dead_code)]

use m2tsforge_av::{Error, MediaToolchain, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Report for an H.264 + DTS movie with a subtitle track.
pub const DTS_MOVIE: &str = "General
Complete name                    : movie.mkv
Format                           : Matroska

Video
ID                               : 1
Format                           : AVC
Format profile                   : High@L4.1
Codec ID                         : V_MPEG4/ISO/AVC
Width                            : 1 920 pixels
Height                           : 1 080 pixels
Frame rate                       : 23.976 fps

Audio
ID                               : 2
Format                           : DTS
Codec ID                         : A_DTS
Bit rate                         : 1 536 Kbps
Language                         : English

Text
ID                               : 3
Codec ID                         : S_TEXT/UTF8

";

/// Report for an H.264 level 5.1 + AC-3 movie.
pub const AC3_MOVIE: &str = "General
Format                           : Matroska

Video
ID                               : 1
Format profile                   : High@L5.1
Codec ID                         : V_MPEG4/ISO/AVC
Frame rate                       : 25.000 fps

Audio
ID                               : 2
Codec ID                         : A_AC3
Bit rate                         : 640 Kbps

";

/// Report for a file with only a DTS audio track.
pub const DTS_ONLY: &str = "Audio
ID                               : 1
Codec ID                         : A_DTS

";

/// One recorded toolchain call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Analyze(PathBuf),
    Extract(Vec<(u32, PathBuf)>),
    Transcode { input: PathBuf, output: PathBuf },
    Remux { metafile: PathBuf, output: PathBuf },
}

/// Toolchain double that serves canned reports and records every call.
#[derive(Default)]
pub struct FakeToolchain {
    /// Reports keyed by source file name; unknown files fail analysis.
    reports: HashMap<String, String>,
    /// Whether the transcoder writes its `.ac3` output.
    pub produce_ac3: bool,
    /// Whether the remuxer exits with an error.
    pub fail_remux: bool,
    calls: RefCell<Vec<Call>>,
    /// Metafile contents as seen by the remuxer.
    metafiles: RefCell<Vec<String>>,
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(mut self, file_name: &str, report: &str) -> Self {
        self.reports.insert(file_name.to_string(), report.to_string());
        self
    }

    pub fn producing_ac3(mut self) -> Self {
        self.produce_ac3 = true;
        self
    }

    pub fn failing_remux(mut self) -> Self {
        self.fail_remux = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn metafiles(&self) -> Vec<String> {
        self.metafiles.borrow().clone()
    }

    pub fn transcode_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Transcode { .. }))
            .count()
    }

    pub fn remux_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Remux { .. }))
            .count()
    }
}

impl MediaToolchain for FakeToolchain {
    fn analyze(&self, source: &Path) -> Result<String> {
        self.calls
            .borrow_mut()
            .push(Call::Analyze(source.to_path_buf()));

        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.reports
            .get(&name)
            .cloned()
            .ok_or_else(|| Error::source_unavailable("mediainfo"))
    }

    fn extract_tracks(&self, _source: &Path, targets: &[(u32, PathBuf)]) -> Result<()> {
        self.calls.borrow_mut().push(Call::Extract(targets.to_vec()));
        for (_, path) in targets {
            std::fs::write(path, b"stream")?;
        }
        Ok(())
    }

    fn transcode_dts(&self, input: &Path, output: &Path) -> Result<()> {
        self.calls.borrow_mut().push(Call::Transcode {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });
        if self.produce_ac3 {
            std::fs::write(output, b"ac3")?;
            Ok(())
        } else {
            Err(Error::tool_failed("eac3to", "unsupported DTS stream"))
        }
    }

    fn remux(&self, metafile: &Path, output: &Path) -> Result<()> {
        self.calls.borrow_mut().push(Call::Remux {
            metafile: metafile.to_path_buf(),
            output: output.to_path_buf(),
        });
        self.metafiles
            .borrow_mut()
            .push(std::fs::read_to_string(metafile)?);

        if self.fail_remux {
            return Err(Error::tool_failed("tsMuxeR", "muxing failed"));
        }
        std::fs::write(output, b"m2ts")?;
        Ok(())
    }
}

/// Create a placeholder source file in `dir`.
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"matroska").unwrap();
    path
}
