//! Parser for the plain-text report printed by `mediainfo -f`.
//!
//! The report is a list of sections. Each section starts with a header line
//! whose first word names it (`General`, `Video`, `Audio #1`, ...) and is
//! followed by `Key : Value` lines up to a blank line:
//!
//! ```text
//! General
//! Complete name  : movie.mkv
//!
//! Video
//! ID             : 1
//! Codec ID       : V_MPEG4/ISO/AVC
//! Frame rate     : 23.976 fps
//!
//! ```
//!
//! `Video`, `Audio` and `Subtitle` sections become [`TrackRecord`]s in report
//! order. Every other section is consumed and dropped. Numbers are always read
//! with `.` as the decimal separator, whatever the host locale.

use super::types::{TrackKind, TrackRecord};
use crate::{Error, Result};

/// Parse a media report into track records, in report order.
///
/// # Errors
///
/// Returns [`Error::MalformedReport`] when the report is empty, when a track
/// section contains a line without a `:` or an unreadable number, or when the
/// text ends inside a section.
pub fn parse_report(text: &str) -> Result<Vec<TrackRecord>> {
    if text.trim().is_empty() {
        return Err(Error::malformed(0, "report is empty"));
    }

    let mut lines = ReportLines::new(text);
    let mut tracks = Vec::new();

    while let Some((line_no, line)) = lines.next_line() {
        if is_blank(line) {
            continue;
        }

        let header = line.split_whitespace().next().unwrap_or_default();
        match TrackKind::from_section(header) {
            Some(kind) => {
                let fields = lines.read_section(line_no, header)?;
                tracks.push(build_record(kind, &fields)?);
            }
            None => lines.skip_section(line_no, header)?,
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Parsed {} tracks from media report", tracks.len());

    Ok(tracks)
}

/// A `Key : Value` line with its 1-based line number.
#[derive(Debug, Clone, Copy)]
struct Field<'a> {
    line: usize,
    key: &'a str,
    value: &'a str,
}

/// Line cursor over the report text.
///
/// Splitting on `\n` leaves an empty final line after a trailing newline, so a
/// report that ends with a newline always closes its last section.
struct ReportLines<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> ReportLines<'a> {
    fn new(text: &'a str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        Self { lines, pos: 0 }
    }

    /// Advance and return the next line with its 1-based number.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = *self.lines.get(self.pos)?;
        self.pos += 1;
        Some((self.pos, line))
    }

    /// Collect the fields of a section up to and including its blank line.
    fn read_section(&mut self, header_line: usize, header: &str) -> Result<Vec<Field<'a>>> {
        let mut fields = Vec::new();
        loop {
            let (line_no, line) = self
                .next_line()
                .ok_or_else(|| unterminated(header_line, header))?;
            if is_blank(line) {
                return Ok(fields);
            }
            fields.push(split_field(line_no, line)?);
        }
    }

    /// Consume a section whose content is not needed.
    fn skip_section(&mut self, header_line: usize, header: &str) -> Result<()> {
        loop {
            let (_, line) = self
                .next_line()
                .ok_or_else(|| unterminated(header_line, header))?;
            if is_blank(line) {
                return Ok(());
            }
        }
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn unterminated(header_line: usize, header: &str) -> Error {
    Error::malformed(
        header_line,
        format!("section `{}` is not terminated by a blank line", header),
    )
}

fn split_field(line_no: usize, line: &str) -> Result<Field<'_>> {
    let (key, value) = line
        .split_once(':')
        .ok_or_else(|| Error::malformed(line_no, format!("expected `Key : Value`, got `{}`", line.trim())))?;

    Ok(Field {
        line: line_no,
        key: key.trim(),
        value: value.trim(),
    })
}

/// Build a record from a finished section. Later repeats of a key override
/// earlier ones.
fn build_record(kind: TrackKind, fields: &[Field<'_>]) -> Result<TrackRecord> {
    let mut record = TrackRecord::new(kind, 0);
    for field in fields {
        apply_field(&mut record, field)?;
    }
    Ok(record)
}

fn apply_field(record: &mut TrackRecord, field: &Field<'_>) -> Result<()> {
    let Field { line, key, value } = *field;
    let is_video = record.kind == TrackKind::Video;

    if key == "Format" {
        record.format = Some(value.to_string());
    } else if key.starts_with("Format/Info") {
        record.format_info = Some(value.to_string());
    } else if key.starts_with("Format profile") {
        record.level_profile = Some(value.to_string());
    } else if key == "Codec ID" {
        record.codec_id = Some(value.to_string());
    } else if key.starts_with("Duration") {
        record.duration = Some(value.to_string());
    } else if key.starts_with("Bit rate")
        && !key.starts_with("Bit rate mode")
        && has_unit(value, &["kbps", "kb/s"])
    {
        record.bit_rate_kbps = Some(parse_kbps(line, key, value)?);
    } else if is_video && key.starts_with("Width") && has_unit(value, &["pixels"]) {
        record.width = Some(parse_integer(line, key, value)?);
    } else if is_video && key.starts_with("Height") && has_unit(value, &["pixels"]) {
        record.height = Some(parse_integer(line, key, value)?);
    } else if is_video && key.starts_with("Frame rate") && has_unit(value, &["fps"]) {
        let fps = leading_number(value)
            .ok_or_else(|| not_a_number(line, key, value))?;
        record.frame_rate = Some(fps);
    } else if is_video && key.starts_with("Display aspect ratio") {
        record.aspect_ratio = Some(value.to_string());
    } else if key.starts_with("Language") {
        record.language = Some(value.to_string());
    } else if key == "ID" {
        record.track_id = parse_integer(line, key, value)?;
    }

    Ok(())
}

fn has_unit(value: &str, units: &[&str]) -> bool {
    let value = value.to_lowercase();
    units.iter().any(|unit| value.contains(unit))
}

/// Leading run of numeric tokens joined together, so digit groups such as
/// `1 500` read as `1500`.
fn leading_number(value: &str) -> Option<String> {
    let number: String = value
        .split_whitespace()
        .take_while(|token| token.chars().all(|c| c.is_ascii_digit() || c == '.'))
        .collect();

    if number.chars().any(|c| c.is_ascii_digit()) {
        Some(number)
    } else {
        None
    }
}

fn parse_integer(line: usize, key: &str, value: &str) -> Result<u32> {
    leading_number(value)
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| not_a_number(line, key, value))
}

fn parse_kbps(line: usize, key: &str, value: &str) -> Result<u32> {
    // str::parse::<f64> only ever accepts `.` as the decimal separator.
    let kbps = leading_number(value)
        .and_then(|n| n.parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= u32::MAX as f64)
        .ok_or_else(|| not_a_number(line, key, value))?;
    Ok(kbps.round() as u32)
}

fn not_a_number(line: usize, key: &str, value: &str) -> Error {
    Error::malformed(line, format!("`{}` is not a number: `{}`", key, value))
}
