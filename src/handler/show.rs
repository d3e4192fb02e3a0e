// Diagnostic handler: one human-readable (or JSON) line per segment

use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use super::SegmentHandler;
use crate::id3::Id3v1Tag;
use crate::mpeg::{Frame, FrameHeader};
use crate::scanner::ScanStats;
use crate::utils::encoding::Charset;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `<kind>: <size> bytes, field: value, ...`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum SegmentReport<'a> {
    Ape {
        size: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<String>,
    },
    Id3v1 {
        size: usize,
        #[serde(flatten)]
        tag: Id3v1Tag,
        genre_name: Option<&'static str>,
    },
    Id3v2 {
        size: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<String>,
    },
    #[serde(rename = "mp3frame")]
    MpegFrame {
        size: usize,
        #[serde(flatten)]
        header: &'a FrameHeader,
    },
    Unrecognized {
        size: usize,
        byte: u8,
    },
}

/// Writes a report line for every segment to `out`.
///
/// ID3v1 tags and frame headers are decoded field by field. ID3v2 and APE
/// tags are opaque and only their size is shown, plus their raw bytes in
/// base64 when `raw` is set.
pub struct ShowHandler<W> {
    out: W,
    format: OutputFormat,
    charset: Charset,
    raw: bool,
}

impl<W: Write> ShowHandler<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        ShowHandler {
            out,
            format,
            charset: Charset::Latin1,
            raw: false,
        }
    }

    /// Character set used to decode ID3v1 strings.
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Write the closing `size: <total>` line.
    pub fn write_total(&mut self, stats: &ScanStats) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "size: {}", stats.total_bytes),
            OutputFormat::Json => {
                let total = serde_json::json!({ "size": stats.total_bytes, "stats": stats });
                serde_json::to_writer(&mut self.out, &total)?;
                writeln!(self.out)
            }
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn raw_data(&self, bytes: &[u8]) -> Option<String> {
        self.raw.then(|| STANDARD.encode(bytes))
    }

    fn emit(&mut self, report: &SegmentReport<'_>) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, report)?;
                writeln!(self.out)?;
            }
            OutputFormat::Text => {
                let line = text_line(report);
                writeln!(self.out, "{}", line)?;
            }
        }
        Ok(())
    }
}

fn text_line(report: &SegmentReport<'_>) -> String {
    match report {
        SegmentReport::Ape { size, data } => opaque_line("ape", *size, data.as_deref()),
        SegmentReport::Id3v2 { size, data } => opaque_line("id3v2", *size, data.as_deref()),
        SegmentReport::Id3v1 { size, tag, .. } => format!(
            "id3v1: {} bytes, header: TAG, title: {}, artist: {}, album: {}, year: {}, comment: {}, track: {}, genre: {}",
            size, tag.title, tag.artist, tag.album, tag.year, tag.comment, tag.track, tag.genre
        ),
        SegmentReport::MpegFrame { size, header } => format!(
            "mp3frame: {} bytes, version: {}, layer: {}, protection: {}, bitrate: {}, \
             sampling rate: {}, padding: {}, private: {}, channel mode: {}, \
             mode extension: {}, copyright: {}, original: {}, emphasis: {}",
            size,
            header.version,
            header.layer,
            header.protection,
            header.bitrate_kbps,
            header.sampling_rate_hz,
            header.padding,
            header.private,
            header.channel_mode,
            header.mode_extension,
            header.copyright,
            header.original,
            header.emphasis
        ),
        SegmentReport::Unrecognized { byte, .. } => {
            format!("unrecognized: 1 byte, value: {:#04x}", byte)
        }
    }
}

fn opaque_line(kind: &str, size: usize, data: Option<&str>) -> String {
    match data {
        Some(data) => format!("{}: {} bytes, data: {}", kind, size, data),
        None => format!("{}: {} bytes", kind, size),
    }
}

impl<W: Write> SegmentHandler for ShowHandler<W> {
    fn on_ape_tag(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        let report = SegmentReport::Ape {
            size: bytes.len(),
            data: self.raw_data(bytes),
        };
        self.emit(&report)
    }

    fn on_id3v1_tag(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        let tag = Id3v1Tag::from_bytes_in(bytes, self.charset)?;
        let genre_name = tag.genre_name();
        self.emit(&SegmentReport::Id3v1 {
            size: bytes.len(),
            tag,
            genre_name,
        })
    }

    fn on_id3v2_tag(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        let report = SegmentReport::Id3v2 {
            size: bytes.len(),
            data: self.raw_data(bytes),
        };
        self.emit(&report)
    }

    fn on_mpeg_frame(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        self.emit(&SegmentReport::MpegFrame {
            size: frame.data.len(),
            header: &frame.header,
        })
    }

    fn on_unrecognized_byte(&mut self, byte: u8) -> anyhow::Result<()> {
        self.emit(&SegmentReport::Unrecognized { size: 1, byte })
    }
}
