// Error types shared by the scanner, the decoders and the retagging helpers

use std::fmt;
use std::io;

use thiserror::Error;

use crate::mpeg::FrameHeaderError;
use crate::utils::encoding::EncodingError;

/// Kind of block the scanner was reading when something went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Id3v1,
    Id3v2,
    Ape,
    #[serde(rename = "mp3frame")]
    MpegFrame,
    Unrecognized,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Id3v1 => "id3v1",
            SegmentKind::Id3v2 => "id3v2",
            SegmentKind::Ape => "ape",
            SegmentKind::MpegFrame => "mp3frame",
            SegmentKind::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A tag signature was expected at the current position but is absent.
    #[error("malformed header: expected {expected:?}")]
    MalformedHeader { expected: &'static str },

    #[error("invalid mp3 frame header")]
    InvalidFrameHeader(#[from] FrameHeaderError),

    /// The stream ended inside a segment.
    #[error("truncated {segment}: needed {needed} bytes, only {available} available")]
    Truncated {
        segment: SegmentKind,
        needed: usize,
        available: usize,
    },

    #[error("segment handler failed: {0:#}")]
    Consumer(anyhow::Error),

    #[error("read failed")]
    Io(#[from] io::Error),
}

/// A failed scan together with the bytes successfully consumed before it.
#[derive(Debug, Error)]
#[error("scan aborted after {consumed} bytes")]
pub struct ScanFailure {
    pub consumed: u64,
    #[source]
    pub error: ScanError,
}

impl ScanFailure {
    pub fn is_truncated(&self) -> bool {
        matches!(self.error, ScanError::Truncated { .. })
    }
}

/// Errors raised while rewriting tags on disk.
#[derive(Debug, Error)]
pub enum TagError {
    #[error(transparent)]
    Scan(#[from] ScanFailure),

    #[error("io error")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("unable to parse directory name {0:?}")]
    DirectoryName(String),

    #[error("unable to parse file name {0:?}")]
    FileName(String),

    #[error("invalid glob pattern")]
    Pattern(#[from] glob::PatternError),

    #[error("unable to list files")]
    Glob(#[from] glob::GlobError),
}

pub type ScanResult<T> = Result<T, ScanError>;
