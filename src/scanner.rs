// Stream scanner: splits a byte stream into tags, frames and stray bytes

use std::io::Read;

use log::{debug, trace, warn};
use serde::Serialize;

use crate::ape::{ApeTagHeader, APE_SIGNATURE};
use crate::error::{ScanError, ScanFailure, ScanResult, SegmentKind};
use crate::handler::SegmentHandler;
use crate::id3::{Id3v1Tag, Id3v2Header};
use crate::mpeg::{looks_like_frame, Frame, FrameHeader};
use crate::utils::io::LookaheadReader;

/// Longest signature checked at each position ("APETAGEX").
const WINDOW_SIZE: usize = 8;

/// Per-kind tallies of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub id3v1_tags: u64,
    pub id3v2_tags: u64,
    pub ape_tags: u64,
    pub mpeg_frames: u64,
    pub unrecognized_bytes: u64,
    pub total_bytes: u64,
}

impl ScanStats {
    fn record(&mut self, kind: SegmentKind, length: usize) {
        match kind {
            SegmentKind::Id3v1 => self.id3v1_tags += 1,
            SegmentKind::Id3v2 => self.id3v2_tags += 1,
            SegmentKind::Ape => self.ape_tags += 1,
            SegmentKind::MpegFrame => self.mpeg_frames += 1,
            SegmentKind::Unrecognized => self.unrecognized_bytes += 1,
        }
        self.total_bytes += length as u64;
    }

    pub fn tags(&self) -> u64 {
        self.id3v1_tags + self.id3v2_tags + self.ape_tags
    }
}

/// Walks a stream front to back, handing each segment to a [`SegmentHandler`].
///
/// At every position the checks run in a fixed order: "TAG", "ID3", MPEG
/// frame sync, "APETAGEX". When none matches, one byte is reported as
/// unrecognized and the checks start over at the next byte.
pub struct Scanner<R> {
    reader: LookaheadReader<R>,
    stats: ScanStats,
    unrecognized_run: u64,
}

impl<R: Read> Scanner<R> {
    pub fn new(inner: R) -> Self {
        Scanner {
            reader: LookaheadReader::new(inner),
            stats: ScanStats::default(),
            unrecognized_run: 0,
        }
    }

    /// Bytes covered by the segments handled so far.
    pub fn consumed(&self) -> u64 {
        self.stats.total_bytes
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Scan to end of stream and return the total number of bytes consumed.
    pub fn scan<H: SegmentHandler + ?Sized>(&mut self, handler: &mut H) -> Result<u64, ScanFailure> {
        loop {
            match self.next_segment(handler) {
                Ok(Some((kind, length))) => self.record(kind, length),
                Ok(None) => {
                    self.end_unrecognized_run();
                    debug!("end of stream after {} bytes", self.consumed());
                    return Ok(self.consumed());
                }
                Err(error) => {
                    self.end_unrecognized_run();
                    return Err(ScanFailure {
                        consumed: self.consumed(),
                        error,
                    });
                }
            }
        }
    }

    fn next_segment<H: SegmentHandler + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> ScanResult<Option<(SegmentKind, usize)>> {
        let mut buffer = [0u8; WINDOW_SIZE];
        let peeked = self.reader.peek(WINDOW_SIZE)?;
        if peeked.is_empty() {
            return Ok(None);
        }
        let len = peeked.len();
        buffer[..len].copy_from_slice(peeked);
        let window = &buffer[..len];

        let segment = if window.starts_with(&Id3v1Tag::TAG_ID) {
            let bytes = self.take(SegmentKind::Id3v1, Id3v1Tag::TAG_SIZE)?;
            handler.on_id3v1_tag(&bytes).map_err(ScanError::Consumer)?;
            (SegmentKind::Id3v1, bytes.len())
        } else if window.starts_with(&Id3v2Header::ID) {
            let header = Id3v2Header::parse(self.reader.peek(Id3v2Header::HEADER_SIZE)?)?;
            let bytes = self.take(SegmentKind::Id3v2, header.tag_length())?;
            handler.on_id3v2_tag(&bytes).map_err(ScanError::Consumer)?;
            (SegmentKind::Id3v2, bytes.len())
        } else if looks_like_frame(window) {
            let header = FrameHeader::decode(window)?;
            let bytes = self.take(SegmentKind::MpegFrame, header.frame_length)?;
            handler
                .on_mpeg_frame(&Frame { header, data: &bytes })
                .map_err(ScanError::Consumer)?;
            (SegmentKind::MpegFrame, bytes.len())
        } else if window.starts_with(APE_SIGNATURE) {
            let header = ApeTagHeader::parse(self.reader.peek(ApeTagHeader::HEADER_SIZE)?)?;
            let bytes = self.take(SegmentKind::Ape, header.tag_length())?;
            handler.on_ape_tag(&bytes).map_err(ScanError::Consumer)?;
            (SegmentKind::Ape, bytes.len())
        } else {
            let byte = window[0];
            self.reader.consume(1);
            handler.on_unrecognized_byte(byte).map_err(ScanError::Consumer)?;
            (SegmentKind::Unrecognized, 1)
        };

        Ok(Some(segment))
    }

    fn take(&mut self, segment: SegmentKind, needed: usize) -> ScanResult<Vec<u8>> {
        match self.reader.take(needed)? {
            Some(bytes) => Ok(bytes),
            None => Err(ScanError::Truncated {
                segment,
                needed,
                available: self.reader.buffered(),
            }),
        }
    }

    fn record(&mut self, kind: SegmentKind, length: usize) {
        if kind == SegmentKind::Unrecognized {
            trace!("unrecognized byte at offset {}", self.consumed());
            self.unrecognized_run += 1;
        } else {
            self.end_unrecognized_run();
            debug!("{} at offset {}: {} bytes", kind, self.consumed(), length);
        }
        self.stats.record(kind, length);
    }

    fn end_unrecognized_run(&mut self) {
        if self.unrecognized_run > 0 {
            warn!(
                "skipped {} unrecognized bytes before offset {}",
                self.unrecognized_run,
                self.consumed()
            );
            self.unrecognized_run = 0;
        }
    }
}

/// Scan `input` to the end with `handler`.
pub fn scan_stream<R: Read, H: SegmentHandler + ?Sized>(
    input: R,
    handler: &mut H,
) -> Result<ScanStats, ScanFailure> {
    let mut scanner = Scanner::new(input);
    scanner.scan(handler)?;
    Ok(scanner.stats)
}
