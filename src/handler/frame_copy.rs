// Frame-copy handler: strips tags and passes MPEG frames through

use std::io::Write;

use log::warn;

use super::SegmentHandler;
use crate::mpeg::Frame;

/// What the copy handler does with bytes that belong to no segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnrecognizedPolicy {
    /// Write a text line describing the byte to the output.
    #[default]
    Annotate,
    /// Leave the byte out of the output and only log it.
    Drop,
}

/// Copies frame bytes verbatim to `out` and discards every tag.
pub struct FrameCopyHandler<W> {
    out: W,
    policy: UnrecognizedPolicy,
    pub frames: u64,
    pub tags_dropped: u64,
    pub unrecognized: u64,
}

impl<W: Write> FrameCopyHandler<W> {
    pub fn new(out: W) -> Self {
        Self::with_policy(out, UnrecognizedPolicy::default())
    }

    pub fn with_policy(out: W, policy: UnrecognizedPolicy) -> Self {
        FrameCopyHandler {
            out,
            policy,
            frames: 0,
            tags_dropped: 0,
            unrecognized: 0,
        }
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SegmentHandler for FrameCopyHandler<W> {
    fn on_ape_tag(&mut self, _bytes: &[u8]) -> anyhow::Result<()> {
        self.tags_dropped += 1;
        Ok(())
    }

    fn on_id3v1_tag(&mut self, _bytes: &[u8]) -> anyhow::Result<()> {
        self.tags_dropped += 1;
        Ok(())
    }

    fn on_id3v2_tag(&mut self, _bytes: &[u8]) -> anyhow::Result<()> {
        self.tags_dropped += 1;
        Ok(())
    }

    fn on_mpeg_frame(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        self.out.write_all(frame.data)?;
        self.frames += 1;
        Ok(())
    }

    fn on_unrecognized_byte(&mut self, byte: u8) -> anyhow::Result<()> {
        self.unrecognized += 1;
        match self.policy {
            UnrecognizedPolicy::Annotate => {
                writeln!(self.out, "Unrecognized {} {:?}", byte, byte as char)?;
            }
            UnrecognizedPolicy::Drop => warn!("dropping unrecognized byte {:#04x}", byte),
        }
        Ok(())
    }
}
