// Segment handlers driven by the scanner
pub mod frame_copy;
pub mod show;

pub use frame_copy::{FrameCopyHandler, UnrecognizedPolicy};
pub use show::{OutputFormat, ShowHandler};

use crate::mpeg::Frame;

/// Receives every segment the scanner recognizes, in stream order.
///
/// Tag segments arrive as their complete raw bytes. Returning an error stops
/// the scan; the error is handed back to the caller untouched.
pub trait SegmentHandler {
    fn on_ape_tag(&mut self, bytes: &[u8]) -> anyhow::Result<()>;

    fn on_id3v1_tag(&mut self, bytes: &[u8]) -> anyhow::Result<()>;

    fn on_id3v2_tag(&mut self, bytes: &[u8]) -> anyhow::Result<()>;

    fn on_mpeg_frame(&mut self, frame: &Frame<'_>) -> anyhow::Result<()>;

    /// A byte that starts none of the known segments.
    fn on_unrecognized_byte(&mut self, byte: u8) -> anyhow::Result<()>;
}

impl<H: SegmentHandler + ?Sized> SegmentHandler for &mut H {
    fn on_ape_tag(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        (**self).on_ape_tag(bytes)
    }

    fn on_id3v1_tag(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        (**self).on_id3v1_tag(bytes)
    }

    fn on_id3v2_tag(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        (**self).on_id3v2_tag(bytes)
    }

    fn on_mpeg_frame(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        (**self).on_mpeg_frame(frame)
    }

    fn on_unrecognized_byte(&mut self, byte: u8) -> anyhow::Result<()> {
        (**self).on_unrecognized_byte(byte)
    }
}
