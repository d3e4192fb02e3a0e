// MPEG audio frame handling
pub mod header;
pub mod tables;

pub use header::{looks_like_frame, ChannelMode, Emphasis, FrameHeader, FrameHeaderError, MpegVersion};

/// A complete frame as read from the stream.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub header: FrameHeader,
    /// Header and payload bytes, `header.frame_length` long.
    pub data: &'a [u8],
}
