//! tagsweep - segment MP3 streams and rewrite their tags
//!
//! A [`Scanner`] walks a byte stream and splits it into ID3v1 tags, ID3v2
//! tags, APE tags, MPEG audio frames and stray bytes, handing each piece to a
//! [`SegmentHandler`]. Two handlers ship with the crate: [`ShowHandler`]
//! prints what it sees, [`FrameCopyHandler`] keeps only the audio frames so a
//! new tag can be appended (see [`retag`]).
//!
//! ```no_run
//! use std::fs::File;
//! use tagsweep::{scan_stream, OutputFormat, ShowHandler};
//!
//! let mut handler = ShowHandler::new(std::io::stdout(), OutputFormat::Text);
//! let stats = scan_stream(File::open("song.mp3")?, &mut handler)?;
//! handler.write_total(&stats)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod album;
pub mod ape;
pub mod error;
pub mod handler;
pub mod id3;
pub mod mpeg;
pub mod retag;
pub mod scanner;
pub mod utils;

pub use album::{tag_album, AlbumDirectory, AlbumTrack};
pub use error::{ScanError, ScanFailure, SegmentKind, TagError};
pub use handler::{FrameCopyHandler, OutputFormat, SegmentHandler, ShowHandler, UnrecognizedPolicy};
pub use id3::{Id3v1Tag, Id3v2Header};
pub use mpeg::{Frame, FrameHeader, FrameHeaderError, MpegVersion};
pub use retag::{retag, retag_file, RetagSummary, TagOptions};
pub use scanner::{scan_stream, ScanStats, Scanner};
pub use utils::encoding::{Charset, EncodingError};
