// Replace the tags of an MP3 stream with a single fresh ID3v1 tag

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::error::TagError;
use crate::handler::{FrameCopyHandler, UnrecognizedPolicy};
use crate::id3::Id3v1Tag;
use crate::scanner::Scanner;
use crate::utils::encoding::Charset;

/// Settings for writing new tags.
#[derive(Debug, Clone)]
pub struct TagOptions {
    /// Character set of the ID3v1 strings.
    pub charset: Charset,
    /// Byte written for characters the charset cannot represent.
    pub replacement: u8,
    /// Scan and report, but leave files untouched.
    pub dry_run: bool,
    pub unrecognized: UnrecognizedPolicy,
}

impl Default for TagOptions {
    fn default() -> Self {
        TagOptions {
            charset: Charset::Latin1,
            replacement: b'?',
            dry_run: false,
            unrecognized: UnrecognizedPolicy::Annotate,
        }
    }
}

/// What a retag pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetagSummary {
    pub scanned: u64,
    pub frames: u64,
    pub tags_dropped: u64,
    pub unrecognized: u64,
}

/// Copy the frames of `input` to `output`, then append `tag`.
pub fn retag<R: Read, W: Write>(
    input: R,
    output: W,
    tag: &Id3v1Tag,
    options: &TagOptions,
) -> Result<RetagSummary, TagError> {
    let mut handler = FrameCopyHandler::with_policy(output, options.unrecognized);
    let scanned = Scanner::new(input).scan(&mut handler)?;

    let tag_bytes = tag.to_bytes_in(options.charset, options.replacement);
    handler.get_mut().write_all(&tag_bytes)?;
    handler.get_mut().flush()?;

    Ok(RetagSummary {
        scanned,
        frames: handler.frames,
        tags_dropped: handler.tags_dropped,
        unrecognized: handler.unrecognized,
    })
}

/// Retag a file in place.
///
/// The new content goes to `<file>.new`, which then replaces the original.
/// On failure the original is left as it was and the `.new` file is removed.
/// With `dry_run` the file is scanned but nothing is written.
pub fn retag_file(path: &Path, tag: &Id3v1Tag, options: &TagOptions) -> Result<RetagSummary, TagError> {
    let input = BufReader::new(File::open(path)?);

    if options.dry_run {
        let summary = retag(input, io::sink(), tag, options)?;
        info!("{}: dry run, {} frames would be kept", path.display(), summary.frames);
        return Ok(summary);
    }

    let new_path = sibling_path(path);
    let output = BufWriter::new(File::create(&new_path)?);

    let summary = match retag(input, output, tag, options) {
        Ok(summary) => summary,
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(&new_path) {
                debug!("unable to remove {}: {}", new_path.display(), cleanup);
            }
            return Err(e);
        }
    };

    fs::rename(&new_path, path)?;
    info!(
        "{}: kept {} frames, dropped {} tags",
        path.display(),
        summary.frames,
        summary.tags_dropped
    );
    Ok(summary)
}

fn sibling_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".new");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame() -> Vec<u8> {
        let mut bytes = vec![0u8; 417];
        bytes[..4].copy_from_slice(&[0xff, 0xfb, 0x90, 0x44]);
        bytes
    }

    #[test]
    fn appends_fresh_tag() {
        let mut data = b"ID3\x03\x00\x00\x00\x00\x00\x00".to_vec();
        data.extend(frame());
        data.extend(Id3v1Tag::new("old", "old", "old", "1970", "", 1, 0).to_bytes());

        let tag = Id3v1Tag::new("new", "artist", "album", "2024", "", 2, 255);
        let mut output = Vec::new();
        let summary = retag(Cursor::new(data), &mut output, &tag, &TagOptions::default()).unwrap();

        assert_eq!(
            summary,
            RetagSummary {
                scanned: 10 + 417 + 128,
                frames: 1,
                tags_dropped: 2,
                unrecognized: 0,
            }
        );
        assert_eq!(output.len(), 417 + 128);
        assert_eq!(&output[..417], frame().as_slice());
        assert_eq!(Id3v1Tag::from_bytes(&output[417..]).unwrap(), tag);
    }

    #[test]
    fn truncated_input_fails() {
        let mut data = frame();
        data.truncate(300);
        let err = retag(Cursor::new(data), Vec::new(), &Id3v1Tag::default(), &TagOptions::default())
            .unwrap_err();
        assert!(matches!(err, TagError::Scan(ref failure) if failure.is_truncated()));
    }

    #[test]
    fn sibling_path_appends_suffix() {
        assert_eq!(sibling_path(Path::new("dir/01 - a.mp3")), PathBuf::from("dir/01 - a.mp3.new"));
    }
}
