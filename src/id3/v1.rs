// ID3v1 tag implementation

use serde::Serialize;

use super::genres;
use crate::error::{ScanError, ScanResult, SegmentKind};
use crate::utils::encoding::Charset;

/// ID3v1 tag structure
///
/// On disk the tag is a fixed 128-byte record:
///
/// | offset | size | field   |
/// |--------|------|---------|
/// | 0      | 3    | "TAG"   |
/// | 3      | 30   | title   |
/// | 33     | 30   | artist  |
/// | 63     | 30   | album   |
/// | 93     | 4    | year    |
/// | 97     | 28   | comment |
/// | 125    | 1    | zero    |
/// | 126    | 1    | track   |
/// | 127    | 1    | genre   |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    pub track: u8,
    pub genre: u8,
}

impl Id3v1Tag {
    pub const TAG_SIZE: usize = 128;
    pub const TAG_ID: [u8; 3] = [b'T', b'A', b'G'];

    const TITLE: std::ops::Range<usize> = 3..33;
    const ARTIST: std::ops::Range<usize> = 33..63;
    const ALBUM: std::ops::Range<usize> = 63..93;
    const YEAR: std::ops::Range<usize> = 93..97;
    const COMMENT: std::ops::Range<usize> = 97..125;
    const TERMINATOR: usize = 125;
    const TRACK: usize = 126;
    const GENRE: usize = 127;

    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        year: impl Into<String>,
        comment: impl Into<String>,
        track: u8,
        genre: u8,
    ) -> Self {
        Id3v1Tag {
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            year: year.into(),
            comment: comment.into(),
            track,
            genre,
        }
    }

    /// Parse a 128-byte tag stored as ISO-8859-1.
    pub fn from_bytes(bytes: &[u8]) -> ScanResult<Self> {
        Self::from_bytes_in(bytes, Charset::Latin1)
    }

    /// Parse a 128-byte tag whose strings use `charset`.
    pub fn from_bytes_in(bytes: &[u8], charset: Charset) -> ScanResult<Self> {
        if bytes.len() < Self::TAG_SIZE {
            return Err(ScanError::Truncated {
                segment: SegmentKind::Id3v1,
                needed: Self::TAG_SIZE,
                available: bytes.len(),
            });
        }

        // Check for TAG identifier
        if bytes[0..3] != Self::TAG_ID {
            return Err(ScanError::MalformedHeader { expected: "TAG" });
        }

        Ok(Id3v1Tag {
            title: Self::parse_string(&bytes[Self::TITLE], charset),
            artist: Self::parse_string(&bytes[Self::ARTIST], charset),
            album: Self::parse_string(&bytes[Self::ALBUM], charset),
            year: Self::parse_string(&bytes[Self::YEAR], charset),
            comment: Self::parse_string(&bytes[Self::COMMENT], charset),
            track: bytes[Self::TRACK],
            genre: bytes[Self::GENRE],
        })
    }

    /// Serialize as ISO-8859-1, replacing unsupported characters with `?`.
    pub fn to_bytes(&self) -> [u8; 128] {
        self.to_bytes_in(Charset::Latin1, b'?')
    }

    /// Serialize with `charset`. Strings are left-aligned in their slots,
    /// zero-filled, and cut off at the slot width.
    pub fn to_bytes_in(&self, charset: Charset, replacement: u8) -> [u8; 128] {
        let mut bytes = [0u8; Self::TAG_SIZE];
        bytes[0..3].copy_from_slice(&Self::TAG_ID);
        Self::write_string(&mut bytes[Self::TITLE], &self.title, charset, replacement);
        Self::write_string(&mut bytes[Self::ARTIST], &self.artist, charset, replacement);
        Self::write_string(&mut bytes[Self::ALBUM], &self.album, charset, replacement);
        Self::write_string(&mut bytes[Self::YEAR], &self.year, charset, replacement);
        Self::write_string(&mut bytes[Self::COMMENT], &self.comment, charset, replacement);
        bytes[Self::TERMINATOR] = 0;
        bytes[Self::TRACK] = self.track;
        bytes[Self::GENRE] = self.genre;
        bytes
    }

    pub fn genre_name(&self) -> Option<&'static str> {
        genres::genre_name(self.genre)
    }

    /// Parse a string slot up to its first NUL. Spaces are kept as written.
    fn parse_string(bytes: &[u8], charset: Charset) -> String {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        charset.decode(&bytes[..end])
    }

    fn write_string(slot: &mut [u8], text: &str, charset: Charset, replacement: u8) {
        let encoded = charset.encode(text, replacement);
        let len = encoded.len().min(slot.len());
        slot[..len].copy_from_slice(&encoded[..len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Id3v1Tag {
        Id3v1Tag::new("Title", "Artist", "Album", "1999", "Comment", 7, 17)
    }

    #[test]
    fn layout_is_bit_exact() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[0..3], b"TAG");
        assert_eq!(&bytes[3..8], b"Title");
        assert!(bytes[8..33].iter().all(|&b| b == 0));
        assert_eq!(&bytes[33..39], b"Artist");
        assert_eq!(&bytes[63..68], b"Album");
        assert_eq!(&bytes[93..97], b"1999");
        assert_eq!(&bytes[97..104], b"Comment");
        assert_eq!(bytes[125], 0);
        assert_eq!(bytes[126], 7);
        assert_eq!(bytes[127], 17);
    }

    #[test]
    fn round_trip() {
        let tag = sample();
        let decoded = Id3v1Tag::from_bytes(&tag.to_bytes()).unwrap();
        assert_eq!(decoded, tag);
        assert_eq!(decoded.genre_name(), Some("Rock"));
    }

    #[test]
    fn long_fields_are_cut_to_slot() {
        let tag = Id3v1Tag::new("x".repeat(40), "", "", "19999", "c".repeat(40), 0, 255);
        let bytes = tag.to_bytes();
        let decoded = Id3v1Tag::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.title, "x".repeat(30));
        assert_eq!(decoded.year, "1999");
        assert_eq!(decoded.comment, "c".repeat(28));
        assert_eq!(bytes[125], 0);
        assert_eq!(decoded.genre_name(), None);
    }

    #[test]
    fn trailing_spaces_survive_round_trip() {
        let tag = Id3v1Tag::new("Intro ", "AC DC ", "", "99 ", "x  ", 1, 2);
        let decoded = Id3v1Tag::from_bytes(&tag.to_bytes()).unwrap();
        assert_eq!(decoded, tag);
    }

    #[test]
    fn space_padded_slot_is_read_verbatim() {
        let mut bytes = sample().to_bytes();
        bytes[3..33].copy_from_slice(&[b' '; 30]);
        bytes[3..6].copy_from_slice(b"Hey");
        let title = Id3v1Tag::from_bytes(&bytes).unwrap().title;
        assert_eq!(title, format!("Hey{}", " ".repeat(27)));
    }

    #[test]
    fn year_is_not_validated() {
        let tag = Id3v1Tag::new("", "", "", "abcd", "", 0, 0);
        assert_eq!(Id3v1Tag::from_bytes(&tag.to_bytes()).unwrap().year, "abcd");
    }

    #[test]
    fn rejects_missing_magic() {
        let mut bytes = sample().to_bytes();
        bytes[0] = b'X';
        assert!(matches!(
            Id3v1Tag::from_bytes(&bytes),
            Err(ScanError::MalformedHeader { expected: "TAG" })
        ));
    }

    #[test]
    fn rejects_short_input() {
        assert!(matches!(
            Id3v1Tag::from_bytes(b"TAG"),
            Err(ScanError::Truncated { needed: 128, available: 3, .. })
        ));
    }

    #[test]
    fn non_latin_charset() {
        let charset = Charset::from_name("iso8859-5").unwrap();
        let tag = Id3v1Tag::new("Кино", "", "", "", "", 1, 0);
        let bytes = tag.to_bytes_in(charset, b'?');
        assert_eq!(&bytes[7..33], &[0u8; 26]);
        assert_eq!(Id3v1Tag::from_bytes_in(&bytes, charset).unwrap().title, "Кино");
        assert_eq!(&tag.to_bytes()[3..7], b"????");
    }

    proptest! {
        #[test]
        fn latin1_fields_round_trip(
            title in "[ -~]{0,30}",
            artist in "[ -~]{0,30}",
            comment in "[ -~]{0,28}",
            track in any::<u8>(),
            genre in any::<u8>(),
        ) {
            let tag = Id3v1Tag::new(title, artist, "", "2001", comment, track, genre);
            prop_assert_eq!(Id3v1Tag::from_bytes(&tag.to_bytes()).unwrap(), tag);
        }
    }
}
