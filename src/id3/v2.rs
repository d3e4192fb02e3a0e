// ID3v2 tag header
//
// The tag body is never decomposed. Only the header is read, to learn how
// many bytes the whole tag occupies.

use crate::error::{ScanError, ScanResult, SegmentKind};

/// ID3v2 header structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3v2Header {
    pub version: (u8, u8),
    pub flags: u8,
    /// Body size from the synchsafe size field, header excluded.
    pub size: u32,
}

impl Id3v2Header {
    pub const HEADER_SIZE: usize = 10;
    pub const ID: [u8; 3] = [b'I', b'D', b'3'];

    /// Parse the 10-byte header at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> ScanResult<Self> {
        if bytes.len() < Self::HEADER_SIZE {
            return Err(ScanError::Truncated {
                segment: SegmentKind::Id3v2,
                needed: Self::HEADER_SIZE,
                available: bytes.len(),
            });
        }

        // Check for ID3 identifier
        if bytes[0..3] != Self::ID {
            return Err(ScanError::MalformedHeader { expected: "ID3" });
        }

        Ok(Id3v2Header {
            version: (bytes[3], bytes[4]),
            flags: bytes[5],
            size: Self::parse_synchsafe(&bytes[6..10]),
        })
    }

    /// Bytes the whole tag occupies, header included.
    pub fn tag_length(&self) -> usize {
        self.size as usize + Self::HEADER_SIZE
    }

    /// Parse synchsafe integer (7 bits per byte)
    pub fn parse_synchsafe(bytes: &[u8]) -> u32 {
        ((bytes[0] as u32 & 0x7f) << 21)
            | ((bytes[1] as u32 & 0x7f) << 14)
            | ((bytes[2] as u32 & 0x7f) << 7)
            | (bytes[3] as u32 & 0x7f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synchsafe_size() {
        assert_eq!(Id3v2Header::parse_synchsafe(&[0, 0, 0x02, 0x01]), 257);
        assert_eq!(Id3v2Header::parse_synchsafe(&[0x7f, 0x7f, 0x7f, 0x7f]), 0x0fff_ffff);
    }

    #[test]
    fn parses_header() {
        let header = Id3v2Header::parse(b"ID3\x04\x00\x40\x00\x00\x01\x7f").unwrap();
        assert_eq!(header.version, (4, 0));
        assert_eq!(header.flags, 0x40);
        assert_eq!(header.size, 255);
        assert_eq!(header.tag_length(), 265);
    }

    #[test]
    fn rejects_wrong_magic() {
        assert!(matches!(
            Id3v2Header::parse(b"ID4\x03\x00\x00\x00\x00\x00\x00"),
            Err(ScanError::MalformedHeader { expected: "ID3" })
        ));
    }

    #[test]
    fn short_header_is_truncated() {
        assert!(matches!(
            Id3v2Header::parse(b"ID3\x03\x00"),
            Err(ScanError::Truncated { needed: 10, available: 5, .. })
        ));
    }
}
