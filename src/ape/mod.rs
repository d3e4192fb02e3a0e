// APE tag header
//
// APEv2 tags start with a 32-byte header whose first 16 bytes are:
// - Signature: "APETAGEX" (8 bytes)
// - Version: 1000 or 2000 (4 bytes, little-endian)
// - Tag size: items plus footer (4 bytes, little-endian)
//
// Only those 16 bytes are decoded. The rest of the tag is an opaque block.
//
// Reference:
// - https://wiki.hydrogenaud.io/index.php?title=APEv2_specification

use crate::error::{ScanError, ScanResult, SegmentKind};

pub const APE_SIGNATURE: &[u8; 8] = b"APETAGEX";

/// Added to the declared size to cover the 32-byte header the size excludes.
pub const APE_SIZE_ADJUSTMENT: usize = 32;

/// APE tag header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApeTagHeader {
    pub version: u32,
    pub tag_size: u32,
}

impl ApeTagHeader {
    pub const HEADER_SIZE: usize = 16;

    /// Parse the first 16 bytes of an APE tag.
    pub fn parse(bytes: &[u8]) -> ScanResult<Self> {
        if bytes.len() < Self::HEADER_SIZE {
            return Err(ScanError::Truncated {
                segment: SegmentKind::Ape,
                needed: Self::HEADER_SIZE,
                available: bytes.len(),
            });
        }

        if &bytes[0..8] != APE_SIGNATURE {
            return Err(ScanError::MalformedHeader { expected: "APETAGEX" });
        }

        Ok(ApeTagHeader {
            version: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            tag_size: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        })
    }

    /// Bytes the whole tag occupies, counted from its first signature byte.
    pub fn tag_length(&self) -> usize {
        self.tag_size as usize + APE_SIZE_ADJUSTMENT
    }
}
