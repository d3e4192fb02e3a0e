// MPEG audio frame header decoding

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::tables::{self, BITRATES, SAMPLING_RATES};

/// Size of the packed header at the start of every frame.
pub const HEADER_SIZE: usize = 4;

const FRAME_SYNC: u32 = 0x7ff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameHeaderError {
    #[error("need {HEADER_SIZE} header bytes, got {0}")]
    NotEnoughData(usize),
    #[error("frame sync {0:#05x} is not all ones")]
    BadSync(u32),
    #[error("no bitrate column for version bits {version:#04b}, layer bits {layer:#04b}")]
    NoBitrateColumn { version: u32, layer: u32 },
    #[error("no sampling rate column for version bits {0:#04b}")]
    NoSamplingRateColumn(u32),
    #[error("bitrate index {0} is not allowed")]
    BadBitrate(u8),
    #[error("sampling rate index {0} is reserved")]
    ReservedSamplingRate(u8),
    #[error("frame length {0} is shorter than its header")]
    ShortFrame(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MpegVersion {
    #[serde(rename = "1")]
    Mpeg1,
    #[serde(rename = "2")]
    Mpeg2,
    #[serde(rename = "2.5")]
    Mpeg25,
}

impl MpegVersion {
    fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            tables::VERSION_1 => Some(MpegVersion::Mpeg1),
            tables::VERSION_2 => Some(MpegVersion::Mpeg2),
            tables::VERSION_25 => Some(MpegVersion::Mpeg25),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> f32 {
        match self {
            MpegVersion::Mpeg1 => 1.0,
            MpegVersion::Mpeg2 => 2.0,
            MpegVersion::Mpeg25 => 2.5,
        }
    }
}

impl fmt::Display for MpegVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MpegVersion::Mpeg1 => f.write_str("1"),
            MpegVersion::Mpeg2 => f.write_str("2"),
            MpegVersion::Mpeg25 => f.write_str("2.5"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualChannel,
    Mono,
}

impl ChannelMode {
    fn from_bits(bits: u32) -> Self {
        match bits & 0x03 {
            0 => ChannelMode::Stereo,
            1 => ChannelMode::JointStereo,
            2 => ChannelMode::DualChannel,
            _ => ChannelMode::Mono,
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelMode::Stereo => "stereo",
            ChannelMode::JointStereo => "joint stereo",
            ChannelMode::DualChannel => "dual channel",
            ChannelMode::Mono => "mono",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    None,
    Ms50_15,
    Reserved,
    CcittJ17,
}

impl Emphasis {
    fn from_bits(bits: u32) -> Self {
        match bits & 0x03 {
            0 => Emphasis::None,
            1 => Emphasis::Ms50_15,
            2 => Emphasis::Reserved,
            _ => Emphasis::CcittJ17,
        }
    }
}

impl fmt::Display for Emphasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Emphasis::None => "none",
            Emphasis::Ms50_15 => "50/15 ms",
            Emphasis::Reserved => "reserved",
            Emphasis::CcittJ17 => "ccit j.17",
        })
    }
}

/// Decoded MPEG audio frame header.
///
/// Bit layout of the big-endian word, most significant first:
///
/// ```text
/// AAAAAAAA AAABBCCD EEEEFFGH IIJJKLMM
/// A sync   B version   C layer   D protection   E bitrate index
/// F sampling rate index   G padding   H private   I channel mode
/// J mode extension   K copyright   L original   M emphasis
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameHeader {
    pub version: MpegVersion,
    pub layer: u8,
    /// Raw protection bit. Set means no CRC follows the header.
    pub protection: bool,
    pub bitrate_index: u8,
    pub bitrate_kbps: u32,
    pub sampling_rate_index: u8,
    pub sampling_rate_hz: u32,
    pub padding: bool,
    pub private: bool,
    pub channel_mode: ChannelMode,
    pub mode_extension: u8,
    pub copyright: bool,
    pub original: bool,
    pub emphasis: Emphasis,
    /// Whole frame including these four header bytes.
    pub frame_length: usize,
}

impl FrameHeader {
    /// Decode the first four bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameHeaderError> {
        let word: [u8; HEADER_SIZE] = bytes
            .get(..HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(FrameHeaderError::NotEnoughData(bytes.len()))?;
        let mut header = u32::from_be_bytes(word);

        let emphasis = header & 0x03;
        header >>= 2;
        let original = header & 0x01;
        header >>= 1;
        let copyright = header & 0x01;
        header >>= 1;
        let mode_extension = header & 0x03;
        header >>= 2;
        let channel_mode = header & 0x03;
        header >>= 2;
        let private = header & 0x01;
        header >>= 1;
        let padding = header & 0x01;
        header >>= 1;
        let sampling_rate_index = header & 0x03;
        header >>= 2;
        let bitrate_index = header & 0x0f;
        header >>= 4;
        let protection = header & 0x01;
        header >>= 1;
        let layer = header & 0x03;
        header >>= 2;
        let version = header & 0x03;
        header >>= 2;
        let frame_sync = header & FRAME_SYNC;

        if frame_sync != FRAME_SYNC {
            return Err(FrameHeaderError::BadSync(frame_sync));
        }

        let bitrate_column = tables::bitrate_column(version, layer)
            .ok_or(FrameHeaderError::NoBitrateColumn { version, layer })?;
        let sampling_rate_column = tables::sampling_rate_column(version)
            .ok_or(FrameHeaderError::NoSamplingRateColumn(version))?;

        let bitrate_kbps = u32::try_from(BITRATES[bitrate_index as usize][bitrate_column])
            .map_err(|_| FrameHeaderError::BadBitrate(bitrate_index as u8))?;
        let sampling_rate_hz = SAMPLING_RATES[sampling_rate_index as usize][sampling_rate_column];
        if sampling_rate_hz == 0 {
            return Err(FrameHeaderError::ReservedSamplingRate(sampling_rate_index as u8));
        }

        let frame_length = (144 * bitrate_kbps * 1000 / sampling_rate_hz + padding) as usize;
        if frame_length < HEADER_SIZE {
            return Err(FrameHeaderError::ShortFrame(frame_length));
        }

        // Reserved version bits were rejected by sampling_rate_column above.
        let version = MpegVersion::from_bits(version)
            .ok_or(FrameHeaderError::NoSamplingRateColumn(version))?;

        Ok(FrameHeader {
            version,
            layer: (4 - layer) as u8,
            protection: protection == 1,
            bitrate_index: bitrate_index as u8,
            bitrate_kbps,
            sampling_rate_index: sampling_rate_index as u8,
            sampling_rate_hz,
            padding: padding == 1,
            private: private == 1,
            channel_mode: ChannelMode::from_bits(channel_mode),
            mode_extension: mode_extension as u8,
            copyright: copyright == 1,
            original: original == 1,
            emphasis: Emphasis::from_bits(emphasis),
            frame_length,
        })
    }
}

/// Quick check on the first two bytes before a full decode is attempted.
pub fn looks_like_frame(window: &[u8]) -> bool {
    window.len() >= HEADER_SIZE && window[0] == 0xff && window[1] & 0xe0 == 0xe0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // MPEG1 Layer III, 128 kbps, 44100 Hz, joint stereo, original
    const V1_L3_128: [u8; 4] = [0xff, 0xfb, 0x90, 0x44];

    #[test]
    fn decodes_common_layer3_header() {
        let header = FrameHeader::decode(&V1_L3_128).unwrap();
        assert_eq!(header.version, MpegVersion::Mpeg1);
        assert_eq!(header.layer, 3);
        assert!(header.protection);
        assert_eq!(header.bitrate_kbps, 128);
        assert_eq!(header.sampling_rate_hz, 44100);
        assert!(!header.padding);
        assert!(!header.private);
        assert_eq!(header.channel_mode, ChannelMode::JointStereo);
        assert_eq!(header.mode_extension, 0);
        assert!(!header.copyright);
        assert!(header.original);
        assert_eq!(header.emphasis, Emphasis::None);
        assert_eq!(header.frame_length, 417);
    }

    #[test]
    fn padding_adds_one_byte() {
        let header = FrameHeader::decode(&[0xff, 0xfb, 0x92, 0x44]).unwrap();
        assert!(header.padding);
        assert_eq!(header.frame_length, 418);
    }

    #[test]
    fn mpeg2_and_mpeg25_headers() {
        // MPEG2 Layer III, 64 kbps, 22050 Hz
        let header = FrameHeader::decode(&[0xff, 0xf3, 0x80, 0xc0]).unwrap();
        assert_eq!(header.version, MpegVersion::Mpeg2);
        assert_eq!(header.bitrate_kbps, 64);
        assert_eq!(header.sampling_rate_hz, 22050);
        assert_eq!(header.channel_mode, ChannelMode::Mono);
        assert_eq!(header.frame_length, 144 * 64 * 1000 / 22050);

        // MPEG2.5 Layer III, 32 kbps, 8000 Hz
        let header = FrameHeader::decode(&[0xff, 0xe3, 0x48, 0x00]).unwrap();
        assert_eq!(header.version, MpegVersion::Mpeg25);
        assert_eq!(header.version.as_f32(), 2.5);
        assert_eq!(header.bitrate_kbps, 32);
        assert_eq!(header.sampling_rate_hz, 8000);
        assert_eq!(header.frame_length, 576);
    }

    #[test]
    fn layer1_and_layer2_columns() {
        // MPEG1 Layer I, index 4 -> 128 kbps, 48000 Hz
        let header = FrameHeader::decode(&[0xff, 0xff, 0x44, 0x00]).unwrap();
        assert_eq!(header.layer, 1);
        assert_eq!(header.bitrate_kbps, 128);
        assert_eq!(header.sampling_rate_hz, 48000);

        // MPEG1 Layer II, index 4 -> 64 kbps
        let header = FrameHeader::decode(&[0xff, 0xfd, 0x40, 0x00]).unwrap();
        assert_eq!(header.layer, 2);
        assert_eq!(header.bitrate_kbps, 64);
        assert_eq!(header.sampling_rate_hz, 44100);
    }

    #[test]
    fn rejects_bad_sync() {
        assert_eq!(
            FrameHeader::decode(&[0xff, 0x1b, 0x90, 0x44]),
            Err(FrameHeaderError::BadSync(0x7f8))
        );
    }

    #[test]
    fn rejects_reserved_fields() {
        // version bits 01
        assert!(matches!(
            FrameHeader::decode(&[0xff, 0xeb, 0x90, 0x44]),
            Err(FrameHeaderError::NoBitrateColumn { version: 1, .. })
        ));
        // layer bits 00
        assert!(matches!(
            FrameHeader::decode(&[0xff, 0xf9, 0x90, 0x44]),
            Err(FrameHeaderError::NoBitrateColumn { layer: 0, .. })
        ));
        // bitrate index 1111
        assert_eq!(
            FrameHeader::decode(&[0xff, 0xfb, 0xf0, 0x44]),
            Err(FrameHeaderError::BadBitrate(15))
        );
        // sampling rate index 11
        assert_eq!(
            FrameHeader::decode(&[0xff, 0xfb, 0x9c, 0x44]),
            Err(FrameHeaderError::ReservedSamplingRate(3))
        );
        // bitrate index 0000 gives no usable length
        assert_eq!(
            FrameHeader::decode(&[0xff, 0xfb, 0x00, 0x44]),
            Err(FrameHeaderError::ShortFrame(0))
        );
    }

    #[test]
    fn needs_four_bytes() {
        assert_eq!(
            FrameHeader::decode(&[0xff, 0xfb, 0x90]),
            Err(FrameHeaderError::NotEnoughData(3))
        );
    }

    #[test]
    fn frame_sync_probe() {
        assert!(looks_like_frame(&V1_L3_128));
        assert!(looks_like_frame(&[0xff, 0xe0, 0, 0, 9]));
        assert!(!looks_like_frame(&[0xff, 0xd0, 0, 0]));
        assert!(!looks_like_frame(&[0xff, 0xfb, 0x90]));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            failure_persistence: None,
            ..ProptestConfig::default()
        })]

        #[test]
        fn decoding_is_deterministic(word in any::<u32>()) {
            let bytes = word.to_be_bytes();
            prop_assert_eq!(FrameHeader::decode(&bytes), FrameHeader::decode(&bytes));
        }

        #[test]
        fn valid_headers_keep_sync_and_length(
            version in prop::sample::select(vec![0b00u8, 0b10, 0b11]),
            layer in 1u8..=3,
            bitrate_index in 1u8..=14,
            sampling_rate_index in 0u8..=2,
            padding in 0u8..=1,
            low in any::<u8>(),
        ) {
            let bytes = [
                0xff,
                0xe0 | version << 3 | layer << 1 | 1,
                bitrate_index << 4 | sampling_rate_index << 2 | padding << 1,
                low,
            ];
            let header = FrameHeader::decode(&bytes).unwrap();
            prop_assert!(looks_like_frame(&bytes));
            let expected = 144 * header.bitrate_kbps * 1000 / header.sampling_rate_hz
                + u32::from(padding);
            prop_assert_eq!(header.frame_length, expected as usize);
            prop_assert_eq!(FrameHeader::decode(&bytes).unwrap(), header);
        }
    }
}
