// Single-byte character sets for ID3v1 text fields

use std::fmt;

use encoding_rs::{
    Encoding, EncoderResult, ISO_8859_10, ISO_8859_13, ISO_8859_14, ISO_8859_15, ISO_8859_16,
    ISO_8859_2, ISO_8859_3, ISO_8859_4, ISO_8859_5, ISO_8859_6, ISO_8859_7, ISO_8859_8,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("unrecognised encoding {0}")]
    Unknown(String),
}

/// Character set used to store ID3v1 strings.
///
/// ISO-8859-1 maps bytes straight onto U+0000..=U+00FF. The other members of
/// the ISO-8859 family go through `encoding_rs`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Latin1,
    Iso8859(u8, &'static Encoding),
}

fn lookup(part: u8) -> Option<Charset> {
    let encoding = match part {
        1 => return Some(Charset::Latin1),
        2 => ISO_8859_2,
        3 => ISO_8859_3,
        4 => ISO_8859_4,
        5 => ISO_8859_5,
        6 => ISO_8859_6,
        7 => ISO_8859_7,
        8 => ISO_8859_8,
        10 => ISO_8859_10,
        13 => ISO_8859_13,
        14 => ISO_8859_14,
        15 => ISO_8859_15,
        16 => ISO_8859_16,
        _ => return None,
    };
    Some(Charset::Iso8859(part, encoding))
}

impl Charset {
    /// Look up a charset by name, e.g. `iso8859-2` or `ISO-8859-15`.
    pub fn from_name(name: &str) -> Result<Self, EncodingError> {
        let lower = name.trim().to_ascii_lowercase();
        let part = lower
            .strip_prefix("iso8859-")
            .or_else(|| lower.strip_prefix("iso-8859-"))
            .ok_or_else(|| EncodingError::Unknown(name.to_string()))?;
        let part: u8 = part
            .parse()
            .map_err(|_| EncodingError::Unknown(name.to_string()))?;

        lookup(part).ok_or_else(|| EncodingError::Unknown(name.to_string()))
    }

    pub fn name(&self) -> String {
        match self {
            Charset::Latin1 => "iso8859-1".to_string(),
            Charset::Iso8859(part, _) => format!("iso8859-{}", part),
        }
    }

    /// Encode `text`, writing `replacement` for every character the charset lacks.
    pub fn encode(&self, text: &str, replacement: u8) -> Vec<u8> {
        match self {
            Charset::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(replacement))
                .collect(),
            Charset::Iso8859(_, encoding) => encode_with_replacement(encoding, text, replacement),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Latin1 => encoding_rs::mem::decode_latin1(bytes).into_owned(),
            Charset::Iso8859(_, encoding) => encoding
                .decode_without_bom_handling(bytes)
                .0
                .into_owned(),
        }
    }
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Latin1
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Charset({})", self.name())
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn encode_with_replacement(encoding: &'static Encoding, text: &str, replacement: u8) -> Vec<u8> {
    let mut encoder = encoding.new_encoder();
    let mut output = Vec::with_capacity(text.len());
    let mut buffer = [0u8; 256];
    let mut remaining = text;

    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(remaining, &mut buffer, true);
        output.extend_from_slice(&buffer[..written]);
        remaining = &remaining[read..];

        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => output.push(replacement),
        }
    }

    output
}
