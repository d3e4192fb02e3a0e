// MPEG audio lookup tables

/// Bitrates in kbps, indexed by `[bitrate_index][column]`.
///
/// Columns: V1 L1, V1 L2, V1 L3, V2 L1, V2 L2 & L3. `-1` marks the
/// forbidden index.
pub const BITRATES: [[i32; 5]; 16] = [
    [0, 0, 0, 0, 0],
    [32, 32, 32, 32, 8],
    [64, 48, 40, 48, 16],
    [96, 56, 48, 56, 24],
    [128, 64, 56, 64, 32],
    [160, 80, 64, 80, 40],
    [192, 96, 80, 96, 48],
    [224, 112, 96, 112, 56],
    [256, 128, 112, 128, 64],
    [288, 160, 128, 144, 80],
    [320, 192, 160, 160, 96],
    [352, 224, 192, 176, 112],
    [384, 256, 224, 192, 128],
    [416, 320, 256, 224, 144],
    [448, 384, 320, 256, 160],
    [-1, -1, -1, -1, -1],
];

/// Sampling rates in Hz, indexed by `[sampling_rate_index][column]`.
///
/// Columns: MPEG1, MPEG2, MPEG2.5. `0` is reserved.
pub const SAMPLING_RATES: [[u32; 3]; 4] = [
    [44100, 22050, 11025],
    [48000, 24000, 12000],
    [32000, 16000, 8000],
    [0, 0, 0],
];

// Raw two-bit field values
pub const VERSION_25: u32 = 0b00;
pub const VERSION_2: u32 = 0b10;
pub const VERSION_1: u32 = 0b11;

pub const LAYER_3: u32 = 0b01;
pub const LAYER_2: u32 = 0b10;
pub const LAYER_1: u32 = 0b11;

/// Column of [`BITRATES`] for a raw version/layer pair.
pub fn bitrate_column(version: u32, layer: u32) -> Option<usize> {
    match (version, layer) {
        (VERSION_1, LAYER_1) => Some(0),
        (VERSION_1, LAYER_2) => Some(1),
        (VERSION_1, LAYER_3) => Some(2),
        (VERSION_2 | VERSION_25, LAYER_1) => Some(3),
        (VERSION_2 | VERSION_25, LAYER_2 | LAYER_3) => Some(4),
        _ => None,
    }
}

/// Column of [`SAMPLING_RATES`] for a raw version.
pub fn sampling_rate_column(version: u32) -> Option<usize> {
    match version {
        VERSION_1 => Some(0),
        VERSION_2 => Some(1),
        VERSION_25 => Some(2),
        _ => None,
    }
}
