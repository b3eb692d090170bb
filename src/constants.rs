//! Wire-level constants shared across the decoder.

/// PNG signature, the first eight bytes of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Largest value the standard allows for chunk lengths, dimensions
/// and most other unsigned fields.
pub const PNG_U32_MAX: u32 = 2_147_483_647;

/// Smallest legal value for the signed oFFs coordinates.
pub const PNG_S32_MIN: i32 = -2_147_483_647;

/// Read size for streaming sources, also the slice size used when
/// discarding payload bytes.
pub const READ_SIZE: usize = 8192;

/// TIFF byte-order magics an eXIf payload must start with.
pub const EXIF_LE: [u8; 4] = [0x49, 0x49, 0x2A, 0x00];
pub const EXIF_BE: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A];

pub const ADAM7_X_START: [usize; 7] = [0, 4, 0, 2, 0, 1, 0];
pub const ADAM7_Y_START: [usize; 7] = [0, 0, 4, 0, 2, 0, 1];
pub const ADAM7_X_DELTA: [usize; 7] = [8, 8, 4, 4, 2, 2, 1];
pub const ADAM7_Y_DELTA: [usize; 7] = [8, 8, 8, 4, 4, 2, 2];
