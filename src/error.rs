use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelError {
    #[error(
        "buffer length {len} does not match {width}x{height} with {channels} channels per pixel"
    )]
    BufferSizeMismatch {
        len: usize,
        width: u32,
        height: u32,
        channels: u8,
    },

    #[error("unsupported channel layout: {0} channels (expected 3 or 4)")]
    UnsupportedChannelLayout(u8),

    #[error("seed ({x}, {y}) is outside the {width}x{height} buffer")]
    SeedOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("{name} must be between {min} and {max}, got {value}")]
    InvalidConstraint {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}
