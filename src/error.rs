//! Error types for MargaNav

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// MargaNav error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame source could not be opened
    #[error("Frame source unavailable: {0}")]
    DeviceUnavailable(String),

    /// A single frame failed to arrive or decode
    #[error("Failed to grab frame: {0}")]
    FrameGrab(String),

    /// Frame source has no more frames
    #[error("End of frame stream")]
    EndOfStream,

    /// Frame rejected before entering the mask pipeline
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source kind named in configuration is not known
    #[error("Unknown frame source: {0}")]
    UnknownSource(String),

    /// Command consumer went away
    #[error("Command sink closed")]
    SinkClosed,

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}
