//! Centralized error types for BW64 chunk construction.
//!
//! Every chunk constructor validates its inputs up front and returns one of
//! these errors instead of a partially built chunk. Two classes exist:
//! - invalid arguments (a parameter outside its domain)
//! - encoding overflow (a value wider than the field it is written into)

use std::path::PathBuf;

use thiserror::Error;

/// Trait for error types that provide machine-readable error codes.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;
}

/// Errors raised while validating or encoding a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// Channel count below 1.
    #[error("channelCount < 1")]
    ChannelCount,

    /// Sample rate below 1 Hz.
    #[error("sampleRate < 1")]
    SampleRate,

    /// Bit depth outside {16, 24, 32}.
    #[error("bitDepth not supported: {0}")]
    UnsupportedBitDepth(u16),

    /// A fixed-width text field was given more bytes than it can hold.
    #[error("{field} too long: {len} bytes (max {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A chunk tag was not exactly four bytes.
    #[error("fourCC must be exactly 4 bytes, got {0}")]
    FourCcLength(usize),

    /// Requested integer width is not between 1 and 8 bytes.
    #[error("unsupported integer width: {0} bytes")]
    InvalidWidth(usize),

    /// Value does not fit the fixed-width field it is encoded into.
    #[error("{field} value {value} does not fit in {width} bytes")]
    Overflow {
        field: &'static str,
        value: u64,
        width: usize,
    },
}

impl ChunkError {
    /// Returns true for parameter-out-of-domain errors.
    pub fn is_invalid_argument(&self) -> bool {
        !self.is_overflow()
    }

    /// Returns true when a value exceeded its encoded width.
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow { .. })
    }
}

impl ErrorCode for ChunkError {
    fn code(&self) -> &'static str {
        match self {
            Self::ChannelCount => "invalid_channel_count",
            Self::SampleRate => "invalid_sample_rate",
            Self::UnsupportedBitDepth(_) => "unsupported_bit_depth",
            Self::FieldTooLong { .. } => "field_too_long",
            Self::FourCcLength(_) => "invalid_fourcc",
            Self::InvalidWidth(_) => "invalid_width",
            Self::Overflow { .. } => "encoding_overflow",
        }
    }
}

/// Convenient Result alias for chunk construction.
pub type ChunkResult<T> = Result<T, ChunkError>;

/// Errors raised while loading a chunk set configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid YAML for the expected schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Config parsed, but names conflicting options.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Config parsed, but a chunk built from it was rejected.
    #[error("Invalid chunk parameter: {0}")]
    Chunk(#[from] ChunkError),
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "config_io",
            Self::Parse(_) => "config_parse",
            Self::Invalid(_) => "config_invalid",
            Self::Chunk(e) => e.code(),
        }
    }
}

/// Convenient Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_is_not_invalid_argument() {
        let err = ChunkError::Overflow {
            field: "channelMask",
            value: 1 << 40,
            width: 4,
        };
        assert!(err.is_overflow());
        assert!(!err.is_invalid_argument());
        assert_eq!(err.code(), "encoding_overflow");
    }

    #[test]
    fn bit_depth_message_names_value() {
        let err = ChunkError::UnsupportedBitDepth(20);
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "bitDepth not supported: 20");
    }

    #[test]
    fn config_error_forwards_chunk_code() {
        let err = ConfigError::from(ChunkError::SampleRate);
        assert_eq!(err.code(), "invalid_sample_rate");
    }
}
