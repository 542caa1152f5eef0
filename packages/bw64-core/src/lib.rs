//! BW64 Core - chunk encoding for Broadcast Wave 64 files.
//!
//! This crate builds the individual chunks of a BW64 (extended WAV) file and
//! serializes each into its exact byte layout. Sequencing chunks, inserting
//! the RIFF pad byte after odd-sized chunks and writing the outer
//! `RIFF`/`BW64` header are left to the file writer.
//!
//! # Architecture
//!
//! - [`codec`]: Little-endian fixed-width integers and chunk tags
//! - [`chunk`]: The `(tag, size, payload)` capability and the closed set of chunk kinds
//! - [`format`]: `fmt ` chunk with optional extension fields
//! - [`opaque`]: `data`, `JUNK`, `axml` and `dbmd` chunks
//! - [`chna`]: ADM track-to-UID table rows and the `chna` chunk
//! - [`config`]: YAML description of a file's metadata chunks
//! - [`error`]: Centralized error types
//!
//! Every chunk is validated when it is built and immutable afterwards, so a
//! value of any chunk type always satisfies `size() == payload().len()`.

#![warn(clippy::all)]

pub mod chna;
pub mod chunk;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod opaque;

// Re-export commonly used types at the crate root
pub use chna::{AudioId, ChnaChunk, PaddedField, AUDIO_ID_SIZE};
pub use chunk::{Chunk, RiffChunk, CHUNK_HEADER_SIZE};
pub use codec::{encode_uint, FourCc};
pub use config::Bw64Config;
pub use error::{ChunkError, ChunkResult, ConfigError, ConfigResult, ErrorCode};
pub use format::{ExtraData, FormatInfo, FormatInfoChunk};
pub use opaque::{AxmlChunk, DataChunk, DbmdChunk, JunkChunk};
