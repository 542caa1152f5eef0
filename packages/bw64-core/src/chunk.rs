//! The shape shared by every chunk and the closed set of chunk kinds.
//!
//! A chunk is a value object: a tag, a 32-bit size and a payload. The size is
//! computed from the payload when the chunk is built and never stored apart
//! from it, so `size() == payload().len()` always holds.

use bytes::{BufMut, Bytes, BytesMut};

use crate::chna::ChnaChunk;
use crate::codec::{payload_size, FourCc};
use crate::error::ChunkResult;
use crate::format::FormatInfoChunk;
use crate::opaque::{AxmlChunk, DataChunk, DbmdChunk, JunkChunk};

/// Bytes taken by the tag and size fields in front of every payload.
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Read-only view a RIFF writer needs from a chunk.
pub trait RiffChunk {
    /// Chunk identifier.
    fn tag(&self) -> FourCc;

    /// Payload byte length, as written after the tag.
    fn size(&self) -> u32;

    /// Payload bytes.
    fn payload(&self) -> &Bytes;

    /// Writes `tag || size || payload`. No trailing pad byte is written.
    fn write_to<B: BufMut>(&self, buf: &mut B)
    where
        Self: Sized,
    {
        buf.put_slice(self.tag().as_bytes());
        buf.put_u32_le(self.size());
        buf.put_slice(self.payload());
    }

    /// Returns the chunk stream element as a standalone buffer.
    fn to_bytes(&self) -> Bytes
    where
        Self: Sized,
    {
        let mut buf = BytesMut::with_capacity(CHUNK_HEADER_SIZE + self.payload().len());
        self.write_to(&mut buf);
        buf.freeze()
    }

    /// Bytes the chunk occupies in a RIFF stream once the writer adds the
    /// even-alignment pad byte.
    fn padded_len(&self) -> u64 {
        let size = self.size() as u64;
        CHUNK_HEADER_SIZE as u64 + size + (size & 1)
    }
}

/// Tag plus payload, with the size derived once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawChunk {
    tag: FourCc,
    size: u32,
    payload: Bytes,
}

impl RawChunk {
    pub(crate) fn new(tag: FourCc, payload: Bytes) -> ChunkResult<Self> {
        let size = payload_size("chunkSize", payload.len())?;
        Ok(Self { tag, size, payload })
    }

    /// Fixed payloads known to be far below the size limit.
    pub(crate) fn from_static(tag: FourCc, payload: &'static [u8]) -> Self {
        Self {
            tag,
            size: payload.len() as u32,
            payload: Bytes::from_static(payload),
        }
    }
}

impl RiffChunk for RawChunk {
    fn tag(&self) -> FourCc {
        self.tag
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn payload(&self) -> &Bytes {
        &self.payload
    }
}

/// Every chunk kind this crate can build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// `fmt ` PCM format block.
    Format(FormatInfoChunk),
    /// `data` audio samples.
    Data(DataChunk),
    /// `JUNK` reserved space.
    Junk(JunkChunk),
    /// `axml` ADM XML.
    Axml(AxmlChunk),
    /// `dbmd` Dolby metadata.
    Dbmd(DbmdChunk),
    /// `chna` track-to-UID table.
    Chna(ChnaChunk),
}

impl Chunk {
    fn raw(&self) -> &RawChunk {
        match self {
            Self::Format(c) => &c.raw,
            Self::Data(c) => &c.raw,
            Self::Junk(c) => &c.raw,
            Self::Axml(c) => &c.raw,
            Self::Dbmd(c) => &c.raw,
            Self::Chna(c) => &c.raw,
        }
    }
}

macro_rules! impl_chunk {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl RiffChunk for $ty {
                fn tag(&self) -> FourCc {
                    self.raw.tag()
                }

                fn size(&self) -> u32 {
                    self.raw.size()
                }

                fn payload(&self) -> &Bytes {
                    self.raw.payload()
                }
            }
        )+
    };
}

impl_chunk!(FormatInfoChunk, DataChunk, JunkChunk, AxmlChunk, DbmdChunk, ChnaChunk);

impl RiffChunk for Chunk {
    fn tag(&self) -> FourCc {
        self.raw().tag()
    }

    fn size(&self) -> u32 {
        self.raw().size()
    }

    fn payload(&self) -> &Bytes {
        self.raw().payload()
    }
}

macro_rules! impl_from {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Chunk {
                fn from(chunk: $ty) -> Self {
                    Chunk::$variant(chunk)
                }
            }
        )+
    };
}

impl_from!(
    Format => FormatInfoChunk,
    Data => DataChunk,
    Junk => JunkChunk,
    Axml => AxmlChunk,
    Dbmd => DbmdChunk,
    Chna => ChnaChunk,
);
