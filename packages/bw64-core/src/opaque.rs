//! Chunks whose payload is carried verbatim: `data`, `JUNK`, `axml`, `dbmd`.
//!
//! None of these interpret their bytes. The only check is that the payload
//! length fits the 32-bit size field.

use bytes::Bytes;

use crate::chunk::RawChunk;
use crate::codec::FourCc;
use crate::error::ChunkResult;

/// Payload length of the `JUNK` reservation chunk.
pub const JUNK_CHUNK_SIZE: usize = 28;

static JUNK_PAYLOAD: [u8; JUNK_CHUNK_SIZE] = [0; JUNK_CHUNK_SIZE];

/// Audio sample stream, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChunk {
    pub(crate) raw: RawChunk,
}

impl DataChunk {
    /// Wraps already-encoded sample bytes.
    ///
    /// # Errors
    ///
    /// Returns an overflow error if `samples` is longer than `u32::MAX` bytes.
    pub fn new(samples: impl Into<Bytes>) -> ChunkResult<Self> {
        Ok(Self {
            raw: RawChunk::new(FourCc::DATA, samples.into())?,
        })
    }
}

/// Zero-filled padding reserved for later promotion to a 64-bit size chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JunkChunk {
    pub(crate) raw: RawChunk,
}

impl JunkChunk {
    pub fn new() -> Self {
        Self {
            raw: RawChunk::from_static(FourCc::JUNK, &JUNK_PAYLOAD),
        }
    }
}

impl Default for JunkChunk {
    fn default() -> Self {
        Self::new()
    }
}

/// ADM metadata as XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxmlChunk {
    pub(crate) raw: RawChunk,
}

impl AxmlChunk {
    pub fn new(xml: impl Into<Bytes>) -> ChunkResult<Self> {
        Ok(Self {
            raw: RawChunk::new(FourCc::AXML, xml.into())?,
        })
    }
}

/// Dolby metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbmdChunk {
    pub(crate) raw: RawChunk,
}

impl DbmdChunk {
    pub fn new(metadata: impl Into<Bytes>) -> ChunkResult<Self> {
        Ok(Self {
            raw: RawChunk::new(FourCc::DBMD, metadata.into())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::RiffChunk;

    #[test]
    fn junk_is_28_zero_bytes() {
        let junk = JunkChunk::new();
        assert_eq!(junk.tag(), FourCc::JUNK);
        assert_eq!(junk.size(), 28);
        assert_eq!(junk.payload().len(), 28);
        assert!(junk.payload().iter().all(|&b| b == 0));
        assert_eq!(junk, JunkChunk::default());
    }

    #[test]
    fn data_carries_samples_verbatim() {
        let samples = vec![0x01, 0xFF, 0x7F, 0x80, 0x00];
        let chunk = DataChunk::new(samples.clone()).unwrap();
        assert_eq!(chunk.tag(), FourCc::DATA);
        assert_eq!(chunk.size(), 5);
        assert_eq!(&chunk.payload()[..], &samples[..]);
    }

    #[test]
    fn empty_data_is_allowed() {
        let chunk = DataChunk::new(Bytes::new()).unwrap();
        assert_eq!(chunk.size(), 0);
    }

    #[test]
    fn axml_and_dbmd_use_their_tags() {
        let xml = "<ebuCoreMain/>";
        let axml = AxmlChunk::new(xml).unwrap();
        assert_eq!(axml.tag().as_bytes(), b"axml");
        assert_eq!(axml.size() as usize, xml.len());
        assert_eq!(&axml.payload()[..], xml.as_bytes());

        let dbmd = DbmdChunk::new(vec![7u8; 9]).unwrap();
        assert_eq!(dbmd.tag().as_bytes(), b"dbmd");
        assert_eq!(dbmd.size(), 9);
    }
}
