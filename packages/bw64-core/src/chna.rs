//! `chna` chunk: the ADM track-to-UID table.
//!
//! Each row ([`AudioId`]) is a fixed 40-byte record. Text fields are padded
//! with spaces to their fixed width once, when the record is built.

use std::collections::HashSet;
use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::chunk::{RawChunk, RiffChunk};
use crate::codec::{narrow_u16, put_uint_le, FourCc};
use crate::error::{ChunkError, ChunkResult};

/// Filler byte for fixed-width text fields.
pub const PAD_BYTE: u8 = b' ';

pub const UID_LEN: usize = 12;
pub const TRACK_REF_LEN: usize = 14;
pub const PACK_REF_LEN: usize = 11;

/// Encoded length of one [`AudioId`] row.
pub const AUDIO_ID_SIZE: usize = 2 + UID_LEN + TRACK_REF_LEN + PACK_REF_LEN + 1;

/// Length of the `numUIDs`/`numTracks` header.
pub const CHNA_HEADER_SIZE: usize = 4;

/// Byte string right-padded with spaces to exactly `N` bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaddedField<const N: usize>([u8; N]);

impl<const N: usize> PaddedField<N> {
    /// Copies `value` and pads it to `N` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::FieldTooLong`] naming `field` if `value` is longer
    /// than `N` bytes.
    pub fn new(field: &'static str, value: &[u8]) -> ChunkResult<Self> {
        if value.len() > N {
            return Err(ChunkError::FieldTooLong {
                field,
                len: value.len(),
                max: N,
            });
        }
        let mut bytes = [PAD_BYTE; N];
        bytes[..value.len()].copy_from_slice(value);
        Ok(Self(bytes))
    }

    /// Padded bytes as written.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Content with trailing padding removed.
    pub fn trimmed(&self) -> &[u8] {
        let end = self
            .0
            .iter()
            .rposition(|&b| b != PAD_BYTE)
            .map_or(0, |i| i + 1);
        &self.0[..end]
    }
}

impl<const N: usize> fmt::Debug for PaddedField<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.escape_ascii().to_string())
    }
}

/// One row of the `chna` table.
///
/// Two rows are equal exactly when their encodings are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioId {
    track_index: u16,
    uid: PaddedField<UID_LEN>,
    track_ref: PaddedField<TRACK_REF_LEN>,
    pack_ref: PaddedField<PACK_REF_LEN>,
}

impl AudioId {
    /// Builds a row, padding each text field to its fixed width.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::FieldTooLong`] if `uid` exceeds 12 bytes,
    /// `track_ref` exceeds 14 bytes or `pack_ref` exceeds 11 bytes.
    pub fn new(
        track_index: u16,
        uid: impl AsRef<[u8]>,
        track_ref: impl AsRef<[u8]>,
        pack_ref: impl AsRef<[u8]>,
    ) -> ChunkResult<Self> {
        Ok(Self {
            track_index,
            uid: PaddedField::new("uid", uid.as_ref())?,
            track_ref: PaddedField::new("trackRef", track_ref.as_ref())?,
            pack_ref: PaddedField::new("packRef", pack_ref.as_ref())?,
        })
    }

    #[inline]
    pub const fn track_index(&self) -> u16 {
        self.track_index
    }

    pub fn uid(&self) -> &PaddedField<UID_LEN> {
        &self.uid
    }

    pub fn track_ref(&self) -> &PaddedField<TRACK_REF_LEN> {
        &self.track_ref
    }

    pub fn pack_ref(&self) -> &PaddedField<PACK_REF_LEN> {
        &self.pack_ref
    }

    /// Appends the 40-byte row to `buf`.
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16_le(self.track_index);
        buf.put_slice(self.uid.as_bytes());
        buf.put_slice(self.track_ref.as_bytes());
        buf.put_slice(self.pack_ref.as_bytes());
        buf.put_u8(PAD_BYTE);
    }

    /// Returns the 40-byte row.
    pub fn encode(&self) -> [u8; AUDIO_ID_SIZE] {
        let mut out = [0u8; AUDIO_ID_SIZE];
        self.write_to(&mut &mut out[..]);
        out
    }
}

/// Track-to-UID table chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChnaChunk {
    audio_ids: Vec<AudioId>,
    num_tracks: u16,
    pub(crate) raw: RawChunk,
}

impl ChnaChunk {
    /// Builds the table from rows in the order given.
    ///
    /// Track indices are not checked for contiguity.
    ///
    /// # Errors
    ///
    /// Returns an overflow error if there are more than 65535 rows.
    pub fn new(audio_ids: impl IntoIterator<Item = AudioId>) -> ChunkResult<Self> {
        let audio_ids: Vec<AudioId> = audio_ids.into_iter().collect();
        let num_uids = narrow_u16("numUIDs", audio_ids.len() as u64)?;
        let num_tracks = audio_ids
            .iter()
            .map(AudioId::track_index)
            .collect::<HashSet<_>>()
            .len();

        let mut payload =
            BytesMut::with_capacity(CHNA_HEADER_SIZE + AUDIO_ID_SIZE * audio_ids.len());
        put_uint_le(&mut payload, "numUIDs", num_uids.into(), 2)?;
        put_uint_le(&mut payload, "numTracks", num_tracks as u64, 2)?;
        for audio_id in &audio_ids {
            audio_id.write_to(&mut payload);
        }

        let raw = RawChunk::new(FourCc::CHNA, payload.freeze())?;
        log::debug!(
            "[CHNA] {} UIDs across {} tracks, {} byte payload",
            num_uids,
            num_tracks,
            raw.size()
        );

        Ok(Self {
            audio_ids,
            // Never more distinct tracks than rows.
            num_tracks: num_tracks as u16,
            raw,
        })
    }

    pub fn audio_ids(&self) -> &[AudioId] {
        &self.audio_ids
    }

    /// Number of rows.
    pub fn num_uids(&self) -> u16 {
        self.audio_ids.len() as u16
    }

    /// Number of distinct track indices.
    pub fn num_tracks(&self) -> u16 {
        self.num_tracks
    }
}
