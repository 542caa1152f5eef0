//! `fmt ` chunk: PCM format parameters with an optional extension block.

use bytes::{BufMut, Bytes, BytesMut};

use crate::chunk::{RawChunk, RiffChunk};
use crate::codec::{put_uint_le, FourCc};
use crate::error::{ChunkError, ChunkResult};

/// Format tag for uncompressed integer PCM.
pub const WAVE_FORMAT_PCM: u16 = 0x0001;

/// Length of the format block without an extension.
pub const BASE_FORMAT_SIZE: usize = 16;

/// Length of the fixed extension fields ahead of the sub-format remainder.
pub const EXTENSION_FIXED_SIZE: usize = 8;

/// Bit depths accepted for PCM data.
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// Bytes 2..16 of `KSDATAFORMAT_SUBTYPE_PCM`
/// (`00000001-0000-0010-8000-00aa00389b71`), following the 2-byte sub-format.
pub const PCM_SUBFORMAT_REMAINDER: [u8; 14] = [
    0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0xAA, 0x00, 0x38, 0x9B, 0x71,
];

/// Extended format fields appended after the base format block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraData {
    /// Meaningful bits within each sample container.
    pub valid_bits_per_sample: u16,
    /// Speaker assignment bitmask.
    pub channel_mask: u32,
    /// Format tag of the sub-format GUID (its first two bytes).
    pub sub_format: u16,
    /// Remainder of the sub-format GUID, written verbatim.
    pub sub_format_string: Bytes,
}

impl ExtraData {
    pub fn new(
        valid_bits_per_sample: u16,
        channel_mask: u32,
        sub_format: u16,
        sub_format_string: impl Into<Bytes>,
    ) -> Self {
        Self {
            valid_bits_per_sample,
            channel_mask,
            sub_format,
            sub_format_string: sub_format_string.into(),
        }
    }

    /// Extension describing integer PCM with the standard sub-format GUID.
    pub fn pcm(valid_bits_per_sample: u16, channel_mask: u32) -> Self {
        Self::new(
            valid_bits_per_sample,
            channel_mask,
            WAVE_FORMAT_PCM,
            Bytes::from_static(&PCM_SUBFORMAT_REMAINDER),
        )
    }

    /// Encoded length of this extension.
    pub fn encoded_len(&self) -> usize {
        EXTENSION_FIXED_SIZE + self.sub_format_string.len()
    }

    fn write_to<B: BufMut>(&self, buf: &mut B) -> ChunkResult<()> {
        put_uint_le(buf, "validBitsPerSample", self.valid_bits_per_sample.into(), 2)?;
        put_uint_le(buf, "channelMask", self.channel_mask.into(), 4)?;
        put_uint_le(buf, "subFormat", self.sub_format.into(), 2)?;
        buf.put_slice(&self.sub_format_string);
        Ok(())
    }
}

/// Whether the format block carries the extension fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatInfo {
    /// The 16-byte base block only.
    Basic,
    /// Base block followed by the extension fields.
    Extended(ExtraData),
}

impl FormatInfo {
    /// Length of the fields this variant appends to the base block.
    pub fn extension_len(&self) -> usize {
        match self {
            Self::Basic => 0,
            Self::Extended(extra) => extra.encoded_len(),
        }
    }
}

impl From<Option<ExtraData>> for FormatInfo {
    fn from(extra: Option<ExtraData>) -> Self {
        match extra {
            Some(extra) => Self::Extended(extra),
            None => Self::Basic,
        }
    }
}

/// Immutable `fmt ` chunk.
///
/// Block alignment and byte rate are derived from the stored fields, so they
/// cannot go stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfoChunk {
    channel_count: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    info: FormatInfo,
    pub(crate) raw: RawChunk,
}

impl FormatInfoChunk {
    /// Builds a format chunk, validating every parameter.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::ChannelCount`] if `channel_count` is 0
    /// - [`ChunkError::SampleRate`] if `sample_rate` is 0
    /// - [`ChunkError::UnsupportedBitDepth`] unless `bits_per_sample` is 16, 24 or 32
    /// - [`ChunkError::Overflow`] if block alignment or byte rate exceed their fields
    pub fn new(
        channel_count: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        extra: Option<ExtraData>,
    ) -> ChunkResult<Self> {
        Self::with_info(channel_count, sample_rate, bits_per_sample, extra.into())
    }

    /// Builds a format chunk without extension fields.
    pub fn basic(channel_count: u16, sample_rate: u32, bits_per_sample: u16) -> ChunkResult<Self> {
        Self::with_info(channel_count, sample_rate, bits_per_sample, FormatInfo::Basic)
    }

    /// Builds a format chunk carrying `extra`.
    pub fn extended(
        channel_count: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        extra: ExtraData,
    ) -> ChunkResult<Self> {
        Self::with_info(
            channel_count,
            sample_rate,
            bits_per_sample,
            FormatInfo::Extended(extra),
        )
    }

    pub fn with_info(
        channel_count: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        info: FormatInfo,
    ) -> ChunkResult<Self> {
        if channel_count < 1 {
            return Err(ChunkError::ChannelCount);
        }
        if sample_rate < 1 {
            return Err(ChunkError::SampleRate);
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&bits_per_sample) {
            return Err(ChunkError::UnsupportedBitDepth(bits_per_sample));
        }

        let block_alignment = block_alignment(channel_count, bits_per_sample);
        let bytes_per_second = sample_rate as u64 * block_alignment;

        let mut payload = BytesMut::with_capacity(BASE_FORMAT_SIZE + info.extension_len());
        put_uint_le(&mut payload, "formatTag", WAVE_FORMAT_PCM.into(), 2)?;
        put_uint_le(&mut payload, "channelCount", channel_count.into(), 2)?;
        put_uint_le(&mut payload, "sampleRate", sample_rate.into(), 4)?;
        put_uint_le(&mut payload, "bytesPerSecond", bytes_per_second, 4)?;
        put_uint_le(&mut payload, "blockAlignment", block_alignment, 2)?;
        put_uint_le(&mut payload, "bitsPerSample", bits_per_sample.into(), 2)?;

        match &info {
            FormatInfo::Basic => {}
            FormatInfo::Extended(extra) => {
                if extra.sub_format_string.len() != PCM_SUBFORMAT_REMAINDER.len() {
                    log::debug!(
                        "[FMT] subFormatString is {} bytes (GUID remainder is {}), writing verbatim",
                        extra.sub_format_string.len(),
                        PCM_SUBFORMAT_REMAINDER.len()
                    );
                }
                extra.write_to(&mut payload)?;
            }
        }

        let raw = RawChunk::new(FourCc::FMT, payload.freeze())?;
        log::debug!(
            "[FMT] {} ch, {} Hz, {} bit, {} byte payload",
            channel_count,
            sample_rate,
            bits_per_sample,
            raw.size()
        );

        Ok(Self {
            channel_count,
            sample_rate,
            bits_per_sample,
            info,
            raw,
        })
    }

    /// Always [`WAVE_FORMAT_PCM`].
    #[inline]
    pub const fn format_tag(&self) -> u16 {
        WAVE_FORMAT_PCM
    }

    #[inline]
    pub const fn channel_count(&self) -> u16 {
        self.channel_count
    }

    #[inline]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub const fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    /// Bytes per sample frame across all channels.
    #[inline]
    pub fn block_alignment(&self) -> u16 {
        // Checked against the u16 field at construction.
        block_alignment(self.channel_count, self.bits_per_sample) as u16
    }

    /// Average data rate.
    #[inline]
    pub fn bytes_per_second(&self) -> u32 {
        self.sample_rate * self.block_alignment() as u32
    }

    pub fn info(&self) -> &FormatInfo {
        &self.info
    }

    pub fn extra_data(&self) -> Option<&ExtraData> {
        match &self.info {
            FormatInfo::Basic => None,
            FormatInfo::Extended(extra) => Some(extra),
        }
    }
}

fn block_alignment(channel_count: u16, bits_per_sample: u16) -> u64 {
    channel_count as u64 * bits_per_sample as u64 / 8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    }

    #[test]
    fn basic_payload_decodes_to_inputs() {
        for &channels in &[1u16, 2, 6, 64] {
            for &rate in &[8000u32, 44100, 48000, 96000] {
                for &bits in &SUPPORTED_BIT_DEPTHS {
                    let chunk = FormatInfoChunk::basic(channels, rate, bits).unwrap();
                    let payload = chunk.payload();

                    assert_eq!(chunk.size() as usize, payload.len());
                    assert_eq!(payload.len(), BASE_FORMAT_SIZE);
                    assert_eq!(u16_at(payload, 0), WAVE_FORMAT_PCM);
                    assert_eq!(u16_at(payload, 2), channels);
                    assert_eq!(u32_at(payload, 4), rate);
                    assert_eq!(u32_at(payload, 8), chunk.bytes_per_second());
                    assert_eq!(u16_at(payload, 12), chunk.block_alignment());
                    assert_eq!(u16_at(payload, 14), bits);
                }
            }
        }
    }

    #[test]
    fn derived_rates_follow_formula() {
        let chunk = FormatInfoChunk::basic(2, 48000, 24).unwrap();
        assert_eq!(chunk.block_alignment(), 6);
        assert_eq!(chunk.bytes_per_second(), 288_000);

        let chunk = FormatInfoChunk::basic(1, 44100, 16).unwrap();
        assert_eq!(chunk.block_alignment(), 2);
        assert_eq!(chunk.bytes_per_second(), 88_200);
    }

    #[test]
    fn rejects_zero_channels() {
        assert_eq!(
            FormatInfoChunk::basic(0, 48000, 24),
            Err(ChunkError::ChannelCount)
        );
    }

    #[test]
    fn rejects_zero_sample_rate() {
        assert_eq!(
            FormatInfoChunk::basic(2, 0, 24),
            Err(ChunkError::SampleRate)
        );
    }

    #[test]
    fn rejects_unsupported_bit_depth() {
        assert_eq!(
            FormatInfoChunk::basic(2, 48000, 20),
            Err(ChunkError::UnsupportedBitDepth(20))
        );
        assert!(FormatInfoChunk::basic(2, 48000, 8).is_err());
    }

    #[test]
    fn validation_checks_channels_first() {
        assert_eq!(
            FormatInfoChunk::basic(0, 0, 20),
            Err(ChunkError::ChannelCount)
        );
    }

    #[test]
    fn block_alignment_overflow_is_reported() {
        let err = FormatInfoChunk::basic(u16::MAX, 48000, 32).unwrap_err();
        assert!(matches!(
            err,
            ChunkError::Overflow {
                field: "bytesPerSecond" | "blockAlignment",
                ..
            }
        ));
    }

    #[test]
    fn byte_rate_overflow_is_reported() {
        let err = FormatInfoChunk::basic(16_000, u32::MAX, 32).unwrap_err();
        assert!(err.is_overflow());
    }

    #[test]
    fn extended_size_counts_extension() {
        let extra = ExtraData::new(20, 3, 1, &b"ABCD"[..]);
        let chunk = FormatInfoChunk::new(2, 48000, 24, Some(extra)).unwrap();

        // 16 base bytes, 8 fixed extension bytes, 4 remainder bytes.
        assert_eq!(chunk.size(), 28);
        assert_eq!(chunk.payload().len(), 28);
        assert_eq!(
            &chunk.payload()[..16],
            &[
                0x01, 0x00, // formatTag
                0x02, 0x00, // channels
                0x80, 0xBB, 0x00, 0x00, // 48000
                0x00, 0x65, 0x04, 0x00, // 288000
                0x06, 0x00, // blockAlign
                0x18, 0x00, // 24 bits
            ]
        );
        assert_eq!(
            &chunk.payload()[16..],
            &[0x14, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, b'A', b'B', b'C', b'D']
        );
    }

    #[test]
    fn extended_with_empty_remainder() {
        let extra = ExtraData::new(16, 4, 1, Bytes::new());
        let chunk = FormatInfoChunk::extended(1, 48000, 16, extra).unwrap();
        assert_eq!(chunk.size() as usize, BASE_FORMAT_SIZE + EXTENSION_FIXED_SIZE);
    }

    #[test]
    fn pcm_extension_carries_guid_remainder() {
        let chunk = FormatInfoChunk::extended(6, 48000, 24, ExtraData::pcm(24, 0x3F)).unwrap();
        assert_eq!(chunk.size(), 16 + 8 + 14);
        assert_eq!(&chunk.payload()[24..], &PCM_SUBFORMAT_REMAINDER);
        assert_eq!(chunk.extra_data().map(|e| e.sub_format), Some(WAVE_FORMAT_PCM));
    }

    #[test]
    fn basic_and_none_are_equivalent() {
        let a = FormatInfoChunk::new(2, 48000, 16, None).unwrap();
        let b = FormatInfoChunk::basic(2, 48000, 16).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.info(), &FormatInfo::Basic);
        assert!(a.extra_data().is_none());
    }
}
