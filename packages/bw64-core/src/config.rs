//! Declarative description of a file's metadata chunks.
//!
//! Supports loading from YAML. Numbers are read wide and narrowed through the
//! codec, so a value too large for its field is reported by name instead of
//! being truncated or rejected by the YAML parser with a generic message.
//! Unknown keys are rejected.
//!
//! Text values (`axml`, `sub_format_string`, the `chna` fields) are taken as
//! their UTF-8 bytes, so a GUID remainder containing non-UTF-8 bytes cannot be
//! written through YAML; build [`ExtraData`] directly for that. The `dbmd`
//! payload is binary and is given as a list of byte values.
//!
//! ```yaml
//! format:
//!   channels: 2
//!   sample_rate: 48000
//!   bits_per_sample: 24
//!   extension:
//!     valid_bits_per_sample: 24
//!     channel_mask: 3
//! axml: "<ebuCoreMain/>"
//! dbmd: [7, 0, 0, 0]
//! audio_ids:
//!   - track_index: 1
//!     uid: ATU_00000001
//!     track_ref: AT_00031001_01
//!     pack_ref: AP_00031001
//! ```

use std::path::Path;

use bytes::Bytes;
use serde::Deserialize;

use crate::chna::{AudioId, ChnaChunk};
use crate::chunk::Chunk;
use crate::codec::{narrow_u16, narrow_u32};
use crate::error::{ChunkResult, ConfigError, ConfigResult};
use crate::format::{ExtraData, FormatInfoChunk, PCM_SUBFORMAT_REMAINDER, WAVE_FORMAT_PCM};
use crate::opaque::{AxmlChunk, DbmdChunk, JunkChunk};

/// Default sample rate (Hz).
pub const DEFAULT_SAMPLE_RATE: u64 = 48000;

/// Default number of channels (stereo).
pub const DEFAULT_CHANNELS: u64 = 2;

/// Default PCM bit depth.
pub const DEFAULT_BITS_PER_SAMPLE: u64 = 24;

/// `fmt ` chunk parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    /// Number of channels (>= 1).
    pub channels: u64,
    /// Sample rate in Hz (>= 1).
    pub sample_rate: u64,
    /// 16, 24 or 32.
    pub bits_per_sample: u64,
    /// Extension fields. Omit for a 16-byte format block.
    pub extension: Option<ExtensionConfig>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNELS,
            sample_rate: DEFAULT_SAMPLE_RATE,
            bits_per_sample: DEFAULT_BITS_PER_SAMPLE,
            extension: None,
        }
    }
}

impl FormatConfig {
    pub fn build(&self) -> ChunkResult<FormatInfoChunk> {
        let extra = self
            .extension
            .as_ref()
            .map(ExtensionConfig::build)
            .transpose()?;
        FormatInfoChunk::new(
            narrow_u16("channelCount", self.channels)?,
            narrow_u32("sampleRate", self.sample_rate)?,
            narrow_u16("bitsPerSample", self.bits_per_sample)?,
            extra,
        )
    }
}

/// Extension block of the `fmt ` chunk.
///
/// The GUID remainder comes from `sub_format_string` when given. Otherwise
/// `pcm_guid` (default true) selects the PCM sub-format remainder, and
/// `pcm_guid: false` leaves the remainder empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionConfig {
    /// Meaningful bits within each sample container.
    pub valid_bits_per_sample: u64,
    /// Speaker assignment bitmask.
    #[serde(default)]
    pub channel_mask: u64,
    /// Sub-format discriminator. Defaults to PCM.
    #[serde(default = "default_sub_format")]
    pub sub_format: u64,
    /// Raw GUID remainder, written verbatim.
    #[serde(default)]
    pub sub_format_string: Option<String>,
    /// Use the standard PCM GUID remainder; `false` writes none.
    #[serde(default)]
    pub pcm_guid: Option<bool>,
}

fn default_sub_format() -> u64 {
    WAVE_FORMAT_PCM.into()
}

impl ExtensionConfig {
    /// Rejects combinations that name two different GUID remainders.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pcm_guid == Some(true) && self.sub_format_string.is_some() {
            return Err(ConfigError::Invalid(
                "pcm_guid and sub_format_string are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn build(&self) -> ChunkResult<ExtraData> {
        let remainder = match (&self.sub_format_string, self.pcm_guid) {
            (Some(s), _) => Bytes::copy_from_slice(s.as_bytes()),
            (None, Some(false)) => Bytes::new(),
            (None, _) => Bytes::from_static(&PCM_SUBFORMAT_REMAINDER),
        };
        Ok(ExtraData::new(
            narrow_u16("validBitsPerSample", self.valid_bits_per_sample)?,
            narrow_u32("channelMask", self.channel_mask)?,
            narrow_u16("subFormat", self.sub_format)?,
            remainder,
        ))
    }
}

/// One `chna` row.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AudioIdConfig {
    /// 1-based track index.
    pub track_index: u64,
    /// Up to 12 bytes.
    pub uid: String,
    /// Up to 14 bytes.
    #[serde(default)]
    pub track_ref: String,
    /// Up to 11 bytes.
    #[serde(default)]
    pub pack_ref: String,
}

impl AudioIdConfig {
    pub fn build(&self) -> ChunkResult<AudioId> {
        AudioId::new(
            narrow_u16("trackIndex", self.track_index)?,
            &self.uid,
            &self.track_ref,
            &self.pack_ref,
        )
    }
}

/// Metadata chunks of a BW64 file.
///
/// All fields have sensible defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Bw64Config {
    /// Parameters of the `fmt ` chunk.
    pub format: FormatConfig,

    /// Emit a `JUNK` reservation chunk.
    pub junk: bool,

    /// Inline ADM XML for the `axml` chunk.
    pub axml: Option<String>,

    /// Raw Dolby metadata for the `dbmd` chunk.
    pub dbmd: Option<Vec<u8>>,

    /// `chna` rows. No `chna` chunk is emitted when empty.
    pub audio_ids: Vec<AudioIdConfig>,
}

impl Default for Bw64Config {
    fn default() -> Self {
        Self {
            format: FormatConfig::default(),
            junk: true,
            axml: None,
            dbmd: None,
            audio_ids: Vec::new(),
        }
    }
}

impl Bw64Config {
    /// Loads configuration from a YAML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        log::info!("[CONFIG] Loaded chunk layout from {}", path.display());
        Ok(config)
    }

    /// Parses and validates configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates field combinations serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(extension) = &self.format.extension {
            extension.validate()?;
        }
        Ok(())
    }

    /// Builds the metadata chunks in file order: `JUNK`, `fmt `, `axml`,
    /// `dbmd`, `chna`.
    ///
    /// The caller appends the `data` chunk.
    pub fn build_chunks(&self) -> ChunkResult<Vec<Chunk>> {
        let mut chunks: Vec<Chunk> = Vec::with_capacity(5);

        if self.junk {
            chunks.push(JunkChunk::new().into());
        }

        chunks.push(self.format.build()?.into());

        if let Some(xml) = &self.axml {
            chunks.push(AxmlChunk::new(Bytes::copy_from_slice(xml.as_bytes()))?.into());
        }

        if let Some(metadata) = &self.dbmd {
            chunks.push(DbmdChunk::new(metadata.clone())?.into());
        }

        if !self.audio_ids.is_empty() {
            let audio_ids = self
                .audio_ids
                .iter()
                .map(AudioIdConfig::build)
                .collect::<ChunkResult<Vec<_>>>()?;
            chunks.push(ChnaChunk::new(audio_ids)?.into());
        }

        log::debug!("[CONFIG] Built {} metadata chunks", chunks.len());
        Ok(chunks)
    }
}
