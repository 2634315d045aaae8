use serde::{Deserialize, Serialize};

use super::field::FieldChange;
use super::types::{
    AudioMode, Codec, ColorDepth, D3DMode, Decoder, EncodeMode, Encoder, Hdr2Sdr, HdrType,
    OutputFormat,
};

// Default values for Preset fields
fn default_name() -> String {
    "New Preset".to_string()
}
fn default_quality() -> u32 {
    23
}
fn default_bitrate_kbps() -> u32 {
    6000
}
fn default_max_bitrate_kbps() -> u32 {
    12000
}
fn default_audio_bitrate_kbps() -> u32 {
    192
}

// ============================================================================
// Nested option groups
// ============================================================================

/// Constant-QP values for I, P and B frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CqpValues {
    pub i: u32,
    pub p: u32,
    pub b: u32,
}

impl Default for CqpValues {
    fn default() -> Self {
        Self {
            i: 24,
            p: 26,
            b: 27,
        }
    }
}

/// Rate control parameters; which ones apply depends on the encode mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateControl {
    #[serde(default)]
    pub cqp: CqpValues,
    #[serde(default = "default_quality")]
    pub quality: u32, // ICQ / LA-ICQ / QVBR quality
    #[serde(default = "default_bitrate_kbps")]
    pub bitrate_kbps: u32,
    #[serde(default = "default_max_bitrate_kbps")]
    pub max_bitrate_kbps: u32,
}

impl Default for RateControl {
    fn default() -> Self {
        Self {
            cqp: CqpValues::default(),
            quality: default_quality(),
            bitrate_kbps: default_bitrate_kbps(),
            max_bitrate_kbps: default_max_bitrate_kbps(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFilters {
    #[serde(default)]
    pub resize: Option<Resolution>, // None = keep source size
    #[serde(default)]
    pub fps: Option<String>, // None = source rate, else "30000/1001" or "25"
    #[serde(default)]
    pub deinterlace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioOptions {
    #[serde(default)]
    pub mode: AudioMode,
    #[serde(default = "default_audio_bitrate_kbps")]
    pub bitrate_kbps: u32, // only used by re-encoding modes
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            mode: AudioMode::default(),
            bitrate_kbps: default_audio_bitrate_kbps(),
        }
    }
}

// ============================================================================
// Preset
// ============================================================================

/// A named bundle of encoding options.
///
/// Equality is structural over every field, nested groups included, and
/// `clone` produces a fully independent copy: the type holds no shared
/// references, so a cloned preset can be edited without touching the
/// saved entry it was copied from.
///
/// The encoder, encode mode, D3D mode, colour depth, HDR type and tone-map
/// method are constrained against each other; see
/// [`enforce`](super::enforce::enforce).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default = "default_name")]
    pub name: String,

    // Encoder selection
    #[serde(default)]
    pub encoder: Encoder,
    #[serde(default)]
    pub codec: Codec,
    #[serde(default)]
    pub decoder: Decoder,
    #[serde(default)]
    pub encode_mode: EncodeMode,
    #[serde(default)]
    pub d3d_mode: D3DMode,

    // Colour / HDR
    #[serde(default)]
    pub color_depth: ColorDepth,
    #[serde(default)]
    pub new_hdr_type: HdrType,
    #[serde(default)]
    pub hdr2sdr: Hdr2Sdr,

    // Output
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub extra_args: String,

    // Option groups (kept last so TOML renders them as trailing tables)
    #[serde(default)]
    pub rate: RateControl,
    #[serde(default)]
    pub video: VideoFilters,
    #[serde(default)]
    pub audio: AudioOptions,
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            name: default_name(),
            encoder: Encoder::default(),
            codec: Codec::default(),
            decoder: Decoder::default(),
            encode_mode: EncodeMode::default(),
            d3d_mode: D3DMode::default(),
            color_depth: ColorDepth::default(),
            new_hdr_type: HdrType::default(),
            hdr2sdr: Hdr2Sdr::default(),
            output_format: OutputFormat::default(),
            extra_args: String::new(),
            rate: RateControl::default(),
            video: VideoFilters::default(),
            audio: AudioOptions::default(),
        }
    }
}

impl Preset {
    /// Default preset carrying the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Assign a single field. No cross-field checks happen here; callers
    /// that edit the current preset go through the session manager, which
    /// runs the enforcer afterwards.
    pub fn apply(&mut self, change: FieldChange) {
        match change {
            FieldChange::Name(name) => self.name = name,
            FieldChange::Encoder(v) => self.encoder = v,
            FieldChange::Codec(v) => self.codec = v,
            FieldChange::Decoder(v) => self.decoder = v,
            FieldChange::EncodeMode(v) => self.encode_mode = v,
            FieldChange::D3DMode(v) => self.d3d_mode = v,
            FieldChange::ColorDepth(v) => self.color_depth = v,
            FieldChange::NewHdrType(v) => self.new_hdr_type = v,
            FieldChange::Hdr2Sdr(v) => self.hdr2sdr = v,
            FieldChange::Cqp(v) => self.rate.cqp = v,
            FieldChange::Quality(v) => self.rate.quality = v,
            FieldChange::Bitrate(v) => self.rate.bitrate_kbps = v,
            FieldChange::MaxBitrate(v) => self.rate.max_bitrate_kbps = v,
            FieldChange::Resize(v) => self.video.resize = v,
            FieldChange::Fps(v) => self.video.fps = v,
            FieldChange::Deinterlace(v) => self.video.deinterlace = v,
            FieldChange::AudioMode(v) => self.audio.mode = v,
            FieldChange::AudioBitrate(v) => self.audio.bitrate_kbps = v,
            FieldChange::OutputFormat(v) => self.output_format = v,
            FieldChange::ExtraArgs(v) => self.extra_args = v,
        }
    }
}
