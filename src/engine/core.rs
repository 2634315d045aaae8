mod enforce;
mod field;
mod preset;
mod types;

pub use enforce::{Correction, Rule, enforce, enforced, violations};
pub use field::{FieldChange, FieldError, field_keys};
pub use preset::{AudioOptions, CqpValues, Preset, RateControl, Resolution, VideoFilters};
pub use types::{
    AudioMode, Codec, ColorDepth, D3DMode, Decoder, EncodeMode, Encoder, Hdr2Sdr, HdrType,
    OutputFormat, UnknownVariant,
};
