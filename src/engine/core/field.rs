//! Typed single-field assignments on a preset.
//!
//! A `FieldChange` is what the session manager's `mutate` consumes. The CLI
//! builds them from `key=value` arguments via `FromStr`.

use std::str::FromStr;
use thiserror::Error;

use super::preset::{CqpValues, Resolution};
use super::types::{
    AudioMode, Codec, ColorDepth, D3DMode, Decoder, EncodeMode, Encoder, Hdr2Sdr, HdrType,
    OutputFormat,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Expected KEY=VALUE, got '{0}'")]
    MissingSeparator(String),

    #[error("Unknown field '{0}' (run `presetctl fields` for the list)")]
    UnknownField(String),

    #[error("Invalid value '{value}' for '{field}': expected {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Name(String),
    Encoder(Encoder),
    Codec(Codec),
    Decoder(Decoder),
    EncodeMode(EncodeMode),
    D3DMode(D3DMode),
    ColorDepth(ColorDepth),
    NewHdrType(HdrType),
    Hdr2Sdr(Hdr2Sdr),
    Cqp(CqpValues),
    Quality(u32),
    Bitrate(u32),
    MaxBitrate(u32),
    Resize(Option<Resolution>),
    Fps(Option<String>),
    Deinterlace(bool),
    AudioMode(AudioMode),
    AudioBitrate(u32),
    OutputFormat(OutputFormat),
    ExtraArgs(String),
}

/// Mutable field keys with a short description of the accepted values
pub fn field_keys() -> Vec<(&'static str, String)> {
    vec![
        ("name", "any text".to_string()),
        ("encoder", Encoder::tokens().join("|")),
        ("codec", Codec::tokens().join("|")),
        ("decoder", Decoder::tokens().join("|")),
        ("encode_mode", EncodeMode::tokens().join("|")),
        ("d3d_mode", D3DMode::tokens().join("|")),
        ("color_depth", ColorDepth::tokens().join("|")),
        ("hdr_type", HdrType::tokens().join("|")),
        ("hdr2sdr", Hdr2Sdr::tokens().join("|")),
        ("cqp", "I:P:B, e.g. 24:26:27".to_string()),
        ("quality", "integer".to_string()),
        ("bitrate", "kbps".to_string()),
        ("max_bitrate", "kbps".to_string()),
        ("resize", "WIDTHxHEIGHT or off".to_string()),
        ("fps", "rate such as 25 or 30000/1001, or off".to_string()),
        ("deinterlace", "true|false".to_string()),
        ("audio", AudioMode::tokens().join("|")),
        ("audio_bitrate", "kbps".to_string()),
        ("format", OutputFormat::tokens().join("|")),
        ("extra_args", "raw encoder arguments".to_string()),
    ]
}

impl FieldChange {
    /// Key used for this field in `key=value` form
    pub fn key(&self) -> &'static str {
        match self {
            FieldChange::Name(_) => "name",
            FieldChange::Encoder(_) => "encoder",
            FieldChange::Codec(_) => "codec",
            FieldChange::Decoder(_) => "decoder",
            FieldChange::EncodeMode(_) => "encode_mode",
            FieldChange::D3DMode(_) => "d3d_mode",
            FieldChange::ColorDepth(_) => "color_depth",
            FieldChange::NewHdrType(_) => "hdr_type",
            FieldChange::Hdr2Sdr(_) => "hdr2sdr",
            FieldChange::Cqp(_) => "cqp",
            FieldChange::Quality(_) => "quality",
            FieldChange::Bitrate(_) => "bitrate",
            FieldChange::MaxBitrate(_) => "max_bitrate",
            FieldChange::Resize(_) => "resize",
            FieldChange::Fps(_) => "fps",
            FieldChange::Deinterlace(_) => "deinterlace",
            FieldChange::AudioMode(_) => "audio",
            FieldChange::AudioBitrate(_) => "audio_bitrate",
            FieldChange::OutputFormat(_) => "format",
            FieldChange::ExtraArgs(_) => "extra_args",
        }
    }

    /// Whether the change touches a field covered by the cross-field rules
    pub fn is_constrained(&self) -> bool {
        matches!(
            self,
            FieldChange::Encoder(_)
                | FieldChange::EncodeMode(_)
                | FieldChange::D3DMode(_)
                | FieldChange::ColorDepth(_)
                | FieldChange::NewHdrType(_)
                | FieldChange::Hdr2Sdr(_)
        )
    }
}

fn invalid(field: &'static str, value: &str, expected: impl Into<String>) -> FieldError {
    FieldError::InvalidValue {
        field,
        value: value.to_string(),
        expected: expected.into(),
    }
}

fn parse_token<T>(field: &'static str, value: &str, tokens: Vec<&'static str>) -> Result<T, FieldError>
where
    T: FromStr,
{
    value
        .parse::<T>()
        .map_err(|_| invalid(field, value, format!("one of {}", tokens.join(", "))))
}

fn parse_u32(field: &'static str, value: &str) -> Result<u32, FieldError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid(field, value, "a non-negative integer"))
}

fn is_off(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "off" | "none" | "source" | ""
    )
}

fn parse_cqp(value: &str) -> Result<CqpValues, FieldError> {
    let parts: Vec<&str> = value.split(':').map(str::trim).collect();
    match parts.as_slice() {
        [i, p, b] => {
            let qp = |s: &str| s.parse::<u32>().map_err(|_| invalid("cqp", value, "I:P:B"));
            Ok(CqpValues {
                i: qp(*i)?,
                p: qp(*p)?,
                b: qp(*b)?,
            })
        }
        [all] => {
            let q = all.parse::<u32>().map_err(|_| invalid("cqp", value, "I:P:B"))?;
            Ok(CqpValues { i: q, p: q, b: q })
        }
        _ => Err(invalid("cqp", value, "I:P:B")),
    }
}

fn parse_resize(value: &str) -> Result<Option<Resolution>, FieldError> {
    if is_off(value) {
        return Ok(None);
    }
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| invalid("resize", value, "WIDTHxHEIGHT or off"))?;
    let dim = |s: &str| {
        s.trim()
            .parse::<u32>()
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| invalid("resize", value, "WIDTHxHEIGHT or off"))
    };
    Ok(Some(Resolution {
        width: dim(w)?,
        height: dim(h)?,
    }))
}

fn parse_fps(value: &str) -> Result<Option<String>, FieldError> {
    if is_off(value) {
        return Ok(None);
    }
    let value = value.trim();
    let valid = match value.split_once('/') {
        Some((num, den)) => {
            num.parse::<u32>().is_ok_and(|n| n > 0) && den.parse::<u32>().is_ok_and(|d| d > 0)
        }
        None => value.parse::<f64>().is_ok_and(|f| f.is_finite() && f > 0.0),
    };
    if valid {
        Ok(Some(value.to_string()))
    } else {
        Err(invalid("fps", value, "a positive rate such as 25 or 30000/1001"))
    }
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, FieldError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(field, value, "true or false")),
    }
}

impl FromStr for FieldChange {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| FieldError::MissingSeparator(s.to_string()))?;
        let key = key.trim().to_ascii_lowercase().replace('-', "_");

        let change = match key.as_str() {
            "name" => FieldChange::Name(value.trim().to_string()),
            "encoder" => FieldChange::Encoder(parse_token("encoder", value, Encoder::tokens())?),
            "codec" => FieldChange::Codec(parse_token("codec", value, Codec::tokens())?),
            "decoder" => FieldChange::Decoder(parse_token("decoder", value, Decoder::tokens())?),
            "encode_mode" | "mode" => FieldChange::EncodeMode(parse_token(
                "encode_mode",
                value,
                EncodeMode::tokens(),
            )?),
            "d3d_mode" | "d3d" => {
                FieldChange::D3DMode(parse_token("d3d_mode", value, D3DMode::tokens())?)
            }
            "color_depth" | "depth" => FieldChange::ColorDepth(parse_token(
                "color_depth",
                value,
                ColorDepth::tokens(),
            )?),
            "hdr_type" | "hdr" => {
                FieldChange::NewHdrType(parse_token("hdr_type", value, HdrType::tokens())?)
            }
            "hdr2sdr" => FieldChange::Hdr2Sdr(parse_token("hdr2sdr", value, Hdr2Sdr::tokens())?),
            "cqp" => FieldChange::Cqp(parse_cqp(value)?),
            "quality" => FieldChange::Quality(parse_u32("quality", value)?),
            "bitrate" => FieldChange::Bitrate(parse_u32("bitrate", value)?),
            "max_bitrate" => FieldChange::MaxBitrate(parse_u32("max_bitrate", value)?),
            "resize" => FieldChange::Resize(parse_resize(value)?),
            "fps" => FieldChange::Fps(parse_fps(value)?),
            "deinterlace" => FieldChange::Deinterlace(parse_bool("deinterlace", value)?),
            "audio" => FieldChange::AudioMode(parse_token("audio", value, AudioMode::tokens())?),
            "audio_bitrate" => FieldChange::AudioBitrate(parse_u32("audio_bitrate", value)?),
            "format" | "output_format" => FieldChange::OutputFormat(parse_token(
                "format",
                value,
                OutputFormat::tokens(),
            )?),
            "extra_args" => FieldChange::ExtraArgs(value.to_string()),
            _ => return Err(FieldError::UnknownField(key)),
        };

        Ok(change)
    }
}
