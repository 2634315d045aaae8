//! Cross-field rules for presets.
//!
//! Three rules, applied in order, each touching its own fields only:
//!
//! 1. Encoders other than QSV cannot use the LA, LA-ICQ or QVBR modes
//!    (falls back to VBR) and always run with D3D mode `auto`.
//! 2. Only NVENC encodes 10-bit; everything else is forced to 8-bit.
//! 3. An HDR output type cannot be combined with HDR to SDR tone-mapping.
//!
//! Because no field is written by more than one rule and every rule writes a
//! value its own condition accepts, a second pass never changes anything.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::preset::Preset;
use super::types::{ColorDepth, D3DMode, EncodeMode, Encoder, Hdr2Sdr, HdrType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rule {
    QsvOnlyEncodeMode,
    QsvOnlyD3DMode,
    NvencOnlyColorDepth,
    HdrOutputWithoutToneMap,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rule::QsvOnlyEncodeMode => "LA, LA-ICQ and QVBR modes require the QSV encoder",
            Rule::QsvOnlyD3DMode => "D3D mode selection requires the QSV encoder",
            Rule::NvencOnlyColorDepth => "10-bit output requires the NVENC encoder",
            Rule::HdrOutputWithoutToneMap => "HDR output cannot be tone-mapped to SDR",
        };
        f.write_str(text)
    }
}

/// A field value replaced by the enforcer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    pub field: &'static str,
    pub from: String,
    pub to: String,
    pub rule: Rule,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {} ({})", self.field, self.from, self.to, self.rule)
    }
}

fn correction(field: &'static str, from: impl fmt::Display, to: impl fmt::Display, rule: Rule) -> Correction {
    Correction {
        field,
        from: from.to_string(),
        to: to.to_string(),
        rule,
    }
}

/// Rules the preset currently breaks, in rule order
pub fn violations(preset: &Preset) -> Vec<Rule> {
    enforce(&mut preset.clone())
        .into_iter()
        .map(|c| c.rule)
        .collect()
}

/// Repair the preset in place and report what was changed.
///
/// An empty result means the preset already satisfied every rule.
pub fn enforce(preset: &mut Preset) -> Vec<Correction> {
    let mut corrections = Vec::new();

    // Non-QSV encoders
    if preset.encoder != Encoder::Qsv {
        if preset.encode_mode.is_qsv_only() {
            corrections.push(correction(
                "encode_mode",
                preset.encode_mode,
                EncodeMode::Vbr,
                Rule::QsvOnlyEncodeMode,
            ));
            preset.encode_mode = EncodeMode::Vbr;
        }

        if preset.d3d_mode != D3DMode::Auto {
            corrections.push(correction(
                "d3d_mode",
                preset.d3d_mode,
                D3DMode::Auto,
                Rule::QsvOnlyD3DMode,
            ));
            preset.d3d_mode = D3DMode::Auto;
        }
    }

    // Non-NVENC encoders are 8-bit only
    if preset.encoder != Encoder::Nvenc && preset.color_depth != ColorDepth::C8Bit {
        corrections.push(correction(
            "color_depth",
            preset.color_depth,
            ColorDepth::C8Bit,
            Rule::NvencOnlyColorDepth,
        ));
        preset.color_depth = ColorDepth::C8Bit;
    }

    if preset.new_hdr_type != HdrType::Sdr && preset.hdr2sdr != Hdr2Sdr::None {
        corrections.push(correction(
            "hdr2sdr",
            preset.hdr2sdr,
            Hdr2Sdr::None,
            Rule::HdrOutputWithoutToneMap,
        ));
        preset.hdr2sdr = Hdr2Sdr::None;
    }

    for c in &corrections {
        debug!(preset = %preset.name, field = c.field, from = %c.from, to = %c.to, "Corrected preset field");
    }

    corrections
}

/// By-value form of [`enforce`]
pub fn enforced(mut preset: Preset) -> Preset {
    enforce(&mut preset);
    preset
}
