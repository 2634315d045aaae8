//! Closed option sets used by presets.
//!
//! Every enum serialises as a lowercase token and parses back from that
//! token case-insensitively, so the same spelling is used in the JSON store,
//! in `key=value` field changes and in CLI output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a token does not name any variant of an option set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! option_set {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $token)] $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }

            /// Accepted tokens, in declaration order
            pub fn tokens() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

option_set! {
    /// Hardware encoder family
    Encoder, "encoder" {
        #[default]
        Qsv => "qsv",
        Nvenc => "nvenc",
        Vce => "vce",
    }
}

option_set! {
    Codec, "codec" {
        H264 => "h264",
        #[default]
        Hevc => "hevc",
        Av1 => "av1",
    }
}

option_set! {
    /// Where decoding happens (hardware or libav software decode)
    Decoder, "decoder" {
        #[default]
        AvHw => "avhw",
        AvSw => "avsw",
    }
}

option_set! {
    /// Rate control mode.
    ///
    /// `La`, `LaIcq` and `Qvbr` only exist on QSV.
    EncodeMode, "encode mode" {
        Cqp => "cqp",
        Cbr => "cbr",
        #[default]
        Vbr => "vbr",
        Avbr => "avbr",
        Qvbr => "qvbr",
        La => "la",
        LaIcq => "laicq",
        Icq => "icq",
    }
}

impl EncodeMode {
    /// Lookahead and quality-VBR modes, available on QSV only
    pub fn is_qsv_only(self) -> bool {
        matches!(self, EncodeMode::La | EncodeMode::LaIcq | EncodeMode::Qvbr)
    }
}

option_set! {
    /// Direct3D surface mode (QSV only; other encoders run with `Auto`)
    D3DMode, "d3d mode" {
        #[default]
        Auto => "auto",
        Disable => "disable",
        D3D9 => "d3d9",
        D3D11 => "d3d11",
    }
}

option_set! {
    ColorDepth, "color depth" {
        #[default]
        C8Bit => "c8bit",
        C10Bit => "c10bit",
    }
}

option_set! {
    /// Target dynamic range of the output
    HdrType, "hdr type" {
        #[default]
        Sdr => "sdr",
        Hdr10 => "hdr10",
        Hlg => "hlg",
    }
}

option_set! {
    /// Tone-mapping method for HDR to SDR conversion
    Hdr2Sdr, "hdr2sdr method" {
        #[default]
        None => "none",
        Hable => "hable",
        Mobius => "mobius",
        Reinhard => "reinhard",
        Bt2390 => "bt2390",
    }
}

option_set! {
    AudioMode, "audio mode" {
        #[default]
        Copy => "copy",
        Aac => "aac",
        None => "none",
    }
}

option_set! {
    OutputFormat, "output format" {
        #[default]
        Mp4 => "mp4",
        Mkv => "mkv",
        Flv => "flv",
    }
}
