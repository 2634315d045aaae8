use insta::{assert_json_snapshot, assert_snapshot};
use presetctl::engine::{ColorDepth, Encoder, Hdr2Sdr, HdrType, enforce};

use crate::common::helpers::qsv_lookahead_preset;

fn report(corrections: &[presetctl::engine::Correction]) -> String {
    corrections
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn snapshot_every_rule_fires() {
    let mut preset = qsv_lookahead_preset("Everything Wrong");
    preset.encoder = Encoder::Vce;
    preset.color_depth = ColorDepth::C10Bit;
    preset.new_hdr_type = HdrType::Hdr10;
    preset.hdr2sdr = Hdr2Sdr::Hable;

    let corrections = enforce(&mut preset);
    assert_snapshot!(report(&corrections), @r"
    encode_mode: la -> vbr (LA, LA-ICQ and QVBR modes require the QSV encoder)
    d3d_mode: d3d11 -> auto (D3D mode selection requires the QSV encoder)
    color_depth: c10bit -> c8bit (10-bit output requires the NVENC encoder)
    hdr2sdr: hable -> none (HDR output cannot be tone-mapped to SDR)
    ");
}

#[test]
fn snapshot_correction_json() {
    let mut preset = qsv_lookahead_preset("Lookahead");
    preset.encoder = Encoder::Nvenc;

    let corrections = enforce(&mut preset);
    assert_json_snapshot!(corrections, @r#"
    [
      {
        "field": "encode_mode",
        "from": "la",
        "to": "vbr",
        "rule": "QsvOnlyEncodeMode"
      },
      {
        "field": "d3d_mode",
        "from": "d3d11",
        "to": "auto",
        "rule": "QsvOnlyD3DMode"
      }
    ]
    "#);
}
