//! WAV fixtures for tests that decode real files.

use std::f32::consts::TAU;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

pub const FIXTURE_RATE: u32 = 8_000;

/// Write a mono 16-bit WAV made of `(duration_ms, amplitude)` sections of a
/// 440 Hz tone. An amplitude of zero writes digital silence.
pub fn write_wav(path: &Path, sections: &[(u64, f32)]) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: FIXTURE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    let mut n = 0u64;
    for &(ms, amplitude) in sections {
        for _ in 0..u64::from(FIXTURE_RATE) * ms / 1000 {
            let t = n as f32 / FIXTURE_RATE as f32;
            let value = amplitude * (TAU * 440.0 * t).sin();
            writer.write_sample((value * f32::from(i16::MAX)) as i16).unwrap();
            n += 1;
        }
    }
    writer.finalize().unwrap();
}
