use std::io::Cursor;

use anyhow::{bail, Context};

/// Header facts shown under the input preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_ms: u64,
}

/// Encode PCM f32 samples as mono 16-bit PCM WAV (RIFF).
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> anyhow::Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut out = Cursor::new(Vec::<u8>::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut out, spec).context("WAV header")?;
        for &s in samples {
            // Convert f32 [-1.0,1.0] to i16
            let clamped = s.clamp(-1.0, 1.0);
            writer.write_sample((clamped * i16::MAX as f32) as i16)?;
        }
        writer.finalize().context("WAV finalize")?;
    }
    Ok(out.into_inner())
}

/// Decode little-endian f32 PCM as posted by the in-page recorder.
pub fn samples_from_le_bytes(bytes: &[u8]) -> anyhow::Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        bail!("PCM body is {} bytes, not a whole number of f32 samples", bytes.len());
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Best-effort header probe; `None` for anything hound cannot read.
pub fn probe(bytes: &[u8]) -> Option<WavInfo> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).ok()?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }
    // duration() counts frames, i.e. samples per channel
    let frames = reader.duration() as u64;
    Some(WavInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        duration_ms: frames * 1000 / spec.sample_rate as u64,
    })
}
