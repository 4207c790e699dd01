use std::path::Path;

use crate::error::{TtsError, TtsResult};

/// Write mono float samples as a 32-bit float WAV file.
pub fn write_mono_f32<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> TtsResult<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| TtsError::AudioOutput(e.to_string()))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| TtsError::AudioOutput(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| TtsError::AudioOutput(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_readable_mono_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let samples: Vec<f32> = (0..480).map(|i| (i as f32 / 480.0).sin()).collect();

        write_mono_f32(&path, &samples, 24_000).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(reader.len(), 480);
    }

    #[test]
    fn empty_input_still_produces_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");

        write_mono_f32(&path, &[], 24_000).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
