//! Decode a user-selected audio file into interleaved PCM.

use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Fully decoded track, interleaved by channel
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl DecodedAudio {
    /// Number of sample frames (one sample per channel each)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1)
    }

    pub fn duration_secs(&self) -> f32 {
        self.frames() as f32 / self.sample_rate as f32
    }

    /// Average of all channels at `frame`
    pub fn mono_at(&self, frame: usize) -> f32 {
        let start = frame * self.channels;
        let slice = &self.samples[start..start + self.channels];
        slice.iter().sum::<f32>() / self.channels as f32
    }

    /// Sample for `channel` at `frame`, reusing the last channel when the
    /// output has more channels than the file
    pub fn sample_at(&self, frame: usize, channel: usize) -> f32 {
        let channel = channel.min(self.channels - 1);
        self.samples[frame * self.channels + channel]
    }
}

/// Fix the channel count from the first decoded packet and hold later ones to it
fn settle_channels(channels: &mut Option<usize>, packet_channels: usize) -> Result<usize> {
    match *channels {
        None => {
            *channels = Some(packet_channels);
            Ok(packet_channels)
        }
        Some(first) if first != packet_channels => {
            anyhow::bail!("channel count changed mid-stream ({first} -> {packet_channels})")
        }
        Some(first) => Ok(first),
    }
}

pub fn decode_audio(path: &Path) -> Result<DecodedAudio> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Unsupported or unrecognized audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    // Containers may under-report channels; the decoded buffers are authoritative
    let declared_channels = track.codec_params.channels.map(|c| c.count());
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut samples: Vec<f32> = Vec::new();
    let mut channels: Option<usize> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("Skipping corrupt packet: {}", msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        settle_channels(&mut channels, spec.channels.count())
            .with_context(|| format!("Unsupported channel layout: {}", path.display()))?;
        let mut sample_buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sample_buf.samples());
    }

    let channels = match channels {
        Some(count) if !samples.is_empty() && count > 0 => count,
        _ => anyhow::bail!("File contains no audio samples: {}", path.display()),
    };
    if declared_channels.is_some_and(|declared| declared != channels) {
        log::warn!(
            "{} declares {:?} channels but decodes to {}",
            path.display(),
            declared_channels,
            channels
        );
    }

    let audio = DecodedAudio {
        samples,
        sample_rate,
        channels,
    };

    log::info!(
        "Decoded audio: {} frames x {} ch, {}Hz, {:.1}s",
        audio.frames(),
        channels,
        sample_rate,
        audio.duration_secs()
    );

    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("oceanvisuo-{}-{}", std::process::id(), name))
    }

    fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: usize) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            for ch in 0..channels {
                let value = if ch == 0 { 8000 } else { -8000 };
                writer.write_sample(if i % 2 == 0 { value } else { 0 }).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_stereo_wav() {
        let path = temp_path("stereo.wav");
        write_wav(&path, 2, 22_050, 2_205);

        let audio = decode_audio(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(audio.channels, 2);
        assert_eq!(audio.sample_rate, 22_050);
        assert_eq!(audio.frames(), 2_205);
        assert!((audio.duration_secs() - 0.1).abs() < 1e-3);

        // Opposite-sign channels cancel in the mono mix
        assert!(audio.sample_at(0, 0) > 0.2);
        assert!(audio.sample_at(0, 1) < -0.2);
        assert!(audio.mono_at(0).abs() < 1e-6);
        // Extra output channels reuse the last file channel
        assert_eq!(audio.sample_at(0, 5), audio.sample_at(0, 1));
    }

    #[test]
    fn test_first_packet_fixes_channel_count() {
        let mut channels = None;
        assert_eq!(settle_channels(&mut channels, 2).unwrap(), 2);
        assert_eq!(channels, Some(2));
        assert_eq!(settle_channels(&mut channels, 2).unwrap(), 2);

        let err = settle_channels(&mut channels, 1).unwrap_err();
        assert!(err.to_string().contains("2 -> 1"));
        assert_eq!(channels, Some(2));
    }

    #[test]
    fn test_decode_mono_wav() {
        let path = temp_path("mono.wav");
        write_wav(&path, 1, 8_000, 800);

        let audio = decode_audio(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(audio.channels, 1);
        assert_eq!(audio.frames(), 800);
        assert_eq!(audio.mono_at(0), audio.sample_at(0, 0));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = decode_audio(&temp_path("does-not-exist.mp3")).unwrap_err();
        assert!(err.to_string().contains("Failed to open audio file"));
    }

    #[test]
    fn test_garbage_file_is_rejected() {
        let path = temp_path("garbage.wav");
        std::fs::write(&path, b"definitely not audio").unwrap();
        let result = decode_audio(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
