//! Audio output: plays a decoded track and feeds the analysis tap.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex, PoisonError};

use super::analyser::AnalysisTap;
use super::decode::DecodedAudio;
use crate::error::{Result, VisualizerError};

/// Read cursor into the decoded track, advanced by the output callback
#[derive(Debug)]
pub struct PlaybackCursor {
    audio: Arc<DecodedAudio>,
    /// Fractional frame position in the source track
    position: f64,
    /// Source frames consumed per output frame
    step: f64,
    finished: bool,
}

impl PlaybackCursor {
    pub fn new(audio: Arc<DecodedAudio>, output_rate: u32) -> Self {
        let step = audio.sample_rate as f64 / output_rate.max(1) as f64;
        Self {
            audio,
            position: 0.0,
            step,
            finished: false,
        }
    }

    /// Fill an interleaved output buffer, pushing the mono mix into `mono`
    ///
    /// Resamples by linear interpolation; writes silence once the track ends.
    pub fn render(&mut self, out: &mut [f32], out_channels: usize, mono: &mut Vec<f32>) {
        let out_channels = out_channels.max(1);
        let last_frame = self.audio.frames().saturating_sub(1);

        for frame in out.chunks_mut(out_channels) {
            if self.finished {
                frame.fill(0.0);
                mono.push(0.0);
                continue;
            }

            let index = self.position.floor() as usize;
            let next = (index + 1).min(last_frame);
            let t = (self.position - index as f64) as f32;

            for (ch, slot) in frame.iter_mut().enumerate() {
                let a = self.audio.sample_at(index, ch);
                let b = self.audio.sample_at(next, ch);
                // Hard clip to keep a hot master from distorting the device
                *slot = (a + (b - a) * t).clamp(-1.0, 1.0);
            }
            let a = self.audio.mono_at(index);
            let b = self.audio.mono_at(next);
            mono.push(a + (b - a) * t);

            self.position += self.step;
            if self.position as usize > last_frame {
                self.finished = true;
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Live output stream for one track
pub struct AudioPlayer {
    cursor: Arc<Mutex<PlaybackCursor>>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioPlayer {
    /// Open the default output device and start playing `audio`
    pub fn start(audio: Arc<DecodedAudio>, tap: Arc<Mutex<AnalysisTap>>) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(VisualizerError::NoOutputDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| {
                VisualizerError::Stream(format!("Failed to get audio config: {}", e))
            })?;

        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(VisualizerError::Stream(format!(
                "Unsupported output sample format {:?}",
                supported.sample_format()
            )));
        }

        let output_rate = supported.sample_rate().0;
        let out_channels = supported.channels() as usize;

        log::info!(
            "Audio: {} @ {}Hz, {} ch",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            output_rate,
            out_channels
        );

        let cursor = Arc::new(Mutex::new(PlaybackCursor::new(audio, output_rate)));
        let cursor_cb = Arc::clone(&cursor);
        let mut mono = Vec::new();

        let stream = device
            .build_output_stream(
                &supported.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    mono.clear();
                    // Both locks guard plain data; keep playing after a panicked reader
                    cursor_cb
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .render(data, out_channels, &mut mono);
                    tap.lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(&mono);
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| {
                VisualizerError::Stream(format!("Failed to build audio stream: {}", e))
            })?;

        stream
            .play()
            .map_err(|e| {
                VisualizerError::Stream(format!("Failed to start audio stream: {}", e))
            })?;

        Ok(Self {
            cursor,
            _stream: stream,
        })
    }

    /// Whether the track has played to its end
    pub fn is_finished(&self) -> bool {
        self.cursor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_finished()
    }
}
