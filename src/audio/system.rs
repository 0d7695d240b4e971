//! Audio session: a decoded file playing through the output device with its
//! frequency sampler attached.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::analyser::{AnalyserNode, AnalysisTap, FrequencySampler};
use super::bands::BandStatistics;
use super::decode::decode_audio;
use super::playback::AudioPlayer;
use crate::error::{Result, VisualizerError};
use crate::params::AnalyserConfig;

/// One audio session, replaced wholesale when the user picks another file
pub struct AudioSystem {
    path: PathBuf,
    sampler: FrequencySampler,
    player: AudioPlayer,
}

impl AudioSystem {
    /// Decode `path`, start playback and attach an analyser
    pub fn load(path: &Path, config: &AnalyserConfig) -> Result<Self> {
        let node = AnalyserNode::new(config.clone())?;

        let audio =
            decode_audio(path).map_err(|e| VisualizerError::Decode(format!("{:#}", e)))?;

        let tap = AnalysisTap::shared(config.fft_size);
        let player = AudioPlayer::start(Arc::new(audio), Arc::clone(&tap))?;
        let sampler = FrequencySampler::new(node, tap);

        log::info!(
            "Playing {} ({} frequency bins)",
            path.display(),
            sampler.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            sampler,
            player,
        })
    }

    /// Sample the analyser and reduce the buffer to band statistics
    pub fn analyse(&mut self) -> BandStatistics {
        BandStatistics::reduce(self.sampler.sample())
    }

    /// File name for display, falling back to the full path
    pub fn title(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Whether playback has reached the end of the file
    pub fn is_finished(&self) -> bool {
        self.player.is_finished()
    }
}
