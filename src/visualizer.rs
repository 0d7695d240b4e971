//! The owning controller: scene state plus the current audio session.
//!
//! Only the frame handler writes scene state; the renderer reads it after
//! each tick. Sampling, reduction and consumption run in that order inside a
//! single `on_frame` call.

use std::path::Path;

use crate::audio::{AudioSystem, BandFractions, BandStatistics};
use crate::camera::CameraSystem;
use crate::error::Result;
use crate::frame_loop::{FrameContext, FrameControl, FrameHandler};
use crate::ocean::OceanSystem;
use crate::params::{AnalyserConfig, OrbitParams, SkyParams, SphereParams, WaterParams};
use crate::sphere::{RoughSphere, SphereDrive};

/// Every parameter group the scene is built from
#[derive(Debug, Clone, Default)]
pub struct SceneParams {
    pub water: WaterParams,
    pub sphere: SphereParams,
    pub orbit: OrbitParams,
    pub sky: SkyParams,
    pub analyser: AnalyserConfig,
}

/// What the last completed frame computed
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSnapshot {
    pub statistics: BandStatistics,
    pub fractions: BandFractions,
    pub drive: SphereDrive,
    /// Water animation time after the frame's step (seconds)
    pub water_time_s: f32,
    /// Frame clock (seconds)
    pub time_s: f32,
}

pub struct Visualizer {
    pub ocean: OceanSystem,
    pub sphere: RoughSphere,
    pub camera: CameraSystem,
    pub sky: SkyParams,
    analyser: AnalyserConfig,
    audio: Option<AudioSystem>,
    last: FrameSnapshot,
}

impl Visualizer {
    /// Build the scene; fails if a parameter group is invalid
    pub fn new(params: SceneParams) -> Result<Self> {
        params.analyser.validate()?;
        Ok(Self {
            ocean: OceanSystem::new(params.water),
            sphere: RoughSphere::new(params.sphere)?,
            camera: CameraSystem::new(params.orbit),
            sky: params.sky,
            analyser: params.analyser,
            audio: None,
            last: FrameSnapshot::default(),
        })
    }

    /// Start a new audio session from `path`
    ///
    /// On failure the current session (if any) keeps playing.
    pub fn load_audio(&mut self, path: &Path) -> Result<()> {
        let audio = AudioSystem::load(path, &self.analyser)?;
        // Dropping the previous session stops its stream
        self.audio = Some(audio);
        Ok(())
    }

    pub fn audio(&self) -> Option<&AudioSystem> {
        self.audio.as_ref()
    }

    /// Consume one frame's band data: shape the sphere and step the water
    pub fn apply(&mut self, statistics: BandStatistics, frame: &FrameContext) {
        let fractions = statistics.fractions();
        let drive = self.sphere.update(&fractions, frame.elapsed_ms());
        let water_time_s = self.ocean.advance();

        self.last = FrameSnapshot {
            statistics,
            fractions,
            drive,
            water_time_s,
            time_s: frame.elapsed_secs(),
        };
    }

    pub fn last_frame(&self) -> &FrameSnapshot {
        &self.last
    }

    /// Window title: app name plus the playing file, as the file picker shows it
    pub fn title(&self) -> String {
        track_title(
            self.audio
                .as_ref()
                .map(|audio| (audio.title(), audio.is_finished())),
        )
    }
}

fn track_title(track: Option<(String, bool)>) -> String {
    match track {
        Some((name, false)) => format!("OceanVisuo - {name}"),
        Some((name, true)) => format!("OceanVisuo - {name} (finished)"),
        None => "OceanVisuo - drop an audio file to play".to_string(),
    }
}

impl FrameHandler for Visualizer {
    fn on_frame(&mut self, frame: &FrameContext) -> Result<FrameControl> {
        // Without a session the sphere rests at its base radius
        let statistics = match self.audio.as_mut() {
            Some(audio) => audio.analyse(),
            None => BandStatistics::default(),
        };
        self.apply(statistics, frame);
        Ok(FrameControl::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisualizerError;
    use crate::frame_loop::{FrameLoop, ManualClock};
    use std::time::Duration;

    fn small_scene() -> SceneParams {
        SceneParams {
            water: WaterParams {
                grid_size: 8,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_frames_without_audio_rest_sphere() {
        let clock = ManualClock::default();
        let visualizer = Visualizer::new(small_scene()).unwrap();
        let mut frame_loop = FrameLoop::with_clock(visualizer, clock.clone());

        for _ in 0..3 {
            clock.advance(Duration::from_millis(16));
            assert!(frame_loop.tick());
        }

        let vis = frame_loop.handler();
        let last = vis.last_frame();
        assert_eq!(last.fractions, BandFractions::default());
        assert_eq!(last.drive, SphereDrive::default());
        assert!((last.water_time_s - 3.0 / 60.0).abs() < 1e-6);
        assert!((last.time_s - 0.048).abs() < 1e-6);
        assert!((vis.sphere.rotation_y() - 0.015).abs() < 1e-6);
        assert_eq!(frame_loop.stats().skipped, 0);
    }

    #[test]
    fn test_apply_maps_statistics_into_scene() {
        let mut vis = Visualizer::new(small_scene()).unwrap();
        let statistics = BandStatistics::reduce(&[255u8; 256]);
        let frame = FrameContext {
            index: 0,
            elapsed: Duration::from_millis(100),
            delta: Duration::ZERO,
        };
        vis.apply(statistics, &frame);

        let last = vis.last_frame();
        assert_eq!(last.fractions.lower_max_fr, 255.0 / 127.0);
        // Unclamped: the historical fractions exceed 1 and push past the 0..8 range
        assert!(last.drive.bass > 8.0);
        assert!(last.drive.treble > 4.0);
    }

    #[test]
    fn test_rejected_file_keeps_scene_running() {
        let mut vis = Visualizer::new(small_scene()).unwrap();
        let missing = std::env::temp_dir().join("oceanvisuo-missing-track.ogg");

        let err = vis.load_audio(&missing).unwrap_err();
        assert!(matches!(err, VisualizerError::Decode(_)));
        assert!(vis.audio().is_none());
        assert!(vis.title().contains("drop an audio file"));
    }

    #[test]
    fn test_title_marks_finished_track() {
        assert_eq!(
            track_title(Some(("tide.ogg".to_string(), false))),
            "OceanVisuo - tide.ogg"
        );
        assert_eq!(
            track_title(Some(("tide.ogg".to_string(), true))),
            "OceanVisuo - tide.ogg (finished)"
        );
    }

    #[test]
    fn test_invalid_analyser_config_fails_fast() {
        let mut params = small_scene();
        params.analyser.fft_size = 300;
        assert!(Visualizer::new(params).is_err());
    }
}
