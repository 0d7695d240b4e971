//! Error types shared by the audio path, the frame loop and the renderer.

use thiserror::Error;

/// Errors surfaced by the visualizer library
#[derive(Debug, Error)]
pub enum VisualizerError {
    /// A mapping was built over an empty input domain (`min == max`)
    #[error("degenerate mapping range: min ({min}) and max ({max}) must differ and be finite")]
    DegenerateRange { min: f32, max: f32 },

    /// A parameter struct failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The selected file could not be decoded
    #[error("could not decode audio: {0}")]
    Decode(String),

    /// No default audio output device is available
    #[error("no audio output device found")]
    NoOutputDevice,

    /// The audio output stream could not be built or started
    #[error("audio stream error: {0}")]
    Stream(String),

    /// GPU setup or surface failure
    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, VisualizerError>;
