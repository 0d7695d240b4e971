//! Audio decoding, playback and real-time frequency analysis.
//!
//! Playback feeds mono samples into an analysis tap; each frame the sampler
//! turns the tap into a byte spectrum and the band reducer turns that into
//! the four fractions the scene consumes.

pub mod analyser;
pub mod bands;
pub mod decode;
pub mod playback;
mod system;

// Re-export public types
pub use analyser::{AnalyserNode, AnalysisTap, FrequencySampler};
pub use bands::{BandFractions, BandStatistics};
pub use decode::{decode_audio, DecodedAudio};
pub use system::AudioSystem;
