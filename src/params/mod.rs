//! Parameter definitions with physical units and documented semantics.
//!
//! Every constant of the scene and the analysis path lives here with:
//! - Units (meters, seconds, decibels, radians, etc.)
//! - Documented ranges and meanings
//! - A `Default` carrying the values the visualizer ships with

mod audio;
mod camera;
mod ocean;
mod render;
mod sky;
mod sphere;

// Re-export all types
pub use audio::AnalyserConfig;
pub use camera::OrbitParams;
pub use ocean::WaterParams;
pub use render::RenderConfig;
pub use sky::SkyParams;
pub use sphere::SphereParams;
