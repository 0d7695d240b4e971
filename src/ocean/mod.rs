//! Ocean surface simulation with procedural swell.

mod mesh;
mod system;

// Re-export public types
pub use mesh::WaterSurface;
pub use system::OceanSystem;
