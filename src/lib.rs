//! OceanVisuo library - audio-reactive ocean and sky visualizer

pub mod audio;
pub mod camera;
pub mod cli;
pub mod error;
pub mod frame_loop;
pub mod mapping;
pub mod mesh;
pub mod ocean;
pub mod params;
pub mod rendering;
pub mod sky;
pub mod sphere;
pub mod visualizer;
