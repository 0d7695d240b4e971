//! Audio-reactive rough sphere.
//!
//! The lower band's peak pushes the whole surface outward; the upper band's
//! average scales a drifting coherent-noise displacement on top of that.

use glam::{Mat4, Vec3};
use noise::{NoiseFn, OpenSimplex};
use std::f32::consts::PI;

use crate::audio::BandFractions;
use crate::error::Result;
use crate::mapping::Modulation;
use crate::mesh::{Mesh, Vertex};
use crate::params::SphereParams;

/// Mapped audio drive applied in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SphereDrive {
    /// Radius offset (meters)
    pub bass: f32,
    /// Noise displacement gain
    pub treble: f32,
}

/// Build a UV sphere laid out like a three.js `SphereGeometry`
///
/// `(width_segments + 1) * (height_segments + 1)` vertices, with duplicated
/// seam and pole vertices, and no degenerate triangles at the poles.
pub fn uv_sphere(radius: f32, width_segments: usize, height_segments: usize) -> Mesh {
    let w = width_segments.max(3);
    let h = height_segments.max(2);

    let mut vertices = Vec::with_capacity((w + 1) * (h + 1));
    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let dir = Vec3::new(
                -(u * 2.0 * PI).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * 2.0 * PI).sin() * (v * PI).sin(),
            );
            vertices.push(Vertex {
                position: (dir * radius).to_array(),
                normal: dir.to_array(),
            });
        }
    }

    let index = |ix: usize, iy: usize| (iy * (w + 1) + ix) as u32;
    let mut indices = Vec::with_capacity(w * h * 6);
    for iy in 0..h {
        for ix in 0..w {
            let a = index(ix + 1, iy);
            let b = index(ix, iy);
            let c = index(ix, iy + 1);
            let d = index(ix + 1, iy + 1);
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh { vertices, indices }
}

/// Sphere mesh with its undeformed shape and group rotation
pub struct RoughSphere {
    pub mesh: Mesh,
    base: Vec<Vec3>,
    params: SphereParams,
    noise: OpenSimplex,
    bass: Modulation,
    treble: Modulation,
    rotation_y: f32,
}

impl RoughSphere {
    /// Build the sphere and its band mappings; fails on a degenerate mapping range
    pub fn new(params: SphereParams) -> Result<Self> {
        let bass = Modulation::new(0.0, 1.0, params.bass_range_m.0, params.bass_range_m.1)?
            .with_exponent(params.bass_exponent);
        let treble = Modulation::new(0.0, 1.0, params.treble_range.0, params.treble_range.1)?;

        let mesh = uv_sphere(params.radius_m, params.width_segments, params.height_segments);
        let base = mesh
            .vertices
            .iter()
            .map(|v| Vec3::from_array(v.position))
            .collect();

        Ok(Self {
            mesh,
            base,
            noise: OpenSimplex::new(params.noise_seed),
            params,
            bass,
            treble,
            rotation_y: 0.0,
        })
    }

    /// Map band fractions to the per-frame drive
    pub fn drive(&self, fractions: &BandFractions) -> SphereDrive {
        SphereDrive {
            bass: self.bass.apply(fractions.lower_max_fr),
            treble: self.treble.apply(fractions.upper_avg_fr),
        }
    }

    /// Reshape every vertex from its base position for this frame
    ///
    /// `time_ms` is the high-resolution frame timestamp in milliseconds.
    pub fn deform(&mut self, drive: SphereDrive, time_ms: f64) {
        let rf = self.params.noise_rate as f64;
        let drift = [time_ms * rf * 7.0, time_ms * rf * 8.0, time_ms * rf * 9.0];
        let offset = self.params.radius_m + drive.bass;
        let gain = self.params.noise_amplitude * drive.treble;

        for (vertex, base) in self.mesh.vertices.iter_mut().zip(&self.base) {
            let n = self.noise.get([
                base.x as f64 + drift[0],
                base.y as f64 + drift[1],
                base.z as f64 + drift[2],
            ]) as f32;
            let distance = offset + n * gain;
            vertex.position = (base.normalize_or_zero() * distance).to_array();
        }
        self.mesh.recompute_normals();
    }

    /// Map, deform, and spin in one step; returns the drive used
    pub fn update(&mut self, fractions: &BandFractions, time_ms: f64) -> SphereDrive {
        let drive = self.drive(fractions);
        self.deform(drive, time_ms);
        self.rotation_y += self.params.spin_per_frame;
        drive
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Group transform: rotate about Y, then move to the group center
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::from_array(self.params.center))
            * Mat4::from_rotation_y(self.rotation_y)
    }

    pub fn params(&self) -> &SphereParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radii(sphere: &RoughSphere) -> Vec<f32> {
        sphere
            .mesh
            .vertices
            .iter()
            .map(|v| Vec3::from_array(v.position).length())
            .collect()
    }

    #[test]
    fn test_uv_sphere_layout() {
        let mesh = uv_sphere(15.0, 15, 15);
        assert_eq!(mesh.vertices.len(), 16 * 16);
        // Pole rows contribute one triangle per segment, others two
        assert_eq!(mesh.triangle_count(), 15 * 2 * 15 - 2 * 15);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - 15.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_silence_keeps_base_radius() {
        let mut sphere = RoughSphere::new(SphereParams::default()).unwrap();
        let drive = sphere.update(&BandFractions::default(), 1234.0);

        assert_eq!(drive, SphereDrive::default());
        for r in radii(&sphere) {
            assert!((r - 15.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_loud_bass_grows_sphere() {
        let mut sphere = RoughSphere::new(SphereParams::default()).unwrap();
        let fractions = BandFractions {
            lower_max_fr: 1.0,
            ..Default::default()
        };
        let drive = sphere.update(&fractions, 0.0);

        assert_eq!(drive.bass, 8.0);
        assert_eq!(drive.treble, 0.0);
        for r in radii(&sphere) {
            assert!((r - 23.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_treble_roughens_surface() {
        let mut sphere = RoughSphere::new(SphereParams::default()).unwrap();
        let fractions = BandFractions {
            upper_avg_fr: 0.5,
            ..Default::default()
        };
        sphere.update(&fractions, 500.0);

        let r = radii(&sphere);
        let min = r.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = r.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(max - min > 0.5);
    }

    #[test]
    fn test_deformation_is_deterministic() {
        let fractions = BandFractions {
            lower_max_fr: 0.4,
            lower_avg_fr: 0.1,
            upper_max_fr: 0.3,
            upper_avg_fr: 0.2,
        };
        let mut a = RoughSphere::new(SphereParams::default()).unwrap();
        let mut b = RoughSphere::new(SphereParams::default()).unwrap();
        a.update(&fractions, 16.7);
        b.update(&fractions, 16.7);
        assert_eq!(radii(&a), radii(&b));
    }

    #[test]
    fn test_spin_accumulates_per_frame() {
        let mut sphere = RoughSphere::new(SphereParams::default()).unwrap();
        for _ in 0..10 {
            sphere.update(&BandFractions::default(), 0.0);
        }
        assert!((sphere.rotation_y() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_empty_output_range_is_allowed() {
        // Only the input domain must be non-empty; a flat output is a constant
        let params = SphereParams {
            bass_range_m: (3.0, 3.0),
            ..Default::default()
        };
        let sphere = RoughSphere::new(params).unwrap();
        let fractions = BandFractions {
            lower_max_fr: 0.7,
            ..Default::default()
        };
        assert_eq!(sphere.drive(&fractions).bass, 3.0);
    }
}
