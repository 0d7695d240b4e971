//! Water plane mesh with Perlin swell animation.

use noise::{NoiseFn, Perlin};

use crate::mesh::{Mesh, Vertex};
use crate::params::WaterParams;

/// Square water grid centered on the origin in the XZ plane
pub struct WaterSurface {
    pub mesh: Mesh,
    perlin: Perlin,
    grid_size: usize,
    grid_spacing: f32,
    /// Scratch heights reused every update
    heights: Vec<f32>,
}

impl WaterSurface {
    /// Create a flat water grid with specified parameters
    pub fn new(params: &WaterParams) -> Self {
        let grid_size = params.grid_size.max(1);
        let grid_spacing = params.extent_m / grid_size as f32;
        let half_size = params.extent_m / 2.0;

        let mut vertices = Vec::with_capacity((grid_size + 1) * (grid_size + 1));
        let mut indices = Vec::with_capacity(grid_size * grid_size * 6);

        // Generate flat XZ plane grid
        for z in 0..=grid_size {
            for x in 0..=grid_size {
                vertices.push(Vertex {
                    position: [
                        x as f32 * grid_spacing - half_size,
                        0.0,
                        z as f32 * grid_spacing - half_size,
                    ],
                    normal: [0.0, 1.0, 0.0],
                });
            }
        }

        // Generate triangle indices (counter-clockwise seen from above)
        for z in 0..grid_size {
            for x in 0..grid_size {
                let top_left = (z * (grid_size + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (grid_size + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        let vertex_count = vertices.len();

        Self {
            mesh: Mesh { vertices, indices },
            perlin: Perlin::new(params.noise_seed),
            grid_size,
            grid_spacing,
            heights: vec![0.0; vertex_count],
        }
    }

    /// Height of the swell at a world position for water time `time_s`
    pub fn swell_height(&self, x: f32, z: f32, time_s: f32, params: &WaterParams) -> f32 {
        let t = time_s * params.swell_speed;
        let noise_value = self.perlin.get([
            (x * params.swell_frequency) as f64,
            (z * params.swell_frequency) as f64,
            t as f64,
        ]) as f32;
        noise_value * params.swell_amplitude_m
    }

    /// Displace the grid for water time `time_s` and refresh normals
    pub fn update(&mut self, time_s: f32, params: &WaterParams) {
        for idx in 0..self.mesh.vertices.len() {
            let [x, _, z] = self.mesh.vertices[idx].position;
            self.heights[idx] = self.swell_height(x, z, time_s, params);
        }

        let row = self.grid_size + 1;
        let inv_span = 1.0 / (2.0 * self.grid_spacing);
        for (idx, vertex) in self.mesh.vertices.iter_mut().enumerate() {
            let (gx, gz) = (idx % row, idx / row);
            let left = self.heights[gz * row + gx.saturating_sub(1)];
            let right = self.heights[gz * row + (gx + 1).min(self.grid_size)];
            let back = self.heights[gz.saturating_sub(1) * row + gx];
            let front = self.heights[(gz + 1).min(self.grid_size) * row + gx];

            let nx = -(right - left) * inv_span;
            let nz = -(front - back) * inv_span;
            let len = (nx * nx + 1.0 + nz * nz).sqrt();

            vertex.position[1] = self.heights[idx];
            vertex.normal = [nx / len, 1.0 / len, nz / len];
        }
    }
}
