//! Linear range mapping used to turn band fractions into visual offsets.
//!
//! Both functions are unclamped: inputs outside the domain extrapolate, which
//! is how callers amplify an effect past its nominal range.

use crate::error::{Result, VisualizerError};

/// Position of `value` within `[min, max]` as a fraction (0 at `min`, 1 at `max`)
///
/// Produces NaN or infinity when `min == max`. Use [`Modulation::new`] where
/// the range comes from a call site that should fail fast instead.
pub fn fractionate(value: f32, min: f32, max: f32) -> f32 {
    (value - min) / (max - min)
}

/// Map `value` from `[min, max]` onto `[out_min, out_max]`
pub fn modulate(value: f32, min: f32, max: f32, out_min: f32, out_max: f32) -> f32 {
    let fr = fractionate(value, min, max);
    out_min + fr * (out_max - out_min)
}

/// A validated mapping from one range onto another, fixed per call site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulation {
    min: f32,
    max: f32,
    out_min: f32,
    out_max: f32,
    /// Applied to the input before mapping (1.0 = identity)
    exponent: f32,
}

impl Modulation {
    /// Build a mapping, rejecting an empty or non-finite input domain
    pub fn new(min: f32, max: f32, out_min: f32, out_max: f32) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min == max {
            return Err(VisualizerError::DegenerateRange { min, max });
        }
        Ok(Self {
            min,
            max,
            out_min,
            out_max,
            exponent: 1.0,
        })
    }

    /// Raise the input to `exponent` before mapping
    pub fn with_exponent(mut self, exponent: f32) -> Self {
        self.exponent = exponent;
        self
    }

    pub fn apply(&self, value: f32) -> f32 {
        let shaped = if self.exponent == 1.0 {
            value
        } else {
            value.powf(self.exponent)
        };
        modulate(shaped, self.min, self.max, self.out_min, self.out_max)
    }
}
