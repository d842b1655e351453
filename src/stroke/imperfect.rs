//! Hand-drawn looking straight lines
//!
//! The line tool walks from start to end in fixed steps while a small
//! sideways force bends the path. The force is re-rolled every few tenths
//! of a unit and tends to flip back toward the ideal line the further the
//! path has wandered, so the result wobbles without drifting away.

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::Vec2;

/// Parameters of the wobbly line generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImperfectLineGenerator {
    /// Shortest run before the sideways force changes
    pub min_force_length: f32,
    /// Longest run before the sideways force changes
    pub max_force_length: f32,
    /// Largest sideways push per step
    pub force_size: f32,
    /// Lateral distance at which a flip back toward the line is certain
    pub max_size: f32,
}

impl Default for ImperfectLineGenerator {
    fn default() -> Self {
        Self {
            min_force_length: 0.1,
            max_force_length: 1.0,
            force_size: 0.001,
            max_size: 0.2,
        }
    }
}

impl ImperfectLineGenerator {
    /// Points of a wobbly line from `start` toward `end`, one per
    /// `step_length`. The first point is `start` itself.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        start: Vec2,
        end: Vec2,
        step_length: f32,
        rng: &mut R,
    ) -> Vec<Vec2> {
        let span = end - start;
        let magnitude = span.len();
        if !(step_length > 0.0) || magnitude == 0.0 {
            return vec![start];
        }

        let dir = span.normalize();
        let normal = dir.perp();

        let mut points = Vec::with_capacity((magnitude / step_length) as usize + 2);
        points.push(start);

        let mut position = start;
        let mut elapsed = 0.0;
        let mut force = random_range(rng, -self.force_size, self.force_size);
        let mut elapsed_force = 0.0;
        let mut next_force = random_range(rng, self.min_force_length, self.max_force_length);

        while elapsed < magnitude {
            elapsed += step_length;
            elapsed_force += step_length;
            position += dir * step_length + normal * force;

            if elapsed_force > next_force {
                elapsed_force = 0.0;
                next_force = random_range(rng, self.min_force_length, self.max_force_length);
                force = random_range(rng, -self.force_size, self.force_size);

                // Pushing further out: maybe steer back toward the line
                let offset = position - start;
                if offset.dot(normal * force) > 0.0 && self.max_size > 0.0 {
                    let lateral = (offset - offset.project(dir)).len();
                    let flip_chance = lateral / self.max_size;
                    if random_range(rng, 0.0, 1.0) < flip_chance {
                        force = -force;
                    }
                }
            }

            points.push(position);
        }

        points
    }
}

/// Uniform value in `[lo, hi]`, or `lo` when the range is empty
fn random_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}
