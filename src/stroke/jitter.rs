//! Hand-tremor removal for freehand brush strokes
//!
//! The raw pointer path is resampled into a coarse reference polyline, one
//! vertex every `sample_distance` of travelled length. Raw points that sit
//! within `max_spread` of their reference segment are projected onto it;
//! points further away are deliberate and kept.

use serde::{Serialize, Deserialize};

use crate::math::Vec2;

/// Result of jitter correction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectedStroke {
    /// Points to rasterize, one per raw point
    pub points: Vec<Vec2>,
    /// Resampled reference polyline (debug overlay)
    pub reference: Vec<Vec2>,
}

/// Snaps near-straight runs of a stroke onto a resampled reference line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JitterCorrector {
    /// Largest perpendicular deviation that still counts as tremor
    pub max_spread: f32,
    /// Travel distance between reference vertices
    pub sample_distance: f32,
}

impl Default for JitterCorrector {
    fn default() -> Self {
        Self {
            max_spread: 0.01,
            sample_distance: 0.1,
        }
    }
}

impl JitterCorrector {
    pub fn new(max_spread: f32, sample_distance: f32) -> Self {
        Self { max_spread, sample_distance }
    }

    pub fn correct(&self, raw: &[Vec2]) -> CorrectedStroke {
        let (Some(&first), Some(&last)) = (raw.first(), raw.last()) else {
            return CorrectedStroke::default();
        };
        if !(self.sample_distance > 0.0) {
            return CorrectedStroke {
                points: raw.to_vec(),
                reference: vec![first, last],
            };
        }

        let mut points = Vec::with_capacity(raw.len());
        let mut reference = vec![first];
        // First raw point not yet emitted
        let mut pending_from = 0;
        // Length travelled since the last reference vertex
        let mut travelled = 0.0;

        for i in 1..raw.len() {
            let (p1, p2) = (raw[i - 1], raw[i]);
            let step = p1.distance(p2);

            if travelled + step <= self.sample_distance {
                travelled += step;
                continue;
            }

            let dir = (p2 - p1).normalize();
            let mut vertex = p1 + dir * (self.sample_distance - travelled);

            let anchor = reference[reference.len() - 1];
            for &point in &raw[pending_from..i] {
                points.push(self.snap(anchor, vertex, point));
            }
            reference.push(vertex);
            pending_from = i;

            while vertex.distance(p2) > self.sample_distance {
                vertex += dir * self.sample_distance;
                reference.push(vertex);
            }
            travelled = vertex.distance(p2);
        }

        let anchor = reference[reference.len() - 1];
        for &point in &raw[pending_from..] {
            points.push(self.snap(anchor, last, point));
        }
        reference.push(last);

        CorrectedStroke { points, reference }
    }

    /// Project `point` onto the line through `a` and `b` when it lies within
    /// `max_spread` of it
    fn snap(&self, a: Vec2, b: Vec2, point: Vec2) -> Vec2 {
        let offset = point - a;
        let along = offset.project(b - a);
        if (offset - along).len() < self.max_spread {
            a + along
        } else {
            point
        }
    }
}
