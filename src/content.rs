//! deterministic procedural content assignment
//!
//! The content *kind* of a coordinate is a pure function of the coordinate
//! and the per-run noise offset, so a cell that scrolls out and back in
//! regenerates the same thing. Only the cosmetic variant roll uses the
//! session RNG.

use std::collections::HashSet;

use noise::{NoiseFn, Perlin};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::cell::{Content, Coord};
use crate::config::SimConfig;
use crate::constants::CONTENT_NOISE_SCALE;

pub struct ContentGenerator {
    noise: Perlin,
    offset: i32,
    poi_probability: f32,
    background_probability: f32,
    poi_variants: u8,
    background_variants: u8,
}

impl ContentGenerator {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            noise: Perlin::new(config.seed as u32),
            offset: config.noise_offset,
            poi_probability: config.poi_probability,
            background_probability: config.background_probability,
            poi_variants: config.poi_variants,
            background_variants: config.background_variants,
        }
    }

    /// stable pseudo-random sample in [0, 1) for a coordinate
    fn sample(&self, coord: Coord) -> f32 {
        let x = (coord.x + self.offset) as f64 * CONTENT_NOISE_SCALE;
        let y = (coord.y + self.offset) as f64 * CONTENT_NOISE_SCALE;
        /* remap [-1, 1] to [0, 1) */
        let normalized = (self.noise.get([x, y]) + 1.0) * 0.5;
        (normalized as f32).min(1.0 - f32::EPSILON)
    }

    /// Decide what a freshly spawned cell holds.
    ///
    /// Coordinates whose point of interest was already claimed fall through
    /// to the background roll; the thresholds are cumulative, not disjoint.
    pub fn populate(
        &self,
        coord: Coord,
        collected: &HashSet<Coord>,
        rng: &mut ChaCha8Rng,
    ) -> Content {
        let sample = self.sample(coord);
        if sample < self.poi_probability && !collected.contains(&coord) {
            return Content::PointOfInterest {
                variant: rng.gen_range(0..self.poi_variants),
                origin: coord,
            };
        }
        if sample < self.background_probability {
            return Content::Background {
                variant: rng.gen_range(0..self.background_variants),
            };
        }
        Content::Empty
    }
}
