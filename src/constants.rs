//! fixed tunables shared across the simulation core

/// -------- content noise --------
/// Perlin returns 0 at every integer lattice point, so coordinates are
/// scaled off-lattice before sampling.
pub const CONTENT_NOISE_SCALE: f64 = 0.173;

/// -------- reveal fade --------
/// reveal progress below this counts as fully faded out
pub const FADE_DONE_EPSILON: f32 = 0.01;

/// -------- record pool --------
/// pool ceiling as a multiple of the window area
pub const POOL_HEADROOM: usize = 2;
