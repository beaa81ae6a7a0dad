//! Coherent noise sampling for scene animation.

use std::fmt;

use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Seed shared by every scene so animation is reproducible.
const NOISE_SEED: i32 = 0;

/// Smooth, deterministic 3D noise normalized to `[0, 1]`.
///
/// The renderer samples the same field with different coordinate scalings
/// for each effect; each is just a different view of one field.
pub struct NoiseField {
    noise: FastNoiseLite,
}

impl NoiseField {
    pub fn new() -> Self {
        Self::with_seed(NOISE_SEED)
    }

    pub fn with_seed(seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        // Coordinates are pre-scaled by the caller.
        noise.set_frequency(Some(1.0));
        Self { noise }
    }

    /// Sample the field at `(x, y, z)`.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let raw = self.noise.get_noise_3d(x as f32, y as f32, z as f32);
        // OpenSimplex2 outputs in [-1, 1]; normalize to [0, 1]
        ((raw as f64 + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField").finish_non_exhaustive()
    }
}
