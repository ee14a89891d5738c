use noise::{NoiseFn, Perlin, Seedable};

use crate::raster::Raster;

/// Parameters for land-value sampling.
pub struct FieldParams {
    /// Noise frequency per pixel (lower = larger landmasses)
    pub noise_scale: f64,
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave (0.0-1.0)
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
    /// Subtracted from the normalized noise so most of the map stays ocean
    pub sea_bias: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            noise_scale: 0.015,
            octaves: 5,
            persistence: 0.5,
            lacunarity: 0.6,
            sea_bias: 0.45,
        }
    }
}

/// A cached scalar land-value field over the pixel raster.
///
/// Positive values are land, non-positive water. The cache is filled once
/// per generation; a reseed replaces the whole field, so a given position
/// always reads the same value within a pass.
pub struct HeightField {
    values: Raster<f32>,
}

impl HeightField {
    /// Fill the field from multi-octave Perlin noise.
    pub fn generate(width: usize, height: usize, params: &FieldParams, seed: u64) -> Self {
        let noise = Perlin::new(1).set_seed(seed as u32);
        let mut values = Raster::new_with(width, height, 0.0f32);

        for y in 0..height {
            for x in 0..width {
                let n = fbm(
                    &noise,
                    x as f64 * params.noise_scale,
                    y as f64 * params.noise_scale,
                    params.octaves,
                    params.persistence,
                    params.lacunarity,
                );
                // fbm sits in [-1, 1]; shift to [0, 1] before the sea bias
                let land = (n as f32 + 1.0) * 0.5 - params.sea_bias;
                values.set(x, y, land);
            }
        }

        Self { values }
    }

    /// A field with the same value everywhere.
    pub fn constant(width: usize, height: usize, value: f32) -> Self {
        Self {
            values: Raster::new_with(width, height, value),
        }
    }

    /// Build a field from an arbitrary function of pixel position.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f32) -> Self {
        let mut values = Raster::new_with(width, height, 0.0f32);
        for y in 0..height {
            for x in 0..width {
                values.set(x, y, f(x, y));
            }
        }
        Self { values }
    }

    pub fn width(&self) -> usize {
        self.values.width
    }

    pub fn height(&self) -> usize {
        self.values.height
    }

    /// Land value at a raster position. Out-of-range coordinates clamp to
    /// the nearest edge sample rather than erroring.
    pub fn value_at(&self, x: f32, y: f32) -> f32 {
        *self.values.get_clamped(x, y)
    }
}

/// Fractional Brownian Motion noise
fn fbm(
    noise: &impl NoiseFn<f64, 2>,
    x: f64,
    y: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_field() {
        let params = FieldParams::default();
        let a = HeightField::generate(32, 24, &params, 1234);
        let b = HeightField::generate(32, 24, &params, 1234);

        for y in 0..24 {
            for x in 0..32 {
                assert_eq!(a.value_at(x as f32, y as f32), b.value_at(x as f32, y as f32));
            }
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let params = FieldParams::default();
        let a = HeightField::generate(32, 24, &params, 1);
        let b = HeightField::generate(32, 24, &params, 2);

        let differs = (0..24)
            .flat_map(|y| (0..32).map(move |x| (x, y)))
            .any(|(x, y)| a.value_at(x as f32, y as f32) != b.value_at(x as f32, y as f32));
        assert!(differs);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let field = HeightField::generate(16, 16, &FieldParams::default(), 7);

        assert_eq!(field.value_at(-50.0, -50.0), field.value_at(0.0, 0.0));
        assert_eq!(field.value_at(1e6, 1e6), field.value_at(15.0, 15.0));
    }

    #[test]
    fn test_constant_field() {
        let field = HeightField::constant(8, 8, -0.2);
        assert_eq!(field.value_at(3.0, 5.0), -0.2);
    }

    #[test]
    fn test_values_roughly_centered() {
        // With the default sea bias the field must straddle the land/water
        // threshold rather than saturate one side.
        let field = HeightField::generate(128, 128, &FieldParams::default(), 99);
        let mut min_v = f32::MAX;
        let mut max_v = f32::MIN;
        for y in 0..128 {
            for x in 0..128 {
                let v = field.value_at(x as f32, y as f32);
                min_v = min_v.min(v);
                max_v = max_v.max(v);
            }
        }
        assert!(min_v >= -1.0 && max_v <= 1.0);
        assert!(min_v < 0.0, "no water anywhere: min {}", min_v);
    }
}
