//! Random distributions used for settings values.
//!
//! Everything draws from a caller-supplied [`Rng`] so a run is reproducible
//! from its seed.

use crate::schema::{EnumValue, FieldKind, Value};
use rand::Rng;

/// Bernoulli trial: `true` with probability `p`.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen_bool(p.clamp(0.0, 1.0))
}

/// Uniform integer in `[low, high)`. Returns `low` for an empty range.
pub fn uniform_int<R: Rng + ?Sized>(rng: &mut R, low: i32, high: i32) -> i32 {
    if high <= low {
        return low;
    }
    rng.gen_range(low..high)
}

/// Uniform float in `[low, high]`.
pub fn uniform_float<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high <= low {
        return low;
    }
    rng.gen_range(low..=high)
}

/// Power-law draw over `[low, high)`: `low + (high - low) * u^shape` for a
/// uniform `u`. Shapes above 1 favour values near `low`.
pub fn power_law<R: Rng + ?Sized>(rng: &mut R, shape: f64, low: f64, high: f64) -> f64 {
    let u: f64 = rng.r#gen();
    low + (high - low) * u.powf(shape)
}

/// Generic draw for a field of the given kind.
pub fn sample<R: Rng + ?Sized>(kind: &FieldKind, rng: &mut R) -> Value {
    match *kind {
        FieldKind::Int { min, max } => Value::Int(rng.gen_range(min..=max.max(min))),
        FieldKind::Float { min, max } => Value::Float(uniform_float(rng, min, max)),
        FieldKind::Bool => Value::Bool(chance(rng, 0.5)),
        FieldKind::Enum {
            type_name,
            variants,
        } => Value::Enum(EnumValue {
            type_name,
            variant: variants[rng.gen_range(0..variants.len())],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_uniform_int_stays_in_half_open_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = uniform_int(&mut rng, 0, 46);
            assert!((0..46).contains(&v));
        }
        assert_eq!(uniform_int(&mut rng, 5, 5), 5);
    }

    #[test]
    fn test_power_law_bounds_and_bias() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let draws: Vec<f64> = (0..4000).map(|_| power_law(&mut rng, 2.0, 0.0, 10.0)).collect();

        assert!(draws.iter().all(|v| (0.0..10.0).contains(v)));
        // E[10 * u^2] = 10/3; a uniform draw would average 5.
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!(mean < 4.0, "mean {mean} not biased low");
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(!chance(&mut rng, 0.0));
        assert!(chance(&mut rng, 1.0));
    }

    #[test]
    fn test_sample_matches_kind() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let kinds = [
            FieldKind::int(3, 3),
            FieldKind::float(0.0, 10.0),
            FieldKind::Bool,
            FieldKind::Enum {
                type_name: "Mode",
                variants: &["A", "B"],
            },
        ];
        for kind in &kinds {
            for _ in 0..20 {
                assert!(kind.accepts(&sample(kind, &mut rng)));
            }
        }
        assert_eq!(sample(&FieldKind::int(3, 3), &mut rng), Value::Int(3));
    }
}
