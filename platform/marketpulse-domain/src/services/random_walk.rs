use crate::repositories::random_source::RandomSource;

/// Perturbs `price` by a uniform amount in `[-volatility * price, +volatility * price]`.
///
/// Consumes exactly one draw. There is no floor: a volatility close to 1 can push the
/// result to zero or below, so callers keep it small.
pub fn fluctuate<R: RandomSource + ?Sized>(price: f64, volatility: f64, random: &mut R) -> f64 {
    let u = random.next_unit();
    let delta = (u - 0.5) * 2.0 * volatility * price;
    price + delta
}

/// Uniform draw in `[low, high)`.
pub fn uniform<R: RandomSource + ?Sized>(low: f64, high: f64, random: &mut R) -> f64 {
    low + random.next_unit() * (high - low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::random_source::ScriptedRandomSource;

    #[test]
    fn midpoint_draw_leaves_price_unchanged() {
        let mut random = ScriptedRandomSource::constant(0.5).unwrap();
        assert_eq!(fluctuate(100.0, 0.02, &mut random), 100.0);
    }

    #[test]
    fn extreme_draws_hit_the_band_edges() {
        let mut random = ScriptedRandomSource::new(vec![0.0, 0.75]).unwrap();
        assert!((fluctuate(100.0, 0.02, &mut random) - 98.0).abs() < 1e-12);
        assert!((fluctuate(100.0, 0.02, &mut random) - 101.0).abs() < 1e-12);
        assert_eq!(random.draws(), 2);
    }

    #[test]
    fn uniform_scales_draw_into_range() {
        let mut random = ScriptedRandomSource::constant(0.25).unwrap();
        assert_eq!(uniform(1e9, 6e9, &mut random), 2.25e9);
    }
}
