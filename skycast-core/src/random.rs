use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of randomness for the synthesizer.
///
/// Implementors only provide [`RandomSource::next_unit`]; every other draw is
/// derived from it, so a scripted sequence of unit floats fully determines a report.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform float between `low` and `high`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_unit()
    }

    /// Uniform integer in `[low, high]`, both ends inclusive.
    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        let span = (high - low + 1) as f64;
        let offset = (self.next_unit() * span).floor() as i64;
        low + offset.clamp(0, high - low)
    }

    /// Uniform index into a slice of length `len`. `len` must be non-zero.
    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.uniform_int(0, len as i64 - 1) as usize
    }

    /// Index drawn proportionally to `weights`. Non-positive weights are never picked
    /// unless every weight is non-positive, in which case the last index wins.
    fn weighted_index(&mut self, weights: &[f64]) -> usize {
        debug_assert!(!weights.is_empty());
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        let target = self.next_unit() * total;

        let mut acc = 0.0;
        for (i, w) in weights.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            acc += w;
            if target < acc {
                return i;
            }
        }

        weights
            .iter()
            .rposition(|w| *w > 0.0)
            .unwrap_or(weights.len().saturating_sub(1))
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// [`RandomSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible source: the same seed always yields the same reports.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn with_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}
