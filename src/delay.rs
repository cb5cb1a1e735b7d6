//! Sources for the pause between blinks.

use crate::error::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::Range;
use std::time::Duration;

/// Default pause between blinks, in milliseconds.
pub const DEFAULT_DELAY_MS: Range<u64> = 2000..6000;

/// Produces the delay until the next blink.
pub trait DelaySource {
    /// Delay from the moment the eye reopens until it starts closing again.
    fn next_delay(&mut self) -> Duration;
}

impl<D: DelaySource + ?Sized> DelaySource for Box<D> {
    fn next_delay(&mut self) -> Duration {
        (**self).next_delay()
    }
}

/// Uniformly distributed delay over a half-open millisecond range.
#[derive(Debug, Clone)]
pub struct UniformDelay<R = ChaCha8Rng> {
    rng: R,
    range_us: Range<u64>,
}

impl<R: Rng> UniformDelay<R> {
    /// Create a delay source drawing from `range_ms` with the given generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is empty or its bounds overflow when
    /// converted to microseconds.
    pub fn new(rng: R, range_ms: Range<u64>) -> Result<Self> {
        let invalid = |reason: &str| Error::ConfigInvalid {
            key: "delay".to_string(),
            message: format!("{reason} range {}..{} ms", range_ms.start, range_ms.end),
        };

        if range_ms.start >= range_ms.end {
            return Err(invalid("empty"));
        }
        let start = range_ms.start.checked_mul(1000).ok_or_else(|| invalid("oversized"))?;
        let end = range_ms.end.checked_mul(1000).ok_or_else(|| invalid("oversized"))?;

        Ok(Self {
            rng,
            range_us: start..end,
        })
    }

    /// The range delays are drawn from, in milliseconds.
    #[must_use]
    pub fn range_ms(&self) -> Range<u64> {
        self.range_us.start / 1000..self.range_us.end / 1000
    }
}

impl UniformDelay<ChaCha8Rng> {
    /// Reproducible default delays.
    ///
    /// # Example
    ///
    /// ```
    /// use blink_favicon::delay::{DelaySource, UniformDelay};
    ///
    /// let mut a = UniformDelay::seeded(7);
    /// let mut b = UniformDelay::seeded(7);
    /// assert_eq!(a.next_delay(), b.next_delay());
    /// ```
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            range_us: DEFAULT_DELAY_MS.start * 1000..DEFAULT_DELAY_MS.end * 1000,
        }
    }

    /// Default delays seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            range_us: DEFAULT_DELAY_MS.start * 1000..DEFAULT_DELAY_MS.end * 1000,
        }
    }
}

impl<R: Rng> DelaySource for UniformDelay<R> {
    fn next_delay(&mut self) -> Duration {
        Duration::from_micros(self.rng.gen_range(self.range_us.clone()))
    }
}

/// Always the same delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl DelaySource for FixedDelay {
    fn next_delay(&mut self) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = UniformDelay::seeded(42);
        let mut b = UniformDelay::seeded(42);
        for _ in 0..32 {
            assert_eq!(a.next_delay(), b.next_delay());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = UniformDelay::seeded(1);
        let mut b = UniformDelay::seeded(2);
        let a: Vec<_> = (0..8).map(|_| a.next_delay()).collect();
        let b: Vec<_> = (0..8).map(|_| b.next_delay()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_default_range() {
        let mut d = UniformDelay::seeded(0);
        assert_eq!(d.range_ms(), 2000..6000);
        for _ in 0..1000 {
            let delay = d.next_delay();
            assert!(delay >= Duration::from_millis(2000));
            assert!(delay < Duration::from_millis(6000));
        }
    }

    #[test]
    fn test_custom_range() {
        let mut d = UniformDelay::new(ChaCha8Rng::seed_from_u64(3), 10..11).unwrap();
        for _ in 0..100 {
            let delay = d.next_delay();
            assert!(delay >= Duration::from_millis(10) && delay < Duration::from_millis(11));
        }
    }

    #[test]
    fn test_empty_range_rejected() {
        let rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            UniformDelay::new(rng, 5000..5000),
            Err(Error::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_oversized_range_rejected() {
        let rng = ChaCha8Rng::seed_from_u64(0);
        let err = UniformDelay::new(rng, u64::MAX - 1..u64::MAX).unwrap_err();
        assert!(err.to_string().contains("oversized"), "{err}");

        // Upper bound alone overflowing is rejected too
        let rng = ChaCha8Rng::seed_from_u64(0);
        assert!(UniformDelay::new(rng, 2000..u64::MAX).is_err());
    }

    #[test]
    fn test_largest_range_samples() {
        let max = u64::MAX / 1000;
        let mut d = UniformDelay::new(ChaCha8Rng::seed_from_u64(1), max - 1..max).unwrap();
        let delay = d.next_delay();
        assert!(delay >= Duration::from_millis(max - 1));
    }

    #[test]
    fn test_fixed_and_boxed() {
        let mut boxed: Box<dyn DelaySource> = Box::new(FixedDelay(Duration::from_secs(3)));
        assert_eq!(boxed.next_delay(), Duration::from_secs(3));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_uniform_delay_within_range(seed in any::<u64>()) {
            let mut d = UniformDelay::seeded(seed);
            for _ in 0..16 {
                let delay = d.next_delay();
                prop_assert!(delay >= Duration::from_millis(2000));
                prop_assert!(delay < Duration::from_millis(6000));
            }
        }
    }
}
