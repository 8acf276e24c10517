//! Deterministic, single-owner simulation RNG.
//!
//! # Determinism strategy
//!
//! Unlike a per-agent digital twin (where each entity gets its own RNG
//! stream seeded from an id), this engine keeps exactly **one** stream per
//! simulation, advanced only by the orchestrator thread. Cars are created
//! and destroyed dynamically (arrivals, `add_car`, completions), so a
//! per-entity seeding scheme would shift every later entity's stream each
//! time the population changed — a determinism hazard. A single ordered
//! stream, advanced in the orchestrator's fixed tick order, reproduces
//! byte-identical output for a fixed seed and no control mutations (the
//! "Determinism" law in the test suite).
//!
//! All RNG calls are local to the orchestrator thread; no synchronisation
//! is ever needed because nothing else is allowed to touch `SimRng`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// The simulation's single deterministic random stream.
///
/// Produces the three draw shapes the engine needs: uniform (assignment
/// tie-breaking, GPS/noise axis selection), exponential (Poisson
/// inter-arrivals, booth service durations), and Gaussian (sensor noise).
pub struct SimRng(SmallRng);

impl SimRng {
    /// Seed deterministically from the run's `rng_seed`.
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand`/`rand_distr` types
    /// not wrapped below.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform draw in `[lo, hi)`. Returns `lo` if `hi <= lo`.
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..hi)
    }

    /// `true` with probability `p` (clamped to `[0, 1]`).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform index in `0..n`. Panics if `n == 0` (callers must check for
    /// an empty candidate set before calling).
    #[inline]
    pub fn choose_index(&mut self, n: usize) -> usize {
        self.0.gen_range(0..n)
    }

    /// Draw from an exponential distribution with the given `rate_per_sec`
    /// (i.e. mean inter-event time `1 / rate_per_sec`).
    ///
    /// A non-positive rate never fires: returns `f64::INFINITY` rather than
    /// panicking or dividing by zero, so a booth with `μ = 0` (briefly, via
    /// a racing mutation) simply never completes its current car instead of
    /// crashing the tick loop.
    pub fn exponential(&mut self, rate_per_sec: f64) -> f64 {
        if rate_per_sec <= 0.0 {
            return f64::INFINITY;
        }
        // -ln(U) / rate, U ~ Uniform(0, 1]; avoids ln(0) by sampling (0, 1].
        let u: f64 = self.0.gen_range(f64::MIN_POSITIVE..1.0);
        -u.ln() / rate_per_sec
    }

    /// Draw from a Gaussian with the given `mean` and `std_dev`.
    ///
    /// `std_dev <= 0.0` short-circuits to `mean` exactly (no distribution
    /// construction, no possibility of a NaN from a degenerate normal).
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        if std_dev <= 0.0 {
            return mean;
        }
        // `Normal::new` only fails for a non-finite std_dev, which the
        // guard above already excludes for the common case; fall back to
        // the mean rather than unwrap on the unlikely NaN/inf input.
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.0),
            Err(_) => mean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_fixed_seed() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..50 {
            assert_eq!(a.exponential(1.0), b.exponential(1.0));
            assert_eq!(a.gaussian(0.0, 1.0), b.gaussian(0.0, 1.0));
            assert_eq!(a.uniform(0.0, 10.0), b.uniform(0.0, 10.0));
        }
    }

    #[test]
    fn exponential_never_negative() {
        let mut rng = SimRng::new(1);
        for _ in 0..1000 {
            assert!(rng.exponential(2.5) >= 0.0);
        }
    }

    #[test]
    fn degenerate_rate_never_fires() {
        let mut rng = SimRng::new(1);
        assert_eq!(rng.exponential(0.0), f64::INFINITY);
        assert_eq!(rng.exponential(-1.0), f64::INFINITY);
    }

    #[test]
    fn degenerate_std_dev_returns_mean() {
        let mut rng = SimRng::new(1);
        assert_eq!(rng.gaussian(3.0, 0.0), 3.0);
        assert_eq!(rng.gaussian(3.0, -1.0), 3.0);
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = SimRng::new(2);
        for _ in 0..1000 {
            let x = rng.uniform(5.0, 6.0);
            assert!((5.0..6.0).contains(&x));
        }
    }
}
