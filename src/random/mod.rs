//! Named, independently seeded random number streams.
//!
//! Every stochastic concern of the simulation draws from its own stream, identified by a
//! zero-sized type declared with [`define_rng!`]. All streams derive from a single base seed,
//! offset by a hash of the stream name, so a run is fully reproducible from one `u64` and
//! adding draws to one concern does not shift the numbers seen by another.
mod macros;

use std::any::{Any, TypeId};

use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_64;

pub use macros::define_rng;

use crate::log::trace;
use crate::rand::distr::uniform::{SampleRange, SampleUniform};
use crate::rand::{Rng, SeedableRng};

pub trait RngId: Copy + Clone + 'static {
    type RngType: SeedableRng + Rng + 'static;
    fn get_name() -> &'static str;
}

/// A convenience method to compute the stable hash of a `&str`.
#[must_use]
pub fn hash_str(data: &str) -> u64 {
    xxh3_64(data.as_bytes())
}

// This is a wrapper that allows streams with different generator types to live in the
// same map (anything that implements SeedableRng is valid).
struct RngHolder {
    rng: Box<dyn Any>,
}

/// Stores a base seed and the lazily created generators keyed by their `RngId`.
pub struct RandomStreams {
    base_seed: u64,
    rng_holders: FxHashMap<TypeId, RngHolder>,
}

impl RandomStreams {
    #[must_use]
    pub fn new(base_seed: u64) -> Self {
        trace!("initializing random streams with base seed {base_seed}");
        RandomStreams {
            base_seed,
            rng_holders: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Sets a new base seed. Existing generators are dropped so they get re-seeded the next
    /// time they are used.
    pub fn reseed(&mut self, base_seed: u64) {
        trace!("reseeding random streams with base seed {base_seed}");
        self.base_seed = base_seed;
        self.rng_holders.clear();
    }

    /// Gets a mutable reference to the generator associated with the given [`RngId`],
    /// creating it from the base seed on first use.
    fn get_rng<R: RngId>(&mut self) -> &mut R::RngType {
        let base_seed = self.base_seed;
        self.rng_holders
            .entry(TypeId::of::<R>())
            .or_insert_with(|| {
                trace!("creating new RNG {} (seed={base_seed})", R::get_name());
                let seed_offset = hash_str(R::get_name());
                RngHolder {
                    rng: Box::new(R::RngType::seed_from_u64(
                        base_seed.wrapping_add(seed_offset),
                    )),
                }
            })
            .rng
            .downcast_mut::<R::RngType>()
            .expect("RngId maps to a single generator type")
    }

    /// Gets a random sample from the generator associated with the given [`RngId`] by
    /// applying the specified sampler function.
    pub fn sample<R: RngId, T>(
        &mut self,
        _rng_id: R,
        sampler: impl FnOnce(&mut R::RngType) -> T,
    ) -> T {
        sampler(self.get_rng::<R>())
    }

    /// Gets a random sample within the range provided by `range`.
    ///
    /// # Panics
    /// Panics if `range` is empty.
    pub fn sample_range<R: RngId, S, T>(&mut self, rng_id: R, range: S) -> T
    where
        S: SampleRange<T>,
        T: SampleUniform,
    {
        self.sample(rng_id, |rng| rng.random_range(range))
    }

    /// A Bernoulli trial: draws a uniform number in `[0, 1)` and returns whether it falls
    /// below `p`. Unlike `Rng::random_bool`, any `p` is accepted: `p <= 0` (or NaN) never
    /// succeeds and `p >= 1` always does.
    pub fn sample_bool<R: RngId>(&mut self, rng_id: R, p: f64) -> bool {
        self.sample(rng_id, |rng| rng.random::<f64>() < p)
    }
}

impl Default for RandomStreams {
    fn default() -> Self {
        RandomStreams::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::RngCore;

    define_rng!(FooRng);
    define_rng!(BarRng);

    #[test]
    fn get_rng_basic() {
        let mut streams = RandomStreams::new(42);
        assert_ne!(
            streams.sample(FooRng, RngCore::next_u64),
            streams.sample(FooRng, RngCore::next_u64)
        );
    }

    #[test]
    fn multiple_rng_types() {
        let mut streams = RandomStreams::new(42);
        assert_ne!(
            streams.sample(FooRng, RngCore::next_u64),
            streams.sample(BarRng, RngCore::next_u64)
        );
    }

    #[test]
    fn reset_seed() {
        let mut streams = RandomStreams::new(42);

        let run_0 = streams.sample(FooRng, RngCore::next_u64);
        let run_1 = streams.sample(FooRng, RngCore::next_u64);

        // Reset with same seed, ensure we get the same values
        streams.reseed(42);
        assert_eq!(run_0, streams.sample(FooRng, RngCore::next_u64));
        assert_eq!(run_1, streams.sample(FooRng, RngCore::next_u64));

        // Reset with different seed, ensure we get different values
        streams.reseed(88);
        assert_eq!(streams.base_seed(), 88);
        assert_ne!(run_0, streams.sample(FooRng, RngCore::next_u64));
        assert_ne!(run_1, streams.sample(FooRng, RngCore::next_u64));
    }

    #[test]
    fn streams_are_independent() {
        let mut a = RandomStreams::new(7);
        let mut b = RandomStreams::new(7);

        // Drawing from BarRng in `a` must not change what FooRng yields.
        let _ = a.sample(BarRng, RngCore::next_u64);
        assert_eq!(
            a.sample(FooRng, RngCore::next_u64),
            b.sample(FooRng, RngCore::next_u64)
        );
    }

    #[test]
    fn sample_range() {
        let mut streams = RandomStreams::new(42);
        for _ in 0..100 {
            let result = streams.sample_range(FooRng, 0..10);
            assert!((0..10).contains(&result));
        }
    }

    #[test]
    fn sample_bool_extremes() {
        let mut streams = RandomStreams::new(42);
        for _ in 0..1000 {
            assert!(!streams.sample_bool(FooRng, 0.0));
            assert!(streams.sample_bool(FooRng, 1.0));
            assert!(!streams.sample_bool(FooRng, -0.5));
            assert!(streams.sample_bool(FooRng, 1.5));
            assert!(!streams.sample_bool(FooRng, f64::NAN));
        }
    }

    #[test]
    fn sample_bool_frequency() {
        let mut streams = RandomStreams::new(42);
        let n_samples = 3000;
        let hits = (0..n_samples)
            .filter(|_| streams.sample_bool(FooRng, 1.0 / 3.0))
            .count();
        // The expected value of `hits` is 1000.
        assert!((hits as i64 - 1000).abs() < 100);
    }

    #[test]
    fn stable_name_hash() {
        assert_eq!(hash_str("TransmissionRng"), hash_str("TransmissionRng"));
        assert_ne!(hash_str("TransmissionRng"), hash_str("SeedingRng"));
    }
}
