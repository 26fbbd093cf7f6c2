//! Seedable random state shared by the randomized transforms.
//!
//! Every randomized transform owns a [`RandomState`]. Reseeding two transforms
//! (or the same transform twice) with the same seed makes their draws identical,
//! which is how an image and its label mask receive the same random crop.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::error::{Error, Result};

/// Upper bound (exclusive) for seeds handed out by [`RandomState::draw_seed`].
pub const MAX_SEED: u64 = (1 << 32) - 1;

#[derive(Debug, Clone)]
pub struct RandomState {
    rng: StdRng,
    seed: Option<u64>,
}

impl RandomState {
    /// `None` seeds from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: Self::make_rng(seed),
            seed,
        }
    }

    fn make_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        }
    }

    /// Reinitialize the internal state.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        trace!("reseeding random state with {:?}", seed);
        self.rng = Self::make_rng(seed);
        self.seed = seed;
    }

    /// The seed last applied, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform integer in `[low, high)`.
    pub fn draw(&mut self, low: i64, high: i64) -> Result<i64> {
        if low >= high {
            return Err(Error::argument("draw range", (low, high)));
        }
        Ok(self.rng.random_range(low..high))
    }

    /// A fresh seed in `[0, MAX_SEED)`, used to derive seeds for nested transforms.
    pub fn draw_seed(&mut self) -> u64 {
        self.rng.random_range(0..MAX_SEED)
    }

    /// Uniform float in `[0, 1)`.
    pub fn draw_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

impl Default for RandomState {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Marker for transforms that consume randomness and must be reseeded per sample.
pub trait Randomizable {
    fn random_state_mut(&mut self) -> &mut RandomState;

    fn set_random_state(&mut self, seed: Option<u64>) {
        self.random_state_mut().set_seed(seed);
    }
}
