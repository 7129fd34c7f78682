// Numeric one-time code generation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Source of numeric one-time codes
pub trait CodeGenerator: Send + Sync {
    /// Returns `length` digits, each drawn independently and uniformly from 0-9
    fn generate(&self, length: usize) -> String;
}

fn digits<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Default generator backed by the thread-local OS-seeded RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngCodeGenerator;

impl CodeGenerator for ThreadRngCodeGenerator {
    fn generate(&self, length: usize) -> String {
        digits(&mut rand::thread_rng(), length)
    }
}

/// Deterministic generator for reproducible runs
#[derive(Debug)]
pub struct SeededCodeGenerator {
    rng: Mutex<StdRng>,
}

impl SeededCodeGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl CodeGenerator for SeededCodeGenerator {
    fn generate(&self, length: usize) -> String {
        // A poisoned lock still holds a usable RNG
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        digits(&mut *rng, length)
    }
}
