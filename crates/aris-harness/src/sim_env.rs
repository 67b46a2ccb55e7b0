//! Deterministic virtual-clock [`Environment`] for model-based tests.
//!
//! Unlike a full network simulator, this only virtualizes time and
//! randomness: `sleep` resolves immediately but advances a shared virtual
//! clock by the requested duration, so tests that exercise keep-alive or
//! expiry timing never actually wait in wall-clock time and never race on
//! real scheduling.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use aris_core::Environment;

/// A point on [`SimEnvironment`]'s virtual clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimInstant(Duration);

impl std::ops::Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

/// Deterministic [`Environment`]: a shared virtual clock plus a seeded
/// counter standing in for randomness.
///
/// Cloning shares the same clock and counter, matching how a single
/// simulated sonar session's listener, command session, and keep-alive task
/// all need to observe the same time.
#[derive(Debug, Clone)]
pub struct SimEnvironment {
    clock_nanos: Arc<AtomicU64>,
    rng_state: Arc<AtomicU64>,
}

impl SimEnvironment {
    /// A fresh environment whose clock starts at zero, seeded for
    /// reproducible `random_bytes` output.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self { clock_nanos: Arc::new(AtomicU64::new(0)), rng_state: Arc::new(AtomicU64::new(seed | 1)) }
    }

    /// Advance the virtual clock by `duration` without going through
    /// `sleep`, e.g. to fast-forward past an expiry window in a test.
    pub fn advance(&self, duration: Duration) {
        #[allow(clippy::cast_possible_truncation)]
        let nanos = duration.as_nanos() as u64;
        self.clock_nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    fn next_u64(&self) -> u64 {
        // xorshift64*, good enough for deterministic test fixtures.
        let mut x = self.rng_state.load(Ordering::SeqCst);
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state.store(x, Ordering::SeqCst);
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }
}

impl Environment for SimEnvironment {
    type Instant = SimInstant;

    fn now(&self) -> Self::Instant {
        SimInstant(Duration::from_nanos(self.clock_nanos.load(Ordering::SeqCst)))
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        for chunk in buffer.chunks_mut(8) {
            let bytes = self.next_u64().to_ne_bytes();
            let n = chunk.len();
            chunk.copy_from_slice(&bytes[..n]);
        }
    }
}
