//! Collision-resistant object keys.
//!
//! `category/<millis>-<token>.<ext>`: the timestamp never goes backwards
//! within one generator and the token carries 64 random bits, so two keys
//! generated in the same process collide with negligible probability.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use ring::rand::{SecureRandom, SystemRandom};
use uuid::Uuid;

use crate::types::file_item::extension_of;

const TOKEN_BYTES: usize = 8;

pub struct StorageKeyGenerator {
    rng: SystemRandom,
    last_millis: AtomicU64,
    clock: fn() -> u64,
}

fn wall_clock_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

impl StorageKeyGenerator {
    pub fn new() -> Self {
        Self::with_clock(wall_clock_millis)
    }

    /// Uses `clock` (milliseconds) instead of the system wall clock.
    pub fn with_clock(clock: fn() -> u64) -> Self {
        Self {
            rng: SystemRandom::new(),
            last_millis: AtomicU64::new(0),
            clock,
        }
    }

    pub fn generate(&self, category: &str, original_name: &str) -> String {
        let timestamp = self.next_timestamp();
        let token = self.random_token();
        match extension_of(original_name) {
            Some(ext) => format!("{}/{}-{}.{}", category, timestamp, token, ext),
            None => format!("{}/{}-{}", category, timestamp, token),
        }
    }

    /// Wall clock clamped so it never returns less than a previous call.
    fn next_timestamp(&self) -> u64 {
        let now = (self.clock)();
        let previous = self.last_millis.fetch_max(now, Ordering::SeqCst);
        previous.max(now)
    }

    fn random_token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        if self.rng.fill(&mut bytes).is_err() {
            bytes.copy_from_slice(&Uuid::new_v4().as_bytes()[..TOKEN_BYTES]);
        }
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl Default for StorageKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}
