//! Entity identifier generation.
//!
//! # Responsibility
//! - Produce version-4 UUID strings for newly created entities.
//!
//! # Invariants
//! - Output always has the 8-4-4-4-12 lowercase hex layout, version nibble
//!   `4` and variant nibble in `{8, 9, a, b}`.
//! - Generation never fails: when the OS random source is unavailable a
//!   seeded pseudo-random generator fills the bytes instead.

use log::warn;
use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng, TryRngCore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Builder;

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns a fresh random identifier.
pub fn generate_id() -> String {
    id_from_source(|bytes| OsRng.try_fill_bytes(bytes).is_ok())
}

/// Builds an identifier from `fill`, falling back to a pseudo-random source
/// when `fill` reports failure.
fn id_from_source(fill: impl FnOnce(&mut [u8; 16]) -> bool) -> String {
    let mut bytes = [0u8; 16];
    if !fill(&mut bytes) {
        warn!("event=id_generate module=id status=fallback source=small_rng");
        fallback_rng().fill_bytes(&mut bytes);
    }
    Builder::from_random_bytes(bytes).into_uuid().to_string()
}

fn fallback_rng() -> SmallRng {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64);
    let sequence = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    let seed = nanos
        ^ u64::from(std::process::id()).rotate_left(32)
        ^ sequence.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    SmallRng::seed_from_u64(seed)
}
