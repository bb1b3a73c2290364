//! Identifier synthesis
//!
//! Produces 64-bit identifiers for records that arrive without a natural key.
//! The high bits encode the millisecond timestamp, so ids sort roughly
//! chronologically and the timestamp is recoverable; the low 12 bits are
//! random to reduce same-millisecond collisions. Best-effort uniqueness: two
//! ids synthesized within the same millisecond collide with probability
//! 1/4096 per pair, and a colliding write silently replaces the prior record
//! under the store's upsert semantics. Callers needing guaranteed uniqueness
//! must supply an explicit id.

use chrono::Utc;
use rand::Rng;

/// Number of low bits drawn from the RNG
pub const RANDOM_BITS: u32 = 12;

/// Mask for the random portion (0..=4095)
pub const RANDOM_MASK: u64 = (1 << RANDOM_BITS) - 1;

/// Synthesize an identifier from the given millisecond timestamp.
///
/// Never fails; requires no coordination state.
pub fn synthesize(ts_ms: i64) -> u64 {
    let salt = rand::thread_rng().gen_range(0..=RANDOM_MASK);
    ((ts_ms as u64) << RANDOM_BITS) | salt
}

/// Synthesize an identifier from the current wall clock.
///
/// Returns the id together with the millisecond timestamp it was derived
/// from, so callers can report both without re-reading the clock.
pub fn synthesize_now() -> (u64, i64) {
    let ts_ms = Utc::now().timestamp_millis();
    (synthesize(ts_ms), ts_ms)
}
