//! Shuffle track selection
//!
//! Picks catalog positions for shuffled `next`/`previous` navigation.

use rand::Rng;
use std::collections::HashSet;

/// Pick the next position in shuffle mode
///
/// Draws uniformly random positions, rejecting the current one and anything
/// in `recent`, for at most `max_attempts` draws. When every draw is rejected
/// the selection falls back to the position after `current` (wrapping).
///
/// `len` must be at least 2 and `current < len`.
pub fn pick_next<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    current: usize,
    recent: &HashSet<usize>,
    max_attempts: usize,
) -> usize {
    debug_assert!(len > 1 && current < len);

    for _ in 0..max_attempts {
        let candidate = rng.gen_range(0..len);
        if candidate != current && !recent.contains(&candidate) {
            return candidate;
        }
    }

    (current + 1) % len
}

/// Pick the previous position in shuffle mode
///
/// A single uniform draw over every position except `current`. History is
/// not consulted. With no current track every position is eligible.
///
/// `len` must be at least 2.
pub fn pick_previous<R: Rng + ?Sized>(rng: &mut R, len: usize, current: Option<usize>) -> usize {
    debug_assert!(len > 1);

    match current {
        Some(current) if current < len => {
            // Draw from the len - 1 other slots and skip over `current`
            let candidate = rng.gen_range(0..len - 1);
            if candidate >= current {
                candidate + 1
            } else {
                candidate
            }
        }
        _ => rng.gen_range(0..len),
    }
}
