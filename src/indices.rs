//! # Cyclic Index Arithmetic
//!
//! Pure helpers for walking an index around a half-open range `[min, max)`.
//!
//! ## Plain English
//!
//! Picture a clock face with positions `min` to `max - 1`. These functions
//! answer "what comes after 11?" (back to the start), "what comes before the
//! start?" (the last position), and "I overshot by a bit, where did I land?".
//! The ring buffer uses them to find its slots, and the debounce filter uses
//! the saturating counters.

/// Returns `index + 1`, or `min` once that would reach `max`.
pub fn next_index(index: i32, max: i32, min: i32) -> i32 {
    match index.checked_add(1) {
        Some(next) if next < max => next,
        _ => min,
    }
}

/// Returns `index - 1`, or `max - 1` once that would fall to `min` or below.
pub fn previous_index(index: i32, max: i32, min: i32) -> i32 {
    if index > min {
        index - 1
    } else {
        max.wrapping_sub(1)
    }
}

/// Folds an index that is at most one range-width out of bounds back into
/// `[min, max)`.
///
/// Values further out than one width are not normalized; callers guarantee
/// they never pass one.
pub fn round_index(index: i32, max: i32, min: i32) -> i32 {
    if index < min {
        max.wrapping_sub(min.wrapping_sub(index))
    } else if index >= max {
        min.wrapping_add(index.wrapping_sub(max))
    } else {
        index
    }
}

/// Saturating `+1` that never passes `max`.
pub fn inc_to_max(d: i32, max: i32) -> i32 {
    if d < max {
        d + 1
    } else {
        d
    }
}

/// Saturating `-1` that never passes `min`.
pub fn dec_to_min(d: i32, min: i32) -> i32 {
    if d > min {
        d - 1
    } else {
        d
    }
}

/// Steps `value` forward inside the inclusive range `[minimum, maximum]`.
///
/// Anything that lands outside, including an overflow past `i32::MAX`,
/// restarts at `minimum`.
pub fn next_within(minimum: i32, maximum: i32, value: i32) -> i32 {
    value
        .checked_add(1)
        .filter(|next| (minimum..=maximum).contains(next))
        .unwrap_or(minimum)
}

// ============================================
// TESTS
// ============================================
