//! # Error Types Module
//!
//! This module defines the error types used throughout fixcap.
//!
//! ## Plain English Explanation
//!
//! The containers in this crate almost never fail once they exist. A full
//! map answers `0`, a bad index answers `None`, an oversized frame is stored
//! as an empty one. The only place things can really go wrong is when a
//! container is first built:
//!
//! - "StorageTooSmall: the buffer you handed me can't hold that many frames"
//! - "Config: a capacity of zero makes no sense"
//!
//! So these errors are returned from constructors, and nowhere else.

use thiserror::Error;

// ============================================
// MAIN LIBRARY ERROR
// ============================================

/// The main error type for fixcap
///
/// ## Plain English
///
/// This is the "parent" error returned by every constructor that takes
/// caller-owned storage or a configuration.
#[derive(Debug, Error)]
pub enum FixcapError {
    /// The caller-supplied storage is shorter than the sizing formula requires
    ///
    /// ## Examples
    /// - A ring of 3 frames × 8 bytes needs 72 bytes, but 64 were passed
    /// - A map built for 4 entries was given 3 slots
    #[error("storage too small: need {needed}, got {got}")]
    StorageTooSmall {
        /// Units required (bytes for rings, slots for maps)
        needed: usize,
        /// Units actually supplied
        got: usize,
    },

    /// Something was wrong with the requested shape of a container
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

// ============================================
// CONFIGURATION ERRORS
// ============================================

/// Errors that can occur with configuration values
///
/// ## Plain English
///
/// These are "you asked for something impossible" problems, found before any
/// storage is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A container must hold at least one element
    #[error("capacity must be at least 1")]
    ZeroCapacity,

    /// Capacity doesn't fit the signed 32-bit index arithmetic
    #[error("capacity {0} exceeds the maximum of {}", i32::MAX)]
    CapacityTooLarge(usize),

    /// The frame length header is a signed 16-bit field
    #[error("frame size {0} exceeds the maximum of {} bytes", i16::MAX)]
    FrameSizeTooLarge(usize),

    /// Debounce periods count samples, so they can't be negative
    #[error("debounce period {0} is negative")]
    NegativePeriod(i32),

    /// The OFF threshold sits above the ON threshold, so the filter would chatter
    #[error("off threshold {off} is above on threshold {on}")]
    InvertedThresholds {
        /// ON threshold
        on: i32,
        /// OFF threshold
        off: i32,
    },
}

// ============================================
// RESULT TYPE ALIAS
// ============================================

/// A Result type that uses FixcapError
///
/// ## Plain English
///
/// This is a shorthand. Instead of writing:
/// ```text
/// fn build() -> Result<FrameRing, FixcapError>
/// ```
/// We can write:
/// ```text
/// fn build() -> FixcapResult<FrameRing>
/// ```
pub type FixcapResult<T> = Result<T, FixcapError>;

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FixcapError::StorageTooSmall { needed: 72, got: 64 };
        let message = format!("{}", err);
        assert!(message.contains("72"));
        assert!(message.contains("64"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: FixcapError = ConfigError::ZeroCapacity.into();

        match err {
            FixcapError::Config(ConfigError::ZeroCapacity) => {} // Expected
            _ => panic!("Expected Config error variant"),
        }
    }

    #[test]
    fn test_config_error_display() {
        let message = ConfigError::FrameSizeTooLarge(40_000).to_string();
        assert!(message.contains("40000"));
        assert!(message.contains("32767"));

        let message = ConfigError::InvertedThresholds { on: 3, off: 9 }.to_string();
        assert!(message.contains("off threshold 9"));
    }
}
