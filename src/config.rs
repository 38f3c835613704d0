//! # Configuration Module
//!
//! This module describes the *shape* of each container before it is built.
//!
//! ## Plain English Explanation
//!
//! Nothing in fixcap allocates. You decide up front how many frames a ring
//! holds, how big each frame may be, how many keys a map can take, and how
//! twitchy a debounce filter is. These structs hold those decisions, tell you
//! how much storage to set aside, and check the numbers make sense.
//!
//! Settings include:
//! - Ring capacity and maximum frame size
//! - Map capacity
//! - Schmitt-trigger thresholds and debounce periods
//!
//! `validate()` collects every problem into a `Vec<ConfigError>`, so a
//! rejected config allocates once. That only happens on the error path; a
//! valid config never touches the heap.

use crate::buffer::FrameRing;
use crate::error::ConfigError;

/// Largest payload a ring frame may carry (the length header is an `i16`).
pub const MAX_FRAME_SIZE: usize = i16::MAX as usize;

/// Largest capacity the signed 32-bit index arithmetic can address.
pub const MAX_CAPACITY: usize = i32::MAX as usize;

fn check_capacity(capacity: usize, errors: &mut Vec<ConfigError>) {
    if capacity == 0 {
        errors.push(ConfigError::ZeroCapacity);
    }
    if capacity > MAX_CAPACITY {
        errors.push(ConfigError::CapacityTooLarge(capacity));
    }
}

// ============================================
// RING BUFFER SETTINGS
// ============================================

/// Shape of a [`FrameRing`].
///
/// ## Plain English
///
/// "How many frames do we remember, and how big can one frame be?"
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingConfig {
    /// Maximum number of frames held at once
    pub capacity: usize,

    /// Maximum payload bytes per frame
    ///
    /// ## Limits
    /// - Maximum: 32767 (the stored length is a signed 16-bit value)
    pub frame_size: usize,
}

impl RingConfig {
    /// Creates a ring configuration.
    pub fn new(capacity: usize, frame_size: usize) -> Self {
        Self {
            capacity,
            frame_size,
        }
    }

    /// A ring sized for short telemetry records (64 frames of 64 bytes).
    pub fn small_telemetry() -> Self {
        Self::new(64, 64)
    }

    /// A ring sized to hold `capacity` assertion records.
    pub fn diagnostics(capacity: usize) -> Self {
        Self::new(capacity, crate::diagnostics::ITEM_SIZE)
    }

    /// Bytes of storage the ring needs.
    pub fn needed_bytes(&self) -> usize {
        FrameRing::needed_bytes(self.capacity, self.frame_size)
    }

    /// 32-bit words of storage the ring needs.
    pub fn needed_words(&self) -> usize {
        FrameRing::needed_words(self.capacity, self.frame_size)
    }

    /// Validates the configuration and returns errors if invalid
    ///
    /// ## Plain English
    /// Makes sure all settings are within reasonable bounds.
    /// Returns a list of problems, or empty if all is well.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        check_capacity(self.capacity, &mut errors);

        if self.frame_size > MAX_FRAME_SIZE {
            errors.push(ConfigError::FrameSizeTooLarge(self.frame_size));
        }

        errors
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self::small_telemetry()
    }
}

// ============================================
// MAP SETTINGS
// ============================================

/// Shape of a [`FixedMap`](crate::map::FixedMap).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapConfig {
    /// Maximum number of distinct keys
    pub capacity: usize,
}

impl MapConfig {
    /// Creates a map configuration.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Validates the configuration and returns errors if invalid
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        check_capacity(self.capacity, &mut errors);
        errors
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new(16)
    }
}

// ============================================
// DEBOUNCE SETTINGS
// ============================================

/// Settings for a [`SchmittTrigger`](crate::input::SchmittTrigger).
///
/// ## Plain English
///
/// A noisy signal has to stay above `on_threshold` for `on_period` samples
/// in a row before we call it ON, and below `off_threshold` for
/// `off_period` samples before we call it OFF again. The gap between the two
/// thresholds is the hysteresis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerConfig {
    /// State before any sample arrives
    pub initial_state: bool,

    /// Inputs at or above this count toward ON
    pub on_threshold: i32,

    /// Consecutive ON samples required
    pub on_period: i32,

    /// Inputs strictly below this count toward OFF
    pub off_threshold: i32,

    /// Consecutive OFF samples required
    pub off_period: i32,
}

impl TriggerConfig {
    /// A filter with no hysteresis: one threshold, one sample each way.
    pub fn plain(threshold: i32) -> Self {
        Self {
            initial_state: false,
            on_threshold: threshold,
            on_period: 1,
            off_threshold: threshold,
            off_period: 1,
        }
    }

    /// Validates the configuration and returns errors if invalid
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.on_period < 0 {
            errors.push(ConfigError::NegativePeriod(self.on_period));
        }
        if self.off_period < 0 {
            errors.push(ConfigError::NegativePeriod(self.off_period));
        }
        if self.off_threshold > self.on_threshold {
            errors.push(ConfigError::InvertedThresholds {
                on: self.on_threshold,
                off: self.off_threshold,
            });
        }

        errors
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            initial_state: false,
            on_threshold: 10,
            on_period: 2,
            off_threshold: -5,
            off_period: 3,
        }
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_are_valid() {
        assert!(RingConfig::default().validate().is_empty());
        assert!(MapConfig::default().validate().is_empty());
        assert!(TriggerConfig::default().validate().is_empty());
        assert!(TriggerConfig::plain(0).validate().is_empty());
    }

    #[test]
    fn test_ring_sizing() {
        let config = RingConfig::new(3, 8);
        // (12 + 8) / 4 rounded up = 5 words, plus one reserved = 6 words per slot
        assert_eq!(config.needed_words(), 18);
        assert_eq!(config.needed_bytes(), 72);
    }

    #[test]
    fn test_ring_validation_errors() {
        let mut config = RingConfig::new(0, 8);
        assert_eq!(config.validate(), vec![ConfigError::ZeroCapacity]);

        config.capacity = 4;
        assert!(config.validate().is_empty());

        config.frame_size = MAX_FRAME_SIZE + 1;
        assert_eq!(
            config.validate(),
            vec![ConfigError::FrameSizeTooLarge(MAX_FRAME_SIZE + 1)]
        );
    }

    #[test]
    fn test_map_validation_errors() {
        assert_eq!(MapConfig::new(0).validate(), vec![ConfigError::ZeroCapacity]);
        assert!(MapConfig::new(1).validate().is_empty());
    }

    #[test]
    fn test_trigger_validation_errors() {
        let mut config = TriggerConfig::default();
        config.off_threshold = config.on_threshold + 1;
        assert!(matches!(
            config.validate().as_slice(),
            [ConfigError::InvertedThresholds { .. }]
        ));

        let mut config = TriggerConfig::default();
        config.on_period = -1;
        assert_eq!(config.validate(), vec![ConfigError::NegativePeriod(-1)]);
    }
}
