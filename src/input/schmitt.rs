//! Schmitt-trigger debounce filter.

use crate::config::TriggerConfig;
use crate::error::FixcapResult;
use crate::indices::inc_to_max;

/// Two-threshold debounce filter with a minimum dwell time on each side.
///
/// ## How It Works
///
/// ```text
///  input  ──────┐        ┌─────────────── on_threshold
///               │  dead  │
///               │  band  │
///  ─────────────┘        └─────────────── off_threshold
/// ```
///
/// - Samples `>= on_threshold` bump the ON counter, anything else resets it
/// - Samples `< off_threshold` bump the OFF counter, anything else resets it
/// - Once a counter reaches its period, the state latches to that side
///
/// ## Example
/// ```
/// use fixcap::input::SchmittTrigger;
///
/// let mut trigger = SchmittTrigger::new(false, 10, 2, -5, 3);
/// assert!(!trigger.drive(10)); // one sample isn't enough
/// assert!(trigger.drive(10));  // two in a row: ON
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchmittTrigger {
    state: bool,
    on_threshold: i32,
    on_period: i32,
    on_counter: i32,
    off_threshold: i32,
    off_period: i32,
    off_counter: i32,
}

impl SchmittTrigger {
    /// Creates a filter in `initial_state` with both counters at zero.
    pub fn new(
        initial_state: bool,
        on_threshold: i32,
        on_period: i32,
        off_threshold: i32,
        off_period: i32,
    ) -> Self {
        Self {
            state: initial_state,
            on_threshold,
            on_period,
            on_counter: 0,
            off_threshold,
            off_period,
            off_counter: 0,
        }
    }

    /// Creates a filter from a validated configuration.
    pub fn from_config(config: &TriggerConfig) -> FixcapResult<Self> {
        if let Some(error) = config.validate().into_iter().next() {
            return Err(error.into());
        }

        Ok(Self::new(
            config.initial_state,
            config.on_threshold,
            config.on_period,
            config.off_threshold,
            config.off_period,
        ))
    }

    /// Feeds one sample and returns the (possibly new) state.
    pub fn drive(&mut self, input: i32) -> bool {
        let on_side = input >= self.on_threshold;
        let off_side = input < self.off_threshold;

        self.on_counter = if on_side {
            inc_to_max(self.on_counter, self.on_period)
        } else {
            0
        };
        self.off_counter = if off_side {
            inc_to_max(self.off_counter, self.off_period)
        } else {
            0
        };

        if on_side && self.on_counter >= self.on_period {
            self.state = true;
        }
        if off_side && self.off_counter >= self.off_period {
            self.state = false;
        }

        self.state
    }

    /// Forces the state and clears both counters.
    pub fn reset(&mut self, state: bool) {
        self.state = state;
        self.on_counter = 0;
        self.off_counter = 0;
    }

    /// Current state.
    pub fn state(&self) -> bool {
        self.state
    }
}

impl Default for SchmittTrigger {
    fn default() -> Self {
        let config = TriggerConfig::default();
        Self::new(
            config.initial_state,
            config.on_threshold,
            config.on_period,
            config.off_threshold,
            config.off_period,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FixcapError;

    const ON: i32 = 10;
    const OFF: i32 = -5;

    #[test]
    fn test_turns_on_after_period() {
        let mut trigger = SchmittTrigger::new(false, ON, 2, OFF, 3);

        assert!(!trigger.drive(ON - 1));
        assert!(!trigger.drive(ON));
        // Dropping below ON restarts the count
        assert!(!trigger.drive(ON - 1));
        assert!(!trigger.drive(ON));
        assert!(trigger.drive(ON));
    }

    #[test]
    fn test_turns_off_after_period() {
        let mut trigger = SchmittTrigger::new(true, ON, 2, OFF, 3);

        assert!(trigger.drive(OFF - 1));
        // Back inside the dead band: OFF count restarts
        assert!(trigger.drive(OFF));
        assert!(trigger.drive(OFF - 1));
        assert!(trigger.drive(OFF - 1));
        assert!(!trigger.drive(OFF - 1));

        // And back on again
        assert!(!trigger.drive(ON));
        assert!(trigger.drive(ON));
        assert!(trigger.state());
    }

    #[test]
    fn test_reset_clears_counters() {
        let mut trigger = SchmittTrigger::new(false, ON, 2, OFF, 3);
        trigger.drive(ON);
        trigger.reset(false);

        assert!(!trigger.state());
        // The earlier ON sample no longer counts
        assert!(!trigger.drive(ON));
        assert!(trigger.drive(ON));
    }

    #[test]
    fn test_without_hysteresis() {
        let mut trigger = SchmittTrigger::from_config(&TriggerConfig::plain(ON)).unwrap();

        assert!(trigger.drive(ON));
        assert!(!trigger.drive(ON - 1));
    }

    #[test]
    fn test_default_matches_default_config() {
        let trigger = SchmittTrigger::default();
        let from_config = SchmittTrigger::from_config(&TriggerConfig::default()).unwrap();
        assert_eq!(trigger, from_config);
    }

    #[test]
    fn test_from_config_rejects_negative_period() {
        let config = TriggerConfig {
            off_period: -2,
            ..TriggerConfig::default()
        };
        assert!(matches!(
            SchmittTrigger::from_config(&config),
            Err(FixcapError::Config(_))
        ));
    }
}
