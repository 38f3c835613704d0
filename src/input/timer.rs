//! Down-counting timers for fixed-interval loops.

/// Subtracts `interval` from `timer`, stopping at zero.
///
/// A result of `0` means the timer has run out.
pub fn countdown(timer: i32, interval: i32) -> i32 {
    timer.saturating_sub(interval).max(0)
}

/// A countdown that remembers its own remaining time.
///
/// ## Example
/// ```
/// use fixcap::input::CountdownTimer;
///
/// let mut timer = CountdownTimer::default();
/// timer.start(25);
/// assert!(!timer.tick(10));
/// assert!(!timer.tick(10));
/// assert!(timer.tick(10));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountdownTimer {
    remaining: i32,
}

impl CountdownTimer {
    /// (Re)starts the timer with `ticks` to go.
    pub fn start(&mut self, ticks: i32) {
        self.remaining = ticks.max(0);
    }

    /// Advances by `interval`. Returns true once the timer has expired.
    pub fn tick(&mut self, interval: i32) -> bool {
        self.remaining = countdown(self.remaining, interval);
        self.is_expired()
    }

    /// Time left.
    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    /// True when no time is left.
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_sequence() {
        let mut timer = 33;
        for _ in 0..3 {
            timer = countdown(timer, 10);
            assert!(timer > 0);
        }
        timer = countdown(timer, 10);
        assert_eq!(timer, 0);
    }

    #[test]
    fn test_countdown_clamps() {
        assert_eq!(countdown(5, 100), 0);
        assert_eq!(countdown(0, 1), 0);
        assert_eq!(countdown(i32::MIN, 1), 0);
    }

    #[test]
    fn test_timer_lifecycle() {
        let mut timer = CountdownTimer::default();
        assert!(timer.is_expired());

        timer.start(33);
        assert_eq!(timer.remaining(), 33);
        assert!(!timer.tick(10));
        assert!(!timer.tick(10));
        assert!(!timer.tick(10));
        assert!(timer.tick(10));
        assert_eq!(timer.remaining(), 0);

        timer.start(-4);
        assert!(timer.is_expired());
    }
}
