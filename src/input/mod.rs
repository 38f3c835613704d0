//! # Input Conditioning Module
//!
//! Small filters for turning raw, noisy samples into clean decisions.
//!
//! ## Plain English
//!
//! A sensor reading jitters around. If you flip a light on every time it
//! crosses a line, the light flickers. The Schmitt trigger here only flips
//! after the reading has stayed on one side for a while, and uses two
//! different lines for ON and OFF.
//!
//! The countdown helpers answer "has enough time passed yet?" in a loop that
//! ticks at a fixed interval.

mod schmitt;
mod timer;

pub use schmitt::SchmittTrigger;
pub use timer::{countdown, CountdownTimer};
