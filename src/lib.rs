//! # fixcap
//!
//! Fixed-capacity, allocation-free containers for embedded and real-time
//! code: a timestamped frame ring buffer and an AVL-backed map, plus the small
//! helpers that usually travel with them.
//!
//! ## Architecture Overview
//!
//! Every container runs over storage *you* own (an array or a slice) and
//! never allocates. The crate is structured into independent modules:
//!
//! - `indices`: cyclic index arithmetic
//! - `tree`: AVL tree over an arena of nodes
//! - `map`: fixed-capacity `i32 -> V` map built on the tree
//! - `buffer`: timestamped frame ring buffer (and a locked wrapper)
//! - `codec`: bounds-checked endian encode/decode
//! - `bits`: bit and byte packing helpers
//! - `input`: Schmitt-trigger debounce and countdown timers
//! - `diagnostics`: first-N log of failed checks
//! - `config`: container shapes and validation
//! - `error`: Error types
//!
//! ## Quick Start
//!
//! ```
//! use fixcap::{FixedMap, FrameRing, MapSlot};
//!
//! // A ring of 3 frames up to 8 bytes each
//! let mut storage = [0u8; FrameRing::needed_bytes(3, 8)];
//! let mut ring = FrameRing::new(3, 8, &mut storage).unwrap();
//! ring.push(b"A", 73);
//! ring.push(b"B", 74);
//! assert_eq!(ring.peek_oldest().unwrap().timestamp, 73);
//!
//! // A map of at most 2 keys
//! let mut slots: [MapSlot<&str>; 2] = Default::default();
//! let mut map = FixedMap::new(&mut slots);
//! assert_eq!(map.relate("first", 10), 1);
//! assert_eq!(map.value_for(10), Some(&"first"));
//! ```

// ============================================
// MODULE DECLARATIONS
// ============================================

pub mod bits;
pub mod buffer;
pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod indices;
pub mod input;
pub mod map;
pub mod tree;

// ============================================
// RE-EXPORTS
// ============================================

pub use buffer::{FrameRef, FrameRing, PoppedFrame, RingContext, RingContextMut, SharedFrameRing};
pub use config::{MapConfig, RingConfig, TriggerConfig};
pub use diagnostics::{AssertionItem, AssertionLog};
pub use error::{ConfigError, FixcapError, FixcapResult};
pub use input::{CountdownTimer, SchmittTrigger};
pub use map::{FixedMap, MapContext, MapContextMut, MapSlot};

// ============================================
// LOGGING
// ============================================

/// Initialize logging for the host.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }

    #[test]
    fn test_ring_feeds_map() {
        init_logging();

        // Frames carry a sensor id in byte 0 and a reading in byte 1
        let mut storage = [0u8; FrameRing::needed_bytes(4, 2)];
        let mut ring = FrameRing::new(4, 2, &mut storage).unwrap();
        for (i, frame) in [[1u8, 10], [2, 20], [1, 11], [3, 30], [2, 21]].iter().enumerate() {
            ring.push(frame, i as i64);
        }

        // Latest reading per sensor
        let mut slots: [MapSlot<u8>; 3] = Default::default();
        let mut latest = FixedMap::new(&mut slots);
        let mut out = [0u8; 2];
        while let Some(popped) = ring.pop(&mut out) {
            assert_eq!(popped.length, 2);
            assert_ne!(latest.relate(out[1], i32::from(out[0])), 0);
        }

        // The first frame was overwritten, so sensor 1 last saw 11
        assert_eq!(latest.value_for(1), Some(&11));
        assert_eq!(latest.value_for(2), Some(&21));
        assert_eq!(latest.value_for(3), Some(&30));
        // Insertion order follows the ring's oldest-first order
        assert_eq!(latest.key_at(0, 0), 2);
    }

    #[test]
    fn test_debounced_diagnostics() {
        let mut storage = vec![0u8; AssertionLog::needed_bytes(2)];
        let mut log = AssertionLog::new(2, &mut storage).unwrap();
        let mut trigger = SchmittTrigger::from_config(&TriggerConfig::default()).unwrap();

        for sample in [0, 12, 12, -9, -9, -9] {
            let state = trigger.drive(sample);
            crate::check!(log, !state || sample >= 0);
        }

        // ON latched at the second 12 and stayed through the first two -9s
        assert_eq!(log.count(), 2);
        assert!(!trigger.state());
    }
}
