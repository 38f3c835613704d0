//! # Frame Ring Implementation
//!
//! A fixed-size circular buffer of timestamped byte frames that overwrites
//! the oldest frame when full.
//!
//! ## Plain English
//!
//! Picture a circular track with numbered parking spots, each spot exactly
//! the same size. When all spots are full and a new car arrives, the oldest
//! car is towed away to make room. Every car carries a ticket (timestamp)
//! and a note saying how long it is.
//!
//! ## Slot Layout
//!
//! ```text
//!  byte  0        8      10     12                     12 + frame_size
//!        ┌────────┬──────┬──────┬──────────────────────┬──────────┐
//!        │  time  │ len  │ rsvd │ payload ...          │ padding  │
//!        │  i64   │ i16  │      │                      │          │
//!        └────────┴──────┴──────┴──────────────────────┴──────────┘
//!        └──────────────── stride_words(frame_size) × 4 ───────────┘
//! ```
//!
//! Header fields are little-endian.

use log::{debug, trace};

use crate::codec::{decode_u16_at, decode_u64_at, encode_u16_at, encode_u64_at, Endian};
use crate::config::RingConfig;
use crate::error::{ConfigError, FixcapError, FixcapResult};
use crate::indices::{dec_to_min, inc_to_max, next_index, round_index};

/// Bytes of header in front of every payload.
pub const HEADER_SIZE: usize = 12;

/// Storage is sized in 32-bit words.
pub const WORD_SIZE: usize = 4;

const TIMESTAMP_OFFSET: usize = 0;
const LENGTH_OFFSET: usize = 8;
const HEADER_ENDIAN: Endian = Endian::Little;

// ============================================
// FRAME VIEWS
// ============================================

/// Zero-copy view of a stored frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRef<'a> {
    /// The recorded payload (empty for zero-length frames)
    pub payload: &'a [u8],
    /// Timestamp given at push time
    pub timestamp: i64,
}

impl FrameRef<'_> {
    /// Recorded payload length.
    pub fn length(&self) -> usize {
        self.payload.len()
    }
}

/// What [`FrameRing::pop`] copied out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoppedFrame {
    /// Bytes copied into the output buffer
    pub length: usize,
    /// Timestamp of the popped frame
    pub timestamp: i64,
}

// ============================================
// FRAME RING
// ============================================

/// A fixed-capacity ring of byte frames over caller-owned storage.
///
/// ## Properties
/// - Fixed capacity and fixed maximum frame size
/// - O(1) push, refer and pop
/// - Automatically overwrites the oldest frame when full
/// - Never allocates
///
/// ## Example
/// ```
/// use fixcap::buffer::FrameRing;
///
/// let mut storage = vec![0u8; FrameRing::needed_bytes(3, 8)];
/// let mut ring = FrameRing::new(3, 8, &mut storage).unwrap();
///
/// ring.push(b"hello", 1);
/// let frame = ring.peek_newest().unwrap();
/// assert_eq!(frame.payload, b"hello");
/// assert_eq!(frame.timestamp, 1);
/// ```
#[derive(Debug)]
pub struct FrameRing<'a> {
    /// Caller-owned slot storage
    storage: &'a mut [u8],

    /// Maximum number of frames
    capacity: i32,

    /// Maximum payload per frame
    frame_size: usize,

    /// Slot the next push writes to
    index: i32,

    /// Frames currently held (saturates at capacity)
    count: i32,

    /// Pushes since creation or the last clear
    update_count: u64,
}

impl<'a> FrameRing<'a> {
    /// Words per slot: header plus payload rounded up to a word, plus one
    /// reserved word.
    pub const fn stride_words(frame_size: usize) -> usize {
        (HEADER_SIZE + frame_size).div_ceil(WORD_SIZE) + 1
    }

    /// Words of storage needed for `capacity` frames of `frame_size` bytes.
    pub const fn needed_words(capacity: usize, frame_size: usize) -> usize {
        Self::stride_words(frame_size).saturating_mul(capacity)
    }

    /// Bytes of storage needed for `capacity` frames of `frame_size` bytes.
    pub const fn needed_bytes(capacity: usize, frame_size: usize) -> usize {
        Self::needed_words(capacity, frame_size).saturating_mul(WORD_SIZE)
    }

    /// Creates an empty ring over `storage`.
    ///
    /// ## Errors
    /// - `capacity` is zero or above `i32::MAX`
    /// - `frame_size` is above `i16::MAX`
    /// - `storage` is shorter than [`FrameRing::needed_bytes`]
    pub fn new(capacity: usize, frame_size: usize, storage: &'a mut [u8]) -> FixcapResult<Self> {
        Self::from_config(&RingConfig::new(capacity, frame_size), storage)
    }

    /// Creates an empty ring shaped by `config`.
    pub fn from_config(config: &RingConfig, storage: &'a mut [u8]) -> FixcapResult<Self> {
        if let Some(error) = config.validate().into_iter().next() {
            return Err(error.into());
        }

        let needed = config.needed_bytes();
        if storage.len() < needed {
            return Err(FixcapError::StorageTooSmall {
                needed,
                got: storage.len(),
            });
        }

        let capacity = i32::try_from(config.capacity)
            .map_err(|_| ConfigError::CapacityTooLarge(config.capacity))?;

        debug!(
            "FrameRing created: {} frames x {} bytes ({} bytes of storage)",
            config.capacity, config.frame_size, needed
        );

        Ok(Self {
            storage,
            capacity,
            frame_size: config.frame_size,
            index: 0,
            count: 0,
            update_count: 0,
        })
    }

    fn stride_bytes(&self) -> usize {
        Self::stride_words(self.frame_size) * WORD_SIZE
    }

    /// Byte offset of physical slot `slot`. Slots are always non-negative.
    fn slot_offset(&self, slot: i32) -> usize {
        usize::try_from(slot).unwrap_or(0) * self.stride_bytes()
    }

    /// Adds a frame, overwriting the oldest one if the ring is full.
    ///
    /// An empty frame, or one longer than `frame_size`, is recorded with
    /// length 0 (only its timestamp is kept).
    pub fn push(&mut self, frame: &[u8], timestamp: i64) {
        let offset = self.slot_offset(self.index);

        let length = if !frame.is_empty() && frame.len() <= self.frame_size {
            let start = offset + HEADER_SIZE;
            self.storage[start..start + frame.len()].copy_from_slice(frame);
            frame.len()
        } else {
            if frame.len() > self.frame_size {
                debug!(
                    "frame of {} bytes exceeds frame size {}, stored empty",
                    frame.len(),
                    self.frame_size
                );
            }
            0
        };

        // frame_size <= i16::MAX, so the length always fits the field
        let written = encode_u64_at(
            self.storage,
            offset + TIMESTAMP_OFFSET,
            timestamp as u64,
            HEADER_ENDIAN,
        ) && encode_u16_at(
            self.storage,
            offset + LENGTH_OFFSET,
            length as u16,
            HEADER_ENDIAN,
        );
        debug_assert!(written, "slot header out of storage bounds");

        self.index = next_index(self.index, self.capacity, 0);
        self.count = inc_to_max(self.count, self.capacity);
        self.update_count = self.update_count.wrapping_add(1);

        trace!(
            "push ts={} len={} count={} updates={}",
            timestamp,
            length,
            self.count,
            self.update_count
        );
    }

    /// Views the frame `index` positions after the oldest (0 = oldest).
    pub fn refer_from_oldest(&self, index: usize) -> Option<FrameRef<'_>> {
        let index = i32::try_from(index).ok().filter(|&i| i < self.count)?;

        let slot = round_index(self.index - self.count + index, self.capacity, 0);
        let offset = self.slot_offset(slot);

        let timestamp = decode_u64_at(self.storage, offset + TIMESTAMP_OFFSET, HEADER_ENDIAN)? as i64;
        let raw_length = decode_u16_at(self.storage, offset + LENGTH_OFFSET, HEADER_ENDIAN)? as i16;
        let length = usize::try_from(raw_length).unwrap_or(0).min(self.frame_size);

        let start = offset + HEADER_SIZE;
        let payload = self.storage.get(start..start + length)?;

        Some(FrameRef { payload, timestamp })
    }

    /// Views the frame `index` positions before the newest (0 = newest).
    pub fn refer_from_newest(&self, index: usize) -> Option<FrameRef<'_>> {
        let from_oldest = self.count().checked_sub(1)?.checked_sub(index)?;
        self.refer_from_oldest(from_oldest)
    }

    /// Removes the oldest frame, copying as much of it as fits into `out`.
    ///
    /// Returns `None` when the ring is empty. The vacated slot is not wiped.
    pub fn pop(&mut self, out: &mut [u8]) -> Option<PoppedFrame> {
        let popped = {
            let frame = self.refer_from_oldest(0)?;
            let length = frame.length().min(out.len());
            out[..length].copy_from_slice(&frame.payload[..length]);
            PoppedFrame {
                length,
                timestamp: frame.timestamp,
            }
        };

        self.count = dec_to_min(self.count, 0);
        trace!("pop ts={} len={} count={}", popped.timestamp, popped.length, self.count);

        Some(popped)
    }

    /// Forgets every frame and resets the update counter.
    pub fn clear(&mut self) {
        self.index = 0;
        self.count = 0;
        self.update_count = 0;
        debug!("FrameRing cleared");
    }

    /// Returns the number of frames currently stored.
    pub fn count(&self) -> usize {
        usize::try_from(self.count).unwrap_or(0)
    }

    /// Returns the maximum number of frames.
    pub fn capacity(&self) -> usize {
        usize::try_from(self.capacity).unwrap_or(0)
    }

    /// Returns the maximum payload size.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Pushes since creation or the last clear, counting overwrites.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Returns true if the ring is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if the ring is at capacity.
    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }

    /// Returns the oldest frame without removing it.
    pub fn peek_oldest(&self) -> Option<FrameRef<'_>> {
        self.refer_from_oldest(0)
    }

    /// Returns the newest frame without removing it.
    pub fn peek_newest(&self) -> Option<FrameRef<'_>> {
        self.refer_from_newest(0)
    }

    /// Returns an iterator over all frames (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = FrameRef<'_>> {
        (0..self.count()).filter_map(move |i| self.refer_from_oldest(i))
    }
}

// ============================================
// CONTEXT TRAITS
// Uniform access, including through an absent ring
// ============================================

/// Read access to a ring-like context.
///
/// An absent ring (`None`) reports zero everywhere and holds no frames.
pub trait RingContext {
    /// See [`FrameRing::count`].
    fn count(&self) -> usize;
    /// See [`FrameRing::capacity`].
    fn capacity(&self) -> usize;
    /// See [`FrameRing::frame_size`].
    fn frame_size(&self) -> usize;
    /// See [`FrameRing::update_count`].
    fn update_count(&self) -> u64;
    /// See [`FrameRing::refer_from_oldest`].
    fn refer_from_oldest(&self, index: usize) -> Option<FrameRef<'_>>;
    /// See [`FrameRing::refer_from_newest`].
    fn refer_from_newest(&self, index: usize) -> Option<FrameRef<'_>>;
}

/// Write access to a ring-like context. An absent ring ignores pushes and
/// clears, and `pop` returns `None`.
pub trait RingContextMut: RingContext {
    /// See [`FrameRing::push`].
    fn push(&mut self, frame: &[u8], timestamp: i64);
    /// See [`FrameRing::pop`].
    fn pop(&mut self, out: &mut [u8]) -> Option<PoppedFrame>;
    /// See [`FrameRing::clear`].
    fn clear(&mut self);
}

impl RingContext for FrameRing<'_> {
    fn count(&self) -> usize {
        FrameRing::count(self)
    }

    fn capacity(&self) -> usize {
        FrameRing::capacity(self)
    }

    fn frame_size(&self) -> usize {
        FrameRing::frame_size(self)
    }

    fn update_count(&self) -> u64 {
        FrameRing::update_count(self)
    }

    fn refer_from_oldest(&self, index: usize) -> Option<FrameRef<'_>> {
        FrameRing::refer_from_oldest(self, index)
    }

    fn refer_from_newest(&self, index: usize) -> Option<FrameRef<'_>> {
        FrameRing::refer_from_newest(self, index)
    }
}

impl RingContextMut for FrameRing<'_> {
    fn push(&mut self, frame: &[u8], timestamp: i64) {
        FrameRing::push(self, frame, timestamp)
    }

    fn pop(&mut self, out: &mut [u8]) -> Option<PoppedFrame> {
        FrameRing::pop(self, out)
    }

    fn clear(&mut self) {
        FrameRing::clear(self)
    }
}

macro_rules! forward_ring_context {
    ($($target:ty),*) => {$(
        impl<T: RingContext + ?Sized> RingContext for $target {
            fn count(&self) -> usize {
                (**self).count()
            }

            fn capacity(&self) -> usize {
                (**self).capacity()
            }

            fn frame_size(&self) -> usize {
                (**self).frame_size()
            }

            fn update_count(&self) -> u64 {
                (**self).update_count()
            }

            fn refer_from_oldest(&self, index: usize) -> Option<FrameRef<'_>> {
                (**self).refer_from_oldest(index)
            }

            fn refer_from_newest(&self, index: usize) -> Option<FrameRef<'_>> {
                (**self).refer_from_newest(index)
            }
        }
    )*};
}

forward_ring_context!(&T, &mut T);

impl<T: RingContextMut + ?Sized> RingContextMut for &mut T {
    fn push(&mut self, frame: &[u8], timestamp: i64) {
        (**self).push(frame, timestamp)
    }

    fn pop(&mut self, out: &mut [u8]) -> Option<PoppedFrame> {
        (**self).pop(out)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

impl<T: RingContext> RingContext for Option<T> {
    fn count(&self) -> usize {
        self.as_ref().map_or(0, |ring| ring.count())
    }

    fn capacity(&self) -> usize {
        self.as_ref().map_or(0, |ring| ring.capacity())
    }

    fn frame_size(&self) -> usize {
        self.as_ref().map_or(0, |ring| ring.frame_size())
    }

    fn update_count(&self) -> u64 {
        self.as_ref().map_or(0, |ring| ring.update_count())
    }

    fn refer_from_oldest(&self, index: usize) -> Option<FrameRef<'_>> {
        self.as_ref()?.refer_from_oldest(index)
    }

    fn refer_from_newest(&self, index: usize) -> Option<FrameRef<'_>> {
        self.as_ref()?.refer_from_newest(index)
    }
}

impl<T: RingContextMut> RingContextMut for Option<T> {
    fn push(&mut self, frame: &[u8], timestamp: i64) {
        if let Some(ring) = self.as_mut() {
            ring.push(frame, timestamp);
        }
    }

    fn pop(&mut self, out: &mut [u8]) -> Option<PoppedFrame> {
        self.as_mut()?.pop(out)
    }

    fn clear(&mut self) {
        if let Some(ring) = self.as_mut() {
            ring.clear();
        }
    }
}

// ============================================
// TESTS
// ============================================
