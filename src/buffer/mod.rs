//! # Frame Buffer Module
//!
//! This module provides the circular (ring) buffer for storing recent frames.
//!
//! ## Plain English Explanation
//!
//! Imagine a circular conveyor belt at a sushi restaurant with a fixed number
//! of plates, all the same size. Every time a new piece of sushi (frame)
//! comes out of the kitchen:
//! 1. It goes on the next plate, with a ticket saying when it was made
//! 2. If the belt is full, the oldest piece is replaced
//! 3. Customers can look at any plate by "nth oldest" or "nth newest", or
//!    take the oldest one off the belt
//!
//! The belt itself is memory *you* hand over, so nothing is allocated while
//! it runs.

mod ring_buffer;

pub use ring_buffer::{
    FrameRef, FrameRing, PoppedFrame, RingContext, RingContextMut, HEADER_SIZE, WORD_SIZE,
};

use parking_lot::RwLock;

// ============================================
// SHARED FRAME RING
// Lock wrapper for callers that share a ring across threads
// ============================================

/// A frame ring behind a read-write lock
///
/// ## Plain English Explanation
///
/// `FrameRing` itself has no locking at all. When a producer thread pushes
/// frames while another thread reads them, wrap the ring in this type:
/// - The producer WRITES new frames
/// - Readers LOOK at frames (many at once)
/// - A consumer POPS frames
///
/// This wrapper uses a "lock" system (like a bathroom door lock) to make
/// sure only one part is writing at a time, but multiple can read together.
///
/// ## Example
/// ```
/// use fixcap::buffer::{FrameRing, SharedFrameRing};
///
/// let mut storage = vec![0u8; FrameRing::needed_bytes(4, 16)];
/// let shared = SharedFrameRing::new(FrameRing::new(4, 16, &mut storage).unwrap());
///
/// std::thread::scope(|s| {
///     s.spawn(|| shared.push_frame(b"from a thread", 1));
/// });
/// assert_eq!(shared.with_newest(0, |f| f.timestamp), Some(1));
/// ```
pub struct SharedFrameRing<'a> {
    /// The actual ring, protected by a read-write lock
    /// - Many readers can access simultaneously
    /// - Only one writer can access at a time
    inner: RwLock<FrameRing<'a>>,

    /// Fixed at construction, so reading it needs no lock
    capacity: usize,
}

impl<'a> SharedFrameRing<'a> {
    /// Wraps a ring
    pub fn new(ring: FrameRing<'a>) -> Self {
        let capacity = ring.capacity();

        log::info!(
            "Creating shared frame ring: {} frames x {} bytes",
            capacity,
            ring.frame_size()
        );

        Self {
            inner: RwLock::new(ring),
            capacity,
        }
    }

    /// Adds a new frame to the ring
    ///
    /// ## What Happens (Plain English)
    ///
    /// 1. We acquire the "write lock" (like locking a door)
    /// 2. Add the frame to the ring
    /// 3. If the ring was full, the oldest frame is overwritten
    /// 4. Release the lock (unlock the door)
    pub fn push_frame(&self, frame: &[u8], timestamp: i64) {
        self.inner.write().push(frame, timestamp);
    }

    /// Removes the oldest frame into `out`
    pub fn pop_into(&self, out: &mut [u8]) -> Option<PoppedFrame> {
        self.inner.write().pop(out)
    }

    /// Runs `f` on the frame `index` after the oldest, under the read lock
    ///
    /// Frames are views into the ring, so they can't outlive the lock. Copy
    /// out whatever you need inside `f`.
    pub fn with_oldest<R>(&self, index: usize, f: impl FnOnce(FrameRef<'_>) -> R) -> Option<R> {
        let ring = self.inner.read();
        ring.refer_from_oldest(index).map(f)
    }

    /// Runs `f` on the frame `index` before the newest, under the read lock
    pub fn with_newest<R>(&self, index: usize, f: impl FnOnce(FrameRef<'_>) -> R) -> Option<R> {
        let ring = self.inner.read();
        ring.refer_from_newest(index).map(f)
    }

    /// Returns how full the ring is (0.0 = empty, 1.0 = full)
    pub fn fill_percentage(&self) -> f32 {
        let ring = self.inner.read();
        ring.count() as f32 / self.capacity as f32
    }

    /// Returns the number of frames currently stored
    pub fn frame_count(&self) -> usize {
        self.inner.read().count()
    }

    /// Returns the maximum number of frames we can store
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of pushes so far, including overwrites
    pub fn update_count(&self) -> u64 {
        self.inner.read().update_count()
    }

    /// Clears all frames from the ring
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Takes the ring back out of the lock
    pub fn into_inner(self) -> FrameRing<'a> {
        self.inner.into_inner()
    }
}

// ============================================
// TESTS
// ============================================
