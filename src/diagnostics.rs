//! # Diagnostics Module
//!
//! A tiny log that remembers where the first few failed checks happened.
//!
//! ## Plain English
//!
//! On a device without a debugger you still want to know "which check
//! failed, and where?". [`AssertionLog`] keeps the file name and line of the
//! first `capacity` failures. Later failures are dropped, not written over,
//! because the first failure is usually the interesting one.
//!
//! ```
//! use fixcap::check;
//! use fixcap::diagnostics::AssertionLog;
//!
//! let mut storage = vec![0u8; AssertionLog::needed_bytes(4)];
//! let mut log = AssertionLog::new(4, &mut storage).unwrap();
//!
//! check!(log, 1 + 1 == 2);
//! check!(log, 1 + 1 == 3);
//! assert_eq!(log.count(), 1);
//! assert!(log.refer(0).unwrap().line > 0);
//! ```

use log::warn;

use crate::buffer::FrameRing;
use crate::codec::{decode_u32_at, encode_u32_at, Endian};
use crate::config::RingConfig;
use crate::error::FixcapResult;

const LINE_SIZE: usize = 4;

/// Room for the file name, including its terminating NUL.
pub const FILE_NAME_SIZE: usize = 260;

/// Bytes per recorded failure: the line number, then the file name.
pub const ITEM_SIZE: usize = LINE_SIZE + FILE_NAME_SIZE;

/// One recorded failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssertionItem<'a> {
    /// Source line of the failed check
    pub line: u32,
    /// Source file of the failed check (at most 259 bytes)
    pub file_name: &'a str,
}

/// First-N log of failed checks.
#[derive(Debug)]
pub struct AssertionLog<'a> {
    items: FrameRing<'a>,
}

impl<'a> AssertionLog<'a> {
    /// Bytes of storage needed for `capacity` failures.
    pub const fn needed_bytes(capacity: usize) -> usize {
        FrameRing::needed_bytes(capacity, ITEM_SIZE)
    }

    /// Creates an empty log over `storage`.
    pub fn new(capacity: usize, storage: &'a mut [u8]) -> FixcapResult<Self> {
        let items = FrameRing::from_config(&RingConfig::diagnostics(capacity), storage)?;
        Ok(Self { items })
    }

    /// Records a failure at `file:line` when `condition` is false.
    ///
    /// Nothing is recorded once the log is full. Prefer the [`check!`]
    /// macro, which fills in the location.
    ///
    /// [`check!`]: crate::check
    pub fn assert_with(&mut self, condition: bool, file: &str, line: u32) {
        if condition {
            return;
        }

        warn!("check failed at {}:{}", file, line);

        if self.items.is_full() {
            return;
        }

        let mut item = [0u8; ITEM_SIZE];
        let _ = encode_u32_at(&mut item, 0, line, Endian::Little);

        let name = truncate_to_boundary(file, FILE_NAME_SIZE - 1);
        item[LINE_SIZE..LINE_SIZE + name.len()].copy_from_slice(name.as_bytes());

        self.items.push(&item, 0);
    }

    /// Number of recorded failures.
    pub fn count(&self) -> usize {
        self.items.count()
    }

    /// Maximum number of recorded failures.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// The `index`-th recorded failure, oldest first.
    pub fn refer(&self, index: usize) -> Option<AssertionItem<'_>> {
        let frame = self.items.refer_from_oldest(index)?;
        let line = decode_u32_at(frame.payload, 0, Endian::Little)?;

        let name = frame.payload.get(LINE_SIZE..)?;
        let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        let file_name = std::str::from_utf8(&name[..end]).ok()?;

        Some(AssertionItem { line, file_name })
    }

    /// Iterates every recorded failure, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = AssertionItem<'_>> {
        (0..self.count()).filter_map(move |i| self.refer(i))
    }
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
fn truncate_to_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Records a failure in an [`AssertionLog`] when the condition is false.
///
/// ```
/// # use fixcap::{check, diagnostics::AssertionLog};
/// # let mut storage = vec![0u8; AssertionLog::needed_bytes(1)];
/// # let mut log = AssertionLog::new(1, &mut storage).unwrap();
/// let reading = 42;
/// check!(log, reading < 100);
/// ```
#[macro_export]
macro_rules! check {
    ($log:expr, $cond:expr) => {
        $log.assert_with($cond, file!(), line!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_size() {
        assert_eq!(ITEM_SIZE, 264);
        assert_eq!(AssertionLog::needed_bytes(3), 3 * 70 * 4);
    }

    #[test]
    fn test_passing_checks_are_not_recorded() {
        let mut storage = vec![0u8; AssertionLog::needed_bytes(3)];
        let mut log = AssertionLog::new(3, &mut storage).unwrap();

        check!(log, true);
        assert_eq!(log.count(), 0);
        assert_eq!(log.refer(0), None);
    }

    #[test]
    fn test_first_failures_are_kept() {
        let mut storage = vec![0u8; AssertionLog::needed_bytes(3)];
        let mut log = AssertionLog::new(3, &mut storage).unwrap();

        let first_line = line!() + 1;
        check!(log, false);
        let item = log.refer(0).unwrap();
        assert_eq!(item.line, first_line);
        assert_eq!(item.file_name, file!());

        log.assert_with(false, "second.rs", 20);
        log.assert_with(false, "third.rs", 30);
        assert_eq!(log.count(), 3);

        // Full: the fourth failure is dropped, nothing is overwritten
        log.assert_with(false, "fourth.rs", 40);
        assert_eq!(log.count(), 3);
        assert_eq!(log.refer(3), None);
        assert_eq!(log.refer(0).unwrap().line, first_line);

        let lines: Vec<u32> = log.iter().map(|item| item.line).collect();
        assert_eq!(lines, vec![first_line, 20, 30]);
    }

    #[test]
    fn test_long_file_name_is_truncated() {
        let mut storage = vec![0u8; AssertionLog::needed_bytes(2)];
        let mut log = AssertionLog::new(2, &mut storage).unwrap();

        let long_name: String = "0123456789".repeat(26);
        log.assert_with(false, &long_name, 7);
        let item = log.refer(0).unwrap();
        assert_eq!(item.file_name.len(), 259);
        assert_eq!(item.file_name, &long_name[..259]);

        // Multi-byte characters are never split
        let wide_name: String = "é".repeat(200);
        log.assert_with(false, &wide_name, 8);
        let item = log.refer(1).unwrap();
        assert_eq!(item.file_name.len(), 258);
        assert!(item.file_name.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_truncate_to_boundary() {
        assert_eq!(truncate_to_boundary("abc", 5), "abc");
        assert_eq!(truncate_to_boundary("abcdef", 3), "abc");
        assert_eq!(truncate_to_boundary("aé", 2), "a");
    }
}
