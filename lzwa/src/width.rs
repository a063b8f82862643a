//! Code width schedule shared by the encoder and the decoder.
//!
//! Both sides must call [`WidthTracker::observe`] after the same logical event (a dictionary
//! insertion, or the decoder's knowledge that one happened), otherwise they desynchronize.

use tracing::debug;

/// Minimum width that can address `entry_count` distinct codes.
pub fn current_width(entry_count: usize) -> u32 {
  let largest = entry_count.saturating_sub(1);
  (usize::BITS - largest.leading_zeros()).max(1)
}

/// Whether `entry_count` codes no longer fit in `width` bits.
pub fn should_grow(entry_count: usize, width: u32) -> bool {
  // Anything beyond usize::BITS is unreachable for an in-memory dictionary.
  match 1usize.checked_shl(width) {
    Some(capacity) => entry_count > capacity,
    None => false,
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidthTracker {
  width: u32,
  growths: u32,
}

impl WidthTracker {
  pub fn new(initial_entry_count: usize) -> Self {
    Self {
      width: current_width(initial_entry_count),
      growths: 0,
    }
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  /// Number of growth events so far.
  pub fn growths(&self) -> u32 {
    self.growths
  }

  /// Applies the growth rule for a dictionary that now holds `entry_count` entries. Returns the
  /// width in effect before the call if it grew.
  pub fn observe(&mut self, entry_count: usize) -> Option<u32> {
    if !should_grow(entry_count, self.width) {
      return None;
    };
    let old = self.width;
    self.width += 1;
    self.growths += 1;
    debug!(entry_count, old_width = old, new_width = self.width, "code width grew");
    Some(old)
  }
}
