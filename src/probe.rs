//! Linear probe sequences.

use core::iter::FusedIterator;

use crate::params::Capacity;

/// A linear probe sequence over a power-of-two slot array.
///
/// Starts at the home slot `hash & mask` and walks forward one slot at a time,
/// wrapping at the end of the array. Visits every slot exactly once, then
/// stops.
#[derive(Clone, Debug)]
pub(crate) struct Probe {
  index: usize,
  mask: usize,
  remaining: usize,
}

impl Probe {
  #[inline]
  pub(crate) const fn start(hash: u32, capacity: Capacity) -> Self {
    Self {
      index: hash as usize & capacity.mask(),
      mask: capacity.mask(),
      remaining: capacity.as_usize(),
    }
  }
}

impl Iterator for Probe {
  type Item = usize;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.remaining == 0 {
      return None;
    }

    let index: usize = self.index;

    self.index = (index + 1) & self.mask;
    self.remaining -= 1;

    Some(index)
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl ExactSizeIterator for Probe {}

impl FusedIterator for Probe {}
