//! Slot storage.
//!
//! Provides [`Slot`], the tri-state cell of the table, and [`Slots`], the
//! contiguous array that backs it.

use core::mem;

use crate::params::Capacity;

// -----------------------------------------------------------------------------
// Slot
// -----------------------------------------------------------------------------

/// A single table cell.
pub(crate) enum Slot<V> {
  /// Never occupied since the array was allocated. Terminates a probe.
  Empty,
  /// Previously occupied. Does not terminate a probe.
  Tombstone,
  /// A live key and its value. The key is an owned copy.
  Occupied { key: Box<str>, value: V },
}

impl<V> Slot<V> {
  /// Returns `true` if this slot holds `key`.
  #[inline]
  pub(crate) fn holds(&self, key: &str) -> bool {
    match self {
      Self::Occupied { key: stored, .. } => stored.as_bytes() == key.as_bytes(),
      Self::Empty | Self::Tombstone => false,
    }
  }

  /// Returns the value of an occupied slot.
  #[inline]
  pub(crate) const fn value(&self) -> Option<&V> {
    match self {
      Self::Occupied { value, .. } => Some(value),
      Self::Empty | Self::Tombstone => None,
    }
  }

  /// Replaces the value of an occupied slot, leaving the key unchanged.
  #[inline]
  pub(crate) fn replace(&mut self, new: V) -> Option<V> {
    match self {
      Self::Occupied { value, .. } => Some(mem::replace(value, new)),
      Self::Empty | Self::Tombstone => None,
    }
  }

  /// Turns an occupied slot into a tombstone and returns its value.
  ///
  /// Empty slots and tombstones are left untouched.
  #[inline]
  pub(crate) fn bury(&mut self) -> Option<V> {
    if !matches!(self, Self::Occupied { .. }) {
      return None;
    }

    match mem::replace(self, Self::Tombstone) {
      Self::Occupied { value, .. } => Some(value),
      Self::Empty | Self::Tombstone => None,
    }
  }
}

// -----------------------------------------------------------------------------
// Slots
// -----------------------------------------------------------------------------

/// A fixed-size array of slots, all [`Empty`] on allocation.
///
/// Allocation failure aborts through the global allocator's error handler.
///
/// [`Empty`]: Slot::Empty
pub(crate) struct Slots<V> {
  inner: Box<[Slot<V>]>,
}

impl<V> Slots<V> {
  #[inline]
  pub(crate) fn new(capacity: Capacity) -> Self {
    let mut inner: Vec<Slot<V>> = Vec::with_capacity(capacity.as_usize());

    inner.resize_with(capacity.as_usize(), || Slot::Empty);

    Self {
      inner: inner.into_boxed_slice(),
    }
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.inner.len()
  }

  #[inline]
  pub(crate) fn get(&self, index: usize) -> &Slot<V> {
    &self.inner[index]
  }

  #[inline]
  pub(crate) fn get_mut(&mut self, index: usize) -> &mut Slot<V> {
    &mut self.inner[index]
  }

  /// Returns an iterator over the live `(key, value)` pairs.
  #[inline]
  pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &V)> {
    self.inner.iter().filter_map(|slot| match slot {
      Slot::Occupied { key, value } => Some((&**key, value)),
      Slot::Empty | Slot::Tombstone => None,
    })
  }

  /// Consumes the array, yielding the owned live `(key, value)` pairs.
  ///
  /// Empty slots and tombstones are dropped.
  #[inline]
  pub(crate) fn into_entries(self) -> impl Iterator<Item = (Box<str>, V)> {
    self
      .inner
      .into_vec()
      .into_iter()
      .filter_map(|slot| match slot {
        Slot::Occupied { key, value } => Some((key, value)),
        Slot::Empty | Slot::Tombstone => None,
      })
  }
}
