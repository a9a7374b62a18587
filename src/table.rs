//! Core table implementation.
//!
//! A single slot array addressed by [`djb2`] and resolved by linear probing.
//! Deleted entries leave tombstones that keep probe chains unbroken until the
//! next rehash drops them.
//!
//! [`djb2`]: crate::hash::djb2

use core::fmt::Debug;
use core::fmt::DebugMap;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use core::marker::PhantomData;
use core::mem;

use crate::hash::djb2;
use crate::params::Capacity;
use crate::params::Params;
use crate::params::ParamsExt;
use crate::probe::Probe;
use crate::slot::Slot;
use crate::slot::Slots;

// -----------------------------------------------------------------------------
// Probe Outcome
// -----------------------------------------------------------------------------

/// Where a key lives, or where it would be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Search {
  /// The key occupies this slot.
  Found(usize),
  /// The key is absent. `index` is the first tombstone on the chain if one
  /// was passed, otherwise the empty slot that ended the chain.
  Vacant { index: usize, tombstone: bool },
}

// -----------------------------------------------------------------------------
// Table State
// -----------------------------------------------------------------------------

pub(crate) struct Table<V, P>
where
  P: Params + ?Sized,
{
  slots: Slots<V>,
  capacity: Capacity,
  /// The number of slots that may be in use (live or tombstone) at rest.
  limit: usize,
  entries: usize,
  tombstones: usize,
  marker: PhantomData<fn(P)>,
}

impl<V, P> Table<V, P>
where
  P: Params + ?Sized,
{
  #[track_caller]
  #[inline]
  pub(crate) fn new() -> Self {
    P::validate();

    Self {
      slots: Slots::new(P::INITIAL),
      capacity: P::INITIAL,
      limit: P::INITIAL_LIMIT,
      entries: 0,
      tombstones: 0,
      marker: PhantomData,
    }
  }

  #[inline]
  pub(crate) const fn cap(&self) -> usize {
    self.capacity.as_usize()
  }

  #[inline]
  pub(crate) const fn len(&self) -> usize {
    self.entries
  }

  #[inline]
  pub(crate) const fn is_empty(&self) -> bool {
    self.entries == 0
  }

  #[inline]
  pub(crate) const fn tombstones(&self) -> usize {
    self.tombstones
  }

  #[allow(clippy::cast_precision_loss, reason = "load factor is approximate")]
  #[inline]
  pub(crate) fn load_factor(&self) -> f64 {
    self.entries as f64 / self.cap() as f64
  }

  #[inline]
  pub(crate) fn get(&self, key: &str) -> Option<&V> {
    match self.search(key) {
      Search::Found(index) => self.slots.get(index).value(),
      Search::Vacant { .. } => None,
    }
  }

  #[inline]
  pub(crate) fn contains_key(&self, key: &str) -> bool {
    matches!(self.search(key), Search::Found(_))
  }

  /// Inserts or updates `key`, returning the previous value on update.
  #[track_caller]
  pub(crate) fn insert(&mut self, key: &str, value: V) -> Option<V> {
    let (index, tombstone): (usize, bool) = match self.search(key) {
      Search::Found(index) => return self.slots.get_mut(index).replace(value),
      Search::Vacant { index, tombstone } => (index, tombstone),
    };

    let index: usize = if self.entries + 1 > self.limit {
      self.grow(self.entries + 1);
      self.vacancy(key)
    } else if !tombstone && self.entries + self.tombstones + 1 > self.limit {
      self.purge();
      self.vacancy(key)
    } else {
      index
    };

    self.place(index, key.into(), value);

    None
  }

  /// Removes `key`, leaving a tombstone in its slot.
  pub(crate) fn remove(&mut self, key: &str) -> Option<V> {
    let Search::Found(index) = self.search(key) else {
      return None;
    };

    let value: Option<V> = self.slots.get_mut(index).bury();

    debug_assert!(value.is_some(), "search returned an unoccupied slot");

    self.entries -= 1;
    self.tombstones += 1;

    value
  }

  /// Probes for `key`, passing over tombstones and stopping at the first
  /// empty slot or matching key.
  fn search(&self, key: &str) -> Search {
    let mut grave: Option<usize> = None;

    for index in Probe::start(djb2(key.as_bytes()), self.capacity) {
      let slot: &Slot<V> = self.slots.get(index);

      match slot {
        Slot::Empty => {
          return Search::Vacant {
            index: grave.unwrap_or(index),
            tombstone: grave.is_some(),
          };
        }
        Slot::Tombstone => {
          grave = grave.or(Some(index));
        }
        Slot::Occupied { .. } => {
          if slot.holds(key) {
            return Search::Found(index);
          }
        }
      }
    }

    // Only reachable if every slot is in use, which `limit` rules out.
    match grave {
      Some(index) => Search::Vacant {
        index,
        tombstone: true,
      },
      None => unreachable!("probe sequence exhausted without a vacant slot"),
    }
  }

  /// Returns the slot a new `key` goes into after a rehash.
  ///
  /// A freshly rehashed array has no tombstones and does not hold `key`.
  fn vacancy(&self, key: &str) -> usize {
    match self.search(key) {
      Search::Vacant {
        index,
        tombstone: false,
      } => index,
      search => unreachable!("rehashed table returned {search:?}"),
    }
  }

  fn place(&mut self, index: usize, key: Box<str>, value: V) {
    let slot: &mut Slot<V> = self.slots.get_mut(index);

    match slot {
      Slot::Empty => {}
      Slot::Tombstone => self.tombstones -= 1,
      Slot::Occupied { .. } => unreachable!("placing over a live entry"),
    }

    *slot = Slot::Occupied { key, value };

    self.entries += 1;

    debug_assert!(self.entries + self.tombstones <= self.limit);
  }

  /// Doubles the capacity until `required` entries fit under the threshold.
  #[track_caller]
  #[cold]
  #[inline(never)]
  fn grow(&mut self, required: usize) {
    let mut capacity: Capacity = self.capacity.grow();

    while P::THRESHOLD.exceeded(required, capacity) {
      capacity = capacity.grow();
    }

    self.rehash(capacity);
  }

  /// Rehashes at the current capacity, dropping every tombstone.
  #[cold]
  #[inline(never)]
  fn purge(&mut self) {
    self.rehash(self.capacity);
  }

  /// Replaces the slot array with an empty one of `capacity` slots and
  /// re-inserts every live entry. Owned keys move; they are not copied.
  fn rehash(&mut self, capacity: Capacity) {
    let old: Slots<V> = mem::replace(&mut self.slots, Slots::new(capacity));

    debug_assert_eq!(old.len(), self.cap());

    self.capacity = capacity;
    self.limit = P::THRESHOLD.limit(capacity);
    self.entries = 0;
    self.tombstones = 0;

    for (key, value) in old.into_entries() {
      let index: usize = self.vacancy(&key);
      self.place(index, key, value);
    }
  }
}

impl<V, P> Debug for Table<V, P>
where
  V: Debug,
  P: Params + ?Sized,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    let mut debug: DebugMap<'_, '_> = f.debug_map();

    for (key, value) in self.slots.entries() {
      debug.entry(&key, value);
    }

    debug.finish()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::hash::djb2;
  use crate::params::Capacity;
  use crate::params::ConstParams;
  use crate::params::Params;
  use crate::params::ParamsExt;
  use crate::params::Threshold;
  use crate::slot::Slot;
  use crate::table::Search;
  use crate::table::Table;
  use crate::utils::each_capacity;

  type TestTable = Table<usize, ConstParams<16>>;

  /// Returns `count` distinct keys whose home slot is `home` at `capacity`.
  fn colliding(home: usize, capacity: usize, count: usize) -> Vec<String> {
    (0_usize..)
      .map(|index| format!("k{index}"))
      .filter(|key| (djb2(key.as_bytes()) as usize & (capacity - 1)) == home)
      .take(count)
      .collect()
  }

  #[test]
  fn new_is_empty() {
    each_capacity!({
      let table: Table<usize, P> = Table::new();

      assert_eq!(table.cap(), P::INITIAL.as_usize());
      assert_eq!(table.len(), 0);
      assert_eq!(table.tombstones(), 0);
      assert!(table.is_empty());
      assert!(table.load_factor() < f64::EPSILON);
    });
  }

  #[test]
  fn insert_then_get() {
    let mut table: TestTable = Table::new();

    assert_eq!(table.insert("alpha", 1), None);
    assert_eq!(table.insert("beta", 2), None);

    assert_eq!(table.get("alpha"), Some(&1));
    assert_eq!(table.get("beta"), Some(&2));
    assert_eq!(table.get("gamma"), None);
    assert_eq!(table.len(), 2);
  }

  #[test]
  fn update_keeps_single_entry() {
    let mut table: TestTable = Table::new();

    assert_eq!(table.insert("key", 1), None);
    assert_eq!(table.insert("key", 2), Some(1));

    assert_eq!(table.len(), 1);
    assert_eq!(table.get("key"), Some(&2));
  }

  #[test]
  fn remove_leaves_tombstone() {
    let mut table: TestTable = Table::new();

    table.insert("key", 1);

    assert_eq!(table.remove("key"), Some(1));
    assert_eq!(table.get("key"), None);
    assert_eq!(table.len(), 0);
    assert_eq!(table.tombstones(), 1);
  }

  #[test]
  fn remove_absent_is_noop() {
    let mut table: TestTable = Table::new();

    table.insert("present", 1);

    assert_eq!(table.remove("absent"), None);
    assert_eq!(table.len(), 1);
    assert_eq!(table.tombstones(), 0);
  }

  #[test]
  fn tombstone_does_not_break_chain() {
    let mut table: TestTable = Table::new();
    let keys: Vec<String> = colliding(3, 16, 3);

    for (value, key) in keys.iter().enumerate() {
      table.insert(key, value);
    }

    table.remove(&keys[0]);

    assert_eq!(table.get(&keys[0]), None);
    assert_eq!(table.get(&keys[1]), Some(&1));
    assert_eq!(table.get(&keys[2]), Some(&2));
  }

  #[test]
  fn insert_reuses_first_tombstone() {
    let mut table: TestTable = Table::new();
    let keys: Vec<String> = colliding(5, 16, 3);

    table.insert(&keys[0], 0);
    table.insert(&keys[1], 1);
    table.remove(&keys[0]);

    assert_eq!(
      table.search(&keys[2]),
      Search::Vacant {
        index: 5,
        tombstone: true,
      },
    );

    table.insert(&keys[2], 2);

    assert_eq!(table.tombstones(), 0);
    assert!(table.slots.get(5).holds(&keys[2]));
    assert_eq!(table.get(&keys[1]), Some(&1));
  }

  #[test]
  fn update_after_tombstone_finds_existing() {
    let mut table: TestTable = Table::new();
    let keys: Vec<String> = colliding(9, 16, 2);

    table.insert(&keys[0], 0);
    table.insert(&keys[1], 1);
    table.remove(&keys[0]);

    assert_eq!(table.insert(&keys[1], 10), Some(1));
    assert_eq!(table.len(), 1);
    assert_eq!(table.tombstones(), 1);
    assert_eq!(table.get(&keys[1]), Some(&10));
  }

  #[test]
  fn grows_before_breaching_threshold() {
    let mut table: TestTable = Table::new();

    for index in 0..12 {
      table.insert(&index.to_string(), index);
    }

    assert_eq!(table.cap(), 16);

    table.insert("12", 12);

    assert_eq!(table.cap(), 32);
    assert_eq!(table.len(), 13);

    for index in 0..13 {
      assert_eq!(table.get(&index.to_string()), Some(&index));
    }
  }

  #[test]
  fn update_never_grows() {
    let mut table: TestTable = Table::new();

    for index in 0..12 {
      table.insert(&index.to_string(), index);
    }

    for index in 0..12 {
      table.insert(&index.to_string(), index + 100);
    }

    assert_eq!(table.cap(), 16);
    assert_eq!(table.get("11"), Some(&111));
  }

  #[test]
  fn load_factor_stays_bounded() {
    each_capacity!({
      let mut table: Table<usize, P> = Table::new();

      for index in 0..P::INITIAL.as_usize() * 4 {
        table.insert(&index.to_string(), index);

        assert!(!P::THRESHOLD.exceeded(table.len(), Capacity::new(table.cap())));
        assert!(table.load_factor() <= P::THRESHOLD.as_f64());
      }
    });
  }

  #[test]
  fn purge_drops_tombstones() {
    let mut table: TestTable = Table::new();

    for index in 0..12 {
      table.insert(&index.to_string(), index);
    }

    for index in 0..12 {
      table.remove(&index.to_string());
    }

    assert_eq!(table.len(), 0);
    assert_eq!(table.tombstones(), 12);

    // Fresh keys either reuse a tombstone or trigger a purge.
    for index in 100..112 {
      table.insert(&index.to_string(), index);
      assert!(table.len() + table.tombstones() <= Threshold::DEF.limit(Capacity::new(16)));
    }

    assert_eq!(table.cap(), 16);

    for index in 100..112 {
      assert_eq!(table.get(&index.to_string()), Some(&index));
    }
  }

  #[test]
  fn churn_keeps_an_empty_slot() {
    let mut table: TestTable = Table::new();

    for round in 0..1_000 {
      let key: String = format!("churn-{round}");

      table.insert(&key, round);
      table.remove(&key);

      let empty: bool =
        (0..table.cap()).any(|index| matches!(table.slots.get(index), Slot::Empty));

      assert!(empty, "no empty slot after round {round}");
    }

    assert_eq!(table.cap(), 16);
    assert!(table.is_empty());
  }

  #[test]
  fn grow_moves_every_entry() {
    let mut table: TestTable = Table::new();

    for index in 0..500 {
      table.insert(&format!("key-{index}"), index);
    }

    for index in (0..500).step_by(3) {
      table.remove(&format!("key-{index}"));
    }

    for index in 500..1_000 {
      table.insert(&format!("key-{index}"), index);
    }

    for index in 0..1_000 {
      let expected: Option<&usize> = if index < 500 && index % 3 == 0 {
        None
      } else {
        Some(&index)
      };

      assert_eq!(table.get(&format!("key-{index}")), expected);
    }

    assert!(table.cap().is_power_of_two());
  }

  #[test]
  fn small_threshold_grows_past_several_doublings() {
    struct Tiny;

    impl Params for Tiny {
      const INITIAL: Capacity = Capacity::MIN;
      const THRESHOLD: Threshold = Threshold::new(1, 10);
    }

    let mut table: Table<usize, Tiny> = Table::new();

    assert_eq!(Tiny::INITIAL_LIMIT, 0);

    table.insert("only", 1);

    assert_eq!(table.cap(), 16);
    assert_eq!(table.get("only"), Some(&1));
  }

  #[test]
  fn debug_lists_live_entries() {
    let mut table: TestTable = Table::new();

    table.insert("kept", 1);
    table.insert("dropped", 2);
    table.remove("dropped");

    assert_eq!(format!("{table:?}"), r#"{"kept": 1}"#);
  }
}
