use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result;

use crate::params::DefaultParams;
use crate::params::Params;
use crate::params::ParamsExt;
use crate::table::Table;

/// A string-keyed, open-addressed table.
///
/// `StrTab` maps text keys to opaque, copyable values (typically references or
/// handles owned by the caller). It is parameterized by `P` to configure the
/// initial capacity and the growth threshold at compile time.
///
/// See the [crate-level documentation][crate] for an overview and examples.
///
/// # Type Parameters
///
/// - `V`: The type of values stored in the table. Values are [`Copy`], so the
///   table never drops or frees whatever a value refers to.
/// - `P`: Configuration parameters implementing [`Params`]. Defaults to
///   [`DefaultParams`] (16 initial slots, 0.8 threshold).
///
/// # Examples
///
/// Basic usage with default configuration:
///
/// ```
/// use strtab::StrTab;
///
/// let answer: u64 = 42;
/// let mut table: StrTab<&u64> = StrTab::new();
///
/// table.put_or_delete("answer", Some(&answer));
/// assert_eq!(table.get("answer"), Some(&42));
///
/// table.put_or_delete("answer", None);
/// assert_eq!(table.get("answer"), None);
/// ```
///
/// Custom initial capacity using [`ConstParams`]:
///
/// ```
/// use strtab::{ConstParams, StrTab};
///
/// let table: StrTab<u32, ConstParams<256>> = StrTab::new();
/// assert_eq!(table.capacity(), 256);
/// ```
///
/// [`ConstParams`]: crate::ConstParams
#[repr(transparent)]
pub struct StrTab<V, P = DefaultParams>
where
  P: Params + ?Sized,
{
  inner: Table<V, P>,
}

impl<V, P> StrTab<V, P>
where
  V: Copy,
  P: Params + ?Sized,
{
  /// Creates a new, empty table with [`Params::INITIAL`] slots.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::StrTab;
  ///
  /// let table: StrTab<&str> = StrTab::new();
  /// assert!(table.is_empty());
  /// assert_eq!(table.capacity(), 16);
  /// ```
  #[track_caller]
  #[inline]
  pub fn new() -> Self {
    Self {
      inner: Table::new(),
    }
  }

  /// Returns the number of slots currently allocated.
  ///
  /// Starts at [`Params::INITIAL`] and doubles as entries accumulate. The
  /// table never shrinks.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::StrTab;
  ///
  /// let mut table: StrTab<usize> = StrTab::new();
  /// assert_eq!(table.capacity(), 16);
  ///
  /// for index in 0..13 {
  ///   table.insert(&index.to_string(), index);
  /// }
  ///
  /// assert_eq!(table.capacity(), 32);
  /// ```
  #[inline]
  pub const fn capacity(&self) -> usize {
    self.inner.cap()
  }

  /// Returns the number of live entries.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::StrTab;
  ///
  /// let mut table: StrTab<i32> = StrTab::new();
  /// assert_eq!(table.len(), 0);
  ///
  /// table.insert("a", 1);
  /// table.insert("b", 2);
  /// table.insert("a", 3);
  /// assert_eq!(table.len(), 2);
  /// ```
  #[inline]
  pub const fn len(&self) -> usize {
    self.inner.len()
  }

  /// Returns `true` if the table contains no live entries.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::StrTab;
  ///
  /// let mut table: StrTab<i32> = StrTab::new();
  /// assert!(table.is_empty());
  ///
  /// table.insert("a", 1);
  /// assert!(!table.is_empty());
  /// ```
  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }

  /// Returns the ratio of live entries to [`capacity`].
  ///
  /// Never exceeds [`Params::THRESHOLD`] once an insert has returned.
  /// Tombstones left by deletions are not counted.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::StrTab;
  ///
  /// let mut table: StrTab<i32> = StrTab::new();
  ///
  /// for index in 0..4 {
  ///   table.insert(&index.to_string(), index);
  /// }
  ///
  /// assert_eq!(table.load_factor(), 0.25);
  /// ```
  ///
  /// [`capacity`]: Self::capacity
  #[inline]
  pub fn load_factor(&self) -> f64 {
    self.inner.load_factor()
  }

  /// Returns the value stored under `key`, or `None` if it is absent.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::StrTab;
  ///
  /// let mut table: StrTab<char> = StrTab::new();
  /// table.insert("x", 'x');
  ///
  /// assert_eq!(table.get("x"), Some('x'));
  /// assert_eq!(table.get("y"), None);
  /// ```
  #[inline]
  pub fn get(&self, key: &str) -> Option<V> {
    self.inner.get(key).copied()
  }

  /// Returns `true` if `key` is present.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::StrTab;
  ///
  /// let mut table: StrTab<u8> = StrTab::new();
  /// table.insert("x", 1);
  ///
  /// assert!(table.contains_key("x"));
  /// assert!(!table.contains_key("y"));
  /// ```
  #[inline]
  pub fn contains_key(&self, key: &str) -> bool {
    self.inner.contains_key(key)
  }

  /// Inserts `value` under `key`, or updates the value if `key` is present.
  ///
  /// Returns the previous value on update. The key text is copied into the
  /// table; the caller's buffer may be dropped or reused afterwards.
  ///
  /// If storing a new key would push the load factor past
  /// [`Params::THRESHOLD`], the table doubles its capacity first.
  ///
  /// # Panics
  ///
  /// Panics if growing would exceed [`Capacity::MAX`] slots.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::StrTab;
  ///
  /// let mut table: StrTab<i32> = StrTab::new();
  ///
  /// let mut key: String = String::from("key");
  /// assert_eq!(table.insert(&key, 1), None);
  /// key.clear();
  ///
  /// assert_eq!(table.insert("key", 2), Some(1));
  /// assert_eq!(table.get("key"), Some(2));
  /// ```
  ///
  /// [`Capacity::MAX`]: crate::Capacity::MAX
  #[track_caller]
  #[inline]
  pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
    self.inner.insert(key, value)
  }

  /// Removes `key` and returns its value, or `None` if it was absent.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::StrTab;
  ///
  /// let mut table: StrTab<i32> = StrTab::new();
  /// table.insert("key", 1);
  ///
  /// assert_eq!(table.remove("key"), Some(1)); // Entry removed
  /// assert_eq!(table.remove("key"), None); // Already gone
  /// ```
  #[inline]
  pub fn remove(&mut self, key: &str) -> Option<V> {
    self.inner.remove(key)
  }

  /// Inserts, updates, or deletes `key` depending on `value`.
  ///
  /// - `Some(value)` inserts `key` or updates its value, as [`insert`].
  /// - `None` deletes `key`, as [`remove`]. Deleting an absent key does
  ///   nothing.
  ///
  /// # Panics
  ///
  /// Panics if growing would exceed [`Capacity::MAX`] slots.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::StrTab;
  ///
  /// let values: [u32; 2] = [10, 20];
  /// let mut table: StrTab<&u32> = StrTab::new();
  ///
  /// table.put_or_delete("a", Some(&values[0]));
  /// table.put_or_delete("a", Some(&values[1]));
  /// assert_eq!(table.get("a"), Some(&20));
  ///
  /// table.put_or_delete("a", None);
  /// table.put_or_delete("never", None);
  /// assert!(table.is_empty());
  /// ```
  ///
  /// [`insert`]: Self::insert
  /// [`remove`]: Self::remove
  /// [`Capacity::MAX`]: crate::Capacity::MAX
  #[track_caller]
  #[inline]
  pub fn put_or_delete(&mut self, key: &str, value: Option<V>) {
    match value {
      Some(value) => {
        self.inner.insert(key, value);
      }
      None => {
        self.inner.remove(key);
      }
    }
  }
}

impl<V, P> Debug for StrTab<V, P>
where
  V: Debug,
  P: Params + ?Sized,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("StrTab")
      .field("params", &P::debug())
      .field("capacity", &self.inner.cap())
      .field("tombstones", &self.inner.tombstones())
      .field("entries", &self.inner)
      .finish()
  }
}

impl<V, P> Default for StrTab<V, P>
where
  V: Copy,
  P: Params + ?Sized,
{
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
