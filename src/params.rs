use core::any;
use core::fmt::Debug;
use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use core::marker::PhantomData;
use core::num::NonZeroUsize;

// -----------------------------------------------------------------------------
// Configurable Params
// -----------------------------------------------------------------------------

/// Configuration parameters for a [`StrTab`].
///
/// Allows customizing the initial capacity and the growth threshold at compile
/// time. The simplest approach is [`ConstParams`]:
///
/// ```
/// use strtab::{ConstParams, StrTab};
///
/// type MyTable<'a> = StrTab<&'a u64, ConstParams<256>>;
///
/// let table: MyTable<'_> = StrTab::new();
/// assert_eq!(table.capacity(), 256);
/// ```
///
/// # Implementing `Params`
///
/// For a custom growth threshold, implement directly:
///
/// ```
/// use strtab::{Capacity, Params, StrTab, Threshold};
///
/// struct Sparse;
///
/// impl Params for Sparse {
///   const INITIAL: Capacity = Capacity::new(64);
///   const THRESHOLD: Threshold = Threshold::new(1, 2);
/// }
///
/// let table: StrTab<u32, Sparse> = StrTab::new();
/// assert_eq!(table.capacity(), 64);
/// ```
///
/// [`Capacity::new`] clamps values to the valid range and rounds up to the
/// nearest power of two. [`Threshold::new`] rejects ratios outside `(0, 1)`.
///
/// [`StrTab`]: crate::public::StrTab
pub trait Params {
  /// The number of slots allocated when the table is created.
  const INITIAL: Capacity = Capacity::DEF;

  /// The load factor the table never exceeds after an insert completes.
  const THRESHOLD: Threshold = Threshold::DEF;
}

// -----------------------------------------------------------------------------
// Configurable Params - Extensions
// -----------------------------------------------------------------------------

/// Derived parameters computed from [`Params`].
///
/// Automatically implemented for all [`Params`] types.
///
/// # Example
///
/// ```
/// use strtab::{DefaultParams, ParamsExt};
///
/// assert_eq!(DefaultParams::INITIAL_LIMIT, 12);
/// println!("{:#?}", DefaultParams::debug());
/// ```
pub trait ParamsExt: Params + Sealed {
  /// The number of slots that may be in use before the initial array grows.
  const INITIAL_LIMIT: usize = Self::THRESHOLD.limit(Self::INITIAL);

  fn validate() {
    assert!(
      Self::INITIAL_LIMIT < Self::INITIAL.as_usize(),
      "invalid params: threshold must leave an empty slot",
    );
  }

  #[inline]
  fn debug() -> DebugParams<Self> {
    DebugParams {
      marker: PhantomData,
    }
  }
}

// -----------------------------------------------------------------------------
// Debug Params
// -----------------------------------------------------------------------------

/// A helper type for displaying [`Params`] configuration.
///
/// Returned by [`ParamsExt::debug`]; implements [`Debug`] to show all derived
/// configuration values.
#[derive(Clone, Copy)]
pub struct DebugParams<P>
where
  P: ?Sized,
{
  marker: PhantomData<fn(P)>,
}

impl<P> Debug for DebugParams<P>
where
  P: Params + ?Sized,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct(any::type_name::<P>())
      .field("INITIAL", &P::INITIAL)
      .field("THRESHOLD", &P::THRESHOLD)
      .field("INITIAL_LIMIT", &P::INITIAL_LIMIT)
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Default Params
// -----------------------------------------------------------------------------

/// The default table configuration: [`Capacity::DEF`] initial slots and a
/// [`Threshold::DEF`] load factor.
///
/// Used when creating a [`StrTab`] without specifying a custom [`Params`] type.
///
/// # Example
///
/// ```
/// use strtab::{DefaultParams, StrTab};
///
/// // These are equivalent:
/// let table1: StrTab<u64> = StrTab::new();
/// let table2: StrTab<u64, DefaultParams> = StrTab::new();
/// ```
///
/// [`StrTab`]: crate::public::StrTab
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct DefaultParams;

impl Debug for DefaultParams {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Debug::fmt(&<Self as ParamsExt>::debug(), f)
  }
}

impl Params for DefaultParams {
  const INITIAL: Capacity = Capacity::DEF;
  const THRESHOLD: Threshold = Threshold::DEF;
}

// -----------------------------------------------------------------------------
// Const-Generic Params
// -----------------------------------------------------------------------------

/// A [`Params`] implementation with a compile-time initial capacity.
///
/// The capacity `N` is rounded up to the nearest power of two and clamped to
/// <code>[Capacity::MIN]..=[Capacity::MAX]</code>. The growth threshold is
/// always [`Threshold::DEF`].
///
/// # Examples
///
/// ```
/// use strtab::{ConstParams, StrTab};
///
/// // Values are rounded up to powers of two
/// let table: StrTab<u8, ConstParams<1000>> = StrTab::new();
/// assert_eq!(table.capacity(), 1024);
/// ```
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub struct ConstParams<const N: usize>;

impl<const N: usize> Params for ConstParams<N> {
  const INITIAL: Capacity = Capacity::new(N);
}

// -----------------------------------------------------------------------------
// Auto-implement Derive
// -----------------------------------------------------------------------------

mod private {
  pub trait Sealed {}
}

use private::Sealed;

impl<P> Sealed for P where P: Params + ?Sized {}
impl<P> ParamsExt for P where P: Params + ?Sized {}

// -----------------------------------------------------------------------------
// Capacity
// -----------------------------------------------------------------------------

/// A validated slot count.
///
/// Represents a power-of-two value in the range <code>[MIN]..=[MAX]</code>.
/// Power-of-two capacities let the table reduce a hash to a slot index with a
/// mask instead of a division.
///
/// # Construction
///
/// Use [`new()`] to create from an arbitrary value; it rounds up to the nearest
/// power of two and clamps to the valid range.
///
/// ```
/// use strtab::Capacity;
///
/// // Exact power of two
/// let cap = Capacity::new(256);
/// assert_eq!(cap.as_usize(), 256);
///
/// // Rounded up
/// let cap = Capacity::new(100);
/// assert_eq!(cap.as_usize(), 128);
///
/// // Clamped to minimum
/// let cap = Capacity::new(1);
/// assert_eq!(cap, Capacity::MIN);
///
/// // Clamped to maximum
/// let cap = Capacity::new(usize::MAX);
/// assert_eq!(cap, Capacity::MAX);
/// ```
///
/// [MIN]: Self::MIN
/// [MAX]: Self::MAX
/// [`new()`]: Self::new
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Capacity(NonZeroUsize);

impl Capacity {
  /// The minimum supported capacity (2² slots).
  pub const MIN: Self = Self::from_log2(2);

  /// The maximum supported capacity (2<sup>BITS-2</sup> slots).
  pub const MAX: Self = Self::from_log2(usize::BITS - 2);

  /// The default initial capacity (2⁴ slots).
  pub const DEF: Self = Self::from_log2(4);

  /// Creates a new [`Capacity`] from an arbitrary value.
  ///
  /// Rounds up to the nearest power of two and clamps to
  /// <code>[MIN]..=[MAX]</code>.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::Capacity;
  ///
  /// assert_eq!(Capacity::new(100).as_usize(), 128);
  /// assert_eq!(Capacity::new(0), Capacity::MIN);
  /// ```
  ///
  /// [MIN]: Self::MIN
  /// [MAX]: Self::MAX
  #[inline]
  pub const fn new(value: usize) -> Self {
    let Some(capacity) = value.checked_next_power_of_two() else {
      return Self::MAX;
    };

    if capacity < Self::MIN.as_usize() {
      Self::MIN
    } else if capacity > Self::MAX.as_usize() {
      Self::MAX
    } else {
      Self::from_log2(capacity.trailing_zeros())
    }
  }

  #[inline]
  const fn from_log2(bits: u32) -> Self {
    match NonZeroUsize::new(1_usize << bits) {
      Some(value) => Self(value),
      None => panic!("invalid capacity: must be non-zero"),
    }
  }

  /// Returns the capacity as a [`usize`].
  #[inline]
  pub const fn as_usize(self) -> usize {
    self.0.get()
  }

  /// Returns the capacity as a [`NonZeroUsize`].
  #[inline]
  pub const fn as_nonzero(self) -> NonZeroUsize {
    self.0
  }

  /// Returns the base-2 logarithm of the capacity.
  ///
  /// # Examples
  ///
  /// ```
  /// use strtab::Capacity;
  ///
  /// assert_eq!(Capacity::new(1024).log2(), 10);
  /// ```
  #[inline]
  pub const fn log2(self) -> u32 {
    self.0.trailing_zeros()
  }

  /// Returns the mask that reduces a hash to a slot index.
  #[inline]
  pub const fn mask(self) -> usize {
    self.as_usize() - 1
  }

  /// Returns twice this capacity, or `None` if that would exceed [`MAX`].
  ///
  /// [`MAX`]: Self::MAX
  #[inline]
  pub const fn checked_grow(self) -> Option<Self> {
    if self.as_usize() < Self::MAX.as_usize() {
      Some(Self::from_log2(self.log2() + 1))
    } else {
      None
    }
  }

  /// Returns twice this capacity.
  ///
  /// # Panics
  ///
  /// Panics if the capacity is already [`MAX`].
  ///
  /// [`MAX`]: Self::MAX
  #[track_caller]
  #[inline]
  pub const fn grow(self) -> Self {
    match self.checked_grow() {
      Some(capacity) => capacity,
      None => panic!("capacity overflow"),
    }
  }
}

impl Debug for Capacity {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "{:?} (1 << {:?})", self.as_nonzero(), self.log2())
  }
}

impl Default for Capacity {
  #[inline]
  fn default() -> Self {
    Self::DEF
  }
}

impl From<Capacity> for NonZeroUsize {
  #[inline]
  fn from(other: Capacity) -> Self {
    other.as_nonzero()
  }
}

impl From<Capacity> for usize {
  #[inline]
  fn from(other: Capacity) -> Self {
    other.as_usize()
  }
}

// -----------------------------------------------------------------------------
// Threshold
// -----------------------------------------------------------------------------

/// A maximum load factor, stored as an exact ratio.
///
/// Growth decisions compare integer products rather than floats, so a
/// threshold of `4/5` is exactly `0.8`.
///
/// ```
/// use strtab::{Capacity, Threshold};
///
/// assert_eq!(Threshold::DEF.limit(Capacity::new(16)), 12);
/// assert_eq!(Threshold::new(1, 2).limit(Capacity::new(16)), 8);
/// ```
#[derive(Copy, Clone, Hash, PartialEq, Eq)]
pub struct Threshold {
  num: usize,
  den: usize,
}

impl Threshold {
  /// The default threshold (`0.8`).
  pub const DEF: Self = Self::new(4, 5);

  /// Creates a new threshold of `num / den`.
  ///
  /// # Panics
  ///
  /// Panics unless `0 < num < den`. In const context this is a compile error.
  #[track_caller]
  #[inline]
  pub const fn new(num: usize, den: usize) -> Self {
    assert!(num > 0, "invalid threshold: must be greater than zero");
    assert!(num < den, "invalid threshold: must be less than one");

    Self { num, den }
  }

  /// Returns the numerator of the ratio.
  #[inline]
  pub const fn num(self) -> usize {
    self.num
  }

  /// Returns the denominator of the ratio.
  #[inline]
  pub const fn den(self) -> usize {
    self.den
  }

  /// Returns the largest slot count that keeps `count / capacity` at or below
  /// this threshold.
  #[inline]
  pub const fn limit(self, capacity: Capacity) -> usize {
    let scaled: u128 = capacity.as_usize() as u128 * self.num as u128;
    (scaled / self.den as u128) as usize
  }

  /// Returns `true` if `count` slots out of `capacity` exceed this threshold.
  #[inline]
  pub const fn exceeded(self, count: usize, capacity: Capacity) -> bool {
    count > self.limit(capacity)
  }

  /// Returns the threshold as a float.
  #[allow(clippy::cast_precision_loss, reason = "ratios are small integers")]
  #[inline]
  pub fn as_f64(self) -> f64 {
    self.num as f64 / self.den as f64
  }
}

impl Debug for Threshold {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "{}/{} ({})", self.num, self.den, self.as_f64())
  }
}

impl Display for Threshold {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(&self.as_f64(), f)
  }
}

impl Default for Threshold {
  #[inline]
  fn default() -> Self {
    Self::DEF
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::params::Capacity;
  use crate::params::ConstParams;
  use crate::params::DefaultParams;
  use crate::params::Params;
  use crate::params::ParamsExt;
  use crate::params::Threshold;
  use crate::utils::each_capacity;

  #[test]
  fn capacity_min() {
    assert_eq!(
      Capacity::new(1).as_usize(),
      Capacity::MIN.as_usize(),
      "invalid capacity: expected clamp to MIN",
    );
  }

  #[test]
  fn capacity_max() {
    assert_eq!(
      Capacity::new(usize::MAX).as_usize(),
      Capacity::MAX.as_usize(),
      "invalid capacity: expected clamp to MAX",
    );
  }

  #[test]
  fn capacity_round_up() {
    assert_eq!(
      Capacity::new((1 << 7) - 25).as_usize(),
      1 << 7,
      "invalid capacity: expected round up",
    );
  }

  #[test]
  fn capacity_exact() {
    assert_eq!(
      Capacity::new(1 << 8).as_usize(),
      1 << 8,
      "invalid capacity: expected no change",
    );
  }

  #[test]
  fn capacity_grow_doubles() {
    let capacity: Capacity = Capacity::DEF;

    assert_eq!(capacity.grow().as_usize(), 32);
    assert_eq!(capacity.grow().log2(), capacity.log2() + 1);
    assert_eq!(Capacity::MAX.checked_grow(), None);
  }

  #[test]
  #[should_panic(expected = "capacity overflow")]
  fn capacity_grow_past_max() {
    let _capacity: Capacity = Capacity::MAX.grow();
  }

  #[test]
  fn capacity_mask() {
    each_capacity!({
      let mask: usize = P::INITIAL.mask();

      assert_eq!(mask + 1, P::INITIAL.as_usize());
      assert_eq!(mask.count_ones(), P::INITIAL.log2());
    });
  }

  #[test]
  fn threshold_default_is_four_fifths() {
    assert_eq!(Threshold::DEF.num(), 4);
    assert_eq!(Threshold::DEF.den(), 5);
    assert!((Threshold::DEF.as_f64() - 0.8).abs() < f64::EPSILON);
  }

  #[test]
  fn threshold_limit() {
    assert_eq!(Threshold::DEF.limit(Capacity::new(4)), 3);
    assert_eq!(Threshold::DEF.limit(Capacity::new(16)), 12);
    assert_eq!(Threshold::DEF.limit(Capacity::new(32)), 25);
    assert!(Threshold::DEF.limit(Capacity::MAX) < Capacity::MAX.as_usize());
  }

  #[test]
  fn threshold_exceeded() {
    let capacity: Capacity = Capacity::new(16);

    assert!(!Threshold::DEF.exceeded(12, capacity));
    assert!(Threshold::DEF.exceeded(13, capacity));
  }

  #[test]
  #[should_panic(expected = "invalid threshold: must be less than one")]
  fn threshold_rejects_one() {
    let _threshold: Threshold = Threshold::new(5, 5);
  }

  #[test]
  #[should_panic(expected = "invalid threshold: must be greater than zero")]
  fn threshold_rejects_zero() {
    let _threshold: Threshold = Threshold::new(0, 5);
  }

  #[test]
  fn limit_leaves_an_empty_slot() {
    each_capacity!({
      P::validate();
      assert!(P::INITIAL_LIMIT < P::INITIAL.as_usize());
    });
  }

  #[test]
  fn default_params() {
    assert_eq!(DefaultParams::INITIAL, Capacity::DEF);
    assert_eq!(DefaultParams::THRESHOLD, Threshold::DEF);
    assert_eq!(DefaultParams::INITIAL_LIMIT, 12);
  }

  #[test]
  fn const_params_round_up() {
    assert_eq!(<ConstParams<1000> as Params>::INITIAL.as_usize(), 1024);
  }

  #[test]
  fn debug_params() {
    let debug: String = format!("{:?}", DefaultParams::debug());

    assert!(debug.contains("INITIAL"));
    assert!(debug.contains("THRESHOLD"));
  }
}
