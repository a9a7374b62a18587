//! A string-keyed, open-addressed table.
//!
//! `strtab` provides [`StrTab`], a map from text keys to opaque, copyable
//! values stored in a single flat slot array. Collisions are resolved by
//! linear probing and deletions leave tombstones, so every operation touches
//! one contiguous allocation.
//!
//! # Usage
//!
//! ```
//! use strtab::StrTab;
//!
//! let values: [i32; 3] = [1, 2, 3];
//!
//! // Create a table with the default configuration (16 slots)
//! let mut table: StrTab<&i32> = StrTab::new();
//!
//! // Insert or update with `Some`
//! table.put_or_delete("one", Some(&values[0]));
//! table.put_or_delete("two", Some(&values[1]));
//! table.put_or_delete("two", Some(&values[2]));
//!
//! assert_eq!(table.get("one"), Some(&1));
//! assert_eq!(table.get("two"), Some(&3));
//! assert_eq!(table.len(), 2);
//!
//! // Delete with `None`
//! table.put_or_delete("one", None);
//!
//! assert_eq!(table.get("one"), None);
//! assert_eq!(table.len(), 1);
//! ```
//!
//! # Values
//!
//! Values must be [`Copy`]: references, raw or [`NonNull`] pointers, integer
//! handles and the like. The table hands out copies and never runs a
//! destructor on a value, so whatever a value refers to stays owned by the
//! caller. Dropping the table releases the slot array and the key copies it
//! holds, nothing else.
//!
//! # Keys
//!
//! Keys are `&str` and compared byte for byte. The table stores its own copy
//! of each key, so the caller's buffer may be freed or reused as soon as an
//! insert returns.
//!
//! # Growth
//!
//! The table starts at [`Params::INITIAL`] slots (16 by default) and doubles
//! before an insert of a new key would push the load factor past
//! [`Params::THRESHOLD`] (0.8 by default). It never shrinks.
//!
//! ```
//! use strtab::StrTab;
//!
//! let mut table: StrTab<usize> = StrTab::new();
//!
//! for index in 1..=20 {
//!   table.insert(&index.to_string(), index);
//!   assert!(table.load_factor() <= 0.8);
//! }
//!
//! assert_eq!(table.capacity(), 32);
//! ```
//!
//! # Configuration
//!
//! Initial capacity and threshold are configured at compile time through the
//! [`Params`] trait. For custom initial capacities, use [`ConstParams`]:
//!
//! ```
//! use strtab::{ConstParams, StrTab};
//!
//! let table: StrTab<u64, ConstParams<512>> = StrTab::new();
//! assert_eq!(table.capacity(), 512);
//! ```
//!
//! Capacity is always rounded up to the nearest power of two and clamped
//! to the range <code>[Capacity::MIN]..=[Capacity::MAX]</code>.
//!
//! # Concurrency
//!
//! Mutation requires `&mut StrTab`. Callers sharing a table between threads
//! serialize access themselves, for example with a `Mutex`.
//!
//! # Errors
//!
//! There are none to handle. Looking up or deleting an absent key is a normal
//! `None`/no-op. Allocation failure aborts and growing beyond
//! [`Capacity::MAX`] panics.
//!
//! See the [`implementation`] module for the probing, deletion and growth
//! algorithms.
//!
//! [Capacity::MAX]: crate::config::Capacity::MAX
//! [Capacity::MIN]: crate::config::Capacity::MIN
//! [`Capacity::MAX`]: crate::config::Capacity::MAX
//! [`ConstParams`]: crate::config::ConstParams
//! [`NonNull`]: core::ptr::NonNull
//! [`Params`]: crate::config::Params
//! [`Params::INITIAL`]: crate::config::Params::INITIAL
//! [`Params::THRESHOLD`]: crate::config::Params::THRESHOLD
//!

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod hash;
mod params;
mod probe;
mod public;
mod slot;
mod table;
mod utils;

pub mod implementation {
  #![doc = include_str!("../IMPLEMENTATION.md")]
}

pub mod config {
  //! Configuration parameters which can be used to override the default table
  //! settings.

  pub use crate::params::Capacity;
  pub use crate::params::ConstParams;
  pub use crate::params::DebugParams;
  pub use crate::params::DefaultParams;
  pub use crate::params::Params;
  pub use crate::params::ParamsExt;
  pub use crate::params::Threshold;
}

#[doc(inline)]
pub use self::config::Capacity;

#[doc(inline)]
pub use self::config::ConstParams;

#[doc(inline)]
pub use self::config::DefaultParams;

#[doc(inline)]
pub use self::config::Params;

#[doc(inline)]
pub use self::config::ParamsExt;

#[doc(inline)]
pub use self::config::Threshold;

pub use self::hash::djb2;

pub use self::public::StrTab;
