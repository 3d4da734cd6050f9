//! Closed variant types with reflection, dense lookup tables and scoped removal.
//! * Two orders - Every variant knows its declaration index and its lexical index, and
//!   can be found by display string with a binary search.
//! * Lookup tables - [MatchBox] is an O(1) map keyed by a variant type, with a slot for nil.
//! * Properties & flags - A [Registry] attaches typed, observable properties and flags to
//!   every variant of a type.
//! * Scoped removal - [Unmatchable] hides variants from a registry's views until it is dropped.
//! * Composition - Types can merge other types' variants, and spread each variant to a
//!   fixed value of another type.
//! ```rust
//! use matchable::{matchable, Matchable};
//!
//! #[matchable]
//! pub enum TimeUnit {
//!     Seconds,
//!     Minutes,
//!     Hours,
//!     Days,
//!     Weeks,
//! }
//!
//! fn main() {
//!     // Declaration order
//!     assert_eq!(TimeUnit::Hours.declaration_index(), 2);
//!     assert_eq!(TimeUnit::from_declaration_index(4), Some(TimeUnit::Weeks));
//!     assert_eq!(TimeUnit::from_declaration_index(5), None);
//!
//!     // Lexical order
//!     assert_eq!(TimeUnit::Days.lexical_index(), 0);
//!     assert_eq!(TimeUnit::variants_by_lexical_order().last(), Some(&TimeUnit::Weeks));
//!
//!     // Strings
//!     assert_eq!(TimeUnit::from_string("Minutes"), Some(TimeUnit::Minutes));
//!     assert_eq!(TimeUnit::from_string("Fortnights"), None);
//!     assert_eq!(TimeUnit::Seconds.to_string(), "Seconds");
//! }
//! ```
//!
//! # Declaring
//! The [macro@matchable] attribute accepts a fieldless-or-merging enum. Options may be given
//! on the attribute itself or in further `#[matchable(...)]` attributes on the enum.
//! `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Debug`, `PartialOrd`, `Ord` and `Display`
//! are always implemented; do not derive them yourself.
//!
//! Variants can be renamed, which changes their display string but not their identifier string.
//! Raw identifiers display without their `r#` prefix.
//! ```rust
//! use matchable::{matchable, Matchable};
//!
//! #[matchable]
//! enum SpaceComplexity {
//!     #[matchable(rename = "O(1)")]
//!     Constant,
//!     #[matchable(rename = "O(n)")]
//!     Linear,
//!     r#Box,
//! }
//!
//! fn main() {
//!     assert_eq!(SpaceComplexity::from_string("O(n)"), Some(SpaceComplexity::Linear));
//!     assert_eq!(SpaceComplexity::Linear.identifier_str(), "Linear");
//!     assert_eq!(SpaceComplexity::from_identifier_string("Constant"), Some(SpaceComplexity::Constant));
//!     assert_eq!(SpaceComplexity::r#Box.as_str(), "Box");
//! }
//! ```
//!
//! # Spreads
//! A spread maps each variant to a fixed value of another type, decided at declaration.
//! Variants without a value spread to `None`.
//! ```rust
//! use matchable::matchable;
//!
//! #[matchable]
//! pub enum Floor { Carpet, Concrete, Tile }
//!
//! #[matchable(spread(floor: Floor), spread_vect(neighbors: Room))]
//! pub enum Room {
//!     #[matchable(floor = Floor::Tile, neighbors = [Room::Hallway])]
//!     Bathroom,
//!     #[matchable(floor = Floor::Concrete)]
//!     Garage,
//!     #[matchable(neighbors = [Room::Bathroom, Room::Garage])]
//!     Hallway,
//! }
//!
//! fn main() {
//!     assert_eq!(Room::Bathroom.floor(), Some(Floor::Tile));
//!     assert_eq!(Room::Hallway.floor(), None);
//!     assert_eq!(Room::Hallway.neighbors(), &[Room::Bathroom, Room::Garage]);
//! }
//! ```
//!
//! # Merging
//! A single-field tuple variant merges every variant of another matchable type. The merged
//! variants keep their display strings, and convert with `From` and `TryFrom`.
//! ```rust
//! use matchable::{matchable, Matchable};
//!
//! #[matchable]
//! pub enum Outcome { Ok, Err }
//!
//! #[matchable]
//! pub enum Failure { AlreadyDone, OutOfRange }
//!
//! #[matchable]
//! pub enum Merged {
//!     Outcome(Outcome),
//!     Failure(Failure),
//! }
//!
//! fn main() {
//!     let merged: Merged = Failure::OutOfRange.into();
//!     assert_eq!(merged.declaration_index(), 3);
//!     assert_eq!(Merged::from_string("Err"), Some(Merged::Outcome(Outcome::Err)));
//!     assert_eq!(Failure::try_from(merged), Ok(Failure::OutOfRange));
//! }
//! ```
//!
//! # Properties, flags and scoped removal
//! Mutable per-variant state lives in a [Registry], see its documentation.
//!
//! # serde
//! With the `serde` feature, `#[matchable(serde)]` serializes variants as their display
//! strings. The [serde](crate::serde) module offers the same for `#[serde(with = ...)]`.

#![allow(
    clippy::crate_in_macro_def,
    reason = "Generated code refers to the runtime by its crate name"
)]

// This allows us to use #[matchable] in this crate, which creates paths beginning with '::matchable'
extern crate self as matchable;

use std::{cmp::Ordering, fmt, hash::Hash};

mod flow;
pub mod lexical;
mod match_box;
mod property;
mod registry;
mod unmatchable;

#[cfg(feature = "maker")]
/// Saving and loading declarations as text
pub mod maker;

#[cfg(feature = "serde")]
/// serde helpers
pub mod serde;

pub use flow::FlowControl;
pub use lexical::Neighbors;
pub use match_box::{Flags, MatchBox};
pub use property::{Property, PropertyKey};
pub use registry::Registry;
pub use unmatchable::Unmatchable;

pub use matchable_macro::matchable;

#[doc(hidden)]
pub mod __private {
    #[cfg(feature = "serde")]
    pub use crate::serde::__private as serde;

    pub use std::{
        cmp::{Ord, Ordering, PartialOrd},
        convert::{From, TryFrom},
        fmt,
        option::Option::{self, None, Some},
        result::Result::{self, Err, Ok},
        str::FromStr,
        sync::OnceLock,
        vec::Vec,
    };

    use crate::Matchable;

    /// The immutable views of a type's declared variants, built once.
    pub struct Tables<T> {
        pub(crate) by_declaration: Vec<T>,
        pub(crate) by_lexical: Vec<T>,
        pub(crate) lexical_index: Vec<usize>,
    }

    impl<T: Matchable> Tables<T> {
        pub fn new(by_declaration: Vec<T>) -> Self {
            let mut by_lexical = by_declaration.clone();
            crate::lexical::sort(&mut by_lexical);

            let mut lexical_index = vec![0; by_declaration.len()];
            for (index, variant) in by_lexical.iter().enumerate() {
                lexical_index[variant.declaration_index()] = index;
            }

            Self {
                by_declaration,
                by_lexical,
                lexical_index,
            }
        }
    }
}

/// Implemented for all enums with the [macro@matchable] attribute.
///
/// Required items are generated; everything else is derived from them.
pub trait Matchable:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Sized + 'static
{
    /// The declared name of the type
    const TYPE_NAME: &'static str;

    /// The number of variants, merged variants included
    const COUNT: usize;

    #[doc(hidden)]
    fn tables() -> &'static __private::Tables<Self>;

    /// Position in declaration order, `0..Self::COUNT`
    fn declaration_index(self) -> usize;

    /// The display string
    fn as_str(self) -> &'static str;

    /// The identifier as declared
    fn identifier_str(self) -> &'static str;

    #[doc(hidden)]
    fn init_properties(_registry: &mut Registry<Self>) {}

    /// All variants in declaration order.
    fn variants() -> &'static [Self] {
        &Self::tables().by_declaration
    }

    /// All variants in lexical order.
    fn variants_by_lexical_order() -> &'static [Self] {
        &Self::tables().by_lexical
    }

    /// Position in lexical order.
    fn lexical_index(self) -> usize {
        Self::tables().lexical_index[self.declaration_index()]
    }

    /// The variant whose display string is exactly `s`.
    fn from_string(s: &str) -> Option<Self> {
        lexical::find(Self::variants_by_lexical_order(), s)
    }

    /// The variants around `s` in lexical order, and the exact match if one exists.
    fn from_string_with_neighbors(s: &str) -> Neighbors<Self> {
        lexical::neighbors(Self::variants_by_lexical_order(), s)
    }

    fn from_declaration_index(index: usize) -> Option<Self> {
        Self::variants().get(index).copied()
    }

    fn from_lexical_index(index: usize) -> Option<Self> {
        Self::variants_by_lexical_order().get(index).copied()
    }

    /// The variant whose identifier string is exactly `s`. This is a linear scan.
    fn from_identifier_string(s: &str) -> Option<Self> {
        Self::variants()
            .iter()
            .copied()
            .find(|v| v.identifier_str() == s)
    }

    /// Compares display strings with [lexical::lexical_cmp].
    fn lexical_cmp(self, other: Self) -> Ordering {
        lexical::lexical_cmp(self.as_str(), other.as_str())
    }

    fn lt_by_lexical(self, other: Self) -> bool {
        self.lexical_cmp(other) == Ordering::Less
    }

    fn lt_by_declaration(self, other: Self) -> bool {
        self.declaration_index() < other.declaration_index()
    }

    fn is_one_of(self, variants: &[Self]) -> bool {
        variants.contains(&self)
    }

    /// Runs the handler registered for this variant, if any.
    fn match_with<F: FnMut()>(self, handlers: &mut MatchBox<Self, F>) {
        handlers.dispatch(self);
    }

    /// Like [Matchable::match_with], returning `self` to allow chaining.
    fn match_then<F: FnMut()>(self, handlers: &mut MatchBox<Self, F>) -> Self {
        handlers.dispatch(self);
        self
    }

    /// Runs the handler registered for this variant, if any, and returns the loop control it requested.
    fn match_with_flow_control<F: FnMut(&mut FlowControl)>(
        self,
        handlers: &mut MatchBox<Self, F>,
    ) -> FlowControl {
        handlers.dispatch_with_flow_control(self)
    }
}

/// Helpers for `Option<T>`, where `None` is the nil value of `T`.
pub trait NilExt {
    fn is_nil(&self) -> bool;

    /// The display string, `"nil"` for `None`.
    fn as_str(&self) -> &'static str;

    fn declaration_index(&self) -> Option<usize>;

    fn lexical_index(&self) -> Option<usize>;
}

impl<T: Matchable> NilExt for Option<T> {
    fn is_nil(&self) -> bool {
        self.is_none()
    }

    fn as_str(&self) -> &'static str {
        self.map_or("nil", T::as_str)
    }

    fn declaration_index(&self) -> Option<usize> {
        self.map(T::declaration_index)
    }

    fn lexical_index(&self) -> Option<usize> {
        self.map(T::lexical_index)
    }
}

/// The `FromStr` error of matchable types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a variant of {type_name}")]
pub struct UnknownVariant {
    pub type_name: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new<T: Matchable>(value: &str) -> Self {
        Self {
            type_name: T::TYPE_NAME,
            value: value.to_owned(),
        }
    }
}
