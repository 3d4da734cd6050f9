//! Variants serialize as their display strings and deserialize with [Matchable::from_string].
//!
//! Use `#[matchable(serde)]` to implement `Serialize` and `Deserialize` on the type itself, or
//! these functions with `#[serde(with = "matchable::serde")]` on a field. [option] does the
//! same for `Option<T>` fields, where nil is `null`.
//!
//! ```rust
//! use matchable::matchable;
//!
//! #[matchable]
//! pub enum Suit { Clubs, Diamonds, Hearts, Spades }
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! pub struct Card {
//!     #[serde(with = "matchable::serde")]
//!     suit: Suit,
//!     #[serde(with = "matchable::serde::option")]
//!     trump: Option<Suit>,
//! }
//!
//! fn main() -> Result<(), serde_json::Error> {
//!     let card = Card { suit: Suit::Hearts, trump: None };
//!     let json = serde_json::to_string(&card)?;
//!     assert_eq!(json, r#"{"suit":"Hearts","trump":null}"#);
//!
//!     let card: Card = serde_json::from_str(r#"{"suit":"Spades","trump":"Clubs"}"#)?;
//!     assert_eq!(card.suit, Suit::Spades);
//!     assert_eq!(card.trump, Some(Suit::Clubs));
//!     Ok(())
//! }
//! ```

use crate::Matchable;

pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Matchable,
    S: serde::Serializer,
{
    serializer.serialize_str(value.as_str())
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Matchable,
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_str(__private::Visitor::<T>::default())
}

/// The same as the parent module, for `Option<T>` with nil as `null`.
pub mod option {
    use serde::Deserialize as _;

    use crate::Matchable;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Matchable,
        S: serde::Serializer,
    {
        match value {
            Some(value) => serializer.serialize_some(value.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Matchable,
        D: serde::Deserializer<'de>,
    {
        Option::<super::__private::Named<T>>::deserialize(deserializer)
            .map(|named| named.map(|named| named.0))
    }
}

#[doc(hidden)]
pub mod __private {
    use std::{fmt, marker::PhantomData};

    pub use ::serde as serde_crate;

    use crate::Matchable;

    pub struct Visitor<T>(PhantomData<T>);

    impl<T> Default for Visitor<T> {
        fn default() -> Self {
            Self(Default::default())
        }
    }

    impl<T: Matchable> serde::de::Visitor<'_> for Visitor<T> {
        type Value = T;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "a variant of {}", T::TYPE_NAME)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            T::from_string(value).ok_or_else(|| {
                serde::de::Error::invalid_value(serde::de::Unexpected::Str(value), &self)
            })
        }
    }

    /// Deserializes through [Visitor], for use inside other containers.
    pub struct Named<T>(pub T);

    impl<'de, T: Matchable> serde::Deserialize<'de> for Named<T> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            super::deserialize(deserializer).map(Named)
        }
    }
}
