//! Builds matchable declarations at runtime and saves them as text, or loads them back.
//!
//! The text is one statement per line:
//!
//! | Statement | Meaning |
//! |-----------|---------|
//! | `MATCHABLE_FWD(T)` | Declares `T` without variants |
//! | `MATCHABLE(T, v..)` | Declares `T` with variants |
//! | `MATCHABLE_GROW(T, v..)` | Adds variants to `T` |
//! | `SPREADxN_MATCHABLE(Ty1, n1, .., TyN, nN, T, v..)` | Declares `T` with `N` spreads and variants |
//! | `SPREADxN_MATCHABLE_GROW(..)` | Adds spreads and variants to `T` |
//! | `SET_SPREAD(T, v, spread, value)` | Sets a spread value |
//! | `SET_SPREAD_VECT(T, v, spread, values..)` | Sets a spread list |
//!
//! Blank lines and `//` comments are ignored. Arguments may not contain parentheses or commas,
//! and whitespace inside them is dropped.
//!
//! ```rust
//! use matchable::{
//!     maker::{GrowMode, MatchableMaker, SaveContent},
//!     Flags,
//! };
//!
//! let mut maker = MatchableMaker::default();
//! let floor = maker.grab("Floor");
//! floor.add_variant("Tile");
//! floor.add_variant("Carpet");
//!
//! let room = maker.grab("Room");
//! room.add_variant("Bathroom");
//! room.add_spread("Floor", "floor");
//! room.set_spread("Bathroom", "floor", "Tile").unwrap();
//!
//! let mut text = Vec::new();
//! let content = Flags::from_variants([SaveContent::Matchables]);
//! maker.write_to(&mut text, &content, GrowMode::Wrap).unwrap();
//!
//! let text = String::from_utf8(text).unwrap();
//! assert!(text.contains("SPREADx1_MATCHABLE(Floor, floor, Room, Bathroom)\n"));
//!
//! let parsed = MatchableMaker::parse(&text);
//! assert!(parsed.errors.is_empty());
//! assert_eq!(parsed.maker, maker);
//! ```

use std::collections::BTreeMap;

mod load;
mod save;

pub use load::{LoadError, Parsed, SyntaxError, SyntaxErrorKind};
pub use save::SaveError;

use crate::matchable;

/// What [MatchableMaker::save_as] writes.
#[matchable]
pub enum SaveContent {
    /// A `generated_matchable` type whose variants are the names of every declared type
    GeneratedMatchable,
    /// The declarations themselves
    Matchables,
}

/// How [MatchableMaker::save_as] lays out declarations.
#[matchable]
pub enum GrowMode {
    /// Declares each type once, in dependency order, continuing long variant lists with
    /// `MATCHABLE_GROW`
    Wrap,
    /// Only grows types, so statements can be appended to in any order
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SetSpreadError {
    #[error("no spread with that name was added")]
    SpreadLookupFailed,
    #[error("no variant with that name was added")]
    VariantLookupFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadDecl {
    /// The spread type as written, for example `Floor` or `Floor::Type`
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SpreadValue {
    name: String,
    value: Option<String>,
    values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDecl {
    name: String,
    spreads: Vec<SpreadValue>,
}

impl VariantDecl {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spread(&self, spread: &str) -> Option<&str> {
        self.spread_value(spread)
            .and_then(|value| value.value.as_deref())
    }

    pub fn spread_vect(&self, spread: &str) -> &[String] {
        self.spread_value(spread)
            .map_or(&[], |value| value.values.as_slice())
    }

    fn spread_value(&self, spread: &str) -> Option<&SpreadValue> {
        self.spreads.iter().find(|value| value.name == spread)
    }

    fn spread_value_mut(&mut self, spread: &str) -> &mut SpreadValue {
        match self.spreads.iter().position(|value| value.name == spread) {
            Some(index) => &mut self.spreads[index],
            None => {
                self.spreads.push(SpreadValue {
                    name: spread.to_owned(),
                    value: None,
                    values: Vec::new(),
                });
                let last = self.spreads.len() - 1;
                &mut self.spreads[last]
            }
        }
    }
}

/// One type being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchableDecl {
    name: String,
    variants: Vec<VariantDecl>,
    spreads: Vec<SpreadDecl>,
}

impl MatchableDecl {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            variants: Vec::new(),
            spreads: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[VariantDecl] {
        &self.variants
    }

    pub fn variant(&self, name: &str) -> Option<&VariantDecl> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    pub fn spreads(&self) -> &[SpreadDecl] {
        &self.spreads
    }

    /// Appends a variant unless one with the same name exists.
    pub fn add_variant(&mut self, name: &str) {
        if self.variant(name).is_none() {
            self.variants.push(VariantDecl {
                name: name.to_owned(),
                spreads: Vec::new(),
            });
        }
    }

    /// Adds a spread, returning false if one with the same name exists.
    pub fn add_spread(&mut self, ty: &str, name: &str) -> bool {
        if self.spreads.iter().any(|spread| spread.name == name) {
            return false;
        }
        self.spreads.push(SpreadDecl {
            ty: ty.to_owned(),
            name: name.to_owned(),
        });
        true
    }

    pub fn set_spread(
        &mut self,
        variant: &str,
        spread: &str,
        value: &str,
    ) -> Result<(), SetSpreadError> {
        self.lookup(variant, spread)?.value = Some(value.to_owned());
        Ok(())
    }

    pub fn set_spread_vect<I, S>(
        &mut self,
        variant: &str,
        spread: &str,
        values: I,
    ) -> Result<(), SetSpreadError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lookup(variant, spread)?.values = values.into_iter().map(Into::into).collect();
        Ok(())
    }

    fn lookup(&mut self, variant: &str, spread: &str) -> Result<&mut SpreadValue, SetSpreadError> {
        if !self.spreads.iter().any(|decl| decl.name == spread) {
            return Err(SetSpreadError::SpreadLookupFailed);
        }
        let variant = self
            .variants
            .iter_mut()
            .find(|decl| decl.name == variant)
            .ok_or(SetSpreadError::VariantLookupFailed)?;
        Ok(variant.spread_value_mut(spread))
    }

    /// The other declared types this one spreads to.
    fn dependencies<'m>(&'m self, maker: &'m MatchableMaker) -> impl Iterator<Item = &'m str> {
        self.spreads.iter().filter_map(move |spread| {
            let ty = spread.ty.strip_suffix("::Type").unwrap_or(&spread.ty);
            (ty != self.name && maker.matchables.contains_key(ty)).then_some(ty)
        })
    }
}

/// A set of [MatchableDecl]s, keyed and saved in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchableMaker {
    matchables: BTreeMap<String, MatchableDecl>,
}

impl MatchableMaker {
    /// The declaration named `name`, created empty if needed.
    pub fn grab(&mut self, name: &str) -> &mut MatchableDecl {
        self.matchables
            .entry(name.to_owned())
            .or_insert_with(|| MatchableDecl::new(name))
    }

    pub fn get(&self, name: &str) -> Option<&MatchableDecl> {
        self.matchables.get(name)
    }

    pub fn matchables(&self) -> impl Iterator<Item = &MatchableDecl> {
        self.matchables.values()
    }

    pub fn len(&self) -> usize {
        self.matchables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchables.is_empty()
    }
}
