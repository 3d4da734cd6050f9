use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
};

use crate::{lexical, Flags, Matchable, Property, PropertyKey, Unmatchable};

/// Mutable state attached to the variants of `T`: current views, flags and properties.
///
/// A registry starts with every declared variant in both views, no flags, and the
/// property values given at declaration. Everything that holds the same registry
/// shares its flags and properties; separate registries are fully independent.
///
/// Registries are not synchronized. Wrap one in a lock to share it between threads.
///
/// ```rust
/// use matchable::{matchable, Registry};
///
/// #[matchable]
/// pub enum Color { Magenta, Cyan, Yellow }
///
/// #[matchable(property(color: Option<Color>))]
/// pub enum Setting {
///     #[matchable(color = Some(Color::Yellow))]
///     FeatureX,
///     FeatureY,
/// }
///
/// fn main() {
///     let mut settings = Registry::<Setting>::new();
///     assert_eq!(settings.get(&Setting::COLOR, Setting::FeatureX), Some(Color::Yellow));
///     assert_eq!(settings.get(&Setting::COLOR, Setting::FeatureY), None);
///
///     settings.add_observer(&Setting::COLOR, Setting::FeatureY, |color| {
///         println!("FeatureY is now {color:?}");
///     });
///     settings.set(&Setting::COLOR, Setting::FeatureY, Some(Color::Cyan));
///
///     settings.flag(Setting::FeatureY);
///     assert_eq!(settings.flagged_variants(), vec![Setting::FeatureY]);
///
///     {
///         let scoped = settings.unmatch([Setting::FeatureX]);
///         assert_eq!(scoped.variants(), &[Setting::FeatureY]);
///     }
///     assert_eq!(settings.variants().len(), 2);
/// }
/// ```
pub struct Registry<T: Matchable> {
    pub(crate) by_declaration: Vec<T>,
    pub(crate) by_lexical: Vec<T>,
    flags: Flags<T>,
    properties: HashMap<(&'static str, TypeId), Box<dyn Any>>,
}

impl<T: Matchable> Registry<T> {
    pub fn new() -> Self {
        let mut registry = Self {
            by_declaration: T::variants().to_vec(),
            by_lexical: T::variants_by_lexical_order().to_vec(),
            flags: Flags::default(),
            properties: HashMap::new(),
        };
        T::init_properties(&mut registry);
        registry
    }

    /// The current variants in declaration order.
    pub fn variants(&self) -> &[T] {
        &self.by_declaration
    }

    /// The current variants in lexical order.
    pub fn variants_by_lexical_order(&self) -> &[T] {
        &self.by_lexical
    }

    pub fn contains(&self, variant: T) -> bool {
        self.by_declaration.contains(&variant)
    }

    /// The current variant whose display string is exactly `s`.
    pub fn from_string(&self, s: &str) -> Option<T> {
        lexical::find(&self.by_lexical, s)
    }

    /// Indexes the current declaration-order view.
    pub fn from_declaration_index(&self, index: usize) -> Option<T> {
        self.by_declaration.get(index).copied()
    }

    /// Indexes the current lexical-order view.
    pub fn from_lexical_index(&self, index: usize) -> Option<T> {
        self.by_lexical.get(index).copied()
    }

    pub fn from_identifier_string(&self, s: &str) -> Option<T> {
        self.by_declaration
            .iter()
            .copied()
            .find(|v| v.identifier_str() == s)
    }

    /// Hides `removed` from both views until the returned guard is dropped.
    ///
    /// The guard dereferences to this registry, so scopes nest:
    /// `registry.unmatch([a]).unmatch([b])`.
    pub fn unmatch<I>(&mut self, removed: I) -> Unmatchable<'_, T>
    where
        I: IntoIterator<Item = T>,
    {
        Unmatchable::new(self, removed)
    }

    pub fn flag(&mut self, variant: impl Into<Option<T>>) {
        self.flags.insert(variant);
    }

    pub fn unflag(&mut self, variant: impl Into<Option<T>>) {
        self.flags.unset(variant);
    }

    pub fn set_flagged(&mut self, variant: impl Into<Option<T>>, flagged: bool) {
        if flagged {
            self.flag(variant);
        } else {
            self.unflag(variant);
        }
    }

    /// Flips the flag of `variant`, returning whether it is flagged afterwards.
    pub fn toggle_flag(&mut self, variant: impl Into<Option<T>>) -> bool {
        self.flags.toggle(variant)
    }

    pub fn is_flagged(&self, variant: impl Into<Option<T>>) -> bool {
        self.flags.is_set(variant)
    }

    /// The flagged variants of the current view, in declaration order. A flagged nil is not included.
    pub fn flagged_variants(&self) -> Vec<T> {
        self.by_declaration
            .iter()
            .copied()
            .filter(|&variant| self.flags.is_set(variant))
            .collect()
    }

    pub fn clear_flags(&mut self) {
        self.flags.clear();
    }

    pub fn flags(&self) -> &Flags<T> {
        &self.flags
    }

    /// The storage of a property, if anything has touched it yet.
    pub fn property<V: 'static>(&self, key: &PropertyKey<T, V>) -> Option<&Property<T, V>> {
        self.properties
            .get(&(key.name(), TypeId::of::<V>()))
            .and_then(|property| property.downcast_ref::<Property<T, V>>())
    }

    /// The storage of a property, created empty on first use.
    pub fn property_mut<V: Default + 'static>(
        &mut self,
        key: &PropertyKey<T, V>,
    ) -> &mut Property<T, V> {
        let property = self
            .properties
            .entry((key.name(), TypeId::of::<V>()))
            .or_insert_with(|| Box::new(Property::<T, V>::default()));
        match property.downcast_mut::<Property<T, V>>() {
            Some(property) => property,
            None => unreachable!("properties are keyed by their value type"),
        }
    }

    /// The value of a property for `variant`, or the default if it was never set.
    pub fn get<V: Clone + Default + 'static>(
        &self,
        key: &PropertyKey<T, V>,
        variant: impl Into<Option<T>>,
    ) -> V {
        self.property(key)
            .map(|property| property.get(variant).clone())
            .unwrap_or_default()
    }

    /// The list value of a property for `variant`, or empty if it was never set.
    pub fn get_vect<V: Clone + 'static>(
        &self,
        key: &PropertyKey<T, V>,
        variant: impl Into<Option<T>>,
    ) -> Vec<V> {
        self.property(key)
            .map(|property| property.get_vect(variant).to_vec())
            .unwrap_or_default()
    }

    /// Stores a property value for `variant` and runs its observers.
    pub fn set<V: Default + 'static>(
        &mut self,
        key: &PropertyKey<T, V>,
        variant: impl Into<Option<T>>,
        value: V,
    ) {
        self.property_mut(key).set(variant, value);
    }

    /// Stores a property list value for `variant` and runs its list observers.
    pub fn set_vect<V: Default + 'static>(
        &mut self,
        key: &PropertyKey<T, V>,
        variant: impl Into<Option<T>>,
        values: Vec<V>,
    ) {
        self.property_mut(key).set_vect(variant, values);
    }

    pub fn add_observer<V: Default + 'static>(
        &mut self,
        key: &PropertyKey<T, V>,
        variant: impl Into<Option<T>>,
        observer: impl FnMut(&V) + 'static,
    ) {
        self.property_mut(key).add_observer(variant, observer);
    }

    pub fn add_vect_observer<V: Default + 'static>(
        &mut self,
        key: &PropertyKey<T, V>,
        variant: impl Into<Option<T>>,
        observer: impl FnMut(&[V]) + 'static,
    ) {
        self.property_mut(key).add_vect_observer(variant, observer);
    }
}

impl<T: Matchable> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Matchable> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("type", &T::TYPE_NAME)
            .field("variants", &self.by_declaration)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
