use std::{fmt, marker::PhantomData};

use crate::{MatchBox, Matchable};

/// Names a property of type `V` attached to the variants of `T`.
///
/// Keys are usually generated with `#[matchable(property(name: Type))]`, which
/// adds an associated constant `T::NAME`.
pub struct PropertyKey<T, V> {
    name: &'static str,
    _marker: PhantomData<fn() -> (T, V)>,
}

impl<T, V> PropertyKey<T, V> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T, V> Clone for PropertyKey<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for PropertyKey<T, V> {}

impl<T, V> fmt::Debug for PropertyKey<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyKey").field(&self.name).finish()
    }
}

type Observer<V> = Box<dyn FnMut(&V)>;
type VectObserver<V> = Box<dyn FnMut(&[V])>;

/// Storage for one property across all variants of `T`, and nil.
///
/// Each variant has a scalar value and a list value, both defaulted until set,
/// and separate observer lists for each. Observers run synchronously, in
/// registration order, every time the matching setter is called.
pub struct Property<T, V> {
    scalar: MatchBox<T, V>,
    vect: MatchBox<T, Vec<V>>,
    observers: MatchBox<T, Vec<Observer<V>>>,
    vect_observers: MatchBox<T, Vec<VectObserver<V>>>,
}

impl<T: Matchable, V: Default> Default for Property<T, V> {
    fn default() -> Self {
        Self {
            scalar: MatchBox::default(),
            vect: MatchBox::default(),
            observers: MatchBox::default(),
            vect_observers: MatchBox::default(),
        }
    }
}

impl<T: Matchable, V> Property<T, V> {
    pub fn get(&self, variant: impl Into<Option<T>>) -> &V {
        self.scalar.at(variant)
    }

    pub fn get_vect(&self, variant: impl Into<Option<T>>) -> &[V] {
        self.vect.at(variant)
    }

    pub fn is_set(&self, variant: impl Into<Option<T>>) -> bool {
        self.scalar.is_set(variant)
    }

    pub fn set(&mut self, variant: impl Into<Option<T>>, value: V) {
        let variant = variant.into();
        self.scalar.set(variant, value);
        let value = self.scalar.at(variant);
        if let Some(observers) = self.observers.get_mut(variant) {
            for observer in observers {
                observer(value);
            }
        }
    }

    pub fn set_vect(&mut self, variant: impl Into<Option<T>>, values: Vec<V>) {
        let variant = variant.into();
        self.vect.set(variant, values);
        let values = self.vect.at(variant);
        if let Some(observers) = self.vect_observers.get_mut(variant) {
            for observer in observers {
                observer(values);
            }
        }
    }

    /// Resets the scalar value of `variant` to the default. Observers are not run.
    pub fn unset(&mut self, variant: impl Into<Option<T>>) -> Option<V> {
        self.scalar.unset(variant)
    }

    pub fn add_observer(&mut self, variant: impl Into<Option<T>>, observer: impl FnMut(&V) + 'static) {
        self.observers
            .get_or_insert_with(variant, Vec::new)
            .push(Box::new(observer));
    }

    pub fn add_vect_observer(
        &mut self,
        variant: impl Into<Option<T>>,
        observer: impl FnMut(&[V]) + 'static,
    ) {
        self.vect_observers
            .get_or_insert_with(variant, Vec::new)
            .push(Box::new(observer));
    }

    /// Variants with a scalar value set, in declaration order.
    pub fn currently_set(&self) -> Vec<T> {
        self.scalar.currently_set()
    }
}

impl<T: Matchable, V: fmt::Debug> fmt::Debug for Property<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("scalar", &self.scalar)
            .field("vect", &self.vect)
            .finish_non_exhaustive()
    }
}
