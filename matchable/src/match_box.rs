use std::{fmt, marker::PhantomData, ops::Index};

use crate::{FlowControl, Matchable};

/// Dense associative array keyed by a [Matchable] type.
///
/// Every variant of `K` owns one slot, addressed by its declaration index, and nil
/// (`None`) owns one more. A slot is either set or unset. Reading an unset slot
/// yields the fill value given at construction.
///
/// Keys are taken as `impl Into<Option<K>>`, so both `box.at(Color::Red)` and
/// `box.at(None)` work.
///
/// ```rust
/// use matchable::{matchable, MatchBox};
///
/// #[matchable]
/// enum Color { Red, Black }
///
/// let mut scores = MatchBox::new(-1);
/// scores.set(Color::Red, 10);
///
/// assert_eq!(*scores.at(Color::Red), 10);
/// assert_eq!(*scores.at(Color::Black), -1);
/// assert!(!scores.is_set(None));
/// assert_eq!(scores.currently_set(), vec![Color::Red]);
/// ```
pub struct MatchBox<K, V> {
    slots: Vec<Option<V>>,
    nil: Option<V>,
    fill: V,
    _key: PhantomData<fn(K) -> K>,
}

/// A set of variants, with a slot for nil.
pub type Flags<K> = MatchBox<K, ()>;

impl<K: Matchable, V> MatchBox<K, V> {
    /// Creates an empty box where unset slots read as `fill`.
    pub fn new(fill: V) -> Self {
        let mut slots = Vec::with_capacity(K::COUNT);
        slots.resize_with(K::COUNT, || None);
        Self {
            slots,
            nil: None,
            fill,
            _key: PhantomData,
        }
    }

    /// Creates a box with `fill` for unset slots, then sets each entry in order.
    pub fn with_entries<I>(fill: V, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut match_box = Self::new(fill);
        match_box.extend(entries);
        match_box
    }

    fn slot(&self, key: Option<K>) -> &Option<V> {
        match key {
            Some(key) => &self.slots[key.declaration_index()],
            None => &self.nil,
        }
    }

    fn slot_mut(&mut self, key: Option<K>) -> &mut Option<V> {
        match key {
            Some(key) => &mut self.slots[key.declaration_index()],
            None => &mut self.nil,
        }
    }

    /// The value stored for `key`, or the fill value if the slot is unset.
    pub fn at(&self, key: impl Into<Option<K>>) -> &V {
        self.slot(key.into()).as_ref().unwrap_or(&self.fill)
    }

    /// The value stored for `key`, if the slot is set.
    pub fn get(&self, key: impl Into<Option<K>>) -> Option<&V> {
        self.slot(key.into()).as_ref()
    }

    /// Mutable access to the value stored for `key`, if the slot is set.
    pub fn get_mut(&mut self, key: impl Into<Option<K>>) -> Option<&mut V> {
        self.slot_mut(key.into()).as_mut()
    }

    /// Mutable access to the slot for `key`, setting it to `f()` first if it is unset.
    pub fn get_or_insert_with(&mut self, key: impl Into<Option<K>>, f: impl FnOnce() -> V) -> &mut V {
        self.slot_mut(key.into()).get_or_insert_with(f)
    }

    /// Stores `value` for `key` and marks the slot as set.
    pub fn set(&mut self, key: impl Into<Option<K>>, value: V) {
        *self.slot_mut(key.into()) = Some(value);
    }

    /// Marks the slot for `key` as unset, returning the value it held.
    pub fn unset(&mut self, key: impl Into<Option<K>>) -> Option<V> {
        self.slot_mut(key.into()).take()
    }

    pub fn is_set(&self, key: impl Into<Option<K>>) -> bool {
        self.slot(key.into()).is_some()
    }

    /// The fill value returned for unset slots.
    pub fn fill(&self) -> &V {
        &self.fill
    }

    /// All set variants, in declaration order. nil is not included.
    pub fn currently_set(&self) -> Vec<K> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Set variants with their values, in declaration order. nil is not included.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        K::variants()
            .iter()
            .filter_map(|&key| self.slots[key.declaration_index()].as_ref().map(|v| (key, v)))
    }

    /// Unsets every slot, including nil.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.nil = None;
    }

    /// Runs the handler stored for `key`, if any.
    pub fn dispatch(&mut self, key: impl Into<Option<K>>)
    where
        V: FnMut(),
    {
        if let Some(handler) = self.get_mut(key) {
            handler();
        }
    }

    /// Runs the handler stored for `key`, if any, and returns the flow control it requested.
    pub fn dispatch_with_flow_control(&mut self, key: impl Into<Option<K>>) -> FlowControl
    where
        V: FnMut(&mut FlowControl),
    {
        let mut flow = FlowControl::default();
        if let Some(handler) = self.get_mut(key) {
            handler(&mut flow);
        }
        flow
    }
}

impl<K: Matchable, V: Clone> MatchBox<K, V> {
    /// Mutable access to the slot for `key`. An unset slot is set to a copy of the fill value first.
    pub fn at_mut(&mut self, key: impl Into<Option<K>>) -> &mut V {
        let key = key.into();
        if self.slot(key).is_none() {
            let fill = self.fill.clone();
            *self.slot_mut(key) = Some(fill);
        }
        match self.slot_mut(key) {
            Some(value) => value,
            None => unreachable!("slot was set above"),
        }
    }
}

impl<K: Matchable> MatchBox<K, ()> {
    pub fn from_variants<I>(variants: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut flags = Self::new(());
        for variant in variants {
            flags.insert(variant);
        }
        flags
    }

    /// Marks `key` as set.
    pub fn insert(&mut self, key: impl Into<Option<K>>) {
        self.set(key, ());
    }

    /// Flips the slot for `key`, returning whether it is set afterwards.
    pub fn toggle(&mut self, key: impl Into<Option<K>>) -> bool {
        let slot = self.slot_mut(key.into());
        *slot = if slot.is_some() { None } else { Some(()) };
        slot.is_some()
    }
}

impl<K: Matchable, V: Default> Default for MatchBox<K, V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<K: Matchable, V: Clone> Clone for MatchBox<K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            nil: self.nil.clone(),
            fill: self.fill.clone(),
            _key: PhantomData,
        }
    }
}

impl<K: Matchable, V> Extend<(K, V)> for MatchBox<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: Matchable, V: Default> FromIterator<(K, V)> for MatchBox<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::with_entries(V::default(), iter)
    }
}

/// Slot-by-slot comparison, nil included. Fill values are not compared.
impl<K: Matchable, V: PartialEq> PartialEq for MatchBox<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots && self.nil == other.nil
    }
}

impl<K: Matchable, V: Eq> Eq for MatchBox<K, V> {}

impl<K: Matchable, V> Index<K> for MatchBox<K, V> {
    type Output = V;

    fn index(&self, key: K) -> &V {
        self.at(key)
    }
}

impl<K: Matchable, V: fmt::Debug> fmt::Debug for MatchBox<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.iter() {
            map.entry(&key.as_str(), value);
        }
        if let Some(value) = &self.nil {
            map.entry(&"nil", value);
        }
        map.finish()
    }
}
