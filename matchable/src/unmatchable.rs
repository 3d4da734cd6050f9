use std::ops::{Deref, DerefMut};

use crate::{Flags, Matchable, Registry};

/// Hides variants from a [Registry]'s views for as long as it lives.
///
/// Construction snapshots both views and installs filtered copies; dropping restores
/// the snapshot exactly. The guard borrows the registry mutably and dereferences to it,
/// so a nested scope can only be opened through the outer guard and is always dropped
/// first. Each guard restores the views that were current when it was created.
///
/// Only the views change. Declaration indices, lexical indices, flags and properties
/// of the hidden variants are untouched.
#[must_use = "variants are restored as soon as the guard is dropped"]
pub struct Unmatchable<'r, T: Matchable> {
    registry: &'r mut Registry<T>,
    saved_by_declaration: Vec<T>,
    saved_by_lexical: Vec<T>,
}

impl<'r, T: Matchable> Unmatchable<'r, T> {
    pub fn new<I>(registry: &'r mut Registry<T>, removed: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let removed = Flags::from_variants(removed);
        Self::retain(registry, |v| !removed.is_set(v))
    }

    /// Hides the current variants whose display string is one of `names`.
    ///
    /// Names are compared one by one against every variant, which is slower than
    /// [Unmatchable::new] but needs nothing beyond the strings. Unknown names are ignored.
    pub fn by_name<'n, I>(registry: &'r mut Registry<T>, names: I) -> Self
    where
        I: IntoIterator<Item = &'n str>,
    {
        let names: Vec<&str> = names.into_iter().collect();
        Self::retain(registry, |v| !names.contains(&v.as_str()))
    }

    fn retain(registry: &'r mut Registry<T>, keep: impl Fn(T) -> bool) -> Self {
        let saved_by_declaration = registry.by_declaration.clone();
        let saved_by_lexical = registry.by_lexical.clone();

        registry.by_declaration.retain(|&v| keep(v));
        registry.by_lexical.retain(|&v| keep(v));

        log::debug!(
            "unmatched {} of {} {} variants",
            saved_by_declaration.len() - registry.by_declaration.len(),
            saved_by_declaration.len(),
            T::TYPE_NAME,
        );

        Self {
            registry,
            saved_by_declaration,
            saved_by_lexical,
        }
    }
}

impl<T: Matchable> Deref for Unmatchable<'_, T> {
    type Target = Registry<T>;

    fn deref(&self) -> &Registry<T> {
        &*self.registry
    }
}

impl<T: Matchable> DerefMut for Unmatchable<'_, T> {
    fn deref_mut(&mut self) -> &mut Registry<T> {
        &mut *self.registry
    }
}

impl<T: Matchable> Drop for Unmatchable<'_, T> {
    fn drop(&mut self) {
        self.registry.by_declaration = std::mem::take(&mut self.saved_by_declaration);
        self.registry.by_lexical = std::mem::take(&mut self.saved_by_lexical);
        log::debug!("restored {} {} variants", self.registry.by_declaration.len(), T::TYPE_NAME);
    }
}

#[cfg(test)]
mod tests {
    use crate::{matchable, Matchable, Registry};

    #[matchable]
    enum Abc {
        A,
        B,
        C,
    }

    #[test]
    fn nested_scopes_restore_in_order() {
        let mut registry = Registry::<Abc>::new();
        {
            let mut outer = registry.unmatch([Abc::B]);
            assert_eq!(outer.variants(), &[Abc::A, Abc::C]);
            {
                let inner = outer.unmatch([Abc::A]);
                assert_eq!(inner.variants(), &[Abc::C]);
                assert_eq!(inner.variants_by_lexical_order(), &[Abc::C]);
            }
            assert_eq!(outer.variants(), &[Abc::A, Abc::C]);
            assert_eq!(outer.variants_by_lexical_order(), &[Abc::A, Abc::C]);
        }
        assert_eq!(registry.variants(), Abc::variants());
        assert_eq!(registry.variants_by_lexical_order(), Abc::variants_by_lexical_order());
    }

    #[test]
    fn indices_are_not_renumbered() {
        let mut registry = Registry::<Abc>::new();
        let scoped = registry.unmatch([Abc::A]);
        assert_eq!(scoped.from_declaration_index(0), Some(Abc::B));
        assert_eq!(Abc::B.declaration_index(), 1);
        assert_eq!(scoped.from_string("A"), None);
        assert_eq!(Abc::from_string("A"), Some(Abc::A));
    }

    #[test]
    fn by_name() {
        let mut registry = Registry::<Abc>::new();
        {
            let scoped = super::Unmatchable::by_name(&mut registry, ["C", "missing"]);
            assert_eq!(scoped.variants(), &[Abc::A, Abc::B]);
        }
        assert_eq!(registry.variants().len(), 3);
    }
}
