//! Ordered lists of sub-entities.
//!
//! An `EntityList` starts as an owned `Vec` that the parser appends to. Once
//! the interning provider has canonicalized it, it becomes a sealed
//! `Arc<[Arc<T>]>` shared by every entity with the same element sequence.
//!
//! An empty list never allocates, so entities without attributes pay only for
//! the empty `Vec` header.

use crate::freeze::Freezable;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

enum Repr<T> {
    Owned(Vec<Arc<T>>),
    Sealed(Arc<[Arc<T>]>),
}

pub struct EntityList<T> {
    repr: Repr<T>,
}

impl<T> EntityList<T> {
    pub const fn new() -> Self {
        EntityList {
            repr: Repr::Owned(Vec::new()),
        }
    }

    pub(crate) fn from_sealed(items: Arc<[Arc<T>]>) -> Self {
        EntityList {
            repr: Repr::Sealed(items),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Arc<T>] {
        match &self.repr {
            Repr::Owned(items) => items,
            Repr::Sealed(items) => items,
        }
    }

    /// Whether this list is a canonical list handed out by the provider.
    #[inline]
    pub fn is_sealed(&self) -> bool {
        matches!(self.repr, Repr::Sealed(_))
    }

    /// Mutable access for the owning entity.
    ///
    /// A sealed list is shared, so it is copied into a fresh owned `Vec`
    /// first; the canonical list itself is never written to. Callers must
    /// have passed their own mutation guard.
    pub(crate) fn to_mut(&mut self) -> &mut Vec<Arc<T>> {
        if let Repr::Sealed(items) = &self.repr {
            self.repr = Repr::Owned(items.to_vec());
        }
        match &mut self.repr {
            Repr::Owned(items) => items,
            Repr::Sealed(_) => unreachable!("sealed list was just unsealed"),
        }
    }

    /// Identity of the element storage: sealed lists with the same
    /// canonical `Arc` share it, every owned list has its own.
    /// All empty lists share identity 0.
    #[inline]
    pub fn identity(&self) -> usize {
        let items = self.as_slice();
        if items.is_empty() {
            0
        } else {
            items.as_ptr() as usize
        }
    }

    /// Identity comparison, O(1).
    #[inline]
    pub fn ptr_eq(&self, other: &EntityList<T>) -> bool {
        self.identity() == other.identity() && self.len() == other.len()
    }

    pub(crate) fn freeze_all(&self)
    where
        T: Freezable,
    {
        for item in self.as_slice() {
            item.freeze();
        }
    }
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EntityList<T> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Owned(items) => Repr::Owned(items.clone()),
            Repr::Sealed(items) => Repr::Sealed(Arc::clone(items)),
        };
        EntityList { repr }
    }
}

impl<T> Deref for EntityList<T> {
    type Target = [Arc<T>];

    fn deref(&self) -> &[Arc<T>] {
        self.as_slice()
    }
}

impl<T> From<Vec<Arc<T>>> for EntityList<T> {
    fn from(items: Vec<Arc<T>>) -> Self {
        EntityList {
            repr: Repr::Owned(items),
        }
    }
}

impl<T> FromIterator<Arc<T>> for EntityList<T> {
    fn from_iter<I: IntoIterator<Item = Arc<T>>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> IntoIterator for &'a EntityList<T> {
    type Item = &'a Arc<T>;
    type IntoIter = std::slice::Iter<'a, Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for EntityList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
