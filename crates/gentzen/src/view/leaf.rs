//! Leaf views: empty, singleton, shadow and materialized storage

use super::{View, ViewItem};
use crate::error::ViewError;
use std::marker::PhantomData;

/// The view of nothing
pub struct Empty<T> {
    _marker: PhantomData<T>,
}

impl<T> Empty<T> {
    pub fn new() -> Self {
        Empty { _marker: PhantomData }
    }
}

impl<T> Default for Empty<T> {
    fn default() -> Self {
        Empty::new()
    }
}

impl<T: ViewItem> View for Empty<T> {
    type Item = T;

    fn len(&self) -> usize {
        0
    }

    fn try_at(&self, index: usize) -> Result<T, ViewError> {
        Err(ViewError::Index { index, len: 0 })
    }
}

/// The view of exactly one item
pub struct Singleton<T> {
    item: T,
}

impl<T> Singleton<T> {
    pub fn new(item: T) -> Self {
        Singleton { item }
    }
}

impl<T: ViewItem> View for Singleton<T> {
    type Item = T;

    fn len(&self) -> usize {
        1
    }

    fn try_at(&self, index: usize) -> Result<T, ViewError> {
        if index != 0 {
            return Err(ViewError::Index { index, len: 1 });
        }
        Ok(self.item.clone())
    }
}

/// A bounds-checked pass-through over another view
pub struct Shadow<V> {
    inner: V,
}

impl<V: View> Shadow<V> {
    pub fn new(inner: V) -> Self {
        Shadow { inner }
    }
}

impl<V: View> View for Shadow<V> {
    type Item = V::Item;

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn try_at(&self, index: usize) -> Result<Self::Item, ViewError> {
        if index >= self.inner.len() {
            return Err(ViewError::Index { index, len: self.inner.len() });
        }
        self.inner.try_at(index)
    }
}

/// Materialized item storage.
///
/// Sequent sides live in unfolds: building one from a composite view
/// snapshots the items, so later accesses are O(1) and the items' identity
/// is pinned for the lifetime of the unfold.
pub struct Unfold<T> {
    items: Vec<T>,
}

impl<T: ViewItem> Unfold<T> {
    pub fn new() -> Self {
        Unfold { items: Vec::new() }
    }

    /// Snapshot every item of `view` in order.
    pub fn from_view<V: View<Item = T>>(view: &V) -> Result<Self, ViewError> {
        let items = (0..view.len()).map(|index| view.try_at(index)).collect::<Result<_, _>>()?;
        Ok(Unfold { items })
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: ViewItem> Default for Unfold<T> {
    fn default() -> Self {
        Unfold::new()
    }
}

impl<T> From<Vec<T>> for Unfold<T> {
    fn from(items: Vec<T>) -> Self {
        Unfold { items }
    }
}

impl<T: ViewItem> FromIterator<T> for Unfold<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Unfold { items: iter.into_iter().collect() }
    }
}

impl<T: ViewItem> View for Unfold<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn try_at(&self, index: usize) -> Result<T, ViewError> {
        self.items.get(index).cloned().ok_or(ViewError::Index { index, len: self.items.len() })
    }
}
