//! Permutation views: sort and sort-unique by a floating key

use super::View;
use crate::error::ViewError;

/// A view under a stable permutation of its source.
///
/// Only the permutation is held; items stay in the source. The key is
/// evaluated once per element when the reorder is built.
pub struct Reorder<V> {
    source: V,
    order: Vec<usize>,
}

impl<V: View> Reorder<V> {
    fn weighed(source: &V, key: impl Fn(&V::Item) -> f32) -> Vec<(usize, f32)> {
        let mut weights = Vec::with_capacity(source.len());
        for index in 0..source.len() {
            if let Ok(item) = source.try_at(index) {
                weights.push((index, key(&item)));
            }
        }
        weights.sort_by(|one, two| one.1.total_cmp(&two.1));
        weights
    }

    /// Stable ascending sort by `key`.
    pub fn sorted(source: V, key: impl Fn(&V::Item) -> f32) -> Self {
        let order = Self::weighed(&source, key).into_iter().map(|(index, _)| index).collect();
        Reorder { source, order }
    }

    /// Ascending sort keeping one element per distinct key value; among
    /// equal keys the earliest source index survives.
    pub fn sorted_unique(source: V, key: impl Fn(&V::Item) -> f32) -> Self {
        let mut weights = Self::weighed(&source, key);
        weights.dedup_by(|current, previous| current.1 == previous.1);
        let order = weights.into_iter().map(|(index, _)| index).collect();
        Reorder { source, order }
    }
}

impl<V: View> View for Reorder<V> {
    type Item = V::Item;

    fn len(&self) -> usize {
        self.order.len()
    }

    fn try_at(&self, index: usize) -> Result<Self::Item, ViewError> {
        match self.order.get(index) {
            Some(&source_index) => self.source.try_at(source_index),
            None => Err(ViewError::Index { index, len: self.order.len() }),
        }
    }
}
