//! Bulk operations shared by the live views of a `ComparatorMap`.
//!
//! A view supplies a handful of element-level primitives; everything else
//! (bulk add/remove/retain, content equality and hashing, cloning out into
//! a vector or a caller-supplied array) is provided on top of them. Adding
//! lives in its own trait because only some views can add for every `V`.

use crate::collection_comparer;
use crate::comparator_map::ComparatorMap;
use crate::error::MapError;
use crate::strategy::EqualityStrategy;
use core::any::{type_name, Any};
use core::hash::{BuildHasher, Hash};

pub trait ViewCollection<K, V, C, S>
where
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    /// The element type the view exposes.
    type Element;

    fn backing(&self) -> &ComparatorMap<K, V, C, S>;
    fn backing_mut(&mut self) -> &mut ComparatorMap<K, V, C, S>;

    fn contains(&self, element: &Self::Element) -> bool;

    /// Remove one matching entry. Returns whether anything was removed.
    fn remove(&mut self, element: &Self::Element) -> bool;

    /// Whether the entry `(key, value)` is seen by this view as `element`.
    fn projects_to(strategy: &C, key: &K, value: &V, element: &Self::Element) -> bool;

    /// Hash of the element for the entry whose key has strategy hash
    /// `key_hash`.
    fn element_hash(key_hash: u64, value: &V) -> u64
    where
        V: Hash;

    fn len(&self) -> usize {
        self.backing().len()
    }

    fn is_empty(&self) -> bool {
        self.backing().is_empty()
    }

    /// Removes every entry of the backing map.
    fn clear(&mut self) {
        self.backing_mut().clear();
    }

    fn contains_all<'e, I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e Self::Element>,
        Self::Element: 'e,
    {
        elements.into_iter().all(|e| self.contains(e))
    }

    /// Calls `remove` once per element, so each element takes out at most
    /// one entry. Duplicate values in a value view need one element each.
    fn remove_all<'e, I>(&mut self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e Self::Element>,
        Self::Element: 'e,
    {
        let mut changed = false;
        for e in elements {
            changed |= self.remove(e);
        }
        changed
    }

    /// Removes entries whose element matches none of `keep`.
    fn retain_all(&mut self, keep: &[Self::Element]) -> bool {
        let mut changed = false;
        let mut cursor = self.backing_mut().cursor();
        while cursor.advance() {
            let kept = match cursor.entry() {
                Some((k, v)) => keep
                    .iter()
                    .any(|e| Self::projects_to(cursor.strategy(), k, v, e)),
                None => true,
            };
            if !kept {
                cursor.remove();
                changed = true;
            }
        }
        changed
    }

    /// Same size and every element of `other` is contained here.
    fn content_eq<'e, I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = &'e Self::Element>,
        I::IntoIter: ExactSizeIterator,
        Self::Element: 'e,
    {
        collection_comparer::equals(self.len(), other, |e| self.contains(e))
    }

    /// Order-independent sum of element hashes.
    fn content_hash(&self) -> u64
    where
        V: Hash,
    {
        collection_comparer::hash_code(
            self.backing()
                .stored()
                .map(|(k, v)| Self::element_hash(k.hash_value(), v)),
        )
    }
}

/// Views that accept new elements. Kept apart from `ViewCollection` since
/// some views can only add under extra bounds on `V`.
pub trait AddElements<K, V, C, S>: ViewCollection<K, V, C, S>
where
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    /// Add an element through the view. `Ok(true)` if the map changed.
    fn add(&mut self, element: Self::Element) -> Result<bool, MapError>;

    /// Adds every element; stops at the first failure.
    fn add_all<I>(&mut self, elements: I) -> Result<bool, MapError>
    where
        I: IntoIterator<Item = Self::Element>,
    {
        let mut changed = false;
        for e in elements {
            changed |= self.add(e)?;
        }
        Ok(changed)
    }
}

/// Views whose elements can be materialized from an entry.
pub trait ClonedElements<K, V, C, S>: ViewCollection<K, V, C, S>
where
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    fn element_at(key: &K, value: &V) -> Self::Element;

    fn to_vec(&self) -> Vec<Self::Element> {
        self.backing()
            .iter()
            .map(|(k, v)| Self::element_at(k, v))
            .collect()
    }

    /// Copy the elements into `array`, growing it when it is too short.
    /// When the array is longer than the view, the slot right after the last
    /// element is set to `None`. Fails if the elements are not `T`s.
    fn to_array<T: Any>(&self, mut array: Vec<Option<T>>) -> Result<Vec<Option<T>>, MapError>
    where
        Self::Element: 'static,
    {
        let size = self.len();
        if array.len() < size {
            array.resize_with(size, || None);
        }
        for (slot, (k, v)) in array.iter_mut().zip(self.backing().iter()) {
            let element: Box<dyn Any> = Box::new(Self::element_at(k, v));
            match element.downcast::<T>() {
                Ok(t) => *slot = Some(*t),
                Err(_) => {
                    return Err(MapError::ArrayStore {
                        expected: type_name::<T>(),
                    })
                }
            }
        }
        if let Some(slot) = array.get_mut(size) {
            *slot = None;
        }
        Ok(array)
    }
}
