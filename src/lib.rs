//! comparator-map: a single-threaded hash map whose key equality and hashing
//! come from a pluggable `EqualityStrategy` rather than the key type's own
//! `Eq`/`Hash`, with live entry, key and value views.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: let callers decide what "the same key" means (by a field, case
//!   insensitively, by any closure pair) without newtype wrappers.
//! - Layers:
//!   - HandleHashMap<K, V, S>: structural map that returns stable
//!     handles for O(1) average access without re-hashing; includes a
//!     debug-only reentrancy guard to keep internals consistent while
//!     mutating.
//!   - Comparator objects: keys wrapped together with the strategy
//!     instance that compares them. Stored keys cache their strategy hash
//!     (`HashCachingObject`); probes are checked lazily (`LazyObject`).
//!   - ComparatorMap<K, V, C, S>: public API. Stores
//!     `HashCachingObject<K, C>` keys in a `HandleHashMap` and exposes
//!     typed and untyped lookups, iteration, a removal-capable `Cursor`
//!     and the `EntrySet`/`KeySet`/`ValueCollection` views.
//!
//! Constraints
//! - Single-threaded: the strategy is shared through `Rc`, so maps are
//!   `!Send`/`!Sync`.
//! - Key identity is strategy-instance identity: two stored keys are equal
//!   only when wrapped with the same `Rc` strategy and the strategy says so.
//! - Each stored key's strategy hash is computed once at insertion and the
//!   index always uses the stored hash.
//! - Reentrancy: strategy code must not call back into the map it is
//!   comparing for; in debug builds this panics.
//!
//! Errors
//! - `MapError::NullKey` for an absent key argument.
//! - `MapError::TypeMismatch` when an untyped probe is not a `K`. Probes
//!   are only checked when the strategy runs, so a mistyped probe against
//!   an empty map simply finds nothing; keys offered for insertion through
//!   `put_any` are checked immediately.
//! - `MapError::Unsupported` for adding a value without a key.
//! - `MapError::ArrayStore` when `to_array` is given an array of the wrong
//!   element type.
//!
//! Notes and non-goals
//! - No concurrent access, no ordering guarantees, no serialization.
//! - Views borrow the map mutably for their whole lifetime; the map is
//!   usable again once the view is dropped.
//! - Keys are immutable post-insert; there is no `key_mut`.

pub mod collection_comparer;
pub mod comparator_map;
pub mod comparator_object;
pub mod cursor;
pub mod entry_set;
mod error;
pub mod handle_hash_map;
pub mod key_set;
mod reentrancy;
pub mod strategy;
pub mod value_collection;
pub mod view_collection;

#[cfg(test)]
mod comparator_map_proptest;

// Public surface
pub use comparator_map::ComparatorMap;
pub use comparator_object::{ComparatorObject, HashCachingObject, LazyObject, Probe};
pub use cursor::Cursor;
pub use entry_set::EntrySet;
pub use error::MapError;
pub use handle_hash_map::{Handle, HandleHashMap, InsertError};
pub use key_set::KeySet;
pub use strategy::{EqualityStrategy, FnStrategy, KeyStrategy, NativeStrategy};
pub use value_collection::ValueCollection;
pub use view_collection::{AddElements, ClonedElements, ViewCollection};

/// Alias matching the name the map is commonly known by.
pub type EqualityComparatorMap<K, V, C, S = std::collections::hash_map::RandomState> =
    ComparatorMap<K, V, C, S>;
