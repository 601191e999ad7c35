//! Ordered, duplicate-checked collections of named records.
//!
//! A [`Pool`] is the working registry for every build stage: an
//! insertion-ordered sequence in which no two records share a name. All
//! mutating operations validate the prospective result before touching the
//! stored sequence, so a rejected mutation leaves the pool exactly as it
//! was.
//!
//! Operations that accept records take anything iterable, so a single
//! record (`[block]`) and a batch (`vec![a, b]`) go through the same call.
//!
//! ```rust
//! use bemaker::pool::{Named, Pool};
//!
//! #[derive(Debug, Clone)]
//! struct Item(&'static str);
//!
//! impl Named for Item {
//!     fn name(&self) -> &str {
//!         self.0
//!     }
//! }
//!
//! # fn main() -> Result<(), bemaker::pool::PoolError> {
//! let mut pool = Pool::from_items([Item("a"), Item("c")])?;
//! pool.insert_after("a", [Item("b")])?;
//! assert_eq!(pool.names(), vec!["a", "b", "c"]);
//! assert!(pool.append([Item("a")]).is_err());
//! assert_eq!(pool.len(), 3);
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// A record that can live in a [`Pool`]
pub trait Named {
    /// The unique key of this record within its pool
    fn name(&self) -> &str;
}

/// Errors raised by [`Pool`] mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The mutation would leave two records with the same name
    #[error("Duplicate name in pool: {name}")]
    DuplicateKey {
        /// The name that would appear twice
        name: String,
    },

    /// A record has an empty name
    #[error("Pool records must have a non-empty name")]
    EmptyKey,

    /// A named or indexed anchor does not exist
    #[error("No record '{key}' in pool")]
    MissingKey {
        /// The name or index that was looked up
        key: String,
    },
}

/// Identifies a pool record either by name or by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolKey {
    /// Look up by record name
    Name(String),
    /// Look up by position
    Index(usize),
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKey::Name(name) => write!(f, "{name}"),
            PoolKey::Index(index) => write!(f, "#{index}"),
        }
    }
}

impl From<&str> for PoolKey {
    fn from(name: &str) -> Self {
        PoolKey::Name(name.to_string())
    }
}

impl From<String> for PoolKey {
    fn from(name: String) -> Self {
        PoolKey::Name(name)
    }
}

impl From<usize> for PoolKey {
    fn from(index: usize) -> Self {
        PoolKey::Index(index)
    }
}

/// Insertion-ordered registry of uniquely named records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
        }
    }
}

impl<T: Named> Pool<T> {
    /// Create an empty pool
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from records, rejecting duplicate or empty names
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Result<Self, PoolError> {
        let mut pool = Self::new();
        pool.set(items)?;
        Ok(pool)
    }

    /// Wrap records whose names are already known to be unique
    ///
    /// Used by graph traversals that only ever select a subset of an
    /// existing pool.
    pub(crate) fn from_unique(items: Vec<T>) -> Self {
        debug_assert!(check_unique(items.iter().map(Named::name)).is_ok());
        Self {
            items,
        }
    }

    /// Replace the whole content
    pub fn set(&mut self, items: impl IntoIterator<Item = T>) -> Result<(), PoolError> {
        let items: Vec<T> = items.into_iter().collect();
        check_unique(items.iter().map(Named::name))?;
        self.items = items;
        Ok(())
    }

    /// Add records at the end
    pub fn append(&mut self, items: impl IntoIterator<Item = T>) -> Result<(), PoolError> {
        self.splice_at(self.items.len(), None, items)
    }

    /// Add records at the front
    pub fn prepend(&mut self, items: impl IntoIterator<Item = T>) -> Result<(), PoolError> {
        self.splice_at(0, None, items)
    }

    /// Insert records at `index`; an index past the end appends
    pub fn insert_at(
        &mut self,
        index: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), PoolError> {
        self.splice_at(index.min(self.items.len()), None, items)
    }

    /// Insert records immediately before the record named `anchor`
    pub fn insert_before(
        &mut self,
        anchor: &str,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), PoolError> {
        let index = self.require_index(anchor)?;
        self.splice_at(index, None, items)
    }

    /// Insert records immediately after the record named `anchor`
    pub fn insert_after(
        &mut self,
        anchor: &str,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), PoolError> {
        let index = self.require_index(anchor)?;
        self.splice_at(index + 1, None, items)
    }

    /// Replace the record named `name` with one or more records, in place
    pub fn replace(
        &mut self,
        name: &str,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), PoolError> {
        let index = self.require_index(name)?;
        self.splice_at(index, Some(index), items)
    }

    /// Remove and return the record named `name`
    pub fn remove(&mut self, name: &str) -> Result<T, PoolError> {
        let index = self.require_index(name)?;
        Ok(self.items.remove(index))
    }

    /// Move the record named `name` to `index`, counted after its removal
    ///
    /// Moving to `0` always makes the record first; an index past the end
    /// makes it last.
    pub fn move_to(&mut self, name: &str, index: usize) -> Result<(), PoolError> {
        let from = self.require_index(name)?;
        let item = self.items.remove(from);
        let to = index.min(self.items.len());
        self.items.insert(to, item);
        Ok(())
    }

    /// Exchange the positions of two records, each given by name or index
    pub fn swap(&mut self, a: impl Into<PoolKey>, b: impl Into<PoolKey>) -> Result<(), PoolError> {
        let a = self.resolve(&a.into())?;
        let b = self.resolve(&b.into())?;
        if a == b {
            return Ok(());
        }

        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let low_name = self.items[low].name().to_string();
        let high_name = self.items[high].name().to_string();
        self.move_to(&high_name, low)?;
        self.move_to(&low_name, high)
    }

    /// All records in order
    #[must_use]
    pub fn all(&self) -> &[T] {
        &self.items
    }

    /// Iterate records in order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Record names in order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(Named::name).collect()
    }

    /// Look up a record by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.index_of(name).map(|index| &self.items[index])
    }

    /// Look up a record by position
    #[must_use]
    pub fn get_at(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Name of the record at `index`
    #[must_use]
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(Named::name)
    }

    /// Position of the record named `name`
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        Self::index_in(&self.items, name)
    }

    /// Position of the record named `name` in an arbitrary sequence
    #[must_use]
    pub fn index_in(items: &[T], name: &str) -> Option<usize> {
        items.iter().position(|item| item.name() == name)
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the pool has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a record named `name` exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Whether a record with the same name as `node` exists
    #[must_use]
    pub fn contains_node(&self, node: &T) -> bool {
        self.contains(node.name())
    }

    /// Whether every name in `names` exists
    pub fn contains_all<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> bool {
        names.into_iter().all(|name| self.contains(name))
    }

    /// Consume the pool, returning records in order
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn require_index(&self, name: &str) -> Result<usize, PoolError> {
        self.index_of(name).ok_or_else(|| PoolError::MissingKey {
            key: name.to_string(),
        })
    }

    fn resolve(&self, key: &PoolKey) -> Result<usize, PoolError> {
        match key {
            PoolKey::Name(name) => self.require_index(name),
            PoolKey::Index(index) if *index < self.items.len() => Ok(*index),
            PoolKey::Index(_) => Err(PoolError::MissingKey {
                key: key.to_string(),
            }),
        }
    }

    /// Insert `items` at `index`, optionally replacing the record at `replaced`
    ///
    /// Uniqueness is checked against the records that survive the splice
    /// before anything is moved.
    fn splice_at(
        &mut self,
        index: usize,
        replaced: Option<usize>,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), PoolError> {
        let items: Vec<T> = items.into_iter().collect();
        let survivors = self
            .items
            .iter()
            .enumerate()
            .filter(|(position, _)| Some(*position) != replaced)
            .map(|(_, item)| item.name());
        check_unique(survivors.chain(items.iter().map(Named::name)))?;

        let end = if replaced.is_some() { index + 1 } else { index };
        let _replaced: Vec<T> = self.items.splice(index..end, items).collect();
        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for Pool<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), PoolError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(PoolError::EmptyKey);
        }
        if !seen.insert(name) {
            return Err(PoolError::DuplicateKey {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item {
        name: String,
        payload: u32,
    }

    impl Item {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                payload: 0,
            }
        }

        fn with_payload(name: &str, payload: u32) -> Self {
            Self {
                name: name.to_string(),
                payload,
            }
        }
    }

    impl Named for Item {
        fn name(&self) -> &str {
            &self.name
        }
    }

    fn pool(names: &[&str]) -> Pool<Item> {
        Pool::from_items(names.iter().map(|name| Item::new(name))).unwrap()
    }

    #[test]
    fn test_construction_rejects_duplicates() {
        let result = Pool::from_items([Item::new("a"), Item::new("b"), Item::new("a")]);
        assert_eq!(
            result.unwrap_err(),
            PoolError::DuplicateKey {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn test_construction_rejects_empty_name() {
        let result = Pool::from_items([Item::new("a"), Item::new("")]);
        assert_eq!(result.unwrap_err(), PoolError::EmptyKey);
    }

    #[test]
    fn test_set_replaces_content_and_keeps_state_on_failure() {
        let mut pool = pool(&["a", "b"]);
        pool.set([Item::new("x"), Item::new("y")]).unwrap();
        assert_eq!(pool.names(), vec!["x", "y"]);

        assert!(pool.set([Item::new("z"), Item::new("z")]).is_err());
        assert_eq!(pool.names(), vec!["x", "y"]);
    }

    #[test]
    fn test_append_and_prepend_single_and_many() {
        let mut pool = pool(&["b"]);
        pool.append([Item::new("c")]).unwrap();
        pool.append(vec![Item::new("d"), Item::new("e")]).unwrap();
        pool.prepend([Item::new("a")]).unwrap();
        assert_eq!(pool.names(), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_append_duplicate_leaves_pool_untouched() {
        let mut pool = pool(&["a", "b"]);
        let error = pool.append(vec![Item::new("c"), Item::new("b")]).unwrap_err();
        assert_eq!(
            error,
            PoolError::DuplicateKey {
                name: "b".to_string()
            }
        );
        assert_eq!(pool.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut pool = pool(&["a", "d"]);
        pool.insert_before("d", [Item::new("c")]).unwrap();
        pool.insert_after("a", [Item::new("b")]).unwrap();
        pool.insert_after("d", [Item::new("e")]).unwrap();
        assert_eq!(pool.names(), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_insert_with_missing_anchor() {
        let mut pool = pool(&["a"]);
        let error = pool.insert_before("zzz", [Item::new("b")]).unwrap_err();
        assert!(matches!(error, PoolError::MissingKey { .. }));
        assert_eq!(pool.names(), vec!["a"]);
    }

    #[test]
    fn test_insert_at_clamps_to_end() {
        let mut pool = pool(&["a", "c"]);
        pool.insert_at(1, [Item::new("b")]).unwrap();
        pool.insert_at(99, [Item::new("d")]).unwrap();
        assert_eq!(pool.names(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_replace_with_many() {
        let mut pool = pool(&["a", "x", "d"]);
        pool.replace("x", vec![Item::new("b"), Item::new("c")]).unwrap();
        assert_eq!(pool.names(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_replace_may_reuse_the_replaced_name() {
        let mut pool = pool(&["a", "b"]);
        pool.replace("b", [Item::with_payload("b", 7)]).unwrap();
        assert_eq!(pool.get("b").unwrap().payload, 7);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_replace_rejects_collision_with_other_record() {
        let mut pool = pool(&["a", "b"]);
        assert!(pool.replace("b", [Item::new("a")]).is_err());
        assert_eq!(pool.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_move_to_index_after_removal() {
        let mut pool = pool(&["a", "b", "c", "d"]);
        pool.move_to("c", 0).unwrap();
        assert_eq!(pool.names(), vec!["c", "a", "b", "d"]);

        pool.move_to("c", 3).unwrap();
        assert_eq!(pool.names(), vec!["a", "b", "d", "c"]);

        pool.move_to("a", 2).unwrap();
        assert_eq!(pool.names(), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_swap_by_name_and_index() {
        let mut pool = pool(&["a", "b", "c", "d", "e"]);
        pool.swap("b", "d").unwrap();
        assert_eq!(pool.names(), vec!["a", "d", "c", "b", "e"]);

        pool.swap(4usize, "a").unwrap();
        assert_eq!(pool.names(), vec!["e", "d", "c", "b", "a"]);

        pool.swap("c", 2usize).unwrap();
        assert_eq!(pool.names(), vec!["e", "d", "c", "b", "a"]);
    }

    #[test]
    fn test_swap_adjacent() {
        let mut pool = pool(&["a", "b"]);
        pool.swap("a", "b").unwrap();
        assert_eq!(pool.names(), vec!["b", "a"]);
    }

    #[test]
    fn test_swap_missing_index() {
        let mut pool = pool(&["a"]);
        assert!(matches!(pool.swap("a", 3usize), Err(PoolError::MissingKey { .. })));
    }

    #[test]
    fn test_remove() {
        let mut pool = pool(&["a", "b", "c"]);
        let removed = pool.remove("b").unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(pool.names(), vec!["a", "c"]);
        assert!(pool.remove("b").is_err());
    }

    #[test]
    fn test_lookups() {
        let pool = pool(&["a", "b", "c"]);
        assert_eq!(pool.get("b").map(|item| item.name.as_str()), Some("b"));
        assert!(pool.get("zzz").is_none());
        assert_eq!(pool.get_at(2).map(|item| item.name.as_str()), Some("c"));
        assert_eq!(pool.name_of(0), Some("a"));
        assert_eq!(pool.name_of(10), None);
        assert_eq!(pool.index_of("c"), Some(2));
        assert_eq!(pool.index_of("zzz"), None);
    }

    #[test]
    fn test_index_in_alternate_sequence() {
        let others = vec![Item::new("x"), Item::new("y")];
        assert_eq!(Pool::index_in(&others, "y"), Some(1));
        assert_eq!(Pool::index_in(&others, "a"), None);
    }

    #[test]
    fn test_existence_checks() {
        let pool = pool(&["a", "b", "c"]);
        assert!(pool.contains("a"));
        assert!(!pool.contains("d"));
        assert!(pool.contains_node(&Item::with_payload("b", 3)));
        assert!(pool.contains_all(["a", "c"]));
        assert!(!pool.contains_all(["a", "d"]));
        assert!(pool.contains_all(std::iter::empty()));
    }
}
