//! Structurally-shared entry list used by every collection in the resume document.
//!
//! A list is an `Arc<Vec<Arc<T>>>`: cloning the list is a pointer copy, and every
//! transformation returns a new list that reuses the `Arc<T>` of each untouched entry.
//! Transformations return `None` when they would not change anything, so the store can
//! skip the write (and the change notification) entirely.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one entry within a list. Opaque to everything except the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Fresh random id. Never reused: v4 UUIDs carry 122 random bits.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Behaviour shared by experience, education, skill and project entries.
pub trait Entry: Clone + PartialEq {
    /// Partial-field update accepted by `EntryList::with_updated`.
    type Patch;

    /// A new entry with field defaults.
    fn blank(id: EntryId) -> Self;

    fn id(&self) -> &EntryId;

    /// Returns a copy of `self` with every field present in `patch` replaced.
    fn merged(&self, patch: &Self::Patch) -> Self;
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList<T>(Arc<Vec<Arc<T>>>);

impl<T> Clone for EntryList<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for EntryList<T> {
    fn default() -> Self {
        Self(Arc::new(Vec::new()))
    }
}

impl<T: Entry> EntryList<T> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter().map(|entry| entry.as_ref())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index).map(|entry| entry.as_ref())
    }

    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn position(&self, id: &EntryId) -> Option<usize> {
        self.0.iter().position(|entry| entry.id() == id)
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.iter().map(|entry| entry.id().clone()).collect()
    }

    /// Shared handle of the entry at `index`; used to check structural sharing.
    #[cfg(test)]
    pub fn shared(&self, index: usize) -> Option<&Arc<T>> {
        self.0.get(index)
    }

    /// True when both lists are the same allocation.
    #[cfg(test)]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn with_added(&self, entry: T) -> Self {
        let mut entries = Vec::with_capacity(self.0.len() + 1);
        entries.extend(self.0.iter().cloned());
        entries.push(Arc::new(entry));
        Self(Arc::new(entries))
    }

    /// Merges `patch` into the entry with `id`. `None` if no entry matches or the merge
    /// leaves the entry unchanged.
    pub fn with_updated(&self, id: &EntryId, patch: &T::Patch) -> Option<Self> {
        let index = self.position(id)?;
        let merged = self.0[index].merged(patch);
        if merged == *self.0[index] {
            return None;
        }
        let mut entries = self.0.to_vec();
        entries[index] = Arc::new(merged);
        Some(Self(Arc::new(entries)))
    }

    /// Drops the entry with `id`. `None` if no entry matches.
    pub fn without(&self, id: &EntryId) -> Option<Self> {
        let index = self.position(id)?;
        let mut entries = self.0.to_vec();
        entries.remove(index);
        Some(Self(Arc::new(entries)))
    }

    /// Moves the entry at `from` so that it ends up at `to`.
    ///
    /// Both indices must address an existing entry; anything else (and `from == to`)
    /// is a no-op, leaving every entry where it was.
    pub fn reordered(&self, from: usize, to: usize) -> Option<Self> {
        let len = self.0.len();
        if from >= len || to >= len || from == to {
            return None;
        }
        let mut entries = self.0.to_vec();
        let moved = entries.remove(from);
        entries.insert(to, moved);
        Some(Self(Arc::new(entries)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: EntryId,
        body: String,
    }

    impl Entry for Note {
        type Patch = Option<String>;

        fn blank(id: EntryId) -> Self {
            Self {
                id,
                body: String::new(),
            }
        }

        fn id(&self) -> &EntryId {
            &self.id
        }

        fn merged(&self, patch: &Option<String>) -> Self {
            Self {
                id: self.id.clone(),
                body: patch.clone().unwrap_or_else(|| self.body.clone()),
            }
        }
    }

    fn list_of(n: usize) -> EntryList<Note> {
        (0..n).fold(EntryList::default(), |list, i| {
            list.with_added(Note {
                id: EntryId::from(format!("n{i}")),
                body: format!("body {i}"),
            })
        })
    }

    fn bodies(list: &EntryList<Note>) -> Vec<String> {
        list.iter().map(|n| n.body.clone()).collect()
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = EntryId::generate();
        let b = EntryId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_with_added_appends_and_shares_existing_entries() {
        let list = list_of(2);
        let grown = list.with_added(Note::blank(EntryId::from("new")));
        assert_eq!(grown.len(), 3);
        assert_eq!(list.len(), 2, "source list must not change");
        assert!(Arc::ptr_eq(
            list.shared(0).unwrap(),
            grown.shared(0).unwrap()
        ));
    }

    #[test]
    fn test_with_updated_keeps_siblings_referentially_equal() {
        let list = list_of(3);
        let updated = list
            .with_updated(&EntryId::from("n1"), &Some("edited".to_string()))
            .unwrap();
        assert_eq!(updated.get(1).unwrap().body, "edited");
        assert!(Arc::ptr_eq(list.shared(0).unwrap(), updated.shared(0).unwrap()));
        assert!(Arc::ptr_eq(list.shared(2).unwrap(), updated.shared(2).unwrap()));
    }

    #[test]
    fn test_with_updated_unknown_id_is_none() {
        let list = list_of(2);
        assert!(list
            .with_updated(&EntryId::from("missing"), &Some("x".to_string()))
            .is_none());
    }

    #[test]
    fn test_with_updated_empty_patch_is_none() {
        let list = list_of(2);
        assert!(list.with_updated(&EntryId::from("n0"), &None).is_none());
    }

    #[test]
    fn test_without_removes_only_matching_entry() {
        let list = list_of(3);
        let shrunk = list.without(&EntryId::from("n1")).unwrap();
        assert_eq!(bodies(&shrunk), vec!["body 0", "body 2"]);
        assert!(list.without(&EntryId::from("n1-gone")).is_none());
    }

    #[test]
    fn test_reordered_moves_entry() {
        let list = list_of(4);
        let moved = list.reordered(0, 2).unwrap();
        assert_eq!(bodies(&moved), vec!["body 1", "body 2", "body 0", "body 3"]);
    }

    #[test]
    fn test_reorder_and_back_restores_order() {
        let list = list_of(5);
        for (i, j) in [(0, 4), (3, 1), (2, 3), (4, 0)] {
            let there = list.reordered(i, j).unwrap();
            let back = there.reordered(j, i).unwrap();
            assert_eq!(bodies(&back), bodies(&list), "reorder({i},{j}) then ({j},{i})");
        }
    }

    #[test]
    fn test_reordered_out_of_range_is_none() {
        let list = list_of(3);
        assert!(list.reordered(3, 0).is_none());
        assert!(list.reordered(0, 3).is_none());
        assert!(list.reordered(1, 1).is_none());
        assert!(EntryList::<Note>::default().reordered(0, 0).is_none());
    }
}
