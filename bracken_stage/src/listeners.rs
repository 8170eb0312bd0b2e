// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tag-keyed listener registry with replace-or-append semantics.

use alloc::vec::Vec;
use core::fmt;

/// An insertion-ordered collection of listeners, each optionally keyed by a tag.
///
/// Adding a listener with a tag that is already present replaces the previous
/// listener in place, keeping its position in the invocation order. Untagged
/// listeners always append and can only be removed by clearing the registry.
pub struct Listeners<L> {
    entries: Vec<(Option<&'static str>, L)>,
}

impl<L> Listeners<L> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an untagged listener.
    pub fn push(&mut self, listener: L) {
        self.entries.push((None, listener));
    }

    /// Adds a tagged listener, replacing any previous listener under the same
    /// tag while keeping its position in the invocation order.
    pub fn insert(&mut self, tag: &'static str, listener: L) {
        for entry in &mut self.entries {
            if entry.0 == Some(tag) {
                entry.1 = listener;
                return;
            }
        }
        self.entries.push((Some(tag), listener));
    }

    /// Removes and returns the listener under `tag`.
    pub fn remove(&mut self, tag: &'static str) -> Option<L> {
        let index = self.entries.iter().position(|(t, _)| *t == Some(tag))?;
        Some(self.entries.remove(index).1)
    }

    /// Returns the listener under `tag`, if present.
    pub fn get(&self, tag: &'static str) -> Option<&L> {
        self.entries
            .iter()
            .find(|(t, _)| *t == Some(tag))
            .map(|(_, l)| l)
    }

    /// Removes all listeners.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates listeners in invocation order.
    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.entries.iter().map(|(_, l)| l)
    }

    /// Iterates listeners mutably in invocation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut L> {
        self.entries.iter_mut().map(|(_, l)| l)
    }
}

impl<L> Default for Listeners<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> fmt::Debug for Listeners<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .field(
                "tags",
                &self
                    .entries
                    .iter()
                    .map(|(t, _)| t.unwrap_or("_"))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn untagged_listeners_append_in_order() {
        let mut listeners = Listeners::new();
        listeners.push(1);
        listeners.push(2);
        listeners.push(3);
        assert_eq!(listeners.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn tagged_add_replaces_in_place() {
        let mut listeners = Listeners::new();
        listeners.insert("a", 1);
        listeners.push(2);
        listeners.insert("a", 9);
        assert_eq!(listeners.len(), 2);
        assert_eq!(listeners.iter().copied().collect::<Vec<_>>(), vec![9, 2]);
    }

    #[test]
    fn remove_by_tag() {
        let mut listeners = Listeners::new();
        listeners.insert("a", 1);
        listeners.insert("b", 2);
        assert_eq!(listeners.remove("a"), Some(1));
        assert_eq!(listeners.remove("a"), None);
        assert_eq!(listeners.get("b"), Some(&2));
        assert_eq!(listeners.len(), 1);
    }
}
