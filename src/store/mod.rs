//! Ordered media collection with selection, tag and focus bookkeeping
//!
//! `MediaStore` is the single authority over the three index sets that point
//! into the collection. Every other layer calls its operations and never
//! edits the sets directly, so positions stay valid across inserts, deletes
//! and filter changes.
//!
//! # Invariants
//!
//! - Newest entry is always at index 0
//! - Every index in `selected` and `tagged`, and `focus` when present, is `< len()`
//! - A de-dup key, once seen, stays seen until [`MediaStore::clear`]
//!
//! # Examples
//!
//! ```
//! use vewd::media::{MediaItem, MediaKind, SourceInfo};
//! use vewd::store::MediaStore;
//!
//! let mut store = MediaStore::new();
//! for name in ["a.png", "b.png", "c.png"] {
//!     store.insert_front(MediaItem::new(name, MediaKind::Image, name, SourceInfo::default()));
//! }
//!
//! let names: Vec<&str> = store.items().iter().map(|i| i.filename.as_str()).collect();
//! assert_eq!(names, ["c.png", "b.png", "a.png"]);
//! assert_eq!(store.focus(), Some(2));
//! ```

pub mod filter;

pub use filter::TypeFilter;

use crate::media::{DedupKey, MediaItem};
use std::collections::{BTreeSet, HashSet};

/// Result of [`MediaStore::remove_many`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Nothing valid was requested; state untouched
    Unchanged,
    /// Entries removed and focus moved to a visible entry
    Removed { count: usize, focus: usize },
    /// Entries removed; nothing visible is left but filtered-out entries remain
    HiddenRemain { count: usize, hidden: usize },
    /// Entries removed and the collection is now empty
    Emptied { count: usize },
}

impl RemovalOutcome {
    /// Number of entries actually removed
    #[must_use]
    pub const fn removed(&self) -> usize {
        match self {
            Self::Unchanged => 0,
            Self::Removed { count, .. } | Self::HiddenRemain { count, .. } | Self::Emptied { count } => *count,
        }
    }
}

/// The ordered media collection and its derived index sets
#[derive(Debug, Default)]
pub struct MediaStore {
    items: Vec<MediaItem>,
    selected: BTreeSet<usize>,
    tagged: BTreeSet<usize>,
    focus: Option<usize>,
    type_filter: TypeFilter,
    tag_filter_only: bool,
    seen: HashSet<DedupKey>,
}

impl MediaStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted parts
    ///
    /// `items` is taken in stored order (newest first). Tagged indices outside
    /// the collection are dropped. A non-empty store starts focused on index
    /// 0 with nothing selected, so export falls back to the tagged set.
    #[must_use]
    pub fn from_parts(items: Vec<MediaItem>, tagged: impl IntoIterator<Item = usize>, seen: impl IntoIterator<Item = DedupKey>) -> Self {
        let len = items.len();
        let mut store = Self {
            tagged: tagged.into_iter().filter(|&t| t < len).collect(),
            seen: seen.into_iter().collect(),
            items,
            ..Self::default()
        };
        for item in &store.items {
            store.seen.insert(item.dedup_key());
        }
        if len > 0 {
            store.focus = Some(0);
        }
        store
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    /// Position of the entry with the given id
    #[must_use]
    pub fn index_of(&self, id: crate::media::ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    #[must_use]
    pub const fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    #[must_use]
    pub const fn tagged(&self) -> &BTreeSet<usize> {
        &self.tagged
    }

    #[must_use]
    pub const fn focus(&self) -> Option<usize> {
        self.focus
    }

    #[must_use]
    pub const fn type_filter(&self) -> TypeFilter {
        self.type_filter
    }

    #[must_use]
    pub const fn tag_filter_only(&self) -> bool {
        self.tag_filter_only
    }

    #[must_use]
    pub fn has_seen(&self, key: &DedupKey) -> bool {
        self.seen.contains(key)
    }

    /// All de-dup keys seen so far, sorted for stable persistence
    #[must_use]
    pub fn seen_keys(&self) -> Vec<DedupKey> {
        let mut keys: Vec<DedupKey> = self.seen.iter().cloned().collect();
        keys.sort();
        keys
    }

    /// The two lowest selected indices, when at least two are selected
    #[must_use]
    pub fn comparison_pair(&self) -> Option<(usize, usize)> {
        let mut iter = self.selected.iter().copied();
        match (iter.next(), iter.next()) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Insertion and removal
    // ------------------------------------------------------------------

    /// Record a de-dup key; returns `false` if it was already seen
    pub fn mark_seen(&mut self, key: DedupKey) -> bool {
        self.seen.insert(key)
    }

    /// Ingest an entry unless its de-dup key was already seen
    ///
    /// Returns `true` when the entry was inserted.
    pub fn admit(&mut self, item: MediaItem) -> bool {
        if !self.mark_seen(item.dedup_key()) {
            log::debug!("Skipping duplicate {}", item.dedup_key().as_str());
            return false;
        }
        self.insert_front(item);
        true
    }

    /// Prepend an entry, shifting every tracked index by one
    ///
    /// When nothing was focused the new entry becomes focused and selected.
    /// Does not consult the de-dup set; see [`MediaStore::admit`].
    pub fn insert_front(&mut self, item: MediaItem) {
        self.items.insert(0, item);
        self.selected = self.selected.iter().map(|i| i + 1).collect();
        self.tagged = self.tagged.iter().map(|i| i + 1).collect();

        match self.focus {
            Some(f) => self.focus = Some(f + 1),
            None => {
                self.focus = Some(0);
                self.selected.insert(0);
            }
        }
    }

    /// Remove entries at the given positions
    ///
    /// Indices may come in any order and may repeat; out-of-range ones are
    /// ignored. Selection is cleared, tags are renumbered, and focus moves to
    /// the nearest visible entry at or after the old focus, else the nearest
    /// visible entry before it.
    pub fn remove_many(&mut self, indices: &[usize]) -> RemovalOutcome {
        let len = self.items.len();
        let mut doomed: Vec<usize> = indices.iter().copied().filter(|&i| i < len).collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        doomed.dedup();

        if doomed.is_empty() {
            return RemovalOutcome::Unchanged;
        }

        for &index in &doomed {
            let item = self.items.remove(index);
            log::debug!("Removed {} ({}) at {index}", item.filename, item.id);
        }

        let shift = |i: usize| i - doomed.iter().filter(|&&d| d < i).count();

        self.tagged = self
            .tagged
            .iter()
            .copied()
            .filter(|t| !doomed.contains(t))
            .map(shift)
            .collect();
        self.selected.clear();

        let count = doomed.len();
        if self.items.is_empty() {
            self.focus = None;
            return RemovalOutcome::Emptied { count };
        }

        let start = self.focus.map_or(0, shift).min(self.items.len() - 1);
        let next = (start..self.items.len())
            .find(|&i| self.is_visible(i))
            .or_else(|| (0..start).rev().find(|&i| self.is_visible(i)));

        match next {
            Some(focus) => {
                self.focus = Some(focus);
                RemovalOutcome::Removed { count, focus }
            }
            None => {
                self.focus = None;
                RemovalOutcome::HiddenRemain {
                    count,
                    hidden: self.items.len(),
                }
            }
        }
    }

    /// Empty the collection, every index set, and the de-dup set
    pub fn clear(&mut self) {
        self.items.clear();
        self.selected.clear();
        self.tagged.clear();
        self.focus = None;
        self.seen.clear();
    }

    /// Replace an entry's locator and source info in place
    pub fn relocate(&mut self, index: usize, locator: String, info: crate::media::SourceInfo) {
        if let Some(item) = self.items.get_mut(index) {
            item.locator = locator;
            item.info = info;
        }
    }

    // ------------------------------------------------------------------
    // View filters
    // ------------------------------------------------------------------

    pub const fn set_type_filter(&mut self, filter: TypeFilter) {
        self.type_filter = filter;
    }

    pub const fn set_tag_filter_only(&mut self, on: bool) {
        self.tag_filter_only = on;
    }

    /// Whether the entry at `index` passes both view filters
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|item| {
            self.type_filter.matches(item.kind) && (!self.tag_filter_only || self.tagged.contains(&index))
        })
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        (0..self.items.len()).filter(|&i| self.is_visible(i)).count()
    }

    // ------------------------------------------------------------------
    // Selection and focus
    // ------------------------------------------------------------------

    /// `selected = {index}`, `focus = index`
    pub fn select_only(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        self.selected.clear();
        self.selected.insert(index);
        self.focus = Some(index);
    }

    /// Flip membership of `index` in the selection
    ///
    /// Returns the new membership.
    pub fn toggle_selected(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        if self.selected.remove(&index) {
            false
        } else {
            self.selected.insert(index);
            true
        }
    }

    /// Add `index` to the selection without touching focus
    pub fn add_selected(&mut self, index: usize) {
        if index < self.items.len() {
            self.selected.insert(index);
        }
    }

    /// `selected = [min(a, b) ..= max(a, b)]`
    pub fn select_range(&mut self, a: usize, b: usize) {
        let (lo, hi) = (a.min(b), a.max(b));
        if hi >= self.items.len() {
            return;
        }
        self.selected = (lo..=hi).collect();
    }

    /// Select every entry that passes the view filters
    pub fn select_all_visible(&mut self) {
        self.selected = (0..self.items.len()).filter(|&i| self.is_visible(i)).collect();
    }

    pub fn set_focus(&mut self, index: usize) {
        if index < self.items.len() {
            self.focus = Some(index);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    /// Flip the tag on one entry; returns the new state
    pub fn toggle_tag(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        if self.tagged.remove(&index) {
            false
        } else {
            self.tagged.insert(index);
            true
        }
    }

    /// Tag or untag every listed entry
    pub fn set_tagged(&mut self, indices: impl IntoIterator<Item = usize>, tagged: bool) {
        for index in indices {
            if index >= self.items.len() {
                continue;
            }
            if tagged {
                self.tagged.insert(index);
            } else {
                self.tagged.remove(&index);
            }
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
