//! Unit tests for the media store's index bookkeeping

use super::*;
use crate::media::{MediaKind, SourceInfo};

fn item(name: &str, kind: MediaKind) -> MediaItem {
    MediaItem::new(name, kind, format!("/view?filename={name}"), SourceInfo::default())
}

fn store_of(names: &[&str]) -> MediaStore {
    let mut store = MediaStore::new();
    for name in names {
        store.insert_front(item(name, MediaKind::Image));
    }
    store
}

fn names(store: &MediaStore) -> Vec<&str> {
    store.items().iter().map(|i| i.filename.as_str()).collect()
}

fn assert_consistent(store: &MediaStore) {
    let len = store.len();
    assert!(store.selected().iter().all(|&i| i < len), "stale selection {:?}", store.selected());
    assert!(store.tagged().iter().all(|&i| i < len), "stale tags {:?}", store.tagged());
    if let Some(f) = store.focus() {
        assert!(f < len, "stale focus {f}");
    }
}

#[test]
fn test_insert_front_reverses_order() {
    let store = store_of(&["a", "b", "c", "d"]);
    assert_eq!(names(&store), ["d", "c", "b", "a"]);
    assert_consistent(&store);
}

#[test]
fn test_first_insert_focuses_and_selects() {
    let store = store_of(&["a"]);
    assert_eq!(store.focus(), Some(0));
    assert_eq!(store.selected().iter().copied().collect::<Vec<_>>(), [0]);
}

#[test]
fn test_insert_front_shifts_all_sets() {
    let mut store = store_of(&["a", "b", "c"]);
    store.select_only(1);
    store.add_selected(2);
    store.toggle_tag(0);
    store.toggle_tag(2);

    store.insert_front(item("d", MediaKind::Image));

    assert_eq!(store.focus(), Some(2));
    assert_eq!(store.selected().iter().copied().collect::<Vec<_>>(), [2, 3]);
    assert_eq!(store.tagged().iter().copied().collect::<Vec<_>>(), [1, 3]);
    // Focus existed, so the new entry is not auto-selected.
    assert!(!store.selected().contains(&0));
    assert_consistent(&store);
}

#[test]
fn test_scenario_delete_tagged_front() {
    let mut store = store_of(&["a", "b", "c"]);
    store.toggle_tag(0);

    let outcome = store.remove_many(&[0]);

    assert_eq!(names(&store), ["b", "a"]);
    assert!(store.tagged().is_empty());
    assert_eq!(outcome.removed(), 1);
    assert_consistent(&store);
}

#[test]
fn test_remove_many_empty_is_noop() {
    let mut store = store_of(&["a", "b"]);
    store.toggle_tag(1);
    let before_sel = store.selected().clone();

    assert_eq!(store.remove_many(&[]), RemovalOutcome::Unchanged);
    assert_eq!(store.len(), 2);
    assert_eq!(store.selected(), &before_sel);
    assert!(store.tagged().contains(&1));
}

#[test]
fn test_remove_many_out_of_range_is_noop() {
    let mut store = store_of(&["a"]);
    assert_eq!(store.remove_many(&[5, 9]), RemovalOutcome::Unchanged);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_remove_many_renumbers_tags() {
    // [f, e, d, c, b, a]
    let mut store = store_of(&["a", "b", "c", "d", "e", "f"]);
    store.set_tagged([1, 3, 5], true);

    // Unordered, with a duplicate.
    store.remove_many(&[4, 0, 2, 4]);

    assert_eq!(names(&store), ["e", "c", "a"]);
    assert_eq!(store.tagged().iter().copied().collect::<Vec<_>>(), [0, 1, 2]);
    assert!(store.selected().is_empty());
    assert_consistent(&store);
}

#[test]
fn test_remove_moves_focus_forward_then_back() {
    let mut store = store_of(&["a", "b", "c", "d"]);
    store.select_only(1);

    let outcome = store.remove_many(&[1]);
    assert_eq!(outcome, RemovalOutcome::Removed { count: 1, focus: 1 });

    store.select_only(2);
    let outcome = store.remove_many(&[2]);
    assert_eq!(outcome, RemovalOutcome::Removed { count: 1, focus: 1 });
    assert_consistent(&store);
}

#[test]
fn test_remove_focus_skips_hidden_entries() {
    let mut store = MediaStore::new();
    store.insert_front(item("v1.mp4", MediaKind::Video));
    store.insert_front(item("i1.png", MediaKind::Image));
    store.insert_front(item("i0.png", MediaKind::Image));
    store.insert_front(item("v0.mp4", MediaKind::Video));
    // [v0, i0, i1, v1]
    store.set_type_filter(TypeFilter::Video);
    store.select_only(0);

    let outcome = store.remove_many(&[0]);

    // [i0, i1, v1] -> nearest visible at or after 0 is v1 at 2.
    assert_eq!(outcome, RemovalOutcome::Removed { count: 1, focus: 2 });
    assert_eq!(store.focus(), Some(2));
}

#[test]
fn test_scenario_hidden_items_remain() {
    let mut store = MediaStore::new();
    store.insert_front(item("a.png", MediaKind::Image));
    store.insert_front(item("b.png", MediaKind::Image));
    store.insert_front(item("clip.mp4", MediaKind::Video));
    store.set_type_filter(TypeFilter::Video);

    let visible: Vec<usize> = (0..store.len()).filter(|&i| store.is_visible(i)).collect();
    assert_eq!(visible, [0]);

    let outcome = store.remove_many(&[0]);

    assert_eq!(outcome, RemovalOutcome::HiddenRemain { count: 1, hidden: 2 });
    assert_eq!(store.len(), 2);
    assert_eq!(store.focus(), None);
    assert_consistent(&store);
}

#[test]
fn test_remove_everything_empties() {
    let mut store = store_of(&["a", "b"]);
    let outcome = store.remove_many(&[0, 1]);
    assert_eq!(outcome, RemovalOutcome::Emptied { count: 2 });
    assert_eq!(store.focus(), None);
    assert!(store.is_empty());
}

#[test]
fn test_visibility_combines_filters() {
    let mut store = MediaStore::new();
    store.insert_front(item("a.png", MediaKind::Image));
    store.insert_front(item("b.mp4", MediaKind::Video));
    store.insert_front(item("c.png", MediaKind::Image));
    store.toggle_tag(2);

    store.set_type_filter(TypeFilter::Image);
    assert!(store.is_visible(0));
    assert!(!store.is_visible(1));

    store.set_tag_filter_only(true);
    assert!(!store.is_visible(0));
    assert!(store.is_visible(2));
    assert_eq!(store.visible_count(), 1);

    // Filters never touch the sets.
    assert_eq!(store.len(), 3);
    assert_eq!(store.tagged().len(), 1);
    assert!(!store.is_visible(99));
}

#[test]
fn test_admit_deduplicates_until_clear() {
    let mut store = MediaStore::new();
    assert!(store.admit(item("a.png", MediaKind::Image)));
    assert!(!store.admit(item("a.png", MediaKind::Image)));
    assert_eq!(store.len(), 1);

    // Deleting does not forget the key.
    store.remove_many(&[0]);
    assert!(!store.admit(item("a.png", MediaKind::Image)));

    store.clear();
    assert!(store.seen_keys().is_empty());
    assert!(store.admit(item("a.png", MediaKind::Image)));
}

#[test]
fn test_select_range_and_comparison_pair() {
    let mut store = store_of(&["a", "b", "c", "d"]);
    store.select_range(3, 1);
    assert_eq!(store.selected().iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    assert_eq!(store.comparison_pair(), Some((1, 2)));

    store.select_only(0);
    assert_eq!(store.comparison_pair(), None);
}

#[test]
fn test_from_parts_drops_stale_tags() {
    let items = vec![item("b", MediaKind::Image), item("a", MediaKind::Image)];
    let store = MediaStore::from_parts(items, [0, 1, 7], Vec::new());
    assert_eq!(store.tagged().iter().copied().collect::<Vec<_>>(), [0, 1]);
    assert_eq!(store.focus(), Some(0));
    assert!(store.selected().is_empty());
    assert_eq!(store.seen_keys().len(), 2);
    assert_consistent(&store);
}

#[test]
fn test_random_sequences_stay_consistent() {
    let mut store = MediaStore::new();
    // Deterministic pseudo-random walk over inserts, tags, selections and deletes.
    let mut seed: u64 = 0x5eed;
    for step in 0..400 {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        let roll = (seed >> 33) as usize;
        let len = store.len().max(1);
        match roll % 5 {
            0 | 1 => store.insert_front(item(&format!("f{step}"), MediaKind::Image)),
            2 => {
                store.toggle_tag(roll % len);
            }
            3 => store.select_range(store.focus().unwrap_or(0), roll % len),
            _ => {
                store.remove_many(&[roll % len, (roll / 7) % len]);
            }
        }
        assert_consistent(&store);
    }
}
