//! Pure projection of widget state onto a view description
//!
//! [`render`] reads the store and the controller's layout and returns a
//! [`WidgetView`]. Tiles carry no selection state of their own; every flag is
//! recomputed from set membership on each call.

pub mod types;

pub use types::{Counters, EmptyState, PaneView, PreviewView, TileView, ToolbarView, WidgetView};

use crate::controller::{DisplayMode, LayoutState, PaneSlot};
use crate::export::gather_targets;
use crate::notices::Notice;
use crate::store::MediaStore;

/// Widget-level flags that live outside the store and controller
#[derive(Debug, Clone, Default)]
pub struct ViewFlags {
    pub auto_export: bool,
    pub notice: Option<Notice>,
}

/// Project the current state onto a view description
#[must_use]
pub fn render(store: &MediaStore, layout: &LayoutState, flags: &ViewFlags) -> WidgetView {
    let focus = store.focus();
    let tiles: Vec<TileView> = store
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| TileView {
            id: item.id,
            index,
            label: index + 1,
            filename: item.filename.clone(),
            kind: item.kind,
            source: item.preview_source().to_string(),
            selected: store.selected().contains(&index),
            focused: focus == Some(index),
            tagged: store.tagged().contains(&index),
            hidden: !store.is_visible(index),
        })
        .collect();

    let counters = Counters {
        total: store.len(),
        tagged: store.tagged().len(),
        visible: tiles.iter().filter(|t| !t.hidden).count(),
    };

    let empty_state = if store.is_empty() {
        Some(EmptyState::NoItems)
    } else if counters.visible == 0 {
        Some(EmptyState::AllHidden { hidden: counters.total })
    } else {
        None
    };

    WidgetView {
        mode: layout.mode,
        columns: layout.columns,
        first_row: layout.first_row,
        preview: preview(store, layout.active_pane),
        toolbar: ToolbarView {
            type_filter: store.type_filter(),
            tag_filter_active: store.tag_filter_only(),
            auto_export: flags.auto_export,
            fullscreen: layout.mode == DisplayMode::Fullscreen,
            export_enabled: gather_targets(store).is_some(),
            clear_enabled: !store.is_empty(),
        },
        tiles,
        counters,
        empty_state,
        notice: flags.notice.clone(),
    }
}

fn pane(store: &MediaStore, slot: PaneSlot, index: usize, active: bool) -> Option<PaneView> {
    let item = store.get(index)?;
    Some(PaneView {
        slot,
        index,
        label: index + 1,
        filename: item.filename.clone(),
        kind: item.kind,
        source: item.locator.clone(),
        tagged: store.tagged().contains(&index),
        active,
    })
}

fn preview(store: &MediaStore, active_pane: Option<PaneSlot>) -> PreviewView {
    if let Some((a, b)) = store.comparison_pair() {
        let left = pane(store, PaneSlot::Primary, a, active_pane == Some(PaneSlot::Primary));
        let right = pane(store, PaneSlot::Secondary, b, active_pane == Some(PaneSlot::Secondary));
        if let (Some(left), Some(right)) = (left, right) {
            return PreviewView::Compare { left, right };
        }
    }

    store
        .selected()
        .first()
        .and_then(|&index| pane(store, PaneSlot::Primary, index, false))
        .map_or(PreviewView::Empty, |pane| PreviewView::Single { pane })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SelectionController;
    use crate::media::{MediaItem, MediaKind, SourceInfo};
    use crate::store::TypeFilter;

    fn store_with(kinds: &[MediaKind]) -> MediaStore {
        let mut store = MediaStore::new();
        for (i, kind) in kinds.iter().enumerate() {
            let name = format!("f{i}");
            store.insert_front(MediaItem::new(name.clone(), *kind, format!("/view?filename={name}"), SourceInfo::default()));
        }
        store
    }

    fn draw(store: &MediaStore) -> WidgetView {
        render(store, &SelectionController::default().layout(), &ViewFlags::default())
    }

    #[test]
    fn test_empty_store() {
        let view = draw(&MediaStore::new());
        assert!(view.tiles.is_empty());
        assert_eq!(view.preview, PreviewView::Empty);
        assert_eq!(view.empty_state, Some(EmptyState::NoItems));
        assert!(!view.toolbar.clear_enabled);
        assert!(!view.toolbar.export_enabled);
    }

    #[test]
    fn test_tiles_mirror_sets() {
        let mut store = store_with(&[MediaKind::Image, MediaKind::Image, MediaKind::Image]);
        store.select_only(1);
        store.toggle_tag(2);

        let view = draw(&store);

        assert_eq!(view.tiles.len(), 3);
        assert!(view.tiles[1].selected && view.tiles[1].focused);
        assert!(view.tiles[2].tagged);
        assert!(!view.tiles[0].selected);
        assert_eq!(view.tiles[2].label, 3);
        assert_eq!(view.tiles[1].classes(), ["vewd-tile", "selected", "focused"]);
        assert_eq!(view.counters, Counters { total: 3, tagged: 1, visible: 3 });
    }

    #[test]
    fn test_single_preview() {
        let mut store = store_with(&[MediaKind::Image, MediaKind::Image]);
        store.select_only(1);
        match draw(&store).preview {
            PreviewView::Single { pane } => {
                assert_eq!(pane.index, 1);
                assert_eq!(pane.filename, "f0");
            }
            other => panic!("expected single pane, got {other:?}"),
        }
    }

    #[test]
    fn test_compare_uses_two_lowest() {
        let mut store = store_with(&[MediaKind::Image; 5]);
        store.select_only(4);
        store.add_selected(3);
        store.add_selected(1);

        let view = draw(&store);
        assert_eq!(view.preview.pane_count(), 2);
        match view.preview {
            PreviewView::Compare { left, right } => {
                assert_eq!((left.index, right.index), (1, 3));
                assert!(!left.active && !right.active);
            }
            other => panic!("expected comparison, got {other:?}"),
        }
    }

    #[test]
    fn test_hidden_tiles_and_all_hidden_state() {
        let mut store = store_with(&[MediaKind::Image, MediaKind::Video, MediaKind::Image]);
        store.set_type_filter(TypeFilter::Audio);

        let view = draw(&store);
        assert!(view.tiles.iter().all(|t| t.hidden));
        assert_eq!(view.empty_state, Some(EmptyState::AllHidden { hidden: 3 }));
        assert_eq!(view.toolbar.type_filter, TypeFilter::Audio);
    }

    #[test]
    fn test_export_button_follows_targets() {
        let mut store = store_with(&[MediaKind::Image, MediaKind::Image]);
        store.clear_selection();
        assert!(!draw(&store).toolbar.export_enabled);

        store.toggle_tag(0);
        store.set_tag_filter_only(true);
        assert!(draw(&store).toolbar.export_enabled);
    }

    #[test]
    fn test_counter_summary() {
        let counters = Counters { total: 1, tagged: 0, visible: 1 };
        assert_eq!(counters.summary(), "1 item · 0 ♥");
    }
}
