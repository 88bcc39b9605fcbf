//! Output formatting for CLI display
//!
//! Plain-text renderings of view descriptions, notices and export outcomes.
//! Quiet mode drops decoration and prints only the essential field.

use crate::export::ExportOutcome;
use crate::notices::{Notice, NoticeLevel};
use crate::view::{EmptyState, PreviewView, TileView, WidgetView};
use colored::Colorize;

/// Format one grid tile as a list line
///
/// Markers: `>` focus, `*` selected, `♥` tagged, `~` hidden by a filter.
#[must_use]
pub fn tile_line(tile: &TileView, quiet: bool) -> String {
    if quiet {
        return tile.filename.clone();
    }

    let focus = if tile.focused { ">" } else { " " };
    let selected = if tile.selected { "*" } else { " " };
    let tagged = if tile.tagged { "♥" } else { " " };
    let line = format!("{focus}{selected}{tagged} {:>3}  {} ({})", tile.label, tile.filename, tile.kind);

    if tile.hidden {
        format!("{} {}", line.dimmed(), "~".dimmed())
    } else if tile.selected {
        line.bold().to_string()
    } else {
        line
    }
}

/// Color a notice by level
#[must_use]
pub fn notice_line(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => notice.text.clone(),
        NoticeLevel::Success => notice.text.green().to_string(),
        NoticeLevel::Warning => notice.text.yellow().to_string(),
        NoticeLevel::Error => notice.text.red().to_string(),
    }
}

/// Describe an export outcome
#[must_use]
pub fn outcome_line(outcome: &ExportOutcome) -> String {
    notice_line(&outcome.notice())
}

/// Multi-line summary of a view: counters, preview and empty state
#[must_use]
pub fn view_summary(view: &WidgetView) -> String {
    let mut lines = vec![format!(
        "{} ({} visible, {} columns, {})",
        view.counters.summary().bold(),
        view.counters.visible,
        view.columns,
        if view.toolbar.fullscreen { "fullscreen" } else { "inline" }
    )];

    lines.push(format!(
        "filter: {}{}  auto-export: {}",
        view.toolbar.type_filter,
        if view.toolbar.tag_filter_active { " + tagged" } else { "" },
        if view.toolbar.auto_export { "on" } else { "off" }
    ));

    match &view.preview {
        PreviewView::Empty => lines.push("preview: (none)".to_string()),
        PreviewView::Single { pane } => lines.push(format!("preview: {} {}", pane.label, pane.filename)),
        PreviewView::Compare { left, right } => lines.push(format!(
            "compare: {} {} | {} {}",
            left.label, left.filename, right.label, right.filename
        )),
    }

    match view.empty_state {
        Some(EmptyState::NoItems) => lines.push("No items".dimmed().to_string()),
        Some(EmptyState::AllHidden { hidden }) => {
            lines.push(format!("{hidden} item(s) hidden by filters").yellow().to_string());
        }
        None => {}
    }

    if let Some(notice) = &view.notice {
        lines.push(notice_line(notice));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{ItemId, MediaKind};

    fn tile() -> TileView {
        TileView {
            id: ItemId(1),
            index: 0,
            label: 1,
            filename: "a.png".into(),
            kind: MediaKind::Image,
            source: String::new(),
            selected: false,
            focused: true,
            tagged: true,
            hidden: false,
        }
    }

    #[test]
    fn test_tile_line_markers() {
        colored::control::set_override(false);
        assert_eq!(tile_line(&tile(), false), "> ♥   1  a.png (image)");
        assert_eq!(tile_line(&tile(), true), "a.png");
    }

    #[test]
    fn test_outcome_line() {
        colored::control::set_override(false);
        assert_eq!(outcome_line(&ExportOutcome::NothingToExport), "Nothing to export");
    }
}
