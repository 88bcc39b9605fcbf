//! Transfer commands - export, save and save-tagged

use super::selection::select;
use crate::export::ExportTarget;
use crate::output;
use crate::widget::ReviewWidget;
use crate::VewdError;

type Result<T> = std::result::Result<T, VewdError>;

/// Export or save `positions`, or the current targets when none are given
///
/// Waits for the request to finish so the outcome can be printed.
pub fn export(widget: &mut ReviewWidget, target: ExportTarget, positions: &[usize], quiet: bool) -> Result<()> {
    if !positions.is_empty() {
        select(widget, positions, false)?;
    }
    widget.export(target);
    report(widget, quiet);
    Ok(())
}

/// Save every tagged entry
pub fn save_tagged(widget: &mut ReviewWidget, quiet: bool) -> Result<()> {
    widget.save_tagged();
    report(widget, quiet);
    Ok(())
}

fn report(widget: &mut ReviewWidget, quiet: bool) {
    for outcome in widget.wait_idle() {
        if !quiet {
            println!("{}", output::outcome_line(&outcome));
        }
    }
}
