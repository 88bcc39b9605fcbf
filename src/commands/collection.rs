//! Collection commands - ingest, import, scan and clear

use crate::events::ExecutionOutput;
use crate::widget::{ImportReport, ReviewWidget};
use crate::VewdError;
use colored::Colorize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, VewdError>;

/// Ingest an execution payload from a file, or stdin when `payload` is `-`
pub fn ingest(widget: &mut ReviewWidget, payload: &Path, quiet: bool) -> Result<()> {
    let json = if payload == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(payload)?
    };

    let output = ExecutionOutput::from_json(&json)?;
    let added = widget.ingest_output(&output);
    if !quiet {
        println!("Added {added} new item(s)");
    }
    Ok(())
}

/// Upload files and add them to the collection
pub fn import(widget: &mut ReviewWidget, files: &[PathBuf], quiet: bool) -> Result<()> {
    let report = widget.import_files(files);
    print_report(&report, quiet);
    Ok(())
}

/// Import every media file in `dir`
pub fn scan(widget: &mut ReviewWidget, dir: &Path, quiet: bool) -> Result<()> {
    let report = widget.scan_folder(dir)?;
    print_report(&report, quiet);
    Ok(())
}

/// Remove everything, after confirmation unless forced
pub fn clear(widget: &mut ReviewWidget, force: bool, quiet: bool) -> Result<()> {
    let count = widget.store().len();
    if count == 0 {
        if !quiet {
            println!("Nothing to clear.");
        }
        return Ok(());
    }
    if !force && !confirm(&format!("Remove all {count} item(s)?"), quiet)? {
        println!("Cancelled.");
        return Ok(());
    }

    widget.clear_all();
    if !quiet {
        println!("{}", format!("Cleared {count} item(s)").green());
    }
    Ok(())
}

fn print_report(report: &ImportReport, quiet: bool) {
    if quiet {
        return;
    }
    println!(
        "Imported {} item(s), {} duplicate(s), {} skipped",
        report.imported, report.duplicates, report.skipped
    );
    for (path, error) in &report.failed {
        println!("  {} {}: {error}", "failed".red(), path.display());
    }
}

/// Prompt user for yes/no confirmation; quiet mode auto-confirms
fn confirm(prompt: &str, quiet: bool) -> Result<bool> {
    if quiet {
        return Ok(true);
    }

    print!("{prompt} [y/n]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
