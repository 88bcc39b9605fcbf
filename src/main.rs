//! Vewd CLI application entry point
//!
//! Drives one persisted review widget instance from a terminal. Each run
//! restores the instance from the state database, applies one command, waits
//! for background requests, prints pending notices, and exits.
//!
//! # Usage
//!
//! ```bash
//! # Feed an execution payload and look at the result
//! vewd ingest outputs.json
//! vewd list
//!
//! # Tag the second and third entries, then save everything tagged
//! vewd tag 2 3
//! vewd save-tagged
//!
//! # Work on another node's widget against a remote server
//! vewd -i node-12 --server http://gpu-box:8188 render
//! ```
//!
//! # Configuration
//!
//! Stored in the user's config directory (`~/.config/vewd/config.toml` on
//! Linux) and created with defaults on first run.

use colored::Colorize;
use std::sync::Arc;
use vewd::{
    VewdError,
    backend::HttpBackend,
    cli::{Cli, Commands},
    commands,
    config::WidgetConfig,
    export::ExportTarget,
    output,
    persist::StateStore,
    widget::ReviewWidget,
};

type Result<T> = std::result::Result<T, VewdError>;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let mut builder = env_logger::Builder::from_default_env();
    if verbose > 0 || std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = WidgetConfig::load()?;
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    let quiet = cli.quiet;

    if let Commands::Bindings = cli.command {
        return commands::bindings(&config, quiet);
    }

    let state = Arc::new(StateStore::open(config.state_db_path()?)?);
    if let Commands::Instances = cli.command {
        return commands::instances(&state, quiet);
    }

    let backend = Arc::new(HttpBackend::new(&config.server_url)?);
    let mut widget = ReviewWidget::builder(cli.instance, backend)
        .config(&config)
        .state(Arc::clone(&state))
        .build();
    if let Some(filter) = cli.type_filter {
        widget.set_type_filter(filter);
    }
    widget.set_tag_filter_only(cli.tagged_only);

    match cli.command {
        Commands::Ingest { payload } => commands::ingest(&mut widget, &payload, quiet)?,
        Commands::Import { files } => commands::import(&mut widget, &files, quiet)?,
        Commands::Scan { dir } => commands::scan(&mut widget, &dir, quiet)?,
        Commands::List => commands::list(&widget, quiet)?,
        Commands::Select { positions, range } => commands::select(&mut widget, &positions, range)?,
        Commands::Press { keys } => commands::press(&mut widget, &keys, quiet)?,
        Commands::Tag { positions } => commands::tag(&mut widget, &positions)?,
        Commands::Delete { positions } => commands::delete(&mut widget, &positions, quiet)?,
        Commands::Export { positions } => commands::export(&mut widget, ExportTarget::Export, &positions, quiet)?,
        Commands::Save { positions } => commands::export(&mut widget, ExportTarget::Save, &positions, quiet)?,
        Commands::SaveTagged => commands::save_tagged(&mut widget, quiet)?,
        Commands::Clear { force } => commands::clear(&mut widget, force, quiet)?,
        Commands::Render { json } => commands::render(&widget, json)?,
        Commands::Bindings | Commands::Instances => {}
    }

    widget.wait_idle();
    if !quiet {
        for notice in widget.notices().active() {
            eprintln!("{}", output::notice_line(notice));
        }
    }
    state.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
