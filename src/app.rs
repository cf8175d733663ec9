//! Application orchestrator.
//! Builds the configuration, initializes logging, handles directives, discovers
//! targets, installs the Ctrl-C handler and runs the batch.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use medianame::choice::{AutoChooser, Chooser, TerminalChooser};
use medianame::cli::Args;
use medianame::config::xml::config_write_path;
use medianame::output::Output;
use medianame::processor::{print_summary, Processor};
use medianame::{shutdown, Configuration, MediaNameError, ParsedNameProvider, Target};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Overrides are validated as a unit; a bad one ends the run before anything else happens.
    let mut cfg = Configuration::new(args.overrides()).map_err(|e| {
        Output::for_terminal(args.nocolor).error(&e.to_string());
        e
    })?;
    let loaded = cfg.load_file();

    let out = Output::for_terminal(cfg.flag("nocolor"));
    let guard_opt = init_tracing(
        &cfg.log_level(),
        cfg.log_file().as_deref(),
        cfg.flag("log_json"),
        &out,
    )
    .map_err(|e| {
        out.error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    match &loaded {
        Ok(path) => info!(path = %path.display(), "Loaded configuration file"),
        Err(MediaNameError::ConfigNotFound) => debug!("No configuration file; using defaults"),
        Err(e) => {
            warn!(code = e.code(), kind = e.kind(), error = %e, "Ignoring configuration file");
            out.warn(&format!("Ignoring configuration file: {e}"));
        }
    }

    if cfg.flag("version") {
        println!("medianame version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if cfg.flag("write_config") {
        let path = config_write_path().context("Could not determine a configuration file path")?;
        cfg.write_file(&path)
            .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
        out.info(&format!("Configuration written to {}", path.display()));
        return Ok(());
    }
    if cfg.flag("config") {
        println!("{}", cfg.to_json()?);
        return Ok(());
    }

    let mut targets = Target::populate_paths(&args.targets, &cfg).map_err(|e| {
        out.error(&e.to_string());
        e
    })?;
    if targets.is_empty() {
        println!("No media files found. Run medianame --help for usage");
        return Ok(());
    }

    if cfg.flag("verbose") {
        out.key_values("Preferences", cfg.preference_view().iter());
        out.key_values("Directives", cfg.directive_view().iter());
        out.listing("Targets", targets.iter());
        println!();
    }

    // The handler only raises the flag; the batch stops at its next checkpoint
    // and the log guard is flushed once the summary is out.
    ctrlc::set_handler(move || {
        shutdown::request();
        out.warn("Received interrupt; stopping after the current step...");
    })
    .context("failed to install signal handler")?;

    let chooser: Box<dyn Chooser> = if cfg.flag("batch") {
        Box::new(AutoChooser)
    } else {
        Box::new(TerminalChooser::stdio())
    };
    let summary = Processor::new(&cfg, ParsedNameProvider, chooser, out).run(&mut targets);
    print_summary(&out, &summary);

    drop(guard_opt);
    Ok(())
}
