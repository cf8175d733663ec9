//! Tracing initialization.
//!
//! - The `log_level` preference picks the verbosity of medianame's own events;
//!   dependencies stay at warn unless the level is quiet.
//! - Console logs go to stderr so they never interleave with the prompt on stdout.
//! - `log_file` adds a non-blocking file layer, refused when an ancestor is a symlink.

use anyhow::Result;
use chrono::Local;
use medianame::output::Output;
use medianame::platform::open_log_file_secure_append;
use medianame::{default_log_path, path_has_symlink_ancestor, LogLevel};
use std::fmt as stdfmt;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

/// Filter directives for a level: normal shows info, info shows debug, debug shows trace.
fn filter_directives(lvl: &LogLevel) -> String {
    let own = match lvl {
        LogLevel::Quiet => return "error".to_string(),
        LogLevel::Normal => "info",
        LogLevel::Info => "debug",
        LogLevel::Debug => "trace",
    };
    format!("warn,medianame={own}")
}

fn open_file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), String> {
    match path_has_symlink_ancestor(path) {
        Ok(false) => {}
        Ok(true) => return Err("an ancestor directory is a symlink".into()),
        Err(e) => return Err(format!("could not check for symlinks: {e}")),
    }
    let file = open_log_file_secure_append(path).map_err(|e| e.to_string())?;
    Ok(tracing_appender::non_blocking(file))
}

/// Initialize tracing. Returns the file appender's WorkerGuard when file logging
/// is active; hold it until exit so buffered lines are flushed.
pub fn init_tracing(
    lvl: &LogLevel,
    log_file: Option<&Path>,
    json: bool,
    out: &Output,
) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::new(filter_directives(lvl));

    let (file_writer, guard) = match log_file.map(|p| (p, open_file_writer(p))) {
        Some((_, Ok((writer, guard)))) => (Some(writer), Some(guard)),
        Some((path, Err(reason))) => {
            out.warn(&format!(
                "File logging to '{}' was not enabled: {reason}. Logs will continue to stderr.",
                path.display()
            ));
            if let Some(def) = default_log_path() {
                out.info(&format!("The default log path is {}", def.display()));
            }
            (None, None)
        }
        None => (None, None),
    };

    // Option<Layer> is itself a layer, so one chain covers both cases.
    if json {
        let console = tsfmt::layer()
            .event_format(tsfmt::format().json())
            .with_timer(LocalHumanTime)
            .with_writer(std::io::stderr);
        let file_layer = file_writer.map(|w| {
            tsfmt::layer()
                .event_format(tsfmt::format().json())
                .with_timer(LocalHumanTime)
                .with_ansi(false)
                .with_writer(w)
        });
        registry().with(filter).with(console).with(file_layer).try_init()?;
    } else {
        let console = tsfmt::layer()
            .compact()
            .with_timer(LocalHumanTime)
            .with_target(false)
            .with_ansi(out.color_enabled())
            .with_writer(std::io::stderr);
        let file_layer = file_writer.map(|w| {
            tsfmt::layer()
                .compact()
                .with_timer(LocalHumanTime)
                .with_ansi(false)
                .with_writer(w)
        });
        registry().with(filter).with(console).with(file_layer).try_init()?;
    }
    Ok(guard)
}
