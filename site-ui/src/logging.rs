//! Process-wide tracing setup for the `site` host.
//!
//! One registry carries a reloadable level filter (the ceiling for every
//! output), a stdout layer with its own on/off gate, and a file layer whose
//! target can be attached after startup.

use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use anyhow::{Result, anyhow};
use chrono::Local;
use tracing::{Event, Level, Subscriber, error};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

use crate::config::LoggingConfig;

const DEFAULT_DIRECTIVE: &str = "info,site_ui=debug";

/// `<local time> <LEVEL> <file>:<line> <fields>`, colored on a terminal.
struct LocalTimeFormat;

impl LocalTimeFormat {
    fn level_color(level: Level) -> &'static str {
        match level {
            Level::ERROR => "\x1b[1;31m",
            Level::WARN => "\x1b[1;33m",
            Level::INFO => "\x1b[1;32m",
            Level::DEBUG => "\x1b[1;34m",
            Level::TRACE => "\x1b[1;35m",
        }
    }
}

impl<S, N> FormatEvent<S, N> for LocalTimeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
        let location = match (meta.file(), meta.line()) {
            (Some(file), Some(line)) => {
                let file = file.strip_prefix("src/").unwrap_or(file);
                Some(format!("{file}:{line}"))
            }
            _ => None,
        };

        if writer.has_ansi_escapes() {
            let color = Self::level_color(*meta.level());
            write!(writer, "\x1b[2m{timestamp}\x1b[0m {color}{:>5}\x1b[0m ", meta.level())?;
            if let Some(location) = location {
                write!(writer, "\x1b[36m{location}\x1b[0m ")?;
            }
        } else {
            write!(writer, "{timestamp} {:>5} ", meta.level())?;
            if let Some(location) = location {
                write!(writer, "{location} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

type SharedFile = Arc<Mutex<Option<File>>>;

fn lock_file(slot: &SharedFile) -> MutexGuard<'_, Option<File>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Log file that can be attached or detached while the subscriber runs.
/// Writes are dropped while nothing is attached.
#[derive(Clone)]
struct LogFileSlot(SharedFile);

struct LogFileWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.as_mut().map_or(Ok(()), File::flush)
    }
}

impl<'a> MakeWriter<'a> for LogFileSlot {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter(lock_file(&self.0))
    }
}

type Reloader = Box<dyn Fn(EnvFilter) -> Result<()> + Send + Sync>;

/// Handles captured when the subscriber is installed.
struct Controls {
    level: Reloader,
    stdout_gate: Reloader,
    file: SharedFile,
}

static CONTROLS: OnceLock<Controls> = OnceLock::new();

fn controls() -> Result<&'static Controls> {
    CONTROLS.get().ok_or_else(|| anyhow!("logging not yet initialized"))
}

fn reloader<S>(
    handle: reload::Handle<EnvFilter, S>,
    what: &'static str,
) -> Reloader
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |filter| {
        handle
            .reload(filter)
            .map_err(|e| anyhow!("{what} reload failed: {e}"))
    })
}

fn initial_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Replaces the level filter. Takes a bare level or any `EnvFilter`
/// directive such as `"warn,site_core=trace"`.
pub fn set_log_level(level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(level).map_err(|e| anyhow!("invalid log level '{level}': {e}"))?;
    (controls()?.level)(filter)
}

/// Mutes or unmutes stdout. The log file keeps receiving records.
pub fn set_stdout_enabled(enabled: bool) -> Result<()> {
    let gate = if enabled { "trace" } else { "off" };
    (controls()?.stdout_gate)(EnvFilter::new(gate))
}

/// Appends records to `path`, replacing any file already attached.
/// The parent directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow!("cannot open log file '{}': {e}", path.display()))?;
    *lock_file(&controls()?.file) = Some(file);
    Ok(())
}

pub fn disable_file_logging() {
    if let Ok(controls) = controls() {
        *lock_file(&controls.file) = None;
    }
}

/// Installs the global subscriber with the default level. A second call
/// is a no-op.
pub fn init_default_logging() {
    install(DEFAULT_DIRECTIVE);
}

/// Installs the global subscriber and applies `config`.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    install(&config.level);
    set_stdout_enabled(config.stdout)?;
    if let Some(path) = &config.file {
        enable_file_logging(path)?;
    }
    Ok(())
}

fn install(level: &str) {
    let file: SharedFile = Arc::new(Mutex::new(None));

    let (level_filter, level_handle) = reload::Layer::new(initial_filter(level));
    let (stdout_gate, stdout_handle) = reload::Layer::new(EnvFilter::new("trace"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalTimeFormat)
        .with_ansi(io::stdout().is_terminal())
        .with_filter(stdout_gate);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalTimeFormat)
        .with_ansi(false)
        .with_writer(LogFileSlot(file.clone()));

    let installed = tracing_subscriber::registry()
        .with(level_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed {
        let _ = CONTROLS.set(Controls {
            level: reloader(level_handle, "level filter"),
            stdout_gate: reloader(stdout_handle, "stdout gate"),
            file,
        });
    }
}

/// Logs the failure of a spawned task.
pub fn log_task_error(
    task_name: &'static str,
    result: Result<()>,
) {
    if let Err(error) = result {
        error!(task = task_name, ?error, "background task failed");
    }
}
