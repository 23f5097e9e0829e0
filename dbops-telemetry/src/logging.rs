use dbops_config::Environment;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::io::{self, Write};
use std::panic::PanicHookInfo;
use std::sync::{Once, OnceLock};
use thiserror::Error;
use tracing::subscriber::{SetGlobalDefaultError, set_global_default};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{self, InitError},
};
use tracing_log::{LogTracer, log_tracer::SetLoggerError};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber, Registry, fmt, layer::SubscriberExt};

/// JSON field carrying the account id on every production log line.
const ACCOUNT_KEY_IN_LOG: &str = "account_id";

/// Directory receiving the rotated log files.
const LOG_DIR: &str = "logs";

const LOG_FILE_SUFFIX: &str = "log";

/// Rotated files kept on disk before the oldest is removed.
const MAX_LOG_FILES: usize = 5;

/// Errors that can occur during tracing initialization.
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to build rolling file appender: {0}")]
    InitAppender(#[from] InitError),

    #[error("failed to init log tracer: {0}")]
    InitLogTracer(#[from] SetLoggerError),

    #[error("failed to set global default subscriber: {0}")]
    SetGlobalDefault(#[from] SetGlobalDefaultError),

    #[error("an io error occurred: {0}")]
    Io(#[from] io::Error),
}

/// Keeps buffered log lines alive until dropped.
///
/// Hold it in `main` for the lifetime of the process; dropping the file
/// variant flushes whatever the background writer still has queued.
#[must_use]
pub enum LogFlusher {
    Flusher(WorkerGuard),
    NullFlusher,
}

static INIT_TEST_TRACING: Once = Once::new();

/// Routes test logs to the terminal when `ENABLE_TRACING` is set.
///
/// ```bash
/// ENABLE_TRACING=1 cargo test -p dbops-operator
/// ```
pub fn init_test_tracing() {
    INIT_TEST_TRACING.call_once(|| {
        if std::env::var("ENABLE_TRACING").is_ok() {
            // Without an explicit environment we would default to prod and log to files.
            Environment::Dev.set();
            let _log_flusher =
                init_tracing("test").expect("Failed to initialize tracing for tests");
        }
    });
}

static ACCOUNT_ID: OnceLock<String> = OnceLock::new();

/// Sets the account id attached to every JSON log line. Only the first call wins.
pub fn set_global_account_id(account_id: String) {
    let _ = ACCOUNT_ID.set(account_id);
}

/// Returns the account id set by [`set_global_account_id`], if any.
pub fn get_global_account_id() -> Option<&'static str> {
    ACCOUNT_ID.get().map(|s| s.as_str())
}

/// Adds `account_id` to a single JSON log line.
///
/// Returns `None` when the line is not a JSON object or already carries the
/// field, in which case the caller writes the line unchanged.
fn inject_account_id(line: &str, account_id: &str) -> Option<String> {
    let Ok(serde_json::Value::Object(mut map)) = serde_json::from_str::<serde_json::Value>(line)
    else {
        return None;
    };

    if map.contains_key(ACCOUNT_KEY_IN_LOG) {
        return None;
    }

    map.insert(
        ACCOUNT_KEY_IN_LOG.to_owned(),
        serde_json::Value::String(account_id.to_owned()),
    );

    let mut output = serde_json::to_string(&map).ok()?;
    if line.ends_with('\n') {
        output.push('\n');
    }

    Some(output)
}

/// Writer that tags JSON log lines with the global account id.
struct AccountInjectingWriter<W> {
    inner: W,
}

impl<W> AccountInjectingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W> Write for AccountInjectingWriter<W>
where
    W: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(account_id) = get_global_account_id()
            && let Ok(line) = std::str::from_utf8(buf)
            && let Some(tagged) = inject_account_id(line, account_id)
        {
            // Report the original length so the formatter does not retry.
            self.inner.write_all(tagged.as_bytes())?;
            return Ok(buf.len());
        }

        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Initializes tracing for the application.
pub fn init_tracing(app_name: &str) -> Result<LogFlusher, TracingError> {
    init_tracing_with_account(app_name, None)
}

/// Initializes tracing and tags production log lines with `account_id`.
///
/// The `log` crate is bridged into `tracing` so events from `kube` and its
/// HTTP stack share the same output. The filter comes from `RUST_LOG` and
/// defaults to `info`.
pub fn init_tracing_with_account(
    app_name: &str,
    account_id: Option<String>,
) -> Result<LogFlusher, TracingError> {
    if let Some(account_id) = account_id {
        set_global_account_id(account_id);
    }

    LogTracer::init()?;

    let is_prod = Environment::load()?.is_prod();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let log_flusher = if is_prod {
        configure_prod_tracing(filter, app_name)?
    } else {
        configure_dev_tracing(filter)?
    };

    set_tracing_panic_hook();

    Ok(log_flusher)
}

fn configure_prod_tracing(filter: EnvFilter, app_name: &str) -> Result<LogFlusher, TracingError> {
    let file_appender = rolling::Builder::new()
        .filename_prefix(app_name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .rotation(rolling::Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .build(LOG_DIR)?;

    let (file_appender, guard) = tracing_appender::non_blocking(file_appender);

    let format = fmt::format()
        .with_level(true)
        .with_ansi(false)
        .with_target(false);

    let subscriber = Registry::default().with(filter).with(
        fmt::layer()
            .event_format(format)
            .with_writer(move || AccountInjectingWriter::new(file_appender.make_writer()))
            .json()
            .with_current_span(true)
            .with_span_list(true),
    );

    set_global_default(subscriber)?;

    Ok(LogFlusher::Flusher(guard))
}

fn configure_dev_tracing(filter: EnvFilter) -> Result<LogFlusher, TracingError> {
    let format = fmt::format()
        .with_level(true)
        .with_ansi(true)
        .pretty()
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    let subscriber = FmtSubscriber::builder()
        .event_format(format)
        .with_env_filter(filter)
        .finish();

    set_global_default(subscriber)?;

    Ok(LogFlusher::NullFlusher)
}

/// Logs panics through `tracing` before delegating to the previous hook.
///
/// The default hook only writes to stderr, which never reaches the log files.
fn set_tracing_panic_hook() {
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log_panic(info);
        prev_hook(info);
    }));
}

fn log_panic(panic_info: &PanicHookInfo) {
    let backtrace = Backtrace::capture();
    let (backtrace, note) = match backtrace.status() {
        BacktraceStatus::Captured => (Some(backtrace), None),
        BacktraceStatus::Disabled => (
            None,
            Some("run with RUST_BACKTRACE=1 to display backtraces"),
        ),
        BacktraceStatus::Unsupported => {
            (None, Some("backtraces are not supported on this platform"))
        }
        _ => (None, Some("backtrace status is unknown")),
    };

    let payload = panic_info
        .payload()
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| {
            panic_info
                .payload()
                .downcast_ref::<String>()
                .map(String::as_str)
        })
        .unwrap_or("unknown panic payload");

    let location = panic_info.location().map(|location| location.to_string());

    tracing::error!(
        panic.payload = payload,
        panic.location = location,
        panic.backtrace = backtrace.map(tracing::field::display),
        panic.note = note,
        "a panic occurred",
    );
}
