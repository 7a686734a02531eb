//! Stderr logger for the `log` facade.
//!
//! Library code logs through `log::debug!` and friends. Nothing is printed
//! until this logger is switched on with [`enable`] (the CLI's `--debug`
//! flag) or the `TRUENO_POINTS_DEBUG=1` environment variable.
//!
//! Format: `[+0000ms] [LEVEL] [target] message`

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

/// Environment variable that turns logging on.
pub const ENV_VAR: &str = "TRUENO_POINTS_DEBUG";

/// Global debug mode flag.
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Start time stored as millis since UNIX epoch (atomic-safe).
static START_TIME_MS: AtomicU64 = AtomicU64::new(0);

static LOGGER: StderrLogger = StderrLogger;

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Installs the logger and starts the clock.
///
/// Safe to call more than once. If another logger was installed first it
/// stays in charge.
pub fn enable() {
    START_TIME_MS.store(now_ms(), Ordering::SeqCst);
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
}

/// Silences the logger.
pub fn disable() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

/// Returns true if debug mode is enabled.
#[inline]
pub fn is_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Whether `value` of [`ENV_VAR`] asks for logging.
fn env_value_enables(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Enables logging when [`ENV_VAR`] is set. Returns whether it did.
pub fn enable_from_env() -> bool {
    let requested = std::env::var(ENV_VAR).is_ok_and(|v| env_value_enables(&v));
    if requested {
        enable();
    }
    requested
}

/// Gets elapsed time since debug was enabled.
fn elapsed_ms() -> u64 {
    let start = START_TIME_MS.load(Ordering::Relaxed);
    if start == 0 {
        return 0;
    }
    now_ms().saturating_sub(start)
}

fn color_code(level: log::Level) -> &'static str {
    match level {
        log::Level::Trace => "\x1b[90m", // Gray
        log::Level::Debug => "\x1b[36m", // Cyan
        log::Level::Info => "\x1b[32m",  // Green
        log::Level::Warn => "\x1b[33m",  // Yellow
        log::Level::Error => "\x1b[31m", // Red
    }
}

/// One log line without color codes.
fn format_line(elapsed: u64, level: log::Level, target: &str, message: &str) -> String {
    format!("[+{elapsed:04}ms] [{:5}] [{target}] {message}", level.as_str())
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        is_enabled()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = record.level();
        let line = format_line(elapsed_ms(), level, record.target(), &record.args().to_string());
        let _ = writeln!(io::stderr(), "{}{line}\x1b[0m", color_code(level));
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Logs `-> operation` on creation and `<- operation (N.NNms)` on drop.
pub struct TimingGuard {
    operation: String,
    start: Instant,
}

impl TimingGuard {
    /// Creates a new timing guard.
    pub fn new(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        log::trace!(target: "trueno_points::timing", "-> {operation}");
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        log::trace!(
            target: "trueno_points::timing",
            "<- {} ({:.2}ms)",
            self.operation,
            self.start.elapsed().as_secs_f64() * 1000.0
        );
    }
}
