//! General conversion functions and utilities.

use backtrace::Backtrace;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;

pub const MINUS_INFINITY_DB: f32 = -100.0;
pub const MINUS_INFINITY_GAIN: f32 = 1e-5; // 10f32.powf(MINUS_INFINITY_DB / 20)

/// The environment variable used to redirect the log output. See [`setup_logger()`].
pub const LOG_ENV_VAR: &str = "TEMPLATE_LOG";

/// Temporarily allow allocations within `func` if the crate was configured with the
/// `assert_process_allocs` feature.
#[cfg(all(debug_assertions, feature = "assert_process_allocs"))]
pub fn permit_alloc<T, F: FnOnce() -> T>(func: F) -> T {
    assert_no_alloc::permit_alloc(func)
}

/// Temporarily allow allocations within `func` if the crate was configured with the
/// `assert_process_allocs` feature.
#[cfg(not(all(debug_assertions, feature = "assert_process_allocs")))]
pub fn permit_alloc<T, F: FnOnce() -> T>(func: F) -> T {
    func()
}

/// Convert decibels to a voltage gain ratio, treating anything below -100 dB as minus infinity.
#[inline]
pub fn db_to_gain(dbs: f32) -> f32 {
    if dbs > MINUS_INFINITY_DB {
        10.0f32.powf(dbs * 0.05)
    } else {
        0.0
    }
}

/// Convert a voltage gain ratio to decibels. Gain ratios that aren't positive will be treated as
/// [`MINUS_INFINITY_DB`].
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    f32::max(gain, MINUS_INFINITY_GAIN).log10() * 20.0
}

/// Set up the logger so that the `plugin_*!()` logging and assertion macros log output to a
/// centralized location and panics also get written there. By default this logs to STDERR. The
/// `TEMPLATE_LOG` environment variable can be set to:
///
/// - `stderr`, in which case the log output always gets written to STDERR.
/// - A file path, in which case the output gets appended to the end of that file which will be
///   created if necessary.
///
/// Calling this more than once is harmless, only the first call installs a logger.
pub fn setup_logger() {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };

    // Errors show their module in debug builds, the rest of the output stays terse
    let config = ConfigBuilder::new()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(if cfg!(debug_assertions) {
            LevelFilter::Error
        } else {
            LevelFilter::Off
        })
        .set_location_level(LevelFilter::Off)
        .build();

    let destination = std::env::var(LOG_ENV_VAR).ok();
    let logger_set = match destination.as_deref() {
        None | Some("") | Some("stderr") => TermLogger::init(
            log_level,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )
        .is_ok(),
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => WriteLogger::init(log_level, config, file).is_ok(),
            Err(err) => {
                eprintln!("Could not open '{path}' for logging, falling back to STDERR: {err}");
                TermLogger::init(log_level, config, TerminalMode::Stderr, ColorChoice::Auto)
                    .is_ok()
            }
        },
    };

    if logger_set {
        log_panics();
    }
}

/// Route panics through the logger so they end up wherever `TEMPLATE_LOG` points. Formatting the
/// message allocates, hence the `permit_alloc()`.
fn log_panics() {
    std::panic::set_hook(Box::new(|info| {
        permit_alloc(|| {
            let thread = std::thread::current();
            let thread = thread.name().unwrap_or("<unnamed>");
            let payload = info
                .payload()
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
                .unwrap_or("<non-string payload>");
            let location = info
                .location()
                .map(|location| format!(" at {}:{}", location.file(), location.line()))
                .unwrap_or_default();

            plugin_error!(
                target: "panic",
                "thread '{thread}' panicked{location}: {payload}\n{:?}",
                Backtrace::new()
            );
        })
    }));
}
