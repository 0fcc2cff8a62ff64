//! Macros for logging and debug assertions. [`plugin_trace!()`] and [`plugin_debug_assert!()`] are
//! compiled out during release builds, so they can be used for asserting additional invariants in
//! debug builds. Check the [`plugin_log!()`] macro for more
//! information on the logger. None of the logging functions are realtime-safe, and you should avoid
//! using them in release builds in any of the functions that may be called from an audio thread.

// NOTE: `#[macro_export]` exports these macros from the crate root. They are also re-exported from
//       this module so they can be imported through the prelude.

/// Write something to the logger. This defaults to STDERR. The logger's behavior can be controlled
/// by setting the `TEMPLATE_LOG` environment variable to:
///
/// - `stderr`, in which case the log output always gets written to STDERR.
/// - A file path, in which case the output gets appended to the end of that file which will be
///   created if necessary.
///
/// See [`setup_logger()`][crate::util::setup_logger()].
#[macro_export]
macro_rules! plugin_log {
    ($($args:tt)*) => (
        $crate::log::info!($($args)*)
    );
}
#[doc(inline)]
pub use plugin_log;

/// Similar to `plugin_log!()`, but less subtle. Used for printing warnings.
#[macro_export]
macro_rules! plugin_warn {
    ($($args:tt)*) => (
        $crate::log::warn!($($args)*)
    );
}
#[doc(inline)]
pub use plugin_warn;

/// Similar to `plugin_log!()`, but more scream-y. Used for printing fatal errors.
#[macro_export]
macro_rules! plugin_error {
    ($($args:tt)*) => (
        $crate::log::error!($($args)*)
    );
}
#[doc(inline)]
pub use plugin_error;

/// The same as `plugin_log!()`, but only shown when compiling in debug mode. Use this for
/// following the processor's lifecycle.
#[macro_export]
macro_rules! plugin_trace {
    ($($args:tt)*) => (
        $crate::util::permit_alloc(|| $crate::log::trace!($($args)*))
    );
}
#[doc(inline)]
pub use plugin_trace;

/// A `debug_assert!()` analogue that prints the error with line number information instead of
/// panicking. During tests this is upgraded to a regular panicking `debug_assert!()`.
#[macro_export]
macro_rules! plugin_debug_assert {
    ($cond:expr $(,)?) => (
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        if cfg!(test) {
           debug_assert!($cond);
        } else if cfg!(debug_assertions) && !$cond {
            $crate::util::permit_alloc(|| $crate::log::warn!(concat!("Debug assertion failed: ", stringify!($cond))));
        }
    );
    ($cond:expr, $format:expr $(, $($args:tt)*)?) => (
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        if cfg!(test) {
           debug_assert!($cond, $format, $($($args)*)?);
        } else if cfg!(debug_assertions) && !$cond {
            $crate::util::permit_alloc(|| $crate::log::warn!(concat!("Debug assertion failed: ", stringify!($cond), ", ", $format), $($($args)*)?));
        }
    );
}
#[doc(inline)]
pub use plugin_debug_assert;
