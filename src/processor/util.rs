//! Realtime helpers for the process call.

use std::marker::PhantomData;

#[cfg(all(target_arch = "aarch64", not(miri)))]
const AARCH64_FTZ_BIT: u64 = 1 << 24;

/// Run the plugin's process function. Flush-to-zero is enabled for the duration of the call if the
/// host hasn't done so already, and with the `assert_process_allocs` feature any allocation inside
/// `f` aborts the program in debug builds.
pub fn process_wrapper<T, F: FnOnce() -> T>(f: F) -> T {
    let _ftz_guard = ScopedFtz::enable();

    cfg_if::cfg_if! {
        if #[cfg(all(debug_assertions, feature = "assert_process_allocs"))] {
            assert_no_alloc::assert_no_alloc(f)
        } else {
            f()
        }
    }
}

/// Enables the CPU's flush-to-zero flag while this object is in scope, and restores the old mode
/// when it gets dropped.
struct ScopedFtz {
    /// Whether FTZ was off before and needs to be turned off again.
    should_disable_again: bool,
    /// This changes the current thread's floating point registers, so it must not be sent to
    /// another thread.
    _send_sync_marker: PhantomData<*const ()>,
}

impl ScopedFtz {
    #[allow(deprecated)]
    fn enable() -> Self {
        #[cfg(all(target_arch = "x86_64", target_feature = "sse", not(miri)))]
        {
            use std::arch::x86_64::{
                _MM_FLUSH_ZERO_ON, _MM_GET_FLUSH_ZERO_MODE, _MM_SET_FLUSH_ZERO_MODE,
            };

            let mode = unsafe { _MM_GET_FLUSH_ZERO_MODE() };
            let should_disable_again = mode != _MM_FLUSH_ZERO_ON;
            if should_disable_again {
                unsafe { _MM_SET_FLUSH_ZERO_MODE(_MM_FLUSH_ZERO_ON) };
            }

            return Self {
                should_disable_again,
                _send_sync_marker: PhantomData,
            };
        }

        #[cfg(all(target_arch = "aarch64", not(miri)))]
        {
            // There are no intrinsics for the FPCR register
            let mut fpcr: u64;
            unsafe { std::arch::asm!("mrs {}, fpcr", out(reg) fpcr) };

            let should_disable_again = fpcr & AARCH64_FTZ_BIT == 0;
            if should_disable_again {
                unsafe { std::arch::asm!("msr fpcr, {}", in(reg) fpcr | AARCH64_FTZ_BIT) };
            }

            return Self {
                should_disable_again,
                _send_sync_marker: PhantomData,
            };
        }

        #[allow(unreachable_code)]
        Self {
            should_disable_again: false,
            _send_sync_marker: PhantomData,
        }
    }
}

impl Drop for ScopedFtz {
    #[allow(deprecated)]
    fn drop(&mut self) {
        if !self.should_disable_again {
            return;
        }

        #[cfg(all(target_arch = "x86_64", target_feature = "sse", not(miri)))]
        {
            unsafe {
                std::arch::x86_64::_MM_SET_FLUSH_ZERO_MODE(std::arch::x86_64::_MM_FLUSH_ZERO_OFF)
            };
        }

        #[cfg(all(target_arch = "aarch64", not(miri)))]
        {
            let mut fpcr: u64;
            unsafe { std::arch::asm!("mrs {}, fpcr", out(reg) fpcr) };
            unsafe { std::arch::asm!("msr fpcr, {}", in(reg) fpcr & !AARCH64_FTZ_BIT) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_closure_result() {
        assert_eq!(process_wrapper(|| 42), 42);
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "sse", not(miri)))]
    #[test]
    #[allow(deprecated)]
    fn ftz_is_scoped() {
        use std::arch::x86_64::{_MM_FLUSH_ZERO_ON, _MM_GET_FLUSH_ZERO_MODE};

        let before = unsafe { _MM_GET_FLUSH_ZERO_MODE() };
        let inside = process_wrapper(|| unsafe { _MM_GET_FLUSH_ZERO_MODE() });

        assert_eq!(inside, _MM_FLUSH_ZERO_ON);
        assert_eq!(unsafe { _MM_GET_FLUSH_ZERO_MODE() }, before);
    }
}
