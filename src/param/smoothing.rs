//! Sample-accurate smoothing for parameter changes.

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicI32, Ordering};

/// Controls if and how a parameter's value changes get smoothed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothingStyle {
    /// Changes take effect immediately.
    None,
    /// The value moves towards the target at a constant rate, reaching it after exactly this many
    /// milliseconds.
    Linear(f32),
    /// A single-pole lowpass towards the target. Reaches 99.99% of the target after this many
    /// milliseconds and then snaps to the target on the last step.
    Exponential(f32),
}

impl SmoothingStyle {
    /// The number of samples it takes to reach the target at `sample_rate`.
    #[inline]
    pub fn num_steps(&self, sample_rate: f32) -> u32 {
        plugin_debug_assert!(sample_rate > 0.0);

        match self {
            Self::None => 1,
            Self::Linear(time) | Self::Exponential(time) => {
                plugin_debug_assert!(*time >= 0.0);
                (sample_rate * time / 1000.0).round() as u32
            }
        }
    }

    /// For linear smoothing this is the per-sample increment, for exponential smoothing this is the
    /// coefficient the current value gets multiplied by.
    #[inline]
    fn step_size(&self, start: f32, target: f32, num_steps: u32) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Linear(_) => (target - start) / (num_steps as f32),
            Self::Exponential(_) => 0.0001f64.powf((num_steps as f64).recip()) as f32,
        }
    }

    #[inline]
    fn next(&self, current: f32, target: f32, step_size: f32) -> f32 {
        match self {
            Self::None => target,
            Self::Linear(_) => current + step_size,
            Self::Exponential(_) => (current * step_size) + (target * (1.0 - step_size)),
        }
    }
}

/// Produces one smoothed value per sample. The state is atomic so a parameter and its smoother can
/// be shared between the audio thread and the editor through an `Arc`.
#[derive(Debug)]
pub struct Smoother {
    pub style: SmoothingStyle,
    /// Signed so that skipping past the end can't underflow.
    steps_left: AtomicI32,
    step_size: AtomicF32,
    current: AtomicF32,
    target: AtomicF32,
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(SmoothingStyle::None)
    }
}

impl Clone for Smoother {
    fn clone(&self) -> Self {
        Self {
            style: self.style,
            steps_left: AtomicI32::new(self.steps_left.load(Ordering::Relaxed)),
            step_size: AtomicF32::new(self.step_size.load(Ordering::Relaxed)),
            current: AtomicF32::new(self.current.load(Ordering::Relaxed)),
            target: AtomicF32::new(self.target.load(Ordering::Relaxed)),
        }
    }
}

impl Smoother {
    pub fn new(style: SmoothingStyle) -> Self {
        Self {
            style,
            steps_left: AtomicI32::new(0),
            step_size: AtomicF32::new(0.0),
            current: AtomicF32::new(0.0),
            target: AtomicF32::new(0.0),
        }
    }

    /// A smoother that doesn't smooth. Same as `Smoother::default()`.
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    pub fn steps_left(&self) -> i32 {
        self.steps_left.load(Ordering::Relaxed)
    }

    /// Whether [`next()`][Self::next()] will still produce values other than the target.
    #[inline]
    pub fn is_smoothing(&self) -> bool {
        self.steps_left() > 0
    }

    /// Jump straight to `value` without smoothing.
    pub fn reset(&self, value: f32) {
        self.target.store(value, Ordering::Relaxed);
        self.current.store(value, Ordering::Relaxed);
        self.steps_left.store(0, Ordering::Relaxed);
    }

    /// Start smoothing from the current value towards `target`.
    pub fn set_target(&self, sample_rate: f32, target: f32) {
        self.target.store(target, Ordering::Relaxed);

        let steps_left = self.style.num_steps(sample_rate) as i32;
        self.steps_left.store(steps_left, Ordering::Relaxed);

        let current = self.current.load(Ordering::Relaxed);
        self.step_size.store(
            if steps_left > 0 {
                self.style.step_size(current, target, steps_left as u32)
            } else {
                0.0
            },
            Ordering::Relaxed,
        );
    }

    /// Get the value for the next sample. Call this exactly once per sample.
    #[allow(clippy::should_implement_trait)]
    #[inline]
    pub fn next(&self) -> f32 {
        let target = self.target.load(Ordering::Relaxed);
        if self.steps_left.load(Ordering::Relaxed) <= 0 {
            return target;
        }

        // The last step always lands exactly on the target, exponential smoothing never would
        let old_steps_left = self.steps_left.fetch_sub(1, Ordering::Relaxed);
        let new = if old_steps_left == 1 {
            target
        } else {
            let current = self.current.load(Ordering::Relaxed);
            let step_size = self.step_size.load(Ordering::Relaxed);
            self.style.next(current, target, step_size)
        };
        self.current.store(new, Ordering::Relaxed);

        new
    }

    /// The value produced by the last call to [`next()`][Self::next()].
    pub fn previous_value(&self) -> f32 {
        self.current.load(Ordering::Relaxed)
    }

    /// Fill `block_values` with consecutive smoothed values.
    pub fn next_block_exact(&self, block_values: &mut [f32]) {
        for value in block_values.iter_mut() {
            *value = self.next();
        }
    }
}
