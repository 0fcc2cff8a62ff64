//! Continuous (or discrete, with a step size) floating point parameters.

use atomic_float::AtomicF32;
use std::fmt::{Debug, Display};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::range::FloatRange;
use super::smoothing::{Smoother, SmoothingStyle};
use super::{Param, ParamFlags};
use crate::state::ParamValue;

/// A floating point parameter that's stored unnormalized. The range is used for the normalization
/// process.
pub struct FloatParam {
    /// The current plain, unnormalized value.
    value: AtomicF32,
    /// The current value normalized to the `[0, 1]` range.
    normalized_value: AtomicF32,
    default: f32,
    /// Interpolates between new values set by the host or the editor. Updated through
    /// [`Param::update_smoother()`].
    pub smoothed: Smoother,

    flags: ParamFlags,
    /// Called with the new plain value whenever the value changes. This may run on both the audio
    /// thread and the editor thread, so it should not do anything expensive.
    value_changed: Option<Arc<dyn Fn(f32) + Send + Sync>>,

    range: FloatRange,
    /// The distance between discrete steps. Also decides the number of decimals when no
    /// `value_to_string` function is set. Must be positive.
    step_size: Option<f32>,
    name: String,
    /// Added after the formatted value. No space is added automatically.
    unit: &'static str,
    value_to_string: Option<Arc<dyn Fn(f32) -> String + Send + Sync>>,
    /// Parses a string into a plain value. The input may or may not contain the unit.
    string_to_value: Option<Arc<dyn Fn(&str) -> Option<f32> + Send + Sync>>,
}

impl Display for FloatParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.value();
        match (&self.value_to_string, &self.step_size) {
            (Some(func), _) => write!(f, "{}{}", func(value), self.unit),
            (None, Some(step_size)) => {
                let num_digits = decimals_from_step_size(*step_size);
                write!(f, "{:.num_digits$}{}", value, self.unit)
            }
            _ => write!(f, "{}{}", value, self.unit),
        }
    }
}

impl Debug for FloatParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", &self.name, &self)
    }
}

impl Param for FloatParam {
    fn name(&self) -> &str {
        &self.name
    }

    fn unit(&self) -> &'static str {
        self.unit
    }

    #[inline]
    fn normalized_value(&self) -> f32 {
        self.normalized_value.load(Ordering::Relaxed)
    }

    fn default_normalized_value(&self) -> f32 {
        self.preview_normalized(self.default)
    }

    fn step_count(&self) -> Option<usize> {
        None
    }

    fn flags(&self) -> ParamFlags {
        self.flags
    }

    fn set_normalized_value(&self, normalized: f32) {
        self.set_plain_value(self.preview_plain(normalized));
    }

    fn normalized_value_to_string(&self, normalized: f32, include_unit: bool) -> String {
        let value = self.preview_plain(normalized);
        let unit = if include_unit { self.unit } else { "" };
        match (&self.value_to_string, &self.step_size) {
            (Some(f), _) => format!("{}{}", f(value), unit),
            (None, Some(step_size)) => {
                let num_digits = decimals_from_step_size(*step_size);
                format!("{:.num_digits$}{}", value, unit)
            }
            (None, None) => format!("{}{}", value, unit),
        }
    }

    fn string_to_normalized_value(&self, string: &str) -> Option<f32> {
        let string = string.trim();
        let value = match &self.string_to_value {
            Some(f) => f(string),
            None => string.trim_end_matches(self.unit.trim()).trim().parse().ok(),
        }?;

        Some(self.preview_normalized(value))
    }

    fn update_smoother(&self, sample_rate: f32, reset: bool) {
        let value = self.value();
        if reset {
            self.smoothed.reset(value);
        } else {
            self.smoothed.set_target(sample_rate, value);
        }
    }

    fn state_value(&self) -> ParamValue {
        ParamValue::F32(self.value())
    }

    fn restore_state_value(&self, value: ParamValue) -> bool {
        match value {
            ParamValue::F32(plain) => {
                self.set_plain_value(plain);
                true
            }
            ParamValue::Bool(_) => false,
        }
    }
}

impl FloatParam {
    /// Build a new [`FloatParam`]. Use the other associated functions to modify the behavior of the
    /// parameter.
    pub fn new(name: impl Into<String>, default: f32, range: FloatRange) -> Self {
        Self {
            value: AtomicF32::new(default),
            normalized_value: AtomicF32::new(range.normalize(default)),
            default,
            smoothed: Smoother::none(),

            flags: ParamFlags::default(),
            value_changed: None,

            range,
            step_size: None,
            name: name.into(),
            unit: "",
            value_to_string: None,
            string_to_value: None,
        }
    }

    /// The current plain value. Use [`smoothed`][Self::smoothed] for per-sample values while
    /// processing audio.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn default_plain_value(&self) -> f32 {
        self.default
    }

    pub fn range(&self) -> FloatRange {
        self.range
    }

    /// Set the plain value, clamped to the parameter's range. Does not snap to the step size and
    /// does not update the smoother.
    pub fn set_plain_value(&self, plain: f32) {
        let plain = plain.clamp(self.range.min(), self.range.max());
        let old_value = self.value.swap(plain, Ordering::Relaxed);
        self.normalized_value
            .store(self.preview_normalized(plain), Ordering::Relaxed);

        if plain != old_value {
            if let Some(f) = &self.value_changed {
                f(plain);
            }
        }
    }

    /// The normalized value for a plain value, without changing the parameter.
    pub fn preview_normalized(&self, plain: f32) -> f32 {
        self.range.normalize(plain)
    }

    /// The plain value for a normalized value, snapped to the step size if there is one.
    pub fn preview_plain(&self, normalized: f32) -> f32 {
        let value = self.range.unnormalize(normalized);
        match &self.step_size {
            Some(step_size) => self.range.snap_to_step(value, *step_size),
            None => value,
        }
    }

    /// Set up a smoother that gradually interpolates changes made to this parameter, preventing
    /// clicks and zipper noises.
    pub fn with_smoother(mut self, style: SmoothingStyle) -> Self {
        self.smoothed = Smoother::new(style);
        self.smoothed.reset(self.default);
        self
    }

    /// Run a callback whenever this parameter's value changes.
    pub fn with_callback(mut self, callback: Arc<dyn Fn(f32) + Send + Sync>) -> Self {
        self.value_changed = Some(callback);
        self
    }

    /// Display a unit when rendering this parameter to a string. No space is added before the
    /// unit.
    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    /// Quantize values set through normalized values to this step size. Without a
    /// `value_to_string` function this also decides the number of displayed decimals.
    pub fn with_step_size(mut self, step_size: f32) -> Self {
        plugin_debug_assert!(step_size > 0.0, "Step sizes must be positive");
        self.step_size = Some(step_size);
        self
    }

    /// Use a custom conversion function to convert the plain value to a string.
    pub fn with_value_to_string(
        mut self,
        callback: Arc<dyn Fn(f32) -> String + Send + Sync>,
    ) -> Self {
        self.value_to_string = Some(callback);
        self
    }

    /// Use a custom conversion function to parse a string into a plain value.
    pub fn with_string_to_value(
        mut self,
        callback: Arc<dyn Fn(&str) -> Option<f32> + Send + Sync>,
    ) -> Self {
        self.string_to_value = Some(callback);
        self
    }

    /// Add [`ParamFlags`] such as [`ParamFlags::NON_AUTOMATABLE`].
    pub fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags |= flags;
        self
    }
}

/// How many decimals to show for a step size. Rounds away spurious precision caused by floating
/// point quantization first.
fn decimals_from_step_size(step_size: f32) -> usize {
    const SCALE: f32 = 1_000_000.0; // 10.0f32.powi(f32::DIGITS as i32)
    let step_size = (step_size * SCALE).round() / SCALE;

    (0..f32::DIGITS as i32)
        .find(|decimals| step_size * 10.0f32.powi(*decimals) >= 1.0)
        .unwrap_or(0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn make_gain_param() -> FloatParam {
        FloatParam::new(
            "Gain",
            0.0,
            FloatRange::Linear {
                min: -30.0,
                max: 30.0,
            },
        )
        .with_unit(" dB")
        .with_step_size(0.01)
    }

    #[test]
    fn decimals() {
        assert_eq!(decimals_from_step_size(1.0), 0);
        assert_eq!(decimals_from_step_size(0.1), 1);
        assert_eq!(decimals_from_step_size(0.01), 2);
        assert_eq!(decimals_from_step_size(0.25), 1);
    }

    #[test]
    fn display_uses_step_size_and_unit() {
        let param = make_gain_param();
        assert_eq!(param.to_string(), "0.00 dB");

        param.set_plain_value(-6.0);
        assert_eq!(param.to_string(), "-6.00 dB");
        assert_eq!(param.normalized_value_to_string(1.0, false), "30.00");
    }

    #[test]
    fn normalized_values_snap_to_steps() {
        let param = make_gain_param();
        param.set_normalized_value(0.50001);

        assert_eq!(param.value(), 0.0);
        assert_eq!(param.normalized_value(), 0.5);
    }

    #[test]
    fn plain_values_are_clamped() {
        let param = make_gain_param();
        param.set_plain_value(100.0);

        assert_eq!(param.value(), 30.0);
        assert_eq!(param.normalized_value(), 1.0);
    }

    #[test]
    fn parse_with_and_without_unit() {
        let param = make_gain_param();
        assert_eq!(param.string_to_normalized_value("15 dB"), Some(0.75));
        assert_eq!(param.string_to_normalized_value(" -30"), Some(0.0));
        assert_eq!(param.string_to_normalized_value("loud"), None);
    }

    #[test]
    fn callback_only_fires_on_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let param = make_gain_param().with_callback({
            let calls = calls.clone();
            Arc::new(move |_| {
                calls.fetch_add(1, Ordering::Relaxed);
            })
        });

        param.set_plain_value(1.0);
        param.set_plain_value(1.0);
        param.set_plain_value(2.0);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn state_value_round_trip() {
        let param = make_gain_param();
        param.set_plain_value(12.5);
        let stored = param.state_value();

        let other = make_gain_param();
        assert!(other.restore_state_value(stored));
        assert_eq!(other.value(), 12.5);
        assert!(!other.restore_state_value(ParamValue::Bool(true)));
        assert_eq!(other.value(), 12.5);
    }

    #[test]
    fn smoother_follows_value() {
        let param = make_gain_param().with_smoother(SmoothingStyle::Linear(10.0));
        param.update_smoother(1000.0, true);
        assert_eq!(param.smoothed.next(), 0.0);

        param.set_plain_value(10.0);
        param.update_smoother(1000.0, false);
        assert_eq!(param.smoothed.steps_left(), 10);
        approx::assert_relative_eq!(param.smoothed.next(), 1.0, epsilon = 1e-5);
    }
}
