//! On/off parameters, such as a bypass switch.

use std::fmt::{Debug, Display};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{Param, ParamFlags};
use crate::state::ParamValue;

type Formatter = Arc<dyn Fn(bool) -> String + Send + Sync>;

/// A toggle. Normalized values above 0.5 count as on.
pub struct BoolParam {
    value: AtomicBool,
    default: bool,
    name: String,
    flags: ParamFlags,
    /// Called with the new value whenever the value changes.
    value_changed: Option<Arc<dyn Fn(bool) + Send + Sync>>,
    /// Replaces the default `On`/`Off` labels.
    value_to_string: Option<Formatter>,
}

impl BoolParam {
    pub fn new(name: impl Into<String>, default: bool) -> Self {
        Self {
            value: AtomicBool::new(default),
            default,
            name: name.into(),
            flags: ParamFlags::empty(),
            value_changed: None,
            value_to_string: None,
        }
    }

    #[inline]
    pub fn value(&self) -> bool {
        self.value.load(Ordering::Relaxed)
    }

    /// Change the value, running the callback if it actually changed.
    pub fn set_value(&self, value: bool) {
        if self.value.swap(value, Ordering::Relaxed) != value {
            if let Some(callback) = &self.value_changed {
                callback(value);
            }
        }
    }

    pub fn with_callback(mut self, callback: Arc<dyn Fn(bool) + Send + Sync>) -> Self {
        self.value_changed = Some(callback);
        self
    }

    pub fn with_value_to_string(mut self, formatter: Formatter) -> Self {
        self.value_to_string = Some(formatter);
        self
    }

    /// Add [`ParamFlags`] such as [`ParamFlags::NON_AUTOMATABLE`].
    pub fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Link this parameter to the host's bypass control.
    pub fn make_bypass(self) -> Self {
        self.with_flags(ParamFlags::BYPASS)
    }

    fn label(&self, value: bool) -> String {
        match &self.value_to_string {
            Some(formatter) => formatter(value),
            None if value => String::from("On"),
            None => String::from("Off"),
        }
    }
}

impl Display for BoolParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label(self.value()))
    }
}

impl Debug for BoolParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self)
    }
}

impl Param for BoolParam {
    fn name(&self) -> &str {
        &self.name
    }

    fn unit(&self) -> &'static str {
        ""
    }

    fn normalized_value(&self) -> f32 {
        to_normalized(self.value())
    }

    fn default_normalized_value(&self) -> f32 {
        to_normalized(self.default)
    }

    fn step_count(&self) -> Option<usize> {
        Some(1)
    }

    fn flags(&self) -> ParamFlags {
        self.flags
    }

    fn set_normalized_value(&self, normalized: f32) {
        self.set_value(normalized > 0.5);
    }

    fn normalized_value_to_string(&self, normalized: f32, _include_unit: bool) -> String {
        self.label(normalized > 0.5)
    }

    /// Accepts the parameter's own labels, `on`, and `true`. Anything else parses as off.
    fn string_to_normalized_value(&self, string: &str) -> Option<f32> {
        let string = string.trim();
        let on = string.eq_ignore_ascii_case("on")
            || string.eq_ignore_ascii_case("true")
            || string == self.label(true);

        Some(to_normalized(on))
    }

    fn update_smoother(&self, _sample_rate: f32, _reset: bool) {}

    fn state_value(&self) -> ParamValue {
        ParamValue::Bool(self.value())
    }

    fn restore_state_value(&self, value: ParamValue) -> bool {
        match value {
            ParamValue::Bool(value) => {
                self.set_value(value);
                true
            }
            ParamValue::F32(_) => false,
        }
    }
}

fn to_normalized(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse() {
        let param = BoolParam::new("Bypass", false).make_bypass();
        assert_eq!(param.to_string(), "Off");
        assert!(param.flags().contains(ParamFlags::BYPASS));

        assert_eq!(param.string_to_normalized_value(" ON "), Some(1.0));
        assert_eq!(param.string_to_normalized_value("nope"), Some(0.0));
    }

    #[test]
    fn normalized_threshold() {
        let param = BoolParam::new("Toggle", false);
        param.set_normalized_value(0.5);
        assert!(!param.value());
        param.set_normalized_value(0.51);
        assert!(param.value());
        assert_eq!(param.normalized_value(), 1.0);
        assert_eq!(param.default_normalized_value(), 0.0);
    }

    #[test]
    fn custom_labels() {
        let param = BoolParam::new("Mode", true)
            .with_value_to_string(Arc::new(|value: bool| {
                String::from(if value { "Wide" } else { "Narrow" })
            }))
            .with_flags(ParamFlags::NON_AUTOMATABLE);
        assert_eq!(param.to_string(), "Wide");
        assert_eq!(param.normalized_value_to_string(0.0, true), "Narrow");
        assert_eq!(param.string_to_normalized_value("Wide"), Some(1.0));
        assert_eq!(param.flags(), ParamFlags::NON_AUTOMATABLE);
    }

    #[test]
    fn callback_runs_on_change_only() {
        let changes = Arc::new(AtomicBool::new(false));
        let param = BoolParam::new("Toggle", false).with_callback({
            let changes = changes.clone();
            Arc::new(move |value: bool| changes.store(value, Ordering::Relaxed))
        });
        param.set_value(false);
        assert!(!changes.load(Ordering::Relaxed));
        param.set_value(true);
        assert!(changes.load(Ordering::Relaxed));
    }

    #[test]
    fn restore_rejects_other_types() {
        let param = BoolParam::new("Toggle", true);
        assert!(!param.restore_state_value(ParamValue::F32(0.0)));
        assert!(param.value());
        assert!(param.restore_state_value(ParamValue::Bool(false)));
        assert!(!param.value());
    }
}
