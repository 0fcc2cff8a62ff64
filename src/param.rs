//! Parameters. A plugin exposes its parameters through a [`Params`] object, and each parameter
//! implements [`Param`] so the processor and editor can handle them without knowing their types.
//!
//! Parameter values are stored in atomics. The plugin's `Params` object is shared through an
//! `Arc`, so the editor can read and change values while the audio thread is running.

use bitflags::bitflags;
use std::fmt::Display;

use crate::state::ParamValue;

pub mod boolean;
pub mod float;
pub mod range;
pub mod smoothing;

pub use boolean::BoolParam;
pub use float::FloatParam;
pub use range::FloatRange;
pub use smoothing::{Smoother, SmoothingStyle};

bitflags! {
    /// Flags for controlling a parameter's behavior.
    #[derive(Default)]
    pub struct ParamFlags: u32 {
        /// When applied to a [`BoolParam`], this will cause the parameter to be linked to the
        /// host's bypass control. Only a single parameter can be marked as a bypass parameter.
        const BYPASS = 1 << 0;
        /// The parameter cannot be automated from the host. It can still be changed from the
        /// plugin's editor.
        const NON_AUTOMATABLE = 1 << 1;
        /// Don't show this parameter in generic editors.
        const HIDE_IN_GENERIC_UI = 1 << 2;
    }
}

/// Describes a single parameter of any type. All setters take `&self` since the values are
/// atomic.
pub trait Param: Display + Send + Sync {
    /// The human readable display name.
    fn name(&self) -> &str;

    /// The unit appended after the value when displaying it. Includes a leading space if one is
    /// needed.
    fn unit(&self) -> &'static str;

    /// The current value normalized to `[0, 1]`.
    fn normalized_value(&self) -> f32;

    fn default_normalized_value(&self) -> f32;

    /// The number of discrete steps, or `None` for continuous parameters.
    fn step_count(&self) -> Option<usize>;

    fn flags(&self) -> ParamFlags;

    /// Set the parameter from a normalized value, snapping to its step size. This does **not**
    /// update the smoother, see [`update_smoother()`][Self::update_smoother()].
    fn set_normalized_value(&self, normalized: f32);

    /// Format a normalized value the way this parameter displays its values.
    fn normalized_value_to_string(&self, normalized: f32, include_unit: bool) -> String;

    /// Parse a string back into a normalized value. The string may or may not include the unit.
    fn string_to_normalized_value(&self, string: &str) -> Option<f32>;

    /// Point the smoother at the current value. With `reset` the smoother jumps to the value
    /// immediately, which is what should happen when preparing or restoring state.
    fn update_smoother(&self, sample_rate: f32, reset: bool);

    /// The current plain value for storing in a [`PluginState`][crate::state::PluginState].
    fn state_value(&self) -> ParamValue;

    /// Restore a stored plain value. Returns `false` if the value's type does not match this
    /// parameter, in which case nothing changes.
    fn restore_state_value(&self, value: ParamValue) -> bool;
}

/// The collection of parameters a plugin exposes. The IDs must be unique and must stay the same
/// between versions since they're used to restore saved state.
pub trait Params: Send + Sync {
    /// All parameters in display order along with their IDs.
    fn param_map(&self) -> Vec<(String, &dyn Param)>;
}

/// A plugin without any parameters.
#[derive(Debug, Default)]
pub struct NoParams;

impl Params for NoParams {
    fn param_map(&self) -> Vec<(String, &dyn Param)> {
        Vec::new()
    }
}
