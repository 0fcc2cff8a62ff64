// Re-export the macros
pub use crate::debug::*;

pub use crate::formatters;
pub use crate::util;

pub use crate::buffer::{AudioBuffer, Buffer};
pub use crate::editor::{Colour, DisplayList, Editor, Graphics, Justification, Rectangle};
pub use crate::error::{Error, Result};
pub use crate::midi::{control_change, EventList, NoteEvent};
pub use crate::param::{
    BoolParam, FloatParam, FloatRange, NoParams, Param, ParamFlags, Params, Smoother,
    SmoothingStyle,
};
pub use crate::plugin::{
    AudioIOLayout, BufferConfig, Plugin, ProcessMode, ProcessStatus, Program,
};
pub use crate::processor::{Processor, ProcessorState};
pub use crate::state::{ParamValue, PluginState};
