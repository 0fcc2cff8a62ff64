//! A boilerplate audio plugin: a pass-through [`TemplatePlugin`][template::TemplatePlugin], a
//! static editor, a host-facing [`Processor`][processor::Processor] that enforces the plugin
//! lifecycle, and a small test harness for exercising all of it.

// Used in our macros
#[doc(hidden)]
pub extern crate log;

#[macro_use]
pub mod debug;

/// Everything you'd need to write a plugin. Import this with `use plugin_template::prelude::*;`.
pub mod prelude;

// These modules have also been re-exported in the prelude.
pub mod formatters;
pub mod util;

pub mod buffer;
pub mod editor;
pub mod error;
pub mod harness;
pub mod midi;
pub mod param;
pub mod plugin;
pub mod processor;
pub mod state;
pub mod template;

pub use error::{Error, Result};
