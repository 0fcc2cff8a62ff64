//! The scaffold plugin. It passes audio through a single smoothed output gain which defaults to
//! unity, so at its default settings the output is bit-identical to the input.

use std::sync::Arc;

use crate::buffer::Buffer;
use crate::editor::Editor;
use crate::formatters;
use crate::midi::EventList;
use crate::param::{FloatParam, FloatRange, Param, Params, SmoothingStyle};
use crate::plugin::{Plugin, ProcessStatus, Program};
use crate::util;

mod editor;

pub use editor::{TemplateEditor, GREETING};

/// A pass-through plugin with an output gain.
pub struct TemplatePlugin {
    params: Arc<TemplateParams>,
}

pub struct TemplateParams {
    /// The output gain in decibels.
    pub gain: FloatParam,
}

impl Default for TemplatePlugin {
    fn default() -> Self {
        Self {
            params: Arc::new(TemplateParams::default()),
        }
    }
}

impl Default for TemplateParams {
    fn default() -> Self {
        Self {
            gain: FloatParam::new(
                "Gain",
                0.0,
                FloatRange::Linear {
                    min: -30.0,
                    max: 30.0,
                },
            )
            .with_smoother(SmoothingStyle::Linear(50.0))
            .with_step_size(0.01)
            .with_unit(" dB")
            .with_value_to_string(formatters::f32_rounded(2)),
        }
    }
}

impl Params for TemplateParams {
    fn param_map(&self) -> Vec<(String, &dyn Param)> {
        vec![(String::from("gain"), &self.gain as &dyn Param)]
    }
}

impl TemplatePlugin {
    /// The plugin's typed parameters, for the editor.
    pub fn template_params(&self) -> &TemplateParams {
        &self.params
    }
}

impl Plugin for TemplatePlugin {
    const NAME: &'static str = "Plugin Template";
    const VENDOR: &'static str = "Plugin Template Developers";
    const URL: &'static str = "https://example.com/plugin-template";
    const EMAIL: &'static str = "info@example.com";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    const DEFAULT_INPUT_CHANNELS: u32 = 2;
    const DEFAULT_OUTPUT_CHANNELS: u32 = 2;

    const ACCEPTS_MIDI: bool = false;

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn programs(&self) -> Vec<Program> {
        vec![Program::new("Default")]
    }

    fn editor(&self) -> Option<Box<dyn Editor + '_>> {
        Some(Box::new(TemplateEditor::new(self)))
    }

    fn process(&mut self, buffer: &mut Buffer, _events: &EventList) -> ProcessStatus {
        let gain = &self.params.gain;
        buffer.for_each_sample(|sample_idx, channels| {
            // Smoothing is built into the parameter, one step per sample for all channels
            let gain = util::db_to_gain(gain.smoothed.next());
            for channel in channels.iter_mut() {
                channel[sample_idx] *= gain;
            }
        });

        ProcessStatus::Normal
    }
}
