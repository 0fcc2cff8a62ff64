//! The host-facing side of a plugin. A [`Processor`] owns a [`Plugin`] instance and enforces the
//! lifecycle the plugin expects: it has to be prepared with a sample rate and maximum block size
//! before it can process audio, and its resources get released when the host is done with it.

use std::sync::Arc;

use crate::buffer::Buffer;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::midi::EventList;
use crate::param::{Param, Params};
use crate::plugin::{AudioIOLayout, BufferConfig, Plugin, ProcessMode, ProcessStatus, Program};
use crate::state::PluginState;

mod util;

pub use self::util::process_wrapper;

/// The name of the program exposed for plugins that don't define any programs.
pub const DEFAULT_PROGRAM_NAME: &str = "Default";

/// Where a [`Processor`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// Constructed, but never prepared or the last `prepare()` failed.
    Uninitialized,
    /// Prepared for playback, no audio has been processed since.
    Prepared,
    /// At least one block has been processed since the last `prepare()`.
    Processing,
    /// The plugin's resources have been released. Call `prepare()` again to resume.
    Released,
}

/// Owns a plugin and drives it through its lifecycle.
pub struct Processor<P: Plugin> {
    plugin: P,
    /// The plugin's parameters, fetched once at construction.
    params: Arc<dyn Params>,
    /// Never empty.
    programs: Vec<Program>,
    /// Always a valid index into `programs`.
    current_program: usize,

    sample_rate: f64,
    block_size: usize,
    /// Passed to the plugin on the next `prepare()`.
    process_mode: ProcessMode,
    state: ProcessorState,
}

impl<P: Plugin> Default for Processor<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Plugin> Processor<P> {
    /// Create the plugin with its default settings. Nothing gets allocated for audio processing
    /// until [`prepare()`][Self::prepare()] is called.
    pub fn new() -> Self {
        let plugin = P::default();
        let params = plugin.params();
        let mut programs = plugin.programs();
        if programs.is_empty() {
            programs.push(Program::new(DEFAULT_PROGRAM_NAME));
        }

        plugin_trace!(
            "Created '{}' with {} parameters and {} programs",
            P::NAME,
            params.param_map().len(),
            programs.len()
        );

        Self {
            plugin,
            params,
            programs,
            current_program: 0,

            sample_rate: 0.0,
            block_size: 0,
            process_mode: ProcessMode::Realtime,
            state: ProcessorState::Uninitialized,
        }
    }

    /// Prepare the plugin for playback at `sample_rate` with blocks of at most `block_size`
    /// samples. This can be called again at any point to change the configuration.
    pub fn prepare(&mut self, sample_rate: f64, block_size: usize) -> Result<()> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "the sample rate must be a positive number, got {sample_rate}"
            )));
        }
        let max_buffer_size = u32::try_from(block_size).map_err(|_| {
            Error::InvalidArgument(format!("the block size {block_size} is too large"))
        })?;

        let audio_io_layout = self.audio_io_layout();
        let buffer_config = BufferConfig {
            sample_rate: sample_rate as f32,
            max_buffer_size,
            process_mode: self.process_mode,
        };
        if !self.plugin.initialize(&audio_io_layout, &buffer_config) {
            plugin_error!(
                "'{}' failed to initialize with {} at {} Hz",
                P::NAME,
                audio_io_layout.name(),
                sample_rate
            );
            self.state = ProcessorState::Uninitialized;
            return Err(Error::InitializationFailed);
        }

        // Only a configuration the plugin accepted gets recorded
        self.sample_rate = sample_rate;
        self.block_size = block_size;
        self.update_smoothers(true);
        self.plugin.reset();

        self.state = ProcessorState::Prepared;
        Ok(())
    }

    /// Process a block of audio in place. The buffer may not contain more samples than the block
    /// size passed to [`prepare()`][Self::prepare()]. Events are only forwarded to plugins that
    /// accept MIDI.
    pub fn process(&mut self, buffer: &mut Buffer, events: &EventList) -> Result<ProcessStatus> {
        match self.state {
            ProcessorState::Prepared | ProcessorState::Processing => (),
            ProcessorState::Uninitialized | ProcessorState::Released => {
                return Err(Error::NotPrepared)
            }
        }
        if buffer.samples() > self.block_size {
            return Err(Error::InvalidArgument(format!(
                "the block contains {} samples, but the processor was prepared for at most {}",
                buffer.samples(),
                self.block_size
            )));
        }
        plugin_debug_assert!(
            events.fits_block(buffer.samples()),
            "Event timings exceed the block's {} samples",
            buffer.samples()
        );

        let no_events = EventList::new();
        let events = if P::ACCEPTS_MIDI { events } else { &no_events };

        let plugin = &mut self.plugin;
        let status = process_wrapper(|| plugin.process(buffer, events));
        self.state = ProcessorState::Processing;

        Ok(status)
    }

    /// Let the plugin free its playback resources. Does nothing if the processor isn't prepared.
    pub fn release_resources(&mut self) {
        match self.state {
            ProcessorState::Prepared | ProcessorState::Processing => {
                self.plugin.deactivate();
                self.state = ProcessorState::Released;
            }
            ProcessorState::Uninitialized | ProcessorState::Released => (),
        }
    }

    /// The number of programs. Always at least one.
    pub fn num_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn current_program(&self) -> usize {
        self.current_program
    }

    /// Select a program. Out of range indices are rejected and leave the selection unchanged.
    pub fn set_current_program(&mut self, index: usize) -> Result<()> {
        self.check_program_index(index)?;
        self.current_program = index;

        Ok(())
    }

    /// The name of the program at `index`.
    pub fn program_name(&self, index: usize) -> Result<&str> {
        self.check_program_index(index)?;
        Ok(&self.programs[index].name)
    }

    /// The plugin's live parameter object.
    pub fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// The plugin's parameters along with their IDs, in display order.
    pub fn param_map(&self) -> Vec<(String, &dyn Param)> {
        self.params.param_map()
    }

    /// Set a parameter from a normalized value, the way a host or a generic editor would. The new
    /// value is smoothed if the processor is prepared.
    pub fn set_parameter_normalized(&self, id: &str, normalized: f32) -> Result<()> {
        let param = self.find_param(id, normalized)?;
        self.apply_normalized(param, normalized);

        Ok(())
    }

    /// The same as [`set_parameter_normalized()`][Self::set_parameter_normalized()], but also
    /// tells an open editor about the new value. The editor is not notified if the change is
    /// rejected.
    pub fn set_parameter_notifying(
        &self,
        editor: &dyn Editor,
        id: &str,
        normalized: f32,
    ) -> Result<()> {
        let param = self.find_param(id, normalized)?;
        self.apply_normalized(param, normalized);
        editor.param_value_changed(id, param.normalized_value());

        Ok(())
    }

    /// Change several parameters at once, for instance when the host recalls a snapshot, and
    /// notify the editor once afterwards. Every change is checked before any of them is applied,
    /// so either all of them take effect or none do.
    pub fn set_parameters_notifying(
        &self,
        editor: &dyn Editor,
        changes: &[(&str, f32)],
    ) -> Result<()> {
        let params = changes
            .iter()
            .map(|&(id, normalized)| self.find_param(id, normalized))
            .collect::<Result<Vec<_>>>()?;
        for (param, &(_, normalized)) in params.into_iter().zip(changes) {
            self.apply_normalized(param, normalized);
        }
        editor.param_values_changed();

        Ok(())
    }

    /// The mode passed to the plugin the next time the processor is prepared, for instance when
    /// the host switches to offline rendering.
    pub fn set_process_mode(&mut self, process_mode: ProcessMode) {
        self.process_mode = process_mode;
    }

    pub fn process_mode(&self) -> ProcessMode {
        self.process_mode
    }

    pub fn name(&self) -> &'static str {
        P::NAME
    }

    pub fn vendor(&self) -> &'static str {
        P::VENDOR
    }

    pub fn version(&self) -> &'static str {
        P::VERSION
    }

    /// The sample rate from the last successful [`prepare()`][Self::prepare()], or 0.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// The maximum block size from the last successful [`prepare()`][Self::prepare()], or 0.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn is_prepared(&self) -> bool {
        matches!(
            self.state,
            ProcessorState::Prepared | ProcessorState::Processing
        )
    }

    pub fn num_input_channels(&self) -> u32 {
        P::DEFAULT_INPUT_CHANNELS
    }

    pub fn num_output_channels(&self) -> u32 {
        P::DEFAULT_OUTPUT_CHANNELS
    }

    pub fn accepts_midi(&self) -> bool {
        P::ACCEPTS_MIDI
    }

    /// The plugin's latency in samples.
    pub fn latency_samples(&self) -> u32 {
        0
    }

    pub fn audio_io_layout(&self) -> AudioIOLayout {
        AudioIOLayout::default_for::<P>()
    }

    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    /// Serialize the current parameter values and program selection.
    pub fn save_state(&self) -> Result<Vec<u8>> {
        let state = PluginState {
            version: P::VERSION.to_owned(),
            params: self
                .params
                .param_map()
                .into_iter()
                .map(|(id, param)| (id, param.state_value()))
                .collect(),
            program: self.current_program,
        };

        Ok(state.to_bytes()?)
    }

    /// Restore a state created by [`save_state()`][Self::save_state()]. Parameters that no longer
    /// exist are skipped. If the stored program index is invalid nothing gets restored.
    pub fn load_state(&mut self, bytes: &[u8]) -> Result<()> {
        let state = PluginState::from_bytes(bytes)?;
        self.check_program_index(state.program)?;
        if state.version != P::VERSION {
            plugin_log!(
                "Loading state saved by version {} into version {}",
                state.version,
                P::VERSION
            );
        }

        let param_map = self.params.param_map();
        for (id, value) in state.params {
            match param_map.iter().find(|(param_id, _)| *param_id == id) {
                Some((_, param)) => {
                    if !param.restore_state_value(value) {
                        plugin_warn!("Stored value {value:?} does not fit parameter '{id}'");
                    }
                }
                None => plugin_warn!("Unknown parameter '{id}' in the stored state, skipping"),
            }
        }
        self.current_program = state.program;
        self.update_smoothers(true);

        Ok(())
    }

    /// Create the plugin's editor, if it has one. The editor borrows the processor, so the
    /// processor can't be reconfigured while the editor is open.
    pub fn create_editor(&self) -> Option<Box<dyn Editor + '_>> {
        self.plugin.editor()
    }

    fn check_program_index(&self, index: usize) -> Result<()> {
        if index < self.programs.len() {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "program index {index} is out of range, there are {} programs",
                self.programs.len()
            )))
        }
    }

    fn find_param(&self, id: &str, normalized: f32) -> Result<&dyn Param> {
        let param = self
            .params
            .param_map()
            .into_iter()
            .find(|(param_id, _)| param_id == id)
            .map(|(_, param)| param)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown parameter '{id}'")))?;
        if !(0.0..=1.0).contains(&normalized) {
            return Err(Error::InvalidArgument(format!(
                "normalized value {normalized} is outside of [0, 1]"
            )));
        }

        Ok(param)
    }

    fn apply_normalized(&self, param: &dyn Param, normalized: f32) {
        param.set_normalized_value(normalized);
        param.update_smoother(self.sample_rate as f32, !self.is_prepared());
    }

    fn update_smoothers(&self, reset: bool) {
        for (_, param) in self.params.param_map() {
            param.update_smoother(self.sample_rate as f32, reset);
        }
    }
}
