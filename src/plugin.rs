//! The [`Plugin`] trait and the types passed to it during its lifetime.

use std::sync::Arc;

use crate::buffer::Buffer;
use crate::editor::Editor;
use crate::midi::EventList;
use crate::param::Params;

/// Basic functionality that needs to be implemented by a plugin. The
/// [`Processor`][crate::processor::Processor] drives a plugin through this trait.
///
/// The lifecycle is:
///
/// 1. The plugin is created with [`Default::default()`]. This should not do anything expensive.
/// 2. [`initialize()`][Self::initialize()] is called with the audio configuration, followed by
///    [`reset()`][Self::reset()].
/// 3. [`process()`][Self::process()] is called for every block of audio.
/// 4. [`deactivate()`][Self::deactivate()] is called when the host releases the plugin's resources.
///    The plugin may be initialized again after this.
pub trait Plugin: Default + Send + Sync + 'static {
    const NAME: &'static str;
    const VENDOR: &'static str;
    const URL: &'static str;
    const EMAIL: &'static str;

    /// Semver compatible version string (e.g. `0.0.1`). This is also stored in the plugin's saved
    /// state.
    const VERSION: &'static str;

    /// The default number of input channels.
    const DEFAULT_INPUT_CHANNELS: u32 = 2;
    /// The default number of output channels.
    const DEFAULT_OUTPUT_CHANNELS: u32 = 2;

    /// Whether the plugin accepts note events. If this is set to `false`, then the plugin won't
    /// receive any note events.
    const ACCEPTS_MIDI: bool = false;

    /// The plugin's parameters. These are identified by IDs that should never change when the
    /// plugin receives an update.
    fn params(&self) -> Arc<dyn Params>;

    /// The plugin's factory programs. When this is empty the processor exposes a single program
    /// called `Default`.
    fn programs(&self) -> Vec<Program> {
        Vec::new()
    }

    /// Create an editor for this plugin. The editor borrows the plugin, so it can read the plugin's
    /// parameters for as long as it is open.
    fn editor(&self) -> Option<Box<dyn Editor + '_>> {
        None
    }

    /// Initialize the plugin for the given audio layout and buffer configuration. This is where
    /// buffers should be allocated. This may be called more than once without a
    /// [`deactivate()`][Self::deactivate()] in between. Return `false` if the plugin cannot work
    /// with this configuration.
    #[allow(unused_variables)]
    fn initialize(&mut self, audio_io_layout: &AudioIOLayout, buffer_config: &BufferConfig) -> bool {
        true
    }

    /// Clear internal state such as filter histories and envelopes. Called after
    /// [`initialize()`][Self::initialize()] and whenever the host wants a clean slate. This must not
    /// allocate.
    fn reset(&mut self) {}

    /// Process a block of audio in place. The input has already been copied to the output buffers.
    /// All channels contain the same number of samples, which is never more than
    /// [`BufferConfig::max_buffer_size`]. Denormals are flushed to zero, and with the
    /// `assert_process_allocs` feature any allocation in debug builds aborts the program.
    fn process(&mut self, buffer: &mut Buffer, events: &EventList) -> ProcessStatus;

    /// Called when the host releases the plugin's resources. Use this to free anything allocated in
    /// [`initialize()`][Self::initialize()].
    fn deactivate(&mut self) {}
}

/// A named preset slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub name: String,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The channel configuration the plugin is being run with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioIOLayout {
    pub main_input_channels: u32,
    pub main_output_channels: u32,
}

impl AudioIOLayout {
    /// The layout described by a plugin's `DEFAULT_*_CHANNELS` constants.
    pub const fn default_for<P: Plugin>() -> Self {
        Self {
            main_input_channels: P::DEFAULT_INPUT_CHANNELS,
            main_output_channels: P::DEFAULT_OUTPUT_CHANNELS,
        }
    }

    /// A descriptive name for the layout.
    pub fn name(&self) -> String {
        match (self.main_input_channels, self.main_output_channels) {
            (0, 0) => String::from("Empty"),
            (_, 1) | (1, 0) => String::from("Mono"),
            (_, 2) | (2, 0) => String::from("Stereo"),
            (i, o) => format!("{i} inputs, {o} outputs"),
        }
    }
}

/// Configuration for (the host's) audio buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferConfig {
    /// The current sample rate.
    pub sample_rate: f32,
    /// The maximum buffer size the host will use. The plugin should be able to accept variable
    /// sized buffers up to this size.
    pub max_buffer_size: u32,
    /// The current processing mode. The host will reinitialize the plugin any time this changes.
    pub process_mode: ProcessMode,
}

/// The plugin's current processing mode. Exposed through [`BufferConfig::process_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
    /// The plugin is processing audio in real time at a fixed rate.
    Realtime,
    /// The plugin is rendering audio offline, potentially faster than realtime.
    Offline,
}

/// Indicates the current situation after the plugin has processed audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Something went wrong while processing audio.
    Error(&'static str),
    /// The plugin has finished processing audio. When the input is silent, the host may suspend the
    /// plugin to save resources as it sees fit.
    Normal,
    /// The plugin has a (reverb) tail with a specific length in samples.
    Tail(u32),
    /// This plugin will continue to produce sound regardless of whether or not the input is silent,
    /// and should thus not be deactivated by the host. This is essentially the same as having an
    /// infinite tail.
    KeepAlive,
}
