//! Audio buffers. [`AudioBuffer`] is the host-side storage, and [`Buffer`] is the mutable per-block
//! view the plugin gets to process in place.

/// The audio buffers used during processing. This contains the output audio output buffers with the
/// inputs already copied to the outputs. The plugin processes these in place. The lifetime ties the
/// view to the host's storage, so a plugin can never hold on to it past the end of the process call.
#[derive(Default)]
pub struct Buffer<'a> {
    /// The number of samples contained within each of the `output_slices`.
    num_samples: usize,
    /// Contains slices for the plugin's outputs. All slices have the same length.
    output_slices: Vec<&'a mut [f32]>,
}

impl<'a> Buffer<'a> {
    /// Create a view over a set of equally sized channel slices. If the channels have different
    /// lengths then only the shortest common length will be visible to the plugin.
    pub fn new(output_slices: Vec<&'a mut [f32]>) -> Self {
        let num_samples = output_slices
            .iter()
            .map(|channel| channel.len())
            .min()
            .unwrap_or(0);
        plugin_debug_assert!(
            output_slices
                .iter()
                .all(|channel| channel.len() == num_samples),
            "All channels in a buffer must have the same length"
        );

        Self {
            num_samples,
            output_slices: output_slices
                .into_iter()
                .map(|channel| &mut channel[..num_samples])
                .collect(),
        }
    }

    /// Returns the number of samples per channel in this buffer.
    #[inline]
    pub fn samples(&self) -> usize {
        self.num_samples
    }

    /// Returns the number of channels in this buffer.
    #[inline]
    pub fn channels(&self) -> usize {
        self.output_slices.len()
    }

    /// Returns true if this buffer does not contain any samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_samples == 0
    }

    /// Obtain the raw audio buffers.
    #[inline]
    pub fn as_slice(&mut self) -> &mut [&'a mut [f32]] {
        &mut self.output_slices
    }

    /// The same as [`as_slice()`][Self::as_slice()], but for a non-mutable reference. This is
    /// usually not needed unless you need to compare the contents of the buffer.
    #[inline]
    pub fn as_slice_immutable(&self) -> &[&'a mut [f32]] {
        &self.output_slices
    }

    /// Apply `f` to every sample, one sample index at a time across all channels. `f` receives the
    /// sample's index within the block and a mutable reference to the sample. This iteration order
    /// keeps per-sample values like smoothed parameters in sync across channels.
    #[inline]
    pub fn for_each_sample(&mut self, mut f: impl FnMut(usize, &mut [&'a mut [f32]])) {
        for sample_idx in 0..self.num_samples {
            f(sample_idx, &mut self.output_slices);
        }
    }
}

/// Host-side storage for a block of audio: a fixed number of channels, each holding the same fixed
/// number of `f32` samples. The host owns this and lends it to the processor as a [`Buffer`] for
/// the duration of a single process call.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    num_samples: usize,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Allocate a silent buffer with `num_channels` channels of `num_samples` samples each.
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            num_samples,
            channels: vec![vec![0.0; num_samples]; num_channels],
        }
    }

    /// The number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// The number of samples in every channel.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Get a channel's samples, if the channel exists.
    pub fn channel(&self, channel: usize) -> Option<&[f32]> {
        self.channels.get(channel).map(Vec::as_slice)
    }

    /// Get a channel's samples for writing, if the channel exists.
    pub fn channel_mut(&mut self, channel: usize) -> Option<&mut [f32]> {
        self.channels.get_mut(channel).map(Vec::as_mut_slice)
    }

    /// Iterate over all channels for writing.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> + '_ {
        self.channels.iter_mut().map(Vec::as_mut_slice)
    }

    /// Fill every channel with the same sine wave at `frequency` Hz and `amplitude`, starting at
    /// phase zero. Used to generate test signals.
    pub fn fill_sine(&mut self, frequency: f32, sample_rate: f64, amplitude: f32) {
        for channel in self.channels_mut() {
            for (sample_idx, sample) in channel.iter_mut().enumerate() {
                let phase =
                    std::f64::consts::TAU * frequency as f64 * sample_idx as f64 / sample_rate;
                *sample = (phase.sin() as f32) * amplitude;
            }
        }
    }

    /// Set every sample in every channel to zero.
    pub fn clear(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.fill(0.0);
        }
    }

    /// The highest absolute sample value across all channels, or zero for an empty buffer.
    pub fn magnitude(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|channel| channel.iter())
            .fold(0.0f32, |peak, sample| peak.max(sample.abs()))
    }

    /// Borrow this storage as a [`Buffer`] view that can be passed to the processor.
    pub fn as_buffer(&mut self) -> Buffer<'_> {
        Buffer::new(
            self.channels
                .iter_mut()
                .map(|channel| channel.as_mut_slice())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_reports_shape() {
        let mut storage = AudioBuffer::new(2, 64);
        let buffer = storage.as_buffer();

        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.samples(), 64);
        assert!(!buffer.is_empty());
    }

    #[test]
    fn zero_channels_is_empty() {
        let mut storage = AudioBuffer::new(0, 64);
        let buffer = storage.as_buffer();

        assert_eq!(buffer.channels(), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn writes_through_view_reach_storage() {
        let mut storage = AudioBuffer::new(2, 4);
        {
            let mut buffer = storage.as_buffer();
            buffer.for_each_sample(|sample_idx, channels| {
                for (channel_idx, channel) in channels.iter_mut().enumerate() {
                    channel[sample_idx] = (channel_idx * 10 + sample_idx) as f32;
                }
            });
        }

        assert_eq!(storage.channel(0), Some(&[0.0, 1.0, 2.0, 3.0][..]));
        assert_eq!(storage.channel(1), Some(&[10.0, 11.0, 12.0, 13.0][..]));
        assert_eq!(storage.magnitude(), 13.0);
    }

    #[test]
    fn sine_starts_at_zero_and_peaks_near_amplitude() {
        let mut storage = AudioBuffer::new(2, 512);
        storage.fill_sine(440.0, 44100.0, 1.0);

        assert_eq!(storage.channel(0).unwrap()[0], 0.0);
        assert_eq!(storage.channel(0), storage.channel(1));
        approx::assert_relative_eq!(storage.magnitude(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn clear_silences_all_channels() {
        let mut storage = AudioBuffer::new(2, 8);
        storage.channel_mut(1).unwrap()[3] = -0.5;
        assert_eq!(storage.magnitude(), 0.5);

        storage.clear();
        assert_eq!(storage.magnitude(), 0.0);
    }
}
