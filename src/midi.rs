//! Note events and the per-block event list passed to the processor.

use midi_consts::channel_event as midi;

pub use midi_consts::channel_event::control_change;

/// Event for (incoming) notes and MIDI messages. All of the timings are sample offsets within the
/// current buffer. All channel and note numbers are zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum NoteEvent {
    /// A note on event.
    NoteOn {
        timing: u32,
        /// The note's channel, from 0 to 15.
        channel: u8,
        /// The note's MIDI key number, from 0 to 127.
        note: u8,
        /// The note's velocity, from 0 to 1.
        velocity: f32,
    },
    /// A note off event.
    NoteOff {
        timing: u32,
        /// The note's channel, from 0 to 15.
        channel: u8,
        /// The note's MIDI key number, from 0 to 127.
        note: u8,
        /// The note's release velocity, from 0 to 1.
        velocity: f32,
    },
    /// Immediately silence a voice without a release phase, for instance when a hi-hat gets
    /// closed. There is no MIDI equivalent for this event.
    Choke {
        timing: u32,
        channel: u8,
        note: u8,
    },
    /// A polyphonic note pressure/aftertouch event.
    PolyPressure {
        timing: u32,
        channel: u8,
        note: u8,
        /// The note's pressure, from 0 to 1.
        pressure: f32,
    },
    /// A MIDI channel pressure event.
    MidiChannelPressure {
        timing: u32,
        channel: u8,
        /// The pressure, normalized to `[0, 1]` to match the poly pressure event.
        pressure: f32,
    },
    /// A MIDI pitch bend.
    MidiPitchBend {
        timing: u32,
        channel: u8,
        /// The bend amount, normalized to `[0, 1]`. `0.5` means no pitch bend.
        value: f32,
    },
    /// A MIDI control change event. See [`control_change`] for a list of CC numbers.
    MidiCC {
        timing: u32,
        channel: u8,
        cc: u8,
        /// The CC's value, normalized to `[0, 1]`. Multiply by 127 to get the original raw value.
        value: f32,
    },
    /// A MIDI program change. The processor does not act on these, the host switches programs
    /// through [`Processor::set_current_program()`][crate::processor::Processor::set_current_program()].
    MidiProgramChange {
        timing: u32,
        channel: u8,
        program: u8,
    },
}

impl NoteEvent {
    /// Returns the sample within the current buffer this event belongs to.
    pub fn timing(&self) -> u32 {
        match &self {
            NoteEvent::NoteOn { timing, .. } => *timing,
            NoteEvent::NoteOff { timing, .. } => *timing,
            NoteEvent::Choke { timing, .. } => *timing,
            NoteEvent::PolyPressure { timing, .. } => *timing,
            NoteEvent::MidiChannelPressure { timing, .. } => *timing,
            NoteEvent::MidiPitchBend { timing, .. } => *timing,
            NoteEvent::MidiCC { timing, .. } => *timing,
            NoteEvent::MidiProgramChange { timing, .. } => *timing,
        }
    }

    /// Returns the MIDI channel this event was sent on.
    pub fn channel(&self) -> u8 {
        match &self {
            NoteEvent::NoteOn { channel, .. } => *channel,
            NoteEvent::NoteOff { channel, .. } => *channel,
            NoteEvent::Choke { channel, .. } => *channel,
            NoteEvent::PolyPressure { channel, .. } => *channel,
            NoteEvent::MidiChannelPressure { channel, .. } => *channel,
            NoteEvent::MidiPitchBend { channel, .. } => *channel,
            NoteEvent::MidiCC { channel, .. } => *channel,
            NoteEvent::MidiProgramChange { channel, .. } => *channel,
        }
    }

    /// Parse a raw MIDI message into a [`NoteEvent`]. Will return `Err(event_type)` for message
    /// types that don't have an equivalent event. A note on with zero velocity is a note off.
    pub fn from_midi(timing: u32, midi_data: [u8; 3]) -> Result<Self, u8> {
        let event_type = midi_data[0] & midi::EVENT_TYPE_MASK;
        let channel = midi_data[0] & midi::MIDI_CHANNEL_MASK;
        match event_type {
            midi::NOTE_ON if midi_data[2] == 0 => Ok(NoteEvent::NoteOff {
                timing,
                channel,
                note: midi_data[1],
                velocity: 0.0,
            }),
            midi::NOTE_ON => Ok(NoteEvent::NoteOn {
                timing,
                channel,
                note: midi_data[1],
                velocity: midi_data[2] as f32 / 127.0,
            }),
            midi::NOTE_OFF => Ok(NoteEvent::NoteOff {
                timing,
                channel,
                note: midi_data[1],
                velocity: midi_data[2] as f32 / 127.0,
            }),
            midi::POLYPHONIC_KEY_PRESSURE => Ok(NoteEvent::PolyPressure {
                timing,
                channel,
                note: midi_data[1],
                pressure: midi_data[2] as f32 / 127.0,
            }),
            midi::CHANNEL_KEY_PRESSURE => Ok(NoteEvent::MidiChannelPressure {
                timing,
                channel,
                pressure: midi_data[1] as f32 / 127.0,
            }),
            midi::PITCH_BEND_CHANGE => Ok(NoteEvent::MidiPitchBend {
                timing,
                channel,
                value: (midi_data[1] as u16 + ((midi_data[2] as u16) << 7)) as f32
                    / ((1 << 14) - 1) as f32,
            }),
            midi::CONTROL_CHANGE => Ok(NoteEvent::MidiCC {
                timing,
                channel,
                cc: midi_data[1],
                value: midi_data[2] as f32 / 127.0,
            }),
            midi::PROGRAM_CHANGE => Ok(NoteEvent::MidiProgramChange {
                timing,
                channel,
                program: midi_data[1],
            }),
            n => Err(n),
        }
    }
}

/// The note events for a single block, ordered by their timing. Events with the same timing keep
/// the order they were added in. The processor only ever gets to read this list.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventList {
    events: Vec<NoteEvent>,
}

impl EventList {
    /// An empty event list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event, keeping the list sorted by timing.
    pub fn push(&mut self, event: NoteEvent) {
        let timing = event.timing();
        let idx = self.events.partition_point(|e| e.timing() <= timing);
        self.events.insert(idx, event);
    }

    /// Remove all events while keeping the allocation around.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[NoteEvent] {
        &self.events
    }

    /// Whether every event falls within a block of `num_samples` samples. A zero-length block only
    /// accepts events at timing 0.
    pub fn fits_block(&self, num_samples: usize) -> bool {
        let last_valid_index = num_samples.saturating_sub(1) as u32;
        self.events
            .last()
            .map_or(true, |event| event.timing() <= last_valid_index)
    }
}

impl<'a> IntoIterator for &'a EventList {
    type Item = &'a NoteEvent;
    type IntoIter = std::slice::Iter<'a, NoteEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl FromIterator<NoteEvent> for EventList {
    fn from_iter<I: IntoIterator<Item = NoteEvent>>(iter: I) -> Self {
        let mut events: Vec<NoteEvent> = iter.into_iter().collect();
        // This is a stable sort, so simultaneous events keep their relative order
        events.sort_by_key(|event| event.timing());

        Self { events }
    }
}
