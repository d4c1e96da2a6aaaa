//! MIDI Note On/Off input.
//!
//! Two transports are supported.  Serial MIDI delivers a raw byte stream,
//! which is reassembled into messages by a [MidiDecoder] fed one byte at a
//! time.  Packet transports such as USB MIDI already deliver whole messages,
//! which are handed straight to [dispatch_packet].
//!
//! Only Note On and Note Off messages (on any channel) are recognised; all
//! other traffic is skipped.

use arrayvec::ArrayVec;
use wmidi::{Channel, MidiMessage, Note, U7};

/// Receives decoded note events.
///
/// Methods take `&self` so that a handler can be shared between the context
/// decoding MIDI and the context rendering audio.
pub trait NoteHandler {
    /// Start playing the note with MIDI key number `key`
    fn note_on(&self, key: u8);
    /// Release the note with MIDI key number `key`
    fn note_off(&self, key: u8);
    /// Silence the voice, whichever note is held
    fn all_notes_off(&self);
    /// Dispatch a decoded event to [NoteHandler::note_on] or
    /// [NoteHandler::note_off]
    fn handle(&self, event: NoteEvent) {
        match event {
            NoteEvent::On { key, .. } => self.note_on(key.into()),
            NoteEvent::Off { key, .. } => self.note_off(key.into()),
        }
    }
}

/// A decoded note message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteEvent {
    /// A Note On with a non-zero velocity
    On {
        /// The channel the message was sent on
        channel: Channel,
        /// The key number
        key: Note,
        /// The key velocity, always greater than zero
        velocity: U7,
    },
    /// A Note Off, or a Note On with zero velocity
    Off {
        /// The channel the message was sent on
        channel: Channel,
        /// The key number
        key: Note,
        /// The release velocity
        velocity: U7,
    },
}

impl NoteEvent {
    /// Decode a complete three byte message: status, key number, velocity.
    ///
    /// Returns `None` for short packets, messages other than Note On/Off, and
    /// data bytes with the high bit set.  Bytes past the third are ignored.
    pub fn from_packet(packet: &[u8]) -> Option<Self> {
        let msg = MidiMessage::try_from(packet.get(..3)?).ok()?;
        match msg {
            MidiMessage::NoteOn(channel, key, velocity) if u8::from(velocity) > 0 => {
                Some(Self::On {
                    channel,
                    key,
                    velocity,
                })
            }
            MidiMessage::NoteOn(channel, key, velocity)
            | MidiMessage::NoteOff(channel, key, velocity) => Some(Self::Off {
                channel,
                key,
                velocity,
            }),
            _ => None,
        }
    }
    /// The key number of this event
    pub fn key(&self) -> u8 {
        match self {
            Self::On { key, .. } | Self::Off { key, .. } => (*key).into(),
        }
    }
    /// The channel of this event
    pub fn channel(&self) -> Channel {
        match self {
            Self::On { channel, .. } | Self::Off { channel, .. } => *channel,
        }
    }
}

/// Decode a framed message and pass any note event to `handler`.  Returns the
/// event, or `None` if the packet held no note message.
pub fn dispatch_packet<H: NoteHandler + ?Sized>(packet: &[u8], handler: &H) -> Option<NoteEvent> {
    let event = NoteEvent::from_packet(packet);
    match event {
        Some(ev) => handler.handle(ev),
        None => log::trace!("Skipping MIDI packet {:02X?}", packet),
    }
    event
}

/// The position of a [MidiDecoder] within a message
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecoderState {
    /// Waiting for a Note On/Off status byte
    #[default]
    AwaitingStatus,
    /// Waiting for the key number
    AwaitingData1,
    /// Waiting for the velocity
    AwaitingData2,
}

/// Returns true for the status byte of a Note On or Note Off on any channel
const fn is_note_status(byte: u8) -> bool {
    (byte & 0xE0) == 0x80
}

/// Returns true for any status byte
const fn is_status(byte: u8) -> bool {
    byte & 0x80 != 0
}

/// Reassembles Note On/Off messages from a serial MIDI byte stream.
///
/// The decoder is fed one byte at a time and never blocks.  A status byte
/// that arrives in place of a data byte abandons the partial message and
/// starts a new one.  Running status is not supported, and there is no
/// timeout: a message missing its last bytes waits for them indefinitely.
#[derive(Clone, Debug, Default)]
pub struct MidiDecoder {
    state: DecoderState,
    message: ArrayVec<u8, 3>,
}

impl MidiDecoder {
    /// Constructor
    pub fn new() -> Self {
        Default::default()
    }
    /// The position of the decoder within the current message
    pub fn state(&self) -> DecoderState {
        self.state
    }
    /// Discard any partial message
    pub fn reset(&mut self) {
        self.state = DecoderState::AwaitingStatus;
        self.message.clear();
    }
    /// Process one byte, returning an event if it completed a message
    pub fn feed(&mut self, byte: u8) -> Option<NoteEvent> {
        match self.state {
            DecoderState::AwaitingStatus => {
                self.match_status(byte);
                None
            }
            DecoderState::AwaitingData1 | DecoderState::AwaitingData2 if is_status(byte) => {
                log::debug!(
                    "Status byte {:02X} interrupted MIDI message {:02X?}",
                    byte,
                    self.message.as_slice()
                );
                self.reset();
                self.match_status(byte);
                None
            }
            DecoderState::AwaitingData1 => {
                self.message.push(byte);
                self.state = DecoderState::AwaitingData2;
                None
            }
            DecoderState::AwaitingData2 => {
                self.message.push(byte);
                let event = NoteEvent::from_packet(&self.message);
                self.reset();
                event
            }
        }
    }
    fn match_status(&mut self, byte: u8) {
        if is_note_status(byte) {
            self.message.clear();
            self.message.push(byte);
            self.state = DecoderState::AwaitingData1;
        }
    }
    /// Process one byte, passing any completed event to `handler`
    pub fn feed_into<H: NoteHandler + ?Sized>(
        &mut self,
        byte: u8,
        handler: &H,
    ) -> Option<NoteEvent> {
        let event = self.feed(byte);
        if let Some(ev) = event {
            handler.handle(ev);
        }
        event
    }
    /// Process a run of bytes, e.g. the result of one serial read, passing
    /// every completed event to `handler`.  Returns the number of events.
    pub fn feed_all<H: NoteHandler + ?Sized>(&mut self, bytes: &[u8], handler: &H) -> usize {
        bytes
            .iter()
            .filter_map(|&byte| self.feed_into(byte, handler))
            .count()
    }
}
