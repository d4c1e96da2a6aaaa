//! Note input sources read by the control thread.  Each poll reads a bounded
//! amount of input, so a busy source can't stall the pot updates.

use std::io::{self, Read};

use circlesynth::{dispatch_packet, keyboard, MidiDecoder, NoteHandler};

/// How the input stream is framed
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Transport {
    /// A raw serial MIDI byte stream
    Serial,
    /// Whole three byte MIDI messages, as delivered by USB MIDI
    Packet,
    /// Eight byte HID boot-protocol keyboard reports
    Keyboard,
}

const PACKET_SIZE: usize = 3;
const REPORT_SIZE: usize = 8;

/// Reads note input from `R` and applies it to a [NoteHandler]
pub struct NoteInput<R> {
    reader: R,
    transport: Transport,
    decoder: MidiDecoder,
    buf: Vec<u8>,
    eof: bool,
}

impl<R: Read> NoteInput<R> {
    /// Constructor.  At most `read_size` bytes of MIDI are read per poll.
    pub fn new(reader: R, transport: Transport, read_size: usize) -> Self {
        Self {
            reader,
            transport,
            decoder: MidiDecoder::new(),
            buf: vec![0; read_size.max(1)],
            eof: false,
        }
    }
    /// True once the underlying reader is exhausted
    pub fn is_eof(&self) -> bool {
        self.eof
    }
    /// Read whatever input is available and apply it to `handler`.  Returns
    /// the number of note events (or keyboard reports) handled.
    pub fn poll<H: NoteHandler + ?Sized>(&mut self, handler: &H) -> io::Result<usize> {
        if self.eof {
            return Ok(0);
        }
        match self.transport {
            Transport::Serial => self.poll_serial(handler),
            Transport::Packet => self.poll_packets(handler),
            Transport::Keyboard => self.poll_keyboard(handler),
        }
    }
    fn poll_serial<H: NoteHandler + ?Sized>(&mut self, handler: &H) -> io::Result<usize> {
        let count = self.reader.read(&mut self.buf)?;
        if count == 0 {
            self.eof = true;
            return Ok(0);
        }
        Ok(self.decoder.feed_all(&self.buf[..count], handler))
    }
    fn poll_packets<H: NoteHandler + ?Sized>(&mut self, handler: &H) -> io::Result<usize> {
        let mut events = 0;
        for _ in 0..(self.buf.len() / PACKET_SIZE).max(1) {
            let mut packet = [0u8; PACKET_SIZE];
            if !self.read_frame(&mut packet)? {
                break;
            }
            if dispatch_packet(&packet, handler).is_some() {
                events += 1;
            }
        }
        Ok(events)
    }
    fn poll_keyboard<H: NoteHandler + ?Sized>(&mut self, handler: &H) -> io::Result<usize> {
        let mut report = [0u8; REPORT_SIZE];
        if !self.read_frame(&mut report)? {
            return Ok(0);
        }
        let mut keys = [0u8; 6];
        keys.copy_from_slice(&report[2..]);
        match keyboard::handle_report(report[0], &keys, handler) {
            Some(note) => log::debug!("Keyboard note {}", note),
            None => log::debug!("Keyboard released"),
        }
        Ok(1)
    }
    /// Fill `frame`, returning false at the end of input.  A truncated final
    /// frame is discarded.
    fn read_frame(&mut self, frame: &mut [u8]) -> io::Result<bool> {
        match self.reader.read_exact(frame) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.eof = true;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circlesynth::VoiceControls;
    use std::io::Cursor;

    #[test]
    fn serial_reads_are_bounded() {
        let controls = VoiceControls::new();
        // a note on split across two reads
        let bytes = [0x90u8, 0x3C, 0x40, 0x80, 0x3C, 0x00];
        let mut input = NoteInput::new(Cursor::new(bytes), Transport::Serial, 4);
        assert_eq!(input.poll(&controls).unwrap(), 1);
        assert_eq!(controls.active_key(), Some(60));
        assert_eq!(input.poll(&controls).unwrap(), 1);
        assert_eq!(controls.active_key(), None);
        assert_eq!(input.poll(&controls).unwrap(), 0);
        assert!(input.is_eof());
    }
    #[test]
    fn packets_skip_other_messages() {
        let controls = VoiceControls::new();
        let bytes = [0xB0u8, 0x07, 0x64, 0x91, 0x45, 0x7F, 0x80];
        let mut input = NoteInput::new(Cursor::new(bytes), Transport::Packet, 20);
        assert_eq!(input.poll(&controls).unwrap(), 1);
        assert_eq!(controls.active_key(), Some(69));
        assert!(input.is_eof());
    }
    #[test]
    fn keyboard_reports() {
        let controls = VoiceControls::new();
        let mut bytes = vec![0u8, 0, 0x1B, 0, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0; REPORT_SIZE]);
        let mut input = NoteInput::new(Cursor::new(bytes), Transport::Keyboard, 20);
        assert_eq!(input.poll(&controls).unwrap(), 1);
        assert_eq!(controls.active_key(), Some(62));
        assert_eq!(input.poll(&controls).unwrap(), 1);
        assert_eq!(controls.active_key(), None);
        assert_eq!(input.poll(&controls).unwrap(), 0);
        assert!(input.is_eof());
    }
}
