use midir::{MidiOutput, MidiOutputConnection};

use crate::io::ChordOutput;

const CLIENT_NAME: &str = "chordpad";

/// Information about an available MIDI port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

/// Encode a note-on for `channel` (0-15). Pitch is clamped into the MIDI range.
pub fn note_on_message(channel: u8, pitch: i32, velocity: u8) -> [u8; 3] {
    [0x90 | (channel & 0x0F), clamp_pitch(pitch), velocity & 0x7F]
}

/// Encode a note-off for `channel` (0-15). Pitch is clamped into the MIDI range.
pub fn note_off_message(channel: u8, pitch: i32, velocity: u8) -> [u8; 3] {
    [0x80 | (channel & 0x0F), clamp_pitch(pitch), velocity & 0x7F]
}

fn clamp_pitch(pitch: i32) -> u8 {
    pitch.clamp(0, 127) as u8
}

/// MIDI output manager
///
/// Sends chord notes to a single output port. While disconnected, note
/// calls are dropped so the engine can run without a device.
pub struct MidiOutputManager {
    midi_out: Option<MidiOutput>,
    connection: Option<MidiOutputConnection>,
    connected_port_name: Option<String>,
    available_ports: Vec<MidiPortInfo>,
    channel: u8,
}

impl MidiOutputManager {
    pub fn new() -> Self {
        let midi_out = match MidiOutput::new(CLIENT_NAME) {
            Ok(out) => Some(out),
            Err(e) => {
                log::warn!(target: "midi", "MIDI output unavailable: {}", e);
                None
            }
        };
        Self {
            midi_out,
            connection: None,
            connected_port_name: None,
            available_ports: Vec::new(),
            channel: 0,
        }
    }

    /// Refresh the list of available MIDI output ports
    pub fn refresh_ports(&mut self) {
        self.available_ports.clear();

        if let Some(ref midi_out) = self.midi_out {
            for (index, port) in midi_out.ports().iter().enumerate() {
                if let Ok(name) = midi_out.port_name(port) {
                    self.available_ports.push(MidiPortInfo { index, name });
                }
            }
        }
    }

    pub fn list_ports(&self) -> &[MidiPortInfo] {
        &self.available_ports
    }

    /// Index of the first listed port whose name contains `needle` (case-insensitive).
    pub fn find_port(&self, needle: &str) -> Option<usize> {
        let needle = needle.to_lowercase();
        self.available_ports
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
            .map(|p| p.index)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connected_port_name(&self) -> Option<&str> {
        self.connected_port_name.as_deref()
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Set the output channel, 0-based. Values above 15 are masked.
    pub fn set_channel(&mut self, channel: u8) {
        self.channel = channel & 0x0F;
    }

    /// Connect to a MIDI output port by index
    pub fn connect(&mut self, port_index: usize) -> Result<(), String> {
        self.disconnect();

        // connect() consumes the MidiOutput
        let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|e| e.to_string())?;
        let ports = midi_out.ports();

        let Some(port) = ports.get(port_index) else {
            return Err(format!("Invalid port index: {}", port_index));
        };
        let port_name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let connection = midi_out
            .connect(port, "chordpad-output")
            .map_err(|e| e.to_string())?;

        log::info!(target: "midi", "connected to {}", port_name);
        self.connection = Some(connection);
        self.connected_port_name = Some(port_name);

        // Recreate MidiOutput for future port listing
        self.midi_out = MidiOutput::new(CLIENT_NAME).ok();

        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
        }
        self.connected_port_name = None;
    }

    /// Returns true if the message reached the port.
    fn send(&mut self, message: &[u8]) -> bool {
        match self.connection.as_mut() {
            Some(conn) => match conn.send(message) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!(target: "midi", "send failed: {}", e);
                    false
                }
            },
            None => {
                log::debug!(target: "midi", "not connected, dropping {:02X?}", message);
                false
            }
        }
    }
}

impl ChordOutput for MidiOutputManager {
    fn note_on(&mut self, pitch: i32, velocity: u8) {
        let message = note_on_message(self.channel, pitch, velocity);
        self.send(&message);
    }

    fn note_off(&mut self, pitch: i32, velocity: u8) {
        let message = note_off_message(self.channel, pitch, velocity);
        self.send(&message);
    }
}

impl Default for MidiOutputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MidiOutputManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}
