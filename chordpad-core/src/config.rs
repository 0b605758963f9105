use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use chordpad_types::{Key, ScaleType};

use crate::state::{
    EngineConfig, KeyMap, DEFAULT_DEADZONE, DEFAULT_GRACE_PERIOD, DEFAULT_INVERSION_CYCLE,
    DEFAULT_INVERSION_MODE_TIMEOUT, DEFAULT_NOTE_ON_VELOCITY,
};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    keypad: KeypadConfig,
    #[serde(default)]
    joystick: JoystickConfig,
    #[serde(default)]
    inversion: InversionConfig,
    #[serde(default)]
    midi: MidiConfig,
    #[serde(default)]
    runtime: RuntimeConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    key: Option<String>,
    scale: Option<String>,
}

#[derive(Deserialize, Default)]
struct KeypadConfig {
    layout: Option<Vec<String>>,
}

#[derive(Deserialize, Default)]
struct JoystickConfig {
    deadzone: Option<u8>,
    grace_period_ms: Option<u64>,
}

#[derive(Deserialize, Default)]
struct InversionConfig {
    cycle_length: Option<u8>,
    mode_timeout_secs: Option<u64>,
}

#[derive(Deserialize, Default)]
struct MidiConfig {
    channel: Option<u8>,
    velocity: Option<u8>,
    port: Option<String>,
}

#[derive(Deserialize, Default)]
struct RuntimeConfig {
    event_log: Option<bool>,
}

/// MIDI output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiSettings {
    /// 0-based channel
    pub channel: u8,
    /// Port name substring; `None` picks the first port.
    pub port: Option<String>,
}

pub struct Config {
    file: ConfigFile,
}

impl Config {
    /// Embedded defaults merged with `~/.config/chordpad/config.toml`.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::embedded(),
        }
    }

    /// Embedded defaults merged with the file at `path`, if it exists.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::embedded();
        if !path.exists() {
            return config;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                Ok(user) => merge(&mut config.file, user),
                Err(e) => {
                    log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                }
            },
            Err(e) => {
                log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
            }
        }
        config
    }

    fn embedded() -> Self {
        let file: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        Config { file }
    }

    /// Startup key and scale.
    pub fn defaults(&self) -> (Key, ScaleType) {
        let key = self
            .file
            .defaults
            .key
            .as_deref()
            .and_then(|s| parse_named::<Key>("defaults.key", s))
            .unwrap_or_default();
        let scale = self
            .file
            .defaults
            .scale
            .as_deref()
            .and_then(|s| parse_named::<ScaleType>("defaults.scale", s))
            .unwrap_or_default();
        (key, scale)
    }

    pub fn engine_config(&self) -> EngineConfig {
        let keymap = match self.file.keypad.layout.as_deref() {
            Some(layout) if !layout.is_empty() => KeyMap::from_layout(layout),
            Some(_) => {
                log::warn!(target: "config", "keypad.layout is empty; using the stock layout");
                KeyMap::default()
            }
            None => KeyMap::default(),
        };

        let inversion_mode_timeout = match self.file.inversion.mode_timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_INVERSION_MODE_TIMEOUT),
        };

        EngineConfig {
            keymap,
            deadzone: self
                .file
                .joystick
                .deadzone
                .unwrap_or(DEFAULT_DEADZONE)
                .min(63),
            grace_period: self
                .file
                .joystick
                .grace_period_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_GRACE_PERIOD),
            inversion_cycle: self
                .file
                .inversion
                .cycle_length
                .unwrap_or(DEFAULT_INVERSION_CYCLE)
                .max(1),
            inversion_mode_timeout,
            note_on_velocity: self
                .file
                .midi
                .velocity
                .unwrap_or(DEFAULT_NOTE_ON_VELOCITY)
                .clamp(1, 127),
            ..EngineConfig::default()
        }
    }

    pub fn midi(&self) -> MidiSettings {
        let channel = match self.file.midi.channel {
            Some(ch @ 1..=16) => ch - 1,
            Some(ch) => {
                log::warn!(target: "config", "midi.channel {} out of range 1-16; using 1", ch);
                0
            }
            None => 0,
        };
        let port = self
            .file
            .midi
            .port
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        MidiSettings { channel, port }
    }

    pub fn event_log_enabled(&self) -> bool {
        self.file.runtime.event_log.unwrap_or(false)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chordpad").join("config.toml"))
}

fn parse_named<T>(field: &str, s: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match s.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!(target: "config", "{}: {}; using default", field, e);
            None
        }
    }
}

fn merge(base: &mut ConfigFile, user: ConfigFile) {
    if user.defaults.key.is_some() {
        base.defaults.key = user.defaults.key;
    }
    if user.defaults.scale.is_some() {
        base.defaults.scale = user.defaults.scale;
    }
    if user.keypad.layout.is_some() {
        base.keypad.layout = user.keypad.layout;
    }
    if user.joystick.deadzone.is_some() {
        base.joystick.deadzone = user.joystick.deadzone;
    }
    if user.joystick.grace_period_ms.is_some() {
        base.joystick.grace_period_ms = user.joystick.grace_period_ms;
    }
    if user.inversion.cycle_length.is_some() {
        base.inversion.cycle_length = user.inversion.cycle_length;
    }
    if user.inversion.mode_timeout_secs.is_some() {
        base.inversion.mode_timeout_secs = user.inversion.mode_timeout_secs;
    }
    if user.midi.channel.is_some() {
        base.midi.channel = user.midi.channel;
    }
    if user.midi.velocity.is_some() {
        base.midi.velocity = user.midi.velocity;
    }
    if user.midi.port.is_some() {
        base.midi.port = user.midi.port;
    }
    if user.runtime.event_log.is_some() {
        base.runtime.event_log = user.runtime.event_log;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::PhysicalKey;
    use crate::state::KeyFunction;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_embedded_config() {
        let config = Config::embedded();
        assert_eq!(config.defaults(), (Key::C, ScaleType::Major));
        assert_eq!(config.engine_config(), EngineConfig::default());
        assert_eq!(config.midi(), MidiSettings { channel: 0, port: None });
        assert!(!config.event_log_enabled());
    }

    #[test]
    fn test_missing_user_file_uses_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml"));
        assert_eq!(config.defaults(), (Key::C, ScaleType::Major));
    }

    #[test]
    fn test_user_file_overrides_field_by_field() {
        let file = write_config(
            r#"
[defaults]
scale = "dorian"

[joystick]
grace_period_ms = 150

[midi]
channel = 10
port = "  FluidSynth "
"#,
        );
        let config = Config::load_from(file.path());
        assert_eq!(config.defaults(), (Key::C, ScaleType::Dorian));
        let engine = config.engine_config();
        assert_eq!(engine.grace_period, Duration::from_millis(150));
        assert_eq!(engine.deadzone, DEFAULT_DEADZONE);
        assert_eq!(
            config.midi(),
            MidiSettings { channel: 9, port: Some("FluidSynth".to_string()) }
        );
    }

    #[test]
    fn test_malformed_user_file_is_ignored() {
        let file = write_config("[defaults\nkey = ");
        let config = Config::load_from(file.path());
        assert_eq!(config.defaults(), (Key::C, ScaleType::Major));
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let file = write_config("[defaults]\nkey = \"H\"\nscale = \"bebop\"\n");
        let config = Config::load_from(file.path());
        assert_eq!(config.defaults(), (Key::C, ScaleType::Major));
    }

    #[test]
    fn test_custom_layout() {
        let file = write_config(
            r#"
[keypad]
layout = ["0", "1", "2", "3", "4", "5", "6", "inversion", "root", "scale", "-", "reload"]
"#,
        );
        let engine = Config::load_from(file.path()).engine_config();
        assert_eq!(engine.keymap.lookup(PhysicalKey(0)), Some(KeyFunction::Degree(0)));
        assert_eq!(engine.keymap.lookup(PhysicalKey(7)), Some(KeyFunction::InversionMode));
        assert_eq!(engine.keymap.lookup(PhysicalKey(10)), None);
        assert_eq!(engine.keymap.key_for(KeyFunction::Reload), Some(PhysicalKey(11)));
    }

    #[test]
    fn test_zero_timeout_disables_expiry() {
        let file = write_config("[inversion]\nmode_timeout_secs = 0\ncycle_length = 0\n");
        let engine = Config::load_from(file.path()).engine_config();
        assert_eq!(engine.inversion_mode_timeout, None);
        assert_eq!(engine.inversion_cycle, 1);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let file = write_config("[midi]\nchannel = 17\nvelocity = 0\n\n[joystick]\ndeadzone = 90\n");
        let config = Config::load_from(file.path());
        assert_eq!(config.midi().channel, 0);
        let engine = config.engine_config();
        assert_eq!(engine.note_on_velocity, 1);
        assert_eq!(engine.deadzone, 63);
    }
}
