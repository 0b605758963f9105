//! Append-only JSONL event log for debugging and replay.
//!
//! Written to `~/.local/share/chordpad/events.jsonl`: a session header, then
//! one line per scheduler step that did something, holding the inputs it
//! dispatched and the effects they produced. Tailable via `tail -f` while playing.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::action::EngineInput;
use crate::dispatch::{dispatch_input, expire_inversion_mode, EngineEffect};
use crate::state::{EngineConfig, EngineState};
use crate::types::{Key, ScaleType};

/// Log directory: `~/.local/share/chordpad/`
fn log_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("chordpad")
    } else {
        PathBuf::from(".")
    }
}

pub struct EventLog {
    writer: BufWriter<File>,
    session_start: Instant,
}

#[derive(Serialize)]
struct SessionHeader {
    event: &'static str,
    epoch_ms: u128,
    pid: u32,
}

#[derive(Serialize)]
struct EventEntry<'a> {
    t_ms: u128,
    inputs: &'a [EngineInput],
    effects: &'a [EngineEffect],
}

#[derive(Deserialize)]
struct ReplayEntry {
    t_ms: Option<u64>,
    inputs: Option<Vec<EngineInput>>,
}

impl EventLog {
    /// Open the default log (`~/.local/share/chordpad/events.jsonl`).
    pub fn open() -> Option<Self> {
        let dir = log_dir();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            log::warn!("event log disabled: {}", e);
            return None;
        }
        Self::open_at(&dir.join("events.jsonl"))
    }

    pub fn open_at(path: &Path) -> Option<Self> {
        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => file,
            Err(e) => {
                log::warn!("event log disabled: {}: {}", path.display(), e);
                return None;
            }
        };
        let mut log = Self {
            writer: BufWriter::new(file),
            session_start: Instant::now(),
        };
        let header = SessionHeader {
            event: "session_start",
            epoch_ms: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
            pid: std::process::id(),
        };
        log.write_line(&header);
        Some(log)
    }

    /// Milliseconds since the log was opened.
    pub fn elapsed_ms(&self, now: Instant) -> u128 {
        now.saturating_duration_since(self.session_start).as_millis()
    }

    /// Log one scheduler step. Steps with no inputs and no effects are skipped.
    pub fn log_step(&mut self, now: Instant, inputs: &[EngineInput], effects: &[EngineEffect]) {
        if inputs.is_empty() && effects.is_empty() {
            return;
        }
        let entry = EventEntry {
            t_ms: self.elapsed_ms(now),
            inputs,
            effects,
        };
        self.write_line(&entry);
    }

    fn write_line<T: Serialize>(&mut self, value: &T) {
        if let Ok(json) = serde_json::to_string(value) {
            let _ = writeln!(self.writer, "{}", json);
            let _ = self.writer.flush();
        }
    }
}

/// Why a replay stopped.
#[derive(Debug)]
pub enum ReplayError {
    /// The log file could not be opened.
    Open { path: PathBuf, source: std::io::Error },
    /// Reading failed partway through; `line` is 1-based.
    Read { line: usize, source: std::io::Error },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => write!(f, "cannot open {}: {}", path.display(), source),
            Self::Read { line, source } => write!(f, "read failed at line {}: {}", line, source),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Read { source, .. } => Some(source),
        }
    }
}

/// Re-dispatch every logged step into `state`, preserving relative timing.
///
/// Each step dispatches its inputs in order and then checks the inversion
/// timeout, as `tick` does. A step that requested a reload leaves `state`
/// rebuilt from `defaults`, the way the host restarts the engine. Blank and
/// unparseable lines are skipped. Returns every effect produced, in order.
pub fn replay(
    path: &Path,
    defaults: (Key, ScaleType),
    state: &mut EngineState,
    config: &EngineConfig,
) -> Result<Vec<EngineEffect>, ReplayError> {
    let file = File::open(path).map_err(|source| ReplayError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut base = Instant::now();
    let mut last = base;
    let mut effects = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| ReplayError::Read { line: index + 1, source })?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: ReplayEntry = match serde_json::from_str(&line) {
            Ok(e) => e,
            Err(e) => {
                log::warn!("replay: skipping line {}: {}", index + 1, e);
                continue;
            }
        };
        let Some(inputs) = entry.inputs else {
            // Session header: timestamps restart, so continue from the latest instant
            base = last;
            continue;
        };
        let now = base + Duration::from_millis(entry.t_ms.unwrap_or(0));
        last = last.max(now);
        let step_start = effects.len();
        for input in &inputs {
            dispatch_input(input, state, config, now, &mut effects);
        }
        expire_inversion_mode(state, config, now, &mut effects);
        if effects[step_start..].contains(&EngineEffect::Reload) {
            let (key, scale) = defaults;
            *state = EngineState::with_defaults(key, scale);
        }
    }
    Ok(effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::KeyEvent;
    use chordpad_types::ChordType;

    const C_MAJOR: (Key, ScaleType) = (Key::C, ScaleType::Major);

    #[test]
    fn writes_header_then_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let mut log = EventLog::open_at(&path).unwrap();
        let now = Instant::now();
        log.log_step(now, &[], &[]);
        log.log_step(
            now,
            &[EngineInput::Key(KeyEvent::press(8))],
            &[EngineEffect::SetText("Maj".to_string())],
        );
        drop(log);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("session_start"));
        let entry: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(entry["inputs"][0]["Key"]["key"], 8);
        assert_eq!(entry["inputs"][0]["Key"]["pressed"], true);
        assert_eq!(entry["effects"][0]["SetText"], "Maj");
    }

    #[test]
    fn replay_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        File::create(&path).unwrap();

        let mut state = EngineState::new();
        let effects = replay(&path, C_MAJOR, &mut state, &EngineConfig::default()).unwrap();
        assert!(effects.is_empty());
        assert_eq!(state, EngineState::new());
    }

    #[test]
    fn replay_rebuilds_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let mut f = File::create(&path).unwrap();
        writeln!(f, r#"{{"event":"session_start","epoch_ms":1739290222000,"pid":1}}"#).unwrap();
        writeln!(f, "not valid json at all").unwrap();
        writeln!(f).unwrap();
        // Advance the root twice, then sound degree 0 and push the stick up
        writeln!(f, r#"{{"t_ms":10,"inputs":[{{"Key":{{"key":0,"pressed":true}}}}],"effects":[]}}"#).unwrap();
        writeln!(f, r#"{{"t_ms":20,"inputs":[{{"Key":{{"key":0,"pressed":true}}}}],"effects":[]}}"#).unwrap();
        writeln!(f, r#"{{"t_ms":30,"inputs":[{{"Key":{{"key":8,"pressed":true}}}}],"effects":[]}}"#).unwrap();
        writeln!(f, r#"{{"t_ms":40,"inputs":[{{"Axes":{{"x":64,"y":127}}}}],"effects":[]}}"#).unwrap();
        drop(f);

        let mut state = EngineState::new();
        let effects = replay(&path, C_MAJOR, &mut state, &EngineConfig::default()).unwrap();
        assert_eq!(state.root, Key::D);
        assert_eq!(state.scale, ScaleType::Major);
        let sounding = state.sounding.as_ref().unwrap();
        assert_eq!(sounding.chord_type, ChordType::Minor);
        assert_eq!(sounding.notes.notes(), &[62, 65, 69]);
        assert_eq!(effects.last(), Some(&EngineEffect::SetText("Min".to_string())));
    }

    #[test]
    fn replay_applies_inversion_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timeout.jsonl");
        let mut f = File::create(&path).unwrap();
        writeln!(f, r#"{{"t_ms":10,"inputs":[{{"Key":{{"key":3,"pressed":true}}}}],"effects":[]}}"#).unwrap();
        writeln!(f, r#"{{"t_ms":10010,"inputs":[],"effects":[{{"SetText":""}}]}}"#).unwrap();
        drop(f);

        let mut state = EngineState::new();
        replay(&path, C_MAJOR, &mut state, &EngineConfig::default()).unwrap();
        assert!(!state.inversion_assign);
    }

    #[test]
    fn replay_reload_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reload.jsonl");
        let mut f = File::create(&path).unwrap();
        // Advance the root, assign an inversion, then press reload
        writeln!(f, r#"{{"t_ms":10,"inputs":[{{"Key":{{"key":0,"pressed":true}}}}],"effects":[]}}"#).unwrap();
        writeln!(f, r#"{{"t_ms":20,"inputs":[{{"Key":{{"key":3,"pressed":true}}}}],"effects":[]}}"#).unwrap();
        writeln!(f, r#"{{"t_ms":30,"inputs":[{{"Key":{{"key":8,"pressed":true}}}}],"effects":[]}}"#).unwrap();
        writeln!(f, r#"{{"t_ms":40,"inputs":[{{"Key":{{"key":2,"pressed":true}}}}],"effects":[]}}"#).unwrap();
        drop(f);

        let mut state = EngineState::new();
        let defaults = (Key::G, ScaleType::Dorian);
        let effects = replay(&path, defaults, &mut state, &EngineConfig::default()).unwrap();
        assert_eq!(effects.last(), Some(&EngineEffect::Reload));
        assert_eq!(state, EngineState::with_defaults(Key::G, ScaleType::Dorian));
    }

    #[test]
    fn replay_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.jsonl");
        let mut state = EngineState::new();
        let err = replay(&path, C_MAJOR, &mut state, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ReplayError::Open { .. }));
        assert!(err.to_string().contains("missing.jsonl"));
    }
}
