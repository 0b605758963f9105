use std::time::{Duration, Instant};

use chordpad_core::action::EngineInput;
use chordpad_core::config::Config;
use chordpad_core::dispatch::{apply_effects, tick, EngineEffect};
use chordpad_core::event_log::EventLog;
use chordpad_core::io::DisplaySink;
use chordpad_core::midi::MidiOutputManager;
use chordpad_core::state::{EngineConfig, EngineState};

use crate::ui::render::{draw_screen, ScreenDisplay, ScreenView};
use crate::ui::{AppEvent, InputSource, RatatuiBackend, TerminalKeypad};

const POLL_TIMEOUT: Duration = Duration::from_millis(2);
const REDRAW_INTERVAL: Duration = Duration::from_millis(50);

/// Engine plus the devices it drives.
pub struct Session {
    config: Config,
    engine_config: EngineConfig,
    state: EngineState,
    midi: MidiOutputManager,
    display: ScreenDisplay,
    keypad: TerminalKeypad,
    event_log: Option<EventLog>,
}

impl Session {
    pub fn new(config: Config, midi: MidiOutputManager, native_releases: bool) -> Self {
        let engine_config = config.engine_config();
        let (key, scale) = config.defaults();
        let event_log = if config.event_log_enabled() {
            EventLog::open()
        } else {
            None
        };
        let mut session = Self {
            config,
            engine_config,
            state: EngineState::with_defaults(key, scale),
            midi,
            display: ScreenDisplay::new(),
            keypad: TerminalKeypad::new(native_releases),
            event_log,
        };
        session.display.set_text(&session.state.key_label());
        session
    }

    /// One scheduler step. Returns true if a reload was requested.
    fn step(&mut self, now: Instant) -> bool {
        let direction_before = self.state.joystick.last_direction;
        let mut effects = Vec::new();
        let result = tick(
            &mut self.keypad,
            &mut self.state,
            &self.engine_config,
            now,
            &mut effects,
        );

        if let Some(log) = self.event_log.as_mut() {
            let mut inputs: Vec<EngineInput> =
                result.key_events.iter().map(|e| EngineInput::Key(*e)).collect();
            // Samples that changed nothing replay identically, so only log the ones that did
            let direction = self.state.joystick.last_direction;
            if direction != direction_before || (direction.is_some() && !effects.is_empty()) {
                let (x, y) = self.keypad.axes();
                inputs.push(EngineInput::Axes { x, y });
            }
            log.log_step(now, &inputs, &effects);
        }

        apply_effects(effects, &self.engine_config, &mut self.midi, &mut self.display)
    }

    /// Re-read configuration and restart the engine from its defaults.
    fn reload(&mut self) {
        self.silence();
        self.config = Config::load();
        self.engine_config = self.config.engine_config();
        let (key, scale) = self.config.defaults();
        self.state = EngineState::with_defaults(key, scale);
        self.midi.set_channel(self.config.midi().channel);
        self.keypad.reset();
        log::info!("reloaded: {}", self.state.key_label());
        self.display.set_text(&self.state.key_label());
    }

    /// Stop whatever is sounding.
    fn silence(&mut self) {
        if let Some(sounding) = self.state.sounding.take() {
            apply_effects(
                [EngineEffect::StopChord(sounding.notes)],
                &self.engine_config,
                &mut self.midi,
                &mut self.display,
            );
        }
    }

    fn draw(&mut self, backend: &mut RatatuiBackend) -> std::io::Result<()> {
        let held = self.keypad.held_keys();
        let view = ScreenView {
            display: self.display.text(),
            state: &self.state,
            config: &self.engine_config,
            held_keys: &held,
            port: self.midi.connected_port_name(),
            channel: self.midi.channel(),
            native_releases: backend.keyboard_enhancement_enabled(),
        };
        backend.draw(|f| draw_screen(f, &view))
    }
}

pub fn run(backend: &mut RatatuiBackend, session: &mut Session) -> std::io::Result<()> {
    let mut last_render = Instant::now();
    let mut needs_redraw = true;

    loop {
        if let Some(app_event) = backend.poll_event(POLL_TIMEOUT) {
            match app_event {
                AppEvent::Resize(_, _) => needs_redraw = true,
                AppEvent::Key(event) => {
                    if event.is_quit() {
                        break;
                    }
                    if !session.keypad.handle_key(&event, Instant::now()) {
                        log::trace!("ignored key {:?}", event.key);
                    }
                }
            }
        }

        let now = Instant::now();
        session.keypad.check_releases(now);
        loop {
            if session.step(now) {
                session.reload();
                needs_redraw = true;
            }
            if session.keypad.pending() == 0 {
                break;
            }
        }

        if session.display.take_dirty() || needs_redraw || last_render.elapsed() >= REDRAW_INTERVAL {
            session.draw(backend)?;
            last_render = Instant::now();
            needs_redraw = false;
        }
    }

    session.silence();
    Ok(())
}
