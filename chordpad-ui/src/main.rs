mod runtime;
mod ui;

use std::fs::File;
use std::path::PathBuf;

use chordpad_core::config::Config;
use chordpad_core::event_log;
use chordpad_core::midi::MidiOutputManager;
use chordpad_core::state::EngineState;

use runtime::Session;
use ui::RatatuiBackend;

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("chordpad")
        .join("chordpad.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = File::create(&log_path).unwrap_or_else(|_| {
        File::create("/tmp/chordpad.log").expect("Cannot create log file")
    });

    WriteLogger::init(log_level, simplelog::Config::default(), log_file)
        .expect("Failed to initialize logger");

    log::info!("chordpad starting (log level: {:?})", log_level);
}

struct Args {
    verbose: bool,
    list_ports: bool,
    port: Option<usize>,
    replay: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Args {
    let value_after = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
    };
    Args {
        verbose: args.iter().any(|a| a == "--verbose" || a == "-v"),
        list_ports: args.iter().any(|a| a == "--list-ports"),
        port: value_after("--port").and_then(|s| s.parse().ok()),
        replay: value_after("--replay").map(PathBuf::from),
    }
}

fn connect_midi(midi: &mut MidiOutputManager, config: &Config, port_arg: Option<usize>) {
    let settings = config.midi();
    midi.set_channel(settings.channel);
    midi.refresh_ports();

    let index = match (port_arg, settings.port.as_deref()) {
        (Some(index), _) => Some(index),
        (None, Some(name)) => {
            let found = midi.find_port(name);
            if found.is_none() {
                log::warn!(target: "midi", "no output port matching {:?}", name);
            }
            found
        }
        (None, None) => (!midi.list_ports().is_empty()).then_some(0),
    };
    let Some(index) = index else {
        eprintln!("chordpad: no MIDI output port, notes will be dropped");
        return;
    };
    if let Err(e) = midi.connect(index) {
        log::error!(target: "midi", "connect to port {} failed: {}", index, e);
        eprintln!("chordpad: MIDI connect failed: {}", e);
    }
}

fn replay(path: &std::path::Path, config: &Config) -> std::io::Result<()> {
    let (key, scale) = config.defaults();
    let mut state = EngineState::with_defaults(key, scale);
    match event_log::replay(path, (key, scale), &mut state, &config.engine_config()) {
        Ok(effects) => {
            println!("{} effects replayed", effects.len());
            println!("key: {}", state.key_label());
            match &state.sounding {
                Some(sounding) => println!(
                    "sounding: {} {:?}",
                    sounding.notes.name(),
                    sounding.notes.notes()
                ),
                None => println!("sounding: none"),
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("chordpad: replay failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args);
    init_logging(args.verbose);

    let config = Config::load();

    if let Some(path) = &args.replay {
        return replay(path, &config);
    }

    let mut midi = MidiOutputManager::new();
    if args.list_ports {
        midi.refresh_ports();
        for port in midi.list_ports() {
            println!("{}: {}", port.index, port.name);
        }
        return Ok(());
    }
    connect_midi(&mut midi, &config, args.port);

    let mut backend = RatatuiBackend::new()?;
    backend.start()?;

    let mut session = Session::new(config, midi, backend.keyboard_enhancement_enabled());
    let result = runtime::run(&mut backend, &mut session);

    backend.stop()?;
    result
}
