use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use chordpad_core::io::DisplaySink;
use chordpad_core::state::{EngineConfig, EngineState, KeyMap};

use super::keypad::key_char;

/// Text readout standing in for the controller's character display.
#[derive(Debug, Clone, Default)]
pub struct ScreenDisplay {
    text: String,
    dirty: bool,
}

impl ScreenDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True once after each change.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl DisplaySink for ScreenDisplay {
    fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.dirty = true;
        }
    }
}

/// Everything one frame needs.
pub struct ScreenView<'a> {
    pub display: &'a str,
    pub state: &'a EngineState,
    pub config: &'a EngineConfig,
    pub held_keys: &'a [u8],
    pub port: Option<&'a str>,
    /// 0-based output channel.
    pub channel: u8,
    pub native_releases: bool,
}

pub fn draw_screen(frame: &mut Frame, view: &ScreenView) {
    let [display_area, status_area, keypad_area, help_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Min(1),
    ])
    .areas(frame.area());

    let display = Paragraph::new(Span::styled(
        view.display.to_string(),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" chordpad "));
    frame.render_widget(display, display_area);

    frame.render_widget(
        Paragraph::new(status_lines(view))
            .block(Block::default().borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)),
        status_area,
    );
    draw_keypad(frame, keypad_area, &view.config.keymap, view.held_keys);

    let release_hint = if view.native_releases {
        "releases reported by terminal"
    } else {
        "hold keys to sustain"
    };
    frame.render_widget(
        Paragraph::new(format!("arrows: joystick  esc: quit  ({})", release_hint))
            .style(Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

fn status_lines<'a>(view: &ScreenView<'a>) -> Vec<Line<'a>> {
    let state = view.state;
    let mode = if state.inversion_assign {
        Span::styled(" INV ", Style::default().fg(Color::Black).bg(Color::Yellow))
    } else {
        Span::raw("")
    };
    let stick = state
        .joystick
        .last_direction
        .map(|d| d.name())
        .unwrap_or("centre");
    let inversions = state
        .inversions
        .as_slice()
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    vec![
        Line::from(vec![
            Span::styled(state.key_label(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            mode,
        ]),
        Line::from(format!(
            "inv [{}]  stick {}  midi {} ch {}",
            inversions,
            stick,
            view.port.unwrap_or("(none)"),
            view.channel + 1
        )),
    ]
}

fn draw_keypad(frame: &mut Frame, area: Rect, keymap: &KeyMap, held: &[u8]) {
    let lines: Vec<Line> = keymap
        .slots()
        .chunks(KeyMap::COLUMNS)
        .enumerate()
        .map(|(row, slots)| {
            let spans = slots
                .iter()
                .enumerate()
                .map(|(col, slot)| {
                    let key = (row * KeyMap::COLUMNS + col) as u8;
                    let label = slot.map(|f| f.label()).unwrap_or_else(|| "-".to_string());
                    let style = if held.contains(&key) {
                        Style::default().fg(Color::Black).bg(Color::Cyan)
                    } else {
                        Style::default()
                    };
                    Span::styled(
                        format!(" {} {:<6}", key_char(key).unwrap_or(' '), label),
                        style,
                    )
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" keypad ")),
        area,
    );
}
