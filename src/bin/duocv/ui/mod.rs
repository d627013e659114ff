//! TUI module for duocv
//!
//! Turns key presses into MIDI and control messages and shows the live CV.

mod bus;
pub mod state;
mod transport;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use tracing::warn;

use duo_cv::{
    config::{BEND_RANGES, CLOCK_DIVISIONS},
    engine::ControlHandle,
    io::midi::CC_SUSTAIN,
    BendRange, Bus, ControlMessage, MidiMessage, MpeMode, PolyMode,
};

pub use state::{Keyboard, Snapshot};

use bus::render_bus;
use transport::render_transport;

/// Tempo of the built-in MIDI clock.
const CLOCK_BPM: f64 = 120.0;
const CLOCKS_PER_QUARTER: f64 = 24.0;

/// UI application state
pub struct UiApp {
    controls: ControlHandle,
    midi_tx: Producer<MidiMessage>,
    snapshot_rx: Consumer<Snapshot>,
    /// Latest report from the audio thread
    current: Snapshot,
    keyboard: Keyboard,
    /// Running built-in clock: when it started and how many ticks went out.
    clock: Option<(Instant, u64)>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        controls: ControlHandle,
        midi_tx: Producer<MidiMessage>,
        snapshot_rx: Consumer<Snapshot>,
        initial: Snapshot,
    ) -> Self {
        Self {
            controls,
            midi_tx,
            snapshot_rx,
            current: initial,
            keyboard: Keyboard::new(),
            clock: None,
            should_quit: false,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_snapshots();
            self.run_clock();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Keep only the latest snapshot
    fn poll_snapshots(&mut self) {
        while let Ok(snapshot) = self.snapshot_rx.pop() {
            self.current = snapshot;
        }
    }

    /// Send the clock ticks that have come due since the last frame.
    fn run_clock(&mut self) {
        let Some((started, sent)) = self.clock else {
            return;
        };
        let per_second = CLOCK_BPM / 60.0 * CLOCKS_PER_QUARTER;
        let due = (started.elapsed().as_secs_f64() * per_second) as u64;
        for _ in sent..due {
            self.send_midi(MidiMessage::clock());
        }
        self.clock = Some((started, due.max(sent)));
    }

    fn send_midi(&mut self, msg: MidiMessage) {
        if self.midi_tx.push(msg).is_err() {
            warn!(?msg, "midi queue full, dropping message");
        }
    }

    fn send_control(&mut self, msg: ControlMessage) {
        if let Err(err) = self.controls.send(msg) {
            warn!(%err, ?msg, "control message dropped");
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyCode) {
        let config = self.current.config;
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(c) if self.keyboard.note_for(c).is_some() => {
                if let Some(note) = self.keyboard.note_for(c) {
                    let msg = self.keyboard.toggle(note, config.is_mpe());
                    self.send_midi(msg);
                }
            }
            KeyCode::Char('z') => self.keyboard.shift_octave(-1),
            KeyCode::Char('x') => self.keyboard.shift_octave(1),
            KeyCode::Char('p') => {
                self.keyboard.pedal = !self.keyboard.pedal;
                let value = if self.keyboard.pedal { 127 } else { 0 };
                self.send_midi(MidiMessage::control_change(0, CC_SUSTAIN, value));
            }
            KeyCode::Char('m') => {
                let mode = next_in(&PolyMode::ALL, config.poly_mode);
                self.send_control(ControlMessage::SetPolyMode(mode));
                self.keyboard.clear();
            }
            KeyCode::Char('n') => {
                let mode = next_in(&MpeMode::ALL, config.mpe_mode);
                self.send_control(ControlMessage::SetMpeMode(mode));
                self.keyboard.clear();
            }
            KeyCode::Char('[') => self.change_channels(Bus::A, -1),
            KeyCode::Char(']') => self.change_channels(Bus::A, 1),
            KeyCode::Char('{') => self.change_channels(Bus::B, -1),
            KeyCode::Char('}') => self.change_channels(Bus::B, 1),
            KeyCode::Char('c') => {
                let divisions = CLOCK_DIVISIONS.map(|(division, _)| division);
                let division = next_in(&divisions, config.clock_division);
                self.send_control(ControlMessage::SetClockDivision(division));
            }
            KeyCode::Char('b') => {
                let range = next_range(config.bend_range_up);
                self.send_control(ControlMessage::SetBendRangeUp(range));
            }
            KeyCode::Char('v') => {
                let range = next_range(config.bend_range_down);
                self.send_control(ControlMessage::SetBendRangeDown(range));
            }
            KeyCode::Char('1') => {
                self.send_midi(MidiMessage::start());
                self.clock = Some((Instant::now(), 0));
            }
            KeyCode::Char('2') => {
                self.send_midi(MidiMessage::stop());
                self.clock = None;
            }
            KeyCode::Char('3') => {
                self.send_midi(MidiMessage::continue_());
                self.clock = Some((Instant::now(), 0));
            }
            KeyCode::Char('.') => self.send_midi(MidiMessage::clock()),
            KeyCode::Char(' ') => {
                self.send_control(ControlMessage::Panic);
                self.keyboard.clear();
            }
            KeyCode::Char('r') => {
                self.send_control(ControlMessage::Reset);
                self.keyboard.clear();
            }
            _ => {}
        }
    }

    fn change_channels(&mut self, bus: Bus, delta: isize) {
        let current = self.current.config.channels(bus);
        let channels = current.saturating_add_signed(delta);
        self.send_control(ControlMessage::SetChannels(bus, channels));
        self.keyboard.clear();
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: transport, buses, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Min(8),    // Bus tables
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        render_transport(
            frame,
            chunks[0],
            &self.current,
            &self.keyboard,
            self.clock.is_some(),
        );

        let buses = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        render_bus(frame, buses[0], Bus::A, &self.current);
        render_bus(frame, buses[1], Bus::B, &self.current);

        let help = Paragraph::new(
            " [a-k] Notes  [Z/X] Octave  [P] Sustain  [M/N] Modes  [[ ]/{ }] Channels  \
             [C] Div  [B/V] Bend  [1/2/3] Start/Stop/Cont  [Space] Panic  [R] Reset  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}

/// The entry after `current` in `options`, wrapping; the first entry when
/// `current` is not offered.
fn next_in<T: Copy + PartialEq>(options: &[T], current: T) -> T {
    let next = options
        .iter()
        .position(|&o| o == current)
        .map_or(0, |i| (i + 1) % options.len());
    options[next]
}

fn next_range(current: BendRange) -> BendRange {
    next_in(&BEND_RANGES, current)
}
