//! Transport bar widget - shows modes, clock and the keyboard state

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use duo_cv::Bus;

use super::{Keyboard, Snapshot};

fn led(on: bool) -> &'static str {
    if on {
        "●"
    } else {
        "○"
    }
}

/// Render the transport bar
pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    keyboard: &Keyboard,
    clock_running: bool,
) {
    let block = Block::default().title(" duocv ").borders(Borders::ALL);
    let config = &snapshot.config;
    let transport = &snapshot.frame.transport;

    let mode = if config.is_mpe() {
        format!("MPE {}", config.mpe_mode.label())
    } else {
        format!("Poly {}", config.poly_mode.label())
    };
    let division = config
        .clock_division
        .label()
        .map(str::to_string)
        .unwrap_or_else(|| format!("/{}", config.clock_division.0));

    // Format sample rate nicely (e.g., 48000 -> "48.0kHz")
    let sample_rate_khz = snapshot.sample_rate / 1000.0;

    let line = Line::from(vec![
        Span::styled(format!(" {}  ", mode), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!(
                "A:{} B:{}  ",
                config.channels(Bus::A),
                config.channels(Bus::B)
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "Bend +{:.0}/-{:.0}  ",
                config.bend_range_up.0, config.bend_range_down.0
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{} {}  ", if clock_running { "▶" } else { "⏸" }, division),
            Style::default().fg(if clock_running {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::styled(
            format!(
                "CLK {} DIV {} STA {} STP {} CNT {}  ",
                led(transport.clock > 0.0),
                led(transport.clock_divided > 0.0),
                led(transport.start > 0.0),
                led(transport.stop > 0.0),
                led(transport.continue_ > 0.0),
            ),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("Tick {}  ", snapshot.ticks),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "Oct {}  {}  ",
                keyboard.octave,
                if snapshot.pedal { "Sustain" } else { "" }
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz", sample_rate_khz),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
