//! Bus table widget - one row of voltages per live channel

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Row, Table},
    Frame,
};

use duo_cv::Bus;

use super::Snapshot;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Note name for a 1V/oct pitch voltage (0V = C4).
fn note_name(volts: f32) -> String {
    let note = (volts * 12.0).round() as i32 + 60;
    let name = NOTE_NAMES[note.rem_euclid(12) as usize];
    format!("{}{}", name, note.div_euclid(12) - 1)
}

/// Render the live channels of one bus
pub fn render_bus(frame: &mut Frame, area: Rect, bus: Bus, snapshot: &Snapshot) {
    let out = snapshot.frame.bus(bus);
    let label = match bus {
        Bus::A => "A",
        Bus::B => "B",
    };

    let rows = (0..out.pitch.channels()).map(|c| {
        let gate = out.gate.voltage(c) > 0.0;
        // The wheels are a single shared channel outside MPE.
        let wheel = |port: &duo_cv::io::PolyPort| {
            if c < port.channels() {
                port.voltage(c)
            } else {
                port.voltage(0)
            }
        };

        Row::new(vec![
            format!("{}{}", label, c + 1),
            note_name(out.pitch.voltage(c)),
            format!("{:+.3}", out.pitch.voltage(c)),
            if gate { "■".into() } else { "·".into() },
            format!("{:.1}", out.velocity.voltage(c)),
            format!("{:.1}", out.aftertouch.voltage(c)),
            format!("{:+.3}", out.bent_pitch.voltage(c)),
            format!("{:+.2}", wheel(&out.pitch_bend)),
            format!("{:.1}", wheel(&out.mod_wheel)),
        ])
        .style(if gate {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        })
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(5),
    ];

    let header = Row::new(["Ch", "Note", "Pitch", "Gate", "Vel", "AT", "Bent", "Bend", "Mod"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let title = format!(" Bus {} ({} ch) ", label, out.pitch.channels());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_names_follow_middle_c() {
        assert_eq!(note_name(0.0), "C4");
        assert_eq!(note_name(1.0), "C5");
        assert_eq!(note_name(-1.0 / 12.0), "B3");
        assert_eq!(note_name(-5.0), "C-1");
    }
}
