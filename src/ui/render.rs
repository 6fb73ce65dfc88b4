// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Render the controller screen.
//!
//! The screen is split into a header with the camera and controller state, a
//! direction pad highlighting the active direction next to the key bindings,
//! and a list of the most recent motion reports.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::{
    controller::{Direction, ExitReason, Lifecycle},
    theme::Theme,
    ui::view::ControllerView,
};

const KEY_HELP: [(&str, &str); 5] = [
    ("W / Up", "tilt up"),
    ("S / Down", "tilt down"),
    ("A / Left", "pan left"),
    ("D / Right", "pan right"),
    ("Esc", "stop and return to menu"),
];

pub(crate) fn draw(f: &mut Frame, view: &ControllerView, theme: &Theme) {
    let outer = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(7), Constraint::Min(0)])
        .split(f.area());

    draw_header(f, outer[0], view, theme);

    let middle = Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([Constraint::Length(21), Constraint::Min(0)])
        .split(outer[1]);

    draw_pad(f, middle[0], view.active, theme);
    draw_help(f, middle[1], theme);
    draw_history(f, outer[2], view, theme);
}

fn status_text(view: &ControllerView) -> String {
    match (&view.lifecycle, &view.exit) {
        (Lifecycle::Idle, _) => "starting".to_string(),
        (Lifecycle::Running, _) => match view.active {
            Some(direction) => format!("moving {}", direction),
            None => "stopped".to_string(),
        },
        (Lifecycle::Stopped, Some(ExitReason::InputFailure(message))) => format!("input failed: {}", message),
        (Lifecycle::Stopped, _) => "exited".to_string(),
    }
}

fn draw_header(f: &mut Frame, area: Rect, view: &ControllerView, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .title(" PTZ controller ")
        .padding(Padding::horizontal(1));

    let mut spans = vec![
        Span::styled(view.camera_label.as_str(), Style::default().add_modifier(Modifier::BOLD)).fg(theme.accent_colour),
        Span::raw("  "),
        Span::raw(status_text(view)),
    ];
    if view.failures > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("{} failed", view.failures), Style::default().fg(theme.error_colour)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn pad_cell(label: &str, direction: Direction, active: Option<Direction>, theme: &Theme) -> Span<'static> {
    let style = if active == Some(direction) {
        Style::default()
            .fg(theme.active_pad_colour)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(theme.muted_colour).bg(theme.idle_pad_colour)
    };
    Span::styled(format!(" {} ", label), style)
}

fn draw_pad(f: &mut Frame, area: Rect, active: Option<Direction>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour));

    let lines = vec![
        Line::from(pad_cell("^", Direction::Up, active, theme)),
        Line::from(vec![
            pad_cell("<", Direction::Left, active, theme),
            Span::raw("   "),
            pad_cell(">", Direction::Right, active, theme),
        ]),
        Line::from(pad_cell("v", Direction::Down, active, theme)),
    ];

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

fn draw_help(f: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .title(" Keys ")
        .padding(Padding::horizontal(1));

    let lines: Vec<Line> = KEY_HELP
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{:<10}", keys), Style::default().fg(theme.accent_colour)),
                Span::raw(*action),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_history(f: &mut Frame, area: Rect, view: &ControllerView, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .title(" Commands ")
        .padding(Padding::horizontal(1));

    let lines: Vec<Line> = view
        .history
        .iter()
        .rev()
        .map(|line| {
            let colour = if line.failed { theme.error_colour } else { theme.ok_colour };
            Line::from(Span::styled(line.text.as_str(), Style::default().fg(colour)))
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::controller::{ControllerEvent, MotionIntent, MotionReport};

    fn screen_text(view: &ControllerView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, view, &Theme::default())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn shows_camera_and_state() {
        let mut view = ControllerView::new("Camera 7 (VIGI C540)");
        view.apply(ControllerEvent::Started);
        view.apply(ControllerEvent::Motion(MotionReport {
            intent: MotionIntent::start(Direction::Right),
            outcome: Ok(()),
            cleanup: false,
        }));

        let text = screen_text(&view);
        assert!(text.contains("Camera 7 (VIGI C540)"));
        assert!(text.contains("moving right"));
        assert!(text.contains("Start(right) ok"));
        assert!(text.contains("pan left"));
    }

    #[test]
    fn status_reports_input_failure() {
        let mut view = ControllerView::new("Camera 1");
        view.apply(ControllerEvent::Exited(ExitReason::InputFailure("no tty".to_string())));
        assert_eq!(status_text(&view), "input failed: no tty");
    }
}
