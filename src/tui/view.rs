use buzzbox::pipeline::catalog::Catalog;
use buzzbox::shared::{DisplayState, DISPLAY_WIDTH};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::lights::draw_lights;

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, catalog: Catalog<'_>, status: &str) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // lcd screen
            Constraint::Length(3), // indicator lights
            Constraint::Length(1), // buzzer
            Constraint::Min(3),    // song list
            Constraint::Length(1), // latest log line
        ])
        .split(area);

    draw_screen(frame, sections[0], state);
    draw_lights(frame, sections[1], &state.lights);
    draw_buzzer(frame, sections[2], state);
    draw_menu(frame, sections[3], state, catalog);
    frame.render_widget(
        Paragraph::new(status.to_string()).style(Style::default().fg(Color::DarkGray)),
        sections[4],
    );
}

fn draw_screen(frame: &mut Frame, area: Rect, state: &DisplayState) {
    // rows are already padded to the lcd width, the box is sized to fit them
    let lcd = Rect {
        width: area.width.min(DISPLAY_WIDTH as u16 + 2),
        ..area
    };
    let lcd_style = Style::default().fg(Color::Black).bg(Color::LightGreen);
    let text: Vec<Line> = state
        .rows
        .iter()
        .map(|row| Line::from(Span::styled(row.clone(), lcd_style)))
        .collect();
    let screen = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("lcd"));
    frame.render_widget(screen, lcd);
}

fn draw_buzzer(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let text = match state.tone_hz {
        Some(hz) => Span::styled(format!("buzzer: {hz} Hz"), Style::default().fg(Color::Yellow)),
        None => Span::styled("buzzer: -", Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(Paragraph::new(Line::from(text)), area);
}

fn draw_menu(frame: &mut Frame, area: Rect, state: &DisplayState, catalog: Catalog<'_>) {
    let mut lines: Vec<Line> = catalog
        .iter()
        .enumerate()
        .map(|(i, song)| {
            let label = format!(" {}  {} ({} bpm)", i + 1, song.title, song.tempo);
            if state.playing == Some(i) {
                Line::from(Span::styled(label, Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)))
            } else {
                Line::from(label)
            }
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(" 1-9 play   s/space stop   q/esc quit"));
    let menu = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("songs"));
    frame.render_widget(menu, area);
}
