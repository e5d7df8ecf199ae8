use buzzbox::shared::NUM_LIGHTS;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

// one cell per indicator, lit ones filled in
pub fn draw_lights(frame: &mut Frame, area: Rect, lit: &[bool; NUM_LIGHTS]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, NUM_LIGHTS as u32); NUM_LIGHTS])
        .split(area);

    for (idx, cell_area) in cols.iter().enumerate() {
        let style = if lit[idx] {
            Style::default().fg(Color::LightRed).bg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .style(style);
        frame.render_widget(block, *cell_area);
    }
}
