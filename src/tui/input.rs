use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use buzzbox::shared::InputEvent;

// poll for a key from the terminal and turn it into an input event;
// song numbers are 1-based on the keyboard, 0-based everywhere else
pub fn poll_input(timeout: Duration) -> anyhow::Result<Option<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        return Ok(handle_key(key.code));
    }
    Ok(None)
}

fn handle_key(code: KeyCode) -> Option<InputEvent> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => Some(InputEvent::Quit),
        KeyCode::Char(' ') | KeyCode::Char('s') => Some(InputEvent::Stop),
        KeyCode::Char(c @ '1'..='9') => {
            let n = c.to_digit(10)? as usize;
            Some(InputEvent::SelectSong(n - 1))
        }
        _ => None,
    }
}
