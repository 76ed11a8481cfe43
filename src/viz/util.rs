use std::{io, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

/// Wait up to `timeout` for a key press and return its [`KeyCode`]
pub(super) fn poll_key(timeout: Duration) -> io::Result<Option<KeyCode>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let Event::Key(key) = event::read()? else {
        return Ok(None);
    };
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }
    Ok(Some(key.code))
}
