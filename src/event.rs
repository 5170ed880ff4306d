use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Resize,
}

impl Event {
    /// Maps a terminal event to an app event. Key releases and repeats
    /// (reported on some platforms) and mouse/focus events are dropped.
    pub fn from_crossterm(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
            CrosstermEvent::Resize(_, _) => Some(Event::Resize),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_only_key_presses_pass() {
        let press = key(KeyEventKind::Press);
        assert_eq!(
            Event::from_crossterm(CrosstermEvent::Key(press)),
            Some(Event::Key(press))
        );
        assert_eq!(
            Event::from_crossterm(CrosstermEvent::Key(key(KeyEventKind::Release))),
            None
        );
    }

    #[test]
    fn test_resize_and_focus() {
        assert_eq!(
            Event::from_crossterm(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize)
        );
        assert_eq!(Event::from_crossterm(CrosstermEvent::FocusGained), None);
    }
}
