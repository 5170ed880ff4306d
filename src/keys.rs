use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Message};

/// A declarative keybinding map that can be composed and extended.
#[derive(Clone)]
pub struct Keymap {
    bindings: Vec<(KeyCode, KeyModifiers, Message)>,
}

impl Keymap {
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a key binding with no modifiers.
    pub fn bind(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::NONE, message));
        self
    }

    /// Add a key binding with Ctrl modifier.
    pub fn bind_ctrl(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::CONTROL, message));
        self
    }

    /// Look up a message for a key event.
    /// Later bindings take precedence over earlier ones.
    pub fn get(&self, event: &KeyEvent) -> Option<Message> {
        self.bindings
            .iter()
            .rev()
            .find(|(code, mods, _)| *code == event.code && event.modifiers.contains(*mods))
            .map(|(_, _, msg)| msg.clone())
    }

    /// Extend this keymap with another. The other keymap's bindings take precedence.
    pub fn extend(mut self, other: Self) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    /// Find the first key bound to a specific message.
    pub fn find_key(&self, message: &Message) -> Option<(KeyCode, KeyModifiers)> {
        self.bindings
            .iter()
            .find(|(_, _, msg)| msg == message)
            .map(|(code, mods, _)| (*code, *mods))
    }
}

/// Format a key binding for display in help text.
pub fn format_key(code: KeyCode, mods: KeyModifiers) -> String {
    let key_str = match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        _ => "?".to_string(),
    };
    if mods.contains(KeyModifiers::CONTROL) {
        format!("C-{key_str}")
    } else {
        key_str
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// Keybindings that work everywhere except inside the comment form.
pub fn global_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('q'), Message::Quit)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
        .bind(KeyCode::Char('`'), Message::ToggleDebug)
}

/// Keybindings for the help overlay popup.
fn help_overlay_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Esc, Message::ToggleHelp)
        .bind(KeyCode::Char('q'), Message::ToggleHelp)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
}

fn navigation_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('j'), Message::SelectNext)
        .bind(KeyCode::Down, Message::SelectNext)
        .bind(KeyCode::Char('k'), Message::SelectPrev)
        .bind(KeyCode::Up, Message::SelectPrev)
        .bind(KeyCode::Char('g'), Message::SelectFirst)
        .bind(KeyCode::Char('G'), Message::SelectLast)
        .bind(KeyCode::Char('J'), Message::NextComment)
        .bind(KeyCode::Char('K'), Message::PrevComment)
        .bind(KeyCode::Char('n'), Message::NextPage)
        .bind(KeyCode::Char('p'), Message::PrevPage)
}

fn action_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('c'), Message::OpenCommentForm)
        .bind(KeyCode::Char('l'), Message::ToggleLike)
        .bind(KeyCode::Char('d'), Message::DeleteComment)
        .bind(KeyCode::Char('e'), Message::ExpandComments)
        .bind(KeyCode::Char('E'), Message::ExpandLikes)
        .bind(KeyCode::Char('o'), Message::OpenPermalink)
        .bind(KeyCode::Char('r'), Message::PollNow)
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
}

/// Feed view keybindings.
pub fn feed_keymap() -> Keymap {
    navigation_keymap().extend(action_keymap())
}

/// Keybindings while typing a comment. Unbound printable keys become input.
pub fn form_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Enter, Message::SubmitComment)
        .bind(KeyCode::Esc, Message::CancelComment)
        .bind(KeyCode::Backspace, Message::InputBackspace)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
}

pub fn handle_key(key: KeyEvent, app: &App) -> Option<Message> {
    // The comment form swallows everything it doesn't bind
    if app.input_active() {
        if let Some(msg) = form_keymap().get(&key) {
            return Some(msg);
        }
        return match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::InputChar(c))
            }
            _ => None,
        };
    }

    if app.show_help {
        return help_overlay_keymap().get(&key);
    }

    if let Some(msg) = global_keymap().get(&key) {
        return Some(msg);
    }

    feed_keymap().get(&key)
}
