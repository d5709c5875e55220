//! Platform-agnostic key input for the terminal widget.
//!
//! Every host maps its native keyboard events to [`Key`]. The terminal
//! session never sees raw platform input.

use serde::{Deserialize, Serialize};

/// A single keystroke delivered to the terminal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Printable character typed.
    Char(char),
    /// Backspace / delete-left.
    Backspace,
    /// Submit the current line.
    Enter,
    /// Request completion of the current line.
    Tab,
    /// Ctrl+C: the universal cancel.
    Interrupt,
    /// Arrow up: recall the previous history entry.
    HistoryPrev,
    /// Arrow down: recall the next history entry.
    HistoryNext,
}

impl Key {
    /// Whether this key is a Tab press.
    pub fn is_tab(self) -> bool {
        matches!(self, Key::Tab)
    }

    /// Map a control character to the key it stands for, if any.
    ///
    /// `'\t'` is Tab, `'\r'`/`'\n'` are Enter, `'\u{3}'` (ETX) is Ctrl+C and
    /// `'\u{7f}'`/`'\u{8}'` are Backspace. Any other non-control character
    /// is passed through as [`Key::Char`].
    pub fn from_char(ch: char) -> Option<Key> {
        match ch {
            '\t' => Some(Key::Tab),
            '\r' | '\n' => Some(Key::Enter),
            '\u{3}' => Some(Key::Interrupt),
            '\u{7f}' | '\u{8}' => Some(Key::Backspace),
            c if c.is_control() => None,
            c => Some(Key::Char(c)),
        }
    }
}
