//! Map stdin lines to terminal keystrokes.
//!
//! The host reads whole lines, so each line becomes a burst of keys:
//! - `^C` on its own is Ctrl+C;
//! - `ESC [ A` / `ESC [ B` (arrow keys) recall history;
//! - a line ending in Tab is completed rather than submitted;
//! - anything else is typed and followed by Enter.

use termfolio_types::input::Key;

/// Keys for one line read from stdin (without its newline).
pub fn keys_for_line(line: &str) -> Vec<Key> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim() == "^C" {
        return vec![Key::Interrupt];
    }

    let mut keys = Vec::with_capacity(line.len() + 1);
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            match chars.next() {
                Some('A') => keys.push(Key::HistoryPrev),
                Some('B') => keys.push(Key::HistoryNext),
                _ => {},
            }
            continue;
        }
        if let Some(key) = Key::from_char(ch) {
            keys.push(key);
        }
    }

    if keys.last().is_none_or(|k| !k.is_tab() && !is_recall(*k)) {
        keys.push(Key::Enter);
    }
    keys
}

fn is_recall(key: Key) -> bool {
    matches!(key, Key::HistoryPrev | Key::HistoryNext)
}
