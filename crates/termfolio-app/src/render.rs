use std::io::{self, Write};

use termfolio_terminal::{OutputEntry, OutputKind, Phase, TerminalSession};

/// ANSI: clear screen and home the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Incremental line renderer: writes only what changed since the last draw.
#[derive(Debug)]
pub struct Renderer {
    /// Repeat submitted lines after the prompt. Off when a real terminal
    /// already shows what the user typed.
    echo_commands: bool,
    banner_bytes: usize,
    header_done: bool,
    first_id: Option<u64>,
    last_id: Option<u64>,
    dirty: bool,
}

impl Renderer {
    pub fn new(echo_commands: bool) -> Self {
        Self {
            echo_commands,
            banner_bytes: 0,
            header_done: false,
            first_id: None,
            last_id: None,
            dirty: false,
        }
    }

    /// Force the prompt to be redrawn on the next frame.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn draw(&mut self, session: &TerminalSession, out: &mut impl Write) -> io::Result<()> {
        let banner = session.banner();
        if banner.len() > self.banner_bytes {
            write!(out, "{}", &banner[self.banner_bytes..])?;
            self.banner_bytes = banner.len();
            out.flush()?;
        }

        if session.content_visible() && !self.header_done {
            writeln!(out)?;
            for line in session.header_lines() {
                writeln!(out, "{line}")?;
            }
            writeln!(out, "{}", session.footer_hint())?;
            self.header_done = true;
            self.dirty = true;
        }

        let entries = session.scrollback().entries();
        let first = entries.first().map(OutputEntry::id);
        if first != self.first_id {
            if self.first_id.is_some() {
                write!(out, "{CLEAR_SCREEN}")?;
            }
            self.first_id = first;
        }

        let last_id = self.last_id;
        for entry in entries
            .iter()
            .filter(|e| last_id.is_none_or(|last| e.id() > last))
        {
            if self.echo_commands
                && let Some(cmd) = entry.command()
            {
                writeln!(out, "{} {cmd}", session.prompt())?;
            }
            write_entry(entry, out)?;
            self.last_id = Some(entry.id());
            self.dirty = true;
        }

        if self.dirty && session.phase() == Phase::Prompt {
            write!(out, "{} {}", session.prompt(), session.input())?;
            out.flush()?;
            self.dirty = false;
        }
        Ok(())
    }
}

fn write_entry(entry: &OutputEntry, out: &mut impl Write) -> io::Result<()> {
    let prefix = match entry.kind() {
        OutputKind::Echo | OutputKind::Info => "",
        OutputKind::Error => "! ",
        OutputKind::AssistantOutput => "> ",
    };
    if entry.content().is_empty() {
        return writeln!(out);
    }
    for line in entry.content().lines() {
        writeln!(out, "{prefix}{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppHost;
    use termfolio_terminal::{TimerQueue, builtin_registry};
    use termfolio_types::config::TerminalConfig;
    use termfolio_types::input::Key;

    fn booted() -> (TerminalSession, AppHost) {
        let mut host = AppHost::default();
        let config = TerminalConfig {
            banner: "hi".into(),
            reduced_motion: true,
            ..TerminalConfig::default()
        };
        let mut s = TerminalSession::new(builtin_registry(), Box::new(TimerQueue::new()), config);
        s.start(&mut host);
        (s, host)
    }

    fn submit(s: &mut TerminalSession, host: &mut AppHost, line: &str) {
        for c in line.chars() {
            s.handle_key(Key::Char(c), host);
        }
        s.handle_key(Key::Enter, host);
    }

    fn frame(r: &mut Renderer, s: &TerminalSession) -> String {
        let mut buf = Vec::new();
        r.draw(s, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn first_frame_has_banner_hint_and_prompt() {
        let (s, _) = booted();
        let mut r = Renderer::new(true);
        let text = frame(&mut r, &s);
        assert!(text.starts_with("hi\n"));
        assert!(text.contains("type 'help'"));
        assert!(text.ends_with("guest@folio:~$ "));
    }

    #[test]
    fn only_new_entries_are_written() {
        let (mut s, mut host) = booted();
        let mut r = Renderer::new(true);
        frame(&mut r, &s);
        submit(&mut s, &mut host, "echo one");
        let text = frame(&mut r, &s);
        assert!(text.contains("guest@folio:~$ echo one\none\n"));
        submit(&mut s, &mut host, "echo two");
        let text = frame(&mut r, &s);
        assert!(!text.contains("one"));
        assert!(text.contains("two"));
        assert_eq!(frame(&mut r, &s), "");
    }

    #[test]
    fn commands_not_echoed_for_tty() {
        let (mut s, mut host) = booted();
        let mut r = Renderer::new(false);
        frame(&mut r, &s);
        submit(&mut s, &mut host, "echo one");
        assert_eq!(frame(&mut r, &s), "one\nguest@folio:~$ ");
    }

    #[test]
    fn errors_and_assistant_lines_are_marked() {
        let (mut s, mut host) = booted();
        let mut r = Renderer::new(false);
        frame(&mut r, &s);
        submit(&mut s, &mut host, "nope");
        assert!(frame(&mut r, &s).starts_with("! command not found: nope"));
        submit(&mut s, &mut host, "codex version");
        assert!(frame(&mut r, &s).starts_with("> Codex"));
    }

    #[test]
    fn clear_wipes_screen() {
        let (mut s, mut host) = booted();
        let mut r = Renderer::new(false);
        submit(&mut s, &mut host, "echo one");
        frame(&mut r, &s);
        submit(&mut s, &mut host, "clear");
        submit(&mut s, &mut host, "echo two");
        let text = frame(&mut r, &s);
        assert!(text.starts_with(CLEAR_SCREEN));
        assert!(text.contains("two"));
    }
}
