//! Scrollback buffer: the ordered log of everything the terminal printed.

/// How an entry is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Text echoed back verbatim (`echo`).
    Echo,
    /// Ordinary informational output.
    Info,
    /// A recovered failure (unknown command, bad argument).
    Error,
    /// Output of an assistant persona command.
    AssistantOutput,
}

/// A line of output produced by a command, before it is stamped into the
/// scrollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub kind: OutputKind,
    pub content: String,
}

impl Output {
    pub fn new(kind: OutputKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn echo(content: impl Into<String>) -> Self {
        Self::new(OutputKind::Echo, content)
    }

    pub fn info(content: impl Into<String>) -> Self {
        Self::new(OutputKind::Info, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(OutputKind::Error, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(OutputKind::AssistantOutput, content)
    }
}

/// One immutable entry in the scrollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    id: u64,
    kind: OutputKind,
    content: String,
    created_at: u64,
    command: Option<String>,
}

impl OutputEntry {
    /// Monotonic id, unique for the lifetime of the session.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Scheduler clock (ms) when the entry was appended.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// The submitted line this entry answers, drawn as a prompt line above
    /// it. Only the first entry of a submission carries it.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Rendered height in rows.
    pub fn height(&self) -> usize {
        let body = self.content.lines().count().max(1);
        body + usize::from(self.command.is_some())
    }
}

/// Append-only buffer of [`OutputEntry`]; only [`clear`](Scrollback::clear)
/// removes entries.
#[derive(Debug, Default)]
pub struct Scrollback {
    entries: Vec<OutputEntry>,
    next_id: u64,
}

impl Scrollback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one submission's worth of output.
    ///
    /// `command` is attached to the first entry. A submission with a command
    /// but no output still gets a blank echo entry so the prompt line shows
    /// up. Returns the number of entries appended.
    pub fn append(&mut self, outputs: Vec<Output>, command: Option<String>, now: u64) -> usize {
        let mut command = command;
        if outputs.is_empty() {
            return match command.take() {
                Some(cmd) => {
                    self.push(Output::echo(""), Some(cmd), now);
                    1
                },
                None => 0,
            };
        }
        let added = outputs.len();
        for output in outputs {
            self.push(output, command.take(), now);
        }
        added
    }

    fn push(&mut self, output: Output, command: Option<String>, now: u64) {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(OutputEntry {
            id,
            kind: output.kind,
            content: output.content,
            created_at: now,
            command,
        });
    }

    /// Drop every entry. Ids keep counting up.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[OutputEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&OutputEntry> {
        self.entries.last()
    }

    /// Total rendered height in rows.
    pub fn line_count(&self) -> usize {
        self.entries.iter().map(OutputEntry::height).sum()
    }

    /// Whether any entry's content contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.content.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_assigns_monotonic_ids() {
        let mut sb = Scrollback::new();
        sb.append(vec![Output::info("a"), Output::info("b")], None, 0);
        sb.append(vec![Output::info("c")], None, 5);
        let ids: Vec<u64> = sb.entries().iter().map(OutputEntry::id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(sb.entries()[2].created_at(), 5);
    }

    #[test]
    fn command_attached_to_first_entry_only() {
        let mut sb = Scrollback::new();
        let added = sb.append(
            vec![Output::info("one"), Output::info("two")],
            Some("help".into()),
            0,
        );
        assert_eq!(added, 2);
        assert_eq!(sb.entries()[0].command(), Some("help"));
        assert_eq!(sb.entries()[1].command(), None);
    }

    #[test]
    fn empty_output_with_command_leaves_prompt_line() {
        let mut sb = Scrollback::new();
        assert_eq!(sb.append(Vec::new(), Some(String::new()), 0), 1);
        assert_eq!(sb.entries()[0].kind(), OutputKind::Echo);
        assert_eq!(sb.entries()[0].content(), "");
        assert_eq!(sb.entries()[0].command(), Some(""));
    }

    #[test]
    fn empty_output_without_command_appends_nothing() {
        let mut sb = Scrollback::new();
        assert_eq!(sb.append(Vec::new(), None, 0), 0);
        assert!(sb.is_empty());
    }

    #[test]
    fn clear_empties_but_ids_continue() {
        let mut sb = Scrollback::new();
        sb.append(vec![Output::info("a"), Output::info("b")], None, 0);
        sb.clear();
        assert!(sb.is_empty());
        sb.append(vec![Output::echo("hi")], None, 0);
        assert_eq!(sb.len(), 1);
        assert_eq!(sb.last().map(OutputEntry::id), Some(2));
    }

    #[test]
    fn heights_count_prompt_and_lines() {
        let mut sb = Scrollback::new();
        sb.append(vec![Output::info("a\nb\nc")], Some("x".into()), 0);
        sb.append(vec![Output::info("")], None, 0);
        assert_eq!(sb.entries()[0].height(), 4);
        assert_eq!(sb.entries()[1].height(), 1);
        assert_eq!(sb.line_count(), 5);
    }

    #[test]
    fn contains_searches_content() {
        let mut sb = Scrollback::new();
        sb.append(vec![Output::error("command not found: x")], None, 0);
        assert!(sb.contains("command not found"));
        assert!(!sb.contains("y/n"));
    }

    #[test]
    fn output_constructors_set_kind() {
        assert_eq!(Output::echo("e").kind, OutputKind::Echo);
        assert_eq!(Output::info("i").kind, OutputKind::Info);
        assert_eq!(Output::error("x").kind, OutputKind::Error);
        assert_eq!(Output::assistant("a").kind, OutputKind::AssistantOutput);
    }
}
