//! In-session input history with Up/Down recall. Never persisted.

/// Submitted lines, oldest first, plus a recall cursor.
#[derive(Debug)]
pub struct InputHistory {
    entries: Vec<String>,
    limit: usize,
    /// Index being shown while recalling; `None` when editing a fresh line.
    cursor: Option<usize>,
    /// The line being typed before recall started.
    draft: String,
}

impl InputHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
            cursor: None,
            draft: String::new(),
        }
    }

    /// Record a submitted line and end any recall in progress.
    ///
    /// Blank lines and repeats of the last entry are not stored.
    pub fn push(&mut self, line: &str) {
        self.cursor = None;
        self.draft.clear();
        let line = line.trim();
        if line.is_empty() || self.limit == 0 {
            return;
        }
        if self.entries.last().is_none_or(|last| last != line) {
            self.entries.push(line.to_string());
            if self.entries.len() > self.limit {
                self.entries.remove(0);
            }
        }
    }

    /// Step back in history. `current` is the line as it is now, kept as the
    /// draft when recall starts. Returns the line to show.
    pub fn older(&mut self, current: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = match self.cursor {
            None => {
                self.draft = current.to_string();
                self.entries.len() - 1
            },
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.cursor = Some(idx);
        Some(&self.entries[idx])
    }

    /// Step forward. Past the newest entry the draft comes back.
    pub fn newer(&mut self) -> Option<&str> {
        let idx = self.cursor?;
        if idx + 1 < self.entries.len() {
            self.cursor = Some(idx + 1);
            Some(&self.entries[idx + 1])
        } else {
            self.cursor = None;
            Some(&self.draft)
        }
    }

    /// Stop recalling without touching the stored lines.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
        self.draft.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}
