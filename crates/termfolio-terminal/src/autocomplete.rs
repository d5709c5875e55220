//! Tab completion of command names.
//!
//! A single Tab completes a unique match in place. A second consecutive Tab
//! lists every match when the prefix is ambiguous.

use crate::interpreter::CommandRegistry;

/// Which press of a Tab run this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabPress {
    Single,
    Double,
}

/// Remembers whether the previous keystroke was Tab.
#[derive(Debug, Default)]
pub struct TabTracker {
    last_was_tab: bool,
}

impl TabTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a Tab press.
    ///
    /// A Tab right after a Tab is a double press, which also resets the
    /// tracker: three Tabs in a row are single, double, single.
    pub fn press_tab(&mut self) -> TabPress {
        if self.last_was_tab {
            self.last_was_tab = false;
            TabPress::Double
        } else {
            self.last_was_tab = true;
            TabPress::Single
        }
    }

    /// Any non-Tab keystroke.
    pub fn reset(&mut self) {
        self.last_was_tab = false;
    }

    #[cfg(test)]
    fn last_was_tab(&self) -> bool {
        self.last_was_tab
    }
}

/// Outcome of a Tab press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Leave the input buffer alone.
    Unchanged,
    /// Replace the input buffer with this command name.
    Replace(String),
    /// Print these candidates.
    List(Vec<String>),
}

/// Visible command names starting with `prefix`, in registration order.
///
/// Matching is case-sensitive and ignores aliases and hidden commands. An
/// empty prefix matches everything.
pub fn candidates<'r>(prefix: &str, registry: &'r CommandRegistry) -> Vec<&'r str> {
    registry
        .visible()
        .map(|c| c.name())
        .filter(|name| name.starts_with(prefix))
        .collect()
}

/// Resolve a Tab press against the current input.
pub fn complete(input: &str, press: TabPress, registry: &CommandRegistry) -> Completion {
    let matches = candidates(input, registry);
    match press {
        TabPress::Single if !input.is_empty() && matches.len() == 1 => {
            Completion::Replace(matches[0].to_string())
        },
        TabPress::Double if matches.len() >= 2 => {
            Completion::List(matches.into_iter().map(str::to_string).collect())
        },
        _ => Completion::Unchanged,
    }
}
