//! Command trait, registry, and dispatch logic.
//!
//! A submitted line is trimmed, split on whitespace, and the first token
//! (lower-cased) names the command. Everything after it is handed to the
//! command as one raw argument string. While a confirmation is pending the
//! line is read as a yes/no answer instead.

use std::collections::HashMap;

use termfolio_types::error::{Result, TermfolioError};

use crate::scrollback::Output;

/// Side effect requested by a command, applied by the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Effect {
    /// Nothing beyond printing entries.
    #[default]
    None,
    /// Ask the host router to navigate.
    Navigate(String),
    /// Empty the scrollback.
    ClearScrollback,
    /// Gate a committing effect behind a yes/no prompt.
    StartConfirmation { prompt: String },
    /// Arm the intentional crash.
    Crash,
}

/// Entries to append plus an optional effect.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    pub entries: Vec<Output>,
    pub effect: Effect,
}

impl CommandResult {
    /// Entries only, no effect.
    pub fn output(entries: Vec<Output>) -> Self {
        Self {
            entries,
            effect: Effect::None,
        }
    }

    /// A single entry, no effect.
    pub fn line(entry: Output) -> Self {
        Self::output(vec![entry])
    }

    /// Attach an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }
}

/// A yes/no question waiting for the next submitted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    /// Canonical name of the command that asked.
    pub origin_command: String,
    pub prompt: String,
}

/// Read-only view of the session handed to every command.
pub struct CommandContext<'a> {
    /// The registry the command was dispatched from.
    pub registry: &'a CommandRegistry,
    /// Lines submitted so far this session, oldest first.
    pub history: &'a [String],
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types). Unique and lowercase.
    fn name(&self) -> &str;

    /// Alternative names that dispatch to this command.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// One-line summary for `help`.
    fn summary(&self) -> &str;

    /// Usage string (e.g. "echo \[text\]").
    fn usage(&self) -> &str;

    /// Hidden commands dispatch normally but stay out of `help` and Tab
    /// completion.
    fn hidden(&self) -> bool {
        false
    }

    /// Execute the command with its raw argument string.
    fn execute(&self, args: &str, ctx: &CommandContext<'_>) -> Result<CommandResult>;

    /// Result applied when a confirmation this command started is answered
    /// yes.
    fn on_confirm(&self) -> CommandResult {
        CommandResult::default()
    }
}

/// Registry of available commands, in registration order.
///
/// Built once, then handed to the session by value; nothing mutates it
/// afterwards.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Replaces any existing command with the same name,
    /// keeping its position.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        let existing = self
            .commands
            .iter()
            .position(|c| c.name() == cmd.name());
        match existing {
            Some(i) => self.commands[i] = cmd,
            None => self.commands.push(cmd),
        }
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        // Aliases first so a real command name always wins a collision.
        for (i, cmd) in self.commands.iter().enumerate() {
            for alias in cmd.aliases() {
                self.index.insert(alias.to_string(), i);
            }
        }
        for (i, cmd) in self.commands.iter().enumerate() {
            self.index.insert(cmd.name().to_string(), i);
        }
    }

    /// Look up a command by name or alias.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.index.get(name).map(|&i| self.commands[i].as_ref())
    }

    /// Every command, in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(|c| c.as_ref())
    }

    /// Commands shown in `help` and offered by completion.
    pub fn visible(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands().filter(|c| !c.hidden())
    }

    /// `(name, summary)` of every visible command, in registration order.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        self.visible().map(|c| (c.name(), c.summary())).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// Lower-cased first token.
    pub name: String,
    /// Remainder of the line after the first token, trimmed.
    pub args: &'a str,
}

/// Split a line into command name and raw argument string.
///
/// Returns `None` for a blank line.
pub fn parse(line: &str) -> Option<ParsedLine<'_>> {
    let trimmed = line.trim();
    let name = trimmed.split_whitespace().next()?;
    let args = trimmed[name.len()..].trim();
    Some(ParsedLine {
        name: name.to_lowercase(),
        args,
    })
}

/// Whether an answer to a confirmation prompt means yes.
///
/// Only `y` and `yes` (any case) confirm; anything else declines.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Turn a submitted line into a [`CommandResult`].
///
/// Recording a new confirmation and consuming an answered one both happen
/// here through `pending`.
pub fn dispatch(
    line: &str,
    pending: &mut Option<PendingConfirmation>,
    ctx: &CommandContext<'_>,
) -> CommandResult {
    if let Some(confirmation) = pending.take() {
        return answer_confirmation(line, &confirmation, ctx.registry);
    }

    let Some(parsed) = parse(line) else {
        return CommandResult::default();
    };

    let Some(cmd) = ctx.registry.get(&parsed.name) else {
        log::debug!("Unknown command: {}", parsed.name);
        return CommandResult::line(Output::error(format!(
            "command not found: {}",
            parsed.name
        )));
    };

    match cmd.execute(parsed.args, ctx) {
        Ok(result) => {
            if let Effect::StartConfirmation { prompt } = &result.effect {
                *pending = Some(PendingConfirmation {
                    origin_command: cmd.name().to_string(),
                    prompt: prompt.clone(),
                });
            }
            result
        },
        Err(e) => {
            log::warn!("{} failed: {e}", cmd.name());
            let message = match e {
                TermfolioError::Command(msg) => msg,
                other => other.to_string(),
            };
            CommandResult::line(Output::error(format!("{}: {message}", cmd.name())))
        },
    }
}

fn answer_confirmation(
    answer: &str,
    confirmation: &PendingConfirmation,
    registry: &CommandRegistry,
) -> CommandResult {
    if !is_affirmative(answer) {
        log::debug!("Confirmation for {} declined", confirmation.origin_command);
        return CommandResult::line(Output::info("Cancelled."));
    }
    match registry.get(&confirmation.origin_command) {
        Some(cmd) => cmd.on_confirm(),
        None => CommandResult::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrollback::OutputKind;

    struct EchoCmd;
    impl Command for EchoCmd {
        fn name(&self) -> &str {
            "echo"
        }
        fn summary(&self) -> &str {
            "Print arguments"
        }
        fn usage(&self) -> &str {
            "echo [text...]"
        }
        fn execute(&self, args: &str, _ctx: &CommandContext<'_>) -> Result<CommandResult> {
            Ok(CommandResult::line(Output::echo(args)))
        }
    }

    struct FailCmd;
    impl Command for FailCmd {
        fn name(&self) -> &str {
            "fail"
        }
        fn aliases(&self) -> &[&str] {
            &["f"]
        }
        fn summary(&self) -> &str {
            "Always fails"
        }
        fn usage(&self) -> &str {
            "fail"
        }
        fn execute(&self, _args: &str, _ctx: &CommandContext<'_>) -> Result<CommandResult> {
            Err(TermfolioError::Command("it broke".into()))
        }
    }

    struct AskCmd;
    impl Command for AskCmd {
        fn name(&self) -> &str {
            "ask"
        }
        fn summary(&self) -> &str {
            "Ask first"
        }
        fn usage(&self) -> &str {
            "ask"
        }
        fn hidden(&self) -> bool {
            true
        }
        fn execute(&self, _args: &str, _ctx: &CommandContext<'_>) -> Result<CommandResult> {
            Ok(
                CommandResult::line(Output::info("sure? (y/n)")).with_effect(
                    Effect::StartConfirmation {
                        prompt: "sure? (y/n)".into(),
                    },
                ),
            )
        }
        fn on_confirm(&self) -> CommandResult {
            CommandResult::default().with_effect(Effect::Navigate("/done".into()))
        }
    }

    fn registry() -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd));
        reg.register(Box::new(FailCmd));
        reg.register(Box::new(AskCmd));
        reg
    }

    fn run(
        reg: &CommandRegistry,
        pending: &mut Option<PendingConfirmation>,
        line: &str,
    ) -> CommandResult {
        let ctx = CommandContext {
            registry: reg,
            history: &[],
        };
        dispatch(line, pending, &ctx)
    }

    // -- parse --

    #[test]
    fn parse_name_and_args() {
        let p = parse("  ECHO  hello   world ").unwrap();
        assert_eq!(p.name, "echo");
        assert_eq!(p.args, "hello   world");
    }

    #[test]
    fn parse_no_args() {
        let p = parse("help").unwrap();
        assert_eq!(p.name, "help");
        assert_eq!(p.args, "");
    }

    #[test]
    fn parse_blank_is_none() {
        assert!(parse("").is_none());
        assert!(parse("   \t ").is_none());
    }

    #[test]
    fn parse_tab_separated() {
        let p = parse("echo\thi").unwrap();
        assert_eq!(p.name, "echo");
        assert_eq!(p.args, "hi");
    }

    #[test]
    fn parse_unicode_args() {
        let p = parse("echo héllo wörld").unwrap();
        assert_eq!(p.args, "héllo wörld");
    }

    // -- registry --

    #[test]
    fn register_and_lookup() {
        let reg = registry();
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.get("echo").map(|c| c.name()), Some("echo"));
        assert!(reg.get("missing").is_none());
    }

    #[test]
    fn alias_lookup() {
        let reg = registry();
        assert_eq!(reg.get("f").map(|c| c.name()), Some("fail"));
    }

    #[test]
    fn register_replaces_existing_command_in_place() {
        struct Echo2;
        impl Command for Echo2 {
            fn name(&self) -> &str {
                "echo"
            }
            fn summary(&self) -> &str {
                "Second echo"
            }
            fn usage(&self) -> &str {
                "echo"
            }
            fn execute(&self, _: &str, _: &CommandContext<'_>) -> Result<CommandResult> {
                Ok(CommandResult::line(Output::echo("v2")))
            }
        }
        let mut reg = registry();
        reg.register(Box::new(Echo2));
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.list_commands()[0], ("echo", "Second echo"));
    }

    #[test]
    fn hidden_commands_not_listed() {
        let reg = registry();
        let names: Vec<&str> = reg.list_commands().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["echo", "fail"]);
        assert_eq!(reg.commands().count(), 3);
    }

    #[test]
    fn default_creates_empty_registry() {
        let reg = CommandRegistry::default();
        assert!(reg.is_empty());
    }

    // -- dispatch --

    #[test]
    fn dispatch_executes_command() {
        let reg = registry();
        let mut pending = None;
        let result = run(&reg, &mut pending, "echo hello world");
        assert_eq!(result.entries, vec![Output::echo("hello world")]);
        assert_eq!(result.effect, Effect::None);
    }

    #[test]
    fn dispatch_is_case_insensitive_on_name() {
        let reg = registry();
        let mut pending = None;
        let result = run(&reg, &mut pending, "EcHo Hi");
        assert_eq!(result.entries, vec![Output::echo("Hi")]);
    }

    #[test]
    fn dispatch_unknown_command() {
        let reg = registry();
        let mut pending = None;
        let result = run(&reg, &mut pending, "unknowncommand");
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].kind, OutputKind::Error);
        assert_eq!(
            result.entries[0].content,
            "command not found: unknowncommand"
        );
    }

    #[test]
    fn dispatch_blank_line_is_empty() {
        let reg = registry();
        let mut pending = None;
        assert_eq!(run(&reg, &mut pending, "   "), CommandResult::default());
    }

    #[test]
    fn dispatch_handler_error_becomes_entry() {
        let reg = registry();
        let mut pending = None;
        let result = run(&reg, &mut pending, "f");
        assert_eq!(result.entries, vec![Output::error("fail: it broke")]);
    }

    #[test]
    fn dispatch_records_confirmation() {
        let reg = registry();
        let mut pending = None;
        run(&reg, &mut pending, "ask");
        assert_eq!(
            pending,
            Some(PendingConfirmation {
                origin_command: "ask".into(),
                prompt: "sure? (y/n)".into(),
            })
        );
    }

    #[test]
    fn confirmation_yes_applies_origin_effect() {
        let reg = registry();
        let mut pending = None;
        run(&reg, &mut pending, "ask");
        let result = run(&reg, &mut pending, "  YES ");
        assert_eq!(result.effect, Effect::Navigate("/done".into()));
        assert!(pending.is_none());
    }

    #[test]
    fn confirmation_anything_else_declines() {
        let reg = registry();
        for answer in ["n", "no", "", "yep", "echo hi", "y y"] {
            let mut pending = None;
            run(&reg, &mut pending, "ask");
            let result = run(&reg, &mut pending, answer);
            assert_eq!(result.effect, Effect::None, "answer {answer:?}");
            assert!(pending.is_none());
            assert_eq!(result.entries, vec![Output::info("Cancelled.")]);
        }
    }

    #[test]
    fn answer_is_not_parsed_as_command() {
        let reg = registry();
        let mut pending = None;
        run(&reg, &mut pending, "ask");
        let result = run(&reg, &mut pending, "echo hi");
        assert!(!result.entries.contains(&Output::echo("hi")));
    }

    #[test]
    fn affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y"));
        assert!(is_affirmative("yes"));
        assert!(is_affirmative(" Yes "));
        assert!(!is_affirmative("ye"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative(""));
    }
}
