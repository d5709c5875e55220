//! Built-in commands for the portfolio terminal.

use termfolio_types::error::{Result, TermfolioError};

use crate::interpreter::{Command, CommandContext, CommandRegistry, CommandResult, Effect};
use crate::persona_commands::register_persona_commands;
use crate::scrollback::Output;

/// The only argument string that makes `sudo` crash the terminal.
pub const CRASH_ARGS: &str = "rm -rf /";

/// Prompt shown by `exit` while it waits for an answer.
pub const EXIT_PROMPT: &str = "Are you sure you want to leave? (y/n)";

/// Register all built-in commands into a registry.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(HelpCmd));
    reg.register(Box::new(ClearCmd));
    reg.register(Box::new(EchoCmd));
    reg.register(Box::new(ExitCmd));
    reg.register(Box::new(HistoryCmd));
    register_persona_commands(reg);
    reg.register(Box::new(SudoCmd));
}

/// A registry holding every built-in.
pub fn builtin_registry() -> CommandRegistry {
    let mut reg = CommandRegistry::new();
    register_builtins(&mut reg);
    reg
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn aliases(&self) -> &[&str] {
        &["?"]
    }
    fn summary(&self) -> &str {
        "List available commands"
    }
    fn usage(&self) -> &str {
        "help [command]"
    }
    fn execute(&self, args: &str, ctx: &CommandContext<'_>) -> Result<CommandResult> {
        if let Some(name) = args.split_whitespace().next() {
            let name = name.to_lowercase();
            let cmd = ctx
                .registry
                .get(&name)
                .filter(|c| !c.hidden())
                .ok_or_else(|| TermfolioError::Command(format!("no help for '{name}'")))?;
            let mut lines = vec![
                Output::info(format!("{} - {}", cmd.name(), cmd.summary())),
                Output::info(format!("  Usage: {}", cmd.usage())),
            ];
            if !cmd.aliases().is_empty() {
                lines.push(Output::info(format!(
                    "  Aliases: {}",
                    cmd.aliases().join(", ")
                )));
            }
            return Ok(CommandResult::output(lines));
        }

        let commands = ctx.registry.list_commands();
        let mut lines = Vec::with_capacity(commands.len() + 2);
        lines.push(Output::info(format!("Available commands ({}):", commands.len())));
        for (name, summary) in commands {
            lines.push(Output::info(format!("  {name:10} {summary}")));
        }
        lines.push(Output::info("Type 'help <command>' for details."));
        Ok(CommandResult::output(lines))
    }
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn aliases(&self) -> &[&str] {
        &["cls"]
    }
    fn summary(&self) -> &str {
        "Clear terminal output"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn execute(&self, _args: &str, _ctx: &CommandContext<'_>) -> Result<CommandResult> {
        Ok(CommandResult::default().with_effect(Effect::ClearScrollback))
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn summary(&self) -> &str {
        "Print text"
    }
    fn usage(&self) -> &str {
        "echo [text...]"
    }
    fn execute(&self, args: &str, _ctx: &CommandContext<'_>) -> Result<CommandResult> {
        Ok(CommandResult::line(Output::echo(args)))
    }
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

struct ExitCmd;
impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn aliases(&self) -> &[&str] {
        &["quit"]
    }
    fn summary(&self) -> &str {
        "Leave the terminal and go home"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    fn execute(&self, _args: &str, _ctx: &CommandContext<'_>) -> Result<CommandResult> {
        Ok(
            CommandResult::line(Output::info(EXIT_PROMPT)).with_effect(Effect::StartConfirmation {
                prompt: EXIT_PROMPT.to_string(),
            }),
        )
    }
    fn on_confirm(&self) -> CommandResult {
        CommandResult::line(Output::info("Goodbye!")).with_effect(Effect::Navigate("/".into()))
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

struct HistoryCmd;
impl Command for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }
    fn summary(&self) -> &str {
        "Show commands entered this session"
    }
    fn usage(&self) -> &str {
        "history"
    }
    fn execute(&self, _args: &str, ctx: &CommandContext<'_>) -> Result<CommandResult> {
        if ctx.history.is_empty() {
            return Ok(CommandResult::line(Output::info("(no history)")));
        }
        let lines = ctx
            .history
            .iter()
            .enumerate()
            .map(|(i, entry)| Output::info(format!("  {:4}  {entry}", i + 1)))
            .collect();
        Ok(CommandResult::output(lines))
    }
}

// ---------------------------------------------------------------------------
// sudo
// ---------------------------------------------------------------------------

struct SudoCmd;
impl Command for SudoCmd {
    fn name(&self) -> &str {
        "sudo"
    }
    fn summary(&self) -> &str {
        "Run a command as root"
    }
    fn usage(&self) -> &str {
        "sudo <command>"
    }
    fn hidden(&self) -> bool {
        true
    }
    fn execute(&self, args: &str, _ctx: &CommandContext<'_>) -> Result<CommandResult> {
        let normalized = args.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized == CRASH_ARGS {
            log::warn!("Crash phrase entered");
            return Ok(CommandResult::line(Output::info("Executing...")).with_effect(Effect::Crash));
        }
        Err(TermfolioError::Command(
            "guest is not in the sudoers file. This incident will be reported.".into(),
        ))
    }
}
