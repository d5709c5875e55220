//! Assistant persona commands: `claude`, `codex`, `gemini`.
//!
//! Each persona supports the same sub-modes. The text for every
//! `(persona, mode)` pair comes from [`persona_payload`], so the command
//! wrapper holds no behaviour of its own.

use termfolio_types::error::{Result, TermfolioError};

use crate::interpreter::{Command, CommandContext, CommandRegistry, CommandResult};
use crate::scrollback::Output;

/// An assistant the terminal can impersonate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Claude,
    Codex,
    Gemini,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Claude, Persona::Codex, Persona::Gemini];

    /// The command name that invokes this persona.
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude",
            Self::Codex => "Codex",
            Self::Gemini => "Gemini",
        }
    }

    fn vendor(self) -> &'static str {
        match self {
            Self::Claude => "Anthropic",
            Self::Codex => "OpenAI",
            Self::Gemini => "Google",
        }
    }

    fn version(self) -> &'static str {
        match self {
            Self::Claude => "1.0.42 (folio build)",
            Self::Codex => "0.9.3 (folio build)",
            Self::Gemini => "2.1.0 (folio build)",
        }
    }

    fn summary(self) -> &'static str {
        match self {
            Self::Claude => "Chat with the Claude persona",
            Self::Codex => "Chat with the Codex persona",
            Self::Gemini => "Chat with the Gemini persona",
        }
    }

    fn about(self) -> &'static str {
        match self {
            Self::Claude => "A careful pair programmer that reads the whole file before it edits.",
            Self::Codex => "A terse code generator that prefers diffs to discussion.",
            Self::Gemini => "A curious generalist with a very long context window.",
        }
    }

    fn philosophy(self) -> [&'static str; 3] {
        match self {
            Self::Claude => [
                "Understand the problem before touching the code.",
                "Small, reviewable changes beat clever ones.",
                "Say what you don't know.",
            ],
            Self::Codex => [
                "Ship the diff.",
                "Tests are documentation you can run.",
                "Delete more than you add.",
            ],
            Self::Gemini => [
                "Read everything, then read it again.",
                "Every answer is a draft.",
                "Many perspectives make a better design.",
            ],
        }
    }
}

/// Which screen a persona command shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonaMode {
    Login,
    Help,
    Version,
    About,
    Philosophy,
}

impl PersonaMode {
    pub const ALL: [PersonaMode; 5] = [
        PersonaMode::Login,
        PersonaMode::Help,
        PersonaMode::Version,
        PersonaMode::About,
        PersonaMode::Philosophy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Help => "help",
            Self::Version => "version",
            Self::About => "about",
            Self::Philosophy => "philosophy",
        }
    }

    /// Parse the first argument token. No argument selects `login`.
    pub fn parse(args: &str) -> Option<Self> {
        let Some(token) = args.split_whitespace().next() else {
            return Some(Self::Login);
        };
        let token = token.to_lowercase();
        Self::ALL.into_iter().find(|m| m.as_str() == token)
    }
}

/// Display lines for one persona screen.
pub fn persona_payload(persona: Persona, mode: PersonaMode) -> Vec<String> {
    let name = persona.display_name();
    let cmd = persona.command_name();
    match mode {
        PersonaMode::Login => vec![
            format!("Connecting to {}...", persona.vendor()),
            format!("Logged in as guest. {name} is ready."),
            format!("Type '{cmd} help' to see what {name} can do."),
        ],
        PersonaMode::Help => {
            let mut lines = vec![format!("Usage: {cmd} [mode]"), "Modes:".to_string()];
            lines.extend(
                PersonaMode::ALL
                    .iter()
                    .map(|m| format!("  {cmd} {}", m.as_str())),
            );
            lines
        },
        PersonaMode::Version => vec![format!("{name} {}", persona.version())],
        PersonaMode::About => vec![
            format!("{name}, by {}.", persona.vendor()),
            persona.about().to_string(),
        ],
        PersonaMode::Philosophy => persona
            .philosophy()
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{}. {line}", i + 1))
            .collect(),
    }
}

/// Register one command per persona, in [`Persona::ALL`] order.
pub fn register_persona_commands(reg: &mut CommandRegistry) {
    for persona in Persona::ALL {
        reg.register(Box::new(PersonaCmd(persona)));
    }
}

// ---------------------------------------------------------------------------
// persona command
// ---------------------------------------------------------------------------

struct PersonaCmd(Persona);
impl Command for PersonaCmd {
    fn name(&self) -> &str {
        self.0.command_name()
    }
    fn summary(&self) -> &str {
        self.0.summary()
    }
    fn usage(&self) -> &str {
        "<persona> [login|help|version|about|philosophy]"
    }
    fn execute(&self, args: &str, _ctx: &CommandContext<'_>) -> Result<CommandResult> {
        let mode = PersonaMode::parse(args).ok_or_else(|| {
            TermfolioError::Command(format!(
                "unknown mode '{}' (try '{} help')",
                args.split_whitespace().next().unwrap_or_default(),
                self.0.command_name()
            ))
        })?;
        let lines = persona_payload(self.0, mode)
            .into_iter()
            .map(Output::assistant)
            .collect();
        Ok(CommandResult::output(lines))
    }
}
