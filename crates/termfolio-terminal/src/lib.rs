//! Terminal session state machine for the portfolio terminal widget.
//!
//! The session boots with a typed banner, then accepts keystrokes. Submitted
//! lines go through a registry-based interpreter: commands implement the
//! `Command` trait, are registered by name, and return entries for the
//! scrollback plus an optional effect. Every delayed transition is driven by
//! an injectable `Scheduler`.

pub mod animation;
pub mod autocomplete;
pub mod boot;
mod commands;
pub mod history;
mod interpreter;
pub mod persona_commands;
pub mod scheduler;
pub mod scroll;
pub mod scrollback;
mod session;

/// Register all built-in commands (help, clear, echo, exit, history, personas, sudo).
pub use commands::register_builtins;
/// A registry holding every built-in command.
pub use commands::builtin_registry;
/// A single executable command trait.
pub use interpreter::Command;
/// Read-only session view handed to commands.
pub use interpreter::CommandContext;
/// Registry of available commands.
pub use interpreter::CommandRegistry;
/// Entries plus effect produced by dispatch.
pub use interpreter::CommandResult;
/// Side effect requested by a command.
pub use interpreter::Effect;
/// A yes/no question awaiting the next line.
pub use interpreter::PendingConfirmation;
/// Parse and execute one submitted line.
pub use interpreter::dispatch;
/// Timer primitives and the deterministic queue.
pub use scheduler::{Scheduler, TimerQueue};
/// Scrollback output types.
pub use scrollback::{Output, OutputEntry, OutputKind, Scrollback};
/// The session, its phase, and the host callbacks.
pub use session::{Phase, SessionHost, TerminalSession};
