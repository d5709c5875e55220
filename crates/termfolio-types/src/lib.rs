//! Foundation types for termfolio.
//!
//! This crate contains the platform-agnostic types shared by the terminal
//! session and its hosts: key input events, terminal configuration, the
//! read-only profile statistics snapshot, and error types.

pub mod config;
pub mod error;
pub mod input;
pub mod stats;
