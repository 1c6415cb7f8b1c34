//! Terminal front end. Consumes the core's public state and never holds
//! workflow state of its own.

pub mod commands;
pub mod display;
pub mod prompt;
pub mod shell;
