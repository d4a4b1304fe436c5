//! # Command System
//!
//! Prefixed text command handling for chat messages.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Text commands for contacts and reminders; typed handler errors
//! - 2.1.0: Add modular handler infrastructure (handler trait, context, registry)
//! - 1.0.0: Initial reorganization with modular command structure

pub mod context;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod parse;
pub mod registry;

// Re-export the CommandHandler from the dispatcher module
pub use crate::command_handler::CommandHandler;

// Re-export handler infrastructure
pub use context::CommandContext;
pub use error::{CommandError, CommandResult};
pub use handler::{CommandInvocation, TextCommandHandler};
pub use registry::CommandRegistry;
