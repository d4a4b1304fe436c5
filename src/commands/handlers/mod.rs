//! Per-command handler implementations
//!
//! - **Version**: 3.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 3.0.0: Reminder bot command set (contacts, remind, manage, help)
//! - 1.0.0: Initial extraction from monolithic command_handler.rs

pub mod contacts;
pub mod help;
pub mod manage;
pub mod remind;

use std::sync::Arc;

use super::handler::TextCommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn TextCommandHandler>> {
    vec![
        Arc::new(contacts::ContactsHandler),
        Arc::new(remind::RemindHandler),
        Arc::new(manage::ManageHandler),
        Arc::new(help::HelpHandler),
    ]
}
