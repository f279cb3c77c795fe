//! Daily report delivery.
//!
//! This crate provides:
//! - JSON file storage for the bot credentials
//! - The report message template
//! - Telegram Bot API delivery
//! - The fetch, format and send task run on each trigger

pub mod config;
pub mod notifier;
pub mod report;
pub mod telegram;

pub use config::{ConfigStore, StoreError};
pub use notifier::ReportTask;
pub use report::format_report;
pub use telegram::{MessageSender, TelegramError, TelegramSender};
