//! Wire objects shared by the whrelay crates.
//!
//! - [`objects::discord`]: the Discord webhook envelope as sent by the trading bot.
//! - [`objects::event`]: the event record produced by classifying a notification.
//! - [`keywords`]: placeholder tokens understood by message templates.

#![forbid(unsafe_code)]

pub mod keywords;
pub mod objects;
