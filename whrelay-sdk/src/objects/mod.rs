pub mod discord;
pub mod event;

pub use discord::{DiscordEmbed, DiscordEmbedField, DiscordWebhook, Headline};
pub use event::{EventType, ExtractedEvent};
