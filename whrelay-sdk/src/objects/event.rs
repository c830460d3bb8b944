//! Trading events recognised in bot notifications.

use serde::{Deserialize, Serialize};

/// Kind of trading event a notification announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// A new position was opened.
    #[serde(rename = "open")]
    Open,
    /// An averaging-down buy was added to an open position.
    #[serde(rename = "dca")]
    Dca,
    /// A position was closed.
    #[serde(rename = "close")]
    Close,
    /// An entry was skipped because isolation mode is active.
    #[serde(rename = "isolation")]
    IsolationSkip,
    #[serde(rename = "start")]
    BotStarted,
    #[serde(rename = "stop")]
    BotStopped,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::Open,
        EventType::Dca,
        EventType::Close,
        EventType::IsolationSkip,
        EventType::BotStarted,
        EventType::BotStopped,
    ];

    /// Short lowercase tag. Doubles as the template name and as the
    /// `${TYPE}` placeholder value.
    pub fn tag(self) -> &'static str {
        match self {
            EventType::Open => "open",
            EventType::Dca => "dca",
            EventType::Close => "close",
            EventType::IsolationSkip => "isolation",
            EventType::BotStarted => "start",
            EventType::BotStopped => "stop",
        }
    }

    /// File name of the template rendering this event, e.g. `open.json`.
    pub fn template_file(self) -> String {
        format!("{}.json", self.tag())
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Structured record of one classified notification.
///
/// Fields that do not apply to `event_type` stay at their zero value:
/// lifecycle and isolation events only carry `message_number`, and `profit`
/// is only set for [`EventType::Close`]. `color` is never extracted and is
/// always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEvent {
    pub event_type: EventType,
    pub message_number: u64,
    pub position_number: u64,
    pub pair: String,
    pub direction: String,
    pub number_of_buys: u64,
    /// Raw decimal text as written by the bot, e.g. `12.50`.
    pub profit: String,
    pub color: u32,
}

impl ExtractedEvent {
    /// An event of the given type with every other field zeroed.
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            message_number: 0,
            position_number: 0,
            pair: String::new(),
            direction: String::new(),
            number_of_buys: 0,
            profit: String::new(),
            color: 0,
        }
    }
}
