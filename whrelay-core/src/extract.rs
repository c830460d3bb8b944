//! Description field extraction for position events.
//!
//! Position notifications carry a multi-line description such as
//!
//! ```text
//! Pair: ETHUSDT
//! Direction: Short
//! Profit: 12.50
//! Number of Buys: 4
//! ```
//!
//! Fields are located by label; any text may sit between them.

use regex::Regex;
use thiserror::Error;
use whrelay_sdk::objects::EventType;

use crate::classify::parse_number;

const OPEN_DESCRIPTION: &str =
    r"(?s)Pair: ([A-Z][A-Za-z0-9_]+).*?Direction: ([A-Z][A-Za-z0-9_]+)";
const DCA_DESCRIPTION: &str = r"(?s)Pair: ([A-Z][A-Za-z0-9_]+).*?Direction: ([A-Z][A-Za-z0-9_]+).*?Number of Buys: ([0-9]+)";
const CLOSE_DESCRIPTION: &str = r"(?s)Pair: ([A-Z][A-Za-z0-9_]+).*?Direction: ([A-Z][A-Za-z0-9_]+).*?Profit: ([0-9.,]+).*?Number of Buys: ([0-9]+)";

/// The description does not have the shape its event type requires.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("open description invalid")]
    InvalidOpen,
    #[error("dca description invalid")]
    InvalidDca,
    #[error("close description invalid")]
    InvalidClose,
}

/// Fields pulled out of a description. Unset fields stay empty/zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionFields {
    pub pair: String,
    pub direction: String,
    pub number_of_buys: u64,
    pub profit: String,
}

/// Compiled description patterns. Immutable once built.
#[derive(Debug, Clone)]
pub struct DescriptionExtractor {
    open: Regex,
    dca: Regex,
    close: Regex,
}

impl DescriptionExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            open: Regex::new(OPEN_DESCRIPTION)?,
            dca: Regex::new(DCA_DESCRIPTION)?,
            close: Regex::new(CLOSE_DESCRIPTION)?,
        })
    }

    /// Extract the fields `event_type` carries from `description`.
    ///
    /// Lifecycle and isolation events carry none; for them this returns
    /// empty fields and never fails. A buy count past `i64::MAX` reads as
    /// zero.
    pub fn extract(
        &self,
        event_type: EventType,
        description: &str,
    ) -> Result<PositionFields, ExtractError> {
        match event_type {
            EventType::Open => {
                let caps = self
                    .open
                    .captures(description)
                    .ok_or(ExtractError::InvalidOpen)?;
                Ok(PositionFields {
                    pair: caps[1].to_owned(),
                    direction: caps[2].to_owned(),
                    number_of_buys: 1,
                    profit: String::new(),
                })
            }
            EventType::Dca => {
                let caps = self
                    .dca
                    .captures(description)
                    .ok_or(ExtractError::InvalidDca)?;
                Ok(PositionFields {
                    pair: caps[1].to_owned(),
                    direction: caps[2].to_owned(),
                    number_of_buys: parse_number(&caps[3]).unwrap_or(0),
                    profit: String::new(),
                })
            }
            EventType::Close => {
                let caps = self
                    .close
                    .captures(description)
                    .ok_or(ExtractError::InvalidClose)?;
                Ok(PositionFields {
                    pair: caps[1].to_owned(),
                    direction: caps[2].to_owned(),
                    number_of_buys: parse_number(&caps[4]).unwrap_or(0),
                    profit: caps[3].to_owned(),
                })
            }
            EventType::IsolationSkip | EventType::BotStarted | EventType::BotStopped => {
                Ok(PositionFields::default())
            }
        }
    }
}
