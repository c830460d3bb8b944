//! Title classification.
//!
//! The bot writes two kinds of titles:
//!
//! ```text
//! '7' Position #3 Opened          position events (embed title)
//! '42' Bot Started                everything else (plain content)
//! ```
//!
//! Position titles are tried first. Only when they do not match is the
//! title read as plain text and classified by the phrase it contains.

use regex::Regex;
use thiserror::Error;
use whrelay_sdk::objects::EventType;

const POSITION_TITLE: &str = r"'([0-9]+)' ([A-Z][A-Za-z0-9_]+) #([0-9]+) ([A-Z][A-Za-z0-9_]+)";
const PLAIN_TITLE: &str = r"'([0-9]+)'";

/// Plain-title phrases, in priority order.
const PLAIN_PHRASES: [(&str, EventType); 3] = [
    ("Skipped: Isolation Mode", EventType::IsolationSkip),
    ("Bot Started", EventType::BotStarted),
    ("Bot Stopped", EventType::BotStopped),
];

/// Parse a run of ASCII digits the way the bot writes sequence numbers:
/// anything past `i64::MAX` is rejected.
pub(crate) fn parse_number(digits: &str) -> Option<u64> {
    digits
        .parse::<i64>()
        .ok()
        .and_then(|n| u64::try_from(n).ok())
}

/// Errors that can occur while classifying a title.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// A position title whose numbers do not fit in a signed 64-bit integer.
    #[error("numbers not found")]
    NumbersNotFound,

    /// A position title with an unsupported kind/action combination.
    #[error("unknown embed title: {kind} {action}")]
    UnknownEmbedTitle { kind: String, action: String },

    /// No leading `'<digits>'` message number.
    #[error("no plain title match")]
    NoPlainTitleMatch,

    /// A plain title without any known phrase.
    #[error("unknown content title")]
    UnknownContentTitle,
}

/// Result of a successful classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub event_type: EventType,
    pub message_number: u64,
    /// Zero for plain titles.
    pub position_number: u64,
}

/// Compiled title patterns. Immutable once built.
#[derive(Debug, Clone)]
pub struct TitleClassifier {
    position_title: Regex,
    plain_title: Regex,
}

impl TitleClassifier {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            position_title: Regex::new(POSITION_TITLE)?,
            plain_title: Regex::new(PLAIN_TITLE)?,
        })
    }

    /// Decide the event type of a title and pull out its sequence numbers.
    pub fn classify(&self, title: &str) -> Result<Classification, ClassifyError> {
        match self.position_title.captures(title) {
            Some(caps) => classify_position(&caps[1], &caps[2], &caps[3], &caps[4]),
            None => self.classify_plain(title),
        }
    }

    fn classify_plain(&self, title: &str) -> Result<Classification, ClassifyError> {
        let caps = self
            .plain_title
            .captures(title)
            .ok_or(ClassifyError::NoPlainTitleMatch)?;
        let message_number = parse_number(&caps[1]).unwrap_or(0);

        let event_type = PLAIN_PHRASES
            .iter()
            .find(|(phrase, _)| title.contains(phrase))
            .map(|(_, event_type)| *event_type)
            .ok_or(ClassifyError::UnknownContentTitle)?;

        Ok(Classification {
            event_type,
            message_number,
            position_number: 0,
        })
    }
}

fn classify_position(
    message: &str,
    kind: &str,
    position: &str,
    action: &str,
) -> Result<Classification, ClassifyError> {
    let message_number = parse_number(message).ok_or(ClassifyError::NumbersNotFound)?;
    let position_number = parse_number(position).ok_or(ClassifyError::NumbersNotFound)?;

    let event_type = match (kind, action) {
        ("Position", "Opened") => EventType::Open,
        ("DCA", "Opened") => EventType::Dca,
        (_, "Closed") => EventType::Close,
        _ => {
            return Err(ClassifyError::UnknownEmbedTitle {
                kind: kind.to_owned(),
                action: action.to_owned(),
            });
        }
    };

    Ok(Classification {
        event_type,
        message_number,
        position_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> TitleClassifier {
        TitleClassifier::new().unwrap()
    }

    #[test]
    fn test_position_opened() {
        let c = classifier().classify("'7' Position #3 Opened").unwrap();
        assert_eq!(
            c,
            Classification {
                event_type: EventType::Open,
                message_number: 7,
                position_number: 3,
            }
        );
    }

    #[test]
    fn test_dca_opened() {
        let c = classifier().classify("'12' DCA #5 Opened").unwrap();
        assert_eq!(c.event_type, EventType::Dca);
        assert_eq!(c.message_number, 12);
        assert_eq!(c.position_number, 5);
    }

    #[test]
    fn test_closed_ignores_kind() {
        let classifier = classifier();
        for title in [
            "'9' Position #3 Closed",
            "'9' DCA #3 Closed",
            "'9' Trade #3 Closed",
        ] {
            assert_eq!(
                classifier.classify(title).unwrap().event_type,
                EventType::Close,
                "{title}"
            );
        }
    }

    #[test]
    fn test_position_title_found_inside_longer_text() {
        let c = classifier()
            .classify(":green_circle: '100' Position #42 Opened on Binance")
            .unwrap();
        assert_eq!(c.event_type, EventType::Open);
        assert_eq!(c.message_number, 100);
        assert_eq!(c.position_number, 42);
    }

    #[test]
    fn test_unknown_action() {
        let err = classifier().classify("'7' Position #3 Cancelled").unwrap_err();
        assert_eq!(
            err,
            ClassifyError::UnknownEmbedTitle {
                kind: "Position".into(),
                action: "Cancelled".into(),
            }
        );
    }

    #[test]
    fn test_unknown_kind_with_opened() {
        let err = classifier().classify("'7' Grid #3 Opened").unwrap_err();
        assert!(matches!(err, ClassifyError::UnknownEmbedTitle { .. }));
    }

    #[test]
    fn test_overflowing_position_numbers() {
        let err = classifier()
            .classify("'99999999999999999999999' Position #3 Opened")
            .unwrap_err();
        assert_eq!(err, ClassifyError::NumbersNotFound);
    }

    #[test]
    fn test_numbers_limited_to_signed_range() {
        let classifier = classifier();
        let c = classifier
            .classify("'9223372036854775807' Position #9223372036854775807 Opened")
            .unwrap();
        assert_eq!(c.message_number, i64::MAX as u64);
        assert_eq!(c.position_number, i64::MAX as u64);

        assert_eq!(
            classifier
                .classify("'9223372036854775808' Position #3 Opened")
                .unwrap_err(),
            ClassifyError::NumbersNotFound
        );
        assert_eq!(
            classifier
                .classify("'7' Position #18446744073709551615 Opened")
                .unwrap_err(),
            ClassifyError::NumbersNotFound
        );

        let c = classifier
            .classify("'9223372036854775808' Bot Started")
            .unwrap();
        assert_eq!(c.message_number, 0);
    }

    #[test]
    fn test_plain_titles() {
        let classifier = classifier();

        let c = classifier.classify("'42' Bot Started").unwrap();
        assert_eq!(c.event_type, EventType::BotStarted);
        assert_eq!(c.message_number, 42);
        assert_eq!(c.position_number, 0);

        let c = classifier.classify("'43' Bot Stopped").unwrap();
        assert_eq!(c.event_type, EventType::BotStopped);
        assert_eq!(c.message_number, 43);

        let c = classifier
            .classify("'44' Entry Skipped: Isolation Mode (BTCUSDT)")
            .unwrap();
        assert_eq!(c.event_type, EventType::IsolationSkip);
        assert_eq!(c.message_number, 44);
    }

    #[test]
    fn test_plain_phrase_priority() {
        let c = classifier()
            .classify("'5' Bot Stopped, Bot Started, Skipped: Isolation Mode")
            .unwrap();
        assert_eq!(c.event_type, EventType::IsolationSkip);

        let c = classifier()
            .classify("'5' Bot Stopped then Bot Started")
            .unwrap();
        assert_eq!(c.event_type, EventType::BotStarted);
    }

    #[test]
    fn test_plain_title_overflow_reads_as_zero() {
        let c = classifier()
            .classify("'99999999999999999999999' Bot Started")
            .unwrap();
        assert_eq!(c.message_number, 0);
    }

    #[test]
    fn test_plain_title_failures() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify("Bot Started").unwrap_err(),
            ClassifyError::NoPlainTitleMatch
        );
        assert_eq!(
            classifier.classify("").unwrap_err(),
            ClassifyError::NoPlainTitleMatch
        );
        assert_eq!(
            classifier.classify("'42' Hello there").unwrap_err(),
            ClassifyError::UnknownContentTitle
        );
    }
}
