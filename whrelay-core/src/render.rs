//! Keyword rendering.
//!
//! A template is arbitrary text, normally a Discord webhook body, containing
//! placeholder tokens from [`whrelay_sdk::keywords`]. Rendering replaces every
//! occurrence of every token in one left-to-right pass; substituted values
//! are never rescanned.

use regex::{Captures, Regex};
use std::sync::Arc;
use whrelay_sdk::keywords;
use whrelay_sdk::objects::ExtractedEvent;

use crate::templates::{TemplateError, TemplateStore};

/// Renders events through the templates of a [`TemplateStore`].
#[derive(Clone)]
pub struct KeywordRenderer {
    store: Arc<dyn TemplateStore>,
    placeholders: Regex,
}

impl KeywordRenderer {
    pub fn new(store: Arc<dyn TemplateStore>) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = keywords::ALL.iter().map(|k| regex::escape(k)).collect();
        Ok(Self {
            store,
            placeholders: Regex::new(&alternatives.join("|"))?,
        })
    }

    /// Fetch the template for `event` in `style` and fill it in.
    pub fn render(&self, event: &ExtractedEvent, style: &str) -> Result<Vec<u8>, TemplateError> {
        let template = self.store.fetch(style, event.event_type)?;
        Ok(self.substitute(&template, event).into_bytes())
    }

    /// Replace the placeholders of `template` with the fields of `event`.
    pub fn substitute(&self, template: &str, event: &ExtractedEvent) -> String {
        self.placeholders
            .replace_all(template, |caps: &Captures<'_>| keyword_value(&caps[0], event))
            .into_owned()
    }
}

fn keyword_value(keyword: &str, event: &ExtractedEvent) -> String {
    match keyword {
        keywords::PAIR => event.pair.clone(),
        keywords::DIRECTION => event.direction.clone(),
        keywords::POSITION_NUMBER => event.position_number.to_string(),
        keywords::MESSAGE_NUMBER => event.message_number.to_string(),
        keywords::PROFIT => event.profit.clone(),
        keywords::NUMBER_OF_BUYS => event.number_of_buys.to_string(),
        keywords::TYPE => event.event_type.tag().to_owned(),
        keywords::COLOR => event.color.to_string(),
        other => other.to_owned(),
    }
}
