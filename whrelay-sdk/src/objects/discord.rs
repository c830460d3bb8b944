//! Discord webhook envelope.
//!
//! Only `content`, `embeds[0].title` and `embeds[0].description` carry
//! meaning for whrelay. The remaining embed fields are modelled so that a
//! payload with a wrongly typed field is rejected as malformed, but they are
//! never read.

use serde::{Deserialize, Serialize};

/// A webhook execution body (`POST /api/webhooks/{id}/{token}`).
///
/// `null` and absent fields are equivalent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscordWebhook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<DiscordEmbed>>,
}

/// A rich embed attached to a webhook message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscordEmbed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<DiscordEmbedField>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscordEmbedField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
}

/// The two pieces of text a notification is classified from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headline<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

impl DiscordWebhook {
    /// The embeds of this message, empty when none were sent.
    pub fn embeds(&self) -> &[DiscordEmbed] {
        self.embeds.as_deref().unwrap_or_default()
    }

    /// Normalise the envelope into title and description text.
    ///
    /// With at least one embed, the first embed's title and description are
    /// used. Without embeds, `content` stands in for the title and the
    /// description is empty.
    pub fn headline(&self) -> Headline<'_> {
        match self.embeds().first() {
            Some(embed) => Headline {
                title: embed.title.as_deref().unwrap_or_default(),
                description: embed.description.as_deref().unwrap_or_default(),
            },
            None => Headline {
                title: self.content.as_deref().unwrap_or_default(),
                description: "",
            },
        }
    }
}
