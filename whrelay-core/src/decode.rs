//! Payload decoding.

use thiserror::Error;
use whrelay_sdk::objects::DiscordWebhook;

/// The request body is not a structurally valid webhook envelope.
#[derive(Debug, Error)]
#[error("malformed webhook payload: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Parse a raw request body into a [`DiscordWebhook`].
///
/// Missing `content` or `embeds` are fine; only malformed JSON or wrongly
/// typed fields fail.
pub fn decode(raw: &[u8]) -> Result<DiscordWebhook, DecodeError> {
    Ok(serde_json::from_slice(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_shape() {
        let webhook = decode(br#"{"content":"'42' Bot Started"}"#).unwrap();
        assert_eq!(webhook.content.as_deref(), Some("'42' Bot Started"));
        assert!(webhook.embeds().is_empty());
    }

    #[test]
    fn test_decode_empty_object() {
        let webhook = decode(b"{}").unwrap();
        assert_eq!(webhook.headline().title, "");
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert!(decode(b"{\"content\":").is_err());
        assert!(decode(b"not json").is_err());
        assert!(decode(b"").is_err());
        assert!(decode(b"[1, 2]").is_err());
    }
}
