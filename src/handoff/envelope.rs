//! The forwarded-request envelope.
//!
//! The trusted peer serializes a description of the HTTP request it
//! accepted — the resource path and an opaque cookie map — as a single
//! JSON object and sends it alongside the connection's descriptor. The
//! envelope is fully determined by the bytes of one receive call; there
//! is no streamed or partial decoding.

use std::collections::HashMap;

use serde::Deserialize;

/// Upper bound on a serialized envelope.
///
/// A single receive reads at most this many bytes. Anything the peer
/// sends beyond the bound is left unread, so an oversized envelope shows
/// up as truncated JSON and fails decoding rather than misparsing.
pub const MAX_ENVELOPE_BYTES: usize = 16 * 1024;

/// Decoded description of a forwarded request.
///
/// Immutable once decoded. The `cookie` map carries opaque
/// authorization/context tokens from the peer; it is passed through to
/// the memory receiver unparsed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForwardedRequest {
    /// Resource path the peer's original client requested.
    #[serde(rename = "uri")]
    pub path: String,

    /// Opaque key/value tokens forwarded from the peer.
    #[serde(default)]
    pub cookie: HashMap<String, String>,
}

impl ForwardedRequest {
    /// Decode an envelope from the bytes of a single receive call.
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_path_and_cookie() {
        let envelope = ForwardedRequest::decode(
            br#"{"uri": "/services/xenops/memory/vm123", "cookie": {"k": "v"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.path, "/services/xenops/memory/vm123");
        assert_eq!(envelope.cookie.get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn missing_cookie_defaults_to_empty() {
        let envelope = ForwardedRequest::decode(br#"{"uri": "/x"}"#).unwrap();
        assert!(envelope.cookie.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let envelope =
            ForwardedRequest::decode(br#"{"uri": "/x", "cookie": {}, "method": "PUT"}"#).unwrap();
        assert_eq!(envelope.path, "/x");
    }

    #[test]
    fn malformed_json_fails() {
        assert!(ForwardedRequest::decode(b"not json at all").is_err());
    }

    #[test]
    fn truncated_json_fails() {
        let full = br#"{"uri": "/services/xenops/memory/vm123", "cookie": {}}"#;
        assert!(ForwardedRequest::decode(&full[..full.len() - 10]).is_err());
    }

    #[test]
    fn missing_uri_fails() {
        assert!(ForwardedRequest::decode(br#"{"cookie": {}}"#).is_err());
    }
}
