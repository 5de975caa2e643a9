//! Frame types and codec

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frame sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientFrame {
    Query { content: String },
}

impl ClientFrame {
    pub fn query(content: impl Into<String>) -> Self {
        ClientFrame::Query {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            ClientFrame::Query { content } => content,
        }
    }

    /// Serialize to the JSON text sent on the wire.
    pub fn encode(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| DomainError::MalformedFrame(e.to_string()))
    }
}

/// Frame received from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    /// Answer to an outstanding query
    Response { content: String },
    /// The service failed to answer a query
    Error { message: String },
}

#[derive(Deserialize)]
struct RawServerFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Value,
}

impl ServerFrame {
    /// Parse one text frame.
    ///
    /// `content` of a response may be structured JSON; it is flattened to
    /// compact JSON text since the core treats it as opaque.
    pub fn decode(text: &str) -> Result<Self, DomainError> {
        let raw: RawServerFrame =
            serde_json::from_str(text).map_err(|e| DomainError::MalformedFrame(e.to_string()))?;

        let content = match raw.content {
            Value::Null => {
                return Err(DomainError::MalformedFrame(format!(
                    "'{}' frame without content",
                    raw.kind
                )));
            }
            Value::String(s) => s,
            other => other.to_string(),
        };

        match raw.kind.as_str() {
            "response" => Ok(ServerFrame::Response { content }),
            "error" => Ok(ServerFrame::Error { message: content }),
            other => Err(DomainError::MalformedFrame(format!(
                "unknown frame type '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_query_frame() {
        let json = ClientFrame::query("Summarize section 2").encode().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "query");
        assert_eq!(value["content"], "Summarize section 2");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_decode_response_frame() {
        let frame = ServerFrame::decode(r#"{"type":"response","content":"Section 2 covers..."}"#)
            .unwrap();
        assert_eq!(
            frame,
            ServerFrame::Response {
                content: "Section 2 covers...".to_string()
            }
        );
    }

    #[test]
    fn test_decode_structured_content_as_json_text() {
        let frame =
            ServerFrame::decode(r#"{"type":"response","content":{"rows":[1,2]}}"#).unwrap();
        assert_eq!(
            frame,
            ServerFrame::Response {
                content: r#"{"rows":[1,2]}"#.to_string()
            }
        );
    }

    #[test]
    fn test_decode_error_frame() {
        let frame = ServerFrame::decode(r#"{"type":"error","content":"index missing"}"#).unwrap();
        assert_eq!(
            frame,
            ServerFrame::Error {
                message: "index missing".to_string()
            }
        );
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        for text in [
            "not json",
            r#"{"content":"no type"}"#,
            r#"{"type":"response"}"#,
            r#"{"type":"response","content":null}"#,
            r#"{"type":"query","content":"echo"}"#,
            r#"{"type":42,"content":"x"}"#,
        ] {
            let err = ServerFrame::decode(text).unwrap_err();
            assert!(err.is_protocol_violation(), "accepted {}", text);
        }
    }
}
