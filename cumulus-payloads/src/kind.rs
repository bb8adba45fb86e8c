use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_yaml::Value;
use tracing::debug;

use crate::codec::{parse_document, Payload};
use crate::command::{Restart, Start};
use crate::error::{PayloadError, PayloadResult};
use crate::notification::{ErrorDeleteFailure, NodeConnected};

/// The payload families of the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Start,
    Restart,
    NodeConnected,
    DeleteFailure,
}

impl PayloadKind {
    pub const ALL: [PayloadKind; 4] = [
        PayloadKind::Start,
        PayloadKind::Restart,
        PayloadKind::NodeConnected,
        PayloadKind::DeleteFailure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Start => "start",
            PayloadKind::Restart => "restart",
            PayloadKind::NodeConnected => "node_connected",
            PayloadKind::DeleteFailure => "delete_failure",
        }
    }

    /// Top-level key of the envelope; delete failures are not enveloped
    pub(crate) fn envelope_key(&self) -> &'static str {
        self.as_str()
    }

    /// Guesses the kind of a parsed document from its top-level keys
    pub fn detect(doc: &Value) -> Option<PayloadKind> {
        let map = doc.as_mapping()?;
        if map.len() == 1 {
            let key = map.keys().next().and_then(Value::as_str)?;
            return match key {
                "start" => Some(PayloadKind::Start),
                "restart" => Some(PayloadKind::Restart),
                "node_connected" => Some(PayloadKind::NodeConnected),
                _ => None,
            };
        }
        if map.contains_key("instance_uuid") && map.contains_key("reason") {
            return Some(PayloadKind::DeleteFailure);
        }
        None
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayloadKind {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PayloadKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PayloadError::unknown("payload kind", s))
    }
}

/// Any decoded payload, for callers that only learn the kind at runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnyPayload {
    Start(Start),
    Restart(Restart),
    NodeConnected(NodeConnected),
    DeleteFailure(ErrorDeleteFailure),
}

impl AnyPayload {
    pub fn decode(kind: PayloadKind, text: &str) -> PayloadResult<Self> {
        let doc = parse_document(text)?;
        Self::from_document(kind, &doc)
    }

    /// Decodes a payload whose kind is inferred from its top-level keys
    pub fn decode_detect(text: &str) -> PayloadResult<Self> {
        let doc = parse_document(text)?;
        let kind = PayloadKind::detect(&doc).ok_or_else(|| {
            PayloadError::MalformedEnvelope("cannot determine payload kind".to_string())
        })?;
        debug!(%kind, "detected payload kind");
        Self::from_document(kind, &doc)
    }

    fn from_document(kind: PayloadKind, doc: &Value) -> PayloadResult<Self> {
        let payload = match kind {
            PayloadKind::Start => AnyPayload::Start(Start::from_document(doc)?),
            PayloadKind::Restart => AnyPayload::Restart(Restart::from_document(doc)?),
            PayloadKind::NodeConnected => {
                AnyPayload::NodeConnected(NodeConnected::from_document(doc)?)
            }
            PayloadKind::DeleteFailure => {
                AnyPayload::DeleteFailure(ErrorDeleteFailure::from_document(doc)?)
            }
        };
        Ok(payload)
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            AnyPayload::Start(_) => PayloadKind::Start,
            AnyPayload::Restart(_) => PayloadKind::Restart,
            AnyPayload::NodeConnected(_) => PayloadKind::NodeConnected,
            AnyPayload::DeleteFailure(_) => PayloadKind::DeleteFailure,
        }
    }

    pub fn encode(&self) -> PayloadResult<String> {
        match self {
            AnyPayload::Start(payload) => payload.encode(),
            AnyPayload::Restart(payload) => payload.encode(),
            AnyPayload::NodeConnected(payload) => payload.encode(),
            AnyPayload::DeleteFailure(payload) => payload.encode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{DeleteReason, Resource};

    #[test]
    fn test_kind_names_round_trip() {
        for kind in PayloadKind::ALL {
            assert_eq!(kind.to_string().parse::<PayloadKind>().unwrap(), kind);
        }
        assert!("stop".parse::<PayloadKind>().is_err());
    }

    #[test]
    fn test_detect_enveloped_kinds() {
        let doc = parse_document("restart:\n  instance_uuid: abc\n").unwrap();
        assert_eq!(PayloadKind::detect(&doc), Some(PayloadKind::Restart));

        let doc = parse_document("node_connected:\n  node_uuid: abc\n").unwrap();
        assert_eq!(PayloadKind::detect(&doc), Some(PayloadKind::NodeConnected));
    }

    #[test]
    fn test_detect_delete_failure() {
        let doc = parse_document("instance_uuid: abc\nreason: no_instance\n").unwrap();
        assert_eq!(PayloadKind::detect(&doc), Some(PayloadKind::DeleteFailure));
    }

    #[test]
    fn test_detect_unknown_document() {
        for text in ["", "stop:\n  instance_uuid: abc\n", "- a\n", "a: 1\nb: 2\n"] {
            let doc = parse_document(text).unwrap();
            assert_eq!(PayloadKind::detect(&doc), None, "{text:?}");
        }
        assert!(matches!(
            AnyPayload::decode_detect("stop: {}\n"),
            Err(PayloadError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_any_payload_decode_and_encode() {
        let failure = ErrorDeleteFailure::new("abc", DeleteReason::NoInstance);
        let text = failure.encode().unwrap();

        let any = AnyPayload::decode(PayloadKind::DeleteFailure, &text).unwrap();
        assert_eq!(any.kind(), PayloadKind::DeleteFailure);
        assert_eq!(any, AnyPayload::DeleteFailure(failure));
        assert_eq!(any.encode().unwrap(), text);
    }

    #[test]
    fn test_any_payload_decode_with_wrong_kind() {
        let text = NodeConnected::new("abc", Resource::NetworkNode).encode().unwrap();
        assert!(AnyPayload::decode(PayloadKind::Start, &text).is_err());
        assert_eq!(
            AnyPayload::decode_detect(&text).unwrap().kind(),
            PayloadKind::NodeConnected
        );
    }
}
