//! Terminal notifications sent by node agents. Unlike commands, every field
//! is required and a missing one fails the decode.

use serde::Serialize;
use serde_yaml::Value;

use crate::codec::{open_envelope, Fields, Payload};
use crate::enums::{DeleteReason, Resource};
use crate::error::{PayloadError, PayloadResult};
use crate::kind::PayloadKind;

/// Body of a node connected event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeConnectedEvent {
    pub node_uuid: String,
    /// Either [`Resource::NetworkNode`] or [`Resource::ComputeNode`]
    pub node_type: Resource,
}

/// Announces that a node agent joined the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeConnected {
    #[serde(rename = "node_connected")]
    pub connected: NodeConnectedEvent,
}

impl NodeConnected {
    pub fn new(node_uuid: impl Into<String>, node_type: Resource) -> Self {
        Self {
            connected: NodeConnectedEvent {
                node_uuid: node_uuid.into(),
                node_type,
            },
        }
    }
}

impl Payload for NodeConnected {
    const KIND: PayloadKind = PayloadKind::NodeConnected;

    fn from_document(doc: &Value) -> PayloadResult<Self> {
        let body = open_envelope(doc, Self::KIND.envelope_key())?;
        body.note_unknown(&["node_uuid", "node_type"]);

        let node_uuid = body.required_string("node_uuid")?;
        let node_type: Resource = body.required_token("node_type")?;
        if !node_type.is_node_type() {
            return Err(PayloadError::invalid(
                "node_connected.node_type",
                format!("expected network_node or compute_node, found {node_type}"),
            ));
        }

        Ok(Self {
            connected: NodeConnectedEvent {
                node_uuid,
                node_type,
            },
        })
    }
}

/// Reports that deleting an instance failed on a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDeleteFailure {
    pub instance_uuid: String,
    pub reason: DeleteReason,
}

impl ErrorDeleteFailure {
    pub fn new(instance_uuid: impl Into<String>, reason: DeleteReason) -> Self {
        Self {
            instance_uuid: instance_uuid.into(),
            reason,
        }
    }
}

impl Payload for ErrorDeleteFailure {
    const KIND: PayloadKind = PayloadKind::DeleteFailure;

    fn from_document(doc: &Value) -> PayloadResult<Self> {
        let fields = Fields::from_value(doc, String::new())?;
        fields.note_unknown(&["instance_uuid", "reason"]);

        Ok(Self {
            instance_uuid: fields.required_string("instance_uuid")?,
            reason: fields.required_token("reason")?,
        })
    }
}
