//! Start and restart commands sent by the scheduler to node agents.
//!
//! Each command is a body struct wrapped by a single-key envelope. Decoding
//! fills every absent field with its default; encoding always emits every
//! field, so a consumer can rely on each key being present.

use serde::Serialize;
use serde_yaml::Value;

use crate::codec::{open_envelope, token_or_empty, Fields, Payload};
use crate::enums::{Firmware, Hypervisor, Persistence, Resource};
use crate::error::PayloadResult;
use crate::kind::PayloadKind;
use crate::resources::{EstimatedResource, NetworkResources, RequestedResource};

/// Information needed to create and launch a new instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StartCmd {
    pub tenant_uuid: String,
    /// The only field every valid command carries
    pub instance_uuid: String,
    /// Base image of the instance root filesystem. Used by qemu instances.
    pub image_uuid: String,
    /// Registry name of the base image. Used by docker instances.
    pub docker_image: String,
    #[serde(serialize_with = "token_or_empty")]
    pub fw_type: Option<Firmware>,
    #[serde(serialize_with = "token_or_empty")]
    pub persistence: Option<Persistence>,
    /// Selects whether `image_uuid` or `docker_image` is meaningful
    #[serde(serialize_with = "token_or_empty")]
    pub vm_type: Option<Hypervisor>,
    pub requested_resources: Vec<RequestedResource>,
    pub estimated_resources: Vec<EstimatedResource>,
    pub networking: NetworkResources,
}

impl StartCmd {
    const FIELDS: &'static [&'static str] = &[
        "tenant_uuid",
        "instance_uuid",
        "image_uuid",
        "docker_image",
        "fw_type",
        "persistence",
        "vm_type",
        "requested_resources",
        "estimated_resources",
        "networking",
    ];

    /// First requested line item for `resource`, if any
    pub fn requested(&self, resource: Resource) -> Option<&RequestedResource> {
        self.requested_resources
            .iter()
            .find(|item| item.resource_type == resource)
    }

    fn read(fields: &Fields<'_>) -> PayloadResult<Self> {
        fields.note_unknown(Self::FIELDS);
        Ok(Self {
            tenant_uuid: fields.string("tenant_uuid")?,
            instance_uuid: fields.string("instance_uuid")?,
            image_uuid: fields.string("image_uuid")?,
            docker_image: fields.string("docker_image")?,
            fw_type: fields.token("fw_type")?,
            persistence: fields.token("persistence")?,
            vm_type: fields.token("vm_type")?,
            requested_resources: fields.list("requested_resources", RequestedResource::read)?,
            estimated_resources: fields.list("estimated_resources", EstimatedResource::read)?,
            networking: NetworkResources::read(&fields.nested("networking")?)?,
        })
    }
}

/// START payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Start {
    pub start: StartCmd,
}

impl Start {
    pub fn new(start: StartCmd) -> Self {
        Self { start }
    }
}

impl Payload for Start {
    const KIND: PayloadKind = PayloadKind::Start;

    fn from_document(doc: &Value) -> PayloadResult<Self> {
        let body = open_envelope(doc, Self::KIND.envelope_key())?;
        Ok(Self {
            start: StartCmd::read(&body)?,
        })
    }
}

/// Information needed to restart an instance. Only `instance_uuid` and
/// `workload_agent_uuid` are acted upon; the remaining fields are reserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestartCmd {
    pub tenant_uuid: String,
    pub instance_uuid: String,
    pub image_uuid: String,
    /// Node the instance runs on, used by the scheduler to route the command
    pub workload_agent_uuid: String,
    #[serde(serialize_with = "token_or_empty")]
    pub fw_type: Option<Firmware>,
    #[serde(serialize_with = "token_or_empty")]
    pub persistence: Option<Persistence>,
    pub requested_resources: Vec<RequestedResource>,
    pub estimated_resources: Vec<EstimatedResource>,
    pub networking: NetworkResources,
}

impl RestartCmd {
    const FIELDS: &'static [&'static str] = &[
        "tenant_uuid",
        "instance_uuid",
        "image_uuid",
        "workload_agent_uuid",
        "fw_type",
        "persistence",
        "requested_resources",
        "estimated_resources",
        "networking",
    ];

    fn read(fields: &Fields<'_>) -> PayloadResult<Self> {
        fields.note_unknown(Self::FIELDS);
        Ok(Self {
            tenant_uuid: fields.string("tenant_uuid")?,
            instance_uuid: fields.string("instance_uuid")?,
            image_uuid: fields.string("image_uuid")?,
            workload_agent_uuid: fields.string("workload_agent_uuid")?,
            fw_type: fields.token("fw_type")?,
            persistence: fields.token("persistence")?,
            requested_resources: fields.list("requested_resources", RequestedResource::read)?,
            estimated_resources: fields.list("estimated_resources", EstimatedResource::read)?,
            networking: NetworkResources::read(&fields.nested("networking")?)?,
        })
    }
}

/// RESTART payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Restart {
    pub restart: RestartCmd,
}

impl Restart {
    pub fn new(restart: RestartCmd) -> Self {
        Self { restart }
    }
}

impl Payload for Restart {
    const KIND: PayloadKind = PayloadKind::Restart;

    fn from_document(doc: &Value) -> PayloadResult<Self> {
        let body = open_envelope(doc, Self::KIND.envelope_key())?;
        Ok(Self {
            restart: RestartCmd::read(&body)?,
        })
    }
}
