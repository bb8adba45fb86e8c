use serde::Serialize;

use crate::codec::Fields;
use crate::enums::Resource;
use crate::error::PayloadResult;

/// A resource line item inside a start or restart command, e.g. the number
/// of VCPUs or MBs of RAM to assign to an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestedResource {
    #[serde(rename = "type")]
    pub resource_type: Resource,
    /// MB for memory and disk, a count for VCPUs
    pub value: u64,
    pub mandatory: bool,
}

impl RequestedResource {
    pub fn new(resource_type: Resource, value: u64, mandatory: bool) -> Self {
        Self {
            resource_type,
            value,
            mandatory,
        }
    }

    pub(crate) fn read(fields: &Fields<'_>) -> PayloadResult<Self> {
        fields.note_unknown(&["type", "value", "mandatory"]);
        Ok(Self {
            resource_type: fields.required_token("type")?,
            value: fields.uint("value")?,
            mandatory: fields.bool("mandatory")?,
        })
    }
}

/// Advisory resource estimate; reserved for future use by the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimatedResource {
    #[serde(rename = "type")]
    pub resource_type: Resource,
    pub value: u64,
}

impl EstimatedResource {
    pub fn new(resource_type: Resource, value: u64) -> Self {
        Self {
            resource_type,
            value,
        }
    }

    pub(crate) fn read(fields: &Fields<'_>) -> PayloadResult<Self> {
        fields.note_unknown(&["type", "value"]);
        Ok(Self {
            resource_type: fields.required_token("type")?,
            value: fields.uint("value")?,
        })
    }
}

/// Networking attributes assigned to an instance. An empty string means the
/// attribute is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkResources {
    /// MAC address of the instance's VNIC
    pub vnic_mac: String,
    /// Cluster unique UUID of the VNIC
    pub vnic_uuid: String,
    /// UUID of the CNCI. Only set for compute node instances.
    pub concentrator_uuid: String,
    /// IP address of the CNCI. Only set for compute node instances.
    pub concentrator_ip: String,
    pub subnet: String,
    /// Reserved for future use.
    pub subnet_key: String,
    /// Reserved for future use.
    pub subnet_uuid: String,
    pub private_ip: String,
    /// Reserved for future use.
    pub public_ip: bool,
}

impl NetworkResources {
    const FIELDS: &'static [&'static str] = &[
        "vnic_mac",
        "vnic_uuid",
        "concentrator_uuid",
        "concentrator_ip",
        "subnet",
        "subnet_key",
        "subnet_uuid",
        "private_ip",
        "public_ip",
    ];

    pub(crate) fn read(fields: &Fields<'_>) -> PayloadResult<Self> {
        fields.note_unknown(Self::FIELDS);
        Ok(Self {
            vnic_mac: fields.string("vnic_mac")?,
            vnic_uuid: fields.string("vnic_uuid")?,
            concentrator_uuid: fields.string("concentrator_uuid")?,
            concentrator_ip: fields.string("concentrator_ip")?,
            subnet: fields.string("subnet")?,
            subnet_key: fields.string("subnet_key")?,
            subnet_uuid: fields.string("subnet_uuid")?,
            private_ip: fields.string("private_ip")?,
            public_ip: fields.bool("public_ip")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_document;
    use crate::error::PayloadError;

    fn read_with<T>(text: &str, read: fn(&Fields<'_>) -> PayloadResult<T>) -> PayloadResult<T> {
        let doc = parse_document(text).unwrap();
        let fields = Fields::from_value(&doc, "item".to_string()).unwrap();
        read(&fields)
    }

    #[test]
    fn test_requested_resource_mandatory_defaults_to_false() {
        let resource = read_with("type: mem_mb\nvalue: 1024\n", RequestedResource::read).unwrap();
        assert_eq!(resource, RequestedResource::new(Resource::MemMb, 1024, false));
    }

    #[test]
    fn test_requested_resource_requires_type() {
        let err = read_with("value: 2\nmandatory: true\n", RequestedResource::read).unwrap_err();
        assert!(matches!(err, PayloadError::MissingRequiredField(ref f) if f == "item.type"));
    }

    #[test]
    fn test_requested_resource_rejects_negative_value() {
        let err = read_with("type: vcpus\nvalue: -2\n", RequestedResource::read).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidFieldValue { ref field, .. } if field == "item.value"));
    }

    #[test]
    fn test_estimated_resource_rejects_unknown_type() {
        let err = read_with("type: gpus\nvalue: 1\n", EstimatedResource::read).unwrap_err();
        assert!(matches!(err, PayloadError::UnknownEnumValue { ref token, .. } if token == "gpus"));
    }

    #[test]
    fn test_estimated_resource_ignores_mandatory_key() {
        let resource =
            read_with("type: disk_mb\nvalue: 4096\nmandatory: true\n", EstimatedResource::read)
                .unwrap();
        assert_eq!(resource, EstimatedResource::new(Resource::DiskMb, 4096));
    }

    #[test]
    fn test_network_resources_defaults() {
        let net = read_with("", NetworkResources::read).unwrap();
        assert_eq!(net, NetworkResources::default());
        assert!(!net.public_ip);
    }

    #[test]
    fn test_network_resources_partial() {
        let net = read_with(
            "vnic_mac: 02:00:e6:f5:6f:0a\nsubnet: 172.16.0.0/24\nprivate_ip: 172.16.0.2\npublic_ip: true\n",
            NetworkResources::read,
        )
        .unwrap();
        assert_eq!(net.vnic_mac, "02:00:e6:f5:6f:0a");
        assert_eq!(net.subnet, "172.16.0.0/24");
        assert_eq!(net.private_ip, "172.16.0.2");
        assert!(net.public_ip);
        assert_eq!(net.concentrator_uuid, "");
        assert_eq!(net.subnet_uuid, "");
    }

    #[test]
    fn test_requested_resource_serializes_type_key() {
        let yaml = serde_yaml::to_string(&RequestedResource::new(Resource::Vcpus, 2, true)).unwrap();
        assert_eq!(yaml, "type: vcpus\nvalue: 2\nmandatory: true\n");
    }
}
