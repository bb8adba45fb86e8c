//! Enumerations shared by the payload families.
//!
//! Every value has exactly one canonical lower-snake-case token. The closed
//! enums reject tokens outside their set; [`DeleteReason`] is extensible and
//! keeps unrecognized tokens so older decoders survive newer peers.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{PayloadError, PayloadResult};

/// Mapping between an enum value and its canonical token
pub trait Token: Sized {
    /// Human readable name of the enumeration, used when no field path is known
    const NAME: &'static str;

    fn as_str(&self) -> &str;

    /// Returns `None` when the token is outside a closed set
    fn from_token(token: &str) -> Option<Self>;
}

fn parse_token<T: Token>(token: &str) -> PayloadResult<T> {
    T::from_token(token).ok_or_else(|| PayloadError::unknown(T::NAME, token))
}

/// Whether an instance should be restarted after events such as a node
/// reboot. Reserved for future use by the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Persistence {
    All,
    Vm,
    Host,
}

/// Firmware used to boot a VM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Firmware {
    /// EFI firmware, e.g. OVMF
    Efi,
    /// Legacy BIOS
    Legacy,
}

/// Kind of resource a requested or estimated line item refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Count of virtual CPUs
    Vcpus,
    /// Memory in MB
    MemMb,
    /// Disk space in MB
    DiskMb,
    /// The command applies to a network node
    NetworkNode,
    /// The command applies to a compute node
    ComputeNode,
}

impl Resource {
    pub fn is_node_type(&self) -> bool {
        matches!(self, Resource::NetworkNode | Resource::ComputeNode)
    }
}

/// Runtime used to launch an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hypervisor {
    /// QEMU/KVM virtual machine
    Qemu,
    /// Docker container
    Docker,
}

/// Why a delete command failed on a node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeleteReason {
    /// The instance does not exist on the node
    NoInstance,
    /// The delete payload could not be decoded
    InvalidPayload,
    /// The delete payload decoded but its data was unusable
    InvalidData,
    /// A reason code this decoder does not know, kept verbatim
    Unknown(String),
}

impl DeleteReason {
    pub fn is_known(&self) -> bool {
        !matches!(self, DeleteReason::Unknown(_))
    }
}

impl Token for Persistence {
    const NAME: &'static str = "persistence";

    fn as_str(&self) -> &str {
        match self {
            Persistence::All => "all",
            Persistence::Vm => "vm",
            Persistence::Host => "host",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "all" => Some(Persistence::All),
            "vm" => Some(Persistence::Vm),
            "host" => Some(Persistence::Host),
            _ => None,
        }
    }
}

impl Token for Firmware {
    const NAME: &'static str = "firmware";

    fn as_str(&self) -> &str {
        match self {
            Firmware::Efi => "efi",
            Firmware::Legacy => "legacy",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "efi" => Some(Firmware::Efi),
            "legacy" => Some(Firmware::Legacy),
            _ => None,
        }
    }
}

impl Token for Resource {
    const NAME: &'static str = "resource";

    fn as_str(&self) -> &str {
        match self {
            Resource::Vcpus => "vcpus",
            Resource::MemMb => "mem_mb",
            Resource::DiskMb => "disk_mb",
            Resource::NetworkNode => "network_node",
            Resource::ComputeNode => "compute_node",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "vcpus" => Some(Resource::Vcpus),
            "mem_mb" => Some(Resource::MemMb),
            "disk_mb" => Some(Resource::DiskMb),
            "network_node" => Some(Resource::NetworkNode),
            "compute_node" => Some(Resource::ComputeNode),
            _ => None,
        }
    }
}

impl Token for Hypervisor {
    const NAME: &'static str = "hypervisor";

    fn as_str(&self) -> &str {
        match self {
            Hypervisor::Qemu => "qemu",
            Hypervisor::Docker => "docker",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "qemu" => Some(Hypervisor::Qemu),
            "docker" => Some(Hypervisor::Docker),
            _ => None,
        }
    }
}

impl Token for DeleteReason {
    const NAME: &'static str = "delete reason";

    fn as_str(&self) -> &str {
        match self {
            DeleteReason::NoInstance => "no_instance",
            DeleteReason::InvalidPayload => "invalid_payload",
            DeleteReason::InvalidData => "invalid_data",
            DeleteReason::Unknown(token) => token,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        let reason = match token {
            "no_instance" => DeleteReason::NoInstance,
            "invalid_payload" => DeleteReason::InvalidPayload,
            "invalid_data" => DeleteReason::InvalidData,
            other => DeleteReason::Unknown(other.to_string()),
        };
        Some(reason)
    }
}

impl Serialize for DeleteReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

macro_rules! token_display_from_str {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = PayloadError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_token(s)
                }
            }
        )+
    };
}

token_display_from_str!(Persistence, Firmware, Resource, Hypervisor, DeleteReason);

#[cfg(test)]
mod tests {
    use super::*;

    fn serialized<T: Serialize>(value: &T) -> String {
        serde_yaml::to_string(value).unwrap().trim_end().to_string()
    }

    #[test]
    fn test_closed_enum_tokens_round_trip() {
        for value in [Persistence::All, Persistence::Vm, Persistence::Host] {
            assert_eq!(value.as_str().parse::<Persistence>().unwrap(), value);
            assert_eq!(serialized(&value), value.as_str());
        }
        for value in [Firmware::Efi, Firmware::Legacy] {
            assert_eq!(value.as_str().parse::<Firmware>().unwrap(), value);
            assert_eq!(serialized(&value), value.as_str());
        }
        for value in [Hypervisor::Qemu, Hypervisor::Docker] {
            assert_eq!(value.as_str().parse::<Hypervisor>().unwrap(), value);
            assert_eq!(serialized(&value), value.as_str());
        }
        for value in [
            Resource::Vcpus,
            Resource::MemMb,
            Resource::DiskMb,
            Resource::NetworkNode,
            Resource::ComputeNode,
        ] {
            assert_eq!(value.as_str().parse::<Resource>().unwrap(), value);
            assert_eq!(serialized(&value), value.as_str());
        }
    }

    #[test]
    fn test_resource_tokens() {
        assert_eq!(Resource::Vcpus.to_string(), "vcpus");
        assert_eq!(Resource::MemMb.to_string(), "mem_mb");
        assert_eq!(Resource::DiskMb.to_string(), "disk_mb");
        assert_eq!(Resource::NetworkNode.to_string(), "network_node");
        assert_eq!(Resource::ComputeNode.to_string(), "compute_node");
    }

    #[test]
    fn test_closed_enum_rejects_unknown_token() {
        let err = "uefi".parse::<Firmware>().unwrap_err();
        assert!(matches!(
            err,
            PayloadError::UnknownEnumValue { ref field, ref token } if field == "firmware" && token == "uefi"
        ));
        assert!("kvm".parse::<Hypervisor>().is_err());
        assert!("VCPUS".parse::<Resource>().is_err());
        assert!("".parse::<Persistence>().is_err());
    }

    #[test]
    fn test_node_type_resources() {
        assert!(Resource::NetworkNode.is_node_type());
        assert!(Resource::ComputeNode.is_node_type());
        assert!(!Resource::Vcpus.is_node_type());
        assert!(!Resource::DiskMb.is_node_type());
    }

    #[test]
    fn test_delete_reason_known_tokens() {
        assert_eq!("no_instance".parse::<DeleteReason>().unwrap(), DeleteReason::NoInstance);
        assert_eq!(
            "invalid_payload".parse::<DeleteReason>().unwrap(),
            DeleteReason::InvalidPayload
        );
        assert_eq!("invalid_data".parse::<DeleteReason>().unwrap(), DeleteReason::InvalidData);
    }

    #[test]
    fn test_delete_reason_keeps_unknown_token() {
        let reason = "instance_locked".parse::<DeleteReason>().unwrap();
        assert_eq!(reason, DeleteReason::Unknown("instance_locked".to_string()));
        assert!(!reason.is_known());
        assert_eq!(reason.to_string(), "instance_locked");
        assert_eq!(serialized(&reason), "instance_locked");
    }
}
