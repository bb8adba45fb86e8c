//! Payload schema and YAML codec for the Cumulus control-plane protocol.
//!
//! Payloads are the bodies of the messages exchanged between the cluster
//! scheduler and the compute/network node agents. Framing and transport
//! are handled elsewhere.

pub mod codec;
pub mod command;
pub mod enums;
pub mod error;
pub mod kind;
pub mod notification;
pub mod resources;


pub use codec::Payload;
pub use command::{Restart, RestartCmd, Start, StartCmd};
pub use enums::{DeleteReason, Firmware, Hypervisor, Persistence, Resource, Token};
pub use error::{PayloadError, PayloadResult};
pub use kind::{AnyPayload, PayloadKind};
pub use notification::{ErrorDeleteFailure, NodeConnected, NodeConnectedEvent};
pub use resources::{EstimatedResource, NetworkResources, RequestedResource};
