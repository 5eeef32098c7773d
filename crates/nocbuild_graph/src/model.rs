//! Typed entities of the resolved design graph.
//!
//! Every entity the original description declares dynamically is an explicit
//! record here, and the lookup tables are keyed by tagged key types
//! ([`PortRef`], [`ClockKey`]) instead of heterogeneous string tuples, so
//! role checks are exhaustive matches rather than string comparisons.

use crate::errors::ModelError;
use indexmap::IndexMap;
use nocbuild_config::{ClockConfig, DriveRole, IoPortConfig, SignatureCatalog, WireType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The reserved owner name under which the device descriptor is addressed.
pub const DEVICE_NAME: &str = "_device_";

/// Clocks implicitly provided by every device; always present, never
/// required to be connected.
pub const IMPLICIT_DEVICE_CLOCKS: [&str; 2] = ["rfnoc_ctrl", "rfnoc_chdr"];

/// The data-flow direction of a wire or data port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireDirection {
    /// Into the fabric.
    Input,
    /// Out of the fabric.
    Output,
}

impl fmt::Display for WireDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireDirection::Input => write!(f, "input"),
            WireDirection::Output => write!(f, "output"),
        }
    }
}

/// A fully resolved wire of an expanded io port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    /// The wire name, after any rename rule was applied.
    pub name: String,
    /// Width in bits.
    pub width: u32,
    /// Direction derived from the port's drive role and the wire's type.
    pub direction: WireDirection,
}

/// An io port with its concrete wire list.
///
/// The wire list is derived exactly once, from the signature catalog, when
/// the owning descriptor is loaded; it is immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoPort {
    /// The signature type this port was expanded from.
    pub signature_type: String,
    /// The drive role determining legal pairing.
    pub drive: DriveRole,
    /// The ordered, resolved wire list.
    pub wires: Vec<Wire>,
}

impl IoPort {
    /// Expands an io port declaration into its concrete wire list.
    ///
    /// Wire direction follows the fixed lookup: a master inputs
    /// `from-master` wires and outputs `to-master` wires, a slave is the
    /// mirror image, broadcasters input and listeners output untyped wires.
    /// Rename rules replace the first occurrence of the pattern in each
    /// wire name (literal substring; none of the shipped descriptors need
    /// more than a prefix swap).
    pub fn expand(
        name: &str,
        config: &IoPortConfig,
        catalog: &SignatureCatalog,
    ) -> Result<Self, ModelError> {
        let group = catalog.get(&config.signature_type).ok_or_else(|| {
            ModelError::UnknownSignatureType {
                io_port: name.to_string(),
                signature_type: config.signature_type.clone(),
            }
        })?;

        let mut wires = Vec::with_capacity(group.ports.len());
        for signature in &group.ports {
            let direction = match (config.drive, signature.wire_type) {
                (DriveRole::Master, Some(WireType::FromMaster)) => WireDirection::Input,
                (DriveRole::Master, Some(WireType::ToMaster)) => WireDirection::Output,
                (DriveRole::Slave, Some(WireType::FromMaster)) => WireDirection::Output,
                (DriveRole::Slave, Some(WireType::ToMaster)) => WireDirection::Input,
                (DriveRole::Broadcaster, None) => WireDirection::Input,
                (DriveRole::Listener, None) => WireDirection::Output,
                (drive, wire_type) => {
                    return Err(ModelError::InvalidWireDirection {
                        io_port: name.to_string(),
                        wire: signature.name.clone(),
                        drive,
                        wire_type,
                    })
                }
            };

            let mut wire_name = signature.name.clone();
            if let Some(rename) = &config.rename {
                if let Some(pos) = wire_name.find(&rename.pattern) {
                    wire_name.replace_range(pos..pos + rename.pattern.len(), &rename.repl);
                }
            }

            wires.push(Wire {
                name: wire_name,
                width: signature.width,
                direction,
            });
        }

        Ok(Self {
            signature_type: config.signature_type.clone(),
            drive: config.drive,
            wires,
        })
    }
}

/// The role under which a port is addressable.
///
/// Data ports carry `Input`/`Output`; io ports carry their drive role.
/// Connection classification is a membership test on `(owner, port, role)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortRole {
    /// Data input port.
    Input,
    /// Data output port.
    Output,
    /// Io port driven as master.
    Master,
    /// Io port driven as slave.
    Slave,
    /// Io port driven as broadcaster.
    Broadcaster,
    /// Io port driven as listener.
    Listener,
}

impl From<DriveRole> for PortRole {
    fn from(drive: DriveRole) -> Self {
        match drive {
            DriveRole::Master => PortRole::Master,
            DriveRole::Slave => PortRole::Slave,
            DriveRole::Broadcaster => PortRole::Broadcaster,
            DriveRole::Listener => PortRole::Listener,
        }
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PortRole::Input => "input",
            PortRole::Output => "output",
            PortRole::Master => "master",
            PortRole::Slave => "slave",
            PortRole::Broadcaster => "broadcaster",
            PortRole::Listener => "listener",
        };
        write!(f, "{s}")
    }
}

/// A fully qualified port reference: owner, port name, and role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    /// The owning block/endpoint instance name, or `_device_`.
    pub owner: String,
    /// The port name.
    pub port: String,
    /// The role this port is addressable under.
    pub role: PortRole,
}

impl PortRef {
    /// Creates a new port reference.
    pub fn new(owner: impl Into<String>, port: impl Into<String>, role: PortRole) -> Self {
        Self {
            owner: owner.into(),
            port: port.into(),
            role,
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.owner, self.port, self.role)
    }
}

/// A fully qualified clock reference: owner and clock name.
///
/// Clock-domain connections are symmetric name lookups, so no role is
/// attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockKey {
    /// The owning block/endpoint instance name, or `_device_`.
    pub owner: String,
    /// The clock name.
    pub clock: String,
}

impl ClockKey {
    /// Creates a new clock reference.
    pub fn new(owner: impl Into<String>, clock: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            clock: clock.into(),
        }
    }
}

impl fmt::Display for ClockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner, self.clock)
    }
}

/// A declared clock with its nominal frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockEntry {
    /// The clock name.
    pub name: String,
    /// The nominal frequency, carried opaquely for code generation.
    pub freq: Option<serde_yaml::Value>,
}

impl From<&ClockConfig> for ClockEntry {
    fn from(config: &ClockConfig) -> Self {
        Self {
            name: config.name.clone(),
            freq: config.freq.clone(),
        }
    }
}

/// A data port recorded on a block descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDesc {
    /// The stable per-descriptor routing port index.
    pub index: u32,
}

/// A reusable block type with expanded io ports and indexed data ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDescriptor {
    /// Declared input data ports with their routing indices.
    pub inputs: IndexMap<String, PortDesc>,
    /// Declared output data ports with their routing indices.
    pub outputs: IndexMap<String, PortDesc>,
    /// Io ports with derived wire lists.
    pub io_ports: IndexMap<String, IoPort>,
    /// Declared clocks.
    pub clocks: Vec<ClockEntry>,
    /// Declared parameters and their default values.
    pub parameters: IndexMap<String, serde_yaml::Value>,
}

impl BlockDescriptor {
    /// Builds a descriptor from its configuration record.
    ///
    /// Ports without an explicit index are numbered in declaration order;
    /// io ports are expanded against the signature catalog exactly once.
    pub fn from_config(
        config: &nocbuild_config::BlockDescriptorConfig,
        catalog: &SignatureCatalog,
    ) -> Result<Self, ModelError> {
        let number = |ports: &IndexMap<String, nocbuild_config::PortConfig>| {
            ports
                .iter()
                .enumerate()
                .map(|(i, (name, port))| {
                    let index = port.index.unwrap_or(i as u32);
                    (name.clone(), PortDesc { index })
                })
                .collect()
        };

        let mut io_ports = IndexMap::new();
        for (name, io_port) in &config.io_ports {
            io_ports.insert(name.clone(), IoPort::expand(name, io_port, catalog)?);
        }

        Ok(Self {
            inputs: number(&config.inputs),
            outputs: number(&config.outputs),
            io_ports,
            clocks: config.clocks.iter().map(ClockEntry::from).collect(),
            parameters: config.parameters.clone(),
        })
    }
}

/// The physical board's descriptor; exactly one per build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Io ports exposed by the board.
    pub io_ports: IndexMap<String, IoPort>,
    /// Clocks provided by the board.
    pub clocks: Vec<ClockEntry>,
    /// Board-level parameters.
    pub parameters: IndexMap<String, serde_yaml::Value>,
}

impl DeviceDescriptor {
    /// Builds the device descriptor from its configuration record.
    pub fn from_config(
        config: &nocbuild_config::DeviceConfig,
        catalog: &SignatureCatalog,
    ) -> Result<Self, ModelError> {
        let mut io_ports = IndexMap::new();
        for (name, io_port) in &config.io_ports {
            io_ports.insert(name.clone(), IoPort::expand(name, io_port, catalog)?);
        }
        Ok(Self {
            io_ports,
            clocks: config.clocks.iter().map(ClockEntry::from).collect(),
            parameters: config.parameters.clone(),
        })
    }
}

/// A stream-endpoint instance with its assigned node index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEndpoint {
    /// The instance name.
    pub name: String,
    /// The assigned node index (`1..=N`, declaration order).
    pub index: u16,
    /// Whether the endpoint carries control traffic.
    pub ctrl: bool,
    /// Whether the endpoint carries data traffic.
    pub data: bool,
    /// Ingress buffer size in CHDR words.
    pub buff_size: u32,
    /// Number of data input ports (`in0..`).
    pub num_data_i: u32,
    /// Number of data output ports (`out0..`).
    pub num_data_o: u32,
}

/// A block instance with its assigned node index and merged parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockInstance {
    /// The instance name.
    pub name: String,
    /// The descriptor file key this instance was built from.
    pub desc: String,
    /// The assigned node index (`N+1..=N+M`, declaration order).
    pub index: u16,
    /// Parameters after merging instance overrides onto descriptor defaults.
    pub parameters: IndexMap<String, serde_yaml::Value>,
}

/// A directed connection request between two named port references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// The source owner name.
    pub srcblk: String,
    /// The source port name.
    pub srcport: String,
    /// The destination owner name.
    pub dstblk: String,
    /// The destination port name.
    pub dstport: String,
}

impl From<&nocbuild_config::ConnectionConfig> for Connection {
    fn from(config: &nocbuild_config::ConnectionConfig) -> Self {
        Self {
            srcblk: config.srcblk.clone(),
            srcport: config.srcport.clone(),
            dstblk: config.dstblk.clone(),
            dstport: config.dstport.clone(),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}-{} -> {}-{})",
            self.srcblk, self.srcport, self.dstblk, self.dstport
        )
    }
}

/// A block-port lookup table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPortEntry {
    /// The routing port index within the owning node.
    pub port_index: u32,
}

/// The fully indexed, resolved design graph.
///
/// Constructed once per build by [`build_model`](crate::build::build_model);
/// immutable after the resolution phase completes.
#[derive(Debug, Clone)]
pub struct GraphModel {
    /// Stream endpoints in declaration order, indices `1..=N`.
    pub stream_endpoints: IndexMap<String, StreamEndpoint>,
    /// Block instances in declaration order, indices `N+1..=N+M`.
    pub noc_blocks: IndexMap<String, BlockInstance>,
    /// Block descriptors keyed by descriptor file name.
    pub descriptors: IndexMap<String, BlockDescriptor>,
    /// The device descriptor, addressed as `_device_`.
    pub device: DeviceDescriptor,
    /// Requested data/io connections, in declaration order.
    pub connections: Vec<Connection>,
    /// Requested clock-domain connections, in declaration order.
    pub clk_domains: Vec<Connection>,
    /// Block-port lookup table, including synthesized endpoint ports.
    pub block_ports: HashMap<PortRef, BlockPortEntry>,
    /// Io-port lookup table, including `_device_` entries.
    pub io_ports: HashMap<PortRef, IoPort>,
    /// Clock lookup table, including the implicit device clocks.
    pub clocks: HashMap<ClockKey, ClockEntry>,
}

impl GraphModel {
    /// Returns the node index assigned to the named endpoint or block.
    pub fn node_index(&self, name: &str) -> Option<u16> {
        if let Some(sep) = self.stream_endpoints.get(name) {
            return Some(sep.index);
        }
        self.noc_blocks.get(name).map(|block| block.index)
    }

    /// Returns `true` if `name` is a stream endpoint instance.
    pub fn is_stream_endpoint(&self, name: &str) -> bool {
        self.stream_endpoints.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nocbuild_config::{RenameRule, SignatureGroup, WireSignature};

    fn catalog_with(name: &str, ports: Vec<WireSignature>) -> SignatureCatalog {
        let mut catalog = SignatureCatalog::new();
        catalog.insert(name.to_string(), SignatureGroup { ports });
        catalog
    }

    fn wire(name: &str, width: u32, wire_type: Option<WireType>) -> WireSignature {
        WireSignature {
            name: name.to_string(),
            width,
            wire_type,
        }
    }

    #[test]
    fn master_wire_directions() {
        let catalog = catalog_with(
            "ctrlport",
            vec![
                wire("req_wr", 1, Some(WireType::FromMaster)),
                wire("resp_ack", 1, Some(WireType::ToMaster)),
            ],
        );
        let config = IoPortConfig {
            signature_type: "ctrlport".to_string(),
            drive: DriveRole::Master,
            rename: None,
        };
        let port = IoPort::expand("ctrlport_m", &config, &catalog).unwrap();
        assert_eq!(port.wires[0].direction, WireDirection::Input);
        assert_eq!(port.wires[1].direction, WireDirection::Output);
    }

    #[test]
    fn slave_mirrors_master() {
        let catalog = catalog_with(
            "ctrlport",
            vec![
                wire("req_wr", 1, Some(WireType::FromMaster)),
                wire("resp_ack", 1, Some(WireType::ToMaster)),
            ],
        );
        let config = IoPortConfig {
            signature_type: "ctrlport".to_string(),
            drive: DriveRole::Slave,
            rename: None,
        };
        let port = IoPort::expand("ctrlport_s", &config, &catalog).unwrap();
        assert_eq!(port.wires[0].direction, WireDirection::Output);
        assert_eq!(port.wires[1].direction, WireDirection::Input);
    }

    #[test]
    fn broadcaster_listener_untyped_wires() {
        let catalog = catalog_with("time", vec![wire("radio_time", 64, None)]);
        let bcast = IoPortConfig {
            signature_type: "time".to_string(),
            drive: DriveRole::Broadcaster,
            rename: None,
        };
        let listen = IoPortConfig {
            signature_type: "time".to_string(),
            drive: DriveRole::Listener,
            rename: None,
        };
        let b = IoPort::expand("time_b", &bcast, &catalog).unwrap();
        let l = IoPort::expand("time_l", &listen, &catalog).unwrap();
        assert_eq!(b.wires[0].direction, WireDirection::Input);
        assert_eq!(l.wires[0].direction, WireDirection::Output);
    }

    #[test]
    fn broadcaster_rejects_typed_wire() {
        let catalog = catalog_with("bad", vec![wire("x", 1, Some(WireType::FromMaster))]);
        let config = IoPortConfig {
            signature_type: "bad".to_string(),
            drive: DriveRole::Broadcaster,
            rename: None,
        };
        let err = IoPort::expand("bad_b", &config, &catalog).unwrap_err();
        assert!(matches!(err, ModelError::InvalidWireDirection { .. }));
    }

    #[test]
    fn unknown_signature_type() {
        let catalog = SignatureCatalog::new();
        let config = IoPortConfig {
            signature_type: "nope".to_string(),
            drive: DriveRole::Master,
            rename: None,
        };
        let err = IoPort::expand("p", &config, &catalog).unwrap_err();
        assert!(matches!(err, ModelError::UnknownSignatureType { .. }));
    }

    #[test]
    fn rename_replaces_first_occurrence() {
        let catalog = catalog_with(
            "gpio",
            vec![wire("gpio_out", 32, Some(WireType::FromMaster))],
        );
        let config = IoPortConfig {
            signature_type: "gpio".to_string(),
            drive: DriveRole::Master,
            rename: Some(RenameRule {
                pattern: "gpio_".to_string(),
                repl: "fp_gpio_".to_string(),
            }),
        };
        let port = IoPort::expand("gpio0", &config, &catalog).unwrap();
        assert_eq!(port.wires[0].name, "fp_gpio_out");
    }

    #[test]
    fn port_ref_display() {
        let port = PortRef::new("fir0", "in_0", PortRole::Input);
        assert_eq!(format!("{port}"), "(fir0, in_0, input)");
    }

    #[test]
    fn port_role_from_drive() {
        assert_eq!(PortRole::from(DriveRole::Master), PortRole::Master);
        assert_eq!(PortRole::from(DriveRole::Listener), PortRole::Listener);
    }

    #[test]
    fn clock_key_display() {
        let key = ClockKey::new("_device_", "rfnoc_chdr");
        assert_eq!(format!("{key}"), "_device_:rfnoc_chdr");
    }

    #[test]
    fn connection_display() {
        let con = Connection {
            srcblk: "ep0".to_string(),
            srcport: "out0".to_string(),
            dstblk: "fir0".to_string(),
            dstport: "in_0".to_string(),
        };
        assert_eq!(format!("{con}"), "(ep0-out0 -> fir0-in_0)");
    }
}
