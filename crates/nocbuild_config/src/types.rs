//! Configuration types deserialized from the YAML description files.
//!
//! Three file kinds feed a build: the image configuration (`schema:
//! rfnoc_imagebuilder`), per-block descriptor files (`schema:
//! rfnoc_modtool_args`) plus the device descriptor (`<device>_bsp.yml`),
//! and the io-signature catalog (`io_signatures.yml`). Declaration order of
//! stream endpoints, blocks, and ports is significant — it drives index
//! assignment — so ordered maps are used throughout.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Schema identifier required in image configuration files.
pub const IMAGE_SCHEMA: &str = "rfnoc_imagebuilder";
/// Schema identifier required in block descriptor files.
pub const BLOCK_SCHEMA: &str = "rfnoc_modtool_args";

/// The direction of an io-port wire as seen from the master side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WireType {
    /// Driven by the master, received by the slave.
    FromMaster,
    /// Driven by the slave, received by the master.
    ToMaster,
}

/// The drive role of an io port, determining legal pairing and wire direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveRole {
    /// Initiating side of a master/slave pair.
    Master,
    /// Responding side of a master/slave pair.
    Slave,
    /// One-to-many source; all wires are inputs to the fabric.
    Broadcaster,
    /// Receiving side of a broadcast; all wires are outputs.
    Listener,
}

impl std::fmt::Display for DriveRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriveRole::Master => write!(f, "master"),
            DriveRole::Slave => write!(f, "slave"),
            DriveRole::Broadcaster => write!(f, "broadcaster"),
            DriveRole::Listener => write!(f, "listener"),
        }
    }
}

/// One wire definition inside a signature-type group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireSignature {
    /// The wire name as declared in the catalog.
    pub name: String,
    /// The wire width in bits.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Direction from the master side; `None` for broadcast-style wires.
    #[serde(rename = "type", default)]
    pub wire_type: Option<WireType>,
}

fn default_width() -> u32 {
    1
}

/// A named signature-type group: the ordered wire list behind an io-port type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureGroup {
    /// The ordered wire definitions of this signature type.
    #[serde(default)]
    pub ports: Vec<WireSignature>,
}

/// The full signature catalog: signature-type name → wire list.
pub type SignatureCatalog = IndexMap<String, SignatureGroup>;

/// A wire-name rename rule attached to an io port.
///
/// `pattern` is replaced by `repl` at its first occurrence in each wire name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRule {
    /// The substring to replace.
    pub pattern: String,
    /// The replacement text.
    pub repl: String,
}

/// An io port declaration on a block or device descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoPortConfig {
    /// The signature type naming the wire list in the catalog.
    #[serde(rename = "type")]
    pub signature_type: String,
    /// The drive role of this port.
    pub drive: DriveRole,
    /// Optional wire-name rename rule.
    #[serde(default)]
    pub rename: Option<RenameRule>,
}

/// A data port declaration on a block descriptor.
///
/// Descriptors may pin the routing port index explicitly; when absent the
/// index is assigned in declaration order at load time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortConfig {
    /// Explicit routing port index, if pinned by the descriptor.
    #[serde(default)]
    pub index: Option<u32>,
}

/// A clock declaration on a block or device descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// The clock name, unique per owner.
    pub name: String,
    /// The nominal frequency; carried opaquely for the code-generation stage.
    #[serde(default)]
    pub freq: Option<serde_yaml::Value>,
}

/// A block descriptor file (`schema: rfnoc_modtool_args`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDescriptorConfig {
    /// The schema identifier; must equal [`BLOCK_SCHEMA`].
    pub schema: String,
    /// Declared input data ports, in declaration order.
    #[serde(default)]
    pub inputs: IndexMap<String, PortConfig>,
    /// Declared output data ports, in declaration order.
    #[serde(default)]
    pub outputs: IndexMap<String, PortConfig>,
    /// Declared io ports.
    #[serde(default)]
    pub io_ports: IndexMap<String, IoPortConfig>,
    /// Declared clocks.
    #[serde(default)]
    pub clocks: Vec<ClockConfig>,
    /// Declared parameters with their default values.
    #[serde(default)]
    pub parameters: IndexMap<String, serde_yaml::Value>,
}

/// The device descriptor (`<device>_bsp.yml`), one per supported board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Io ports exposed by the board, addressed under `_device_`.
    #[serde(default)]
    pub io_ports: IndexMap<String, IoPortConfig>,
    /// Clocks provided by the board, addressed under `_device_`.
    #[serde(default)]
    pub clocks: Vec<ClockConfig>,
    /// Board-level parameters, carried for the code-generation stage.
    #[serde(default)]
    pub parameters: IndexMap<String, serde_yaml::Value>,
}

/// A stream-endpoint instantiation in the image configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEndpointConfig {
    /// Whether the endpoint carries control traffic.
    pub ctrl: bool,
    /// Whether the endpoint carries data traffic.
    pub data: bool,
    /// Ingress buffer size in CHDR words.
    pub buff_size: u32,
    /// Number of data input ports; defaults to 1 when omitted.
    #[serde(default)]
    pub num_data_i: Option<u32>,
    /// Number of data output ports; defaults to 1 when omitted.
    #[serde(default)]
    pub num_data_o: Option<u32>,
}

/// A block instantiation in the image configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NocBlockConfig {
    /// The descriptor file name this instance is built from.
    pub block_desc: String,
    /// Per-instance parameter overrides.
    #[serde(default)]
    pub parameters: IndexMap<String, serde_yaml::Value>,
}

/// A directed connection request between two named port references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// The source block, endpoint, or `_device_` name.
    pub srcblk: String,
    /// The source port name.
    pub srcport: String,
    /// The destination block, endpoint, or `_device_` name.
    pub dstblk: String,
    /// The destination port name.
    pub dstport: String,
}

/// The top-level image configuration (`schema: rfnoc_imagebuilder`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// The schema identifier; must equal [`IMAGE_SCHEMA`].
    pub schema: String,
    /// Stream endpoint instances, in declaration order.
    #[serde(default)]
    pub stream_endpoints: IndexMap<String, StreamEndpointConfig>,
    /// Block instances, in declaration order.
    #[serde(default)]
    pub noc_blocks: IndexMap<String, NocBlockConfig>,
    /// Requested data and io connections.
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
    /// Requested clock-domain connections.
    #[serde(default)]
    pub clk_domains: Vec<ConnectionConfig>,
}
