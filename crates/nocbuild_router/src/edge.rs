//! The packed 32-bit edge encoding.
//!
//! Each routed connection is one 32-bit big-endian value: the high 16 bits
//! describe the source, the low 16 bits the destination, and each half is
//! 10 bits of node index followed by 6 bits of port index.

use serde::{Deserialize, Serialize};

/// Bits allotted to a node index within a 16-bit half.
pub const NODE_BITS: u32 = 10;
/// Bits allotted to a port index within a 16-bit half.
pub const PORT_BITS: u32 = 6;
/// The largest node index the encoding can carry.
pub const MAX_NODE_INDEX: u32 = (1 << NODE_BITS) - 1;
/// The largest port index the encoding can carry.
pub const MAX_PORT_INDEX: u32 = (1 << PORT_BITS) - 1;

/// A value that does not fit its allotted bit field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {value} exceeds the {bits}-bit encoding limit of {max}")]
pub struct PackError {
    /// Which field overflowed (e.g. "source node index").
    pub field: &'static str,
    /// The offending value.
    pub value: u32,
    /// The field width in bits.
    pub bits: u32,
    /// The largest representable value.
    pub max: u32,
}

/// A fully resolved routing edge in `(node, port)` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEdge {
    /// The source node index.
    pub src_node: u32,
    /// The source port index within the source node.
    pub src_port: u32,
    /// The destination node index.
    pub dst_node: u32,
    /// The destination port index within the destination node.
    pub dst_port: u32,
}

impl RouteEdge {
    /// Packs this edge into its 32-bit wire value.
    ///
    /// Fails if any field exceeds its allotted bit width; the four fields
    /// are checked independently so a diagnostic can name the culprit.
    pub fn pack(&self) -> Result<u32, PackError> {
        check_field("source node index", self.src_node, NODE_BITS)?;
        check_field("source port index", self.src_port, PORT_BITS)?;
        check_field("destination node index", self.dst_node, NODE_BITS)?;
        check_field("destination port index", self.dst_port, PORT_BITS)?;

        let src = (self.src_node << PORT_BITS) | self.src_port;
        let dst = (self.dst_node << PORT_BITS) | self.dst_port;
        Ok((src << 16) | dst)
    }

    /// Recovers the edge from its packed 32-bit wire value.
    pub fn unpack(word: u32) -> Self {
        let src = word >> 16;
        let dst = word & 0xffff;
        Self {
            src_node: src >> PORT_BITS,
            src_port: src & MAX_PORT_INDEX,
            dst_node: dst >> PORT_BITS,
            dst_port: dst & MAX_PORT_INDEX,
        }
    }
}

fn check_field(field: &'static str, value: u32, bits: u32) -> Result<(), PackError> {
    let max = (1 << bits) - 1;
    if value > max {
        return Err(PackError {
            field,
            value,
            bits,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_layout() {
        let edge = RouteEdge {
            src_node: 1,
            src_port: 0,
            dst_node: 2,
            dst_port: 0,
        };
        // src half = (1 << 6) | 0 = 0x0040, dst half = (2 << 6) | 0 = 0x0080
        assert_eq!(edge.pack().unwrap(), 0x0040_0080);
    }

    #[test]
    fn pack_with_ports() {
        let edge = RouteEdge {
            src_node: 3,
            src_port: 5,
            dst_node: 1,
            dst_port: 1,
        };
        assert_eq!(edge.pack().unwrap(), ((3 << 6 | 5) << 16) | (1 << 6 | 1));
    }

    #[test]
    fn round_trip() {
        let edge = RouteEdge {
            src_node: 1023,
            src_port: 63,
            dst_node: 512,
            dst_port: 17,
        };
        let word = edge.pack().unwrap();
        assert_eq!(RouteEdge::unpack(word), edge);
    }

    #[test]
    fn node_index_overflow() {
        let edge = RouteEdge {
            src_node: 1024,
            src_port: 0,
            dst_node: 0,
            dst_port: 0,
        };
        let err = edge.pack().unwrap_err();
        assert_eq!(err.field, "source node index");
        assert_eq!(err.max, 1023);
    }

    #[test]
    fn port_index_overflow() {
        let edge = RouteEdge {
            src_node: 0,
            src_port: 0,
            dst_node: 0,
            dst_port: 64,
        };
        let err = edge.pack().unwrap_err();
        assert_eq!(err.field, "destination port index");
        assert_eq!(err.max, 63);
    }

    #[test]
    fn boundary_values_fit() {
        let edge = RouteEdge {
            src_node: MAX_NODE_INDEX,
            src_port: MAX_PORT_INDEX,
            dst_node: MAX_NODE_INDEX,
            dst_port: MAX_PORT_INDEX,
        };
        assert_eq!(edge.pack().unwrap(), 0xffff_ffff);
    }
}
