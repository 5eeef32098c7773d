//! Static routing table generation.
//!
//! Converts the accepted block-to-block connection bucket into the binary
//! edge list consumed by the fabric's static router: one packed 32-bit
//! value per connection, rendered as a hex text file. The encoding is a
//! stable, bit-exact contract — any change breaks compatibility with the
//! synthesis toolchain.

#![warn(missing_docs)]

pub mod edge;
pub mod table;

pub use edge::{PackError, RouteEdge, MAX_NODE_INDEX, MAX_PORT_INDEX, NODE_BITS, PORT_BITS};
pub use table::{resolve_edges, RoutingTable};
