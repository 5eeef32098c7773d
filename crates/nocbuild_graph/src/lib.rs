//! The resolved design-graph model, its builder, and the connection resolver.
//!
//! This crate turns the typed configuration records from `nocbuild_config`
//! into a fully indexed [`GraphModel`](model::GraphModel): every stream
//! endpoint and block instance receives a stable numeric index, every
//! addressable port and clock is keyed for lookup, and every requested
//! connection is classified against the declared capability of both of its
//! endpoints. The model is immutable once resolution completes.

#![warn(missing_docs)]

pub mod build;
pub mod errors;
pub mod model;
pub mod resolve;

pub use build::build_model;
pub use errors::ModelError;
pub use model::{
    BlockDescriptor, BlockInstance, ClockEntry, ClockKey, Connection, DeviceDescriptor, GraphModel,
    IoPort, PortRef, PortRole, StreamEndpoint, Wire, WireDirection, DEVICE_NAME,
    IMPLICIT_DEVICE_CLOCKS,
};
pub use resolve::{resolve, resolve_clk_domains, resolve_connections, ResolvedConnections};
