//! Graph model construction from the typed configuration records.
//!
//! Building is a pure sequence of table constructions: endpoint defaults,
//! node index assignment, the three lookup tables (block ports, io ports,
//! clocks), and the per-instance parameter merge. The only diagnostics a
//! build can emit are unknown-parameter warnings; everything else either
//! succeeds or is a fatal [`ModelError`].

use crate::errors::ModelError;
use crate::model::{
    BlockDescriptor, BlockInstance, BlockPortEntry, ClockEntry, ClockKey, Connection,
    DeviceDescriptor, GraphModel, PortRef, PortRole, StreamEndpoint, DEVICE_NAME,
    IMPLICIT_DEVICE_CLOCKS,
};
use indexmap::IndexMap;
use nocbuild_config::{BlockDescriptorConfig, DeviceConfig, ImageConfig, SignatureCatalog};
use nocbuild_diagnostics::{codes, Diagnostic, DiagnosticSink};
use std::collections::HashMap;

/// Builds the fully indexed graph model.
///
/// Stream endpoints receive node indices `1..=N` in declaration order and
/// block instances `N+1..=N+M`; index 0 is reserved. These indices are the
/// node identity in the binary routing table, so any change to the
/// numbering scheme changes the generated artifact.
///
/// Unknown per-instance parameter keys are reported as warnings and
/// dropped; the build continues. (Flip the severity to `error` here to get
/// a strict parameter policy.)
pub fn build_model(
    config: &ImageConfig,
    blocks: &IndexMap<String, BlockDescriptorConfig>,
    device_config: &DeviceConfig,
    catalog: &SignatureCatalog,
    sink: &DiagnosticSink,
) -> Result<GraphModel, ModelError> {
    let mut descriptors = IndexMap::new();
    for (name, block_config) in blocks {
        descriptors.insert(
            name.clone(),
            BlockDescriptor::from_config(block_config, catalog)?,
        );
    }
    let device = DeviceDescriptor::from_config(device_config, catalog)?;

    let stream_endpoints = index_stream_endpoints(config);
    let noc_blocks = index_noc_blocks(config, &descriptors, stream_endpoints.len(), sink)?;

    let block_ports = collect_block_ports(&stream_endpoints, &noc_blocks, &descriptors);
    let io_ports = collect_io_ports(&noc_blocks, &descriptors, &device);
    let clocks = collect_clocks(&noc_blocks, &descriptors, &device);

    Ok(GraphModel {
        stream_endpoints,
        noc_blocks,
        descriptors,
        device,
        connections: config.connections.iter().map(Connection::from).collect(),
        clk_domains: config.clk_domains.iter().map(Connection::from).collect(),
        block_ports,
        io_ports,
        clocks,
    })
}

/// Assigns endpoint indices `1..=N` and fills missing data-port counts.
fn index_stream_endpoints(config: &ImageConfig) -> IndexMap<String, StreamEndpoint> {
    config
        .stream_endpoints
        .iter()
        .enumerate()
        .map(|(i, (name, sep))| {
            (
                name.clone(),
                StreamEndpoint {
                    name: name.clone(),
                    index: (i + 1) as u16,
                    ctrl: sep.ctrl,
                    data: sep.data,
                    buff_size: sep.buff_size,
                    num_data_i: sep.num_data_i.unwrap_or(1),
                    num_data_o: sep.num_data_o.unwrap_or(1),
                },
            )
        })
        .collect()
}

/// Assigns block indices `N+1..=N+M` and merges per-instance parameters.
fn index_noc_blocks(
    config: &ImageConfig,
    descriptors: &IndexMap<String, BlockDescriptor>,
    endpoint_count: usize,
    sink: &DiagnosticSink,
) -> Result<IndexMap<String, BlockInstance>, ModelError> {
    let start = endpoint_count + 1;
    let mut instances = IndexMap::new();

    for (i, (name, block)) in config.noc_blocks.iter().enumerate() {
        let desc = descriptors.get(&block.block_desc).ok_or_else(|| {
            ModelError::UnknownBlockDescriptor {
                block: name.clone(),
                desc: block.block_desc.clone(),
            }
        })?;

        // Start from the instance's overrides, dropping undeclared keys,
        // then fill declared parameters the instance left out.
        let mut parameters = IndexMap::new();
        for (key, value) in &block.parameters {
            if desc.parameters.contains_key(key) {
                parameters.insert(key.clone(), value.clone());
            } else {
                sink.emit(Diagnostic::warning(
                    codes::UNKNOWN_PARAMETER,
                    format!("unknown parameter '{key}' for block '{name}'"),
                ));
            }
        }
        for (key, default) in &desc.parameters {
            parameters
                .entry(key.clone())
                .or_insert_with(|| default.clone());
        }

        instances.insert(
            name.clone(),
            BlockInstance {
                name: name.clone(),
                desc: block.block_desc.clone(),
                index: (start + i) as u16,
                parameters,
            },
        );
    }

    Ok(instances)
}

/// Builds the block-port lookup table.
///
/// Block instances contribute their descriptor's data ports; stream
/// endpoints contribute synthesized `in0..` / `out0..` entries whose port
/// index is the numeric suffix.
fn collect_block_ports(
    stream_endpoints: &IndexMap<String, StreamEndpoint>,
    noc_blocks: &IndexMap<String, BlockInstance>,
    descriptors: &IndexMap<String, BlockDescriptor>,
) -> HashMap<PortRef, BlockPortEntry> {
    let mut table = HashMap::new();

    for block in noc_blocks.values() {
        let desc = &descriptors[&block.desc];
        for (port, port_desc) in &desc.inputs {
            table.insert(
                PortRef::new(&block.name, port, PortRole::Input),
                BlockPortEntry {
                    port_index: port_desc.index,
                },
            );
        }
        for (port, port_desc) in &desc.outputs {
            table.insert(
                PortRef::new(&block.name, port, PortRole::Output),
                BlockPortEntry {
                    port_index: port_desc.index,
                },
            );
        }
    }

    for sep in stream_endpoints.values() {
        for port in 0..sep.num_data_i {
            table.insert(
                PortRef::new(&sep.name, format!("in{port}"), PortRole::Input),
                BlockPortEntry { port_index: port },
            );
        }
        for port in 0..sep.num_data_o {
            table.insert(
                PortRef::new(&sep.name, format!("out{port}"), PortRole::Output),
                BlockPortEntry { port_index: port },
            );
        }
    }

    table
}

/// Builds the io-port lookup table, with device ports under `_device_`.
fn collect_io_ports(
    noc_blocks: &IndexMap<String, BlockInstance>,
    descriptors: &IndexMap<String, BlockDescriptor>,
    device: &DeviceDescriptor,
) -> HashMap<PortRef, crate::model::IoPort> {
    let mut table = HashMap::new();

    for block in noc_blocks.values() {
        let desc = &descriptors[&block.desc];
        for (name, io_port) in &desc.io_ports {
            table.insert(
                PortRef::new(&block.name, name, io_port.drive.into()),
                io_port.clone(),
            );
        }
    }
    for (name, io_port) in &device.io_ports {
        table.insert(
            PortRef::new(DEVICE_NAME, name, io_port.drive.into()),
            io_port.clone(),
        );
    }

    table
}

/// Builds the clock lookup table, including the implicit device clocks.
fn collect_clocks(
    noc_blocks: &IndexMap<String, BlockInstance>,
    descriptors: &IndexMap<String, BlockDescriptor>,
    device: &DeviceDescriptor,
) -> HashMap<ClockKey, ClockEntry> {
    let mut table = HashMap::new();

    for block in noc_blocks.values() {
        let desc = &descriptors[&block.desc];
        for clock in &desc.clocks {
            table.insert(ClockKey::new(&block.name, &clock.name), clock.clone());
        }
    }
    for clock in &device.clocks {
        table.insert(ClockKey::new(DEVICE_NAME, &clock.name), clock.clone());
    }
    for name in IMPLICIT_DEVICE_CLOCKS {
        table.insert(
            ClockKey::new(DEVICE_NAME, name),
            ClockEntry {
                name: name.to_string(),
                freq: None,
            },
        );
    }

    table
}
