//! Routing table resolution, rendering, and writing.

use crate::edge::RouteEdge;
use nocbuild_common::{InternalError, NocResult};
use nocbuild_diagnostics::{codes, Diagnostic, DiagnosticSink};
use nocbuild_graph::{Connection, GraphModel, PortRef, PortRole};
use std::path::Path;

/// The ordered edge list of accepted block-to-block connections.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    /// Edges in the order their connections were accepted.
    pub edges: Vec<RouteEdge>,
}

impl RoutingTable {
    /// Renders the table as its hex text form.
    ///
    /// Line 1 is the edge count as 8 uppercase hex digits; each following
    /// line is one packed edge as 8 lowercase hex digits. Edges were
    /// already validated against the bit-field limits during resolution,
    /// so an overflow here is an internal error.
    pub fn render(&self) -> NocResult<String> {
        let mut out = format!("{:08X}\n", self.edges.len());
        for edge in &self.edges {
            let word = edge
                .pack()
                .map_err(|e| InternalError::new(e.to_string()))?;
            out.push_str(&format!("{word:08x}\n"));
        }
        Ok(out)
    }

    /// Writes the rendered table to `path` as a whole-file replacement.
    pub fn write_file(&self, path: &Path) -> NocResult<()> {
        let text = self.render()?;
        std::fs::write(path, text)
            .map_err(|e| InternalError::new(format!("failed to write {}: {e}", path.display())))
    }
}

/// Resolves accepted block connections into `(node, port)` edge pairs.
///
/// Endpoint ports must match `out<digit>` (source) or `in<digit>`
/// (destination) with the digit below the endpoint's declared data-port
/// count; block ports use the index recorded at descriptor load. Each
/// failed connection is reported and skipped so the remaining independent
/// connections still surface their own errors; the caller must check the
/// sink before writing the table.
pub fn resolve_edges(
    model: &GraphModel,
    connections: &[Connection],
    sink: &DiagnosticSink,
) -> NocResult<RoutingTable> {
    let mut table = RoutingTable::default();

    for con in connections {
        let src = resolve_endpoint(model, &con.srcblk, &con.srcport, PortRole::Output, sink)?;
        let dst = resolve_endpoint(model, &con.dstblk, &con.dstport, PortRole::Input, sink)?;
        let (Some(src), Some(dst)) = (src, dst) else {
            continue;
        };

        let edge = RouteEdge {
            src_node: src.0,
            src_port: src.1,
            dst_node: dst.0,
            dst_port: dst.1,
        };
        match edge.pack() {
            Ok(_) => table.edges.push(edge),
            Err(e) => {
                let code = if e.field.ends_with("node index") {
                    codes::NODE_INDEX_OVERFLOW
                } else {
                    codes::PORT_INDEX_OVERFLOW
                };
                sink.emit(
                    Diagnostic::error(code, format!("connection {con} cannot be encoded"))
                        .with_note(e.to_string()),
                );
            }
        }
    }

    Ok(table)
}

/// Resolves one side of a connection to its `(node, port)` pair.
///
/// Returns `Ok(None)` after emitting a diagnostic when the side cannot be
/// resolved; `Err` only for model inconsistencies that indicate a bug.
fn resolve_endpoint(
    model: &GraphModel,
    owner: &str,
    port: &str,
    role: PortRole,
    sink: &DiagnosticSink,
) -> NocResult<Option<(u32, u32)>> {
    if let Some(sep) = model.stream_endpoints.get(owner) {
        let (prefix, limit) = match role {
            PortRole::Output => ("out", sep.num_data_o),
            _ => ("in", sep.num_data_i),
        };
        let Some(port_index) = endpoint_port_index(port, prefix) else {
            sink.emit(Diagnostic::error(
                codes::BAD_ENDPOINT_PORT,
                format!("port '{port}' is invalid on endpoint '{owner}'"),
            ));
            return Ok(None);
        };
        if port_index >= limit {
            sink.emit(Diagnostic::error(
                codes::ENDPOINT_PORT_RANGE,
                format!(
                    "port '{port}' exceeds the {} data ports of endpoint '{owner}'",
                    limit
                ),
            ));
            return Ok(None);
        }
        return Ok(Some((sep.index as u32, port_index)));
    }

    // Accepted connections reference only known blocks and ports; a miss
    // here means the model and the resolver disagree.
    let block = model.noc_blocks.get(owner).ok_or_else(|| {
        InternalError::new(format!("accepted connection references unknown node '{owner}'"))
    })?;
    let entry = model
        .block_ports
        .get(&PortRef::new(owner, port, role))
        .ok_or_else(|| {
            InternalError::new(format!(
                "accepted connection references unknown port '{owner}:{port}'"
            ))
        })?;
    Ok(Some((block.index as u32, entry.port_index)))
}

/// Parses a stream-endpoint data-port name into its port index.
///
/// The suffix is a single decimal digit, capping endpoints at 10 data
/// ports per direction; the packed 6-bit port field limits addressable
/// ports independently of this.
fn endpoint_port_index(port: &str, prefix: &str) -> Option<u32> {
    let suffix = port.strip_prefix(prefix)?;
    let mut chars = suffix.chars();
    let digit = chars.next()?.to_digit(10)?;
    if chars.next().is_some() {
        return None;
    }
    Some(digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use nocbuild_config::{
        load_image_config_from_str, BlockDescriptorConfig, DeviceConfig, SignatureCatalog,
    };
    use nocbuild_graph::resolve;

    fn model_from(image_yaml: &str) -> GraphModel {
        let image = load_image_config_from_str(image_yaml).unwrap();
        let block: BlockDescriptorConfig = serde_yaml::from_str(
            "schema: rfnoc_modtool_args\ninputs:\n  in0: {}\noutputs:\n  out0: {}\n",
        )
        .unwrap();
        let mut blocks = IndexMap::new();
        blocks.insert("block_a.yml".to_string(), block);
        let sink = DiagnosticSink::new();
        nocbuild_graph::build_model(
            &image,
            &blocks,
            &DeviceConfig::default(),
            &SignatureCatalog::new(),
            &sink,
        )
        .unwrap()
    }

    const MINIMAL: &str = r#"
schema: rfnoc_imagebuilder
stream_endpoints:
  ep0: { ctrl: true, data: true, buff_size: 32768 }
noc_blocks:
  blockA: { block_desc: block_a.yml }
connections:
  - { srcblk: ep0, srcport: out0, dstblk: blockA, dstport: in0 }
  - { srcblk: blockA, srcport: out0, dstblk: ep0, dstport: in0 }
"#;

    #[test]
    fn minimal_graph_renders_two_edges() {
        let model = model_from(MINIMAL);
        let sink = DiagnosticSink::new();
        let resolved = resolve(&model, &sink);
        assert!(!sink.has_errors());

        let table = resolve_edges(&model, &resolved.block, &sink).unwrap();
        assert!(!sink.has_errors());

        let text = table.render().unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "00000002");
        // ep0 = node 1, blockA = node 2, all ports 0
        assert_eq!(lines[1], "00400080");
        assert_eq!(lines[2], "00800040");
    }

    #[test]
    fn rerun_is_byte_identical() {
        let model = model_from(MINIMAL);
        let sink = DiagnosticSink::new();
        let resolved = resolve(&model, &sink);
        let table = resolve_edges(&model, &resolved.block, &sink).unwrap();
        let first = table.render().unwrap();

        let model = model_from(MINIMAL);
        let sink = DiagnosticSink::new();
        let resolved = resolve(&model, &sink);
        let table = resolve_edges(&model, &resolved.block, &sink).unwrap();
        assert_eq!(first, table.render().unwrap());
    }

    #[test]
    fn endpoint_port_out_of_range() {
        let yaml = r#"
schema: rfnoc_imagebuilder
stream_endpoints:
  ep0: { ctrl: true, data: true, buff_size: 32768, num_data_i: 1 }
noc_blocks:
  blockA: { block_desc: block_a.yml }
connections:
  - { srcblk: blockA, srcport: out0, dstblk: ep0, dstport: in0 }
"#;
        let model = model_from(yaml);
        // Bypass the resolver's membership check to exercise the encoder's
        // own range validation.
        let con = Connection {
            srcblk: "blockA".to_string(),
            srcport: "out0".to_string(),
            dstblk: "ep0".to_string(),
            dstport: "in1".to_string(),
        };
        let sink = DiagnosticSink::new();
        let table = resolve_edges(&model, &[con], &sink).unwrap();
        assert!(table.edges.is_empty());
        assert!(sink.has_errors());
        assert_eq!(sink.diagnostics()[0].code, codes::ENDPOINT_PORT_RANGE);
    }

    #[test]
    fn two_port_endpoint_accepts_in1() {
        let yaml = r#"
schema: rfnoc_imagebuilder
stream_endpoints:
  ep0: { ctrl: true, data: true, buff_size: 32768, num_data_i: 2, num_data_o: 2 }
noc_blocks:
  blockA: { block_desc: block_a.yml }
connections:
  - { srcblk: blockA, srcport: out0, dstblk: ep0, dstport: in1 }
"#;
        let model = model_from(yaml);
        let sink = DiagnosticSink::new();
        let resolved = resolve(&model, &sink);
        let table = resolve_edges(&model, &resolved.block, &sink).unwrap();
        assert!(!sink.has_errors());
        assert_eq!(table.edges.len(), 1);
        assert_eq!(table.edges[0].dst_port, 1);
    }

    #[test]
    fn malformed_endpoint_port_name() {
        let model = model_from(MINIMAL);
        let con = Connection {
            srcblk: "ep0".to_string(),
            srcport: "output0".to_string(),
            dstblk: "blockA".to_string(),
            dstport: "in0".to_string(),
        };
        let sink = DiagnosticSink::new();
        let table = resolve_edges(&model, &[con], &sink).unwrap();
        assert!(table.edges.is_empty());
        assert!(sink.has_errors());
        assert_eq!(sink.diagnostics()[0].code, codes::BAD_ENDPOINT_PORT);
    }

    #[test]
    fn errors_do_not_stop_later_connections() {
        let model = model_from(MINIMAL);
        let bad = Connection {
            srcblk: "ep0".to_string(),
            srcport: "outX".to_string(),
            dstblk: "blockA".to_string(),
            dstport: "in0".to_string(),
        };
        let good = Connection {
            srcblk: "blockA".to_string(),
            srcport: "out0".to_string(),
            dstblk: "ep0".to_string(),
            dstport: "in0".to_string(),
        };
        let sink = DiagnosticSink::new();
        let table = resolve_edges(&model, &[bad, good], &sink).unwrap();
        assert_eq!(table.edges.len(), 1);
        assert!(sink.has_errors());
    }

    #[test]
    fn double_digit_suffix_rejected() {
        assert_eq!(endpoint_port_index("in0", "in"), Some(0));
        assert_eq!(endpoint_port_index("out9", "out"), Some(9));
        assert_eq!(endpoint_port_index("in10", "in"), None);
        assert_eq!(endpoint_port_index("in", "in"), None);
        assert_eq!(endpoint_port_index("inx", "in"), None);
    }

    #[test]
    fn render_then_unpack_round_trip() {
        let model = model_from(MINIMAL);
        let sink = DiagnosticSink::new();
        let resolved = resolve(&model, &sink);
        let table = resolve_edges(&model, &resolved.block, &sink).unwrap();
        let text = table.render().unwrap();

        for (line, edge) in text.lines().skip(1).zip(&table.edges) {
            let word = u32::from_str_radix(line, 16).unwrap();
            assert_eq!(RouteEdge::unpack(word), *edge);
        }
    }

    #[test]
    fn write_file_whole_replacement() {
        let model = model_from(MINIMAL);
        let sink = DiagnosticSink::new();
        let resolved = resolve(&model, &sink);
        let table = resolve_edges(&model, &resolved.block, &sink).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x310_static_router.hex");
        std::fs::write(&path, "stale contents\n").unwrap();
        table.write_file(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, table.render().unwrap());
    }
}
