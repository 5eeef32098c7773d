//! Connection classification and validation.
//!
//! Every requested connection falls into exactly one of four categories,
//! checked by membership of both endpoints in the model's lookup tables:
//! block data (output → input), io master → slave, io broadcaster →
//! listener, and clock-domain source → sink. Whatever survives all passes
//! is a structural error. The resolver never aborts: it emits every
//! violation of a pass into the sink and leaves the abort decision to the
//! driver's checkpoint.

use crate::model::{
    ClockKey, Connection, GraphModel, PortRef, PortRole, DEVICE_NAME, IMPLICIT_DEVICE_CLOCKS,
};
use nocbuild_diagnostics::{codes, Diagnostic, DiagnosticSink};

/// The validated, categorized connection buckets.
///
/// Each bucket preserves the order in which connections were declared;
/// the routing-table encoder depends on that order being stable.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConnections {
    /// Block-to-block data connections (output → input).
    pub block: Vec<Connection>,
    /// Io connections pairing a master with a slave.
    pub io_master_slave: Vec<Connection>,
    /// Io connections pairing a broadcaster with a listener.
    pub io_broadcast: Vec<Connection>,
    /// Clock-domain connections (source → sink).
    pub clk_domains: Vec<Connection>,
}

/// Splits `items` by a predicate, preserving relative order in both halves.
fn split<T>(items: Vec<T>, matches: impl Fn(&T) -> bool) -> (Vec<T>, Vec<T>) {
    items.into_iter().partition(matches)
}

/// Resolves all requested connections and clock domains against the model.
pub fn resolve(model: &GraphModel, sink: &DiagnosticSink) -> ResolvedConnections {
    let mut resolved = resolve_connections(model, sink);
    resolved.clk_domains = resolve_clk_domains(model, sink);
    resolved
}

/// Partitions the raw connection list into the three connection buckets.
///
/// Connections that fit no bucket are reported one diagnostic each, and the
/// full sets of declared block ports and io ports are dumped afterwards so
/// the operator can see why no category matched (wrong direction, typo, or
/// mixed connection kind) without rerunning at higher verbosity.
pub fn resolve_connections(model: &GraphModel, sink: &DiagnosticSink) -> ResolvedConnections {
    let has_block_port = |owner: &str, port: &str, role: PortRole| {
        model
            .block_ports
            .contains_key(&PortRef::new(owner, port, role))
    };
    let has_io_port = |owner: &str, port: &str, role: PortRole| {
        model.io_ports.contains_key(&PortRef::new(owner, port, role))
    };

    let (block, rest) = split(model.connections.clone(), |con| {
        has_block_port(&con.srcblk, &con.srcport, PortRole::Output)
            && has_block_port(&con.dstblk, &con.dstport, PortRole::Input)
    });
    let (io_master_slave, rest) = split(rest, |con| {
        has_io_port(&con.srcblk, &con.srcport, PortRole::Master)
            && has_io_port(&con.dstblk, &con.dstport, PortRole::Slave)
    });
    let (io_broadcast, unresolved) = split(rest, |con| {
        has_io_port(&con.srcblk, &con.srcport, PortRole::Broadcaster)
            && has_io_port(&con.dstblk, &con.dstport, PortRole::Listener)
    });

    if !unresolved.is_empty() {
        for con in &unresolved {
            sink.emit(
                Diagnostic::error(
                    codes::UNRESOLVED_CONNECTION,
                    format!("unresolved connection {con}"),
                )
                .with_help("block ports are connected output (src) to input (dst)")
                .with_help(
                    "io ports are connected master (src) to slave (dst) \
                     or broadcaster (src) to listener (dst)",
                ),
            );
        }
        sink.emit(port_dump(
            "declared block ports",
            model.block_ports.keys(),
        ));
        sink.emit(port_dump("declared io ports", model.io_ports.keys()));
    }

    ResolvedConnections {
        block,
        io_master_slave,
        io_broadcast,
        clk_domains: Vec::new(),
    }
}

/// Resolves clock-domain connections and checks for unconnected clocks.
///
/// A clock-domain request resolves iff both its `(owner, clock)` endpoints
/// are declared; there is no direction typing. Afterwards, every declared
/// clock other than the implicit device clocks must appear as a destination
/// of some resolved request.
pub fn resolve_clk_domains(model: &GraphModel, sink: &DiagnosticSink) -> Vec<Connection> {
    let (resolved, unresolved) = split(model.clk_domains.clone(), |con| {
        model
            .clocks
            .contains_key(&ClockKey::new(&con.srcblk, &con.srcport))
            && model
                .clocks
                .contains_key(&ClockKey::new(&con.dstblk, &con.dstport))
    });

    let mut unconnected: Vec<&ClockKey> = model
        .clocks
        .keys()
        .filter(|key| {
            key.owner != DEVICE_NAME
                && !IMPLICIT_DEVICE_CLOCKS.contains(&key.clock.as_str())
                && !resolved
                    .iter()
                    .any(|con| con.dstblk == key.owner && con.dstport == key.clock)
        })
        .collect();
    unconnected.sort_by(|a, b| (&a.owner, &a.clock).cmp(&(&b.owner, &b.clock)));

    for key in unconnected {
        sink.emit(
            Diagnostic::error(
                codes::UNCONNECTED_CLOCK,
                format!("unconnected clock {key}"),
            )
            .with_help("specify a clk_domains entry driving this clock"),
        );
    }

    for con in &unresolved {
        sink.emit(
            Diagnostic::error(
                codes::UNRESOLVED_CLOCK_DOMAIN,
                format!("unresolved clock domain {con}"),
            )
            .with_note("source or destination clock not found"),
        );
    }

    resolved
}

/// A note diagnostic enumerating declared ports, sorted for stable output.
fn port_dump<'a>(
    title: &str,
    keys: impl Iterator<Item = &'a PortRef>,
) -> Diagnostic {
    let mut lines: Vec<String> = keys.map(|key| key.to_string()).collect();
    lines.sort();
    let mut diag = Diagnostic::note(codes::UNRESOLVED_CONNECTION, format!("{title}:"));
    for line in lines {
        diag = diag.with_note(line);
    }
    diag
}
