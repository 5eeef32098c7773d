//! The build pipeline driver.
//!
//! Runs load → model build → connection resolution → routing-table
//! encoding → image-core rendering. Stages accumulate diagnostics in a
//! shared sink; the driver drains the sink at each checkpoint and aborts
//! with exit status 1 if any errors were recorded.

use std::error::Error;
use std::path::{Path, PathBuf};

use nocbuild_codegen::{CodegenInput, ImageCoreRenderer};
use nocbuild_common::ContentHash;
use nocbuild_config::{
    load_device_config, load_image_config_from_str, load_signatures, read_block_descriptions,
};
use nocbuild_diagnostics::{
    codes, Diagnostic, DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer,
};
use nocbuild_graph::{build_model, resolve};
use nocbuild_router::resolve_edges;

use crate::{Cli, ColorChoice};

/// Runs the full build pipeline. Returns the process exit status.
pub fn run(cli: &Cli, renderer: &dyn ImageCoreRenderer) -> Result<i32, Box<dyn Error>> {
    let color = match cli.color {
        ColorChoice::Auto => std::env::var("TERM").is_ok(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };
    let term = TerminalRenderer::new(color);

    let source_text = std::fs::read_to_string(&cli.source)
        .map_err(|e| format!("failed to read {}: {e}", cli.source.display()))?;
    let image = load_image_config_from_str(&source_text)?;
    let signatures = load_signatures(&cli.config_dir)?;
    let device = load_device_config(&cli.config_dir, &cli.device)?;

    let mut descriptor_dirs: Vec<PathBuf> = Vec::new();
    let builtin = cli.config_dir.join("blocks");
    if builtin.is_dir() {
        descriptor_dirs.push(builtin);
    }
    descriptor_dirs.extend(cli.include_dirs.iter().cloned());
    let dir_refs: Vec<&Path> = descriptor_dirs.iter().map(|p| p.as_path()).collect();
    let blocks = read_block_descriptions(&dir_refs)?;

    if cli.verbose && !cli.quiet {
        println!(
            "loaded {} block descriptor(s), {} io signature(s)",
            blocks.len(),
            signatures.len()
        );
    }

    let sink = DiagnosticSink::new();

    let model = build_model(&image, &blocks, &device, &signatures, &sink)?;
    if checkpoint(&sink, &term, cli.quiet) {
        return Ok(1);
    }

    let connections = resolve(&model, &sink);
    if checkpoint(&sink, &term, cli.quiet) {
        return Ok(1);
    }

    let table = resolve_edges(&model, &connections.block, &sink)?;
    if checkpoint(&sink, &term, cli.quiet) {
        return Ok(1);
    }

    let router_hex = cli
        .router_hex
        .clone()
        .unwrap_or_else(|| default_router_path(cli));
    table.write_file(&router_hex)?;
    if !cli.quiet {
        println!("wrote {} ({} edges)", router_hex.display(), table.edges.len());
    }

    if cli.generate_only {
        return Ok(0);
    }

    let source_name = cli.source.to_string_lossy();
    let input = CodegenInput {
        model: &model,
        connections: &connections,
        source: &source_name,
        source_hash: ContentHash::from_bytes(source_text.as_bytes()),
    };
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.source.with_extension("v"));
    match renderer.render(&input) {
        Ok(text) => {
            std::fs::write(&output, text)
                .map_err(|e| format!("failed to write {}: {e}", output.display()))?;
            if !cli.quiet {
                println!("wrote {}", output.display());
            }
        }
        Err(e) => {
            sink.emit(Diagnostic::error(codes::RENDER_FAILED, e.to_string()));
            checkpoint(&sink, &term, cli.quiet);
            return Ok(1);
        }
    }

    Ok(0)
}

/// `<device>_static_router.hex` next to the source file.
fn default_router_path(cli: &Cli) -> PathBuf {
    let file = format!("{}_static_router.hex", cli.device.to_lowercase());
    match cli.source.parent() {
        Some(dir) if dir != Path::new("") => dir.join(file),
        _ => PathBuf::from(file),
    }
}

/// Drains the sink to stderr. Returns `true` when the build must abort.
///
/// Warnings and notes are suppressed under `--quiet`; errors always print.
fn checkpoint(sink: &DiagnosticSink, term: &TerminalRenderer, quiet: bool) -> bool {
    for diag in sink.take_all() {
        if quiet && diag.severity != Severity::Error {
            continue;
        }
        eprint!("{}", term.render(&diag));
    }
    if sink.has_errors() {
        eprintln!("build failed with {} error(s)", sink.error_count());
        true
    } else {
        false
    }
}
