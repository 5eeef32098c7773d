//! Built-in image-core renderer.
//!
//! Emits a module skeleton with provenance and a summary of the resolved
//! design. The full HDL body comes from the device-specific templating
//! stage, which implements [`ImageCoreRenderer`] in its place.

use nocbuild_codegen::{CodegenInput, ImageCoreRenderer, RenderError};

/// Renders a skeleton image core with provenance and design summary.
pub struct ImageCoreStub;

impl ImageCoreRenderer for ImageCoreStub {
    fn render(&self, input: &CodegenInput<'_>) -> Result<String, RenderError> {
        let mut out = String::new();
        out.push_str("// Generated by nocbuild. Do not edit.\n");
        out.push_str(&format!("// Source: {}\n", input.source));
        out.push_str(&format!("// Source hash: {}\n", input.source_hash));
        out.push_str("//\n");
        out.push_str("// Skeleton only; the HDL body is produced by the device templating stage.\n\n");
        out.push_str("module rfnoc_image_core;\n\n");

        out.push_str("  // Stream endpoints:\n");
        for sep in input.model.stream_endpoints.values() {
            out.push_str(&format!(
                "  //   {} (node {}, {} in / {} out, buff {})\n",
                sep.name, sep.index, sep.num_data_i, sep.num_data_o, sep.buff_size
            ));
        }

        out.push_str("  // NoC blocks:\n");
        for block in input.model.noc_blocks.values() {
            out.push_str(&format!(
                "  //   {} (node {}, {})\n",
                block.name, block.index, block.desc
            ));
        }

        let con = input.connections;
        out.push_str(&format!(
            "  // Connections: {} block, {} io, {} broadcast, {} clock\n",
            con.block.len(),
            con.io_master_slave.len(),
            con.io_broadcast.len(),
            con.clk_domains.len()
        ));

        out.push_str("\nendmodule\n");
        Ok(out)
    }
}
