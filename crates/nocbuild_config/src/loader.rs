//! Configuration and descriptor file loading.

use crate::error::ConfigError;
use crate::types::{
    BlockDescriptorConfig, DeviceConfig, ImageConfig, SignatureCatalog, BLOCK_SCHEMA, IMAGE_SCHEMA,
};
use indexmap::IndexMap;
use std::path::Path;

/// Loads and validates an image configuration from a YAML file.
pub fn load_image_config(path: &Path) -> Result<ImageConfig, ConfigError> {
    let content = read_file(path)?;
    load_image_config_from_str(&content)
}

/// Parses and validates an image configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_image_config_from_str(content: &str) -> Result<ImageConfig, ConfigError> {
    let config: ImageConfig =
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    if config.schema != IMAGE_SCHEMA {
        return Err(ConfigError::BadSchema {
            expected: IMAGE_SCHEMA.to_string(),
            found: config.schema,
        });
    }
    Ok(config)
}

/// Loads the io-signature catalog from `io_signatures.yml` in `config_path`.
pub fn load_signatures(config_path: &Path) -> Result<SignatureCatalog, ConfigError> {
    let content = read_file(&config_path.join("io_signatures.yml"))?;
    serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Loads the device descriptor from `<device>_bsp.yml` in `config_path`.
///
/// The device name is lowercased to form the file name, matching the
/// on-disk naming convention of board support packages.
pub fn load_device_config(config_path: &Path, device: &str) -> Result<DeviceConfig, ConfigError> {
    let file = format!("{}_bsp.yml", device.to_lowercase());
    let content = read_file(&config_path.join(&file))?;
    serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Recursively searches `paths` for block descriptor files.
///
/// Every `*.yml` file whose `schema` field equals `rfnoc_modtool_args` is
/// loaded; other YAML files are skipped silently so descriptor directories
/// can hold unrelated configuration. The returned map is keyed by file name
/// (the key block instances use in `block_desc`), in discovery order.
pub fn read_block_descriptions(
    paths: &[&Path],
) -> Result<IndexMap<String, BlockDescriptorConfig>, ConfigError> {
    let mut blocks = IndexMap::new();
    for path in paths {
        walk_descriptor_dir(path, &mut blocks)?;
    }
    Ok(blocks)
}

fn walk_descriptor_dir(
    dir: &Path,
    blocks: &mut IndexMap<String, BlockDescriptorConfig>,
) -> Result<(), ConfigError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|e| e.path())
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk_descriptor_dir(&path, blocks)?;
        } else if path.extension().is_some_and(|ext| ext == "yml") {
            let content = read_file(&path)?;
            // Peek at the schema before committing to the full record shape.
            let value: serde_yaml::Value = serde_yaml::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            if value.get("schema").and_then(|s| s.as_str()) != Some(BLOCK_SCHEMA) {
                continue;
            }
            let desc: BlockDescriptorConfig = serde_yaml::from_value(value)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            blocks.insert(name, desc);
        }
    }
    Ok(())
}

/// Reads a file, mapping a missing file to [`ConfigError::MissingFile`].
fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::MissingFile {
                dir: path.parent().unwrap_or(Path::new(".")).to_path_buf(),
                file: path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string(),
            }
        } else {
            ConfigError::IoError(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_IMAGE: &str = r#"
schema: rfnoc_imagebuilder
stream_endpoints:
  ep0: { ctrl: true, data: true, buff_size: 32768 }
noc_blocks:
  fir0: { block_desc: fir.yml }
connections:
  - { srcblk: ep0, srcport: out0, dstblk: fir0, dstport: in_0 }
clk_domains:
  - { srcblk: _device_, srcport: ce, dstblk: fir0, dstport: ce }
"#;

    #[test]
    fn parse_minimal_image_config() {
        let config = load_image_config_from_str(MINIMAL_IMAGE).unwrap();
        assert_eq!(config.stream_endpoints.len(), 1);
        assert_eq!(config.noc_blocks.len(), 1);
        assert_eq!(config.connections.len(), 1);
        assert_eq!(config.clk_domains.len(), 1);
    }

    #[test]
    fn wrong_schema_errors() {
        let err = load_image_config_from_str("schema: rfnoc_modtool_args\n").unwrap_err();
        assert!(matches!(err, ConfigError::BadSchema { .. }));
    }

    #[test]
    fn invalid_yaml_errors() {
        let err = load_image_config_from_str("schema: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_signatures_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("io_signatures.yml"),
            r#"
ctrlport:
  ports:
    - { name: ctrlport_req_wr, type: from-master }
    - { name: ctrlport_req_data, width: 32, type: from-master }
    - { name: ctrlport_resp_ack, type: to-master }
"#,
        )
        .unwrap();

        let catalog = load_signatures(dir.path()).unwrap();
        let group = &catalog["ctrlport"];
        assert_eq!(group.ports.len(), 3);
        assert_eq!(group.ports[1].width, 32);
    }

    #[test]
    fn missing_signatures_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_signatures(dir.path()).unwrap_err();
        match err {
            ConfigError::MissingFile { file, .. } => assert_eq!(file, "io_signatures.yml"),
            other => panic!("expected MissingFile, got {other}"),
        }
    }

    #[test]
    fn device_config_file_name_lowercased() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("x310_bsp.yml"),
            "clocks:\n  - { name: radio, freq: 200e6 }\n",
        )
        .unwrap();
        let device = load_device_config(dir.path(), "X310").unwrap();
        assert_eq!(device.clocks.len(), 1);
        assert_eq!(device.clocks[0].name, "radio");
    }

    #[test]
    fn block_discovery_filters_by_schema() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("fir.yml"),
            "schema: rfnoc_modtool_args\ninputs:\n  in_0: {}\noutputs:\n  out_0: {}\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.yml"), "schema: something_else\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "not yaml\n").unwrap();

        let nested = dir.path().join("oot");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(
            nested.join("window.yml"),
            "schema: rfnoc_modtool_args\ninputs:\n  in_0: {}\n",
        )
        .unwrap();

        let blocks = read_block_descriptions(&[dir.path()]).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks.contains_key("fir.yml"));
        assert!(blocks.contains_key("window.yml"));
    }
}
