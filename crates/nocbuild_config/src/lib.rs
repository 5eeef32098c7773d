//! Parsing and validation of design description and descriptor files.
//!
//! This crate reads the YAML inputs of a build — the image configuration,
//! the io-signature catalog, per-block descriptor files, and the device
//! descriptor — into strongly-typed records. Every field is mapped
//! explicitly; unknown fields are ignored rather than dynamically attached.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_device_config, load_image_config, load_image_config_from_str, load_signatures,
    read_block_descriptions,
};
pub use types::*;
