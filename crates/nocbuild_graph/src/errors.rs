//! Fatal model-construction errors.
//!
//! These are configuration-level failures detected while expanding
//! descriptors or instantiating blocks; they abort the build immediately,
//! unlike structural resolution errors, which are accumulated in the
//! diagnostic sink and escalated at the driver's checkpoints.

use nocbuild_config::{DriveRole, WireType};

/// Errors raised while constructing the graph model from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// An io port names a signature type the catalog does not define.
    #[error("io port '{io_port}' references unknown signature type '{signature_type}'")]
    UnknownSignatureType {
        /// The io port whose expansion failed.
        io_port: String,
        /// The undefined signature type name.
        signature_type: String,
    },

    /// A wire's `(drive, wire_type)` combination has no defined direction.
    #[error(
        "wire '{wire}' of io port '{io_port}' has no direction for drive '{drive}' \
         and wire type {wire_type:?}"
    )]
    InvalidWireDirection {
        /// The io port being expanded.
        io_port: String,
        /// The wire whose direction could not be derived.
        wire: String,
        /// The io port's drive role.
        drive: DriveRole,
        /// The wire's declared type, if any.
        wire_type: Option<WireType>,
    },

    /// A block instance references a descriptor that was not found.
    #[error("block '{block}' references unknown descriptor '{desc}'")]
    UnknownBlockDescriptor {
        /// The block instance name.
        block: String,
        /// The `block_desc` key that did not match any descriptor file.
        desc: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_signature_type() {
        let err = ModelError::UnknownSignatureType {
            io_port: "ctrlport".to_string(),
            signature_type: "ctrl_port".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "io port 'ctrlport' references unknown signature type 'ctrl_port'"
        );
    }

    #[test]
    fn display_unknown_descriptor() {
        let err = ModelError::UnknownBlockDescriptor {
            block: "fir0".to_string(),
            desc: "fir.yml".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "block 'fir0' references unknown descriptor 'fir.yml'"
        );
    }
}
