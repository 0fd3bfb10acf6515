//! Packetscope contract - assembles the versioned JSON envelope.
//!
//! The contract bundles the built-in path catalogs, their pre-computed
//! simulations, and the rendering metadata the frontend needs. Building is
//! pure: the caller supplies the timestamp, and identical inputs yield
//! byte-identical output.

pub mod envelope;
pub mod metadata;
pub mod options;

pub mod prelude {
    pub use crate::envelope::{Contract, ContractError};
    pub use crate::options::ExportOptions;
}

pub use envelope::{CONTRACT_VERSION, Contract, ContractError, KERNEL_VERSION, PathEntry};
pub use metadata::{ContractMetadata, LayerInfo, header_size_table, layer_infos};
pub use options::ExportOptions;
