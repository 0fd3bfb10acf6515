//! Packetscope facade crate.
//!
//! This crate re-exports the core model, path catalogs, and contract crates
//! with a single entry point. Pull in `prelude::*` for the common types.

pub use packetscope_contract as contract;
pub use packetscope_core as core;
pub use packetscope_paths as paths;

pub use packetscope_contract::{Contract, ExportOptions};
pub use packetscope_core::{PacketPath, SimulationTrace, Simulator, simulate};
pub use packetscope_paths::builtin_paths;

pub mod prelude {
    pub use packetscope_contract::prelude::*;
    pub use packetscope_core::prelude::*;
    pub use packetscope_paths::prelude::*;
}
