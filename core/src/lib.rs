//! Packetscope core - sk_buff model, packet-path graph, and the
//! deterministic simulator that turns one into snapshots of the other.
//!
//! Nothing here performs I/O. A path definition plus buffer sizing goes in,
//! an ordered sequence of owned [`SimulationStep`] snapshots comes out, and
//! identical inputs always produce identical output.

pub mod bpf;
pub mod conntrack;
pub mod function;
pub mod graph;
pub mod layer;
pub mod netfilter;
pub mod path;
pub mod simulator;
pub mod skbuff;
pub mod trace;

pub mod prelude {
    pub use crate::bpf::{BpfHook, BpfHookType};
    pub use crate::conntrack::{ConntrackEntry, ConntrackState};
    pub use crate::function::{FunctionNode, Mutation};
    pub use crate::layer::Layer;
    pub use crate::netfilter::{HookPoint, NetfilterHook};
    pub use crate::path::{CallEdge, Direction, PacketPath};
    pub use crate::simulator::{SimulationParams, Simulator, simulate};
    pub use crate::skbuff::{FrameHeader, SkBuff};
    pub use crate::trace::{SimulationStep, SimulationTrace, StopReason};
}

pub use bpf::{BpfHook, BpfHookType};
pub use conntrack::{ConntrackEntry, ConntrackState};
pub use function::{FunctionNode, Mutation};
pub use graph::PathGraph;
pub use layer::Layer;
pub use netfilter::{HookPoint, NetfilterHook};
pub use path::{CallEdge, Direction, PacketPath};
pub use simulator::{
    DEFAULT_BUFFER_SIZE, DEFAULT_PAYLOAD_SIZE, SimulationParams, Simulator, simulate,
};
pub use skbuff::{FrameHeader, HeaderSegment, SkBuff};
pub use trace::{SimulationStep, SimulationTrace, StopReason};
