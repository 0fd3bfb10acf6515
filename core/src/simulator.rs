//! Simulator - deterministic single-pass traversal of a packet path.
//!
//! One run walks the path's call graph from its entry point, applies each
//! function's sk_buff mutation to a single evolving buffer, and emits one
//! owned snapshot per visited function. Identical inputs produce identical
//! step sequences; the output is persisted once and replayed by a frontend
//! that never re-runs the walk.

use ahash::AHashSet;
use tracing::{debug, info, warn};

use crate::function::{FunctionNode, Mutation};
use crate::graph::PathGraph;
use crate::path::{CallEdge, Direction, PacketPath};
use crate::skbuff::SkBuff;
use crate::trace::{SimulationStep, SimulationTrace, StopReason};

/// Default sk_buff allocation used for simulation.
pub const DEFAULT_BUFFER_SIZE: usize = 2048;
/// Default initial payload size used for simulation.
pub const DEFAULT_PAYLOAD_SIZE: usize = 1000;

/// Buffer sizing for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationParams {
    /// Total sk_buff allocation in bytes.
    pub capacity: usize,
    /// Payload bytes present before any header operation.
    pub payload_size: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUFFER_SIZE,
            payload_size: DEFAULT_PAYLOAD_SIZE,
        }
    }
}

enum Phase {
    NotStarted,
    Visiting(String),
    Terminated(StopReason),
}

/// Cursor over one traversal. [`advance`](Simulator::advance) emits the next
/// step or `None` once terminated; [`run`](Simulator::run) drains the cursor
/// into a [`SimulationTrace`].
pub struct Simulator<'a> {
    path: &'a PacketPath,
    graph: PathGraph<'a>,
    skb: SkBuff,
    visited: AHashSet<String>,
    phase: Phase,
    /// Edge that led to the node about to be visited.
    pending_edge: Option<CallEdge>,
    step_number: u32,
}

impl<'a> Simulator<'a> {
    pub fn new(path: &'a PacketPath, params: SimulationParams) -> Self {
        let skb = match path.direction {
            Direction::Egress => SkBuff::with_payload(params.capacity, params.payload_size),
            Direction::Ingress => {
                SkBuff::with_frame(params.capacity, &path.arrival_frame, params.payload_size)
            }
        };
        Self {
            path,
            graph: PathGraph::new(path),
            skb,
            visited: AHashSet::new(),
            phase: Phase::NotStarted,
            pending_edge: None,
            step_number: 1,
        }
    }

    /// Why the run ended, once it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.phase {
            Phase::Terminated(reason) => Some(reason),
            _ => None,
        }
    }

    /// Visit the next function and emit its step, or `None` once the run
    /// has terminated. A refused mutation does not end the run; the step is
    /// emitted with the buffer unchanged.
    pub fn advance(&mut self) -> Option<SimulationStep> {
        let current_id = match &self.phase {
            Phase::NotStarted => self.path.entry_point.clone(),
            Phase::Visiting(id) => id.clone(),
            Phase::Terminated(_) => return None,
        };

        let Some(function) = self.graph.node(&current_id) else {
            self.phase = Phase::Terminated(StopReason::NodeMissing);
            return None;
        };
        self.visited.insert(current_id.clone());
        debug!(function = %function.id, step = self.step_number, "visiting");

        if let Some(mutation) = &function.mutation {
            self.apply(function, mutation);
        }

        let step = SimulationStep {
            step_number: self.step_number,
            function: function.clone(),
            skbuff_state: self.skb.clone(),
            edge_taken: self.pending_edge.take(),
            conntrack_state: function.conntrack.clone(),
        };
        self.step_number += 1;

        // Lowest order wins; min_by_key keeps the first of equals, so ties
        // fall back to definition order.
        let next = self
            .graph
            .outgoing(&current_id)
            .iter()
            .filter(|edge| !edge.is_error_path)
            .min_by_key(|edge| edge.order);

        match next {
            None => self.phase = Phase::Terminated(StopReason::DeadEnd),
            Some(edge) => {
                if self.visited.contains(edge.to.as_str()) {
                    self.phase = Phase::Terminated(StopReason::Revisited);
                } else {
                    self.pending_edge = Some((*edge).clone());
                    self.phase = Phase::Visiting(edge.to.clone());
                }
            }
        }

        Some(step)
    }

    /// Drain the cursor and package the result.
    pub fn run(mut self) -> SimulationTrace {
        let mut steps = Vec::with_capacity(self.graph.len());
        while let Some(step) = self.advance() {
            steps.push(step);
        }
        let stop_reason = match self.phase {
            Phase::Terminated(reason) => reason,
            // advance() only yields None once terminated
            _ => StopReason::DeadEnd,
        };
        info!(
            path = %self.path.id,
            steps = steps.len(),
            reason = ?stop_reason,
            "simulation finished"
        );
        SimulationTrace { steps, stop_reason }
    }

    fn apply(&mut self, function: &FunctionNode, mutation: &Mutation) {
        let applied = match mutation {
            // Documents the allocation site; offsets are set at construction.
            Mutation::Alloc { .. } => true,
            Mutation::Push { protocol, size } => self.skb.push(protocol.clone(), *size),
            Mutation::Pull { size, .. } => self.skb.pull(*size),
            Mutation::Put { size } => self.skb.put(*size),
        };
        if !applied {
            warn!(
                function = %function.id,
                ?mutation,
                headroom = self.skb.headroom(),
                tailroom = self.skb.tailroom(),
                "mutation refused, buffer carried forward unchanged"
            );
        }
    }
}

/// Walk `path` once with the given buffer sizing.
pub fn simulate(path: &PacketPath, params: SimulationParams) -> SimulationTrace {
    Simulator::new(path, params).run()
}
