//! Simulation output: one owned snapshot per visited function.

use serde::{Deserialize, Serialize};

use crate::conntrack::ConntrackEntry;
use crate::function::FunctionNode;
use crate::path::CallEdge;
use crate::skbuff::SkBuff;

/// Why a traversal ended.
///
/// A diagnostic, not an error: every run yields a usable, possibly
/// truncated, step sequence. `DeadEnd` is also normal completion at an
/// exit node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    /// No eligible outgoing edge from the last visited node.
    DeadEnd,
    /// An edge pointed at a node the path does not define.
    NodeMissing,
    /// The next node was already visited in this run.
    Revisited,
}

/// One visited function with the sk_buff state after its mutation.
///
/// Every step owns its data outright: the snapshot, the function record,
/// and the edge are deep copies, so later mutation of the live buffer is
/// never observable through an emitted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStep {
    /// 1-indexed position in the run.
    pub step_number: u32,
    /// The function visited at this step.
    pub function: FunctionNode,
    /// Buffer state after this step's mutation (if any) was applied.
    pub skbuff_state: SkBuff,
    /// The edge that led here. `None` exactly for the entry step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_taken: Option<CallEdge>,
    /// Conntrack sidecar of the visited function, passed through unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conntrack_state: Option<ConntrackEntry>,
}

/// The complete result of one traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationTrace {
    pub steps: Vec<SimulationStep>,
    pub stop_reason: StopReason,
}

impl SimulationTrace {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The last buffer state of the run, if any step was emitted.
    pub fn final_skbuff(&self) -> Option<&SkBuff> {
        self.steps.last().map(|s| &s.skbuff_state)
    }
}
