//! Packet path definitions - the data a simulation runs over.

use serde::{Deserialize, Serialize};

use crate::function::FunctionNode;
use crate::skbuff::FrameHeader;

/// Which way the packet moves through the stack.
///
/// Direction selects the initial sk_buff layout: egress starts with a bare
/// payload and builds framing, ingress starts with the complete arrival
/// frame and strips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Egress,
    Ingress,
}

/// A directed call from one function to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEdge {
    pub from: String,
    pub to: String,
    /// Sequence number among edges with the same `from`; the simulator
    /// follows the lowest.
    pub order: u32,
    /// Error-handling branch, skipped by the simulator.
    #[serde(default)]
    pub is_error_path: bool,
    /// When this edge is taken (e.g. `"No cached route"`), empty for
    /// unconditional calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl CallEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, order: u32) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            order,
            is_error_path: false,
            condition: None,
        }
    }

    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn error_path(mut self) -> Self {
        self.is_error_path = true;
        self
    }
}

/// A complete path through the kernel networking stack: the nodes, the call
/// edges between them, and where a traversal starts and may end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketPath {
    /// Stable identifier, e.g. `"tcp_ipv4_egress"`.
    pub id: String,
    pub name: String,
    pub description: String,
    pub direction: Direction,
    /// Primary protocol of the path, e.g. `"TCP"`.
    pub protocol: String,
    pub functions: Vec<FunctionNode>,
    pub edges: Vec<CallEdge>,
    pub entry_point: String,
    pub exit_points: Vec<String>,
    /// Headers on the wire when an ingress packet enters the path,
    /// outermost first. Empty for egress paths.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arrival_frame: Vec<FrameHeader>,
}

impl PacketPath {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        direction: Direction,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            direction,
            protocol: protocol.into(),
            functions: Vec::new(),
            edges: Vec::new(),
            entry_point: String::new(),
            exit_points: Vec::new(),
            arrival_frame: Vec::new(),
        }
    }

    /// Look up a node by id in definition order.
    pub fn function(&self, id: &str) -> Option<&FunctionNode> {
        self.functions.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_wire_format() {
        assert_eq!(
            serde_json::to_string(&Direction::Egress).unwrap(),
            "\"egress\""
        );
    }

    #[test]
    fn test_edge_builders() {
        let edge = CallEdge::new("ip_output", "ip_finish_output", 0).when("Route resolved");
        assert_eq!(edge.condition.as_deref(), Some("Route resolved"));
        assert!(!edge.is_error_path);

        let err = CallEdge::new("ip_output", "kfree_skb", 1).error_path();
        assert!(err.is_error_path);
    }

    #[test]
    fn test_empty_arrival_frame_is_omitted() {
        let path = PacketPath::new("p", "P", "test path", Direction::Egress, "TCP");
        let json = serde_json::to_string(&path).unwrap();
        assert!(!json.contains("arrivalFrame"));
        assert!(json.contains("\"entryPoint\""));
    }
}
