//! Indexed view of a packet path for traversal.

use ahash::AHashMap;

use crate::function::FunctionNode;
use crate::path::{CallEdge, PacketPath};

/// Lookup index over a [`PacketPath`]: node by id and outgoing edges by
/// source, in definition order. Built once per simulation, read-only after.
///
/// Cycles are legal here; the simulator's visited set handles them.
pub struct PathGraph<'a> {
    functions: AHashMap<&'a str, &'a FunctionNode>,
    adjacency: AHashMap<&'a str, Vec<&'a CallEdge>>,
}

impl<'a> PathGraph<'a> {
    pub fn new(path: &'a PacketPath) -> Self {
        let mut functions = AHashMap::with_capacity(path.functions.len());
        for function in &path.functions {
            functions.insert(function.id.as_str(), function);
        }

        let mut adjacency: AHashMap<&str, Vec<&CallEdge>> = AHashMap::new();
        for edge in &path.edges {
            adjacency.entry(edge.from.as_str()).or_default().push(edge);
        }

        Self {
            functions,
            adjacency,
        }
    }

    /// The node with the given id, if the path defines one.
    pub fn node(&self, id: &str) -> Option<&'a FunctionNode> {
        self.functions.get(id).copied()
    }

    /// Outgoing edges of a node in the order the path defines them.
    pub fn outgoing(&self, id: &str) -> &[&'a CallEdge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of nodes in the index.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
