//! Kernel function nodes and their sk_buff mutations.

use serde::{Deserialize, Serialize};

use crate::bpf::BpfHook;
use crate::conntrack::ConntrackEntry;
use crate::layer::Layer;
use crate::netfilter::NetfilterHook;

/// Ethernet II header, no VLAN tag.
pub const ETHERNET_HEADER_SIZE: usize = 14;
/// Minimum IPv4 header, no options.
pub const IPV4_HEADER_SIZE: usize = 20;
/// Fixed IPv6 header.
pub const IPV6_HEADER_SIZE: usize = 40;
/// Minimum TCP header, no options.
pub const TCP_HEADER_SIZE: usize = 20;
/// Fixed UDP header.
pub const UDP_HEADER_SIZE: usize = 8;
/// Minimum ICMP header.
pub const ICMP_HEADER_SIZE: usize = 8;

/// How a function changes the sk_buff, if at all.
///
/// Tagged on the wire by `operation`, e.g.
/// `{"operation":"push","protocol":"tcp","size":20}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum Mutation {
    /// sk_buff allocation site. Documents the buffer coming into existence;
    /// the simulator applies no offset change for it.
    Alloc { size: usize },
    /// Prepend a protocol header ([`SkBuff::push`](crate::SkBuff::push)).
    Push { protocol: String, size: usize },
    /// Strip the outermost header ([`SkBuff::pull`](crate::SkBuff::pull)).
    /// The protocol names the header being removed, for display.
    Pull { protocol: String, size: usize },
    /// Extend the packet tail ([`SkBuff::put`](crate::SkBuff::put)).
    Put { size: usize },
}

impl Mutation {
    pub fn push(protocol: impl Into<String>, size: usize) -> Self {
        Mutation::Push {
            protocol: protocol.into(),
            size,
        }
    }

    pub fn pull(protocol: impl Into<String>, size: usize) -> Self {
        Mutation::Pull {
            protocol: protocol.into(),
            size,
        }
    }

    pub fn put(size: usize) -> Self {
        Mutation::Put { size }
    }

    pub fn alloc(size: usize) -> Self {
        Mutation::Alloc { size }
    }
}

/// One node of the call graph: a kernel function with its location, role,
/// and annotations.
///
/// The simulator only reads `id`, `mutation`, and `conntrack`; everything
/// else is catalog metadata carried through to the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionNode {
    /// Unique identifier, the kernel symbol name (e.g. `"tcp_sendmsg"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stack layer the function belongs to.
    pub layer: Layer,
    /// Kernel source file (e.g. `"net/ipv4/tcp.c"`).
    pub source_file: String,
    /// Approximate line number in kernel 5.10.8.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// What the function does.
    pub description: String,
    /// sk_buff change applied when the simulator visits this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutation: Option<Mutation>,
    /// Netfilter hook evaluated here, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netfilter_hook: Option<NetfilterHook>,
    /// BPF attachment point here, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpf_hook: Option<BpfHook>,
    /// Connection tracking state while this function runs, if tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conntrack: Option<ConntrackEntry>,
    /// Valid starting point of a path.
    #[serde(default)]
    pub is_entry_point: bool,
    /// Point where the packet leaves the modeled stack.
    #[serde(default)]
    pub is_exit_point: bool,
}

impl FunctionNode {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        layer: Layer,
        source_file: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layer,
            source_file: source_file.into(),
            line_number: None,
            description: description.into(),
            mutation: None,
            netfilter_hook: None,
            bpf_hook: None,
            conntrack: None,
            is_entry_point: false,
            is_exit_point: false,
        }
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line_number = Some(line);
        self
    }

    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn with_netfilter(mut self, hook: NetfilterHook) -> Self {
        self.netfilter_hook = Some(hook);
        self
    }

    pub fn with_bpf(mut self, hook: BpfHook) -> Self {
        self.bpf_hook = Some(hook);
        self
    }

    pub fn with_conntrack(mut self, entry: ConntrackEntry) -> Self {
        self.conntrack = Some(entry);
        self
    }

    pub fn entry_point(mut self) -> Self {
        self.is_entry_point = true;
        self
    }

    pub fn exit_point(mut self) -> Self {
        self.is_exit_point = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_wire_tag() {
        let json = serde_json::to_string(&Mutation::push("tcp", 20)).unwrap();
        assert_eq!(json, r#"{"operation":"push","protocol":"tcp","size":20}"#);

        let json = serde_json::to_string(&Mutation::alloc(2048)).unwrap();
        assert_eq!(json, r#"{"operation":"alloc","size":2048}"#);
    }

    #[test]
    fn test_mutation_round_trip() {
        let mutation: Mutation =
            serde_json::from_str(r#"{"operation":"pull","protocol":"ethernet","size":14}"#)
                .unwrap();
        assert_eq!(mutation, Mutation::pull("ethernet", 14));
    }

    #[test]
    fn test_node_builder() {
        let node = FunctionNode::new(
            "ip_queue_xmit",
            "ip_queue_xmit()",
            Layer::Network,
            "net/ipv4/ip_output.c",
            "Builds the IP header.",
        )
        .at_line(451)
        .with_mutation(Mutation::push("ip", IPV4_HEADER_SIZE));

        assert_eq!(node.id, "ip_queue_xmit");
        assert_eq!(node.line_number, Some(451));
        assert!(!node.is_entry_point);
        assert_eq!(node.mutation, Some(Mutation::push("ip", 20)));
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let node = FunctionNode::new(
            "sock_sendmsg",
            "sock_sendmsg()",
            Layer::Socket,
            "net/socket.c",
            "Socket-level send entry.",
        );
        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("mutation"));
        assert!(!json.contains("lineNumber"));
        assert!(json.contains("\"sourceFile\":\"net/socket.c\""));
    }
}
