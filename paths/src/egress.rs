//! TCP/IPv4 egress - from `tcp_sendmsg` down to the NIC driver.

use packetscope_core::function::{
    ETHERNET_HEADER_SIZE, IPV4_HEADER_SIZE, TCP_HEADER_SIZE,
};
use packetscope_core::{
    BpfHook, CallEdge, ConntrackEntry, ConntrackState, Direction, FunctionNode, Layer, Mutation,
    NetfilterHook, PacketPath,
};

/// The complete TCP over IPv4 egress path, Linux 5.10.8: a socket send from
/// the initial `tcp_sendmsg` call down to the driver's transmit function.
pub fn tcp_ipv4_egress() -> PacketPath {
    let established = ConntrackEntry::new(ConntrackState::Established);

    let mut path = PacketPath::new(
        "tcp_ipv4_egress",
        "TCP/IPv4 Egress Path",
        "The path of a TCP packet from user space through the kernel to the network interface (Linux 5.10.8)",
        Direction::Egress,
        "TCP",
    );
    path.entry_point = "tcp_sendmsg".to_string();
    path.exit_points = vec!["ndo_start_xmit".to_string()];

    path.functions = vec![
        // Transport layer - TCP
        FunctionNode::new(
            "tcp_sendmsg",
            "tcp_sendmsg",
            Layer::Transport,
            "net/ipv4/tcp.c",
            "Entry point for TCP send operations. Acquires socket lock and delegates to tcp_sendmsg_locked.",
        )
        .at_line(1434)
        .with_conntrack(established.clone())
        .entry_point(),
        FunctionNode::new(
            "tcp_sendmsg_locked",
            "tcp_sendmsg_locked",
            Layer::Transport,
            "net/ipv4/tcp.c",
            "Core TCP send logic. Allocates sk_buff and copies user data into kernel space.",
        )
        .at_line(1172)
        .with_mutation(Mutation::alloc(2048))
        .with_conntrack(established.clone()),
        FunctionNode::new(
            "tcp_push",
            "tcp_push",
            Layer::Transport,
            "net/ipv4/tcp.c",
            "Pushes pending data. Sets PSH flag if socket is being closed or buffer is full.",
        )
        .at_line(689)
        .with_conntrack(established.clone()),
        FunctionNode::new(
            "__tcp_push_pending_frames",
            "__tcp_push_pending_frames",
            Layer::Transport,
            "net/ipv4/tcp_output.c",
            "Checks if there is data to send and initiates transmission.",
        )
        .at_line(2556)
        .with_conntrack(established.clone()),
        FunctionNode::new(
            "tcp_write_xmit",
            "tcp_write_xmit",
            Layer::Transport,
            "net/ipv4/tcp_output.c",
            "Main TCP transmission loop. Handles congestion control, pacing, and TSO segmentation.",
        )
        .at_line(2387)
        .with_conntrack(established.clone()),
        FunctionNode::new(
            "__tcp_transmit_skb",
            "__tcp_transmit_skb",
            Layer::Transport,
            "net/ipv4/tcp_output.c",
            "Builds the TCP header. Calculates checksum and sets sequence numbers.",
        )
        .at_line(1164)
        .with_mutation(Mutation::push("tcp", TCP_HEADER_SIZE))
        .with_conntrack(established.clone()),
        // Network layer - IP
        FunctionNode::new(
            "ip_queue_xmit",
            "ip_queue_xmit",
            Layer::Network,
            "net/ipv4/ip_output.c",
            "Main IPv4 transmission entry point from transport layer. Handles routing lookup and IP header construction.",
        )
        .at_line(470)
        .with_mutation(Mutation::push("ip", IPV4_HEADER_SIZE)),
        FunctionNode::new(
            "ip_local_out",
            "ip_local_out",
            Layer::Network,
            "net/ipv4/ip_output.c",
            "Wrapper for locally generated packets. Calls __ip_local_out.",
        )
        .at_line(115),
        FunctionNode::new(
            "__ip_local_out",
            "__ip_local_out",
            Layer::Network,
            "net/ipv4/ip_output.c",
            "Sets IP packet length and checksum. Invokes LOCAL_OUT netfilter hook.",
        )
        .at_line(96)
        .with_netfilter(NetfilterHook::output())
        .with_conntrack(established.clone()),
        FunctionNode::new(
            "ip_output",
            "ip_output",
            Layer::Network,
            "net/ipv4/ip_output.c",
            "Called after LOCAL_OUT hook. Invokes POST_ROUTING netfilter hook.",
        )
        .at_line(413)
        .with_netfilter(NetfilterHook::postrouting())
        .with_conntrack(established),
        FunctionNode::new(
            "ip_finish_output",
            "ip_finish_output",
            Layer::Network,
            "net/ipv4/ip_output.c",
            "BPF cgroup egress hook point. Handles GSO segmentation if needed.",
        )
        .at_line(311)
        .with_bpf(BpfHook::cgroup_skb("egress")),
        FunctionNode::new(
            "__ip_finish_output",
            "__ip_finish_output",
            Layer::Network,
            "net/ipv4/ip_output.c",
            "Checks MTU and fragments packet if necessary.",
        )
        .at_line(287),
        FunctionNode::new(
            "ip_finish_output2",
            "ip_finish_output2",
            Layer::Network,
            "net/ipv4/ip_output.c",
            "Resolves next-hop neighbor (ARP lookup) and prepares for L2 transmission.",
        )
        .at_line(187),
        FunctionNode::new(
            "neigh_output",
            "neigh_output",
            Layer::Network,
            "include/net/neighbour.h",
            "Neighbour subsystem output. Uses cached hardware header if available.",
        )
        .at_line(510),
        FunctionNode::new(
            "neigh_hh_output",
            "neigh_hh_output",
            Layer::DataLink,
            "include/net/neighbour.h",
            "Fast path using cached hardware header. Pushes Ethernet header.",
        )
        .at_line(490)
        .with_mutation(Mutation::push("ethernet", ETHERNET_HEADER_SIZE)),
        // Data link layer - queueing discipline
        FunctionNode::new(
            "dev_queue_xmit",
            "dev_queue_xmit",
            Layer::DataLink,
            "net/core/dev.c",
            "Main device transmission entry point. Handles per-CPU processing.",
        )
        .at_line(4044),
        FunctionNode::new(
            "__dev_queue_xmit",
            "__dev_queue_xmit",
            Layer::DataLink,
            "net/core/dev.c",
            "Core queuing logic. TC egress BPF programs run here before qdisc.",
        )
        .at_line(3954)
        .with_bpf(BpfHook::tc_egress()),
        FunctionNode::new(
            "__dev_xmit_skb",
            "__dev_xmit_skb",
            Layer::DataLink,
            "net/core/dev.c",
            "Submits packet to qdisc. May queue or directly transmit based on qdisc state.",
        )
        .at_line(3683),
        FunctionNode::new(
            "sch_direct_xmit",
            "sch_direct_xmit",
            Layer::DataLink,
            "net/sched/sch_generic.c",
            "Bypasses qdisc queue for direct transmission when possible.",
        )
        .at_line(310),
        // Driver layer
        FunctionNode::new(
            "dev_hard_start_xmit",
            "dev_hard_start_xmit",
            Layer::Driver,
            "net/core/dev.c",
            "Final generic layer before driver. Handles XDP and calls driver's ndo_start_xmit.",
        )
        .at_line(3506),
        FunctionNode::new(
            "ndo_start_xmit",
            "ndo_start_xmit",
            Layer::Driver,
            "include/linux/netdevice.h",
            "Driver-specific transmit function. Pointer to actual driver implementation (e.g., e1000, virtio-net).",
        )
        .at_line(1298)
        .exit_point(),
    ];

    path.edges = vec![
        CallEdge::new("tcp_sendmsg", "tcp_sendmsg_locked", 1),
        CallEdge::new("tcp_sendmsg_locked", "tcp_push", 1),
        CallEdge::new("tcp_push", "__tcp_push_pending_frames", 1),
        CallEdge::new("__tcp_push_pending_frames", "tcp_write_xmit", 1),
        CallEdge::new("tcp_write_xmit", "__tcp_transmit_skb", 1),
        CallEdge::new("__tcp_transmit_skb", "ip_queue_xmit", 1),
        CallEdge::new("ip_queue_xmit", "ip_local_out", 1),
        CallEdge::new("ip_local_out", "__ip_local_out", 1),
        CallEdge::new("__ip_local_out", "ip_output", 1),
        CallEdge::new("ip_output", "ip_finish_output", 1),
        CallEdge::new("ip_finish_output", "__ip_finish_output", 1),
        CallEdge::new("__ip_finish_output", "ip_finish_output2", 1),
        CallEdge::new("ip_finish_output2", "neigh_output", 1),
        CallEdge::new("neigh_output", "neigh_hh_output", 1).when("Hardware header cached"),
        CallEdge::new("neigh_hh_output", "dev_queue_xmit", 1),
        CallEdge::new("dev_queue_xmit", "__dev_queue_xmit", 1),
        CallEdge::new("__dev_queue_xmit", "__dev_xmit_skb", 1),
        CallEdge::new("__dev_xmit_skb", "sch_direct_xmit", 1).when("Direct transmit allowed"),
        CallEdge::new("sch_direct_xmit", "dev_hard_start_xmit", 1),
        CallEdge::new("dev_hard_start_xmit", "ndo_start_xmit", 1),
    ];

    path
}
