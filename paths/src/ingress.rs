//! TCP/IPv4 ingress - from NAPI polling up to the socket layer.

use packetscope_core::function::{
    ETHERNET_HEADER_SIZE, IPV4_HEADER_SIZE, TCP_HEADER_SIZE,
};
use packetscope_core::{
    BpfHook, CallEdge, ConntrackEntry, ConntrackState, Direction, FrameHeader, FunctionNode,
    Layer, Mutation, NetfilterHook, PacketPath,
};

/// The complete TCP over IPv4 ingress path, Linux 5.10.8: packet reception
/// from the NIC driver up through NAPI and the stack to the socket layer.
///
/// The arrival frame carries the full Ethernet/IP/TCP framing; the walk
/// strips it header by header.
pub fn tcp_ipv4_ingress() -> PacketPath {
    let established = ConntrackEntry::new(ConntrackState::Established);

    let mut path = PacketPath::new(
        "tcp_ipv4_ingress",
        "TCP/IPv4 Ingress Path",
        "The path of a TCP packet from the network interface through the kernel to user space (Linux 5.10.8)",
        Direction::Ingress,
        "TCP",
    );
    path.entry_point = "napi_poll".to_string();
    path.exit_points = vec!["sk_data_ready".to_string()];
    path.arrival_frame = vec![
        FrameHeader::new("ethernet", ETHERNET_HEADER_SIZE),
        FrameHeader::new("ip", IPV4_HEADER_SIZE),
        FrameHeader::new("tcp", TCP_HEADER_SIZE),
    ];

    path.functions = vec![
        // Driver layer - NAPI
        FunctionNode::new(
            "napi_poll",
            "napi_poll",
            Layer::Driver,
            "net/core/dev.c",
            "NAPI polling entry point. Called by softirq to process received packets from the driver's ring buffer.",
        )
        .at_line(6740)
        .entry_point(),
        FunctionNode::new(
            "napi_gro_receive",
            "napi_gro_receive",
            Layer::Driver,
            "net/core/dev.c",
            "Generic Receive Offload handler. XDP programs run here before sk_buff allocation.",
        )
        .at_line(6081)
        .with_bpf(BpfHook::xdp()),
        FunctionNode::new(
            "napi_skb_finish",
            "napi_skb_finish",
            Layer::Driver,
            "net/core/dev.c",
            "Finishes GRO processing and passes the sk_buff up the stack.",
        )
        .at_line(6052),
        // Data link layer
        FunctionNode::new(
            "netif_receive_skb",
            "netif_receive_skb",
            Layer::DataLink,
            "net/core/dev.c",
            "Main entry point for receiving packets from the driver. Timestamps and prepares the packet.",
        )
        .at_line(5583),
        FunctionNode::new(
            "netif_receive_skb_internal",
            "netif_receive_skb_internal",
            Layer::DataLink,
            "net/core/dev.c",
            "Internal receive handler. Handles RPS (Receive Packet Steering) if enabled.",
        )
        .at_line(5508),
        FunctionNode::new(
            "__netif_receive_skb",
            "__netif_receive_skb",
            Layer::DataLink,
            "net/core/dev.c",
            "Core receive function. TC ingress BPF programs and generic XDP run here.",
        )
        .at_line(5405)
        .with_bpf(BpfHook::tc_ingress()),
        FunctionNode::new(
            "__netif_receive_skb_one_core",
            "__netif_receive_skb_one_core",
            Layer::DataLink,
            "net/core/dev.c",
            "Single-core receive path. Processes packet on current CPU.",
        )
        .at_line(5303),
        FunctionNode::new(
            "__netif_receive_skb_core",
            "__netif_receive_skb_core",
            Layer::DataLink,
            "net/core/dev.c",
            "Core packet classification. Strips Ethernet header and determines protocol handler.",
        )
        .at_line(5099)
        .with_mutation(Mutation::pull("ethernet", ETHERNET_HEADER_SIZE)),
        FunctionNode::new(
            "deliver_skb",
            "deliver_skb",
            Layer::DataLink,
            "net/core/dev.c",
            "Delivers packet to the registered protocol handler (e.g., ip_rcv for IPv4).",
        )
        .at_line(2248),
        // Network layer - IP
        FunctionNode::new(
            "ip_rcv",
            "ip_rcv",
            Layer::Network,
            "net/ipv4/ip_input.c",
            "IPv4 receive entry point. Validates IP header checksum and invokes PREROUTING netfilter hook.",
        )
        .at_line(530)
        .with_netfilter(NetfilterHook::prerouting())
        .with_conntrack(established.clone()),
        FunctionNode::new(
            "ip_rcv_finish",
            "ip_rcv_finish",
            Layer::Network,
            "net/ipv4/ip_input.c",
            "Finishes IP header processing. Performs routing lookup and strips IP header.",
        )
        .at_line(414)
        .with_mutation(Mutation::pull("ip", IPV4_HEADER_SIZE)),
        FunctionNode::new(
            "ip_local_deliver",
            "ip_local_deliver",
            Layer::Network,
            "net/ipv4/ip_input.c",
            "Handles locally destined packets. Reassembles IP fragments if needed.",
        )
        .at_line(240),
        FunctionNode::new(
            "ip_local_deliver_finish",
            "ip_local_deliver_finish",
            Layer::Network,
            "net/ipv4/ip_input.c",
            "Invokes INPUT netfilter hook before passing to transport layer.",
        )
        .at_line(226)
        .with_netfilter(NetfilterHook::input())
        .with_conntrack(established.clone()),
        FunctionNode::new(
            "ip_protocol_deliver_rcu",
            "ip_protocol_deliver_rcu",
            Layer::Network,
            "net/ipv4/ip_input.c",
            "Dispatches packet to the transport protocol handler based on IP protocol field.",
        )
        .at_line(187),
        // Transport layer - TCP
        FunctionNode::new(
            "tcp_v4_rcv",
            "tcp_v4_rcv",
            Layer::Transport,
            "net/ipv4/tcp_ipv4.c",
            "TCP receive entry point. Validates TCP checksum and looks up socket.",
        )
        .at_line(1915)
        .with_conntrack(established.clone()),
        FunctionNode::new(
            "tcp_v4_do_rcv",
            "tcp_v4_do_rcv",
            Layer::Transport,
            "net/ipv4/tcp_ipv4.c",
            "Main TCP receive handler. Processes TCP header and updates connection state.",
        )
        .at_line(1655)
        .with_mutation(Mutation::pull("tcp", TCP_HEADER_SIZE))
        .with_conntrack(established.clone()),
        FunctionNode::new(
            "tcp_rcv_established",
            "tcp_rcv_established",
            Layer::Transport,
            "net/ipv4/tcp_input.c",
            "Fast path for established connections. Handles ACKs, window updates, and data.",
        )
        .at_line(5704)
        .with_conntrack(established.clone()),
        FunctionNode::new(
            "tcp_data_queue",
            "tcp_data_queue",
            Layer::Transport,
            "net/ipv4/tcp_input.c",
            "Queues received data. Handles out-of-order segments and SACK.",
        )
        .at_line(4919)
        .with_conntrack(established.clone()),
        FunctionNode::new(
            "tcp_queue_rcv",
            "tcp_queue_rcv",
            Layer::Transport,
            "net/ipv4/tcp_input.c",
            "Adds data to socket receive queue. Updates TCP receive window.",
        )
        .at_line(4837)
        .with_conntrack(established),
        // Socket layer
        FunctionNode::new(
            "sk_data_ready",
            "sk_data_ready",
            Layer::Socket,
            "net/core/sock.c",
            "Wakes up any process waiting to read from the socket. Data is now available for recv().",
        )
        .at_line(2990)
        .exit_point(),
    ];

    path.edges = vec![
        CallEdge::new("napi_poll", "napi_gro_receive", 1),
        CallEdge::new("napi_gro_receive", "napi_skb_finish", 1),
        CallEdge::new("napi_skb_finish", "netif_receive_skb", 1),
        CallEdge::new("netif_receive_skb", "netif_receive_skb_internal", 1),
        CallEdge::new("netif_receive_skb_internal", "__netif_receive_skb", 1),
        CallEdge::new("__netif_receive_skb", "__netif_receive_skb_one_core", 1),
        CallEdge::new("__netif_receive_skb_one_core", "__netif_receive_skb_core", 1),
        CallEdge::new("__netif_receive_skb_core", "deliver_skb", 1),
        CallEdge::new("deliver_skb", "ip_rcv", 1).when("Protocol is IPv4"),
        CallEdge::new("ip_rcv", "ip_rcv_finish", 1),
        CallEdge::new("ip_rcv_finish", "ip_local_deliver", 1).when("Destination is local"),
        CallEdge::new("ip_local_deliver", "ip_local_deliver_finish", 1),
        CallEdge::new("ip_local_deliver_finish", "ip_protocol_deliver_rcu", 1),
        CallEdge::new("ip_protocol_deliver_rcu", "tcp_v4_rcv", 1).when("Protocol is TCP"),
        CallEdge::new("tcp_v4_rcv", "tcp_v4_do_rcv", 1).when("Socket found"),
        CallEdge::new("tcp_v4_do_rcv", "tcp_rcv_established", 1).when("Connection established"),
        CallEdge::new("tcp_rcv_established", "tcp_data_queue", 1).when("Has data"),
        CallEdge::new("tcp_data_queue", "tcp_queue_rcv", 1),
        CallEdge::new("tcp_queue_rcv", "sk_data_ready", 1),
    ];

    path
}
