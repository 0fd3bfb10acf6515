//! Packetscope path catalogs - the built-in kernel packet paths.
//!
//! Catalog data is fixed at build time and based on Linux 5.10.8 sources:
//! function locations, call edges, sk_buff mutations, and the netfilter,
//! BPF, and conntrack annotations a frontend renders alongside them.

use packetscope_core::PacketPath;

pub mod egress;
pub mod ingress;

pub mod prelude {
    pub use crate::builtin_paths;
    pub use crate::egress::tcp_ipv4_egress;
    pub use crate::ingress::tcp_ipv4_ingress;
}

pub use egress::tcp_ipv4_egress;
pub use ingress::tcp_ipv4_ingress;

/// All built-in paths in export order.
pub fn builtin_paths() -> Vec<PacketPath> {
    vec![tcp_ipv4_egress(), tcp_ipv4_ingress()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use packetscope_core::{Layer, SimulationParams, StopReason, simulate};

    /// Every edge endpoint, the entry point, and every exit point must name
    /// a defined function, with the matching role flags set.
    fn assert_catalog_integrity(path: &PacketPath) {
        for edge in &path.edges {
            assert!(
                path.function(&edge.from).is_some(),
                "{}: edge from undefined function {}",
                path.id,
                edge.from
            );
            assert!(
                path.function(&edge.to).is_some(),
                "{}: edge to undefined function {}",
                path.id,
                edge.to
            );
        }
        let entry = path
            .function(&path.entry_point)
            .unwrap_or_else(|| panic!("{}: entry point undefined", path.id));
        assert!(entry.is_entry_point);
        for exit in &path.exit_points {
            let function = path
                .function(exit)
                .unwrap_or_else(|| panic!("{}: exit point {} undefined", path.id, exit));
            assert!(function.is_exit_point);
        }
    }

    #[test]
    fn test_egress_catalog_is_consistent() {
        let path = tcp_ipv4_egress();
        assert_catalog_integrity(&path);
        assert_eq!(path.functions.len(), 21);
        assert_eq!(path.edges.len(), 20);
    }

    #[test]
    fn test_ingress_catalog_is_consistent() {
        let path = tcp_ipv4_ingress();
        assert_catalog_integrity(&path);
        assert_eq!(path.functions.len(), 20);
        assert_eq!(path.edges.len(), 19);
        assert_eq!(path.arrival_frame.len(), 3);
    }

    #[test]
    fn test_egress_walk_builds_the_full_frame() {
        let path = tcp_ipv4_egress();
        let trace = simulate(&path, SimulationParams::default());

        assert_eq!(trace.len(), 21);
        assert_eq!(trace.stop_reason, StopReason::DeadEnd);
        assert_eq!(trace.steps.last().unwrap().function.id, "ndo_start_xmit");

        let skb = trace.final_skbuff().unwrap();
        assert_eq!(skb.data, 994);
        assert_eq!(skb.tail, 2048);
        let layers: Vec<_> = skb
            .layers
            .iter()
            .map(|l| (l.protocol.as_str(), l.offset, l.size))
            .collect();
        assert_eq!(
            layers,
            [("ethernet", 0, 14), ("ip", 14, 20), ("tcp", 34, 20)]
        );
    }

    #[test]
    fn test_ingress_walk_strips_the_full_frame() {
        let path = tcp_ipv4_ingress();
        let trace = simulate(&path, SimulationParams::default());

        assert_eq!(trace.len(), 20);
        assert_eq!(trace.stop_reason, StopReason::DeadEnd);
        assert_eq!(trace.steps.last().unwrap().function.id, "sk_data_ready");

        let skb = trace.final_skbuff().unwrap();
        assert!(skb.layers.is_empty());
        assert_eq!(skb.len(), 1000);
    }

    #[test]
    fn test_ingress_headers_come_off_outermost_first() {
        let path = tcp_ipv4_ingress();
        let trace = simulate(&path, SimulationParams::default());

        let after_ethernet = trace
            .steps
            .iter()
            .find(|s| s.function.id == "__netif_receive_skb_core")
            .unwrap();
        assert_eq!(after_ethernet.skbuff_state.data, 14);
        assert_eq!(after_ethernet.skbuff_state.layers[0].protocol, "ip");

        let after_ip = trace
            .steps
            .iter()
            .find(|s| s.function.id == "ip_rcv_finish")
            .unwrap();
        assert_eq!(after_ip.skbuff_state.data, 34);
        assert_eq!(after_ip.skbuff_state.layers[0].protocol, "tcp");
    }

    #[test]
    fn test_tcp_functions_carry_the_established_state() {
        for path in builtin_paths() {
            for function in path
                .functions
                .iter()
                .filter(|f| f.layer == Layer::Transport)
            {
                assert!(
                    function.conntrack.is_some(),
                    "{}: {} has no conntrack entry",
                    path.id,
                    function.id
                );
            }
        }
    }

    #[test]
    fn test_builtin_paths_egress_first() {
        let paths = builtin_paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].id, "tcp_ipv4_egress");
        assert_eq!(paths[1].id, "tcp_ipv4_ingress");
    }
}
