//! BPF attachment point annotations - XDP, TC, cgroup, and socket hooks.

use serde::{Deserialize, Serialize};

/// Where a BPF program can attach along the packet path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BpfHookType {
    Xdp,
    TcIngress,
    TcEgress,
    CgroupSkb,
    Socket,
}

/// A BPF attachment point at a function, with the verdicts a program can
/// return there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BpfHook {
    #[serde(rename = "type")]
    pub hook_type: BpfHookType,
    pub attach_point: String,
    pub description: String,
    pub actions: Vec<String>,
}

impl BpfHook {
    fn new(hook_type: BpfHookType, attach_point: &str, description: &str, actions: &[&str]) -> Self {
        Self {
            hook_type,
            attach_point: attach_point.to_string(),
            description: description.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// XDP runs in the driver, before sk_buff allocation.
    pub fn xdp() -> Self {
        Self::new(
            BpfHookType::Xdp,
            "NIC driver RX path",
            "eXpress Data Path. Runs before sk_buff allocation for maximum performance. \
             Can drop, pass, or redirect packets.",
            &["XDP_PASS", "XDP_DROP", "XDP_TX", "XDP_REDIRECT", "XDP_ABORTED"],
        )
    }

    /// TC classifier on the ingress qdisc, right after sk_buff setup.
    pub fn tc_ingress() -> Self {
        Self::new(
            BpfHookType::TcIngress,
            "Traffic Control ingress qdisc",
            "Traffic Control classifier. Can filter, modify, or redirect packets on ingress.",
            &["TC_ACT_OK", "TC_ACT_SHOT", "TC_ACT_REDIRECT", "TC_ACT_PIPE"],
        )
    }

    /// TC classifier before the packet enters the egress qdisc.
    pub fn tc_egress() -> Self {
        Self::new(
            BpfHookType::TcEgress,
            "Traffic Control egress qdisc",
            "Traffic Control classifier on egress. Can shape, filter, or redirect outgoing packets.",
            &["TC_ACT_OK", "TC_ACT_SHOT", "TC_ACT_REDIRECT", "TC_ACT_PIPE"],
        )
    }

    /// Cgroup skb hook, used for container networking policies.
    pub fn cgroup_skb(direction: &str) -> Self {
        Self::new(
            BpfHookType::CgroupSkb,
            &format!("Cgroup {direction} path"),
            "Cgroup socket buffer hook. Used for container networking policies and egress filtering.",
            &["ALLOW", "DENY"],
        )
    }

    /// Socket-level filter, before data reaches the application.
    pub fn socket() -> Self {
        Self::new(
            BpfHookType::Socket,
            "Socket layer",
            "Socket-level BPF. Can filter packets before they reach the application.",
            &["ALLOW", "DENY"],
        )
    }
}
