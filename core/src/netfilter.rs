//! Netfilter hook annotations - where iptables/nftables rules run.

use serde::{Deserialize, Serialize};

/// The five netfilter hook points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookPoint {
    Prerouting,
    Input,
    Forward,
    Output,
    Postrouting,
}

/// A netfilter hook evaluated at a function, with the iptables tables
/// traversed there in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetfilterHook {
    pub hook: HookPoint,
    pub tables: Vec<String>,
    pub description: String,
    /// Hook priority, lower runs earlier.
    pub priority: i32,
}

impl NetfilterHook {
    fn new(hook: HookPoint, tables: &[&str], description: &str, priority: i32) -> Self {
        Self {
            hook,
            tables: tables.iter().map(|t| t.to_string()).collect(),
            description: description.to_string(),
            priority,
        }
    }

    /// OUTPUT: locally generated packets, before routing.
    pub fn output() -> Self {
        Self::new(
            HookPoint::Output,
            &["raw", "mangle", "nat", "filter"],
            "Locally generated packets. Firewall rules (iptables -A OUTPUT) are evaluated here.",
            -100,
        )
    }

    /// POSTROUTING: after routing, just before the packet leaves.
    pub fn postrouting() -> Self {
        Self::new(
            HookPoint::Postrouting,
            &["mangle", "nat"],
            "Final hook before packet leaves. SNAT/MASQUERADE applied here.",
            100,
        )
    }

    /// PREROUTING: incoming packets, before the routing decision.
    pub fn prerouting() -> Self {
        Self::new(
            HookPoint::Prerouting,
            &["raw", "mangle", "nat"],
            "First hook for incoming packets. DNAT applied here before routing.",
            -300,
        )
    }

    /// INPUT: packets destined for the local machine.
    pub fn input() -> Self {
        Self::new(
            HookPoint::Input,
            &["mangle", "filter"],
            "Packets destined for local delivery. Firewall rules (iptables -A INPUT) evaluated here.",
            0,
        )
    }

    /// FORWARD: packets routed through the machine.
    pub fn forward() -> Self {
        Self::new(
            HookPoint::Forward,
            &["mangle", "filter"],
            "Packets being forwarded/routed. Firewall rules (iptables -A FORWARD) evaluated here.",
            0,
        )
    }
}
