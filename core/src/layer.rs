//! Kernel stack layers - the vertical tiers of the rendered diagram.
//!
//! Every label, short id, CSS class, and rendering order lives here; nothing
//! else in the workspace spells out a layer string.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A layer of the Linux kernel networking stack.
///
/// Serialized by display label (e.g. `"Transport Layer"`), which is what the
/// frontend matches on. Unknown labels fail deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Syscall interface: `write()`, `sendto()`, `sendmsg()`.
    UserSpace,
    /// Socket abstraction, where the socket API meets protocol code.
    Socket,
    /// L4: TCP, UDP, SCTP.
    Transport,
    /// L3: IPv4, IPv6 routing and output.
    Network,
    /// L2: qdisc and neighbor subsystem.
    DataLink,
    /// Device drivers handing the packet to the NIC.
    Driver,
}

impl Layer {
    /// All layers in rendering order, top of the diagram first.
    pub const ALL: [Layer; 6] = [
        Layer::UserSpace,
        Layer::Socket,
        Layer::Transport,
        Layer::Network,
        Layer::DataLink,
        Layer::Driver,
    ];

    /// Display label, also the wire representation.
    pub fn label(&self) -> &'static str {
        match self {
            Layer::UserSpace => "User Space",
            Layer::Socket => "Socket Layer",
            Layer::Transport => "Transport Layer",
            Layer::Network => "Network Layer",
            Layer::DataLink => "Data Link Layer",
            Layer::Driver => "Device Driver",
        }
    }

    /// Short identifier used in the contract metadata.
    pub fn short_id(&self) -> &'static str {
        match self {
            Layer::UserSpace => "user",
            Layer::Socket => "socket",
            Layer::Transport => "transport",
            Layer::Network => "network",
            Layer::DataLink => "datalink",
            Layer::Driver => "driver",
        }
    }

    /// CSS class the frontend styles the tier with.
    pub fn css_class(&self) -> &'static str {
        match self {
            Layer::UserSpace => "layer-user",
            Layer::Socket => "layer-socket",
            Layer::Transport => "layer-transport",
            Layer::Network => "layer-network",
            Layer::DataLink => "layer-datalink",
            Layer::Driver => "layer-driver",
        }
    }

    /// Rendering order, 0 = top of the diagram.
    pub fn order(&self) -> usize {
        match self {
            Layer::UserSpace => 0,
            Layer::Socket => 1,
            Layer::Transport => 2,
            Layer::Network => 3,
            Layer::DataLink => 4,
            Layer::Driver => 5,
        }
    }

    /// Parse a display label back into a layer.
    pub fn from_label(label: &str) -> Option<Layer> {
        Layer::ALL.into_iter().find(|l| l.label() == label)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Layer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Layer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelVisitor;

        impl Visitor<'_> for LabelVisitor {
            type Value = Layer;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a kernel layer label such as \"Transport Layer\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Layer, E> {
                Layer::from_label(value)
                    .ok_or_else(|| E::custom(format!("unknown kernel layer label: {value:?}")))
            }
        }

        deserializer.deserialize_str(LabelVisitor)
    }
}
