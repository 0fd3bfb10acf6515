//! Rendering metadata bundled with the contract.

use std::collections::BTreeMap;

use packetscope_core::Layer;
use packetscope_core::function::{
    ETHERNET_HEADER_SIZE, ICMP_HEADER_SIZE, IPV4_HEADER_SIZE, IPV6_HEADER_SIZE, TCP_HEADER_SIZE,
    UDP_HEADER_SIZE,
};
use serde::{Deserialize, Serialize};

use crate::options::ExportOptions;

/// How the frontend renders one stack layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfo {
    pub id: String,
    pub name: String,
    pub css_class: String,
    pub order: usize,
}

impl LayerInfo {
    pub fn of(layer: Layer) -> Self {
        Self {
            id: layer.short_id().to_string(),
            name: layer.label().to_string(),
            css_class: layer.css_class().to_string(),
            order: layer.order(),
        }
    }
}

/// All layers in rendering order.
pub fn layer_infos() -> Vec<LayerInfo> {
    Layer::ALL.into_iter().map(LayerInfo::of).collect()
}

/// Protocol name to header size, ordered so the JSON is byte-stable.
pub fn header_size_table() -> BTreeMap<&'static str, usize> {
    BTreeMap::from([
        ("ethernet", ETHERNET_HEADER_SIZE),
        ("ip", IPV4_HEADER_SIZE),
        ("ipv6", IPV6_HEADER_SIZE),
        ("tcp", TCP_HEADER_SIZE),
        ("udp", UDP_HEADER_SIZE),
        ("icmp", ICMP_HEADER_SIZE),
    ])
}

/// The `metadata` section of the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    pub layers: Vec<LayerInfo>,
    pub header_sizes: BTreeMap<String, usize>,
    pub buffer_size: usize,
    pub payload_size: usize,
}

impl ContractMetadata {
    pub fn new(options: &ExportOptions) -> Self {
        Self {
            layers: layer_infos(),
            header_sizes: header_size_table()
                .into_iter()
                .map(|(name, size)| (name.to_string(), size))
                .collect(),
            buffer_size: options.buffer_size,
            payload_size: options.payload_size,
        }
    }
}
