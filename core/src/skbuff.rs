//! SkBuff - the sk_buff memory-layout model.
//!
//! Four offsets into a fixed-capacity byte window describe where the packet
//! lives inside its allocation:
//!
//! ```text
//! +------------------+ <- head
//! |     headroom     |    room for prepending headers
//! +------------------+ <- data
//! |   packet bytes   |
//! +------------------+ <- tail
//! |     tailroom     |    room for appending data
//! +------------------+ <- end
//! ```
//!
//! On egress the stack builds framing outward-in: each layer prepends its
//! header, moving `data` back toward `head`. On ingress the frame arrives
//! complete and each layer strips its header, moving `data` toward `tail`.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One protocol header currently present in the buffer.
///
/// `offset` is relative to the `data` offset, so the outermost header always
/// sits at offset 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSegment {
    pub protocol: String,
    pub offset: usize,
    pub size: usize,
}

impl HeaderSegment {
    pub fn new(protocol: impl Into<String>, offset: usize, size: usize) -> Self {
        Self {
            protocol: protocol.into(),
            offset,
            size,
        }
    }
}

/// A header of an arrival frame: what is on the wire when an ingress packet
/// enters the stack, outermost first. Offsets are derived at buffer setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
    pub protocol: String,
    pub size: usize,
}

impl FrameHeader {
    pub fn new(protocol: impl Into<String>, size: usize) -> Self {
        Self {
            protocol: protocol.into(),
            size,
        }
    }
}

/// The sk_buff model: offsets plus the ordered list of headers between
/// `data` and `tail` (outermost to innermost).
///
/// Invariant: `head <= data <= tail <= end` for every reachable value. The
/// mutating operations preserve it by refusing (returning `false`) rather
/// than moving an offset out of bounds; a refused operation leaves the value
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkBuff {
    /// Start of the allocation. Fixed after construction.
    pub head: usize,
    /// Start of the packet bytes. Moves backward on push, forward on pull.
    pub data: usize,
    /// End of the packet bytes. Moves forward on put.
    pub tail: usize,
    /// End of the allocation. Fixed after construction.
    pub end: usize,
    /// Headers currently present, outermost to innermost.
    pub layers: Vec<HeaderSegment>,
}

impl SkBuff {
    /// Egress layout: the payload sits at the very end of the buffer so that
    /// every byte before it is headroom for the headers pushed on the way
    /// down the stack.
    pub fn with_payload(capacity: usize, payload_size: usize) -> Self {
        let payload = if payload_size > capacity {
            warn!(capacity, payload_size, "payload larger than buffer, clamping");
            capacity
        } else {
            payload_size
        };
        Self {
            head: 0,
            data: capacity - payload,
            tail: capacity,
            end: capacity,
            layers: Vec::new(),
        }
    }

    /// Ingress layout: the frame is already complete at the front of the
    /// buffer, headers pre-populated outermost-first at their natural
    /// offsets, payload behind them.
    pub fn with_frame(capacity: usize, frame: &[FrameHeader], payload_size: usize) -> Self {
        let mut layers = Vec::with_capacity(frame.len());
        let mut offset = 0;
        for header in frame {
            layers.push(HeaderSegment::new(header.protocol.clone(), offset, header.size));
            offset += header.size;
        }
        let mut tail = offset + payload_size;
        if tail > capacity {
            warn!(capacity, tail, "arrival frame larger than buffer, clamping");
            tail = capacity;
        }
        Self {
            head: 0,
            data: 0,
            tail,
            end: capacity,
            layers,
        }
    }

    /// Prepend a header: `data` moves back by `size` and the new segment
    /// becomes the outermost layer. Fails (state unchanged) when the
    /// headroom is smaller than `size`.
    pub fn push(&mut self, protocol: impl Into<String>, size: usize) -> bool {
        let new_data = match self.data.checked_sub(size) {
            Some(d) if d >= self.head => d,
            _ => return false,
        };
        self.data = new_data;
        for layer in &mut self.layers {
            layer.offset += size;
        }
        self.layers.insert(0, HeaderSegment::new(protocol, 0, size));
        true
    }

    /// Strip the front of the packet: `data` moves forward by `size` and the
    /// outermost segment is removed. Fails (state unchanged) when the move
    /// would pass `tail`.
    pub fn pull(&mut self, size: usize) -> bool {
        let new_data = match self.data.checked_add(size) {
            Some(d) if d <= self.tail => d,
            _ => return false,
        };
        self.data = new_data;
        if !self.layers.is_empty() {
            let removed = self.layers.remove(0);
            if removed.size != size {
                warn!(
                    protocol = %removed.protocol,
                    header_size = removed.size,
                    pulled = size,
                    "pull size differs from the outermost header"
                );
            }
            for layer in &mut self.layers {
                layer.offset = layer.offset.saturating_sub(size);
            }
        }
        true
    }

    /// Append room at the end of the packet: `tail` moves forward by `size`.
    /// Fails (state unchanged) when the tailroom is smaller than `size`.
    pub fn put(&mut self, size: usize) -> bool {
        let new_tail = match self.tail.checked_add(size) {
            Some(t) if t <= self.end => t,
            _ => return false,
        };
        self.tail = new_tail;
        true
    }

    /// Free space before `data`.
    pub fn headroom(&self) -> usize {
        self.data - self.head
    }

    /// Free space after `tail`.
    pub fn tailroom(&self) -> usize {
        self.end - self.tail
    }

    /// Current packet length, `data` to `tail`.
    pub fn len(&self) -> usize {
        self.tail - self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data == self.tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_offsets_ordered(skb: &SkBuff) {
        assert!(skb.head <= skb.data);
        assert!(skb.data <= skb.tail);
        assert!(skb.tail <= skb.end);
    }

    #[test]
    fn test_payload_layout() {
        let skb = SkBuff::with_payload(2048, 1000);
        assert_eq!(skb.head, 0);
        assert_eq!(skb.data, 1048);
        assert_eq!(skb.tail, 2048);
        assert_eq!(skb.end, 2048);
        assert!(skb.layers.is_empty());
        assert_eq!(skb.len(), 1000);
        assert_eq!(skb.headroom(), 1048);
        assert_eq!(skb.tailroom(), 0);
        assert_offsets_ordered(&skb);
    }

    #[test]
    fn test_push_moves_data_back() {
        let mut skb = SkBuff::with_payload(2048, 1000);
        assert!(skb.push("tcp", 20));
        assert_eq!(skb.data, 1028);
        assert_eq!(skb.layers, vec![HeaderSegment::new("tcp", 0, 20)]);
        assert_offsets_ordered(&skb);
    }

    #[test]
    fn test_push_stacks_headers_outermost_first() {
        let mut skb = SkBuff::with_payload(2048, 1000);
        assert!(skb.push("tcp", 20));
        assert!(skb.push("ip", 20));
        assert!(skb.push("ethernet", 14));
        assert_eq!(skb.data, 994);
        assert_eq!(
            skb.layers,
            vec![
                HeaderSegment::new("ethernet", 0, 14),
                HeaderSegment::new("ip", 14, 20),
                HeaderSegment::new("tcp", 34, 20),
            ]
        );
    }

    #[test]
    fn test_frame_layout_and_pull() {
        let frame = [
            FrameHeader::new("ethernet", 14),
            FrameHeader::new("ip", 20),
            FrameHeader::new("tcp", 20),
        ];
        let mut skb = SkBuff::with_frame(2048, &frame, 1000);
        assert_eq!(skb.data, 0);
        assert_eq!(skb.tail, 1054);
        assert_eq!(
            skb.layers,
            vec![
                HeaderSegment::new("ethernet", 0, 14),
                HeaderSegment::new("ip", 14, 20),
                HeaderSegment::new("tcp", 34, 20),
            ]
        );

        assert!(skb.pull(14));
        assert_eq!(skb.data, 14);
        assert_eq!(
            skb.layers,
            vec![
                HeaderSegment::new("ip", 0, 20),
                HeaderSegment::new("tcp", 20, 20),
            ]
        );
        assert_offsets_ordered(&skb);
    }

    #[test]
    fn test_push_without_headroom_is_refused() {
        let mut skb = SkBuff::with_payload(100, 90);
        let before = skb.clone();
        assert!(!skb.push("ip", 20));
        assert_eq!(skb, before);
    }

    #[test]
    fn test_pull_past_tail_is_refused() {
        let mut skb = SkBuff::with_payload(100, 10);
        let before = skb.clone();
        assert!(!skb.pull(11));
        assert_eq!(skb, before);
    }

    #[test]
    fn test_put_without_tailroom_is_refused() {
        let mut skb = SkBuff::with_payload(2048, 1000);
        let before = skb.clone();
        assert!(!skb.put(1));
        assert_eq!(skb, before);
    }

    #[test]
    fn test_put_extends_tail() {
        let mut skb = SkBuff::with_frame(2048, &[], 100);
        assert!(skb.put(50));
        assert_eq!(skb.tail, 150);
        assert_eq!(skb.len(), 150);
    }

    #[test]
    fn test_push_then_pull_round_trips() {
        let mut skb = SkBuff::with_payload(2048, 1000);
        skb.push("tcp", 20);
        let before = skb.clone();
        assert!(skb.push("ip", 20));
        assert!(skb.pull(20));
        assert_eq!(skb, before);
    }

    #[test]
    fn test_clone_owns_its_layers() {
        let mut skb = SkBuff::with_payload(2048, 1000);
        skb.push("tcp", 20);
        let snapshot = skb.clone();
        skb.push("ip", 20);
        assert_eq!(snapshot.layers.len(), 1);
        assert_eq!(snapshot.layers[0].offset, 0);
        assert_eq!(snapshot.data, 1028);
    }

    #[test]
    fn test_oversized_payload_is_clamped() {
        let skb = SkBuff::with_payload(100, 500);
        assert_eq!(skb.data, 0);
        assert_eq!(skb.tail, 100);
        assert_offsets_ordered(&skb);
    }
}
