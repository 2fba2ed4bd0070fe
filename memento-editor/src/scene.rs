//! # Scene emission
//!
//! Per state snapshot, the core hands the host view layer a flat list of
//! draw nodes in paint order. The host draws them in order (last on top),
//! resolving image cache keys through its [`crate::store::ImageStore`].

use memento_core::{color::SeedColor, ElementId, ElementKind, Payload, Snapshot};

/// Variant-specific draw data, borrowed from the snapshot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RenderPayload<'a> {
    Text {
        text: &'a str,
        seed_color: SeedColor,
    },
    Image {
        cache_key: &'a str,
        content_description: Option<&'a str>,
    },
}

/// One drawable overlay.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderNode<'a> {
    pub id: ElementId,
    pub kind: ElementKind,
    pub offset: [f32; 2],
    pub scale: f32,
    pub rotation: f32,
    pub payload: RenderPayload<'a>,
    /// Whether this node is the one in text-focus mode; the host raises it
    /// above the dimming overlay.
    pub focused: bool,
}

/// Flatten a snapshot into draw nodes, in paint order.
#[must_use]
pub fn scene(snapshot: &Snapshot) -> smallvec::SmallVec<[RenderNode<'_>; 8]> {
    snapshot
        .elements()
        .iter()
        .map(|element| RenderNode {
            id: element.id,
            kind: element.kind(),
            offset: element.placement.offset,
            scale: element.placement.scale,
            rotation: element.placement.rotation,
            payload: match &element.payload {
                Payload::Text { text, seed_color } => RenderPayload::Text {
                    text,
                    seed_color: *seed_color,
                },
                Payload::Image(content) => RenderPayload::Image {
                    cache_key: &content.cache_key,
                    content_description: content.content_description.as_deref(),
                },
            },
            focused: snapshot.is_text_focus_active() && snapshot.focused() == Some(element.id),
        })
        .collect()
}
