//! # Elements
//! The overlay element sum type: a text overlay or a cache-indirected image
//! overlay, each an immutable snapshot of `id + placement + payload`.
//!
//! Every update here is copy-update: a method consumes the element and returns
//! a fresh value, so a reader holding an older list snapshot can never observe
//! a half-updated element.

use crate::{color::SeedColor, id::ElementId, transform::Placement};

/// Which variant an element is. List order, not kind, decides paint order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, strum::Display, strum::AsRefStr)]
pub enum ElementKind {
    Text,
    Image,
}

/// Renderable content of an image overlay.
///
/// The pixels themselves live in an external image store; the overlay only
/// carries the key to resolve them, which is what keeps image overlays fully
/// serializable.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ImageContent {
    pub cache_key: String,
    pub content_description: Option<String>,
}

impl ImageContent {
    #[must_use]
    pub fn new(cache_key: impl Into<String>) -> Self {
        Self {
            cache_key: cache_key.into(),
            content_description: None,
        }
    }
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.content_description = Some(description.into());
        self
    }
}

/// Variant-specific element data.
#[derive(Clone, PartialEq, Debug)]
pub enum Payload {
    Text { text: String, seed_color: SeedColor },
    Image(ImageContent),
}

impl Payload {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text { .. } => ElementKind::Text,
            Self::Image(_) => ElementKind::Image,
        }
    }
}

/// One overlay element. Immutable; all updates return a new value.
#[derive(Clone, PartialEq, Debug)]
pub struct Element {
    pub id: ElementId,
    pub placement: Placement,
    pub payload: Payload,
}

impl Element {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.payload.kind()
    }
    /// New value at an absolute position. Id, scale and rotation are untouched.
    #[must_use]
    pub fn moved_to(self, offset: [f32; 2]) -> Self {
        Self {
            placement: self.placement.moved_to(offset),
            ..self
        }
    }
    /// New value shifted by a drag delta. Id, scale and rotation are untouched.
    #[must_use]
    pub fn translated(self, by: [f32; 2]) -> Self {
        Self {
            placement: self.placement.translated(by),
            ..self
        }
    }
    /// New value with the scale multiplied. Position is untouched.
    #[must_use]
    pub fn scaled_by(self, factor: f32) -> Self {
        Self {
            placement: self.placement.scaled_by(factor),
            ..self
        }
    }
    /// New value at an absolute scale. Position is untouched.
    #[must_use]
    pub fn scaled_to(self, scale: f32) -> Self {
        Self {
            placement: self.placement.scaled_to(scale),
            ..self
        }
    }
    /// New value at an absolute rotation. Position is untouched.
    #[must_use]
    pub fn rotated_to(self, degrees: f32) -> Self {
        Self {
            placement: self.placement.rotated_to(degrees),
            ..self
        }
    }
    /// New value with replaced text content, or `None` for an image overlay.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Option<Self> {
        match self.payload {
            Payload::Text { seed_color, .. } => Some(Self {
                payload: Payload::Text {
                    text: text.into(),
                    seed_color,
                },
                ..self
            }),
            Payload::Image(_) => None,
        }
    }
    /// New value with a replaced seed color, or `None` for an image overlay.
    #[must_use]
    pub fn with_seed_color(self, seed_color: SeedColor) -> Option<Self> {
        match self.payload {
            Payload::Text { text, .. } => Some(Self {
                payload: Payload::Text { text, seed_color },
                ..self
            }),
            Payload::Image(_) => None,
        }
    }
}
