//! # Save / restore
//!
//! Flat-map codec for process-death survival. Each element becomes one
//! string-keyed map tagged with `type`; text overlays carry their content and
//! seed color, image overlays carry the cache key and content description of
//! the cache-indirected schema, so both variants restore without loss.
//!
//! Restore is total over this encoding's own vocabulary only: an unknown
//! `type` tag or a malformed record is a typed, fatal error. Hosts are
//! expected to fall back to an empty canvas on a corrupt blob rather than
//! refuse to start.

use crate::{
    color::SeedColor,
    element::{Element, ImageContent, Payload},
    id::ElementId,
    transform::Placement,
};

/// One persisted element record. Serializes as a map with a `type` tag and
/// camelCase keys, matching the historic on-disk shape.
#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum SavedElement {
    #[serde(rename_all = "camelCase")]
    Text {
        id: u32,
        offset_x: f32,
        offset_y: f32,
        scale: f32,
        rotation: f32,
        text: String,
        color: SeedColor,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        id: u32,
        offset_x: f32,
        offset_y: f32,
        scale: f32,
        rotation: f32,
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_description: Option<String>,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum RestoreError {
    #[error("unknown overlay kind {0:?}")]
    UnknownKind(String),
    #[error("record is missing its \"type\" tag")]
    MissingKind,
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid element id {0}")]
    InvalidId(u32),
}

/// Serialize a list of elements, preserving paint order.
#[must_use]
pub fn save(elements: &[Element]) -> Vec<SavedElement> {
    elements
        .iter()
        .map(|element| {
            let Placement {
                offset: [offset_x, offset_y],
                scale,
                rotation,
            } = element.placement;
            match &element.payload {
                Payload::Text { text, seed_color } => SavedElement::Text {
                    id: element.id.get(),
                    offset_x,
                    offset_y,
                    scale,
                    rotation,
                    text: text.clone(),
                    color: *seed_color,
                },
                Payload::Image(content) => SavedElement::Image {
                    id: element.id.get(),
                    offset_x,
                    offset_y,
                    scale,
                    rotation,
                    key: content.cache_key.clone(),
                    content_description: content.content_description.clone(),
                },
            }
        })
        .collect()
}

/// Rebuild elements from persisted records, preserving order.
pub fn restore(saved: Vec<SavedElement>) -> Result<Vec<Element>, RestoreError> {
    saved
        .into_iter()
        .map(|record| {
            let (id, placement, payload) = match record {
                SavedElement::Text {
                    id,
                    offset_x,
                    offset_y,
                    scale,
                    rotation,
                    text,
                    color,
                } => (
                    id,
                    Placement {
                        offset: [offset_x, offset_y],
                        scale,
                        rotation,
                    },
                    Payload::Text {
                        text,
                        seed_color: color,
                    },
                ),
                SavedElement::Image {
                    id,
                    offset_x,
                    offset_y,
                    scale,
                    rotation,
                    key,
                    content_description,
                } => (
                    id,
                    Placement {
                        offset: [offset_x, offset_y],
                        scale,
                        rotation,
                    },
                    Payload::Image(ImageContent {
                        cache_key: key,
                        content_description,
                    }),
                ),
            };
            Ok(Element {
                id: ElementId::from_raw(id).ok_or(RestoreError::InvalidId(id))?,
                placement,
                payload,
            })
        })
        .collect()
}

/// Lower records to loose JSON maps, the shape a host saved-state bundle holds.
#[must_use]
pub fn to_values(saved: &[SavedElement]) -> Vec<serde_json::Value> {
    saved
        .iter()
        // Unwrap would be OK - a `SavedElement` always maps to a JSON object -
        // but stay total anyway.
        .filter_map(|record| serde_json::to_value(record).ok())
        .collect()
}

/// Parse loose maps back into records, dispatching on the `type` tag.
pub fn from_values(values: &[serde_json::Value]) -> Result<Vec<SavedElement>, RestoreError> {
    values
        .iter()
        .map(|value| {
            // Check the tag by hand first, so an unknown kind reports as such
            // instead of as a generic parse failure.
            let tag = value
                .get("type")
                .and_then(serde_json::Value::as_str)
                .ok_or(RestoreError::MissingKind)?;
            if tag != "Text" && tag != "Image" {
                return Err(RestoreError::UnknownKind(tag.to_owned()));
            }
            Ok(serde_json::from_value(value.clone())?)
        })
        .collect()
}
