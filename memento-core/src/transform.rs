//! # Placement
//! Position, scale and rotation of one overlay element, plus the rotation
//! math the gesture layer needs to move a panned element along its own axes.

/// Where and how an element sits on the canvas.
///
/// Offsets are in logical (density-independent) units, `0,0` top left,
/// +X right, +Y down. Rotation is in degrees CW and is not range-restricted.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Placement {
    /// Position of the element's anchor.
    pub offset: [f32; 2],
    /// Uniform scale factor, baseline `1.0`.
    pub scale: f32,
    /// Rotation in degrees.
    pub rotation: f32,
}

impl Placement {
    /// Identity placement at the given position.
    #[must_use]
    pub fn at(offset: [f32; 2]) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }
    /// Same placement, repositioned absolutely.
    #[must_use]
    pub fn moved_to(self, offset: [f32; 2]) -> Self {
        Self { offset, ..self }
    }
    /// Same placement, shifted by a delta.
    #[must_use]
    pub fn translated(self, by: [f32; 2]) -> Self {
        Self {
            offset: [self.offset[0] + by[0], self.offset[1] + by[1]],
            ..self
        }
    }
    /// Same placement with the scale multiplied. Repeated pinches compound.
    #[must_use]
    pub fn scaled_by(self, factor: f32) -> Self {
        Self {
            scale: self.scale * factor,
            ..self
        }
    }
    /// Same placement at an absolute scale.
    #[must_use]
    pub fn scaled_to(self, scale: f32) -> Self {
        Self { scale, ..self }
    }
    /// Same placement at an absolute rotation.
    #[must_use]
    pub fn rotated_to(self, degrees: f32) -> Self {
        Self {
            rotation: degrees,
            ..self
        }
    }
    /// Same placement rotated by a delta, in degrees.
    #[must_use]
    pub fn rotated_by(self, delta: f32) -> Self {
        Self {
            rotation: self.rotation + delta,
            ..self
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            offset: [0.0; 2],
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

/// Rotate a screen-space pan vector into the frame of an element rotated by
/// `degrees`, using the standard 2D rotation matrix.
///
/// Pan is measured in screen space but must be applied along the element's
/// own rotated axes, so the whole-canvas gesture path corrects it through
/// here at the *post*-rotation angle.
#[must_use]
pub fn rotated_pan(pan: [f32; 2], degrees: f32) -> [f32; 2] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        pan[0] * cos - pan[1] * sin,
        pan[0] * sin + pan[1] * cos,
    ]
}
