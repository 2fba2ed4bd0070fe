//! # Gestures
//!
//! Translates continuous pan/zoom/rotate gesture frames and discrete
//! press events into controller calls.
//!
//! Order within a frame is fixed and matters: rotation is resolved first,
//! because the pan vector is corrected into the element's local frame at the
//! *post*-rotation angle before it is applied. Scale comes last. Swapping
//! these changes what the user sees.

use memento_core::{transform::rotated_pan, Controller, ElementId};

/// One callback's worth of a multi-touch transform gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureFrame {
    /// Pan delta in screen space, logical units.
    pub pan: [f32; 2],
    /// Zoom factor for this frame, `1.0` meaning no change.
    pub zoom: f32,
    /// Rotation delta in degrees.
    pub rotation: f32,
}

impl GestureFrame {
    /// A frame that changes nothing.
    pub const IDENTITY: Self = Self {
        pan: [0.0; 2],
        zoom: 1.0,
        rotation: 0.0,
    };
}

/// Applies gesture input to a session.
///
/// In whole-canvas mode the target is whatever element is topmost; a
/// per-element host can instead [`GestureMapper::grab`] the element whose
/// modifier captured the gesture.
pub struct GestureMapper {
    controller: Controller,
    grabbed: Option<ElementId>,
}

impl GestureMapper {
    #[must_use]
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            grabbed: None,
        }
    }
    /// Route subsequent frames to one element, regardless of paint order.
    pub fn grab(&mut self, id: ElementId) {
        self.grabbed = Some(id);
    }
    /// Back to whole-canvas targeting.
    pub fn release_grab(&mut self) {
        self.grabbed = None;
    }
    /// A press that is not part of a transform gesture. Merely touching an
    /// element promotes it to the top of the paint order.
    pub fn press(&self, id: ElementId) {
        if self.controller.snapshot().is_text_focus_active() {
            return;
        }
        self.controller.bring_to_front(id);
    }
    /// Apply one gesture frame: rotation, then rotation-corrected pan
    /// (which also promotes the element), then scale.
    ///
    /// Does nothing while text focus is active, or when the canvas is empty.
    pub fn apply(&self, frame: GestureFrame) {
        let snapshot = self.controller.snapshot();
        if snapshot.is_text_focus_active() {
            return;
        }
        let Some(id) = self.grabbed.or_else(|| snapshot.topmost().map(|e| e.id)) else {
            return;
        };
        let rotation = self.controller.update_rotation(id, frame.rotation);
        self.controller.drag_by(id, rotated_pan(frame.pan, rotation));
        self.controller.update_scale(id, frame.zoom);
    }
}

#[cfg(test)]
mod test {
    use super::{GestureFrame, GestureMapper};
    use memento_core::{color::SeedColor, element::ImageContent, Controller};

    const BLUE: SeedColor = SeedColor(0xFF00_00FF);

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn pan_is_corrected_into_the_rotated_frame() {
        let session = Controller::new();
        let id = session.create_text([0.0, 0.0], "t", BLUE);
        let mapper = GestureMapper::new(session.clone());
        mapper.apply(GestureFrame {
            pan: [10.0, 0.0],
            zoom: 1.0,
            rotation: 90.0,
        });
        let snapshot = session.snapshot();
        let placement = snapshot.get(id).unwrap().placement;
        assert_eq!(placement.rotation, 90.0);
        // (10, 0) rotated a quarter turn lands at (0, 10).
        assert!(close(placement.offset, [0.0, 10.0]));
        assert_eq!(placement.scale, 1.0);
    }
    #[test]
    fn targets_the_topmost_element() {
        let session = Controller::new();
        let _a = session.create_text([0.0, 0.0], "a", BLUE);
        let b = session.attach_image(ImageContent::new("k"));
        let mapper = GestureMapper::new(session.clone());
        mapper.apply(GestureFrame {
            pan: [1.0, 0.0],
            ..GestureFrame::IDENTITY
        });
        let snapshot = session.snapshot();
        assert!(close(snapshot.get(b).unwrap().placement.offset, [1.0, 0.0]));
    }
    #[test]
    fn grab_overrides_paint_order() {
        let session = Controller::new();
        let a = session.create_text([0.0, 0.0], "a", BLUE);
        let _b = session.create_text([0.0, 0.0], "b", BLUE);
        let mut mapper = GestureMapper::new(session.clone());
        mapper.grab(a);
        mapper.apply(GestureFrame {
            pan: [2.0, 0.0],
            ..GestureFrame::IDENTITY
        });
        let snapshot = session.snapshot();
        assert!(close(snapshot.get(a).unwrap().placement.offset, [2.0, 0.0]));
        // The drag path promoted the grabbed element.
        assert_eq!(snapshot.topmost().unwrap().id, a);
    }
    #[test]
    fn suppressed_while_text_focus_active() {
        let session = Controller::new();
        let id = session.create_text([0.0, 0.0], "t", BLUE);
        session.request_focus_mode(true);
        let mapper = GestureMapper::new(session.clone());
        mapper.apply(GestureFrame {
            pan: [5.0, 5.0],
            zoom: 2.0,
            rotation: 45.0,
        });
        mapper.press(id);
        let placement = session.snapshot().get(id).unwrap().placement;
        assert_eq!(placement.offset, [0.0, 0.0]);
        assert_eq!(placement.scale, 1.0);
        assert_eq!(placement.rotation, 0.0);
    }
    #[test]
    fn empty_canvas_is_fine() {
        let session = Controller::new();
        let mapper = GestureMapper::new(session);
        // Doesn't panic, doesn't create anything.
        mapper.apply(GestureFrame::IDENTITY);
    }
    #[test]
    fn press_promotes_without_moving() {
        let session = Controller::new();
        let a = session.create_text([3.0, 3.0], "a", BLUE);
        let _b = session.create_text([0.0, 0.0], "b", BLUE);
        let mapper = GestureMapper::new(session.clone());
        mapper.press(a);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.topmost().unwrap().id, a);
        assert_eq!(snapshot.get(a).unwrap().placement.offset, [3.0, 3.0]);
    }
}
