//! # Controller
//!
//! The controller is the sole mutator of the overlay list and its transient
//! interaction state (focus, saved pre-focus transform, capture handshake,
//! sticker sheet visibility). Everything else reads [`Snapshot`]s and calls
//! back in through the operations here.
//!
//! Mutations are expected from a single UI-thread-equivalent context. The
//! lock exists so listeners on other threads always observe a fully-formed
//! snapshot, never an in-progress mutation; it is not a license for
//! concurrent writers.
//!
//! By-id operations silently no-op on an unknown id. The two exceptions are
//! the text-only updates ([`Controller::update_text_color`],
//! [`Controller::update_text`]), which report a typed kind mismatch when
//! aimed at an image overlay: a caller-contract breach, not a normal runtime
//! condition.

use std::sync::Arc;

use crate::{
    color::SeedColor,
    element::{Element, ElementKind, ImageContent, Payload},
    id::{ElementId, IdSource},
    save::SavedElement,
    transform::Placement,
};

/// Fixed editing position a focused text overlay is parked at.
pub const EDITING_OFFSET: [f32; 2] = [50.0, 500.0];

bitflags::bitflags! {
    /// Observable session flags, independent of the element list.
    #[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
    pub struct SessionFlags: u8 {
        /// Exclusive text-editing mode is active. Gestures are suppressed.
        const TEXT_FOCUS = 1;
        /// A capture was requested and has not been delivered yet.
        const CAPTURE_REQUESTED = 1 << 1;
        /// The sticker picker sheet is open. Unrelated to focus.
        const STICKER_SHEET = 1 << 2;
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("expected a {expected} element, but {id} is a {actual}")]
    KindMismatch {
        id: ElementId,
        expected: ElementKind,
        actual: ElementKind,
    },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ListenerError {
    #[error("session no longer available")]
    SessionClosed,
}

#[derive(Default)]
struct Inner {
    /// Insertion order is paint order; last is topmost.
    elements: Vec<Element>,
    ids: IdSource,
    focused: Option<ElementId>,
    /// Present iff a focus session is active and restorable.
    saved: Option<Placement>,
    flags: SessionFlags,
    /// Bumped once per committed mutation.
    revision: u64,
}

impl Inner {
    fn touch(&mut self) {
        self.revision += 1;
    }
    fn find_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|element| element.id == id)
    }
    fn bring_to_front(&mut self, id: ElementId) -> bool {
        let Some(index) = self.elements.iter().position(|element| element.id == id) else {
            return false;
        };
        let element = self.elements.remove(index);
        self.elements.push(element);
        true
    }
}

/// Handle to one editing session. Clones share the same state, like the
/// session itself being passed around the view layer.
#[derive(Clone, Default)]
pub struct Controller {
    inner: Arc<parking_lot::RwLock<Inner>>,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Rebuild a session from persisted records. The id source is re-seeded
    /// past the largest restored id so new elements never collide.
    #[must_use]
    pub fn from_saved(saved: Vec<SavedElement>) -> Result<Self, crate::save::RestoreError> {
        let elements = crate::save::restore(saved)?;
        let mut ids = IdSource::new();
        for element in &elements {
            ids.observe(element.id);
        }
        Ok(Self {
            inner: Arc::new(parking_lot::RwLock::new(Inner {
                elements,
                ids,
                ..Inner::default()
            })),
        })
    }

    /// Replace a matching element with a rebuilt value. Returns whether a
    /// match was found; misses are the caller's silent no-op.
    fn update_with(&self, id: ElementId, update: impl FnOnce(Element) -> Element) -> bool {
        let mut lock = self.inner.write();
        let Some(slot) = lock.find_mut(id) else {
            log::trace!("update on missing {id}, ignoring");
            return false;
        };
        // Copy-update: build the new value from a clone, then publish it.
        let updated = update(slot.clone());
        *slot = updated;
        lock.touch();
        true
    }

    // --- creation ---

    /// Append a new text overlay at `offset`, scale 1, rotation 0.
    /// Always succeeds; returns the assigned id.
    pub fn create_text(
        &self,
        offset: [f32; 2],
        initial_text: impl Into<String>,
        seed_color: SeedColor,
    ) -> ElementId {
        let mut lock = self.inner.write();
        let id = lock.ids.mint();
        lock.elements.push(Element {
            id,
            placement: Placement::at(offset),
            payload: Payload::Text {
                text: initial_text.into(),
                seed_color,
            },
        });
        lock.touch();
        id
    }
    /// Append a new image overlay at the origin, scale 1, rotation 0.
    /// Always succeeds; returns the assigned id.
    pub fn attach_image(&self, content: ImageContent) -> ElementId {
        let mut lock = self.inner.write();
        let id = lock.ids.mint();
        lock.elements.push(Element {
            id,
            placement: Placement::default(),
            payload: Payload::Image(content),
        });
        lock.touch();
        id
    }

    // --- layout ---

    /// Shift an element by a drag delta. The drag path always promotes the
    /// dragged element to the top of the paint order as a side effect.
    pub fn drag_by(&self, id: ElementId, delta: [f32; 2]) {
        let mut lock = self.inner.write();
        let Some(slot) = lock.find_mut(id) else {
            log::trace!("drag on missing {id}, ignoring");
            return;
        };
        let moved = slot.clone().translated(delta);
        *slot = moved;
        lock.bring_to_front(id);
        lock.touch();
    }
    /// Reposition an element absolutely, without touching paint order.
    /// This is the focus-mode flavor of the layout update.
    pub fn place_at(&self, id: ElementId, offset: [f32; 2]) {
        self.update_with(id, |element| element.moved_to(offset));
    }
    /// Multiply an element's scale. Repeated pinch gestures compound.
    pub fn update_scale(&self, id: ElementId, factor: f32) {
        self.update_with(id, |element| element.scaled_by(factor));
    }
    /// Add a rotation delta, in degrees, and return the new absolute
    /// rotation — the gesture layer needs it to correct the pan vector.
    ///
    /// Returns `0.0` when the id is unknown, indistinguishable from a
    /// legitimate zero rotation. Known limitation, kept on purpose; callers
    /// that need to tell the cases apart should check the snapshot first.
    pub fn update_rotation(&self, id: ElementId, delta: f32) -> f32 {
        let mut updated = 0.0;
        self.update_with(id, |element| {
            updated = element.placement.rotation + delta;
            element.rotated_to(updated)
        });
        updated
    }
    /// Move an element to the end of the paint list, making it topmost.
    pub fn bring_to_front(&self, id: ElementId) {
        let mut lock = self.inner.write();
        if lock.bring_to_front(id) {
            lock.touch();
        }
    }

    // --- text content ---

    /// Replace the text content of a text overlay. Unknown id is a no-op;
    /// an image overlay is a kind mismatch.
    pub fn update_text(&self, id: ElementId, text: impl Into<String>) -> Result<(), SessionError> {
        self.update_text_with(id, |element| element.with_text(text.into()))
    }
    /// Replace the seed color of a text overlay. Unknown id is a no-op;
    /// an image overlay is a kind mismatch.
    pub fn update_text_color(&self, id: ElementId, seed: SeedColor) -> Result<(), SessionError> {
        self.update_text_with(id, |element| element.with_seed_color(seed))
    }
    fn update_text_with(
        &self,
        id: ElementId,
        update: impl FnOnce(Element) -> Option<Element>,
    ) -> Result<(), SessionError> {
        let mut lock = self.inner.write();
        let Some(slot) = lock.find_mut(id) else {
            log::trace!("text update on missing {id}, ignoring");
            return Ok(());
        };
        let actual = slot.kind();
        let Some(updated) = update(slot.clone()) else {
            return Err(SessionError::KindMismatch {
                id,
                expected: ElementKind::Text,
                actual,
            });
        };
        *slot = updated;
        lock.touch();
        Ok(())
    }

    // --- focus ---

    /// Enter exclusive text-editing mode for an existing element.
    ///
    /// `current` is the element's pre-focus placement as computed by the
    /// caller (typically with the fixed top padding already subtracted); it
    /// is saved verbatim and restored by [`Controller::release_focus`]. The
    /// element itself is parked at [`EDITING_OFFSET`], rotation 0, scale 1.
    pub fn execute_text_focus(&self, id: ElementId, current: Placement) {
        let mut lock = self.inner.write();
        lock.saved = Some(current);
        lock.focused = Some(id);
        if let Some(slot) = lock.find_mut(id) {
            let parked = slot
                .clone()
                .moved_to(EDITING_OFFSET)
                .rotated_to(0.0)
                .scaled_to(1.0);
            *slot = parked;
        }
        lock.flags.insert(SessionFlags::TEXT_FOCUS);
        lock.touch();
    }
    /// Set the focus-mode flag directly. Used when composing a brand-new
    /// text overlay, where there is no existing element to park.
    pub fn request_focus_mode(&self, enabled: bool) {
        let mut lock = self.inner.write();
        lock.flags.set(SessionFlags::TEXT_FOCUS, enabled);
        lock.touch();
    }
    /// Leave focus mode, restoring the focused element's saved transform.
    /// A no-op when no focus session is active.
    pub fn release_focus(&self) {
        let mut lock = self.inner.write();
        let Some(saved) = lock.saved.take() else {
            return;
        };
        if let Some(id) = lock.focused.take() {
            if let Some(slot) = lock.find_mut(id) {
                let restored = slot
                    .clone()
                    .moved_to(saved.offset)
                    .rotated_to(saved.rotation)
                    .scaled_to(saved.scale);
                *slot = restored;
            }
        }
        lock.flags.remove(SessionFlags::TEXT_FOCUS);
        lock.touch();
    }

    // --- handshake flags ---

    /// Edge-triggered: set by the host, cleared by the capture pipeline once
    /// it has delivered the rendered buffer.
    pub fn request_capture(&self) {
        self.set_flag(SessionFlags::CAPTURE_REQUESTED, true);
    }
    pub fn finish_capture(&self) {
        self.set_flag(SessionFlags::CAPTURE_REQUESTED, false);
    }
    pub fn open_sticker_sheet(&self) {
        self.set_flag(SessionFlags::STICKER_SHEET, true);
    }
    pub fn close_sticker_sheet(&self) {
        self.set_flag(SessionFlags::STICKER_SHEET, false);
    }
    fn set_flag(&self, flag: SessionFlags, value: bool) {
        let mut lock = self.inner.write();
        lock.flags.set(flag, value);
        lock.touch();
    }

    // --- observation ---

    /// Id of the element currently in text-focus mode, if any.
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.inner.read().focused
    }
    /// Clone the current state as one fully-formed value.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let lock = self.inner.read();
        Snapshot {
            elements: lock.elements.clone(),
            focused: lock.focused,
            flags: lock.flags,
            revision: lock.revision,
        }
    }
    /// Serialize the element list for process-death survival.
    #[must_use]
    pub fn saved_elements(&self) -> Vec<SavedElement> {
        crate::save::save(&self.inner.read().elements)
    }
    /// Create a listener that reports activity from this point on.
    #[must_use]
    pub fn listen(&self) -> SessionListener {
        SessionListener {
            seen: self.inner.read().revision,
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// A fully-formed copy of the session state at one revision.
#[derive(Clone, Debug)]
pub struct Snapshot {
    elements: Vec<Element>,
    focused: Option<ElementId>,
    flags: SessionFlags,
    revision: u64,
}

impl Snapshot {
    /// Elements in paint order; the last one is topmost.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }
    /// The front-most element — the whole-canvas gesture target.
    #[must_use]
    pub fn topmost(&self) -> Option<&Element> {
        self.elements.last()
    }
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }
    #[must_use]
    pub fn flags(&self) -> SessionFlags {
        self.flags
    }
    #[must_use]
    pub fn is_text_focus_active(&self) -> bool {
        self.flags.contains(SessionFlags::TEXT_FOCUS)
    }
    #[must_use]
    pub fn is_capture_requested(&self) -> bool {
        self.flags.contains(SessionFlags::CAPTURE_REQUESTED)
    }
    #[must_use]
    pub fn is_sticker_sheet_open(&self) -> bool {
        self.flags.contains(SessionFlags::STICKER_SHEET)
    }
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Tracks how far behind the session a subscriber is, by revision counter.
pub struct SessionListener {
    seen: u64,
    inner: std::sync::Weak<parking_lot::RwLock<Inner>>,
}

impl SessionListener {
    /// Move up-to-date with the session. Returns whether anything changed
    /// since the last call.
    pub fn forward(&mut self) -> Result<bool, ListenerError> {
        let inner = self.inner.upgrade().ok_or(ListenerError::SessionClosed)?;
        let revision = inner.read().revision;
        let changed = revision != self.seen;
        self.seen = revision;
        Ok(changed)
    }
    /// Clone the current state, bringing this listener up-to-date.
    pub fn snapshot(&mut self) -> Result<Snapshot, ListenerError> {
        let inner = self.inner.upgrade().ok_or(ListenerError::SessionClosed)?;
        let lock = inner.read();
        self.seen = lock.revision;
        Ok(Snapshot {
            elements: lock.elements.clone(),
            focused: lock.focused,
            flags: lock.flags,
            revision: lock.revision,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Controller, ListenerError, SessionError, SessionFlags, EDITING_OFFSET};
    use crate::{
        color::SeedColor,
        element::{ElementKind, ImageContent, Payload},
        id::ElementId,
        transform::Placement,
    };

    const BLUE: SeedColor = SeedColor(0xFF00_00FF);

    fn missing() -> ElementId {
        ElementId::from_raw(999).unwrap()
    }

    #[test]
    fn first_text_element() {
        let session = Controller::new();
        session.create_text([5.0, 5.0], "hi", BLUE);
        let snapshot = session.snapshot();
        let [element] = snapshot.elements() else {
            panic!("expected exactly one element");
        };
        assert_eq!(element.id.get(), 1);
        assert_eq!(element.placement.offset, [5.0, 5.0]);
        assert_eq!(element.placement.scale, 1.0);
        assert_eq!(element.placement.rotation, 0.0);
        assert_eq!(
            element.payload,
            Payload::Text {
                text: "hi".into(),
                seed_color: BLUE,
            }
        );
    }
    #[test]
    fn ids_strictly_increase() {
        let session = Controller::new();
        let mut last = 0;
        for index in 0..16 {
            let id = if index % 2 == 0 {
                session.create_text([0.0, 0.0], "t", BLUE)
            } else {
                session.attach_image(ImageContent::new("k"))
            };
            assert!(id.get() > last);
            last = id.get();
            // Reorders don't disturb allocation.
            session.bring_to_front(ElementId::from_raw(1).unwrap());
        }
    }
    #[test]
    fn layout_ops_are_independent() {
        let session = Controller::new();
        let id = session.create_text([1.0, 1.0], "t", BLUE);
        session.update_rotation(id, 45.0);
        session.update_scale(id, 3.0);
        session.drag_by(id, [2.0, 2.0]);
        let snapshot = session.snapshot();
        let element = snapshot.get(id).unwrap();
        // Drag never changes scale or rotation; scale/rotation never move it.
        assert_eq!(element.placement.offset, [3.0, 3.0]);
        assert_eq!(element.placement.scale, 3.0);
        assert_eq!(element.placement.rotation, 45.0);
        assert_eq!(element.id, id);
    }
    #[test]
    fn scale_composes_multiplicatively() {
        let session = Controller::new();
        let a = session.create_text([0.0, 0.0], "a", BLUE);
        let b = session.create_text([0.0, 0.0], "b", BLUE);
        session.update_scale(a, 2.0);
        session.update_scale(a, 3.0);
        session.update_scale(b, 6.0);
        let snapshot = session.snapshot();
        assert_eq!(
            snapshot.get(a).unwrap().placement.scale,
            snapshot.get(b).unwrap().placement.scale,
        );
    }
    #[test]
    fn bring_to_front_idempotent() {
        let session = Controller::new();
        let a = session.create_text([0.0, 0.0], "a", BLUE);
        let _b = session.create_text([0.0, 0.0], "b", BLUE);
        session.bring_to_front(a);
        let once: Vec<_> = session.snapshot().elements().iter().map(|e| e.id).collect();
        session.bring_to_front(a);
        let twice: Vec<_> = session.snapshot().elements().iter().map(|e| e.id).collect();
        assert_eq!(once, twice);
        assert_eq!(session.snapshot().topmost().unwrap().id, a);
    }
    #[test]
    fn drag_promotes_to_front() {
        let session = Controller::new();
        let a = session.create_text([0.0, 0.0], "a", BLUE);
        let b = session.create_text([0.0, 0.0], "b", BLUE);
        assert_eq!(session.snapshot().topmost().unwrap().id, b);
        session.drag_by(a, [1.0, 0.0]);
        assert_eq!(session.snapshot().topmost().unwrap().id, a);
        // The absolute flavor does not reorder.
        session.place_at(b, [9.0, 9.0]);
        assert_eq!(session.snapshot().topmost().unwrap().id, a);
    }
    #[test]
    fn unknown_ids_noop() {
        let session = Controller::new();
        session.create_text([1.0, 2.0], "t", BLUE);
        let before = session.snapshot();
        session.drag_by(missing(), [5.0, 5.0]);
        session.update_scale(missing(), 2.0);
        session.bring_to_front(missing());
        assert_eq!(session.update_rotation(missing(), 90.0), 0.0);
        assert_eq!(session.update_text_color(missing(), BLUE), Ok(()));
        let after = session.snapshot();
        assert_eq!(before.elements(), after.elements());
    }
    #[test]
    fn color_update_checks_kind() {
        let session = Controller::new();
        let image = session.attach_image(ImageContent::new("k"));
        assert_eq!(
            session.update_text_color(image, BLUE),
            Err(SessionError::KindMismatch {
                id: image,
                expected: ElementKind::Text,
                actual: ElementKind::Image,
            })
        );
        assert!(session.update_text(image, "nope").is_err());
        let text = session.create_text([0.0, 0.0], "a", BLUE);
        assert_eq!(session.update_text(text, "ab"), Ok(()));
        assert_eq!(session.update_text_color(text, SeedColor::BLACK), Ok(()));
        let snapshot = session.snapshot();
        assert_eq!(
            snapshot.get(text).unwrap().payload,
            Payload::Text {
                text: "ab".into(),
                seed_color: SeedColor::BLACK,
            }
        );
    }
    #[test]
    fn focus_round_trip_restores_exactly() {
        let session = Controller::new();
        let id = session.create_text([40.0, 80.0], "t", BLUE);
        session.update_rotation(id, 30.0);
        session.update_scale(id, 2.0);
        let saved = Placement {
            offset: [40.0, 64.0],
            scale: 2.0,
            rotation: 30.0,
        };
        session.execute_text_focus(id, saved);

        let focused = session.snapshot();
        assert!(focused.is_text_focus_active());
        assert_eq!(focused.focused(), Some(id));
        let parked = focused.get(id).unwrap().placement;
        assert_eq!(parked.offset, EDITING_OFFSET);
        assert_eq!(parked.rotation, 0.0);
        assert_eq!(parked.scale, 1.0);

        session.release_focus();
        let released = session.snapshot();
        assert!(!released.is_text_focus_active());
        assert_eq!(released.focused(), None);
        assert_eq!(released.get(id).unwrap().placement, saved);
    }
    #[test]
    fn release_without_focus_noops() {
        let session = Controller::new();
        session.create_text([1.0, 1.0], "t", BLUE);
        let before = session.snapshot();
        session.release_focus();
        let after = session.snapshot();
        assert_eq!(before.elements(), after.elements());
        assert_eq!(before.flags(), after.flags());
    }
    #[test]
    fn sticker_sheet_independent_of_focus() {
        let session = Controller::new();
        session.open_sticker_sheet();
        session.request_focus_mode(true);
        let snapshot = session.snapshot();
        assert!(snapshot.is_sticker_sheet_open());
        assert!(snapshot.is_text_focus_active());
        session.request_focus_mode(false);
        assert!(session.snapshot().is_sticker_sheet_open());
        session.close_sticker_sheet();
        assert!(!session.snapshot().is_sticker_sheet_open());
    }
    #[test]
    fn capture_flag_handshake() {
        let session = Controller::new();
        assert!(!session.snapshot().is_capture_requested());
        session.request_capture();
        assert!(session.snapshot().is_capture_requested());
        session.finish_capture();
        assert!(!session.snapshot().is_capture_requested());
    }
    #[test]
    fn snapshots_are_isolated() {
        let session = Controller::new();
        let id = session.create_text([0.0, 0.0], "t", BLUE);
        let before = session.snapshot();
        session.drag_by(id, [10.0, 10.0]);
        // The old snapshot still shows the old position.
        assert_eq!(before.get(id).unwrap().placement.offset, [0.0, 0.0]);
    }
    #[test]
    fn listener_sees_changes_once() {
        let session = Controller::new();
        let mut listener = session.listen();
        assert_eq!(listener.forward(), Ok(false));
        session.create_text([0.0, 0.0], "t", BLUE);
        assert_eq!(listener.forward(), Ok(true));
        assert_eq!(listener.forward(), Ok(false));
        let snapshot = listener.snapshot().unwrap();
        assert_eq!(snapshot.elements().len(), 1);

        drop(session);
        assert_eq!(listener.forward(), Err(ListenerError::SessionClosed));
    }
    #[test]
    fn flag_bitflags_match_documented_bits() {
        assert_eq!(SessionFlags::TEXT_FOCUS.bits(), 1);
        assert_eq!(SessionFlags::CAPTURE_REQUESTED.bits(), 2);
        assert_eq!(SessionFlags::STICKER_SHEET.bits(), 4);
    }
}
