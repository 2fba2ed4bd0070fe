//! # Focus flow
//!
//! The exclusive text-editing mode: a flat three-state machine layered over
//! the controller. `Normal` is the initial and terminal state; focusing an
//! existing text overlay parks it at the fixed editing position with its
//! pre-focus transform saved, and composing a brand-new overlay floats a
//! transient input that only becomes an element if dismissed non-empty.

use memento_core::{
    color::SeedColor, controller::EDITING_OFFSET, Controller, ElementId, ElementKind, Placement,
};

/// Fixed padding above a text overlay's glyphs; subtracted from the saved
/// offset so the restore lands where the text visually was.
pub const TOP_PADDING: f32 = 16.0;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FocusPhase {
    Normal,
    /// Editing an existing text overlay.
    Existing(ElementId),
    /// Composing a new overlay in the transient input field.
    New,
}

/// Drives focus-mode transitions against a session.
pub struct FocusFlow {
    controller: Controller,
    phase: FocusPhase,
    pending_text: String,
    pending_seed: SeedColor,
    /// Last observed layout position of the transient input field.
    input_offset: [f32; 2],
}

impl FocusFlow {
    #[must_use]
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            phase: FocusPhase::Normal,
            pending_text: String::new(),
            pending_seed: SeedColor::WHITE,
            input_offset: EDITING_OFFSET,
        }
    }
    #[must_use]
    pub fn phase(&self) -> FocusPhase {
        self.phase
    }
    #[must_use]
    pub fn pending_text(&self) -> &str {
        &self.pending_text
    }

    /// Tap on an existing text overlay: enter focus mode for it.
    /// Ignored outside `Normal`, and for image overlays.
    pub fn focus_element(&mut self, id: ElementId) {
        if self.phase != FocusPhase::Normal {
            return;
        }
        let snapshot = self.controller.snapshot();
        let Some(element) = snapshot.get(id) else {
            log::trace!("focus on missing {id}, ignoring");
            return;
        };
        if element.kind() != ElementKind::Text {
            return;
        }
        let placement = element.placement;
        let saved = Placement {
            offset: [placement.offset[0], placement.offset[1] - TOP_PADDING],
            ..placement
        };
        self.controller.execute_text_focus(id, saved);
        self.phase = FocusPhase::Existing(id);
    }
    /// Tap on empty canvas: begin composing a new text overlay.
    pub fn begin_new(&mut self) {
        if self.phase != FocusPhase::Normal {
            return;
        }
        self.pending_text.clear();
        self.input_offset = EDITING_OFFSET;
        self.controller.request_focus_mode(true);
        self.phase = FocusPhase::New;
    }
    /// Text input while focused. Routes to the focused element, or to the
    /// transient input when composing.
    pub fn edit_text(&mut self, text: &str) {
        match self.phase {
            FocusPhase::Normal => {}
            FocusPhase::Existing(id) => {
                // Kind already checked on entry.
                let _ = self.controller.update_text(id, text);
                self.controller.bring_to_front(id);
            }
            FocusPhase::New => {
                self.pending_text.clear();
                self.pending_text.push_str(text);
            }
        }
    }
    /// The transient input reported a new layout position.
    pub fn input_moved(&mut self, offset: [f32; 2]) {
        self.input_offset = offset;
    }
    /// Palette selection while focused. Recolors the focused element, and is
    /// remembered as the seed for the next composed overlay either way.
    pub fn pick_color(&mut self, seed: SeedColor) {
        if let FocusPhase::Existing(id) = self.phase {
            let _ = self.controller.update_text_color(id, seed);
        }
        self.pending_seed = seed;
    }
    /// Touch outside the focused region: leave focus mode.
    ///
    /// An existing element gets its pre-focus transform back. A non-empty
    /// transient input commits as a new text overlay at its observed
    /// position; an empty one is discarded with nothing created.
    pub fn dismiss(&mut self) {
        match self.phase {
            FocusPhase::Normal => return,
            FocusPhase::Existing(_) => self.controller.release_focus(),
            FocusPhase::New => {
                self.controller.request_focus_mode(false);
                if !self.pending_text.is_empty() {
                    self.controller
                        .create_text(self.input_offset, &*self.pending_text, self.pending_seed);
                }
                self.pending_text.clear();
            }
        }
        self.phase = FocusPhase::Normal;
    }
}
