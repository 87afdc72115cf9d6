//! The editor session: a pointer/keyboard state machine over the document.
//!
//! All input funnels through one dispatch point that always reads the
//! latest state — there are no per-listener snapshots to go stale. The
//! session owns the document history, the selection, the view transform,
//! and the active gesture. Gestures hold *transient* preview geometry that
//! the view renders live; nothing reaches the document until the gesture
//! commits one atomic `History::set` on pointer-up. Releasing the pointer,
//! pressing Escape, or losing capture (tab blur) returns to `Idle` with the
//! document untouched.

use crate::commands::{self, EditorCommand};
use crate::hit::{self, HandleHit};
use crate::input::{InputEvent, PointerButton};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::viewport::{ViewTransform, Viewport};
use bl_core::history::History;
use bl_core::model::LabelDesign;
use bl_core::snap::{self, SnapCandidate, SnapLines};
use bl_core::transform::{self, AspectRule, Corner, ElementGeometry, GeometryPatch};
use bl_core::units::{NUDGE_FINE_MM, NUDGE_MM, px_to_mm};
use bl_core::{ObjectId, layers};
use kurbo::{Point, Vec2};

/// Wheel-zoom sensitivity (scale factor per pixel of wheel delta).
const WHEEL_ZOOM_STEP: f64 = 0.002;

/// Editing mode. `Simple` keeps brand elements in the reserved top z-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Full,
    Simple,
}

/// Callback invoked with the complete current document on save.
pub type SaveHook = Box<dyn FnMut(&LabelDesign)>;

/// The active gesture. Pointer capture is exclusive: while a gesture is
/// live, every move/up is routed here regardless of what is under the
/// cursor.
enum Gesture {
    Idle,
    Dragging {
        id: ObjectId,
        start: ElementGeometry,
        anchor_px: (f32, f32),
        preview: Option<(f32, f32)>,
        lines: SnapLines,
    },
    Resizing {
        id: ObjectId,
        corner: Corner,
        aspect: AspectRule,
        start: ElementGeometry,
        anchor_px: (f32, f32),
        preview: Option<GeometryPatch>,
    },
    Rotating {
        id: ObjectId,
        start: ElementGeometry,
        anchor_px: (f32, f32),
        preview: Option<f32>,
    },
    Panning {
        last: (f32, f32),
    },
}

/// The single mutator of a `LabelDesign` for the lifetime of an editing
/// session.
pub struct EditorSession {
    history: History<LabelDesign>,
    viewport: Viewport,
    gesture: Gesture,
    selection: Option<ObjectId>,
    mode: EditorMode,
    /// Keyboard shortcuts are suppressed while the shell has a text input
    /// focused.
    text_editing: bool,
    /// Host-fed space-bar-held flag; left-drag pans while set.
    space_held: bool,
    save_hook: Option<SaveHook>,
}

impl EditorSession {
    /// Start a session over a loaded design. The design is assumed
    /// structurally valid; its element order is renumbered once so the
    /// z-index invariant holds from the first edit.
    pub fn new(mut design: LabelDesign) -> Self {
        layers::renumber(&mut design.elements);
        Self {
            history: History::new(design),
            viewport: Viewport::new(),
            gesture: Gesture::Idle,
            selection: None,
            mode: EditorMode::Full,
            text_editing: false,
            space_held: false,
            save_hook: None,
        }
    }

    pub fn with_mode(design: LabelDesign, mode: EditorMode) -> Self {
        let mut session = Self::new(design);
        session.set_mode(mode);
        session
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// The current document — the single source of truth for the view.
    pub fn design(&self) -> &LabelDesign {
        self.history.present()
    }

    pub fn selection(&self) -> Option<ObjectId> {
        self.selection
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Push boundary for rulers and guide chrome; `None` when nothing
    /// changed since the last take.
    pub fn view_snapshot(&mut self) -> Option<ViewTransform> {
        self.viewport.snapshot_if_changed()
    }

    /// Magnetic lines active for the current drag (empty outside drags).
    pub fn active_snap_lines(&self) -> SnapLines {
        match &self.gesture {
            Gesture::Dragging { lines, .. } => *lines,
            _ => SnapLines::default(),
        }
    }

    /// The geometry the view should render for an element right now:
    /// the transient gesture preview when one is live, the committed
    /// document geometry otherwise.
    pub fn live_geometry(&self, id: ObjectId) -> Option<ElementGeometry> {
        match &self.gesture {
            Gesture::Dragging {
                id: gid,
                start,
                preview: Some((x, y)),
                ..
            } if *gid == id => Some(ElementGeometry {
                x: *x,
                y: *y,
                ..*start
            }),
            Gesture::Resizing {
                id: gid,
                start,
                preview: Some(patch),
                ..
            } if *gid == id => Some(ElementGeometry {
                x: patch.x,
                y: patch.y,
                width: patch.width,
                height: patch.height,
                rotation: start.rotation,
            }),
            Gesture::Rotating {
                id: gid,
                start,
                preview: Some(rotation),
                ..
            } if *gid == id => Some(ElementGeometry {
                rotation: *rotation,
                ..*start
            }),
            _ => self.design().element(id).map(ElementGeometry::from),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Shell hooks ─────────────────────────────────────────────────────

    pub fn set_text_editing(&mut self, editing: bool) {
        self.text_editing = editing;
    }

    pub fn set_space_held(&mut self, held: bool) {
        self.space_held = held;
    }

    pub fn on_save(&mut self, hook: SaveHook) {
        self.save_hook = Some(hook);
    }

    /// Hand the complete current document to the host's save callback.
    pub fn save(&mut self) {
        if let Some(hook) = &mut self.save_hook {
            hook(self.history.present());
            log::debug!("design '{}' handed to save hook", self.history.present().name);
        }
    }

    /// Select an element by id (layer-list path; no canvas-lock filtering).
    pub fn select(&mut self, id: Option<ObjectId>) {
        self.selection = id;
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
        if mode == EditorMode::Simple {
            // One-time normalization; afterwards insert/reorder maintain
            // the band.
            let mut next = self.history.present().clone();
            if layers::normalize_band(&mut next) {
                self.history.set(next);
            }
        }
    }

    // ─── Edits ───────────────────────────────────────────────────────────

    /// Apply a command through the history manager. Every user-visible edit
    /// takes this path; rejected commands leave both document and history
    /// untouched. Returns whether the document changed.
    pub fn dispatch(&mut self, command: EditorCommand) -> bool {
        let restricted = self.mode == EditorMode::Simple;
        match commands::apply(self.history.present(), &command, restricted) {
            Some(next) => {
                log::debug!("apply {command:?}");
                self.history.set(next);
                true
            }
            None => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// The single entry point for canvas input.
    pub fn handle(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown {
                x, y, button, ..
            } => self.pointer_down(*x, *y, *button),
            InputEvent::PointerMove { x, y, modifiers } => {
                self.pointer_move(*x, *y, modifiers.shift);
            }
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Wheel {
                x,
                y,
                delta_x,
                delta_y,
                modifiers,
            } => {
                if modifiers.command() {
                    let factor = (-(*delta_y as f64) * WHEEL_ZOOM_STEP).exp() as f32;
                    self.viewport.zoom_about(Point::new(*x as f64, *y as f64), factor);
                } else {
                    self.viewport.pan_by(-delta_x, -delta_y);
                }
            }
            InputEvent::Key { key, modifiers } => {
                if self.text_editing {
                    return;
                }
                if let Some(action) = ShortcutMap::resolve(key, *modifiers) {
                    self.shortcut(action);
                }
            }
        }
    }

    /// Abort the active gesture without committing; the document is left
    /// exactly as it was. Hosts call this on capture loss (tab blur,
    /// window resize).
    pub fn cancel_gesture(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Unconditional release on abnormal pointer termination.
    pub fn pointer_lost(&mut self) {
        self.cancel_gesture();
    }

    fn pointer_down(&mut self, x: f32, y: f32, button: PointerButton) {
        match button {
            PointerButton::Middle => {
                self.gesture = Gesture::Panning { last: (x, y) };
                return;
            }
            PointerButton::Right => return,
            PointerButton::Left if self.space_held => {
                self.gesture = Gesture::Panning { last: (x, y) };
                return;
            }
            PointerButton::Left => {}
        }

        let (mx, my) = self.viewport.to_doc(x, y);
        let scale = self.viewport.scale();
        let design = self.history.present();

        // Handles of the selected element win over element bodies.
        if let Some(sel) = self.selection
            && let Some(el) = design.element(sel)
            && !el.locked
            && let Some(handle) = hit::handle_at(el, mx, my, scale)
        {
            let start = ElementGeometry::from(el);
            match handle {
                HandleHit::Resize(corner) if el.capabilities().resizable => {
                    self.gesture = Gesture::Resizing {
                        id: sel,
                        corner,
                        aspect: AspectRule::for_element(el),
                        start,
                        anchor_px: (x, y),
                        preview: None,
                    };
                    return;
                }
                HandleHit::Rotate => {
                    self.gesture = Gesture::Rotating {
                        id: sel,
                        start,
                        anchor_px: (x, y),
                        preview: None,
                    };
                    return;
                }
                _ => {}
            }
        }

        match hit::element_at(design, mx, my) {
            Some(id) => {
                self.selection = Some(id);
                let el = design.element(id).map(ElementGeometry::from);
                let locked = design.element(id).map(|el| el.locked).unwrap_or(true);
                if let Some(start) = el
                    && !locked
                {
                    self.gesture = Gesture::Dragging {
                        id,
                        start,
                        anchor_px: (x, y),
                        preview: None,
                        lines: SnapLines::default(),
                    };
                }
            }
            None => self.selection = None,
        }
    }

    fn pointer_move(&mut self, x: f32, y: f32, snap_modifier: bool) {
        match &mut self.gesture {
            Gesture::Idle => {}

            Gesture::Dragging {
                start,
                anchor_px,
                preview,
                lines,
                ..
            } => {
                let scale = self.viewport.scale();
                let cx = start.x + px_to_mm(x - anchor_px.0, scale);
                let cy = start.y + px_to_mm(y - anchor_px.1, scale);
                let design = self.history.present();
                *lines = snap::preview(
                    design.width,
                    design.height,
                    &design.guides,
                    SnapCandidate {
                        x: cx,
                        y: cy,
                        width: start.width,
                        height: start.height,
                    },
                );
                *preview = Some((cx, cy));
            }

            Gesture::Resizing {
                corner,
                aspect,
                start,
                anchor_px,
                preview,
                ..
            } => {
                let delta = Vec2::new((x - anchor_px.0) as f64, (y - anchor_px.1) as f64);
                *preview = Some(transform::resize(
                    *start,
                    *corner,
                    delta,
                    self.viewport.scale(),
                    *aspect,
                ));
            }

            Gesture::Rotating {
                start,
                anchor_px,
                preview,
                ..
            } => {
                let (cx, cy) = (
                    start.x + start.width / 2.0,
                    start.y + start.height / 2.0,
                );
                let (sx, sy) = self.viewport.to_screen(cx, cy);
                *preview = Some(transform::rotate(
                    Point::new(sx as f64, sy as f64),
                    Point::new(anchor_px.0 as f64, anchor_px.1 as f64),
                    Point::new(x as f64, y as f64),
                    start.rotation,
                    snap_modifier,
                ));
            }

            Gesture::Panning { last } => {
                let (dx, dy) = (x - last.0, y - last.1);
                *last = (x, y);
                self.viewport.pan_by(dx, dy);
            }
        }
    }

    fn pointer_up(&mut self) {
        // Capture is released unconditionally: whatever happens below, the
        // gesture is over.
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Idle | Gesture::Panning { .. } => {}

            Gesture::Dragging {
                id,
                start,
                preview: Some((cx, cy)),
                ..
            } => {
                let design = self.history.present();
                let (x, y) = snap::commit(
                    design.width,
                    design.height,
                    &design.guides,
                    SnapCandidate {
                        x: cx,
                        y: cy,
                        width: start.width,
                        height: start.height,
                    },
                );
                if (x, y) != (start.x, start.y) {
                    self.dispatch(EditorCommand::MoveElement { id, x, y });
                }
            }

            Gesture::Resizing {
                id,
                start,
                preview: Some(patch),
                ..
            } => {
                let unchanged = patch.x == start.x
                    && patch.y == start.y
                    && patch.width == start.width
                    && patch.height == start.height;
                if !unchanged {
                    self.dispatch(EditorCommand::ApplyGeometry { id, patch });
                }
            }

            Gesture::Rotating {
                id,
                start,
                preview: Some(rotation),
                ..
            } => {
                if rotation != start.rotation {
                    self.dispatch(EditorCommand::SetRotation { id, rotation });
                }
            }

            // A press that never moved commits nothing.
            Gesture::Dragging { .. } | Gesture::Resizing { .. } | Gesture::Rotating { .. } => {}
        }
    }

    fn shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Undo => {
                self.history.undo();
            }
            ShortcutAction::Redo => {
                self.history.redo();
            }
            ShortcutAction::Save => self.save(),

            ShortcutAction::Deselect => {
                if matches!(self.gesture, Gesture::Idle) {
                    self.selection = None;
                } else {
                    // Escape mid-gesture aborts the gesture, keeps selection.
                    self.cancel_gesture();
                }
            }

            ShortcutAction::Delete => {
                if let Some(id) = self.selection
                    && self.dispatch(EditorCommand::DeleteElement { id })
                {
                    self.selection = None;
                }
            }

            ShortcutAction::Duplicate => {
                if let Some(id) = self.selection {
                    self.dispatch(EditorCommand::DuplicateElement { id });
                }
            }

            ShortcutAction::Nudge { dir, fine } => {
                if let Some(id) = self.selection
                    && let Some(el) = self.history.present().element(id)
                {
                    let distance = if fine { NUDGE_FINE_MM } else { NUDGE_MM };
                    let (ux, uy) = dir.unit();
                    let (x, y) = (el.x + ux * distance, el.y + uy * distance);
                    self.dispatch(EditorCommand::MoveElement { id, x, y });
                }
            }

            ShortcutAction::SendBackward => {
                if let Some(id) = self.selection {
                    self.dispatch(EditorCommand::SendBackward { id });
                }
            }
            ShortcutAction::BringForward => {
                if let Some(id) = self.selection {
                    self.dispatch(EditorCommand::BringForward { id });
                }
            }
            ShortcutAction::SendToBack => {
                if let Some(id) = self.selection {
                    self.dispatch(EditorCommand::SendToBack { id });
                }
            }
            ShortcutAction::BringToFront => {
                if let Some(id) = self.selection {
                    self.dispatch(EditorCommand::BringToFront { id });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use bl_core::model::{ElementKind, LabelElement};

    fn press(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    fn drag(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    fn release(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    fn key(k: &str, modifiers: Modifiers) -> InputEvent {
        InputEvent::Key {
            key: k.to_string(),
            modifiers,
        }
    }

    fn session_with_shape() -> EditorSession {
        let mut design = LabelDesign::new("lager", 90.0, 120.0);
        let mut el = LabelElement::new(ElementKind::Shape);
        el.x = 10.0;
        el.y = 10.0;
        el.width = 20.0;
        el.height = 20.0;
        design.elements.push(el);
        EditorSession::new(design)
    }

    #[test]
    fn click_selects_and_drag_commits_one_entry() {
        let mut session = session_with_shape();
        let id = session.design().elements[0].id;

        session.handle(&press(15.0, 15.0));
        assert_eq!(session.selection(), Some(id));

        // Many move frames: still zero history entries.
        for i in 1..=10 {
            session.handle(&drag(15.0 + i as f32, 15.0));
        }
        assert!(!session.can_undo(), "live drag must not touch history");

        session.handle(&release(25.0, 15.0));
        assert_eq!(session.design().elements[0].x, 20.0);
        assert!(session.can_undo());

        session.undo();
        assert_eq!(session.design().elements[0].x, 10.0);
    }

    #[test]
    fn live_geometry_tracks_gesture_preview() {
        let mut session = session_with_shape();
        let id = session.design().elements[0].id;

        session.handle(&press(15.0, 15.0));
        session.handle(&drag(19.0, 17.0));

        // The view sees the transient position; the document does not.
        let live = session.live_geometry(id).unwrap();
        assert_eq!((live.x, live.y), (14.0, 12.0));
        assert_eq!(session.design().elements[0].x, 10.0);

        session.handle(&release(19.0, 17.0));
        let live = session.live_geometry(id).unwrap();
        assert_eq!(live.x, session.design().elements[0].x);
    }

    #[test]
    fn click_on_empty_canvas_deselects() {
        let mut session = session_with_shape();
        session.handle(&press(15.0, 15.0));
        session.handle(&release(15.0, 15.0));
        assert!(session.selection().is_some());

        session.handle(&press(80.0, 110.0));
        assert!(session.selection().is_none());
    }

    #[test]
    fn escape_cancels_gesture_and_leaves_document() {
        let mut session = session_with_shape();
        session.handle(&press(15.0, 15.0));
        session.handle(&drag(60.0, 60.0));
        session.handle(&key("Escape", Modifiers::NONE));

        // Gesture gone, nothing committed; a stray release changes nothing.
        session.handle(&release(60.0, 60.0));
        assert_eq!(session.design().elements[0].x, 10.0);
        assert!(!session.can_undo());
        assert_eq!(session.selection(), Some(session.design().elements[0].id));
    }

    #[test]
    fn pointer_lost_releases_capture() {
        let mut session = session_with_shape();
        session.handle(&press(15.0, 15.0));
        session.handle(&drag(40.0, 40.0));
        session.pointer_lost();
        session.handle(&drag(70.0, 70.0));
        session.handle(&release(70.0, 70.0));
        assert_eq!(session.design().elements[0].x, 10.0);
        assert!(!session.can_undo());
    }

    #[test]
    fn locked_element_selects_but_never_drags() {
        let mut session = session_with_shape();
        {
            let id = session.design().elements[0].id;
            let mut design = session.design().clone();
            design.element_mut(id).unwrap().locked = true;
            session = EditorSession::new(design);
        }
        session.handle(&press(15.0, 15.0));
        assert!(session.selection().is_some());
        session.handle(&drag(50.0, 50.0));
        session.handle(&release(50.0, 50.0));
        assert_eq!(session.design().elements[0].x, 10.0);
        assert!(!session.can_undo());
    }

    #[test]
    fn nudges_commit_individually() {
        let mut session = session_with_shape();
        session.handle(&press(15.0, 15.0));
        session.handle(&release(15.0, 15.0));

        session.handle(&key("ArrowRight", Modifiers::NONE));
        session.handle(&key("ArrowRight", Modifiers::NONE));
        let fine = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        session.handle(&key("ArrowDown", fine));

        let el = &session.design().elements[0];
        assert!((el.x - 12.0).abs() < 1e-4);
        assert!((el.y - 10.1).abs() < 1e-4);

        // Three presses, three history entries.
        session.undo();
        session.undo();
        session.undo();
        let el = &session.design().elements[0];
        assert_eq!((el.x, el.y), (10.0, 10.0));
        assert!(!session.can_undo());
    }

    #[test]
    fn shortcuts_suppressed_while_text_editing() {
        let mut session = session_with_shape();
        session.handle(&press(15.0, 15.0));
        session.handle(&release(15.0, 15.0));
        session.set_text_editing(true);
        session.handle(&key("Delete", Modifiers::NONE));
        assert_eq!(session.design().elements.len(), 1);
        session.set_text_editing(false);
        session.handle(&key("Delete", Modifiers::NONE));
        assert!(session.design().elements.is_empty());
    }

    #[test]
    fn middle_button_pans_without_touching_document() {
        let mut session = session_with_shape();
        session.handle(&InputEvent::PointerDown {
            x: 50.0,
            y: 50.0,
            button: PointerButton::Middle,
            modifiers: Modifiers::NONE,
        });
        session.handle(&drag(70.0, 45.0));
        session.handle(&release(70.0, 45.0));

        assert_eq!(session.viewport().origin(), Vec2::new(20.0, -5.0));
        assert!(!session.can_undo());
    }

    #[test]
    fn space_drag_pans() {
        let mut session = session_with_shape();
        session.set_space_held(true);
        session.handle(&press(15.0, 15.0));
        session.handle(&drag(25.0, 15.0));
        session.handle(&release(25.0, 15.0));
        assert_eq!(session.viewport().origin(), Vec2::new(10.0, 0.0));
        // The element under the pointer was neither selected nor moved.
        assert!(session.selection().is_none());
        assert_eq!(session.design().elements[0].x, 10.0);
    }

    #[test]
    fn save_hook_receives_current_document() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let saved: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&saved);

        let mut session = session_with_shape();
        session.on_save(Box::new(move |design| {
            *sink.borrow_mut() = Some(design.name.clone());
        }));
        session.handle(&key(
            "s",
            Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        ));
        assert_eq!(saved.borrow().as_deref(), Some("lager"));
    }
}
