//! Editor commands: every user-visible edit as one value.
//!
//! `apply` produces the edited document from the current one, or `None`
//! when the command is rejected (locked element, protected element,
//! out-of-range reorder) — rejection is always silent, the UI must never
//! crash mid-gesture. The session records each `Some` result through the
//! history manager, so one command is exactly one undo step.

use bl_core::model::{
    Background, Content, ElementKind, LabelDesign, LabelElement, Orientation, Style,
};
use bl_core::transform::GeometryPatch;
use bl_core::units::{DUPLICATE_OFFSET_MM, MIN_ELEMENT_MM};
use bl_core::{ObjectId, layers, transform};

/// A single document edit. Geometry values are in millimeters.
#[derive(Debug, Clone)]
pub enum EditorCommand {
    /// Place a new element with per-kind default geometry.
    AddElement { kind: ElementKind },
    /// Remove an element (rejected for protected kinds).
    DeleteElement { id: ObjectId },
    /// Clone an element with a fixed offset and a fresh id, appended to the
    /// paint order.
    DuplicateElement { id: ObjectId },
    /// Committed move from a drag or nudge (interaction path: rejected when
    /// the element is locked).
    MoveElement { id: ObjectId, x: f32, y: f32 },
    /// Committed resize from a gesture (interaction path).
    ApplyGeometry { id: ObjectId, patch: GeometryPatch },
    /// Committed rotation from a gesture (interaction path).
    SetRotation { id: ObjectId, rotation: f32 },
    /// Property-panel geometry edit: allowed on locked elements, still
    /// clamped to the minimum size.
    EditGeometry {
        id: ObjectId,
        x: Option<f32>,
        y: Option<f32>,
        width: Option<f32>,
        height: Option<f32>,
        rotation: Option<f32>,
    },
    /// Move the element at `from` to position `to` in the paint order.
    Reorder { from: usize, to: usize },
    SendBackward { id: ObjectId },
    BringForward { id: ObjectId },
    SendToBack { id: ObjectId },
    BringToFront { id: ObjectId },
    SetStyle { id: ObjectId, style: Style },
    SetContent { id: ObjectId, content: Content },
    SetName { id: ObjectId, name: Option<String> },
    SetLocked { id: ObjectId, locked: bool },
    SetAspectLock { id: ObjectId, aspect_lock: bool },
    SetBackground { background: Background },
    AddGuide {
        orientation: Orientation,
        position: f32,
    },
    MoveGuide { id: ObjectId, position: f32 },
    RemoveGuide { id: ObjectId },
}

/// Apply a command to `design`, returning the edited document, or `None`
/// when the command has no effect. `restricted` keeps brand elements in the
/// reserved top z-band.
pub fn apply(
    design: &LabelDesign,
    command: &EditorCommand,
    restricted: bool,
) -> Option<LabelDesign> {
    let mut next = design.clone();
    let changed = match command {
        EditorCommand::AddElement { kind } => {
            let mut el = LabelElement::new(*kind);
            if *kind == ElementKind::BrandFooter {
                // Footer defaults to a full-width strip along the bottom.
                el.x = 0.0;
                el.width = next.width;
                el.y = next.height - el.height;
            }
            layers::insert(&mut next, el, restricted);
            true
        }

        EditorCommand::DeleteElement { id } => match next.element(*id) {
            Some(el) if el.capabilities().deletable => {
                layers::remove(&mut next, *id);
                true
            }
            _ => false,
        },

        EditorCommand::DuplicateElement { id } => match next.element(*id) {
            Some(el) => {
                let mut copy = el.clone();
                copy.id = ObjectId::fresh(copy.kind.prefix());
                copy.x += DUPLICATE_OFFSET_MM;
                copy.y += DUPLICATE_OFFSET_MM;
                layers::insert(&mut next, copy, restricted);
                true
            }
            None => false,
        },

        EditorCommand::MoveElement { id, x, y } => match next.element_mut(*id) {
            Some(el) if !el.locked => {
                el.x = *x;
                el.y = *y;
                true
            }
            _ => false,
        },

        EditorCommand::ApplyGeometry { id, patch } => match next.element_mut(*id) {
            Some(el) if !el.locked && el.capabilities().resizable => {
                el.x = patch.x;
                el.y = patch.y;
                el.width = patch.width;
                el.height = patch.height;
                el.clamp_min_size();
                true
            }
            _ => false,
        },

        EditorCommand::SetRotation { id, rotation } => match next.element_mut(*id) {
            Some(el) if !el.locked => {
                el.rotation = transform::normalize_deg(*rotation);
                true
            }
            _ => false,
        },

        EditorCommand::EditGeometry {
            id,
            x,
            y,
            width,
            height,
            rotation,
        } => match next.element_mut(*id) {
            Some(el) => {
                if let Some(x) = x {
                    el.x = *x;
                }
                if let Some(y) = y {
                    el.y = *y;
                }
                if let Some(w) = width {
                    el.width = w.max(MIN_ELEMENT_MM);
                }
                if let Some(h) = height {
                    el.height = h.max(MIN_ELEMENT_MM);
                }
                if let Some(r) = rotation {
                    el.rotation = transform::normalize_deg(*r);
                }
                true
            }
            None => false,
        },

        EditorCommand::Reorder { from, to } => layers::reorder(&mut next, *from, *to, restricted),
        EditorCommand::SendBackward { id } => layers::send_backward(&mut next, *id, restricted),
        EditorCommand::BringForward { id } => layers::bring_forward(&mut next, *id, restricted),
        EditorCommand::SendToBack { id } => layers::send_to_back(&mut next, *id, restricted),
        EditorCommand::BringToFront { id } => layers::bring_to_front(&mut next, *id, restricted),

        EditorCommand::SetStyle { id, style } => match next.element_mut(*id) {
            Some(el) => {
                el.style = style.clone();
                true
            }
            None => false,
        },

        EditorCommand::SetContent { id, content } => match next.element_mut(*id) {
            Some(el) => {
                el.content = content.clone();
                true
            }
            None => false,
        },

        EditorCommand::SetName { id, name } => match next.element_mut(*id) {
            Some(el) => {
                el.name = name.clone();
                true
            }
            None => false,
        },

        EditorCommand::SetLocked { id, locked } => match next.element_mut(*id) {
            Some(el) => {
                el.locked = *locked;
                true
            }
            None => false,
        },

        EditorCommand::SetAspectLock { id, aspect_lock } => match next.element_mut(*id) {
            Some(el) => {
                el.aspect_lock = *aspect_lock;
                true
            }
            None => false,
        },

        EditorCommand::SetBackground { background } => {
            next.background = background.clone();
            true
        }

        EditorCommand::AddGuide {
            orientation,
            position,
        } => {
            next.guides
                .push(bl_core::model::Guide::new(*orientation, *position));
            true
        }

        EditorCommand::MoveGuide { id, position } => {
            match next.guides.iter_mut().find(|g| g.id == *id) {
                Some(guide) => {
                    guide.position = *position;
                    true
                }
                None => false,
            }
        }

        EditorCommand::RemoveGuide { id } => {
            let before = next.guides.len();
            next.guides.retain(|g| g.id != *id);
            next.guides.len() != before
        }
    };

    changed.then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl_core::layers;

    fn design_with(kinds: &[ElementKind]) -> LabelDesign {
        let mut design = LabelDesign::new("stout", 90.0, 120.0);
        for &kind in kinds {
            layers::insert(&mut design, LabelElement::new(kind), false);
        }
        design
    }

    #[test]
    fn delete_guard_protects_brand_elements() {
        let design = design_with(&[ElementKind::Text, ElementKind::BrandLogo]);
        let logo_id = design.elements[1].id;
        let result = apply(&design, &EditorCommand::DeleteElement { id: logo_id }, false);
        assert!(result.is_none(), "protected element must survive delete");

        let text_id = design.elements[0].id;
        let next = apply(&design, &EditorCommand::DeleteElement { id: text_id }, false).unwrap();
        assert_eq!(next.elements.len(), 1);
        assert_eq!(next.elements[0].id, logo_id);
    }

    #[test]
    fn duplicate_offsets_and_appends() {
        let mut design = design_with(&[ElementKind::Text, ElementKind::Shape]);
        design.elements[0].x = 10.0;
        design.elements[0].y = 10.0;
        let id = design.elements[0].id;

        let next = apply(&design, &EditorCommand::DuplicateElement { id }, false).unwrap();
        assert_eq!(next.elements.len(), 3);
        let copy = next.elements.last().unwrap();
        assert_ne!(copy.id, id);
        assert_eq!((copy.x, copy.y), (15.0, 15.0));
        assert_eq!(copy.z_index, 3);
    }

    #[test]
    fn move_rejected_on_locked_element() {
        let mut design = design_with(&[ElementKind::Text]);
        design.elements[0].locked = true;
        let id = design.elements[0].id;
        assert!(
            apply(
                &design,
                &EditorCommand::MoveElement {
                    id,
                    x: 50.0,
                    y: 50.0
                },
                false
            )
            .is_none()
        );
    }

    #[test]
    fn property_panel_edits_locked_element() {
        let mut design = design_with(&[ElementKind::Text]);
        design.elements[0].locked = true;
        let id = design.elements[0].id;
        let next = apply(
            &design,
            &EditorCommand::EditGeometry {
                id,
                x: Some(50.0),
                y: None,
                width: Some(2.0), // below minimum → clamped
                height: None,
                rotation: Some(370.0),
            },
            false,
        )
        .unwrap();
        let el = next.element(id).unwrap();
        assert_eq!(el.x, 50.0);
        assert_eq!(el.width, MIN_ELEMENT_MM);
        assert_eq!(el.rotation, 10.0);
    }

    #[test]
    fn brand_footer_spans_full_width() {
        let design = design_with(&[]);
        let next = apply(
            &design,
            &EditorCommand::AddElement {
                kind: ElementKind::BrandFooter,
            },
            false,
        )
        .unwrap();
        let footer = &next.elements[0];
        assert_eq!(footer.x, 0.0);
        assert_eq!(footer.width, 90.0);
        assert_eq!(footer.y, 120.0 - footer.height);
    }

    #[test]
    fn resize_rejected_for_non_resizable_kind() {
        let design = design_with(&[ElementKind::BrandFooter]);
        let id = design.elements[0].id;
        let patch = GeometryPatch {
            x: 0.0,
            y: 0.0,
            width: 30.0,
            height: 30.0,
        };
        assert!(apply(&design, &EditorCommand::ApplyGeometry { id, patch }, false).is_none());
    }

    #[test]
    fn guide_lifecycle() {
        let design = design_with(&[]);
        let next = apply(
            &design,
            &EditorCommand::AddGuide {
                orientation: Orientation::Vertical,
                position: 20.0,
            },
            false,
        )
        .unwrap();
        assert_eq!(next.guides.len(), 1);
        let gid = next.guides[0].id;

        let moved = apply(
            &next,
            &EditorCommand::MoveGuide {
                id: gid,
                position: -4.0, // guides may leave the label bounds
            },
            false,
        )
        .unwrap();
        assert_eq!(moved.guides[0].position, -4.0);

        let cleared = apply(&moved, &EditorCommand::RemoveGuide { id: gid }, false).unwrap();
        assert!(cleared.guides.is_empty());
        assert!(
            apply(&cleared, &EditorCommand::RemoveGuide { id: gid }, false).is_none(),
            "removing a missing guide is a no-op"
        );
    }

    #[test]
    fn restricted_duplicate_stays_below_band() {
        let design = design_with(&[ElementKind::Text, ElementKind::BrandLogo]);
        let id = design.elements[0].id;
        let next = apply(&design, &EditorCommand::DuplicateElement { id }, true).unwrap();
        let kinds: Vec<ElementKind> = next.elements.iter().map(|el| el.kind).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Text, ElementKind::Text, ElementKind::BrandLogo]
        );
    }
}
