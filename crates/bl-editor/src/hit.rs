//! Hit testing: document point → element, and pointer → gesture handle.
//!
//! Element lookup walks the paint order back-to-front (last painted =
//! topmost) and is rotation-aware: the probe point is taken through the
//! inverse of the element's rotation about its center before the bounds
//! check. Elements locked away from the canvas are skipped entirely.

use bl_core::model::{LabelDesign, LabelElement};
use bl_core::transform::Corner;
use bl_core::{ObjectId, units};
use kurbo::Vec2;

/// Pointer slop around a resize/rotate handle, in screen pixels.
pub const HANDLE_RADIUS_PX: f32 = 6.0;

/// Distance of the rotation handle above the element's top edge, in screen
/// pixels (scale-invariant, like the handle chrome itself).
pub const ROTATE_HANDLE_OFFSET_PX: f32 = 24.0;

/// A hit on the selected element's gesture chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleHit {
    Resize(Corner),
    Rotate,
}

/// Rotate a document-space offset into the element's local frame.
fn to_element_local(offset: Vec2, rotation_deg: f32) -> Vec2 {
    let theta = (rotation_deg as f64).to_radians();
    let (sin, cos) = theta.sin_cos();
    Vec2::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos)
}

/// Inverse of `to_element_local`: local frame → document space.
fn to_document(offset: Vec2, rotation_deg: f32) -> Vec2 {
    to_element_local(offset, -rotation_deg)
}

/// Does the (possibly rotated) element contain the document point?
fn contains(el: &LabelElement, x_mm: f32, y_mm: f32) -> bool {
    let (cx, cy) = el.center();
    let local = to_element_local(
        Vec2::new((x_mm - cx) as f64, (y_mm - cy) as f64),
        el.rotation,
    );
    local.x.abs() as f32 <= el.width / 2.0 && local.y.abs() as f32 <= el.height / 2.0
}

/// The topmost canvas-selectable element at a document point, or `None`
/// for the background.
pub fn element_at(design: &LabelDesign, x_mm: f32, y_mm: f32) -> Option<ObjectId> {
    design
        .elements
        .iter()
        .rev()
        .find(|el| !el.canvas_locked && contains(el, x_mm, y_mm))
        .map(|el| el.id)
}

/// Hit test the selected element's handles at a document point.
///
/// Corner handles sit on the rotated bounding-box corners; the rotation
/// handle floats above the top-center. Corner handles win when both are in
/// range. Returns `None` when the pointer is on neither.
pub fn handle_at(el: &LabelElement, x_mm: f32, y_mm: f32, scale: f32) -> Option<HandleHit> {
    let radius = units::px_to_mm(HANDLE_RADIUS_PX, scale) as f64;
    let (cx, cy) = el.center();
    let center = Vec2::new(cx as f64, cy as f64);
    let probe = Vec2::new(x_mm as f64, y_mm as f64);

    for corner in Corner::ALL {
        let (ux, uy) = corner.unit_offset();
        let local = Vec2::new(
            (ux * el.width) as f64,
            (uy * el.height) as f64,
        );
        let pos = center + to_document(local, el.rotation);
        if (probe - pos).hypot() <= radius {
            return Some(HandleHit::Resize(corner));
        }
    }

    let offset_mm = units::px_to_mm(ROTATE_HANDLE_OFFSET_PX, scale);
    let local = Vec2::new(0.0, (-el.height / 2.0 - offset_mm) as f64);
    let pos = center + to_document(local, el.rotation);
    if (probe - pos).hypot() <= radius {
        return Some(HandleHit::Rotate);
    }

    None
}
