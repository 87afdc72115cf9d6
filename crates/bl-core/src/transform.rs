//! Rotation-aware resize and rotate math.
//!
//! Pure geometry: both entry points take pointer data and a starting
//! geometry and return a complete result. Neither can fail — degenerate
//! input (zero-length pointer vectors) produces a defined answer instead
//! of an error, because nothing here is allowed to abort a live gesture.

use crate::model::LabelElement;
use crate::units::{MIN_ELEMENT_MM, ROTATION_SNAP_DEG, px_to_mm};
use kurbo::{Point, Vec2};

/// Snapshot of an element's geometry at gesture start (mm / degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

impl From<&LabelElement> for ElementGeometry {
    fn from(el: &LabelElement) -> Self {
        Self {
            x: el.x,
            y: el.y,
            width: el.width,
            height: el.height,
            rotation: el.rotation,
        }
    }
}

/// Resize output: a complete position + size patch, always satisfying the
/// minimum-size invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryPatch {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The corner being dragged during a resize. The opposite corner is the
/// anchor held fixed (in the element's local, pre-rotation frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Corner {
    /// Dragging a west corner moves the element's left edge.
    pub const fn is_west(self) -> bool {
        matches!(self, Corner::NorthWest | Corner::SouthWest)
    }

    /// Dragging a north corner moves the element's top edge.
    pub const fn is_north(self) -> bool {
        matches!(self, Corner::NorthWest | Corner::NorthEast)
    }

    pub const ALL: [Corner; 4] = [
        Corner::NorthWest,
        Corner::NorthEast,
        Corner::SouthWest,
        Corner::SouthEast,
    ];

    /// Corner offset from the element center in the local frame, as a
    /// fraction of (width, height): ±0.5 on each axis.
    pub const fn unit_offset(self) -> (f32, f32) {
        let sx = if self.is_west() { -0.5 } else { 0.5 };
        let sy = if self.is_north() { -0.5 } else { 0.5 };
        (sx, sy)
    }
}

/// How a resize constrains the width/height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRule {
    /// Width and height move independently.
    Free,
    /// Preserve the ratio the element had at gesture start.
    Preserve,
    /// Width must equal height (QR codes).
    Square,
}

impl AspectRule {
    /// The rule for an element: kind capability first, then the instance flag.
    pub fn for_element(el: &LabelElement) -> Self {
        if el.capabilities().fixed_square {
            AspectRule::Square
        } else if el.aspect_lock {
            AspectRule::Preserve
        } else {
            AspectRule::Free
        }
    }
}

/// Rotate a screen-space vector into the element's local axes.
///
/// A rotated element's width/height axes are not aligned with the screen, so
/// a raw pointer delta must be taken through the inverse of the element's
/// view rotation before it can mean "wider" or "taller".
fn to_local(delta: Vec2, rotation_deg: f32) -> Vec2 {
    let theta = (rotation_deg as f64).to_radians();
    let (sin, cos) = theta.sin_cos();
    Vec2::new(delta.x * cos - delta.y * sin, delta.x * sin + delta.y * cos)
}

/// Compute the geometry resulting from dragging `corner` by `screen_delta_px`
/// (raw pixels since drag start) at the given view scale.
///
/// Width and height are floored at the 5mm minimum before aspect handling.
/// The non-dragged corner stays fixed in the element's local frame: west
/// corners shift `x` by the width change, north corners shift `y` by the
/// height change. The anchor is not compensated for rotation-induced center
/// drift; under combined rotation + resize the on-screen anchor drifts
/// slightly, an accepted behavior of this editor.
pub fn resize(
    start: ElementGeometry,
    corner: Corner,
    screen_delta_px: Vec2,
    scale: f32,
    aspect: AspectRule,
) -> GeometryPatch {
    let delta_mm = Vec2::new(
        px_to_mm(screen_delta_px.x as f32, scale) as f64,
        px_to_mm(screen_delta_px.y as f32, scale) as f64,
    );
    let local = to_local(delta_mm, start.rotation);

    // Corner sign: dragging an east/south corner grows the axis, dragging
    // a west/north corner grows it when moving the other way.
    let dw = if corner.is_west() { -local.x } else { local.x } as f32;
    let dh = if corner.is_north() { -local.y } else { local.y } as f32;

    let mut width = (start.width + dw).max(MIN_ELEMENT_MM);
    let mut height = (start.height + dh).max(MIN_ELEMENT_MM);

    match aspect {
        AspectRule::Free => {}
        AspectRule::Square => {
            // Dominant axis: whichever changed more, relatively.
            let rel_w = (width / start.width - 1.0).abs();
            let rel_h = (height / start.height - 1.0).abs();
            let side = if rel_w >= rel_h { width } else { height }.max(MIN_ELEMENT_MM);
            width = side;
            height = side;
        }
        AspectRule::Preserve => {
            let ratio = start.width / start.height;
            let rel_w = (width / start.width - 1.0).abs();
            let rel_h = (height / start.height - 1.0).abs();
            if rel_w >= rel_h {
                height = width / ratio;
            } else {
                width = height * ratio;
            }
            // Floor the shorter axis, then derive the other so the ratio holds.
            if ratio >= 1.0 {
                height = height.max(MIN_ELEMENT_MM);
                width = height * ratio;
            } else {
                width = width.max(MIN_ELEMENT_MM);
                height = width / ratio;
            }
        }
    }

    let x = if corner.is_west() {
        start.x + (start.width - width)
    } else {
        start.x
    };
    let y = if corner.is_north() {
        start.y + (start.height - height)
    } else {
        start.y
    };

    GeometryPatch {
        x,
        y,
        width,
        height,
    }
}

/// Compute the rotation for a rotate-handle drag.
///
/// The angle between the drag-start pointer vector and the current pointer
/// vector (both relative to `center`) is added to the rotation at drag
/// start. With `snap` held the result snaps to the nearest 45° multiple.
/// Zero-length vectors contribute a defined 0 angle rather than failing.
/// The result is normalized into `[0, 360)`.
pub fn rotate(
    center: Point,
    start_pointer: Point,
    current_pointer: Point,
    start_rotation_deg: f32,
    snap: bool,
) -> f32 {
    let v0 = start_pointer - center;
    let v1 = current_pointer - center;

    let delta_deg = if v0.hypot() < f64::EPSILON || v1.hypot() < f64::EPSILON {
        0.0
    } else {
        (v1.atan2() - v0.atan2()).to_degrees() as f32
    };

    let mut deg = start_rotation_deg + delta_deg;
    if snap {
        deg = (deg / ROTATION_SNAP_DEG).round() * ROTATION_SNAP_DEG;
    }
    normalize_deg(deg)
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_deg(deg: f32) -> f32 {
    deg.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(x: f32, y: f32, w: f32, h: f32, rot: f32) -> ElementGeometry {
        ElementGeometry {
            x,
            y,
            width: w,
            height: h,
            rotation: rot,
        }
    }

    #[test]
    fn unrotated_south_east_grows_both_axes() {
        let p = resize(
            geom(10.0, 10.0, 40.0, 20.0, 0.0),
            Corner::SouthEast,
            Vec2::new(10.0, 5.0),
            1.0,
            AspectRule::Free,
        );
        assert_eq!(p.width, 50.0);
        assert_eq!(p.height, 25.0);
        // Anchor (north-west corner) untouched
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 10.0);
    }

    #[test]
    fn north_west_drag_shifts_origin() {
        // Dragging NW by (-10, -5) grows the element and moves x/y with it.
        let p = resize(
            geom(30.0, 30.0, 40.0, 20.0, 0.0),
            Corner::NorthWest,
            Vec2::new(-10.0, -5.0),
            1.0,
            AspectRule::Free,
        );
        assert_eq!(p.width, 50.0);
        assert_eq!(p.height, 25.0);
        assert_eq!(p.x, 20.0);
        assert_eq!(p.y, 25.0);
    }

    #[test]
    fn rotated_quarter_turn_maps_screen_x_to_height() {
        // At 90° the local x-axis lies along the screen y-axis, so a purely
        // horizontal screen drag from the SE corner must change height.
        let p = resize(
            geom(0.0, 0.0, 40.0, 20.0, 90.0),
            Corner::SouthEast,
            Vec2::new(10.0, 0.0),
            1.0,
            AspectRule::Free,
        );
        assert_eq!(p.width, 40.0);
        assert!((p.height - 30.0).abs() < 1e-4, "height={}", p.height);
    }

    #[test]
    fn scale_converts_pixels_to_mm() {
        // 10px at scale 2.0 is 5mm.
        let p = resize(
            geom(0.0, 0.0, 40.0, 20.0, 0.0),
            Corner::SouthEast,
            Vec2::new(10.0, 0.0),
            2.0,
            AspectRule::Free,
        );
        assert!((p.width - 45.0).abs() < 1e-4);
    }

    #[test]
    fn minimum_size_clamp() {
        let p = resize(
            geom(0.0, 0.0, 40.0, 20.0, 0.0),
            Corner::SouthEast,
            Vec2::new(-200.0, -200.0),
            1.0,
            AspectRule::Free,
        );
        assert!(p.width >= MIN_ELEMENT_MM);
        assert!(p.height >= MIN_ELEMENT_MM);
    }

    #[test]
    fn aspect_preserve_keeps_start_ratio() {
        let start = geom(0.0, 0.0, 40.0, 20.0, 0.0);
        let p = resize(
            start,
            Corner::SouthEast,
            Vec2::new(20.0, 3.0),
            1.0,
            AspectRule::Preserve,
        );
        let ratio = p.width / p.height;
        assert!((ratio - 2.0).abs() < 1e-4, "ratio={ratio}");
        // X dominated (relative growth 50% vs 15%), so width wins.
        assert!((p.width - 60.0).abs() < 1e-4);
    }

    #[test]
    fn aspect_square_forces_equal_sides() {
        let p = resize(
            geom(0.0, 0.0, 20.0, 20.0, 0.0),
            Corner::SouthEast,
            Vec2::new(15.0, 4.0),
            1.0,
            AspectRule::Square,
        );
        assert_eq!(p.width, p.height);
        assert!((p.width - 35.0).abs() < 1e-4);
    }

    #[test]
    fn aspect_preserve_respects_minimum() {
        let p = resize(
            geom(0.0, 0.0, 40.0, 20.0, 0.0),
            Corner::SouthEast,
            Vec2::new(-100.0, -100.0),
            1.0,
            AspectRule::Preserve,
        );
        assert!(p.width >= MIN_ELEMENT_MM);
        assert!(p.height >= MIN_ELEMENT_MM);
        assert!((p.width / p.height - 2.0).abs() < 1e-4);
    }

    #[test]
    fn rotate_quarter_turn() {
        let deg = rotate(
            Point::new(50.0, 50.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 100.0),
            0.0,
            false,
        );
        assert!((deg - 90.0).abs() < 1e-4, "deg={deg}");
    }

    #[test]
    fn rotate_snaps_to_45() {
        let deg = rotate(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 8.0), // ~38.7°
            0.0,
            true,
        );
        assert_eq!(deg, 45.0);
    }

    #[test]
    fn rotate_degenerate_vector_is_defined() {
        let deg = rotate(
            Point::new(5.0, 5.0),
            Point::new(5.0, 5.0), // zero-length start vector
            Point::new(9.0, 5.0),
            30.0,
            false,
        );
        assert_eq!(deg, 30.0);
    }

    #[test]
    fn rotation_wraps_into_range() {
        assert_eq!(normalize_deg(370.0), 10.0);
        assert_eq!(normalize_deg(-30.0), 330.0);
        let deg = rotate(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, -1.0),
            0.0,
            true,
        );
        assert_eq!(deg, 0.0); // −5.7° snapped to 0, wrapped positive
    }
}
