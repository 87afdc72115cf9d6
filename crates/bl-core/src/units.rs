//! Millimeter ↔ pixel conversion and shared editor constants.
//!
//! Document geometry is stored in millimeters; the view works in pixels.
//! `scale` is the current pixels-per-millimeter zoom factor, clamped by the
//! viewport to `[MIN_SCALE, MAX_SCALE]`, so it is never zero or negative here.

/// Smallest width/height an element may reach (mm). Resize clamps, never rejects.
pub const MIN_ELEMENT_MM: f32 = 5.0;

/// Distance within which an edge or center snaps to a magnetic line (mm).
pub const SNAP_TOLERANCE_MM: f32 = 1.5;

/// Zoom limits, in pixels per millimeter.
pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 5.0;

/// Arrow-key nudge distances (mm). Fine nudge applies while Shift is held.
pub const NUDGE_MM: f32 = 1.0;
pub const NUDGE_FINE_MM: f32 = 0.1;

/// Offset applied to a duplicated element (mm, both axes).
pub const DUPLICATE_OFFSET_MM: f32 = 5.0;

/// Rotation snapping increment while the snap modifier is held (degrees).
pub const ROTATION_SNAP_DEG: f32 = 45.0;

/// Convert millimeters to on-screen pixels at the given scale.
pub fn mm_to_px(mm: f32, scale: f32) -> f32 {
    mm * scale
}

/// Convert on-screen pixels to millimeters at the given scale.
pub fn px_to_mm(px: f32, scale: f32) -> f32 {
    px / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_roundtrip() {
        for &v in &[-37.5f32, 0.0, 0.1, 12.0, 1000.25] {
            for &s in &[0.2f32, 1.0, 1.75, 5.0] {
                let back = px_to_mm(mm_to_px(v, s), s);
                assert!((back - v).abs() < 1e-4, "v={v} s={s} back={back}");
            }
        }
    }

    #[test]
    fn unit_scale_is_identity() {
        assert_eq!(mm_to_px(42.0, 1.0), 42.0);
        assert_eq!(px_to_mm(42.0, 1.0), 42.0);
    }
}
