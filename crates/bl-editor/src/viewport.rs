//! View transform state: pan offset and zoom scale.
//!
//! The session owns `{origin, scale}` and pushes it to dependent overlays
//! (rulers, guide chrome) as `ViewTransform` snapshots — overlays subscribe
//! to state instead of polling live layout rectangles every frame.
//! `snapshot_if_changed` carries the last-pushed cache that short-circuits
//! redundant overlay redraws.

use bl_core::units::{MAX_SCALE, MIN_SCALE};
use kurbo::{Point, Vec2};

/// An immutable view-transform snapshot handed to overlays.
/// `origin` is the canvas-space pixel position of the document's (0,0)
/// corner; `scale` is pixels per millimeter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub origin: Vec2,
    pub scale: f32,
}

/// The mutable pan/zoom state owned by the editor session.
#[derive(Debug, Clone)]
pub struct Viewport {
    origin: Vec2,
    scale: f32,
    last_pushed: Option<ViewTransform>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            origin: Vec2::ZERO,
            scale: 1.0,
            last_pushed: None,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Scroll by a raw pixel delta (panning).
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.origin += Vec2::new(dx as f64, dy as f64);
    }

    /// Zoom by `factor` keeping the document point under `cursor` (canvas
    /// px) stationary: convert the cursor-relative offset to document
    /// coordinates at the old scale, then back to canvas coordinates at the
    /// new one. Scale is clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn zoom_about(&mut self, cursor: Point, factor: f32) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if new_scale == self.scale {
            return;
        }
        let doc = (cursor.to_vec2() - self.origin) / self.scale as f64;
        self.origin = cursor.to_vec2() - doc * new_scale as f64;
        self.scale = new_scale;
    }

    /// Canvas pixels → document millimeters.
    pub fn to_doc(&self, x_px: f32, y_px: f32) -> (f32, f32) {
        (
            ((x_px as f64 - self.origin.x) / self.scale as f64) as f32,
            ((y_px as f64 - self.origin.y) / self.scale as f64) as f32,
        )
    }

    /// Document millimeters → canvas pixels.
    pub fn to_screen(&self, x_mm: f32, y_mm: f32) -> (f32, f32) {
        (
            (self.origin.x + x_mm as f64 * self.scale as f64) as f32,
            (self.origin.y + y_mm as f64 * self.scale as f64) as f32,
        )
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            origin: self.origin,
            scale: self.scale,
        }
    }

    /// The push boundary for overlays: returns the current transform only
    /// when it differs from the last one taken, so an unchanged view never
    /// triggers a redraw.
    pub fn snapshot_if_changed(&mut self) -> Option<ViewTransform> {
        let current = self.transform();
        if self.last_pushed == Some(current) {
            return None;
        }
        self.last_pushed = Some(current);
        Some(current)
    }
}
