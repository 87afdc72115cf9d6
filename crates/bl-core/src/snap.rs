//! Magnetic guide resolution for element drags.
//!
//! Pure functions of the design dimensions, the guide set, and a candidate
//! geometry. The two axes never interact: a vertical line (the design's
//! vertical center line or a vertical guide) attracts the element's left,
//! center, and right x-positions; a horizontal line attracts top, center,
//! and bottom. Preview reports the active line for visual feedback only;
//! commit returns the adjusted position. Absence of a match is a normal
//! outcome, not an error.

use crate::model::{Guide, Orientation};
use crate::units::SNAP_TOLERANCE_MM;
use smallvec::SmallVec;

/// Unrotated bounding box of the candidate drop position (mm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapCandidate {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The magnetic lines active for a candidate position, one per axis.
/// `vertical` is an x-position in mm, `horizontal` a y-position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnapLines {
    pub vertical: Option<f32>,
    pub horizontal: Option<f32>,
}

/// One axis worth of resolution: the matched target line and the shift that
/// lands the matching edge/center exactly on it.
#[derive(Debug, Clone, Copy)]
struct AxisSnap {
    target: f32,
    shift: f32,
}

/// Scan every (target, candidate-position) pair on one axis and keep the
/// minimum-distance match inside the tolerance. Targets are scanned with
/// the design center line first, then guides in document order; a tie keeps
/// the first match found.
fn resolve_axis(start: f32, size: f32, targets: &[f32]) -> Option<AxisSnap> {
    let positions = [start, start + size / 2.0, start + size];
    let mut best: Option<(f32, AxisSnap)> = None;

    for &target in targets {
        for &pos in &positions {
            let dist = (target - pos).abs();
            if dist > SNAP_TOLERANCE_MM {
                continue;
            }
            if best.is_none_or(|(best_dist, _)| dist < best_dist) {
                best = Some((
                    dist,
                    AxisSnap {
                        target,
                        shift: target - pos,
                    },
                ));
            }
        }
    }

    best.map(|(_, snap)| snap)
}

/// Target lines on one axis: the design's own center line, then every guide
/// of the matching orientation. Vertical guides carry x-positions,
/// horizontal guides y-positions.
fn axis_targets(extent: f32, guides: &[Guide], orientation: Orientation) -> SmallVec<[f32; 8]> {
    let mut targets = SmallVec::new();
    targets.push(extent / 2.0);
    targets.extend(
        guides
            .iter()
            .filter(|g| g.orientation == orientation)
            .map(|g| g.position),
    );
    targets
}

/// Preview mode, called on every drag frame: which magnetic lines would the
/// candidate attach to? Does not move anything.
pub fn preview(
    design_width: f32,
    design_height: f32,
    guides: &[Guide],
    candidate: SnapCandidate,
) -> SnapLines {
    let x_targets = axis_targets(design_width, guides, Orientation::Vertical);
    let y_targets = axis_targets(design_height, guides, Orientation::Horizontal);
    SnapLines {
        vertical: resolve_axis(candidate.x, candidate.width, &x_targets).map(|s| s.target),
        horizontal: resolve_axis(candidate.y, candidate.height, &y_targets).map(|s| s.target),
    }
}

/// Commit mode, called on drop: the final `(x, y)` with each axis shifted so
/// its best match lands exactly on the target, or the raw position when no
/// line is within tolerance.
pub fn commit(
    design_width: f32,
    design_height: f32,
    guides: &[Guide],
    candidate: SnapCandidate,
) -> (f32, f32) {
    let x_targets = axis_targets(design_width, guides, Orientation::Vertical);
    let y_targets = axis_targets(design_height, guides, Orientation::Horizontal);

    let x = candidate.x
        + resolve_axis(candidate.x, candidate.width, &x_targets)
            .map(|s| s.shift)
            .unwrap_or(0.0);
    let y = candidate.y
        + resolve_axis(candidate.y, candidate.height, &y_targets)
            .map(|s| s.shift)
            .unwrap_or(0.0);
    (x, y)
}
