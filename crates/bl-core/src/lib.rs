pub mod history;
pub mod id;
pub mod layers;
pub mod model;
pub mod snap;
pub mod transform;
pub mod units;

pub use history::History;
pub use id::ObjectId;
pub use model::*;
pub use snap::{SnapCandidate, SnapLines};
pub use transform::{AspectRule, Corner, ElementGeometry, GeometryPatch};
pub use units::{mm_to_px, px_to_mm};
