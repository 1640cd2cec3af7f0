mod close_holes;
mod dissolve_vertex;
mod point_merge;

pub use close_holes::{CloseHoles, CloseReport};
pub use dissolve_vertex::DissolveVertex;
pub use point_merge::PointMerge;
