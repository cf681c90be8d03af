//! 2D polyline geometry library supporting both line and circular arc segments (arcs defined by
//! vertex bulge values). Supplies parallel offsetting, boolean operations, spatial indexing,
//! intersection finding, and geometric property queries (area, path length, winding number,
//! extents, closest point).

#[macro_use]
mod macros;
pub mod intersect;
pub mod math;
pub mod num;
pub mod polyline;
pub mod spatial;

pub use polyline::{BooleanOp, BooleanResult, Polyline, Vertex};
