//! Spatial partitioning for broad-phase collision detection
//!
//! The collision system talks to the partition only through the
//! [`SpatialQuery`] trait; [`UniformGrid`] is the implementation in use.

mod spatial_query;
mod uniform_grid;

pub use spatial_query::SpatialQuery;
pub use uniform_grid::UniformGrid;
