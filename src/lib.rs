//! Island map generation library
//!
//! Thresholds a multi-octave noise field into land and water, classifies a
//! marching-squares cell grid over it, traces closed coastline loops, and
//! renders them as smooth curves. Re-exports modules for use by binaries
//! and tools.

pub mod contour;
pub mod export;
pub mod field;
pub mod grid;
pub mod pass;
pub mod raster;
pub mod render;
pub mod tiles;
pub mod viewer;
