//! Shared-border midpoint solver for adjacent map regions.
//!
//! Region outlines come in as compact path descriptions, get linearized
//! into rings, and are sampled by arc length to find a point that sits on
//! the border two regions share. Results are memoized per unordered pair
//! and can be precomputed into a static table.

pub mod cache;
pub mod constants;
pub mod declaration;
pub mod error;
pub mod estimator;
pub mod geom;
pub mod path;
pub mod sampler;
pub mod table;

pub use cache::{BorderMarkers, MidpointCache, ShapePairKey, marker_segments};
pub use declaration::{EstimatorSpec, MapDeclaration, Region, build_table, build_table_with};
pub use error::{BorderError, Result};
pub use estimator::{
    BorderEstimator, DenseRunEstimator, EstimatorConfig, LiveCentroidEstimator, Strategy,
};
pub use geom::{Bounds, Point, Ring, Shape};
pub use path::{PathCommand, parse_path};
pub use sampler::{Outline, point_at_length, total_length};
pub use table::{MidpointTable, round1};
