//! Constrained Delaunay triangulation of polygons with holes.
//!
//! The polygons' vertices are inserted into a Delaunay triangulation, every polygon edge is then forced in as a
//! constrained edge, and each face is labeled with its nesting level: the number of polygon boundaries crossed to
//! reach it from the outside. Faces with an odd level are inside the domain and are emitted, in the layout chosen by
//! a [ListFormat].
//!
//! ```
//! let outer = [[0., 0.], [4., 0.], [4., 4.], [0., 4.]];
//! let holes = vec![vec![[1., 1.], [3., 1.], [3., 3.], [1., 3.]]];
//! let triangles = cdt2d::triangulate(&outer, &holes).unwrap();
//! assert_eq!(triangles.len(), 8);
//! ```

mod idx;
pub mod errors;
mod kernel;
mod cdt;
mod domain;
mod options;
mod engine;
mod inputs;
mod outputs;

#[cfg(feature = "debugging")]
pub mod debug;

#[cfg(any(test, feature = "benchmarking"))]
pub mod tests;

pub use errors::{DegenerateInputError, TriangulationError};
pub use idx::{Idx, IdxDisplay};
pub use kernel::{Kernel, Orientation, RobustKernel};
pub use cdt::{ConstrainedTriangulation, Face, FaceIdx, TriangulationVertex, VertexIdx};
pub use domain::{DomainLabels, Region, RegionIdx, in_domain, mark_domains};
pub use options::TriangulationOptions;

pub use inputs::*;
pub use outputs::*;

pub use num_traits::real::Real;

/// Triangulates the area inside `polygon` and outside every polygon of `holes`.
///
/// Triangles are returned as counterclockwise triples of the input vertices.
pub fn triangulate<V: Vertex + Clone>(polygon: &[V], holes: &[Vec<V>]) -> Result<Vec<[V; 3]>, TriangulationError> {
    PolygonWithHoles::new(polygon, holes).triangulate(formats::DeindexedListFormat::new(Vec::new()))
}
