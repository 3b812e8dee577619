mod polygon;
pub use polygon::{Polygon, SinglePolygon};
mod polygon_list;
pub use polygon_list::{NestedIndexIter, PolygonElement, PolygonList, PolygonWithHoles, VertexIndex};
mod vertex;
pub use vertex::Vertex;
pub(crate) use vertex::VertexExt;
