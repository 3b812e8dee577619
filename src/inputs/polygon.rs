use std::ops;

use crate::{Kernel, ListBuilder, ListFormat, PolygonElement, PolygonList, TriangulationError, TriangulationOptions, Vertex, VertexIndex};

/// An indexable polygon's vertices
pub trait Polygon {
    /// The type of vertices of the polygon
    type Vertex: Vertex;
    /// A type used to uniquely identify a [Vertex] (e.g. [usize] for a [Vec<\[f32; 2\]>](Vec))
    type Index: VertexIndex;
    /// The [Iterator] type that [Polygon::iter_indices] returns
    type Iter<'i>: Iterator<Item=Self::Index>
    where Self: 'i;

    /// Provides the number of vertices of the polygon.
    fn vertex_count(&self) -> usize;

    /// Iterate through all [Polygon::Index]es of the polygon, in either clockwise or counter-clockwise order,
    /// without repeating the initial index.
    fn iter_indices(&self) -> Self::Iter<'_>;

    /// Get the [Polygon::Vertex] uniquely identified by the [Polygon::Index] value
    fn get_vertex(&self, index: Self::Index) -> &Self::Vertex;

    /// Treat this [Polygon] as a [PolygonList] containing a single polygon
    fn as_polygon_list(&self) -> SinglePolygon<'_, Self> {
        SinglePolygon(self)
    }

    /// Triangulate the polygon into the layout specified by `format`
    fn triangulate<'a, F: ListFormat<SinglePolygon<'a, Self>>>(&'a self, format: F) -> Result<<F::Builder as ListBuilder<SinglePolygon<'a, Self>>>::Output, TriangulationError<<F::Builder as ListBuilder<SinglePolygon<'a, Self>>>::Error>> {
        self.triangulate_with(format, &TriangulationOptions::default())
    }

    /// Triangulate the polygon into the layout specified by `format`, configured by `options`
    fn triangulate_with<'a, F: ListFormat<SinglePolygon<'a, Self>>>(&'a self, format: F, options: &TriangulationOptions) -> Result<<F::Builder as ListBuilder<SinglePolygon<'a, Self>>>::Output, TriangulationError<<F::Builder as ListBuilder<SinglePolygon<'a, Self>>>::Error>> {
        self.as_polygon_list().triangulate_with(format, options)
    }

    /// Triangulate the polygon using the geometric predicates of `kernel` instead of [RobustKernel](crate::RobustKernel)
    fn triangulate_with_kernel<'a, F: ListFormat<SinglePolygon<'a, Self>>, K: Kernel>(&'a self, format: F, options: &TriangulationOptions, kernel: K) -> Result<<F::Builder as ListBuilder<SinglePolygon<'a, Self>>>::Output, TriangulationError<<F::Builder as ListBuilder<SinglePolygon<'a, Self>>>::Error>> {
        self.as_polygon_list().triangulate_with_kernel(format, options, kernel)
    }
}

impl<V: Vertex, T: ops::Deref<Target=[V]>> Polygon for T {
    type Vertex = V;
    type Index = usize;
    type Iter<'i> = ops::Range<usize>
    where Self: 'i;

    fn vertex_count(&self) -> usize {
        (**self).len()
    }

    fn iter_indices(&self) -> Self::Iter<'_> {
        0..self.vertex_count()
    }

    fn get_vertex(&self, index: Self::Index) -> &Self::Vertex {
        &(**self)[index]
    }
}

/// Used to treat a single [Polygon] as a [PolygonList]. Created by [Polygon::as_polygon_list].
#[derive(Debug)]
pub struct SinglePolygon<'a, P: Polygon + ?Sized>(&'a P);

impl<'a, P: Polygon + ?Sized> Clone for SinglePolygon<'a, P> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl<'a, P: Polygon + ?Sized> Copy for SinglePolygon<'a, P> { }

impl<'a, P: Polygon + ?Sized> PolygonList for SinglePolygon<'a, P> {
    type Vertex = P::Vertex;
    type Index = P::Index;
    type IntoItem = PolygonElement<P::Index>;
    type Iter<'i> = std::iter::Map<P::Iter<'i>, fn(P::Index) -> PolygonElement<P::Index>>
    where Self: 'i;

    fn vertex_count(&self) -> usize {
        self.0.vertex_count()
    }

    fn iter_indices(&self) -> Self::Iter<'_> {
        self.0.iter_indices().map(PolygonElement::ContinuePolygon as fn(P::Index) -> PolygonElement<P::Index>)
    }

    fn get_vertex(&self, index: Self::Index) -> &Self::Vertex {
        self.0.get_vertex(index)
    }
}
