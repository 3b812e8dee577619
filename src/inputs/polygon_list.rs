use std::ops;

use crate::{Kernel, ListBuilder, ListFormat, Polygon, RobustKernel, TriangulationError, TriangulationOptions, Vertex, engine};

/// A type which can be used to index a specific [Vertex].
/// Automatically implemented for all [Eq] + [Clone] types
pub trait VertexIndex: Eq + Clone { }

impl<T> VertexIndex for T 
where T: Eq + Clone
{ }

/// Used to distinguish multiple polygons while iterating with 
/// [PolygonList::iter_indices].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolygonElement<Index: VertexIndex> {
    /// Provides a [VertexIndex] value that the [PolygonList] can convert to a [Vertex] 
    /// reference.
    ContinuePolygon(Index),
    /// Indicates that the next [ContinuePolygon](PolygonElement::ContinuePolygon) index belongs to a new polygon.
    /// It is not necessary to begin or end iteration with [NewPolygon](PolygonElement::NewPolygon).
    NewPolygon,
}

impl<Index: VertexIndex> From<Option<Index>> for PolygonElement<Index> {
    fn from(index: Option<Index>) -> Self {
        match index {
            Some(index) => PolygonElement::ContinuePolygon(index),
            None => PolygonElement::NewPolygon,
        }
    }
}

/// An indexable list of polygons and their vertices.
///
/// An outer boundary and its holes are simply separate polygons of the list: a point is inside the triangulated
/// domain if it is enclosed by an odd number of polygons.
pub trait PolygonList {
    /// The type of vertices of the polygons
    type Vertex: Vertex;
    /// A type used to uniquely identify a [Vertex] (e.g. `[usize; 2]` for a [Vec<Vec<\[f32; 2\]>>](Vec))
    type Index: VertexIndex;
    /// The [PolygonList::Index] [Iterator] type
    type IntoItem: Into<PolygonElement<Self::Index>>;
    /// The [Iterator] type that [PolygonList::iter_indices] returns
    type Iter<'i>: Iterator<Item=Self::IntoItem>
    where Self: 'i;

    /// Provides the total number of vertices among all polygons.
    fn vertex_count(&self) -> usize;

    /// Iterate through all `Index`es of all polygons.
    /// Indices must be returned in either clockwise or counter-clockwise order, 
    /// without repeating the initial index. Between each polygon, implementers
    /// must return a `NewPolygon` value.
    ///
    /// `ContinuePolygon` values must be yielded in successive groups of at least
    /// 3, otherwise triangulation will fail.
    ///
    /// Successive `NewPolygon`s are idempotent, and `NewPolygon`s as the initial 
    /// or final iteration values have no effect.
    fn iter_indices(&self) -> Self::Iter<'_>;

    /// Get the [PolygonList::Vertex] uniquely identified by `index`
    fn get_vertex(&self, index: Self::Index) -> &Self::Vertex;

    /// Triangulate the polygons into the layout specified by `format`
    fn triangulate<F: ListFormat<Self>>(&self, format: F) -> Result<<F::Builder as ListBuilder<Self>>::Output, TriangulationError<<F::Builder as ListBuilder<Self>>::Error>> {
        self.triangulate_with(format, &TriangulationOptions::default())
    }

    /// Triangulate the polygons into the layout specified by `format`, configured by `options`
    fn triangulate_with<F: ListFormat<Self>>(&self, format: F, options: &TriangulationOptions) -> Result<<F::Builder as ListBuilder<Self>>::Output, TriangulationError<<F::Builder as ListBuilder<Self>>::Error>> {
        self.triangulate_with_kernel(format, options, RobustKernel)
    }

    /// Triangulate the polygons using the geometric predicates of `kernel` instead of [RobustKernel]
    fn triangulate_with_kernel<F: ListFormat<Self>, K: Kernel>(&self, format: F, options: &TriangulationOptions, kernel: K) -> Result<<F::Builder as ListBuilder<Self>>::Output, TriangulationError<<F::Builder as ListBuilder<Self>>::Error>> {
        engine::triangulate(self, format, options, kernel)
    }
}

mod private {
    pub trait Loops {
        fn loop_count(&self) -> usize;
        fn loop_len(&self, l: usize) -> usize;
    }
}

/// [Iterator] over `[polygon, vertex]` indices of a list of polygons
pub struct NestedIndexIter<'a, L: private::Loops + ?Sized> {
    loops: &'a L,
    outer_index: usize,
    inner_index: usize,
}

impl<'a, L: private::Loops + ?Sized> NestedIndexIter<'a, L> {
    fn new(loops: &'a L) -> Self {
        Self {
            loops,
            outer_index: 0,
            inner_index: 0,
        }
    }
}

impl<'a, L: private::Loops + ?Sized> Iterator for NestedIndexIter<'a, L> {
    type Item = PolygonElement<[usize; 2]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.outer_index < self.loops.loop_count() {
            Some(if self.inner_index < self.loops.loop_len(self.outer_index) {
                let result = [self.outer_index, self.inner_index];
                self.inner_index += 1;
                PolygonElement::ContinuePolygon(result)
            } else {
                self.inner_index = 0;
                self.outer_index += 1;
                PolygonElement::NewPolygon
            })
        } else {
            None
        }
    }
}

impl<V: Vertex, P: Polygon<Vertex=V, Index=usize>, D: ops::Deref<Target=[P]>> private::Loops for D {
    fn loop_count(&self) -> usize {
        (**self).len()
    }

    fn loop_len(&self, l: usize) -> usize {
        self[l].vertex_count()
    }
}

impl<V: Vertex, P: Polygon<Vertex=V, Index=usize> + 'static, D: ops::Deref<Target=[P]>> PolygonList for D {
    type Vertex = V;
    type Index = [usize; 2];
    type IntoItem = PolygonElement<Self::Index>;
    type Iter<'i> = NestedIndexIter<'i, Self>
    where Self: 'i;

    fn vertex_count(&self) -> usize {
        (**self).iter().map(|p| p.vertex_count()).sum()
    }

    fn iter_indices(&self) -> Self::Iter<'_> {
        NestedIndexIter::new(self)
    }

    fn get_vertex(&self, index: Self::Index) -> &Self::Vertex {
        let [i0, i1] = index;
        self[i0].get_vertex(i1)
    }
}

/// An outer boundary polygon together with the holes cut out of it.
///
/// Indexed by `[polygon, vertex]`, where polygon `0` is the outer boundary and polygon `k + 1` is hole `k`.
#[derive(Debug, Clone, Copy)]
pub struct PolygonWithHoles<'a, O, H> {
    outer: O,
    holes: &'a [H],
}

impl<'a, O: Polygon<Index=usize>, H: Polygon<Vertex=O::Vertex, Index=usize>> PolygonWithHoles<'a, O, H> {
    pub fn new(outer: O, holes: &'a [H]) -> Self {
        Self { outer, holes }
    }

    pub fn outer(&self) -> &O { &self.outer }

    pub fn holes(&self) -> &'a [H] { self.holes }
}

impl<'a, O: Polygon<Index=usize>, H: Polygon<Vertex=O::Vertex, Index=usize>> private::Loops for PolygonWithHoles<'a, O, H> {
    fn loop_count(&self) -> usize {
        self.holes.len() + 1
    }

    fn loop_len(&self, l: usize) -> usize {
        match l {
            0 => self.outer.vertex_count(),
            l => self.holes[l - 1].vertex_count(),
        }
    }
}

impl<'a, O: Polygon<Index=usize>, H: Polygon<Vertex=O::Vertex, Index=usize>> PolygonList for PolygonWithHoles<'a, O, H> {
    type Vertex = O::Vertex;
    type Index = [usize; 2];
    type IntoItem = PolygonElement<Self::Index>;
    type Iter<'i> = NestedIndexIter<'i, Self>
    where Self: 'i;

    fn vertex_count(&self) -> usize {
        self.outer.vertex_count() + self.holes.iter().map(|h| h.vertex_count()).sum::<usize>()
    }

    fn iter_indices(&self) -> Self::Iter<'_> {
        NestedIndexIter::new(self)
    }

    fn get_vertex(&self, index: Self::Index) -> &Self::Vertex {
        match index {
            [0, i] => self.outer.get_vertex(i),
            [l, i] => self.holes[l - 1].get_vertex(i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_indices() {
        let ps = vec![vec![[0., 0.], [1., 0.], [0., 1.]], vec![], vec![[2., 2.], [3., 2.], [2., 3.]]];
        let elements: Vec<_> = ps.iter_indices().collect();
        assert_eq!(elements.iter().filter(|e| matches!(e, PolygonElement::ContinuePolygon(_))).count(), 6);
        assert_eq!(elements[3], PolygonElement::NewPolygon);
        assert_eq!(ps.get_vertex([2, 1]), &[3., 2.]);
        assert_eq!(PolygonList::vertex_count(&ps), 6);
    }

    #[test]
    fn polygon_with_holes() {
        let outer = [[0., 0.], [4., 0.], [4., 4.], [0., 4.]];
        let holes = vec![vec![[1., 1.], [3., 1.], [3., 3.], [1., 3.]]];
        let pwh = PolygonWithHoles::new(&outer[..], &holes);
        assert_eq!(PolygonList::vertex_count(&pwh), 8);
        assert_eq!(pwh.get_vertex([0, 2]), &[4., 4.]);
        assert_eq!(pwh.get_vertex([1, 2]), &[3., 3.]);
        let first_hole_vertex = pwh.iter_indices().position(|e| e == PolygonElement::ContinuePolygon([1, 0]));
        assert_eq!(first_hole_vertex, Some(5));
    }
}
