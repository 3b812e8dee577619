use std::error;

use crate::{PolygonList, TriangleWinding, TriangulationError, formats};

/// Describes the construction and layout of a triangle list
pub trait ListFormat<P: PolygonList + ?Sized> {
    /// The type responsible for constructing the triangle list.
    /// 
    /// This type can be `Self`, if you choose to implement both [ListFormat] and [ListBuilder] on the same type.
    type Builder: ListBuilder<P> + Sized;

    /// Constructs a [ListFormat::Builder], optionally using a reference to the [PolygonList] being triangulated.
    fn initialize(self, polygon_list: &P) -> Result<Self::Builder, <Self::Builder as ListBuilder<P>>::Error>;

    /// Wraps this format so triangles are emitted with the opposite [TriangleWinding]
    fn reversed(self) -> formats::ReverseListFormat<P, Self>
    where Self: Sized {
        formats::ReverseListFormat::new(self)
    }
}

/// Performs the construction of a triangle list
pub trait ListBuilder<P: PolygonList + ?Sized> {
    /// The triangle list output type
    type Output;
    /// The error type when the builder fails
    type Error: error::Error;

    /// The winding direction this builder expects for triangles
    const WINDING: TriangleWinding = TriangleWinding::Counterclockwise;

    /// Adds a triangle with the given indices. `polygon_list` is the list being triangulated, for builders which need vertex values.
    fn add_triangle(&mut self, polygon_list: &P, vi0: P::Index, vi1: P::Index, vi2: P::Index) -> Result<(), Self::Error>;

    /// Called when triangulation has completed to get the resulting output
    fn build(self) -> Result<Self::Output, Self::Error>;

    /// Called when triangulation encounters an error.
    /// 
    /// Any required cleanup (e.g. removing the partial triangulation added to an existing [Vec]) should be done here
    fn fail(self, error: &TriangulationError<Self::Error>);
}
