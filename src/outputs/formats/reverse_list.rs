use std::marker::PhantomData;

use crate::{ListBuilder, ListFormat, PolygonList, TriangleWinding, TriangulationError};

/// Wrapper which reverses the winding of a [ListFormat]. Created by [ListFormat::reversed].
pub struct ReverseListFormat<P: PolygonList + ?Sized, F: ListFormat<P>>(F, PhantomData<fn(&P)>);

impl<P: PolygonList + ?Sized, F: ListFormat<P>> ReverseListFormat<P, F> {
    pub(crate) fn new(format: F) -> Self {
        Self(format, PhantomData)
    }
}

impl<P: PolygonList + ?Sized, F: ListFormat<P>> ListFormat<P> for ReverseListFormat<P, F> {
    type Builder = ReverseListBuilder<P, F::Builder>;

    fn initialize(self, polygon_list: &P) -> Result<Self::Builder, <Self::Builder as ListBuilder<P>>::Error> {
        let builder = self.0.initialize(polygon_list)?;
        Ok(ReverseListBuilder(builder, PhantomData))
    }
}

/// Wrapper which reverses the winding of a [ListBuilder]
pub struct ReverseListBuilder<P: PolygonList + ?Sized, B: ListBuilder<P>>(B, PhantomData<fn(&P)>);

impl<P: PolygonList + ?Sized, B: ListBuilder<P>> ListBuilder<P> for ReverseListBuilder<P, B> {
    type Output = B::Output;
    type Error = B::Error;

    const WINDING: TriangleWinding = B::WINDING.reverse();

    fn add_triangle(&mut self, polygon_list: &P, vi0: P::Index, vi1: P::Index, vi2: P::Index) -> Result<(), Self::Error> {
        self.0.add_triangle(polygon_list, vi0, vi1, vi2)
    }

    fn build(self) -> Result<Self::Output, Self::Error> {
        self.0.build()
    }

    fn fail(self, error: &TriangulationError<Self::Error>) {
        self.0.fail(error);
    }
}
