use std::marker::PhantomData;

use crate::{ListFormat, PolygonList, TriangulationError, List, ListBuilder};

use super::GenericList;

/// A [ListFormat] which outputs the triangle list by its indices
#[derive(Debug)]
pub struct IndexedListFormat<P: PolygonList + ?Sized, L: List<P::Index>> {
    list: L,
    _phantom: PhantomData<fn(&P)>,
}

impl<P: PolygonList + ?Sized, L: List<P::Index>> IndexedListFormat<P, L> {
    /// Create an indexed format which stores its output in the given [List]
    pub fn new(list: L) -> Self {
        Self { list, _phantom: PhantomData, }
    }
}

impl<P: PolygonList + ?Sized, L: List<P::Index>> ListFormat<P> for IndexedListFormat<P, L> {
    type Builder = IndexedListBuilder<P, L>;

    fn initialize(self, _polygon_list: &P) -> Result<Self::Builder, <Self::Builder as ListBuilder<P>>::Error> {
        Ok(IndexedListBuilder {
            list: GenericList::new(self.list),
            _phantom: PhantomData,
        })
    }
}

pub struct IndexedListBuilder<P: PolygonList + ?Sized, L: List<P::Index>> {
    list: GenericList<L, P::Index>,
    _phantom: PhantomData<fn(&P)>,
}

impl<P: PolygonList + ?Sized, L: List<P::Index>> ListBuilder<P> for IndexedListBuilder<P, L> {
    type Output = L;
    type Error = std::convert::Infallible;

    fn add_triangle(&mut self, _polygon_list: &P, vi0: P::Index, vi1: P::Index, vi2: P::Index) -> Result<(), Self::Error> {
        self.list.push(vi0, vi1, vi2);
        Ok(())
    }
    
    fn build(self) -> Result<Self::Output, Self::Error> {
        Ok(self.list.build())
    }

    fn fail(self, _error: &TriangulationError<Self::Error>) {
        self.list.fail();
    }
}
