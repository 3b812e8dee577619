use std::marker::PhantomData;

use crate::{ListFormat, PolygonList, TriangulationError, List, ListBuilder};

use super::GenericList;

/// A [ListFormat] which outputs the triangle list by their actual vertex values, not their indices
#[derive(Debug)]
pub struct DeindexedListFormat<P: PolygonList + ?Sized, L: List<P::Vertex>>
where P::Vertex: Clone {
    list: L,
    _phantom: PhantomData<fn(&P)>,
}

impl<P: PolygonList + ?Sized, L: List<P::Vertex>> DeindexedListFormat<P, L> 
where P::Vertex: Clone {
    /// Create a deindexed format which stores its output in the given [List]
    pub fn new(list: L) -> Self {
        Self { list, _phantom: PhantomData, }
    }
}

impl<P: PolygonList + ?Sized, L: List<P::Vertex>> ListFormat<P> for DeindexedListFormat<P, L> 
where P::Vertex: Clone {
    type Builder = DeindexedListBuilder<P, L>;

    fn initialize(self, _polygon_list: &P) -> Result<Self::Builder, <Self::Builder as ListBuilder<P>>::Error> {
        Ok(DeindexedListBuilder {
            list: GenericList::new(self.list),
            _phantom: PhantomData,
        })
    }
}

pub struct DeindexedListBuilder<P: PolygonList + ?Sized, L: List<P::Vertex>> 
where P::Vertex: Clone {
    list: GenericList<L, P::Vertex>,
    _phantom: PhantomData<fn(&P)>,
}

impl<P: PolygonList + ?Sized, L: List<P::Vertex>> ListBuilder<P> for DeindexedListBuilder<P, L> 
where P::Vertex: Clone {
    type Output = L;
    type Error = std::convert::Infallible;

    fn add_triangle(&mut self, polygon_list: &P, vi0: P::Index, vi1: P::Index, vi2: P::Index) -> Result<(), Self::Error> {
        let (v0, v1, v2) = (polygon_list.get_vertex(vi0).clone(), polygon_list.get_vertex(vi1).clone(), polygon_list.get_vertex(vi2).clone());
        self.list.push(v0, v1, v2);
        Ok(())
    }
    
    fn build(self) -> Result<Self::Output, Self::Error> {
        Ok(self.list.build())
    }

    fn fail(self, _error: &TriangulationError<Self::Error>) {
        self.list.fail();
    }
}
