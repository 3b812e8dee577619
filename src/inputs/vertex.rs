use num_traits::{ToPrimitive, real::Real};

/// A two-dimensional point. 
/// 
/// The coordinate type must implement [num_traits::real::Real], reexported as [crate::Real].
/// Coordinates are converted to [f64] for the geometric predicates, which is exact for [f32] and [f64].
pub trait Vertex {
    /// The type of the individual `x` and `y` coordinates
    type Coordinate: Real;

    /// The x [Vertex::Coordinate] value
    fn x(&self) -> Self::Coordinate;
    /// The y [Vertex::Coordinate] value
    fn y(&self) -> Self::Coordinate;
}

pub(crate) trait VertexExt: Vertex {
    /// The position as [f64]s, or [None] if either coordinate is not finite
    fn position(&self) -> Option<[f64; 2]> {
        let (x, y) = (self.x().to_f64()?, self.y().to_f64()?);
        if x.is_finite() && y.is_finite() {
            // Normalize -0.0 so equal positions hash equally
            Some([x + 0.0, y + 0.0])
        } else {
            None
        }
    }
}

impl<V: Vertex + ?Sized> VertexExt for V { }

impl<C: Real> Vertex for [C; 2] {
    type Coordinate = C;

    #[inline(always)]
    fn x(&self) -> Self::Coordinate {
        self[0]
    }

    #[inline(always)]
    fn y(&self) -> Self::Coordinate {
        self[1]
    }
}

impl<C: Real> Vertex for (C, C) {
    type Coordinate = C;

    #[inline(always)]
    fn x(&self) -> Self::Coordinate {
        self.0
    }

    #[inline(always)]
    fn y(&self) -> Self::Coordinate {
        self.1
    }
}
