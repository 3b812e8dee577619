/// The orientation of an ordered triple of points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Counterclockwise,
    Clockwise,
    Collinear,
}

/// The geometric predicates a [ConstrainedTriangulation](crate::ConstrainedTriangulation) is built on.
///
/// Topological correctness of the triangulation depends on these being exact (or effectively exact):
/// the sign of each result must never be wrong, even for nearly degenerate input.
pub trait Kernel {
    /// Positive if `a`, `b`, `c` are in counterclockwise order, negative if clockwise, zero if collinear.
    fn orient2d(&self, a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64;

    /// Positive if `d` lies inside the circle through the counterclockwise triangle `a`, `b`, `c`,
    /// negative if outside, zero if all four points are cocircular.
    fn incircle(&self, a: [f64; 2], b: [f64; 2], c: [f64; 2], d: [f64; 2]) -> f64;

    fn orientation(&self, a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Orientation {
        let det = self.orient2d(a, b, c);
        if det > 0.0 {
            Orientation::Counterclockwise
        } else if det < 0.0 {
            Orientation::Clockwise
        } else {
            Orientation::Collinear
        }
    }
}

impl<K: Kernel + ?Sized> Kernel for &K {
    fn orient2d(&self, a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
        (**self).orient2d(a, b, c)
    }

    fn incircle(&self, a: [f64; 2], b: [f64; 2], c: [f64; 2], d: [f64; 2]) -> f64 {
        (**self).incircle(a, b, c, d)
    }
}

/// Adaptive precision predicates (Shewchuk's), as provided by the [robust] crate
#[derive(Debug, Default, Clone, Copy)]
pub struct RobustKernel;

#[inline(always)]
fn coord(p: [f64; 2]) -> robust::Coord<f64> {
    robust::Coord { x: p[0], y: p[1] }
}

impl Kernel for RobustKernel {
    #[inline]
    fn orient2d(&self, a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
        robust::orient2d(coord(a), coord(b), coord(c))
    }

    #[inline]
    fn incircle(&self, a: [f64; 2], b: [f64; 2], c: [f64; 2], d: [f64; 2]) -> f64 {
        robust::incircle(coord(a), coord(b), coord(c), coord(d))
    }
}
