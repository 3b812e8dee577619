use std::{convert::Infallible, error, fmt};

use backtrace::Backtrace;

/// Describes why the provided polygons cannot be triangulated
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DegenerateInputError {
    /// The [PolygonList](crate::PolygonList) did not contain any vertices
    NoVertices,
    /// A polygon was encountered with fewer than 3 vertices
    NotEnoughVertices(usize),
    /// A coordinate was NaN, infinite, or could not be represented as an [f64]
    NonFiniteCoordinate,
    /// Two consecutive vertices of a polygon share the same position
    DuplicateVertex,
    /// All vertices lie on a single line, so the polygons enclose no area
    CollinearInput,
    /// A polygon edge crosses another polygon edge
    IntersectingConstraints,
    /// A point was inserted outside of the bounds a [ConstrainedTriangulation](crate::ConstrainedTriangulation) was created with
    OutsideBounds,
}

impl error::Error for DegenerateInputError { }

impl fmt::Display for DegenerateInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoVertices => write!(f, "Polygon set contains no vertices"),
            Self::NotEnoughVertices(vertices) => write!(f, "Polygon only contains {} vertices", vertices),
            Self::NonFiniteCoordinate => write!(f, "Polygon contains a non-finite coordinate"),
            Self::DuplicateVertex => write!(f, "Polygon contains consecutive duplicate vertices"),
            Self::CollinearInput => write!(f, "All polygon vertices are collinear"),
            Self::IntersectingConstraints => write!(f, "Polygon edges intersect"),
            Self::OutsideBounds => write!(f, "Point lies outside of the triangulation bounds"),
        }
    }
}

/// An internal invariant of the triangulation was violated.
///
/// Either a precondition was violated in a way that could not be detected up front, or a triangulation bug was encountered.
#[derive(Debug)]
pub struct InconsistentTriangulationError {
    pub msg: String,
    pub backtrace: Backtrace,
}

impl InconsistentTriangulationError {
    #[cold]
    #[inline(always)]
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            backtrace: Backtrace::new_unresolved(),
        }
    }
}

impl fmt::Display for InconsistentTriangulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{:?}", self.msg, self.backtrace)
    }
}

impl error::Error for InconsistentTriangulationError { }

/// Describes an error which occurred during triangulation
#[derive(Debug)]
#[non_exhaustive]
pub enum TriangulationError<BuilderError: error::Error = Infallible> {
    /// The input polygons are degenerate
    DegenerateInput(DegenerateInputError),
    /// An internal invariant of the triangulation was violated
    InconsistentTriangulation(InconsistentTriangulationError),
    /// The [ListBuilder](crate::ListBuilder) returned an error.
    Builder(BuilderError),
    #[cfg(feature = "debugging")]
    SvgOutput(std::io::Error),
}

impl<BuilderError: error::Error> TriangulationError<BuilderError> {
    #[cold]
    #[inline(always)]
    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        TriangulationError::InconsistentTriangulation(InconsistentTriangulationError::new(msg))
    }

    /// Returns the [DegenerateInputError], if that is what this error is
    pub fn degenerate_input(&self) -> Option<&DegenerateInputError> {
        match self {
            Self::DegenerateInput(error) => Some(error),
            _ => None,
        }
    }
}

impl TriangulationError {
    /// Reinterprets a builder-independent error as an error of any builder.
    pub fn widen<BuilderError: error::Error>(self) -> TriangulationError<BuilderError> {
        match self {
            Self::DegenerateInput(error) => TriangulationError::DegenerateInput(error),
            Self::InconsistentTriangulation(error) => TriangulationError::InconsistentTriangulation(error),
            Self::Builder(never) => match never { },
            #[cfg(feature = "debugging")]
            Self::SvgOutput(error) => TriangulationError::SvgOutput(error),
        }
    }
}

impl<BuilderError: error::Error> From<DegenerateInputError> for TriangulationError<BuilderError> {
    fn from(e: DegenerateInputError) -> Self {
        Self::DegenerateInput(e)
    }
}

impl<BuilderError: error::Error> From<InconsistentTriangulationError> for TriangulationError<BuilderError> {
    fn from(e: InconsistentTriangulationError) -> Self {
        Self::InconsistentTriangulation(e)
    }
}

impl<BuilderError: error::Error> fmt::Display for TriangulationError<BuilderError> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateInput(error) => fmt::Display::fmt(error, f),
            Self::InconsistentTriangulation(error) => fmt::Display::fmt(error, f),
            Self::Builder(error) => fmt::Display::fmt(error, f),
            #[cfg(feature = "debugging")]
            Self::SvgOutput(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl<BuilderError: error::Error> std::error::Error for TriangulationError<BuilderError> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DegenerateInput(error) => Some(error),
            Self::InconsistentTriangulation(error) => Some(error),
            Self::Builder(error) => error.source(), // This should be Some(error), but that forces restricting BuilderError to 'static.
            #[cfg(feature = "debugging")]
            Self::SvgOutput(error) => Some(error),
        }
    }
}
