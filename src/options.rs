/// Configuration for [PolygonList::triangulate_with](crate::PolygonList::triangulate_with)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriangulationOptions {
    /// Seed for the shuffle which decides the point insertion order.
    ///
    /// The output only depends on the input and this seed.
    pub seed: u64,
    /// Check the finished triangulation's invariants before emitting triangles, reporting any violation as an
    /// [InconsistentTriangulationError](crate::errors::InconsistentTriangulationError).
    ///
    /// On by default in debug builds.
    pub verify: bool,
}

impl TriangulationOptions {
    pub const DEFAULT_SEED: u64 = 0x5eed_cd72;

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            verify: cfg!(debug_assertions),
        }
    }
}
