use std::collections::VecDeque;

use log::trace;
use smallvec::{SmallVec, smallvec};

use crate::{DegenerateInputError, TriangulationError, idx::{Idx, IdxDisplay, SliceExt, SliceIndexIter, VecExt}, kernel::{Kernel, RobustKernel}};

/// Index of a vertex within a [ConstrainedTriangulation]
pub type VertexIdx = Idx<TriangulationVertex>;
/// Index of a face within a [ConstrainedTriangulation]
pub type FaceIdx = Idx<Face>;

/// The first three vertices of every triangulation form the enclosing super-triangle.
pub(crate) const AUXILIARY_VERTEX_COUNT: usize = 3;

#[derive(Debug, Clone)]
pub struct TriangulationVertex {
    position: [f64; 2],
    // Any face incident to this vertex
    face: Option<FaceIdx>,
}

impl TriangulationVertex {
    pub fn position(&self) -> [f64; 2] { self.position }
}

impl IdxDisplay for TriangulationVertex {
    fn fmt(f: &mut std::fmt::Formatter<'_>, idx: usize) -> std::fmt::Result {
        write!(f, "v{}", idx)
    }
}

/// A triangular face. Vertices are stored counterclockwise, and edge `i` is the edge opposite vertex `i`.
#[derive(Debug, Clone)]
pub struct Face {
    vertices: [VertexIdx; 3],
    neighbors: [Option<FaceIdx>; 3],
    constrained: [bool; 3],
}

impl IdxDisplay for Face {
    fn fmt(f: &mut std::fmt::Formatter<'_>, idx: usize) -> std::fmt::Result {
        write!(f, "f{}", idx)
    }
}

impl Face {
    fn new(vertices: [VertexIdx; 3]) -> Self {
        Self {
            vertices,
            neighbors: [None; 3],
            constrained: [false; 3],
        }
    }

    pub fn vertices(&self) -> [VertexIdx; 3] { self.vertices }

    /// The face across edge `i`, or [None] on the outside of the super-triangle
    pub fn neighbor(&self, i: usize) -> Option<FaceIdx> { self.neighbors[i] }

    pub fn is_constrained(&self, i: usize) -> bool { self.constrained[i] }

    /// The endpoints of edge `i`, in counterclockwise order
    pub fn edge(&self, i: usize) -> (VertexIdx, VertexIdx) {
        (self.vertices[(i + 1) % 3], self.vertices[(i + 2) % 3])
    }

    pub fn vertex_slot(&self, v: VertexIdx) -> Option<usize> {
        self.vertices.iter().position(|&fv| fv == v)
    }

    /// The slot of the directed edge `a -> b`, if this face has it
    fn edge_slot(&self, a: VertexIdx, b: VertexIdx) -> Option<usize> {
        (0..3).find(|&i| self.edge(i) == (a, b))
    }
}

enum Location {
    InFace(FaceIdx),
    OnEdge(FaceIdx, usize),
    OnVertex(VertexIdx),
}

enum Crossings {
    // The segment is already an edge of the triangulation
    Existing(FaceIdx, usize),
    // The segment passes through another vertex and must be inserted as two pieces
    Split(VertexIdx),
    // Edges crossing the segment, in order from the first endpoint to the second
    Edges(Vec<(VertexIdx, VertexIdx)>),
}

// An edge on the boundary of a set of faces being retriangulated, seen from inside
struct Rim {
    from: VertexIdx,
    to: VertexIdx,
    neighbor: Option<FaceIdx>,
    constrained: bool,
}

#[inline(always)]
fn opposite_signs(a: f64, b: f64) -> bool {
    (a > 0.0 && b < 0.0) || (a < 0.0 && b > 0.0)
}

/// A constrained Delaunay triangulation stored as arenas of vertices and faces.
///
/// Every point is enclosed by a super-triangle of three auxiliary vertices, created from the bounds the
/// triangulation is constructed with. Faces touching an auxiliary vertex lie outside of every input polygon.
#[derive(Debug, Clone)]
pub struct ConstrainedTriangulation<K: Kernel = RobustKernel> {
    kernel: K,
    vertices: Vec<TriangulationVertex>,
    faces: Vec<Face>,
    bounds: [[f64; 2]; 2],
    last_face: FaceIdx,
}

impl ConstrainedTriangulation<RobustKernel> {
    /// Create an empty triangulation which can hold points within the box spanned by `min` and `max`
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Result<Self, TriangulationError> {
        Self::with_kernel(min, max, RobustKernel)
    }
}

impl<K: Kernel> ConstrainedTriangulation<K> {
    pub fn with_kernel(min: [f64; 2], max: [f64; 2], kernel: K) -> Result<Self, TriangulationError> {
        if !min.iter().chain(max.iter()).all(|c| c.is_finite()) {
            return Err(DegenerateInputError::NonFiniteCoordinate.into());
        }

        let lo = [min[0].min(max[0]), min[1].min(max[1])];
        let hi = [min[0].max(max[0]), min[1].max(max[1])];
        let center = [(lo[0] + hi[0]) / 2.0, (lo[1] + hi[1]) / 2.0];
        let extent = (hi[0] - lo[0]).max(hi[1] - lo[1]);
        let extent = if extent > 0.0 { extent } else { 1.0 };

        let corners = [
            [center[0] - 20.0 * extent, center[1] - 10.0 * extent],
            [center[0] + 20.0 * extent, center[1] - 10.0 * extent],
            [center[0], center[1] + 20.0 * extent],
        ];
        if !corners.iter().flatten().all(|c| c.is_finite()) {
            return Err(DegenerateInputError::NonFiniteCoordinate.into());
        }

        let mut vertices: Vec<TriangulationVertex> = Vec::new();
        let mut faces: Vec<Face> = Vec::new();
        let face = faces.next_index();
        let super_vertices = corners.map(|position| vertices.push_get_index(TriangulationVertex { position, face: Some(face) }));
        faces.push(Face::new(super_vertices));

        Ok(Self {
            kernel,
            vertices,
            faces,
            bounds: [lo, hi],
            last_face: face,
        })
    }

    pub fn kernel(&self) -> &K { &self.kernel }

    pub fn bounds(&self) -> [[f64; 2]; 2] { self.bounds }

    /// Number of vertices, including the three auxiliary vertices
    pub fn vertex_count(&self) -> usize { self.vertices.len() }

    pub fn vertex(&self, v: VertexIdx) -> &TriangulationVertex { &self.vertices[v] }

    pub fn position(&self, v: VertexIdx) -> [f64; 2] { self.vertices[v].position }

    /// Is `v` one of the vertices of the enclosing super-triangle?
    pub fn is_auxiliary(&self, v: VertexIdx) -> bool { v.usize() < AUXILIARY_VERTEX_COUNT }

    pub fn auxiliary_vertices(&self) -> [VertexIdx; 3] {
        [Idx::new(0), Idx::new(1), Idx::new(2)]
    }

    pub fn face_count(&self) -> usize { self.faces.len() }

    pub fn face(&self, f: FaceIdx) -> &Face { &self.faces[f] }

    pub fn faces(&self) -> &[Face] { &self.faces }

    pub fn face_indices(&self) -> SliceIndexIter<Face> { self.faces.iter_index() }

    /// A face of the unbounded region outside every constraint
    pub fn outer_face(&self) -> FaceIdx {
        // The super-triangle vertices are never removed, so they always have an incident face
        self.vertices[0].face.unwrap_or(Idx::new(0))
    }

    /// Does face `f` touch the super-triangle?
    pub fn is_auxiliary_face(&self, f: FaceIdx) -> bool {
        self.faces[f].vertices.iter().any(|&v| self.is_auxiliary(v))
    }

    /// Number of constrained edges
    pub fn constraint_count(&self) -> usize {
        let half_edges: usize = self.faces.iter().map(|f| f.constrained.iter().filter(|&&c| c).count()).sum();
        half_edges / 2
    }

    /// Finds the face and slot of the edge between `a` and `b`, in either direction
    pub fn find_edge(&self, a: VertexIdx, b: VertexIdx) -> Option<(FaceIdx, usize)> {
        self.directed_edge(a, b).or_else(|| self.directed_edge(b, a))
    }

    pub fn is_constrained_edge(&self, a: VertexIdx, b: VertexIdx) -> bool {
        self.find_edge(a, b).map_or(false, |(f, i)| self.faces[f].constrained[i])
    }

    fn directed_edge(&self, a: VertexIdx, b: VertexIdx) -> Option<(FaceIdx, usize)> {
        self.faces_around(a).into_iter().find_map(|f| self.faces[f].edge_slot(a, b).map(|i| (f, i)))
    }

    /// All faces incident to `v`
    pub fn faces_around(&self, v: VertexIdx) -> SmallVec<[FaceIdx; 16]> {
        let start = match self.vertices[v].face {
            Some(start) => start,
            None => return SmallVec::new(),
        };

        let mut result: SmallVec<[FaceIdx; 16]> = smallvec![start];
        let mut f = start;
        let mut closed = false;
        while result.len() <= self.faces.len() {
            let k = match self.faces[f].vertex_slot(v) {
                Some(k) => k,
                None => break,
            };
            match self.faces[f].neighbors[(k + 1) % 3] {
                Some(n) if n == start => {
                    closed = true;
                    break;
                }
                Some(n) => {
                    result.push(n);
                    f = n;
                }
                None => break,
            }
        }

        if !closed {
            // The fan is open (only around auxiliary vertices), so also rotate the other way
            f = start;
            while result.len() <= self.faces.len() {
                let k = match self.faces[f].vertex_slot(v) {
                    Some(k) => k,
                    None => break,
                };
                match self.faces[f].neighbors[(k + 2) % 3] {
                    Some(n) if !result.contains(&n) => {
                        result.push(n);
                        f = n;
                    }
                    _ => break,
                }
            }
        }
        result
    }

    /// Inserts a point, returning its vertex. Inserting a position already present returns the existing vertex.
    pub fn insert_point(&mut self, position: [f64; 2]) -> Result<VertexIdx, TriangulationError> {
        if !position.iter().all(|c| c.is_finite()) {
            return Err(DegenerateInputError::NonFiniteCoordinate.into());
        }
        let [lo, hi] = self.bounds;
        if position[0] < lo[0] || position[0] > hi[0] || position[1] < lo[1] || position[1] > hi[1] {
            return Err(DegenerateInputError::OutsideBounds.into());
        }

        match self.locate(position)? {
            Location::OnVertex(v) => Ok(v),
            Location::InFace(f) => {
                let v = self.vertices.push_get_index(TriangulationVertex { position, face: None });
                self.split_face(f, v)?;
                Ok(v)
            }
            Location::OnEdge(f, i) => {
                let v = self.vertices.push_get_index(TriangulationVertex { position, face: None });
                self.split_edge(f, i, v)?;
                Ok(v)
            }
        }
    }

    fn locate(&self, p: [f64; 2]) -> Result<Location, TriangulationError> {
        let mut f = if self.last_face.usize() < self.faces.len() { self.last_face } else { Idx::new(0) };

        // A walk through a Delaunay triangulation visits each face at most once
        let limit = self.faces.len() * 3 + 3;
        for step in 0..limit {
            let face = &self.faces[f];
            let mut on_edges: SmallVec<[usize; 3]> = SmallVec::new();
            let mut next = None;
            // Rotate the first tested edge so the walk cannot cycle through constrained (non-Delaunay) regions forever
            for k in 0..3 {
                let i = (k + step) % 3;
                let (a, b) = face.edge(i);
                let det = self.kernel.orient2d(self.position(a), self.position(b), p);
                if det < 0.0 {
                    next = Some(face.neighbors[i].ok_or_else(|| TriangulationError::internal(format!("Point ({}, {}) escaped the super-triangle", p[0], p[1])))?);
                    break;
                } else if det == 0.0 {
                    on_edges.push(i);
                }
            }

            match next {
                Some(n) => f = n,
                None => return Ok(match on_edges.as_slice() {
                    [] => Location::InFace(f),
                    [i] => Location::OnEdge(f, *i),
                    [i, j, ..] => Location::OnVertex(face.vertices[3 - i - j]),
                }),
            }
        }
        Err(TriangulationError::internal(format!("Locating point ({}, {}) did not terminate", p[0], p[1])))
    }

    fn split_face(&mut self, f: FaceIdx, v: VertexIdx) -> Result<(), TriangulationError> {
        let [a, b, c] = self.faces[f].vertices;
        let new = self.retriangulate(&[f], &[[v, b, c], [a, v, c], [a, b, v]], &[])?;
        self.legalize(v, &new)
    }

    fn split_edge(&mut self, f: FaceIdx, i: usize, v: VertexIdx) -> Result<(), TriangulationError> {
        let face = &self.faces[f];
        let a = face.vertices[i];
        let (b, c) = face.edge(i);
        let constrained = face.constrained[i];
        let g = face.neighbors[i].ok_or_else(|| TriangulationError::internal(format!("Edge {}-{} on the super-triangle was split", b, c)))?;
        let j = self.faces[g].edge_slot(c, b).ok_or_else(|| TriangulationError::internal(format!("Faces {} and {} are not mutual neighbors", f, g)))?;
        let d = self.faces[g].vertices[j];

        let halves = [(v, b), (v, c)];
        let constrained_halves: &[(VertexIdx, VertexIdx)] = if constrained { &halves } else { &[] };
        let new = self.retriangulate(&[f, g], &[[a, b, v], [a, v, c], [d, c, v], [d, v, b]], constrained_halves)?;
        self.legalize(v, &new)
    }

    // Restore the Delaunay property around a newly inserted vertex `p`
    fn legalize(&mut self, p: VertexIdx, faces: &[FaceIdx]) -> Result<(), TriangulationError> {
        let mut stack: SmallVec<[FaceIdx; 16]> = faces.iter().copied().collect();
        while let Some(f) = stack.pop() {
            let i = match self.faces[f].vertex_slot(p) {
                Some(i) => i,
                None => continue,
            };
            if self.needs_flip(f, i)? {
                let new = self.flip(f, i)?;
                stack.extend(new);
            }
        }
        Ok(())
    }

    // The vertex across edge `i` of face `f`
    fn opposite(&self, f: FaceIdx, i: usize) -> Result<Option<(FaceIdx, VertexIdx)>, TriangulationError> {
        let face = &self.faces[f];
        match face.neighbors[i] {
            Some(g) => {
                let (a, b) = face.edge(i);
                let j = self.faces[g].edge_slot(b, a).ok_or_else(|| TriangulationError::internal(format!("Faces {} and {} are not mutual neighbors", f, g)))?;
                Ok(Some((g, self.faces[g].vertices[j])))
            }
            None => Ok(None),
        }
    }

    fn needs_flip(&self, f: FaceIdx, i: usize) -> Result<bool, TriangulationError> {
        if self.faces[f].constrained[i] {
            return Ok(false);
        }
        Ok(match self.opposite(f, i)? {
            Some((_, d)) => !self.is_delaunay_against(f, d),
            None => false,
        })
    }

    fn is_delaunay_against(&self, f: FaceIdx, d: VertexIdx) -> bool {
        let [a, b, c] = self.faces[f].vertices.map(|v| self.position(v));
        self.kernel.incircle(a, b, c, self.position(d)) <= 0.0
    }

    /// Is edge `i` of face `f` constrained, on the super-triangle, or locally Delaunay?
    pub fn is_locally_delaunay(&self, f: FaceIdx, i: usize) -> bool {
        !self.needs_flip(f, i).unwrap_or(true)
    }

    // Replaces the edge `i` of `f` with the other diagonal of the surrounding quadrilateral.
    // Both returned faces contain the vertex opposite the old edge in `f`.
    fn flip(&mut self, f: FaceIdx, i: usize) -> Result<[FaceIdx; 2], TriangulationError> {
        let p = self.faces[f].vertices[i];
        let (a, b) = self.faces[f].edge(i);
        let (g, d) = self.opposite(f, i)?.ok_or_else(|| TriangulationError::internal(format!("Edge {}-{} on the super-triangle was flipped", a, b)))?;
        trace!("flip {}-{} to {}-{}", a, b, p, d);
        let new = self.retriangulate(&[f, g], &[[p, a, d], [p, d, b]], &[])?;
        Ok([new[0], new[1]])
    }

    // Replaces the faces `old` with `triangles`, stitching neighbors and constraints back together.
    // The boundary of `triangles` must equal the boundary of `old`.
    fn retriangulate(&mut self, old: &[FaceIdx], triangles: &[[VertexIdx; 3]], constrained_edges: &[(VertexIdx, VertexIdx)]) -> Result<SmallVec<[FaceIdx; 4]>, TriangulationError> {
        let mut rims: SmallVec<[Rim; 8]> = SmallVec::new();
        for &f in old {
            let face = &self.faces[f];
            for i in 0..3 {
                let neighbor = face.neighbors[i];
                if neighbor.map_or(true, |n| !old.contains(&n)) {
                    let (from, to) = face.edge(i);
                    rims.push(Rim { from, to, neighbor, constrained: face.constrained[i] });
                }
            }
        }

        let mut new: SmallVec<[FaceIdx; 4]> = SmallVec::new();
        for (k, &triangle) in triangles.iter().enumerate() {
            let face = Face::new(triangle);
            let fi = match old.get(k) {
                Some(&fi) => {
                    self.faces[fi] = face;
                    fi
                }
                None => self.faces.push_get_index(face),
            };
            new.push(fi);
        }

        for x in 0..new.len() {
            for i in 0..3 {
                let (a, b) = self.faces[new[x]].edge(i);
                for y in (x + 1)..new.len() {
                    if let Some(j) = self.faces[new[y]].edge_slot(b, a) {
                        let constrained = constrained_edges.iter().any(|&(u, v)| (u, v) == (a, b) || (u, v) == (b, a));
                        self.faces[new[x]].neighbors[i] = Some(new[y]);
                        self.faces[new[x]].constrained[i] = constrained;
                        self.faces[new[y]].neighbors[j] = Some(new[x]);
                        self.faces[new[y]].constrained[j] = constrained;
                    }
                }
            }
        }

        for rim in rims {
            let (fi, i) = new.iter()
                .find_map(|&fi| self.faces[fi].edge_slot(rim.from, rim.to).map(|i| (fi, i)))
                .ok_or_else(|| TriangulationError::internal(format!("Edge {}-{} was lost during retriangulation", rim.from, rim.to)))?;
            self.faces[fi].neighbors[i] = rim.neighbor;
            self.faces[fi].constrained[i] = rim.constrained;
            if let Some(n) = rim.neighbor {
                let j = self.faces[n].edge_slot(rim.to, rim.from).ok_or_else(|| TriangulationError::internal(format!("Face {} does not contain edge {}-{}", n, rim.to, rim.from)))?;
                self.faces[n].neighbors[j] = Some(fi);
            }
        }

        for &fi in &new {
            for v in self.faces[fi].vertices {
                self.vertices[v].face = Some(fi);
            }
        }
        self.last_face = new[0];
        Ok(new)
    }

    fn set_constrained(&mut self, f: FaceIdx, i: usize) -> Result<(), TriangulationError> {
        self.faces[f].constrained[i] = true;
        if let Some((g, _)) = self.opposite(f, i)? {
            let (a, b) = self.faces[f].edge(i);
            if let Some(j) = self.faces[g].edge_slot(b, a) {
                self.faces[g].constrained[j] = true;
            }
        }
        Ok(())
    }

    /// Forces the segment between `a` and `b` to be an edge of the triangulation.
    ///
    /// Edges crossing the segment are flipped away, after which the Delaunay property is restored everywhere except across constrained edges.
    /// If the segment passes exactly through other vertices, it is inserted as several constrained edges.
    pub fn insert_constraint(&mut self, a: VertexIdx, b: VertexIdx) -> Result<(), TriangulationError> {
        let mut pending: SmallVec<[(VertexIdx, VertexIdx); 4]> = smallvec![(a, b)];
        while let Some((a, b)) = pending.pop() {
            if a == b {
                continue;
            }
            match self.constraint_crossings(a, b)? {
                Crossings::Existing(f, i) => self.set_constrained(f, i)?,
                Crossings::Split(x) => {
                    trace!("constraint {}-{} passes through {}", a, b, x);
                    pending.push((x, b));
                    pending.push((a, x));
                }
                Crossings::Edges(edges) => self.remove_crossings(a, b, edges)?,
            }
        }
        Ok(())
    }

    fn constraint_crossings(&self, a: VertexIdx, b: VertexIdx) -> Result<Crossings, TriangulationError> {
        if let Some((f, i)) = self.find_edge(a, b) {
            return Ok(Crossings::Existing(f, i));
        }

        let (pa, pb) = (self.position(a), self.position(b));
        let ahead = |p: [f64; 2]| (p[0] - pa[0]) * (pb[0] - pa[0]) + (p[1] - pa[1]) * (pb[1] - pa[1]) > 0.0;

        // Find the face around `a` which the segment leaves `a` through
        let mut start = None;
        for f in self.faces_around(a) {
            let face = &self.faces[f];
            let k = face.vertex_slot(a).ok_or_else(|| TriangulationError::internal(format!("Face {} is not incident to {}", f, a)))?;
            let (u, w) = face.edge(k);
            let det_u = self.kernel.orient2d(pa, pb, self.position(u));
            let det_w = self.kernel.orient2d(pa, pb, self.position(w));
            if det_u == 0.0 && ahead(self.position(u)) {
                return Ok(Crossings::Split(u));
            }
            if det_w == 0.0 && ahead(self.position(w)) {
                return Ok(Crossings::Split(w));
            }
            if det_u < 0.0 && det_w > 0.0 {
                start = Some((f, k));
                break;
            }
        }
        let (mut cur, mut slot) = start.ok_or_else(|| TriangulationError::internal(format!("No face around {} faces {}", a, b)))?;

        let mut edges = Vec::new();
        loop {
            let face = &self.faces[cur];
            if face.constrained[slot] {
                return Err(DegenerateInputError::IntersectingConstraints.into());
            }
            let (right, left) = face.edge(slot);
            edges.push((right, left));

            let (next, x) = self.opposite(cur, slot)?.ok_or_else(|| TriangulationError::internal(format!("Constraint {}-{} left the triangulation", a, b)))?;
            if x == b {
                break;
            }

            let det = self.kernel.orient2d(pa, pb, self.position(x));
            if det == 0.0 {
                return Ok(Crossings::Split(x));
            }
            // Continue through the edge of `next` which still straddles the segment
            let (right, left) = if det > 0.0 { (right, x) } else { (x, left) };
            let next_face = &self.faces[next];
            slot = next_face.vertices.iter()
                .position(|&v| v != right && v != left)
                .ok_or_else(|| TriangulationError::internal(format!("Face {} is degenerate", next)))?;
            cur = next;
        }
        Ok(Crossings::Edges(edges))
    }

    fn remove_crossings(&mut self, a: VertexIdx, b: VertexIdx, crossing: Vec<(VertexIdx, VertexIdx)>) -> Result<(), TriangulationError> {
        let (pa, pb) = (self.position(a), self.position(b));
        trace!("constraint {}-{} crosses {} edges", a, b, crossing.len());

        let mut queue: VecDeque<_> = crossing.into();
        let mut created = Vec::new();
        let mut stalled = 0;
        while let Some((u, v)) = queue.pop_front() {
            let (f, i) = self.find_edge(u, v).ok_or_else(|| TriangulationError::internal(format!("Crossing edge {}-{} vanished", u, v)))?;
            let p = self.faces[f].vertices[i];
            let (e0, e1) = self.faces[f].edge(i);
            let (_, q) = self.opposite(f, i)?.ok_or_else(|| TriangulationError::internal(format!("Crossing edge {}-{} is on the super-triangle", u, v)))?;
            let (pp, pq) = (self.position(p), self.position(q));

            // Only a strictly convex quadrilateral can be flipped
            if !opposite_signs(self.kernel.orient2d(pp, pq, self.position(e0)), self.kernel.orient2d(pp, pq, self.position(e1))) {
                queue.push_back((u, v));
                stalled += 1;
                if stalled > queue.len() {
                    return Err(TriangulationError::internal(format!("No crossing edge of {}-{} can be flipped", a, b)));
                }
                continue;
            }
            stalled = 0;

            self.flip(f, i)?;
            let still_crossing = opposite_signs(self.kernel.orient2d(pa, pb, pp), self.kernel.orient2d(pa, pb, pq))
                && opposite_signs(self.kernel.orient2d(pp, pq, pa), self.kernel.orient2d(pp, pq, pb));
            if still_crossing {
                queue.push_back((p, q));
            } else {
                created.push((p, q));
            }
        }

        let (f, i) = self.find_edge(a, b).ok_or_else(|| TriangulationError::internal(format!("Constraint {}-{} is missing after removing its crossings", a, b)))?;
        self.set_constrained(f, i)?;

        // Only the new edges may violate the Delaunay property
        let mut swapped = true;
        while swapped {
            swapped = false;
            for edge in created.iter_mut() {
                let (u, v) = *edge;
                if (u, v) == (a, b) || (u, v) == (b, a) {
                    continue;
                }
                let (f, i) = self.find_edge(u, v).ok_or_else(|| TriangulationError::internal(format!("New edge {}-{} vanished", u, v)))?;
                if self.needs_flip(f, i)? {
                    let p = self.faces[f].vertices[i];
                    let (_, q) = self.opposite(f, i)?.ok_or_else(|| TriangulationError::internal(format!("New edge {}-{} is on the super-triangle", u, v)))?;
                    self.flip(f, i)?;
                    *edge = (p, q);
                    swapped = true;
                }
            }
        }
        Ok(())
    }

    /// Is the segment from `a` to `b` covered by constrained edges?
    ///
    /// A constraint through other vertices is stored as a chain of constrained edges, which this follows.
    pub fn is_constrained_segment(&self, a: VertexIdx, b: VertexIdx) -> bool {
        let (pa, pb) = (self.position(a), self.position(b));
        let toward_b = |from: [f64; 2], to: [f64; 2]| (to[0] - from[0]) * (pb[0] - pa[0]) + (to[1] - from[1]) * (pb[1] - pa[1]) > 0.0;

        let mut cur = a;
        for _ in 0..self.vertices.len() {
            if self.is_constrained_edge(cur, b) {
                return true;
            }
            let pc = self.position(cur);
            let next = self.faces_around(cur).into_iter()
                .flat_map(|f| self.faces[f].vertices)
                .filter(|&x| x != cur)
                .find(|&x| {
                    let px = self.position(x);
                    self.kernel.orient2d(pa, pb, px) == 0.0 && toward_b(pc, px) && toward_b(px, pb) && self.is_constrained_edge(cur, x)
                });
            match next {
                Some(x) => cur = x,
                None => return false,
            }
        }
        false
    }

    /// Checks the structural invariants of the triangulation: counterclockwise faces, mutual neighbors,
    /// matching constraint flags, and locally Delaunay unconstrained edges.
    pub fn validate(&self) -> Result<(), TriangulationError> {
        for f in self.face_indices() {
            let face = &self.faces[f];
            let [a, b, c] = face.vertices.map(|v| self.position(v));
            if self.kernel.orient2d(a, b, c) <= 0.0 {
                return Err(TriangulationError::internal(format!("Face {} is not counterclockwise", f)));
            }
            for i in 0..3 {
                if let Some((g, _)) = self.opposite(f, i)? {
                    let (u, v) = face.edge(i);
                    let j = self.faces[g].edge_slot(v, u).ok_or_else(|| TriangulationError::internal(format!("Faces {} and {} are not mutual neighbors", f, g)))?;
                    if self.faces[g].neighbors[j] != Some(f) {
                        return Err(TriangulationError::internal(format!("Face {} points to {}, but not back", f, g)));
                    }
                    if self.faces[g].constrained[j] != face.constrained[i] {
                        return Err(TriangulationError::internal(format!("Edge {}-{} is only constrained on one side", u, v)));
                    }
                }
                if !self.is_locally_delaunay(f, i) {
                    let (u, v) = face.edge(i);
                    return Err(TriangulationError::internal(format!("Edge {}-{} is not locally Delaunay", u, v)));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl<K: Kernel> ConstrainedTriangulation<K> {
    // Unlinks `f` from its neighbors, leaving it unreachable by any traversal
    pub(crate) fn isolate_face(&mut self, f: FaceIdx) {
        for i in 0..3 {
            if let Some(n) = self.faces[f].neighbors[i].take() {
                for slot in self.faces[n].neighbors.iter_mut() {
                    if *slot == Some(f) {
                        *slot = None;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> (ConstrainedTriangulation, [VertexIdx; 4]) {
        let mut cdt = ConstrainedTriangulation::new([0., 0.], [2., 2.]).unwrap();
        let v = [[0., 0.], [2., 0.], [2., 2.], [0., 2.]].map(|p| cdt.insert_point(p).unwrap());
        (cdt, v)
    }

    #[test]
    fn empty() {
        let cdt = ConstrainedTriangulation::new([0., 0.], [1., 1.]).unwrap();
        assert_eq!(cdt.face_count(), 1);
        assert_eq!(cdt.vertex_count(), 3);
        assert!(cdt.is_auxiliary_face(cdt.outer_face()));
        cdt.validate().unwrap();
    }

    #[test]
    fn insert_points() {
        let (cdt, v) = square();
        // Euler: 3 super vertices + 4 points, all inside the super-triangle
        assert_eq!(cdt.vertex_count(), 7);
        assert_eq!(cdt.face_count(), 1 + 2 * 4);
        for &vi in &v {
            assert!(!cdt.is_auxiliary(vi));
        }
        cdt.validate().unwrap();
    }

    #[test]
    fn duplicate_point() {
        let (mut cdt, v) = square();
        assert_eq!(cdt.insert_point([2., 2.]).unwrap(), v[2]);
        assert_eq!(cdt.vertex_count(), 7);
    }

    #[test]
    fn point_on_edge() {
        let mut cdt = ConstrainedTriangulation::new([0., 0.], [2., 2.]).unwrap();
        let a = cdt.insert_point([0., 0.]).unwrap();
        let b = cdt.insert_point([2., 0.]).unwrap();
        cdt.insert_point([1., 2.]).unwrap();
        cdt.insert_constraint(a, b).unwrap();
        let m = cdt.insert_point([1., 0.]).unwrap();
        assert!(cdt.is_constrained_edge(a, m));
        assert!(cdt.is_constrained_edge(m, b));
        assert!(cdt.find_edge(a, b).is_none());
        cdt.validate().unwrap();
    }

    #[test]
    fn outside_bounds() {
        let (mut cdt, _) = square();
        assert_eq!(cdt.insert_point([3., 1.]).unwrap_err().degenerate_input(), Some(&DegenerateInputError::OutsideBounds));
        assert_eq!(cdt.insert_point([f64::NAN, 1.]).unwrap_err().degenerate_input(), Some(&DegenerateInputError::NonFiniteCoordinate));
    }

    #[test]
    fn existing_edge_constraint() {
        let (mut cdt, v) = square();
        cdt.insert_constraint(v[0], v[1]).unwrap();
        assert!(cdt.is_constrained_edge(v[0], v[1]));
        assert!(cdt.is_constrained_edge(v[1], v[0]));
        assert_eq!(cdt.constraint_count(), 1);
    }

    #[test]
    fn forced_diagonal() {
        // A flat rhombus whose Delaunay diagonal is the short one
        let mut cdt = ConstrainedTriangulation::new([-4., -1.], [4., 1.]).unwrap();
        let left = cdt.insert_point([-4., 0.]).unwrap();
        let bottom = cdt.insert_point([0., -1.]).unwrap();
        let right = cdt.insert_point([4., 0.]).unwrap();
        let top = cdt.insert_point([0., 1.]).unwrap();
        assert!(cdt.find_edge(bottom, top).is_some());
        assert!(cdt.find_edge(left, right).is_none());

        cdt.insert_constraint(left, right).unwrap();
        assert!(cdt.is_constrained_edge(left, right));
        assert!(cdt.find_edge(bottom, top).is_none());
        cdt.validate().unwrap();
    }

    #[test]
    fn constraint_through_vertex() {
        let mut cdt = ConstrainedTriangulation::new([0., -1.], [4., 1.]).unwrap();
        let a = cdt.insert_point([0., 0.]).unwrap();
        let m = cdt.insert_point([2., 0.]).unwrap();
        let b = cdt.insert_point([4., 0.]).unwrap();
        cdt.insert_point([2., 1.]).unwrap();
        cdt.insert_point([2., -1.]).unwrap();
        cdt.insert_constraint(a, b).unwrap();
        assert!(cdt.is_constrained_edge(a, m));
        assert!(cdt.is_constrained_edge(m, b));
        assert_eq!(cdt.constraint_count(), 2);
        assert!(cdt.is_constrained_segment(a, b));
        assert!(cdt.is_constrained_segment(b, a));
        cdt.validate().unwrap();
    }

    #[test]
    fn crossing_constraints() {
        let (mut cdt, v) = square();
        cdt.insert_constraint(v[0], v[2]).unwrap();
        let err = cdt.insert_constraint(v[1], v[3]).unwrap_err();
        assert_eq!(err.degenerate_input(), Some(&DegenerateInputError::IntersectingConstraints));
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() { }
        assert_send_sync::<ConstrainedTriangulation>();
    }
}
