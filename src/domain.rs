use std::collections::VecDeque;

use log::debug;

use crate::{TriangulationError, cdt::{ConstrainedTriangulation, FaceIdx}, idx::{Idx, IdxDisplay, VecExt}, kernel::Kernel};

pub type RegionIdx = Idx<Region>;

/// Faces with an odd nesting level are inside the polygon domain.
#[inline]
pub fn in_domain(level: u32) -> bool {
    level % 2 == 1
}

/// A maximal set of faces connected through unconstrained edges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    level: u32,
    parent: Option<RegionIdx>,
    seed: FaceIdx,
    face_count: usize,
}

impl IdxDisplay for Region {
    fn fmt(f: &mut std::fmt::Formatter<'_>, idx: usize) -> std::fmt::Result {
        write!(f, "r{}", idx)
    }
}

impl Region {
    /// Number of constrained edges crossed to reach this region from the outside
    pub fn level(&self) -> u32 { self.level }

    /// The region this one was entered from, [None] for the outer region
    pub fn parent(&self) -> Option<RegionIdx> { self.parent }

    /// The first face labeled in this region
    pub fn seed(&self) -> FaceIdx { self.seed }

    pub fn face_count(&self) -> usize { self.face_count }

    pub fn in_domain(&self) -> bool { in_domain(self.level) }
}

/// The nesting level of every face of a [ConstrainedTriangulation], as computed by [mark_domains]
#[derive(Debug, Clone)]
pub struct DomainLabels {
    levels: Vec<Option<u32>>,
    face_regions: Vec<Option<RegionIdx>>,
    regions: Vec<Region>,
}

// A constrained edge seen from the face on its labeled side
struct BorderEdge {
    face: FaceIdx,
    slot: usize,
    region: RegionIdx,
}

/// Labels every face of `cdt` with its nesting level.
///
/// Starting from the outer face at level 0, faces are flood filled across unconstrained edges. Constrained edges are deferred
/// and handled first-in first-out once the current region is exhausted, each opening a new region one level deeper.
pub fn mark_domains<K: Kernel>(cdt: &ConstrainedTriangulation<K>) -> Result<DomainLabels, TriangulationError> {
    let mut labels = DomainLabels {
        levels: vec![None; cdt.face_count()],
        face_regions: vec![None; cdt.face_count()],
        regions: Vec::new(),
    };
    let mut border = VecDeque::new();

    labels.mark_region(cdt, cdt.outer_face(), 0, None, &mut border);
    while let Some(edge) = border.pop_front() {
        if let Some(next) = cdt.face(edge.face).neighbor(edge.slot) {
            if labels.levels[next.usize()].is_none() {
                let level = labels.regions[edge.region].level + 1;
                labels.mark_region(cdt, next, level, Some(edge.region), &mut border);
            }
        }
    }

    if let Some(f) = cdt.face_indices().find(|f| labels.levels[f.usize()].is_none()) {
        return Err(TriangulationError::internal(format!("Face {} was not reached while marking domains", f)));
    }

    debug!("marked {} faces in {} regions, {} in domain", cdt.face_count(), labels.regions.len(), labels.domain_faces().count());
    Ok(labels)
}

impl DomainLabels {
    fn mark_region<K: Kernel>(&mut self, cdt: &ConstrainedTriangulation<K>, start: FaceIdx, level: u32, parent: Option<RegionIdx>, border: &mut VecDeque<BorderEdge>) {
        let region = self.regions.push_get_index(Region { level, parent, seed: start, face_count: 0 });
        let mut face_count = 0;

        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(f) = queue.pop_front() {
            if self.levels[f.usize()].is_some() {
                continue;
            }
            self.levels[f.usize()] = Some(level);
            self.face_regions[f.usize()] = Some(region);
            face_count += 1;

            let face = cdt.face(f);
            for i in 0..3 {
                if let Some(n) = face.neighbor(i) {
                    if face.is_constrained(i) {
                        border.push_back(BorderEdge { face: f, slot: i, region });
                    } else if self.levels[n.usize()].is_none() {
                        queue.push_back(n);
                    }
                }
            }
        }
        self.regions[region].face_count = face_count;
    }

    /// The nesting level of `f`, [None] if it was never reached
    pub fn level(&self, f: FaceIdx) -> Option<u32> {
        self.levels.get(f.usize()).copied().flatten()
    }

    pub fn in_domain(&self, f: FaceIdx) -> bool {
        self.level(f).map_or(false, in_domain)
    }

    pub fn region_of(&self, f: FaceIdx) -> Option<RegionIdx> {
        self.face_regions.get(f.usize()).copied().flatten()
    }

    pub fn region(&self, r: RegionIdx) -> &Region { &self.regions[r] }

    /// Every region, in the order they were discovered. The first is always the outer region.
    pub fn regions(&self) -> &[Region] { &self.regions }

    pub fn max_level(&self) -> u32 {
        self.regions.iter().map(Region::level).max().unwrap_or(0)
    }

    /// The in-domain faces, in face order
    pub fn domain_faces(&self) -> impl Iterator<Item = FaceIdx> + '_ {
        self.levels.iter().enumerate().filter_map(|(f, level)| match level {
            Some(level) if in_domain(*level) => Some(Idx::new(f)),
            _ => None,
        })
    }

    /// Checks that levels only change across constrained edges, and then by at most one
    pub fn check_levels<K: Kernel>(&self, cdt: &ConstrainedTriangulation<K>) -> Result<(), TriangulationError> {
        for f in cdt.face_indices() {
            let face = cdt.face(f);
            let level = self.level(f).ok_or_else(|| TriangulationError::internal(format!("Face {} is unlabeled", f)))?;
            for i in 0..3 {
                if let Some(n) = face.neighbor(i) {
                    let other = self.level(n).ok_or_else(|| TriangulationError::internal(format!("Face {} is unlabeled", n)))?;
                    let (a, b) = face.edge(i);
                    if face.is_constrained(i) {
                        if level.abs_diff(other) > 1 {
                            return Err(TriangulationError::internal(format!("Levels across constraint {}-{} differ by {}", a, b, level.abs_diff(other))));
                        }
                    } else if level != other {
                        return Err(TriangulationError::internal(format!("Levels change across unconstrained edge {}-{}", a, b)));
                    }
                }
            }
        }
        Ok(())
    }

    #[cfg(feature = "debugging")]
    pub fn as_text_tree(&self) -> Option<text_trees::TreeNode<String>> {
        if self.regions.is_empty() {
            None
        } else {
            Some(self.region_tree(Idx::new(0)))
        }
    }

    #[cfg(feature = "debugging")]
    fn region_tree(&self, r: RegionIdx) -> text_trees::TreeNode<String> {
        use crate::idx::SliceExt;

        let region = &self.regions[r];
        let label = format!("[{}] level {}, {} faces", r, region.level, region.face_count);
        let children: Vec<_> = self.regions.iter_index()
            .filter(|&c| self.regions[c].parent == Some(r))
            .map(|c| self.region_tree(c))
            .collect();
        if children.is_empty() {
            label.into()
        } else {
            text_trees::TreeNode::with_child_nodes(label, children.into_iter())
        }
    }
}
