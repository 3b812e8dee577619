use std::{collections::HashMap, iter, mem};

use log::{debug, warn};
use ordered_float::OrderedFloat;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{ConstrainedTriangulation, DegenerateInputError, DomainLabels, ListBuilder, ListFormat, PolygonElement, PolygonList, TriangleWinding, TriangulationError, TriangulationOptions, cdt::VertexIdx, domain, inputs::VertexExt, kernel::Kernel};
#[cfg(feature = "debugging")]
use crate::debug;

struct InputVertex<Index> {
    index: Index,
    position: [f64; 2],
}

pub(crate) fn triangulate<P, F, K>(polygon_list: &P, format: F, options: &TriangulationOptions, kernel: K) -> Result<<F::Builder as ListBuilder<P>>::Output, TriangulationError<<F::Builder as ListBuilder<P>>::Error>>
where P: PolygonList + ?Sized,
      F: ListFormat<P>,
      K: Kernel {
    let mut builder = format.initialize(polygon_list).map_err(TriangulationError::Builder)?;
    // Keep the builder outside of the fallible part, so it can always be told to roll back
    match add_triangles(polygon_list, &mut builder, options, kernel) {
        Ok(()) => builder.build().map_err(TriangulationError::Builder),
        Err(e) => {
            builder.fail(&e);
            Err(e)
        }
    }
}

fn add_triangles<P, B, K>(polygon_list: &P, builder: &mut B, options: &TriangulationOptions, kernel: K) -> Result<(), TriangulationError<B::Error>>
where P: PolygonList + ?Sized,
      B: ListBuilder<P>,
      K: Kernel {
    let mut state = TriangulationState::new(polygon_list, kernel).map_err(TriangulationError::widen)?;
    let labels = state.build(options).map_err(TriangulationError::widen)?;
    state.emit(&labels, builder)
}

struct TriangulationState<'p, P: PolygonList + ?Sized, K: Kernel> {
    polygon_list: &'p P,
    loops: Vec<Vec<InputVertex<P::Index>>>,
    cdt: ConstrainedTriangulation<K>,
    // The input index each triangulation vertex was created from, [None] for the super-triangle
    sources: Vec<Option<P::Index>>,
    loop_vertices: Vec<Vec<VertexIdx>>,
    #[cfg(feature = "debugging")]
    svg_context: Option<debug::svg::SvgContext>,
    #[cfg(feature = "debugging")]
    current_step: u32,
}

impl<'p, P: PolygonList + ?Sized, K: Kernel> TriangulationState<'p, P, K> {
    fn new(polygon_list: &'p P, kernel: K) -> Result<Self, TriangulationError> {
        let loops = Self::gather_loops(polygon_list, &kernel)?;

        let mut lo = [f64::INFINITY; 2];
        let mut hi = [f64::NEG_INFINITY; 2];
        for v in loops.iter().flatten() {
            for axis in 0..2 {
                lo[axis] = lo[axis].min(v.position[axis]);
                hi[axis] = hi[axis].max(v.position[axis]);
            }
        }
        let cdt = ConstrainedTriangulation::with_kernel(lo, hi, kernel)?;

        debug!("triangulating {} vertices in {} polygons", loops.iter().map(Vec::len).sum::<usize>(), loops.len());

        Ok(Self {
            polygon_list,
            loops,
            sources: vec![None; cdt.vertex_count()],
            #[cfg(feature = "debugging")]
            svg_context: debug::svg::SvgContext::from_env(cdt.bounds()),
            #[cfg(feature = "debugging")]
            current_step: 0,
            cdt,
            loop_vertices: Vec::new(),
        })
    }

    fn gather_loops(polygon_list: &P, kernel: &K) -> Result<Vec<Vec<InputVertex<P::Index>>>, TriangulationError> {
        let mut loops = Vec::new();
        let mut current = Vec::new();
        // Ensure the iteration ends with NewPolygon
        for element in polygon_list.iter_indices().map(Into::<PolygonElement<P::Index>>::into).chain(iter::once(PolygonElement::NewPolygon)) {
            match element {
                PolygonElement::ContinuePolygon(index) => {
                    let position = polygon_list.get_vertex(index.clone()).position().ok_or(DegenerateInputError::NonFiniteCoordinate)?;
                    current.push(InputVertex { index, position });
                }
                PolygonElement::NewPolygon => {
                    if current.len() >= 3 {
                        loops.push(mem::take(&mut current));
                    } else if !current.is_empty() {
                        return Err(DegenerateInputError::NotEnoughVertices(current.len()).into());
                    }
                }
            }
        }
        if loops.is_empty() {
            return Err(DegenerateInputError::NoVertices.into());
        }

        for l in &loops {
            for (i, v) in l.iter().enumerate() {
                if v.position == l[(i + 1) % l.len()].position {
                    return Err(DegenerateInputError::DuplicateVertex.into());
                }
            }
        }

        // With no consecutive duplicates, the first loop has two distinct points
        let p0 = loops[0][0].position;
        let p1 = loops[0][1].position;
        if loops.iter().flatten().all(|v| kernel.orient2d(p0, p1, v.position) == 0.0) {
            return Err(DegenerateInputError::CollinearInput.into());
        }

        Ok(loops)
    }

    fn build(&mut self, options: &TriangulationOptions) -> Result<DomainLabels, TriangulationError> {
        self.insert_points(options.seed)?;
        #[cfg(feature = "debugging")]
        self.output_svg("points", None, debug::svg::SvgOutputLevel::MajorSteps)?;

        self.insert_constraints()?;
        debug!("inserted {} constrained edges, {} faces", self.cdt.constraint_count(), self.cdt.face_count());
        #[cfg(feature = "debugging")]
        self.output_svg("constraints", None, debug::svg::SvgOutputLevel::MajorSteps)?;

        let labels = domain::mark_domains(&self.cdt)?;
        if options.verify {
            self.verify(&labels)?;
        }
        #[cfg(feature = "debugging")]
        self.output_svg("labeled", Some(&labels), debug::svg::SvgOutputLevel::ResultOnly)?;
        #[cfg(feature = "debugging")]
        self.output_region_tree(&labels)?;

        Ok(labels)
    }

    fn insert_points(&mut self, seed: u64) -> Result<(), TriangulationError> {
        let mut order: Vec<(usize, usize)> = self.loops.iter()
            .enumerate()
            .flat_map(|(l, vs)| (0..vs.len()).map(move |i| (l, i)))
            .collect();
        order.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut loop_vertices: Vec<Vec<Option<VertexIdx>>> = self.loops.iter().map(|vs| vec![None; vs.len()]).collect();
        let mut known: HashMap<[OrderedFloat<f64>; 2], VertexIdx> = HashMap::with_capacity(order.len());
        let mut merged = 0;
        for (l, i) in order {
            let input = &self.loops[l][i];
            let key = input.position.map(OrderedFloat);
            let v = match known.get(&key) {
                Some(&v) => {
                    merged += 1;
                    v
                }
                None => {
                    let v = self.cdt.insert_point(input.position)?;
                    known.insert(key, v);
                    if v.usize() == self.sources.len() {
                        self.sources.push(Some(input.index.clone()));
                    }
                    v
                }
            };
            loop_vertices[l][i] = Some(v);
        }
        if merged > 0 {
            warn!("merged {} vertices which share their position with another vertex", merged);
        }

        self.loop_vertices = loop_vertices.into_iter()
            .map(|vs| vs.into_iter().collect::<Option<Vec<_>>>())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| TriangulationError::internal("Polygon vertex was not inserted"))?;
        Ok(())
    }

    fn insert_constraints(&mut self) -> Result<(), TriangulationError> {
        for l in 0..self.loop_vertices.len() {
            let n = self.loop_vertices[l].len();
            for i in 0..n {
                let (a, b) = (self.loop_vertices[l][i], self.loop_vertices[l][(i + 1) % n]);
                self.cdt.insert_constraint(a, b)?;
            }
            #[cfg(feature = "debugging")]
            self.output_svg(&format!("polygon_{}", l), None, debug::svg::SvgOutputLevel::AllSteps)?;
        }
        Ok(())
    }

    fn verify(&self, labels: &DomainLabels) -> Result<(), TriangulationError> {
        self.cdt.validate()?;
        labels.check_levels(&self.cdt)?;
        for vs in &self.loop_vertices {
            for i in 0..vs.len() {
                let (a, b) = (vs[i], vs[(i + 1) % vs.len()]);
                if !self.cdt.is_constrained_segment(a, b) {
                    return Err(TriangulationError::internal(format!("Polygon edge {}-{} is missing from the triangulation", a, b)));
                }
            }
        }
        Ok(())
    }

    fn emit<B: ListBuilder<P>>(&self, labels: &DomainLabels, builder: &mut B) -> Result<(), TriangulationError<B::Error>> {
        let mut count = 0;
        for f in labels.domain_faces() {
            if self.cdt.is_auxiliary_face(f) {
                return Err(TriangulationError::internal(format!("In-domain face {} touches the super-triangle", f)));
            }
            let [a, b, c] = self.cdt.face(f).vertices().map(|v| self.sources.get(v.usize()).cloned().flatten());
            let (a, b, c) = match (a, b, c) {
                (Some(a), Some(b), Some(c)) => (a, b, c),
                _ => return Err(TriangulationError::internal(format!("Face {} has a vertex without an input index", f))),
            };
            let added = match B::WINDING {
                TriangleWinding::Counterclockwise => builder.add_triangle(self.polygon_list, a, b, c),
                TriangleWinding::Clockwise => builder.add_triangle(self.polygon_list, a, c, b),
            };
            added.map_err(TriangulationError::Builder)?;
            count += 1;
        }
        debug!("emitted {} triangles", count);
        Ok(())
    }

    #[cfg(feature = "debugging")]
    fn output_svg(&mut self, name: &str, labels: Option<&DomainLabels>, level: debug::svg::SvgOutputLevel) -> Result<(), TriangulationError> {
        if let Some(svg_context) = &self.svg_context {
            if svg_context.output_level >= level {
                let style = debug::svg::SvgTriangulationStyle { labels };
                let mut svg = debug::svg::SvgOutput::new(svg_context, style);
                svg.append_element(&self.cdt, &())
                    .map_err(|e| TriangulationError::SvgOutput(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
                svg.save(format!("{:03}_{}.svg", self.current_step, name)).map_err(TriangulationError::SvgOutput)?;
                self.current_step += 1;
            }
        }
        Ok(())
    }

    #[cfg(feature = "debugging")]
    fn output_region_tree(&self, labels: &DomainLabels) -> Result<(), TriangulationError> {
        if let (Some(svg_context), Some(tree)) = (&self.svg_context, labels.as_text_tree()) {
            let path = svg_context.output_path.join("regions.txt");
            std::fs::write(path, tree.to_string()).map_err(TriangulationError::SvgOutput)?;
        }
        Ok(())
    }
}
