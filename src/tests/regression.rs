use crate::{Polygon, PolygonList, TriangulationOptions, formats};

use super::util::{self, VTest, polygon};

fn verified() -> TriangulationOptions {
    TriangulationOptions::default().with_verify(true)
}

#[test]
fn france_fragment() {
    let polygon = vec![
        [-1.189062499999949, 45.16147460937498],
        [-0.691113281249926, 45.09345703124998],
        [6.724707031250006, 44.97299804687506],
        [6.992675781250057, 44.82729492187502],
        [-1.15288085937496, 44.764013671875006],
        [-1.24521484374992, 44.66669921875001],
    ];
    let triangles = polygon.triangulate_with(formats::DeindexedListFormat::new(Vec::<[[f64; 2]; 3]>::new()), &verified())
        .expect("Triangulation failed");
    assert_eq!(triangles.len(), polygon.len() - 2);
    util::assert_close(util::total_area(&triangles), util::area(&polygon));
}

#[test]
fn pinched_polygon() {
    // ___
    // \ /
    //  x
    // / \
    // ---
    let polygon: Vec<VTest> = vec![(-1., 1.).into(), (1., 1.).into(), (0., 0.).into(), (1., -1.).into(), (-1., -1.).into(), (0., 0.).into()];
    let triangles = polygon.triangulate_with(formats::DeindexedListFormat::new(Vec::<[VTest; 3]>::new()), &verified())
        .expect("Triangulation failed");
    assert_eq!(triangles.len(), 2);
    util::assert_close(util::total_area(&triangles), 2.);
}

#[test]
fn collinear_boundary_vertices() {
    let polygon = vec![[0., 0.], [1., 0.], [2., 0.], [2., 1.], [1., 1.], [0., 1.]];
    let triangles = polygon.triangulate_with(formats::DeindexedListFormat::new(Vec::<[[f64; 2]; 3]>::new()), &verified())
        .expect("Triangulation failed");
    assert_eq!(triangles.len(), 4);
    util::assert_close(util::total_area(&triangles), 2.);
}

#[test]
fn hole_touching_outer_edge() {
    // The outer boundary's bottom edge runs through the hole's first vertex
    let polygons = vec![
        polygon::axis_square([0., 0.], 4.),
        vec![[2., 0.], [3., 1.], [1., 1.]],
    ];
    let triangles = polygons.triangulate_with(formats::DeindexedListFormat::new(Vec::<[[f64; 2]; 3]>::new()), &verified())
        .expect("Triangulation failed");
    util::assert_close(util::total_area(&triangles), 16. - 1.);
    for t in util::triangles_f64(&triangles) {
        assert!(!util::contains(&polygons[1], util::centroid(t)));
    }
}

#[test]
fn hole_sharing_outer_corner() {
    let polygons = vec![
        polygon::axis_square([0., 0.], 4.),
        vec![[0., 0.], [2., 1.], [1., 2.]],
    ];
    let triangles = polygons.triangulate_with(formats::DeindexedListFormat::new(Vec::<[[f64; 2]; 3]>::new()), &verified())
        .expect("Triangulation failed");
    util::assert_close(util::total_area(&triangles), 16. - 1.5);
}

#[test]
fn holes_sharing_an_edge() {
    // Both holes must be reached from the surrounding ring, not one through the other
    let polygons = vec![
        polygon::axis_square([0., 0.], 4.),
        vec![[1., 1.], [2., 1.], [2., 3.], [1., 3.]],
        vec![[2., 1.], [3., 1.], [3., 3.], [2., 3.]],
    ];
    let triangles = polygons.triangulate_with(formats::DeindexedListFormat::new(Vec::<[[f64; 2]; 3]>::new()), &verified())
        .expect("Triangulation failed");
    util::assert_close(util::total_area(&triangles), 16. - 4.);
    for t in util::triangles_f64(&triangles) {
        let c = util::centroid(t);
        assert!(!(1. ..=3.).contains(&c[0]) || !(1. ..=3.).contains(&c[1]), "triangle {:?} is inside a hole", t);
    }
}

#[test]
fn far_from_origin() {
    let (outer, holes) = polygon::perforated_square(2);
    let shift = |l: &Vec<[f64; 2]>| l.iter().map(|p| [p[0] + 1e6, p[1] - 1e6]).collect::<Vec<_>>();
    let outer = shift(&outer);
    let holes: Vec<_> = holes.iter().map(shift).collect();
    let triangles = crate::triangulate(&outer, &holes).expect("Triangulation failed");
    util::assert_close(util::total_area(&triangles), 7. * 7. - 4. * 4.);
}

#[test]
fn tiny_polygon() {
    let polygon: Vec<[f64; 2]> = polygon::comb(5).into_iter().map(|p| [p[0] * 1e-9, p[1] * 1e-9]).collect();
    let triangles = polygon.triangulate_with(formats::IndexedListFormat::new(Vec::<[usize; 3]>::new()), &verified())
        .expect("Triangulation failed");
    assert_eq!(triangles.len(), 4 * 5 - 2);
}
