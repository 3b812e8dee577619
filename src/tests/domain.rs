use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{ConstrainedTriangulation, DomainLabels, mark_domains};

use super::util::{self, polygon};

fn build(loops: &[Vec<[f64; 2]>]) -> (ConstrainedTriangulation, DomainLabels) {
    let points = loops.iter().flatten();
    let lo = points.clone().fold([f64::INFINITY; 2], |lo, p| [lo[0].min(p[0]), lo[1].min(p[1])]);
    let hi = points.fold([f64::NEG_INFINITY; 2], |hi, p| [hi[0].max(p[0]), hi[1].max(p[1])]);

    let mut cdt = ConstrainedTriangulation::new(lo, hi).unwrap();
    for l in loops {
        let vs: Vec<_> = l.iter().map(|&p| cdt.insert_point(p).unwrap()).collect();
        for i in 0..vs.len() {
            cdt.insert_constraint(vs[i], vs[(i + 1) % vs.len()]).unwrap();
        }
    }
    cdt.validate().unwrap();
    let labels = mark_domains(&cdt).unwrap();
    (cdt, labels)
}

fn fixtures() -> Vec<Vec<Vec<[f64; 2]>>> {
    let (outer, holes) = polygon::perforated_square(3);
    vec![
        vec![polygon::comb(6)],
        vec![polygon::regular(40, 10.), polygon::regular(17, 4.)],
        vec![
            polygon::axis_square([0., 0.], 10.),
            polygon::axis_square([1., 1.], 8.),
            polygon::axis_square([3., 3.], 4.),
            polygon::axis_square([4., 4.], 2.),
        ],
        std::iter::once(outer).chain(holes).collect(),
    ]
}

#[test]
fn parity_matches_point_in_polygon() {
    for loops in fixtures() {
        let (cdt, labels) = build(&loops);
        for f in cdt.face_indices().filter(|&f| !cdt.is_auxiliary_face(f)) {
            let t = cdt.face(f).vertices().map(|v| cdt.position(v));
            assert_eq!(labels.in_domain(f), util::parity(&loops, util::centroid(t)), "face {}", f);
        }
    }
}

#[test]
fn auxiliary_faces_are_outside() {
    for loops in fixtures() {
        let (cdt, labels) = build(&loops);
        for f in cdt.face_indices().filter(|&f| cdt.is_auxiliary_face(f)) {
            assert_eq!(labels.level(f), Some(0));
        }
    }
}

#[test]
fn every_face_is_labeled() {
    for loops in fixtures() {
        let (cdt, labels) = build(&loops);
        assert!(cdt.face_indices().all(|f| labels.level(f).is_some()));
        assert_eq!(labels.regions().iter().map(|r| r.face_count()).sum::<usize>(), cdt.face_count());
        for f in cdt.face_indices() {
            let region = labels.region(labels.region_of(f).unwrap());
            assert_eq!(Some(region.level()), labels.level(f));
        }
    }
}

#[test]
fn levels_step_by_one_across_constraints() {
    // No two loops share an edge here, so every constrained edge separates consecutive levels
    for loops in fixtures() {
        let (cdt, labels) = build(&loops);
        labels.check_levels(&cdt).unwrap();
        for f in cdt.face_indices() {
            let face = cdt.face(f);
            for i in 0..3 {
                if let (true, Some(n)) = (face.is_constrained(i), face.neighbor(i)) {
                    assert_eq!(labels.level(f).unwrap().abs_diff(labels.level(n).unwrap()), 1);
                }
            }
        }
    }
}

#[test]
fn nesting_depth() {
    let (_, labels) = build(&fixtures()[2]);
    assert_eq!(labels.max_level(), 4);
    // Each region was entered from a region one level up
    for region in labels.regions() {
        match region.parent() {
            Some(parent) => assert_eq!(labels.region(parent).level() + 1, region.level()),
            None => assert_eq!(region.level(), 0),
        }
    }
}

#[test]
fn random_points_stay_delaunay() {
    let mut rng = StdRng::seed_from_u64(0xde1a);
    let mut cdt = ConstrainedTriangulation::new([-1., -1.], [1., 1.]).unwrap();
    for _ in 0..500 {
        let p = [rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)];
        cdt.insert_point(p).unwrap();
    }
    cdt.validate().unwrap();
    for f in cdt.face_indices() {
        for i in 0..3 {
            assert!(cdt.is_locally_delaunay(f, i));
        }
    }
    // Unconstrained, so nothing is enclosed
    assert_eq!(mark_domains(&cdt).unwrap().domain_faces().count(), 0);
}

#[test]
fn constrained_random_polygon_keeps_its_edges() {
    let mut rng = StdRng::seed_from_u64(0xc0de);
    for _ in 0..20 {
        let n = rng.gen_range(4..60);
        let loops = vec![polygon::random_star(&mut rng, n)];
        let (cdt, labels) = build(&loops);
        for f in cdt.face_indices() {
            for i in 0..3 {
                assert!(cdt.face(f).is_constrained(i) || cdt.is_locally_delaunay(f, i));
            }
        }
        assert_eq!(labels.domain_faces().count(), n - 2);
    }
}
