pub mod polygon;
mod vtest;

use num_traits::ToPrimitive;

pub use vtest::VTest;

use crate::Vertex;

pub fn to_f64<V: Vertex>(v: &V) -> [f64; 2] {
    [v.x().to_f64().unwrap(), v.y().to_f64().unwrap()]
}

pub fn triangle_signed_area(t: [[f64; 2]; 3]) -> f64 {
    let [a, b, c] = t;
    ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])) / 2.0
}

/// Shoelace formula; positive for counterclockwise polygons
pub fn signed_area(polygon: &[[f64; 2]]) -> f64 {
    let n = polygon.len();
    (0..n).map(|i| {
        let (a, b) = (polygon[i], polygon[(i + 1) % n]);
        a[0] * b[1] - b[0] * a[1]
    }).sum::<f64>() / 2.0
}

pub fn area<V: Vertex>(polygon: &[V]) -> f64 {
    signed_area(&polygon.iter().map(to_f64).collect::<Vec<_>>()).abs()
}

pub fn triangles_f64<V: Vertex>(triangles: &[[V; 3]]) -> Vec<[[f64; 2]; 3]> {
    triangles.iter().map(|[a, b, c]| [to_f64(a), to_f64(b), to_f64(c)]).collect()
}

/// Sum of the triangles' areas. Each triangle must be counterclockwise.
pub fn total_area<V: Vertex>(triangles: &[[V; 3]]) -> f64 {
    triangles_f64(triangles).into_iter().map(|t| {
        let area = triangle_signed_area(t);
        assert!(area > 0.0, "triangle {:?} is not counterclockwise", t);
        area
    }).sum()
}

pub fn centroid(t: [[f64; 2]; 3]) -> [f64; 2] {
    [(t[0][0] + t[1][0] + t[2][0]) / 3.0, (t[0][1] + t[1][1] + t[2][1]) / 3.0]
}

/// Even-odd ray casting test. Points on the boundary may go either way.
pub fn contains(polygon: &[[f64; 2]], p: [f64; 2]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[(i + 1) % n]);
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x = a[0] + (p[1] - a[1]) / (b[1] - a[1]) * (b[0] - a[0]);
            if p[0] < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Is `p` enclosed by an odd number of `loops`?
pub fn parity(loops: &[Vec<[f64; 2]>], p: [f64; 2]) -> bool {
    loops.iter().filter(|l| contains(l, p)).count() % 2 == 1
}

#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!((actual - expected).abs() <= tolerance, "expected {}, got {}", expected, actual);
}
