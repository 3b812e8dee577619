use rand::Rng;

use super::vtest::VTest;

pub fn square() -> Vec<VTest> {
    vec![
        (0.0, 0.0).into(),
        (0.0, 1.0).into(),
        (1.0, 1.0).into(),
        (1.0, 0.0).into(),
    ]
}

pub fn star() -> Vec<VTest> {
    vec![
        (1.0, 0.0).into(),
        (2.0, 2.0).into(),
        (0.0, 1.0).into(),
        (-2.0, 2.0).into(),
        (-1.0, 0.0).into(),
        (-2.0, -2.0).into(),
        (0.0, -1.0).into(),
        (2.0, -2.0).into(),
    ]
}

pub fn half_frame() -> Vec<VTest> {
    vec![
        (0., 0.).into(), (0.05, 0.05).into(), (0.95, 0.05).into(), (0.95, 0.95).into(), (1., 1.).into(), (1., 0.).into()
    ]
}

pub fn all() -> Vec<Vec<VTest>> {
    vec![square(), star(), half_frame()]
}

/// `[(0,0), (side,0), (side,side), (0,side)]` offset by `origin`
pub fn axis_square(origin: [f64; 2], side: f64) -> Vec<[f64; 2]> {
    let [x, y] = origin;
    vec![[x, y], [x + side, y], [x + side, y + side], [x, y + side]]
}

pub fn regular(n: usize, radius: f64) -> Vec<[f64; 2]> {
    (0..n).map(|i| {
        let theta = std::f64::consts::PI * 2. * (i as f64) / (n as f64);
        let (y, x) = theta.sin_cos();
        [x * radius, y * radius]
    }).collect()
}

/// A comb with `teeth` teeth of height 3 rising from a base of height 1.
/// Has `4 * teeth` vertices and an area of `5 * teeth - 1`.
pub fn comb(teeth: usize) -> Vec<[f64; 2]> {
    let mut p = vec![[0., 0.], [(2 * teeth - 1) as f64, 0.]];
    for t in (0..teeth).rev() {
        let x = (2 * t) as f64;
        p.push([x + 1., 4.]);
        p.push([x, 4.]);
        if t > 0 {
            p.push([x, 1.]);
            p.push([x - 1., 1.]);
        }
    }
    p
}

/// A random polygon which is star-shaped around the origin, so always simple
pub fn random_star<R: Rng>(rng: &mut R, n: usize) -> Vec<[f64; 2]> {
    (0..n).map(|i| {
        let theta = std::f64::consts::PI * 2. * (i as f64 + rng.gen_range(0.0..0.5)) / (n as f64);
        let radius = rng.gen_range(0.2..1.0);
        let (y, x) = theta.sin_cos();
        [x * radius, y * radius]
    }).collect()
}

/// A square with a `holes` x `holes` grid of square holes
pub fn perforated_square(holes: usize) -> (Vec<[f64; 2]>, Vec<Vec<[f64; 2]>>) {
    let outer = axis_square([0., 0.], (3 * holes + 1) as f64);
    let holes = (0..holes)
        .flat_map(|i| (0..holes).map(move |j| axis_square([(3 * i + 1) as f64, (3 * j + 1) as f64], 2.)))
        .collect();
    (outer, holes)
}
