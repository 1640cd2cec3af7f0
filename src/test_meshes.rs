//! Mesh fixtures shared by the unit tests.
#![allow(clippy::unwrap_used)]

use crate::math::Point3;
use crate::topology::MeshStore;

/// Installs a log subscriber driven by `RUST_LOG`; later calls are no-ops.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Flat `nx` x `ny` grid of unit quads in the XY plane, facing +Z, with
/// every face selected.
///
/// Each `(i, j)` in `pockets` lowers the four corners of cell `(i, j)` to
/// `z = -depth`, sinking that cell and tilting its eight neighbors into a
/// pocket. Vertex `(i, j)` has index `j * (nx + 1) + i`; cell `(i, j)` has
/// face index `j * nx + i`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn pocketed_grid(
    nx: usize,
    ny: usize,
    pockets: &[(usize, usize)],
    depth: f64,
) -> MeshStore {
    let idx = |i: usize, j: usize| j * (nx + 1) + i;

    let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            points.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }
    for &(pi, pj) in pockets {
        for (i, j) in [(pi, pj), (pi + 1, pj), (pi, pj + 1), (pi + 1, pj + 1)] {
            points[idx(i, j)].z = -depth;
        }
    }

    let mut polygons = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            polygons.push(vec![idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1)]);
        }
    }

    let mut store = MeshStore::from_polygons(&points, &polygons).unwrap();
    store.select_all();
    store
}

/// 5 x 5 grid with one pocket of depth 0.5 in the middle cell.
pub(crate) fn single_pocket() -> MeshStore {
    pocketed_grid(5, 5, &[(2, 2)], 0.5)
}

/// Face indices of the 3 x 3 block around the pocket of [`single_pocket`].
pub(crate) const SINGLE_POCKET_FACES: [usize; 9] = [6, 7, 8, 11, 12, 13, 16, 17, 18];

/// Closed unit cube with outward-facing quads, every face selected.
pub(crate) fn closed_box() -> MeshStore {
    let points = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let polygons = [
        vec![0, 3, 2, 1],
        vec![4, 5, 6, 7],
        vec![0, 1, 5, 4],
        vec![1, 2, 6, 5],
        vec![2, 3, 7, 6],
        vec![3, 0, 4, 7],
    ];
    let mut store = MeshStore::from_polygons(&points, &polygons).unwrap();
    store.select_all();
    store
}

/// Closed 3 x 3 x 1 plate with the middle cell drilled through, every face
/// selected.
///
/// Top vertex `(i, j)` has index `j * 4 + i` at `z = 1`; bottom vertices
/// follow at `16 + j * 4 + i`, `z = 0`. Faces are the 8 top cells, the 8
/// bottom cells, the 12 outer walls and the 4 hole walls, in that order.
/// Outer walls face out; hole walls face into the hole.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn drilled_plate() -> MeshStore {
    let top = |i: usize, j: usize| j * 4 + i;
    let bottom = |i: usize, j: usize| 16 + j * 4 + i;

    let mut points = Vec::with_capacity(32);
    for z in [1.0, 0.0] {
        for j in 0..4 {
            for i in 0..4 {
                points.push(Point3::new(i as f64, j as f64, z));
            }
        }
    }

    let cells: Vec<(usize, usize)> = (0..3)
        .flat_map(|j| (0..3).map(move |i| (i, j)))
        .filter(|&cell| cell != (1, 1))
        .collect();

    let mut polygons = Vec::with_capacity(32);
    for &(i, j) in &cells {
        polygons.push(vec![top(i, j), top(i + 1, j), top(i + 1, j + 1), top(i, j + 1)]);
    }
    for &(i, j) in &cells {
        polygons.push(vec![
            bottom(i, j),
            bottom(i, j + 1),
            bottom(i + 1, j + 1),
            bottom(i + 1, j),
        ]);
    }
    // A wall runs along its bottom edge from `a` to `b`, then up.
    let mut wall = |a: (usize, usize), b: (usize, usize)| {
        polygons.push(vec![bottom(a.0, a.1), bottom(b.0, b.1), top(b.0, b.1), top(a.0, a.1)]);
    };
    for k in 0..3 {
        wall((k, 0), (k + 1, 0));
        wall((3, k), (3, k + 1));
        wall((k + 1, 3), (k, 3));
        wall((0, k + 1), (0, k));
    }
    wall((2, 1), (1, 1));
    wall((2, 2), (2, 1));
    wall((1, 2), (2, 2));
    wall((1, 1), (1, 2));

    let mut store = MeshStore::from_polygons(&points, &polygons).unwrap();
    store.select_all();
    store
}
