use super::{Point3, Vector3, TOLERANCE};

/// Unit normal of a (possibly non-planar) polygon using Newell's method.
///
/// Counter-clockwise winding seen from the tip of the normal. Returns the
/// zero vector for polygons with fewer than 3 points or zero area.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    if points.len() < 3 {
        return Vector3::zeros();
    }

    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }

    let len = normal.norm();
    if len < TOLERANCE {
        return Vector3::zeros();
    }
    normal / len
}

/// Arithmetic mean of a set of points.
///
/// Returns `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_point(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}
