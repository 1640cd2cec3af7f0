use tracing::{debug, info};

use crate::adjacency::MeshSnapshot;
use crate::error::Result;
use crate::math::{Point3, Vector3, CONCAVITY_TOLERANCE};

/// A connected set of faces joined through the concavity predicate.
///
/// Holds dense face indices of the [`MeshSnapshot`] it was found in, in
/// traversal order. Always has at least two faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    faces: Vec<usize>,
}

impl Patch {
    /// Face indices in traversal order.
    #[must_use]
    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// Number of faces in the patch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if the patch has no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_faces(faces: Vec<usize>) -> Self {
        Self { faces }
    }
}

/// Returns `true` if the surface bends inward going from a face at `from`
/// with outward normal `normal` to a neighbor whose centroid is `to`.
#[must_use]
pub fn is_concave(normal: &Vector3, from: &Point3, to: &Point3, tolerance: f64) -> bool {
    normal.dot(&(to - from)) > tolerance
}

/// Segments the selected faces of a snapshot into concave patches.
///
/// Flood-fills from every unvisited selected face in ascending index order.
/// A neighbor joins the current patch when the predicate holds from the
/// face being expanded towards it. Single-face components are dropped.
#[derive(Debug, Clone, Copy)]
pub struct FindConcavePatches {
    tolerance: f64,
}

impl Default for FindConcavePatches {
    fn default() -> Self {
        Self::new()
    }
}

impl FindConcavePatches {
    /// Creates a new `FindConcavePatches` query with the default tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tolerance: CONCAVITY_TOLERANCE,
        }
    }

    /// Sets the threshold the predicate has to exceed.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the query, returning the patches in discovery order.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot's adjacency is inconsistent.
    pub fn execute(&self, snapshot: &MeshSnapshot) -> Result<Vec<Patch>> {
        // Unselected faces count as already handled.
        let mut visited: Vec<bool> = snapshot.faces().map(|f| !f.is_selected()).collect();
        let mut patches = Vec::new();
        let mut stack = Vec::new();

        for start in 0..visited.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut faces = vec![start];
            stack.push(start);

            while let Some(current) = stack.pop() {
                let face = snapshot.face(current)?;
                let normal = face.normal();
                let origin = face.centroid();

                for neighbor in face.radial_neighbors() {
                    if visited[neighbor] {
                        continue;
                    }
                    let other = snapshot.face(neighbor)?;
                    if is_concave(normal, origin, other.centroid(), self.tolerance) {
                        visited[neighbor] = true;
                        faces.push(neighbor);
                        stack.push(neighbor);
                    }
                }
            }

            if faces.len() > 1 {
                debug!(seed = start, faces = faces.len(), "concave patch found");
                patches.push(Patch { faces });
            }
        }

        info!(
            faces = snapshot.face_count(),
            patches = patches.len(),
            "concave patch search finished"
        );
        Ok(patches)
    }
}
