use crate::adjacency::MeshSnapshot;
use crate::error::{OperationError, Result};
use crate::math::polygon::mean_point;
use crate::math::{Aabb, Axis, Point3};
use crate::topology::{FaceId, VertexId};

use super::Patch;

/// Geometric summary of a concave patch, ready for the closing decision.
///
/// Refers to the mesh through store IDs only, so it stays meaningful after
/// other patches of the same mesh have been closed.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchSummary {
    vertices: Vec<VertexId>,
    faces: Vec<FaceId>,
    axis: Axis,
    centroid: Point3,
    diameter: f64,
}

impl PatchSummary {
    /// Distinct vertices of all member faces.
    #[must_use]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Member faces in traversal order.
    #[must_use]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Axis most member-face normals point along.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Unweighted mean of the member-face centroids.
    #[must_use]
    pub fn centroid(&self) -> Point3 {
        self.centroid
    }

    /// Span of the member-face centroids along [`PatchSummary::axis`].
    #[must_use]
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    #[cfg(test)]
    pub(crate) fn from_parts(vertices: Vec<VertexId>, centroid: Point3, diameter: f64) -> Self {
        Self {
            vertices,
            faces: Vec::new(),
            axis: Axis::Z,
            centroid,
            diameter,
        }
    }
}

/// Reduces a [`Patch`] to its [`PatchSummary`].
pub struct SummarizePatch<'a> {
    patch: &'a Patch,
}

impl<'a> SummarizePatch<'a> {
    /// Creates a new `SummarizePatch` query.
    #[must_use]
    pub fn new(patch: &'a Patch) -> Self {
        Self { patch }
    }

    /// Executes the query against the snapshot the patch was found in.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is empty or references a face or
    /// vertex the snapshot does not contain.
    pub fn execute(&self, snapshot: &MeshSnapshot) -> Result<PatchSummary> {
        let mut vertex_indices = Vec::new();
        let mut centroids = Vec::with_capacity(self.patch.len());
        let mut axes = Vec::with_capacity(self.patch.len());
        let mut faces = Vec::with_capacity(self.patch.len());

        for &index in self.patch.faces() {
            let face = snapshot.face(index)?;
            vertex_indices.extend_from_slice(face.vertices());
            centroids.push(*face.centroid());
            axes.push(Axis::dominant(face.normal()));
            faces.push(face.id());
        }

        let axis = Axis::mode(axes)
            .ok_or_else(|| OperationError::InvalidInput("patch has no faces".into()))?;
        let centroid = mean_point(&centroids)
            .ok_or_else(|| OperationError::InvalidInput("patch has no faces".into()))?;
        let diameter = Aabb::from_points(&centroids)
            .map(|aabb| aabb.extent(axis))
            .ok_or_else(|| OperationError::InvalidInput("patch has no faces".into()))?;

        vertex_indices.sort_unstable();
        vertex_indices.dedup();
        let vertices = vertex_indices
            .into_iter()
            .map(|v| snapshot.vertex_id(v))
            .collect::<Result<Vec<_>>>()?;

        Ok(PatchSummary {
            vertices,
            faces,
            axis,
            centroid,
            diameter,
        })
    }
}
