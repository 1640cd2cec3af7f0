use std::collections::HashSet;

use tracing::debug;

use crate::error::{GeometryError, OperationError, Result};
use crate::math::Point3;
use crate::topology::face::dedup_loop;
use crate::topology::{FaceId, MeshStore, VertexId};

/// Merges a set of vertices into a single vertex at a target position.
///
/// The first vertex of the set survives and is moved to the target; every
/// other vertex is replaced by it in all face loops at once and then
/// deleted. Faces left with fewer than 3 vertices are deleted as well.
pub struct PointMerge {
    vertices: Vec<VertexId>,
    target: Point3,
}

impl PointMerge {
    /// Creates a new `PointMerge` operation.
    #[must_use]
    pub fn new(vertices: Vec<VertexId>, target: Point3) -> Self {
        Self { vertices, target }
    }

    /// Executes the merge, returning the surviving vertex.
    ///
    /// Nothing is modified unless all inputs are valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex set is empty, a vertex does not
    /// exist, or the target is not finite.
    pub fn execute(&self, store: &mut MeshStore) -> Result<VertexId> {
        self.plan(store)?.apply(store)
    }

    /// Validates the inputs and works out the merge without modifying the
    /// mesh.
    pub(crate) fn plan(&self, store: &MeshStore) -> Result<MergePlan> {
        let (&survivor, rest) = self
            .vertices
            .split_first()
            .ok_or_else(|| OperationError::InvalidInput("no vertices to merge".into()))?;
        for &v in &self.vertices {
            store.vertex(v)?;
        }
        if !self.target.coords.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::NonFinite("merge target").into());
        }

        let mut merged = Vec::with_capacity(rest.len());
        let mut merged_set = HashSet::with_capacity(rest.len());
        for &v in rest {
            if v != survivor && merged_set.insert(v) {
                merged.push(v);
            }
        }

        let mut rewritten = Vec::new();
        let mut collapsed = Vec::new();
        for (id, face) in store.faces() {
            if !face
                .vertices
                .iter()
                .any(|v| *v == survivor || merged_set.contains(v))
            {
                continue;
            }
            let mut vertices: Vec<VertexId> = face
                .vertices
                .iter()
                .map(|v| if merged_set.contains(v) { survivor } else { *v })
                .collect();
            dedup_loop(&mut vertices);
            if vertices.len() < 3 {
                collapsed.push(id);
            } else {
                rewritten.push((id, vertices));
            }
        }

        Ok(MergePlan {
            survivor,
            target: self.target,
            merged,
            rewritten,
            collapsed,
        })
    }
}

/// Changes a [`PointMerge`] makes to a mesh.
#[derive(Debug, Clone)]
pub(crate) struct MergePlan {
    survivor: VertexId,
    target: Point3,
    merged: Vec<VertexId>,
    /// Faces around the survivor after the merge, with their new loops.
    rewritten: Vec<(FaceId, Vec<VertexId>)>,
    collapsed: Vec<FaceId>,
}

impl MergePlan {
    pub(crate) fn survivor(&self) -> VertexId {
        self.survivor
    }

    /// Faces that will surround the survivor, with their merged loops.
    pub(crate) fn fan(&self) -> impl Iterator<Item = (FaceId, &[VertexId])> {
        self.rewritten.iter().map(|(id, l)| (*id, l.as_slice()))
    }

    pub(crate) fn apply(self, store: &mut MeshStore) -> Result<VertexId> {
        store.set_vertex_position(self.survivor, self.target)?;
        for (face_id, vertices) in self.rewritten {
            store.set_face_vertices(face_id, vertices)?;
        }
        for &face_id in &self.collapsed {
            store.remove_face(face_id)?;
        }
        // No face refers to a merged vertex any more.
        for &v in &self.merged {
            store.remove_unused_vertex(v)?;
        }

        debug!(
            vertices = self.merged.len() + 1,
            collapsed_faces = self.collapsed.len(),
            "vertices merged"
        );
        Ok(self.survivor)
    }
}
