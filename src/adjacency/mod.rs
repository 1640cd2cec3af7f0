use std::collections::HashMap;

use slotmap::SecondaryMap;

use crate::error::{Result, TopologyError};
use crate::math::{Point3, Vector3};
use crate::topology::{FaceId, MeshStore, VertexId};

/// Per-face data captured once from the mesh.
#[derive(Debug, Clone)]
struct FaceRecord {
    id: FaceId,
    normal: Vector3,
    centroid: Point3,
    /// Dense vertex indices in loop order.
    vertices: Vec<usize>,
    /// Radial neighbor across edge `i`, `None` on open boundary edges.
    neighbors: Vec<Option<usize>>,
    selected: bool,
}

/// Read-only adjacency view of a mesh, captured at one revision.
///
/// Faces and vertices are renumbered densely from zero in arena order, so
/// the detection stages can work with plain indices and flag vectors. The
/// indices are only meaningful for this snapshot; [`FaceView::id`] and
/// [`MeshSnapshot::vertex_id`] map them back to store IDs.
#[derive(Debug, Clone)]
pub struct MeshSnapshot {
    faces: Vec<FaceRecord>,
    vertex_ids: Vec<VertexId>,
    revision: u64,
}

impl MeshSnapshot {
    /// Captures normals, centroids, selection and edge adjacency of every face.
    ///
    /// # Errors
    ///
    /// Returns an error if a face references a vertex missing from the store.
    pub fn capture(store: &MeshStore) -> Result<Self> {
        let vertex_ids: Vec<VertexId> = store.vertex_ids().collect();
        let mut vertex_index: SecondaryMap<VertexId, usize> =
            SecondaryMap::with_capacity(vertex_ids.len());
        for (i, &v) in vertex_ids.iter().enumerate() {
            vertex_index.insert(v, i);
        }

        let mut faces = Vec::with_capacity(store.face_count());
        for (id, data) in store.faces() {
            let vertices = data
                .vertices
                .iter()
                .map(|&v| {
                    vertex_index
                        .get(v)
                        .copied()
                        .ok_or_else(|| TopologyError::EntityNotFound(format!("vertex {v:?}")))
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;

            faces.push(FaceRecord {
                id,
                normal: store.face_normal(id)?,
                centroid: store.face_centroid(id)?,
                neighbors: vec![None; vertices.len()],
                vertices,
                selected: data.selected,
            });
        }

        link_radial_neighbors(&mut faces);

        Ok(Self {
            faces,
            vertex_ids,
            revision: store.revision(),
        })
    }

    /// Number of faces in the snapshot.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices in the snapshot.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_ids.len()
    }

    /// Revision of the mesh the snapshot was captured from.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns a view of the face with dense index `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn face(&self, index: usize) -> Result<FaceView<'_>> {
        self.faces
            .get(index)
            .map(|record| FaceView { index, record })
            .ok_or_else(|| TopologyError::EntityNotFound(format!("face index {index}")).into())
    }

    /// Iterates all faces in dense index order.
    pub fn faces(&self) -> impl Iterator<Item = FaceView<'_>> {
        self.faces
            .iter()
            .enumerate()
            .map(|(index, record)| FaceView { index, record })
    }

    /// Store ID of the vertex with dense index `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn vertex_id(&self, index: usize) -> Result<VertexId> {
        self.vertex_ids
            .get(index)
            .copied()
            .ok_or_else(|| TopologyError::EntityNotFound(format!("vertex index {index}")).into())
    }
}

/// Borrowed handle to one face of a [`MeshSnapshot`].
#[derive(Debug, Clone, Copy)]
pub struct FaceView<'a> {
    index: usize,
    record: &'a FaceRecord,
}

impl<'a> FaceView<'a> {
    /// Dense index of the face within its snapshot.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Store ID of the face.
    #[must_use]
    pub fn id(&self) -> FaceId {
        self.record.id
    }

    /// Unit normal, or the zero vector for a degenerate face.
    #[must_use]
    pub fn normal(&self) -> &'a Vector3 {
        &self.record.normal
    }

    /// Mean of the face's vertex positions.
    #[must_use]
    pub fn centroid(&self) -> &'a Point3 {
        &self.record.centroid
    }

    /// Dense vertex indices in loop order.
    #[must_use]
    pub fn vertices(&self) -> &'a [usize] {
        &self.record.vertices
    }

    /// Whether the face was selected when the snapshot was taken.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.record.selected
    }

    /// Radial neighbor across edge `edge`, if any.
    #[must_use]
    pub fn radial_neighbor(&self, edge: usize) -> Option<usize> {
        self.record.neighbors.get(edge).copied().flatten()
    }

    /// Radial neighbors of all edges in loop order, skipping open edges.
    pub fn radial_neighbors(&self) -> impl Iterator<Item = usize> + 'a {
        self.record.neighbors.iter().filter_map(|n| *n)
    }
}

/// Fills in the radial neighbor of every face edge.
///
/// Faces sharing an undirected edge form a radial cycle in face order; each
/// face's neighbor across that edge is the next face in the cycle. An edge
/// used by a single face has no neighbor.
fn link_radial_neighbors(faces: &mut [FaceRecord]) {
    let mut edge_users: HashMap<(usize, usize), Vec<(usize, usize)>> = HashMap::new();
    for (face_idx, face) in faces.iter().enumerate() {
        let n = face.vertices.len();
        for edge in 0..n {
            let a = face.vertices[edge];
            let b = face.vertices[(edge + 1) % n];
            edge_users
                .entry((a.min(b), a.max(b)))
                .or_default()
                .push((face_idx, edge));
        }
    }

    for users in edge_users.values() {
        if users.len() < 2 {
            continue;
        }
        for (k, &(face_idx, edge)) in users.iter().enumerate() {
            let (next_face, _) = users[(k + 1) % users.len()];
            if next_face != face_idx {
                faces[face_idx].neighbors[edge] = Some(next_face);
            }
        }
    }
}
