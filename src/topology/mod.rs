pub mod face;
pub mod vertex;

pub use face::{FaceData, FaceId};
pub use vertex::{VertexData, VertexId};

use crate::error::{GeometryError, Result, TopologyError};
use crate::math::polygon::{mean_point, newell_normal};
use crate::math::{Point3, Vector3};
use slotmap::SlotMap;

/// Editable polygon mesh that owns all vertices and faces.
///
/// Entities reference each other via typed IDs (generational indices), so
/// an ID held across a mutation either still points at the same entity or
/// reports it as missing. Every mutating call bumps [`MeshStore::revision`];
/// clones keep the revision of their source.
#[derive(Debug, Clone, Default)]
pub struct MeshStore {
    vertices: SlotMap<VertexId, VertexData>,
    faces: SlotMap<FaceId, FaceData>,
    revision: u64,
}

impl MeshStore {
    /// Creates a new, empty mesh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mesh from indexed polygons. All faces start unselected.
    ///
    /// # Errors
    ///
    /// Returns an error if a point is not finite, a polygon references a
    /// point index out of range, or a polygon is degenerate.
    pub fn from_polygons(points: &[Point3], polygons: &[Vec<usize>]) -> Result<Self> {
        let mut store = Self::new();
        let mut ids = Vec::with_capacity(points.len());
        for p in points {
            if !p.coords.iter().all(|c| c.is_finite()) {
                return Err(GeometryError::NonFinite("vertex position").into());
            }
            ids.push(store.add_vertex(*p));
        }

        for polygon in polygons {
            let loop_ids = polygon
                .iter()
                .map(|&i| {
                    ids.get(i)
                        .copied()
                        .ok_or_else(|| TopologyError::EntityNotFound(format!("point {i}")))
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            store.add_face(loop_ids)?;
        }

        Ok(store)
    }

    /// Mutation counter; increases with every change to the mesh.
    ///
    /// Reads never change it, and neither do calls that fail.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, point: Point3) -> VertexId {
        self.touch();
        self.vertices.insert(VertexData::new(point))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()).into())
    }

    /// Moves a vertex to a new position.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex does not exist or the position is not
    /// finite. The mesh is unchanged in that case.
    pub fn set_vertex_position(&mut self, id: VertexId, point: Point3) -> Result<()> {
        if !point.coords.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::NonFinite("vertex position").into());
        }
        let vertex = self
            .vertices
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("vertex".into()))?;
        vertex.point = point;
        self.touch();
        Ok(())
    }

    /// Returns `true` if the vertex exists.
    #[must_use]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    /// Removes an unreferenced vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex does not exist or a face still uses it.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<VertexData> {
        if self.faces.values().any(|f| f.contains(id)) {
            return Err(TopologyError::InvalidTopology(
                "cannot remove a vertex that is still used by a face".into(),
            )
            .into());
        }
        self.remove_unused_vertex(id)
    }

    /// Removes a vertex the caller knows no face refers to any more.
    pub(crate) fn remove_unused_vertex(&mut self, id: VertexId) -> Result<VertexData> {
        let removed = self
            .vertices
            .remove(id)
            .ok_or(TopologyError::EntityNotFound("vertex".into()))?;
        self.touch();
        Ok(removed)
    }

    /// Iterates vertex IDs in arena order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Face operations ---

    /// Inserts an unselected face over existing vertices and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a vertex is missing, the loop has fewer than 3
    /// distinct vertices, or the same vertex appears twice in a row.
    pub fn add_face(&mut self, vertices: Vec<VertexId>) -> Result<FaceId> {
        if let Some(missing) = vertices.iter().find(|&&v| !self.vertices.contains_key(v)) {
            return Err(TopologyError::EntityNotFound(format!("vertex {missing:?}")).into());
        }

        let mut distinct = vertices.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 3 {
            return Err(TopologyError::TooFewVertices(distinct.len()).into());
        }

        let data = FaceData::new(vertices);
        if data.edges().any(|(a, b)| a == b) {
            return Err(TopologyError::InvalidTopology(
                "face loop repeats a vertex consecutively".into(),
            )
            .into());
        }

        self.touch();
        Ok(self.faces.insert(data))
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()).into())
    }

    /// Replaces the loop of a face, keeping its ID and selection.
    ///
    /// The caller guarantees the loop satisfies the rules of
    /// [`MeshStore::add_face`].
    pub(crate) fn set_face_vertices(
        &mut self,
        id: FaceId,
        vertices: Vec<VertexId>,
    ) -> Result<()> {
        let face = self
            .faces
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("face".into()))?;
        face.vertices = vertices;
        self.touch();
        Ok(())
    }

    /// Removes a face. Its vertices stay in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    pub fn remove_face(&mut self, id: FaceId) -> Result<FaceData> {
        let removed = self
            .faces
            .remove(id)
            .ok_or(TopologyError::EntityNotFound("face".into()))?;
        self.touch();
        Ok(removed)
    }

    /// Iterates face IDs in arena order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.keys()
    }

    /// Iterates faces with their IDs in arena order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Faces whose loop contains `vertex`, in arena order.
    #[must_use]
    pub fn faces_around_vertex(&self, vertex: VertexId) -> Vec<FaceId> {
        self.faces
            .iter()
            .filter(|(_, f)| f.contains(vertex))
            .map(|(id, _)| id)
            .collect()
    }

    // --- Selection ---

    /// Marks every face as selected.
    pub fn select_all(&mut self) {
        self.touch();
        for face in self.faces.values_mut() {
            face.selected = true;
        }
    }

    /// Clears the selection flag of every face.
    pub fn deselect_all(&mut self) {
        self.touch();
        for face in self.faces.values_mut() {
            face.selected = false;
        }
    }

    /// Sets the selection flag of one face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    pub fn set_selected(&mut self, id: FaceId, selected: bool) -> Result<()> {
        let face = self
            .faces
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("face".into()))?;
        face.selected = selected;
        self.touch();
        Ok(())
    }

    /// Returns whether a face is selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not exist.
    pub fn is_selected(&self, id: FaceId) -> Result<bool> {
        Ok(self.face(id)?.selected)
    }

    /// Number of selected faces.
    #[must_use]
    pub fn selected_face_count(&self) -> usize {
        self.faces.values().filter(|f| f.selected).count()
    }

    // --- Geometry ---

    /// Positions of a face's vertices in loop order.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its vertices does not exist.
    pub fn face_positions(&self, id: FaceId) -> Result<Vec<Point3>> {
        self.face(id)?
            .vertices
            .iter()
            .map(|&v| self.vertex(v).map(|d| d.point))
            .collect()
    }

    /// Unit normal of a face, or the zero vector for a degenerate face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its vertices does not exist.
    pub fn face_normal(&self, id: FaceId) -> Result<Vector3> {
        Ok(newell_normal(&self.face_positions(id)?))
    }

    /// Mean of a face's vertex positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its vertices does not exist.
    pub fn face_centroid(&self, id: FaceId) -> Result<Point3> {
        let positions = self.face_positions(id)?;
        mean_point(&positions).ok_or_else(|| TopologyError::TooFewVertices(0).into())
    }
}
