use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the mesh store.
    pub struct FaceId;
}

/// Data associated with a polygonal face.
///
/// The vertex loop is ordered counter-clockwise when seen from the side
/// the face normal points to. Edge `i` runs from `vertices[i]` to
/// `vertices[(i + 1) % len]`.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Ordered vertex loop.
    pub vertices: Vec<VertexId>,
    /// Whether the face takes part in hole detection.
    pub selected: bool,
}

impl FaceData {
    /// Creates an unselected face from a vertex loop.
    #[must_use]
    pub fn new(vertices: Vec<VertexId>) -> Self {
        Self {
            vertices,
            selected: false,
        }
    }

    /// Iterates the directed edges of the loop as `(start, end)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Returns `true` if `vertex` is part of the loop.
    #[must_use]
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }
}

/// Removes consecutive repeats from a closed loop, including a repeat
/// between the last and the first entry.
pub(crate) fn dedup_loop<T: PartialEq>(vertices: &mut Vec<T>) {
    vertices.dedup();
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
}
