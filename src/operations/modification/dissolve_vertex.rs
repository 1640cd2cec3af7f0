use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::topology::face::dedup_loop;
use crate::topology::{FaceId, MeshStore, VertexId};

/// Removes a vertex and joins the faces around it.
///
/// Each face around the vertex contributes the part of its loop that skips
/// the vertex. Paths that meet end-to-start are chained in winding order,
/// and every resulting fan becomes one face. A vertex can have several
/// fans, closed (interior) or open (boundary): the rim vertex left by
/// merging the walls of a through-hole has one closed fan per side. A fan
/// whose joined loop has fewer than 3 distinct vertices is removed without
/// a replacement.
pub struct DissolveVertex {
    vertex: VertexId,
}

impl DissolveVertex {
    /// Creates a new `DissolveVertex` operation.
    #[must_use]
    pub fn new(vertex: VertexId) -> Self {
        Self { vertex }
    }

    /// Executes the dissolve, returning one joined face per fan.
    ///
    /// Nothing is modified unless every fan can be joined.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex does not exist, appears more than once
    /// in a face, or two of its faces share an edge with the same winding.
    pub fn execute(&self, store: &mut MeshStore) -> Result<Vec<FaceId>> {
        store.vertex(self.vertex)?;
        let fan: Vec<(FaceId, &[VertexId])> = store
            .faces()
            .filter(|(_, f)| f.contains(self.vertex))
            .map(|(id, f)| (id, f.vertices.as_slice()))
            .collect();
        let plan = DissolvePlan::new(self.vertex, fan)?;
        plan.apply(store)
    }
}

/// Faces a dissolve removes and the loops it adds in their place.
#[derive(Debug, Clone)]
pub(crate) struct DissolvePlan {
    vertex: VertexId,
    fan: Vec<FaceId>,
    joined: Vec<Vec<VertexId>>,
}

impl DissolvePlan {
    /// Joins the loops of the faces around `vertex`.
    pub(crate) fn new<'a, I>(vertex: VertexId, fan: I) -> Result<Self>
    where
        I: IntoIterator<Item = (FaceId, &'a [VertexId])>,
    {
        let mut faces = Vec::new();
        let mut paths = Vec::new();
        for (id, loop_vertices) in fan {
            faces.push(id);
            paths.push(path_around(loop_vertices, vertex)?);
        }

        let mut joined = Vec::new();
        for mut chain in chain_paths(&paths)? {
            dedup_loop(&mut chain);
            let distinct: HashSet<VertexId> = chain.iter().copied().collect();
            if distinct.len() >= 3 {
                joined.push(chain);
            }
        }

        Ok(Self {
            vertex,
            fan: faces,
            joined,
        })
    }

    /// Removes the fan and the vertex, then adds the joined faces.
    pub(crate) fn apply(self, store: &mut MeshStore) -> Result<Vec<FaceId>> {
        for &face_id in &self.fan {
            store.remove_face(face_id)?;
        }
        // The fan held every face using the vertex.
        store.remove_unused_vertex(self.vertex)?;

        let mut filled = Vec::with_capacity(self.joined.len());
        for vertices in self.joined {
            filled.push(store.add_face(vertices)?);
        }

        debug!(
            joined_faces = self.fan.len(),
            filled = filled.len(),
            "vertex dissolved"
        );
        Ok(filled)
    }
}

/// The loop of a face from just after `vertex` around to just before it.
fn path_around(loop_vertices: &[VertexId], vertex: VertexId) -> Result<Vec<VertexId>> {
    let mut positions = loop_vertices
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == vertex)
        .map(|(i, _)| i);
    let (Some(k), None) = (positions.next(), positions.next()) else {
        return Err(TopologyError::InvalidTopology(
            "dissolved vertex must appear exactly once per face".into(),
        )
        .into());
    };

    let mut path = Vec::with_capacity(loop_vertices.len() - 1);
    path.extend_from_slice(&loop_vertices[k + 1..]);
    path.extend_from_slice(&loop_vertices[..k]);
    Ok(path)
}

/// Chains fan paths end-to-start, one chain per fan.
///
/// A path continues with the path that starts where it ends. Open fans
/// start at a path whose start is no other path's end; the remaining
/// closed fans start at their lowest path index. Chains of a closed fan
/// end on their own first vertex.
fn chain_paths(paths: &[Vec<VertexId>]) -> Result<Vec<Vec<VertexId>>> {
    let branching = || {
        TopologyError::InvalidTopology(
            "faces around vertex share an edge with equal winding".into(),
        )
    };

    let mut by_start: HashMap<VertexId, usize> = HashMap::with_capacity(paths.len());
    let mut ends: HashSet<VertexId> = HashSet::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
            return Err(branching().into());
        };
        if by_start.insert(first, i).is_some() || !ends.insert(last) {
            return Err(branching().into());
        }
    }

    let open_starts = paths
        .iter()
        .enumerate()
        .filter(|(_, p)| p.first().is_some_and(|v| !ends.contains(v)))
        .map(|(i, _)| i);

    let mut used = vec![false; paths.len()];
    let mut chains = Vec::new();
    for start in open_starts.chain(0..paths.len()) {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut chain = paths[start].clone();
        while let Some(&next) = chain.last().and_then(|end| by_start.get(end)) {
            if used[next] {
                break;
            }
            used[next] = true;
            chain.extend_from_slice(&paths[next][1..]);
        }
        chains.push(chain);
    }
    Ok(chains)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SolidHolesError;
    use crate::math::{Point3, Vector3};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn ids(store: &MeshStore) -> Vec<VertexId> {
        store.vertex_ids().collect()
    }

    #[test]
    fn closed_fan_becomes_one_face() {
        // Unit square split into 4 triangles around its center (vertex 4).
        let mut store = MeshStore::from_polygons(
            &[
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(0.0, 1.0, 0.0),
                p(0.5, 0.5, 0.0),
            ],
            &[vec![0, 1, 4], vec![1, 2, 4], vec![2, 3, 4], vec![3, 0, 4]],
        )
        .unwrap();
        let v = ids(&store);

        let filled = DissolveVertex::new(v[4]).execute(&mut store).unwrap();
        assert_eq!(filled.len(), 1);
        let face = filled[0];
        assert_eq!(store.face_count(), 1);
        assert_eq!(store.vertex_count(), 4);
        assert_eq!(store.face(face).unwrap().vertices, vec![v[0], v[1], v[2], v[3]]);
        assert_relative_eq!(store.face_normal(face).unwrap(), Vector3::z());
    }

    #[test]
    fn open_fan_on_boundary_is_joined() {
        let mut store = MeshStore::from_polygons(
            &[
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(0.0, 1.0, 0.0),
            ],
            &[vec![0, 1, 2], vec![0, 2, 3]],
        )
        .unwrap();
        let v = ids(&store);

        let filled = DissolveVertex::new(v[0]).execute(&mut store).unwrap();
        assert_eq!(filled.len(), 1);
        assert_eq!(store.face(filled[0]).unwrap().vertices, vec![v[1], v[2], v[3]]);
        assert!(!store.contains_vertex(v[0]));
    }

    #[test]
    fn lone_triangle_corner_leaves_nothing() {
        let mut store = MeshStore::from_polygons(
            &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)],
            &[vec![0, 1, 2]],
        )
        .unwrap();
        let v = ids(&store);

        assert!(DissolveVertex::new(v[0]).execute(&mut store).unwrap().is_empty());
        assert_eq!(store.face_count(), 0);
        assert_eq!(store.vertex_count(), 2);
    }

    #[test]
    fn isolated_vertex_is_removed() {
        let mut store = MeshStore::new();
        let v = store.add_vertex(p(0.0, 0.0, 0.0));
        assert!(DissolveVertex::new(v).execute(&mut store).unwrap().is_empty());
        assert_eq!(store.vertex_count(), 0);
    }

    #[test]
    fn separate_fans_are_joined_separately() {
        // Two quads touching only at vertex 0.
        let mut store = MeshStore::from_polygons(
            &[
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(0.0, 1.0, 0.0),
                p(-1.0, 0.0, 0.0),
                p(-1.0, -1.0, 0.0),
                p(0.0, -1.0, 0.0),
            ],
            &[vec![0, 1, 2, 3], vec![0, 4, 5, 6]],
        )
        .unwrap();
        let v = ids(&store);

        let filled = DissolveVertex::new(v[0]).execute(&mut store).unwrap();
        assert_eq!(filled.len(), 2);
        assert_eq!(store.face(filled[0]).unwrap().vertices, vec![v[1], v[2], v[3]]);
        assert_eq!(store.face(filled[1]).unwrap().vertices, vec![v[4], v[5], v[6]]);
        assert_eq!(store.face_count(), 2);
        assert!(!store.contains_vertex(v[0]));
    }

    #[test]
    fn two_closed_fans_give_two_faces() {
        // Two square pyramids, apex down and apex up, sharing only the apex.
        let mut store = MeshStore::from_polygons(
            &[
                p(0.0, 0.0, 0.0),
                p(-1.0, -1.0, 1.0),
                p(1.0, -1.0, 1.0),
                p(1.0, 1.0, 1.0),
                p(-1.0, 1.0, 1.0),
                p(-1.0, -1.0, -1.0),
                p(1.0, -1.0, -1.0),
                p(1.0, 1.0, -1.0),
                p(-1.0, 1.0, -1.0),
            ],
            &[
                vec![0, 1, 2],
                vec![0, 2, 3],
                vec![0, 3, 4],
                vec![0, 4, 1],
                vec![0, 6, 5],
                vec![0, 7, 6],
                vec![0, 8, 7],
                vec![0, 5, 8],
            ],
        )
        .unwrap();
        let v = ids(&store);

        let filled = DissolveVertex::new(v[0]).execute(&mut store).unwrap();
        assert_eq!(filled.len(), 2);
        assert_eq!(
            store.face(filled[0]).unwrap().vertices,
            vec![v[1], v[2], v[3], v[4]]
        );
        assert_eq!(
            store.face(filled[1]).unwrap().vertices,
            vec![v[6], v[5], v[8], v[7]]
        );
        assert_relative_eq!(store.face_normal(filled[0]).unwrap(), Vector3::z());
        assert_relative_eq!(store.face_normal(filled[1]).unwrap(), -Vector3::z());
    }

    #[test]
    fn branching_edge_is_rejected_without_changes() {
        // Three fins winding the same way around the edge (0, 1).
        let mut store = MeshStore::from_polygons(
            &[
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(0.5, 1.0, 0.0),
                p(0.5, 0.0, 1.0),
                p(0.5, -1.0, 0.0),
            ],
            &[vec![0, 1, 2], vec![0, 1, 3], vec![0, 1, 4]],
        )
        .unwrap();
        let v = ids(&store);
        let revision = store.revision();

        let err = DissolveVertex::new(v[0]).execute(&mut store).unwrap_err();
        assert!(matches!(
            err,
            SolidHolesError::Topology(TopologyError::InvalidTopology(_))
        ));
        assert_eq!(store.revision(), revision);
        assert_eq!(store.face_count(), 3);
    }

    #[test]
    fn repeated_vertex_in_face_is_rejected() {
        let mut store = MeshStore::from_polygons(
            &[
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(0.0, 1.0, 0.0),
                p(-1.0, 1.0, 0.0),
            ],
            &[vec![0, 1, 2, 0, 3, 4]],
        )
        .unwrap();
        let v = ids(&store);
        assert!(DissolveVertex::new(v[0]).execute(&mut store).is_err());
    }
}
