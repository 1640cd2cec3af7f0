//! Two-phase hole closing across one or more meshes.
//!
//! [`HoleDetection::detect`] reads every mesh and keeps the summarized
//! patches; [`HoleDetection::apply`] then closes those within a diameter
//! range. All reading finishes before any mesh is modified.

use tracing::{info, warn};

use crate::adjacency::MeshSnapshot;
use crate::config::{DetectOptions, Limits};
use crate::error::{OperationError, Result};
use crate::operations::modification::{CloseHoles, CloseReport};
use crate::operations::query::{FindConcavePatches, PatchSummary, SummarizePatch};
use crate::topology::MeshStore;

/// Patches detected on one mesh.
#[derive(Debug, Clone)]
struct MeshDetection {
    revision: u64,
    summaries: Vec<PatchSummary>,
}

/// Concave patches found on a batch of meshes, ready to be closed.
///
/// A detection stays valid for a mesh as long as the mesh is not modified.
/// It can be applied repeatedly, with different limits, to unmodified
/// copies of the detected meshes.
#[derive(Debug, Clone, Default)]
pub struct HoleDetection {
    meshes: Vec<MeshDetection>,
}

impl HoleDetection {
    /// Finds and summarizes the concave patches of every mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if a mesh's adjacency cannot be captured.
    pub fn detect<'a, I>(meshes: I, options: &DetectOptions) -> Result<Self>
    where
        I: IntoIterator<Item = &'a MeshStore>,
    {
        let finder = FindConcavePatches::new().with_tolerance(options.tolerance);
        let mut detected = Vec::new();

        for (index, mesh) in meshes.into_iter().enumerate() {
            let snapshot = MeshSnapshot::capture(mesh)?;
            let summaries = finder
                .execute(&snapshot)?
                .iter()
                .map(|patch| SummarizePatch::new(patch).execute(&snapshot))
                .collect::<Result<Vec<_>>>()?;

            info!(
                mesh = index,
                selected = mesh.selected_face_count(),
                patches = summaries.len(),
                "mesh scanned for concave patches"
            );
            detected.push(MeshDetection {
                revision: snapshot.revision(),
                summaries,
            });
        }

        Ok(Self { meshes: detected })
    }

    /// Number of meshes in the detection.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Total number of patches across all meshes.
    #[must_use]
    pub fn patch_count(&self) -> usize {
        self.meshes.iter().map(|m| m.summaries.len()).sum()
    }

    /// Patches detected on the mesh at position `mesh`.
    #[must_use]
    pub fn summaries(&self, mesh: usize) -> Option<&[PatchSummary]> {
        self.meshes.get(mesh).map(|m| m.summaries.as_slice())
    }

    /// Closes the detected patches whose diameter lies within `limits`.
    ///
    /// Meshes must be passed in detection order. Each mesh is handled on
    /// its own: an error on one is reported in its slot of the returned
    /// vector while the others proceed. A stale or unknown mesh is left
    /// unchanged.
    pub fn apply<'a, I>(&self, meshes: I, limits: Limits) -> Vec<Result<CloseReport>>
    where
        I: IntoIterator<Item = &'a mut MeshStore>,
    {
        meshes
            .into_iter()
            .enumerate()
            .map(|(index, mesh)| {
                let outcome = self.apply_one(index, mesh, limits);
                if let Err(e) = &outcome {
                    warn!(mesh = index, error = %e, "closing holes failed");
                }
                outcome
            })
            .collect()
    }

    fn apply_one(
        &self,
        index: usize,
        mesh: &mut MeshStore,
        limits: Limits,
    ) -> Result<CloseReport> {
        let detection = self.meshes.get(index).ok_or_else(|| {
            OperationError::InvalidInput(format!("mesh {index} was not part of the detection"))
        })?;
        if mesh.revision() != detection.revision {
            return Err(OperationError::StaleDetection {
                detected: detection.revision,
                current: mesh.revision(),
            }
            .into());
        }
        CloseHoles::new(&detection.summaries, limits).execute(mesh)
    }
}
