use tracing::{debug, info, warn};

use crate::config::Limits;
use crate::error::Result;
use crate::operations::query::PatchSummary;
use crate::topology::{FaceId, MeshStore};

use super::dissolve_vertex::DissolvePlan;
use super::point_merge::MergePlan;
use super::PointMerge;

/// Outcome of closing holes on one mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseReport {
    /// Patches collapsed and dissolved.
    pub closed: usize,
    /// Patches whose diameter fell outside the limits.
    pub out_of_range: usize,
    /// Patches skipped because an earlier patch already consumed one of
    /// their vertices.
    pub stale: usize,
    /// Patches that could not be merged or dissolved and were left as they
    /// were.
    pub failed: usize,
    /// Faces created where patches were dissolved, one per fan around the
    /// merged vertex.
    pub filled_faces: Vec<FaceId>,
}

/// Collapses every summarized patch whose diameter lies within the limits.
///
/// Each accepted patch has its vertices merged into one point at the patch
/// centroid, which is then dissolved. A through-hole closes with one face
/// per rim. Every patch is applied whole or not at all: a patch that cannot
/// be closed is skipped without affecting the others.
pub struct CloseHoles<'a> {
    summaries: &'a [PatchSummary],
    limits: Limits,
}

impl<'a> CloseHoles<'a> {
    /// Creates a new `CloseHoles` operation.
    #[must_use]
    pub fn new(summaries: &'a [PatchSummary], limits: Limits) -> Self {
        Self { summaries, limits }
    }

    /// Executes the operation on `store`.
    ///
    /// # Errors
    ///
    /// Returns an error only if a patch that was fully validated fails to
    /// apply, which leaves the mesh partially modified.
    pub fn execute(&self, store: &mut MeshStore) -> Result<CloseReport> {
        let mut report = CloseReport::default();

        for (index, summary) in self.summaries.iter().enumerate() {
            if !self.limits.contains(summary.diameter()) {
                debug!(
                    patch = index,
                    diameter = summary.diameter(),
                    "patch outside limits"
                );
                report.out_of_range += 1;
                continue;
            }

            if summary.vertices().iter().any(|&v| !store.contains_vertex(v)) {
                warn!(patch = index, "patch shares vertices with a closed patch, skipped");
                report.stale += 1;
                continue;
            }

            let (merge, dissolve) = match plan_patch(store, summary) {
                Ok(plans) => plans,
                Err(e) => {
                    warn!(patch = index, error = %e, "patch cannot be closed, skipped");
                    report.failed += 1;
                    continue;
                }
            };

            merge.apply(store)?;
            let filled = dissolve.apply(store)?;
            debug!(
                patch = index,
                diameter = summary.diameter(),
                caps = filled.len(),
                "patch closed"
            );
            report.filled_faces.extend(filled);
            report.closed += 1;
        }

        info!(
            closed = report.closed,
            out_of_range = report.out_of_range,
            stale = report.stale,
            failed = report.failed,
            "hole closing finished"
        );
        Ok(report)
    }
}

/// Works out the merge and the dissolve of one patch against the current
/// mesh.
fn plan_patch(store: &MeshStore, summary: &PatchSummary) -> Result<(MergePlan, DissolvePlan)> {
    let merge = PointMerge::new(summary.vertices().to_vec(), summary.centroid()).plan(store)?;
    let dissolve = DissolvePlan::new(merge.survivor(), merge.fan())?;
    Ok((merge, dissolve))
}
