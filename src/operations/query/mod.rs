mod concave_patches;
mod summarize_patch;

pub use concave_patches::{is_concave, FindConcavePatches, Patch};
pub use summarize_patch::{PatchSummary, SummarizePatch};
