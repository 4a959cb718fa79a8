use enlist_model::SemanticError;
use thiserror::Error;

/// Aborts a run. No artifact is produced and the cache is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
	/// The snapshot's semantic model cannot resolve one of its own declarations.
	#[error("inconsistent program snapshot: {0}")]
	Unresolved(#[from] SemanticError),
}
