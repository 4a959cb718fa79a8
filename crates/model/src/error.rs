//! Error types for snapshot construction and semantic queries.

use std::sync::Arc;

use thiserror::Error;

use crate::syntax::Span;

/// Errors raised while building a [`crate::ProgramSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
	/// A source unit could not be parsed at the declaration level.
	#[error("parse error in {path} at byte {offset}: {message}")]
	Parse {
		/// Logical path of the offending unit.
		path: Arc<str>,
		/// Byte offset where parsing stopped.
		offset: usize,
		/// Human readable reason.
		message: String,
	},

	/// Two source units share the same logical path.
	#[error("duplicate source unit: {0}")]
	DuplicateUnit(Arc<str>),
}

/// Inconsistencies between a declaration reference and the semantic model.
///
/// These only occur when a caller pairs syntax from one snapshot with the
/// semantic model of another.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
	#[error("unknown source unit: {0}")]
	UnknownUnit(Arc<str>),

	#[error("no declaration in {unit} at {span:?}")]
	UnknownDeclaration { unit: Arc<str>, span: Span },
}
