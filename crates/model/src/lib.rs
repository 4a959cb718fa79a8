//! Host program model consumed by the registration pipeline.
//!
//! # Purpose
//!
//! The pipeline never owns the program it inspects. This crate provides the
//! read-only view it works against:
//!
//! - [`syntax`]: a declaration-level parser producing one [`SyntaxTree`] per
//!   source unit. Member bodies are skipped, so parsing stays cheap and total
//!   over well-formed input.
//! - [`ProgramSnapshot`]: the program as of one invocation (assembly name,
//!   ordered units, referenced assemblies) together with its [`TypeTable`].
//! - [`SemanticModel`]: the narrow query surface the pipeline uses to decide
//!   membership (`declared_type`, `implements`, `is_concrete`,
//!   `type_graph_stamp`). [`TypeTable`] is the real implementation; tests
//!   substitute fakes.
//!
//! # Snapshot identity
//!
//! Snapshots are compared structurally by unit path and text. Two snapshots
//! built from the same sources are indistinguishable to every consumer.

mod error;
mod names;
mod semantic;
mod snapshot;
pub mod syntax;

pub use error::{ModelError, SemanticError};
pub use names::QualifiedName;
pub use semantic::{AssemblyMetadata, SemanticModel, TypeGraphStamp, TypeHeader, TypeSymbol, TypeTable};
pub use snapshot::{ProgramSnapshot, SnapshotBuilder};
pub use syntax::{DeclarationId, Modifiers, Span, SyntaxTree, TypeDeclaration, TypeKind, TypeRef};
