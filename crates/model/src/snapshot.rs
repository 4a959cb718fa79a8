//! Program snapshots.
//!
//! A [`ProgramSnapshot`] is immutable. Edits produce a new snapshot that
//! shares every untouched [`SyntaxTree`] with its predecessor, so a driver
//! can feed a long edit sequence without reparsing unchanged units.

use std::sync::Arc;

use crate::error::ModelError;
use crate::semantic::{AssemblyMetadata, TypeTable};
use crate::syntax::SyntaxTree;

#[derive(Debug, Clone)]
pub struct ProgramSnapshot {
	assembly: Arc<str>,
	units: Vec<Arc<SyntaxTree>>,
	references: Vec<Arc<AssemblyMetadata>>,
	types: Arc<TypeTable>,
}

impl ProgramSnapshot {
	pub fn builder(assembly: impl Into<Arc<str>>) -> SnapshotBuilder {
		SnapshotBuilder {
			assembly: assembly.into(),
			sources: Vec::new(),
			references: Vec::new(),
		}
	}

	fn from_parts(assembly: Arc<str>, units: Vec<Arc<SyntaxTree>>, references: Vec<Arc<AssemblyMetadata>>) -> Self {
		let types = Arc::new(TypeTable::build(&assembly, &units, &references));
		Self {
			assembly,
			units,
			references,
			types,
		}
	}

	pub fn assembly_name(&self) -> &Arc<str> {
		&self.assembly
	}

	/// Source units in snapshot order.
	pub fn units(&self) -> &[Arc<SyntaxTree>] {
		&self.units
	}

	pub fn unit(&self, path: &str) -> Option<&Arc<SyntaxTree>> {
		self.units.iter().find(|u| &**u.path() == path)
	}

	pub fn references(&self) -> &[Arc<AssemblyMetadata>] {
		&self.references
	}

	/// Semantic model bound to this snapshot.
	pub fn semantic(&self) -> &TypeTable {
		&self.types
	}

	/// Returns a snapshot with `path` replaced by `text`, or appended when the
	/// unit does not exist yet. Other units are shared, not reparsed.
	pub fn with_unit(&self, path: &str, text: &str) -> Result<Self, ModelError> {
		let mut units = self.units.clone();
		match units.iter().position(|u| &**u.path() == path) {
			Some(idx) if &**units[idx].text() == text => return Ok(self.clone()),
			Some(idx) => units[idx] = Arc::new(SyntaxTree::parse(units[idx].path().clone(), text)?),
			None => units.push(Arc::new(SyntaxTree::parse(path, text)?)),
		}
		Ok(Self::from_parts(self.assembly.clone(), units, self.references.clone()))
	}

	/// Returns a snapshot without the unit at `path`.
	pub fn without_unit(&self, path: &str) -> Self {
		let units = self.units.iter().filter(|u| &**u.path() != path).cloned().collect();
		Self::from_parts(self.assembly.clone(), units, self.references.clone())
	}
}

impl PartialEq for ProgramSnapshot {
	fn eq(&self, other: &Self) -> bool {
		self.assembly == other.assembly
			&& self.references == other.references
			&& self.units.len() == other.units.len()
			&& self
				.units
				.iter()
				.zip(&other.units)
				.all(|(a, b)| a.path() == b.path() && a.text() == b.text())
	}
}

impl Eq for ProgramSnapshot {}

/// Collects sources and references for a new [`ProgramSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
	assembly: Arc<str>,
	sources: Vec<(Arc<str>, Arc<str>)>,
	references: Vec<Arc<AssemblyMetadata>>,
}

impl SnapshotBuilder {
	pub fn source(mut self, path: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> Self {
		self.sources.push((path.into(), text.into()));
		self
	}

	pub fn reference(mut self, metadata: AssemblyMetadata) -> Self {
		self.references.push(Arc::new(metadata));
		self
	}

	pub fn build(self) -> Result<ProgramSnapshot, ModelError> {
		let mut units: Vec<Arc<SyntaxTree>> = Vec::with_capacity(self.sources.len());
		for (path, text) in self.sources {
			if units.iter().any(|u| *u.path() == path) {
				return Err(ModelError::DuplicateUnit(path));
			}
			units.push(Arc::new(SyntaxTree::parse(path, text)?));
		}
		Ok(ProgramSnapshot::from_parts(self.assembly, units, self.references))
	}
}
