//! Semantic queries over a program snapshot.
//!
//! The pipeline consumes semantics only through [`SemanticModel`]. The
//! concrete [`TypeTable`] resolves base-list names against declared and
//! referenced types and answers inheritance questions over the resolved
//! supertype graph.

mod table;


use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHasher;
pub use table::TypeTable;

use crate::error::SemanticError;
use crate::names::QualifiedName;
use crate::syntax::{DeclarationId, TypeKind, TypeRef};

/// Query surface the registration pipeline depends on.
///
/// Implementations must be pure with respect to one snapshot: the same
/// question always yields the same answer.
pub trait SemanticModel: Send + Sync {
	/// Resolves the symbol declared at `id`.
	fn declared_type(&self, id: &DeclarationId) -> Result<TypeSymbol, SemanticError>;

	/// Whether `ty` implements `interface`, directly or through any base class
	/// or interface inheritance.
	fn implements(&self, ty: &TypeSymbol, interface: &QualifiedName) -> bool;

	/// Whether `ty` can be instantiated as-is: a non-abstract, non-static,
	/// non-generic class or record class.
	fn is_concrete(&self, ty: &TypeSymbol) -> bool;

	/// Summary of every inheritance-relevant header in the snapshot.
	///
	/// Two snapshots with equal stamps give equal answers to `implements` and
	/// `is_concrete` for every declaration present in both.
	fn type_graph_stamp(&self) -> TypeGraphStamp;
}

/// Inheritance-relevant headers of one snapshot with their resolved
/// supertypes, in key order.
///
/// Equality compares the full summary. The digest only short-circuits
/// unequal stamps.
#[derive(Debug, Clone, Default)]
pub struct TypeGraphStamp {
	digest: u64,
	entries: Arc<[(TypeSymbol, Vec<TypeRef>)]>,
}

impl TypeGraphStamp {
	pub fn new(entries: Vec<(TypeSymbol, Vec<TypeRef>)>) -> Self {
		let mut hasher = FxHasher::default();
		entries.hash(&mut hasher);
		Self {
			digest: hasher.finish(),
			entries: entries.into(),
		}
	}

	pub fn entries(&self) -> &[(TypeSymbol, Vec<TypeRef>)] {
		&self.entries
	}
}

impl PartialEq for TypeGraphStamp {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.entries, &other.entries) || (self.digest == other.digest && self.entries == other.entries)
	}
}

impl Eq for TypeGraphStamp {}

/// Stable value surrogate for a resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSymbol {
	pub name: QualifiedName,
	pub kind: TypeKind,
	pub is_abstract: bool,
	pub is_static: bool,
	/// Generic parameters declared on the type itself.
	pub arity: usize,
	/// Name of the defining assembly.
	pub assembly: Arc<str>,
}

impl TypeSymbol {
	/// Fully qualified name and arity identifying the type in a [`TypeTable`].
	pub fn key(&self) -> TypeRef {
		TypeRef::new(self.name.to_string(), self.arity)
	}

	/// Declares type parameters, or is nested in a generic type (whose
	/// name segment then carries a ``Name`N`` arity suffix).
	pub fn is_generic(&self) -> bool {
		self.arity > 0 || self.name.name().contains('`')
	}
}

/// Type header of a referenced assembly. Bases are fully qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeHeader {
	pub name: QualifiedName,
	pub kind: TypeKind,
	pub is_abstract: bool,
	pub is_static: bool,
	pub arity: usize,
	pub bases: Vec<TypeRef>,
}

impl TypeHeader {
	pub fn new(name: QualifiedName, kind: TypeKind) -> Self {
		Self {
			name,
			kind,
			is_abstract: false,
			is_static: false,
			arity: 0,
			bases: Vec::new(),
		}
	}

	pub fn interface(dotted: &str) -> Self {
		Self::new(QualifiedName::parse(dotted), TypeKind::Interface)
	}

	pub fn class(dotted: &str) -> Self {
		Self::new(QualifiedName::parse(dotted), TypeKind::Class)
	}

	pub fn with_base(mut self, dotted: &str) -> Self {
		self.bases.push(TypeRef::new(QualifiedName::parse(dotted).to_string(), 0));
		self
	}

	pub fn with_arity(mut self, arity: usize) -> Self {
		self.arity = arity;
		self
	}

	pub fn with_abstract(mut self, is_abstract: bool) -> Self {
		self.is_abstract = is_abstract;
		self
	}
}

/// Metadata-only view of a referenced assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyMetadata {
	pub name: Arc<str>,
	pub types: Vec<TypeHeader>,
}

impl AssemblyMetadata {
	pub fn new(name: impl Into<Arc<str>>, types: impl IntoIterator<Item = TypeHeader>) -> Self {
		Self {
			name: name.into(),
			types: types.into_iter().collect(),
		}
	}
}
