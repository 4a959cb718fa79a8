//! Resolved type table built once per snapshot.
//!
//! # Build
//!
//! 1. Referenced assembly headers are registered first; the first reference
//!    defining a name wins.
//! 2. Source declarations are registered next and shadow references. Types
//!    are keyed by fully qualified name and generic arity, so `Repo` and
//!    `Repo<T>` are distinct. Partial declarations of one key merge:
//!    abstract/static if any part says so.
//! 3. Base-list names are resolved per declaration (enclosing types and
//!    namespaces innermost first, then the declaration's using directives,
//!    then every unit's global usings) and appended to the merged entry's
//!    supertypes. Unresolved names are dropped.
//! 4. The type-graph stamp records every entry that declares supertypes or is
//!    used as one, including resolution results, in key order.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use super::{AssemblyMetadata, SemanticModel, TypeGraphStamp, TypeSymbol};
use crate::error::SemanticError;
use crate::names::QualifiedName;
use crate::syntax::{DeclarationId, SyntaxTree, TypeDeclaration, TypeKind, TypeRef};

#[derive(Debug, Clone)]
struct Entry {
	symbol: TypeSymbol,
	supertypes: Vec<TypeRef>,
	from_source: bool,
}

#[derive(Debug, Clone)]
pub struct TypeTable {
	types: FxHashMap<TypeRef, Entry>,
	declarations: FxHashMap<DeclarationId, TypeRef>,
	units: FxHashSet<Arc<str>>,
	stamp: TypeGraphStamp,
}

impl TypeTable {
	pub fn build(assembly: &Arc<str>, units: &[Arc<SyntaxTree>], references: &[Arc<AssemblyMetadata>]) -> Self {
		let mut table = Self {
			types: FxHashMap::default(),
			declarations: FxHashMap::default(),
			units: FxHashSet::default(),
			stamp: TypeGraphStamp::default(),
		};

		for reference in references {
			for header in &reference.types {
				let symbol = TypeSymbol {
					name: header.name.clone(),
					kind: header.kind,
					is_abstract: header.is_abstract,
					is_static: header.is_static,
					arity: header.arity,
					assembly: reference.name.clone(),
				};
				table.types.entry(symbol.key()).or_insert_with(|| Entry {
					symbol,
					supertypes: header.bases.clone(),
					from_source: false,
				});
			}
		}

		let mut global_usings: Vec<&str> = Vec::new();
		for unit in units {
			table.units.insert(unit.path().clone());
			for decl in unit.declarations() {
				let key = decl.full_name();
				table.declarations.insert(unit.declaration_id(decl), key.clone());
				table.register_source(key, decl, assembly);
			}
			for using in unit.global_usings() {
				if !global_usings.contains(&using.as_str()) {
					global_usings.push(using);
				}
			}
		}

		let mut resolved = Vec::new();
		for unit in units {
			for decl in unit.declarations() {
				let key = decl.full_name();
				for base in &decl.bases {
					match table.resolve(base, decl, &global_usings) {
						Some(target) => resolved.push((key.clone(), target)),
						None => trace!(unit = %unit.path(), ty = %key, base = %base, "unresolved base type"),
					}
				}
			}
		}
		for (key, target) in resolved {
			if let Some(entry) = table.types.get_mut(&key)
				&& !entry.supertypes.contains(&target)
			{
				entry.supertypes.push(target);
			}
		}

		table.stamp = table.compute_stamp();
		table
	}

	fn register_source(&mut self, key: TypeRef, decl: &TypeDeclaration, assembly: &Arc<str>) {
		let is_abstract = decl.modifiers.contains(crate::Modifiers::ABSTRACT);
		let is_static = decl.modifiers.contains(crate::Modifiers::STATIC);
		match self.types.get_mut(&key) {
			Some(entry) if entry.from_source => {
				entry.symbol.is_abstract |= is_abstract;
				entry.symbol.is_static |= is_static;
			}
			_ => {
				self.types.insert(
					key,
					Entry {
						symbol: TypeSymbol {
							name: QualifiedName::new(decl.namespace.clone(), decl.nested_name()),
							kind: decl.kind,
							is_abstract,
							is_static,
							arity: decl.arity,
							assembly: assembly.clone(),
						},
						supertypes: Vec::new(),
						from_source: true,
					},
				);
			}
		}
	}

	/// Resolves a base-list name from the scope of `decl`.
	fn resolve(&self, base: &TypeRef, decl: &TypeDeclaration, global_usings: &[&str]) -> Option<TypeRef> {
		let scope = decl.scope();
		let scopes = namespace_chain(&scope);
		let known = |candidate: &TypeRef| self.types.contains_key(candidate);
		if base.is_qualified() {
			return scopes
				.iter()
				.map(|ns| TypeRef::new(join(ns, base.as_str()), base.arity))
				.find(known);
		}
		scopes
			.iter()
			.copied()
			.chain(decl.usings.iter().rev().map(String::as_str))
			.chain(global_usings.iter().copied())
			.map(|ns| TypeRef::new(join(ns, base.as_str()), base.arity))
			.find(known)
	}

	fn compute_stamp(&self) -> TypeGraphStamp {
		let used: FxHashSet<&TypeRef> = self.types.values().flat_map(|e| e.supertypes.iter()).collect();
		let mut relevant: Vec<(&TypeRef, &Entry)> = self
			.types
			.iter()
			.filter(|(key, entry)| !entry.supertypes.is_empty() || used.contains(key))
			.collect();
		relevant.sort_by(|a, b| a.0.cmp(b.0));
		TypeGraphStamp::new(
			relevant
				.into_iter()
				.map(|(_, entry)| (entry.symbol.clone(), entry.supertypes.clone()))
				.collect(),
		)
	}

	/// Symbol registered under a fully qualified name and arity.
	pub fn symbol(&self, key: &TypeRef) -> Option<&TypeSymbol> {
		self.types.get(key).map(|e| &e.symbol)
	}

	/// Resolved direct supertypes of `key`, in declaration order.
	pub fn supertypes(&self, key: &TypeRef) -> &[TypeRef] {
		self.types.get(key).map(|e| e.supertypes.as_slice()).unwrap_or_default()
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}

impl SemanticModel for TypeTable {
	fn declared_type(&self, id: &DeclarationId) -> Result<TypeSymbol, SemanticError> {
		if !self.units.contains(&id.unit) {
			return Err(SemanticError::UnknownUnit(id.unit.clone()));
		}
		self.declarations
			.get(id)
			.and_then(|name| self.symbol(name))
			.cloned()
			.ok_or_else(|| SemanticError::UnknownDeclaration {
				unit: id.unit.clone(),
				span: id.span,
			})
	}

	fn implements(&self, ty: &TypeSymbol, interface: &QualifiedName) -> bool {
		let target = TypeRef::new(interface.to_string(), 0);
		let start = ty.key();
		let mut seen: FxHashSet<&TypeRef> = FxHashSet::default();
		let mut queue: Vec<&TypeRef> = self.supertypes(&start).iter().collect();
		while let Some(key) = queue.pop() {
			if !seen.insert(key) {
				continue;
			}
			if *key == target && self.symbol(key).is_some_and(|s| s.kind == TypeKind::Interface) {
				return true;
			}
			queue.extend(self.supertypes(key));
		}
		false
	}

	fn is_concrete(&self, ty: &TypeSymbol) -> bool {
		ty.kind.is_class_like() && !ty.is_abstract && !ty.is_static && !ty.is_generic()
	}

	fn type_graph_stamp(&self) -> TypeGraphStamp {
		self.stamp.clone()
	}
}

/// `"A.B"` yields `["A.B", "A", ""]`.
fn namespace_chain(namespace: &str) -> Vec<&str> {
	let mut chain = Vec::new();
	let mut current = namespace;
	while !current.is_empty() {
		chain.push(current);
		current = current.rsplit_once('.').map_or("", |(outer, _)| outer);
	}
	chain.push("");
	chain
}

fn join(namespace: &str, name: &str) -> String {
	if namespace.is_empty() {
		name.to_string()
	} else {
		format!("{namespace}.{name}")
	}
}
