//! Candidate scanner.
//!
//! Purely syntactic: a declaration is a candidate when it lists at least one
//! base type. Enums never are, since their base list names the underlying
//! integral type.

use std::fmt;

use enlist_model::{DeclarationId, SyntaxTree, TypeDeclaration, TypeKind};

/// One syntactically eligible declaration, identified by unit and span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateNode {
	pub id: DeclarationId,
	pub declaration: TypeDeclaration,
}

impl CandidateNode {
	pub fn start(&self) -> usize {
		self.id.span.start
	}
}

impl fmt::Display for CandidateNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}@{}:{}", self.id.unit, self.id.span.start, self.declaration.name)
	}
}

/// Lazily yields the candidates of `tree` in source order.
///
/// Calling again restarts the sequence.
pub fn candidates(tree: &SyntaxTree) -> impl Iterator<Item = CandidateNode> + '_ {
	tree.declarations()
		.iter()
		.filter(|decl| is_candidate(decl))
		.map(move |decl| CandidateNode {
			id: tree.declaration_id(decl),
			declaration: decl.clone(),
		})
}

fn is_candidate(decl: &TypeDeclaration) -> bool {
	decl.kind != TypeKind::Enum && decl.has_base_list()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_declarations_with_base_lists_are_candidates() {
		let tree = SyntaxTree::parse(
			"Test.cs",
			"namespace N { class A : I {} class B {} interface IC : I {} enum E : int { X } struct S : I {} }",
		)
		.unwrap();
		let names: Vec<String> = candidates(&tree).map(|c| c.declaration.name).collect();
		assert_eq!(names, vec!["A", "IC", "S"]);
	}

	#[test]
	fn sequence_is_restartable_and_positional() {
		let tree = SyntaxTree::parse("Test.cs", "class A : I {}\nclass B : I {}").unwrap();
		let first: Vec<_> = candidates(&tree).collect();
		let second: Vec<_> = candidates(&tree).collect();
		assert_eq!(first, second);
		assert_eq!(first[0].start(), 0);
		assert_eq!(first[1].start(), 15);
		assert_eq!(first[1].to_string(), "Test.cs@15:B");
	}

	#[test]
	fn nested_declarations_are_candidates() {
		let src = "namespace N { static class Outer { class Inner : I {} void M() { } } }";
		let tree = SyntaxTree::parse("Test.cs", src).unwrap();
		let found: Vec<CandidateNode> = candidates(&tree).collect();
		assert_eq!(found.len(), 1);
		assert_eq!(found[0].declaration.nested_name(), "Outer.Inner");
		assert_eq!(found[0].start(), src.find("class Inner").unwrap());
		assert_eq!(found[0].to_string(), format!("Test.cs@{}:Inner", found[0].start()));
	}

	#[test]
	fn empty_program_yields_nothing() {
		let tree = SyntaxTree::parse("Empty.cs", "").unwrap();
		assert_eq!(candidates(&tree).count(), 0);
	}
}
