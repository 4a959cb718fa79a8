//! Capability filter.

use enlist_model::{QualifiedName, SemanticError, SemanticModel, TypeSymbol};
use tracing::trace;

use crate::scan::CandidateNode;

/// Resolves `node` and keeps it when the type implements `marker` and is
/// concrete.
///
/// Returns `Ok(None)` for non-matching candidates. A declaration the model
/// cannot resolve is an error, never a silent drop.
pub fn filter(node: &CandidateNode, model: &dyn SemanticModel, marker: &QualifiedName) -> Result<Option<TypeSymbol>, SemanticError> {
	let symbol = model.declared_type(&node.id)?;
	if !model.implements(&symbol, marker) {
		trace!(candidate = %node, "does not implement marker");
		return Ok(None);
	}
	if !model.is_concrete(&symbol) {
		trace!(candidate = %node, "not concrete");
		return Ok(None);
	}
	Ok(Some(symbol))
}

#[cfg(test)]
mod tests {
	use enlist_model::ProgramSnapshot;
	use rstest::rstest;

	use super::*;
	use crate::scan::candidates;

	fn matches(source: &str) -> Vec<String> {
		matches_with(&[], source)
	}

	/// Matches in `Test.cs`, compiled alongside `others`.
	fn matches_with(others: &[(&str, &str)], source: &str) -> Vec<String> {
		let mut builder =
			ProgramSnapshot::builder("App").source("Marker.g.cs", "namespace Enlist { public interface IRepository {} }");
		for (path, text) in others {
			builder = builder.source(*path, *text);
		}
		let snapshot = builder.source("Test.cs", source).build().unwrap();
		let marker = QualifiedName::new("Enlist", "IRepository");
		let unit = snapshot.unit("Test.cs").unwrap();
		candidates(unit)
			.filter_map(|node| filter(&node, snapshot.semantic(), &marker).unwrap())
			.map(|symbol| symbol.name.to_string())
			.collect()
	}

	#[rstest]
	#[case::direct("using Enlist; namespace App { public class A : IRepository {} }", &["App.A"])]
	#[case::through_base_class(
		"using Enlist; namespace App { public abstract class B : IRepository {} public class A : B {} }",
		&["App.A"]
	)]
	#[case::interface_excluded("using Enlist; namespace App { public interface IUsers : IRepository {} }", &[])]
	#[case::struct_excluded("using Enlist; namespace App { public struct S : IRepository {} }", &[])]
	#[case::static_excluded("using Enlist; namespace App { public static class S : IRepository {} }", &[])]
	#[case::open_generic_excluded("using Enlist; namespace App { public class G<T> : IRepository {} }", &[])]
	#[case::record_included("using Enlist; namespace App { public record R : IRepository; }", &["App.R"])]
	#[case::unrelated("namespace App { public class A : System.IDisposable {} }", &[])]
	#[case::generic_and_plain_namesakes(
		"using Enlist; namespace App { class Repo<T> : IRepository {} class Repo : IRepository {} }",
		&["App.Repo"]
	)]
	#[case::base_resolved_by_arity(
		"using Enlist; namespace App { abstract class Repo<T> : IRepository {} class Repo {} class Plain : Repo {} }",
		&[]
	)]
	#[case::closed_generic_base(
		"using Enlist; namespace App { abstract class Repo<T> : IRepository {} class Users : Repo<int> {} }",
		&["App.Users"]
	)]
	#[case::nested(
		"using Enlist; namespace App { static class Outer { public class InnerRepository : IRepository {} } }",
		&["App.Outer.InnerRepository"]
	)]
	#[case::nested_in_generic_excluded(
		"using Enlist; namespace App { class Outer<T> { public class Inner : IRepository {} } }",
		&[]
	)]
	fn keeps_concrete_implementers(#[case] source: &str, #[case] expected: &[&str]) {
		assert_eq!(matches(source), expected);
	}

	#[test]
	fn global_usings_reach_other_units() {
		let source = "namespace App { public class UserRepository : IRepository {} }";
		assert_eq!(matches_with(&[("Usings.cs", "global using Enlist;")], source), vec!["App.UserRepository"]);
		assert!(matches_with(&[("Usings.cs", "using Enlist;")], source).is_empty());
	}

	#[test]
	fn unresolvable_candidate_is_an_error() {
		let snapshot = ProgramSnapshot::builder("App").source("Test.cs", "class A : I {}").build().unwrap();
		let other = enlist_model::SyntaxTree::parse("Other.cs", "class A : I {}").unwrap();
		let node = candidates(&other).next().unwrap();
		let marker = QualifiedName::new("Enlist", "IRepository");
		assert!(matches!(
			filter(&node, snapshot.semantic(), &marker),
			Err(SemanticError::UnknownUnit(unit)) if &*unit == "Other.cs"
		));
	}
}
