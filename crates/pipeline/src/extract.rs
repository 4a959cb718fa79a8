//! Fact extraction.

use enlist_model::TypeSymbol;

use crate::facts::RegistrationFact;

/// Projects a matched symbol onto the registration fields.
pub fn extract(symbol: &TypeSymbol) -> RegistrationFact {
	RegistrationFact::new(symbol.name.namespace(), symbol.name.name(), &*symbol.assembly)
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use enlist_model::{QualifiedName, TypeKind};
	use pretty_assertions::assert_eq;

	use super::*;

	fn symbol(namespace: &str, name: &str) -> TypeSymbol {
		TypeSymbol {
			name: QualifiedName::new(namespace, name),
			kind: TypeKind::Class,
			is_abstract: false,
			is_static: false,
			arity: 0,
			assembly: Arc::from("MyApplication"),
		}
	}

	#[test]
	fn projects_namespace_name_and_assembly() {
		assert_eq!(
			extract(&symbol("MyApplication.Data", "UserRepository")),
			RegistrationFact::new("MyApplication.Data", "UserRepository", "MyApplication")
		);
	}

	#[test]
	fn nested_types_keep_their_containers_in_the_class_name() {
		let fact = extract(&symbol("App", "Outer.InnerRepository"));
		assert_eq!(fact.namespace, "App");
		assert_eq!(fact.class_name, "Outer.InnerRepository");
	}

	#[test]
	fn global_namespace_is_empty() {
		let fact = extract(&symbol("", "Loose"));
		assert_eq!(fact.namespace, "");
		assert_eq!(fact.qualified_name(), "Loose");
	}
}
