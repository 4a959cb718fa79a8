//! Marker interface definition.
//!
//! The marker is contributed to the compilation before any snapshot is
//! analyzed, so user code can implement it without declaring it. Drivers add
//! [`marker_source`] as a regular source unit.

use enlist_model::QualifiedName;
use serde::Deserialize;

use crate::emit::EmittedArtifact;
use crate::writer::SourceWriter;

pub const MARKER_NAMESPACE: &str = "Enlist";
pub const MARKER_INTERFACE_NAME: &str = "IRepository";

/// Namespace and name of the marker interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerSpec {
	pub namespace: String,
	pub name: String,
}

impl Default for MarkerSpec {
	fn default() -> Self {
		Self {
			namespace: MARKER_NAMESPACE.to_string(),
			name: MARKER_INTERFACE_NAME.to_string(),
		}
	}
}

impl MarkerSpec {
	pub fn qualified_name(&self) -> QualifiedName {
		QualifiedName::new(self.namespace.clone(), self.name.clone())
	}

	/// File name of the post-initialization marker source.
	pub fn file_name(&self) -> String {
		format!("{}.g.cs", self.name)
	}
}

/// Renders the marker interface declaration.
pub fn marker_source(spec: &MarkerSpec) -> EmittedArtifact {
	let mut w = SourceWriter::new();
	w.line("// <auto-generated/>");
	let wrapped = !spec.namespace.is_empty();
	if wrapped {
		w.line(&format!("namespace {}", spec.namespace)).open();
	}
	w.line("/// <summary>")
		.line("/// Marks a class for automatic registration with the service container.")
		.line("/// </summary>")
		.line(&format!("public interface {}", spec.name))
		.open()
		.close();
	if wrapped {
		w.close();
	}
	EmittedArtifact {
		file_name: spec.file_name(),
		source_text: w.finish(),
	}
}

#[cfg(test)]
mod tests {
	use enlist_model::{ProgramSnapshot, SemanticModel};
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn default_marker_source() {
		let artifact = marker_source(&MarkerSpec::default());
		assert_eq!(artifact.file_name, "IRepository.g.cs");
		assert_eq!(
			artifact.source_text,
			r#"// <auto-generated/>
namespace Enlist
{
    /// <summary>
    /// Marks a class for automatic registration with the service container.
    /// </summary>
    public interface IRepository
    {
    }
}
"#
		);
	}

	#[test]
	fn global_marker_has_no_namespace_block() {
		let spec = MarkerSpec {
			namespace: String::new(),
			name: "IService".into(),
		};
		let artifact = marker_source(&spec);
		assert!(artifact.source_text.contains("\npublic interface IService\n{\n}\n"));
		assert!(!artifact.source_text.contains("namespace"));
		assert_eq!(spec.qualified_name(), QualifiedName::new("", "IService"));
	}

	#[test]
	fn marker_source_declares_the_marker() {
		let spec = MarkerSpec::default();
		let artifact = marker_source(&spec);
		let snapshot = ProgramSnapshot::builder("App")
			.source(artifact.file_name.as_str(), artifact.source_text.as_str())
			.source("A.cs", "namespace App { class A : Enlist.IRepository {} }")
			.build()
			.unwrap();
		let types = snapshot.semantic();
		let unit = snapshot.unit("A.cs").unwrap();
		let symbol = types.declared_type(&unit.declaration_id(&unit.declarations()[0])).unwrap();
		assert!(types.implements(&symbol, &spec.qualified_name()));
	}
}
