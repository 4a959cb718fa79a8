//! Registration source emitter.
//!
//! Output is a pure function of the [`RegistrationSet`] and [`EmitOptions`].
//! An empty set still yields the extension class with a method that only
//! returns the collection, so callers can always link against it.

use std::fmt;

use serde::Deserialize;

use crate::facts::{RegistrationFact, RegistrationSet};
use crate::writer::{SourceWriter, identifier};

pub const DEFAULT_FILE_NAME: &str = "RepositoryRegistration.g.cs";
pub const DEFAULT_NAMESPACE: &str = "Enlist.Generated";
pub const DEFAULT_CLASS_NAME: &str = "RepositoryRegistrationExtensions";
pub const DEFAULT_METHOD_NAME: &str = "AddRepositories";

/// Service lifetime the generated registrations use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceLifetime {
	Transient,
	#[default]
	Scoped,
	Singleton,
}

impl ServiceLifetime {
	/// Container method used for one registration.
	pub fn method(self) -> &'static str {
		match self {
			Self::Transient => "AddTransient",
			Self::Scoped => "AddScoped",
			Self::Singleton => "AddSingleton",
		}
	}
}

impl fmt::Display for ServiceLifetime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Transient => "transient",
			Self::Scoped => "scoped",
			Self::Singleton => "singleton",
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitOptions {
	pub file_name: String,
	/// Namespace of the generated class. Empty places it in the global namespace.
	pub namespace: String,
	pub class_name: String,
	pub method_name: String,
	pub lifetime: ServiceLifetime,
}

impl Default for EmitOptions {
	fn default() -> Self {
		Self {
			file_name: DEFAULT_FILE_NAME.to_string(),
			namespace: DEFAULT_NAMESPACE.to_string(),
			class_name: DEFAULT_CLASS_NAME.to_string(),
			method_name: DEFAULT_METHOD_NAME.to_string(),
			lifetime: ServiceLifetime::default(),
		}
	}
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmittedArtifact {
	pub file_name: String,
	pub source_text: String,
}

/// Renders `set` into the registration source file.
pub fn render(set: &RegistrationSet, options: &EmitOptions) -> EmittedArtifact {
	let mut w = SourceWriter::new();
	w.line("// <auto-generated/>")
		.line("#nullable enable")
		.line("")
		.line("using Microsoft.Extensions.DependencyInjection;")
		.line("");
	let wrapped = !options.namespace.is_empty();
	if wrapped {
		w.line(&format!("namespace {}", options.namespace)).open();
	}
	w.line(&format!("public static class {}", options.class_name))
		.open()
		.line(&format!(
			"public static IServiceCollection {}(this IServiceCollection services)",
			options.method_name
		))
		.open();
	for fact in set {
		w.line(&format!(
			"services.{}<{}>(); // {}",
			options.lifetime.method(),
			type_expression(fact),
			fact.assembly_name
		));
	}
	if !set.is_empty() {
		w.line("");
	}
	w.line("return services;").close().close();
	if wrapped {
		w.close();
	}
	EmittedArtifact {
		file_name: options.file_name.clone(),
		source_text: w.finish(),
	}
}

/// `global::`-qualified type name with keyword segments escaped.
fn type_expression(fact: &RegistrationFact) -> String {
	let segments = fact
		.namespace
		.split('.')
		.filter(|segment| !segment.is_empty())
		.chain(fact.class_name.split('.'));
	let mut out = String::from("global::");
	for (i, segment) in segments.enumerate() {
		if i > 0 {
			out.push('.');
		}
		out.push_str(&identifier(segment));
	}
	out
}
