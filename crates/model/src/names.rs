use std::fmt;

/// A fully qualified type name split into containing namespace and simple name.
///
/// The global namespace is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
	namespace: String,
	name: String,
}

impl QualifiedName {
	pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			name: name.into(),
		}
	}

	/// Splits a dotted name at its last segment.
	///
	/// `"A.B.C"` becomes namespace `"A.B"` and name `"C"`; a name without dots
	/// lives in the global namespace.
	pub fn parse(dotted: &str) -> Self {
		let dotted = dotted.strip_prefix("global::").unwrap_or(dotted);
		match dotted.rsplit_once('.') {
			Some((ns, name)) => Self::new(ns, name),
			None => Self::new("", dotted),
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn is_global(&self) -> bool {
		self.namespace.is_empty()
	}
}

impl fmt::Display for QualifiedName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.namespace.is_empty() {
			f.write_str(&self.name)
		} else {
			write!(f, "{}.{}", self.namespace, self.name)
		}
	}
}
