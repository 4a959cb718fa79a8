use std::fmt;

/// Registration of one concrete marker type.
///
/// Equality is field-wise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrationFact {
	pub namespace: String,
	pub class_name: String,
	pub assembly_name: String,
}

impl RegistrationFact {
	pub fn new(namespace: impl Into<String>, class_name: impl Into<String>, assembly_name: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			class_name: class_name.into(),
			assembly_name: assembly_name.into(),
		}
	}

	/// `Namespace.ClassName`, or just the class name in the global namespace.
	pub fn qualified_name(&self) -> String {
		if self.namespace.is_empty() {
			self.class_name.clone()
		} else {
			format!("{}.{}", self.namespace, self.class_name)
		}
	}
}

impl fmt::Display for RegistrationFact {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {}, {})", self.namespace, self.class_name, self.assembly_name)
	}
}

/// Ordered registrations of one snapshot, unique by (namespace, class name).
///
/// Built through [`crate::aggregate::aggregate`] or [`FromIterator`], both of
/// which deduplicate keep-first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RegistrationSet(pub(crate) Vec<RegistrationFact>);

impl RegistrationSet {
	pub fn iter(&self) -> std::slice::Iter<'_, RegistrationFact> {
		self.0.iter()
	}

	pub fn as_slice(&self) -> &[RegistrationFact] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl FromIterator<RegistrationFact> for RegistrationSet {
	fn from_iter<I: IntoIterator<Item = RegistrationFact>>(iter: I) -> Self {
		let facts: Vec<RegistrationFact> = iter.into_iter().collect();
		crate::aggregate::aggregate(&facts)
	}
}

impl<'a> IntoIterator for &'a RegistrationSet {
	type Item = &'a RegistrationFact;
	type IntoIter = std::slice::Iter<'a, RegistrationFact>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
