//! Aggregation of per-type facts into one registration set.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::facts::{RegistrationFact, RegistrationSet};

/// Deduplicates `facts`, already in emission order, by (namespace, class
/// name). The first occurrence wins.
pub fn aggregate(facts: &[RegistrationFact]) -> RegistrationSet {
	let mut seen: FxHashSet<(&str, &str)> = FxHashSet::default();
	let mut kept: Vec<RegistrationFact> = Vec::with_capacity(facts.len());
	for fact in facts {
		if seen.insert((fact.namespace.as_str(), fact.class_name.as_str())) {
			kept.push(fact.clone());
			continue;
		}
		if let Some(first) = kept
			.iter()
			.find(|k| k.namespace == fact.namespace && k.class_name == fact.class_name)
			&& first.assembly_name != fact.assembly_name
		{
			debug!(
				name = %fact.qualified_name(),
				kept = %first.assembly_name,
				dropped = %fact.assembly_name,
				"duplicate registration from another assembly dropped"
			);
		}
	}
	RegistrationSet(kept)
}
