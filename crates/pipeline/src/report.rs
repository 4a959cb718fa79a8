//! Per-run step reasons.

use std::fmt;

use indexmap::IndexMap;

/// Stable names of the tracked pipeline steps, in execution order.
pub mod steps {
	pub const SCAN: &str = "ScanCandidates";
	pub const FILTER: &str = "FilterCapability";
	pub const EXTRACT: &str = "ExtractFacts";
	pub const AGGREGATE: &str = "AggregateRegistrations";
	pub const EMIT: &str = "EmitSource";

	pub const ALL: [&str; 5] = [SCAN, FILTER, EXTRACT, AGGREGATE, EMIT];
}

/// Why a step output has the value it has in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunReason {
	/// No entry existed for this key in the previous generation.
	New,
	/// Recomputed and the value differs from the previous one.
	Modified,
	/// Recomputed and the value equals the previous one.
	Unchanged,
	/// Reused without recomputation.
	Cached,
	/// Present in the previous generation, absent now.
	Removed,
}

impl RunReason {
	/// Reason for a recomputed output given the previous value, if any.
	pub(crate) fn recomputed<T: PartialEq>(previous: Option<&T>, current: &T) -> Self {
		match previous {
			None => Self::New,
			Some(prev) if prev == current => Self::Unchanged,
			Some(_) => Self::Modified,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::New => "New",
			Self::Modified => "Modified",
			Self::Unchanged => "Unchanged",
			Self::Cached => "Cached",
			Self::Removed => "Removed",
		}
	}
}

impl fmt::Display for RunReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutput {
	pub key: String,
	pub reason: RunReason,
}

/// Outputs of one run grouped by step, in step order then record order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
	generation: u64,
	steps: IndexMap<&'static str, Vec<StepOutput>>,
}

impl RunReport {
	pub(crate) fn new(generation: u64) -> Self {
		Self {
			generation,
			steps: steps::ALL.iter().map(|step| (*step, Vec::new())).collect(),
		}
	}

	pub(crate) fn record(&mut self, step: &'static str, key: impl Into<String>, reason: RunReason) {
		self.steps.entry(step).or_default().push(StepOutput {
			key: key.into(),
			reason,
		});
	}

	/// Cache generation this run built.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn steps(&self) -> impl Iterator<Item = (&'static str, &[StepOutput])> {
		self.steps.iter().map(|(step, outputs)| (*step, outputs.as_slice()))
	}

	pub fn outputs(&self, step: &str) -> &[StepOutput] {
		self.steps.get(step).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn reasons(&self, step: &str) -> Vec<RunReason> {
		self.outputs(step).iter().map(|o| o.reason).collect()
	}

	/// Reason recorded for `key` under `step`.
	pub fn reason(&self, step: &str, key: &str) -> Option<RunReason> {
		self.outputs(step).iter().find(|o| o.key == key).map(|o| o.reason)
	}

	/// Reason of the emitted artifact.
	pub fn output_reason(&self) -> Option<RunReason> {
		self.outputs(steps::EMIT)
			.iter()
			.find(|o| o.reason != RunReason::Removed)
			.map(|o| o.reason)
	}
}

impl fmt::Display for RunReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "generation {}", self.generation)?;
		for (step, outputs) in &self.steps {
			writeln!(f, "{step}")?;
			for output in outputs {
				writeln!(f, "  {:<9} {}", output.reason, output.key)?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_steps_are_listed_in_order() {
		let report = RunReport::new(1);
		let names: Vec<&str> = report.steps().map(|(s, _)| s).collect();
		assert_eq!(names, steps::ALL);
		assert_eq!(report.output_reason(), None);
	}

	#[test]
	fn records_and_queries() {
		let mut report = RunReport::new(3);
		report.record(steps::SCAN, "A.cs", RunReason::Cached);
		report.record(steps::SCAN, "B.cs", RunReason::Modified);
		report.record(steps::EMIT, "Out.g.cs", RunReason::Unchanged);
		assert_eq!(report.reasons(steps::SCAN), vec![RunReason::Cached, RunReason::Modified]);
		assert_eq!(report.reason(steps::SCAN, "B.cs"), Some(RunReason::Modified));
		assert_eq!(report.output_reason(), Some(RunReason::Unchanged));
		assert!(report.outputs("Unknown").is_empty());
	}

	#[test]
	fn recomputed_reason() {
		assert_eq!(RunReason::recomputed(None, &1), RunReason::New);
		assert_eq!(RunReason::recomputed(Some(&1), &1), RunReason::Unchanged);
		assert_eq!(RunReason::recomputed(Some(&1), &2), RunReason::Modified);
	}

	#[test]
	fn display_lists_every_step() {
		let mut report = RunReport::new(2);
		report.record(steps::SCAN, "A.cs", RunReason::New);
		let text = report.to_string();
		assert!(text.starts_with("generation 2\nScanCandidates\n  New       A.cs\n"));
		assert!(text.ends_with("EmitSource\n"));
	}
}
