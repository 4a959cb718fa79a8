use std::sync::Arc;

use enlist_model::{ProgramSnapshot, SemanticModel, TypeSymbol};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::cache::{AggregateEntry, CacheGeneration, EmitEntry, IncrementalCache, ScanEntry};
use crate::emit::{self, EmitOptions, EmittedArtifact};
use crate::error::PipelineError;
use crate::facts::{RegistrationFact, RegistrationSet};
use crate::marker::{self, MarkerSpec};
use crate::report::{RunReason, RunReport, steps};
use crate::scan::{self, CandidateNode};
use crate::{aggregate, extract, filter};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
	pub marker: MarkerSpec,
	pub emit: EmitOptions,
}

/// Result of one successful run.
#[derive(Debug, Clone)]
pub struct GeneratorRun {
	pub artifact: Arc<EmittedArtifact>,
	pub registrations: Arc<RegistrationSet>,
	pub report: RunReport,
}

/// Incremental registration generator.
///
/// Runs may be issued from several threads; each reads one cache generation
/// and publishes its successor atomically.
#[derive(Debug, Default)]
pub struct Generator {
	options: GeneratorOptions,
	cache: IncrementalCache,
}

impl Generator {
	pub fn new(options: GeneratorOptions) -> Self {
		Self {
			options,
			cache: IncrementalCache::new(),
		}
	}

	pub fn options(&self) -> &GeneratorOptions {
		&self.options
	}

	pub fn cache(&self) -> &IncrementalCache {
		&self.cache
	}

	/// Source the host adds to every compilation before analysis.
	pub fn post_initialization_source(&self) -> EmittedArtifact {
		marker::marker_source(&self.options.marker)
	}

	/// Runs the pipeline against the snapshot's own semantic model.
	pub fn run(&self, snapshot: &ProgramSnapshot) -> Result<GeneratorRun, PipelineError> {
		self.run_with_model(snapshot, snapshot.semantic())
	}

	/// Runs the pipeline with an explicit semantic model for `snapshot`.
	pub fn run_with_model(&self, snapshot: &ProgramSnapshot, model: &dyn SemanticModel) -> Result<GeneratorRun, PipelineError> {
		let base = self.cache.load();
		let (next, run) = self.execute(snapshot, model, &base)?;
		self.cache.publish(&base, next);
		Ok(run)
	}

	/// Full recomputation that neither reads nor writes the cache.
	pub fn run_uncached(&self, snapshot: &ProgramSnapshot) -> Result<GeneratorRun, PipelineError> {
		let empty = CacheGeneration::default();
		let (_, run) = self.execute(snapshot, snapshot.semantic(), &empty)?;
		Ok(run)
	}

	fn execute(
		&self,
		snapshot: &ProgramSnapshot,
		model: &dyn SemanticModel,
		prev: &CacheGeneration,
	) -> Result<(CacheGeneration, GeneratorRun), PipelineError> {
		let mut next = CacheGeneration::successor_of(prev);
		let mut report = RunReport::new(next.number);

		let candidates = scan_units(snapshot, prev, &mut next, &mut report);
		let matched = filter_candidates(&candidates, model, &self.options.marker, prev, &mut next, &mut report)?;
		let facts = extract_facts(matched, prev, &mut next, &mut report);

		let (registrations, aggregate_reason) = match &prev.aggregate {
			Some(old) if *old.input == *facts => (old.output.clone(), RunReason::Cached),
			old => {
				let output = Arc::new(aggregate::aggregate(&facts));
				let reason = RunReason::recomputed(old.as_ref().map(|o| &o.output), &output);
				(output, reason)
			}
		};
		report.record(steps::AGGREGATE, "registrations", aggregate_reason);
		next.aggregate = Some(AggregateEntry {
			input: facts,
			output: registrations.clone(),
		});

		let options = &self.options.emit;
		let (artifact, emit_reason) = match &prev.emit {
			Some(old) if old.options == *options && *old.input == *registrations => (old.output.clone(), RunReason::Cached),
			old => {
				let output = Arc::new(emit::render(&registrations, options));
				let previous = old.as_ref().filter(|o| o.options.file_name == options.file_name).map(|o| &o.output);
				(output.clone(), RunReason::recomputed(previous, &output))
			}
		};
		if let Some(old) = &prev.emit
			&& old.options.file_name != options.file_name
		{
			report.record(steps::EMIT, old.options.file_name.clone(), RunReason::Removed);
		}
		report.record(steps::EMIT, artifact.file_name.clone(), emit_reason);
		next.emit = Some(EmitEntry {
			options: options.clone(),
			input: registrations.clone(),
			output: artifact.clone(),
		});

		debug!(
			generation = next.number,
			units = next.scans.len(),
			candidates = next.filters.len(),
			registrations = registrations.len(),
			aggregate = %aggregate_reason,
			output = %emit_reason,
			"registration run complete"
		);

		Ok((
			next,
			GeneratorRun {
				artifact,
				registrations,
				report,
			},
		))
	}
}

/// Candidates of every unit in emission order: unit ordinal, then span start.
fn scan_units(
	snapshot: &ProgramSnapshot,
	prev: &CacheGeneration,
	next: &mut CacheGeneration,
	report: &mut RunReport,
) -> Vec<CandidateNode> {
	let mut ordered: Vec<(usize, CandidateNode)> = Vec::new();
	for (ordinal, unit) in snapshot.units().iter().enumerate() {
		let (entry, reason) = match prev.scans.get(unit.path()) {
			Some(old) if old.text == *unit.text() => (old.clone(), RunReason::Cached),
			old => {
				let candidates: Arc<[CandidateNode]> = scan::candidates(unit).collect();
				let reason = RunReason::recomputed(old.map(|o| &o.candidates), &candidates);
				(
					ScanEntry {
						text: unit.text().clone(),
						candidates,
					},
					reason,
				)
			}
		};
		report.record(steps::SCAN, &**unit.path(), reason);
		ordered.extend(entry.candidates.iter().map(|node| (ordinal, node.clone())));
		next.scans.insert(unit.path().clone(), entry);
	}
	for path in prev.scans.keys().filter(|path| !next.scans.contains_key(*path)) {
		report.record(steps::SCAN, &**path, RunReason::Removed);
	}
	ordered.sort_by_key(|(ordinal, node)| (*ordinal, node.start()));
	ordered.into_iter().map(|(_, node)| node).collect()
}

fn filter_candidates(
	candidates: &[CandidateNode],
	model: &dyn SemanticModel,
	marker: &MarkerSpec,
	prev: &CacheGeneration,
	next: &mut CacheGeneration,
	report: &mut RunReport,
) -> Result<Vec<TypeSymbol>, PipelineError> {
	let stamp = model.type_graph_stamp();
	let graph_holds = prev.type_graph.as_ref() == Some(&stamp);
	if !graph_holds && !prev.filters.is_empty() {
		debug!(entries = stamp.entries().len(), "type graph changed; filter decisions recomputed");
	}
	let marker = marker.qualified_name();
	let mut matched = Vec::new();
	for node in candidates {
		let (outcome, reason) = match prev.filters.get(node) {
			Some(old) if graph_holds => (old.clone(), RunReason::Cached),
			old => {
				let outcome = filter::filter(node, model, &marker)?;
				let reason = RunReason::recomputed(old, &outcome);
				(outcome, reason)
			}
		};
		trace!(candidate = %node, matched = outcome.is_some(), %reason, "filtered");
		report.record(steps::FILTER, node.to_string(), reason);
		if let Some(symbol) = &outcome {
			matched.push(symbol.clone());
		}
		next.filters.insert(node.clone(), outcome);
	}
	next.type_graph = Some(stamp);
	for node in prev.filters.keys().filter(|node| !next.filters.contains_key(*node)) {
		report.record(steps::FILTER, node.to_string(), RunReason::Removed);
	}
	Ok(matched)
}

fn extract_facts(
	matched: Vec<TypeSymbol>,
	prev: &CacheGeneration,
	next: &mut CacheGeneration,
	report: &mut RunReport,
) -> Arc<[RegistrationFact]> {
	let mut facts = Vec::with_capacity(matched.len());
	for symbol in matched {
		let fact = if let Some(fact) = next.facts.get(&symbol) {
			// Partial declarations of one type yield the same symbol twice.
			fact.clone()
		} else {
			let (fact, reason) = match prev.facts.get(&symbol) {
				Some(fact) => (fact.clone(), RunReason::Cached),
				None => (extract::extract(&symbol), RunReason::New),
			};
			report.record(steps::EXTRACT, symbol.name.to_string(), reason);
			next.facts.insert(symbol, fact.clone());
			fact
		};
		facts.push(fact);
	}
	for symbol in prev.facts.keys().filter(|symbol| !next.facts.contains_key(*symbol)) {
		report.record(steps::EXTRACT, symbol.name.to_string(), RunReason::Removed);
	}
	facts.into()
}
