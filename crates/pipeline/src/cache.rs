//! Per-stage memo tables published as immutable generations.
//!
//! # Invariants
//!
//! - A run reads exactly one generation (loaded once at its start) and builds
//!   the next one privately.
//! - Publication is a single compare-and-swap against the generation the run
//!   read. A run that loses the race discards its generation; its output is
//!   still valid because it was computed from its own snapshot.
//! - A failed run publishes nothing.

use std::sync::Arc;

use arc_swap::ArcSwap;
use enlist_model::{TypeGraphStamp, TypeSymbol};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::emit::{EmitOptions, EmittedArtifact};
use crate::facts::{RegistrationFact, RegistrationSet};
use crate::scan::CandidateNode;

/// Scanner memo for one unit, keyed by path and validated by text.
#[derive(Debug, Clone)]
pub(crate) struct ScanEntry {
	pub(crate) text: Arc<str>,
	pub(crate) candidates: Arc<[CandidateNode]>,
}

#[derive(Debug, Clone)]
pub(crate) struct AggregateEntry {
	pub(crate) input: Arc<[RegistrationFact]>,
	pub(crate) output: Arc<RegistrationSet>,
}

#[derive(Debug, Clone)]
pub(crate) struct EmitEntry {
	pub(crate) options: EmitOptions,
	pub(crate) input: Arc<RegistrationSet>,
	pub(crate) output: Arc<EmittedArtifact>,
}

/// One immutable set of memo tables. Generation 0 is the empty cache.
#[derive(Debug, Default)]
pub struct CacheGeneration {
	pub(crate) number: u64,
	pub(crate) scans: FxHashMap<Arc<str>, ScanEntry>,
	/// Type graph the filter decisions were made against.
	pub(crate) type_graph: Option<TypeGraphStamp>,
	/// Filter outcomes per candidate, valid while `type_graph` holds.
	pub(crate) filters: FxHashMap<CandidateNode, Option<TypeSymbol>>,
	pub(crate) facts: FxHashMap<TypeSymbol, RegistrationFact>,
	pub(crate) aggregate: Option<AggregateEntry>,
	pub(crate) emit: Option<EmitEntry>,
}

impl CacheGeneration {
	pub(crate) fn successor_of(prev: &CacheGeneration) -> Self {
		Self {
			number: prev.number + 1,
			..Self::default()
		}
	}

	pub fn number(&self) -> u64 {
		self.number
	}

	pub fn is_empty(&self) -> bool {
		self.scans.is_empty() && self.aggregate.is_none() && self.emit.is_none()
	}

	/// Number of memoized source units.
	pub fn unit_count(&self) -> usize {
		self.scans.len()
	}

	/// Number of memoized filter decisions.
	pub fn candidate_count(&self) -> usize {
		self.filters.len()
	}

	pub fn registrations(&self) -> Option<&Arc<RegistrationSet>> {
		self.aggregate.as_ref().map(|a| &a.output)
	}

	pub fn artifact(&self) -> Option<&Arc<EmittedArtifact>> {
		self.emit.as_ref().map(|e| &e.output)
	}
}

/// Shared handle to the current cache generation.
#[derive(Debug)]
pub struct IncrementalCache {
	current: ArcSwap<CacheGeneration>,
}

impl Default for IncrementalCache {
	fn default() -> Self {
		Self::new()
	}
}

impl IncrementalCache {
	pub fn new() -> Self {
		Self {
			current: ArcSwap::from_pointee(CacheGeneration::default()),
		}
	}

	/// The current generation. Stays valid after later publications.
	pub fn load(&self) -> Arc<CacheGeneration> {
		self.current.load_full()
	}

	pub fn generation(&self) -> u64 {
		self.current.load().number
	}

	/// Installs `next` if `base` is still current. Returns whether it won.
	pub(crate) fn publish(&self, base: &Arc<CacheGeneration>, next: CacheGeneration) -> bool {
		let number = next.number;
		let prev = self.current.compare_and_swap(base, Arc::new(next));
		if Arc::ptr_eq(&prev, base) {
			debug!(generation = number, "cache generation published");
			return true;
		}
		debug!(discarded = number, current = prev.number, "cache generation superseded by a concurrent run");
		false
	}

	/// Drops every memo. The next run recomputes everything.
	pub fn reset(&self) {
		let number = self.generation() + 1;
		self.current.store(Arc::new(CacheGeneration {
			number,
			..CacheGeneration::default()
		}));
	}
}
