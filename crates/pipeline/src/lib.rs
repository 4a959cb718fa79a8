//! Incremental repository-registration pipeline.
//!
//! # Purpose
//!
//! Given successive [`ProgramSnapshot`]s, emit one registration source file
//! listing every concrete type that implements the marker interface, while
//! reusing prior work whenever the inputs relevant to a stage are unchanged.
//!
//! # Mental Model
//!
//! 1. **Scan** ([`scan`]): per source unit, yield declarations that have a
//!    base list. Cached by unit text.
//! 2. **Filter** ([`filter`]): per candidate, ask the [`SemanticModel`]
//!    whether the declared type implements the marker and is concrete. Cached
//!    by candidate value and type-graph stamp.
//! 3. **Extract** ([`extract`]): per match, project a [`RegistrationFact`].
//!    Cached by symbol value.
//! 4. **Aggregate** ([`aggregate`]): order by declaration position and
//!    deduplicate into a [`RegistrationSet`]. Cached by the ordered fact
//!    sequence, so edits that leave the facts unchanged stop here.
//! 5. **Emit** ([`emit`]): render the set into one [`EmittedArtifact`].
//!    Cached by the set value and emit options.
//!
//! # Invariants
//!
//! - Incremental output equals full recomputation.
//!   - Enforced in: [`Generator::run`] (every cache hit is keyed by the full
//!     input value of its stage).
//!   - Tested by: `tests/incremental.rs::incremental_matches_full_recomputation`.
//!   - Failure symptom: stale registrations after an edit.
//!
//! - A half-built cache generation is never observable.
//!   - Enforced in: [`IncrementalCache`] (build privately, publish by CAS).
//!   - Tested by: `tests/incremental.rs::failed_run_leaves_cache_untouched`.
//!   - Failure symptom: a later run reuses entries from an aborted run.
//!
//! - Emission order depends only on declaration position.
//!   - Enforced in: [`Generator::run`] (candidates sorted by unit ordinal,
//!     then span start).
//!   - Tested by: `tests/properties.rs`.
//!   - Failure symptom: spurious diffs in the generated file.

pub mod aggregate;
mod cache;
mod error;
pub mod emit;
pub mod extract;
mod facts;
pub mod filter;
mod generator;
pub mod marker;
mod report;
pub mod scan;
mod writer;

pub use cache::{CacheGeneration, IncrementalCache};
pub use emit::{EmitOptions, EmittedArtifact, ServiceLifetime};
pub use enlist_model::{ProgramSnapshot, SemanticModel};
pub use error::PipelineError;
pub use facts::{RegistrationFact, RegistrationSet};
pub use generator::{Generator, GeneratorOptions, GeneratorRun};
pub use marker::MarkerSpec;
pub use report::{RunReason, RunReport, StepOutput, steps};
pub use scan::CandidateNode;
