//! Snapshot loading from source directories.

use std::path::{Path, PathBuf};

use anyhow::Context;
use enlist_model::ProgramSnapshot;
use enlist_pipeline::MarkerSpec;
use enlist_pipeline::marker::marker_source;
use tracing::debug;
use walkdir::WalkDir;

pub const SOURCE_EXTENSION: &str = "cs";

/// Source files under `root`, sorted by path. Generated `*.g.cs` files are
/// skipped so a previous output in the tree is never read back.
pub fn collect_sources(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
	let mut paths = Vec::new();
	for entry in WalkDir::new(root) {
		let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
		let path = entry.path();
		if !entry.file_type().is_file() || !path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
			continue;
		}
		if path.file_name().is_some_and(|name| name.to_string_lossy().ends_with(".g.cs")) {
			continue;
		}
		paths.push(entry.into_path());
	}
	paths.sort();
	Ok(paths)
}

/// Unit name of `path`: relative to `root`, with `/` separators.
pub fn unit_name(root: &Path, path: &Path) -> String {
	let relative = path.strip_prefix(root).unwrap_or(path);
	relative
		.components()
		.map(|c| c.as_os_str().to_string_lossy())
		.collect::<Vec<_>>()
		.join("/")
}

/// Builds a snapshot of every source under `root` plus the marker source.
pub fn load_snapshot(root: &Path, assembly: &str, marker: &MarkerSpec) -> anyhow::Result<ProgramSnapshot> {
	let marker = marker_source(marker);
	let mut builder = ProgramSnapshot::builder(assembly).source(marker.file_name, marker.source_text);
	let sources = collect_sources(root)?;
	for path in &sources {
		let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
		builder = builder.source(unit_name(root, path), text);
	}
	let snapshot = builder
		.build()
		.with_context(|| format!("failed to load sources under {}", root.display()))?;
	debug!(root = %root.display(), units = sources.len(), "loaded snapshot");
	Ok(snapshot)
}
