//! `enlist.toml` loading.

use std::path::{Path, PathBuf};

use enlist_pipeline::{EmitOptions, GeneratorOptions, MarkerSpec};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "enlist.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid config {}: {source}", path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

/// Driver configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
	pub assembly: Option<String>,
	pub marker: MarkerSpec,
	pub emit: EmitOptions,
}

impl FileConfig {
	pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
		toml::from_str(text).map_err(|source| ConfigError::Parse {
			path: path.to_path_buf(),
			source,
		})
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		let config = Self::parse(&text, path)?;
		debug!(path = %path.display(), "loaded config");
		Ok(config)
	}

	/// Loads `explicit`, or `enlist.toml` in `cwd` when it exists, or defaults.
	pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
		if let Some(path) = explicit {
			return Self::load(path);
		}
		let implicit = cwd.join(CONFIG_FILE_NAME);
		if implicit.is_file() {
			return Self::load(&implicit);
		}
		Ok(Self::default())
	}

	pub fn generator_options(&self) -> GeneratorOptions {
		GeneratorOptions {
			marker: self.marker.clone(),
			emit: self.emit.clone(),
		}
	}

	/// Assembly name: flag, then config, then the directory's own name.
	pub fn assembly_for(&self, flag: Option<&str>, dir: &Path) -> String {
		flag.map(str::to_string)
			.or_else(|| self.assembly.clone())
			.or_else(|| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
			.unwrap_or_else(|| "Assembly".to_string())
	}
}
