//! `enlist` driver.
//!
//! Loads source directories into program snapshots, runs them through the
//! registration generator, and writes the generated file or the per-step
//! cache report.

mod cli;
mod config;
mod load;
#[cfg(test)]
mod tests;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Command};
use config::FileConfig;
use enlist_pipeline::Generator;
use enlist_pipeline::marker::marker_source;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	let cwd = std::env::current_dir().context("failed to resolve working directory")?;
	let config = FileConfig::discover(cli.config.as_deref(), &cwd)?;

	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	match cli.command {
		Command::Generate { dir, assembly, out: out_dir } => {
			generate(&config, &dir, assembly.as_deref(), out_dir.as_deref(), &mut out)
		}
		Command::Replay { dirs, assembly } => replay(&config, &dirs, assembly.as_deref(), &mut out),
		Command::Marker => {
			let marker = marker_source(&config.marker);
			out.write_all(marker.source_text.as_bytes())?;
			Ok(())
		}
	}
}

/// `RUST_LOG` wins; otherwise `-v` selects debug.
fn init_tracing(verbose: bool) {
	let fallback = if verbose { "debug" } else { "info" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn generate(
	config: &FileConfig,
	dir: &Path,
	assembly: Option<&str>,
	out_dir: Option<&Path>,
	stdout: &mut dyn Write,
) -> anyhow::Result<()> {
	let generator = Generator::new(config.generator_options());
	let assembly = config.assembly_for(assembly, dir);
	let snapshot = load::load_snapshot(dir, &assembly, &config.marker)?;
	let run = generator.run(&snapshot)?;
	info!(assembly = %assembly, registrations = run.registrations.len(), "generated registrations");

	match out_dir {
		Some(out_dir) => {
			std::fs::create_dir_all(out_dir).with_context(|| format!("failed to create {}", out_dir.display()))?;
			let path = out_dir.join(&run.artifact.file_name);
			std::fs::write(&path, &run.artifact.source_text).with_context(|| format!("failed to write {}", path.display()))?;
			info!(path = %path.display(), "wrote generated source");
		}
		None => stdout.write_all(run.artifact.source_text.as_bytes())?,
	}
	Ok(())
}

fn replay(config: &FileConfig, dirs: &[PathBuf], assembly: Option<&str>, stdout: &mut dyn Write) -> anyhow::Result<()> {
	let Some(first) = dirs.first() else {
		bail!("no snapshot directories given");
	};
	let generator = Generator::new(config.generator_options());
	// One assembly name across the sequence, or every fact would change.
	let assembly = config.assembly_for(assembly, first);

	let mut last = None;
	for dir in dirs {
		let snapshot = load::load_snapshot(dir, &assembly, &config.marker)?;
		let run = generator
			.run(&snapshot)
			.with_context(|| format!("generation failed for {}", dir.display()))?;
		writeln!(stdout, "== {}", dir.display())?;
		write!(stdout, "{}", run.report)?;
		last = Some(run);
	}

	if let Some(run) = last {
		writeln!(stdout, "== {}", run.artifact.file_name)?;
		stdout.write_all(run.artifact.source_text.as_bytes())?;
	}
	Ok(())
}
