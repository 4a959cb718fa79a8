use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "enlist")]
#[command(about = "Generate dependency-injection registrations for marked repository types")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to ./enlist.toml when present)
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Run the generator once over a source directory
	Generate {
		/// Directory searched recursively for source files
		dir: PathBuf,

		/// Assembly name reported in registrations
		#[arg(long, value_name = "NAME")]
		assembly: Option<String>,

		/// Directory the generated file is written to (stdout if omitted)
		#[arg(long, value_name = "DIR")]
		out: Option<PathBuf>,
	},
	/// Run successive directories through one generator and report cache reuse
	Replay {
		/// Snapshot directories, oldest first
		#[arg(required = true)]
		dirs: Vec<PathBuf>,

		/// Assembly name reported in registrations
		#[arg(long, value_name = "NAME")]
		assembly: Option<String>,
	},
	/// Print the marker interface source
	Marker,
}
