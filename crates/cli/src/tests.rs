use std::fs;
use std::path::Path;

use enlist_pipeline::ServiceLifetime;
use pretty_assertions::assert_eq;

use super::*;
use crate::config::ConfigError;
use crate::load::{collect_sources, load_snapshot, unit_name};

const DATA: &str = r#"using Enlist;

namespace MyApplication.Data
{
    public class UserRepository : IRepository { }
    public class ProductRepository : IRepository { }
    public abstract class BaseRepository : IRepository { }
    public class NotARepository { }
}
"#;

fn write(root: &Path, rel: &str, text: &str) {
	let path = root.join(rel);
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).unwrap();
	}
	fs::write(path, text).unwrap();
}

#[test]
fn collects_sorted_sources_and_skips_generated_files() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "b/Second.cs", "");
	write(dir.path(), "a/First.cs", "");
	write(dir.path(), "Root.cs", "");
	write(dir.path(), "Notes.txt", "");
	write(dir.path(), "RepositoryRegistration.g.cs", "");

	let names: Vec<String> = collect_sources(dir.path())
		.unwrap()
		.iter()
		.map(|p| unit_name(dir.path(), p))
		.collect();
	assert_eq!(names, vec!["Root.cs", "a/First.cs", "b/Second.cs"]);
}

#[test]
fn snapshot_includes_marker_source_first() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "Data.cs", DATA);

	let snapshot = load_snapshot(dir.path(), "MyApplication", &Default::default()).unwrap();
	let paths: Vec<&str> = snapshot.units().iter().map(|u| &**u.path()).collect();
	assert_eq!(paths, vec!["IRepository.g.cs", "Data.cs"]);
	assert_eq!(&**snapshot.assembly_name(), "MyApplication");
}

#[test]
fn parse_errors_name_the_directory() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "Broken.cs", "namespace N { class A : I {");

	let err = load_snapshot(dir.path(), "App", &Default::default()).unwrap_err();
	assert!(format!("{err:#}").contains("Broken.cs"));
}

#[test]
fn generate_prints_to_stdout() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "Data.cs", DATA);

	let mut out = Vec::new();
	generate(&FileConfig::default(), dir.path(), Some("MyApplication"), None, &mut out).unwrap();
	let text = String::from_utf8(out).unwrap();
	assert!(text.contains("services.AddScoped<global::MyApplication.Data.UserRepository>(); // MyApplication"));
	assert!(text.contains("services.AddScoped<global::MyApplication.Data.ProductRepository>(); // MyApplication"));
	assert!(!text.contains("BaseRepository"));
}

#[test]
fn generate_writes_into_out_dir() {
	let src = tempfile::tempdir().unwrap();
	let out_dir = tempfile::tempdir().unwrap();
	write(src.path(), "Data.cs", DATA);

	let mut stdout = Vec::new();
	generate(&FileConfig::default(), src.path(), None, Some(out_dir.path()), &mut stdout).unwrap();
	assert!(stdout.is_empty());

	let written = fs::read_to_string(out_dir.path().join("RepositoryRegistration.g.cs")).unwrap();
	assert!(written.contains("public static class RepositoryRegistrationExtensions"));
}

#[test]
fn replay_reports_cached_output_for_unrelated_change() {
	let root = tempfile::tempdir().unwrap();
	let v1 = root.path().join("v1");
	let v2 = root.path().join("v2");
	write(&v1, "Data.cs", DATA);
	write(&v2, "Data.cs", DATA);
	write(
		&v2,
		"NotARelevantChange.cs",
		"namespace MyApplication { public class NotARelevantChange { } }\n",
	);

	let mut out = Vec::new();
	replay(&FileConfig::default(), &[v1, v2], Some("MyApplication"), &mut out).unwrap();
	let text = String::from_utf8(out).unwrap();

	let second = &text[text.find("/v2\n").unwrap()..];
	assert!(second.contains("ScanCandidates\n  Cached    IRepository.g.cs\n  Cached    Data.cs\n  New       NotARelevantChange.cs\n"));
	assert!(second.contains("AggregateRegistrations\n  Cached    registrations\n"));
	assert!(second.contains("EmitSource\n  Cached    RepositoryRegistration.g.cs\n"));
	assert!(second.contains("== RepositoryRegistration.g.cs\n// <auto-generated/>"));
}

#[test]
fn config_defaults_and_overrides() {
	let config = FileConfig::parse(
		r#"
assembly = "Shop"

[marker]
name = "IService"

[emit]
method_name = "AddServices"
lifetime = "transient"
"#,
		Path::new(config::CONFIG_FILE_NAME),
	)
	.unwrap();

	assert_eq!(config.assembly.as_deref(), Some("Shop"));
	assert_eq!(config.marker.namespace, "Enlist");
	assert_eq!(config.marker.name, "IService");
	assert_eq!(config.emit.method_name, "AddServices");
	assert_eq!(config.emit.lifetime, ServiceLifetime::Transient);
	assert_eq!(config.emit.file_name, "RepositoryRegistration.g.cs");
	assert_eq!(config.assembly_for(None, Path::new("src")), "Shop");
	assert_eq!(config.assembly_for(Some("Cli"), Path::new("src")), "Cli");
	assert_eq!(FileConfig::default().assembly_for(None, Path::new("/work/Billing")), "Billing");
}

#[test]
fn config_rejects_unknown_keys() {
	let err = FileConfig::parse("[emit]\nlifetim = \"scoped\"\n", Path::new("enlist.toml")).unwrap_err();
	assert!(matches!(err, ConfigError::Parse { .. }));
	assert!(err.to_string().starts_with("invalid config enlist.toml:"));
}

#[test]
fn config_discovery() {
	let dir = tempfile::tempdir().unwrap();
	assert_eq!(FileConfig::discover(None, dir.path()).unwrap(), FileConfig::default());

	write(dir.path(), "enlist.toml", "assembly = \"Found\"\n");
	assert_eq!(FileConfig::discover(None, dir.path()).unwrap().assembly.as_deref(), Some("Found"));

	let missing = dir.path().join("missing.toml");
	assert!(matches!(
		FileConfig::discover(Some(missing.as_path()), dir.path()),
		Err(ConfigError::Read { .. })
	));
}

#[test]
fn cli_parses_global_flags_after_subcommand() {
	let cli = Cli::try_parse_from(["enlist", "generate", "src", "--assembly", "App", "-v"]).unwrap();
	assert!(cli.verbose);
	match cli.command {
		Command::Generate { dir, assembly, out } => {
			assert_eq!(dir, PathBuf::from("src"));
			assert_eq!(assembly.as_deref(), Some("App"));
			assert_eq!(out, None);
		}
		other => panic!("unexpected command {other:?}"),
	}
	assert!(Cli::try_parse_from(["enlist", "replay"]).is_err());
}
