use enlist_pipeline::marker::marker_source;
use enlist_pipeline::{Generator, GeneratorRun, MarkerSpec, ProgramSnapshot, RegistrationFact};
use proptest::prelude::*;

const FILES: usize = 3;

#[derive(Debug, Clone)]
struct Class {
	implements: bool,
	is_abstract: bool,
	file: usize,
}

fn classes() -> impl Strategy<Value = Vec<Class>> {
	prop::collection::vec(
		(any::<bool>(), any::<bool>(), 0..FILES).prop_map(|(implements, is_abstract, file)| Class {
			implements,
			is_abstract,
			file,
		}),
		0..12,
	)
}

fn file_text(classes: &[Class], file: usize) -> String {
	let mut text = String::from("using Enlist;\nnamespace Prop\n{\n");
	for (i, class) in classes.iter().enumerate().filter(|(_, c)| c.file == file) {
		let modifier = if class.is_abstract { "abstract " } else { "" };
		let bases = if class.implements { " : IRepository" } else { "" };
		text.push_str(&format!("    public {modifier}class C{i}{bases} {{ }}\n"));
	}
	text.push_str("}\n");
	text
}

fn build(classes: &[Class]) -> ProgramSnapshot {
	let marker = marker_source(&MarkerSpec::default());
	let mut builder = ProgramSnapshot::builder("Prop").source(marker.file_name, marker.source_text);
	for file in 0..FILES {
		builder = builder.source(format!("F{file}.cs"), file_text(classes, file));
	}
	builder.build().unwrap()
}

fn expected(classes: &[Class]) -> Vec<String> {
	let mut names = Vec::new();
	for file in 0..FILES {
		for (i, class) in classes.iter().enumerate() {
			if class.file == file && class.implements && !class.is_abstract {
				names.push(format!("Prop.C{i}"));
			}
		}
	}
	names
}

fn unit_orders() -> impl Strategy<Value = Vec<usize>> {
	Just((0..FILES).collect::<Vec<usize>>()).prop_shuffle()
}

/// Rewrites each unit to its `after` text in `order`, running after every edit.
fn replay_edits(start: &ProgramSnapshot, after: &[Class], order: &[usize]) -> GeneratorRun {
	let generator = Generator::default();
	let mut snapshot = start.clone();
	let mut last = generator.run(&snapshot).unwrap();
	for &file in order {
		snapshot = snapshot.with_unit(&format!("F{file}.cs"), &file_text(after, file)).unwrap();
		last = generator.run(&snapshot).unwrap();
	}
	last
}

proptest! {
	#[test]
	fn registrations_follow_unit_then_declaration_order(classes in classes()) {
		let run = Generator::default().run(&build(&classes)).unwrap();
		let names: Vec<String> = run.registrations.iter().map(RegistrationFact::qualified_name).collect();
		prop_assert_eq!(names, expected(&classes));
	}

	#[test]
	fn incremental_runs_match_full_runs(
		classes in classes(),
		toggles in prop::collection::vec(0usize..12, 1..6),
	) {
		let generator = Generator::default();
		let mut classes = classes;
		let mut snapshot = build(&classes);
		generator.run(&snapshot).unwrap();

		for toggle in toggles {
			if classes.is_empty() {
				break;
			}
			let idx = toggle % classes.len();
			classes[idx].is_abstract = !classes[idx].is_abstract;
			let file = classes[idx].file;
			snapshot = snapshot.with_unit(&format!("F{file}.cs"), &file_text(&classes, file)).unwrap();

			let incremental = generator.run(&snapshot).unwrap();
			let full = generator.run_uncached(&snapshot).unwrap();
			prop_assert_eq!(&*incremental.artifact, &*full.artifact);
			let names: Vec<String> = incremental.registrations.iter().map(RegistrationFact::qualified_name).collect();
			prop_assert_eq!(names, expected(&classes));
		}
	}

	#[test]
	fn unchanged_snapshot_is_fully_cached(classes in classes()) {
		let generator = Generator::default();
		let snapshot = build(&classes);
		let first = generator.run(&snapshot).unwrap();
		let second = generator.run(&snapshot).unwrap();
		prop_assert!(std::sync::Arc::ptr_eq(&first.artifact, &second.artifact));
		prop_assert_eq!(second.report.output_reason(), Some(enlist_pipeline::RunReason::Cached));
	}

	#[test]
	fn independent_edits_commute(
		before in classes(),
		after in classes(),
		first_order in unit_orders(),
		second_order in unit_orders(),
	) {
		let start = build(&before);
		let first = replay_edits(&start, &after, &first_order);
		let second = replay_edits(&start, &after, &second_order);

		prop_assert_eq!(&*first.registrations, &*second.registrations);
		prop_assert_eq!(&*first.artifact, &*second.artifact);
		let names: Vec<String> = first.registrations.iter().map(RegistrationFact::qualified_name).collect();
		prop_assert_eq!(names, expected(&after));
	}
}
