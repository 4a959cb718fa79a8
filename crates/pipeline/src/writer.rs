use std::borrow::Cow;

/// Reserved C# keywords. Identifiers spelled like one need an `@` prefix.
const KEYWORDS: &[&str] = &[
	"abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class", "const", "continue",
	"decimal", "default", "delegate", "do", "double", "else", "enum", "event", "explicit", "extern", "false", "finally",
	"fixed", "float", "for", "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock", "long",
	"namespace", "new", "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
	"readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static", "string", "struct",
	"switch", "this", "throw", "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using",
	"virtual", "void", "volatile", "while",
];

/// `name` as written in C# source, `@`-escaped when it is a keyword.
pub(crate) fn identifier(name: &str) -> Cow<'_, str> {
	if KEYWORDS.contains(&name) {
		Cow::Owned(format!("@{name}"))
	} else {
		Cow::Borrowed(name)
	}
}

/// Line-oriented builder for generated C# with four-space block indentation.
#[derive(Debug, Default)]
pub(crate) struct SourceWriter {
	out: String,
	depth: usize,
}

impl SourceWriter {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn line(&mut self, text: &str) -> &mut Self {
		if !text.is_empty() {
			for _ in 0..self.depth {
				self.out.push_str("    ");
			}
			self.out.push_str(text);
		}
		self.out.push('\n');
		self
	}

	pub(crate) fn open(&mut self) -> &mut Self {
		self.line("{");
		self.depth += 1;
		self
	}

	pub(crate) fn close(&mut self) -> &mut Self {
		self.depth = self.depth.saturating_sub(1);
		self.line("}")
	}

	pub(crate) fn finish(self) -> String {
		self.out
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn nests_blocks_and_leaves_blank_lines_bare() {
		let mut w = SourceWriter::new();
		w.line("namespace N").open().line("class C").open().line("").close().close();
		assert_eq!(w.finish(), "namespace N\n{\n    class C\n    {\n\n    }\n}\n");
	}

	#[test]
	fn keywords_are_escaped() {
		assert_eq!(identifier("event"), "@event");
		assert_eq!(identifier("Event"), "Event");
		assert_eq!(identifier("record"), "record");
	}
}
