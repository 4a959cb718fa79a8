//! Declaration-level syntax trees.
//!
//! A [`SyntaxTree`] records the using directives and type declarations of
//! one source unit. Declarations carry their namespace, containing types,
//! modifiers, kind, generic arity, base list as written, and byte span.
//! Member bodies are skipped; nested type declarations are recorded with
//! their containing-type chain.
//!
//! Generic containers are encoded CLR style in dotted names: `Outer<T>.Inner`
//! is ``Outer`1.Inner``.

mod lexer;
mod parser;


use std::fmt;
use std::sync::Arc;

use crate::error::ModelError;

/// Half-open byte range within a source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Span {
	pub start: usize,
	pub end: usize,
}

impl Span {
	pub fn new(start: usize, end: usize) -> Self {
		Self { start, end }
	}
}

/// Positional identity of a declaration: originating unit plus span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclarationId {
	pub unit: Arc<str>,
	pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
	Class,
	Interface,
	Struct,
	/// `record` or `record class`.
	Record,
	RecordStruct,
	Enum,
}

impl TypeKind {
	/// Reference types that can be instantiated directly.
	pub fn is_class_like(self) -> bool {
		matches!(self, Self::Class | Self::Record)
	}
}

bitflags::bitflags! {
	/// Declaration modifiers relevant to concreteness and visibility.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Modifiers: u16 {
		const PUBLIC = 1 << 0;
		const INTERNAL = 1 << 1;
		const PRIVATE = 1 << 2;
		const PROTECTED = 1 << 3;
		const ABSTRACT = 1 << 4;
		const SEALED = 1 << 5;
		const STATIC = 1 << 6;
		const PARTIAL = 1 << 7;
		const READONLY = 1 << 8;
		const REF = 1 << 9;
		const UNSAFE = 1 << 10;
		const NEW = 1 << 11;
		const FILE = 1 << 12;
	}
}

impl Modifiers {
	pub(crate) fn from_keyword(word: &str) -> Option<Self> {
		Some(match word {
			"public" => Self::PUBLIC,
			"internal" => Self::INTERNAL,
			"private" => Self::PRIVATE,
			"protected" => Self::PROTECTED,
			"abstract" => Self::ABSTRACT,
			"sealed" => Self::SEALED,
			"static" => Self::STATIC,
			"partial" => Self::PARTIAL,
			"readonly" => Self::READONLY,
			"ref" => Self::REF,
			"unsafe" => Self::UNSAFE,
			"new" => Self::NEW,
			"file" => Self::FILE,
			_ => return None,
		})
	}
}

/// A type name plus its number of generic arguments.
///
/// In a base list this is the name as written, with generic arguments and
/// `global::` removed. Resolved names are fully qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef {
	pub name: String,
	pub arity: usize,
}

impl TypeRef {
	pub fn new(name: impl Into<String>, arity: usize) -> Self {
		Self {
			name: name.into(),
			arity,
		}
	}

	pub fn as_str(&self) -> &str {
		&self.name
	}

	pub fn is_qualified(&self) -> bool {
		self.name.contains('.')
	}
}

/// `Name`, or ``Name`N`` for a generic arity of N.
impl fmt::Display for TypeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)?;
		if self.arity > 0 {
			write!(f, "`{}", self.arity)?;
		}
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDeclaration {
	/// Containing namespace, empty for the global namespace.
	pub namespace: String,
	/// Containing types, outermost first. Empty for top-level declarations.
	pub containing: Vec<TypeRef>,
	pub name: String,
	pub kind: TypeKind,
	pub modifiers: Modifiers,
	/// Number of generic type parameters.
	pub arity: usize,
	pub bases: Vec<TypeRef>,
	/// Using directives in scope, outermost first.
	pub usings: Arc<[String]>,
	pub span: Span,
}

impl TypeDeclaration {
	pub fn has_base_list(&self) -> bool {
		!self.bases.is_empty()
	}

	/// Namespace followed by the containing types: the scope base names are
	/// looked up from, innermost last.
	pub fn scope(&self) -> String {
		let mut scope = self.namespace.clone();
		for outer in &self.containing {
			if !scope.is_empty() {
				scope.push('.');
			}
			scope.push_str(&outer.to_string());
		}
		scope
	}

	/// Containing types and the simple name, dot separated.
	pub fn nested_name(&self) -> String {
		let mut name = String::new();
		for outer in &self.containing {
			name.push_str(&outer.to_string());
			name.push('.');
		}
		name.push_str(&self.name);
		name
	}

	/// Fully qualified identity: dotted name and own arity.
	pub fn full_name(&self) -> TypeRef {
		let scope = self.scope();
		if scope.is_empty() {
			TypeRef::new(self.name.clone(), self.arity)
		} else {
			TypeRef::new(format!("{scope}.{}", self.name), self.arity)
		}
	}
}

/// Parsed declaration structure of one source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
	path: Arc<str>,
	text: Arc<str>,
	declarations: Vec<TypeDeclaration>,
	global_usings: Vec<String>,
}

impl SyntaxTree {
	pub fn parse(path: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> Result<Self, ModelError> {
		let path = path.into();
		let text = text.into();
		let parsed = parser::parse_declarations(&text).map_err(|e| ModelError::Parse {
			path: path.clone(),
			offset: e.offset,
			message: e.message,
		})?;
		Ok(Self {
			path,
			text,
			declarations: parsed.declarations,
			global_usings: parsed.global_usings,
		})
	}

	pub fn path(&self) -> &Arc<str> {
		&self.path
	}

	pub fn text(&self) -> &Arc<str> {
		&self.text
	}

	/// Declarations in source order.
	pub fn declarations(&self) -> &[TypeDeclaration] {
		&self.declarations
	}

	/// `global using` namespaces. They apply to every unit of the program.
	pub fn global_usings(&self) -> &[String] {
		&self.global_usings
	}

	pub fn declaration_id(&self, decl: &TypeDeclaration) -> DeclarationId {
		DeclarationId {
			unit: self.path.clone(),
			span: decl.span,
		}
	}
}
