//! Recursive declaration parser over the lexer's token stream.

use std::sync::Arc;

use super::lexer::{Token, TokenKind, tokenize};
use super::{Modifiers, Span, TypeDeclaration, TypeKind, TypeRef};

#[derive(Debug)]
pub(super) struct ParseError {
	pub offset: usize,
	pub message: String,
}

pub(super) struct ParsedUnit {
	pub declarations: Vec<TypeDeclaration>,
	pub global_usings: Vec<String>,
}

pub(super) fn parse_declarations(src: &str) -> Result<ParsedUnit, ParseError> {
	let tokens = tokenize(src).map_err(|e| ParseError {
		offset: e.offset,
		message: e.message.to_string(),
	})?;
	let mut parser = Parser {
		tokens: &tokens,
		pos: 0,
		eof: src.len(),
		namespace: Vec::new(),
		containing: Vec::new(),
		usings: Vec::new(),
		global_usings: Vec::new(),
		out: Vec::new(),
	};
	parser.members(None)?;
	Ok(ParsedUnit {
		declarations: parser.out,
		global_usings: parser.global_usings,
	})
}

struct Parser<'t, 'a> {
	tokens: &'t [Token<'a>],
	pos: usize,
	eof: usize,
	namespace: Vec<String>,
	containing: Vec<TypeRef>,
	usings: Vec<String>,
	global_usings: Vec<String>,
	out: Vec<TypeDeclaration>,
}

impl<'a> Parser<'_, 'a> {
	fn peek(&self) -> Option<Token<'a>> {
		self.tokens.get(self.pos).copied()
	}

	fn peek_nth(&self, n: usize) -> Option<Token<'a>> {
		self.tokens.get(self.pos + n).copied()
	}

	fn bump(&mut self) -> Option<Token<'a>> {
		let tok = self.peek()?;
		self.pos += 1;
		Some(tok)
	}

	fn at_punct(&self, c: char) -> bool {
		self.peek().is_some_and(|t| t.is_punct(c))
	}

	fn at_ident(&self, word: &str) -> bool {
		self.peek().is_some_and(|t| t.is_ident(word))
	}

	fn offset(&self) -> usize {
		self.peek().map_or(self.eof, |t| t.start)
	}

	fn error(&self, offset: usize, message: impl Into<String>) -> ParseError {
		ParseError {
			offset,
			message: message.into(),
		}
	}

	/// Parses namespace or type members until the matching `}` of `open`, or
	/// EOF when `open` is `None`.
	fn members(&mut self, open: Option<usize>) -> Result<(), ParseError> {
		loop {
			let Some(tok) = self.peek() else {
				return match open {
					Some(offset) => Err(self.error(offset, "unbalanced '{'")),
					None => Ok(()),
				};
			};
			match tok.kind {
				TokenKind::Punct('}') => {
					if open.is_none() {
						return Err(self.error(tok.start, "unexpected '}'"));
					}
					self.bump();
					return Ok(());
				}
				TokenKind::Punct('{') => self.skip_group('{', '}')?,
				TokenKind::Ident if tok.text == "using" && self.containing.is_empty() => {
					if let Some(name) = self.using_directive() {
						self.usings.push(name);
					}
				}
				TokenKind::Ident if tok.text == "global" && self.peek_nth(1).is_some_and(|t| t.is_ident("using")) => {
					self.bump();
					if let Some(name) = self.using_directive() {
						self.global_usings.push(name);
					}
				}
				TokenKind::Ident if tok.text == "namespace" => self.namespace_declaration()?,
				TokenKind::Punct('[') => self.type_declaration()?,
				TokenKind::Ident if Modifiers::from_keyword(tok.text).is_some() || kind_keyword(tok.text) => {
					self.type_declaration()?
				}
				_ => {
					self.bump();
				}
			}
		}
	}

	/// Consumes one using directive. Returns the imported namespace, or `None`
	/// for aliases, `using static` and statements.
	fn using_directive(&mut self) -> Option<String> {
		self.bump();
		if self.at_ident("static") || self.at_punct('(') {
			return None;
		}
		let mut name = String::new();
		let mut alias = false;
		while let Some(tok) = self.peek() {
			if tok.is_punct(';') || tok.is_punct('{') || tok.is_punct('}') {
				break;
			}
			self.bump();
			match tok.kind {
				TokenKind::Punct('=') => alias = true,
				TokenKind::Ident | TokenKind::Punct('.') => name.push_str(tok.text),
				_ => alias = true,
			}
		}
		if self.at_punct(';') {
			self.bump();
		}
		(!alias && !name.is_empty()).then_some(name)
	}

	fn namespace_declaration(&mut self) -> Result<(), ParseError> {
		let keyword = self.bump().map_or(self.eof, |t| t.start);
		let name = self.dotted_name().ok_or_else(|| self.error(keyword, "expected namespace name"))?;
		let segments: Vec<String> = name.split('.').map(str::to_string).collect();

		match self.peek() {
			Some(tok) if tok.is_punct('{') => {
				self.bump();
				let depth = self.namespace.len();
				let usings = self.usings.len();
				self.namespace.extend(segments);
				self.members(Some(tok.start))?;
				self.namespace.truncate(depth);
				self.usings.truncate(usings);
				Ok(())
			}
			Some(tok) if tok.is_punct(';') => {
				self.bump();
				self.namespace.extend(segments);
				Ok(())
			}
			_ => Err(self.error(self.offset(), "expected '{' or ';' after namespace name")),
		}
	}

	fn dotted_name(&mut self) -> Option<String> {
		let first = self.peek().filter(|t| t.kind == TokenKind::Ident)?;
		self.bump();
		let mut name = unescape(first.text).to_string();
		while self.at_punct('.') && self.peek_nth(1).is_some_and(|t| t.kind == TokenKind::Ident) {
			self.bump();
			let seg = self.bump()?;
			name.push('.');
			name.push_str(unescape(seg.text));
		}
		Some(name)
	}

	fn type_declaration(&mut self) -> Result<(), ParseError> {
		let start = self.offset();
		let mut modifiers = Modifiers::empty();
		loop {
			match self.peek() {
				Some(tok) if tok.is_punct('[') => self.skip_group('[', ']')?,
				Some(tok) if tok.kind == TokenKind::Ident => match Modifiers::from_keyword(tok.text) {
					Some(m) => {
						modifiers |= m;
						self.bump();
					}
					None => break,
				},
				_ => break,
			}
		}

		let Some(keyword) = self.peek().filter(|t| t.kind == TokenKind::Ident && kind_keyword(t.text)) else {
			// Not a type: a member or statement the outer loop will step over.
			return Ok(());
		};
		self.bump();
		let kind = match keyword.text {
			"class" => TypeKind::Class,
			"interface" => TypeKind::Interface,
			"struct" => TypeKind::Struct,
			"enum" => TypeKind::Enum,
			"record" if self.at_ident("struct") => {
				self.bump();
				TypeKind::RecordStruct
			}
			"record" => {
				if self.at_ident("class") {
					self.bump();
				}
				TypeKind::Record
			}
			_ => {
				self.skip_until_semicolon()?;
				return Ok(());
			}
		};

		let name = match self.peek() {
			Some(tok) if tok.kind == TokenKind::Ident => {
				self.bump();
				unescape(tok.text).to_string()
			}
			// Inside a type body this is a constraint such as `where T : class`.
			_ if !self.containing.is_empty() => return Ok(()),
			_ => return Err(self.error(self.offset(), "expected type name")),
		};
		let arity = if self.at_punct('<') { self.generic_arity()? } else { 0 };
		if self.at_punct('(') {
			self.skip_group('(', ')')?;
		}

		let mut bases = Vec::new();
		if self.at_punct(':') {
			self.bump();
			loop {
				let base = self.type_ref()?;
				if kind != TypeKind::Enum {
					bases.push(base);
				}
				if self.at_punct(',') {
					self.bump();
				} else {
					break;
				}
			}
		}

		while self.peek().is_some_and(|t| !t.is_punct('{') && !t.is_punct(';')) {
			if self.at_ident("where") {
				self.bump();
			} else {
				return Err(self.error(self.offset(), "expected type body"));
			}
			while self.peek().is_some_and(|t| !t.is_punct('{') && !t.is_punct(';') && !t.is_ident("where")) {
				self.bump();
			}
		}

		// Nested declarations follow their container in source order.
		let index = self.out.len();
		let end = match self.peek() {
			Some(tok) if tok.is_punct('{') && kind == TypeKind::Enum => {
				self.skip_group('{', '}')?;
				self.tokens[self.pos - 1].end()
			}
			Some(tok) if tok.is_punct('{') => {
				self.bump();
				self.containing.push(TypeRef::new(name.clone(), arity));
				let body = self.members(Some(tok.start));
				self.containing.pop();
				body?;
				self.tokens[self.pos - 1].end()
			}
			Some(tok) if tok.is_punct(';') => {
				self.bump();
				tok.end()
			}
			_ => return Err(self.error(self.eof, "expected type body")),
		};

		self.out.insert(
			index,
			TypeDeclaration {
				namespace: self.namespace.join("."),
				containing: self.containing.clone(),
				name,
				kind,
				modifiers,
				arity,
				bases,
				usings: Arc::from(self.usings.as_slice()),
				span: Span::new(start, end),
			},
		);
		Ok(())
	}

	/// Parses one base-list entry. Generic arguments are reduced to their count,
	/// and nullable annotations, record base arguments and alias qualifiers are
	/// dropped.
	fn type_ref(&mut self) -> Result<TypeRef, ParseError> {
		let offset = self.offset();
		if self.at_ident("global") && self.peek_nth(1).is_some_and(|t| t.is_punct(':')) {
			self.bump();
		}
		while self.at_punct(':') {
			self.bump();
		}
		let mut name = self.dotted_name().ok_or_else(|| self.error(offset, "expected base type name"))?;
		let mut arity = 0;
		loop {
			if self.at_punct('<') {
				arity = self.generic_arity()?;
			} else if self.at_punct(':') && self.peek_nth(1).is_some_and(|t| t.is_punct(':')) {
				self.bump();
				self.bump();
				name = self.dotted_name().ok_or_else(|| self.error(self.offset(), "expected name after '::'"))?;
				arity = 0;
			} else if self.at_punct('.') {
				self.bump();
				let seg = self.dotted_name().ok_or_else(|| self.error(self.offset(), "expected name after '.'"))?;
				if arity > 0 {
					name.push_str(&format!("`{arity}"));
					arity = 0;
				}
				name.push('.');
				name.push_str(&seg);
			} else {
				break;
			}
		}
		if self.at_punct('?') {
			self.bump();
		}
		if self.at_punct('(') {
			self.skip_group('(', ')')?;
		}
		Ok(TypeRef::new(name, arity))
	}

	fn generic_arity(&mut self) -> Result<usize, ParseError> {
		let start = self.offset();
		self.bump();
		let mut depth = 1usize;
		let mut arity = 1;
		while depth > 0 {
			let tok = self.bump().ok_or_else(|| self.error(start, "unbalanced '<'"))?;
			match tok.kind {
				TokenKind::Punct('<') => depth += 1,
				TokenKind::Punct('>') => depth -= 1,
				TokenKind::Punct(',') if depth == 1 => arity += 1,
				_ => {}
			}
		}
		Ok(arity)
	}

	/// Skips a balanced group starting at the current `open` token.
	fn skip_group(&mut self, open: char, close: char) -> Result<(), ParseError> {
		let start = self.offset();
		let mut depth = 0usize;
		while let Some(tok) = self.bump() {
			if tok.is_punct(open) {
				depth += 1;
			} else if tok.is_punct(close) {
				depth -= 1;
				if depth == 0 {
					return Ok(());
				}
			}
		}
		Err(self.error(start, format!("unbalanced '{open}'")))
	}

	/// Skips through the next `;` outside any brace group.
	fn skip_until_semicolon(&mut self) -> Result<(), ParseError> {
		while let Some(tok) = self.peek() {
			if tok.is_punct('{') {
				self.skip_group('{', '}')?;
				continue;
			}
			self.bump();
			if tok.is_punct(';') {
				break;
			}
		}
		Ok(())
	}
}

fn kind_keyword(word: &str) -> bool {
	matches!(word, "class" | "interface" | "struct" | "enum" | "record" | "delegate")
}

fn unescape(ident: &str) -> &str {
	ident.strip_prefix('@').unwrap_or(ident)
}
