//! Token stream for declaration-level parsing.
//!
//! Only the distinctions the declaration parser needs are kept: identifiers,
//! single-character punctuation, and opaque literals. Comments, preprocessor
//! lines, and string/char literal contents are consumed here so braces inside
//! them never reach the parser.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TokenKind {
	Ident,
	Punct(char),
	Literal,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Token<'a> {
	pub kind: TokenKind,
	pub text: &'a str,
	pub start: usize,
}

impl Token<'_> {
	pub fn end(&self) -> usize {
		self.start + self.text.len()
	}

	pub fn is_ident(&self, word: &str) -> bool {
		self.kind == TokenKind::Ident && self.text == word
	}

	pub fn is_punct(&self, c: char) -> bool {
		self.kind == TokenKind::Punct(c)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct LexError {
	pub offset: usize,
	pub message: &'static str,
}

pub(super) fn tokenize(src: &str) -> Result<Vec<Token<'_>>, LexError> {
	let mut lexer = Lexer { src, pos: 0 };
	let mut tokens = Vec::new();
	loop {
		lexer.skip_trivia()?;
		let start = lexer.pos;
		let Some(c) = lexer.peek() else {
			break;
		};
		let kind = if lexer.at_string_start() {
			lexer.string()?;
			TokenKind::Literal
		} else if c == '\'' {
			lexer.char_literal()?;
			TokenKind::Literal
		} else if is_ident_start(c) || (c == '@' && lexer.peek_nth(1).is_some_and(is_ident_start)) {
			lexer.bump();
			lexer.eat_while(is_ident_continue);
			TokenKind::Ident
		} else if c.is_ascii_digit() {
			lexer.eat_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
			TokenKind::Literal
		} else {
			lexer.bump();
			TokenKind::Punct(c)
		};
		tokens.push(Token {
			kind,
			text: &src[start..lexer.pos],
			start,
		});
	}
	Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
	c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

struct Lexer<'a> {
	src: &'a str,
	pos: usize,
}

impl Lexer<'_> {
	fn rest(&self) -> &str {
		&self.src[self.pos..]
	}

	fn peek(&self) -> Option<char> {
		self.rest().chars().next()
	}

	fn peek_nth(&self, n: usize) -> Option<char> {
		self.rest().chars().nth(n)
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.peek()?;
		self.pos += c.len_utf8();
		Some(c)
	}

	fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
		while self.peek().is_some_and(&pred) {
			self.bump();
		}
	}

	fn error(&self, offset: usize, message: &'static str) -> LexError {
		LexError { offset, message }
	}

	fn skip_trivia(&mut self) -> Result<(), LexError> {
		loop {
			let rest = self.rest();
			if rest.starts_with("//") || rest.starts_with('#') {
				self.eat_while(|c| c != '\n');
			} else if rest.starts_with("/*") {
				let start = self.pos;
				match rest[2..].find("*/") {
					Some(end) => self.pos += 2 + end + 2,
					None => return Err(self.error(start, "unterminated block comment")),
				}
			} else if self.peek().is_some_and(char::is_whitespace) {
				self.eat_while(char::is_whitespace);
			} else {
				return Ok(());
			}
		}
	}

	/// Recognizes `"`, `@"`, `$"`, `$@"`, `@$"`, and raw `$$"""` openers.
	fn at_string_start(&self) -> bool {
		self.rest().trim_start_matches(['@', '$']).starts_with('"')
	}

	fn string(&mut self) -> Result<(), LexError> {
		let start = self.pos;
		let mut verbatim = false;
		while let Some(c @ ('@' | '$')) = self.peek() {
			verbatim |= c == '@';
			self.bump();
		}

		let quotes = self.rest().chars().take_while(|&c| c == '"').count();
		if quotes >= 3 {
			self.pos += quotes;
			let closing = "\"".repeat(quotes);
			return match self.rest().find(&closing) {
				Some(end) => {
					self.pos += end + quotes;
					self.eat_while(|c| c == '"');
					Ok(())
				}
				None => Err(self.error(start, "unterminated raw string literal")),
			};
		}

		self.bump();
		loop {
			match self.bump() {
				None => return Err(self.error(start, "unterminated string literal")),
				Some('"') if verbatim && self.peek() == Some('"') => {
					self.bump();
				}
				Some('"') => return Ok(()),
				Some('\\') if !verbatim => {
					self.bump();
				}
				Some('\n') if !verbatim => return Err(self.error(start, "unterminated string literal")),
				Some(_) => {}
			}
		}
	}

	fn char_literal(&mut self) -> Result<(), LexError> {
		let start = self.pos;
		self.bump();
		loop {
			match self.bump() {
				None | Some('\n') => return Err(self.error(start, "unterminated character literal")),
				Some('\\') => {
					self.bump();
				}
				Some('\'') => return Ok(()),
				Some(_) => {}
			}
		}
	}
}
