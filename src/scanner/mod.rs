//! Turns Java-like source text into tokens.
//!
//! The scanner works by priority: whitespace and comments are skipped, then
//! string literals, char literals, numbers, identifiers (checked against the
//! keyword table) and finally operators, where the longest symbol wins. This is
//! `maximal munch`: `>>>=` is one token, never `>>` followed by `>=`.
//!
//! Scanning never fails. A character no rule accepts, or the opening quote of
//! an unterminated literal, becomes a one-character `Unknown` token and the
//! parser decides what to do with it.
mod stream;
mod token;

use std::{iter::Peekable, str::CharIndices};

pub use stream::TokenStream;
pub use token::*;
use tracing::debug;

/// A scanner for Java-like source code
pub struct Scanner<'a> {
	/// User input source code
	source:       &'a str,
	/// User input source code iterator
	source_iter:  Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:        usize,
	/// Points at the character currently being considered
	cursor:       usize,
	line:         usize,
	column:       usize,
	/// Position of `start`, captured when a lexeme begins
	start_line:   usize,
	start_column: usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, start: 0, cursor: 0, line: 1, column: 1, start_line: 1, start_column: 1 }
	}

	/// Scan all tokens from the source code, the last one is always `Eof`.
	pub fn scan_tokens(mut self) -> Vec<Token<'a>> {
		let mut tokens = Vec::new();
		loop {
			let token = self.next_token();
			tokens.push(token);
			if token.is(TokenType::Eof) {
				break;
			}
		}
		debug!(count = tokens.len(), "scanned tokens");
		tokens
	}

	/// Produce the next token. Every call consumes at least one character
	/// unless the input is exhausted, in which case `Eof` is returned.
	pub fn next_token(&mut self) -> Token<'a> {
		loop {
			while self.peek().is_some_and(char::is_whitespace) {
				self.advance();
			}
			self.begin();
			let Some(c) = self.peek() else {
				return Token::new(TokenType::Eof, "", self.cursor, self.line, self.column);
			};
			if c == '/' && self.skip_comment() {
				continue;
			}
			break;
		}

		let rest = &self.source[self.cursor..];
		let (r#type, length) = if let Some(length) = quoted(rest, '"') {
			(TokenType::StringLiteral, length)
		} else if let Some(length) = char_literal(rest) {
			(TokenType::CharLiteral, length)
		} else if let Some(length) = number(rest) {
			(TokenType::Number, length)
		} else if let Some(length) = identifier(rest) {
			(TokenType::keyword_or_identifier(&rest[..length]), length)
		} else if let Some(&(symbol, r#type)) = SYMBOLS.iter().find(|(symbol, _)| rest.starts_with(symbol)) {
			(r#type, symbol.len())
		} else {
			let width = rest.chars().next().map_or(1, char::len_utf8);
			(TokenType::Unknown, width)
		};

		self.consume(length);
		Token::new(r#type, &self.source[self.start..self.cursor], self.start, self.start_line, self.start_column)
	}

	/// Mark the beginning of a lexeme.
	fn begin(&mut self) {
		self.start = self.cursor;
		self.start_line = self.line;
		self.start_column = self.column;
	}

	/// Skip a `//` or a terminated `/* */` comment. An unterminated block
	/// comment is left alone so the `/` is scanned as a symbol.
	fn skip_comment(&mut self) -> bool {
		let rest = &self.source[self.cursor..];
		if rest.starts_with("//") {
			while self.peek().is_some_and(|c| c != '\n') {
				self.advance();
			}
			true
		} else if rest.starts_with("/*") {
			match rest[2..].find("*/") {
				Some(index) => {
					self.consume(index + 4);
					true
				}
				None => false,
			}
		} else {
			false
		}
	}

	/// Consume `length` bytes, keeping line and column in step.
	fn consume(&mut self, length: usize) {
		let target = self.cursor + length;
		while self.cursor < target && self.advance().is_some() {}
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		if c == '\n' {
			self.line += 1;
			self.column = 1;
		} else {
			self.column += 1;
		}
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }
}

/// Length of a `quote`-delimited literal with backslash escapes at the start
/// of `rest`.
fn quoted(rest: &str, quote: char) -> Option<usize> {
	let mut chars = rest.char_indices();
	if chars.next()?.1 != quote {
		return None;
	}
	while let Some((index, c)) = chars.next() {
		match c {
			'\\' => match chars.next() {
				Some((_, '\n')) | None => return None,
				Some(_) => {}
			},
			c if c == quote => return Some(index + c.len_utf8()),
			_ => {}
		}
	}
	None
}

/// Length of a char literal holding exactly one (possibly escaped) character.
fn char_literal(rest: &str) -> Option<usize> {
	let mut chars = rest.char_indices();
	if chars.next()?.1 != '\'' {
		return None;
	}
	match chars.next()? {
		(_, '\'') => return None,
		(_, '\\') => match chars.next()? {
			(_, '\n') => return None,
			_ => {}
		},
		_ => {}
	}
	match chars.next()? {
		(index, '\'') => Some(index + 1),
		_ => None,
	}
}

/// Length of a run of digits accepted by `is_digit`, underscores allowed
/// between digits.
fn digits(rest: &str, is_digit: impl Fn(u8) -> bool) -> usize {
	let bytes = rest.as_bytes();
	if !bytes.first().is_some_and(|&b| is_digit(b)) {
		return 0;
	}
	let mut length = 1;
	let mut last_digit = 1;
	while let Some(&b) = bytes.get(length) {
		if is_digit(b) {
			length += 1;
			last_digit = length;
		} else if b == b'_' {
			length += 1;
		} else {
			break;
		}
	}
	last_digit
}

/// Length of a number literal: decimal or floating with optional exponent and
/// suffix, or a hexadecimal/binary integer.
fn number(rest: &str) -> Option<usize> {
	let bytes = rest.as_bytes();
	let is_long_suffix = |b: Option<&u8>| matches!(b, Some(b'l' | b'L'));

	if bytes.first() == Some(&b'0') && matches!(bytes.get(1), Some(b'x' | b'X' | b'b' | b'B')) {
		let radix_digits = match bytes[1] {
			b'x' | b'X' => digits(&rest[2..], |b| b.is_ascii_hexdigit()),
			_ => digits(&rest[2..], |b| b == b'0' || b == b'1'),
		};
		if radix_digits > 0 {
			let length = 2 + radix_digits;
			return Some(if is_long_suffix(bytes.get(length)) { length + 1 } else { length });
		}
	}

	let mut length = digits(rest, |b| b.is_ascii_digit());
	if length > 0 {
		if bytes.get(length) == Some(&b'.') {
			let fraction = digits(&rest[length + 1..], |b| b.is_ascii_digit());
			if fraction > 0 {
				length += 1 + fraction;
			}
		}
	} else if bytes.first() == Some(&b'.') {
		let fraction = digits(&rest[1..], |b| b.is_ascii_digit());
		if fraction == 0 {
			return None;
		}
		length = 1 + fraction;
	} else {
		return None;
	}

	if matches!(bytes.get(length), Some(b'e' | b'E')) {
		let sign = usize::from(matches!(bytes.get(length + 1), Some(b'+' | b'-')));
		let exponent = digits(&rest[length + 1 + sign..], |b| b.is_ascii_digit());
		if exponent > 0 {
			length += 1 + sign + exponent;
		}
	}

	if matches!(bytes.get(length), Some(b'f' | b'F' | b'd' | b'D' | b'l' | b'L')) {
		length += 1;
	}
	Some(length)
}

fn identifier(rest: &str) -> Option<usize> {
	let bytes = rest.as_bytes();
	if !bytes.first().is_some_and(|&b| b.is_ascii_alphabetic() || b == b'_' || b == b'$') {
		return None;
	}
	Some(bytes.iter().take_while(|&&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$').count())
}

#[cfg(test)]
mod tests {
	use super::{TokenType::*, *};

	fn scan(input: &str) -> Vec<TokenType> {
		Scanner::new(input).scan_tokens().iter().map(|token| token.r#type).collect()
	}

	fn lexemes(input: &str) -> Vec<&str> {
		Scanner::new(input).scan_tokens().iter().map(|token| token.lexeme).collect()
	}

	#[test]
	fn scan_empty() {
		assert_eq!(scan(""), vec![Eof]);
		assert_eq!(scan("  \t\r\n  "), vec![Eof]);
	}

	#[test]
	fn scan_class_header() {
		assert_eq!(scan("public class Hello {}"), vec![Public, Class, Identifier, LeftBrace, RightBrace, Eof]);
	}

	#[test]
	fn scan_longest_symbol_first() {
		assert_eq!(scan(">>>="), vec![UnsignedRightShiftAssign, Eof]);
		assert_eq!(scan(">>>"), vec![UnsignedRightShift, Eof]);
		assert_eq!(scan(">> ="), vec![RightShift, Equal, Eof]);
		assert_eq!(scan("a+++b"), vec![Identifier, PlusPlus, Plus, Identifier, Eof]);
		assert_eq!(scan("x<=y"), vec![Identifier, LessEqual, Identifier, Eof]);
		assert_eq!(scan("..."), vec![Ellipsis, Eof]);
	}

	#[test]
	fn scan_comments() {
		assert_eq!(scan("// single line comment"), vec![Eof]);
		assert_eq!(scan("/* block */ x"), vec![Identifier, Eof]);
		assert_eq!(scan("/** multi\n * line\n **/ y"), vec![Identifier, Eof]);
		assert_eq!(scan("a // tail\nb"), vec![Identifier, Identifier, Eof]);
	}

	#[test]
	fn scan_unterminated_block_comment() {
		assert_eq!(scan("/* open"), vec![Slash, Star, Identifier, Eof]);
	}

	#[test]
	fn scan_strings() {
		assert_eq!(scan(r#""hello""#), vec![StringLiteral, Eof]);
		assert_eq!(lexemes(r#""escaped \"quote\"" x"#), vec![r#""escaped \"quote\"""#, "x", ""]);
		assert_eq!(scan(r#""""#), vec![StringLiteral, Eof]);
		assert_eq!(scan("\"你好\""), vec![StringLiteral, Eof]);
	}

	#[test]
	fn scan_unterminated_string() {
		assert_eq!(scan(r#""open"#), vec![Unknown, Identifier, Eof]);
	}

	#[test]
	fn scan_chars() {
		assert_eq!(scan("'a'"), vec![CharLiteral, Eof]);
		assert_eq!(scan(r"'\n'"), vec![CharLiteral, Eof]);
		assert_eq!(scan(r"'\''"), vec![CharLiteral, Eof]);
		assert_eq!(scan("'ab'"), vec![Unknown, Identifier, Unknown, Eof]);
	}

	#[test]
	fn scan_numbers() {
		for input in ["0", "42", "3.14", ".5", "1e10", "2.5E-3", "10L", "1.5f", "2d", "1_000_000", "0xFF", "0b1010L"] {
			assert_eq!(lexemes(input), vec![input, ""], "{input}");
		}
		assert_eq!(lexemes("1."), vec!["1", ".", ""]);
		assert_eq!(lexemes("1_"), vec!["1", "_", ""]);
		assert_eq!(lexemes("0x"), vec!["0", "x", ""]);
	}

	#[test]
	fn scan_keywords_and_identifiers() {
		assert_eq!(scan("while whileLoop $tmp _x"), vec![While, Identifier, Identifier, Identifier, Eof]);
		assert_eq!(scan("true false null"), vec![True, False, Null, Eof]);
		assert_eq!(scan("int double void"), vec![Int, Double, Void, Eof]);
	}

	#[test]
	fn scan_unknown_characters() {
		assert_eq!(scan("#"), vec![Unknown, Eof]);
		assert_eq!(lexemes("é"), vec!["é", ""]);
	}

	#[test]
	fn scan_positions() {
		let tokens = Scanner::new("int x;\n  x = 1;").scan_tokens();
		let positions: Vec<_> = tokens.iter().map(|token| (token.line, token.column)).collect();
		assert_eq!(positions, vec![(1, 1), (1, 5), (1, 6), (2, 3), (2, 5), (2, 7), (2, 8), (2, 9)]);
		assert_eq!((tokens[3].start, tokens[3].end), (9, 10));
	}

	#[test]
	fn scan_position_after_multiline_comment() {
		let tokens = Scanner::new("/* a\n bc */ x").scan_tokens();
		assert_eq!((tokens[0].line, tokens[0].column), (2, 8));
	}

	#[test]
	fn scan_always_progresses() {
		let source = "class A { int x = 1 >>> 2; String s = \"unterminated; char c = '; # @ é }";
		let mut scanner = Scanner::new(source);
		let mut calls = 0;
		loop {
			calls += 1;
			if scanner.next_token().is(Eof) {
				break;
			}
			assert!(calls <= source.len() + 1);
		}
		assert!(calls <= source.len() + 1);
	}
}
