use super::{Token, TokenType};

/// A buffered token sequence with arbitrary lookahead.
///
/// Looking past the end always yields the trailing `Eof` token and
/// `advance` never moves beyond it.
#[derive(Debug)]
pub struct TokenStream<'a> {
	tokens:   Vec<Token<'a>>,
	position: usize,
}

impl<'a> TokenStream<'a> {
	/// The buffer is expected to end with `Eof`, one is appended otherwise.
	pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
		if !tokens.last().is_some_and(|token| token.is(TokenType::Eof)) {
			let (end, line, column) = tokens.last().map_or((0, 1, 1), |t| (t.end, t.line, t.column + t.lexeme.len()));
			tokens.push(Token::new(TokenType::Eof, "", end, line, column));
		}
		Self { tokens, position: 0 }
	}

	/// The `k`-th token ahead, `peek(0)` is the current one.
	pub fn peek(&self, k: usize) -> Token<'a> {
		let last = self.tokens.len() - 1;
		self.tokens[(self.position + k).min(last)]
	}

	pub fn current(&self) -> Token<'a> { self.peek(0) }

	/// Consume and return the current token.
	pub fn advance(&mut self) -> Token<'a> {
		let token = self.current();
		if !token.is(TokenType::Eof) {
			self.position += 1;
		}
		token
	}

	pub fn position(&self) -> usize { self.position }

	pub fn is_at_end(&self) -> bool { self.current().is(TokenType::Eof) }
}
