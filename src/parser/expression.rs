//! Expression grammar:
//!
//! ``` BNF
//! expression → binary(0) ( "?" expression ":" expression )? ;
//! binary(p)  → unary ( OP binary(prec(OP) + 1) )*      where prec(OP) >= p ;
//! unary      → ( "++" | "--" | "!" | "+" | "-" | "~" ) unary | cast | postfix ;
//! cast       → "(" PRIMITIVE ")" unary ;
//! postfix    → primary ( "." IDENT | "(" args? ")" | "[" expression "]" | "++" | "--" )* ;
//! primary    → literal | IDENT | "this" | "super" | "(" expression ")" | new | arrayInit ;
//! new        → "new" type ( "(" args? ")" | ( "[" expression? "]" )+ arrayInit? ) ;
//! ```

use super::Parser;
use crate::{
	ast::{BinaryOperator, Expression, PostfixOperator, PrefixOperator, Position},
	error::parser::ParserError,
	scanner::TokenType::*,
};

impl<'a> Parser<'a> {
	pub(super) fn expression(&mut self) -> Result<Expression, ParserError> { self.binary(0) }

	/// Precedence climbing. The ternary sits below every binary operator, so
	/// it is only taken at the outermost level.
	fn binary(&mut self, min_precedence: u8) -> Result<Expression, ParserError> {
		let mut left = self.unary()?;
		loop {
			let token = self.peek(0);
			if token.is(Question) {
				if min_precedence > 0 {
					break;
				}
				self.advance();
				let then_branch = self.expression()?;
				self.expect(Colon, "':' in conditional expression")?;
				let else_branch = self.binary(min_precedence)?;
				left = Expression::ternary(left, then_branch, else_branch);
				continue;
			}
			let Some(operator) = BinaryOperator::from_token(token.r#type) else { break };
			let precedence = operator.precedence();
			if precedence < min_precedence {
				break;
			}
			self.advance();
			let right = self.binary(precedence + 1)?;
			left = Expression::binary(operator, left, right);
		}
		Ok(left)
	}

	fn unary(&mut self) -> Result<Expression, ParserError> {
		let token = self.peek(0);
		if let Some(operator) = PrefixOperator::from_token(token.r#type) {
			self.advance();
			let operand = self.unary()?;
			return Ok(Expression::prefix(operator, operand, Position::from(&token)));
		}
		if token.is(LeftParen) && self.is_primitive_cast() {
			self.advance();
			let ty = self.parse_type()?;
			self.expect(RightParen, "')' after cast type")?;
			let operand = self.unary()?;
			return Ok(Expression::Cast { ty, operand: Box::new(operand), position: Position::from(&token) });
		}
		let primary = self.primary()?;
		self.postfix(primary)
	}

	/// `( int )`, `( double[] )` and the like.
	fn is_primitive_cast(&self) -> bool {
		let inner = self.peek(1);
		inner.r#type.is_type_keyword()
			&& !inner.is(Void)
			&& self.type_length(1).is_some_and(|length| self.peek(1 + length).is(RightParen))
	}

	fn postfix(&mut self, mut expression: Expression) -> Result<Expression, ParserError> {
		loop {
			let token = self.peek(0);
			expression = match token.r#type {
				Dot => {
					self.advance();
					let name = self.peek(0);
					if !(name.is(Identifier) || name.is(Class) || name.is(This)) {
						return Err(self.expected(&name, "member name after '.'"));
					}
					self.advance();
					Expression::member(expression, name.lexeme)
				}
				LeftParen => {
					let arguments = self.arguments()?;
					Expression::call(expression, arguments)
				}
				LeftBracket => {
					self.advance();
					let index = self.expression()?;
					self.expect(RightBracket, "']' after index")?;
					Expression::index(expression, index)
				}
				PlusPlus => {
					self.advance();
					Expression::postfix(PostfixOperator::Increment, expression)
				}
				MinusMinus => {
					self.advance();
					Expression::postfix(PostfixOperator::Decrement, expression)
				}
				_ => return Ok(expression),
			};
		}
	}

	fn primary(&mut self) -> Result<Expression, ParserError> {
		let token = self.peek(0);
		let position = Position::from(&token);
		match token.r#type {
			Number | StringLiteral | CharLiteral | True | False | Null => {
				self.advance();
				Ok(Expression::literal(token.lexeme, position))
			}
			Identifier | This | Super => {
				self.advance();
				Ok(Expression::identifier(token.lexeme, position))
			}
			LeftParen => {
				self.advance(); // consume '('
				let expression = self.expression()?;
				self.expect(RightParen, "')' to close '('")?;
				Ok(expression)
			}
			LeftBrace => self.array_initializer(),
			New => self.new_expression(),
			Eof => Err(self.expected(&token, "expression")),
			other => {
				self.advance(); // consume unexpected token
				let kind = format!("{other:?}").to_uppercase();
				Ok(Expression::unknown(format!("{kind}:{}", token.lexeme), position))
			}
		}
	}

	fn arguments(&mut self) -> Result<Vec<Expression>, ParserError> {
		self.expect(LeftParen, "'('")?;
		let mut arguments = Vec::new();
		if !self.check(RightParen) {
			arguments.push(self.expression()?);
			while self.match_token(Comma) {
				arguments.push(self.expression()?);
			}
		}
		self.expect(RightParen, "')' after arguments")?;
		Ok(arguments)
	}

	fn new_expression(&mut self) -> Result<Expression, ParserError> {
		let position = Position::from(&self.expect(New, "'new'")?);
		let first = self.peek(0);
		if !(first.is(Identifier) || first.r#type.is_type_keyword() && !first.is(Void)) {
			return Err(self.expected(&first, "type after 'new'"));
		}
		let mut class = self.advance().lexeme.to_string();
		while self.check(Dot) && self.peek(1).is(Identifier) {
			self.advance();
			class.push('.');
			class.push_str(self.advance().lexeme);
		}
		if self.check(Less) {
			class.push_str(&self.generic_suffix()?);
		}

		if self.check(LeftParen) {
			let arguments = self.arguments()?;
			return Ok(Expression::New { class, arguments, position });
		}

		let mut dimensions = Vec::new();
		let mut extra = 0;
		while self.match_token(LeftBracket) {
			if self.match_token(RightBracket) {
				extra += 1;
			} else {
				dimensions.push(self.expression()?);
				self.expect(RightBracket, "']' after array size")?;
			}
		}
		if dimensions.is_empty() && extra > 0 && self.check(LeftBrace) {
			return self.array_initializer();
		}
		if dimensions.is_empty() {
			let token = self.peek(0);
			return Err(self.expected(&token, "'(' or array size after 'new'"));
		}
		Ok(Expression::NewArray { element: class, dimensions, extra, position })
	}

	/// `{ initializer, ... }`, a trailing comma is allowed.
	fn array_initializer(&mut self) -> Result<Expression, ParserError> {
		let position = Position::from(&self.expect(LeftBrace, "'{'")?);
		let mut elements = Vec::new();
		while !self.check(RightBrace) {
			elements.push(self.variable_initializer()?);
			if !self.match_token(Comma) {
				break;
			}
		}
		self.expect(RightBrace, "'}' after array initializer")?;
		Ok(Expression::ArrayInit { elements, position })
	}

	pub(super) fn variable_initializer(&mut self) -> Result<Expression, ParserError> {
		if self.check(LeftBrace) { self.array_initializer() } else { self.expression() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scanner::Scanner;

	fn parse(input: &str, equals: &str) {
		let mut parser = Parser::new(Scanner::new(input).scan_tokens());
		let ast = parser.parse_expression().unwrap();
		assert_eq!(ast.to_string(), equals);
	}

	#[test]
	fn parse_arithmetic() {
		parse("1 + 2 * 3", "(+ 1 (* 2 3))");
		parse("3 + 4 * (-2 - 1)", "(+ 3 (* 4 (- (- 2) 1)))");
		parse("1 + 2 * 3 / 4 - 5", "(- (+ 1 (/ (* 2 3) 4)) 5)");
		parse("a % b % c", "(% (% a b) c)");
	}

	#[test]
	fn parse_comparison_and_logic() {
		parse("1 + 2 == 3", "(== (+ 1 2) 3)");
		parse("a < b && c >= d || !e", "(|| (&& (< a b) (>= c d)) (! e))");
		parse("a == b == c", "(== (== a b) c)");
	}

	#[test]
	fn parse_bitwise_binds_loosest() {
		parse("a & b == c", "(& a (== b c))");
		parse("x << 1 + 2", "(<< x (+ 1 2))");
		parse("a | b && c", "(| a (&& b c))");
	}

	#[test]
	fn parse_ternary() {
		parse("a ? b : c", "(? a b c)");
		parse("a > 0 ? 1 : a < 0 ? -1 : 0", "(? (> a 0) 1 (? (< a 0) (- 1) 0))");
		parse("a || b ? c : d", "(? (|| a b) c d)");
		parse("(a ? b : c) + 1", "(+ (? a b c) 1)");
	}

	#[test]
	fn parse_unary() {
		parse("-x", "(- x)");
		parse("!!done", "(! (! done))");
		parse("~mask", "(~ mask)");
		parse("++i", "(++ i)");
		parse("i--", "(post-- i)");
		parse("-a.b", "(- (. a b))");
	}

	#[test]
	fn parse_postfix_chains() {
		parse("System.out.println(\"hi\")", "(call (. (. System out) println) \"hi\")");
		parse("this.items[i + 1].name", "(. (index (. this items) (+ i 1)) name)");
		parse("f()(1)", "(call (call f) 1)");
		parse("super.draw()", "(call (. super draw))");
		parse("list.get(0).size()", "(call (. (call (. list get) 0) size))");
	}

	#[test]
	fn parse_literals() {
		parse("42", "42");
		parse("1.5f", "1.5f");
		parse("\"hello\"", "\"hello\"");
		parse("'c'", "'c'");
		parse("true", "true");
		parse("null", "null");
	}

	#[test]
	fn parse_creation() {
		parse("new Point(1, 2)", "(new Point 1 2)");
		parse("new ArrayList<>()", "(new ArrayList<>)");
		parse("new int[n][2]", "(new-array int n 2)");
		parse("new String[]{\"a\", \"b\"}", "[\"a\" \"b\"]");
		parse("{1, {2, 3},}", "[1 [2 3]]");
	}

	#[test]
	fn parse_casts() {
		parse("(int) x + 1", "(+ (cast int x) 1)");
		parse("(double) (a / b)", "(cast double (/ a b))");
		parse("(a) - b", "(- a b)");
	}

	#[test]
	fn parse_unknown_primary() {
		parse("int", "?INT:int");
	}

	#[test]
	fn parse_missing_close_paren() {
		let mut parser = Parser::new(Scanner::new("(1 + 2").scan_tokens());
		assert!(parser.parse_expression().is_err());
	}
}
