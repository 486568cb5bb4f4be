//! The `Scanner` use `Lexical grammar`, implement `alphabet` as `Characters`.
//! The `Parser` use `Syntactic grammar`, implement `alphabet` as `Tokens`.
//!
//! Recursive descent for declarations and statements, precedence climbing for
//! binary expressions. Class members are told apart by lookahead that never
//! consumes: after the modifiers, `Name (` with the class's own name starts a
//! constructor, `Type name (` a method and anything else a field.
//!
//! |Name|Operators|Precedence
//! --|--|--
//! Multiplicative|* / %|60
//! Additive|+ -|50
//! Relational|< > <= >=|40
//! Equality|== !=|30
//! Logical and|&&|20
//! Logical or|\|\||10
//! Bitwise and shift|& \| ^ << >> >>>|5
//! Ternary|?:|lowest, right associative
//!
//! ``` BNF
//! unit        → ( modifier* "class" IDENT ( "extends" type )? classBody | ANY )* EOF ;
//! classBody   → "{" ( field | method | constructor | block | ";" )* "}" ;
//! method      → modifier* type IDENT "(" params? ")" ( "throws" types )? ( block | ";" ) ;
//! constructor → modifier* CLASSNAME "(" params? ")" ( "throws" types )? block ;
//! field       → modifier* type declarator ( "," declarator )* ";" ;
//! declarator  → IDENT ( "[" "]" )* ( "=" initializer )? ;
//! initializer → arrayInit | expression ;
//! ```

mod expression;
mod statement;

use anyhow::anyhow;
use tracing::{debug, warn};

use crate::{
	JpyerError,
	ast::{
		ClassDecl, CompilationUnit, ConstructorDecl, Expression, Member, MethodDecl, Modifier, Param, Position, Statement,
		VarDecl,
	},
	error::parser::{ParseError, ParseErrorType, ParserError},
	scanner::{
		Token, TokenStream,
		TokenType::{self, *},
	},
};

/// Builds a `CompilationUnit` from tokens, stopping at the first syntax
/// error.
pub struct Parser<'a> {
	/// The tokens to parse.
	tokens: TokenStream<'a>,
	/// Name of the class whose body is being parsed, constructors are
	/// recognised by it.
	class:  Option<String>,
}

impl<'a> Parser<'a> {
	pub fn new(tokens: Vec<Token<'a>>) -> Self { Self { tokens: TokenStream::new(tokens), class: None } }

	pub fn parse(&mut self) -> Result<CompilationUnit, JpyerError> {
		match self.compilation_unit() {
			Ok(unit) => {
				debug!(classes = unit.classes.len(), "parsed compilation unit");
				Ok(unit)
			}
			Err(ParserError::InternalError(e)) => Err(e.into()),
			Err(ParserError::ParseError(e)) => Err(e.into()),
		}
	}

	fn compilation_unit(&mut self) -> Result<CompilationUnit, ParserError> {
		let mut unit = CompilationUnit { classes: Vec::new() };
		while !self.tokens.is_at_end() {
			let offset = self.modifiers_length(0);
			if self.peek(offset).is(Class) {
				unit.classes.push(self.class_declaration()?);
			} else {
				// Package and import statements and anything else outside a class.
				self.advance();
			}
		}
		Ok(unit)
	}

	fn class_declaration(&mut self) -> Result<ClassDecl, ParserError> {
		let modifiers = self.modifiers();
		let position = Position::from(&self.expect(Class, "'class'")?);
		let name = self.expect(Identifier, "class name")?.lexeme.to_string();
		if self.check(Less) {
			self.generic_suffix()?;
		}
		let base = if self.match_token(Extends) { Some(self.parse_type()?) } else { None };
		if self.match_token(Implements) {
			self.parse_type()?;
			while self.match_token(Comma) {
				self.parse_type()?;
			}
		}
		self.expect(LeftBrace, "'{' after class header")?;

		let enclosing = self.class.replace(name.clone());
		let members = self.class_body(&name);
		self.class = enclosing;

		Ok(ClassDecl { name, modifiers, base, members: members?, position })
	}

	fn class_body(&mut self, name: &str) -> Result<Vec<Member>, ParserError> {
		let mut members = Vec::new();
		loop {
			let token = self.peek(0);
			match token.r#type {
				RightBrace => {
					self.advance();
					return Ok(members);
				}
				Eof => {
					return Err(self.error(&token, ParseErrorType::UnclosedClassBody(name.to_string())));
				}
				Semicolon => {
					self.advance();
				}
				_ => self.member(&mut members)?,
			}
		}
	}

	fn member(&mut self, members: &mut Vec<Member>) -> Result<(), ParserError> {
		let offset = self.modifiers_length(0);
		let token = self.peek(offset);
		if token.is(LeftBrace) {
			self.modifiers();
			members.push(Member::Initializer(self.block()?));
		} else if token.is(Class) {
			let nested = self.class_declaration()?;
			warn!(class = %nested.name, line = nested.position.line, "nested classes are not translated");
		} else if self.is_constructor_start(offset) {
			members.push(Member::Constructor(self.constructor()?));
		} else if self.is_method_start(offset) {
			members.push(Member::Method(self.method()?));
		} else {
			let modifiers = self.modifiers();
			let ty = self.parse_type()?;
			members.extend(self.declarators(&ty, &modifiers)?.into_iter().map(Member::Field));
			self.expect(Semicolon, "';' after field declaration")?;
		}
		Ok(())
	}

	/// `modifiers Name (` where `Name` is the enclosing class.
	fn is_constructor_start(&self, offset: usize) -> bool {
		let token = self.peek(offset);
		token.is(Identifier) && self.class.as_deref() == Some(token.lexeme) && self.peek(offset + 1).is(LeftParen)
	}

	/// `modifiers <T>? Type name (`
	fn is_method_start(&self, mut offset: usize) -> bool {
		if self.peek(offset).is(Less) {
			match self.generic_length(offset) {
				Some(length) => offset += length,
				None => return false,
			}
		}
		let length = if self.peek(offset).is(Void) { Some(1) } else { self.type_length(offset) };
		match length {
			Some(length) => self.peek(offset + length).is(Identifier) && self.peek(offset + length + 1).is(LeftParen),
			None => false,
		}
	}

	fn method(&mut self) -> Result<MethodDecl, ParserError> {
		let modifiers = self.modifiers();
		if self.check(Less) {
			self.generic_suffix()?;
		}
		let position = Position::from(&self.peek(0));
		let return_type = if self.match_token(Void) { "void".to_string() } else { self.parse_type()? };
		let name = self.expect(Identifier, "method name")?.lexeme.to_string();
		let params = self.parameters()?;
		self.throws_clause()?;
		let body = if self.match_token(Semicolon) { None } else { Some(self.block()?) };
		Ok(MethodDecl { name, return_type, modifiers, params, body, position })
	}

	fn constructor(&mut self) -> Result<ConstructorDecl, ParserError> {
		let modifiers = self.modifiers();
		let token = self.expect(Identifier, "constructor name")?;
		let params = self.parameters()?;
		self.throws_clause()?;
		let body = self.block()?;
		Ok(ConstructorDecl { name: token.lexeme.to_string(), modifiers, params, body, position: Position::from(&token) })
	}

	fn throws_clause(&mut self) -> Result<(), ParserError> {
		if self.match_token(Throws) {
			self.parse_type()?;
			while self.match_token(Comma) {
				self.parse_type()?;
			}
		}
		Ok(())
	}

	fn parameters(&mut self) -> Result<Vec<Param>, ParserError> {
		self.expect(LeftParen, "'(' before parameters")?;
		let mut params = Vec::new();
		if !self.check(RightParen) {
			loop {
				self.modifiers();
				let mut ty = self.parse_type()?;
				let token = self.expect(Identifier, "parameter name")?;
				while self.check(LeftBracket) && self.peek(1).is(RightBracket) {
					self.advance();
					self.advance();
					ty.push_str("[]");
				}
				params.push(Param { ty, name: token.lexeme.to_string(), position: Position::from(&token) });
				if !self.match_token(Comma) {
					break;
				}
			}
		}
		self.expect(RightParen, "')' after parameters")?;
		Ok(params)
	}

	/// `name ([])* (= initializer)? (, ...)*` sharing one declared type.
	fn declarators(&mut self, ty: &str, modifiers: &[Modifier]) -> Result<Vec<VarDecl>, ParserError> {
		let mut vars = Vec::new();
		loop {
			let token = self.expect(Identifier, "variable name")?;
			let mut ty = ty.to_string();
			while self.check(LeftBracket) && self.peek(1).is(RightBracket) {
				self.advance();
				self.advance();
				ty.push_str("[]");
			}
			let init = if self.match_token(Equal) { Some(self.variable_initializer()?) } else { None };
			vars.push(VarDecl {
				ty,
				name: token.lexeme.to_string(),
				modifiers: modifiers.to_vec(),
				init,
				position: Position::from(&token),
			});
			if !self.match_token(Comma) {
				return Ok(vars);
			}
		}
	}

	/// `{ statements }`
	fn block(&mut self) -> Result<Vec<Statement>, ParserError> {
		self.expect(LeftBrace, "'{'")?;
		let mut statements = Vec::new();
		loop {
			let token = self.peek(0);
			match token.r#type {
				RightBrace => {
					self.advance();
					return Ok(statements);
				}
				Eof => return Err(self.error(&token, ParseErrorType::UnclosedBlock)),
				_ => statements.push(self.statement()?),
			}
		}
	}

	/// Collect declaration modifiers. Other modifier keywords and annotations
	/// are skipped.
	fn modifiers(&mut self) -> Vec<Modifier> {
		let mut modifiers = Vec::new();
		let length = self.modifiers_length(0);
		for _ in 0..length {
			if let Some(modifier) = Modifier::from_token(self.advance().r#type) {
				modifiers.push(modifier);
			}
		}
		modifiers
	}

	/// Number of modifier and annotation tokens starting at `offset`.
	fn modifiers_length(&self, offset: usize) -> usize {
		let mut length = 0;
		loop {
			let token = self.peek(offset + length);
			if token.r#type.is_modifier() || matches!(token.r#type, Synchronized | Native | Transient | Volatile | Strictfp) {
				length += 1;
			} else if token.is(At) && self.peek(offset + length + 1).is(Identifier) {
				length += 2;
				if self.peek(offset + length).is(LeftParen) {
					match self.balanced_length(offset + length, LeftParen, RightParen) {
						Some(skip) => length += skip,
						None => return length,
					}
				}
			} else {
				return length;
			}
		}
	}

	/// Tokens from an opening delimiter to its matching closer, inclusive.
	fn balanced_length(&self, offset: usize, open: TokenType, close: TokenType) -> Option<usize> {
		let mut depth = 0usize;
		let mut length = 0;
		loop {
			let token = self.peek(offset + length);
			length += 1;
			if token.is(open) {
				depth += 1;
			} else if token.is(close) {
				depth -= 1;
				if depth == 0 {
					return Some(length);
				}
			} else if token.is(Eof) {
				return None;
			}
		}
	}

	/// Length of a `<...>` type argument list at `offset`. `>>` and `>>>`
	/// close several levels at once.
	fn generic_length(&self, offset: usize) -> Option<usize> {
		let mut depth = 0usize;
		let mut length = 0;
		loop {
			let token = self.peek(offset + length);
			length += 1;
			let closed = match token.r#type {
				Less => {
					depth += 1;
					0
				}
				Greater => 1,
				RightShift => 2,
				UnsignedRightShift => 3,
				Identifier | Comma | Question | Extends | Super | Dot | LeftBracket | RightBracket | Amp => 0,
				r#type if r#type.is_type_keyword() && r#type != Void => 0,
				_ => return None,
			};
			if closed > depth {
				return None;
			}
			depth -= closed;
			if depth == 0 {
				return Some(length);
			}
		}
	}

	/// Length of a type at `offset`: a primitive keyword or a qualified name,
	/// optional type arguments, then `[]` pairs or `...`.
	fn type_length(&self, offset: usize) -> Option<usize> {
		let first = self.peek(offset);
		if !(first.is(Identifier) || first.r#type.is_type_keyword() && !first.is(Void)) {
			return None;
		}
		let mut length = 1;
		while first.is(Identifier) && self.peek(offset + length).is(Dot) && self.peek(offset + length + 1).is(Identifier)
		{
			length += 2;
		}
		if self.peek(offset + length).is(Less) {
			length += self.generic_length(offset + length)?;
		}
		while self.peek(offset + length).is(LeftBracket) && self.peek(offset + length + 1).is(RightBracket) {
			length += 2;
		}
		if self.peek(offset + length).is(Ellipsis) {
			length += 1;
		}
		Some(length)
	}

	/// Consume a type and return its spelling without whitespace. Varargs
	/// `T...` is spelled `T[]`.
	fn parse_type(&mut self) -> Result<String, ParserError> {
		let Some(length) = self.type_length(0) else {
			let token = self.peek(0);
			return Err(self.expected(&token, "type"));
		};
		let mut ty = String::new();
		for _ in 0..length {
			let token = self.advance();
			ty.push_str(if token.is(Ellipsis) { "[]" } else { token.lexeme });
		}
		Ok(ty)
	}

	/// Consume a `<...>` suffix and return it without whitespace.
	fn generic_suffix(&mut self) -> Result<String, ParserError> {
		let Some(length) = self.generic_length(0) else {
			let token = self.peek(0);
			return Err(self.expected(&token, "type arguments"));
		};
		Ok((0..length).map(|_| self.advance().lexeme).collect())
	}

	/// `Type name` ahead, the start of a local variable declaration.
	fn is_declaration_start(&self) -> bool {
		let offset = self.modifiers_length(0);
		self.type_length(offset).is_some_and(|length| self.peek(offset + length).is(Identifier))
	}

	/// Peek the token `k` ahead of the current one.
	fn peek(&self, k: usize) -> Token<'a> { self.tokens.peek(k) }

	/// Advance to the next token.
	fn advance(&mut self) -> Token<'a> { self.tokens.advance() }

	fn check(&self, r#type: TokenType) -> bool { self.peek(0).is(r#type) }

	fn match_token(&mut self, r#type: TokenType) -> bool {
		let matched = self.check(r#type);
		if matched {
			self.advance();
		}
		matched
	}

	/// Consume a required token, `what` names it in the error.
	fn expect(&mut self, r#type: TokenType, what: &str) -> Result<Token<'a>, ParserError> {
		let token = self.peek(0);
		if token.is(r#type) {
			return Ok(self.advance());
		}
		Err(self.expected(&token, what))
	}

	fn expected(&self, token: &Token<'a>, what: &str) -> ParserError {
		let r#type = if token.is(Eof) {
			ParseErrorType::UnexpectedEof { expected: what.to_string() }
		} else {
			ParseErrorType::ExpectedToken { expected: what.to_string(), found: token.lexeme.to_string() }
		};
		self.error(token, r#type)
	}

	fn error(&self, token: &Token<'a>, r#type: ParseErrorType) -> ParserError {
		ParseError::new(token.line, token.column, r#type).into()
	}

	/// Parse a single expression, used by callers that only need one.
	pub fn parse_expression(&mut self) -> Result<Expression, JpyerError> {
		let expression = self.expression().map_err(|e| match e {
			ParserError::InternalError(e) => JpyerError::InternalError(e),
			ParserError::ParseError(e) => JpyerError::SyntaxError(e),
		})?;
		if !self.tokens.is_at_end() {
			let token = self.peek(0);
			return Err(anyhow!("trailing input at {}:{}: '{}'", token.line, token.column, token.lexeme).into());
		}
		Ok(expression)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scanner::Scanner;

	pub(super) fn parse_unit(input: &str) -> CompilationUnit {
		Parser::new(Scanner::new(input).scan_tokens()).parse().unwrap()
	}

	pub(super) fn parse_error(input: &str) -> ParseError {
		match Parser::new(Scanner::new(input).scan_tokens()).parse() {
			Err(JpyerError::SyntaxError(e)) => e,
			other => panic!("expected a syntax error, got {other:?}"),
		}
	}

	#[test]
	fn parse_empty_class() {
		let unit = parse_unit("public class Hello {}");
		assert_eq!(unit.classes.len(), 1);
		assert_eq!(unit.classes[0].name, "Hello");
		assert_eq!(unit.classes[0].modifiers, vec![Modifier::Public]);
		assert!(unit.classes[0].members.is_empty());
	}

	#[test]
	fn parse_skips_top_level_noise() {
		let unit = parse_unit("package a.b; import java.util.List; class A {} ; class B extends A {}");
		let names: Vec<_> = unit.classes.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, vec!["A", "B"]);
		assert_eq!(unit.classes[1].base.as_deref(), Some("A"));
	}

	#[test]
	fn parse_members() {
		let unit = parse_unit(
			"class Point {
				private int x, y = 2;
				static final List<List<String>> names = List.of();
				Point(int x) { this.x = x; }
				public int getX() { return x; }
				abstract void draw();
				{ x = 1; }
			}",
		);
		let class = &unit.classes[0];
		let fields: Vec<_> = class.fields().map(|f| (f.ty.as_str(), f.name.as_str(), f.init.is_some())).collect();
		assert_eq!(fields, vec![("int", "x", false), ("int", "y", true), ("List<List<String>>", "names", true)]);
		assert!(class.fields().nth(2).unwrap().is_static());
		assert_eq!(class.constructors().count(), 1);
		let methods: Vec<_> = class.methods().map(|m| (m.name.as_str(), m.return_type.as_str(), m.body.is_some())).collect();
		assert_eq!(methods, vec![("getX", "int", true), ("draw", "void", false)]);
		assert!(matches!(class.members.last(), Some(Member::Initializer(body)) if body.len() == 1));
	}

	#[test]
	fn parse_method_signatures() {
		let unit = parse_unit(
			"class A {
				@Override public String toString() { return \"A\"; }
				public static void main(String[] args) throws Exception {}
				int sum(int... values) { return 0; }
				<T> T first(List<T> items, int matrix[][]) { return null; }
			}",
		);
		let class = &unit.classes[0];
		let main = class.methods().nth(1).unwrap();
		assert!(main.is_entry_point());
		let sum = class.methods().nth(2).unwrap();
		assert_eq!(sum.params[0].ty, "int[]");
		let first = class.methods().nth(3).unwrap();
		assert_eq!(first.return_type, "T");
		let params: Vec<_> = first.params.iter().map(|p| p.ty.as_str()).collect();
		assert_eq!(params, vec!["List<T>", "int[][]"]);
	}

	#[test]
	fn parse_array_fields() {
		let unit = parse_unit("class A { int[] a = {1, 2}; int[] b = new int[]{3}; int[][] c = new int[2][]; }");
		let inits: Vec<_> = unit.classes[0].fields().map(|f| f.init.as_ref().unwrap().to_string()).collect();
		assert_eq!(inits, vec!["[1 2]", "[3]", "(new-array int 2 [])"]);
	}

	#[test]
	fn parse_unclosed_class_body() {
		let error = parse_error("class Broken { int x;");
		assert_eq!(error.r#type, ParseErrorType::UnclosedClassBody("Broken".into()));
	}

	#[test]
	fn parse_unclosed_block() {
		let error = parse_error("class A { void f() { int x = 1;");
		assert_eq!(error.r#type, ParseErrorType::UnclosedBlock);
	}

	#[test]
	fn parse_missing_semicolon_reports_position() {
		let error = parse_error("class A {\n  int x = 1\n}");
		assert_eq!((error.line, error.column), (3, 1));
		assert_eq!(error.r#type, ParseErrorType::ExpectedToken {
			expected: "';' after field declaration".into(),
			found:    "}".into(),
		});
	}

	#[test]
	fn parse_no_classes() {
		assert!(parse_unit("int x = 1;").classes.is_empty());
		assert!(parse_unit("").classes.is_empty());
	}
}
