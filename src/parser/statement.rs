//! Statements. Bodies of `if`, `else`, loops and `do` may be a block or a
//! single statement; both are stored as a statement list.

use super::Parser;
use crate::{
	ast::{BinaryOperator, CatchClause, Expression, Param, Position, Statement, SwitchCase},
	error::parser::{ParseErrorType, ParserError},
	scanner::TokenType::*,
};
use tracing::debug;

impl<'a> Parser<'a> {
	pub(super) fn statement(&mut self) -> Result<Statement, ParserError> {
		let token = self.peek(0);
		let position = Position::from(&token);
		match token.r#type {
			LeftBrace => Ok(Statement::Block(self.block()?)),
			If => self.if_statement(),
			While => {
				self.advance();
				let condition = self.condition()?;
				let body = self.body()?;
				Ok(Statement::While { condition, body, position })
			}
			Do => {
				self.advance();
				let body = self.body()?;
				self.expect(While, "'while' after do body")?;
				let condition = self.condition()?;
				self.expect(Semicolon, "';' after do-while")?;
				Ok(Statement::DoWhile { body, condition, position })
			}
			For => self.for_statement(),
			Switch => self.switch_statement(),
			Try => self.try_statement(),
			Return => {
				self.advance();
				let value = if self.check(Semicolon) { None } else { Some(self.expression()?) };
				self.expect(Semicolon, "';' after return")?;
				Ok(Statement::Return { value, position })
			}
			Break | Continue => {
				self.advance();
				// Labels are accepted and dropped.
				self.match_token(Identifier);
				self.expect(Semicolon, "';'")?;
				Ok(if token.is(Break) { Statement::Break(position) } else { Statement::Continue(position) })
			}
			Throw => {
				self.advance();
				let value = self.expression()?;
				self.expect(Semicolon, "';' after throw")?;
				Ok(Statement::Throw { value, position })
			}
			Semicolon => {
				self.advance();
				Ok(Statement::Block(Vec::new()))
			}
			Assert | Synchronized | Goto => self.unsupported_statement(),
			_ if self.is_declaration_start() => {
				let declaration = self.local_declaration()?;
				self.expect(Semicolon, "';' after variable declaration")?;
				Ok(declaration)
			}
			_ => {
				let statement = self.simple_statement()?;
				self.expect(Semicolon, "';' after statement")?;
				Ok(statement)
			}
		}
	}

	/// A block or a single statement.
	fn body(&mut self) -> Result<Vec<Statement>, ParserError> {
		if self.check(LeftBrace) { self.block() } else { Ok(vec![self.statement()?]) }
	}

	/// `( expression )`
	fn condition(&mut self) -> Result<Expression, ParserError> {
		self.expect(LeftParen, "'('")?;
		let condition = self.expression()?;
		self.expect(RightParen, "')'")?;
		Ok(condition)
	}

	fn if_statement(&mut self) -> Result<Statement, ParserError> {
		let position = Position::from(&self.expect(If, "'if'")?);
		let condition = self.condition()?;
		let then_branch = self.body()?;
		let else_branch = if self.match_token(Else) {
			Some(Box::new(match self.peek(0).r#type {
				If => self.if_statement()?,
				LeftBrace => Statement::Block(self.block()?),
				_ => self.statement()?,
			}))
		} else {
			None
		};
		Ok(Statement::If { condition, then_branch, else_branch, position })
	}

	/// A local declaration without its terminating `;`.
	fn local_declaration(&mut self) -> Result<Statement, ParserError> {
		let modifiers = self.modifiers();
		let ty = self.parse_type()?;
		Ok(Statement::Declaration(self.declarators(&ty, &modifiers)?))
	}

	/// Assignment, compound assignment or expression, without the `;`.
	/// `x op= y` becomes `x = x op y`.
	pub(super) fn simple_statement(&mut self) -> Result<Statement, ParserError> {
		let target = self.expression()?;
		let position = target.position();
		let token = self.peek(0);
		if token.is(Equal) {
			self.advance();
			let value = self.variable_initializer()?;
			return Ok(Statement::Assign { target, value, position });
		}
		if let Some(operator) = BinaryOperator::from_compound(token.r#type) {
			self.advance();
			let operand = self.expression()?;
			let value = Expression::binary(operator, target.clone(), operand);
			return Ok(Statement::Assign { target, value, position });
		}
		Ok(Statement::Expression(target))
	}

	/// Comma separated simple statements, as in a `for` header.
	fn simple_statements(&mut self) -> Result<Vec<Statement>, ParserError> {
		let mut statements = vec![self.simple_statement()?];
		while self.match_token(Comma) {
			statements.push(self.simple_statement()?);
		}
		Ok(statements)
	}

	fn for_statement(&mut self) -> Result<Statement, ParserError> {
		let position = Position::from(&self.expect(For, "'for'")?);
		self.expect(LeftParen, "'(' after for")?;

		if self.is_for_each() {
			self.modifiers();
			let ty = self.parse_type()?;
			let token = self.expect(Identifier, "loop variable")?;
			let variable = Param { ty, name: token.lexeme.to_string(), position: Position::from(&token) };
			self.expect(Colon, "':' in for-each")?;
			let iterable = self.expression()?;
			self.expect(RightParen, "')' after for-each header")?;
			let body = self.body()?;
			return Ok(Statement::ForEach { variable, iterable, body, position });
		}

		let init = if self.check(Semicolon) {
			Vec::new()
		} else if self.is_declaration_start() {
			vec![self.local_declaration()?]
		} else {
			self.simple_statements()?
		};
		self.for_separator("initializer")?;
		let condition = if self.check(Semicolon) { None } else { Some(self.expression()?) };
		self.for_separator("condition")?;
		let update = if self.check(RightParen) { Vec::new() } else { self.simple_statements()? };
		self.expect(RightParen, "')' after for header")?;
		let body = self.body()?;
		Ok(Statement::For { init, condition, update, body, position })
	}

	fn for_separator(&mut self, after: &str) -> Result<(), ParserError> {
		let token = self.peek(0);
		match token.r#type {
			Semicolon => {
				self.advance();
				Ok(())
			}
			Eof => Err(self.expected(&token, &format!("';' after for {after}"))),
			_ => Err(self.error(&token, ParseErrorType::ForHeaderSemicolon {
				after: after.to_string(),
				found: token.lexeme.to_string(),
			})),
		}
	}

	/// A statement kept only as its text: everything up to a `;` or the
	/// `}` closing a block opened along the way.
	fn unsupported_statement(&mut self) -> Result<Statement, ParserError> {
		let position = Position::from(&self.peek(0));
		let mut text = String::new();
		let mut depth = 0usize;
		loop {
			let token = self.peek(0);
			match token.r#type {
				Eof => return Err(self.error(&token, ParseErrorType::UnclosedBlock)),
				RightBrace if depth == 0 => return Err(self.expected(&token, "';' after statement")),
				_ => {}
			}
			self.advance();
			if !text.is_empty() && !matches!(token.r#type, Semicolon | Comma | Dot | RightParen | LeftBracket)
				&& !text.ends_with(['(', '.'])
			{
				text.push(' ');
			}
			text.push_str(token.lexeme);
			match token.r#type {
				LeftBrace => depth += 1,
				RightBrace => {
					depth -= 1;
					if depth == 0 {
						break;
					}
				}
				Semicolon if depth == 0 => break,
				_ => {}
			}
		}
		debug!(line = position.line, "kept unsupported statement as text");
		Ok(Statement::Unknown { text, position })
	}

	/// A `:` at parenthesis depth zero before the first `;` or closing `)`.
	fn is_for_each(&self) -> bool {
		let mut depth = 0usize;
		let mut offset = 0;
		loop {
			match self.peek(offset).r#type {
				Colon if depth == 0 => return true,
				Semicolon | Eof => return false,
				Question if depth == 0 => return false,
				LeftParen => depth += 1,
				RightParen if depth == 0 => return false,
				RightParen => depth -= 1,
				_ => {}
			}
			offset += 1;
		}
	}

	fn switch_statement(&mut self) -> Result<Statement, ParserError> {
		let position = Position::from(&self.expect(Switch, "'switch'")?);
		let scrutinee = self.condition()?;
		self.expect(LeftBrace, "'{' after switch")?;
		let mut cases = Vec::new();
		loop {
			let token = self.peek(0);
			let label = match token.r#type {
				RightBrace => {
					self.advance();
					break;
				}
				Eof => return Err(self.error(&token, ParseErrorType::UnclosedBlock)),
				Case => {
					self.advance();
					Some(self.expression()?)
				}
				Default => {
					self.advance();
					None
				}
				_ => return Err(self.expected(&token, "'case' or 'default'")),
			};
			self.expect(Colon, "':' after case label")?;
			let mut body = Vec::new();
			while !matches!(self.peek(0).r#type, Case | Default | RightBrace | Eof) {
				body.push(self.statement()?);
			}
			cases.push(SwitchCase { label, body, position: Position::from(&token) });
		}
		Ok(Statement::Switch { scrutinee, cases, position })
	}

	fn try_statement(&mut self) -> Result<Statement, ParserError> {
		let position = Position::from(&self.expect(Try, "'try'")?);
		let body = self.block()?;
		let mut catches = Vec::new();
		while self.check(Catch) {
			let catch_position = Position::from(&self.advance());
			self.expect(LeftParen, "'(' after catch")?;
			self.modifiers();
			let ty = self.parse_type()?;
			let token = self.expect(Identifier, "exception variable")?;
			self.expect(RightParen, "')' after catch parameter")?;
			let parameter = Some(Param { ty, name: token.lexeme.to_string(), position: Position::from(&token) });
			catches.push(CatchClause { parameter, body: self.block()?, position: catch_position });
		}
		let finally = if self.match_token(Finally) { Some(self.block()?) } else { None };
		Ok(Statement::Try { body, catches, finally, position })
	}
}

#[cfg(test)]
mod tests {
	use super::super::tests::{parse_error, parse_unit};
	use crate::{
		ast::{Member, Statement},
		error::parser::ParseErrorType,
	};

	/// Parse `body` as the body of a method and return its statements.
	fn parse_body(body: &str) -> Vec<Statement> {
		let mut unit = parse_unit(&format!("class T {{ void run() {{ {body} }} }}"));
		match unit.classes.remove(0).members.remove(0) {
			Member::Method(method) => method.body.unwrap(),
			other => panic!("expected a method, got {other:?}"),
		}
	}

	fn parse_one(body: &str) -> Statement {
		let mut statements = parse_body(body);
		assert_eq!(statements.len(), 1, "{statements:?}");
		statements.remove(0)
	}

	#[test]
	fn parse_local_declarations() {
		let Statement::Declaration(vars) = parse_one("int a = 1, b, c[] = {2};") else { panic!() };
		let shapes: Vec<_> = vars.iter().map(|v| (v.ty.as_str(), v.name.as_str())).collect();
		assert_eq!(shapes, vec![("int", "a"), ("int", "b"), ("int[]", "c")]);

		assert!(matches!(parse_one("List<String> names = new ArrayList<>();"), Statement::Declaration(_)));
		assert!(matches!(parse_one("final String s = \"x\";"), Statement::Declaration(_)));
		assert!(matches!(parse_one("a.b.C value;"), Statement::Declaration(_)));
	}

	#[test]
	fn parse_expression_statements() {
		assert!(matches!(parse_one("x = 1;"), Statement::Assign { .. }));
		assert!(matches!(parse_one("foo.bar(1);"), Statement::Expression(_)));
		assert!(matches!(parse_one("i++;"), Statement::Expression(_)));
		assert!(matches!(parse_one("a[i] = 3;"), Statement::Assign { .. }));
	}

	#[test]
	fn parse_compound_assignment_desugars() {
		let Statement::Assign { target, value, .. } = parse_one("total += price * 2;") else { panic!() };
		assert_eq!(target.to_string(), "total");
		assert_eq!(value.to_string(), "(+ total (* price 2))");

		let Statement::Assign { value, .. } = parse_one("bits >>>= 1;") else { panic!() };
		assert_eq!(value.to_string(), "(>>> bits 1)");
	}

	#[test]
	fn parse_if_chains() {
		let Statement::If { else_branch, .. } = parse_one("if (a) { x = 1; } else if (b) x = 2; else { x = 3; }")
		else {
			panic!()
		};
		let Some(else_branch) = else_branch else { panic!() };
		let Statement::If { then_branch, else_branch, .. } = *else_branch else { panic!() };
		assert_eq!(then_branch.len(), 1);
		assert!(matches!(else_branch.as_deref(), Some(Statement::Block(b)) if b.len() == 1));
	}

	#[test]
	fn parse_braceless_if_keeps_following_statement() {
		let statements = parse_body("if (x > 0) return 1; return 0;");
		assert_eq!(statements.len(), 2);
		assert!(matches!(&statements[0], Statement::If { then_branch, .. } if then_branch.len() == 1));
	}

	#[test]
	fn parse_loops() {
		let Statement::For { init, condition, update, body, .. } = parse_one("for (int i = 0; i < n; i++) { s += i; }")
		else {
			panic!()
		};
		assert!(matches!(init.as_slice(), [Statement::Declaration(_)]));
		assert_eq!(condition.unwrap().to_string(), "(< i n)");
		assert_eq!(update.len(), 1);
		assert_eq!(body.len(), 1);

		let Statement::For { init, condition, update, .. } = parse_one("for (i = 0, j = 9; ; i += 2, j--) {}") else {
			panic!()
		};
		assert_eq!(init.len(), 2);
		assert!(condition.is_none());
		assert_eq!(update.len(), 2);

		let Statement::ForEach { variable, iterable, .. } = parse_one("for (String s : names) print(s);") else {
			panic!()
		};
		assert_eq!((variable.ty.as_str(), variable.name.as_str()), ("String", "s"));
		assert_eq!(iterable.to_string(), "names");

		assert!(matches!(parse_one("while (true) x++;"), Statement::While { .. }));
		assert!(matches!(parse_one("do { x--; } while (x > 0);"), Statement::DoWhile { .. }));
	}

	#[test]
	fn parse_switch() {
		let Statement::Switch { scrutinee, cases, .. } =
			parse_one("switch (day) { case 1: case 2: x = 1; break; default: x = 0; }")
		else {
			panic!()
		};
		assert_eq!(scrutinee.to_string(), "day");
		let shapes: Vec<_> = cases.iter().map(|c| (c.label.as_ref().map(|l| l.to_string()), c.body.len())).collect();
		assert_eq!(shapes, vec![(Some("1".to_string()), 0), (Some("2".to_string()), 2), (None, 1)]);
	}

	#[test]
	fn parse_try() {
		let Statement::Try { catches, finally, .. } =
			parse_one("try { risky(); } catch (IOException e) { log(e); } catch (Exception e) {} finally { close(); }")
		else {
			panic!()
		};
		let types: Vec<_> = catches.iter().map(|c| c.parameter.as_ref().unwrap().ty.as_str()).collect();
		assert_eq!(types, vec!["IOException", "Exception"]);
		assert_eq!(finally.unwrap().len(), 1);
	}

	#[test]
	fn parse_jumps() {
		let statements = parse_body("return; return x + 1; break; continue outer; throw new Error(\"bad\"); ;");
		assert!(matches!(statements[0], Statement::Return { value: None, .. }));
		assert!(matches!(statements[1], Statement::Return { value: Some(_), .. }));
		assert!(matches!(statements[2], Statement::Break(_)));
		assert!(matches!(statements[3], Statement::Continue(_)));
		assert!(matches!(statements[4], Statement::Throw { .. }));
		assert!(matches!(&statements[5], Statement::Block(b) if b.is_empty()));
	}

	#[test]
	fn parse_unsupported_statements_as_text() {
		let statements = parse_body("assert x > 0 : \"neg\"; synchronized (lock) { n++; } n = 1;");
		assert_eq!(statements.len(), 3);
		assert!(matches!(&statements[0], Statement::Unknown { text, .. } if text == "assert x > 0 : \"neg\";"));
		assert!(matches!(&statements[1], Statement::Unknown { text, .. } if text == "synchronized (lock) { n ++; }"));
		assert!(matches!(statements[2], Statement::Assign { .. }));
	}

	#[test]
	fn parse_for_header_needs_both_semicolons() {
		let error = parse_error("class T { void run() { for (int i = 0 i < 3; i++) {} } }");
		assert_eq!(error.r#type, ParseErrorType::ForHeaderSemicolon { after: "initializer".into(), found: "i".into() });

		let error = parse_error("class T { void run() { for (;i < 3 i++) {} } }");
		assert_eq!(error.r#type, ParseErrorType::ForHeaderSemicolon { after: "condition".into(), found: "i".into() });
	}
}
