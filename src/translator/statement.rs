use tracing::trace;

use super::{
	Translator,
	types::{default_value, escape_name, exception_type},
};
use crate::ast::{
	BinaryOperator, CatchClause, Expression, PostfixOperator, PrefixOperator, Statement, SwitchCase, VarDecl,
};

/// What `break` and `continue` leave or restart, innermost last.
#[derive(Debug, Clone)]
pub(super) enum Jump {
	Loop,
	/// Restarting re-checks the condition at the bottom.
	DoWhile(Expression),
	/// A `for` lowered to `while`, restarting runs the update first.
	For(Vec<Statement>),
	Switch,
}

/// A `for` header that iterates a `range`.
struct Counted<'a> {
	variable: &'a str,
	ty:       &'a str,
	start:    &'a Expression,
	end:      &'a Expression,
	operator: BinaryOperator,
	step:     i64,
}

/// The step of `i++`, `i--`, `i += n` or `i -= n` for an integer literal `n`.
fn step(update: &Statement, variable: &str) -> Option<i64> {
	match update {
		Statement::Expression(
			Expression::Prefix { operator: PrefixOperator::Increment, operand, .. }
			| Expression::Postfix { operator: PostfixOperator::Increment, operand, .. },
		) if operand.as_identifier() == Some(variable) => Some(1),
		Statement::Expression(
			Expression::Prefix { operator: PrefixOperator::Decrement, operand, .. }
			| Expression::Postfix { operator: PostfixOperator::Decrement, operand, .. },
		) if operand.as_identifier() == Some(variable) => Some(-1),
		Statement::Assign { target, value: Expression::Binary { operator, left, right, .. }, .. }
			if target.as_identifier() == Some(variable) && left.as_identifier() == Some(variable) =>
		{
			let n: i64 = right.as_literal()?.parse().ok()?;
			match operator {
				BinaryOperator::Add => Some(n),
				BinaryOperator::Sub => n.checked_neg(),
				_ => None,
			}
		}
		_ => None,
	}
}

/// Recognise `for (int i = a; i < b; i += s)` over an integral counter where
/// the step moves toward the bound and the body leaves `i` alone.
fn counted<'a>(
	init: &'a [Statement],
	condition: Option<&'a Expression>,
	update: &[Statement],
	body: &[Statement],
) -> Option<Counted<'a>> {
	let [Statement::Declaration(declarations)] = init else { return None };
	let [declaration] = declarations.as_slice() else { return None };
	// `range` takes integers only, `char` included
	if !matches!(declaration.ty.as_str(), "int" | "long" | "short" | "byte") {
		return None;
	}
	let variable = declaration.name.as_str();
	let start = declaration.init.as_ref()?;
	let Some(Expression::Binary { operator, left, right: end, .. }) = condition else { return None };
	if left.as_identifier() != Some(variable) {
		return None;
	}
	let [update] = update else { return None };
	let step = step(update, variable)?;
	let ascending = match operator {
		BinaryOperator::Less | BinaryOperator::LessEqual => true,
		BinaryOperator::Greater | BinaryOperator::GreaterEqual => false,
		_ => return None,
	};
	if step == 0 || (step > 0) != ascending || body.iter().any(|statement| assigns(statement, variable)) {
		return None;
	}
	Some(Counted { variable, ty: &declaration.ty, start, end, operator: *operator, step })
}

/// Whether `statement` may store into `variable`.
fn assigns(statement: &Statement, variable: &str) -> bool {
	use Statement::*;
	let any = |statements: &[Statement]| statements.iter().any(|statement| assigns(statement, variable));
	match statement {
		Declaration(declarations) => declarations
			.iter()
			.any(|d| d.name == variable || d.init.as_ref().is_some_and(|init| mutates(init, variable))),
		Expression(expression) => mutates(expression, variable),
		Assign { target, value, .. } => {
			target.as_identifier() == Some(variable) || mutates(target, variable) || mutates(value, variable)
		}
		Block(statements) => any(statements),
		If { condition, then_branch, else_branch, .. } => {
			mutates(condition, variable)
				|| any(then_branch)
				|| else_branch.as_deref().is_some_and(|branch| assigns(branch, variable))
		}
		While { condition, body, .. } | DoWhile { body, condition, .. } => mutates(condition, variable) || any(body),
		For { init, condition, update, body, .. } => {
			any(init)
				|| condition.as_ref().is_some_and(|condition| mutates(condition, variable))
				|| any(update)
				|| any(body)
		}
		ForEach { variable: each, iterable, body, .. } => {
			each.name == variable || mutates(iterable, variable) || any(body)
		}
		Switch { scrutinee, cases, .. } => mutates(scrutinee, variable) || cases.iter().any(|case| any(&case.body)),
		Try { body, catches, finally, .. } => {
			any(body) || catches.iter().any(|catch| any(&catch.body)) || finally.as_deref().is_some_and(|f| any(f))
		}
		Return { value, .. } => value.as_ref().is_some_and(|value| mutates(value, variable)),
		Throw { value, .. } => mutates(value, variable),
		Break(_) | Continue(_) | Unknown { .. } => false,
	}
}

/// Whether `expression` increments or decrements `variable` somewhere.
fn mutates(expression: &Expression, variable: &str) -> bool {
	use Expression::*;
	let any = |expressions: &[Expression]| expressions.iter().any(|expression| mutates(expression, variable));
	match expression {
		Prefix { operator: PrefixOperator::Increment | PrefixOperator::Decrement, operand, .. } | Postfix { operand, .. } => {
			operand.as_identifier() == Some(variable) || mutates(operand, variable)
		}
		Prefix { operand, .. } | Cast { operand, .. } => mutates(operand, variable),
		Member { object, .. } => mutates(object, variable),
		Call { callee, arguments, .. } => mutates(callee, variable) || any(arguments),
		Index { target, index, .. } => mutates(target, variable) || mutates(index, variable),
		New { arguments, .. } => any(arguments),
		NewArray { dimensions, .. } => any(dimensions),
		ArrayInit { elements, .. } => any(elements),
		Binary { left, right, .. } => mutates(left, variable) || mutates(right, variable),
		Ternary { condition, then_branch, else_branch, .. } => {
			mutates(condition, variable) || mutates(then_branch, variable) || mutates(else_branch, variable)
		}
		Literal { .. } | Identifier { .. } | Unknown { .. } => false,
	}
}

/// Labels a `case` can match on directly: literals and dotted names.
fn is_pattern(label: &Expression) -> bool {
	match label {
		Expression::Literal { .. } => true,
		Expression::Member { object, .. } => matches!(object.as_ref(), Expression::Identifier { .. }) || is_pattern(object),
		_ => false,
	}
}

/// An arm whose labels cannot all be written as patterns.
fn needs_guard(labels: &[Option<&Expression>]) -> bool {
	labels.iter().all(Option::is_some) && !labels.iter().flatten().all(|label| is_pattern(label))
}

impl Translator {
	pub(super) fn statements(&mut self, statements: &[Statement]) {
		for statement in statements {
			self.statement(statement);
		}
	}

	/// `name: type = value`, the zero value standing in for a missing
	/// initializer.
	pub(super) fn declaration(&mut self, declaration: &VarDecl) -> String {
		let ty = self.python_type(&declaration.ty);
		let value = match &declaration.init {
			Some(init) => self.expression(init),
			None => default_value(&ty).to_string(),
		};
		format!("{}: {ty} = {value}", escape_name(&declaration.name))
	}

	/// A suite holding `statements` in their own scope.
	fn block(&mut self, statements: &[Statement]) { self.suite(|t| t.scoped(Vec::new(), |t| t.statements(statements))); }

	fn loop_body(&mut self, jump: Jump, body: &[Statement]) {
		self.jumps.push(jump);
		self.block(body);
		self.jumps.pop();
	}

	fn statement(&mut self, statement: &Statement) {
		use Statement::*;
		match statement {
			Declaration(declarations) => {
				for declaration in declarations {
					let line = self.declaration(declaration);
					self.declare(&declaration.name, &declaration.ty);
					self.line(line);
				}
			}
			Expression(expression) => self.expression_statement(expression),
			Assign { target, value, .. } => self.assign(target, value),
			Block(statements) => self.scoped(Vec::new(), |t| t.statements(statements)),
			If { condition, then_branch, else_branch, .. } => {
				self.if_statement(condition, then_branch, else_branch.as_deref())
			}
			While { condition, body, .. } => {
				let condition = self.expression(condition);
				self.line(format!("while {condition}:"));
				self.loop_body(Jump::Loop, body);
			}
			DoWhile { body, condition, .. } => self.do_while(body, condition),
			For { init, condition, update, body, .. } => self.for_statement(init, condition.as_ref(), update, body),
			ForEach { variable, iterable, body, .. } => {
				let iterable = self.expression(iterable);
				self.line(format!("for {} in {iterable}:", escape_name(&variable.name)));
				self.scoped([(variable.name.clone(), variable.ty.clone())], |t| t.loop_body(Jump::Loop, body));
			}
			Switch { scrutinee, cases, .. } => self.switch(scrutinee, cases),
			Try { body, catches, finally, .. } => self.try_statement(body, catches, finally.as_deref()),
			Return { value: Some(value), .. } => {
				let value = self.expression(value);
				self.line(format!("return {value}"));
			}
			Return { value: None, .. } => self.line("return"),
			Break(_) if matches!(self.jumps.last(), Some(Jump::Switch)) => self.line("# Unknown node: break"),
			Break(_) => self.line("break"),
			Continue(_) => self.continue_statement(),
			Throw { value, .. } => {
				let value = self.expression(value);
				self.line(format!("raise {value}"));
			}
			Unknown { text, .. } => self.line(format!("# Unknown node: {text}")),
		}
	}

	fn expression_statement(&mut self, expression: &Expression) {
		match expression {
			Expression::Prefix { operator: PrefixOperator::Increment, operand, .. }
			| Expression::Postfix { operator: PostfixOperator::Increment, operand, .. } => {
				let target = self.expression(operand);
				self.line(format!("{target} += 1"));
			}
			Expression::Prefix { operator: PrefixOperator::Decrement, operand, .. }
			| Expression::Postfix { operator: PostfixOperator::Decrement, operand, .. } => {
				let target = self.expression(operand);
				self.line(format!("{target} -= 1"));
			}
			_ => {
				let text = self.expression(expression);
				self.line(text);
			}
		}
	}

	/// `x = x op y` comes back out as `x op= y`.
	fn assign(&mut self, target: &Expression, value: &Expression) {
		let place = self.expression(target);
		match value {
			Expression::Binary { operator: BinaryOperator::Add, left, right, .. }
				if left.same_place(target) && self.is_text(value) =>
			{
				let right = self.concatenated(right, 0);
				self.line(format!("{place} += {right}"));
			}
			Expression::Binary { operator, left, right, .. }
				if left.same_place(target) && (operator.is_arithmetic() || operator.is_bitwise()) =>
			{
				let right = self.expression(right);
				self.line(format!("{place} {}= {right}", Self::operator(*operator)));
			}
			_ => {
				let value = self.expression(value);
				self.line(format!("{place} = {value}"));
			}
		}
	}

	fn if_statement(&mut self, condition: &Expression, then_branch: &[Statement], else_branch: Option<&Statement>) {
		let condition = self.expression(condition);
		self.line(format!("if {condition}:"));
		self.block(then_branch);
		let mut next = else_branch;
		while let Some(branch) = next {
			next = None;
			match branch {
				Statement::If { condition, then_branch, else_branch, .. } => {
					let condition = self.expression(condition);
					self.line(format!("elif {condition}:"));
					self.block(then_branch);
					next = else_branch.as_deref();
				}
				Statement::Block(statements) => {
					self.line("else:");
					self.block(statements);
				}
				other => {
					self.line("else:");
					self.block(std::slice::from_ref(other));
				}
			}
		}
	}

	fn do_while(&mut self, body: &[Statement], condition: &Expression) {
		self.line("while True:");
		self.jumps.push(Jump::DoWhile(condition.clone()));
		self.indented(|t| {
			t.scoped(Vec::new(), |t| t.statements(body));
			let condition = t.expression(condition);
			t.line(format!("if not ({condition}):"));
			t.indented(|t| t.line("break"));
		});
		self.jumps.pop();
	}

	fn continue_statement(&mut self) {
		match self.jumps.iter().rev().find(|jump| !matches!(jump, Jump::Switch)).cloned() {
			Some(Jump::DoWhile(condition)) => {
				let condition = self.expression(&condition);
				self.line(format!("if {condition}:"));
				self.indented(|t| t.line("continue"));
				self.line("break");
			}
			Some(Jump::For(update)) => {
				self.statements(&update);
				self.line("continue");
			}
			_ => self.line("continue"),
		}
	}

	fn for_statement(
		&mut self,
		init: &[Statement],
		condition: Option<&Expression>,
		update: &[Statement],
		body: &[Statement],
	) {
		if let Some(counted) = counted(init, condition, update, body) {
			trace!(variable = counted.variable, step = counted.step, "for loop lowered to range");
			let start = self.expression(counted.start);
			let end = self.expression(counted.end);
			let end = match counted.operator {
				BinaryOperator::LessEqual => format!("({end}) + 1"),
				BinaryOperator::GreaterEqual => format!("({end}) - 1"),
				_ => end,
			};
			let step = if counted.step == 1 { String::new() } else { format!(", {}", counted.step) };
			self.line(format!("for {} in range({start}, {end}{step}):", escape_name(counted.variable)));
			let counter = (counted.variable.to_string(), counted.ty.to_string());
			self.scoped([counter], |t| t.loop_body(Jump::Loop, body));
			return;
		}

		trace!("for loop lowered to while");
		self.scoped(Vec::new(), |t| {
			t.statements(init);
			let condition = condition.map(|condition| t.expression(condition)).unwrap_or_else(|| "True".to_string());
			t.line(format!("while {condition}:"));
			t.jumps.push(Jump::For(update.to_vec()));
			t.suite(|t| {
				t.scoped(Vec::new(), |t| t.statements(body));
				t.statements(update);
			});
			t.jumps.pop();
		});
	}

	/// Each run of labels sharing a body becomes one arm. Trailing `break`s
	/// are dropped and the `default` arm moves last.
	fn switch(&mut self, scrutinee: &Expression, cases: &[SwitchCase]) {
		let mut arms: Vec<(Vec<Option<&Expression>>, &[Statement])> = Vec::new();
		let mut labels = Vec::new();
		for (i, case) in cases.iter().enumerate() {
			labels.push(case.label.as_ref());
			if case.body.is_empty() && i + 1 < cases.len() {
				continue;
			}
			arms.push((std::mem::take(&mut labels), case.body.as_slice()));
		}
		let (mut ordered, default): (Vec<_>, Vec<_>) =
			arms.into_iter().partition(|(labels, _)| labels.iter().all(Option::is_some));
		ordered.extend(default);

		// Guards compare against the subject again, so anything but a plain
		// name or constant is evaluated once up front.
		let guarded = ordered.iter().any(|(labels, _)| needs_guard(labels));
		let plain = matches!(scrutinee, Expression::Identifier { .. }) || is_pattern(scrutinee);
		let rendered = self.expression(scrutinee);
		let subject = if guarded && !plain {
			self.line(format!("match (_subject := {rendered}):"));
			"_subject".to_string()
		} else {
			self.line(format!("match {rendered}:"));
			rendered
		};

		self.jumps.push(Jump::Switch);
		self.indented(|t| {
			if ordered.is_empty() {
				t.line("case _:");
				t.indented(|t| t.line("pass"));
			}
			for (labels, body) in ordered {
				t.arm(&subject, &labels, body);
			}
		});
		self.jumps.pop();
	}

	fn arm(&mut self, subject: &str, labels: &[Option<&Expression>], body: &[Statement]) {
		let pattern = if labels.iter().any(Option::is_none) {
			"_".to_string()
		} else if !needs_guard(labels) {
			labels.iter().flatten().map(|label| self.expression(label)).collect::<Vec<_>>().join(" | ")
		} else {
			let tests: Vec<String> =
				labels.iter().flatten().map(|label| format!("{subject} == {}", self.expression(label))).collect();
			format!("_ if {}", tests.join(" or "))
		};
		let body = match body {
			[rest @ .., Statement::Break(_)] => rest,
			_ => body,
		};
		self.line(format!("case {pattern}:"));
		self.block(body);
	}

	fn try_statement(&mut self, body: &[Statement], catches: &[CatchClause], finally: Option<&[Statement]>) {
		self.line("try:");
		self.block(body);
		for catch in catches {
			match &catch.parameter {
				Some(parameter) => {
					let ty = match exception_type(&parameter.ty) {
						Some(builtin) => builtin.to_string(),
						None => self.python_type(&parameter.ty),
					};
					self.line(format!("except {ty} as {}:", escape_name(&parameter.name)));
					let caught = (parameter.name.clone(), parameter.ty.clone());
					self.suite(|t| t.scoped([caught], |t| t.statements(&catch.body)));
				}
				None => {
					self.line("except Exception:");
					self.block(&catch.body);
				}
			}
		}
		match finally {
			Some(finally) => {
				self.line("finally:");
				self.block(finally);
			}
			None if catches.is_empty() => {
				self.line("finally:");
				self.indented(|t| t.line("pass"));
			}
			None => {}
		}
	}
}
