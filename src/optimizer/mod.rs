//! Behaviour-preserving rewrites of the syntax tree.
//!
//! Every node is rewritten after its children (post-order), so folds compose
//! bottom-up and a single pass reaches a fixed point. Two kinds of rewrite:
//!
//! - constant folding: an operator whose operands are all literals becomes a
//!   single literal, `2 * 3` → `6`;
//! - algebraic simplification: identities with a literal operand,
//!   `x + 0` → `x`, `true && x` → `x`.
//!
//! A fold that cannot be done exactly (division by zero, overflow, a
//! literal that does not parse, mixed kinds) is abandoned and the node is
//! left as it was. Statements are never removed or reordered.

mod value;

use tracing::{debug, trace};
use value::Constant;

use crate::ast::{
	BinaryOperator, CatchClause, ClassDecl, CompilationUnit, Expression, Member, PrefixOperator, Position, Statement,
	SwitchCase, VarDecl,
};

/// Which rewrites run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerOptions {
	pub constant_folding: bool,
	pub simplify:         bool,
}

impl Default for OptimizerOptions {
	fn default() -> Self { Self { constant_folding: true, simplify: true } }
}

/// Optimize `unit` with every rewrite enabled.
pub fn optimize(unit: CompilationUnit) -> CompilationUnit { Optimizer::new(OptimizerOptions::default()).optimize(unit) }

pub struct Optimizer {
	options:         OptimizerOptions,
	folds:           usize,
	simplifications: usize,
}

fn constant(expression: &Expression) -> Option<Constant> { expression.as_literal().and_then(Constant::parse) }

fn is_int(expression: &Expression, value: i64) -> bool { constant(expression) == Some(Constant::Int(value)) }

/// Looks like string concatenation, where `+ 0` is not an identity.
fn is_textual(expression: &Expression) -> bool {
	match expression {
		Expression::Literal { value, .. } => value.starts_with('"'),
		Expression::Binary { operator: BinaryOperator::Add, left, right, .. } => is_textual(left) || is_textual(right),
		_ => false,
	}
}

impl Optimizer {
	pub fn new(options: OptimizerOptions) -> Self { Self { options, folds: 0, simplifications: 0 } }

	pub fn optimize(&mut self, unit: CompilationUnit) -> CompilationUnit {
		let classes = unit.classes.into_iter().map(|class| self.class(class)).collect();
		debug!(folds = self.folds, simplifications = self.simplifications, "optimization finished");
		CompilationUnit { classes }
	}

	fn class(&mut self, mut class: ClassDecl) -> ClassDecl {
		class.members = class.members.into_iter().map(|member| self.member(member)).collect();
		class
	}

	fn member(&mut self, member: Member) -> Member {
		match member {
			Member::Field(field) => Member::Field(self.var(field)),
			Member::Method(mut method) => {
				method.body = method.body.map(|body| self.block(body));
				Member::Method(method)
			}
			Member::Constructor(mut constructor) => {
				constructor.body = self.block(constructor.body);
				Member::Constructor(constructor)
			}
			Member::Initializer(body) => Member::Initializer(self.block(body)),
		}
	}

	fn var(&mut self, mut var: VarDecl) -> VarDecl {
		var.init = var.init.map(|init| self.expression(init));
		var
	}

	fn block(&mut self, statements: Vec<Statement>) -> Vec<Statement> {
		statements.into_iter().map(|statement| self.statement(statement)).collect()
	}

	fn statement(&mut self, statement: Statement) -> Statement {
		use Statement::*;

		match statement {
			Declaration(vars) => Declaration(vars.into_iter().map(|var| self.var(var)).collect()),
			Expression(expression) => Expression(self.expression(expression)),
			Assign { target, value, position } => {
				Assign { target: self.expression(target), value: self.expression(value), position }
			}
			Block(statements) => Block(self.block(statements)),
			If { condition, then_branch, else_branch, position } => If {
				condition: self.expression(condition),
				then_branch: self.block(then_branch),
				else_branch: else_branch.map(|branch| Box::new(self.statement(*branch))),
				position,
			},
			While { condition, body, position } => {
				While { condition: self.expression(condition), body: self.block(body), position }
			}
			DoWhile { body, condition, position } => {
				DoWhile { body: self.block(body), condition: self.expression(condition), position }
			}
			For { init, condition, update, body, position } => For {
				init: self.block(init),
				condition: condition.map(|condition| self.expression(condition)),
				update: self.block(update),
				body: self.block(body),
				position,
			},
			ForEach { variable, iterable, body, position } => {
				ForEach { variable, iterable: self.expression(iterable), body: self.block(body), position }
			}
			Switch { scrutinee, cases, position } => Switch {
				scrutinee: self.expression(scrutinee),
				cases: cases
					.into_iter()
					.map(|case| SwitchCase {
						label:    case.label.map(|label| self.expression(label)),
						body:     self.block(case.body),
						position: case.position,
					})
					.collect(),
				position,
			},
			Try { body, catches, finally, position } => Try {
				body: self.block(body),
				catches: catches
					.into_iter()
					.map(|catch| CatchClause { body: self.block(catch.body), ..catch })
					.collect(),
				finally: finally.map(|finally| self.block(finally)),
				position,
			},
			Return { value, position } => Return { value: value.map(|value| self.expression(value)), position },
			Throw { value, position } => Throw { value: self.expression(value), position },
			statement @ (Break(_) | Continue(_) | Unknown { .. }) => statement,
		}
	}

	pub fn expression(&mut self, expression: Expression) -> Expression {
		use Expression::*;

		match expression {
			Binary { operator, left, right, position } => {
				let left = self.expression(*left);
				let right = self.expression(*right);
				self.binary(operator, left, right, position)
			}
			Prefix { operator, operand, position } => {
				let operand = self.expression(*operand);
				self.prefix(operator, operand, position)
			}
			Ternary { condition, then_branch, else_branch, position } => {
				let condition = self.expression(*condition);
				let then_branch = self.expression(*then_branch);
				let else_branch = self.expression(*else_branch);
				if self.options.constant_folding {
					if let Some(Constant::Bool(taken)) = constant(&condition) {
						self.folds += 1;
						trace!(taken, "folded conditional expression");
						return if taken { then_branch } else { else_branch };
					}
				}
				Expression::ternary(condition, then_branch, else_branch)
			}
			Member { object, name, position } => Member { object: Box::new(self.expression(*object)), name, position },
			Call { callee, arguments, position } => Call {
				callee: Box::new(self.expression(*callee)),
				arguments: self.expressions(arguments),
				position,
			},
			Index { target, index, position } => Index {
				target: Box::new(self.expression(*target)),
				index: Box::new(self.expression(*index)),
				position,
			},
			New { class, arguments, position } => New { class, arguments: self.expressions(arguments), position },
			NewArray { element, dimensions, extra, position } => {
				NewArray { element, dimensions: self.expressions(dimensions), extra, position }
			}
			ArrayInit { elements, position } => ArrayInit { elements: self.expressions(elements), position },
			Cast { ty, operand, position } => Cast { ty, operand: Box::new(self.expression(*operand)), position },
			Postfix { operator, operand, position } => {
				Postfix { operator, operand: Box::new(self.expression(*operand)), position }
			}
			expression @ (Literal { .. } | Identifier { .. } | Unknown { .. }) => expression,
		}
	}

	fn expressions(&mut self, expressions: Vec<Expression>) -> Vec<Expression> {
		expressions.into_iter().map(|expression| self.expression(expression)).collect()
	}

	fn binary(&mut self, operator: BinaryOperator, left: Expression, right: Expression, position: Position) -> Expression {
		if self.options.constant_folding {
			let folded = constant(&left).zip(constant(&right)).and_then(|(l, r)| l.binary(operator, &r));
			if let Some(value) = folded {
				self.folds += 1;
				trace!(operator = operator.symbol(), %value, "folded binary expression");
				return Expression::literal(value.to_string(), position);
			}
		}
		if self.options.simplify {
			return self.simplify(operator, left, right, position);
		}
		Expression::Binary { operator, left: Box::new(left), right: Box::new(right), position }
	}

	/// Identities with a literal operand. The boolean ones only look at the
	/// left operand.
	fn simplify(
		&mut self,
		operator: BinaryOperator,
		left: Expression,
		right: Expression,
		position: Position,
	) -> Expression {
		use BinaryOperator::*;

		let kept = match operator {
			Add if is_int(&left, 0) && !is_textual(&right) => Some(right.clone()),
			Add if is_int(&right, 0) && !is_textual(&left) => Some(left.clone()),
			Sub if is_int(&right, 0) => Some(left.clone()),
			Mul if is_int(&left, 1) => Some(right.clone()),
			Mul if is_int(&right, 1) => Some(left.clone()),
			And | Or => match constant(&left) {
				// `true && x`, `false || x`
				Some(Constant::Bool(value)) if value == (operator == And) => Some(right.clone()),
				// `false && x`, `true || x`
				Some(Constant::Bool(_)) => Some(left.clone()),
				_ => None,
			},
			_ => None,
		};
		match kept {
			Some(expression) => {
				self.simplifications += 1;
				trace!(operator = operator.symbol(), "simplified binary expression");
				expression
			}
			None => Expression::Binary { operator, left: Box::new(left), right: Box::new(right), position },
		}
	}

	fn prefix(&mut self, operator: PrefixOperator, operand: Expression, position: Position) -> Expression {
		if self.options.constant_folding {
			if let Some(value) = constant(&operand).and_then(|value| value.prefix(operator)) {
				self.folds += 1;
				trace!(operator = operator.symbol(), %value, "folded prefix expression");
				return Expression::literal(value.to_string(), position);
			}
		}
		Expression::prefix(operator, operand, position)
	}
}
